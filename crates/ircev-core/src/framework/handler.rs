//! Handler system for ircev.
//!
//! A handler is any async function or closure that takes the dispatched
//! event as an `Arc<Event>`:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ircev_core::Event;
//!
//! // No return value
//! async fn log_join(event: Arc<Event>) {
//!     println!("{} joined {}", event.nick, event.message);
//! }
//!
//! // Errors are logged and otherwise ignored
//! async fn greet(event: Arc<Event>) -> Result<(), SendError> {
//!     sender.send_raw(format!("PRIVMSG {} :hi", event.nick))
//! }
//! ```
//!
//! Every handler of one dispatch shares the same `Arc<Event>`; the event is
//! immutable once fan-out starts.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::Map;
use tracing::error;

use crate::foundation::event::Event;

pub use futures::future::BoxFuture;

// ============================================================================
// HandleResponse - Handle handler return values
// ============================================================================

/// A trait for types a handler may return.
///
/// Return values never reach the dispatcher; they are consumed here.
pub trait HandleResponse: Send {
    /// Consume the value.
    fn into_response(self);
}

/// Implementation for `()` - nothing to do.
impl HandleResponse for () {
    fn into_response(self) {}
}

/// Implementation for `Result<T, E>` where T implements HandleResponse.
///
/// On Ok, the inner value's response is handled. On Err, the error is logged.
impl<T: HandleResponse, E: std::fmt::Display + Send> HandleResponse for Result<T, E> {
    fn into_response(self) {
        match self {
            Ok(t) => t.into_response(),
            Err(e) => {
                error!("Callback error: {e}");
            }
        }
    }
}

// ============================================================================
// Handler Trait
// ============================================================================

/// The core trait for event handlers.
///
/// Automatically implemented for every `Fn(Arc<Event>) -> impl Future` whose
/// output implements [`HandleResponse`].
pub trait Handler: Send + Sync + 'static {
    /// The type of future calling this handler returns.
    type Future: Future<Output = ()> + Send + 'static;

    /// Call the handler with the dispatched event.
    fn call(&self, event: Arc<Event>) -> Self::Future;
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Arc<Event>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: HandleResponse + 'static,
{
    type Future = Map<Fut, fn(R)>;

    fn call(&self, event: Arc<Event>) -> Self::Future {
        (self)(event).map(R::into_response as fn(R))
    }
}

// ============================================================================
// Type erasure
// ============================================================================

/// Wraps a [`Handler`] so it can be stored behind [`ErasedHandler`].
pub struct HandlerFn<H> {
    handler: H,
}

impl<H> HandlerFn<H> {
    /// Creates a new handler wrapper.
    pub fn new(handler: H) -> Self {
        Self { handler }
    }
}

/// Type-erased handler trait for dynamic dispatch.
pub trait ErasedHandler: Send + Sync {
    /// Execute the handler with the given event.
    fn call(&self, event: Arc<Event>) -> BoxFuture<'static, ()>;
}

impl<H: Handler> ErasedHandler for HandlerFn<H> {
    fn call(&self, event: Arc<Event>) -> BoxFuture<'static, ()> {
        self.handler.call(event).boxed()
    }
}

/// A type-erased handler that can be stored in collections.
pub type BoxedHandler = Arc<dyn ErasedHandler>;

/// Convert a handler into a boxed handler.
pub fn into_handler<H: Handler>(handler: H) -> BoxedHandler {
    Arc::new(HandlerFn::new(handler))
}
