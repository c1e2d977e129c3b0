//! Event dispatcher for ircev.
//!
//! This module provides the [`Dispatcher`], which is responsible for receiving
//! parsed events and distributing them to the handlers held in a
//! [`CallbackRegistry`].
//!
//! # Fire-and-forget Dispatch
//!
//! When an event is dispatched:
//!
//! 1. A CTCP `PRIVMSG` is expanded in place (see [`extract_ctcp`])
//! 2. Every handler registered under the (possibly rewritten) code is spawned
//!    as its own Tokio task
//! 3. Every handler registered under [`WILDCARD`] is spawned the same way
//!
//! Handler tasks run on the Tokio runtime the dispatcher was built on, so
//! [`Dispatcher::dispatch`] may be called from any thread, including a plain
//! `std::thread` reading lines off a socket.
//!
//! Dispatch never waits for a handler, never bounds the number of running
//! handler tasks, and guarantees no ordering between handlers of the same
//! event or of successive events. Handlers that share mutable state must
//! synchronize it themselves.
//!
//! ```rust,ignore
//! use ircev_core::{CallbackRegistry, Dispatcher, Event};
//!
//! let registry = Arc::new(CallbackRegistry::new());
//! let dispatcher = Dispatcher::new(Arc::clone(&registry)).verbose(true);
//!
//! let stats = dispatcher.dispatch(Event::new("PRIVMSG").with_message("\x01VERSION\x01"));
//! assert_eq!(stats.code, "CTCP_VERSION");
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::runtime::Handle;
use tracing::{Instrument, Level, Span, info, span, warn};

use crate::foundation::ctcp::extract_ctcp;
use crate::foundation::event::{Event, WILDCARD};
use crate::framework::handler::BoxedHandler;
use crate::framework::registry::CallbackRegistry;

/// Outcome of a single [`Dispatcher::dispatch`] call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DispatchStats {
    /// The code the event was dispatched under, after CTCP expansion.
    pub code: String,
    /// Number of code-specific handler tasks spawned.
    pub matched: usize,
    /// Number of wildcard handler tasks spawned.
    pub wildcard: usize,
}

impl DispatchStats {
    /// Total number of handler tasks spawned.
    pub fn total(&self) -> usize {
        self.matched + self.wildcard
    }
}

/// The central event dispatcher.
///
/// # Thread Safety
///
/// `Dispatcher` is `Send + Sync`. It owns no thread: [`dispatch`](Self::dispatch)
/// runs on the caller's context and hands handlers to the runtime behind its
/// [`Handle`].
pub struct Dispatcher {
    registry: Arc<CallbackRegistry>,
    handle: Option<Handle>,
    verbose: AtomicBool,
}

impl Dispatcher {
    /// Creates a dispatcher reading from `registry`.
    ///
    /// Captures the current Tokio runtime if there is one. A dispatcher built
    /// outside any runtime falls back to the runtime of whichever thread
    /// calls [`dispatch`](Self::dispatch).
    pub fn new(registry: Arc<CallbackRegistry>) -> Self {
        Self {
            registry,
            handle: Handle::try_current().ok(),
            verbose: AtomicBool::new(false),
        }
    }

    /// Creates a dispatcher that spawns handlers on `handle`.
    pub fn with_handle(registry: Arc<CallbackRegistry>, handle: Handle) -> Self {
        Self {
            registry,
            handle: Some(handle),
            verbose: AtomicBool::new(false),
        }
    }

    /// Enables or disables verbose dispatch tracing (builder pattern).
    pub fn verbose(self, enabled: bool) -> Self {
        self.set_verbose(enabled);
        self
    }

    /// Enables or disables verbose dispatch tracing.
    pub fn set_verbose(&self, enabled: bool) {
        self.verbose.store(enabled, Ordering::Relaxed);
    }

    /// Returns whether verbose dispatch tracing is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose.load(Ordering::Relaxed)
    }

    /// Returns the registry this dispatcher reads from.
    pub fn registry(&self) -> &Arc<CallbackRegistry> {
        &self.registry
    }

    /// Dispatches an event to every matching handler.
    ///
    /// The dispatcher will:
    /// 1. Expand a CTCP `PRIVMSG`, rewriting `code` and `message`
    /// 2. Spawn one task per handler registered under `code`
    /// 3. Spawn one task per handler registered under `"*"`
    ///
    /// Returns immediately after spawning. An event nobody listens to is not
    /// an error. With no runtime to spawn on, the handlers are skipped and
    /// counted as zero.
    pub fn dispatch(&self, mut event: Event) -> DispatchStats {
        extract_ctcp(&mut event);

        let runtime = self.handle.clone().or_else(|| Handle::try_current().ok());
        let event = Arc::new(event);
        let span = span!(Level::DEBUG, "dispatch", code = %event.code);
        let verbose = self.is_verbose();

        let matched = match self.registry.snapshot(&event.code) {
            Some(handlers) => {
                if verbose {
                    info!(code = %event.code, handlers = handlers.len(), event = ?event, "Dispatching");
                }
                Self::fan_out(runtime.as_ref(), handlers, &event, &span)
            }
            None => {
                if verbose {
                    info!(code = %event.code, handlers = 0, event = ?event, "Dispatching");
                }
                0
            }
        };

        let wildcard = match self.registry.snapshot(WILDCARD) {
            Some(handlers) => {
                if verbose {
                    info!(code = %event.code, handlers = handlers.len(), "Dispatching to wildcard");
                }
                Self::fan_out(runtime.as_ref(), handlers, &event, &span)
            }
            None => 0,
        };

        DispatchStats {
            code: event.code.clone(),
            matched,
            wildcard,
        }
    }

    /// Spawns one detached task per handler. The join handles are dropped.
    fn fan_out(
        runtime: Option<&Handle>,
        handlers: Vec<BoxedHandler>,
        event: &Arc<Event>,
        span: &Span,
    ) -> usize {
        let Some(runtime) = runtime else {
            warn!(
                code = %event.code,
                handlers = handlers.len(),
                "No Tokio runtime to run handlers on, event dropped"
            );
            return 0;
        };

        let count = handlers.len();
        for handler in handlers {
            runtime.spawn(handler.call(Arc::clone(event)).instrument(span.clone()));
        }
        count
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("has_runtime", &self.handle.is_some())
            .field("verbose", &self.is_verbose())
            .finish()
    }
}
