//! # ircev Core
//!
//! The event-dispatch engine of the ircev IRC client.
//!
//! This crate binds protocol event codes (commands, three-digit numerics and
//! the `"*"` wildcard) to handlers, and fans parsed events out to every
//! matching handler concurrently.
//!
//! ## Architecture Layers
//!
//! ### Foundation Layer
//!
//! - **Event Model**: one parsed protocol message ([`Event`])
//! - **Identifiers**: opaque, per-call unique handler ids ([`CallbackId`])
//! - **CTCP**: recognition and unwrapping of the CTCP sub-protocol ([`extract_ctcp`])
//!
//! ### Framework Layer
//!
//! - **Handler System**: async functions taking an `Arc<Event>` ([`Handler`])
//! - **Callback Registry**: add / remove / replace by id ([`CallbackRegistry`])
//! - **Dispatcher**: CTCP expansion plus fire-and-forget fan-out ([`Dispatcher`])
//!
//! ### Integration Layer
//!
//! - **Outbound**: the [`Sender`] seam the builtin handlers reply through
//!
//! ## Data Flow
//!
//! ```text
//! raw line ─▶ (parser) ─▶ Event ─▶ Dispatcher ─▶ CTCP extractor
//!                                      │
//!                                      ├──▶ registry["PRIVMSG"] ─▶ spawn ─▶ handler
//!                                      └──▶ registry["*"]       ─▶ spawn ─▶ handler
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ircev_core::{CallbackRegistry, Dispatcher, Event};
//!
//! let registry = Arc::new(CallbackRegistry::new());
//! let id = registry.add_callback("privmsg", |event: Arc<Event>| async move {
//!     println!("<{}> {}", event.nick, event.message);
//! });
//!
//! let dispatcher = Dispatcher::new(Arc::clone(&registry));
//! dispatcher.dispatch(Event::new("PRIVMSG").with_nick("alice").with_message("hi"));
//!
//! registry.remove_callback("PRIVMSG", &id);
//! ```

pub mod error;
pub mod foundation;
pub mod framework;
pub mod integration;

pub use error::{SendError, SendResult};

pub use foundation::{
    CTCP_DELIMITER, CallbackId, CtcpCommand, Event, WILDCARD, ctcp_quote, extract_ctcp,
    normalize_code,
};

pub use framework::{
    BoxFuture, BoxedHandler, CallbackRegistry, DispatchStats, Dispatcher, ErasedHandler,
    HandleResponse, Handler, HandlerFn, into_handler,
};

pub use integration::{BoxedSender, Sender};

/// Prelude for common imports.
pub mod prelude {
    pub use super::foundation::*;
    pub use super::framework::{
        BoxedHandler, CallbackRegistry, DispatchStats, Dispatcher, HandleResponse, Handler,
        into_handler,
    };
    pub use super::integration::{BoxedSender, Sender};
}
