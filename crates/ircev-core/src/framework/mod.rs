//! Framework layer - Core processing and routing.
//!
//! This module contains the event processing pipeline:
//! - Handler trait and type erasure for async callbacks
//! - Callback registry keyed by event code and callback id
//! - Central dispatcher with CTCP expansion and concurrent fan-out

pub mod dispatcher;
pub mod handler;
pub mod registry;

pub use dispatcher::{DispatchStats, Dispatcher};
pub use handler::{
    BoxFuture, BoxedHandler, ErasedHandler, HandleResponse, Handler, HandlerFn, into_handler,
};
pub use registry::CallbackRegistry;
