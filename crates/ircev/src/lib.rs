//! # ircev
//!
//! The event side of an IRC client: parsed protocol events go in, user
//! callbacks and protocol replies come out.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   Event   ┌────────────┐   tokio::spawn   ┌──────────────────┐
//! │  parser  │──────────▶│ Dispatcher │─────────────────▶│ handler (code)   │──▶ Sender
//! │(external)│           │  + CTCP    │─────────────────▶│ handler (code)   │──▶ Sender
//! └──────────┘           └────────────┘─────────────────▶│ handler ("*")    │
//!                              │                         └──────────────────┘
//!                              ▼
//!                      CallbackRegistry
//! ```
//!
//! - **Registry**: handlers bucketed by event code, each under an opaque id
//! - **Dispatcher**: CTCP expansion, then one detached task per handler
//! - **Builtins**: PING/PONG, CTCP replies, nickname recovery and tracking
//! - **Client**: configuration, logging and a channel-backed outbound sender
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ircev::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), RuntimeError> {
//!     let config = ConfigLoader::new().load()?;
//!     let (client, mut outbound) = Client::from_config(&config)?;
//!
//!     client.add_callback("PRIVMSG", |event: Arc<Event>| async move {
//!         info!(from = %event.nick, "{}", event.message);
//!     });
//!
//!     // feed `client.dispatch(event)` from the reader,
//!     // drain `outbound` into the socket
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: TOML configuration files (default)
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use ircev_core as core;
pub use ircev_framework as framework;
pub use ircev_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use ircev::prelude::*;
/// ```
pub mod prelude {
    pub use std::sync::Arc;

    // Client - main entry point
    pub use ircev_runtime::{
        Client, ClientConfig, ConfigLoader, IrcevConfig, RuntimeError, RuntimeResult,
    };

    // Events and handlers
    pub use ircev_core::{CallbackId, Event, Handler, SendError, SendResult, Sender, WILDCARD};

    // Builtin handler ids, for replacing or removing builtins
    pub use ircev_framework::{BuiltinHandles, Session};

    // Logging macros
    pub use ircev_runtime::prelude::*;
}
