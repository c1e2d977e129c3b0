//! ircev Runtime - Configuration, logging and client wiring.
//!
//! This crate provides:
//! - Layered configuration loading (`ConfigLoader`, `IrcevConfig`)
//! - Logging configuration (`LoggingBuilder`)
//! - A ready-to-use [`Client`] combining registry, dispatcher and builtins
//!
//! ```ignore
//! use ircev_runtime::{Client, ConfigLoader};
//!
//! let config = ConfigLoader::new().load()?;
//! let (client, mut outbound) = Client::from_config(&config)?;
//!
//! tokio::spawn(async move {
//!     while let Some(line) = outbound.recv().await {
//!         // write `line` + CRLF to the socket
//!     }
//! });
//!
//! // for each parsed line:
//! client.dispatch(event);
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod logging;

// Re-exports
pub use client::{ChannelSender, Client};
pub use config::{
    ClientConfig, ConfigError, ConfigLoader, ConfigResult, IrcevConfig, LoggingConfig,
};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, init_from_config};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `instrument` attribute
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, event, info, instrument, span, trace, warn};
}
