//! Server keepalive and lag diagnostics.

use std::sync::Arc;

use ircev_core::{Event, SendResult};
use tracing::debug;

use crate::lag;
use crate::session::Session;

/// Answers a server `PING` with `PONG :<payload>`.
pub async fn on_ping(session: Arc<Session>, event: Arc<Event>) -> SendResult<()> {
    session.send_rawf(format_args!("PONG :{}", event.message))
}

/// Logs the round trip of a lag probe when debugging is enabled.
pub async fn on_pong(session: Arc<Session>, event: Arc<Event>) -> SendResult<()> {
    if session.debug() {
        let elapsed = lag::elapsed_since(&event.message);
        debug!(lag_ms = elapsed.as_millis() as u64, "Lag: {:?}", elapsed);
    }
    Ok(())
}
