//! Nickname negotiation.

use std::sync::Arc;

use ircev_core::{Event, SendResult};
use tracing::{debug, info};

use crate::session::Session;

/// Handles `433` (in use) and `437` (unavailable) by retrying with a mutated
/// nickname.
pub async fn on_collision(session: Arc<Session>, event: Arc<Event>) -> SendResult<()> {
    let candidate = session.nick().collide();
    debug!(code = %event.code, nick = %candidate, "Nickname rejected, retrying");
    session.send_rawf(format_args!("NICK {candidate}"))
}

/// Follows a `NICK` change of our own.
pub async fn on_nick(session: Arc<Session>, event: Arc<Event>) -> SendResult<()> {
    if session.nick().rename(&event.nick, &event.message) {
        info!(from = %event.nick, to = %event.message, "Nickname changed");
    }
    Ok(())
}

/// Adopts the nickname the server confirmed in `001`.
pub async fn on_welcome(session: Arc<Session>, event: Arc<Event>) -> SendResult<()> {
    if let Some(nick) = event.argument(0) {
        session.nick().set(nick);
    }
    Ok(())
}
