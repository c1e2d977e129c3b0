//! Outbound line sending.
//!
//! This module defines the [`Sender`] trait which represents the outbound
//! half of a connection. Implementations accept fully formatted protocol
//! lines without the trailing CRLF; framing and length limits are theirs to
//! enforce.

use std::fmt;
use std::sync::Arc;

use crate::error::SendResult;

/// The outbound line sink used by handlers.
///
/// # API Design
///
/// - `send_raw`: queue one protocol line
/// - `send_rawf`: queue a line built from `format_args!`
///
/// Sending is synchronous so that it can be called from any handler without
/// holding a non-`Send` value across an await point.
pub trait Sender: Send + Sync {
    /// Queues a single protocol line, e.g. `PONG :irc.example.net`.
    fn send_raw(&self, line: String) -> SendResult<()>;

    /// Queues a line built from format arguments.
    ///
    /// ```rust,ignore
    /// sender.send_rawf(format_args!("NICK {}", nick))?;
    /// ```
    fn send_rawf(&self, args: fmt::Arguments<'_>) -> SendResult<()> {
        self.send_raw(args.to_string())
    }
}

/// A shared, type-erased sender.
pub type BoxedSender = Arc<dyn Sender>;

impl<S: Sender + ?Sized> Sender for Arc<S> {
    fn send_raw(&self, line: String) -> SendResult<()> {
        (**self).send_raw(line)
    }

    fn send_rawf(&self, args: fmt::Arguments<'_>) -> SendResult<()> {
        (**self).send_rawf(args)
    }
}
