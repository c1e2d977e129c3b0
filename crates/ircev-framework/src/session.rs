//! Session state shared by the builtin handlers.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use ircev_core::{BoxedSender, SendResult, Sender};

use crate::nick::NickTracker;

/// Version string answered to `CTCP VERSION` unless configured otherwise.
pub const DEFAULT_VERSION: &str = concat!("ircev ", env!("CARGO_PKG_VERSION"));

/// Connection-level state read and written by the builtin handlers.
///
/// Shared behind an `Arc`; every field is either immutable after setup or
/// internally synchronized.
pub struct Session {
    sender: BoxedSender,
    nick: NickTracker,
    version: String,
    user: String,
    debug: AtomicBool,
}

impl Session {
    /// Creates a session for `nick` replying through `sender`.
    ///
    /// The user string defaults to the nickname and the version string to
    /// [`DEFAULT_VERSION`].
    pub fn new(sender: BoxedSender, nick: impl Into<String>) -> Self {
        let nick = nick.into();
        Self {
            sender,
            user: nick.clone(),
            nick: NickTracker::new(nick),
            version: DEFAULT_VERSION.to_string(),
            debug: AtomicBool::new(false),
        }
    }

    /// Sets the string answered to `CTCP VERSION`.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the string answered to `CTCP USERINFO`.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Enables lag diagnostics.
    pub fn with_debug(self, enabled: bool) -> Self {
        self.set_debug(enabled);
        self
    }

    /// Returns the outbound sender.
    pub fn sender(&self) -> &BoxedSender {
        &self.sender
    }

    /// Returns the nickname tracker.
    pub fn nick(&self) -> &NickTracker {
        &self.nick
    }

    /// Returns the version string.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the user string.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Returns whether lag diagnostics are enabled.
    pub fn debug(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }

    /// Enables or disables lag diagnostics.
    pub fn set_debug(&self, enabled: bool) {
        self.debug.store(enabled, Ordering::Relaxed);
    }

    /// Queues a line built from format arguments.
    pub fn send_rawf(&self, args: fmt::Arguments<'_>) -> SendResult<()> {
        self.sender.send_rawf(args)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("nick", &self.nick)
            .field("version", &self.version)
            .field("user", &self.user)
            .field("debug", &self.debug())
            .finish()
    }
}
