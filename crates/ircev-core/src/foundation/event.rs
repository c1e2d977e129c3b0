//! Event model for ircev.
//!
//! An [`Event`] is one parsed protocol message. The external line parser fills
//! it in; the [`Dispatcher`](crate::framework::Dispatcher) may rewrite `code`
//! and `message` while expanding CTCP, after which the event is frozen behind
//! an `Arc` and shared by every handler of that dispatch.
//!
//! ```rust,ignore
//! use ircev_core::Event;
//!
//! let event = Event::new("privmsg")
//!     .with_nick("alice")
//!     .with_arguments(["#rust"])
//!     .with_message("hello");
//!
//! assert_eq!(event.code, "PRIVMSG");
//! assert_eq!(event.argument(0), Some("#rust"));
//! ```

/// Registry key whose handlers run for every dispatched event.
pub const WILDCARD: &str = "*";

/// Normalizes an event code to the casing used as a registry key.
pub fn normalize_code(code: &str) -> String {
    code.to_uppercase()
}

/// One parsed IRC protocol message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    /// Dispatch key: a command keyword (`PRIVMSG`), a three-digit numeric
    /// (`001`) or a derived CTCP code (`CTCP_VERSION`).
    pub code: String,
    /// The original line as received.
    pub raw: String,
    /// Nickname of the sender, empty for server-originated lines.
    pub nick: String,
    /// Hostname of the sender.
    pub host: String,
    /// Full prefix of the sender (`nick!user@host` or a server name).
    pub source: String,
    /// Username (ident) of the sender.
    pub user: String,
    /// Middle parameters in wire order.
    pub arguments: Vec<String>,
    /// Trailing parameter, possibly empty.
    pub message: String,
}

impl Event {
    /// Creates an event with the given code, normalized to uppercase.
    pub fn new(code: impl AsRef<str>) -> Self {
        Self {
            code: normalize_code(code.as_ref()),
            ..Default::default()
        }
    }

    /// Sets the raw line.
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = raw.into();
        self
    }

    /// Sets the sender nickname.
    pub fn with_nick(mut self, nick: impl Into<String>) -> Self {
        self.nick = nick.into();
        self
    }

    /// Sets the sender hostname.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the sender username.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Sets the full sender prefix.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Sets the middle parameters.
    pub fn with_arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments = arguments.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the trailing parameter.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Returns the argument at `index`, if present.
    pub fn argument(&self, index: usize) -> Option<&str> {
        self.arguments.get(index).map(String::as_str)
    }
}
