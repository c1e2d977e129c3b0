//! CTCP (Client-To-Client Protocol) extraction.
//!
//! CTCP requests travel inside `PRIVMSG` payloads framed by the `0x01` byte:
//!
//! ```text
//! PRIVMSG bob :\x01VERSION\x01
//! PRIVMSG #chan :\x01ACTION waves\x01
//! ```
//!
//! [`extract_ctcp`] unwraps the payload in place and re-labels the event with a
//! derived code so that handlers can register for `CTCP_VERSION`,
//! `CTCP_ACTION`, … instead of inspecting every `PRIVMSG`.

use crate::foundation::event::Event;

/// Byte that opens and closes a CTCP payload.
pub const CTCP_DELIMITER: char = '\x01';

/// Dispatch code for CTCP payloads that match no known command.
const CTCP_CODE: &str = "CTCP";

const ACTION_PREFIX: &str = "ACTION";
const PING_PREFIX: &str = "PING";

/// Classification of an unwrapped CTCP payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CtcpCommand {
    /// `VERSION` (exact match).
    Version,
    /// `TIME` (exact match).
    Time,
    /// Anything starting with `PING`.
    Ping,
    /// `USERINFO` (exact match).
    UserInfo,
    /// `CLIENTINFO` (exact match).
    ClientInfo,
    /// Anything starting with `ACTION`.
    Action,
    /// Unrecognized payload, including the empty one.
    Unknown,
}

impl CtcpCommand {
    /// Classifies an unwrapped payload.
    ///
    /// Prefix checks go through [`str::starts_with`], so payloads shorter than
    /// the prefix simply fall through to [`CtcpCommand::Unknown`].
    pub fn classify(body: &str) -> Self {
        match body {
            "VERSION" => Self::Version,
            "TIME" => Self::Time,
            _ if body.starts_with(PING_PREFIX) => Self::Ping,
            "USERINFO" => Self::UserInfo,
            "CLIENTINFO" => Self::ClientInfo,
            _ if body.starts_with(ACTION_PREFIX) => Self::Action,
            _ => Self::Unknown,
        }
    }

    /// Returns the dispatch code for this command.
    pub fn code(self) -> &'static str {
        match self {
            Self::Version => "CTCP_VERSION",
            Self::Time => "CTCP_TIME",
            Self::Ping => "CTCP_PING",
            Self::UserInfo => "CTCP_USERINFO",
            Self::ClientInfo => "CTCP_CLIENTINFO",
            Self::Action => "CTCP_ACTION",
            Self::Unknown => CTCP_CODE,
        }
    }
}

/// Returns `true` when `event` carries a CTCP payload.
fn is_ctcp(event: &Event) -> bool {
    event.code == "PRIVMSG" && event.message.starts_with(CTCP_DELIMITER)
}

/// Unwraps the text between the opening and the last delimiter.
///
/// An unterminated payload keeps everything after the opening delimiter.
fn unwrap_payload(message: &str) -> &str {
    let body = &message[CTCP_DELIMITER.len_utf8()..];
    match body.rfind(CTCP_DELIMITER) {
        Some(end) => &body[..end],
        None => body,
    }
}

/// Drops the `ACTION` keyword and the one character separating it from the text.
fn action_text(body: &str) -> &str {
    let mut rest = body[ACTION_PREFIX.len()..].chars();
    rest.next();
    rest.as_str()
}

/// Expands a CTCP `PRIVMSG` in place.
///
/// Applies only when `code == "PRIVMSG"` and the message starts with
/// [`CTCP_DELIMITER`]. On a match `event.code` becomes one of the `CTCP*`
/// codes and `event.message` the unwrapped payload (for `ACTION`, the text
/// after the keyword). Returns whether the event was rewritten.
///
/// ```rust,ignore
/// let mut event = Event::new("PRIVMSG").with_message("\x01ACTION waves\x01");
/// assert!(extract_ctcp(&mut event));
/// assert_eq!(event.code, "CTCP_ACTION");
/// assert_eq!(event.message, "waves");
/// ```
pub fn extract_ctcp(event: &mut Event) -> bool {
    if !is_ctcp(event) {
        return false;
    }

    let body = unwrap_payload(&event.message);
    let command = CtcpCommand::classify(body);
    let message = match command {
        CtcpCommand::Action => action_text(body).to_string(),
        _ => body.to_string(),
    };

    event.code = command.code().to_string();
    event.message = message;
    true
}

/// Wraps `body` in CTCP delimiters.
pub fn ctcp_quote(body: &str) -> String {
    format!("{CTCP_DELIMITER}{body}{CTCP_DELIMITER}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn privmsg(message: &str) -> Event {
        Event::new("PRIVMSG")
            .with_nick("alice")
            .with_arguments(["bob"])
            .with_message(message)
    }

    fn extracted(message: &str) -> (String, String) {
        let mut event = privmsg(message);
        assert!(extract_ctcp(&mut event));
        (event.code, event.message)
    }

    #[test]
    fn test_known_commands() {
        assert_eq!(
            extracted("\x01VERSION\x01"),
            ("CTCP_VERSION".into(), "VERSION".into())
        );
        assert_eq!(extracted("\x01TIME\x01"), ("CTCP_TIME".into(), "TIME".into()));
        assert_eq!(
            extracted("\x01PING 1700000000\x01"),
            ("CTCP_PING".into(), "PING 1700000000".into())
        );
        assert_eq!(
            extracted("\x01USERINFO\x01"),
            ("CTCP_USERINFO".into(), "USERINFO".into())
        );
        assert_eq!(
            extracted("\x01CLIENTINFO\x01"),
            ("CTCP_CLIENTINFO".into(), "CLIENTINFO".into())
        );
    }

    #[test]
    fn test_action_drops_keyword() {
        assert_eq!(
            extracted("\x01ACTION waves\x01"),
            ("CTCP_ACTION".into(), "waves".into())
        );
        assert_eq!(
            extracted("\x01ACTION waves at \x01bob\x01"),
            ("CTCP_ACTION".into(), "waves at \x01bob".into())
        );
    }

    #[test]
    fn test_bare_action_does_not_panic() {
        assert_eq!(extracted("\x01ACTION\x01"), ("CTCP_ACTION".into(), String::new()));
        assert_eq!(extracted("\x01ACTIONé\x01"), ("CTCP_ACTION".into(), String::new()));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(extracted("\x01FOO\x01"), ("CTCP".into(), "FOO".into()));
        assert_eq!(extracted("\x01version\x01"), ("CTCP".into(), "version".into()));
    }

    #[test]
    fn test_degenerate_payloads() {
        assert_eq!(extracted("\x01\x01"), ("CTCP".into(), String::new()));
        assert_eq!(extracted("\x01"), ("CTCP".into(), String::new()));
        assert_eq!(extracted("\x01PI"), ("CTCP".into(), "PI".into()));
        assert_eq!(extracted("\x01ACT\x01"), ("CTCP".into(), "ACT".into()));
    }

    #[test]
    fn test_unterminated_payload() {
        assert_eq!(
            extracted("\x01VERSION"),
            ("CTCP_VERSION".into(), "VERSION".into())
        );
    }

    #[test]
    fn test_non_ctcp_events_untouched() {
        let mut plain = privmsg("hello");
        assert!(!extract_ctcp(&mut plain));
        assert_eq!(plain.code, "PRIVMSG");
        assert_eq!(plain.message, "hello");

        let mut empty = privmsg("");
        assert!(!extract_ctcp(&mut empty));

        let mut notice = Event::new("NOTICE").with_message("\x01VERSION ircev\x01");
        assert!(!extract_ctcp(&mut notice));
        assert_eq!(notice.code, "NOTICE");
    }

    #[test]
    fn test_quote() {
        assert_eq!(ctcp_quote("VERSION ircev"), "\x01VERSION ircev\x01");
        assert_eq!(ctcp_quote(""), "\x01\x01");
    }
}
