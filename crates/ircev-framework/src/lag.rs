//! Lag probe payloads.
//!
//! A probe is a `PING` whose payload is the send time in nanoseconds since
//! the UNIX epoch. The server echoes the payload in its `PONG`, and the
//! builtin `PONG` handler turns it back into a round-trip estimate.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Encodes `now` as a probe payload.
pub fn probe_payload(now: SystemTime) -> String {
    now.duration_since(UNIX_EPOCH)
        .map(|since| since.as_nanos())
        .unwrap_or(0)
        .to_string()
}

/// Time elapsed since the instant encoded in `payload`.
///
/// Non-numeric payloads and timestamps in the future yield [`Duration::ZERO`].
pub fn elapsed_since(payload: &str) -> Duration {
    elapsed_between(payload, SystemTime::now())
}

fn elapsed_between(payload: &str, now: SystemTime) -> Duration {
    let Ok(sent) = payload.trim().parse::<u64>() else {
        return Duration::ZERO;
    };
    let sent = UNIX_EPOCH + Duration::from_nanos(sent);
    now.duration_since(sent).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let sent = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let payload = probe_payload(sent);
        assert_eq!(payload, "1700000000000000000");

        let now = sent + Duration::from_millis(250);
        assert_eq!(elapsed_between(&payload, now), Duration::from_millis(250));
    }

    #[test]
    fn test_malformed_payload_is_zero() {
        assert_eq!(elapsed_since(""), Duration::ZERO);
        assert_eq!(elapsed_since("irc.example.net"), Duration::ZERO);
        assert_eq!(elapsed_since("-5"), Duration::ZERO);
        assert_eq!(elapsed_since("99999999999999999999999"), Duration::ZERO);
    }

    #[test]
    fn test_future_timestamp_is_zero() {
        let now = UNIX_EPOCH + Duration::from_secs(10);
        assert_eq!(elapsed_between("20000000000", now), Duration::ZERO);
    }
}
