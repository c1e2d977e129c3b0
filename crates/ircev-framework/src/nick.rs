//! Nickname tracking.
//!
//! The client's nickname is written by several builtin handlers that may run
//! at the same time (`433`, `437`, `NICK`, `001`). [`NickTracker`] keeps it in
//! a single mutex-guarded field and exposes each read-modify-write as one
//! locked operation.
//!
//! Negotiation is a linear progression:
//!
//! ```text
//! desired ──433──▶ desired_ ──433──▶ desired__ ──▶ … ──001──▶ (server's choice)
//! ```
//!
//! There is no terminal state; the server simply stops sending collisions.

use parking_lot::Mutex;

/// Nicknames up to this length grow at the end on collision; longer ones grow
/// at the front.
const APPEND_LIMIT: usize = 8;

/// Tracks the desired and the current nickname of the client.
#[derive(Debug)]
pub struct NickTracker {
    desired: String,
    current: Mutex<String>,
}

impl NickTracker {
    /// Creates a tracker whose current nickname starts as `desired`.
    pub fn new(desired: impl Into<String>) -> Self {
        let desired = desired.into();
        Self {
            current: Mutex::new(desired.clone()),
            desired,
        }
    }

    /// Returns the nickname requested at setup.
    pub fn desired(&self) -> &str {
        &self.desired
    }

    /// Returns the current candidate nickname.
    pub fn current(&self) -> String {
        self.current.lock().clone()
    }

    /// Overwrites the current nickname.
    pub fn set(&self, nick: impl Into<String>) {
        *self.current.lock() = nick.into();
    }

    /// Renames `from` to `to` if `from` is the current nickname.
    ///
    /// Returns whether the rename happened.
    pub fn rename(&self, from: &str, to: &str) -> bool {
        let mut current = self.current.lock();
        if *current == from {
            *current = to.to_string();
            true
        } else {
            false
        }
    }

    /// Advances the nickname after a collision and returns the new candidate.
    pub fn collide(&self) -> String {
        let mut current = self.current.lock();
        *current = mutate(&current);
        current.clone()
    }
}

fn mutate(nick: &str) -> String {
    if nick.chars().count() > APPEND_LIMIT {
        format!("_{nick}")
    } else {
        format!("{nick}_")
    }
}
