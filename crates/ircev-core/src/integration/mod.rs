//! Integration layer - External system interfaces.
//!
//! The core never touches a socket. Replies produced by handlers leave
//! through a [`Sender`], implemented by whatever owns the connection.

pub mod sender;

pub use sender::{BoxedSender, Sender};
