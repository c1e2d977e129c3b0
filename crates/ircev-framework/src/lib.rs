//! # ircev Framework
//!
//! Default protocol behavior layered on top of `ircev-core`.
//!
//! This layer provides:
//! - The builtin handler set every client registers at setup
//!   (ping/pong, CTCP replies, nickname collision recovery, lag, self-nick)
//! - Session state those handlers share ([`Session`])
//! - A synchronized nickname tracker ([`NickTracker`])
//! - Encoding and decoding of lag probe payloads ([`lag`])

pub mod builtin;
pub mod lag;
pub mod nick;
pub mod session;

pub use builtin::{BuiltinHandles, CLIENTINFO_REPLY, register_builtins};
pub use nick::NickTracker;
pub use session::{DEFAULT_VERSION, Session};
