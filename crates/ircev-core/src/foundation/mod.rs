//! Foundation layer - Core abstractions and type system.
//!
//! This module contains the fundamental building blocks of ircev:
//! - Event model shared by the parser, the dispatcher and every handler
//! - Opaque callback identifiers
//! - The CTCP sub-protocol extractor

pub mod ctcp;
pub mod event;
pub mod id;

pub use ctcp::{CTCP_DELIMITER, CtcpCommand, ctcp_quote, extract_ctcp};
pub use event::{Event, WILDCARD, normalize_code};
pub use id::CallbackId;
