//! Builtin handlers registered by every client at setup.
//!
//! | Code | Handler | Behavior |
//! |------|---------|----------|
//! | `PING` | [`ping::on_ping`] | `PONG :<payload>` |
//! | `PONG` | [`ping::on_pong`] | lag diagnostics from a probe payload |
//! | `CTCP_VERSION` | [`ctcp::on_version`] | `VERSION <version>` |
//! | `CTCP_USERINFO` | [`ctcp::on_userinfo`] | `USERINFO <user>` |
//! | `CTCP_CLIENTINFO` | [`ctcp::on_clientinfo`] | supported CTCP commands |
//! | `CTCP_TIME` | [`ctcp::on_time`] | local time |
//! | `CTCP_PING` | [`ctcp::on_ping`] | echo of the payload |
//! | `433`, `437` | [`nick::on_collision`] | mutate nickname, resend `NICK` |
//! | `NICK` | [`nick::on_nick`] | follow our own nick changes |
//! | `001` | [`nick::on_welcome`] | adopt the server-confirmed nickname |
//!
//! # Loading the builtins
//!
//! ```rust,ignore
//! use ircev_framework::{Session, register_builtins};
//!
//! let session = Arc::new(Session::new(sender, "ircev"));
//! let handles = register_builtins(&registry, &session);
//!
//! // Swap the stock VERSION reply for a custom one.
//! let id = handles.get("CTCP_VERSION").unwrap();
//! registry.replace_callback("CTCP_VERSION", id, my_version_reply);
//! ```

pub mod ctcp;
pub mod nick;
pub mod ping;

use std::sync::Arc;

use ircev_core::{
    BoxedHandler, CallbackId, CallbackRegistry, Event, Handler, SendResult, into_handler,
};
use tracing::debug;

use crate::session::Session;

pub use ctcp::CLIENTINFO_REPLY;

/// Ids of the registered builtins, in registration order.
#[derive(Debug, Clone, Default)]
pub struct BuiltinHandles {
    entries: Vec<(&'static str, CallbackId)>,
}

impl BuiltinHandles {
    /// Returns the id of the builtin registered under `code`.
    pub fn get(&self, code: &str) -> Option<&CallbackId> {
        self.entries
            .iter()
            .find(|(c, _)| c.eq_ignore_ascii_case(code))
            .map(|(_, id)| id)
    }

    /// Iterates over `(code, id)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &CallbackId)> {
        self.entries.iter().map(|(code, id)| (*code, id))
    }

    /// Number of registered builtins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no builtin was registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every builtin from `registry`, returning how many were removed.
    pub fn unregister(&self, registry: &CallbackRegistry) -> usize {
        self.entries
            .iter()
            .filter(|(code, id)| registry.remove_callback(code, id))
            .count()
    }
}

/// Binds a session-aware handler into a plain [`Handler`].
fn bind<F, Fut>(session: &Arc<Session>, f: F) -> impl Handler
where
    F: Fn(Arc<Session>, Arc<Event>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = SendResult<()>> + Send + 'static,
{
    let session = Arc::clone(session);
    move |event: Arc<Event>| f(Arc::clone(&session), event)
}

/// Registers the builtin handler set into `registry`.
pub fn register_builtins(registry: &CallbackRegistry, session: &Arc<Session>) -> BuiltinHandles {
    let mut entries = Vec::with_capacity(11);
    let mut add = |code: &'static str, handler: BoxedHandler| {
        entries.push((code, registry.add_boxed_callback(code, handler)));
    };

    add("PING", into_handler(bind(session, ping::on_ping)));
    add("PONG", into_handler(bind(session, ping::on_pong)));

    add("CTCP_VERSION", into_handler(bind(session, ctcp::on_version)));
    add("CTCP_USERINFO", into_handler(bind(session, ctcp::on_userinfo)));
    add("CTCP_CLIENTINFO", into_handler(bind(session, ctcp::on_clientinfo)));
    add("CTCP_TIME", into_handler(bind(session, ctcp::on_time)));
    add("CTCP_PING", into_handler(bind(session, ctcp::on_ping)));

    add("433", into_handler(bind(session, nick::on_collision)));
    add("437", into_handler(bind(session, nick::on_collision)));
    add("NICK", into_handler(bind(session, nick::on_nick)));
    add("001", into_handler(bind(session, nick::on_welcome)));

    debug!(count = entries.len(), "Registered builtin callbacks");
    BuiltinHandles { entries }
}
