//! Callback registry.
//!
//! [`CallbackRegistry`] maps an event code to a bucket of handlers keyed by
//! [`CallbackId`]:
//!
//! ```text
//! "PING"         ─▶ { 3-9f2c… ─▶ pong_handler }
//! "CTCP_VERSION" ─▶ { 5-1ab0… ─▶ version_reply }
//! "*"            ─▶ { 7-c44e… ─▶ logger, 8-02d9… ─▶ metrics }
//! ```
//!
//! Codes are normalized to uppercase on every mutating call. Ids are unique
//! within a bucket; the same id never appears in two buckets in practice but
//! nothing depends on that.
//!
//! # Concurrency
//!
//! All buckets sit behind a single `parking_lot::RwLock`. Dispatch takes a
//! [`snapshot`](CallbackRegistry::snapshot) of a bucket under the read lock and
//! releases it before any handler runs, so handlers may add, remove or replace
//! callbacks (including their own) without deadlocking.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::foundation::event::normalize_code;
use crate::foundation::id::CallbackId;
use crate::framework::handler::{BoxedHandler, Handler, into_handler};

type Bucket = HashMap<CallbackId, BoxedHandler>;

/// Registry of callbacks keyed by event code and callback id.
///
/// # Thread Safety
///
/// `CallbackRegistry` is `Send + Sync`; share it behind an `Arc`.
#[derive(Default)]
pub struct CallbackRegistry {
    events: RwLock<HashMap<String, Bucket>>,
}

impl CallbackRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
        }
    }

    /// Registers `handler` under `code` and returns its id.
    ///
    /// Registering the same handler twice yields two distinct ids.
    pub fn add_callback<H: Handler>(&self, code: &str, handler: H) -> CallbackId {
        self.add_boxed_callback(code, into_handler(handler))
    }

    /// Registers an already type-erased handler under `code`.
    pub fn add_boxed_callback(&self, code: &str, handler: BoxedHandler) -> CallbackId {
        let code = normalize_code(code);
        let id = CallbackId::generate();

        self.events
            .write()
            .entry(code.clone())
            .or_default()
            .insert(id.clone(), handler);

        debug!(code = %code, id = %id, "Registered callback");
        id
    }

    /// Removes the callback `id` from `code`.
    ///
    /// Returns `false` when the code has no bucket or the bucket has no such
    /// id; the registry is left untouched in both cases.
    pub fn remove_callback(&self, code: &str, id: impl AsRef<str>) -> bool {
        let code = normalize_code(code);
        let id = id.as_ref();
        let mut events = self.events.write();

        let Some(bucket) = events.get_mut(&code) else {
            warn!(code = %code, "Event not found");
            return false;
        };

        if bucket.remove(id).is_some() {
            debug!(code = %code, id = %id, "Removed callback");
            true
        } else {
            warn!(code = %code, id = %id, "Event found, but no callback found at id");
            false
        }
    }

    /// Swaps the handler stored under `(code, id)`, keeping the id.
    ///
    /// When no such entry exists the new handler is dropped, not registered;
    /// use [`add_callback`](Self::add_callback) for that.
    pub fn replace_callback<H: Handler>(&self, code: &str, id: impl AsRef<str>, handler: H) {
        self.replace_boxed_callback(code, id, into_handler(handler));
    }

    /// Type-erased variant of [`replace_callback`](Self::replace_callback).
    pub fn replace_boxed_callback(&self, code: &str, id: impl AsRef<str>, handler: BoxedHandler) {
        let code = normalize_code(code);
        let id = id.as_ref();
        let mut events = self.events.write();

        match events.get_mut(&code) {
            Some(bucket) => match bucket.get_mut(id) {
                Some(slot) => {
                    *slot = handler;
                    debug!(code = %code, id = %id, "Replaced callback");
                }
                None => {
                    warn!(code = %code, id = %id, "Event found, but no callback found at id");
                }
            },
            None => {
                warn!(code = %code, "Event not found, use add_callback");
            }
        }
    }

    /// Removes every callback registered under `code`.
    ///
    /// Returns `false` when the code has no bucket.
    pub fn clear_callbacks(&self, code: &str) -> bool {
        let code = normalize_code(code);

        if self.events.write().remove(&code).is_some() {
            debug!(code = %code, "Cleared callbacks");
            true
        } else {
            warn!(code = %code, "Event not found");
            false
        }
    }

    /// Returns `true` if at least one callback is registered under `code`.
    pub fn has_callbacks(&self, code: &str) -> bool {
        self.callback_count(code) > 0
    }

    /// Returns the number of callbacks registered under `code`.
    pub fn callback_count(&self, code: &str) -> usize {
        self.events
            .read()
            .get(&normalize_code(code))
            .map_or(0, HashMap::len)
    }

    /// Returns every code that currently has a bucket.
    pub fn codes(&self) -> Vec<String> {
        self.events.read().keys().cloned().collect()
    }

    /// Copies the handlers registered under `code` for dispatch.
    ///
    /// `code` is used verbatim; callers are expected to pass a normalized
    /// code. Returns `None` when no bucket exists for it. The returned handlers
    /// stay valid even if the bucket is mutated afterwards.
    pub fn snapshot(&self, code: &str) -> Option<Vec<BoxedHandler>> {
        self.events
            .read()
            .get(code)
            .map(|bucket| bucket.values().cloned().collect())
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let events = self.events.read();
        f.debug_struct("CallbackRegistry")
            .field("codes", &events.len())
            .field("callbacks", &events.values().map(HashMap::len).sum::<usize>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::event::Event;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: &Arc<AtomicUsize>, amount: usize) -> impl Handler {
        let counter = Arc::clone(counter);
        move |_event: Arc<Event>| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(amount, Ordering::SeqCst);
            }
        }
    }

    async fn run_bucket(registry: &CallbackRegistry, code: &str) {
        let event = Arc::new(Event::new(code));
        for handler in registry.snapshot(code).unwrap_or_default() {
            handler.call(Arc::clone(&event)).await;
        }
    }

    #[test]
    fn test_add_normalizes_code() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));

        registry.add_callback("privmsg", counting(&counter, 1));

        assert!(registry.has_callbacks("PRIVMSG"));
        assert!(registry.has_callbacks("PrivMsg"));
        assert!(registry.snapshot("PRIVMSG").is_some());
        assert!(registry.snapshot("privmsg").is_none());
    }

    #[test]
    fn test_identical_handlers_get_distinct_ids() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let ids: HashSet<_> = (0..16)
            .map(|_| registry.add_callback("PING", counting(&counter, 1)))
            .collect();

        assert_eq!(ids.len(), 16);
        assert_eq!(registry.callback_count("PING"), 16);
    }

    #[tokio::test]
    async fn test_remove_known_callback() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let keep = registry.add_callback("JOIN", counting(&counter, 1));
        let dropped = registry.add_callback("join", counting(&counter, 100));

        assert!(registry.remove_callback("Join", &dropped));
        assert_eq!(registry.callback_count("JOIN"), 1);

        run_bucket(&registry, "JOIN").await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        assert!(registry.remove_callback("JOIN", keep));
        assert!(!registry.has_callbacks("JOIN"));
    }

    #[test]
    fn test_remove_unknown_leaves_registry_unchanged() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let id = registry.add_callback("PART", counting(&counter, 1));

        assert!(!registry.remove_callback("QUIT", &id));
        assert!(!registry.remove_callback("PART", "no-such-id"));
        assert_eq!(registry.callback_count("PART"), 1);
        assert_eq!(registry.codes(), vec!["PART".to_string()]);
    }

    #[tokio::test]
    async fn test_replace_keeps_id() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let id = registry.add_callback("TOPIC", counting(&counter, 1));
        registry.replace_callback("topic", &id, counting(&counter, 10));

        assert_eq!(registry.callback_count("TOPIC"), 1);
        run_bucket(&registry, "TOPIC").await;
        assert_eq!(counter.load(Ordering::SeqCst), 10);

        // The id still addresses the replacement.
        assert!(registry.remove_callback("TOPIC", &id));
    }

    #[tokio::test]
    async fn test_replace_unknown_discards_handler() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));

        registry.replace_callback("KICK", "missing", counting(&counter, 1));
        assert!(!registry.has_callbacks("KICK"));
        assert!(registry.codes().is_empty());

        let id = registry.add_callback("KICK", counting(&counter, 1));
        registry.replace_callback("KICK", "missing", counting(&counter, 50));
        assert_eq!(registry.callback_count("KICK"), 1);

        run_bucket(&registry, "KICK").await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(registry.remove_callback("KICK", id));
    }

    #[test]
    fn test_clear_callbacks() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));

        registry.add_callback("MODE", counting(&counter, 1));
        registry.add_callback("MODE", counting(&counter, 1));

        assert!(registry.clear_callbacks("mode"));
        assert!(!registry.has_callbacks("MODE"));
        assert!(!registry.clear_callbacks("MODE"));
    }

    #[test]
    fn test_snapshot_survives_mutation() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let id = registry.add_callback("NICK", counting(&counter, 1));

        let snapshot = registry.snapshot("NICK").unwrap();
        registry.remove_callback("NICK", &id);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.snapshot("NICK").map(|s| s.len()), Some(0));
    }

    #[test]
    fn test_concurrent_mutation() {
        let registry = Arc::new(CallbackRegistry::new());
        let counter = Arc::new(AtomicUsize::new(0));

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let counter = Arc::clone(&counter);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let id = registry.add_callback("PRIVMSG", counting(&counter, 1));
                        let _ = registry.snapshot("PRIVMSG");
                        assert!(registry.remove_callback("PRIVMSG", &id));
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(registry.callback_count("PRIVMSG"), 0);
    }
}
