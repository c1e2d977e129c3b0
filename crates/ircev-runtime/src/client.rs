//! Client wiring.
//!
//! A [`Client`] owns one callback registry, the dispatcher reading from it,
//! and the session the builtin handlers share. Outbound lines go through a
//! [`Sender`]; [`Client::new`] uses a [`ChannelSender`] whose receiving half
//! is handed back to the caller, typically the task that writes to the
//! socket.
//!
//! ```rust,ignore
//! use ircev_runtime::{Client, ClientConfig};
//!
//! let (client, mut outbound) = Client::new(&ClientConfig::default());
//!
//! client.add_callback("PRIVMSG", |event: Arc<Event>| async move {
//!     println!("<{}> {}", event.nick, event.message);
//! });
//!
//! // Reader task
//! client.dispatch(parse(line));
//!
//! // Writer task
//! while let Some(line) = outbound.recv().await {
//!     socket.write_all(format!("{line}\r\n").as_bytes()).await?;
//! }
//! ```

use std::sync::Arc;
use std::time::SystemTime;

use ircev_core::{
    BoxedSender, CallbackId, CallbackRegistry, DispatchStats, Dispatcher, Event, Handler,
    SendError, SendResult, Sender,
};
use ircev_framework::{BuiltinHandles, Session, lag, register_builtins};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::config::{ClientConfig, IrcevConfig, validate_config};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;

// =============================================================================
// ChannelSender
// =============================================================================

/// A [`Sender`] that queues lines on an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSender {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSender {
    /// Creates a sender and the receiver that drains it.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Returns `true` once the receiver has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Sender for ChannelSender {
    fn send_raw(&self, line: String) -> SendResult<()> {
        trace!(line = %line, "Queueing outbound line");
        self.tx.send(line).map_err(|_| SendError::Closed)
    }
}

// =============================================================================
// Client
// =============================================================================

/// The event side of an IRC connection.
pub struct Client {
    registry: Arc<CallbackRegistry>,
    dispatcher: Dispatcher,
    session: Arc<Session>,
    builtins: BuiltinHandles,
}

impl Client {
    /// Creates a client with a channel-backed sender.
    ///
    /// Returns the receiving half of the outbound channel.
    pub fn new(config: &ClientConfig) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, rx) = ChannelSender::channel();
        (Self::with_sender(config, Arc::new(sender)), rx)
    }

    /// Creates a client replying through `sender`.
    ///
    /// Handlers run on the Tokio runtime current at construction. Use
    /// [`Client::with_handle`] to dispatch from threads outside that runtime
    /// when the client is built outside it too.
    pub fn with_sender(config: &ClientConfig, sender: BoxedSender) -> Self {
        let registry = Arc::new(CallbackRegistry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry));
        Self::assemble(config, sender, registry, dispatcher)
    }

    /// Creates a client replying through `sender` whose handlers run on
    /// `handle`.
    pub fn with_handle(config: &ClientConfig, sender: BoxedSender, handle: Handle) -> Self {
        let registry = Arc::new(CallbackRegistry::new());
        let dispatcher = Dispatcher::with_handle(Arc::clone(&registry), handle);
        Self::assemble(config, sender, registry, dispatcher)
    }

    fn assemble(
        config: &ClientConfig,
        sender: BoxedSender,
        registry: Arc<CallbackRegistry>,
        dispatcher: Dispatcher,
    ) -> Self {
        let dispatcher = dispatcher.verbose(config.verbose_callback_handler);

        let session = Arc::new(
            Session::new(sender, config.nick.clone())
                .with_user(config.user.clone())
                .with_version(config.version.clone())
                .with_debug(config.debug),
        );
        let builtins = register_builtins(&registry, &session);

        debug!(nick = %config.nick, builtins = builtins.len(), "Client created");

        Self {
            registry,
            dispatcher,
            session,
            builtins,
        }
    }

    /// Validates `config`, initializes logging and creates a client.
    pub fn from_config(
        config: &IrcevConfig,
    ) -> RuntimeResult<(Self, mpsc::UnboundedReceiver<String>)> {
        validate_config(config)?;
        logging::init_from_config(&config.logging);
        Ok(Self::new(&config.client))
    }

    // -------------------------------------------------------------------------
    // Callbacks
    // -------------------------------------------------------------------------

    /// Registers `handler` for `code` and returns its id.
    pub fn add_callback<H: Handler>(&self, code: &str, handler: H) -> CallbackId {
        self.registry.add_callback(code, handler)
    }

    /// Removes one handler. Returns whether it existed.
    pub fn remove_callback(&self, code: &str, id: impl AsRef<str>) -> bool {
        self.registry.remove_callback(code, id)
    }

    /// Replaces one handler, keeping its id. Unknown ids are ignored.
    pub fn replace_callback<H: Handler>(&self, code: &str, id: impl AsRef<str>, handler: H) {
        self.registry.replace_callback(code, id, handler);
    }

    /// Removes every handler for `code`, builtins included.
    pub fn clear_callbacks(&self, code: &str) -> bool {
        self.registry.clear_callbacks(code)
    }

    /// Dispatches a parsed event. Safe to call from any thread.
    pub fn dispatch(&self, event: Event) -> DispatchStats {
        self.dispatcher.dispatch(event)
    }

    // -------------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------------

    /// The nickname the client currently believes it holds.
    pub fn current_nick(&self) -> String {
        self.session.nick().current()
    }

    /// Queues a raw protocol line.
    pub fn send_raw(&self, line: impl Into<String>) -> SendResult<()> {
        self.session.sender().send_raw(line.into())
    }

    /// Sends a `PING` whose payload the builtin `PONG` handler turns into a
    /// lag estimate.
    pub fn send_lag_probe(&self) -> RuntimeResult<()> {
        let payload = lag::probe_payload(SystemTime::now());
        self.session.send_rawf(format_args!("PING {payload}"))?;
        Ok(())
    }

    /// Enables or disables per-dispatch logging.
    pub fn set_verbose(&self, enabled: bool) {
        self.dispatcher.set_verbose(enabled);
    }

    /// Enables or disables lag logging.
    pub fn set_debug(&self, enabled: bool) {
        self.session.set_debug(enabled);
    }

    /// Returns the callback registry.
    pub fn registry(&self) -> &Arc<CallbackRegistry> {
        &self.registry
    }

    /// Returns the session shared with the builtin handlers.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Returns the ids of the builtin handlers.
    pub fn builtins(&self) -> &BuiltinHandles {
        &self.builtins
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("dispatcher", &self.dispatcher)
            .field("session", &self.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    async fn next_line(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
        timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for outbound line")
            .expect("outbound channel closed")
    }

    #[tokio::test]
    async fn test_builtins_answer_through_channel() {
        let (client, mut rx) = Client::new(&ClientConfig::default());

        let stats = client.dispatch(Event::new("PING").with_message("irc.example.net"));
        assert_eq!(stats.matched, 1);
        assert_eq!(next_line(&mut rx).await, "PONG :irc.example.net");

        client.dispatch(
            Event::new("PRIVMSG")
                .with_nick("alice")
                .with_message("\x01CLIENTINFO\x01"),
        );
        assert_eq!(
            next_line(&mut rx).await,
            "NOTICE alice :\x01CLIENTINFO PING VERSION TIME USERINFO CLIENTINFO\x01"
        );
    }

    #[tokio::test]
    async fn test_collision_updates_current_nick() {
        let (client, mut rx) = Client::new(&ClientConfig::default());

        client.dispatch(Event::new("433"));
        assert_eq!(next_line(&mut rx).await, "NICK ircev_");
        assert_eq!(client.current_nick(), "ircev_");
    }

    #[tokio::test]
    async fn test_user_callbacks() {
        let (client, mut rx) = Client::new(&ClientConfig::default());
        let sender = Arc::clone(client.session().sender());

        let id = client.add_callback("JOIN", move |event: Arc<Event>| {
            let sender = Arc::clone(&sender);
            async move { sender.send_rawf(format_args!("PRIVMSG {} :welcome", event.message)) }
        });
        client.dispatch(Event::new("join").with_message("#rust"));
        assert_eq!(next_line(&mut rx).await, "PRIVMSG #rust :welcome");

        assert!(client.remove_callback("JOIN", &id));
        assert_eq!(client.dispatch(Event::new("JOIN")).matched, 0);
    }

    #[tokio::test]
    async fn test_lag_probe_payload() {
        let (client, mut rx) = Client::new(&ClientConfig::default());

        client.send_lag_probe().unwrap();
        let line = next_line(&mut rx).await;
        let payload = line.strip_prefix("PING ").unwrap();
        assert!(payload.parse::<u64>().is_ok(), "{line}");
    }

    #[test]
    fn test_closed_channel() {
        let (client, rx) = Client::new(&ClientConfig::default());
        drop(rx);
        assert!(matches!(
            client.send_raw("QUIT"),
            Err(SendError::Closed)
        ));
        assert!(matches!(
            client.send_lag_probe(),
            Err(RuntimeError::Send(SendError::Closed))
        ));
    }

    #[test]
    fn test_dispatch_from_reader_thread() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let (sender, mut rx) = ChannelSender::channel();
        let client = Arc::new(Client::with_handle(
            &ClientConfig::default(),
            Arc::new(sender),
            runtime.handle().clone(),
        ));

        let reader = Arc::clone(&client);
        let stats = std::thread::spawn(move || {
            reader.dispatch(Event::new("PING").with_message("irc.example.net"))
        })
        .join()
        .expect("dispatch panicked on the reader thread");
        assert_eq!(stats.matched, 1);

        let line = runtime.block_on(next_line(&mut rx));
        assert_eq!(line, "PONG :irc.example.net");
    }

    #[test]
    fn test_config_applied() {
        let config = ClientConfig {
            nick: "mybot".to_string(),
            verbose_callback_handler: true,
            debug: true,
            ..Default::default()
        };
        let (client, _rx) = Client::new(&config);

        assert_eq!(client.current_nick(), "mybot");
        assert!(client.session().debug());
        assert_eq!(client.builtins().len(), 11);
        assert!(client.registry().has_callbacks("CTCP_VERSION"));
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let mut config = IrcevConfig::default();
        config.client.nick = "two words".to_string();
        assert!(Client::from_config(&config).is_err());
    }
}
