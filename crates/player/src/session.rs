//! The game session: one owned aggregate behind a cloneable handle.
//!
//! `Session` ties the pieces together:
//! - a connector that opens transports (WebSocket in production)
//! - the ready-gated sender for outbound commands
//! - the dispatcher that projects inbound events into the [`SessionStore`]
//! - the subscription registry and the login handshake
//!
//! Collaborators get read access to the store through [`Session::read`] and
//! never mutate it directly.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard};

use mafen_protocol::{ChatId, ClientCommand, Credentials, ItemId, MessageKind, ServerMessage};
use tokio::sync::watch;

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::infrastructure::messaging::{
    Dispatcher, LoginHandshake, PendingSend, ReadySender, Subscriptions,
};
use crate::infrastructure::websocket::WsConnector;
use crate::ports::outbound::{ConnectorPort, InboundEvent, InboundHook, ReadyState, TransportPort};
use crate::state::{Chat, Progress, SessionStore};

/// Handle to a game session. Cheap to clone; clones share everything.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    connector: Arc<dyn ConnectorPort>,
    store: Arc<RwLock<SessionStore>>,
    subscriptions: Arc<Subscriptions>,
    login: Arc<Mutex<LoginHandshake>>,
    link: watch::Sender<Option<Arc<dyn TransportPort>>>,
    /// Bumped on every `open_connection`; events from older transports are ignored
    generation: Arc<AtomicU64>,
    sender: ReadySender,
}

impl Session {
    pub fn new(config: SessionConfig, connector: Arc<dyn ConnectorPort>) -> Self {
        let (link, link_rx) = watch::channel(None);
        Self {
            inner: Arc::new(SessionInner {
                connector,
                store: Arc::new(RwLock::new(SessionStore::new())),
                subscriptions: Arc::new(Subscriptions::new()),
                login: Arc::new(Mutex::new(LoginHandshake::new())),
                link,
                generation: Arc::new(AtomicU64::new(0)),
                sender: ReadySender::new(link_rx, config.send_timeout),
            }),
        }
    }

    /// A session that connects over WebSocket
    pub fn websocket(config: SessionConfig) -> Self {
        Self::new(config, Arc::new(WsConnector))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Start over with an empty store.
    ///
    /// A login still waiting for its answer fails with
    /// [`SessionError::LoginSuperseded`] and every subscription is dropped.
    pub fn reset_session(&self) {
        *self
            .inner
            .store
            .write()
            .unwrap_or_else(PoisonError::into_inner) = SessionStore::new();
        self.login_handshake()
            .abandon(SessionError::LoginSuperseded);
        self.inner.subscriptions.clear();
        tracing::debug!("Session reset");
    }

    /// Open a connection to `address`, replacing (and closing) any current one.
    ///
    /// Returns once the attempt has started; sends wait for it to open.
    pub fn open_connection(&self, address: &str) -> Result<(), SessionError> {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(previous) = self.inner.link.send_replace(None) {
            tracing::info!("Replacing existing connection");
            previous.close();
        }

        let transport = self
            .inner
            .connector
            .open(address, self.inbound_hook(generation))?;
        tracing::info!(address, "Opening connection");
        self.inner.link.send_replace(Some(transport));
        Ok(())
    }

    /// Close the current connection. Sends keep waiting until a new one opens.
    pub fn close_connection(&self) {
        let current = self.inner.link.borrow().clone();
        if let Some(transport) = current {
            transport.close();
        }
    }

    /// Close the connection and mark the session unauthenticated.
    pub fn logout(&self) {
        self.close_connection();
        self.inner
            .store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .mark_logged_out();
        tracing::info!("Logged out");
    }

    /// Readiness of the current connection (`Connecting` before any is opened)
    pub fn ready_state(&self) -> ReadyState {
        self.inner
            .link
            .borrow()
            .as_ref()
            .map(|transport| transport.ready_state())
            .unwrap_or(ReadyState::Connecting)
    }

    fn inbound_hook(&self, generation: u64) -> InboundHook {
        let dispatcher = self.dispatcher();
        let current = Arc::clone(&self.inner.generation);
        Arc::new(move |event| {
            if current.load(Ordering::SeqCst) != generation {
                tracing::trace!("Ignoring event from a replaced connection");
                return;
            }
            match event {
                InboundEvent::Frame(frame) => {
                    dispatcher.handle_frame(&frame);
                }
                InboundEvent::Closed => {
                    tracing::info!("Connection closed");
                    dispatcher.handle_closed();
                }
            }
        })
    }

    /// The dispatcher feeding this session's store
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(
            Arc::clone(&self.inner.store),
            Arc::clone(&self.inner.subscriptions),
            Arc::clone(&self.inner.login),
        )
    }

    fn login_handshake(&self) -> MutexGuard<'_, LoginHandshake> {
        self.inner
            .login
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Authenticate. The password is digested before it is sent.
    ///
    /// The returned future resolves when the server answers `connect`:
    /// `Ok(())` on success, [`SessionError::LoginRejected`] on failure. It
    /// fails early with [`SessionError::LoginSuperseded`] if another login (or
    /// a reset) replaces this one, with [`SessionError::ConnectionClosed`] if
    /// the connection ends first, or with the send error if the command could
    /// not be transmitted.
    pub fn login(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), SessionError>> + Send + 'static {
        let outcome = self.login_handshake().begin();
        tracing::info!(username, "Logging in");
        let sent = self.send(ClientCommand::Connect(Credentials::from_plaintext(
            username, password,
        )));

        async move {
            let mut outcome = outcome;
            let delivered = sent.delivered();
            tokio::pin!(delivered);

            tokio::select! {
                answer = &mut outcome => {
                    return answer.unwrap_or(Err(SessionError::SessionClosed));
                }
                sent = &mut delivered => sent?,
            }
            outcome.await.unwrap_or(Err(SessionError::SessionClosed))
        }
    }

    /// Send a command once the connection is open. Never blocks the caller.
    pub fn send(&self, command: ClientCommand) -> PendingSend {
        self.inner.sender.send(&command)
    }

    /// Ask the server to transfer an item
    pub fn transfer(&self, id: ItemId) -> PendingSend {
        self.send(ClientCommand::Transfer { id })
    }

    /// Post `text` to a chat
    pub fn send_chat(&self, chat: ChatId, text: impl Into<String>) -> PendingSend {
        self.send(ClientCommand::Msg {
            id: chat,
            msg: text.into(),
        })
    }

    /// Enter the game as `char_name`
    pub fn play(&self, char_name: impl Into<String>) -> PendingSend {
        self.send(ClientCommand::Play {
            char_name: char_name.into(),
        })
    }

    /// Register the sole reaction to messages of `kind`, replacing any earlier one.
    ///
    /// The callback runs on the dispatch path after the store was updated for
    /// the message. It may read the session but should not block.
    pub fn on(
        &self,
        kind: MessageKind,
        callback: impl Fn(&ServerMessage) + Send + Sync + 'static,
    ) -> bool {
        self.inner.subscriptions.on(kind, callback)
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// Live read access to the store. Do not hold across an `.await`.
    pub fn read(&self) -> RwLockReadGuard<'_, SessionStore> {
        self.inner
            .store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// A point-in-time copy of the store
    pub fn snapshot(&self) -> SessionStore {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    pub fn chat(&self, id: ChatId) -> Option<Chat> {
        self.read().chat(id).cloned()
    }

    pub fn total_carried_weight(&self) -> f64 {
        self.read().total_carried_weight()
    }

    pub fn progress(&self, id: ItemId) -> Option<Progress> {
        self.read().progress(id)
    }

    pub fn progress_description(&self, id: ItemId) -> String {
        self.read().progress_description(id)
    }
}
