//! Session manager: creates sessions and routes input to them.
//!
//! The registry maps each live [`SessionId`] to its actor's handle. Lookups
//! take a read lock just long enough to clone a handle; the lock is never
//! held while talking to an actor, so one slow game cannot stall routing
//! for the others.

use std::collections::HashMap;
use std::sync::Arc;

use connect_four_protocol::{
    InputEvent, Outcome, PlayerId, PlayerSlot, RoutedInput, SessionId,
};
use rand::Rng;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::actor::{spawn_session, OutcomeSender, SessionHandle};
use crate::{Players, Session, SessionConfig, SessionError};

/// Live sessions, shared between the manager and every actor (each actor
/// removes its own entry when its game ends).
pub(crate) type Registry = Arc<RwLock<HashMap<SessionId, SessionHandle>>>;

/// Entry point for matchmaking and input adapters.
///
/// Cheap to clone; every clone shares the same registry, config, and
/// outcome sink. Must be used from within a Tokio runtime.
///
/// ```ignore
/// let (tx, mut outcomes) = tokio::sync::mpsc::unbounded_channel();
/// let manager = SessionManager::new(SessionConfig::default(), tx);
///
/// let id = manager.create(vec![
///     PlayerSlot::new("alice", PlayerId(1), Color::Red),
///     PlayerSlot::new("bob", PlayerId(2), Color::Yellow),
/// ]).await?;
///
/// manager.route(id, PlayerId(1), InputEvent::Move { column: 3 }).await?;
/// let outcome = outcomes.recv().await;
/// ```
#[derive(Debug, Clone)]
pub struct SessionManager {
    registry: Registry,
    config: Arc<SessionConfig>,
    outcomes: OutcomeSender,
}

impl SessionManager {
    /// Creates an empty manager. Every outcome any session produces is sent
    /// to `outcomes`.
    pub fn new(config: SessionConfig, outcomes: OutcomeSender) -> Self {
        Self {
            registry: Arc::new(RwLock::new(HashMap::new())),
            config: Arc::new(config.validated()),
            outcomes,
        }
    }

    /// The config every new session uses.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Starts a new game and returns its id. Red moves first and its clock
    /// is already running when this returns.
    ///
    /// # Errors
    /// [`SessionError::InvalidPlayers`] unless `slots` is exactly one Red
    /// and one Yellow seat held by different players.
    pub async fn create(
        &self,
        slots: impl IntoIterator<Item = PlayerSlot>,
    ) -> Result<SessionId, SessionError> {
        let players = Players::new(slots)?;

        // Held until the handle is inserted, so the new actor can't try to
        // deregister an entry that isn't there yet.
        let mut registry = self.registry.write().await;

        let session_id = loop {
            let candidate = draw_session_id();
            if !registry.contains_key(&candidate) {
                break candidate;
            }
        };

        let mut session =
            Session::new(session_id, players, self.config.move_timeout);
        session.start();

        let handle = spawn_session(
            session,
            self.outcomes.clone(),
            Arc::clone(&self.registry),
            self.config.command_channel_size,
        );
        registry.insert(session_id, handle);

        info!(%session_id, live = registry.len(), "session created");
        Ok(session_id)
    }

    /// Forwards `actor`'s input to the addressed session and returns the
    /// resulting outcome (which is also relayed to the outcome sink).
    ///
    /// # Errors
    /// [`SessionError::SessionNotFound`] if the session already ended or
    /// never existed. This is routine: input often arrives after a game
    /// has finished, and callers should simply drop it. Otherwise any
    /// rejection the session itself returns.
    pub async fn route(
        &self,
        session_id: SessionId,
        actor: PlayerId,
        event: InputEvent,
    ) -> Result<Outcome, SessionError> {
        let handle = self.handle(session_id).await?;
        handle.input(actor, event).await
    }

    /// [`route`](Self::route) for an already decoded input record.
    pub async fn route_input(
        &self,
        input: RoutedInput,
    ) -> Result<Outcome, SessionError> {
        self.route(input.session_id, input.actor, input.event).await
    }

    /// Current state of a live session.
    pub async fn snapshot(
        &self,
        session_id: SessionId,
    ) -> Result<Outcome, SessionError> {
        self.handle(session_id).await?.snapshot().await
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.registry.read().await.len()
    }

    /// Ids of all live sessions, in no particular order.
    pub async fn session_ids(&self) -> Vec<SessionId> {
        self.registry.read().await.keys().copied().collect()
    }

    pub async fn contains(&self, session_id: SessionId) -> bool {
        self.registry.read().await.contains_key(&session_id)
    }

    async fn handle(
        &self,
        session_id: SessionId,
    ) -> Result<SessionHandle, SessionError> {
        let handle = self.registry.read().await.get(&session_id).cloned();
        handle.ok_or_else(|| {
            debug!(%session_id, "no live session with this id");
            SessionError::SessionNotFound(session_id)
        })
    }
}

fn draw_session_id() -> SessionId {
    SessionId(rand::rng().random())
}
