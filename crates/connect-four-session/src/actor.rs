//! Session actor: one Tokio task per live game.
//!
//! The actor owns its [`Session`] outright and is the only code that ever
//! touches it. Inputs arrive one at a time over a bounded mpsc channel and
//! race the session's turn clock inside a single `select!`, so a move and
//! a timeout for the same session can never interleave.

use connect_four_protocol::{InputEvent, Outcome, PlayerId, SessionId};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::manager::Registry;
use crate::{Session, SessionError};

/// Where outcome records go. Sends never wait; a closed receiver is ignored.
pub type OutcomeSender = mpsc::UnboundedSender<Outcome>;

/// The rendering side of an [`OutcomeSender`].
pub type OutcomeReceiver = mpsc::UnboundedReceiver<Outcome>;

/// Commands sent to a session actor through its channel.
pub(crate) enum SessionCommand {
    /// Apply a player's input and report the result.
    Input {
        actor: PlayerId,
        event: InputEvent,
        reply: oneshot::Sender<Result<Outcome, SessionError>>,
    },

    /// Report current state without changing it.
    Snapshot { reply: oneshot::Sender<Outcome> },
}

/// Handle to a running session actor.
///
/// Cheap to clone; the registry holds one per live session.
#[derive(Debug, Clone)]
pub(crate) struct SessionHandle {
    session_id: SessionId,
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Delivers an input and waits for the session's verdict.
    ///
    /// If the actor has already shut down, this is `SessionNotFound`.
    pub(crate) async fn input(
        &self,
        actor: PlayerId,
        event: InputEvent,
    ) -> Result<Outcome, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Input {
                actor,
                event,
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::SessionNotFound(self.session_id))?;
        reply_rx
            .await
            .map_err(|_| SessionError::SessionNotFound(self.session_id))?
    }

    /// Requests the current state.
    pub(crate) async fn snapshot(&self) -> Result<Outcome, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| SessionError::SessionNotFound(self.session_id))?;
        reply_rx
            .await
            .map_err(|_| SessionError::SessionNotFound(self.session_id))
    }
}

struct SessionActor {
    session: Session,
    receiver: mpsc::Receiver<SessionCommand>,
    outcomes: OutcomeSender,
    registry: Registry,
}

impl SessionActor {
    async fn run(mut self) {
        let session_id = self.session.id();
        debug!(%session_id, "session actor started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    // The registry keeps a sender alive until we deregister,
                    // so this only ends if the whole manager went away.
                    let Some(cmd) = cmd else { return };
                    if self.handle(cmd).await {
                        break;
                    }
                }
                firing = self.session.clock_mut().fired() => {
                    debug!(%session_id, cycle = firing.cycle, "move deadline elapsed");
                    if let Some(outcome) = self.session.on_timeout() {
                        self.relay(outcome);
                        self.deregister().await;
                        break;
                    }
                }
            }
        }

        self.drain().await;
        debug!(%session_id, "session actor stopped");
    }

    /// Handles one command. Returns `true` once the game is over.
    async fn handle(&mut self, cmd: SessionCommand) -> bool {
        match cmd {
            SessionCommand::Input {
                actor,
                event,
                reply,
            } => {
                let result = self.session.apply(actor, event);
                let terminal = match &result {
                    Ok(outcome) => {
                        self.relay(outcome.clone());
                        outcome.status.is_terminal()
                    }
                    Err(err) => {
                        debug!(
                            session_id = %self.session.id(),
                            %actor,
                            ?event,
                            error = %err,
                            "input rejected"
                        );
                        false
                    }
                };
                // Deregister before replying, so once a caller sees the
                // final outcome the id no longer resolves.
                if terminal {
                    self.deregister().await;
                }
                let _ = reply.send(result);
                terminal
            }
            SessionCommand::Snapshot { reply } => {
                let _ = reply.send(self.session.snapshot());
                false
            }
        }
    }

    fn relay(&self, outcome: Outcome) {
        // Fire-and-forget: a closed receiver just means nobody is rendering.
        let _ = self.outcomes.send(outcome);
    }

    /// Stops accepting commands and removes the registry entry.
    async fn deregister(&mut self) {
        let session_id = self.session.id();
        self.receiver.close();
        let live = {
            let mut registry = self.registry.write().await;
            registry.remove(&session_id);
            registry.len()
        };
        info!(%session_id, status = %self.session.status(), live, "session removed");
    }

    /// Answers commands that were queued before the channel closed.
    async fn drain(&mut self) {
        let session_id = self.session.id();
        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                SessionCommand::Input { reply, .. } => {
                    let _ = reply.send(Err(SessionError::SessionTerminal(session_id)));
                }
                SessionCommand::Snapshot { reply } => {
                    let _ = reply.send(self.session.snapshot());
                }
            }
        }
    }
}

/// Spawns an actor for an already started `session` and returns a handle
/// to it. The actor removes itself from `registry` when the game ends.
pub(crate) fn spawn_session(
    session: Session,
    outcomes: OutcomeSender,
    registry: Registry,
    channel_size: usize,
) -> SessionHandle {
    let (tx, rx) = mpsc::channel(channel_size);
    let session_id = session.id();

    let actor = SessionActor {
        session,
        receiver: rx,
        outcomes,
        registry,
    };
    tokio::spawn(actor.run());

    SessionHandle {
        session_id,
        sender: tx,
    }
}
