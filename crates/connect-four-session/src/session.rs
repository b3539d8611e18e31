//! The per-game state machine.
//!
//! ```text
//!                 valid move, game continues
//!               ┌────────────────────────────┐
//!               ▼                            │
//!   ──→ AwaitingMove(turn) ──────────────────┘
//!               │
//!               ├── move connects four ──→ Won(winner, loser)
//!               ├── move fills board  ──→ Tied
//!               ├── clock fires       ──→ TimedOut(turn)
//!               └── forfeit           ──→ Forfeited(actor)
//! ```
//!
//! Terminal states absorb everything: later operations return
//! [`SessionError::SessionTerminal`] and change nothing.

use std::time::Duration;

use connect_four_board::{judge, Board, Color, Move, Verdict};
use connect_four_clock::TurnClock;
use connect_four_protocol::{
    GameStatus, InputEvent, Outcome, PlayerId, PlayerSlot, SessionId,
};
use tracing::{debug, info};

use crate::SessionError;

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

/// The two seats of a session, one per color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Players {
    red: PlayerSlot,
    yellow: PlayerSlot,
}

impl Players {
    /// Seats exactly two players.
    ///
    /// # Errors
    /// [`SessionError::InvalidPlayers`] unless there is exactly one Red
    /// and one Yellow slot, held by different identities.
    pub fn new(
        slots: impl IntoIterator<Item = PlayerSlot>,
    ) -> Result<Self, SessionError> {
        let mut red = None;
        let mut yellow = None;
        let mut count = 0;

        for slot in slots {
            count += 1;
            let seat = match slot.color {
                Color::Red => &mut red,
                Color::Yellow => &mut yellow,
            };
            if seat.is_some() {
                return Err(SessionError::InvalidPlayers(format!(
                    "more than one {} slot",
                    slot.color
                )));
            }
            *seat = Some(slot);
        }

        let (Some(red), Some(yellow)) = (red, yellow) else {
            return Err(SessionError::InvalidPlayers(format!(
                "need one Red and one Yellow slot, got {count} slot(s)"
            )));
        };
        if red.identity == yellow.identity {
            return Err(SessionError::InvalidPlayers(format!(
                "{} cannot play both colors",
                red.identity
            )));
        }
        Ok(Self { red, yellow })
    }

    pub fn red(&self) -> &PlayerSlot {
        &self.red
    }

    pub fn yellow(&self) -> &PlayerSlot {
        &self.yellow
    }

    /// The seat playing `color`.
    pub fn slot(&self, color: Color) -> &PlayerSlot {
        match color {
            Color::Red => &self.red,
            Color::Yellow => &self.yellow,
        }
    }

    /// The color `player` plays, or `None` if they hold no seat.
    pub fn color_of(&self, player: PlayerId) -> Option<Color> {
        if self.red.identity == player {
            Some(Color::Red)
        } else if self.yellow.identity == player {
            Some(Color::Yellow)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One game between two fixed seats.
///
/// A session is mutated only through its own operations and, once handed
/// to the [`SessionManager`](crate::SessionManager), only from its actor
/// task, one input at a time.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    board: Board,
    players: Players,
    /// The color to move; after a terminal move, the color that made it.
    turn: Color,
    status: GameStatus,
    moves: Vec<Move>,
    clock: TurnClock,
    move_timeout: Duration,
}

impl Session {
    /// Creates a session in `AwaitingMove(Red)` with the clock disarmed.
    /// Call [`start`](Self::start) to begin timing Red's first move.
    pub fn new(id: SessionId, players: Players, move_timeout: Duration) -> Self {
        Self {
            id,
            board: Board::new(),
            players,
            turn: Color::Red,
            status: GameStatus::AwaitingMove { turn: Color::Red },
            moves: Vec::new(),
            clock: TurnClock::new(),
            move_timeout,
        }
    }

    /// Arms the clock for the first move and returns the opening outcome.
    pub fn start(&mut self) -> Outcome {
        self.clock.arm(self.move_timeout);
        info!(
            session_id = %self.id,
            red = %self.players.red.identity,
            yellow = %self.players.yellow.identity,
            "game started"
        );
        self.outcome(None)
    }

    /// Dispatches an input event to [`attempt_move`](Self::attempt_move)
    /// or [`forfeit`](Self::forfeit).
    pub fn apply(
        &mut self,
        actor: PlayerId,
        event: InputEvent,
    ) -> Result<Outcome, SessionError> {
        match event {
            InputEvent::Move { column } => self.attempt_move(actor, column),
            InputEvent::Forfeit => self.forfeit(actor),
        }
    }

    /// Drops `actor`'s piece into `column`.
    ///
    /// On success the move is recorded, the board is judged, and the clock
    /// is re-armed for the other color (or cancelled if the game ended).
    ///
    /// # Errors
    /// Checked in this order, each leaving the session untouched:
    /// - [`SessionError::SessionTerminal`] — the game is already over
    /// - [`SessionError::NotAPlayer`] — `actor` holds no seat
    /// - [`SessionError::NotYourTurn`] — `actor` plays the other color
    /// - [`SessionError::InvalidColumn`] / [`SessionError::ColumnFull`]
    ///
    /// An identity that holds no seat at all gets `NotAPlayer`, not
    /// `NotYourTurn`: the narrower error tells an adapter it routed input
    /// to the wrong session rather than that the player moved too early.
    pub fn attempt_move(
        &mut self,
        actor: PlayerId,
        column: usize,
    ) -> Result<Outcome, SessionError> {
        let color = self.seat_of(actor)?;
        if color != self.turn {
            return Err(SessionError::NotYourTurn(actor));
        }

        let placed = self.board.drop_piece(column, color)?;
        self.moves.push(placed);

        self.status = match judge(&self.board, &placed) {
            Verdict::Win(axis) => GameStatus::Won {
                winner: color,
                loser: color.other(),
                axis,
            },
            Verdict::Tie => GameStatus::Tied,
            Verdict::Continue => {
                self.turn = color.other();
                GameStatus::AwaitingMove { turn: self.turn }
            }
        };

        debug!(
            session_id = %self.id,
            %actor,
            %color,
            column,
            row = placed.row,
            "move accepted"
        );

        if self.status.is_terminal() {
            self.finish();
        } else {
            self.clock.arm(self.move_timeout);
        }
        Ok(self.outcome(Some(placed)))
    }

    /// Ends the game with `actor` giving up.
    ///
    /// # Errors
    /// [`SessionError::SessionTerminal`] if the game is already over,
    /// [`SessionError::NotAPlayer`] if `actor` holds no seat.
    pub fn forfeit(&mut self, actor: PlayerId) -> Result<Outcome, SessionError> {
        let color = self.seat_of(actor)?;
        self.status = GameStatus::Forfeited { forfeiter: color };
        self.finish();
        Ok(self.outcome(None))
    }

    /// Ends the game against whoever was to move. Only the session's own
    /// clock calls this; on a finished game it does nothing.
    pub(crate) fn on_timeout(&mut self) -> Option<Outcome> {
        if self.status.is_terminal() {
            return None;
        }
        self.status = GameStatus::TimedOut { loser: self.turn };
        self.finish();
        Some(self.outcome(None))
    }

    /// Current state as an outcome record, without changing anything.
    pub fn snapshot(&self) -> Outcome {
        self.outcome(self.moves.last().copied())
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &Players {
        &self.players
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Accepted moves, oldest first.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// When the current player's time runs out, if the clock is running.
    pub fn move_deadline(&self) -> Option<tokio::time::Instant> {
        self.clock.deadline()
    }

    pub(crate) fn clock_mut(&mut self) -> &mut TurnClock {
        &mut self.clock
    }

    /// Rejects operations on a finished game, then resolves `actor`'s seat.
    fn seat_of(&self, actor: PlayerId) -> Result<Color, SessionError> {
        if self.status.is_terminal() {
            return Err(SessionError::SessionTerminal(self.id));
        }
        self.players
            .color_of(actor)
            .ok_or(SessionError::NotAPlayer(actor))
    }

    fn finish(&mut self) {
        self.clock.cancel();
        info!(
            session_id = %self.id,
            status = %self.status,
            moves = self.moves.len(),
            "game finished"
        );
    }

    fn outcome(&self, last_move: Option<Move>) -> Outcome {
        Outcome {
            session_id: self.id,
            board: self.board.clone(),
            status: self.status,
            last_move,
            time_to_move: self.clock.remaining(),
        }
    }
}
