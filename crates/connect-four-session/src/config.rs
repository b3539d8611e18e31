//! Session configuration.

use std::time::Duration;

use connect_four_clock::DEFAULT_MOVE_TIMEOUT;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Settings shared by every session a manager creates.
///
/// Board size and win length are fixed constants of the board crate and
/// deliberately not part of this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long a player has to move before the session times out.
    pub move_timeout: Duration,

    /// Bound on queued commands per session actor. Senders wait when the
    /// queue is full.
    pub command_channel_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            move_timeout: DEFAULT_MOVE_TIMEOUT,
            command_channel_size: 64,
        }
    }
}

impl SessionConfig {
    /// Default config with a different move timeout.
    pub fn with_move_timeout(move_timeout: Duration) -> Self {
        Self {
            move_timeout,
            ..Self::default()
        }
    }

    /// Replaces out-of-range values so the config is safe to use.
    ///
    /// Called by [`SessionManager::new`](crate::SessionManager::new).
    /// - A zero `move_timeout` falls back to the default.
    /// - `command_channel_size` is raised to at least 1.
    pub fn validated(mut self) -> Self {
        if self.move_timeout.is_zero() {
            warn!(
                default_secs = DEFAULT_MOVE_TIMEOUT.as_secs(),
                "move_timeout of zero would end every game at once, using default"
            );
            self.move_timeout = DEFAULT_MOVE_TIMEOUT;
        }
        if self.command_channel_size == 0 {
            warn!("command_channel_size must be at least 1, clamping");
            self.command_channel_size = 1;
        }
        self
    }
}
