//! Integration tests for session actors and the session manager.
//!
//! Deadline tests run with `start_paused = true`: Tokio's clock only moves
//! when every task is idle, so `sleep` jumps straight to the next timer and
//! the session's own deadline fires in order with the test's sleeps.

use std::collections::HashSet;
use std::time::Duration;

use connect_four_board::{Axis, Cell, Color, Move};
use connect_four_protocol::{
    GameStatus, InputEvent, Outcome, PlayerId, PlayerSlot, RoutedInput, SessionId,
};
use connect_four_session::{OutcomeReceiver, SessionConfig, SessionError, SessionManager};
use tokio::sync::mpsc;
use tokio::time::sleep;

const ALICE: PlayerId = PlayerId(1);
const BOB: PlayerId = PlayerId(2);
const CAROL: PlayerId = PlayerId(3);
const DAVE: PlayerId = PlayerId(4);

const TIMEOUT: Duration = Duration::from_secs(30);

// =========================================================================
// Helpers
// =========================================================================

fn setup() -> (SessionManager, OutcomeReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let manager = SessionManager::new(SessionConfig::with_move_timeout(TIMEOUT), tx);
    (manager, rx)
}

fn seats(red: PlayerId, yellow: PlayerId) -> Vec<PlayerSlot> {
    vec![
        PlayerSlot::new(format!("player-{}", red.0), red, Color::Red),
        PlayerSlot::new(format!("player-{}", yellow.0), yellow, Color::Yellow),
    ]
}

fn drop_in(column: usize) -> InputEvent {
    InputEvent::Move { column }
}

/// Drains everything relayed so far.
fn relayed(rx: &mut OutcomeReceiver) -> Vec<Outcome> {
    let mut out = Vec::new();
    while let Ok(outcome) = rx.try_recv() {
        out.push(outcome);
    }
    out
}

// =========================================================================
// create()
// =========================================================================

#[tokio::test]
async fn test_create_starts_with_red_to_move() {
    let (manager, _rx) = setup();

    let id = manager.create(seats(ALICE, BOB)).await.unwrap();
    let snap = manager.snapshot(id).await.unwrap();

    assert_eq!(snap.session_id, id);
    assert_eq!(snap.status, GameStatus::AwaitingMove { turn: Color::Red });
    assert_eq!(snap.board.occupied(), 0);
    assert_eq!(snap.last_move, None);
    let left = snap.time_to_move.expect("clock armed on create");
    assert!(left <= TIMEOUT);
}

#[tokio::test]
async fn test_create_same_player_both_colors_is_rejected() {
    let (manager, _rx) = setup();

    let result = manager.create(seats(ALICE, ALICE)).await;

    assert!(matches!(result, Err(SessionError::InvalidPlayers(_))));
    assert_eq!(manager.session_count().await, 0);
}

#[tokio::test]
async fn test_create_concurrently_yields_distinct_ids() {
    let (manager, _rx) = setup();

    let mut tasks = Vec::new();
    for i in 0..50u64 {
        let manager = manager.clone();
        tasks.push(tokio::spawn(async move {
            manager
                .create(seats(PlayerId(i * 2), PlayerId(i * 2 + 1)))
                .await
                .unwrap()
        }));
    }
    let mut ids = HashSet::new();
    for task in tasks {
        ids.insert(task.await.unwrap());
    }

    assert_eq!(ids.len(), 50);
    assert_eq!(manager.session_count().await, 50);
}

// =========================================================================
// route()
// =========================================================================

#[tokio::test]
async fn test_route_move_returns_and_relays_outcome() {
    let (manager, mut rx) = setup();
    let id = manager.create(seats(ALICE, BOB)).await.unwrap();

    let outcome = manager.route(id, ALICE, drop_in(3)).await.unwrap();

    assert_eq!(outcome.status, GameStatus::AwaitingMove { turn: Color::Yellow });
    assert_eq!(outcome.board.get(0, 3), Some(Cell::Red));
    assert_eq!(
        outcome.last_move,
        Some(Move { column: 3, row: 0, color: Color::Red })
    );
    assert_eq!(rx.recv().await, Some(outcome));
}

#[tokio::test]
async fn test_route_out_of_turn_is_rejected_and_not_relayed() {
    let (manager, mut rx) = setup();
    let id = manager.create(seats(ALICE, BOB)).await.unwrap();
    manager.route(id, ALICE, drop_in(3)).await.unwrap();

    let result = manager.route(id, ALICE, drop_in(3)).await;

    assert_eq!(result, Err(SessionError::NotYourTurn(ALICE)));
    assert_eq!(relayed(&mut rx).len(), 1, "only the accepted move is relayed");
    assert!(manager.contains(id).await);
}

#[tokio::test]
async fn test_route_invalid_column_keeps_turn() {
    let (manager, _rx) = setup();
    let id = manager.create(seats(ALICE, BOB)).await.unwrap();

    let result = manager.route(id, ALICE, drop_in(7)).await;

    assert_eq!(result, Err(SessionError::InvalidColumn(7)));
    let snap = manager.snapshot(id).await.unwrap();
    assert_eq!(snap.status, GameStatus::AwaitingMove { turn: Color::Red });
}

#[tokio::test]
async fn test_route_stranger_is_not_a_player() {
    let (manager, _rx) = setup();
    let id = manager.create(seats(ALICE, BOB)).await.unwrap();

    let result = manager.route(id, CAROL, drop_in(0)).await;

    assert_eq!(result, Err(SessionError::NotAPlayer(CAROL)));
}

#[tokio::test]
async fn test_route_unknown_session_is_not_found() {
    let (manager, _rx) = setup();

    let result = manager.route(SessionId(404), ALICE, drop_in(0)).await;

    assert_eq!(result, Err(SessionError::SessionNotFound(SessionId(404))));
}

#[tokio::test]
async fn test_route_vertical_win_removes_session() {
    let (manager, mut rx) = setup();
    let id = manager.create(seats(ALICE, BOB)).await.unwrap();

    for (actor, col) in [(ALICE, 0), (BOB, 1), (ALICE, 0), (BOB, 1), (ALICE, 0), (BOB, 1)] {
        manager.route(id, actor, drop_in(col)).await.unwrap();
    }
    let last = manager.route(id, ALICE, drop_in(0)).await.unwrap();

    assert_eq!(
        last.status,
        GameStatus::Won {
            winner: Color::Red,
            loser: Color::Yellow,
            axis: Axis::Vertical,
        }
    );
    assert_eq!(last.time_to_move, None);
    assert!(!manager.contains(id).await);
    assert_eq!(
        manager.route(id, BOB, drop_in(2)).await,
        Err(SessionError::SessionNotFound(id))
    );

    let outcomes = relayed(&mut rx);
    assert_eq!(outcomes.len(), 7);
    assert_eq!(outcomes.last(), Some(&last));
}

#[tokio::test]
async fn test_route_forfeit_ends_game_for_forfeiter() {
    let (manager, mut rx) = setup();
    let id = manager.create(seats(ALICE, BOB)).await.unwrap();

    // Forfeiting doesn't require it to be your turn.
    let outcome = manager.route(id, BOB, InputEvent::Forfeit).await.unwrap();

    assert_eq!(outcome.status, GameStatus::Forfeited { forfeiter: Color::Yellow });
    assert_eq!(outcome.status.winner(), Some(Color::Red));
    assert_eq!(rx.recv().await, Some(outcome));
    assert_eq!(manager.session_count().await, 0);
}

#[tokio::test]
async fn test_route_input_record_is_routed() {
    let (manager, _rx) = setup();
    let id = manager.create(seats(ALICE, BOB)).await.unwrap();

    let input = RoutedInput {
        session_id: id,
        actor: ALICE,
        event: drop_in(5),
    };
    let outcome = manager.route_input(input).await.unwrap();

    assert_eq!(outcome.board.get(0, 5), Some(Cell::Red));
}

#[tokio::test]
async fn test_route_outcomes_arrive_in_move_order() {
    let (manager, mut rx) = setup();
    let id = manager.create(seats(ALICE, BOB)).await.unwrap();

    let columns = [3, 3, 2, 4, 6];
    for (i, col) in columns.iter().enumerate() {
        let actor = if i % 2 == 0 { ALICE } else { BOB };
        manager.route(id, actor, drop_in(*col)).await.unwrap();
    }

    let seen: Vec<usize> = relayed(&mut rx)
        .iter()
        .filter_map(|o| o.last_move.map(|m| m.column))
        .collect();
    assert_eq!(seen, columns);
}

#[tokio::test]
async fn test_route_works_without_outcome_listener() {
    let (manager, rx) = setup();
    drop(rx);
    let id = manager.create(seats(ALICE, BOB)).await.unwrap();

    let outcome = manager.route(id, ALICE, drop_in(1)).await.unwrap();

    assert_eq!(outcome.board.occupied(), 1);
}

// =========================================================================
// Timeouts
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_timeout_idle_red_loses() {
    let (manager, mut rx) = setup();
    let id = manager.create(seats(ALICE, BOB)).await.unwrap();

    sleep(TIMEOUT + Duration::from_secs(1)).await;

    let outcome = rx.recv().await.unwrap();
    assert_eq!(outcome.session_id, id);
    assert_eq!(outcome.status, GameStatus::TimedOut { loser: Color::Red });
    assert_eq!(outcome.status.winner(), Some(Color::Yellow));
    assert!(!manager.contains(id).await);
    assert_eq!(
        manager.route(id, ALICE, drop_in(0)).await,
        Err(SessionError::SessionNotFound(id))
    );
}

#[tokio::test(start_paused = true)]
async fn test_timeout_rearmed_by_move_hits_yellow() {
    let (manager, mut rx) = setup();
    let id = manager.create(seats(ALICE, BOB)).await.unwrap();

    sleep(Duration::from_secs(20)).await;
    manager.route(id, ALICE, drop_in(3)).await.unwrap();

    // Past Red's original deadline: the move replaced it.
    sleep(Duration::from_secs(20)).await;
    assert!(manager.contains(id).await);
    let snap = manager.snapshot(id).await.unwrap();
    assert_eq!(snap.status, GameStatus::AwaitingMove { turn: Color::Yellow });

    // Past Yellow's deadline (20 s + 30 s).
    sleep(Duration::from_secs(11)).await;
    let outcomes = relayed(&mut rx);
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[1].status, GameStatus::TimedOut { loser: Color::Yellow });
    assert_eq!(outcomes[1].board.occupied(), 1);
    assert!(!manager.contains(id).await);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_does_not_fire_after_win() {
    let (manager, mut rx) = setup();
    let id = manager.create(seats(ALICE, BOB)).await.unwrap();
    for (actor, col) in [(ALICE, 0), (BOB, 6), (ALICE, 1), (BOB, 6), (ALICE, 2), (BOB, 6)] {
        manager.route(id, actor, drop_in(col)).await.unwrap();
    }
    manager.route(id, ALICE, drop_in(3)).await.unwrap();

    sleep(TIMEOUT * 3).await;

    let outcomes = relayed(&mut rx);
    assert_eq!(outcomes.len(), 7);
    assert!(matches!(
        outcomes[6].status,
        GameStatus::Won { winner: Color::Red, axis: Axis::Horizontal, .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_sessions_time_out_independently() {
    let (manager, mut rx) = setup();
    let quiet = manager.create(seats(ALICE, BOB)).await.unwrap();
    let busy = manager.create(seats(CAROL, DAVE)).await.unwrap();

    sleep(Duration::from_secs(20)).await;
    manager.route(busy, CAROL, drop_in(0)).await.unwrap();
    sleep(Duration::from_secs(11)).await;

    assert!(!manager.contains(quiet).await);
    assert!(manager.contains(busy).await);
    assert_eq!(manager.session_ids().await, vec![busy]);

    let timed_out: Vec<SessionId> = relayed(&mut rx)
        .into_iter()
        .filter(|o| matches!(o.status, GameStatus::TimedOut { .. }))
        .map(|o| o.session_id)
        .collect();
    assert_eq!(timed_out, vec![quiet]);

    let busy_board = manager.snapshot(busy).await.unwrap().board;
    assert_eq!(busy_board.get(0, 0), Some(Cell::Red));
}

// =========================================================================
// Concurrent input
// =========================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_route_concurrent_forfeits_end_game_once() {
    let (manager, mut rx) = setup();
    let id = manager.create(seats(ALICE, BOB)).await.unwrap();

    let mut tasks = Vec::new();
    for i in 0..20 {
        let manager = manager.clone();
        let actor = if i % 2 == 0 { ALICE } else { BOB };
        tasks.push(tokio::spawn(async move {
            manager.route(id, actor, InputEvent::Forfeit).await
        }));
    }
    let mut results = Vec::new();
    for task in tasks {
        results.push(task.await.unwrap());
    }

    let accepted: Vec<&Outcome> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(accepted.len(), 1, "exactly one forfeit wins the race");
    for result in &results {
        match result {
            Ok(outcome) => {
                assert!(matches!(outcome.status, GameStatus::Forfeited { .. }));
            }
            Err(SessionError::SessionTerminal(sid) | SessionError::SessionNotFound(sid)) => {
                assert_eq!(*sid, id);
            }
            Err(other) => panic!("unexpected rejection: {other}"),
        }
    }

    let forfeits = relayed(&mut rx)
        .into_iter()
        .filter(|o| matches!(o.status, GameStatus::Forfeited { .. }))
        .count();
    assert_eq!(forfeits, 1);
    assert!(!manager.contains(id).await);
    assert_eq!(manager.session_count().await, 0);
}

#[tokio::test]
async fn test_route_input_queued_behind_forfeit_is_terminal() {
    let (manager, mut rx) = setup();
    let id = manager.create(seats(ALICE, BOB)).await.unwrap();

    // On the current-thread runtime none of these tasks runs until the test
    // awaits, so all of them reach the actor's queue before it wakes. The
    // first one ends the game; the rest are answered from the closed queue.
    let first = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.route(id, ALICE, InputEvent::Forfeit).await })
    };
    let mut queued = Vec::new();
    for column in 0..4 {
        let manager = manager.clone();
        queued.push(tokio::spawn(async move {
            manager.route(id, BOB, drop_in(column)).await
        }));
    }

    let outcome = first.await.unwrap().unwrap();
    assert_eq!(outcome.status, GameStatus::Forfeited { forfeiter: Color::Red });
    for task in queued {
        assert_eq!(task.await.unwrap(), Err(SessionError::SessionTerminal(id)));
    }

    // Only the forfeit was relayed; nothing queued behind it touched the board.
    let outcomes = relayed(&mut rx);
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].board.occupied(), 0);

    // New input no longer reaches the session at all.
    assert_eq!(
        manager.route(id, BOB, drop_in(0)).await,
        Err(SessionError::SessionNotFound(id))
    );
    assert_eq!(
        manager.snapshot(id).await,
        Err(SessionError::SessionNotFound(id))
    );
}
