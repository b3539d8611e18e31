//! Integration tests for the turn clock.
//!
//! Uses `start_paused = true` so Tokio's clock only moves when the test
//! advances it (or when every task is idle and auto-advance kicks in).

use std::time::Duration;

use connect_four_clock::{TurnClock, DEFAULT_MOVE_TIMEOUT};

// =========================================================================
// Arming and state
// =========================================================================

#[test]
fn test_new_clock_is_disarmed() {
    let clock = TurnClock::new();
    assert!(!clock.is_armed());
    assert_eq!(clock.deadline(), None);
    assert_eq!(clock.remaining(), None);
    assert_eq!(clock.cycle(), 0);
}

#[test]
fn test_default_move_timeout_is_sixty_seconds() {
    assert_eq!(DEFAULT_MOVE_TIMEOUT, Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn test_arm_sets_deadline_and_cycle() {
    let mut clock = TurnClock::new();

    let cycle = clock.arm(Duration::from_secs(60));

    assert_eq!(cycle, 1);
    assert!(clock.is_armed());
    assert_eq!(clock.remaining(), Some(Duration::from_secs(60)));
}

#[tokio::test(start_paused = true)]
async fn test_remaining_counts_down() {
    let mut clock = TurnClock::new();
    clock.arm(Duration::from_secs(60));

    tokio::time::advance(Duration::from_secs(45)).await;

    assert_eq!(clock.remaining(), Some(Duration::from_secs(15)));
}

// =========================================================================
// Firing
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_fired_resolves_at_deadline_and_disarms() {
    let mut clock = TurnClock::new();
    let start = tokio::time::Instant::now();
    clock.arm(Duration::from_secs(60));

    let firing = clock.fired().await;

    assert_eq!(firing.cycle, 1);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(60) && elapsed < Duration::from_secs(61));
    assert!(!clock.is_armed(), "single-shot: fired clock disarms");
}

#[tokio::test(start_paused = true)]
async fn test_fired_only_once_per_arm() {
    let mut clock = TurnClock::new();
    clock.arm(Duration::from_millis(10));
    clock.fired().await;

    let second = tokio::time::timeout(Duration::from_secs(600), clock.fired()).await;

    assert!(second.is_err(), "a fired cycle must not fire again");
}

#[tokio::test(start_paused = true)]
async fn test_disarmed_clock_pends_forever() {
    let mut clock = TurnClock::new();
    let result = tokio::time::timeout(Duration::from_secs(3600), clock.fired()).await;
    assert!(result.is_err());
}

// =========================================================================
// Re-arming and cancellation
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_rearm_replaces_previous_deadline() {
    let mut clock = TurnClock::new();
    let start = tokio::time::Instant::now();
    clock.arm(Duration::from_secs(60));

    tokio::time::advance(Duration::from_secs(50)).await;
    let cycle = clock.arm(Duration::from_secs(60));

    let firing = clock.fired().await;

    assert_eq!(cycle, 2);
    assert_eq!(firing.cycle, 2);
    // 50 s before the re-arm plus a fresh 60 s, not the original 60 s.
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(110) && elapsed < Duration::from_secs(111));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_prevents_firing() {
    let mut clock = TurnClock::new();
    clock.arm(Duration::from_secs(1));

    assert!(clock.cancel());
    assert!(!clock.is_armed());

    let result = tokio::time::timeout(Duration::from_secs(10), clock.fired()).await;
    assert!(result.is_err(), "cancelled clock must not fire");
}

#[tokio::test(start_paused = true)]
async fn test_cancel_is_idempotent() {
    let mut clock = TurnClock::new();
    assert!(!clock.cancel(), "cancelling a disarmed clock is a no-op");

    clock.arm(Duration::from_millis(5));
    clock.fired().await;

    assert!(!clock.cancel(), "cancelling a fired clock is a no-op");
    assert!(!clock.cancel());
}

#[tokio::test(start_paused = true)]
async fn test_dropped_wait_leaves_deadline_pending() {
    let mut clock = TurnClock::new();
    clock.arm(Duration::from_secs(60));

    // Give up waiting halfway through; the deadline must survive.
    let early = tokio::time::timeout(Duration::from_secs(30), clock.fired()).await;
    assert!(early.is_err());
    assert!(clock.is_armed());

    let firing = clock.fired().await;
    assert_eq!(firing.cycle, 1);
}

#[tokio::test(start_paused = true)]
async fn test_select_with_input_before_deadline_rearms() {
    // Mirrors how a session actor uses the clock: a move arriving before
    // the deadline wins the select, re-arms, and the old deadline never
    // fires.
    let mut clock = TurnClock::new();
    clock.arm(Duration::from_secs(60));
    let (tx, mut rx) = tokio::sync::mpsc::channel::<()>(1);

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(59)).await;
        let _ = tx.send(()).await;
    });

    tokio::select! {
        _ = rx.recv() => { clock.arm(Duration::from_secs(60)); }
        _ = clock.fired() => panic!("deadline fired before the move"),
    }

    assert_eq!(clock.cycle(), 2);
    assert_eq!(clock.remaining(), Some(Duration::from_secs(60)));
}
