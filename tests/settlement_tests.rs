//! Settlement Tests
//!
//! End-to-end bet placement against a real ReDB store:
//! - win / loss balance arithmetic
//! - draw == threshold edge case
//! - insufficient balance leaves no trace
//! - history ordering and cap
//! - concurrent bets never overdraw
//!
//! Run: cargo test --test settlement_tests


use threshold_bet::{payout_multiplier, GameError};
use test_helpers::{bet, create_test_engine, STARTING_BALANCE};

// ============================================================================
// BALANCE ARITHMETIC
// ============================================================================

#[test]
fn test_win_credits_amount_times_multiplier() {
    let (_dir, engine) = create_test_engine(vec![7_000]);
    engine.open_account("alice").unwrap();

    let receipt = engine.place_bet("alice", &bet(100.0, 5_000, true)).unwrap();
    let multiplier = payout_multiplier(5_000.0);

    assert!((multiplier - 2.0008).abs() < 1e-4);
    assert!(receipt.bet.won);
    assert_eq!(receipt.bet.payout, 100.0 * multiplier);
    assert_eq!(receipt.new_balance, STARTING_BALANCE - 100.0 + 100.0 * multiplier);
    assert_eq!(receipt.bet.game_id, receipt.game.id);
    assert_eq!(receipt.bet.threshold, 5_000);
    assert!(receipt.bet.is_above);
}

#[test]
fn test_loss_debits_amount_only() {
    let (_dir, engine) = create_test_engine(vec![6_000]);
    engine.open_account("alice").unwrap();

    let receipt = engine.place_bet("alice", &bet(100.0, 5_000, false)).unwrap();

    assert!(!receipt.bet.won);
    assert_eq!(receipt.bet.payout, 0.0);
    assert_eq!(receipt.new_balance, STARTING_BALANCE - 100.0);
}

#[test]
fn test_edge_thresholds() {
    // Threshold 0 betting below can never win; threshold 9999 above can never win
    let (_dir, engine) = create_test_engine(vec![0, 9_999]);
    engine.open_account("alice").unwrap();

    let low = engine.place_bet("alice", &bet(10.0, 0, false)).unwrap();
    let high = engine.place_bet("alice", &bet(10.0, 9_999, true)).unwrap();

    assert!(!low.bet.won);
    assert!(!high.bet.won);
    assert_eq!(high.new_balance, STARTING_BALANCE - 20.0);
}

#[test]
fn test_draw_equal_to_threshold_always_loses() {
    for is_above in [true, false] {
        let (_dir, engine) = create_test_engine(vec![2_500]);
        engine.open_account("alice").unwrap();
        let receipt = engine.place_bet("alice", &bet(10.0, 2_500, is_above)).unwrap();
        assert!(!receipt.bet.won, "is_above={}", is_above);
    }
}

// ============================================================================
// REJECTIONS
// ============================================================================

#[test]
fn test_insufficient_balance_scenario() {
    let (_dir, engine) = create_test_engine(vec![9_000]);
    engine.store().create_user("bob", 50.0).unwrap();

    let result = engine.place_bet("bob", &bet(100.0, 5_000, true));

    assert!(matches!(result, Err(GameError::InsufficientBalance { .. })));
    assert_eq!(engine.user_balance("bob").unwrap(), 50.0);
    assert!(engine.bet_history("bob").unwrap().is_empty());

    let stats = engine.store().stats().unwrap();
    assert_eq!(stats.games, 0);
    assert_eq!(stats.bets, 0);
}

#[test]
fn test_unknown_user_not_found() {
    let (_dir, engine) = create_test_engine(vec![0]);

    assert!(matches!(engine.user_balance("ghost"), Err(GameError::NotFound(_))));
    assert!(matches!(
        engine.place_bet("ghost", &bet(1.0, 100, true)),
        Err(GameError::NotFound(_))
    ));
}

// ============================================================================
// HISTORY
// ============================================================================

#[test]
fn test_history_newest_first_with_game_numbers() {
    let draws: Vec<u32> = (1..=15).map(|n| n * 100).collect();
    let (_dir, engine) = create_test_engine(draws);
    engine.open_account("alice").unwrap();
    engine.open_account("bob").unwrap();

    for i in 0..15 {
        let user = if i % 5 == 4 { "bob" } else { "alice" };
        engine.place_bet(user, &bet(1.0, 5_000, true)).unwrap();
    }

    let history = engine.bet_history("alice").unwrap();
    assert_eq!(history.len(), 10);
    assert!(history.iter().all(|h| h.bet.user_id == "alice"));
    assert!(history.iter().all(|h| h.bet.game_id == h.game.id));
    assert!(history.windows(2).all(|w| w[0].bet.id > w[1].bet.id));
    // Last alice bet was the 14th draw
    assert_eq!(history[0].game.number, 1_400);

    assert_eq!(engine.bet_history("bob").unwrap().len(), 3);
}

// ============================================================================
// CONCURRENCY
// ============================================================================

#[test]
fn test_concurrent_bets_never_overdraw() {
    // Draw 0 with "above 9999" always loses, so each bet costs exactly 10
    let (_dir, engine) = create_test_engine(vec![0]);
    engine.store().create_user("alice", 100.0).unwrap();

    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..20)
            .map(|_| {
                let engine = engine.clone();
                s.spawn(move || engine.place_bet("alice", &bet(10.0, 9_999, true)))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let accepted = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(GameError::InsufficientBalance { .. })))
        .count();

    assert_eq!(accepted, 10);
    assert_eq!(rejected, 10);
    assert_eq!(engine.user_balance("alice").unwrap(), 0.0);
    assert_eq!(engine.store().stats().unwrap().bets, 10);
}

#[test]
fn test_concurrent_wins_all_recorded() {
    // Draw 0 with "below 9999" always wins at 10x
    let (_dir, engine) = create_test_engine(vec![0]);
    engine.store().create_user("alice", 100.0).unwrap();

    std::thread::scope(|s| {
        for _ in 0..8 {
            let engine = engine.clone();
            s.spawn(move || engine.place_bet("alice", &bet(5.0, 9_999, false)).unwrap());
        }
    });

    let expected = 100.0 + 8.0 * (5.0 * payout_multiplier(9_999.0) - 5.0);
    assert!((engine.user_balance("alice").unwrap() - expected).abs() < 1e-9);
    assert_eq!(engine.bet_history("alice").unwrap().len(), 8);
}
