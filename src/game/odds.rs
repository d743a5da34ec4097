//! Odds - Threshold → Multiplier / Win Probability
//!
//! The payout curve is linear in the distance from the midpoint of the draw
//! range: a threshold at the midpoint pays 2x, a threshold at either edge
//! pays 10x. It is NOT a fair-odds (1 / probability) curve, so expected value
//! varies across thresholds.

use super::types::BetQuote;
use super::{GameError, GameResult};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Highest selectable threshold (and highest possible draw)
pub const MAX_THRESHOLD: u32 = 9_999;

/// Size of the draw range: draws are integers in `0..DRAW_RANGE`
pub const DRAW_RANGE: u32 = 10_000;

/// Center of the draw range
pub const MIDPOINT: f64 = 4_999.5;

/// Payout multiplier at the midpoint
pub const MIN_MULTIPLIER: f64 = 2.0;

/// Payout multiplier at either edge
pub const MAX_MULTIPLIER: f64 = 10.0;

// ============================================================================
// CURVES
// ============================================================================

/// Payout multiplier for a threshold, in `[2, 10]`.
///
/// Takes `f64` so the midpoint itself (4999.5) can be evaluated.
pub fn payout_multiplier(threshold: f64) -> f64 {
    let distance = (threshold - MIDPOINT).abs();
    let normalized = distance / MIDPOINT;
    MIN_MULTIPLIER + normalized * (MAX_MULTIPLIER - MIN_MULTIPLIER)
}

/// Win probability for a threshold as a `[0, 1]` fraction.
///
/// Above the midpoint the figure is the chance of drawing above the threshold,
/// otherwise the chance of drawing below it.
pub fn win_probability(threshold: f64) -> f64 {
    if threshold > MIDPOINT {
        (MAX_THRESHOLD as f64 - threshold) / DRAW_RANGE as f64
    } else {
        threshold / DRAW_RANGE as f64
    }
}

/// Settle a draw against a threshold. A draw equal to the threshold loses in
/// both directions.
#[inline]
pub fn is_winning_draw(number: u32, threshold: u32, is_above: bool) -> bool {
    if is_above {
        number > threshold
    } else {
        number < threshold
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Validate a raw threshold coming off the wire
pub fn validate_threshold(threshold: i64) -> GameResult<u32> {
    if !(0..=MAX_THRESHOLD as i64).contains(&threshold) {
        return Err(GameError::InvalidInput(format!(
            "threshold must be between 0 and {}, got {}",
            MAX_THRESHOLD, threshold
        )));
    }
    Ok(threshold as u32)
}

/// Validate a wager amount (positive and finite)
pub fn validate_amount(amount: f64) -> GameResult<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(GameError::InvalidInput(format!(
            "amount must be a positive number, got {}",
            amount
        )));
    }
    Ok(amount)
}

// ============================================================================
// QUOTE
// ============================================================================

/// Preview what a bet would pay before placing it
pub fn quote(amount: f64, threshold: i64) -> GameResult<BetQuote> {
    let amount = validate_amount(amount)?;
    let threshold = validate_threshold(threshold)?;

    let multiplier = payout_multiplier(threshold as f64);
    let probability = win_probability(threshold as f64);

    Ok(BetQuote {
        amount,
        threshold,
        multiplier,
        win_probability: probability,
        win_probability_pct: probability * 100.0,
        potential_payout: amount * multiplier,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_multiplier_bounds() {
        for t in 0..=MAX_THRESHOLD {
            let m = payout_multiplier(t as f64);
            assert!(m >= MIN_MULTIPLIER - EPS && m <= MAX_MULTIPLIER + EPS, "t={} m={}", t, m);
        }
    }

    #[test]
    fn test_multiplier_extremes() {
        assert!((payout_multiplier(MIDPOINT) - 2.0).abs() < EPS);
        assert!((payout_multiplier(0.0) - 10.0).abs() < EPS);
        assert!((payout_multiplier(9_999.0) - 10.0).abs() < EPS);
    }

    #[test]
    fn test_multiplier_symmetric() {
        for d in [0.5, 1.5, 100.5, 2_500.0, 4_999.5] {
            let low = payout_multiplier(MIDPOINT - d);
            let high = payout_multiplier(MIDPOINT + d);
            assert!((low - high).abs() < EPS, "d={}", d);
        }
    }

    #[test]
    fn test_multiplier_near_midpoint() {
        // 5000 is half a step above the midpoint
        let m = payout_multiplier(5_000.0);
        assert!((m - 2.0008).abs() < 1e-4);
    }

    #[test]
    fn test_win_probability_low_branch() {
        assert_eq!(win_probability(0.0), 0.0);
        assert!((win_probability(2_500.0) - 0.25).abs() < EPS);
        assert!((win_probability(4_999.0) - 0.4999).abs() < EPS);
    }

    #[test]
    fn test_win_probability_high_branch() {
        assert_eq!(win_probability(9_999.0), 0.0);
        assert!((win_probability(7_499.0) - 0.25).abs() < EPS);
        assert!((win_probability(5_000.0) - 0.4999).abs() < EPS);
    }

    #[test]
    fn test_win_probability_mirrored_thresholds() {
        // t and 9999 - t land on opposite branches and agree
        for t in [1.0, 1_000.0, 4_000.0, 4_999.0] {
            let p = win_probability(t);
            let q = win_probability(9_999.0 - t);
            assert!((p - q).abs() < EPS, "t={}", t);
        }
    }

    #[test]
    fn test_equal_draw_always_loses() {
        assert!(!is_winning_draw(4_242, 4_242, true));
        assert!(!is_winning_draw(4_242, 4_242, false));
        assert!(is_winning_draw(4_243, 4_242, true));
        assert!(is_winning_draw(4_241, 4_242, false));
    }

    #[test]
    fn test_validation() {
        assert!(validate_threshold(-1).is_err());
        assert!(validate_threshold(10_000).is_err());
        assert_eq!(validate_threshold(9_999).unwrap(), 9_999);
        assert!(validate_amount(0.0).is_err());
        assert!(validate_amount(-5.0).is_err());
        assert!(validate_amount(f64::NAN).is_err());
        assert!(validate_amount(f64::INFINITY).is_err());
        assert_eq!(validate_amount(12.5).unwrap(), 12.5);
    }

    #[test]
    fn test_quote() {
        let q = quote(100.0, 5_000).unwrap();
        assert_eq!(q.threshold, 5_000);
        assert!((q.potential_payout - 200.08).abs() < 1e-2);
        assert!((q.win_probability_pct - 49.99).abs() < 1e-9);

        assert!(matches!(quote(100.0, 12_000), Err(GameError::InvalidInput(_))));
    }
}
