//! The two stochastic decisions behind a gaze transfer.
//!
//! [`should_transfer`] decides *whether* to look away from the current
//! target; [`pick_weighted`] decides *where* to look next.

use rand::Rng;

use fixation_random::gaussian;

/// Standard deviation of the log-space noise in the transfer test.
pub const TRANSFER_LOG_STD_DEV: f32 = 0.4;

/// Whether a character that has stared at a target of `weight` for
/// `stare_time` seconds should look elsewhere.
///
/// With `x = stare_time / weight` and `r = exp(N(0, 0.4))`, transfer happens
/// iff `r < x`. The probability rises with stare time and is 50% when the
/// stare time equals the weight. A zero weight always transfers.
pub fn should_transfer(stare_time: f32, weight: f32, rng: &mut impl Rng) -> bool {
    if weight <= 0.0 {
        return true;
    }
    let x = stare_time / weight;
    let r = gaussian(0.0, TRANSFER_LOG_STD_DEV, rng).exp();
    r < x
}

/// Cumulative-sum weighted pick.
///
/// Draws uniformly from `[0, total)` and returns the first item whose prefix
/// sum exceeds the draw. Non-positive weights never win. Returns `None` when
/// the total weight is not a positive finite number.
pub fn pick_weighted<T: Copy>(candidates: &[(T, f32)], rng: &mut impl Rng) -> Option<T> {
    let total: f32 = candidates.iter().map(|&(_, w)| w.max(0.0)).sum();
    if total <= 0.0 || !total.is_finite() {
        return None;
    }
    let draw = rng.random_range(0.0..total);
    let mut cumulative = 0.0_f32;
    for &(item, weight) in candidates {
        cumulative += weight.max(0.0);
        if cumulative > draw {
            return Some(item);
        }
    }
    // Float rounding can leave the draw just above the final prefix sum.
    candidates
        .iter()
        .rev()
        .find(|&&(_, w)| w > 0.0)
        .map(|&(item, _)| item)
}
