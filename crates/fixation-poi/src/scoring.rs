//! Host-specific candidate scoring.
//!
//! A scorer multiplies each candidate's weight during selection. It receives
//! the base pose, the candidate position, and the previous target's position
//! (if there was one).

use glam::Vec3;

use crate::pose::BasePose;

/// Pluggable per-candidate score. Negative results are treated as zero.
pub type TargetScorer = Box<dyn Fn(&BasePose, Vec3, Option<Vec3>) -> f32 + Send + Sync>;

/// Scorer that leaves every weight unchanged.
pub fn constant_score() -> TargetScorer {
    Box::new(|_, _, _| 1.0)
}

/// Scorer that halves a candidate's weight at `half_distance` from the base
/// and keeps falling off with the square of the distance beyond it.
pub fn distance_falloff(half_distance: f32) -> TargetScorer {
    let half_sq = half_distance * half_distance;
    Box::new(move |base, position, _| {
        if half_sq <= 0.0 {
            return 1.0;
        }
        let distance_sq = base.position.distance_squared(position);
        half_sq / (half_sq + distance_sq)
    })
}

/// Scorer that multiplies the weight of candidates within `radius` of the
/// previous target by `bonus`.
pub fn continuity_bonus(radius: f32, bonus: f32) -> TargetScorer {
    let radius_sq = radius * radius;
    Box::new(move |_, position, previous| match previous {
        Some(previous) if previous.distance_squared(position) <= radius_sq => bonus,
        _ => 1.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    #[test]
    fn constant_is_one() {
        let scorer = constant_score();
        let score = scorer(&BasePose::IDENTITY, Vec3::splat(9.0), None);
        assert!((score - 1.0).abs() < EPS);
    }

    #[test]
    fn falloff_halves_at_half_distance() {
        let scorer = distance_falloff(2.0);
        let base = BasePose::IDENTITY;
        assert!((scorer(&base, Vec3::ZERO, None) - 1.0).abs() < EPS);
        assert!((scorer(&base, Vec3::new(0.0, 2.0, 0.0), None) - 0.5).abs() < EPS);
        assert!(scorer(&base, Vec3::new(0.0, 8.0, 0.0), None) < 0.1);
    }

    #[test]
    fn falloff_with_zero_distance_is_neutral() {
        let scorer = distance_falloff(0.0);
        assert!((scorer(&BasePose::IDENTITY, Vec3::ONE, None) - 1.0).abs() < EPS);
    }

    #[test]
    fn continuity_rewards_nearby_candidates() {
        let scorer = continuity_bonus(0.5, 3.0);
        let base = BasePose::IDENTITY;
        assert!((scorer(&base, Vec3::ONE, Some(Vec3::ONE)) - 3.0).abs() < EPS);
        assert!((scorer(&base, Vec3::ONE, Some(Vec3::ZERO)) - 1.0).abs() < EPS);
        assert!((scorer(&base, Vec3::ONE, None) - 1.0).abs() < EPS);
    }
}
