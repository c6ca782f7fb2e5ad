//! Random variates for the Fixation gaze simulation.
//!
//! Every sampler takes the generator explicitly (`&mut impl Rng`) so that
//! callers decide whether randomness is shared or per-instance, and tests can
//! inject a seeded [`rand::rngs::SmallRng`].
//!
//! # Samplers
//!
//! - [`gaussian`] -- Box--Muller normal variate.
//! - [`clamped_gaussian`] -- normal variate clamped to `[lo, hi]`.
//! - [`mu_clamped_gaussian`] -- normal variate clamped to `mean +/- mu * std_dev`.
//! - [`log_normal_from_mean_std`] -- strictly positive variate with the given
//!   arithmetic mean and standard deviation. Used for every interval and speed.
//! - [`uniform_signed`] -- uniform variate in `[-1, 1)`.

use std::f32::consts::TAU;

use rand::Rng;

/// Draw a uniform variate in `[-1, 1)`.
pub fn uniform_signed(rng: &mut impl Rng) -> f32 {
    rng.random_range(-1.0_f32..1.0_f32)
}

/// Draw a normal variate with the given mean and standard deviation.
///
/// Uses the Box--Muller transform over two independent uniform draws. The
/// first draw is taken from `(0, 1]` so the logarithm is always finite.
pub fn gaussian(mean: f32, std_dev: f32, rng: &mut impl Rng) -> f32 {
    let u1 = 1.0 - rng.random::<f32>();
    let u2 = rng.random::<f32>();
    let standard = (-2.0 * u1.ln()).sqrt() * (TAU * u2).sin();
    std_dev.mul_add(standard, mean)
}

/// Draw a normal variate and clamp it into `[lo, hi]`.
///
/// If `lo > hi` the upper bound wins, matching `max(lo).min(hi)`; the
/// function never panics on inverted bounds.
pub fn clamped_gaussian(mean: f32, std_dev: f32, lo: f32, hi: f32, rng: &mut impl Rng) -> f32 {
    gaussian(mean, std_dev, rng).max(lo).min(hi)
}

/// Draw a normal variate clamped to `mu` standard deviations around the mean.
///
/// A `mu` of 3 keeps the tails from producing a wild outlier while leaving
/// 99.7% of the distribution untouched.
pub fn mu_clamped_gaussian(mean: f32, std_dev: f32, mu: f32, rng: &mut impl Rng) -> f32 {
    let spread = (mu * std_dev).abs();
    clamped_gaussian(mean, std_dev, mean - spread, mean + spread, rng)
}

/// Underlying normal parameters `(mu, sigma)` of a log-normal distribution
/// with the given arithmetic mean and standard deviation.
///
/// ```text
/// v     = ln(1 + std^2 / mean^2)
/// mu    = ln(mean) - v / 2
/// sigma = sqrt(v)
/// ```
///
/// `mean` must be positive.
pub fn log_normal_params(mean: f32, std_dev: f32) -> (f32, f32) {
    let ratio = std_dev / mean;
    let variance = ratio.mul_add(ratio, 1.0).ln();
    let mu = mean.ln() - variance / 2.0;
    (mu, variance.sqrt())
}

/// Draw a log-normal variate with the given arithmetic mean and standard deviation.
///
/// The result is strictly positive for any positive `mean`, which is why every
/// interval and speed in the simulation is drawn from here instead of from a
/// plain Gaussian. A zero `std_dev` returns `mean` (up to float error).
///
/// `mean` must be positive; configuration validation guarantees this for all
/// simulation parameters.
pub fn log_normal_from_mean_std(mean: f32, std_dev: f32, rng: &mut impl Rng) -> f32 {
    let (mu, sigma) = log_normal_params(mean, std_dev);
    gaussian(mu, sigma, rng).exp()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
