//! Stationary Gaussian noise injection.
//!
//! The generator is caller-owned: pass a seeded `StdRng` for reproducible
//! runs, or a fresh thread RNG when determinism does not matter. Nothing
//! in here touches a process-global entropy source, so concurrent callers
//! can partition generators however they like.

use crate::error::{SignalError, SignalResult};
use lib_trace::trace::{Trace, CHANNEL_COUNT};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Add zero-mean Gaussian noise with standard deviation `vrms` to one
/// channel.
///
/// `vrms` must be non-negative; `vrms == 0` returns the input unchanged,
/// bit for bit, without consuming entropy.
pub fn add_noise<R: Rng + ?Sized>(
    channel: &[f64],
    vrms: f64,
    rng: &mut R,
) -> SignalResult<Vec<f64>> {
    if !(vrms >= 0.0) {
        return Err(SignalError::InvalidRange(format!(
            "noise standard deviation must be non-negative, got {vrms}"
        )));
    }
    if vrms == 0.0 {
        return Ok(channel.to_vec());
    }

    let normal = Normal::new(0.0, vrms)
        .map_err(|e| SignalError::InvalidRange(format!("invalid noise amplitude: {e}")))?;

    Ok(channel.iter().map(|&v| v + normal.sample(rng)).collect())
}

/// Add independent Gaussian noise draws to every channel of a trace.
pub fn add_noise_trace<R: Rng + ?Sized>(
    trace: &Trace,
    vrms: f64,
    rng: &mut R,
) -> SignalResult<Trace> {
    let mut noisy: [Vec<f64>; CHANNEL_COUNT] = Default::default();
    for (channel, out) in trace.iter().zip(noisy.iter_mut()) {
        *out = add_noise(channel, vrms, rng)?;
    }
    Ok(Trace::new(noisy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_vrms_is_identity() {
        let mut rng = StdRng::seed_from_u64(1);
        let channel = vec![1.0, -2.5, 3.25, 0.0];

        let noisy = add_noise(&channel, 0.0, &mut rng).unwrap();
        assert_eq!(noisy, channel);
    }

    #[test]
    fn test_negative_vrms_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            add_noise(&[1.0, 2.0], -0.1, &mut rng),
            Err(SignalError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_length_preserved() {
        let mut rng = StdRng::seed_from_u64(2);
        let channel = vec![0.0; 500];

        let noisy = add_noise(&channel, 15.0, &mut rng).unwrap();
        assert_eq!(noisy.len(), 500);
    }

    #[test]
    fn test_seeded_runs_reproduce() {
        let channel = vec![0.5; 64];

        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);

        let a = add_noise(&channel, 2.0, &mut rng_a).unwrap();
        let b = add_noise(&channel, 2.0, &mut rng_b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_noise_statistics() {
        let mut rng = StdRng::seed_from_u64(3);
        let channel = vec![0.0; 20_000];
        let vrms = 15.0;

        let noisy = add_noise(&channel, vrms, &mut rng).unwrap();

        let mean: f64 = noisy.iter().sum::<f64>() / noisy.len() as f64;
        let var: f64 =
            noisy.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / noisy.len() as f64;

        // Loose statistical bounds: ~5 sigma for 20k samples
        assert!(mean.abs() < 0.6, "mean {mean}");
        assert!((var.sqrt() - vrms).abs() < 0.5, "std {}", var.sqrt());
    }

    #[test]
    fn test_trace_channels_get_independent_draws() {
        let mut rng = StdRng::seed_from_u64(4);
        let trace = Trace::zeros(128);

        let noisy = add_noise_trace(&trace, 1.0, &mut rng).unwrap();
        assert_ne!(noisy.channel(0), noisy.channel(1));
        assert_ne!(noisy.channel(1), noisy.channel(2));
    }
}
