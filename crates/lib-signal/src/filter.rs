//! Butterworth band-pass filter design and causal application.
//!
//! The designer follows the classical digital IIR chain: analog lowpass
//! prototype poles, frequency pre-warping, lowpass-to-bandpass (or
//! lowpass-to-lowpass) transformation in zpk form, bilinear transform,
//! and finally expansion to transfer-function `(b, a)` coefficients.
//! Application is causal direct form II transposed, so the output carries
//! the phase lag of a real-time filter; there is no zero-phase pass.
//!
//! Coefficients are recomputed on every invocation - the design is cheap
//! next to the filtering itself and caching would add shared state.

use crate::error::{SignalError, SignalResult};
use lib_trace::trace::{TimeAxis, Trace, CHANNEL_COUNT};
use lib_trace::units::Hertz;
use num_complex::Complex64;
use std::f64::consts::PI;

/// Band-pass filter order used for trace conditioning.
pub const BANDPASS_ORDER: usize = 5;

/// Twice the normalized sample rate used by the bilinear transform
/// (cutoffs are expressed as fractions of Nyquist, i.e. fs = 2).
const FS2: f64 = 4.0;

/// Transfer-function coefficients of a designed IIR filter.
///
/// `b` is the numerator, `a` the denominator, both in descending powers
/// of `z` with `a[0] == 1`. Ephemeral: recomputed per call, never cached.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterCoefficients {
    pub b: Vec<f64>,
    pub a: Vec<f64>,
}

/// Analog Butterworth lowpass prototype poles (cutoff 1 rad/s).
///
/// Poles are evenly distributed on the left half of the unit circle:
/// `s_k = exp(j * pi * (2k + n + 1) / (2n))`.
fn butter_poles(order: usize) -> Vec<Complex64> {
    (0..order)
        .map(|k| {
            let angle = PI * (2 * k + order + 1) as f64 / (2 * order) as f64;
            Complex64::from_polar(1.0, angle)
        })
        .collect()
}

/// Pre-warp a normalized digital cutoff onto the analog frequency axis.
#[inline]
fn prewarp(w: f64) -> f64 {
    FS2 * (PI * w / 2.0).tan()
}

/// Expand a set of roots into polynomial coefficients (descending powers).
fn poly(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &root in roots {
        let mut next = vec![Complex64::new(0.0, 0.0); coeffs.len() + 1];
        for (i, &c) in coeffs.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c * root;
        }
        coeffs = next;
    }
    coeffs
}

/// Map analog zeros/poles/gain to the digital plane via the bilinear
/// transform, appending the zeros at `z = -1` that absorb the degree
/// difference.
fn bilinear(
    zeros: &[Complex64],
    poles: &[Complex64],
    gain: f64,
) -> (Vec<Complex64>, Vec<Complex64>, f64) {
    let one = Complex64::new(1.0, 0.0);

    let mut z_digital: Vec<Complex64> = zeros.iter().map(|&z| (FS2 + z) / (FS2 - z)).collect();
    let p_digital: Vec<Complex64> = poles.iter().map(|&p| (FS2 + p) / (FS2 - p)).collect();

    let num = zeros.iter().fold(one, |acc, &z| acc * (FS2 - z));
    let den = poles.iter().fold(one, |acc, &p| acc * (FS2 - p));
    let gain_digital = gain * (num / den).re;

    z_digital.extend(
        std::iter::repeat(Complex64::new(-1.0, 0.0)).take(poles.len() - zeros.len()),
    );

    (z_digital, p_digital, gain_digital)
}

/// Expand digital zeros/poles/gain into real `(b, a)` coefficients.
///
/// Roots come in conjugate pairs, so the imaginary parts of the expanded
/// polynomials cancel to roundoff; a coefficient set that does not come
/// out finite means the design collapsed numerically.
fn zpk_to_tf(
    zeros: &[Complex64],
    poles: &[Complex64],
    gain: f64,
) -> SignalResult<FilterCoefficients> {
    let b: Vec<f64> = poly(zeros).iter().map(|&c| (c * gain).re).collect();
    let a: Vec<f64> = poly(poles).iter().map(|&c| c.re).collect();

    if b.iter().chain(a.iter()).any(|c| !c.is_finite()) {
        return Err(SignalError::DesignFailure(
            "non-finite filter coefficients, cutoffs too close together or too close to the band edges"
                .into(),
        ));
    }

    Ok(FilterCoefficients { b, a })
}

/// Design a digital Butterworth band-pass filter.
///
/// `low` and `high` are cutoffs normalized by the Nyquist frequency and
/// must satisfy `0 < low < high < 1`.
pub fn design_bandpass(order: usize, low: f64, high: f64) -> SignalResult<FilterCoefficients> {
    if !(low > 0.0 && high < 1.0 && low < high) {
        return Err(SignalError::InvalidRange(format!(
            "normalized band-pass cutoffs must satisfy 0 < low < high < 1, got ({low}, {high})"
        )));
    }

    let warped_low = prewarp(low);
    let warped_high = prewarp(high);
    let wo = (warped_low * warped_high).sqrt();
    let bw = warped_high - warped_low;

    // Lowpass-to-bandpass: each prototype pole splits into a pair, and
    // `order` zeros land at the origin.
    let mut poles = Vec::with_capacity(2 * order);
    for p in butter_poles(order) {
        let shifted = p * (bw / 2.0);
        let disc = (shifted * shifted - wo * wo).sqrt();
        poles.push(shifted + disc);
        poles.push(shifted - disc);
    }
    let zeros = vec![Complex64::new(0.0, 0.0); order];
    let gain = bw.powi(order as i32);

    let (z_digital, p_digital, gain_digital) = bilinear(&zeros, &poles, gain);
    let coeffs = zpk_to_tf(&z_digital, &p_digital, gain_digital)?;

    tracing::debug!(
        order,
        low,
        high,
        taps = coeffs.b.len(),
        "designed band-pass filter"
    );

    Ok(coeffs)
}

/// Design a digital Butterworth lowpass filter.
///
/// `cutoff` is normalized by the Nyquist frequency, `0 < cutoff < 1`.
/// Used by the resampler's decimation path as the anti-aliasing filter.
pub fn design_lowpass(order: usize, cutoff: f64) -> SignalResult<FilterCoefficients> {
    if !(cutoff > 0.0 && cutoff < 1.0) {
        return Err(SignalError::InvalidRange(format!(
            "normalized lowpass cutoff must lie in (0, 1), got {cutoff}"
        )));
    }

    let warped = prewarp(cutoff);
    let poles: Vec<Complex64> = butter_poles(order).iter().map(|&p| p * warped).collect();
    let gain = warped.powi(order as i32);

    let (z_digital, p_digital, gain_digital) = bilinear(&[], &poles, gain);
    zpk_to_tf(&z_digital, &p_digital, gain_digital)
}

/// Apply an IIR filter causally (direct form II transposed, zero initial
/// state).
pub fn lfilter(coeffs: &FilterCoefficients, x: &[f64]) -> SignalResult<Vec<f64>> {
    if coeffs.b.is_empty() || coeffs.a.is_empty() {
        return Err(SignalError::DesignFailure("empty coefficient set".into()));
    }

    let a0 = coeffs.a[0];
    if a0.abs() < 1e-30 {
        return Err(SignalError::DesignFailure(
            "leading denominator coefficient is zero".into(),
        ));
    }

    let nfilt = coeffs.b.len().max(coeffs.a.len());
    let b: Vec<f64> = (0..nfilt)
        .map(|i| coeffs.b.get(i).copied().unwrap_or(0.0) / a0)
        .collect();
    let a: Vec<f64> = (0..nfilt)
        .map(|i| coeffs.a.get(i).copied().unwrap_or(0.0) / a0)
        .collect();

    let mut state = vec![0.0; nfilt - 1];
    let mut y = Vec::with_capacity(x.len());

    for &xi in x {
        let yi = b[0] * xi + state.first().copied().unwrap_or(0.0);
        let last = state.len().saturating_sub(1);
        for j in 0..last {
            state[j] = b[j + 1] * xi + state[j + 1] - a[j + 1] * yi;
        }
        if let Some(tail) = state.last_mut() {
            *tail = b[nfilt - 1] * xi - a[nfilt - 1] * yi;
        }
        y.push(yi);
    }

    Ok(y)
}

/// Evaluate the filter's complex response at a normalized frequency
/// (`w` in `[0, 1]`, Nyquist = 1).
pub fn frequency_response(coeffs: &FilterCoefficients, w: f64) -> Complex64 {
    let z_inv = Complex64::from_polar(1.0, -PI * w);

    let eval = |c: &[f64]| {
        let mut acc = Complex64::new(0.0, 0.0);
        let mut z_pow = Complex64::new(1.0, 0.0);
        for &ck in c {
            acc += ck * z_pow;
            z_pow *= z_inv;
        }
        acc
    };

    eval(&coeffs.b) / eval(&coeffs.a)
}

/// Band-pass filter a trace between `fr_min` and `fr_max`.
///
/// The sampling rate is derived from the axis step (nanoseconds converted
/// to seconds); cutoffs are normalized by the Nyquist frequency and must
/// land strictly inside `(0, 1)`. An order-5 Butterworth band-pass is
/// designed and applied causally to each channel independently, so the
/// output has the same shape as the input but carries the characteristic
/// phase lag of causal IIR filtering.
pub fn bandpass_filter(
    time: &TimeAxis,
    trace: &Trace,
    fr_min: Hertz,
    fr_max: Hertz,
) -> SignalResult<Trace> {
    if trace.is_empty() {
        return Err(SignalError::EmptyTrace);
    }
    if time.len() != trace.len() {
        return Err(SignalError::ShapeMismatch {
            expected: time.len(),
            actual: trace.len(),
        });
    }

    let nyquist = time.nyquist();
    let low = fr_min / nyquist;
    let high = fr_max / nyquist;
    let coeffs = design_bandpass(BANDPASS_ORDER, low, high)?;

    let mut filtered: [Vec<f64>; CHANNEL_COUNT] = Default::default();
    for (channel, out) in trace.iter().zip(filtered.iter_mut()) {
        *out = lfilter(&coeffs, channel)?;
    }

    Ok(Trace::new(filtered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_trace::units::Nanoseconds;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn two_tone_trace(len: usize) -> Trace {
        let make = |f1: f64, f2: f64| {
            (0..len)
                .map(|i| {
                    let t = i as f64;
                    (2.0 * PI * f1 * t).sin() + 0.5 * (2.0 * PI * f2 * t).cos()
                })
                .collect()
        };
        Trace::new([make(0.02, 0.11), make(0.05, 0.23), make(0.08, 0.31)])
    }

    #[test]
    fn test_bandpass_rejects_invalid_cutoffs() {
        assert!(matches!(
            design_bandpass(5, 0.3, 0.1),
            Err(SignalError::InvalidRange(_))
        ));
        assert!(matches!(
            design_bandpass(5, 0.0, 0.5),
            Err(SignalError::InvalidRange(_))
        ));
        assert!(matches!(
            design_bandpass(5, 0.2, 1.0),
            Err(SignalError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_bandpass_coefficient_shape() {
        let coeffs = design_bandpass(5, 0.05, 0.15).unwrap();

        // Order-5 band-pass -> 10th order transfer function
        assert_eq!(coeffs.b.len(), 11);
        assert_eq!(coeffs.a.len(), 11);
        assert!((coeffs.a[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bandpass_nulls_at_dc_and_nyquist() {
        let coeffs = design_bandpass(5, 0.05, 0.15).unwrap();

        // Zeros at z = 1 and z = -1: coefficient sums cancel exactly
        let sum: f64 = coeffs.b.iter().sum();
        let alt_sum: f64 = coeffs
            .b
            .iter()
            .enumerate()
            .map(|(i, &c)| if i % 2 == 0 { c } else { -c })
            .sum();
        assert!(sum.abs() < 1e-12);
        assert!(alt_sum.abs() < 1e-12);
    }

    #[test]
    fn test_bandpass_response_shape() {
        let (low, high) = (0.05, 0.15);
        let coeffs = design_bandpass(5, low, high).unwrap();

        // Unit gain at the (warped) geometric band center
        let wo = (prewarp(low) * prewarp(high)).sqrt();
        let w_center = 2.0 * (wo / FS2).atan() / PI;
        let center_gain = frequency_response(&coeffs, w_center).norm();
        assert!(
            (center_gain - 1.0).abs() < 1e-6,
            "center gain {center_gain}"
        );

        // Butterworth band edges sit exactly at -3 dB
        let edge = frequency_response(&coeffs, low).norm();
        assert!((edge - 1.0 / 2.0_f64.sqrt()).abs() < 1e-6, "edge gain {edge}");

        // Deep in the stopband the response is strongly attenuated
        assert!(frequency_response(&coeffs, 0.6).norm() < 1e-3);
    }

    #[test]
    fn test_lowpass_unity_dc_gain() {
        let coeffs = design_lowpass(8, 0.2).unwrap();
        let dc = frequency_response(&coeffs, 0.0).norm();
        assert!((dc - 1.0).abs() < 1e-9, "dc gain {dc}");
    }

    #[test]
    fn test_filter_stability_random_passbands() {
        let mut rng = StdRng::seed_from_u64(7);
        let time = TimeAxis::from_step(0.0, Nanoseconds(1.0), 256);
        let trace = two_tone_trace(256);
        let nyquist = time.nyquist();

        for _ in 0..10 {
            let low: f64 = rng.gen_range(0.05..0.5);
            let width: f64 = rng.gen_range(0.05..0.35);
            let high = (low + width).min(0.95);

            let filtered =
                bandpass_filter(&time, &trace, nyquist * low, nyquist * high).unwrap();

            assert_eq!(filtered.len(), trace.len());
            assert!(
                filtered.iter().flatten().all(|v| v.is_finite()),
                "non-finite output for band ({low}, {high})"
            );
        }
    }

    #[test]
    fn test_passband_tone_preserved() {
        // 1024 samples at 1 ns; tone at 125 MHz inside a 50-200 MHz band
        let len = 1024;
        let time = TimeAxis::from_step(0.0, Nanoseconds(1.0), len);
        let tone: Vec<f64> = (0..len)
            .map(|i| (2.0 * PI * 0.125e9 * (i as f64 * 1e-9)).sin())
            .collect();
        let trace = Trace::new([tone, vec![0.0; len], vec![0.0; len]]);

        let filtered =
            bandpass_filter(&time, &trace, Hertz(50e6), Hertz(200e6)).unwrap();

        // Steady-state amplitude close to the input's
        let tail = &filtered.channel(0)[len / 2..];
        let peak = tail.iter().map(|v| v.abs()).fold(0.0, f64::max);
        assert!((peak - 1.0).abs() < 0.05, "steady-state peak {peak}");
    }

    #[test]
    fn test_stopband_tone_rejected() {
        let len = 1024;
        let time = TimeAxis::from_step(0.0, Nanoseconds(1.0), len);
        // 400 MHz tone, band 50-150 MHz
        let tone: Vec<f64> = (0..len)
            .map(|i| (2.0 * PI * 0.4e9 * (i as f64 * 1e-9)).sin())
            .collect();
        let trace = Trace::new([tone, vec![0.0; len], vec![0.0; len]]);

        let filtered =
            bandpass_filter(&time, &trace, Hertz(50e6), Hertz(150e6)).unwrap();

        let tail = &filtered.channel(0)[len / 2..];
        let peak = tail.iter().map(|v| v.abs()).fold(0.0, f64::max);
        assert!(peak < 0.01, "stopband leak {peak}");
    }

    #[test]
    fn test_shape_mismatch_detected() {
        let time = TimeAxis::from_step(0.0, Nanoseconds(1.0), 64);
        let trace = Trace::zeros(32);

        assert!(matches!(
            bandpass_filter(&time, &trace, Hertz(50e6), Hertz(150e6)),
            Err(SignalError::ShapeMismatch { .. })
        ));
    }
}
