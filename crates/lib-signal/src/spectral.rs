//! Forward and inverse spectral transforms for traces.
//!
//! The forward transform computes the one-dimensional real FFT of each
//! channel, exploiting Hermitian symmetry: only the non-negative
//! frequencies are returned, `L/2 + 1` complex bins for `L` samples. The
//! frequency axis is reported in MHz.
//!
//! An optional window can be applied per channel before transforming to
//! tame spectral leakage; the Hamming window is the conventional choice
//! for field traces. A windowed spectrum is NOT exactly invertible back to
//! the original signal - the taper stays baked into the reconstruction.
//! That is documented behavior, not an error.

use crate::error::{SignalError, SignalResult};
use crate::fft::{rfft_frequencies_mhz, FftEngine};
use crate::window::{apply_window, generate_window, WindowType};
use lib_trace::spectrum::Spectrum;
use lib_trace::trace::{TimeAxis, Trace, CHANNEL_COUNT};
use num_complex::Complex64;

/// Forward real FFT of a trace.
///
/// Returns the frequency axis in MHz (length `L/2 + 1`, from 0 to the
/// Nyquist frequency) and the per-channel complex spectrum. `window`
/// selects an optional taper applied to each channel first; `None` leaves
/// the samples untouched.
pub fn forward(
    time: &TimeAxis,
    trace: &Trace,
    window: Option<WindowType>,
) -> SignalResult<(Vec<f64>, Spectrum)> {
    let len = trace.len();
    if len == 0 {
        return Err(SignalError::EmptyTrace);
    }
    if time.len() != len {
        return Err(SignalError::ShapeMismatch {
            expected: time.len(),
            actual: len,
        });
    }

    let frequencies = rfft_frequencies_mhz(len, time.step());

    let taper = window.map(|w| {
        tracing::debug!(window = ?w, "tapering channels before transform");
        generate_window(w, len)
    });

    let mut engine = FftEngine::new();
    let mut bins: [Vec<Complex64>; CHANNEL_COUNT] = Default::default();
    for (channel, out) in trace.iter().zip(bins.iter_mut()) {
        *out = match &taper {
            Some(coeffs) => engine.rfft(&apply_window(channel, coeffs))?,
            None => engine.rfft(channel)?,
        };
    }

    Ok((frequencies, Spectrum::new(bins, len)))
}

/// Inverse real FFT of a spectrum, reconstructing the time-domain trace.
///
/// The target length comes from the spectrum's originating sample count,
/// so both even and odd lengths round-trip. Feeding in a windowed
/// spectrum reconstructs the tapered signal, not the raw one.
pub fn inverse(spectrum: &Spectrum) -> SignalResult<Trace> {
    let len = spectrum.time_domain_len();
    if len == 0 {
        return Err(SignalError::EmptyTrace);
    }

    let mut engine = FftEngine::new();
    let mut channels: [Vec<f64>; CHANNEL_COUNT] = Default::default();
    for (bins, out) in spectrum.channels().iter().zip(channels.iter_mut()) {
        *out = engine.irfft(bins, len)?;
    }

    Ok(Trace::new(channels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_trace::units::Nanoseconds;
    use std::f64::consts::PI;

    fn tone_trace(len: usize, cycles: f64) -> Trace {
        let make = |amp: f64, phase: f64| {
            (0..len)
                .map(|i| amp * (2.0 * PI * cycles * i as f64 / len as f64 + phase).cos())
                .collect()
        };
        Trace::new([make(1.0, 0.0), make(0.7, 0.4), make(0.2, 1.1)])
    }

    #[test]
    fn test_frequency_axis() {
        let len = 1000;
        let time = TimeAxis::from_step(0.0, Nanoseconds(0.5), len);
        let trace = tone_trace(len, 50.0);

        let (freq, spectrum) = forward(&time, &trace, None).unwrap();

        assert_eq!(freq.len(), len / 2 + 1);
        assert_eq!(spectrum.len(), len / 2 + 1);
        assert!((freq[0]).abs() < 1e-12);
        // Nyquist of a 2 GHz sampling rate
        assert!((freq[len / 2] - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_tone_lands_in_expected_bin() {
        let len = 1000;
        let time = TimeAxis::from_step(0.0, Nanoseconds(0.5), len);
        // 50 cycles over 500 ns -> 100 MHz
        let trace = tone_trace(len, 50.0);

        let (freq, spectrum) = forward(&time, &trace, None).unwrap();
        let magnitudes: Vec<f64> = spectrum.channel(0).iter().map(|z| z.norm()).collect();

        let peak_bin = magnitudes
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();

        assert_eq!(peak_bin, 50);
        assert!((freq[peak_bin] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_roundtrip_even_and_odd() {
        for len in [128usize, 1000, 101, 77] {
            let time = TimeAxis::from_step(0.0, Nanoseconds(0.5), len);
            let trace = tone_trace(len, 7.0);

            let (_, spectrum) = forward(&time, &trace, None).unwrap();
            let recovered = inverse(&spectrum).unwrap();

            assert_eq!(recovered.len(), len);
            for (channel, original) in recovered.iter().zip(trace.iter()) {
                for (a, b) in channel.iter().zip(original.iter()) {
                    assert!(
                        (a - b).abs() < 1e-9,
                        "roundtrip mismatch at len={len}: {a} vs {b}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_windowed_transform_is_lossy() {
        let len = 256;
        let time = TimeAxis::from_step(0.0, Nanoseconds(0.5), len);
        let trace = tone_trace(len, 16.0);

        let (_, spectrum) = forward(&time, &trace, Some(WindowType::Hamming)).unwrap();
        let recovered = inverse(&spectrum).unwrap();

        // The reconstruction is the tapered signal: edges attenuated to
        // the Hamming endpoint weight, nowhere near the original.
        let edge_error = (recovered.channel(0)[0] - trace.channel(0)[0]).abs();
        assert!(
            edge_error > 0.5 * trace.channel(0)[0].abs(),
            "windowed transform unexpectedly invertible, edge error {edge_error}"
        );

        // And it matches the windowed samples themselves to tolerance.
        let window = generate_window(WindowType::Hamming, len);
        for (rec, (orig, w)) in recovered
            .channel(0)
            .iter()
            .zip(trace.channel(0).iter().zip(window.iter()))
        {
            assert!((rec - orig * w).abs() < 1e-9);
        }
    }

    #[test]
    fn test_shape_mismatch() {
        let time = TimeAxis::from_step(0.0, Nanoseconds(0.5), 100);
        let trace = tone_trace(64, 4.0);

        assert!(matches!(
            forward(&time, &trace, None),
            Err(SignalError::ShapeMismatch {
                expected: 100,
                actual: 64
            })
        ));
    }
}
