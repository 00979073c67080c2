//! Hilbert-envelope computation and peak extraction.
//!
//! The analytic signal is built with the FFT method: forward transform,
//! zero the negative frequencies while doubling the positive ones (DC and
//! the Nyquist bin, when present, are kept as-is), inverse transform. Its
//! magnitude is the instantaneous amplitude envelope, which is where the
//! peak search happens - the raw samples of an oscillating trace undershoot
//! the true crest between samples, the envelope does not.

use crate::error::{SignalError, SignalResult};
use crate::fft::FftEngine;
use crate::filter::bandpass_filter;
use lib_trace::trace::{TimeAxis, Trace, CHANNEL_COUNT};
use lib_trace::units::Hertz;
use num_complex::Complex64;

/// Global envelope peak of a trace.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// Timestamp of the peak sample, in nanoseconds (drawn from the input
    /// axis, no interpolation).
    pub time_ns: f64,

    /// Envelope amplitude at the peak; always non-negative.
    pub amplitude: f64,

    /// Channel the peak was found on.
    pub channel: usize,

    /// Sample index of the peak.
    pub index: usize,
}

/// Compute the instantaneous amplitude envelope of one channel.
///
/// Magnitude of the analytic signal; works for even and odd lengths.
pub fn hilbert_envelope(samples: &[f64]) -> SignalResult<Vec<f64>> {
    let n = samples.len();
    if n == 0 {
        return Err(SignalError::EmptyTrace);
    }

    let mut engine = FftEngine::new();
    let mut analytic: Vec<Complex64> =
        samples.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    engine.fft_inplace(&mut analytic);

    // Analytic-signal mask: keep DC, double positive frequencies, keep
    // the Nyquist bin for even lengths, zero the negative half.
    let half = n / 2;
    for bin in analytic.iter_mut().take(half).skip(1) {
        *bin *= 2.0;
    }
    if n % 2 != 0 && n > 1 {
        analytic[half] *= 2.0;
    }
    for bin in analytic.iter_mut().skip(half + 1) {
        *bin = Complex64::new(0.0, 0.0);
    }

    engine.ifft_inplace(&mut analytic);

    Ok(analytic.iter().map(|z| z.norm()).collect())
}

/// Per-channel envelopes of a whole trace.
pub fn envelope_trace(trace: &Trace) -> SignalResult<[Vec<f64>; CHANNEL_COUNT]> {
    let mut envelopes: [Vec<f64>; CHANNEL_COUNT] = Default::default();
    for (channel, out) in trace.iter().zip(envelopes.iter_mut()) {
        *out = hilbert_envelope(channel)?;
    }
    Ok(envelopes)
}

/// Find the global envelope peak of a trace, optionally band-limiting it
/// first.
///
/// With `filtered` set, the trace is passed through the order-5
/// Butterworth band-pass with cutoffs `(f_min, f_max)` before the
/// envelope is computed; filter errors propagate. The peak is the maximum
/// envelope value across all three channels; on exact ties the first
/// occurrence in channel-major, then time-major order wins.
pub fn peak(
    time: &TimeAxis,
    trace: &Trace,
    f_min: Hertz,
    f_max: Hertz,
    filtered: bool,
) -> SignalResult<Peak> {
    if trace.is_empty() {
        return Err(SignalError::EmptyTrace);
    }
    if time.len() != trace.len() {
        return Err(SignalError::ShapeMismatch {
            expected: time.len(),
            actual: trace.len(),
        });
    }

    let conditioned;
    let trace = if filtered {
        tracing::debug!(
            f_min_hz = f_min.0,
            f_max_hz = f_max.0,
            "band-limiting trace before peak search"
        );
        conditioned = bandpass_filter(time, trace, f_min, f_max)?;
        &conditioned
    } else {
        tracing::debug!("searching peak on raw trace");
        trace
    };

    let mut best = Peak {
        time_ns: time.start(),
        amplitude: f64::NEG_INFINITY,
        channel: 0,
        index: 0,
    };

    for (channel_index, channel) in trace.iter().enumerate() {
        let envelope = hilbert_envelope(channel)?;
        for (index, &value) in envelope.iter().enumerate() {
            // Strict comparison keeps the first channel-major occurrence
            // on exact ties.
            if value > best.amplitude {
                best = Peak {
                    time_ns: time.values()[index],
                    amplitude: value,
                    channel: channel_index,
                    index,
                };
            }
        }
    }

    Ok(best)
}
