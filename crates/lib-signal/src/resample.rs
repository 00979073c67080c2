//! Trace resampling to a target sampling interval.
//!
//! Upsampling and the default downsampling path use band-limited
//! Fourier-domain interpolation: the spectrum is truncated or zero-padded
//! to the target length, with the Nyquist bin split (upsampling) or folded
//! (downsampling), then transformed back. The alternative downsampling
//! path low-pass filters first and keeps every q-th sample. The two
//! strategies give materially different results (spectral truncation vs.
//! explicit anti-aliasing); that divergence is intentional and part of the
//! contract.

use crate::error::{SignalError, SignalResult};
use crate::fft::FftEngine;
use crate::filter::{design_lowpass, lfilter};
use lib_trace::trace::{TimeAxis, Trace, CHANNEL_COUNT};
use lib_trace::units::Nanoseconds;
use num_complex::Complex64;

/// Filter order of the decimation path's anti-aliasing lowpass.
pub const DECIMATION_FILTER_ORDER: usize = 8;

/// Downsampling strategy selector.
///
/// The integer codes used by callers map through [`TryFrom<u8>`]:
/// `1` is [`Fourier`](DownsamplingMethod::Fourier), `2` is
/// [`Decimate`](DownsamplingMethod::Decimate), anything else is
/// [`SignalError::InvalidMethod`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DownsamplingMethod {
    /// Band-limited Fourier-domain interpolation to the target length.
    Fourier,

    /// Anti-aliasing lowpass followed by integer-factor subsampling.
    Decimate,
}

impl TryFrom<u8> for DownsamplingMethod {
    type Error = SignalError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Fourier),
            2 => Ok(Self::Decimate),
            other => Err(SignalError::InvalidMethod(other)),
        }
    }
}

/// Resample one channel to `new_len` samples via the Fourier method.
///
/// Spectrum truncation/zero-padding with the standard Nyquist-bin
/// handling, scaled by `new_len / len` so amplitudes are preserved.
pub fn fourier_resample(samples: &[f64], new_len: usize) -> SignalResult<Vec<f64>> {
    let n = samples.len();
    if n == 0 {
        return Err(SignalError::EmptyTrace);
    }
    if new_len == n {
        return Ok(samples.to_vec());
    }
    if new_len == 0 {
        return Err(SignalError::DegenerateLength(0));
    }

    let mut engine = FftEngine::new();
    let mut spectrum: Vec<Complex64> =
        samples.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    engine.fft_inplace(&mut spectrum);

    let zero = Complex64::new(0.0, 0.0);
    let mut resized = vec![zero; new_len];

    // Shared bins: DC plus the positive half of the shorter record, then
    // the mirrored negative tail.
    let n_min = n.min(new_len);
    let nyq = n_min / 2 + 1;
    resized[..nyq].copy_from_slice(&spectrum[..nyq]);

    let tail = n_min - nyq;
    for i in 0..tail {
        resized[new_len - tail + i] = spectrum[n - tail + i];
    }

    if n_min % 2 == 0 {
        let half = n_min / 2;
        if new_len < n {
            // Downsampling: fold the mirrored bin into the new Nyquist bin
            // so the shortened spectrum stays Hermitian.
            resized[half] += spectrum[n - half];
        } else {
            // Upsampling: the old Nyquist bin splits evenly between the
            // positive and negative sides of the longer spectrum.
            resized[half] *= 0.5;
            resized[new_len - half] = resized[half];
        }
    }

    let scale = new_len as f64 / n as f64;
    for bin in resized.iter_mut() {
        *bin *= scale;
    }

    engine.ifft_inplace(&mut resized);
    Ok(resized.iter().map(|z| z.re).collect())
}

/// Decimate one channel by integer factor `q` with an anti-aliasing
/// order-8 Butterworth lowpass at `0.8 / q` of Nyquist, applied causally.
pub fn decimate(samples: &[f64], q: usize) -> SignalResult<Vec<f64>> {
    if samples.is_empty() {
        return Err(SignalError::EmptyTrace);
    }
    if q <= 1 {
        return Ok(samples.to_vec());
    }

    let coeffs = design_lowpass(DECIMATION_FILTER_ORDER, 0.8 / q as f64)?;
    let filtered = lfilter(&coeffs, samples)?;

    Ok(filtered.iter().copied().step_by(q).collect())
}

/// Resample a trace to the target sampling interval, regenerating the
/// time axis.
///
/// With `ratio = target_dt / source_dt`:
/// - `ratio < 1` (upsampling) resamples each channel to
///   `round(len / ratio)` samples via Fourier interpolation;
/// - `ratio >= 1` with [`DownsamplingMethod::Fourier`] interpolates down
///   to `round(len / ratio)` samples (round half away from zero - the
///   target length is rounded explicitly before use);
/// - `ratio >= 1` with [`DownsamplingMethod::Decimate`] filters and keeps
///   every `round(ratio)`-th sample, `ceil(len / q)` in total.
///
/// The regenerated axis holds the new length `N` with spacing
/// `(t_last - t_0) / N` starting at `t_0` (the end point is excluded from
/// the spacing computation).
pub fn resample(
    time: &TimeAxis,
    trace: &Trace,
    target_dt: Nanoseconds,
    method: DownsamplingMethod,
) -> SignalResult<(Trace, TimeAxis)> {
    if trace.is_empty() {
        return Err(SignalError::EmptyTrace);
    }
    if time.len() != trace.len() {
        return Err(SignalError::ShapeMismatch {
            expected: time.len(),
            actual: trace.len(),
        });
    }
    if !(target_dt.0 > 0.0) || !target_dt.0.is_finite() {
        return Err(SignalError::InvalidRange(format!(
            "target sampling interval must be positive, got {} ns",
            target_dt.0
        )));
    }

    let len = trace.len();
    let ratio = target_dt / time.step();

    let mut resampled: [Vec<f64>; CHANNEL_COUNT] = Default::default();

    if ratio < 1.0 || method == DownsamplingMethod::Fourier {
        let new_len = (len as f64 / ratio).round() as usize;
        if new_len <= 1 {
            return Err(SignalError::DegenerateLength(new_len));
        }
        if ratio < 1.0 {
            tracing::debug!(ratio, new_len, "upsampling via Fourier interpolation");
        } else {
            tracing::debug!(ratio, new_len, "downsampling via Fourier interpolation");
        }

        for (channel, out) in trace.iter().zip(resampled.iter_mut()) {
            *out = fourier_resample(channel, new_len)?;
        }
    } else {
        let q = ratio.round() as usize;
        let new_len = (len + q - 1) / q;
        if new_len <= 1 {
            return Err(SignalError::DegenerateLength(new_len));
        }
        tracing::debug!(ratio, q, new_len, "downsampling via decimation");

        for (channel, out) in trace.iter().zip(resampled.iter_mut()) {
            *out = decimate(channel, q)?;
        }
    }

    let new_len = resampled[0].len();
    let step = Nanoseconds((time.end() - time.start()) / new_len as f64);
    let new_axis = TimeAxis::from_step(time.start(), step, new_len);

    Ok((Trace::new(resampled), new_axis))
}
