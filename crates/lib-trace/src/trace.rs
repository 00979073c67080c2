//! Three-component time-domain traces and their time axis.
//!
//! A [`Trace`] holds exactly three channels (conventionally the spatial
//! components of an electric field, or three antenna-arm voltages) sampled
//! on a shared uniform [`TimeAxis`]. Amplitude units are caller-defined
//! (µV/m or µV); the core never interprets them.
//!
//! # Sample semantics
//!
//! Samples are point measurements at discrete instants. For an axis with
//! `N` samples starting at `t0` with step `dt`:
//!
//! ```text
//! t[i] = t0 + i * dt,  for i = 0, 1, ..., N-1
//! ```

use crate::units::{Hertz, Nanoseconds};
use serde::{Deserialize, Serialize};

/// Number of channels in a trace.
pub const CHANNEL_COUNT: usize = 3;

/// Relative tolerance for the uniform-spacing check on time axes.
const STEP_TOLERANCE: f64 = 1e-6;

/// A uniformly-spaced, strictly increasing time axis in nanoseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeAxis {
    samples: Vec<f64>,
}

impl TimeAxis {
    /// Create a time axis from raw nanosecond timestamps.
    ///
    /// # Panics
    ///
    /// Panics if the axis has fewer than 2 samples, is not strictly
    /// increasing, or is not uniformly spaced. Use [`TimeAxis::try_new`]
    /// for a fallible constructor.
    pub fn new(samples: Vec<f64>) -> Self {
        match Self::try_new(samples) {
            Ok(axis) => axis,
            Err(msg) => panic!("{msg}"),
        }
    }

    /// Try to create a time axis, validating uniform spacing.
    pub fn try_new(samples: Vec<f64>) -> Result<Self, &'static str> {
        if samples.len() < 2 {
            return Err("time axis needs at least 2 samples");
        }

        let step = samples[1] - samples[0];
        if !(step > 0.0) || !step.is_finite() {
            return Err("time axis must be strictly increasing");
        }

        for pair in samples.windows(2) {
            let local = pair[1] - pair[0];
            if !(local > 0.0) {
                return Err("time axis must be strictly increasing");
            }
            if ((local - step) / step).abs() > STEP_TOLERANCE {
                return Err("time axis must be uniformly spaced");
            }
        }

        Ok(Self { samples })
    }

    /// Build a uniform axis from a start time, step, and length.
    pub fn from_step(start: f64, step: Nanoseconds, len: usize) -> Self {
        assert!(len >= 2, "time axis needs at least 2 samples");
        assert!(step.0 > 0.0, "time step must be positive");

        let samples = (0..len).map(|i| start + i as f64 * step.0).collect();
        Self { samples }
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Raw timestamps in nanoseconds.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.samples
    }

    /// Timestamp of the first sample.
    #[inline]
    pub fn start(&self) -> f64 {
        self.samples[0]
    }

    /// Timestamp of the last sample.
    #[inline]
    pub fn end(&self) -> f64 {
        self.samples[self.samples.len() - 1]
    }

    /// Time step between consecutive samples.
    #[inline]
    pub fn step(&self) -> Nanoseconds {
        Nanoseconds(self.samples[1] - self.samples[0])
    }

    /// Sampling rate (reciprocal of the step).
    #[inline]
    pub fn sample_rate(&self) -> Hertz {
        self.step().to_rate()
    }

    /// Nyquist frequency (half the sampling rate).
    #[inline]
    pub fn nyquist(&self) -> Hertz {
        self.sample_rate() / 2.0
    }
}

/// A fixed three-channel trace with equal-length channels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    channels: [Vec<f64>; CHANNEL_COUNT],
}

impl Trace {
    /// Create a trace from three channels.
    ///
    /// # Panics
    ///
    /// Panics if the channel lengths differ. Use [`Trace::try_new`] for a
    /// fallible constructor.
    pub fn new(channels: [Vec<f64>; CHANNEL_COUNT]) -> Self {
        match Self::try_new(channels) {
            Ok(trace) => trace,
            Err(msg) => panic!("{msg}"),
        }
    }

    /// Try to create a trace, validating equal channel lengths.
    pub fn try_new(channels: [Vec<f64>; CHANNEL_COUNT]) -> Result<Self, &'static str> {
        let len = channels[0].len();
        if channels.iter().any(|c| c.len() != len) {
            return Err("channel lengths must match");
        }
        Ok(Self { channels })
    }

    /// Create a zero-valued trace of the given length.
    pub fn zeros(len: usize) -> Self {
        Self {
            channels: [vec![0.0; len], vec![0.0; len], vec![0.0; len]],
        }
    }

    /// Samples per channel.
    #[inline]
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.channels[0].is_empty()
    }

    /// Borrow one channel.
    #[inline]
    pub fn channel(&self, index: usize) -> &[f64] {
        &self.channels[index]
    }

    /// Borrow all channels.
    #[inline]
    pub fn channels(&self) -> &[Vec<f64>; CHANNEL_COUNT] {
        &self.channels
    }

    /// Iterate over channels in channel-major order.
    pub fn iter(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.channels.iter().map(|c| c.as_slice())
    }

    /// Maximum absolute sample value across all channels.
    pub fn max_abs(&self) -> f64 {
        self.channels
            .iter()
            .flatten()
            .map(|v| v.abs())
            .fold(0.0, f64::max)
    }

    /// Root mean square over all channels.
    pub fn rms(&self) -> f64 {
        let n = CHANNEL_COUNT * self.len();
        if n == 0 {
            return 0.0;
        }
        let sum_sq: f64 = self.channels.iter().flatten().map(|v| v * v).sum();
        (sum_sq / n as f64).sqrt()
    }

    /// Scale all samples by a factor.
    pub fn scale(&mut self, factor: f64) {
        for channel in &mut self.channels {
            for sample in channel {
                *sample *= factor;
            }
        }
    }
}
