//! FFT/IFFT operations using rustfft and realfft.
//!
//! This module provides a high-level wrapper around the FFT backends with:
//! - Planner caching for repeated transforms
//! - Real-to-complex and complex-to-real transforms of arbitrary length
//! - Normalized inverse transforms (numpy `irfft`/`ifft` convention)
//!
//! Traces come at whatever length the simulation produced, so none of the
//! entry points require power-of-two sizes.

use crate::error::{SignalError, SignalResult};
use lib_trace::units::Nanoseconds;
use num_complex::Complex64;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use rustfft::{Fft, FftPlanner};

/// FFT engine with cached planners.
pub struct FftEngine {
    /// Complex FFT planner.
    complex_planner: FftPlanner<f64>,

    /// Real FFT planner.
    real_planner: RealFftPlanner<f64>,
}

impl FftEngine {
    /// Create a new FFT engine.
    pub fn new() -> Self {
        Self {
            complex_planner: FftPlanner::new(),
            real_planner: RealFftPlanner::new(),
        }
    }

    /// Perform forward FFT on complex data in-place. Unnormalized.
    pub fn fft_inplace(&mut self, data: &mut [Complex64]) {
        if data.is_empty() {
            return;
        }
        let fft = self.complex_planner.plan_fft_forward(data.len());
        fft.process(data);
    }

    /// Perform inverse FFT on complex data in-place, normalized by 1/N.
    pub fn ifft_inplace(&mut self, data: &mut [Complex64]) {
        if data.is_empty() {
            return;
        }
        let fft = self.complex_planner.plan_fft_inverse(data.len());
        fft.process(data);

        let scale = 1.0 / data.len() as f64;
        for x in data.iter_mut() {
            *x *= scale;
        }
    }

    /// Perform forward real-to-complex FFT.
    ///
    /// Input: N real samples.
    /// Output: N/2 + 1 complex samples (Hermitian symmetry exploited).
    pub fn rfft(&mut self, data: &[f64]) -> SignalResult<Vec<Complex64>> {
        if data.is_empty() {
            return Err(SignalError::EmptyTrace);
        }

        let r2c = self.real_planner.plan_fft_forward(data.len());
        let mut input = data.to_vec();
        let mut output = r2c.make_output_vec();

        r2c.process(&mut input, &mut output)
            .map_err(|e| SignalError::DesignFailure(e.to_string()))?;

        Ok(output)
    }

    /// Perform inverse complex-to-real FFT, normalized by 1/N.
    ///
    /// Input: N/2 + 1 complex samples.
    /// Output: N real samples.
    pub fn irfft(&mut self, data: &[Complex64], output_len: usize) -> SignalResult<Vec<f64>> {
        if output_len == 0 {
            return Err(SignalError::EmptyTrace);
        }

        let expected_input_len = output_len / 2 + 1;
        if data.len() != expected_input_len {
            return Err(SignalError::ShapeMismatch {
                expected: expected_input_len,
                actual: data.len(),
            });
        }

        let c2r = self.real_planner.plan_fft_inverse(output_len);
        let mut input = data.to_vec();
        let mut output = c2r.make_output_vec();

        // The DC bin (and Nyquist bin for even lengths) of a real signal's
        // spectrum is real; forward transforms leave roundoff there, which
        // the backend rejects.
        input[0].im = 0.0;
        if output_len % 2 == 0 {
            let last = input.len() - 1;
            input[last].im = 0.0;
        }

        c2r.process(&mut input, &mut output)
            .map_err(|e| SignalError::DesignFailure(e.to_string()))?;

        let scale = 1.0 / output_len as f64;
        for x in output.iter_mut() {
            *x *= scale;
        }

        Ok(output)
    }
}

impl Default for FftEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Real-FFT bin frequencies in MHz for a trace of `len` samples at `step`.
///
/// Bin `i` sits at `i / (len * step)`; the axis runs from 0 to the Nyquist
/// frequency with `len/2 + 1` entries.
pub fn rfft_frequencies_mhz(len: usize, step: Nanoseconds) -> Vec<f64> {
    let dt = step.as_seconds();
    (0..=len / 2)
        .map(|i| i as f64 / (len as f64 * dt) / 1e6)
        .collect()
}
