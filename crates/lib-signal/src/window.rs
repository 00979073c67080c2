//! Windowing functions for spectral analysis.
//!
//! Windows reduce spectral leakage when transforming traces whose content
//! is not periodic in the record length. The spectral transform applies a
//! window per channel before the forward FFT; a windowed spectrum is
//! intentionally not invertible back to the raw trace.

use std::f64::consts::PI;

/// Window function types for spectral processing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowType {
    /// No windowing (rectangular window).
    Rectangular,

    /// Hann (raised cosine) window - good general purpose.
    Hann,

    /// Hamming window - the conventional choice for field traces, and
    /// slightly better sidelobe rejection than Hann.
    Hamming,

    /// Blackman window - excellent sidelobe rejection.
    Blackman,
}

impl Default for WindowType {
    fn default() -> Self {
        Self::Hamming
    }
}

/// Generate window coefficients for a given window type and length.
///
/// The window is symmetric; raised-cosine windows peak at 1.0 in the
/// center.
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    if length == 0 {
        return Vec::new();
    }
    if length == 1 {
        return vec![1.0];
    }

    let n = length as f64;
    let mut window = Vec::with_capacity(length);

    match window_type {
        WindowType::Rectangular => {
            window.resize(length, 1.0);
        }

        WindowType::Hann => {
            for i in 0..length {
                let x = i as f64 / (n - 1.0);
                window.push(0.5 * (1.0 - (2.0 * PI * x).cos()));
            }
        }

        WindowType::Hamming => {
            for i in 0..length {
                let x = i as f64 / (n - 1.0);
                window.push(0.54 - 0.46 * (2.0 * PI * x).cos());
            }
        }

        WindowType::Blackman => {
            for i in 0..length {
                let x = i as f64 / (n - 1.0);
                window.push(0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos());
            }
        }
    }

    window
}

/// Multiply a sample sequence by a window, returning the tapered copy.
pub fn apply_window(samples: &[f64], window: &[f64]) -> Vec<f64> {
    samples
        .iter()
        .zip(window.iter())
        .map(|(s, w)| s * w)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangular_window() {
        let window = generate_window(WindowType::Rectangular, 10);
        assert_eq!(window.len(), 10);
        assert!(window.iter().all(|&w| (w - 1.0).abs() < 1e-10));
    }

    #[test]
    fn test_hann_window() {
        let window = generate_window(WindowType::Hann, 64);
        assert_eq!(window.len(), 64);

        // Hann window starts and ends at 0
        assert!(window[0].abs() < 1e-10);
        assert!(window[63].abs() < 1e-10);

        // Peak at center
        assert!(window[32] > 0.9);
    }

    #[test]
    fn test_hamming_window() {
        let window = generate_window(WindowType::Hamming, 64);

        // Hamming endpoints sit at 0.08, not 0
        assert!((window[0] - 0.08).abs() < 1e-10);
        assert!((window[63] - 0.08).abs() < 1e-10);
    }

    #[test]
    fn test_window_symmetry() {
        for window_type in [WindowType::Hann, WindowType::Hamming, WindowType::Blackman] {
            let window = generate_window(window_type, 65);

            // Odd-length window should be symmetric
            for i in 0..32 {
                assert!(
                    (window[i] - window[64 - i]).abs() < 1e-10,
                    "Asymmetry at index {}: {} vs {}",
                    i,
                    window[i],
                    window[64 - i]
                );
            }
        }
    }

    #[test]
    fn test_apply_window() {
        let samples = vec![2.0; 8];
        let window = generate_window(WindowType::Hamming, 8);
        let tapered = apply_window(&samples, &window);

        assert_eq!(tapered.len(), 8);
        assert!((tapered[0] - 0.16).abs() < 1e-10);
    }
}
