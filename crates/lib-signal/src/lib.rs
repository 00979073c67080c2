//! # lib-signal
//!
//! Signal-processing primitives for three-component radio-detection
//! traces. Operations take `(time, trace)` pairs from the event-loading
//! side and hand processed pairs (or scalar results) back; every call is
//! a pure function of its inputs with no state carried across calls.
//!
//! - **Filtering**: order-5 Butterworth band-pass, designed per call and
//!   applied causally
//! - **Spectral transforms**: forward/inverse real FFT with optional
//!   windowing
//! - **Envelope & peak**: Hilbert-envelope peak amplitude and timing
//! - **Resampling**: Fourier-domain interpolation or anti-aliased
//!   decimation to a target sampling interval
//! - **Noise injection**: Gaussian noise with a caller-owned RNG

pub mod envelope;
pub mod error;
pub mod fft;
pub mod filter;
pub mod noise;
pub mod resample;
pub mod spectral;
pub mod window;

pub use envelope::{hilbert_envelope, peak, Peak};
pub use error::{SignalError, SignalResult};
pub use fft::FftEngine;
pub use filter::bandpass_filter;
pub use noise::{add_noise, add_noise_trace};
pub use resample::{resample, DownsamplingMethod};
pub use spectral::{forward, inverse};
pub use window::WindowType;

#[cfg(test)]
mod pipeline_tests {
    use super::*;
    use lib_trace::trace::{TimeAxis, Trace};
    use lib_trace::units::{Hertz, Nanoseconds};
    use std::f64::consts::PI;

    /// Full conditioning scenario: 1000 samples at 0.5 ns carrying a
    /// dominant 100 MHz sinusoid of amplitude 10, shaped by a broad
    /// Gaussian burst whose crest falls on a carrier crest (252.5 ns,
    /// sample 505).
    #[test]
    fn test_end_to_end_filter_and_peak() {
        let len = 1000;
        let dt = Nanoseconds(0.5);
        let time = TimeAxis::from_step(0.0, dt, len);

        let center_ns = 252.5;
        let sigma_ns = 25.0;
        let tone: Vec<f64> = (0..len)
            .map(|i| {
                let t_ns = i as f64 * dt.0;
                let x = t_ns - center_ns;
                let burst = (-x * x / (2.0 * sigma_ns * sigma_ns)).exp();
                10.0 * burst * (2.0 * PI * 100e6 * (t_ns * 1e-9)).sin()
            })
            .collect();
        let trace = Trace::new([tone, vec![0.0; len], vec![0.0; len]]);

        // Band-limiting around the carrier keeps shape and stays finite
        let filtered = bandpass_filter(&time, &trace, Hertz(50e6), Hertz(150e6)).unwrap();
        assert_eq!(filtered.len(), len);
        assert!(filtered.iter().flatten().all(|v| v.is_finite()));

        // Unfiltered peak: amplitude within 5% of 10, timing within one
        // step of the burst crest
        let found = peak(&time, &trace, Hertz(50e6), Hertz(150e6), false).unwrap();

        assert!(
            (found.amplitude - 10.0).abs() < 0.5,
            "peak amplitude {}",
            found.amplitude
        );
        assert!(
            (found.time_ns - center_ns).abs() <= dt.0 + 1e-9,
            "peak at {} ns, expected near {} ns",
            found.time_ns,
            center_ns
        );
        assert_eq!(found.channel, 0);
    }

    /// The conditioning chain composes: filter, then resample, then peak.
    #[test]
    fn test_chain_filter_resample_peak() {
        let len = 1024;
        let dt = Nanoseconds(0.5);
        let time = TimeAxis::from_step(0.0, dt, len);

        let make = |amp: f64| {
            (0..len)
                .map(|i| amp * (2.0 * PI * 100e6 * (i as f64 * dt.as_seconds())).sin())
                .collect()
        };
        let trace = Trace::new([make(4.0), make(8.0), make(2.0)]);

        let filtered = bandpass_filter(&time, &trace, Hertz(60e6), Hertz(140e6)).unwrap();
        let (resampled, new_time) =
            resample(&time, &filtered, Nanoseconds(1.0), DownsamplingMethod::Fourier).unwrap();

        assert_eq!(resampled.len(), 512);
        assert_eq!(new_time.len(), 512);

        // The strongest channel wins the peak search
        let found = peak(&new_time, &resampled, Hertz::ZERO, Hertz::ZERO, false).unwrap();
        assert_eq!(found.channel, 1);
        assert!(found.amplitude > 4.0);
    }
}
