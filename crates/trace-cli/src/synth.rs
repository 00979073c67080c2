//! Synthetic trace generation for exercising the conditioning primitives.

use lib_trace::trace::{TimeAxis, Trace};
use lib_trace::units::{Hertz, Nanoseconds};
use std::f64::consts::PI;

/// Relative amplitudes of the three channels, mimicking the uneven
/// projection of a field vector onto the antenna arms.
const CHANNEL_WEIGHTS: [f64; 3] = [1.0, 0.6, 0.3];

/// Synthetic sinusoid generator, optionally shaped by a Gaussian burst.
pub struct ToneGenerator {
    /// Carrier frequency.
    pub frequency: Hertz,

    /// Peak amplitude on the strongest channel.
    pub amplitude: f64,

    /// Carrier phase offset in radians.
    pub phase: f64,

    /// Optional Gaussian burst `(center_ns, sigma_ns)`; `None` produces a
    /// continuous tone.
    pub burst: Option<(f64, f64)>,
}

impl ToneGenerator {
    /// Generate `len` samples at `step`, starting at t = 0.
    pub fn generate(&self, len: usize, step: Nanoseconds) -> (TimeAxis, Trace) {
        let time = TimeAxis::from_step(0.0, step, len);

        let channel = |weight: f64| {
            time.values()
                .iter()
                .map(|&t_ns| {
                    let envelope = match self.burst {
                        Some((center, sigma)) => {
                            let x = t_ns - center;
                            (-x * x / (2.0 * sigma * sigma)).exp()
                        }
                        None => 1.0,
                    };
                    weight
                        * self.amplitude
                        * envelope
                        * (2.0 * PI * self.frequency.0 * t_ns * 1e-9 + self.phase).sin()
                })
                .collect()
        };

        let trace = Trace::new([
            channel(CHANNEL_WEIGHTS[0]),
            channel(CHANNEL_WEIGHTS[1]),
            channel(CHANNEL_WEIGHTS[2]),
        ]);

        (time, trace)
    }
}
