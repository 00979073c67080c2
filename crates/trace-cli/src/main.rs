//! trace-kernel CLI: conditioning primitives for three-component
//! radio-detection traces.
//!
//! Subcommands map one-to-one onto the library operations: generate a
//! synthetic trace, band-pass filter it, inspect its spectrum, find the
//! envelope peak, resample it, or inject Gaussian noise.

mod output;
mod synth;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lib_signal::resample::DownsamplingMethod;
use lib_signal::window::WindowType;
use lib_trace::units::{Hertz, Nanoseconds};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "trace-kernel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format for scalar results
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Window selection exposed on the command line.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum WindowArg {
    Rectangular,
    Hann,
    Hamming,
    Blackman,
}

impl From<WindowArg> for WindowType {
    fn from(window: WindowArg) -> Self {
        match window {
            WindowArg::Rectangular => WindowType::Rectangular,
            WindowArg::Hann => WindowType::Hann,
            WindowArg::Hamming => WindowType::Hamming,
            WindowArg::Blackman => WindowType::Blackman,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic three-channel trace
    Generate {
        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,

        /// Number of samples
        #[arg(long, default_value = "1000")]
        samples: usize,

        /// Sampling step in nanoseconds
        #[arg(long, default_value = "0.5")]
        step_ns: f64,

        /// Carrier frequency in MHz
        #[arg(long, default_value = "100")]
        freq_mhz: f64,

        /// Peak amplitude on the strongest channel
        #[arg(long, default_value = "10")]
        amplitude: f64,

        /// Gaussian burst center in nanoseconds (continuous tone if unset)
        #[arg(long)]
        burst_center_ns: Option<f64>,

        /// Gaussian burst width (sigma) in nanoseconds
        #[arg(long, default_value = "25")]
        burst_sigma_ns: f64,
    },

    /// Band-pass filter a trace
    Filter {
        /// Input CSV path
        input: PathBuf,

        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,

        /// Lower cutoff in Hz
        #[arg(long)]
        fr_min: f64,

        /// Upper cutoff in Hz
        #[arg(long)]
        fr_max: f64,
    },

    /// Compute the magnitude spectrum of a trace
    Spectrum {
        /// Input CSV path
        input: PathBuf,

        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,

        /// Optional window applied before the transform
        #[arg(long)]
        window: Option<WindowArg>,
    },

    /// Find the Hilbert-envelope peak of a trace
    Peak {
        /// Input CSV path
        input: PathBuf,

        /// Lower cutoff in Hz (used with --filtered)
        #[arg(long, default_value = "50e6")]
        fr_min: f64,

        /// Upper cutoff in Hz (used with --filtered)
        #[arg(long, default_value = "200e6")]
        fr_max: f64,

        /// Band-pass filter before the peak search
        #[arg(long)]
        filtered: bool,
    },

    /// Resample a trace to a target sampling interval
    Resample {
        /// Input CSV path
        input: PathBuf,

        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,

        /// Target sampling interval in nanoseconds
        #[arg(long)]
        target_dt_ns: f64,

        /// Downsampling method: 1 = Fourier interpolation, 2 = decimation
        #[arg(long, default_value = "1")]
        method: u8,
    },

    /// Add Gaussian noise to a trace
    AddNoise {
        /// Input CSV path
        input: PathBuf,

        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,

        /// Noise standard deviation (same unit as the trace)
        #[arg(long)]
        vrms: f64,

        /// RNG seed for reproducible noise
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Generate {
            output,
            samples,
            step_ns,
            freq_mhz,
            amplitude,
            burst_center_ns,
            burst_sigma_ns,
        } => {
            let generator = synth::ToneGenerator {
                frequency: Hertz::from_mhz(freq_mhz),
                amplitude,
                phase: 0.0,
                burst: burst_center_ns.map(|center| (center, burst_sigma_ns)),
            };

            tracing::info!(samples, step_ns, freq_mhz, "generating synthetic trace");
            let (time, trace) = generator.generate(samples, Nanoseconds(step_ns));
            output::write_trace_csv(&output, &time, &trace)?;
        }

        Commands::Filter {
            input,
            output,
            fr_min,
            fr_max,
        } => {
            let (time, trace) = output::read_trace_csv(&input)?;

            let filtered =
                lib_signal::bandpass_filter(&time, &trace, Hertz(fr_min), Hertz(fr_max))
                    .context("band-pass filtering failed")?;

            output::write_trace_csv(&output, &time, &filtered)?;
        }

        Commands::Spectrum {
            input,
            output,
            window,
        } => {
            let (time, trace) = output::read_trace_csv(&input)?;

            let (frequencies, spectrum) =
                lib_signal::forward(&time, &trace, window.map(WindowType::from))
                    .context("spectral transform failed")?;

            output::write_spectrum_csv(&output, &frequencies, &spectrum.magnitudes())?;
        }

        Commands::Peak {
            input,
            fr_min,
            fr_max,
            filtered,
        } => {
            let (time, trace) = output::read_trace_csv(&input)?;

            let peak =
                lib_signal::peak(&time, &trace, Hertz(fr_min), Hertz(fr_max), filtered)
                    .context("peak extraction failed")?;

            output::print_peak(&peak, cli.format)?;
        }

        Commands::Resample {
            input,
            output,
            target_dt_ns,
            method,
        } => {
            let (time, trace) = output::read_trace_csv(&input)?;

            let method = DownsamplingMethod::try_from(method)
                .context("unrecognized downsampling method")?;
            let (resampled, new_time) =
                lib_signal::resample(&time, &trace, Nanoseconds(target_dt_ns), method)
                    .context("resampling failed")?;

            output::write_trace_csv(&output, &new_time, &resampled)?;
        }

        Commands::AddNoise {
            input,
            output,
            vrms,
            seed,
        } => {
            let (time, trace) = output::read_trace_csv(&input)?;

            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };

            let noisy = lib_signal::add_noise_trace(&trace, vrms, &mut rng)
                .context("noise injection failed")?;

            output::write_trace_csv(&output, &time, &noisy)?;
        }
    }

    Ok(())
}
