//! # lib-trace
//!
//! Core type definitions for radio-detection trace conditioning.
//!
//! This crate provides the foundational types shared across the workspace:
//! - Physical units with compile-time safety
//! - The uniform nanosecond time axis and three-channel trace
//! - Complex spectra in the real-FFT convention

pub mod spectrum;
pub mod trace;
pub mod units;

pub use spectrum::*;
pub use trace::*;
pub use units::*;

/// Re-export num_complex for convenience
pub use num_complex::Complex64;
