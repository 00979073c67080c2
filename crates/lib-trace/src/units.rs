//! Physical units with type safety.
//!
//! These newtypes prevent mixing incompatible quantities at compile time
//! (e.g., passing a frequency where a time step is expected). The trace
//! conditioning core works in nanoseconds on the time side and Hertz on
//! the frequency side; spectra are reported in MHz.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Time duration in nanoseconds.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Nanoseconds(pub f64);

impl Nanoseconds {
    pub const ZERO: Self = Self(0.0);

    #[inline]
    pub fn from_seconds(s: f64) -> Self {
        Self(s * 1e9)
    }

    #[inline]
    pub fn as_seconds(&self) -> f64 {
        self.0 * 1e-9
    }

    /// Sampling rate corresponding to this step (reciprocal).
    #[inline]
    pub fn to_rate(&self) -> Hertz {
        Hertz(1.0 / self.as_seconds())
    }
}

impl Add for Nanoseconds {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Nanoseconds {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<f64> for Nanoseconds {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Div<f64> for Nanoseconds {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self(self.0 / rhs)
    }
}

impl Div<Nanoseconds> for Nanoseconds {
    type Output = f64;
    fn div(self, rhs: Nanoseconds) -> f64 {
        self.0 / rhs.0
    }
}

/// Frequency in Hertz.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Hertz(pub f64);

impl Hertz {
    pub const ZERO: Self = Self(0.0);

    #[inline]
    pub fn from_mhz(mhz: f64) -> Self {
        Self(mhz * 1e6)
    }

    #[inline]
    pub fn as_mhz(&self) -> f64 {
        self.0 * 1e-6
    }

    /// Sampling period corresponding to this rate (reciprocal).
    #[inline]
    pub fn to_period(&self) -> Nanoseconds {
        Nanoseconds::from_seconds(1.0 / self.0)
    }
}

impl Add for Hertz {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Hertz {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<f64> for Hertz {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Div<f64> for Hertz {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self(self.0 / rhs)
    }
}

impl Div<Hertz> for Hertz {
    type Output = f64;
    fn div(self, rhs: Hertz) -> f64 {
        self.0 / rhs.0
    }
}
