//! Complex-valued spectra of three-channel traces.
//!
//! A [`Spectrum`] is produced by the forward spectral transform and
//! consumed by its inverse. Bins follow the real-FFT convention: only the
//! non-negative frequencies are stored, `L/2 + 1` bins for a trace of
//! length `L`. The originating sample count is carried alongside so the
//! inverse transform can reconstruct both even and odd lengths.

use crate::trace::CHANNEL_COUNT;
use num_complex::Complex64;

/// Per-channel complex spectrum paired positionally with a frequency axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Spectrum {
    channels: [Vec<Complex64>; CHANNEL_COUNT],
    time_domain_len: usize,
}

impl Spectrum {
    /// Create a spectrum from per-channel bins and the originating trace
    /// length.
    ///
    /// # Panics
    ///
    /// Panics if the bin counts differ across channels or do not equal
    /// `time_domain_len / 2 + 1`. Use [`Spectrum::try_new`] for a fallible
    /// constructor.
    pub fn new(channels: [Vec<Complex64>; CHANNEL_COUNT], time_domain_len: usize) -> Self {
        match Self::try_new(channels, time_domain_len) {
            Ok(spectrum) => spectrum,
            Err(msg) => panic!("{msg}"),
        }
    }

    /// Try to create a spectrum, validating bin counts.
    pub fn try_new(
        channels: [Vec<Complex64>; CHANNEL_COUNT],
        time_domain_len: usize,
    ) -> Result<Self, &'static str> {
        let bins = channels[0].len();
        if channels.iter().any(|c| c.len() != bins) {
            return Err("spectrum bin counts must match across channels");
        }
        if bins != time_domain_len / 2 + 1 {
            return Err("spectrum bin count must be time_domain_len / 2 + 1");
        }
        Ok(Self {
            channels,
            time_domain_len,
        })
    }

    /// Bins per channel.
    #[inline]
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.channels[0].is_empty()
    }

    /// Sample count of the time-domain trace this spectrum came from.
    #[inline]
    pub fn time_domain_len(&self) -> usize {
        self.time_domain_len
    }

    /// Borrow one channel's bins.
    #[inline]
    pub fn channel(&self, index: usize) -> &[Complex64] {
        &self.channels[index]
    }

    /// Borrow all channels.
    #[inline]
    pub fn channels(&self) -> &[Vec<Complex64>; CHANNEL_COUNT] {
        &self.channels
    }

    /// Per-channel magnitude spectra (for plotting and inspection).
    pub fn magnitudes(&self) -> [Vec<f64>; CHANNEL_COUNT] {
        let mag = |c: &Vec<Complex64>| c.iter().map(|z| z.norm()).collect();
        [
            mag(&self.channels[0]),
            mag(&self.channels[1]),
            mag(&self.channels[2]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_count_validation() {
        let bins = vec![Complex64::new(1.0, 0.0); 5];

        // 8 samples -> 5 bins, both even and matching
        assert!(Spectrum::try_new([bins.clone(), bins.clone(), bins.clone()], 8).is_ok());
        // 9 samples -> 5 bins as well (odd length)
        assert!(Spectrum::try_new([bins.clone(), bins.clone(), bins.clone()], 9).is_ok());
        // Wrong originating length
        assert!(Spectrum::try_new([bins.clone(), bins.clone(), bins], 12).is_err());
    }

    #[test]
    fn test_mismatched_channels_rejected() {
        let a = vec![Complex64::new(0.0, 0.0); 5];
        let b = vec![Complex64::new(0.0, 0.0); 4];
        assert!(Spectrum::try_new([a.clone(), b, a], 8).is_err());
    }
}
