//! Frequency analysis of the capture signal.
//!
//! A plain O(n²) discrete Fourier transform: capture signals are sampled at
//! most once per tick, so even an hour-long run stays in the low thousands
//! of samples.

use std::f64::consts::TAU;

/// One bin of a single-sided amplitude spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpectrumBin {
    pub frequency_hz: f64,
    pub amplitude:    f64,
}

/// Single-sided amplitude spectrum of `signal` sampled every
/// `sample_interval_secs`.
///
/// Bins run from DC up to the Nyquist frequency.  A pure sinusoid of
/// amplitude `A` landing exactly on a bin shows up with amplitude `A`.
/// Returns an empty vector for an empty signal or a non-positive interval.
pub fn frequency_spectrum(signal: &[f64], sample_interval_secs: f64) -> Vec<SpectrumBin> {
    let n = signal.len();
    if n == 0 || sample_interval_secs.is_nan() || sample_interval_secs <= 0.0 {
        return Vec::new();
    }
    let nf = n as f64;
    let resolution = 1.0 / (nf * sample_interval_secs);

    (0..=n / 2)
        .map(|k| {
            let (mut re, mut im) = (0.0, 0.0);
            for (i, &x) in signal.iter().enumerate() {
                let phase = TAU * (k * i) as f64 / nf;
                re += x * phase.cos();
                im -= x * phase.sin();
            }
            let magnitude = (re * re + im * im).sqrt() / nf;
            let one_sided = k == 0 || (n % 2 == 0 && k == n / 2);
            SpectrumBin {
                frequency_hz: k as f64 * resolution,
                amplitude:    if one_sided { magnitude } else { 2.0 * magnitude },
            }
        })
        .collect()
}

/// The strongest non-DC bin.
pub fn dominant_frequency(spectrum: &[SpectrumBin]) -> Option<SpectrumBin> {
    spectrum
        .iter()
        .skip(1)
        .copied()
        .max_by(|a, b| a.amplitude.total_cmp(&b.amplitude))
}
