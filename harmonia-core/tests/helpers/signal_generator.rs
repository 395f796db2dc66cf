//! Synthetic Signal Generator
//!
//! Deterministic test signals: seeded Gaussian noise, optionally on top of a
//! geometric harmonic series with amplitudes r^-n.

use harmonia_common::config::GOLDEN_RATIO;
use harmonia_core::TimeSeries;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;

/// Configuration for a generated harmonic signal
#[derive(Debug, Clone)]
pub struct SignalConfig {
    pub base_frequency: f64,
    pub ratio: f64,
    pub depth_normalization: f64,
    /// Number of harmonics present (n = 1..=harmonics)
    pub harmonics: usize,
    pub sampling_rate: f64,
    pub duration_seconds: f64,
    pub channels: usize,
    /// Standard deviation of additive white noise
    pub noise_sigma: f64,
    /// Phase offset added per channel (radians)
    pub channel_phase_step: f64,
    pub seed: u64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            base_frequency: 8.0,
            ratio: GOLDEN_RATIO,
            depth_normalization: 1.0,
            harmonics: 5,
            sampling_rate: 256.0,
            duration_seconds: 10.0,
            channels: 8,
            noise_sigma: 0.01,
            channel_phase_step: 0.3,
            seed: 42,
        }
    }
}

impl SignalConfig {
    pub fn sample_count(&self) -> usize {
        (self.duration_seconds * self.sampling_rate).round() as usize
    }

    /// f_n = f0 · r^(n/k)
    pub fn frequency(&self, n: usize) -> f64 {
        self.base_frequency * self.ratio.powf(n as f64 / self.depth_normalization)
    }
}

/// Sum of r^-n sinusoids at the series frequencies, plus white noise
pub fn harmonic_signal(config: &SignalConfig) -> TimeSeries {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = Normal::new(0.0, config.noise_sigma).unwrap();
    let samples = config.sample_count();

    let channels: Vec<Vec<f64>> = (0..config.channels)
        .map(|ch| {
            let offset = ch as f64 * config.channel_phase_step;
            (0..samples)
                .map(|i| {
                    let t = i as f64 / config.sampling_rate;
                    let tone: f64 = (1..=config.harmonics)
                        .map(|n| {
                            let amplitude = config.ratio.powi(-(n as i32));
                            amplitude * (2.0 * PI * config.frequency(n) * t + offset).sin()
                        })
                        .sum();
                    tone + noise.sample(&mut rng)
                })
                .collect()
        })
        .collect();

    TimeSeries::new(channels, config.sampling_rate).unwrap()
}

/// Independent unit-variance Gaussian noise on every channel
pub fn white_noise(channels: usize, samples: usize, sampling_rate: f64, seed: u64) -> TimeSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let data: Vec<Vec<f64>> = (0..channels)
        .map(|_| (0..samples).map(|_| normal.sample(&mut rng)).collect())
        .collect();
    TimeSeries::new(data, sampling_rate).unwrap()
}

/// The same value on every sample of every channel
pub fn constant_signal(channels: usize, samples: usize, sampling_rate: f64, value: f64) -> TimeSeries {
    TimeSeries::new(vec![vec![value; samples]; channels], sampling_rate).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_is_deterministic() {
        let config = SignalConfig {
            channels: 2,
            duration_seconds: 1.0,
            ..SignalConfig::default()
        };
        assert_eq!(harmonic_signal(&config), harmonic_signal(&config));
    }

    #[test]
    fn test_shape() {
        let config = SignalConfig::default();
        let series = harmonic_signal(&config);
        assert_eq!(series.channel_count(), 8);
        assert_eq!(series.sample_count(), 2560);
    }
}
