use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::ThreadRng;
use rand::Rng;

use crate::config::{
    COSINE_PERIOD_MS, REST_NOISE_SCALE, SINE_PERIOD_MS, WAVEFORM_CAPACITY, WAVEFORM_GAIN,
};
use crate::simulation::params::ShakeLevel;

/// Synthetic seismograph feed.
///
/// Holds the last `WAVEFORM_CAPACITY` samples, oldest first. The buffer
/// starts full of zeros and never changes length: each new sample evicts
/// the oldest one.
pub struct WaveformGenerator<R = ThreadRng> {
    samples: VecDeque<f64>,
    rng: R,
}

impl WaveformGenerator<ThreadRng> {
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl<R: Rng> WaveformGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            samples: VecDeque::from(vec![0.0; WAVEFORM_CAPACITY]),
            rng,
        }
    }

    /// Produce one sample for the current level and append it to the history.
    ///
    /// `t_ms` drives the phase of the sine/cosine components. The app feeds
    /// wall-clock milliseconds, so phase is not reproducible across runs.
    pub fn sample(&mut self, level: ShakeLevel, magnitude: f64, t_ms: f64) -> f64 {
        let mut noise: f64 = self.rng.gen_range(-1.0..1.0);
        let mut signal = 0.0;

        if level.is_shaking() {
            let intensity = magnitude * WAVEFORM_GAIN;
            signal = (t_ms / SINE_PERIOD_MS).sin() * intensity * self.rng.gen::<f64>()
                + (t_ms / COSINE_PERIOD_MS).cos() * (intensity / 2.0) * self.rng.gen::<f64>();
        } else {
            noise *= REST_NOISE_SCALE;
        }

        let value = signal + noise;
        self.samples.pop_front();
        self.samples.push_back(value);
        value
    }

    /// Samples oldest to newest
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }
}

impl Default for WaveformGenerator<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

/// Milliseconds since the Unix epoch, the phase source for live sampling
pub fn wall_clock_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
