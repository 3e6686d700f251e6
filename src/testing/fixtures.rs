//! Synthetic audio fixtures for tests and the CLI harness.
//!
//! Fixtures are deterministic: every pattern that uses randomness draws from
//! a seeded `StdRng`, so the same spec always renders the same samples and
//! therefore the same WAV bytes.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::io::Cursor;

/// Declarative description of a synthetic clip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyntheticSpec {
    pub pattern: SyntheticPattern,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u32,
    #[serde(default = "default_frequency_hz")]
    pub frequency_hz: f32,
    #[serde(default = "default_amplitude")]
    pub amplitude: f32,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

/// Supported deterministic waveform patterns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyntheticPattern {
    /// Steady pure tone at `frequency_hz`.
    Sine,
    /// Harmonic tone whose pitch and loudness jump every segment, with
    /// interleaved breath-like noise bursts.
    JitteredVoice,
    /// Uniform white noise.
    WhiteNoise,
    /// All-zero signal.
    Silence,
}

/// Length of one jittered-voice segment.
const SEGMENT_MS: u32 = 100;

/// Probability that a jittered-voice segment is a noise burst.
const BREATH_PROBABILITY: f32 = 0.25;

/// Relative amplitudes of the jittered-voice harmonics.
const HARMONIC_WEIGHTS: [f32; 5] = [1.0, 0.5, 0.33, 0.25, 0.2];

impl SyntheticSpec {
    pub fn new(pattern: SyntheticPattern, sample_rate: u32, duration_ms: u32) -> Self {
        Self {
            pattern,
            sample_rate,
            duration_ms,
            frequency_hz: default_frequency_hz(),
            amplitude: default_amplitude(),
            seed: default_seed(),
        }
    }

    pub fn with_frequency(mut self, frequency_hz: f32) -> Self {
        self.frequency_hz = frequency_hz;
        self
    }

    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn total_samples(&self) -> usize {
        duration_frames(self.duration_ms, self.sample_rate)
    }

    /// Render the clip as mono f32 samples.
    pub fn render(&self) -> Vec<f32> {
        let len = self.total_samples();
        match self.pattern {
            SyntheticPattern::Sine => (0..len)
                .map(|i| {
                    let cycles =
                        (i as f64 * self.frequency_hz as f64 / self.sample_rate as f64).fract();
                    self.amplitude * (2.0 * PI * cycles as f32).sin()
                })
                .collect(),
            SyntheticPattern::WhiteNoise => {
                let mut rng = StdRng::seed_from_u64(self.seed);
                (0..len)
                    .map(|_| rng.gen_range(-self.amplitude..self.amplitude))
                    .collect()
            }
            SyntheticPattern::Silence => vec![0.0; len],
            SyntheticPattern::JitteredVoice => self.render_jittered_voice(len),
        }
    }

    fn render_jittered_voice(&self, len: usize) -> Vec<f32> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let segment_len = duration_frames(SEGMENT_MS, self.sample_rate).max(1);
        let norm: f32 = HARMONIC_WEIGHTS.iter().sum();
        let mut samples = Vec::with_capacity(len);
        // Phase is carried across segments so pitch jumps do not click
        let mut phase = 0.0f32;

        while samples.len() < len {
            let remaining = (len - samples.len()).min(segment_len);
            if rng.gen::<f32>() < BREATH_PROBABILITY {
                let level = self.amplitude * rng.gen_range(0.05..0.2);
                samples.extend((0..remaining).map(|_| rng.gen_range(-level..level)));
                continue;
            }

            let f0 = rng.gen_range(90.0..320.0f32);
            let level = self.amplitude * rng.gen_range(0.2..1.0f32);
            for _ in 0..remaining {
                let value: f32 = HARMONIC_WEIGHTS
                    .iter()
                    .enumerate()
                    .map(|(k, w)| w * (2.0 * PI * (k + 1) as f32 * phase).sin())
                    .sum();
                samples.push(level * value / norm);
                phase += f0 / self.sample_rate as f32;
                if phase >= 1.0 {
                    phase -= 1.0;
                }
            }
        }

        samples
    }

    /// Render and encode as 16-bit PCM WAV bytes.
    pub fn to_wav(&self) -> Result<Vec<u8>, hound::Error> {
        encode_wav(&self.render(), self.sample_rate)
    }
}

/// Encode mono f32 samples as an in-memory 16-bit PCM WAV file.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            let scaled = (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16;
            writer.write_sample(scaled)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

fn duration_frames(duration_ms: u32, sample_rate: u32) -> usize {
    ((duration_ms as f32 / 1_000.0) * sample_rate as f32).round() as usize
}

fn default_sample_rate() -> u32 {
    16_000
}

fn default_duration_ms() -> u32 {
    3_000
}

// 200 Hz divides 16 kHz evenly, so every 25 ms frame holds whole periods
fn default_frequency_hz() -> f32 {
    200.0
}

fn default_amplitude() -> f32 {
    0.5
}

fn default_seed() -> u64 {
    0x5A5A_FFF0
}

#[cfg(test)]
#[path = "fixtures/tests.rs"]
mod tests;
