// Waveform - validated mono analysis signal

use crate::config::LoaderConfig;
use crate::error::AudioError;

/// Mono floating-point signal at a fixed analysis rate
///
/// Construction through [`Waveform::new`] enforces the duration bounds and
/// the silence floor, so every waveform handed to the feature extractor is
/// long enough and audible.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Validate and wrap decoded samples
    ///
    /// Checks run in order: minimum duration, maximum duration, silence.
    pub fn new(
        samples: Vec<f32>,
        sample_rate: u32,
        config: &LoaderConfig,
    ) -> Result<Self, AudioError> {
        if sample_rate == 0 {
            return Err(AudioError::decode("sample rate must be > 0"));
        }

        check_duration(samples.len() as f32 / sample_rate as f32, config)?;

        let level = rms(&samples);
        if !(level >= config.silence_rms) {
            return Err(AudioError::Silent {
                rms: level,
                floor: config.silence_rms,
            });
        }

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Overall RMS amplitude
    pub fn rms(&self) -> f32 {
        rms(&self.samples)
    }
}

/// Enforce the configured duration bounds, minimum first
pub(crate) fn check_duration(duration_secs: f32, config: &LoaderConfig) -> Result<(), AudioError> {
    if duration_secs < config.min_duration_secs {
        return Err(AudioError::TooShort {
            duration_secs,
            min_secs: config.min_duration_secs,
        });
    }
    if duration_secs > config.max_duration_secs {
        return Err(AudioError::TooLong {
            duration_secs,
            max_secs: config.max_duration_secs,
        });
    }
    Ok(())
}

/// Root-mean-square amplitude of a block of samples (0.0 when empty)
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let energy: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (energy / samples.len() as f64).sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(sample_rate: u32, seconds: f32, amplitude: f32) -> Vec<f32> {
        let len = (sample_rate as f32 * seconds) as usize;
        (0..len)
            .map(|i| {
                amplitude
                    * (2.0 * std::f32::consts::PI * 200.0 * i as f32 / sample_rate as f32).sin()
            })
            .collect()
    }

    #[test]
    fn test_valid_waveform() {
        let config = LoaderConfig::default();
        let waveform = Waveform::new(sine(16_000, 1.0, 0.5), 16_000, &config).unwrap();
        assert_eq!(waveform.sample_rate(), 16_000);
        assert!((waveform.duration_secs() - 1.0).abs() < 1e-6);
        assert!((waveform.rms() - 0.5 / 2f32.sqrt()).abs() < 1e-3);
    }

    #[test]
    fn test_too_short() {
        let config = LoaderConfig::default();
        let result = Waveform::new(sine(16_000, 0.4, 0.5), 16_000, &config);
        assert!(matches!(result, Err(AudioError::TooShort { .. })));
    }

    #[test]
    fn test_too_long() {
        let config = LoaderConfig {
            max_duration_secs: 2.0,
            ..LoaderConfig::default()
        };
        let result = Waveform::new(sine(16_000, 3.0, 0.5), 16_000, &config);
        assert!(matches!(result, Err(AudioError::TooLong { .. })));
    }

    #[test]
    fn test_zero_amplitude_is_silent() {
        let config = LoaderConfig::default();
        let result = Waveform::new(vec![0.0; 16_000], 16_000, &config);
        match result {
            Err(AudioError::Silent { rms, floor }) => {
                assert_eq!(rms, 0.0);
                assert_eq!(floor, 1e-4);
            }
            other => panic!("Expected Silent, got {:?}", other),
        }
    }

    #[test]
    fn test_duration_checked_before_silence() {
        let config = LoaderConfig::default();
        let result = Waveform::new(vec![0.0; 1_000], 16_000, &config);
        assert!(matches!(result, Err(AudioError::TooShort { .. })));
    }

    #[test]
    fn test_rms_of_empty_is_zero() {
        assert_eq!(rms(&[]), 0.0);
    }
}
