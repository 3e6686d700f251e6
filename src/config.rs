//! Configuration management for the voice classification engine
//!
//! Every threshold, weight, and frame parameter used by the loader,
//! extractor, and classifier lives here as an explicit immutable value.
//! Components receive their section at construction; nothing reads a global
//! default at call time. Values can be tuned from a JSON file without
//! recompiling.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Languages accepted as request metadata by the HTTP layer.
pub const SUPPORTED_LANGUAGES: [&str; 5] = ["Tamil", "English", "Hindi", "Malayalam", "Telugu"];

/// Tolerance used when checking that classifier weights sum to 1.0
pub const WEIGHT_SUM_TOLERANCE: f32 = 1e-6;

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub loader: LoaderConfig,
    pub extraction: ExtractionConfig,
    pub classifier: ClassifierConfig,
    pub server: ServerConfig,
}

/// Decode and input validation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Analysis sample rate every input is resampled to (Hz)
    pub target_sample_rate: u32,
    /// Shortest accepted clip
    pub min_duration_secs: f32,
    /// Longest accepted clip
    pub max_duration_secs: f32,
    /// Overall RMS below which a clip counts as silent
    pub silence_rms: f32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: 16_000,
            min_duration_secs: 0.5,
            max_duration_secs: 60.0,
            silence_rms: 1e-4,
        }
    }
}

/// Frame grid and per-family DSP parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Analysis window length in milliseconds
    pub frame_ms: f32,
    /// Hop between consecutive windows in milliseconds
    pub hop_ms: f32,
    /// FFT size (frames are zero-padded up to this length)
    pub fft_size: usize,
    /// Number of cepstral coefficients per frame (c0 included)
    pub n_mfcc: usize,
    /// Number of triangular mel filters
    pub n_mels: usize,
    /// Lowest mel filter edge in Hz
    pub mel_fmin_hz: f32,
    /// Dynamic range kept in the log-mel spectrogram before the DCT
    pub top_db: f32,
    /// Lowest detectable fundamental frequency in Hz
    pub pitch_floor_hz: f32,
    /// Highest detectable fundamental frequency in Hz
    pub pitch_ceiling_hz: f32,
    /// Minimum normalized autocorrelation peak for a frame to count as voiced
    pub voicing_threshold: f32,
    /// Fraction of the global autocorrelation peak the chosen lag must reach
    pub octave_tolerance: f32,
    /// Absolute frame RMS below which a frame is never voiced
    ///
    /// Kept under the loader's silence floor: any clip loud enough to load
    /// is gated by `voicing_relative_floor` instead.
    pub voicing_rms_floor: f32,
    /// Frame RMS floor relative to the loudest frame of the clip
    pub voicing_relative_floor: f32,
    /// Voiced frames required to report pitch variability
    pub min_voiced_frames: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            frame_ms: 25.0,
            hop_ms: 10.0,
            fft_size: 512,
            n_mfcc: 13,
            n_mels: 40,
            mel_fmin_hz: 20.0,
            top_db: 80.0,
            // C2 (65.4 Hz) matches the lower bound commonly used for speech F0
            pitch_floor_hz: 65.0,
            pitch_ceiling_hz: 600.0,
            voicing_threshold: 0.5,
            octave_tolerance: 0.9,
            voicing_rms_floor: 1e-5,
            voicing_relative_floor: 0.1,
            min_voiced_frames: 10,
        }
    }
}

impl ExtractionConfig {
    /// Window length in samples at `sample_rate`
    pub fn frame_len(&self, sample_rate: u32) -> usize {
        ms_to_samples(self.frame_ms, sample_rate).max(2)
    }

    /// Hop length in samples at `sample_rate`
    pub fn hop_len(&self, sample_rate: u32) -> usize {
        ms_to_samples(self.hop_ms, sample_rate).max(1)
    }
}

fn ms_to_samples(ms: f32, sample_rate: u32) -> usize {
    ((ms / 1_000.0) * sample_rate as f32).round() as usize
}

/// Two-point monotone mapping from a raw feature value to a [0,1] sub-score
///
/// Values at or below `low` score 0 ("clearly synthetic"), values at or
/// above `high` score 1 ("clearly human"), linear in between.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureThreshold {
    pub low: f32,
    pub high: f32,
    pub weight: f32,
}

impl FeatureThreshold {
    pub const fn new(low: f32, high: f32, weight: f32) -> Self {
        Self { low, high, weight }
    }
}

/// Heuristic classifier thresholds, weights and explanation cutoff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Pitch variability (std-dev of voiced F0, Hz)
    pub pitch: FeatureThreshold,
    /// Variance of per-frame spectral flatness
    pub spectral_flatness: FeatureThreshold,
    /// Mean per-coefficient MFCC variance
    pub mfcc: FeatureThreshold,
    /// Variance of per-frame RMS energy
    pub rms: FeatureThreshold,
    /// Sub-scores strictly below this value contribute an explanation
    pub weak_evidence_cutoff: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            pitch: FeatureThreshold::new(8.0, 35.0, 0.35),
            spectral_flatness: FeatureThreshold::new(0.002, 0.02, 0.20),
            mfcc: FeatureThreshold::new(5.0, 40.0, 0.30),
            rms: FeatureThreshold::new(0.0005, 0.01, 0.15),
            weak_evidence_cutoff: 0.35,
        }
    }
}

impl ClassifierConfig {
    /// Thresholds in scorer evaluation order, paired with their feature name
    pub fn thresholds(&self) -> [(&'static str, FeatureThreshold); 4] {
        [
            ("pitch", self.pitch),
            ("spectral_flatness", self.spectral_flatness),
            ("mfcc", self.mfcc),
            ("rms", self.rms),
        ]
    }

    /// Sum of all feature weights
    pub fn weight_sum(&self) -> f32 {
        self.thresholds().iter().map(|(_, t)| t.weight).sum()
    }

    /// Check that the configuration describes a well-formed weighted vote
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (feature, threshold) in self.thresholds() {
            if !(threshold.low < threshold.high) {
                return Err(ConfigError::InvalidThresholds {
                    feature: feature.to_string(),
                    low: threshold.low,
                    high: threshold.high,
                });
            }
            if !(threshold.weight >= 0.0) {
                return Err(ConfigError::NegativeWeight {
                    feature: feature.to_string(),
                    weight: threshold.weight,
                });
            }
        }

        let sum = self.weight_sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::InvalidWeights { sum });
        }

        if !(0.0..=1.0).contains(&self.weak_evidence_cutoff) {
            return Err(ConfigError::InvalidCutoff {
                cutoff: self.weak_evidence_cutoff,
            });
        }

        Ok(())
    }
}

/// HTTP surface parameters (used with the `http` feature)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub addr: String,
    /// Upper bound on a single classification request
    pub request_timeout_secs: u64,
    /// Concurrent classifications; 0 means one per available CPU core
    pub max_concurrent_jobs: usize,
    /// Accepted values of the optional `language` request field
    pub supported_languages: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8000".to_string(),
            request_timeout_secs: 30,
            max_concurrent_jobs: 0,
            supported_languages: SUPPORTED_LANGUAGES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ServerConfig {
    /// Resolved worker count, falling back to the number of CPU cores
    pub fn worker_limit(&self) -> usize {
        if self.max_concurrent_jobs > 0 {
            self.max_concurrent_jobs
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Returns
    /// The parsed configuration, or the defaults when the file is missing
    /// or malformed (a warning is logged).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_load_from_file(&path) {
            Ok(config) => {
                tracing::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                config
            }
            Err(err) => {
                tracing::warn!("[Config] {}. Using defaults.", err);
                Self::default()
            }
        }
    }

    /// Load and validate configuration from JSON file, reporting failures
    pub fn try_load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        let config: AppConfig =
            serde_json::from_str(&contents).map_err(|err| ConfigError::Parse {
                reason: err.to_string(),
            })?;
        config.classifier.validate()?;
        Ok(config)
    }
}
