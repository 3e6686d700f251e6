// Feature extraction and configuration error types

use crate::error::ErrorCode;
use thiserror::Error;

/// Feature extraction error code constants
///
/// Error code range: 2001
pub struct FeatureErrorCodes {}

impl FeatureErrorCodes {
    /// Too few frames carried a detectable pitch
    pub const INSUFFICIENT_VOICED_FRAMES: i32 = 2001;
}

/// Errors raised by the feature extractor
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Pitch variability cannot be estimated reliably
    #[error("Insufficient voiced frames: need {required}, found {voiced} of {frames}")]
    InsufficientVoicedFrames {
        required: usize,
        voiced: usize,
        frames: usize,
    },
}

impl ErrorCode for FeatureError {
    fn code(&self) -> i32 {
        match self {
            FeatureError::InsufficientVoicedFrames { .. } => {
                FeatureErrorCodes::INSUFFICIENT_VOICED_FRAMES
            }
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}

/// Configuration error code constants
///
/// Error code range: 3001-3006
pub struct ConfigErrorCodes {}

impl ConfigErrorCodes {
    pub const INVALID_WEIGHTS: i32 = 3001;
    pub const INVALID_THRESHOLDS: i32 = 3002;
    pub const NEGATIVE_WEIGHT: i32 = 3003;
    pub const INVALID_CUTOFF: i32 = 3004;
    pub const READ: i32 = 3005;
    pub const PARSE: i32 = 3006;
}

/// Errors raised while loading or validating configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Classifier weights must sum to 1.0 (got {sum})")]
    InvalidWeights { sum: f32 },

    #[error("Threshold for {feature} must satisfy low < high (got {low} >= {high})")]
    InvalidThresholds {
        feature: String,
        low: f32,
        high: f32,
    },

    #[error("Weight for {feature} must be non-negative (got {weight})")]
    NegativeWeight { feature: String, weight: f32 },

    #[error("Weak-evidence cutoff must lie in [0, 1] (got {cutoff})")]
    InvalidCutoff { cutoff: f32 },

    #[error("Failed to read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to parse config JSON: {reason}")]
    Parse { reason: String },
}

impl ErrorCode for ConfigError {
    fn code(&self) -> i32 {
        match self {
            ConfigError::InvalidWeights { .. } => ConfigErrorCodes::INVALID_WEIGHTS,
            ConfigError::InvalidThresholds { .. } => ConfigErrorCodes::INVALID_THRESHOLDS,
            ConfigError::NegativeWeight { .. } => ConfigErrorCodes::NEGATIVE_WEIGHT,
            ConfigError::InvalidCutoff { .. } => ConfigErrorCodes::INVALID_CUTOFF,
            ConfigError::Read { .. } => ConfigErrorCodes::READ,
            ConfigError::Parse { .. } => ConfigErrorCodes::PARSE,
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_error_code_and_message() {
        let err = FeatureError::InsufficientVoicedFrames {
            required: 10,
            voiced: 3,
            frames: 48,
        };
        assert_eq!(err.code(), 2001);
        assert!(err.message().contains("need 10"));
        assert!(err.message().contains("found 3 of 48"));
    }

    #[test]
    fn test_config_error_codes() {
        assert_eq!(ConfigError::InvalidWeights { sum: 1.2 }.code(), 3001);
        assert_eq!(
            ConfigError::InvalidThresholds {
                feature: "pitch".to_string(),
                low: 2.0,
                high: 1.0
            }
            .code(),
            3002
        );
        assert_eq!(ConfigError::InvalidCutoff { cutoff: 2.0 }.code(), 3004);
        assert_eq!(
            ConfigError::Parse {
                reason: "eof".to_string()
            }
            .code(),
            3006
        );
    }
}
