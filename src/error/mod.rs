// Error types for the voice classification engine
//
// Every failure the engine can report is an input condition: undecodable,
// too short, too long, silent, or without enough voiced speech. None of
// them are retryable. Each carries a stable numeric code so transport
// layers can map them without matching on message text.

mod analysis;
mod audio;

pub use analysis::{ConfigError, ConfigErrorCodes, FeatureError, FeatureErrorCodes};
pub use audio::{AudioError, AudioErrorCodes};

use log::error;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the CLI and HTTP boundaries.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}

/// Coarse error category for transport mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Decode,
    TooShort,
    TooLong,
    Silent,
    InsufficientVoicedFrames,
}

/// Any failure surfaced by `ClassificationService::evaluate`
///
/// Component errors are carried unchanged; this enum only records which
/// stage produced them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectionError {
    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Features(#[from] FeatureError),
}

impl DetectionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DetectionError::Audio(AudioError::Decode { .. }) => ErrorKind::Decode,
            DetectionError::Audio(AudioError::TooShort { .. }) => ErrorKind::TooShort,
            DetectionError::Audio(AudioError::TooLong { .. }) => ErrorKind::TooLong,
            DetectionError::Audio(AudioError::Silent { .. }) => ErrorKind::Silent,
            DetectionError::Features(FeatureError::InsufficientVoicedFrames { .. }) => {
                ErrorKind::InsufficientVoicedFrames
            }
        }
    }
}

impl ErrorCode for DetectionError {
    fn code(&self) -> i32 {
        match self {
            DetectionError::Audio(err) => err.code(),
            DetectionError::Features(err) => err.code(),
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}

/// Log a detection error with structured context
///
/// Fields: error code, failing stage (`kind`), message, and the caller's
/// context string. The logging is non-blocking and will not panic.
pub fn log_detection_error(err: &DetectionError, context: &str) {
    error!(
        "Detection error in {}: code={}, kind={:?}, message={}",
        context,
        err.code(),
        err.kind(),
        err.message()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_error_kind_mapping() {
        let decode: DetectionError = AudioError::Decode {
            reason: "bad header".to_string(),
        }
        .into();
        assert_eq!(decode.kind(), ErrorKind::Decode);

        let silent: DetectionError = AudioError::Silent {
            rms: 0.0,
            floor: 1e-4,
        }
        .into();
        assert_eq!(silent.kind(), ErrorKind::Silent);

        let voiced: DetectionError = FeatureError::InsufficientVoicedFrames {
            required: 10,
            voiced: 2,
            frames: 100,
        }
        .into();
        assert_eq!(voiced.kind(), ErrorKind::InsufficientVoicedFrames);
    }

    #[test]
    fn test_detection_error_preserves_inner_code_and_message() {
        let inner = AudioError::TooShort {
            duration_secs: 0.2,
            min_secs: 0.5,
        };
        let wrapped = DetectionError::from(inner.clone());
        assert_eq!(wrapped.code(), inner.code());
        assert_eq!(wrapped.message(), inner.message());
        assert_eq!(wrapped, DetectionError::Audio(inner));
    }

    #[test]
    fn test_error_code_trait_object() {
        let err: &dyn ErrorCode = &DetectionError::from(AudioError::TooLong {
            duration_secs: 61.0,
            max_secs: 60.0,
        });
        assert_eq!(err.code(), AudioErrorCodes::TOO_LONG);
    }

    #[test]
    fn test_error_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::InsufficientVoicedFrames).unwrap();
        assert_eq!(json, "\"insufficient_voiced_frames\"");
    }
}
