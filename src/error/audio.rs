// Audio input error types and constants

use crate::error::ErrorCode;
use thiserror::Error;

/// Audio input error code constants
///
/// Single source of truth for the numeric codes reported by the loader.
///
/// Error code range: 1001-1004
pub struct AudioErrorCodes {}

impl AudioErrorCodes {
    /// Byte stream is not a decodable audio container
    pub const DECODE: i32 = 1001;

    /// Clip is shorter than the configured minimum
    pub const TOO_SHORT: i32 = 1002;

    /// Clip is longer than the configured maximum
    pub const TOO_LONG: i32 = 1003;

    /// Clip RMS is below the silence floor
    pub const SILENT: i32 = 1004;
}

/// Errors raised while turning input bytes into an analysis waveform
///
/// All variants are permanent for a given input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AudioError {
    /// Byte stream is not a supported container or produced no samples
    #[error("Invalid audio format: {reason}")]
    Decode { reason: String },

    /// Clip duration below the configured minimum
    #[error("Audio is too short ({duration_secs:.3}s, min {min_secs}s)")]
    TooShort { duration_secs: f32, min_secs: f32 },

    /// Clip duration above the configured maximum
    #[error("Audio is too long ({duration_secs:.3}s, max {max_secs}s)")]
    TooLong { duration_secs: f32, max_secs: f32 },

    /// Overall RMS below the silence floor
    #[error("Audio is too silent (rms {rms:.2e} below floor {floor:.2e})")]
    Silent { rms: f32, floor: f32 },
}

impl AudioError {
    pub(crate) fn decode(reason: impl Into<String>) -> Self {
        AudioError::Decode {
            reason: reason.into(),
        }
    }
}

impl ErrorCode for AudioError {
    fn code(&self) -> i32 {
        match self {
            AudioError::Decode { .. } => AudioErrorCodes::DECODE,
            AudioError::TooShort { .. } => AudioErrorCodes::TOO_SHORT,
            AudioError::TooLong { .. } => AudioErrorCodes::TOO_LONG,
            AudioError::Silent { .. } => AudioErrorCodes::SILENT,
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}
