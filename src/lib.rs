// Voice Origin - acoustic heuristics for human vs. synthetic speech
// Decode -> frame-level DSP features -> weighted heuristic verdict

// Module declarations
pub mod analysis;
pub mod audio;
pub mod config;
pub mod error;
pub mod service;
pub mod testing;

#[cfg(feature = "http")]
pub mod http;

// Re-exports for convenience
pub use analysis::{ClassificationResult, DetectionResponse, FeatureVector, VoiceLabel};
pub use config::AppConfig;
pub use error::{DetectionError, ErrorCode, ErrorKind};
pub use service::ClassificationService;
