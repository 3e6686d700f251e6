// Audio module - decoding, resampling and the validated analysis waveform

pub mod loader;
pub mod resampler;
pub mod waveform;

// Re-export commonly used types for convenience
pub use loader::{decode_mono, DecodedAudio, WaveformLoader};
pub use resampler::resample_mono;
pub use waveform::{rms, Waveform};
