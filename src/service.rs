// ClassificationService - single entry point for request layers
//
// Composes WaveformLoader -> FeatureExtractor -> HeuristicClassifier.
// Component errors pass through unchanged (only tagged with their stage by
// `DetectionError`); there is no local recovery and no retry.

use crate::analysis::features::FeatureVector;
use crate::analysis::{ClassificationResult, FeatureExtractor, HeuristicClassifier};
use crate::audio::{Waveform, WaveformLoader};
use crate::config::AppConfig;
use crate::error::{log_detection_error, ConfigError, DetectionError};
use tracing::{debug, info};

/// Stateless classification pipeline
///
/// Holds only immutable configuration and precomputed DSP tables, so it is
/// `Send + Sync` and meant to be shared behind an `Arc`.
pub struct ClassificationService {
    loader: WaveformLoader,
    extractor: FeatureExtractor,
    classifier: HeuristicClassifier,
}

impl ClassificationService {
    /// Build the pipeline from configuration
    ///
    /// # Errors
    /// Returns `ConfigError` when the classifier thresholds or weights are
    /// malformed.
    pub fn new(config: &AppConfig) -> Result<Self, ConfigError> {
        config.classifier.validate()?;

        Ok(Self {
            loader: WaveformLoader::new(config.loader.clone()),
            extractor: FeatureExtractor::new(
                config.loader.target_sample_rate,
                config.extraction.clone(),
            ),
            classifier: HeuristicClassifier::new(config.classifier.clone()),
        })
    }

    pub fn loader(&self) -> &WaveformLoader {
        &self.loader
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    pub fn classifier(&self) -> &HeuristicClassifier {
        &self.classifier
    }

    /// Classify an encoded audio clip
    ///
    /// # Arguments
    /// * `audio_bytes` - Complete audio file (MP3, WAV, FLAC, OGG, ...)
    ///
    /// # Returns
    /// The verdict, or the first component error encountered
    pub fn evaluate(&self, audio_bytes: &[u8]) -> Result<ClassificationResult, DetectionError> {
        let waveform = self.load(audio_bytes)?;
        self.evaluate_waveform(&waveform)
    }

    /// Classify an already-decoded waveform
    pub fn evaluate_waveform(
        &self,
        waveform: &Waveform,
    ) -> Result<ClassificationResult, DetectionError> {
        let features = self.features_for(waveform)?;
        let result = self.classifier.classify(&features);

        info!(
            "[ClassificationService] {} (p_human={:.3}, confidence={:.3}, voiced={}/{})",
            result.label,
            result.human_probability,
            result.confidence,
            features.voiced_frames,
            features.frame_count
        );
        Ok(result)
    }

    /// Decode and extract without classifying
    pub fn extract(&self, audio_bytes: &[u8]) -> Result<FeatureVector, DetectionError> {
        let waveform = self.load(audio_bytes)?;
        self.features_for(&waveform)
    }

    fn load(&self, audio_bytes: &[u8]) -> Result<Waveform, DetectionError> {
        let waveform = self.loader.load(audio_bytes).map_err(|err| {
            let err = DetectionError::from(err);
            log_detection_error(&err, "load");
            err
        })?;
        debug!(
            "[ClassificationService] Loaded {:.2}s at {} Hz",
            waveform.duration_secs(),
            waveform.sample_rate()
        );
        Ok(waveform)
    }

    fn features_for(&self, waveform: &Waveform) -> Result<FeatureVector, DetectionError> {
        self.extractor.extract(waveform).map_err(|err| {
            let err = DetectionError::from(err);
            log_detection_error(&err, "extract");
            err
        })
    }
}

impl Default for ClassificationService {
    fn default() -> Self {
        let config = AppConfig::default();
        Self {
            loader: WaveformLoader::new(config.loader.clone()),
            extractor: FeatureExtractor::new(config.loader.target_sample_rate, config.extraction),
            classifier: HeuristicClassifier::new(config.classifier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::VoiceLabel;
    use crate::error::ErrorKind;
    use crate::testing::fixtures::{SyntheticPattern, SyntheticSpec};

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_service_is_shareable() {
        assert_send_sync::<ClassificationService>();
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = AppConfig::default();
        config.classifier.rms.weight = 0.5;
        assert!(matches!(
            ClassificationService::new(&config),
            Err(ConfigError::InvalidWeights { .. })
        ));
    }

    #[test]
    fn test_steady_tone_is_synthetic() {
        let wav = SyntheticSpec::new(SyntheticPattern::Sine, 16_000, 3_000)
            .to_wav()
            .unwrap();
        let result = ClassificationService::default().evaluate(&wav).unwrap();

        assert_eq!(result.label, VoiceLabel::AiGenerated);
        assert!(result.confidence >= 0.6);
    }

    #[test]
    fn test_errors_pass_through() {
        let service = ClassificationService::default();

        let err = service.evaluate(b"not audio at all").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);

        let silence = SyntheticSpec::new(SyntheticPattern::Silence, 16_000, 1_000)
            .to_wav()
            .unwrap();
        assert_eq!(service.evaluate(&silence).unwrap_err().kind(), ErrorKind::Silent);
    }

    #[test]
    fn test_extract_matches_evaluate_inputs() {
        let wav = SyntheticSpec::new(SyntheticPattern::JitteredVoice, 16_000, 2_000)
            .to_wav()
            .unwrap();
        let service = ClassificationService::default();
        let features = service.extract(&wav).unwrap();
        let expected = service.classifier().classify(&features);
        assert_eq!(service.evaluate(&wav).unwrap(), expected);
    }
}
