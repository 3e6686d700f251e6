// Analysis module - feature extraction and heuristic classification
//
// Pipeline: Waveform -> FeatureExtractor -> FeatureVector
//           -> HeuristicClassifier -> ClassificationResult
//
// Both stages are synchronous and hold no mutable state, so a single
// instance can serve concurrent callers behind an `Arc`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod classifier;
pub mod features;

pub use classifier::{HeuristicClassifier, VoiceLabel};
pub use features::{FeatureExtractor, FeatureVector};

/// Decimal places kept in serialized responses
const RESPONSE_DECIMALS: i32 = 4;

/// Verdict for one clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// HUMAN or AI_GENERATED
    pub label: VoiceLabel,
    /// Decisiveness of the verdict (0 = coin flip, 1 = certain)
    pub confidence: f32,
    /// Weighted sum of sub-scores (0.0-1.0)
    pub human_probability: f32,
    /// Reasons in scorer order; never empty
    pub explanation: Vec<String>,
    /// Feature family name -> sub-score (0.0-1.0)
    pub sub_scores: BTreeMap<String, f32>,
}

/// Wire shape of a classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResponse {
    pub classification: VoiceLabel,
    pub confidence: f64,
    pub explanation: Vec<String>,
    /// `human_probability` plus one `<feature>_score` entry per family
    pub details: BTreeMap<String, f64>,
}

impl ClassificationResult {
    /// Convert to the response shape with floats rounded to 4 decimals
    pub fn to_response(&self) -> DetectionResponse {
        let mut details = BTreeMap::new();
        details.insert(
            "human_probability".to_string(),
            round_decimals(self.human_probability),
        );
        for (name, score) in &self.sub_scores {
            details.insert(format!("{}_score", name), round_decimals(*score));
        }

        DetectionResponse {
            classification: self.label,
            confidence: round_decimals(self.confidence),
            explanation: self.explanation.clone(),
            details,
        }
    }
}

/// Round to [`RESPONSE_DECIMALS`] places in f64
pub fn round_decimals(value: f32) -> f64 {
    let scale = 10f64.powi(RESPONSE_DECIMALS);
    (value as f64 * scale).round() / scale
}
