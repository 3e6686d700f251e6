// Classifier - heuristic human vs. synthetic voice scoring
//
// Each feature family is scored independently: a pure measure reads one
// statistic from the FeatureVector and a two-point threshold maps it to a
// sub-score in [0,1] (0 = clearly synthetic, 1 = clearly human). The
// weighted sum of sub-scores is the probability that the voice is human.
//
// Scorers run in a fixed order (pitch, spectral flatness, MFCC, RMS) and
// the explanation list follows that order, so identical features always
// produce identical output.

use crate::analysis::features::FeatureVector;
use crate::analysis::ClassificationResult;
use crate::config::{ClassifierConfig, FeatureThreshold};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fallback explanation for a synthetic verdict without weak features
pub const SYNTHETIC_FALLBACK: &str = "Overall acoustic features lean towards synthetic patterns.";

/// Fallback explanation for a human verdict without weak features
pub const HUMAN_FALLBACK: &str = "Overall acoustic features lean towards human patterns.";

/// Human-likelihood at or above which the label is `Human`
pub const DECISION_BOUNDARY: f32 = 0.5;

/// Discrete verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoiceLabel {
    /// Voice produced by a person
    Human,
    /// Voice produced by a speech synthesizer
    AiGenerated,
}

impl VoiceLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceLabel::Human => "HUMAN",
            VoiceLabel::AiGenerated => "AI_GENERATED",
        }
    }
}

impl fmt::Display for VoiceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feature family scored by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureFamily {
    Pitch,
    SpectralFlatness,
    Mfcc,
    Rms,
}

impl FeatureFamily {
    /// Evaluation order
    pub const ORDER: [FeatureFamily; 4] = [
        FeatureFamily::Pitch,
        FeatureFamily::SpectralFlatness,
        FeatureFamily::Mfcc,
        FeatureFamily::Rms,
    ];

    /// Stable name used in sub-score maps and responses
    pub fn name(&self) -> &'static str {
        match self {
            FeatureFamily::Pitch => "pitch",
            FeatureFamily::SpectralFlatness => "spectral_flatness",
            FeatureFamily::Mfcc => "mfcc",
            FeatureFamily::Rms => "rms",
        }
    }

    /// Explanation emitted when this family's evidence is weak
    pub fn reason(&self) -> &'static str {
        match self {
            FeatureFamily::Pitch => "Low pitch variability suggests monotonic/robotic speech.",
            FeatureFamily::SpectralFlatness => {
                "Uniform spectral flatness across frames suggests synthetic generation."
            }
            FeatureFamily::Mfcc => {
                "Low spectral variance indicates lack of natural acoustic richness."
            }
            FeatureFamily::Rms => "Compressed loudness dynamics suggest synthetic speech.",
        }
    }

    /// Raw statistic this family is scored on
    pub fn measure(&self, features: &FeatureVector) -> f32 {
        match self {
            FeatureFamily::Pitch => features.pitch_variability,
            FeatureFamily::SpectralFlatness => features.spectral_flatness_variance,
            FeatureFamily::Mfcc => features.mfcc_variance_mean,
            FeatureFamily::Rms => features.rms_variance,
        }
    }
}

/// One family's normalized evidence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScore {
    pub family: FeatureFamily,
    /// Human-likeness in [0,1]
    pub value: f32,
    pub weight: f32,
    pub reason: &'static str,
}

/// Named scorer: a pure measure plus its threshold mapping
#[derive(Debug, Clone, Copy)]
pub struct FeatureScorer {
    pub family: FeatureFamily,
    pub threshold: FeatureThreshold,
}

impl FeatureScorer {
    pub fn score(&self, features: &FeatureVector) -> SubScore {
        SubScore {
            family: self.family,
            value: interpolate(
                self.family.measure(features),
                self.threshold.low,
                self.threshold.high,
            ),
            weight: self.threshold.weight,
            reason: self.family.reason(),
        }
    }
}

/// Clamped linear map: `value <= low` -> 0, `value >= high` -> 1
///
/// A NaN value carries no human evidence and scores 0.
pub fn interpolate(value: f32, low: f32, high: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    if value <= low {
        return 0.0;
    }
    if value >= high {
        return 1.0;
    }
    ((value - low) / (high - low)).clamp(0.0, 1.0)
}

/// HeuristicClassifier combines per-family sub-scores into a verdict
///
/// The configuration is fixed at construction; `classify` is pure and
/// never fails.
#[derive(Debug, Clone)]
pub struct HeuristicClassifier {
    config: ClassifierConfig,
    scorers: [FeatureScorer; 4],
}

impl HeuristicClassifier {
    /// Create a classifier from an (already validated) configuration
    pub fn new(config: ClassifierConfig) -> Self {
        let scorers = FeatureFamily::ORDER.map(|family| FeatureScorer {
            family,
            threshold: threshold_for(&config, family),
        });
        Self { config, scorers }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Scorers in evaluation order
    pub fn scorers(&self) -> &[FeatureScorer] {
        &self.scorers
    }

    /// Sub-scores in evaluation order
    pub fn score_all(&self, features: &FeatureVector) -> Vec<SubScore> {
        self.scorers.iter().map(|s| s.score(features)).collect()
    }

    /// Classify a feature vector
    ///
    /// # Returns
    /// Label, confidence, human probability, explanation list (evaluation
    /// order) and the per-family sub-score map
    pub fn classify(&self, features: &FeatureVector) -> ClassificationResult {
        let sub_scores = self.score_all(features);

        let human_probability = sub_scores
            .iter()
            .map(|s| s.weight * s.value)
            .sum::<f32>()
            .clamp(0.0, 1.0);

        let label = if human_probability >= DECISION_BOUNDARY {
            VoiceLabel::Human
        } else {
            VoiceLabel::AiGenerated
        };
        let confidence = ((human_probability - DECISION_BOUNDARY).abs() * 2.0).clamp(0.0, 1.0);

        let explanation = explain(&sub_scores, label, self.config.weak_evidence_cutoff);

        let sub_scores: BTreeMap<String, f32> = sub_scores
            .iter()
            .map(|s| (s.family.name().to_string(), s.value))
            .collect();

        ClassificationResult {
            label,
            confidence,
            human_probability,
            explanation,
            sub_scores,
        }
    }
}

impl Default for HeuristicClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

/// Reasons for every sub-score strictly below `cutoff`, or a fallback
pub fn explain(sub_scores: &[SubScore], label: VoiceLabel, cutoff: f32) -> Vec<String> {
    let mut reasons: Vec<String> = sub_scores
        .iter()
        .filter(|s| s.value < cutoff)
        .map(|s| s.reason.to_string())
        .collect();

    if reasons.is_empty() {
        reasons.push(
            match label {
                VoiceLabel::AiGenerated => SYNTHETIC_FALLBACK,
                VoiceLabel::Human => HUMAN_FALLBACK,
            }
            .to_string(),
        );
    }
    reasons
}

fn threshold_for(config: &ClassifierConfig, family: FeatureFamily) -> FeatureThreshold {
    match family {
        FeatureFamily::Pitch => config.pitch,
        FeatureFamily::SpectralFlatness => config.spectral_flatness,
        FeatureFamily::Mfcc => config.mfcc,
        FeatureFamily::Rms => config.rms,
    }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
