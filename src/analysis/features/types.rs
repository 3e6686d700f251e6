// Types module - Data structures for acoustic features
//
// This module defines the feature vector produced once per clip by the
// extractor and consumed by the heuristic classifier.

use serde::{Deserialize, Serialize};

/// Clip-level acoustic statistics
///
/// All statistics are computed over the same frame grid. The summary
/// fields drive classification; the remaining fields are diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Standard deviation of voiced-frame F0 estimates in Hz
    ///
    /// Synthetic speech tends toward monotone delivery (low values);
    /// natural intonation and micro-tremor raise it.
    pub pitch_variability: f32,

    /// Mean of per-frame spectral flatness (0 = tonal, 1 = noise-like)
    pub spectral_flatness_mean: f32,

    /// Variance of per-frame spectral flatness
    ///
    /// Unnaturally uniform flatness across frames is a synthetic marker.
    pub spectral_flatness_variance: f32,

    /// Per-coefficient MFCC variance across frames, averaged over c1..cN
    ///
    /// Low values mean static timbre; coarticulation and breath make
    /// natural speech drift.
    pub mfcc_variance_mean: f32,

    /// Mean per-frame RMS amplitude (overall loudness)
    pub rms_mean: f32,

    /// Variance of per-frame RMS amplitude (dynamic range)
    pub rms_variance: f32,

    /// Mean F0 across voiced frames in Hz
    #[serde(default)]
    pub pitch_mean: f32,

    /// Per-coefficient MFCC means (c0 first)
    #[serde(default)]
    pub mfcc_means: Vec<f32>,

    /// Per-coefficient MFCC variances (c0 first)
    #[serde(default)]
    pub mfcc_variances: Vec<f32>,

    /// Full frames analysed
    #[serde(default)]
    pub frame_count: usize,

    /// Frames with a detectable pitch
    #[serde(default)]
    pub voiced_frames: usize,
}

impl FeatureVector {
    /// Build a vector from the six summary statistics alone
    ///
    /// Diagnostic fields are left empty. Useful when features come from an
    /// external source or when exercising the classifier directly.
    pub fn from_summary(
        pitch_variability: f32,
        spectral_flatness_mean: f32,
        spectral_flatness_variance: f32,
        mfcc_variance_mean: f32,
        rms_mean: f32,
        rms_variance: f32,
    ) -> Self {
        Self {
            pitch_variability,
            spectral_flatness_mean,
            spectral_flatness_variance,
            mfcc_variance_mean,
            rms_mean,
            rms_variance,
            pitch_mean: 0.0,
            mfcc_means: Vec::new(),
            mfcc_variances: Vec::new(),
            frame_count: 0,
            voiced_frames: 0,
        }
    }
}
