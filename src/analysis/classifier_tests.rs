use super::*;

/// Helper to build a feature vector from the four scored statistics
fn create_features(pitch: f32, flatness_var: f32, mfcc_var: f32, rms_var: f32) -> FeatureVector {
    FeatureVector::from_summary(pitch, 0.2, flatness_var, mfcc_var, 0.1, rms_var)
}

fn clearly_human() -> FeatureVector {
    create_features(60.0, 0.05, 80.0, 0.02)
}

fn clearly_synthetic() -> FeatureVector {
    create_features(1.0, 0.0001, 1.0, 0.0001)
}

#[test]
fn test_interpolate_clamps_and_is_linear() {
    assert_eq!(interpolate(0.0, 8.0, 35.0), 0.0);
    assert_eq!(interpolate(8.0, 8.0, 35.0), 0.0);
    assert_eq!(interpolate(35.0, 8.0, 35.0), 1.0);
    assert_eq!(interpolate(500.0, 8.0, 35.0), 1.0);
    assert!((interpolate(21.5, 8.0, 35.0) - 0.5).abs() < 1e-6);
    assert_eq!(interpolate(f32::NAN, 8.0, 35.0), 0.0);
}

#[test]
fn test_default_weights_sum_to_one() {
    let classifier = HeuristicClassifier::default();
    let sum: f32 = classifier.scorers().iter().map(|s| s.threshold.weight).sum();
    assert!((sum - 1.0).abs() < 1e-6, "weights sum to {}", sum);
}

#[test]
fn test_scorer_order_is_fixed() {
    let classifier = HeuristicClassifier::default();
    let families: Vec<FeatureFamily> = classifier.scorers().iter().map(|s| s.family).collect();
    assert_eq!(families, FeatureFamily::ORDER.to_vec());
}

#[test]
fn test_clearly_human() {
    let result = HeuristicClassifier::default().classify(&clearly_human());

    assert_eq!(result.label, VoiceLabel::Human);
    assert!((result.human_probability - 1.0).abs() < 1e-6);
    assert!((result.confidence - 1.0).abs() < 1e-6);
    assert_eq!(result.explanation, vec![HUMAN_FALLBACK.to_string()]);
}

#[test]
fn test_clearly_synthetic() {
    let result = HeuristicClassifier::default().classify(&clearly_synthetic());

    assert_eq!(result.label, VoiceLabel::AiGenerated);
    assert_eq!(result.human_probability, 0.0);
    assert!((result.confidence - 1.0).abs() < 1e-6);
    let expected: Vec<String> = FeatureFamily::ORDER
        .iter()
        .map(|f| f.reason().to_string())
        .collect();
    assert_eq!(result.explanation, expected);
}

#[test]
fn test_synthetic_fallback_without_weak_features() {
    // Every sub-score at 0.4 (>= 0.35 cutoff) yields p = 0.4
    let features = create_features(
        8.0 + 0.4 * 27.0,
        0.002 + 0.4 * 0.018,
        5.0 + 0.4 * 35.0,
        0.0005 + 0.4 * 0.0095,
    );
    let result = HeuristicClassifier::default().classify(&features);

    assert_eq!(result.label, VoiceLabel::AiGenerated);
    assert!((result.human_probability - 0.4).abs() < 1e-4);
    assert!((result.confidence - 0.2).abs() < 1e-3);
    assert_eq!(result.explanation, vec![SYNTHETIC_FALLBACK.to_string()]);
}

#[test]
fn test_boundary_is_human() {
    let mut config = ClassifierConfig::default();
    config.pitch.weight = 0.5;
    config.spectral_flatness.weight = 0.5;
    config.mfcc.weight = 0.0;
    config.rms.weight = 0.0;
    let classifier = HeuristicClassifier::new(config);

    // Pitch scores 1, flatness scores 0: p is exactly 0.5
    let result = classifier.classify(&create_features(100.0, 0.0, 0.0, 0.0));
    assert_eq!(result.human_probability, 0.5);
    assert_eq!(result.label, VoiceLabel::Human);
    assert_eq!(result.confidence, 0.0);
}

#[test]
fn test_explanations_match_weak_sub_scores() {
    let classifier = HeuristicClassifier::default();
    let cases = [
        create_features(2.0, 0.05, 80.0, 0.02),
        create_features(60.0, 0.0, 80.0, 0.0),
        create_features(15.0, 0.005, 10.0, 0.004),
        create_features(30.0, 0.001, 50.0, 0.0001),
    ];

    for features in &cases {
        let result = classifier.classify(features);
        let weak: Vec<String> = classifier
            .score_all(features)
            .iter()
            .filter(|s| s.value < classifier.config().weak_evidence_cutoff)
            .map(|s| s.reason.to_string())
            .collect();

        if weak.is_empty() {
            assert_eq!(result.explanation.len(), 1);
            assert!(
                result.explanation[0] == HUMAN_FALLBACK
                    || result.explanation[0] == SYNTHETIC_FALLBACK
            );
        } else {
            assert_eq!(result.explanation, weak);
        }
    }
}

#[test]
fn test_pitch_variability_monotonic() {
    let classifier = HeuristicClassifier::default();
    let mut previous = -1.0f32;
    for step in 0..60 {
        let pitch = step as f32 * 1.0;
        let p = classifier
            .classify(&create_features(pitch, 0.01, 20.0, 0.003))
            .human_probability;
        assert!(p >= previous, "p dropped at pitch {}: {} < {}", pitch, p, previous);
        previous = p;
    }
}

#[test]
fn test_ranges_hold_for_extreme_inputs() {
    let classifier = HeuristicClassifier::default();
    let values = [f32::NEG_INFINITY, -1.0, 0.0, 1e-4, 0.5, 10.0, 1e6, f32::INFINITY, f32::NAN];

    for &v in &values {
        let result = classifier.classify(&create_features(v, v, v, v));
        assert!((0.0..=1.0).contains(&result.human_probability));
        assert!((0.0..=1.0).contains(&result.confidence));
        assert!(!result.explanation.is_empty());
        for score in result.sub_scores.values() {
            assert!((0.0..=1.0).contains(score));
        }
    }
}

#[test]
fn test_sub_score_map_keys() {
    let result = HeuristicClassifier::default().classify(&clearly_human());
    let keys: Vec<&str> = result.sub_scores.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["mfcc", "pitch", "rms", "spectral_flatness"]);
}

#[test]
fn test_classification_is_deterministic() {
    let classifier = HeuristicClassifier::default();
    let features = create_features(20.0, 0.008, 22.0, 0.004);
    assert_eq!(classifier.classify(&features), classifier.classify(&features));
}

#[test]
fn test_label_serialization() {
    assert_eq!(serde_json::to_string(&VoiceLabel::Human).unwrap(), "\"HUMAN\"");
    assert_eq!(
        serde_json::to_string(&VoiceLabel::AiGenerated).unwrap(),
        "\"AI_GENERATED\""
    );
    assert_eq!(VoiceLabel::AiGenerated.to_string(), "AI_GENERATED");
}
