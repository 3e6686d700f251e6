use super::*;

#[test]
fn sine_render_has_expected_length_and_peak() {
    let spec = SyntheticSpec::new(SyntheticPattern::Sine, 16_000, 500).with_amplitude(0.25);
    let samples = spec.render();
    assert_eq!(samples.len(), 8_000);
    let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    assert!((peak - 0.25).abs() < 1e-3, "peak {}", peak);
}

#[test]
fn sine_at_200hz_repeats_every_80_samples() {
    let samples = SyntheticSpec::new(SyntheticPattern::Sine, 16_000, 100).render();
    for i in 0..(samples.len() - 80) {
        assert!((samples[i] - samples[i + 80]).abs() < 1e-5);
    }
}

#[test]
fn seeded_patterns_are_deterministic() {
    for pattern in [SyntheticPattern::WhiteNoise, SyntheticPattern::JitteredVoice] {
        let a = SyntheticSpec::new(pattern, 16_000, 1_000).render();
        let b = SyntheticSpec::new(pattern, 16_000, 1_000).render();
        assert_eq!(a, b, "{:?} should render identically", pattern);

        let c = SyntheticSpec::new(pattern, 16_000, 1_000)
            .with_seed(7)
            .render();
        assert_ne!(a, c, "{:?} should depend on the seed", pattern);
    }
}

#[test]
fn jittered_voice_stays_in_range() {
    let samples = SyntheticSpec::new(SyntheticPattern::JitteredVoice, 16_000, 3_000).render();
    assert_eq!(samples.len(), 48_000);
    assert!(samples.iter().all(|s| s.abs() <= 0.5 + 1e-6));
}

#[test]
fn silence_is_all_zero() {
    let samples = SyntheticSpec::new(SyntheticPattern::Silence, 16_000, 250).render();
    assert!(samples.iter().all(|&s| s == 0.0));
}

#[test]
fn encode_wav_round_trips_through_hound() {
    let spec = SyntheticSpec::new(SyntheticPattern::Sine, 22_050, 200);
    let bytes = spec.to_wav().unwrap();
    let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(reader.spec().sample_rate, 22_050);
    assert_eq!(reader.spec().channels, 1);
    assert_eq!(reader.len() as usize, spec.total_samples());
}

#[test]
fn spec_deserializes_with_defaults() {
    let spec: SyntheticSpec = serde_json::from_str(r#"{ "pattern": "jittered_voice" }"#).unwrap();
    assert_eq!(spec.pattern, SyntheticPattern::JitteredVoice);
    assert_eq!(spec.sample_rate, 16_000);
    assert_eq!(spec.duration_ms, 3_000);
}
