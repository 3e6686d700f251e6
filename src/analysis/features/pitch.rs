// Pitch module - autocorrelation F0 estimation
//
// Each frame is mean-removed and correlated against itself over the lag
// range implied by the pitch floor and ceiling. The correlation at each lag
// is normalized by the energy of both overlapping segments, so a perfectly
// periodic frame scores 1.0 at its period regardless of loudness.
//
// Octave errors are avoided by taking the FIRST local maximum that reaches
// a fixed fraction of the global peak: a periodic signal correlates equally
// well at 2T, 3T, ... and only the shortest of those is the true period.
//
// References:
// - Boersma, P. (1993). Accurate short-term analysis of the fundamental
//   frequency and the harmonics-to-noise ratio of a sampled sound
// - Rabiner, L. (1977). On the use of autocorrelation analysis for pitch detection

/// Autocorrelation pitch detector for a single sample rate
#[derive(Debug, Clone)]
pub struct PitchEstimator {
    sample_rate: u32,
    min_lag: usize,
    max_lag: usize,
    voicing_threshold: f32,
    octave_tolerance: f32,
}

impl PitchEstimator {
    /// # Arguments
    /// * `sample_rate` - Audio sample rate in Hz
    /// * `floor_hz` - Lowest detectable F0 (sets the longest lag)
    /// * `ceiling_hz` - Highest detectable F0 (sets the shortest lag)
    /// * `voicing_threshold` - Minimum normalized correlation peak
    /// * `octave_tolerance` - Fraction of the global peak the chosen lag must reach
    pub fn new(
        sample_rate: u32,
        floor_hz: f32,
        ceiling_hz: f32,
        voicing_threshold: f32,
        octave_tolerance: f32,
    ) -> Self {
        let rate = sample_rate as f32;
        let min_lag = ((rate / ceiling_hz.max(1.0)).floor() as usize).max(2);
        let max_lag = ((rate / floor_hz.max(1.0)).ceil() as usize).max(min_lag + 2);
        Self {
            sample_rate,
            min_lag,
            max_lag,
            voicing_threshold,
            octave_tolerance,
        }
    }

    /// Shortest and longest lag searched, in samples
    pub fn lag_range(&self) -> (usize, usize) {
        (self.min_lag, self.max_lag)
    }

    /// Estimate the fundamental frequency of `frame`
    ///
    /// # Returns
    /// `Some(f0_hz)` for a voiced frame, `None` when no lag correlates
    /// strongly enough (unvoiced, noisy, or too short for the lag range)
    pub fn estimate(&self, frame: &[f32]) -> Option<f32> {
        let n = frame.len();
        // Keep at least a quarter of the frame overlapping at the longest lag
        let max_lag = self.max_lag.min(n - n / 4);
        if n < 4 || max_lag < self.min_lag + 1 {
            return None;
        }

        let mean = frame.iter().map(|&s| s as f64).sum::<f64>() / n as f64;
        let x: Vec<f64> = frame.iter().map(|&s| s as f64 - mean).collect();

        // prefix[i] = sum of x[..i]^2
        let mut prefix = Vec::with_capacity(n + 1);
        prefix.push(0.0f64);
        for &v in &x {
            let last = prefix[prefix.len() - 1];
            prefix.push(last + v * v);
        }
        if prefix[n] <= f64::EPSILON {
            return None;
        }

        // Correlations for min_lag-1 ..= max_lag+1 so every candidate has neighbours
        let lo = self.min_lag - 1;
        let hi = (max_lag + 1).min(n - 1);
        let r: Vec<f64> = (lo..=hi)
            .map(|lag| {
                let overlap = n - lag;
                let cross: f64 = x[..overlap]
                    .iter()
                    .zip(&x[lag..])
                    .map(|(a, b)| a * b)
                    .sum();
                let head = prefix[overlap];
                let tail = prefix[n] - prefix[lag];
                let denom = (head * tail).sqrt();
                if denom > f64::EPSILON {
                    cross / denom
                } else {
                    0.0
                }
            })
            .collect();
        let at = |lag: usize| r[lag - lo];

        let search_end = max_lag.min(hi - 1);
        let peak = (self.min_lag..=search_end)
            .map(at)
            .fold(f64::NEG_INFINITY, f64::max);
        if !(peak >= self.voicing_threshold as f64) {
            return None;
        }

        let target = peak * self.octave_tolerance as f64;
        let lag = (self.min_lag..=search_end)
            .find(|&lag| at(lag) >= target && at(lag) >= at(lag - 1) && at(lag) >= at(lag + 1))?;

        // Parabolic interpolation around the integer peak
        let (a, b, c) = (at(lag - 1), at(lag), at(lag + 1));
        let curvature = a - 2.0 * b + c;
        let offset = if curvature.abs() > 1e-12 {
            (0.5 * (a - c) / curvature).clamp(-0.5, 0.5)
        } else {
            0.0
        };

        let period = lag as f64 + offset;
        Some((self.sample_rate as f64 / period) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn estimator() -> PitchEstimator {
        PitchEstimator::new(16_000, 65.0, 600.0, 0.5, 0.9)
    }

    fn harmonic_frame(f0: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| {
                let t = i as f32 / 16_000.0;
                (1..=4)
                    .map(|k| (2.0 * std::f32::consts::PI * f0 * k as f32 * t).sin() / k as f32)
                    .sum()
            })
            .collect()
    }

    #[test]
    fn test_lag_range_at_16k() {
        let (min_lag, max_lag) = estimator().lag_range();
        assert_eq!(min_lag, 26);
        assert_eq!(max_lag, 247);
    }

    #[test]
    fn test_pure_tone_pitch() {
        let frame: Vec<f32> = (0..400)
            .map(|i| (2.0 * std::f32::consts::PI * 200.0 * i as f32 / 16_000.0).sin())
            .collect();
        let f0 = estimator().estimate(&frame).expect("sine should be voiced");
        assert!((f0 - 200.0).abs() < 1.0, "Expected ~200 Hz, got {}", f0);
    }

    #[test]
    fn test_harmonic_tones_avoid_octave_errors() {
        for &f0 in &[90.0f32, 140.0, 220.0, 310.0] {
            let estimate = estimator()
                .estimate(&harmonic_frame(f0, 400))
                .expect("harmonic tone should be voiced");
            assert!(
                (estimate - f0).abs() / f0 < 0.03,
                "Expected ~{} Hz, got {}",
                f0,
                estimate
            );
        }
    }

    #[test]
    fn test_pitch_is_amplitude_invariant() {
        let loud = harmonic_frame(150.0, 400);
        let quiet: Vec<f32> = loud.iter().map(|s| s * 0.01).collect();
        let a = estimator().estimate(&loud).unwrap();
        let b = estimator().estimate(&quiet).unwrap();
        assert!((a - b).abs() < 1e-3);
    }

    #[test]
    fn test_noise_is_unvoiced() {
        let mut rng = StdRng::seed_from_u64(3);
        let noise: Vec<f32> = (0..400).map(|_| rng.gen_range(-1.0..1.0)).collect();
        assert_eq!(estimator().estimate(&noise), None);
    }

    #[test]
    fn test_silence_and_tiny_frames_are_unvoiced() {
        assert_eq!(estimator().estimate(&[0.0; 400]), None);
        assert_eq!(estimator().estimate(&[0.3; 3]), None);
        assert_eq!(estimator().estimate(&harmonic_frame(200.0, 30)), None);
    }
}
