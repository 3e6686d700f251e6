// FeatureExtractor - clip-level acoustic statistics for voice origin analysis
//
// The waveform is cut into overlapping frames on a single grid. Every frame
// yields an RMS level, a spectral flatness value and a row of MFCCs; frames
// loud enough to be speech also get a pitch estimate. The per-frame series
// are then reduced to the summary statistics in `FeatureVector`.
//
// Module organization:
// - types: FeatureVector
// - temporal: frame grid and frame RMS
// - fft: windowed magnitude spectrum
// - spectral: spectral flatness
// - mfcc: mel filterbank and cepstral coefficients
// - pitch: autocorrelation F0 estimation
// - stats: mean / variance reductions
// - mod.rs: Coordinator (FeatureExtractor)

mod fft;
mod mfcc;
mod pitch;
mod spectral;
mod stats;
mod temporal;
mod types;

pub use fft::FftProcessor;
pub use mfcc::MelBank;
pub use pitch::PitchEstimator;
pub use spectral::compute_flatness;
pub use temporal::FrameGrid;
pub use types::FeatureVector;

use crate::audio::Waveform;
use crate::config::ExtractionConfig;
use crate::error::FeatureError;
use tracing::debug;

/// FeatureExtractor coordinates the per-frame DSP pipeline
///
/// All DSP state (FFT plan, window, mel filters, lag range) is built once
/// for a sample rate and reused for every clip. Extraction takes `&self`
/// and is safe to run from several threads at once.
pub struct FeatureExtractor {
    config: ExtractionConfig,
    sample_rate: u32,
    grid: FrameGrid,
    fft: FftProcessor,
    mel: MelBank,
    pitch: PitchEstimator,
}

impl FeatureExtractor {
    /// Create a new FeatureExtractor for waveforms at `sample_rate`
    ///
    /// # Arguments
    /// * `sample_rate` - Analysis sample rate in Hz (e.g., 16000)
    /// * `config` - Frame grid and DSP parameters
    pub fn new(sample_rate: u32, config: ExtractionConfig) -> Self {
        let sample_rate = sample_rate.max(1);
        let grid = FrameGrid::new(config.frame_len(sample_rate), config.hop_len(sample_rate));
        let fft = FftProcessor::new(grid.frame_len(), config.fft_size);
        let mel = MelBank::new(
            sample_rate,
            fft.fft_size(),
            config.n_mels,
            config.n_mfcc,
            config.mel_fmin_hz,
            sample_rate as f32 / 2.0,
        );
        let pitch = PitchEstimator::new(
            sample_rate,
            config.pitch_floor_hz,
            config.pitch_ceiling_hz,
            config.voicing_threshold,
            config.octave_tolerance,
        );

        Self {
            config,
            sample_rate,
            grid,
            fft,
            mel,
            pitch,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn grid(&self) -> FrameGrid {
        self.grid
    }

    /// Extract the clip-level feature vector
    ///
    /// A waveform at a different rate than this extractor was built for is
    /// analysed by a temporary extractor at the waveform's own rate.
    ///
    /// # Returns
    /// * `Ok(FeatureVector)` - Summary and diagnostic statistics
    /// * `Err(FeatureError::InsufficientVoicedFrames)` - Fewer voiced frames
    ///   than `min_voiced_frames`, including clips shorter than one frame
    pub fn extract(&self, waveform: &Waveform) -> Result<FeatureVector, FeatureError> {
        if waveform.sample_rate() != self.sample_rate {
            debug!(
                "[FeatureExtractor] Rebuilding for {} Hz (configured for {} Hz)",
                waveform.sample_rate(),
                self.sample_rate
            );
            return FeatureExtractor::new(waveform.sample_rate(), self.config.clone())
                .extract_samples(waveform.samples());
        }
        self.extract_samples(waveform.samples())
    }

    /// Extract features from raw samples at this extractor's rate
    ///
    /// No duration or silence validation is applied; see [`Waveform::new`].
    pub fn extract_samples(&self, samples: &[f32]) -> Result<FeatureVector, FeatureError> {
        let frame_count = self.grid.frame_count(samples.len());

        let mut rms_series = Vec::with_capacity(frame_count);
        let mut flatness_series = Vec::with_capacity(frame_count);
        let mut log_mel_frames = Vec::with_capacity(frame_count);

        for frame in self.grid.frames(samples) {
            rms_series.push(temporal::frame_rms(frame));

            let magnitude = self.fft.compute_magnitude_spectrum(frame);
            flatness_series.push(compute_flatness(&magnitude));

            let power: Vec<f32> = magnitude.iter().map(|m| m * m).collect();
            log_mel_frames.push(self.mel.log_mel_db(&power));
        }

        // Voicing gate: only frames near the clip's speech level get a pitch
        let loudest = rms_series.iter().copied().fold(0.0f32, f32::max);
        let voicing_floor = self
            .config
            .voicing_rms_floor
            .max(self.config.voicing_relative_floor * loudest);
        let pitches: Vec<f32> = self
            .grid
            .frames(samples)
            .zip(&rms_series)
            .filter(|(_, &level)| level >= voicing_floor)
            .filter_map(|(frame, _)| self.pitch.estimate(frame))
            .collect();

        let required = self.config.min_voiced_frames.max(1);
        if pitches.len() < required {
            debug!(
                "[FeatureExtractor] {} voiced of {} frames (need {})",
                pitches.len(),
                frame_count,
                required
            );
            return Err(FeatureError::InsufficientVoicedFrames {
                required,
                voiced: pitches.len(),
                frames: frame_count,
            });
        }

        let cepstra = self.mel.cepstra(log_mel_frames, self.config.top_db);
        debug_assert_eq!(cepstra.len(), rms_series.len());
        debug_assert_eq!(flatness_series.len(), rms_series.len());

        let mfcc_means = stats::column_means(&cepstra);
        let mfcc_variances = stats::column_variances(&cepstra);
        // c0 tracks loudness, which the RMS statistics already cover
        let mfcc_variance_mean = if mfcc_variances.len() > 1 {
            stats::mean(&mfcc_variances[1..])
        } else {
            stats::mean(&mfcc_variances)
        };

        let features = FeatureVector {
            pitch_variability: stats::std_dev(&pitches),
            spectral_flatness_mean: stats::mean(&flatness_series),
            spectral_flatness_variance: stats::variance(&flatness_series),
            mfcc_variance_mean,
            rms_mean: stats::mean(&rms_series),
            rms_variance: stats::variance(&rms_series),
            pitch_mean: stats::mean(&pitches),
            mfcc_means,
            mfcc_variances,
            frame_count,
            voiced_frames: pitches.len(),
        };

        debug!(
            "[FeatureExtractor] frames={} voiced={} pitch_sd={:.3} flat_var={:.5} \
             mfcc_var={:.3} rms_var={:.6}",
            features.frame_count,
            features.voiced_frames,
            features.pitch_variability,
            features.spectral_flatness_variance,
            features.mfcc_variance_mean,
            features.rms_variance
        );

        Ok(features)
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(16_000, ExtractionConfig::default())
    }
}
