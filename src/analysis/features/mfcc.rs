// MFCC module - Mel filterbank and cepstral coefficients
//
// Power spectrum -> triangular mel filters -> decibels -> orthonormal DCT-II.
// Decibel values are clipped to a fixed dynamic range below the loudest
// mel band of the whole clip before the DCT, so near-silent frames do not
// dominate the coefficient variances with floor noise.

/// Floor applied to mel energies before the logarithm
const POWER_FLOOR: f32 = 1e-10;

/// Triangular mel filterbank with a precomputed DCT basis
#[derive(Debug, Clone)]
pub struct MelBank {
    filters: Vec<Vec<(usize, f32)>>,
    /// `n_mfcc` rows of `n_mels` orthonormal DCT-II weights
    dct: Vec<Vec<f32>>,
}

impl MelBank {
    /// # Arguments
    /// * `sample_rate` - Audio sample rate in Hz
    /// * `fft_size` - FFT length the power spectra come from
    /// * `n_mels` - Number of mel bands
    /// * `n_mfcc` - Number of cepstral coefficients kept (c0 included)
    /// * `f_min` / `f_max` - Filterbank edges in Hz (`f_max` is capped at Nyquist)
    pub fn new(
        sample_rate: u32,
        fft_size: usize,
        n_mels: usize,
        n_mfcc: usize,
        f_min: f32,
        f_max: f32,
    ) -> Self {
        let n_mels = n_mels.max(1);
        let bins = mel_bins(sample_rate, fft_size, n_mels, f_min, f_max);
        let filters = (0..n_mels)
            .map(|m| {
                let left = bins[m];
                let center = bins[m + 1];
                let right = bins[m + 2].max(center + 1);
                build_tri_filter(left, center, right)
            })
            .collect();

        Self {
            filters,
            dct: dct_basis(n_mfcc.min(n_mels), n_mels),
        }
    }

    pub fn n_mels(&self) -> usize {
        self.filters.len()
    }

    pub fn n_mfcc(&self) -> usize {
        self.dct.len()
    }

    /// Mel band energies in dB (`10 * log10(max(e, 1e-10))`)
    pub fn log_mel_db(&self, power: &[f32]) -> Vec<f32> {
        self.filters
            .iter()
            .map(|filter| {
                let energy: f64 = filter
                    .iter()
                    .map(|&(bin, weight)| {
                        power.get(bin).copied().unwrap_or(0.0).max(0.0) as f64 * weight as f64
                    })
                    .sum();
                10.0 * (energy as f32).max(POWER_FLOOR).log10()
            })
            .collect()
    }

    /// Cepstral coefficients for one frame of mel dB values
    pub fn cepstrum(&self, log_mel: &[f32]) -> Vec<f32> {
        self.dct
            .iter()
            .map(|row| {
                row.iter()
                    .zip(log_mel)
                    .map(|(&w, &v)| w as f64 * v as f64)
                    .sum::<f64>() as f32
            })
            .collect()
    }

    /// Clip every frame to `top_db` below the clip-wide peak, then transform
    ///
    /// # Returns
    /// One coefficient vector per input frame
    pub fn cepstra(&self, mut log_mel_frames: Vec<Vec<f32>>, top_db: f32) -> Vec<Vec<f32>> {
        clip_dynamic_range(&mut log_mel_frames, top_db);
        log_mel_frames.iter().map(|frame| self.cepstrum(frame)).collect()
    }
}

/// Raise every value to at least `max - top_db`, where `max` spans all frames
pub fn clip_dynamic_range(frames: &mut [Vec<f32>], top_db: f32) {
    let peak = frames
        .iter()
        .flatten()
        .copied()
        .fold(f32::NEG_INFINITY, f32::max);
    if !peak.is_finite() {
        return;
    }
    let floor = peak - top_db.max(0.0);
    for value in frames.iter_mut().flatten() {
        *value = value.max(floor);
    }
}

fn mel_bins(
    sample_rate: u32,
    fft_size: usize,
    n_mels: usize,
    f_min: f32,
    f_max: f32,
) -> Vec<usize> {
    let nyquist = sample_rate.max(1) as f32 * 0.5;
    let f_max = f_max.min(nyquist).max(f_min);
    let mel_min = hz_to_mel(f_min.max(0.0));
    let mel_max = hz_to_mel(f_max);
    (0..n_mels + 2)
        .map(|i| {
            let t = i as f32 / (n_mels + 1) as f32;
            freq_to_bin(mel_to_hz(mel_min + (mel_max - mel_min) * t), sample_rate, fft_size)
        })
        .collect()
}

fn build_tri_filter(left: usize, center: usize, right: usize) -> Vec<(usize, f32)> {
    let mut weights = Vec::new();
    if right <= left {
        return weights;
    }
    for bin in left..=right {
        let w = if bin < center {
            (bin as f32 - left as f32) / (center as f32 - left as f32)
        } else {
            (right as f32 - bin as f32) / (right as f32 - center as f32)
        };
        if w > 0.0 {
            weights.push((bin, w));
        }
    }
    weights
}

fn freq_to_bin(freq_hz: f32, sample_rate: u32, fft_size: usize) -> usize {
    let sr = sample_rate.max(1) as f32;
    let freq = freq_hz.clamp(0.0, sr * 0.5);
    (((freq * fft_size as f32) / sr).floor() as usize).min(fft_size / 2)
}

fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0f32.powf(mel / 2595.0) - 1.0)
}

fn dct_basis(count: usize, n: usize) -> Vec<Vec<f32>> {
    let n_f = n as f64;
    (0..count)
        .map(|k| {
            let scale = if k == 0 {
                (1.0 / n_f).sqrt()
            } else {
                (2.0 / n_f).sqrt()
            };
            (0..n)
                .map(|m| {
                    let angle = std::f64::consts::PI * k as f64 * (m as f64 + 0.5) / n_f;
                    (scale * angle.cos()) as f32
                })
                .collect()
        })
        .collect()
}
