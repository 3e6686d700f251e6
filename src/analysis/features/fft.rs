// FFT module - Fast Fourier Transform computation
//
// This module handles FFT computation with proper windowing to reduce
// spectral leakage. The magnitude spectrum feeds spectral flatness, and
// its square feeds the mel filterbank.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// FFT processor that computes magnitude spectra from analysis frames
pub struct FftProcessor {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    /// Hann window for the frame length (pre-computed)
    window: Vec<f32>,
}

impl FftProcessor {
    /// Create a new FFT processor
    ///
    /// # Arguments
    /// * `frame_len` - Samples per analysis frame (window length)
    /// * `fft_size` - FFT length; frames are zero-padded up to it
    pub fn new(frame_len: usize, fft_size: usize) -> Self {
        let fft_size = fft_size.max(frame_len);
        let window = hann_window(frame_len);
        let fft = FftPlanner::new().plan_fft_forward(fft_size);

        Self {
            fft,
            fft_size,
            window,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of bins returned by [`Self::compute_magnitude_spectrum`]
    pub fn bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Compute magnitude spectrum using FFT
    ///
    /// Applies the Hann window, zero-pads to the FFT size, and returns
    /// magnitudes for positive frequencies only.
    ///
    /// # Arguments
    /// * `frame` - Analysis frame (samples beyond the window length are ignored)
    pub fn compute_magnitude_spectrum(&self, frame: &[f32]) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> = frame
            .iter()
            .zip(&self.window)
            .map(|(&sample, &w)| Complex::new(sample * w, 0.0))
            .collect();
        buffer.resize(self.fft_size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        buffer[..self.bins()].iter().map(|c| c.norm()).collect()
    }
}

/// Symmetric Hann window
fn hann_window(len: usize) -> Vec<f32> {
    if len <= 1 {
        return vec![1.0; len];
    }
    (0..len)
        .map(|i| 0.5 * (1.0 - ((2.0 * std::f32::consts::PI * i as f32) / (len as f32 - 1.0)).cos()))
        .collect()
}
