// Temporal module - Frame grid and time-domain energy
//
// Every feature family reads frames from the same grid, so per-frame
// statistics line up index for index. Only full frames are produced; the
// trailing partial frame is dropped.

use crate::audio::rms;

/// Fixed-length overlapping frame layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGrid {
    frame_len: usize,
    hop: usize,
}

impl FrameGrid {
    /// # Arguments
    /// * `frame_len` - Samples per frame (clamped to at least 1)
    /// * `hop` - Samples between frame starts (clamped to at least 1)
    pub fn new(frame_len: usize, hop: usize) -> Self {
        Self {
            frame_len: frame_len.max(1),
            hop: hop.max(1),
        }
    }

    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Number of full frames that fit in `num_samples`
    pub fn frame_count(&self, num_samples: usize) -> usize {
        if num_samples < self.frame_len {
            0
        } else {
            (num_samples - self.frame_len) / self.hop + 1
        }
    }

    /// Iterate over full frames of `samples`
    pub fn frames<'a>(&self, samples: &'a [f32]) -> impl Iterator<Item = &'a [f32]> + 'a {
        let frame_len = self.frame_len;
        let hop = self.hop;
        (0..self.frame_count(samples.len())).map(move |i| &samples[i * hop..i * hop + frame_len])
    }
}

/// Per-frame RMS amplitude
pub fn frame_rms(frame: &[f32]) -> f32 {
    rms(frame)
}
