// Resampler - sinc resampling of mono signals to the analysis rate

use rubato::{
    ResampleError, Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType,
    WindowFunction,
};
use tracing::debug;

use crate::error::AudioError;

/// Input frames fed to the sinc resampler per call
const CHUNK_FRAMES: usize = 1024;

/// Resample a mono signal from `source_rate` to `target_rate`
///
/// Sinc interpolation (256 taps, BlackmanHarris2 window, 0.95 cutoff). The
/// filter delay is flushed and trimmed, so the result is time-aligned with
/// the input and holds exactly `round(len * target / source)` samples.
/// Returns the input unchanged when the rates already match.
pub fn resample_mono(
    samples: &[f32],
    source_rate: u32,
    target_rate: u32,
) -> Result<Vec<f32>, AudioError> {
    if source_rate == target_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }
    if source_rate == 0 || target_rate == 0 {
        return Err(AudioError::decode(format!(
            "cannot resample {} Hz -> {} Hz",
            source_rate, target_rate
        )));
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = target_rate as f64 / source_rate as f64;
    let expected = (samples.len() as f64 * ratio).round() as usize;
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, CHUNK_FRAMES, 1)
        .map_err(|err| AudioError::decode(format!("failed to create resampler: {err}")))?;

    let delay = resampler.output_delay();
    let wanted = delay + expected;
    let mut resampled = Vec::with_capacity(wanted + resampler.output_frames_max());

    let mut chunks = samples.chunks_exact(CHUNK_FRAMES);
    for chunk in chunks.by_ref() {
        let input = [chunk];
        let output = resampler
            .process(&input[..], None)
            .map_err(resampling_failed)?;
        append_channel(&mut resampled, output);
    }

    let remainder = chunks.remainder();
    if !remainder.is_empty() {
        let input = [remainder];
        let output = resampler
            .process_partial(Some(&input[..]), None)
            .map_err(resampling_failed)?;
        append_channel(&mut resampled, output);
    }

    // Push silence through until the delayed tail has come out
    while resampled.len() < wanted {
        let output = resampler
            .process_partial(None::<&[&[f32]]>, None)
            .map_err(resampling_failed)?;
        let produced = resampled.len();
        append_channel(&mut resampled, output);
        if resampled.len() == produced {
            break;
        }
    }

    resampled.drain(..delay.min(resampled.len()));
    resampled.resize(expected, 0.0);

    debug!(
        "Resampled {} frames ({} Hz) -> {} frames ({} Hz), delay {} frames",
        samples.len(),
        source_rate,
        resampled.len(),
        target_rate,
        delay
    );

    Ok(resampled)
}

fn append_channel(out: &mut Vec<f32>, mut channels: Vec<Vec<f32>>) {
    if let Some(channel) = channels.pop() {
        out.extend_from_slice(&channel);
    }
}

fn resampling_failed(err: ResampleError) -> AudioError {
    AudioError::decode(format!("resampling failed: {err}"))
}
