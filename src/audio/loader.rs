// WaveformLoader - decode arbitrary audio bytes into an analysis waveform
//
// Decoding goes through symphonia's default probe, so any container and
// codec it recognizes (MP3, WAV, FLAC, OGG/Vorbis, AAC/MP4, ...) is
// accepted. Multichannel audio is downmixed by averaging, then resampled to
// the configured analysis rate so downstream thresholds are rate-independent.

use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use crate::audio::resampler::resample_mono;
use crate::audio::waveform::{check_duration, Waveform};
use crate::config::LoaderConfig;
use crate::error::AudioError;

/// Decoded mono PCM at the source's native rate
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: usize,
}

impl DecodedAudio {
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Turns raw audio bytes into a validated [`Waveform`]
#[derive(Debug, Clone, Default)]
pub struct WaveformLoader {
    config: LoaderConfig,
}

impl WaveformLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Decode, downmix, resample and validate
    ///
    /// # Errors
    /// * `Decode` - unsupported or corrupt byte stream
    /// * `TooShort` / `TooLong` - duration outside the configured bounds
    /// * `Silent` - overall RMS below the silence floor
    pub fn load(&self, audio_bytes: &[u8]) -> Result<Waveform, AudioError> {
        let decoded = decode_mono(audio_bytes)?;
        debug!(
            "Decoded {} mono samples at {} Hz from {} channel(s) ({:.3}s)",
            decoded.samples.len(),
            decoded.sample_rate,
            decoded.channels,
            decoded.duration_secs()
        );

        // Bounds apply to the decoded clip, before paying for resampling
        check_duration(decoded.duration_secs(), &self.config)?;

        let target = self.config.target_sample_rate;
        let samples = resample_mono(&decoded.samples, decoded.sample_rate, target)?;
        Waveform::new(samples, target, &self.config)
    }
}

/// Decode the first audio track of `audio_bytes` into mono f32 samples
pub fn decode_mono(audio_bytes: &[u8]) -> Result<DecodedAudio, AudioError> {
    if audio_bytes.is_empty() {
        return Err(AudioError::decode("empty audio payload"));
    }

    let source = Cursor::new(audio_bytes.to_vec());
    let mss = MediaSourceStream::new(Box::new(source), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|err| AudioError::decode(format!("unrecognized container: {err}")))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AudioError::decode("no audio track found"))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|err| AudioError::decode(format!("unsupported codec: {err}")))?;

    let mut mono = Vec::new();
    let mut channels = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(err) => {
                return Err(AudioError::decode(format!("failed to read packet: {err}")));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(reason)) => {
                // Corrupt frames are skipped; an all-corrupt stream still fails below
                warn!("Skipping undecodable packet: {}", reason);
                continue;
            }
            Err(err) => {
                return Err(AudioError::decode(format!("failed to decode packet: {err}")));
            }
        };

        let spec = *decoded.spec();
        sample_rate = spec.rate;
        channels = spec.channels.count().max(1);

        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        downmix_into(buffer.samples(), channels, &mut mono);
    }

    if mono.is_empty() {
        return Err(AudioError::decode("stream contained no audio samples"));
    }
    if sample_rate == 0 {
        return Err(AudioError::decode("sample rate not specified"));
    }

    Ok(DecodedAudio {
        samples: mono,
        sample_rate,
        channels,
    })
}

/// Average interleaved channels into `out`
fn downmix_into(interleaved: &[f32], channels: usize, out: &mut Vec<f32>) {
    if channels <= 1 {
        out.extend_from_slice(interleaved);
        return;
    }
    out.extend(
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32),
    );
}
