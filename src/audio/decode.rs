use std::io::Cursor;
use std::path::{Path, PathBuf};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

use super::waveform::Waveform;
use crate::error::OnsetError;

/// Failure to turn an audio payload into a [`Waveform`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to open audio file {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported or corrupt audio container")]
    Probe(#[source] SymphoniaError),

    #[error("no audio tracks found")]
    NoTrack,

    #[error("audio track does not declare a sample rate")]
    UnknownSampleRate,

    #[error("audio decoding failed")]
    Decoder(#[source] SymphoniaError),

    #[error(transparent)]
    Invalid(#[from] OnsetError),
}

/// Decodes an audio file into a mono waveform at its native sample rate.
///
/// [`RepetitionCounter`](crate::RepetitionCounter) resamples to its analysis
/// rate, so the waveform can be passed on as is.
pub fn decode_file(path: &Path) -> Result<Waveform, DecodeError> {
    let file = std::fs::File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let waveform = decode_source(Box::new(file), hint)?;
    log::info!(
        "Decoded {}: {} samples, {}Hz, {:.1}s",
        path.display(),
        waveform.len(),
        waveform.sample_rate(),
        waveform.duration_secs()
    );
    Ok(waveform)
}

/// Decodes an in-memory payload, e.g. an uploaded chunk.
///
/// `extension` is only a hint for the format probe; the container is still
/// sniffed from its contents.
pub fn decode_bytes(bytes: Vec<u8>, extension: Option<&str>) -> Result<Waveform, DecodeError> {
    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }
    decode_source(Box::new(Cursor::new(bytes)), hint)
}

fn decode_source(source: Box<dyn MediaSource>, hint: Hint) -> Result<Waveform, DecodeError> {
    let mss = MediaSourceStream::new(source, Default::default());

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(DecodeError::Probe)?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoTrack)?;

    let track_id = track.id;
    let channels = track.codec_params.channels.map_or(1, |c| c.count()).max(1);
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(DecodeError::UnknownSampleRate)?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(DecodeError::Decoder)?;

    let mut all_samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(DecodeError::Decoder(e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(msg)) => {
                log::warn!("Skipping undecodable packet: {}", msg);
                continue;
            }
            Err(e) => return Err(DecodeError::Decoder(e)),
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();

        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);

        let samples = sample_buf.samples();

        // Downmix to mono
        if channels == 1 {
            all_samples.extend_from_slice(samples);
        } else {
            for frame_samples in samples.chunks(channels) {
                let mono: f32 = frame_samples.iter().sum::<f32>() / channels as f32;
                all_samples.push(mono);
            }
        }
    }

    Ok(Waveform::new(all_samples, sample_rate)?)
}
