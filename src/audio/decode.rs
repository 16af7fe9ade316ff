use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{CorpusError, Result};

/// Decoded audio laid out channel-major: `channels[c][i]` is sample `i` of
/// channel `c`.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioData {
    pub channels: Vec<Vec<f32>>,
    pub sample_rate: u32,
}

impl AudioData {
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            channels: vec![samples],
            sample_rate,
        }
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Length in samples per channel.
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn duration(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.len() as f32 / self.sample_rate as f32
    }
}

/// Loads a waveform and its sample rate from a path.
pub trait AudioLoader {
    fn load(&self, path: &Path) -> Result<AudioData>;
}

/// Decodes audio files with symphonia, keeping every channel.
#[derive(Clone, Copy, Debug, Default)]
pub struct SymphoniaLoader;

impl AudioLoader for SymphoniaLoader {
    fn load(&self, path: &Path) -> Result<AudioData> {
        decode_audio(path)
    }
}

pub fn decode_audio(path: &Path) -> Result<AudioData> {
    let decode_err = |source: SymphoniaError| CorpusError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(|e| CorpusError::io(path, e))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(decode_err)?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or_else(|| decode_err(SymphoniaError::Unsupported("no audio track")))?;

    let track_id = track.id;
    let declared_channels = track.codec_params.channels.map(|c| c.count());
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| decode_err(SymphoniaError::Unsupported("unknown sample rate")))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(decode_err)?;

    let mut channels: Vec<Vec<f32>> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(decode_err(e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = check_packet(decoder.decode(&packet), path)?;

        // Channel layout comes from the decoded buffer, not the container
        let spec = *decoded.spec();
        let num_frames = decoded.frames();

        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);

        append_interleaved(&mut channels, sample_buf.samples(), spec.channels.count())
            .map_err(decode_err)?;
    }

    if channels.is_empty() {
        channels = vec![Vec::new(); declared_channels.unwrap_or(1).max(1)];
    }

    let audio = AudioData {
        channels,
        sample_rate,
    };

    log::debug!(
        "Decoded {}: {} channel(s), {} samples, {}Hz, {:.2}s",
        path.display(),
        audio.num_channels(),
        audio.len(),
        sample_rate,
        audio.duration()
    );

    Ok(audio)
}

/// Any packet that fails to decode aborts the load.
fn check_packet<T>(result: std::result::Result<T, SymphoniaError>, path: &Path) -> Result<T> {
    result.map_err(|source| CorpusError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Split interleaved samples into `channels`, sizing it from the first
/// buffer. Every later buffer must carry the same channel count.
fn append_interleaved(
    channels: &mut Vec<Vec<f32>>,
    samples: &[f32],
    num_channels: usize,
) -> std::result::Result<(), SymphoniaError> {
    if num_channels == 0 {
        return Err(SymphoniaError::Unsupported("decoded buffer has no channels"));
    }
    if channels.is_empty() {
        *channels = vec![Vec::new(); num_channels];
    } else if channels.len() != num_channels {
        return Err(SymphoniaError::Unsupported("channel count changed mid-stream"));
    }

    for frame in samples.chunks(num_channels) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }
    Ok(())
}
