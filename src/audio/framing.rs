use super::decode::AudioData;
use crate::corpus::dataset::Sample;
use crate::error::{CorpusError, Result};

pub const SAMPLE_RATE: u32 = 16_000;
/// 25 ms window.
pub const FRAME_LENGTH: usize = SAMPLE_RATE as usize * 25 / 1000;
/// 10 ms hop.
pub const STEP_LENGTH: usize = SAMPLE_RATE as usize * 10 / 1000;
pub const NUM_CHANNELS: usize = 1;

/// Number of frames a waveform of `len` samples is cut into. Anything
/// shorter than one frame still yields a single, padded frame.
pub fn frame_count(len: usize) -> usize {
    if len < FRAME_LENGTH {
        return 1;
    }
    (len - FRAME_LENGTH).div_ceil(STEP_LENGTH) + 1
}

/// Zeros appended to a waveform of `len` samples so that the last frame
/// ends exactly on the padded end.
pub fn padding_length(len: usize) -> usize {
    if len < FRAME_LENGTH {
        return FRAME_LENGTH;
    }
    FRAME_LENGTH + (frame_count(len) - 1) * STEP_LENGTH - len
}

/// Overlapping fixed-length frames from a whole batch, flattened in batch
/// order. Logical shape is `[total_frames, NUM_CHANNELS, FRAME_LENGTH]`.
///
/// `frame_counts[i]` is how many of those frames belong to the `i`-th
/// waveform, which is the only way to recover per-sample boundaries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameBatch {
    data: Vec<f32>,
    frame_counts: Vec<usize>,
}

impl FrameBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame `audio` and append its frames to the batch.
    pub fn push(&mut self, audio: &AudioData) -> Result<usize> {
        match audio.num_channels() {
            0 => return Err(CorpusError::NoChannels),
            NUM_CHANNELS => {}
            found => {
                return Err(CorpusError::ChannelMismatch {
                    expected: NUM_CHANNELS,
                    found,
                })
            }
        }
        if audio.sample_rate != SAMPLE_RATE {
            log::warn!(
                "Framing {}Hz audio with {}Hz frame constants",
                audio.sample_rate,
                SAMPLE_RATE
            );
        }

        let len = audio.len();
        let n_frames = frame_count(len);
        let padded_len = len + padding_length(len);

        let padded: Vec<Vec<f32>> = audio
            .channels
            .iter()
            .map(|channel| {
                let mut padded = Vec::with_capacity(padded_len);
                padded.extend_from_slice(channel);
                padded.resize(padded_len, 0.0);
                padded
            })
            .collect();

        self.data.reserve(n_frames * NUM_CHANNELS * FRAME_LENGTH);
        for i in 0..n_frames {
            let offset = i * STEP_LENGTH;
            for channel in &padded {
                self.data.extend_from_slice(&channel[offset..offset + FRAME_LENGTH]);
            }
        }
        self.frame_counts.push(n_frames);

        Ok(n_frames)
    }

    pub fn num_frames(&self) -> usize {
        self.data.len() / (NUM_CHANNELS * FRAME_LENGTH)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn shape(&self) -> [usize; 3] {
        [self.num_frames(), NUM_CHANNELS, FRAME_LENGTH]
    }

    pub fn frame_counts(&self) -> &[usize] {
        &self.frame_counts
    }

    /// Frame `index`, channels laid end to end.
    pub fn frame(&self, index: usize) -> Option<&[f32]> {
        self.frame_range(index, 1)
    }

    pub fn frames(&self) -> std::slice::ChunksExact<'_, f32> {
        self.data.chunks_exact(NUM_CHANNELS * FRAME_LENGTH)
    }

    /// All frames that came from the `sample`-th waveform of the batch.
    pub fn sample_frames(&self, sample: usize) -> Option<&[f32]> {
        let count = *self.frame_counts.get(sample)?;
        let first: usize = self.frame_counts[..sample].iter().sum();
        self.frame_range(first, count)
    }

    fn frame_range(&self, first: usize, count: usize) -> Option<&[f32]> {
        let size = NUM_CHANNELS * FRAME_LENGTH;
        let start = first.checked_mul(size)?;
        let end = first.checked_add(count)?.checked_mul(size)?;
        self.data.get(start..end)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

/// Frame every waveform of a batch into one flattened sequence.
pub fn collate_waveforms<'a, I>(batch: I) -> Result<FrameBatch>
where
    I: IntoIterator<Item = &'a AudioData>,
{
    let mut frames = FrameBatch::new();
    for audio in batch {
        frames.push(audio)?;
    }
    Ok(frames)
}

/// Collation routine for loaded samples.
pub fn collate(batch: &[Sample]) -> Result<FrameBatch> {
    collate_waveforms(batch.iter().map(|s| &s.audio))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> AudioData {
        AudioData::mono((0..len).map(|i| i as f32 + 1.0).collect(), SAMPLE_RATE)
    }

    #[test]
    fn constants_follow_sample_rate() {
        assert_eq!(FRAME_LENGTH, 400);
        assert_eq!(STEP_LENGTH, 160);
    }

    #[test]
    fn frame_count_arithmetic() {
        assert_eq!(frame_count(0), 1);
        assert_eq!(frame_count(399), 1);
        assert_eq!(frame_count(400), 1);
        assert_eq!(frame_count(401), 2);
        assert_eq!(frame_count(560), 2);
        assert_eq!(frame_count(561), 3);
        assert_eq!(padding_length(0), 400);
        assert_eq!(padding_length(100), 400);
        assert_eq!(padding_length(400), 0);
        assert_eq!(padding_length(401), 159);
        assert_eq!(padding_length(560), 0);
    }

    #[test]
    fn exact_frame_length_gives_one_unpadded_frame() {
        let audio = ramp(400);
        let batch = collate_waveforms([&audio]).unwrap();
        assert_eq!(batch.shape(), [1, 1, 400]);
        assert_eq!(batch.frame(0).unwrap(), audio.channels[0].as_slice());
    }

    #[test]
    fn empty_waveform_gives_one_zero_frame() {
        let audio = AudioData::mono(Vec::new(), SAMPLE_RATE);
        let batch = collate_waveforms([&audio]).unwrap();
        assert_eq!(batch.num_frames(), 1);
        assert!(batch.frame(0).unwrap().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn short_waveform_is_zero_padded() {
        let audio = ramp(100);
        let batch = collate_waveforms([&audio]).unwrap();
        let frame = batch.frame(0).unwrap();
        assert_eq!(&frame[..100], audio.channels[0].as_slice());
        assert!(frame[100..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn frames_overlap_by_step() {
        let audio = ramp(401);
        let batch = collate_waveforms([&audio]).unwrap();
        assert_eq!(batch.num_frames(), 2);
        let second = batch.frame(1).unwrap();
        assert_eq!(second[0], 161.0);
        assert_eq!(second[240], 401.0);
        assert!(second[241..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn batch_concatenates_in_order() {
        let a = ramp(400);
        let b = AudioData::mono(vec![-1.0; 560], SAMPLE_RATE);
        let batch = collate_waveforms([&a, &b]).unwrap();
        assert_eq!(batch.frame_counts(), &[1, 2]);
        assert_eq!(batch.shape(), [3, 1, 400]);
        assert_eq!(batch.frames().len(), 3);
        assert_eq!(batch.frame(0).unwrap()[0], 1.0);
        assert!(batch.frame(1).unwrap().iter().all(|&s| s == -1.0));
        assert!(batch.frame(2).unwrap().iter().all(|&s| s == -1.0));
        assert_eq!(batch.sample_frames(1).unwrap().len(), 800);
        assert!(batch.sample_frames(2).is_none());
        assert!(batch.frame(3).is_none());
    }

    #[test]
    fn huge_frame_index_is_none() {
        let batch = collate_waveforms([&ramp(560)]).unwrap();
        assert!(batch.frame(usize::MAX).is_none());
        assert!(batch.frame(usize::MAX / FRAME_LENGTH).is_none());
        assert!(batch.sample_frames(usize::MAX).is_none());
    }

    #[test]
    fn framing_is_deterministic() {
        let audio = ramp(5_000);
        let first = collate_waveforms([&audio]).unwrap();
        let second = collate_waveforms([&audio]).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.num_frames(), frame_count(5_000));
    }

    #[test]
    fn rejects_channelless_waveform() {
        let audio = AudioData {
            channels: Vec::new(),
            sample_rate: SAMPLE_RATE,
        };
        assert!(matches!(collate_waveforms([&audio]), Err(CorpusError::NoChannels)));
    }

    #[test]
    fn rejects_multichannel_waveform() {
        let audio = AudioData {
            channels: vec![vec![0.0; 400], vec![0.0; 400]],
            sample_rate: SAMPLE_RATE,
        };
        assert!(matches!(
            collate_waveforms([&audio]),
            Err(CorpusError::ChannelMismatch { expected: 1, found: 2 })
        ));
    }

    #[test]
    fn empty_batch_has_no_frames() {
        let batch = collate(&[]).unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.shape(), [0, 1, 400]);
    }
}
