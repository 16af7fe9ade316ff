use std::path::{Path, PathBuf};

use super::index::{CorpusIndex, UtteranceRecord};
use super::label::Emotion;
use crate::audio::decode::{AudioData, AudioLoader, SymphoniaLoader};
use crate::error::Result;

/// A loaded utterance with its labels.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub path: PathBuf,
    pub audio: AudioData,
    pub emotion: Emotion,
    pub activation: f32,
    pub valence: f32,
    pub dominance: f32,
}

impl Sample {
    pub fn sample_rate(&self) -> u32 {
        self.audio.sample_rate
    }

    /// `[channels, samples]`
    pub fn shape(&self) -> [usize; 2] {
        [self.audio.num_channels(), self.audio.len()]
    }
}

/// Indexed access to corpus utterances. The index is built once up front;
/// audio is read from disk on every `get`, nothing is cached.
///
/// Audio paths are derived from file ids alone when the index is built and
/// are only checked against the filesystem inside `get`, so a corpus with
/// missing audio still indexes and fails on the affected utterances.
pub struct CorpusDataset<L = SymphoniaLoader> {
    root: PathBuf,
    index: CorpusIndex,
    loader: L,
}

impl CorpusDataset<SymphoniaLoader> {
    /// Index sessions `sessions` of the corpus under `root`.
    pub fn open(root: impl Into<PathBuf>, sessions: &[u32], extension: &str) -> Result<Self> {
        let root = root.into();
        let index = CorpusIndex::build(&root, sessions, extension)?;
        Ok(Self::with_loader(root, index, SymphoniaLoader))
    }
}

impl<L: AudioLoader> CorpusDataset<L> {
    pub fn with_loader(root: impl Into<PathBuf>, index: CorpusIndex, loader: L) -> Self {
        Self {
            root: root.into(),
            index,
            loader,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index(&self) -> &CorpusIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn record(&self, index: usize) -> Result<&UtteranceRecord> {
        self.index.get(index)
    }

    /// Absolute audio path of utterance `index`.
    pub fn audio_path(&self, index: usize) -> Result<PathBuf> {
        let record = self.index.get(index)?;
        Ok(self.root.join(record.relative_audio_path()?))
    }

    pub fn get(&self, index: usize) -> Result<Sample> {
        let record = self.index.get(index)?;
        let path = self.root.join(record.relative_audio_path()?);
        let audio = self.loader.load(&path)?;

        Ok(Sample {
            path,
            audio,
            emotion: record.emotion,
            activation: record.activation,
            valence: record.valence,
            dominance: record.dominance,
        })
    }
}
