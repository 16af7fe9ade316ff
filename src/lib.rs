//! Index an emotion-annotated speech corpus and cut its utterances into
//! fixed-length overlapping frames.

pub mod audio;
pub mod config;
pub mod corpus;
pub mod error;
pub mod report;

pub use audio::decode::{AudioData, AudioLoader, SymphoniaLoader};
pub use audio::framing::{collate, FrameBatch};
pub use corpus::dataset::{CorpusDataset, Sample};
pub use corpus::index::{CorpusIndex, UtteranceRecord};
pub use corpus::label::Emotion;
pub use error::{CorpusError, Result};
