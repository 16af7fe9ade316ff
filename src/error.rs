use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("{}:{line_no}: expected 7 fields, found {}: {fields:?}", .path.display(), .fields.len())]
    Parse {
        path: PathBuf,
        line_no: usize,
        fields: Vec<String>,
    },

    #[error("{}:{line_no}: field '{field}' is not a number: {value:?}", .path.display())]
    InvalidNumber {
        path: PathBuf,
        line_no: usize,
        field: &'static str,
        value: String,
    },

    #[error("unknown emotion label '{label}'")]
    UnknownLabel { label: String },

    #[error("cannot derive an audio path from file id '{file_id}'")]
    InvalidFileId { file_id: String },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: symphonia::core::errors::Error,
    },

    #[error("index {index} out of range for corpus of {len} utterances")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("waveform has no channels")]
    NoChannels,

    #[error("expected {expected} channel(s), waveform has {found}")]
    ChannelMismatch { expected: usize, found: usize },
}

impl CorpusError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CorpusError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CorpusError>;
