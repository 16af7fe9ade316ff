use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CorpusError;

/// Categorical emotion annotated on each utterance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Emotion {
    Anger,
    Happiness,
    Excitement,
    Sadness,
    Frustration,
    Fear,
    Surprise,
    Neutral,
    Unknown,
}

impl Emotion {
    pub const ALL: [Emotion; 9] = [
        Emotion::Anger,
        Emotion::Happiness,
        Emotion::Excitement,
        Emotion::Sadness,
        Emotion::Frustration,
        Emotion::Fear,
        Emotion::Surprise,
        Emotion::Neutral,
        Emotion::Unknown,
    ];

    /// Integer class code, 1 through 9.
    pub fn code(self) -> u8 {
        match self {
            Emotion::Anger => 1,
            Emotion::Happiness => 2,
            Emotion::Excitement => 3,
            Emotion::Sadness => 4,
            Emotion::Frustration => 5,
            Emotion::Fear => 6,
            Emotion::Surprise => 7,
            Emotion::Neutral => 8,
            Emotion::Unknown => 9,
        }
    }

    pub fn from_code(code: u8) -> Option<Emotion> {
        Emotion::ALL.iter().copied().find(|e| e.code() == code)
    }

    /// Three-letter label used in the evaluation files.
    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Anger => "ang",
            Emotion::Happiness => "hap",
            Emotion::Excitement => "exc",
            Emotion::Sadness => "sad",
            Emotion::Frustration => "fru",
            Emotion::Fear => "fea",
            Emotion::Surprise => "sur",
            Emotion::Neutral => "neu",
            Emotion::Unknown => "xxx",
        }
    }
}

impl FromStr for Emotion {
    type Err = CorpusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .iter()
            .copied()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| CorpusError::UnknownLabel {
                label: s.to_string(),
            })
    }
}

impl TryFrom<String> for Emotion {
    type Error = CorpusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Emotion> for String {
    fn from(value: Emotion) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
