use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;

use serde::Serialize;

use crate::corpus::index::{CorpusIndex, UtteranceRecord};
use crate::corpus::label::Emotion;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub per_emotion: BTreeMap<Emotion, usize>,
    pub per_session: BTreeMap<u32, usize>,
    /// Utterances whose file id does not encode a session.
    pub unresolved: usize,
    pub total_duration: f32,
    pub mean_activation: f32,
    pub mean_valence: f32,
    pub mean_dominance: f32,
}

pub fn summarize(index: &CorpusIndex) -> Summary {
    let mut summary = Summary {
        total: index.len(),
        ..Summary::default()
    };
    if index.is_empty() {
        return summary;
    }

    let (mut act, mut val, mut dom) = (0.0f64, 0.0f64, 0.0f64);
    for record in index {
        *summary.per_emotion.entry(record.emotion).or_default() += 1;
        match record.session() {
            Ok(session) => *summary.per_session.entry(session).or_default() += 1,
            Err(_) => summary.unresolved += 1,
        }
        summary.total_duration += record.duration();
        act += record.activation as f64;
        val += record.valence as f64;
        dom += record.dominance as f64;
    }

    let n = index.len() as f64;
    summary.mean_activation = (act / n) as f32;
    summary.mean_valence = (val / n) as f32;
    summary.mean_dominance = (dom / n) as f32;
    summary
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Utterances: {} ({:.1} min)", self.total, self.total_duration / 60.0)?;
        writeln!(f, "By emotion:")?;
        for (emotion, count) in &self.per_emotion {
            writeln!(f, "  {} ({}) {:>8}", emotion, emotion.code(), count)?;
        }
        writeln!(f, "By session:")?;
        for (session, count) in &self.per_session {
            writeln!(f, "  Session{} {:>8}", session, count)?;
        }
        if self.unresolved > 0 {
            writeln!(f, "  unresolved {:>6}", self.unresolved)?;
        }
        write!(
            f,
            "Mean activation {:.3}, valence {:.3}, dominance {:.3}",
            self.mean_activation, self.mean_valence, self.mean_dominance
        )
    }
}

#[derive(Serialize)]
struct ExportRecord<'a> {
    #[serde(flatten)]
    record: &'a UtteranceRecord,
    emotion_code: u8,
    /// `null` when the file id does not encode a session and dialogue
    /// folder; such records fail with `InvalidFileId` when loaded.
    audio_path: Option<String>,
}

/// Write the index as a pretty-printed JSON array, one object per
/// utterance in index order. The export lists every indexed record, so a
/// record whose audio path cannot be derived is written with a `null`
/// `audio_path` instead of aborting the export.
pub fn export_json<W: Write>(index: &CorpusIndex, writer: W) -> serde_json::Result<()> {
    let rows: Vec<ExportRecord<'_>> = index
        .iter()
        .map(|record| ExportRecord {
            record,
            emotion_code: record.emotion.code(),
            audio_path: record
                .relative_audio_path()
                .ok()
                .map(|p| p.to_string_lossy().into_owned()),
        })
        .collect();
    serde_json::to_writer_pretty(writer, &rows)
}
