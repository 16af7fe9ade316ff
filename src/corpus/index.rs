use std::path::{Path, PathBuf};

use serde::Serialize;

use super::annotation::{self, AnnotationRow};
use super::label::Emotion;
use crate::error::{CorpusError, Result};

pub const AUDIO_EXTENSION: &str = "wav";

/// Characters stripped from a file id to get its dialogue folder
/// (`Ses01F_impro01_F000` lives in `Ses01F_impro01`).
const TURN_SUFFIX_LEN: usize = 5;

/// Position of the session digit in a file id (`Ses01F...` -> `1`).
const SESSION_CHAR_POS: usize = 4;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UtteranceRecord {
    pub start: f32,
    pub end: f32,
    pub file_id: String,
    pub emotion: Emotion,
    pub activation: f32,
    pub valence: f32,
    pub dominance: f32,
}

impl UtteranceRecord {
    pub fn from_row(row: AnnotationRow) -> Result<Self> {
        Ok(Self {
            emotion: row.emotion.parse()?,
            start: row.start,
            end: row.end,
            file_id: row.file_id,
            activation: row.activation,
            valence: row.valence,
            dominance: row.dominance,
        })
    }

    pub fn duration(&self) -> f32 {
        self.end - self.start
    }

    /// Session number encoded in the file id.
    pub fn session(&self) -> Result<u32> {
        self.file_id
            .chars()
            .nth(SESSION_CHAR_POS)
            .and_then(|c| c.to_digit(10))
            .ok_or_else(|| self.invalid_id())
    }

    /// Dialogue folder holding this utterance's audio.
    pub fn utterance_group(&self) -> Result<&str> {
        let cut = self
            .file_id
            .char_indices()
            .rev()
            .nth(TURN_SUFFIX_LEN - 1)
            .map(|(i, _)| i)
            .filter(|&i| i > 0)
            .ok_or_else(|| self.invalid_id())?;
        Ok(&self.file_id[..cut])
    }

    /// Audio path relative to the corpus root:
    /// `Session<N>/sentences/wav/<group>/<file_id>.wav`.
    ///
    /// Only the file id is inspected; the path is not checked against the
    /// filesystem until the audio is loaded.
    pub fn relative_audio_path(&self) -> Result<PathBuf> {
        let session = self.session()?;
        let group = self.utterance_group()?;
        Ok(PathBuf::from(format!("Session{session}"))
            .join("sentences")
            .join("wav")
            .join(group)
            .join(format!("{}.{}", self.file_id, AUDIO_EXTENSION)))
    }

    fn invalid_id(&self) -> CorpusError {
        CorpusError::InvalidFileId {
            file_id: self.file_id.clone(),
        }
    }
}

/// Evaluation-file directory of one session relative to the corpus root.
pub fn evaluation_dir(root: &Path, session: u32) -> PathBuf {
    root.join(format!("Session{session}"))
        .join("dialog")
        .join("EmoEvaluation")
}

/// Immutable, ordered table of every utterance in the corpus. Built once;
/// insertion order is the order used for indexed access.
#[derive(Clone, Debug, Default)]
pub struct CorpusIndex {
    records: Vec<UtteranceRecord>,
}

impl CorpusIndex {
    /// Scan the evaluation files of each session under `root`, in the
    /// order given.
    pub fn build(root: &Path, sessions: &[u32], extension: &str) -> Result<Self> {
        let mut records = Vec::new();
        for &session in sessions {
            let dir = evaluation_dir(root, session);
            let rows = annotation::read_annotation_dir(&dir, extension)?;
            log::info!("Session{}: {} utterances", session, rows.len());
            for row in rows {
                records.push(UtteranceRecord::from_row(row)?);
            }
        }
        log::info!("Indexed {} utterances from {} session(s)", records.len(), sessions.len());
        Ok(Self { records })
    }

    pub fn from_records(records: Vec<UtteranceRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&UtteranceRecord> {
        self.records.get(index).ok_or(CorpusError::IndexOutOfRange {
            index,
            len: self.records.len(),
        })
    }

    pub fn records(&self) -> &[UtteranceRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UtteranceRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a CorpusIndex {
    type Item = &'a UtteranceRecord;
    type IntoIter = std::slice::Iter<'a, UtteranceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(file_id: &str, emotion: Emotion) -> UtteranceRecord {
        UtteranceRecord {
            start: 0.0,
            end: 1.0,
            file_id: file_id.to_string(),
            emotion,
            activation: 2.5,
            valence: 2.5,
            dominance: 2.5,
        }
    }

    /// Write an evaluation file for `session` containing the given lines.
    pub(crate) fn write_evaluation(root: &Path, session: u32, name: &str, body: &str) {
        let dir = evaluation_dir(root, session);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(name), body).unwrap();
    }

    fn line(file_id: &str, emotion: &str) -> String {
        format!("[1.0000 - 2.5000]\t{file_id}\t{emotion}\t[2.5000, 3.0000, 3.5000]\n")
    }

    #[test]
    fn derives_session_relative_audio_path() {
        let r = record("Ses01F_impro01_F000", Emotion::Neutral);
        assert_eq!(r.session().unwrap(), 1);
        assert_eq!(r.utterance_group().unwrap(), "Ses01F_impro01");
        assert_eq!(
            r.relative_audio_path().unwrap(),
            PathBuf::from("Session1/sentences/wav/Ses01F_impro01/Ses01F_impro01_F000.wav")
        );
    }

    #[test]
    fn scripted_ids_keep_their_script_number() {
        let r = record("Ses03M_script01_2_M012", Emotion::Anger);
        assert_eq!(
            r.relative_audio_path().unwrap(),
            PathBuf::from("Session3/sentences/wav/Ses03M_script01_2/Ses03M_script01_2_M012.wav")
        );
    }

    #[test]
    fn malformed_file_id_fails_only_on_resolution() {
        let r = record("abc", Emotion::Neutral);
        assert!(matches!(r.relative_audio_path(), Err(CorpusError::InvalidFileId { .. })));
        let r = record("Ses0XF_impro01_F000", Emotion::Neutral);
        assert!(matches!(r.session(), Err(CorpusError::InvalidFileId { .. })));
    }

    #[test]
    fn size_matches_bracketed_lines_across_sessions() {
        let root = tempfile::tempdir().unwrap();
        let mut expected = 0;
        for session in 1..=5 {
            let id = format!("Ses0{session}F_impro01_F000");
            let body = format!("% header\n\n{}C-E1:\tNeutral;\t()\n{}", line(&id, "neu"), line(&id, "sad"));
            write_evaluation(root.path(), session, "Ses_impro01.txt", &body);
            expected += 2;
        }
        write_evaluation(root.path(), 5, "Ses_impro02.txt", &line("Ses05F_impro02_M003", "xxx"));
        expected += 1;

        let index = CorpusIndex::build(root.path(), &[1, 2, 3, 4, 5], "txt").unwrap();
        assert_eq!(index.len(), expected);
        assert_eq!(index.get(0).unwrap().file_id, "Ses01F_impro01_F000");
        assert_eq!(index.get(expected - 1).unwrap().emotion, Emotion::Unknown);
        assert_eq!(index.get(expected - 1).unwrap().emotion.code(), 9);
    }

    #[test]
    fn keeps_session_then_file_order() {
        let root = tempfile::tempdir().unwrap();
        write_evaluation(root.path(), 2, "b.txt", &line("Ses02M_impro02_M000", "hap"));
        write_evaluation(root.path(), 2, "a.txt", &line("Ses02M_impro01_M000", "exc"));
        write_evaluation(root.path(), 1, "z.txt", &line("Ses01M_impro09_M000", "ang"));

        let index = CorpusIndex::build(root.path(), &[1, 2], "txt").unwrap();
        let ids: Vec<&str> = index.iter().map(|r| r.file_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["Ses01M_impro09_M000", "Ses02M_impro01_M000", "Ses02M_impro02_M000"]
        );
        let record = index.get(0).unwrap();
        assert_eq!(record.emotion.code(), 1);
        assert_eq!((record.activation, record.valence, record.dominance), (2.5, 3.0, 3.5));
        assert_eq!(record.duration(), 1.5);
    }

    #[test]
    fn unknown_label_aborts_build() {
        let root = tempfile::tempdir().unwrap();
        write_evaluation(root.path(), 1, "a.txt", &line("Ses01F_impro01_F000", "oth"));
        let err = CorpusIndex::build(root.path(), &[1], "txt").unwrap_err();
        assert!(matches!(err, CorpusError::UnknownLabel { ref label } if label == "oth"));
    }

    #[test]
    fn missing_session_aborts_build() {
        let root = tempfile::tempdir().unwrap();
        write_evaluation(root.path(), 1, "a.txt", &line("Ses01F_impro01_F000", "neu"));
        assert!(CorpusIndex::build(root.path(), &[1, 2], "txt").is_err());
    }

    #[test]
    fn out_of_range_lookup_fails() {
        let index = CorpusIndex::from_records(vec![record("Ses01F_impro01_F000", Emotion::Sadness)]);
        assert!(index.get(0).is_ok());
        assert!(matches!(
            index.get(1),
            Err(CorpusError::IndexOutOfRange { index: 1, len: 1 })
        ));
    }
}
