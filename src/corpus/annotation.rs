use std::path::{Path, PathBuf};

use crate::error::{CorpusError, Result};

/// Number of fields in a normalized utterance line.
pub const FIELD_COUNT: usize = 7;

/// One utterance line from an evaluation file, before the emotion label
/// is resolved against the closed label set.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationRow {
    pub start: f32,
    pub end: f32,
    pub file_id: String,
    pub emotion: String,
    pub activation: f32,
    pub valence: f32,
    pub dominance: f32,
}

/// Normalize an utterance line into its fields.
///
/// `[6.29 - 8.23]\tSes01F_impro01_F000\tneu\t[2.5, 2.5, 2.5]` becomes
/// `6.29`, `8.23`, `Ses01F_impro01_F000`, `neu`, `2.5`, `2.5`, `2.5`.
pub fn split_fields(line: &str) -> Vec<String> {
    line.trim()
        .replace(['[', ']'], "")
        .replace(" - ", "\t")
        .replace(", ", "\t")
        .split('\t')
        .map(str::to_string)
        .collect()
}

/// Parse the text of one evaluation file. Only lines starting with `[`
/// are utterance records; everything else is a header or a per-rater
/// comment and is skipped.
pub fn parse_annotation(text: &str, path: &Path) -> Result<Vec<AnnotationRow>> {
    let mut rows = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if !line.starts_with('[') {
            continue;
        }
        let line_no = idx + 1;
        let fields = split_fields(line);
        if fields.len() != FIELD_COUNT {
            return Err(CorpusError::Parse {
                path: path.to_path_buf(),
                line_no,
                fields,
            });
        }

        let number = |i: usize, field: &'static str| -> Result<f32> {
            fields[i].parse().map_err(|_| CorpusError::InvalidNumber {
                path: path.to_path_buf(),
                line_no,
                field,
                value: fields[i].clone(),
            })
        };

        rows.push(AnnotationRow {
            start: number(0, "start")?,
            end: number(1, "end")?,
            file_id: fields[2].clone(),
            emotion: fields[3].clone(),
            activation: number(4, "activation")?,
            valence: number(5, "valence")?,
            dominance: number(6, "dominance")?,
        });
    }

    Ok(rows)
}

pub fn parse_annotation_file(path: &Path) -> Result<Vec<AnnotationRow>> {
    let text = std::fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;
    parse_annotation(&text, path)
}

/// List the evaluation files in `dir` with the given extension, sorted by
/// file name.
pub fn list_annotation_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries = std::fs::read_dir(dir).map_err(|e| CorpusError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| CorpusError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) == Some(extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Parse every evaluation file in `dir`, concatenating rows in file-name
/// order.
pub fn read_annotation_dir(dir: &Path, extension: &str) -> Result<Vec<AnnotationRow>> {
    let mut rows = Vec::new();
    for file in list_annotation_files(dir, extension)? {
        let parsed = parse_annotation_file(&file)?;
        log::debug!("{}: {} utterances", file.display(), parsed.len());
        rows.extend(parsed);
    }
    Ok(rows)
}
