//! Survey CSV ingestion.

use crate::record::{Corpus, Record};
use careerfit_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

pub const DEFAULT_LABEL_COLUMN: &str =
    "If yes, then what is/was your first Job title in your current field of work? If not applicable, write NA.";
pub const DEFAULT_SKILLS_COLUMN: &str = "What are your skills ? (Select multiple if necessary)";
pub const DEFAULT_INTERESTS_COLUMN: &str = "What are your interests?";

/// Cell values read as missing, the same set dataframe tools treat as NA.
/// Matched exactly, case and whitespace included.
pub const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Header names of the three columns the loader reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub label: String,
    pub skills: String,
    pub interests: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL_COLUMN.to_string(),
            skills: DEFAULT_SKILLS_COLUMN.to_string(),
            interests: DEFAULT_INTERESTS_COLUMN.to_string(),
        }
    }
}

pub struct CsvLoader;

impl CsvLoader {
    /// Load a corpus from a CSV file on disk
    pub fn load<P: AsRef<Path>>(path: P, columns: &ColumnConfig) -> Result<Corpus> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading corpus");
        let file = File::open(path)?;
        Self::from_reader(file, columns)
    }

    /// Load a corpus from any CSV source.
    ///
    /// Header names are trimmed before matching. Short rows and cells equal to
    /// one of [`MISSING_MARKERS`] yield empty strings.
    pub fn from_reader<R: Read>(reader: R, columns: &ColumnConfig) -> Result<Corpus> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| Error::Csv(format!("failed to read headers: {e}")))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let position = |name: &str| headers.iter().position(|h| h == name.trim());
        let (Some(label_idx), Some(skills_idx), Some(interests_idx)) = (
            position(&columns.label),
            position(&columns.skills),
            position(&columns.interests),
        ) else {
            let missing: Vec<String> = [&columns.label, &columns.skills, &columns.interests]
                .into_iter()
                .filter(|name| position(name).is_none())
                .cloned()
                .collect();
            debug!(available = ?headers, "required columns not found");
            return Err(Error::MissingColumns(missing));
        };

        let mut records = Vec::new();
        for (line, row) in reader.records().enumerate() {
            let row = row.map_err(|e| Error::Csv(format!("row {}: {e}", line + 1)))?;
            let cell = |idx: usize| match row.get(idx) {
                Some(value) if !MISSING_MARKERS.contains(&value) => value.to_string(),
                _ => String::new(),
            };
            records.push(Record::new(cell(interests_idx), cell(skills_idx), cell(label_idx)));
        }

        info!(rows = records.len(), "corpus rows read");
        Ok(Corpus::from_records(records))
    }
}
