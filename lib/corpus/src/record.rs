use ahash::AHashSet;
use careerfit_core::Error;
use tracing::{info, warn};

/// One survey respondent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub interests: String,
    pub skills: String,
    pub career_label: String,
    combined_text: String,
}

impl Record {
    pub fn new(
        interests: impl Into<String>,
        skills: impl Into<String>,
        career_label: impl Into<String>,
    ) -> Self {
        let interests = interests.into();
        let skills = skills.into();
        let combined_text = format!("{interests} {skills}");
        Self {
            interests,
            skills,
            career_label: career_label.into(),
            combined_text,
        }
    }

    /// `interests + " " + skills`
    #[inline]
    #[must_use]
    pub fn combined_text(&self) -> &str {
        &self.combined_text
    }
}

/// Ordered, label-unique set of records. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    records: Vec<Record>,
}

impl Corpus {
    /// Build a corpus, dropping every record whose `career_label` was already
    /// seen. The first occurrence wins and order is otherwise preserved.
    pub fn from_records(records: Vec<Record>) -> Self {
        let total = records.len();
        let mut seen: AHashSet<String> = AHashSet::with_capacity(total);
        let records: Vec<Record> = records
            .into_iter()
            .filter(|r| seen.insert(r.career_label.clone()))
            .collect();

        let dropped = total - records.len();
        if dropped > 0 {
            warn!(dropped, "dropped records with duplicate career labels");
        }
        info!(records = records.len(), "corpus prepared");
        Self { records }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&Record> {
        self.records.get(row)
    }

    #[inline]
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// `career_label` for `row`
    #[inline]
    #[must_use]
    pub fn label(&self, row: usize) -> Option<&str> {
        self.records.get(row).map(|r| r.career_label.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.iter().map(|r| r.career_label.as_str())
    }

    /// Combined texts in row order
    #[must_use]
    pub fn combined_texts(&self) -> Vec<&str> {
        self.records.iter().map(Record::combined_text).collect()
    }

    /// Distinct non-empty `interests` values, first-seen order
    #[must_use]
    pub fn interest_options(&self) -> Vec<&str> {
        distinct_non_empty(self.records.iter().map(|r| r.interests.as_str()))
    }

    /// Distinct non-empty `skills` values, first-seen order
    #[must_use]
    pub fn skill_options(&self) -> Vec<&str> {
        distinct_non_empty(self.records.iter().map(|r| r.skills.as_str()))
    }

    /// Fail with [`Error::EmptyCorpus`] when there is nothing to fit on
    pub fn ensure_non_empty(&self) -> careerfit_core::Result<()> {
        if self.records.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        Ok(())
    }
}

fn distinct_non_empty<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = AHashSet::new();
    values
        .filter(|v| !v.is_empty() && seen.insert(*v))
        .collect()
}

impl FromIterator<Record> for Corpus {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}
