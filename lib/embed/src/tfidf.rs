//! TF-IDF Encoder
//!
//! Learns a bounded vocabulary from a corpus and encodes text as L2-normalized
//! term-frequency × inverse-document-frequency sparse vectors.

use crate::tokenize::{StopWords, Tokenizer};
use ahash::AHashMap;
use careerfit_core::{Error, Result, SparseVector};
use rayon::prelude::*;
use tracing::{debug, info};

/// Default vocabulary cap
pub const DEFAULT_MAX_FEATURES: usize = 1000;

/// A fitted TF-IDF encoder. Immutable after [`TfidfBuilder::fit`].
#[derive(Debug, Clone)]
pub struct TfidfEncoder {
    tokenizer: Tokenizer,
    vocabulary: AHashMap<String, u32>,
    terms: Vec<String>,
    idf: Vec<f32>,
}

/// Builder for [`TfidfEncoder`]
#[derive(Debug, Clone)]
pub struct TfidfBuilder {
    max_features: usize,
    stop_words: StopWords,
}

impl Default for TfidfBuilder {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            stop_words: StopWords::english(),
        }
    }
}

impl TfidfBuilder {
    pub fn max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    /// Learn the vocabulary and IDF weights from `documents`.
    ///
    /// Terms are ranked by total corpus count (ties alphabetical) and the top
    /// `max_features` kept; columns are then assigned alphabetically.
    /// `idf(t) = ln((1 + n) / (1 + df(t))) + 1`.
    pub fn fit<S: AsRef<str> + Sync>(self, documents: &[S]) -> Result<TfidfEncoder> {
        if documents.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        if self.max_features == 0 {
            return Err(Error::InvalidConfig("max_features must be at least 1".to_string()));
        }

        let tokenizer = Tokenizer::new(self.stop_words);
        let per_doc: Vec<AHashMap<String, u32>> = documents
            .par_iter()
            .map(|doc| count_terms(&tokenizer.tokenize(doc.as_ref())))
            .collect();

        let mut totals: AHashMap<&str, (u64, u32)> = AHashMap::new();
        for counts in &per_doc {
            for (term, &c) in counts {
                let entry = totals.entry(term.as_str()).or_insert((0, 0));
                entry.0 += u64::from(c);
                entry.1 += 1;
            }
        }

        if totals.is_empty() {
            return Err(Error::InvalidConfig(
                "empty vocabulary: every document contains only stop words".to_string(),
            ));
        }

        let mut ranked: Vec<(&str, u64, u32)> =
            totals.into_iter().map(|(t, (count, df))| (t, count, df)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.max_features);
        ranked.sort_by(|a, b| a.0.cmp(b.0));

        let n = documents.len();
        let mut vocabulary = AHashMap::with_capacity(ranked.len());
        let mut terms = Vec::with_capacity(ranked.len());
        let mut idf = Vec::with_capacity(ranked.len());
        for (col, (term, _, df)) in ranked.into_iter().enumerate() {
            vocabulary.insert(term.to_string(), col as u32);
            terms.push(term.to_string());
            idf.push((((1 + n) as f64 / (1 + df as usize) as f64).ln() + 1.0) as f32);
        }

        info!(documents = n, vocabulary = terms.len(), "TF-IDF vocabulary fitted");
        Ok(TfidfEncoder {
            tokenizer,
            vocabulary,
            terms,
            idf,
        })
    }
}

fn count_terms(tokens: &[String]) -> AHashMap<String, u32> {
    let mut counts = AHashMap::new();
    for t in tokens {
        *counts.entry(t.clone()).or_insert(0) += 1;
    }
    counts
}

impl TfidfEncoder {
    #[must_use]
    pub fn builder() -> TfidfBuilder {
        TfidfBuilder::default()
    }

    /// Fit with default settings (English stop words, 1000 features)
    pub fn fit<S: AsRef<str> + Sync>(documents: &[S]) -> Result<Self> {
        Self::builder().fit(documents)
    }

    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    /// Terms in column order
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    #[must_use]
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).map(|&i| i as usize)
    }

    #[must_use]
    pub fn idf(&self, term: &str) -> Option<f32> {
        self.term_index(term).map(|i| self.idf[i])
    }

    /// Encode `text`. Text with no known terms yields the zero vector.
    pub fn encode(&self, text: &str) -> SparseVector {
        let mut counts: AHashMap<u32, u32> = AHashMap::new();
        for token in self.tokenizer.tokenize(text) {
            if let Some(&col) = self.vocabulary.get(&token) {
                *counts.entry(col).or_insert(0) += 1;
            }
        }

        let pairs: Vec<(u32, f32)> = counts
            .into_iter()
            .map(|(col, c)| (col, c as f32 * self.idf[col as usize]))
            .collect();
        let mut v = SparseVector::from_pairs(self.vocabulary_size(), pairs);
        v.normalize();
        debug!(nnz = v.nnz(), "encoded text");
        v
    }

    /// Encode many texts in parallel, preserving order
    pub fn encode_batch<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<SparseVector> {
        texts.par_iter().map(|t| self.encode(t.as_ref())).collect()
    }
}
