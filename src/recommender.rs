//! The fitted text-to-recommendation pipeline.

use crate::assemble::{assemble_scored, Recommendation};
use crate::config::RecommenderConfig;
use careerfit_core::{Neighbor, NeighborIndex, Result, Vector};
use careerfit_corpus::Corpus;
use careerfit_embed::{StandardScaler, TfidfEncoder, TruncatedSvd};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Everything fitted on a corpus: vocabulary, latent basis, scaler and index.
///
/// Immutable once built. All query methods take `&self`, so one instance can
/// be shared between threads without locking.
#[derive(Debug, Clone)]
pub struct Recommender {
    corpus: Corpus,
    encoder: TfidfEncoder,
    svd: TruncatedSvd,
    scaler: StandardScaler,
    index: NeighborIndex,
    config: RecommenderConfig,
}

impl Recommender {
    /// Fit every stage on `corpus` and build the neighbour index.
    ///
    /// Fails when the corpus is empty, the vocabulary is empty, or
    /// `n_components` exceeds `min(vocabulary, corpus - 1)`.
    pub fn fit(corpus: Corpus, config: &RecommenderConfig) -> Result<Self> {
        config.validate()?;
        corpus.ensure_non_empty()?;
        let started = Instant::now();

        let texts = corpus.combined_texts();
        let encoder = TfidfEncoder::builder()
            .max_features(config.max_features)
            .fit(&texts)?;
        let term_vectors = encoder.encode_batch(&texts);

        let svd = TruncatedSvd::fit(&term_vectors, config.n_components)?;
        let reduced = svd.project_batch(&term_vectors);
        let scaler = StandardScaler::fit(&reduced)?;
        let rows = scaler.scale_batch(&reduced)?;
        let index = NeighborIndex::build(rows, config.distance)?;

        info!(
            records = corpus.len(),
            vocabulary = encoder.vocabulary_size(),
            components = svd.n_components(),
            distance = %config.distance,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "recommender fitted"
        );

        Ok(Self {
            corpus,
            encoder,
            svd,
            scaler,
            index,
            config: config.clone(),
        })
    }

    #[must_use]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    #[must_use]
    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    #[must_use]
    pub fn encoder(&self) -> &TfidfEncoder {
        &self.encoder
    }

    #[must_use]
    pub fn svd(&self) -> &TruncatedSvd {
        &self.svd
    }

    #[must_use]
    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    #[must_use]
    pub fn index(&self) -> &NeighborIndex {
        &self.index
    }

    /// Map text into the index space: encode, project, standardize.
    pub fn vectorize(&self, text: &str) -> Result<Vector> {
        let terms = self.encoder.encode(text);
        self.scaler.scale(&self.svd.project(&terms))
    }

    /// Raw nearest rows for `text`, closest first.
    ///
    /// Blank text returns nothing. So does text without a known term when
    /// `skip_uninformative_queries` is set.
    pub fn nearest(&self, text: &str) -> Result<Vec<Neighbor>> {
        let text = text.trim();
        if text.is_empty() {
            debug!("blank query");
            return Ok(Vec::new());
        }

        let terms = self.encoder.encode(text);
        if terms.is_zero() && self.config.skip_uninformative_queries {
            debug!(query = text, "no known terms in query");
            return Ok(Vec::new());
        }

        let query = self.scaler.scale(&self.svd.project(&terms))?;
        let hits = self.index.query(&query, self.config.n_neighbors)?;
        debug!(query = text, hits = hits.len(), "neighbours retrieved");
        Ok(hits)
    }

    /// Career labels for `text`, closest first, with placeholders and repeats
    /// removed. "No input" and "no match" both give an empty list.
    pub fn recommend(&self, text: &str) -> Vec<String> {
        self.recommend_with_scores(text)
            .into_iter()
            .map(|r| r.label)
            .collect()
    }

    pub fn recommend_with_scores(&self, text: &str) -> Vec<Recommendation> {
        match self.nearest(text) {
            Ok(hits) => assemble_scored(&hits, &self.corpus, &self.config.sentinel),
            Err(e) => {
                warn!(error = %e, "query failed");
                Vec::new()
            }
        }
    }

    /// Query built the way the survey front end joins its two fields
    pub fn recommend_for(&self, interests: &str, skills: &str) -> Vec<String> {
        self.recommend(format!("{interests} {skills}").trim())
    }

    /// Run many queries in parallel; results line up with `texts`
    pub fn recommend_batch<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<Vec<String>> {
        texts.par_iter().map(|t| self.recommend(t.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use careerfit_core::Error;
    use careerfit_corpus::Record;

    fn corpus() -> Corpus {
        Corpus::from_records(vec![
            Record::new("data science statistics", "python sql", "Data Analyst"),
            Record::new("web development design", "javascript css", "Web Developer"),
            Record::new("drawing painting art", "illustration photoshop", "Graphic Designer"),
            Record::new("machine learning data", "python tensorflow", "ML Engineer"),
            Record::new("teaching children", "communication patience", "NA"),
            Record::new("", "", "Unknown"),
        ])
    }

    fn config() -> RecommenderConfig {
        RecommenderConfig {
            n_components: 5,
            n_neighbors: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_fit_dimensions() {
        let rec = Recommender::fit(corpus(), &config()).unwrap();
        assert_eq!(rec.index().len(), 6);
        assert_eq!(rec.index().dim(), 5);
        assert_eq!(rec.svd().n_components(), 5);
        assert_eq!(rec.scaler().dim(), 5);
    }

    #[test]
    fn test_recommend_closest_first() {
        let rec = Recommender::fit(corpus(), &config()).unwrap();
        let out = rec.recommend("data science statistics python sql");
        assert_eq!(out.first().map(String::as_str), Some("Data Analyst"));
    }

    #[test]
    fn test_blank_queries_are_empty() {
        let rec = Recommender::fit(corpus(), &config()).unwrap();
        assert!(rec.recommend("").is_empty());
        assert!(rec.recommend("   \t").is_empty());
        assert!(rec.nearest("").unwrap().is_empty());
        assert!(rec.recommend_for("", "").is_empty());
    }

    #[test]
    fn test_stop_word_query_short_circuits() {
        let rec = Recommender::fit(corpus(), &config()).unwrap();
        assert!(rec.nearest("the and of").unwrap().is_empty());
        assert!(rec.recommend("zebra quantum").is_empty());
    }

    #[test]
    fn test_vectorize_matches_index_rows() {
        let rec = Recommender::fit(corpus(), &config()).unwrap();
        for (row, record) in rec.corpus().records().iter().enumerate() {
            let v = rec.vectorize(record.combined_text()).unwrap();
            let stored = rec.index().row(row).unwrap();
            for (a, b) in v.as_slice().iter().zip(stored.as_slice()) {
                assert!((a - b).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_scores_ascending() {
        let rec = Recommender::fit(corpus(), &config()).unwrap();
        let scored = rec.recommend_with_scores("python machine learning");
        assert!(!scored.is_empty());
        assert!(scored.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_batch_matches_single() {
        let rec = Recommender::fit(corpus(), &config()).unwrap();
        let queries = ["python data", "", "art drawing", "javascript"];
        let batch = rec.recommend_batch(&queries);
        for (q, out) in queries.iter().zip(&batch) {
            assert_eq!(&rec.recommend(q), out);
        }
    }

    #[test]
    fn test_fit_errors() {
        assert!(matches!(
            Recommender::fit(Corpus::default(), &config()),
            Err(Error::EmptyCorpus)
        ));
        let too_many = RecommenderConfig { n_components: 6, ..config() };
        assert!(matches!(
            Recommender::fit(corpus(), &too_many),
            Err(Error::InsufficientData { requested: 6, .. })
        ));
        let zero = RecommenderConfig { n_neighbors: 0, ..config() };
        assert!(matches!(Recommender::fit(corpus(), &zero), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_recommender_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Recommender>();
    }
}
