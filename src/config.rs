//! Recommender configuration.

use careerfit_core::{Distance, Error, Result};
use careerfit_corpus::ColumnConfig;
use careerfit_embed::{DEFAULT_COMPONENTS, DEFAULT_MAX_FEATURES};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of neighbours retrieved per query
pub const DEFAULT_NEIGHBORS: usize = 5;

/// Label that marks "not applicable" answers in the survey
pub const DEFAULT_SENTINEL: &str = "NA";

/// Settings for fitting and querying a [`Recommender`](crate::Recommender).
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Vocabulary cap for the TF-IDF encoder
    pub max_features: usize,
    /// Latent dimensions kept by the truncated SVD
    pub n_components: usize,
    /// Neighbours retrieved before labels are filtered
    pub n_neighbors: usize,
    pub distance: Distance,
    /// Placeholder label excluded from results (case-insensitive)
    pub sentinel: String,
    /// Return nothing for queries without a single known term
    pub skip_uninformative_queries: bool,
    pub columns: ColumnConfig,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            n_components: DEFAULT_COMPONENTS,
            n_neighbors: DEFAULT_NEIGHBORS,
            distance: Distance::Cosine,
            sentinel: DEFAULT_SENTINEL.to_string(),
            skip_uninformative_queries: true,
            columns: ColumnConfig::default(),
        }
    }
}

impl RecommenderConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_features == 0 {
            return Err(Error::InvalidConfig("max_features must be at least 1".to_string()));
        }
        if self.n_components == 0 {
            return Err(Error::InvalidConfig("n_components must be at least 1".to_string()));
        }
        if self.n_neighbors == 0 {
            return Err(Error::InvalidConfig("n_neighbors must be at least 1".to_string()));
        }
        Ok(())
    }
}
