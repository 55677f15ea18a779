//! # careerfit
//!
//! Career recommendations from free-text interests and skills.
//!
//! A survey corpus of (interests, skills, first job title) records is fitted
//! once into an immutable [`Recommender`]. Queries then run through the same
//! pipeline the corpus went through:
//!
//! ```text
//! text ─► TF-IDF ─► truncated SVD ─► standard scaler ─► cosine kNN ─► labels
//! ```
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! careerfit --corpus survey.csv recommend --interests "data science" --skills "python"
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use careerfit::prelude::*;
//!
//! let corpus = Corpus::from_records(vec![
//!     Record::new("data science", "python sql", "Data Analyst"),
//!     Record::new("web design", "javascript css", "Web Developer"),
//!     Record::new("painting", "illustration", "Illustrator"),
//! ]);
//! let config = RecommenderConfig { n_components: 2, ..Default::default() };
//! let recommender = Recommender::fit(corpus, &config).unwrap();
//!
//! let careers = recommender.recommend("python data");
//! assert!(careers.iter().any(|c| c == "Data Analyst"));
//! assert!(recommender.recommend("").is_empty());
//! ```
//!
//! ## Crate Structure
//!
//! - `careerfit-core` - vectors, sparse vectors, the neighbour index, errors
//! - `careerfit-embed` - tokenizer, TF-IDF, truncated SVD, standard scaler
//! - `careerfit-corpus` - records, corpus deduplication, CSV loading

pub mod assemble;
pub mod config;
pub mod recommender;

pub use assemble::{assemble, assemble_scored, is_placeholder, Recommendation};
pub use config::{RecommenderConfig, DEFAULT_NEIGHBORS, DEFAULT_SENTINEL};
pub use recommender::Recommender;

// Re-export crate types
pub use careerfit_core::{Distance, Error, Neighbor, NeighborIndex, Result, SparseVector, Vector};
pub use careerfit_corpus::{ColumnConfig, Corpus, CsvLoader, Record};
pub use careerfit_embed::{StandardScaler, StopWords, TfidfEncoder, Tokenizer, TruncatedSvd};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ColumnConfig, Corpus, CsvLoader, Distance, Error, Recommendation, Recommender,
        RecommenderConfig, Record, Result,
    };
}
