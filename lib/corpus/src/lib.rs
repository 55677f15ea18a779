//! # careerfit-corpus
//!
//! Loads the survey corpus the recommender is fitted on. Each row becomes a
//! [`Record`]; the [`Corpus`] keeps the first record for every career label.
//!
//! ```
//! use careerfit_corpus::{ColumnConfig, CsvLoader};
//!
//! let columns = ColumnConfig {
//!     label: "job".into(),
//!     skills: "skills".into(),
//!     interests: "interests".into(),
//! };
//! let csv = "interests,skills,job\nmusic,guitar,Musician\n";
//! let corpus = CsvLoader::from_reader(csv.as_bytes(), &columns).unwrap();
//! assert_eq!(corpus.interest_options(), vec!["music"]);
//! ```

pub mod loader;
pub mod record;

pub use loader::{
    ColumnConfig, CsvLoader, DEFAULT_INTERESTS_COLUMN, DEFAULT_LABEL_COLUMN,
    DEFAULT_SKILLS_COLUMN, MISSING_MARKERS,
};
pub use record::{Corpus, Record};
