//! # careerfit Embed
//!
//! Turns free text into the dense, standardized vectors the neighbour index
//! searches over.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   TF-IDF    │────>│  Truncated  │────>│  Standard   │
//! │ (text→sparse)│    │ SVD (→ K)   │     │  Scaler     │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! Every stage is fitted once on the corpus and then only read.
//!
//! ## Example
//!
//! ```rust
//! use careerfit_embed::{StandardScaler, TfidfEncoder, TruncatedSvd};
//!
//! let docs = ["python data analysis", "graphic design", "data design", "web python"];
//! let tfidf = TfidfEncoder::fit(&docs).unwrap();
//! let sparse = tfidf.encode_batch(&docs);
//! let svd = TruncatedSvd::fit(&sparse, 2).unwrap();
//! let dense = svd.project_batch(&sparse);
//! let scaler = StandardScaler::fit(&dense).unwrap();
//!
//! let query = scaler.scale(&svd.project(&tfidf.encode("python"))).unwrap();
//! assert_eq!(query.dim(), 2);
//! ```

pub mod scaler;
pub mod svd;
pub mod tfidf;
pub mod tokenize;

pub use scaler::StandardScaler;
pub use svd::{TruncatedSvd, DEFAULT_COMPONENTS};
pub use tfidf::{TfidfBuilder, TfidfEncoder, DEFAULT_MAX_FEATURES};
pub use tokenize::{StopWords, Tokenizer, ENGLISH_STOP_WORDS};
