//! # careerfit Core
//!
//! Core library for the careerfit recommender.
//!
//! This crate provides the numeric building blocks shared by the other crates:
//!
//! - [`Vector`] - Dense `f32` vector with cosine / Euclidean distances
//! - [`SparseVector`] - Sorted-index sparse vector for term weights
//! - [`NeighborIndex`] - Exact k-nearest-neighbour search with stable tie-breaking
//! - [`Error`] - The error type returned by every fallible operation
//!
//! ## Example
//!
//! ```rust
//! use careerfit_core::{Distance, NeighborIndex, Vector};
//!
//! let rows = vec![
//!     Vector::new(vec![1.0, 0.0]),
//!     Vector::new(vec![0.0, 1.0]),
//! ];
//! let index = NeighborIndex::build(rows, Distance::Cosine).unwrap();
//!
//! let hits = index.query(&Vector::new(vec![0.9, 0.1]), 5).unwrap();
//! assert_eq!(hits.len(), 2);
//! assert_eq!(hits[0].row, 0);
//! ```

pub mod error;
pub mod neighbors;
pub mod sparse;
pub mod vector;

/// Dense `f32` kernels (dot product, norms, Euclidean distance)
pub mod kernels;

pub use error::{Error, Result};
pub use neighbors::{Distance, Neighbor, NeighborIndex};
pub use sparse::SparseVector;
pub use vector::Vector;
