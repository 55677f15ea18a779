//! Exact k-nearest-neighbour search over a fixed set of dense rows.
//!
//! The index is built once and never mutated, so a shared reference can be
//! queried from any number of threads.

use crate::{Error, Result, Vector};
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BinaryHeap;
use tracing::debug;

/// Row count above which distances are computed on the rayon pool
const PARALLEL_SCAN_THRESHOLD: usize = 4096;

/// Distance metric. Smaller is always closer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distance {
    /// `1 - cosine similarity`
    #[default]
    Cosine,
    Euclidean,
    /// Negated inner product
    Dot,
}

impl Distance {
    #[inline]
    pub fn between(self, a: &Vector, b: &Vector) -> f32 {
        match self {
            Distance::Cosine => a.cosine_distance(b),
            Distance::Euclidean => a.l2_distance(b),
            Distance::Dot => -a.dot(b),
        }
    }
}

impl std::fmt::Display for Distance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Distance::Cosine => write!(f, "cosine"),
            Distance::Euclidean => write!(f, "euclidean"),
            Distance::Dot => write!(f, "dot"),
        }
    }
}

/// One search hit: the stored row position and its distance to the query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub row: usize,
    pub distance: f32,
}

/// Brute-force neighbour index over row-ordered vectors
#[derive(Debug, Clone)]
pub struct NeighborIndex {
    rows: Vec<Vector>,
    dim: usize,
    distance: Distance,
}

impl NeighborIndex {
    /// Build an index. Every row must share the first row's dimension.
    pub fn build(rows: Vec<Vector>, distance: Distance) -> Result<Self> {
        let dim = rows.first().map_or(0, Vector::dim);
        if let Some(bad) = rows.iter().find(|r| r.dim() != dim) {
            return Err(Error::InvalidDimension {
                expected: dim,
                actual: bad.dim(),
            });
        }

        debug!(rows = rows.len(), dim, %distance, "neighbour index built");
        Ok(Self {
            rows,
            dim,
            distance,
        })
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    #[must_use]
    pub fn distance(&self) -> Distance {
        self.distance
    }

    /// Stored vector for `row`
    #[inline]
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&Vector> {
        self.rows.get(row)
    }

    /// The `k` rows closest to `query`, ascending by distance.
    ///
    /// Equal distances keep row order. When fewer than `k` rows are stored,
    /// all of them are returned.
    pub fn query(&self, query: &Vector, k: usize) -> Result<Vec<Neighbor>> {
        if k == 0 || self.rows.is_empty() {
            return Ok(Vec::new());
        }
        if query.dim() != self.dim {
            return Err(Error::InvalidDimension {
                expected: self.dim,
                actual: query.dim(),
            });
        }

        let metric = self.distance;
        let scored: Vec<(OrderedFloat<f32>, usize)> = if self.rows.len() > PARALLEL_SCAN_THRESHOLD {
            self.rows
                .par_iter()
                .enumerate()
                .map(|(row, v)| (OrderedFloat(metric.between(query, v)), row))
                .collect()
        } else {
            self.rows
                .iter()
                .enumerate()
                .map(|(row, v)| (OrderedFloat(metric.between(query, v)), row))
                .collect()
        };

        // Max-heap of the best k so far: the root is the current worst
        // (largest distance, then largest row), which is what gets evicted.
        let mut best: BinaryHeap<(OrderedFloat<f32>, usize)> = BinaryHeap::with_capacity(k + 1);
        for entry in scored {
            if best.len() < k {
                best.push(entry);
            } else if best.peek().is_some_and(|worst| entry < *worst) {
                best.pop();
                best.push(entry);
            }
        }

        Ok(best
            .into_sorted_vec()
            .into_iter()
            .map(|(d, row)| Neighbor {
                row,
                distance: d.into_inner(),
            })
            .collect())
    }
}
