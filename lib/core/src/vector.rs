use serde::{Deserialize, Serialize};

/// A dense vector of `f32` components
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self {
            data: vec![0.0; dim],
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// True when every component is exactly zero
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&x| x == 0.0)
    }

    #[inline]
    #[must_use]
    pub fn norm(&self) -> f32 {
        crate::kernels::norm(&self.data)
    }

    #[inline]
    pub fn dot(&self, other: &Vector) -> f32 {
        crate::kernels::dot(&self.data, &other.data)
    }

    /// Cosine similarity. A zero-norm operand, or a dimension mismatch,
    /// yields 0.0.
    #[inline]
    pub fn cosine_similarity(&self, other: &Vector) -> f32 {
        if self.dim() != other.dim() {
            return 0.0;
        }

        let norm_a = self.norm();
        let norm_b = other.norm();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        self.dot(other) / (norm_a * norm_b)
    }

    /// Cosine distance, `1 - cos`, clamped to `[0, 2]`.
    ///
    /// Two zero vectors are identical (distance 0); a zero vector against a
    /// non-zero one is orthogonal (distance 1).
    #[inline]
    pub fn cosine_distance(&self, other: &Vector) -> f32 {
        if self.dim() == other.dim() && self.is_zero() && other.is_zero() {
            return 0.0;
        }
        (1.0 - self.cosine_similarity(other)).clamp(0.0, 2.0)
    }

    #[inline]
    pub fn l2_distance(&self, other: &Vector) -> f32 {
        crate::kernels::l2_distance(&self.data, &other.data)
    }

    /// Normalize to unit length in place; zero vectors are left untouched
    #[inline]
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > f32::EPSILON {
            let inv_norm = 1.0 / norm;
            for x in &mut self.data {
                *x *= inv_norm;
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut v = self.clone();
        v.normalize();
        v
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}
