use crate::{Error, Result, Vector};
use serde::{Deserialize, Serialize};

/// A sparse vector stored as strictly increasing `indices` with matching `values`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SparseVector {
    dim: usize,
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl SparseVector {
    /// Build a sparse vector, validating index order and bounds.
    pub fn new(dim: usize, indices: Vec<u32>, values: Vec<f32>) -> Result<Self> {
        if indices.len() != values.len() {
            return Err(Error::InvalidDimension {
                expected: indices.len(),
                actual: values.len(),
            });
        }
        if indices.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::InvalidConfig(
                "sparse indices must be strictly increasing".to_string(),
            ));
        }
        if let Some(&last) = indices.last() {
            if last as usize >= dim {
                return Err(Error::InvalidDimension {
                    expected: dim,
                    actual: last as usize + 1,
                });
            }
        }
        Ok(Self { dim, indices, values })
    }

    /// Build from `(index, value)` pairs in any order. Duplicate indices are summed.
    #[must_use]
    pub fn from_pairs(dim: usize, mut pairs: Vec<(u32, f32)>) -> Self {
        pairs.retain(|&(i, _)| (i as usize) < dim);
        pairs.sort_unstable_by_key(|&(i, _)| i);

        let mut indices: Vec<u32> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f32> = Vec::with_capacity(pairs.len());
        for (i, v) in pairs {
            match indices.last() {
                Some(&last) if last == i => {
                    if let Some(acc) = values.last_mut() {
                        *acc += v;
                    }
                }
                _ => {
                    indices.push(i);
                    values.push(v);
                }
            }
        }
        Self { dim, indices, values }
    }

    #[inline]
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored entries
    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0)
    }

    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.indices
            .iter()
            .zip(&self.values)
            .map(|(&i, &v)| (i as usize, v))
    }

    #[inline]
    #[must_use]
    pub fn norm(&self) -> f32 {
        crate::kernels::norm(&self.values)
    }

    /// Scale to unit L2 norm in place; zero vectors are left untouched
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for v in &mut self.values {
                *v /= norm;
            }
        }
    }

    /// Dot product with a dense row of the same dimension
    #[inline]
    pub fn dot_dense(&self, dense: &[f32]) -> f32 {
        self.iter()
            .filter_map(|(i, v)| dense.get(i).map(|d| v * d))
            .sum()
    }

    #[must_use]
    pub fn to_dense(&self) -> Vector {
        let mut data = vec![0.0; self.dim];
        for (i, v) in self.iter() {
            data[i] = v;
        }
        Vector::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_unsorted_and_out_of_range() {
        assert!(SparseVector::new(4, vec![2, 1], vec![1.0, 1.0]).is_err());
        assert!(SparseVector::new(4, vec![1, 4], vec![1.0, 1.0]).is_err());
        assert!(SparseVector::new(4, vec![1], vec![1.0, 2.0]).is_err());
        assert!(SparseVector::new(4, vec![0, 3], vec![1.0, 2.0]).is_ok());
    }

    #[test]
    fn test_from_pairs_sorts_and_merges() {
        let v = SparseVector::from_pairs(5, vec![(3, 1.0), (1, 2.0), (3, 0.5), (9, 7.0)]);
        assert_eq!(v.indices(), &[1, 3]);
        assert_eq!(v.values(), &[2.0, 1.5]);
        assert_eq!(v.dim(), 5);
    }

    #[test]
    fn test_dot_dense_and_to_dense() {
        let v = SparseVector::from_pairs(4, vec![(0, 1.0), (2, 3.0)]);
        assert!((v.dot_dense(&[2.0, 9.0, 1.0, 9.0]) - 5.0).abs() < 1e-6);
        assert_eq!(v.to_dense().as_slice(), &[1.0, 0.0, 3.0, 0.0]);
    }

    #[test]
    fn test_zero_vector() {
        let mut z = SparseVector::zeros(10);
        assert!(z.is_zero());
        assert_eq!(z.nnz(), 0);
        z.normalize();
        assert!(z.to_dense().is_zero());
    }
}
