//! Truncated SVD
//!
//! Projects sparse term vectors onto the top-K right singular vectors of the
//! (un-centered) corpus matrix. The decomposition goes through the eigen
//! decomposition of whichever Gram matrix is smaller: `XᵀX` (terms × terms)
//! or `XXᵀ` (documents × documents).

use careerfit_core::{Error, Result, SparseVector, Vector};
use nalgebra::{DMatrix, SymmetricEigen};
use rayon::prelude::*;
use tracing::{debug, info};

/// Default number of latent dimensions
pub const DEFAULT_COMPONENTS: usize = 100;

/// Singular values at or below `σ_max · max(n, V) · f32::EPSILON` are rank
/// noise; their components are zeroed so every row projects to 0 there.
fn null_tolerance(sigma_max: f64, x: &DMatrix<f64>) -> f64 {
    sigma_max * x.nrows().max(x.ncols()) as f64 * f64::from(f32::EPSILON)
}

#[derive(Debug, Clone)]
pub struct TruncatedSvd {
    /// K basis rows, each of length `n_features`
    components: Vec<Vector>,
    singular_values: Vec<f32>,
    explained_variance_ratio: Vec<f32>,
    n_features: usize,
}

impl TruncatedSvd {
    /// Fit `n_components` latent dimensions on `rows`.
    ///
    /// `n_components` must not exceed `min(n_features, rows.len() - 1)`.
    pub fn fit(rows: &[SparseVector], n_components: usize) -> Result<Self> {
        let first = rows.first().ok_or(Error::EmptyCorpus)?;
        let n_features = first.dim();
        if let Some(bad) = rows.iter().find(|r| r.dim() != n_features) {
            return Err(Error::InvalidDimension {
                expected: n_features,
                actual: bad.dim(),
            });
        }
        if n_components == 0 {
            return Err(Error::InvalidConfig(
                "n_components must be at least 1".to_string(),
            ));
        }

        let n_docs = rows.len();
        let max_allowed = n_features.min(n_docs - 1);
        if n_components > max_allowed {
            return Err(Error::InsufficientData {
                requested: n_components,
                vocabulary: n_features,
                documents: n_docs,
            });
        }

        let mut x = DMatrix::<f64>::zeros(n_docs, n_features);
        for (i, row) in rows.iter().enumerate() {
            for (j, v) in row.iter() {
                x[(i, j)] = f64::from(v);
            }
        }
        let total_energy: f64 = x.iter().map(|v| v * v).sum();

        let (basis, sigmas) = if n_features <= n_docs {
            right_vectors_from_features(&x, n_components)
        } else {
            right_vectors_from_documents(&x, n_components)
        };

        let components: Vec<Vector> = basis
            .into_iter()
            .map(|mut col| {
                flip_sign(&mut col);
                Vector::new(col.into_iter().map(|v| v as f32).collect())
            })
            .collect();

        let explained_variance_ratio: Vec<f32> = sigmas
            .iter()
            .map(|s| {
                if total_energy > 0.0 {
                    (s * s / total_energy) as f32
                } else {
                    0.0
                }
            })
            .collect();

        let null_components = sigmas.iter().filter(|&&s| s == 0.0).count();
        if null_components > 0 {
            debug!(
                null_components,
                "requested components exceed the corpus rank; extra axes are zero"
            );
        }

        info!(
            components = n_components,
            features = n_features,
            documents = n_docs,
            "truncated SVD fitted"
        );
        debug!(
            explained = explained_variance_ratio.iter().sum::<f32>(),
            "share of corpus energy captured by the basis"
        );

        Ok(Self {
            components,
            singular_values: sigmas.iter().map(|&s| s as f32).collect(),
            explained_variance_ratio,
            n_features,
        })
    }

    #[must_use]
    pub fn n_components(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    #[must_use]
    pub fn components(&self) -> &[Vector] {
        &self.components
    }

    /// Singular values, descending
    #[must_use]
    pub fn singular_values(&self) -> &[f32] {
        &self.singular_values
    }

    /// `σᵢ² / ‖X‖²_F` for each kept component
    #[must_use]
    pub fn explained_variance_ratio(&self) -> &[f32] {
        &self.explained_variance_ratio
    }

    /// Project a term vector onto the basis. The zero vector maps to zero.
    pub fn project(&self, v: &SparseVector) -> Vector {
        Vector::new(
            self.components
                .iter()
                .map(|c| v.dot_dense(c.as_slice()))
                .collect(),
        )
    }

    pub fn project_batch(&self, rows: &[SparseVector]) -> Vec<Vector> {
        rows.par_iter().map(|r| self.project(r)).collect()
    }
}

/// Eigen-decompose `XᵀX`; its eigenvectors are the right singular vectors.
fn right_vectors_from_features(x: &DMatrix<f64>, k: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
    let gram = x.transpose() * x;
    let eigen = SymmetricEigen::new(gram);
    let order = descending_order(eigen.eigenvalues.as_slice());
    let tol = top_sigma(eigen.eigenvalues.as_slice(), &order)
        .map_or(0.0, |s| null_tolerance(s, x));

    let mut basis = Vec::with_capacity(k);
    let mut sigmas = Vec::with_capacity(k);
    for &idx in order.iter().take(k) {
        let sigma = eigen.eigenvalues[idx].max(0.0).sqrt();
        if sigma > tol {
            basis.push(eigen.eigenvectors.column(idx).iter().copied().collect());
            sigmas.push(sigma);
        } else {
            basis.push(vec![0.0; x.ncols()]);
            sigmas.push(0.0);
        }
    }
    (basis, sigmas)
}

/// Eigen-decompose `XXᵀ` and map each left vector `u` to `Xᵀu / σ`.
fn right_vectors_from_documents(x: &DMatrix<f64>, k: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
    let gram = x * x.transpose();
    let eigen = SymmetricEigen::new(gram);
    let order = descending_order(eigen.eigenvalues.as_slice());
    let tol = top_sigma(eigen.eigenvalues.as_slice(), &order)
        .map_or(0.0, |s| null_tolerance(s, x));

    let mut basis = Vec::with_capacity(k);
    let mut sigmas = Vec::with_capacity(k);
    for &idx in order.iter().take(k) {
        let sigma = eigen.eigenvalues[idx].max(0.0).sqrt();
        if sigma > tol {
            let u = eigen.eigenvectors.column(idx);
            basis.push((x.transpose() * u).iter().map(|val| val / sigma).collect());
            sigmas.push(sigma);
        } else {
            basis.push(vec![0.0; x.ncols()]);
            sigmas.push(0.0);
        }
    }
    (basis, sigmas)
}

fn top_sigma(eigenvalues: &[f64], order: &[usize]) -> Option<f64> {
    order.first().map(|&idx| eigenvalues[idx].max(0.0).sqrt())
}

fn descending_order(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]).then(a.cmp(&b)));
    order
}

/// Make the largest-magnitude entry positive so the basis is reproducible
fn flip_sign(col: &mut [f64]) {
    let pivot = col
        .iter()
        .copied()
        .fold(0.0f64, |best, v| if v.abs() > best.abs() { v } else { best });
    if pivot < 0.0 {
        for v in col.iter_mut() {
            *v = -*v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<SparseVector> {
        vec![
            SparseVector::from_pairs(4, vec![(0, 1.0), (1, 1.0)]),
            SparseVector::from_pairs(4, vec![(0, 1.0)]),
            SparseVector::from_pairs(4, vec![(2, 1.0), (3, 2.0)]),
            SparseVector::from_pairs(4, vec![(3, 1.0)]),
            SparseVector::from_pairs(4, vec![(1, 0.5), (2, 0.5)]),
        ]
    }

    #[test]
    fn test_fit_shapes_and_order() {
        let svd = TruncatedSvd::fit(&rows(), 3).unwrap();
        assert_eq!(svd.n_components(), 3);
        assert_eq!(svd.n_features(), 4);
        let s = svd.singular_values();
        assert!(s.windows(2).all(|w| w[0] >= w[1]));
        assert!(svd.explained_variance_ratio().iter().sum::<f32>() <= 1.0 + 1e-5);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let svd = TruncatedSvd::fit(&rows(), 3).unwrap();
        let c = svd.components();
        for i in 0..c.len() {
            assert!((c[i].norm() - 1.0).abs() < 1e-4);
            for j in (i + 1)..c.len() {
                assert!(c[i].dot(&c[j]).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_wide_matrix_path_matches_singular_values() {
        // More features than documents goes through XXᵀ
        let wide = vec![
            SparseVector::from_pairs(6, vec![(0, 3.0)]),
            SparseVector::from_pairs(6, vec![(1, 2.0)]),
            SparseVector::from_pairs(6, vec![(5, 1.0)]),
        ];
        let svd = TruncatedSvd::fit(&wide, 2).unwrap();
        let s = svd.singular_values();
        assert!((s[0] - 3.0).abs() < 1e-5);
        assert!((s[1] - 2.0).abs() < 1e-5);
        let p = svd.project(&SparseVector::from_pairs(6, vec![(0, 1.0)]));
        assert!((p.as_slice()[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_vector_projects_to_zero() {
        let svd = TruncatedSvd::fit(&rows(), 2).unwrap();
        let p = svd.project(&SparseVector::zeros(4));
        assert_eq!(p.dim(), 2);
        assert!(p.is_zero());
    }

    #[test]
    fn test_too_many_components_is_error() {
        // 5 documents, 4 features: at most 4
        assert!(matches!(
            TruncatedSvd::fit(&rows(), 5),
            Err(Error::InsufficientData { requested: 5, vocabulary: 4, documents: 5 })
        ));
        assert!(matches!(TruncatedSvd::fit(&rows()[..2], 2), Err(Error::InsufficientData { .. })));
        assert!(matches!(TruncatedSvd::fit(&rows(), 0), Err(Error::InvalidConfig(_))));
        assert!(matches!(TruncatedSvd::fit(&[], 1), Err(Error::EmptyCorpus)));
    }

    #[test]
    fn test_components_beyond_rank_are_zero() {
        // Rank 2: repeated rows and an empty row, tall and wide
        let tall = vec![
            SparseVector::from_pairs(4, vec![(0, 0.6), (1, 0.8)]),
            SparseVector::from_pairs(4, vec![(0, 0.6), (1, 0.8)]),
            SparseVector::from_pairs(4, vec![(0, 0.6), (1, 0.8)]),
            SparseVector::from_pairs(4, vec![(2, 1.0)]),
            SparseVector::from_pairs(4, vec![(2, 1.0)]),
            SparseVector::zeros(4),
        ];
        let wide = vec![
            SparseVector::from_pairs(7, vec![(0, 0.6), (4, 0.8)]),
            SparseVector::from_pairs(7, vec![(0, 0.6), (4, 0.8)]),
            SparseVector::from_pairs(7, vec![(6, 1.0)]),
            SparseVector::zeros(7),
        ];
        for (rows, k) in [(tall, 4), (wide, 3)] {
            let svd = TruncatedSvd::fit(&rows, k).unwrap();
            let s = svd.singular_values();
            assert!(s[0] > 0.5 && s[1] > 0.5);
            assert!(s[2..].iter().all(|&v| v == 0.0));
            for c in &svd.components()[2..] {
                assert!(c.is_zero());
            }
            // A query term has nothing to land on past the rank
            let p = svd.project(&SparseVector::from_pairs(rows[0].dim(), vec![(1, 1.0)]));
            assert!(p.as_slice()[2..].iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_fit_is_deterministic() {
        let a = TruncatedSvd::fit(&rows(), 3).unwrap();
        let b = TruncatedSvd::fit(&rows(), 3).unwrap();
        assert_eq!(a.components(), b.components());
    }
}
