//! Standardizes dense vectors to zero mean and unit variance per dimension.

use careerfit_core::{Error, Result, Vector};
use tracing::debug;

/// Spread below what f32 inputs can resolve at the data's magnitude is
/// rounding noise, not variance.
fn zero_variance_tolerance(magnitude: f64, n_rows: usize) -> f64 {
    magnitude * n_rows as f64 * f64::from(f32::EPSILON)
}

/// Per-dimension mean and scale fitted on a corpus.
///
/// The standard score of `x` is `(x - mean) / scale`, where `scale` is the
/// population standard deviation, or 1 for dimensions without variance.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Vec<f32>,
    scale: Vec<f32>,
}

impl StandardScaler {
    pub fn fit(rows: &[Vector]) -> Result<Self> {
        let first = rows.first().ok_or(Error::EmptyCorpus)?;
        let dim = first.dim();
        if let Some(bad) = rows.iter().find(|r| r.dim() != dim) {
            return Err(Error::InvalidDimension {
                expected: dim,
                actual: bad.dim(),
            });
        }

        let n = rows.len() as f64;
        let mut mean = Vec::with_capacity(dim);
        let mut scale = Vec::with_capacity(dim);
        let mut constant_dims = 0usize;
        let magnitude = rows
            .iter()
            .flat_map(|r| r.as_slice())
            .fold(0.0f64, |acc, &v| acc.max(f64::from(v).abs()));
        let tolerance = zero_variance_tolerance(magnitude, rows.len());

        for j in 0..dim {
            let column = rows.iter().map(|r| f64::from(r.as_slice()[j]));
            let pivot = f64::from(first.as_slice()[j]);

            if column.clone().all(|v| v == pivot) {
                mean.push(pivot as f32);
                scale.push(1.0);
                constant_dims += 1;
                continue;
            }

            let m = column.clone().sum::<f64>() / n;
            let var = column.map(|v| (v - m) * (v - m)).sum::<f64>() / n;
            let std = var.sqrt();
            mean.push(m as f32);
            if std <= tolerance {
                scale.push(1.0);
                constant_dims += 1;
            } else {
                scale.push(std as f32);
            }
        }

        debug!(dim, constant_dims, "standard scaler fitted");
        Ok(Self { mean, scale })
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    #[must_use]
    pub fn mean(&self) -> &[f32] {
        &self.mean
    }

    #[must_use]
    pub fn scale_factors(&self) -> &[f32] {
        &self.scale
    }

    /// Standardize `v` with the fitted parameters
    pub fn scale(&self, v: &Vector) -> Result<Vector> {
        if v.dim() != self.dim() {
            return Err(Error::InvalidDimension {
                expected: self.dim(),
                actual: v.dim(),
            });
        }

        Ok(Vector::new(
            v.as_slice()
                .iter()
                .zip(self.mean.iter().zip(&self.scale))
                .map(|(x, (m, s))| (x - m) / s)
                .collect(),
        ))
    }

    pub fn scale_batch(&self, rows: &[Vector]) -> Result<Vec<Vector>> {
        rows.iter().map(|r| self.scale(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Vector> {
        vec![
            Vector::new(vec![0.0, 5.0, 1.0]),
            Vector::new(vec![2.0, 5.0, 3.0]),
            Vector::new(vec![4.0, 5.0, 5.0]),
        ]
    }

    #[test]
    fn test_fit_mean_and_population_std() {
        let scaler = StandardScaler::fit(&rows()).unwrap();
        assert_eq!(scaler.mean(), &[2.0, 5.0, 3.0]);
        let expected_std = (8.0f32 / 3.0).sqrt();
        assert!((scaler.scale_factors()[0] - expected_std).abs() < 1e-6);
    }

    #[test]
    fn test_scaled_columns_are_standardized() {
        let scaler = StandardScaler::fit(&rows()).unwrap();
        let scaled = scaler.scale_batch(&rows()).unwrap();
        for j in [0usize, 2] {
            let col: Vec<f32> = scaled.iter().map(|v| v.as_slice()[j]).collect();
            let mean: f32 = col.iter().sum::<f32>() / 3.0;
            let var: f32 = col.iter().map(|x| (x - mean) * (x - mean)).sum::<f32>() / 3.0;
            assert!(mean.abs() < 1e-5);
            assert!((var - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_zero_variance_dimension_maps_to_offset() {
        let scaler = StandardScaler::fit(&rows()).unwrap();
        assert_eq!(scaler.scale_factors()[1], 1.0);
        let q = scaler.scale(&Vector::new(vec![2.0, 7.5, 3.0])).unwrap();
        assert_eq!(q.as_slice()[1], 2.5);
    }

    #[test]
    fn test_rounding_noise_column_is_not_amplified() {
        let rows = vec![
            Vector::new(vec![1.2, 3e-9]),
            Vector::new(vec![-0.7, -4e-9]),
            Vector::new(vec![0.4, 1e-9]),
            Vector::new(vec![0.0, 0.0]),
        ];
        let scaler = StandardScaler::fit(&rows).unwrap();
        assert_eq!(scaler.scale_factors()[1], 1.0);
        assert!(scaler.scale_factors()[0] > 0.5);

        let q = scaler.scale(&Vector::new(vec![0.2, 0.3])).unwrap();
        assert!(q.as_slice()[1] < 1.0);
    }

    #[test]
    fn test_query_reuses_corpus_parameters() {
        let scaler = StandardScaler::fit(&rows()).unwrap();
        let q = scaler.scale(&Vector::new(vec![2.0, 5.0, 3.0])).unwrap();
        assert!(q.is_zero());
    }

    #[test]
    fn test_errors() {
        assert!(matches!(StandardScaler::fit(&[]), Err(Error::EmptyCorpus)));
        let scaler = StandardScaler::fit(&rows()).unwrap();
        assert!(matches!(
            scaler.scale(&Vector::new(vec![1.0])),
            Err(Error::InvalidDimension { expected: 3, actual: 1 })
        ));
    }
}
