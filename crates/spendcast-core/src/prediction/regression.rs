//! Ordinary least squares with singular-fit detection
//!
//! Solves the normal equations `(XᵀX) β = Xᵀy` with an intercept column
//! prepended internally. A rank-deficient or badly conditioned `XᵀX` yields
//! [`FitOutcome::Singular`] so callers can branch to a fallback instead of
//! handling an error.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;

use super::features::DesignMatrix;

/// Coefficients of a fitted linear model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FittedModel {
    pub intercept: f64,
    /// One per design-matrix column, in column order
    pub coefficients: Vec<f64>,
    /// Coefficient of determination on the training data
    pub r_squared: f64,
}

impl FittedModel {
    /// `intercept + Σ coefficient·feature`
    pub fn predict(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(b, x)| b * x)
                .sum::<f64>()
    }
}

/// Result of attempting a fit
#[derive(Debug, Clone, PartialEq)]
pub enum FitOutcome {
    Fitted(FittedModel),
    /// XᵀX is not invertible (too few rows, collinear or empty columns)
    Singular,
}

impl FitOutcome {
    pub fn model(self) -> Option<FittedModel> {
        match self {
            Self::Fitted(model) => Some(model),
            Self::Singular => None,
        }
    }
}

/// OLS fitter
#[derive(Debug, Clone, Copy)]
pub struct OlsFitter {
    /// Smallest accepted ratio of min to max singular value of XᵀX
    singular_tolerance: f64,
}

impl Default for OlsFitter {
    fn default() -> Self {
        Self::new(1e-12)
    }
}

impl OlsFitter {
    pub fn new(singular_tolerance: f64) -> Self {
        Self { singular_tolerance }
    }

    /// Fit `y ≈ intercept + X·β`
    pub fn fit(&self, x: &DesignMatrix, y: &[f64]) -> FitOutcome {
        let rows = x.row_count();
        let columns = x.column_count();

        if rows != y.len() {
            tracing::warn!(rows, targets = y.len(), "Design matrix and target length differ");
            return FitOutcome::Singular;
        }
        if rows <= columns {
            tracing::debug!(rows, columns, "Too few rows for regression");
            return FitOutcome::Singular;
        }

        let a = DMatrix::from_fn(rows, columns + 1, |i, j| {
            if j == 0 {
                1.0
            } else {
                x.get(i, j - 1)
            }
        });
        let target = DVector::from_column_slice(y);

        let at = a.transpose();
        let xtx = &at * &a;
        let xty = &at * &target;

        let singular_values = xtx.clone().svd(false, false).singular_values;
        let max_sv = singular_values.iter().copied().fold(0.0_f64, f64::max);
        let min_sv = singular_values
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        if !(max_sv > 0.0 && max_sv.is_finite()) || min_sv / max_sv <= self.singular_tolerance {
            tracing::debug!(
                rows,
                columns,
                rcond = min_sv / max_sv,
                "Normal equations are singular"
            );
            return FitOutcome::Singular;
        }

        let beta = match xtx.cholesky() {
            Some(cholesky) => cholesky.solve(&xty),
            None => {
                tracing::debug!(rows, columns, "Cholesky factorization failed");
                return FitOutcome::Singular;
            }
        };
        if beta.iter().any(|b| !b.is_finite()) {
            return FitOutcome::Singular;
        }

        let fitted = &a * &beta;
        let mean = y.iter().sum::<f64>() / rows as f64;
        let ss_res: f64 = y
            .iter()
            .zip(fitted.iter())
            .map(|(actual, predicted)| (actual - predicted).powi(2))
            .sum();
        let ss_tot: f64 = y.iter().map(|actual| (actual - mean).powi(2)).sum();
        // Constant target: nothing to explain
        let r_squared = if ss_tot > 0.0 {
            1.0 - ss_res / ss_tot
        } else {
            0.0
        };

        FitOutcome::Fitted(FittedModel {
            intercept: beta[0],
            coefficients: beta.iter().skip(1).copied().collect(),
            r_squared,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(columns: usize, rows: &[&[f64]]) -> DesignMatrix {
        let mut m = DesignMatrix::new(columns);
        for row in rows {
            m.push_row(row.to_vec());
        }
        m
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_fits_exact_line() {
        // y = 2 + 3x
        let x = matrix(1, &[&[0.0], &[1.0], &[2.0], &[3.0]]);
        let y = [2.0, 5.0, 8.0, 11.0];

        let model = OlsFitter::default().fit(&x, &y).model().unwrap();
        assert_close(model.intercept, 2.0);
        assert_eq!(model.coefficients.len(), 1);
        assert_close(model.coefficients[0], 3.0);
        assert_close(model.r_squared, 1.0);
        assert_close(model.predict(&[10.0]), 32.0);
    }

    #[test]
    fn test_dummy_fit_recovers_group_means() {
        // Group A (dummy 0): 10, 14 -> mean 12; group B (dummy 1): 20, 30 -> mean 25
        let x = matrix(1, &[&[0.0], &[0.0], &[1.0], &[1.0]]);
        let y = [10.0, 14.0, 20.0, 30.0];

        let model = OlsFitter::default().fit(&x, &y).model().unwrap();
        assert_close(model.intercept, 12.0);
        assert_close(model.coefficients[0], 13.0);
        assert!(model.r_squared > 0.0 && model.r_squared < 1.0);
    }

    #[test]
    fn test_rows_not_exceeding_columns_is_singular() {
        let x = matrix(2, &[&[1.0, 0.0], &[0.0, 1.0]]);
        assert_eq!(
            OlsFitter::default().fit(&x, &[1.0, 2.0]),
            FitOutcome::Singular
        );
    }

    #[test]
    fn test_empty_column_is_singular() {
        let x = matrix(2, &[&[1.0, 0.0], &[0.0, 0.0], &[1.0, 0.0], &[0.0, 0.0]]);
        assert_eq!(
            OlsFitter::default().fit(&x, &[1.0, 2.0, 3.0, 4.0]),
            FitOutcome::Singular
        );
    }

    #[test]
    fn test_column_collinear_with_intercept_is_singular() {
        let x = matrix(1, &[&[1.0], &[1.0], &[1.0]]);
        assert_eq!(
            OlsFitter::default().fit(&x, &[20.0, 20.0, 20.0]),
            FitOutcome::Singular
        );
    }

    #[test]
    fn test_duplicate_columns_are_singular() {
        let x = matrix(
            2,
            &[&[1.0, 1.0], &[0.0, 0.0], &[1.0, 1.0], &[0.0, 0.0], &[1.0, 1.0]],
        );
        assert_eq!(
            OlsFitter::default().fit(&x, &[3.0, 1.0, 3.0, 1.0, 3.0]),
            FitOutcome::Singular
        );
    }

    #[test]
    fn test_mismatched_target_is_singular() {
        let x = matrix(1, &[&[0.0], &[1.0], &[2.0]]);
        assert_eq!(OlsFitter::default().fit(&x, &[1.0]), FitOutcome::Singular);
    }

    #[test]
    fn test_constant_target_has_zero_r_squared() {
        let x = matrix(1, &[&[0.0], &[1.0], &[0.0], &[1.0]]);
        let model = OlsFitter::default()
            .fit(&x, &[5.0, 5.0, 5.0, 5.0])
            .model()
            .unwrap();
        assert_close(model.intercept, 5.0);
        assert_close(model.coefficients[0], 0.0);
        assert_eq!(model.r_squared, 0.0);
    }
}
