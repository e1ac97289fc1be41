//! Ordinary least squares with intercept.
//!
//! Columns and labels are mean-centred, a small fixed ridge term keeps the
//! normal equations positive definite, and the system is solved by Cholesky
//! decomposition. No iteration and no randomness: the same input always
//! yields the same coefficients.

use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::error::{EngineError, Result};

/// Diagonal loading, relative to the mean diagonal of X'X.
const RIDGE: f64 = 1e-8;

#[derive(Debug, Clone)]
pub struct LinearRegression {
    coefficients: Array1<f64>,
    intercept: f64,
}

impl LinearRegression {
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(EngineError::InvalidParameter(format!(
                "{} feature rows for {} labels",
                x.nrows(),
                y.len()
            )));
        }
        let (x_mean, y_mean) = match (x.mean_axis(Axis(0)), y.mean()) {
            (Some(x_mean), Some(y_mean)) => (x_mean, y_mean),
            _ => {
                return Err(EngineError::InsufficientData {
                    required: 1,
                    available: 0,
                })
            }
        };

        let x_centred = x - &x_mean;
        let y_centred = y - y_mean;

        let mut xtx = x_centred.t().dot(&x_centred);
        let xty = x_centred.t().dot(&y_centred);

        let n = xtx.nrows();
        let ridge = RIDGE * (1.0 + xtx.diag().sum() / n.max(1) as f64);
        for i in 0..n {
            xtx[[i, i]] += ridge;
        }

        let coefficients = cholesky_solve(&xtx, &xty)?;
        let intercept = y_mean - x_mean.dot(&coefficients);
        Ok(Self {
            coefficients,
            intercept,
        })
    }

    pub fn predict(&self, row: ArrayView1<f64>) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            return Err(EngineError::InvalidParameter(format!(
                "expected {} features, got {}",
                self.coefficients.len(),
                row.len()
            )));
        }
        Ok(self.intercept + row.dot(&self.coefficients))
    }

    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// Solves `a * x = b` for symmetric positive definite `a`.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }

            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 || !diag.is_finite() {
                    return Err(EngineError::SingularSystem);
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // L * z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * z[j];
        }
        z[i] = (b[i] - sum) / l[[i, i]];
    }

    // L^T * x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (z[i] - sum) / l[[i, i]];
    }

    Ok(x)
}
