use serde::{Deserialize, Serialize};
use std::fmt;

/// Goodness-of-fit summary for a regression split
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
    pub samples: usize,
}

impl RegressionMetrics {
    pub fn compute(predictions: &[f64], actuals: &[f64]) -> Self {
        let n = predictions.len().min(actuals.len());
        if n == 0 {
            return Self {
                mse: 0.0,
                rmse: 0.0,
                mae: 0.0,
                r2: 0.0,
                samples: 0,
            };
        }

        let pairs = || predictions.iter().zip(actuals.iter()).take(n);
        let sq_err: f64 = pairs().map(|(p, t)| (p - t).powi(2)).sum();
        let abs_err: f64 = pairs().map(|(p, t)| (p - t).abs()).sum();

        let mse = sq_err / n as f64;
        let mean_y = actuals[..n].iter().sum::<f64>() / n as f64;
        let var_y = actuals[..n]
            .iter()
            .map(|t| (t - mean_y).powi(2))
            .sum::<f64>()
            / n as f64;
        // R² is undefined for a constant target
        let r2 = if var_y > 0.0 { 1.0 - mse / var_y } else { 0.0 };

        Self {
            mse,
            rmse: mse.sqrt(),
            mae: abs_err / n as f64,
            r2,
            samples: n,
        }
    }
}

impl fmt::Display for RegressionMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MSE {:.4}  RMSE {:.4}  MAE {:.4}  R2 {:.4}  (n={})",
            self.mse, self.rmse, self.mae, self.r2, self.samples
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_fit() {
        let y = [1.0, 1.5, 2.0];
        let m = RegressionMetrics::compute(&y, &y);
        assert_eq!(m.mse, 0.0);
        assert_eq!(m.mae, 0.0);
        assert_eq!(m.r2, 1.0);
        assert_eq!(m.samples, 3);
    }

    #[test]
    fn test_known_errors() {
        let m = RegressionMetrics::compute(&[1.0, 2.0], &[2.0, 2.0]);
        assert!((m.mse - 0.5).abs() < 1e-12);
        assert!((m.rmse - 0.5f64.sqrt()).abs() < 1e-12);
        assert!((m.mae - 0.5).abs() < 1e-12);
        // constant target
        assert_eq!(m.r2, 0.0);
    }

    #[test]
    fn test_empty_input() {
        let m = RegressionMetrics::compute(&[], &[]);
        assert_eq!(m.samples, 0);
    }
}
