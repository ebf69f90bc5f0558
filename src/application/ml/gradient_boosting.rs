//! Least-squares gradient boosting over `smartcore` regression trees.
//!
//! Stage 0 predicts the training mean. Every following stage fits a depth-limited
//! tree to the current residuals of a seeded row subsample and adds
//! `learning_rate` times its output to the ensemble.

use crate::domain::errors::ModelError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_regressor::{
    DecisionTreeRegressor, DecisionTreeRegressorParameters,
};

type Tree = DecisionTreeRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostingParameters {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: u16,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Fraction of rows each stage is fitted on, in (0, 1]
    pub subsample: f64,
    pub seed: u64,
}

impl Default for BoostingParameters {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 6,
            min_samples_split: 2,
            min_samples_leaf: 1,
            subsample: 0.8,
            seed: 42,
        }
    }
}

impl BoostingParameters {
    fn validate(&self) -> Result<(), ModelError> {
        if self.n_estimators == 0 {
            return Err(ModelError::InvalidParameter {
                reason: "n_estimators must be at least 1".to_string(),
            });
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ModelError::InvalidParameter {
                reason: format!("learning_rate must be positive, got {}", self.learning_rate),
            });
        }
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return Err(ModelError::InvalidParameter {
                reason: format!("subsample must be in (0, 1], got {}", self.subsample),
            });
        }
        if self.max_depth == 0 {
            return Err(ModelError::InvalidParameter {
                reason: "max_depth must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    fn tree_parameters(&self) -> DecisionTreeRegressorParameters {
        DecisionTreeRegressorParameters::default()
            .with_max_depth(self.max_depth)
            .with_min_samples_split(self.min_samples_split)
            .with_min_samples_leaf(self.min_samples_leaf)
    }
}

#[derive(Serialize, Deserialize)]
pub struct GradientBoostingRegressor {
    params: BoostingParameters,
    init: f64,
    n_features: usize,
    trees: Vec<Tree>,
    /// Training MSE on each stage's subsample, before the stage was added
    train_score: Vec<f64>,
}

/// Row-major matrix straight from borrowed rows of width `n_features`
fn to_matrix<'a>(
    rows: impl IntoIterator<Item = &'a Vec<f64>>,
    n_features: usize,
) -> Result<DenseMatrix<f64>, ModelError> {
    if n_features == 0 {
        return Err(ModelError::Matrix("rows have no features".to_string()));
    }
    let mut values = Vec::new();
    for row in rows {
        values.extend_from_slice(row);
    }
    let n_rows = values.len() / n_features;
    DenseMatrix::new(n_rows, n_features, values, false)
        .map_err(|e| ModelError::Matrix(e.to_string()))
}

impl GradientBoostingRegressor {
    pub fn fit(
        x: &[Vec<f64>],
        y: &[f64],
        params: BoostingParameters,
    ) -> Result<Self, ModelError> {
        params.validate()?;
        if x.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        if x.len() != y.len() {
            return Err(ModelError::LabelCountMismatch {
                rows: x.len(),
                labels: y.len(),
            });
        }
        let n_features = x[0].len();
        if let Some(bad) = x.iter().find(|row| row.len() != n_features) {
            return Err(ModelError::FeatureLengthMismatch {
                expected: n_features,
                got: bad.len(),
            });
        }

        let n = x.len();
        let init = y.iter().sum::<f64>() / n as f64;
        let mut predictions = vec![init; n];
        let full = to_matrix(x, n_features)?;

        let sample_size = ((n as f64 * params.subsample).round() as usize).clamp(1, n);
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut indices: Vec<usize> = (0..n).collect();
        let tree_params = params.tree_parameters();

        let mut trees = Vec::with_capacity(params.n_estimators);
        let mut train_score = Vec::with_capacity(params.n_estimators);

        for stage in 0..params.n_estimators {
            if sample_size < n {
                indices.shuffle(&mut rng);
            }
            let rows = &indices[..sample_size];

            let sub_x = to_matrix(rows.iter().map(|&i| &x[i]), n_features)?;
            let residuals: Vec<f64> = rows.iter().map(|&i| y[i] - predictions[i]).collect();
            train_score.push(
                residuals.iter().map(|r| r * r).sum::<f64>() / residuals.len() as f64,
            );

            let tree = Tree::fit(&sub_x, &residuals, tree_params.clone()).map_err(
                |e| ModelError::Fit {
                    stage,
                    reason: e.to_string(),
                },
            )?;

            let update = tree
                .predict(&full)
                .map_err(|e| ModelError::Predict(e.to_string()))?;
            for (p, u) in predictions.iter_mut().zip(update) {
                *p += params.learning_rate * u;
            }
            trees.push(tree);
        }

        Ok(Self {
            params,
            init,
            n_features,
            trees,
            train_score,
        })
    }

    pub fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        if x.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(bad) = x.iter().find(|row| row.len() != self.n_features) {
            return Err(ModelError::FeatureLengthMismatch {
                expected: self.n_features,
                got: bad.len(),
            });
        }

        let matrix = to_matrix(x, self.n_features)?;
        let mut out = vec![self.init; x.len()];
        for tree in &self.trees {
            let stage = tree
                .predict(&matrix)
                .map_err(|e| ModelError::Predict(e.to_string()))?;
            for (o, s) in out.iter_mut().zip(stage) {
                *o += self.params.learning_rate * s;
            }
        }
        Ok(out)
    }

    pub fn predict_one(&self, features: &[f64]) -> Result<f64, ModelError> {
        self.predict(&[features.to_vec()])?
            .first()
            .copied()
            .ok_or_else(|| ModelError::Predict("No prediction returned".to_string()))
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    pub fn params(&self) -> &BoostingParameters {
        &self.params
    }

    pub fn train_score(&self) -> &[f64] {
        &self.train_score
    }
}
