//! Offline training pipeline: encode, split, fit, score, explain.

use super::gradient_boosting::{BoostingParameters, GradientBoostingRegressor};
use super::model_artifact::{ArtifactPair, FeatureImportance, MODEL_TYPE};
use crate::domain::ml::feature_registry;
use crate::domain::ml::metrics::RegressionMetrics;
use crate::domain::model_performance::ModelPerformanceRecord;
use crate::domain::pricing::types::TrainingSample;
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Share of rows held out for validation
    pub test_size: f64,
    /// Seed of the train/validation shuffle
    pub split_seed: u64,
    pub boosting: BoostingParameters,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            split_seed: 42,
            boosting: BoostingParameters::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub model_version: String,
    pub trained_at: DateTime<Utc>,
    pub training_samples: usize,
    pub test_samples: usize,
    pub train_metrics: RegressionMetrics,
    pub validation_metrics: RegressionMetrics,
    pub training_duration_seconds: f64,
    /// Sorted by descending importance
    pub feature_importance: Vec<FeatureImportance>,
}

impl TrainingReport {
    pub fn performance_record(&self) -> ModelPerformanceRecord {
        let mut record = ModelPerformanceRecord::from_metrics(
            self.model_version.clone(),
            MODEL_TYPE.to_string(),
            self.trained_at,
            &self.validation_metrics,
            self.training_samples,
        );
        record.training_duration_seconds = Some(self.training_duration_seconds);
        record.feature_importance_json = serde_json::to_string(&self.feature_importance).ok();
        record.notes = Some("Gradient boosting with holiday feature".to_string());
        record
    }
}

pub struct TrainingOutcome {
    pub artifacts: ArtifactPair,
    pub report: TrainingReport,
}

/// Row indices of the (train, validation) split
pub fn split_indices(n: usize, test_size: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        bail!("test_size must be in (0, 1), got {}", test_size);
    }
    let n_test = (n as f64 * test_size).ceil() as usize;
    if n < 2 || n_test == 0 || n_test >= n {
        bail!(
            "Need at least one training and one validation row, got {} rows",
            n
        );
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));
    let test = indices.split_off(n - n_test);
    Ok((indices, test))
}

pub fn train(
    samples: &[TrainingSample],
    config: &TrainingConfig,
    model_version: String,
) -> Result<TrainingOutcome> {
    info!("Training on {} samples", samples.len());

    let encoder = feature_registry::fit_encoder(samples).context("Failed to fit encoder")?;
    let feature_names = feature_registry::feature_names(&encoder);
    debug!("Feature layout: {:?}", feature_names);

    let x = samples
        .iter()
        .map(|s| feature_registry::features_to_vector(&s.features(), &encoder))
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to encode training rows")?;
    let y: Vec<f64> = samples.iter().map(|s| s.price_multiplier).collect();

    let (train_idx, test_idx) = split_indices(x.len(), config.test_size, config.split_seed)?;
    let pick_x = |idx: &[usize]| idx.iter().map(|&i| x[i].clone()).collect::<Vec<_>>();
    let pick_y = |idx: &[usize]| idx.iter().map(|&i| y[i]).collect::<Vec<_>>();
    let (x_train, y_train) = (pick_x(&train_idx), pick_y(&train_idx));
    let (x_test, y_test) = (pick_x(&test_idx), pick_y(&test_idx));
    info!(
        "Split: {} training rows, {} validation rows",
        x_train.len(),
        x_test.len()
    );

    let trained_at = Utc::now();
    let start = Instant::now();
    let model = GradientBoostingRegressor::fit(&x_train, &y_train, config.boosting.clone())
        .context("Model training failed")?;
    let training_duration_seconds = start.elapsed().as_secs_f64();

    let train_metrics = RegressionMetrics::compute(&model.predict(&x_train)?, &y_train);
    let validation_metrics = RegressionMetrics::compute(&model.predict(&x_test)?, &y_test);
    info!(
        "Validation R2: {:.4}, RMSE: {:.4}, MAE: {:.4}",
        validation_metrics.r2, validation_metrics.rmse, validation_metrics.mae
    );

    let mut feature_importance = permutation_importance(
        &model,
        &x_test,
        &y_test,
        &feature_names,
        config.split_seed,
    )?;
    feature_importance.sort_by(|a, b| b.importance.total_cmp(&a.importance));

    let report = TrainingReport {
        model_version: model_version.clone(),
        trained_at,
        training_samples: x_train.len(),
        test_samples: x_test.len(),
        train_metrics,
        validation_metrics,
        training_duration_seconds,
        feature_importance: feature_importance.clone(),
    };

    let artifacts = ArtifactPair::new(
        model_version,
        trained_at,
        model,
        encoder,
        feature_importance,
        train_metrics,
        validation_metrics,
    );

    Ok(TrainingOutcome { artifacts, report })
}

/// Increase in validation MSE when one column is shuffled, normalized to sum 1.
/// Columns are scored in parallel; each uses its own seeded shuffle.
pub fn permutation_importance(
    model: &GradientBoostingRegressor,
    x: &[Vec<f64>],
    y: &[f64],
    feature_names: &[String],
    seed: u64,
) -> Result<Vec<FeatureImportance>> {
    let baseline = RegressionMetrics::compute(&model.predict(x)?, y).mse;

    let raw = (0..feature_names.len())
        .into_par_iter()
        .map(|col| -> Result<f64> {
            let mut column: Vec<f64> = x.iter().map(|row| row[col]).collect();
            column.shuffle(&mut StdRng::seed_from_u64(seed.wrapping_add(col as u64)));
            let permuted: Vec<Vec<f64>> = x
                .iter()
                .zip(&column)
                .map(|(row, &v)| {
                    let mut row = row.clone();
                    row[col] = v;
                    row
                })
                .collect();
            let mse = RegressionMetrics::compute(&model.predict(&permuted)?, y).mse;
            Ok((mse - baseline).max(0.0))
        })
        .collect::<Result<Vec<f64>>>()?;

    let total: f64 = raw.iter().sum();
    Ok(feature_names
        .iter()
        .zip(raw)
        .map(|(name, delta)| FeatureImportance {
            feature: name.clone(),
            importance: if total > 0.0 { delta / total } else { 0.0 },
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::data_generator::{DataGenerator, GeneratorConfig};

    fn quick_config() -> TrainingConfig {
        TrainingConfig {
            boosting: BoostingParameters {
                n_estimators: 30,
                max_depth: 4,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn samples(n: usize) -> Vec<TrainingSample> {
        DataGenerator::new(GeneratorConfig {
            samples: n,
            ..Default::default()
        })
        .generate()
        .unwrap()
    }

    #[test]
    fn test_split_is_disjoint_and_seeded() {
        let (train_a, test_a) = split_indices(100, 0.2, 42).unwrap();
        let (train_b, test_b) = split_indices(100, 0.2, 42).unwrap();
        assert_eq!(test_a.len(), 20);
        assert_eq!(train_a.len(), 80);
        assert_eq!(test_a, test_b);
        assert_eq!(train_a, train_b);
        assert!(test_a.iter().all(|i| !train_a.contains(i)));
    }

    #[test]
    fn test_split_rejects_degenerate_input() {
        assert!(split_indices(1, 0.2, 42).is_err());
        assert!(split_indices(100, 0.0, 42).is_err());
        assert!(split_indices(100, 1.0, 42).is_err());
    }

    #[test]
    fn test_training_learns_the_signal() {
        let outcome = train(&samples(800), &quick_config(), "test".to_string()).unwrap();
        let report = &outcome.report;

        assert_eq!(report.training_samples, 640);
        assert_eq!(report.test_samples, 160);
        assert!(
            report.validation_metrics.r2 > 0.7,
            "r2 {}",
            report.validation_metrics.r2
        );
        outcome.artifacts.verify().unwrap();
    }

    #[test]
    fn test_importance_is_normalized_and_sorted() {
        let outcome = train(&samples(600), &quick_config(), "test".to_string()).unwrap();
        let importance = &outcome.report.feature_importance;

        assert_eq!(importance.len(), 10);
        let total: f64 = importance.iter().map(|f| f.importance).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(
            importance
                .windows(2)
                .all(|w| w[0].importance >= w[1].importance)
        );
        // Distance never enters the label
        let distance = importance
            .iter()
            .find(|f| f.feature == "distance_km")
            .unwrap();
        assert!(distance.importance < importance[0].importance);
    }

    #[test]
    fn test_performance_record_uses_validation_scores() {
        let outcome = train(&samples(300), &quick_config(), "v-test".to_string()).unwrap();
        let record = outcome.report.performance_record();
        assert_eq!(record.model_version, "v-test");
        assert_eq!(record.model_type, MODEL_TYPE);
        assert_eq!(record.r2_score, outcome.report.validation_metrics.r2);
        assert_eq!(record.test_samples, 60);
        assert!(record.feature_importance_json.is_some());
    }
}
