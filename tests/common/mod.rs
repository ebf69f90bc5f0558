#![allow(dead_code)]

use surge_pricing::application::ml::data_generator::{DataGenerator, GeneratorConfig};
use surge_pricing::application::ml::gradient_boosting::BoostingParameters;
use surge_pricing::application::ml::trainer::{TrainingConfig, TrainingOutcome, train};

/// Small but realistic model, fast enough for integration tests
pub fn train_small_model(seed: u64) -> TrainingOutcome {
    let samples = DataGenerator::new(GeneratorConfig {
        samples: 600,
        seed,
        ..Default::default()
    })
    .generate()
    .expect("generate samples");

    let config = TrainingConfig {
        boosting: BoostingParameters {
            n_estimators: 30,
            max_depth: 4,
            ..Default::default()
        },
        ..Default::default()
    };
    train(&samples, &config, format!("test-{}", seed)).expect("train model")
}
