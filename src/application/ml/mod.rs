pub mod data_generator;
pub mod gradient_boosting;
pub mod model_artifact;
pub mod predictor;
pub mod smartcore_predictor;
pub mod trainer;
