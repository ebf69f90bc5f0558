use super::Lookup;
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "artifacts/pricing_model.json";
pub const DEFAULT_ENCODER_PATH: &str = "artifacts/encoder.json";

#[derive(Debug, Clone)]
pub struct ArtifactEnvConfig {
    pub model_path: PathBuf,
    pub encoder_path: PathBuf,
}

impl Default for ArtifactEnvConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            encoder_path: PathBuf::from(DEFAULT_ENCODER_PATH),
        }
    }
}

impl ArtifactEnvConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(&super::process_env)
    }

    pub(crate) fn from_lookup(get: Lookup) -> Self {
        let defaults = Self::default();
        Self {
            model_path: get("MODEL_PATH").map(PathBuf::from).unwrap_or(defaults.model_path),
            encoder_path: get("ENCODER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.encoder_path),
        }
    }
}
