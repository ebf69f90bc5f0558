//! On-disk model/encoder pair.
//!
//! Both files are JSON. Saving writes temporary siblings first and renames
//! them into place, so a reader never sees a half-written file.

use crate::application::ml::model_artifact::{
    ARTIFACT_FORMAT_VERSION, ArtifactPair, EncoderArtifact, PricingModelArtifact,
};
use crate::domain::errors::ArtifactError;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Deserialize)]
struct Header {
    format_version: u32,
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    model_path: PathBuf,
    encoder_path: PathBuf,
}

impl ArtifactStore {
    pub fn new(model_path: impl Into<PathBuf>, encoder_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            encoder_path: encoder_path.into(),
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn encoder_path(&self) -> &Path {
        &self.encoder_path
    }

    pub fn save(&self, pair: &ArtifactPair) -> Result<(), ArtifactError> {
        let model_tmp = temp_sibling(&self.model_path);
        let encoder_tmp = temp_sibling(&self.encoder_path);

        write_json(&model_tmp, &pair.model)?;
        write_json(&encoder_tmp, &pair.encoder)?;
        commit(&encoder_tmp, &self.encoder_path)?;
        commit(&model_tmp, &self.model_path)?;

        info!(
            "Saved artifact pair {} to {:?} and {:?}",
            pair.model.artifact_id, self.model_path, self.encoder_path
        );
        Ok(())
    }

    /// Load and cross-check both files
    pub fn load(&self) -> Result<ArtifactPair, ArtifactError> {
        let model: PricingModelArtifact = read_json(&self.model_path)?;
        let encoder: EncoderArtifact = read_json(&self.encoder_path)?;
        let pair = ArtifactPair { model, encoder };
        pair.verify()?;

        info!(
            "Loaded {} {} (artifact {})",
            pair.model.model_type, pair.model.model_version, pair.model.artifact_id
        );
        Ok(pair)
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let fail = |reason: String| ArtifactError::WriteFailed {
        path: display(path),
        reason,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| fail(e.to_string()))?;
    }
    let file = File::create(path).map_err(|e| fail(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value).map_err(|e| fail(e.to_string()))?;
    writer.flush().map_err(|e| fail(e.to_string()))?;
    Ok(())
}

fn commit(tmp: &Path, target: &Path) -> Result<(), ArtifactError> {
    fs::rename(tmp, target).map_err(|e| ArtifactError::WriteFailed {
        path: display(target),
        reason: e.to_string(),
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::Missing {
            path: display(path),
        });
    }
    let unreadable = |reason: String| ArtifactError::Unreadable {
        path: display(path),
        reason,
    };

    let bytes = fs::read(path).map_err(|e| unreadable(e.to_string()))?;
    let header: Header = serde_json::from_slice(&bytes).map_err(|e| unreadable(e.to_string()))?;
    if header.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(ArtifactError::UnsupportedVersion {
            path: display(path),
            found: header.format_version,
            expected: ARTIFACT_FORMAT_VERSION,
        });
    }
    serde_json::from_slice(&bytes).map_err(|e| unreadable(e.to_string()))
}
