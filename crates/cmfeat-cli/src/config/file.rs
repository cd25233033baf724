use crate::error::{CliError, Result};
use cmfeat::core::featurizers::permutation::PermutationStrategy;
use cmfeat::core::models::units::LengthUnit;
use cmfeat::engine::config::FeaturizerKind;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Strategy as written in a config file: either a logical name such as
/// `"row-norm@0.5"` or a table like `{ type = "row-norm-noise", sigma = 0.5 }`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum FileStrategy {
    Name(String),
    Table(PermutationStrategy),
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileRandomizationConfig {
    pub enabled: Option<bool>,
    pub num_samples: Option<usize>,
    pub strategy: Option<FileStrategy>,
    pub seed: Option<u64>,
    pub include_unpermuted: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub kind: Option<FeaturizerKind>,
    pub max_atoms: Option<usize>,
    pub remove_hydrogens: Option<bool>,
    pub upper_triangular: Option<bool>,
    pub unit: Option<LengthUnit>,
    pub skip_failed: Option<bool>,
    pub randomization: Option<FileRandomizationConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading configuration file {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
