use super::config::ConfigError;
use crate::core::featurizers::FeaturizerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to featurize molecule #{index} '{name}': {source}")]
    Molecule {
        index: usize,
        name: String,
        #[source]
        source: FeaturizerError,
    },
}
