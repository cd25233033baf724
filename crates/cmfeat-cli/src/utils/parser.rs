use cmfeat::core::featurizers::permutation::PermutationStrategy;
use cmfeat::core::models::units::LengthUnit;
use cmfeat::engine::config::FeaturizerKind;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error(
        "Invalid permutation strategy '{0}'. Expected 'uniform', 'row-norm' or 'row-norm@SIGMA' (e.g., 'row-norm@0.5')."
    )]
    InvalidStrategy(String),

    #[error("Invalid noise scale in '{name}': {reason}")]
    InvalidSigma { name: String, reason: String },

    #[error("Unknown featurizer kind '{0}'. Expected 'matrix' or 'eigen'.")]
    UnknownKind(String),

    #[error("Unknown length unit '{0}'. Expected 'angstrom' or 'bohr'.")]
    UnknownUnit(String),
}

/// Parses `uniform`, `row-norm` (noise scale `default_sigma`) or `row-norm@SIGMA`.
pub fn parse_strategy(name: &str, default_sigma: f64) -> Result<PermutationStrategy, ParseError> {
    let lowered = name.trim().to_ascii_lowercase();
    let (scheme, sigma) = match lowered.split_once('@') {
        Some((scheme, sigma)) => (scheme, Some(sigma)),
        None => (lowered.as_str(), None),
    };

    match (scheme, sigma) {
        ("uniform", None) => Ok(PermutationStrategy::Uniform),
        ("row-norm" | "row-norm-noise", None) => Ok(PermutationStrategy::RowNormNoise {
            sigma: default_sigma,
        }),
        ("row-norm" | "row-norm-noise", Some(sigma)) => {
            let sigma: f64 = sigma.parse().map_err(|_| ParseError::InvalidSigma {
                name: name.to_string(),
                reason: format!("'{}' is not a number", sigma),
            })?;
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err(ParseError::InvalidSigma {
                    name: name.to_string(),
                    reason: "must be positive".to_string(),
                });
            }
            Ok(PermutationStrategy::RowNormNoise { sigma })
        }
        _ => Err(ParseError::InvalidStrategy(name.to_string())),
    }
}

pub fn parse_kind(name: &str) -> Result<FeaturizerKind, ParseError> {
    name.trim()
        .parse()
        .map_err(|_| ParseError::UnknownKind(name.to_string()))
}

pub fn parse_unit(name: &str) -> Result<LengthUnit, ParseError> {
    name.trim()
        .parse()
        .map_err(|_| ParseError::UnknownUnit(name.to_string()))
}
