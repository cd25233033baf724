use crate::core::featurizers::Featurizer;
use crate::core::featurizers::coulomb::CoulombMatrix;
use crate::core::featurizers::eigen::CoulombMatrixEigen;
use crate::core::featurizers::permutation::{PermutationStrategy, Randomization};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Which Coulomb featurization to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeaturizerKind {
    /// The padded Coulomb matrix (or its upper triangle).
    #[default]
    Matrix,
    /// The sorted eigenvalue spectrum of the Coulomb matrix.
    Eigen,
}

impl fmt::Display for FeaturizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeaturizerKind::Matrix => write!(f, "matrix"),
            FeaturizerKind::Eigen => write!(f, "eigen"),
        }
    }
}

impl FromStr for FeaturizerKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "matrix" | "coulomb-matrix" => Ok(FeaturizerKind::Matrix),
            "eigen" | "eig" | "coulomb-matrix-eig" => Ok(FeaturizerKind::Eigen),
            _ => Err(()),
        }
    }
}

/// What a batch run does when one molecule cannot be featurized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop and return the error of the first failing molecule.
    #[default]
    Abort,
    /// Record the failure, drop that molecule's features and continue.
    Skip,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RandomizationConfig {
    pub num_samples: usize,
    pub strategy: PermutationStrategy,
    pub include_unpermuted: bool,
    /// Base seed; molecule `i` of a batch draws from a generator seeded with `seed + i`.
    pub seed: Option<u64>,
}

impl RandomizationConfig {
    pub fn new(num_samples: usize, strategy: PermutationStrategy) -> Self {
        Self {
            num_samples,
            strategy,
            include_unpermuted: false,
            seed: None,
        }
    }

    fn to_randomization(&self) -> Randomization {
        Randomization::new(self.num_samples, self.strategy)
            .with_unpermuted(self.include_unpermuted)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeaturizationConfig {
    pub kind: FeaturizerKind,
    pub max_atoms: usize,
    pub remove_hydrogens: bool,
    pub upper_triangular: bool,
    pub randomization: Option<RandomizationConfig>,
    pub error_policy: ErrorPolicy,
}

impl FeaturizationConfig {
    /// The matrix featurizer described by this configuration.
    pub fn matrix_featurizer(&self) -> CoulombMatrix {
        CoulombMatrix::new(self.max_atoms)
            .remove_hydrogens(self.remove_hydrogens)
            .upper_triangular(self.upper_triangular)
            .randomization(
                self.randomization
                    .as_ref()
                    .map(RandomizationConfig::to_randomization),
            )
    }

    pub fn build_featurizer(&self) -> Box<dyn Featurizer> {
        let matrix = self.matrix_featurizer();
        match self.kind {
            FeaturizerKind::Matrix => Box::new(matrix),
            FeaturizerKind::Eigen => Box::new(CoulombMatrixEigen::new(matrix)),
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.randomization.as_ref().and_then(|r| r.seed)
    }
}

#[derive(Default)]
pub struct FeaturizationConfigBuilder {
    kind: Option<FeaturizerKind>,
    max_atoms: Option<usize>,
    remove_hydrogens: Option<bool>,
    upper_triangular: Option<bool>,
    randomization: Option<RandomizationConfig>,
    error_policy: Option<ErrorPolicy>,
}

impl FeaturizationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: FeaturizerKind) -> Self {
        self.kind = Some(kind);
        self
    }
    pub fn max_atoms(mut self, max_atoms: usize) -> Self {
        self.max_atoms = Some(max_atoms);
        self
    }
    pub fn remove_hydrogens(mut self, remove: bool) -> Self {
        self.remove_hydrogens = Some(remove);
        self
    }
    pub fn upper_triangular(mut self, upper: bool) -> Self {
        self.upper_triangular = Some(upper);
        self
    }
    pub fn randomization(mut self, randomization: Option<RandomizationConfig>) -> Self {
        self.randomization = randomization;
        self
    }
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = Some(policy);
        self
    }

    pub fn build(self) -> Result<FeaturizationConfig, ConfigError> {
        let kind = self.kind.unwrap_or_default();
        let max_atoms = self
            .max_atoms
            .ok_or(ConfigError::MissingParameter("max_atoms"))?;
        if max_atoms == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_atoms",
                reason: "must be at least 1".to_string(),
            });
        }

        let upper_triangular = self.upper_triangular.unwrap_or(false);
        if upper_triangular && kind == FeaturizerKind::Eigen {
            return Err(ConfigError::InvalidParameter {
                name: "upper_triangular",
                reason: "not applicable to the eigenvalue featurizer".to_string(),
            });
        }

        if let Some(randomization) = &self.randomization {
            if randomization.num_samples == 0 {
                return Err(ConfigError::InvalidParameter {
                    name: "num_samples",
                    reason: "randomization needs at least one sample".to_string(),
                });
            }
            if let PermutationStrategy::RowNormNoise { sigma } = randomization.strategy {
                if !(sigma.is_finite() && sigma > 0.0) {
                    return Err(ConfigError::InvalidParameter {
                        name: "sigma",
                        reason: format!("must be a positive finite number, got {}", sigma),
                    });
                }
            }
        }

        Ok(FeaturizationConfig {
            kind,
            max_atoms,
            remove_hydrogens: self.remove_hydrogens.unwrap_or(false),
            upper_triangular,
            randomization: self.randomization,
            error_policy: self.error_policy.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::featurizers::FeatureShape;

    #[test]
    fn build_applies_defaults() {
        let config = FeaturizationConfigBuilder::new().max_atoms(20).build().unwrap();
        assert_eq!(config.kind, FeaturizerKind::Matrix);
        assert!(!config.remove_hydrogens);
        assert!(!config.upper_triangular);
        assert!(config.randomization.is_none());
        assert_eq!(config.error_policy, ErrorPolicy::Abort);
        assert_eq!(config.seed(), None);
    }

    #[test]
    fn missing_max_atoms_is_an_error() {
        let result = FeaturizationConfigBuilder::new().build();
        assert_eq!(result, Err(ConfigError::MissingParameter("max_atoms")));
    }

    #[test]
    fn zero_max_atoms_is_invalid() {
        let result = FeaturizationConfigBuilder::new().max_atoms(0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "max_atoms",
                ..
            })
        ));
    }

    #[test]
    fn upper_triangular_eigen_is_rejected() {
        let result = FeaturizationConfigBuilder::new()
            .kind(FeaturizerKind::Eigen)
            .max_atoms(5)
            .upper_triangular(true)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "upper_triangular",
                ..
            })
        ));
    }

    #[test]
    fn randomization_requires_samples_and_positive_sigma() {
        let zero_samples = FeaturizationConfigBuilder::new()
            .max_atoms(5)
            .randomization(Some(RandomizationConfig::new(0, PermutationStrategy::Uniform)))
            .build();
        assert!(matches!(
            zero_samples,
            Err(ConfigError::InvalidParameter {
                name: "num_samples",
                ..
            })
        ));

        let bad_sigma = FeaturizationConfigBuilder::new()
            .max_atoms(5)
            .randomization(Some(RandomizationConfig::new(
                2,
                PermutationStrategy::RowNormNoise { sigma: -0.5 },
            )))
            .build();
        assert!(matches!(
            bad_sigma,
            Err(ConfigError::InvalidParameter { name: "sigma", .. })
        ));
    }

    #[test]
    fn build_featurizer_matches_kind_and_shape() {
        let matrix = FeaturizationConfigBuilder::new()
            .max_atoms(4)
            .upper_triangular(true)
            .build()
            .unwrap();
        assert_eq!(
            matrix.build_featurizer().output_shape(),
            FeatureShape::Vector { len: 10 }
        );

        let mut randomization = RandomizationConfig::new(3, PermutationStrategy::Uniform);
        randomization.include_unpermuted = true;
        randomization.seed = Some(5);
        let eigen = FeaturizationConfigBuilder::new()
            .kind(FeaturizerKind::Eigen)
            .max_atoms(7)
            .randomization(Some(randomization))
            .build()
            .unwrap();
        let featurizer = eigen.build_featurizer();
        assert_eq!(featurizer.output_shape(), FeatureShape::Vector { len: 7 });
        assert_eq!(featurizer.arrays_per_conformer(), 4);
        assert_eq!(eigen.seed(), Some(5));
    }

    #[test]
    fn featurizer_kind_parses_aliases() {
        assert_eq!(FeaturizerKind::from_str("Matrix"), Ok(FeaturizerKind::Matrix));
        assert_eq!(FeaturizerKind::from_str("eig"), Ok(FeaturizerKind::Eigen));
        assert_eq!(FeaturizerKind::from_str("fingerprint"), Err(()));
        assert_eq!(FeaturizerKind::Eigen.to_string(), "eigen");
    }
}
