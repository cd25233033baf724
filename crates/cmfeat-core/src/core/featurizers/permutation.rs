use super::{FeaturizerError, NumericErrorKind};
use nalgebra::DMatrix;
use rand::Rng;
use rand::seq::SliceRandom;
use rand_distr::{Distribution, Normal};
use serde::Deserialize;

/// How a randomized atom ordering is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum PermutationStrategy {
    /// Every ordering of the atoms is equally likely.
    Uniform,
    /// Atoms are sorted by decreasing row norm of the Coulomb matrix after adding
    /// independent Gaussian noise of standard deviation `sigma` to each norm. Small
    /// `sigma` keeps orderings close to the norm-sorted one.
    RowNormNoise { sigma: f64 },
}

/// Randomized-variant generation settings of the matrix featurizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Randomization {
    /// Randomized variants emitted per conformer.
    pub num_samples: usize,
    pub strategy: PermutationStrategy,
    /// Emit the input-order matrix ahead of the randomized variants.
    pub include_unpermuted: bool,
}

impl Randomization {
    pub fn new(num_samples: usize, strategy: PermutationStrategy) -> Self {
        Self {
            num_samples,
            strategy,
            include_unpermuted: false,
        }
    }

    pub fn with_unpermuted(mut self, include: bool) -> Self {
        self.include_unpermuted = include;
        self
    }

    /// Matrices produced per conformer under these settings.
    pub fn variants_per_conformer(&self) -> usize {
        self.num_samples + usize::from(self.include_unpermuted)
    }
}

impl PermutationStrategy {
    /// Draws a new atom order for the (unpadded) Coulomb matrix `matrix`.
    pub fn sample_order<R: Rng + ?Sized>(
        &self,
        matrix: &DMatrix<f64>,
        rng: &mut R,
    ) -> Result<Vec<usize>, FeaturizerError> {
        let n = matrix.nrows();
        match *self {
            PermutationStrategy::Uniform => {
                let mut order: Vec<usize> = (0..n).collect();
                order.shuffle(rng);
                Ok(order)
            }
            PermutationStrategy::RowNormNoise { sigma } => {
                if !(sigma.is_finite() && sigma > 0.0) {
                    return Err(NumericErrorKind::InvalidNoiseScale { sigma }.into());
                }
                let noise = Normal::new(0.0, sigma)
                    .map_err(|_| NumericErrorKind::InvalidNoiseScale { sigma })?;
                let noisy: Vec<f64> = row_norms(matrix)
                    .into_iter()
                    .map(|norm| norm + noise.sample(&mut *rng))
                    .collect();
                Ok(descending_order(&noisy))
            }
        }
    }
}

/// Euclidean norm of each row.
pub fn row_norms(matrix: &DMatrix<f64>) -> Vec<f64> {
    matrix.row_iter().map(|row| row.norm()).collect()
}

/// Indices that sort `values` from largest to smallest; ties keep input order.
pub fn descending_order(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));
    order
}

/// Reorders rows and columns so that entry `(i, j)` of the result is entry
/// `(order[i], order[j])` of `matrix`, i.e. atom `i` of the result is atom `order[i]`.
pub fn permute_matrix(matrix: &DMatrix<f64>, order: &[usize]) -> DMatrix<f64> {
    let n = order.len();
    DMatrix::from_fn(n, n, |i, j| matrix[(order[i], order[j])])
}
