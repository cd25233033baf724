use super::coulomb::CoulombMatrix;
use super::{FeatureArray, FeatureShape, Featurizer, FeaturizerError, NumericErrorKind};
use crate::core::models::molecule::Conformer;
use nalgebra::{DMatrix, DVector, SymmetricEigen};
use rand::RngCore;
use tracing::instrument;

/// Iteration cap handed to the symmetric eigensolver.
const MAX_EIGEN_ITERATIONS: usize = 10_000;

/// Eigenvalues of a real-symmetric matrix, sorted by decreasing absolute value.
///
/// # Errors
///
/// Returns [`NumericErrorKind::EigenNonConvergence`] if the solver does not converge,
/// or [`NumericErrorKind::NonFiniteEntry`] if the input holds NaN or infinite values.
pub fn sorted_eigenvalues(matrix: &DMatrix<f64>) -> Result<Vec<f64>, FeaturizerError> {
    let size = matrix.nrows();
    if size == 0 {
        return Ok(Vec::new());
    }
    if let Some(idx) = matrix.iter().position(|v| !v.is_finite()) {
        return Err(NumericErrorKind::NonFiniteEntry {
            row: idx % size,
            col: idx / size,
        }
        .into());
    }

    let eigen = SymmetricEigen::try_new(matrix.clone(), f64::EPSILON, MAX_EIGEN_ITERATIONS)
        .ok_or(NumericErrorKind::EigenNonConvergence { size })?;

    let mut eigenvalues: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
    if eigenvalues.iter().any(|v| !v.is_finite()) {
        return Err(NumericErrorKind::EigenNonConvergence { size }.into());
    }
    eigenvalues.sort_by(|a, b| b.abs().total_cmp(&a.abs()));
    Ok(eigenvalues)
}

/// The Coulomb matrix eigen-spectrum featurizer.
///
/// Wraps a [`CoulombMatrix`] and replaces each matrix it would build with that
/// matrix's eigenvalues, sorted by decreasing magnitude and zero-padded to
/// `max_atoms`. The spectrum does not depend on atom order, so randomized variants
/// of one conformer share it (up to rounding). The triangular flag of the wrapped
/// featurizer has no effect here.
#[derive(Debug, Clone, PartialEq)]
pub struct CoulombMatrixEigen {
    matrix: CoulombMatrix,
}

impl CoulombMatrixEigen {
    pub fn new(matrix: CoulombMatrix) -> Self {
        Self { matrix }
    }

    pub fn matrix_featurizer(&self) -> &CoulombMatrix {
        &self.matrix
    }

    fn spectrum(&self, matrix: &DMatrix<f64>) -> Result<FeatureArray, FeaturizerError> {
        // Zero padding only adds zero eigenvalues, so the unpadded block is decomposed.
        let mut values = sorted_eigenvalues(matrix)?;
        values.resize(self.matrix.max_atoms(), 0.0);
        Ok(FeatureArray::Vector(DVector::from_vec(values)))
    }
}

impl Featurizer for CoulombMatrixEigen {
    #[instrument(level = "trace", skip_all, fields(atoms = conformer.len()))]
    fn featurize_conformer(
        &self,
        conformer: &Conformer,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<FeatureArray>, FeaturizerError> {
        self.matrix
            .unpadded_matrices(conformer, rng)?
            .iter()
            .map(|m| self.spectrum(m))
            .collect()
    }

    fn output_shape(&self) -> FeatureShape {
        FeatureShape::Vector {
            len: self.matrix.max_atoms(),
        }
    }

    fn arrays_per_conformer(&self) -> usize {
        self.matrix.arrays_per_conformer()
    }
}
