//! # Featurizers Module
//!
//! Pure transforms from conformer geometry to fixed-shape numeric arrays.
//!
//! - [`coulomb`] - The padded Coulomb matrix, optionally flattened to its upper triangle
//! - [`eigen`] - The Coulomb matrix eigenvalue spectrum, built on top of [`coulomb`]
//! - [`permutation`] - Atom-order randomization used to generate augmented variants
//!
//! Every featurizer implements [`Featurizer`]. Randomness is never drawn from global
//! state: callers pass the random source explicitly, so a seeded generator always
//! reproduces the same features.

pub mod coulomb;
pub mod eigen;
pub mod permutation;

use crate::core::models::molecule::{Conformer, Molecule};
use nalgebra::{DMatrix, DVector};
use rand::RngCore;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FeaturizerError {
    #[error("Molecule has {atoms} atoms but the featurizer holds at most {max_atoms}")]
    Capacity { atoms: usize, max_atoms: usize },
    #[error("Numerical failure: {kind}")]
    Numeric { kind: NumericErrorKind },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NumericErrorKind {
    #[error("atom {atom_index} has a non-finite coordinate")]
    NonFiniteCoordinate { atom_index: usize },
    #[error("atoms {first} and {second} occupy the same position")]
    CoincidentAtoms { first: usize, second: usize },
    #[error("matrix entry ({row}, {col}) is not finite")]
    NonFiniteEntry { row: usize, col: usize },
    #[error("eigendecomposition did not converge for a {size}x{size} matrix")]
    EigenNonConvergence { size: usize },
    #[error("invalid noise scale {sigma} for row-norm permutation")]
    InvalidNoiseScale { sigma: f64 },
}

impl From<NumericErrorKind> for FeaturizerError {
    fn from(kind: NumericErrorKind) -> Self {
        FeaturizerError::Numeric { kind }
    }
}

/// Shape of the arrays a featurizer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureShape {
    Matrix { rows: usize, cols: usize },
    Vector { len: usize },
}

impl FeatureShape {
    pub fn num_values(&self) -> usize {
        match *self {
            FeatureShape::Matrix { rows, cols } => rows * cols,
            FeatureShape::Vector { len } => len,
        }
    }
}

/// A single feature array produced for one conformer (or one randomized variant of it).
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureArray {
    Matrix(DMatrix<f64>),
    Vector(DVector<f64>),
}

impl FeatureArray {
    pub fn shape(&self) -> FeatureShape {
        match self {
            FeatureArray::Matrix(m) => FeatureShape::Matrix {
                rows: m.nrows(),
                cols: m.ncols(),
            },
            FeatureArray::Vector(v) => FeatureShape::Vector { len: v.len() },
        }
    }

    pub fn len(&self) -> usize {
        self.shape().num_values()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_matrix(&self) -> Option<&DMatrix<f64>> {
        match self {
            FeatureArray::Matrix(m) => Some(m),
            FeatureArray::Vector(_) => None,
        }
    }

    pub fn as_vector(&self) -> Option<&DVector<f64>> {
        match self {
            FeatureArray::Vector(v) => Some(v),
            FeatureArray::Matrix(_) => None,
        }
    }

    /// Flattens the array in row-major order (nalgebra stores matrices column-major).
    pub fn to_row_major(&self) -> Vec<f64> {
        match self {
            FeatureArray::Matrix(m) => {
                let mut out = Vec::with_capacity(m.len());
                for row in m.row_iter() {
                    out.extend(row.iter().copied());
                }
                out
            }
            FeatureArray::Vector(v) => v.iter().copied().collect(),
        }
    }
}

/// Common interface of the Coulomb-type featurizers.
pub trait Featurizer: Send + Sync {
    /// Featurizes a single conformer.
    ///
    /// Returns one array, or one array per randomized variant when randomization is
    /// enabled. Either the full set of arrays is produced or an error is returned.
    fn featurize_conformer(
        &self,
        conformer: &Conformer,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<FeatureArray>, FeaturizerError>;

    /// Shape of every array returned by [`Featurizer::featurize_conformer`].
    fn output_shape(&self) -> FeatureShape;

    /// Number of arrays emitted per conformer.
    fn arrays_per_conformer(&self) -> usize;

    /// Featurizes every conformer of `molecule`, concatenating outputs in conformer order.
    fn featurize_molecule(
        &self,
        molecule: &Molecule,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<FeatureArray>, FeaturizerError> {
        let mut out =
            Vec::with_capacity(molecule.num_conformers() * self.arrays_per_conformer());
        for conformer in molecule.conformers() {
            out.extend(self.featurize_conformer(conformer, rng)?);
        }
        Ok(out)
    }
}
