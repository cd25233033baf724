use super::permutation::{Randomization, permute_matrix};
use super::{FeatureArray, FeatureShape, Featurizer, FeaturizerError, NumericErrorKind};
use crate::core::models::atom::Atom;
use crate::core::models::molecule::Conformer;
use crate::core::utils::geometry::{distance, first_coincident_pair, first_non_finite};
use nalgebra::{DMatrix, DVector};
use rand::RngCore;
use tracing::{instrument, trace};

/// Exponent of the nuclear charge in the diagonal self-energy term.
const SELF_ENERGY_EXPONENT: f64 = 2.4;

/// Diagonal Coulomb matrix entry `0.5 * Z^2.4` for nuclear charge `z`.
#[inline]
pub fn self_energy(z: f64) -> f64 {
    0.5 * z.powf(SELF_ENERGY_EXPONENT)
}

/// Off-diagonal Coulomb matrix entry `Zi * Zj / |ri - rj|` (Hartree, for Bohr distances).
#[inline]
pub fn pair_repulsion(zi: f64, zj: f64, dist: f64) -> f64 {
    zi * zj / dist
}

/// Builds the unpadded `n x n` Coulomb matrix of `atoms` in their given order.
///
/// # Errors
///
/// Returns a [`FeaturizerError::Numeric`] if a coordinate is not finite, if two
/// atoms coincide, or if an entry would not be finite.
pub fn coulomb_matrix(atoms: &[Atom]) -> Result<DMatrix<f64>, FeaturizerError> {
    let positions: Vec<_> = atoms.iter().map(|a| a.position).collect();
    if let Some(atom_index) = first_non_finite(&positions) {
        return Err(NumericErrorKind::NonFiniteCoordinate { atom_index }.into());
    }
    if let Some((first, second)) = first_coincident_pair(&positions) {
        return Err(NumericErrorKind::CoincidentAtoms { first, second }.into());
    }

    let n = atoms.len();
    let mut matrix = DMatrix::zeros(n, n);
    for i in 0..n {
        let zi = atoms[i].charge();
        matrix[(i, i)] = self_energy(zi);
        for j in (i + 1)..n {
            let value = pair_repulsion(
                zi,
                atoms[j].charge(),
                distance(&atoms[i].position, &atoms[j].position),
            );
            if !value.is_finite() {
                return Err(NumericErrorKind::NonFiniteEntry { row: i, col: j }.into());
            }
            matrix[(i, j)] = value;
            matrix[(j, i)] = value;
        }
    }
    Ok(matrix)
}

/// Embeds `matrix` at the top-left of a zero `size x size` matrix.
///
/// `matrix` must not be larger than `size` in either dimension.
pub fn pad_matrix(matrix: &DMatrix<f64>, size: usize) -> DMatrix<f64> {
    let mut padded = DMatrix::zeros(size, size);
    padded
        .view_mut((0, 0), (matrix.nrows(), matrix.ncols()))
        .copy_from(matrix);
    padded
}

/// Upper triangle (diagonal included) of a square matrix, flattened row by row.
pub fn upper_triangle(matrix: &DMatrix<f64>) -> DVector<f64> {
    let n = matrix.nrows();
    let mut values = Vec::with_capacity(n * (n + 1) / 2);
    for i in 0..n {
        for j in i..n {
            values.push(matrix[(i, j)]);
        }
    }
    DVector::from_vec(values)
}

/// Length of the flattened upper triangle of a `size x size` matrix.
pub const fn upper_triangle_len(size: usize) -> usize {
    size * (size + 1) / 2
}

/// The padded Coulomb matrix featurizer.
///
/// Per conformer it optionally strips hydrogens, checks the atom count against
/// `max_atoms`, builds the Coulomb matrix, optionally generates randomized atom
/// orderings of it, and zero-pads every result to `max_atoms x max_atoms` (or its
/// flattened upper triangle).
#[derive(Debug, Clone, PartialEq)]
pub struct CoulombMatrix {
    max_atoms: usize,
    remove_hydrogens: bool,
    upper_triangular: bool,
    randomization: Option<Randomization>,
}

impl CoulombMatrix {
    pub fn new(max_atoms: usize) -> Self {
        Self {
            max_atoms,
            remove_hydrogens: false,
            upper_triangular: false,
            randomization: None,
        }
    }

    pub fn remove_hydrogens(mut self, remove: bool) -> Self {
        self.remove_hydrogens = remove;
        self
    }

    pub fn upper_triangular(mut self, upper: bool) -> Self {
        self.upper_triangular = upper;
        self
    }

    pub fn randomization(mut self, randomization: Option<Randomization>) -> Self {
        self.randomization = randomization;
        self
    }

    pub fn max_atoms(&self) -> usize {
        self.max_atoms
    }

    /// Applies hydrogen removal and the capacity check, returning the atoms that
    /// enter the matrix.
    pub fn prepare(&self, conformer: &Conformer) -> Result<Conformer, FeaturizerError> {
        let prepared = if self.remove_hydrogens {
            conformer.without_hydrogens()
        } else {
            conformer.clone()
        };
        if prepared.len() > self.max_atoms {
            return Err(FeaturizerError::Capacity {
                atoms: prepared.len(),
                max_atoms: self.max_atoms,
            });
        }
        Ok(prepared)
    }

    /// Unpadded matrices for one conformer: the input-order matrix, or the
    /// configured randomized variants of it.
    pub fn unpadded_matrices(
        &self,
        conformer: &Conformer,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<DMatrix<f64>>, FeaturizerError> {
        let prepared = self.prepare(conformer)?;
        let base = coulomb_matrix(prepared.atoms())?;

        let Some(randomization) = &self.randomization else {
            return Ok(vec![base]);
        };

        let mut matrices = Vec::with_capacity(randomization.variants_per_conformer());
        if randomization.include_unpermuted {
            matrices.push(base.clone());
        }
        for _ in 0..randomization.num_samples {
            let order = randomization.strategy.sample_order(&base, rng)?;
            trace!(?order, "Sampled randomized atom order.");
            matrices.push(permute_matrix(&base, &order));
        }
        Ok(matrices)
    }

    fn finish(&self, matrix: &DMatrix<f64>) -> FeatureArray {
        let padded = pad_matrix(matrix, self.max_atoms);
        if self.upper_triangular {
            FeatureArray::Vector(upper_triangle(&padded))
        } else {
            FeatureArray::Matrix(padded)
        }
    }
}

impl Featurizer for CoulombMatrix {
    #[instrument(level = "trace", skip_all, fields(atoms = conformer.len()))]
    fn featurize_conformer(
        &self,
        conformer: &Conformer,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<FeatureArray>, FeaturizerError> {
        let matrices = self.unpadded_matrices(conformer, rng)?;
        Ok(matrices.iter().map(|m| self.finish(m)).collect())
    }

    fn output_shape(&self) -> FeatureShape {
        if self.upper_triangular {
            FeatureShape::Vector {
                len: upper_triangle_len(self.max_atoms),
            }
        } else {
            FeatureShape::Matrix {
                rows: self.max_atoms,
                cols: self.max_atoms,
            }
        }
    }

    fn arrays_per_conformer(&self) -> usize {
        self.randomization
            .as_ref()
            .map_or(1, Randomization::variants_per_conformer)
    }
}
