use super::atom::Atom;
use crate::core::utils::geometry;
use nalgebra::{Isometry3, Point3};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoleculeError {
    #[error(
        "Conformer {index} of molecule '{name}' has atom sequence {found:?}, expected {expected:?}"
    )]
    InconsistentConformer {
        name: String,
        index: usize,
        expected: Vec<u8>,
        found: Vec<u8>,
    },
}

/// One 3D arrangement of a molecule's atoms, in a fixed atom order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Conformer {
    atoms: Vec<Atom>,
}

impl Conformer {
    pub fn new(atoms: Vec<Atom>) -> Self {
        Self { atoms }
    }

    /// Builds a conformer from parallel slices of atomic numbers and Bohr positions.
    ///
    /// # Return
    ///
    /// Returns `None` if the slices have different lengths.
    pub fn from_parts(atomic_numbers: &[u8], positions: &[Point3<f64>]) -> Option<Self> {
        if atomic_numbers.len() != positions.len() {
            return None;
        }
        Some(Self::new(
            atomic_numbers
                .iter()
                .zip(positions)
                .map(|(&z, &p)| Atom::new(z, p))
                .collect(),
        ))
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atomic_numbers(&self) -> Vec<u8> {
        self.atoms.iter().map(|a| a.atomic_number).collect()
    }

    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.atoms.iter().map(|a| a.position).collect()
    }

    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| !a.is_hydrogen()).count()
    }

    /// Returns a copy of this conformer with every hydrogen removed, preserving
    /// the relative order of the remaining atoms.
    pub fn without_hydrogens(&self) -> Conformer {
        Conformer::new(
            self.atoms
                .iter()
                .filter(|a| !a.is_hydrogen())
                .copied()
                .collect(),
        )
    }

    pub fn centroid(&self) -> Option<Point3<f64>> {
        geometry::centroid(&self.positions())
    }

    /// Returns a copy with every position moved by the rigid motion `motion`.
    pub fn transformed(&self, motion: &Isometry3<f64>) -> Conformer {
        let moved = geometry::transform_points(&self.positions(), motion);
        Conformer::new(
            self.atoms
                .iter()
                .zip(moved)
                .map(|(a, p)| Atom::new(a.atomic_number, p))
                .collect(),
        )
    }

    /// Returns a copy with atoms reordered so that new atom `i` is old atom `order[i]`.
    ///
    /// `order` must be a permutation of `0..self.len()`.
    pub fn permuted(&self, order: &[usize]) -> Conformer {
        debug_assert_eq!(order.len(), self.atoms.len());
        Conformer::new(order.iter().map(|&i| self.atoms[i]).collect())
    }
}

/// A named molecule carrying one or more conformers with a shared atom order.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    name: String,
    conformers: Vec<Conformer>,
}

impl Molecule {
    /// Creates a molecule, checking that every conformer lists the same atomic
    /// numbers in the same order as the first one.
    ///
    /// # Errors
    ///
    /// Returns [`MoleculeError::InconsistentConformer`] for the first conformer
    /// whose atom sequence differs.
    pub fn new(name: impl Into<String>, conformers: Vec<Conformer>) -> Result<Self, MoleculeError> {
        let name = name.into();
        if let Some(first) = conformers.first() {
            let expected = first.atomic_numbers();
            for (index, conformer) in conformers.iter().enumerate().skip(1) {
                let found = conformer.atomic_numbers();
                if found != expected {
                    return Err(MoleculeError::InconsistentConformer {
                        name,
                        index,
                        expected,
                        found,
                    });
                }
            }
        }
        Ok(Self { name, conformers })
    }

    pub fn from_conformer(name: impl Into<String>, conformer: Conformer) -> Self {
        Self {
            name: name.into(),
            conformers: vec![conformer],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn conformers(&self) -> &[Conformer] {
        &self.conformers
    }

    pub fn num_conformers(&self) -> usize {
        self.conformers.len()
    }

    /// Atom count shared by all conformers (zero for a molecule without conformers).
    pub fn num_atoms(&self) -> usize {
        self.conformers.first().map_or(0, Conformer::len)
    }
}
