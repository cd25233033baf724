use super::element;
use nalgebra::Point3;

/// Atomic number of hydrogen, the only element removed by hydrogen stripping.
pub const HYDROGEN: u8 = 1;

/// Represents a single atom of a conformer as seen by the featurizers.
///
/// Only the nuclear charge and the position matter for Coulomb-type features, so
/// an atom is nothing more than its atomic number and its Cartesian coordinates.
/// Positions are always stored in Bohr; readers convert from their input unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atom {
    /// The atomic number (nuclear charge) of the atom.
    pub atomic_number: u8,
    /// The 3D coordinates of the atom in Bohr.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates a new `Atom` from an atomic number and a position in Bohr.
    ///
    /// # Arguments
    ///
    /// * `atomic_number` - The nuclear charge of the atom.
    /// * `position` - The 3D coordinates of the atom in Bohr.
    pub fn new(atomic_number: u8, position: Point3<f64>) -> Self {
        Self {
            atomic_number,
            position,
        }
    }

    /// Creates a new `Atom` from an element symbol (e.g. "C", "cl") or a numeric
    /// atomic number token (e.g. "6").
    ///
    /// # Return
    ///
    /// Returns `None` if the token does not name a known element.
    pub fn from_symbol(symbol: &str, position: Point3<f64>) -> Option<Self> {
        element::parse_atomic_number(symbol).map(|z| Self::new(z, position))
    }

    /// Returns `true` if this atom is a hydrogen.
    #[inline]
    pub fn is_hydrogen(&self) -> bool {
        self.atomic_number == HYDROGEN
    }

    /// Returns the element symbol of this atom, if the atomic number is tabulated.
    pub fn symbol(&self) -> Option<&'static str> {
        element::symbol(self.atomic_number)
    }

    /// The nuclear charge as a float, as used by the Coulomb matrix formulas.
    #[inline]
    pub fn charge(&self) -> f64 {
        f64::from(self.atomic_number)
    }
}
