use crate::core::models::atom::Atom;
use crate::core::models::molecule::{Conformer, Molecule};
use crate::core::models::units::LengthUnit;
use nalgebra::Point3;

/// Propane heavy atoms first, then hydrogens, in Angstrom.
#[rustfmt::skip]
const PROPANE_ANGSTROM: [(u8, [f64; 3]); 11] = [
    (6, [-1.2650, -0.2590,  0.0000]),
    (6, [ 0.0000,  0.5870,  0.0000]),
    (6, [ 1.2650, -0.2590,  0.0000]),
    (1, [-1.2930, -0.9070,  0.8800]),
    (1, [-1.2930, -0.9070, -0.8800]),
    (1, [-2.1630,  0.3610,  0.0000]),
    (1, [ 0.0000,  1.2420,  0.8770]),
    (1, [ 0.0000,  1.2420, -0.8770]),
    (1, [ 1.2930, -0.9070,  0.8800]),
    (1, [ 1.2930, -0.9070, -0.8800]),
    (1, [ 2.1630,  0.3610,  0.0000]),
];

pub const PROPANE_ATOMIC_NUMBERS: [u8; 11] = [6, 6, 6, 1, 1, 1, 1, 1, 1, 1, 1];

pub fn propane_conformer() -> Conformer {
    let unit = LengthUnit::Angstrom;
    Conformer::new(
        PROPANE_ANGSTROM
            .iter()
            .map(|&(z, [x, y, w])| {
                Atom::new(z, Point3::new(unit.to_bohr(x), unit.to_bohr(y), unit.to_bohr(w)))
            })
            .collect(),
    )
}

pub fn propane() -> Molecule {
    Molecule::from_conformer("propane", propane_conformer())
}

pub fn water() -> Conformer {
    Conformer::new(vec![
        Atom::new(8, Point3::new(0.0, 0.0, 0.2217)),
        Atom::new(1, Point3::new(0.0, 1.4309, -0.8867)),
        Atom::new(1, Point3::new(0.0, -1.4309, -0.8867)),
    ])
}
