//! # Core Models Module
//!
//! Data structures describing molecular geometry as seen by the featurizers.
//!
//! - [`atom`] - An atomic number paired with a Cartesian position in Bohr
//! - [`element`] - Element symbol and atomic number lookup
//! - [`molecule`] - Conformers (one coordinate set each) grouped into molecules
//! - [`units`] - Length units and conversions into Bohr
//!
//! ```ignore
//! use cmfeat::core::models::{atom::Atom, molecule::{Conformer, Molecule}};
//! use nalgebra::Point3;
//!
//! let conformer = Conformer::new(vec![
//!     Atom::new(1, Point3::new(0.0, 0.0, 0.0)),
//!     Atom::new(1, Point3::new(1.4, 0.0, 0.0)),
//! ]);
//! let molecule = Molecule::new("H2", vec![conformer])?;
//! ```

pub mod atom;
pub mod element;
pub mod molecule;
pub mod units;
