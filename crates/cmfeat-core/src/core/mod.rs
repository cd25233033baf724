//! # Core Module
//!
//! The stateless foundation of CMFeat.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, conformers, molecules, elements and units
//! - **Featurizers** ([`featurizers`]) - Coulomb matrices, their randomization and
//!   eigen-spectra
//! - **File I/O** ([`io`]) - XYZ geometry reading/writing and CSV feature output
//! - **Utilities** ([`utils`]) - Geometric helpers shared by the featurizers and tests

pub mod featurizers;
pub mod io;
pub mod models;
pub mod utils;
