//! Provides input/output functionality for geometries and features.
//!
//! Geometries are read from (and written to) XYZ files through the
//! [`traits::MolecularFile`] interface; feature arrays are written as CSV rows.

pub mod features;
pub mod traits;
pub mod xyz;
