//! # CMFeat Core Library
//!
//! Coulomb matrix featurization of molecular conformers: the padded Coulomb matrix
//! (optionally randomized or flattened to its upper triangle) and its eigenvalue
//! spectrum, ready to be fed to a downstream numeric model.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Atom`, `Conformer`, `Molecule`),
//!   the featurizers themselves as pure functions over geometry, and file I/O.
//!
//! - **[`engine`]: Configuration and Diagnostics.** The validated `FeaturizationConfig`,
//!   the engine-level error type and progress reporting.
//!
//! - **[`workflows`]: The Public API.** Batch featurization of many molecules, tying the
//!   configuration to the featurizers and reporting progress along the way.

pub mod core;
pub mod engine;
pub mod workflows;
