//! # Workflows Module
//!
//! High-level entry points that featurize whole batches of molecules.
//!
//! - **Featurization Workflow** ([`featurize`]) - Runs a configured featurizer over a
//!   batch in parallel, keeping input order, applying the error policy and emitting
//!   progress events.

pub mod featurize;
