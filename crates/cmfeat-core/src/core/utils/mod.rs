//! Geometric helpers shared by the featurizers.

#[cfg(test)]
pub(crate) mod fixtures;
pub mod geometry;
