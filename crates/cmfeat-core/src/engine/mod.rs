//! # Engine Module
//!
//! Configuration, diagnostics and progress plumbing around the featurizers.
//!
//! - **Configuration** ([`config`]) - The validated `FeaturizationConfig` and its builder
//! - **Error Handling** ([`error`]) - Engine-level errors wrapping featurizer failures
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting

pub mod config;
pub mod error;
pub mod progress;
