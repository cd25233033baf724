//! Configuration for the `featurize` command.
//!
//! Values are merged with the precedence CLI flags > `-S key=value` > config file >
//! built-in defaults. `-S` overrides are written into the parsed file config, so a
//! key set there behaves exactly like the same key in the file.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::build_config;
