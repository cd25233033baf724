use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileRandomizationConfig, FileStrategy};
use super::models::AppConfig;
use crate::cli::FeaturizeArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use cmfeat::core::featurizers::permutation::PermutationStrategy;
use cmfeat::engine::config::{self as core_config, ErrorPolicy};
use cmfeat::engine::error::EngineError;
use std::str::FromStr;
use tracing::warn;

pub fn build_config(args: &FeaturizeArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let kind = match args.kind.as_deref() {
        Some(name) => parser::parse_kind(name).map_err(|e| CliError::Argument(e.to_string()))?,
        None => file_config.kind.unwrap_or(defaults.kind),
    };
    let unit = match args.unit.as_deref() {
        Some(name) => parser::parse_unit(name).map_err(|e| CliError::Argument(e.to_string()))?,
        None => file_config.unit.unwrap_or(defaults.unit),
    };
    let max_atoms = args
        .max_atoms
        .or(file_config.max_atoms)
        .unwrap_or(defaults.max_atoms);

    let remove_hydrogens = switch(
        args.hydrogens.remove_hydrogens,
        args.hydrogens.keep_hydrogens,
    )
    .or(file_config.remove_hydrogens)
    .unwrap_or(defaults.remove_hydrogens);
    let upper_triangular = switch(args.upper_triangular, args.no_upper_triangular)
        .or(file_config.upper_triangular)
        .unwrap_or(defaults.upper_triangular);
    let skip_failed = switch(args.skip_failed, args.no_skip_failed)
        .or(file_config.skip_failed)
        .unwrap_or(defaults.skip_failed);
    let error_policy = if skip_failed {
        ErrorPolicy::Skip
    } else {
        ErrorPolicy::Abort
    };

    let randomization = merge_randomization(args, file_config.randomization.take(), &defaults)?;

    let core_config = core_config::FeaturizationConfigBuilder::new()
        .kind(kind)
        .max_atoms(max_atoms)
        .remove_hydrogens(remove_hydrogens)
        .upper_triangular(upper_triangular)
        .randomization(randomization)
        .error_policy(error_policy)
        .build()
        .map_err(EngineError::from)?;

    Ok(AppConfig {
        inputs: args.input.clone(),
        output: args.output.clone(),
        unit,
        core_config,
    })
}

/// Resolves an `--x` / `--no-x` flag pair; `None` when neither was given.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn merge_randomization(
    args: &FeaturizeArgs,
    file_val: Option<FileRandomizationConfig>,
    defaults: &DefaultsConfig,
) -> Result<Option<core_config::RandomizationConfig>> {
    let enabled_in_file = file_val
        .as_ref()
        .is_some_and(|r| r.enabled.unwrap_or(true));
    if !(args.randomize || enabled_in_file) {
        let cli_options_given = args.num_samples.is_some()
            || args.strategy.is_some()
            || args.seed.is_some()
            || args.include_unpermuted
            || args.no_include_unpermuted;
        if cli_options_given {
            warn!("Randomization options were given without --randomize and are ignored.");
        }
        return Ok(None);
    }

    let file_val = file_val.unwrap_or_default();
    let strategy = match (args.strategy.as_deref(), file_val.strategy) {
        (Some(name), _) => resolve_strategy(name, defaults.sigma)?,
        (None, Some(FileStrategy::Name(name))) => resolve_strategy(&name, defaults.sigma)?,
        (None, Some(FileStrategy::Table(strategy))) => strategy,
        (None, None) => resolve_strategy(&defaults.strategy, defaults.sigma)?,
    };

    Ok(Some(core_config::RandomizationConfig {
        num_samples: args
            .num_samples
            .or(file_val.num_samples)
            .unwrap_or(defaults.num_samples),
        strategy,
        include_unpermuted: switch(args.include_unpermuted, args.no_include_unpermuted)
            .or(file_val.include_unpermuted)
            .unwrap_or(defaults.include_unpermuted),
        seed: args.seed.or(file_val.seed),
    }))
}

fn resolve_strategy(name: &str, default_sigma: f64) -> Result<PermutationStrategy> {
    parser::parse_strategy(name, default_sigma).map_err(|e| CliError::Argument(e.to_string()))
}

fn parse_value<T: FromStr>(key: &str, value: &str, what: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", what, key, value))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key.trim() {
            "kind" => {
                config.kind = Some(
                    parser::parse_kind(value_str).map_err(|e| CliError::Config(e.to_string()))?,
                );
            }
            "unit" => {
                config.unit = Some(
                    parser::parse_unit(value_str).map_err(|e| CliError::Config(e.to_string()))?,
                );
            }
            "max-atoms" => config.max_atoms = Some(parse_value(key, value_str, "integer")?),
            "remove-hydrogens" => {
                config.remove_hydrogens = Some(parse_value(key, value_str, "boolean")?)
            }
            "upper-triangular" => {
                config.upper_triangular = Some(parse_value(key, value_str, "boolean")?)
            }
            "skip-failed" => config.skip_failed = Some(parse_value(key, value_str, "boolean")?),
            "randomization.enabled" => {
                config
                    .randomization
                    .get_or_insert_with(Default::default)
                    .enabled = Some(parse_value(key, value_str, "boolean")?);
            }
            "randomization.num-samples" => {
                config
                    .randomization
                    .get_or_insert_with(Default::default)
                    .num_samples = Some(parse_value(key, value_str, "integer")?);
            }
            "randomization.strategy" => {
                config
                    .randomization
                    .get_or_insert_with(Default::default)
                    .strategy = Some(FileStrategy::Name(value_str.trim().to_string()));
            }
            "randomization.seed" => {
                config.randomization.get_or_insert_with(Default::default).seed =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "randomization.include-unpermuted" => {
                config
                    .randomization
                    .get_or_insert_with(Default::default)
                    .include_unpermuted = Some(parse_value(key, value_str, "boolean")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
