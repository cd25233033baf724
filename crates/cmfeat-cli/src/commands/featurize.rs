use super::read_molecules;
use crate::cli::FeaturizeArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use cmfeat::{
    core::io::features::FeatureCsvWriter, engine::progress::ProgressReporter, workflows,
};
use tracing::{info, warn};

pub fn run(args: FeaturizeArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(&args)?;
    let molecules = read_molecules(&app.inputs, app.unit)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Featurizing {} molecule(s) with the {} featurizer...",
        molecules.len(),
        app.core_config.kind
    );
    let result = workflows::featurize::run(&molecules, &app.core_config, &reporter)?;

    for failure in &result.failures {
        warn!(
            "Skipped molecule #{} '{}': {}",
            failure.index, failure.name, failure.error
        );
        println!(
            "Warning: skipped '{}' ({}): {}",
            failure.name,
            app.inputs[failure.index].display(),
            failure.error
        );
    }

    let to_output_error = |e: cmfeat::core::io::features::FeatureWriteError| CliError::Output {
        path: app.output.clone(),
        source: e.into(),
    };
    let mut writer =
        FeatureCsvWriter::create(&app.output, result.shape.num_values()).map_err(to_output_error)?;
    for molecule in &result.molecules {
        writer
            .write_molecule(&molecule.name, &molecule.features)
            .map_err(to_output_error)?;
    }
    let rows = writer.finish().map_err(to_output_error)?;

    info!("Wrote {} feature row(s) to {:?}", rows, &app.output);
    println!(
        "✓ {} feature row(s) from {} molecule(s) written to: {}",
        rows,
        result.molecules.len(),
        app.output.display()
    );
    Ok(())
}
