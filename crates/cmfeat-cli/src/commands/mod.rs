pub mod featurize;
pub mod inspect;

use crate::error::{CliError, Result};
use cmfeat::core::io::{traits::MolecularFile, xyz::XyzFile};
use cmfeat::core::models::molecule::Molecule;
use cmfeat::core::models::units::LengthUnit;
use std::path::PathBuf;
use tracing::info;

/// Reads one molecule per XYZ file, keeping the order of `paths`.
fn read_molecules(paths: &[PathBuf], unit: LengthUnit) -> Result<Vec<Molecule>> {
    paths
        .iter()
        .map(|path| {
            info!("Loading input geometry from {:?} ({})", path, unit);
            XyzFile::read_from_path(path, unit).map_err(|e| CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            })
        })
        .collect()
}
