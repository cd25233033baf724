use super::read_molecules;
use crate::cli::InspectArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use cmfeat::core::featurizers::coulomb::{coulomb_matrix, self_energy};
use cmfeat::core::models::molecule::Molecule;
use cmfeat::core::models::units::LengthUnit;

const DIAGONAL_TOLERANCE: f64 = 1e-9;

pub fn run(args: InspectArgs) -> Result<()> {
    let unit = match args.unit.as_deref() {
        Some(name) => parser::parse_unit(name).map_err(|e| CliError::Argument(e.to_string()))?,
        None => LengthUnit::default(),
    };
    let molecules = read_molecules(&args.input, unit)?;

    for (molecule, path) in molecules.iter().zip(&args.input) {
        println!("{} ({})", molecule.name(), path.display());
        for line in describe(molecule, args.max_atoms) {
            println!("  {}", line);
        }
    }
    Ok(())
}

/// Summary lines for one molecule, based on its first conformer.
fn describe(molecule: &Molecule, max_atoms: Option<usize>) -> Vec<String> {
    let mut lines = vec![format!("conformers: {}", molecule.num_conformers())];
    let Some(conformer) = molecule.conformers().first() else {
        return lines;
    };

    let heavy = conformer.heavy_atom_count();
    lines.push(format!("atoms: {} ({} heavy)", conformer.len(), heavy));

    if let Some(max_atoms) = max_atoms {
        let status = if conformer.len() <= max_atoms {
            "fits".to_string()
        } else if heavy <= max_atoms {
            "fits only with --remove-hydrogens".to_string()
        } else {
            "exceeds capacity".to_string()
        };
        lines.push(format!("max-atoms {}: {}", max_atoms, status));
    }

    match coulomb_matrix(conformer.atoms()) {
        Ok(matrix) => {
            let diagonal: Vec<String> = conformer
                .atoms()
                .iter()
                .zip(matrix.diagonal().iter())
                .map(|(atom, value)| {
                    format!("{}={:.4}", atom.symbol().unwrap_or("?"), value)
                })
                .collect();
            let consistent = conformer
                .atoms()
                .iter()
                .zip(matrix.diagonal().iter())
                .all(|(atom, value)| {
                    (value - self_energy(atom.charge())).abs() < DIAGONAL_TOLERANCE
                });
            lines.push(format!("diagonal: {}", diagonal.join(" ")));
            lines.push(format!(
                "diagonal check (0.5*Z^2.4): {}",
                if consistent { "ok" } else { "MISMATCH" }
            ));
        }
        Err(e) => lines.push(format!("coulomb matrix: {}", e)),
    }
    if let Some(c) = conformer.centroid() {
        lines.push(format!("centroid (bohr): {:.4} {:.4} {:.4}", c.x, c.y, c.z));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmfeat::core::models::atom::Atom;
    use cmfeat::core::models::molecule::Conformer;
    use nalgebra::Point3;

    fn methanol_like() -> Molecule {
        Molecule::from_conformer(
            "co",
            Conformer::new(vec![
                Atom::new(6, Point3::new(0.0, 0.0, 0.0)),
                Atom::new(8, Point3::new(2.7, 0.0, 0.0)),
                Atom::new(1, Point3::new(-1.0, 1.7, 0.0)),
                Atom::new(1, Point3::new(-1.0, -1.7, 0.0)),
            ]),
        )
    }

    #[test]
    fn describes_counts_and_diagonal() {
        let lines = describe(&methanol_like(), None);
        assert_eq!(lines[0], "conformers: 1");
        assert_eq!(lines[1], "atoms: 4 (2 heavy)");
        assert!(lines[2].starts_with("diagonal: C=36.85"));
        assert!(lines[2].contains(" O=73.5"));
        assert!(lines[2].ends_with("H=0.5000"));
        assert_eq!(lines[3], "diagonal check (0.5*Z^2.4): ok");
        assert_eq!(lines[4], "centroid (bohr): 0.1750 0.0000 0.0000");
    }

    #[test]
    fn reports_capacity_status() {
        let lines = describe(&methanol_like(), Some(3));
        assert_eq!(lines[2], "max-atoms 3: fits only with --remove-hydrogens");
        let lines = describe(&methanol_like(), Some(1));
        assert_eq!(lines[2], "max-atoms 1: exceeds capacity");
    }

    #[test]
    fn coincident_atoms_are_reported_instead_of_a_diagonal() {
        let molecule = Molecule::from_conformer(
            "clash",
            Conformer::new(vec![
                Atom::new(1, Point3::origin()),
                Atom::new(1, Point3::origin()),
            ]),
        );
        let lines = describe(&molecule, None);
        assert!(lines[2].starts_with("coulomb matrix:"));
    }
}
