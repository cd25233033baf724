use crate::core::models::molecule::Molecule;
use crate::core::models::units::LengthUnit;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing molecular geometry files.
///
/// Implementors handle format-specific parsing and serialization. Coordinates are
/// converted between the file's `unit` and the Bohr positions held by [`Molecule`].
pub trait MolecularFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads one molecule (with all of its conformers) from a buffered reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The buffered reader to read from.
    /// * `unit` - The length unit of the coordinates in the input.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead, unit: LengthUnit) -> Result<Molecule, Self::Error>;

    /// Writes a molecule to a writer, expressing coordinates in `unit`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(
        molecule: &Molecule,
        unit: LengthUnit,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Reads a molecule from a file path.
    ///
    /// If the file does not name the molecule, the file stem is used instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P, unit: LengthUnit) -> Result<Molecule, Self::Error> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut molecule = Self::read_from(&mut reader, unit)?;
        if molecule.name().is_empty() {
            if let Some(stem) = path.file_stem() {
                molecule.set_name(stem.to_string_lossy());
            }
        }
        Ok(molecule)
    }

    /// Writes a molecule to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        molecule: &Molecule,
        unit: LengthUnit,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(molecule, unit, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
