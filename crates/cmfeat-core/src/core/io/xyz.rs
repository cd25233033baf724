use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::Atom;
use crate::core::models::molecule::{Conformer, Molecule, MoleculeError};
use crate::core::models::units::LengthUnit;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: XyzParseErrorKind,
    },
    #[error("Inconsistent conformers: {0}")]
    Inconsistency(#[from] MoleculeError),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum XyzParseErrorKind {
    #[error("Invalid atom count (value: '{value}')")]
    InvalidAtomCount { value: String },
    #[error("Invalid {axis} coordinate (value: '{value}')")]
    InvalidFloat { axis: char, value: String },
    #[error("Unknown element '{value}'")]
    UnknownElement { value: String },
    #[error("Atom line needs an element and three coordinates, found {found} field(s)")]
    TooFewFields { found: usize },
    #[error("Frame ended after {found} of {expected} atoms")]
    UnexpectedEndOfFile { expected: usize, found: usize },
    #[error("Frame is missing its comment line")]
    MissingCommentLine,
}

/// Multi-frame XYZ geometry files.
///
/// Each frame is one conformer: an atom-count line, a comment line, then one
/// `<element> <x> <y> <z>` line per atom. Columns after the coordinates are
/// ignored. The first frame's comment names the molecule.
pub struct XyzFile;

fn parse_coordinate(
    token: &str,
    axis: char,
    line: usize,
    unit: LengthUnit,
) -> Result<f64, XyzError> {
    token
        .parse::<f64>()
        .map(|v| unit.to_bohr(v))
        .map_err(|_| XyzError::Parse {
            line,
            kind: XyzParseErrorKind::InvalidFloat {
                axis,
                value: token.into(),
            },
        })
}

fn parse_atom_line(content: &str, line: usize, unit: LengthUnit) -> Result<Atom, XyzError> {
    let fields: Vec<&str> = content.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(XyzError::Parse {
            line,
            kind: XyzParseErrorKind::TooFewFields {
                found: fields.len(),
            },
        });
    }
    let x = parse_coordinate(fields[1], 'x', line, unit)?;
    let y = parse_coordinate(fields[2], 'y', line, unit)?;
    let z = parse_coordinate(fields[3], 'z', line, unit)?;
    Atom::from_symbol(fields[0], Point3::new(x, y, z)).ok_or_else(|| XyzError::Parse {
        line,
        kind: XyzParseErrorKind::UnknownElement {
            value: fields[0].into(),
        },
    })
}

impl MolecularFile for XyzFile {
    type Error = XyzError;

    fn read_from(reader: &mut impl BufRead, unit: LengthUnit) -> Result<Molecule, Self::Error> {
        let lines: Vec<String> = reader.lines().collect::<Result<_, _>>()?;
        let mut cursor = 0;
        let mut name: Option<String> = None;
        let mut conformers = Vec::new();

        loop {
            while cursor < lines.len() && lines[cursor].trim().is_empty() {
                cursor += 1;
            }
            if cursor >= lines.len() {
                break;
            }

            let count_str = lines[cursor].trim();
            let count: usize = count_str.parse().map_err(|_| XyzError::Parse {
                line: cursor + 1,
                kind: XyzParseErrorKind::InvalidAtomCount {
                    value: count_str.into(),
                },
            })?;
            cursor += 1;

            let comment = lines.get(cursor).ok_or(XyzError::Parse {
                line: cursor + 1,
                kind: XyzParseErrorKind::MissingCommentLine,
            })?;
            name.get_or_insert_with(|| comment.trim().to_string());
            cursor += 1;

            // The count is untrusted; never reserve more than the lines left.
            let mut atoms = Vec::with_capacity(count.min(lines.len() - cursor));
            for _ in 0..count {
                let content = lines.get(cursor).ok_or(XyzError::Parse {
                    line: cursor + 1,
                    kind: XyzParseErrorKind::UnexpectedEndOfFile {
                        expected: count,
                        found: atoms.len(),
                    },
                })?;
                atoms.push(parse_atom_line(content, cursor + 1, unit)?);
                cursor += 1;
            }
            conformers.push(Conformer::new(atoms));
        }

        if conformers.is_empty() {
            return Err(XyzError::MissingRecord("XYZ frame".into()));
        }
        debug!(
            frames = conformers.len(),
            atoms = conformers[0].len(),
            "Parsed XYZ geometry."
        );
        Ok(Molecule::new(name.unwrap_or_default(), conformers)?)
    }

    fn write_to(
        molecule: &Molecule,
        unit: LengthUnit,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for conformer in molecule.conformers() {
            writeln!(writer, "{}", conformer.len())?;
            writeln!(writer, "{}", molecule.name())?;
            for atom in conformer.atoms() {
                let element = atom
                    .symbol()
                    .map_or_else(|| atom.atomic_number.to_string(), str::to_string);
                writeln!(
                    writer,
                    "{:<3}{:>18.10}{:>18.10}{:>18.10}",
                    element,
                    unit.from_bohr(atom.position.x),
                    unit.from_bohr(atom.position.y),
                    unit.from_bohr(atom.position.z)
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::units::BOHR_RADIUS_ANGSTROM;
    use crate::core::utils::fixtures::propane;
    use std::io::Cursor;

    const TOLERANCE: f64 = 1e-9;

    const WATER_TWO_FRAMES: &str = "3
water
O   0.000  0.000  0.117
H   0.000  0.757 -0.467
H   0.000 -0.757 -0.467

3
water, stretched
O   0.000  0.000  0.117
H   0.000  0.800 -0.500
H   0.000 -0.800 -0.500
";

    fn read(text: &str, unit: LengthUnit) -> Result<Molecule, XyzError> {
        XyzFile::read_from(&mut Cursor::new(text), unit)
    }

    #[test]
    fn reads_every_frame_as_a_conformer() {
        let molecule = read(WATER_TWO_FRAMES, LengthUnit::Angstrom).unwrap();
        assert_eq!(molecule.name(), "water");
        assert_eq!(molecule.num_conformers(), 2);
        assert_eq!(molecule.conformers()[1].atomic_numbers(), vec![8, 1, 1]);
    }

    #[test]
    fn angstrom_input_is_converted_to_bohr() {
        let text = format!("1\n\nH 0.0 {} 0.0\n", BOHR_RADIUS_ANGSTROM);
        let molecule = read(&text, LengthUnit::Angstrom).unwrap();
        let y = molecule.conformers()[0].atoms()[0].position.y;
        assert!((y - 1.0).abs() < TOLERANCE);

        let molecule = read("1\n\nH 0.0 2.5 0.0\n", LengthUnit::Bohr).unwrap();
        assert_eq!(molecule.conformers()[0].atoms()[0].position.y, 2.5);
    }

    #[test]
    fn accepts_atomic_numbers_and_extra_columns() {
        let molecule = read("2\nmixed\n6 0 0 0 -0.1\ncl 1.7 0 0 0.1\n", LengthUnit::Bohr).unwrap();
        assert_eq!(molecule.conformers()[0].atomic_numbers(), vec![6, 17]);
    }

    #[test]
    fn invalid_atom_count_reports_line() {
        let err = read("three\nbad\n", LengthUnit::Bohr).unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                line: 1,
                kind: XyzParseErrorKind::InvalidAtomCount { .. }
            }
        ));
    }

    #[test]
    fn truncated_frame_is_an_error() {
        let err = read("3\ncut\nO 0 0 0\nH 1 0 0\n", LengthUnit::Bohr).unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                line: 5,
                kind: XyzParseErrorKind::UnexpectedEndOfFile {
                    expected: 3,
                    found: 2
                }
            }
        ));
    }

    #[test]
    fn oversized_atom_count_is_a_truncated_frame() {
        let err = read("99999999999999999\nhuge\nH 0 0 0\n", LengthUnit::Bohr).unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                line: 4,
                kind: XyzParseErrorKind::UnexpectedEndOfFile {
                    expected: 99999999999999999,
                    found: 1
                }
            }
        ));
    }

    #[test]
    fn count_line_without_comment_is_an_error() {
        let err = read("99999999999999999\n", LengthUnit::Bohr).unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                line: 2,
                kind: XyzParseErrorKind::MissingCommentLine
            }
        ));
    }

    #[test]
    fn unknown_element_and_bad_coordinate_are_errors() {
        let err = read("1\n\nXq 0 0 0\n", LengthUnit::Bohr).unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                line: 3,
                kind: XyzParseErrorKind::UnknownElement { .. }
            }
        ));
        let err = read("1\n\nH 0 abc 0\n", LengthUnit::Bohr).unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                kind: XyzParseErrorKind::InvalidFloat { axis: 'y', .. },
                ..
            }
        ));
        let err = read("1\n\nH 0 0\n", LengthUnit::Bohr).unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                kind: XyzParseErrorKind::TooFewFields { found: 3 },
                ..
            }
        ));
    }

    #[test]
    fn frames_with_different_elements_are_inconsistent() {
        let text = "1\na\nH 0 0 0\n1\nb\nHe 0 0 0\n";
        assert!(matches!(
            read(text, LengthUnit::Bohr),
            Err(XyzError::Inconsistency(_))
        ));
    }

    #[test]
    fn empty_input_is_missing_record() {
        assert!(matches!(
            read("\n\n", LengthUnit::Bohr),
            Err(XyzError::MissingRecord(_))
        ));
    }

    #[test]
    fn written_file_reads_back_to_same_geometry() {
        let original = propane();
        let mut buffer = Vec::new();
        XyzFile::write_to(&original, LengthUnit::Angstrom, &mut buffer).unwrap();
        let reread = read(std::str::from_utf8(&buffer).unwrap(), LengthUnit::Angstrom).unwrap();

        assert_eq!(reread.name(), "propane");
        let a = &original.conformers()[0];
        let b = &reread.conformers()[0];
        assert_eq!(a.atomic_numbers(), b.atomic_numbers());
        for (p, q) in a.positions().iter().zip(b.positions()) {
            assert!((p - q).norm() < 1e-8);
        }
    }

    #[test]
    fn write_to_path_round_trips_through_bohr() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("propane.xyz");
        XyzFile::write_to_path(&propane(), LengthUnit::Bohr, &path).unwrap();
        let reread = XyzFile::read_from_path(&path, LengthUnit::Bohr).unwrap();
        assert_eq!(reread.name(), "propane");
        assert_eq!(reread.num_atoms(), 11);
    }

    #[test]
    fn read_from_path_falls_back_to_file_stem_for_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("methane.xyz");
        std::fs::write(&path, "1\n\nC 0 0 0\n").unwrap();
        let molecule = XyzFile::read_from_path(&path, LengthUnit::Angstrom).unwrap();
        assert_eq!(molecule.name(), "methane");
    }
}
