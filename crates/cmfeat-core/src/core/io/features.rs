use crate::core::featurizers::FeatureArray;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeatureWriteError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Feature array has {found} values but the file was opened for {expected}")]
    WidthMismatch { expected: usize, found: usize },
}

/// Writes feature arrays as CSV, one row per array.
///
/// Rows are `molecule,sample,f0,f1,...` where `sample` counts the arrays emitted
/// for that molecule (conformers and randomized variants, in output order) and the
/// values are the array flattened row-major.
pub struct FeatureCsvWriter<W: Write> {
    inner: csv::Writer<W>,
    columns: usize,
    rows: usize,
}

impl FeatureCsvWriter<File> {
    pub fn create<P: AsRef<Path>>(path: P, columns: usize) -> Result<Self, FeatureWriteError> {
        Self::new(File::create(path)?, columns)
    }
}

impl<W: Write> FeatureCsvWriter<W> {
    /// Wraps `writer` and emits the header row for `columns` feature values.
    pub fn new(writer: W, columns: usize) -> Result<Self, FeatureWriteError> {
        let mut inner = csv::Writer::from_writer(writer);
        let header = ["molecule".to_string(), "sample".to_string()]
            .into_iter()
            .chain((0..columns).map(|i| format!("f{}", i)));
        inner.write_record(header)?;
        Ok(Self {
            inner,
            columns,
            rows: 0,
        })
    }

    pub fn write(
        &mut self,
        molecule: &str,
        sample: usize,
        array: &FeatureArray,
    ) -> Result<(), FeatureWriteError> {
        let values = array.to_row_major();
        if values.len() != self.columns {
            return Err(FeatureWriteError::WidthMismatch {
                expected: self.columns,
                found: values.len(),
            });
        }
        let record = [molecule.to_string(), sample.to_string()]
            .into_iter()
            .chain(values.iter().map(f64::to_string));
        self.inner.write_record(record)?;
        self.rows += 1;
        Ok(())
    }

    /// Writes every array of one molecule, numbering samples from zero.
    pub fn write_molecule(
        &mut self,
        molecule: &str,
        arrays: &[FeatureArray],
    ) -> Result<(), FeatureWriteError> {
        for (sample, array) in arrays.iter().enumerate() {
            self.write(molecule, sample, array)?;
        }
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Flushes buffered rows and returns the number of rows written.
    pub fn finish(mut self) -> Result<usize, FeatureWriteError> {
        self.inner.flush()?;
        Ok(self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{DMatrix, DVector};

    fn write_to_string(f: impl FnOnce(&mut FeatureCsvWriter<&mut Vec<u8>>)) -> String {
        let mut buffer = Vec::new();
        {
            let mut writer = FeatureCsvWriter::new(&mut buffer, 4).unwrap();
            f(&mut writer);
            writer.finish().unwrap();
        }
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn header_and_rows_are_written_row_major() {
        let m = FeatureArray::Matrix(DMatrix::from_row_slice(2, 2, &[1.0, 2.5, 2.5, 0.0]));
        let text = write_to_string(|w| {
            w.write_molecule("h2", &[m.clone(), m.clone()]).unwrap();
            assert_eq!(w.rows_written(), 2);
        });
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "molecule,sample,f0,f1,f2,f3");
        assert_eq!(lines[1], "h2,0,1,2.5,2.5,0");
        assert_eq!(lines[2], "h2,1,1,2.5,2.5,0");
    }

    #[test]
    fn width_mismatch_is_rejected() {
        let mut buffer = Vec::new();
        let mut writer = FeatureCsvWriter::new(&mut buffer, 4).unwrap();
        let v = FeatureArray::Vector(DVector::from_vec(vec![1.0, 2.0]));
        assert!(matches!(
            writer.write("x", 0, &v),
            Err(FeatureWriteError::WidthMismatch {
                expected: 4,
                found: 2
            })
        ));
    }

    #[test]
    fn create_writes_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.csv");
        let mut writer = FeatureCsvWriter::create(&path, 2).unwrap();
        writer
            .write("a", 0, &FeatureArray::Vector(DVector::from_vec(vec![3.0, 1.0])))
            .unwrap();
        assert_eq!(writer.finish().unwrap(), 1);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("a,0,3,1"));
    }
}
