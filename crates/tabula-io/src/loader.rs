//! Binary coefficient files.
//!
//! A tableau is stored as two files of little-endian `i32` values in row-major
//! order, one holding numerators and one holding denominators.
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tabula_solver::{Rational, SolveError, Tableau};
use thiserror::Error;
use tracing::debug;

const WIDTH: usize = size_of::<i32>();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Numerators,
    Denominators,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Numerators => f.write_str("numerator"),
            Stream::Denominators => f.write_str("denominator"),
        }
    }
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot access {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("{stream} stream has {found} bytes, expected {expected}")]
    Length {
        stream: Stream,
        expected: usize,
        found: usize,
    },
    #[error("a {rows} x {cols} tableau is too large to load")]
    Dimensions { rows: usize, cols: usize },
    #[error(transparent)]
    Shape(#[from] SolveError),
}

/// Loads a `rows × cols` tableau from a numerator file and a denominator file.
pub fn load_tableau(
    numerators: impl AsRef<Path>,
    denominators: impl AsRef<Path>,
    rows: usize,
    cols: usize,
) -> Result<Tableau<i32>, LoadError> {
    let numerators = open(numerators.as_ref())?;
    let denominators = open(denominators.as_ref())?;
    read_tableau(BufReader::new(numerators), BufReader::new(denominators), rows, cols)
}

/// Reads a `rows × cols` tableau from two streams.
///
/// Each stream must hold exactly `rows × cols` values. A zero denominator is
/// reported and the coefficient becomes zero.
pub fn read_tableau<N: Read, D: Read>(
    numerators: N,
    denominators: D,
    rows: usize,
    cols: usize,
) -> Result<Tableau<i32>, LoadError> {
    let expected = rows
        .checked_mul(cols)
        .and_then(|values| values.checked_mul(WIDTH))
        .ok_or(LoadError::Dimensions { rows, cols })?;
    let numerators = read_stream(numerators, Stream::Numerators, expected)?;
    let denominators = read_stream(denominators, Stream::Denominators, expected)?;

    let coefficients = numerators
        .into_iter()
        .zip(denominators)
        .map(|(numerator, denominator)| Rational::new(numerator, denominator))
        .collect();

    debug!(rows, cols, "loaded tableau");
    Ok(Tableau::new(rows, cols, coefficients)?)
}

/// Writes a tableau as the two files [`load_tableau`] reads.
pub fn save_tableau(
    tableau: &Tableau<i32>,
    numerators: impl AsRef<Path>,
    denominators: impl AsRef<Path>,
) -> Result<(), LoadError> {
    let numerators = create(numerators.as_ref())?;
    let denominators = create(denominators.as_ref())?;
    write_tableau(tableau, BufWriter::new(numerators), BufWriter::new(denominators))?;
    Ok(())
}

pub fn write_tableau<N: Write, D: Write>(
    tableau: &Tableau<i32>,
    mut numerators: N,
    mut denominators: D,
) -> io::Result<()> {
    for row in tableau.rows() {
        for value in row {
            numerators.write_all(&value.numerator().to_le_bytes())?;
            denominators.write_all(&value.denominator().to_le_bytes())?;
        }
    }
    numerators.flush()?;
    denominators.flush()
}

fn read_stream<R: Read>(reader: R, stream: Stream, expected: usize) -> Result<Vec<i32>, LoadError> {
    // One byte past the expected length is enough to report a mismatch.
    let limit = u64::try_from(expected).map_or(u64::MAX, |limit| limit.saturating_add(1));
    let mut bytes = Vec::new();
    reader.take(limit).read_to_end(&mut bytes)?;
    if bytes.len() != expected {
        return Err(LoadError::Length {
            stream,
            expected,
            found: bytes.len(),
        });
    }

    Ok(bytes
        .chunks_exact(WIDTH)
        .map(|chunk| i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::File {
        path: path.to_path_buf(),
        source,
    })
}

fn create(path: &Path) -> Result<File, LoadError> {
    File::create(path).map_err(|source| LoadError::File {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn le(values: &[i32]) -> Vec<u8> {
        values.iter().flat_map(|value| value.to_le_bytes()).collect()
    }

    #[test]
    fn test_read_from_streams() {
        let numerators = le(&[0, 1, 3, 4]);
        let denominators = le(&[1, 2, 6, 1]);

        let tableau = read_tableau(numerators.as_slice(), denominators.as_slice(), 2, 2).unwrap();
        assert_eq!(tableau.nr_rows(), 1);
        assert_eq!(tableau.nr_columns(), 1);
        assert_eq!(*tableau.get(0, 1), Rational::new(1, 2));
        assert_eq!(*tableau.get(1, 0), Rational::new(1, 2));
        assert_eq!(*tableau.get(1, 1), Rational::from(4));
    }

    #[test]
    fn test_length_mismatch() {
        let numerators = le(&[0, 1, 3]);
        let denominators = le(&[1, 1, 1, 1]);

        let result = read_tableau(numerators.as_slice(), denominators.as_slice(), 2, 2);
        assert!(matches!(
            result,
            Err(LoadError::Length {
                stream: Stream::Numerators,
                expected: 16,
                found: 12,
            })
        ));

        let result = read_tableau(denominators.as_slice(), &[0u8; 17][..], 2, 2);
        assert!(matches!(
            result,
            Err(LoadError::Length {
                stream: Stream::Denominators,
                ..
            })
        ));
    }

    #[test]
    fn test_huge_dimensions() {
        let result = read_tableau(&[0u8; 0][..], &[0u8; 0][..], usize::MAX / 2, 3);
        assert!(matches!(
            result,
            Err(LoadError::Dimensions {
                rows: _,
                cols: 3
            })
        ));

        // Fits in usize but no stream could hold it.
        let result = read_tableau(&[0u8; 8][..], &[0u8; 8][..], usize::MAX / 8, 2);
        assert!(matches!(result, Err(LoadError::Length { found: 8, .. })));
    }

    #[test]
    fn test_zero_denominator_becomes_zero() {
        let tableau = read_tableau(le(&[5]).as_slice(), le(&[0]).as_slice(), 1, 1).unwrap();
        assert_eq!(*tableau.get(0, 0), Rational::from(0));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let numerators = dir.path().join("tableau.num");
        let denominators = dir.path().join("tableau.den");

        let rows = [[0, 3, 4, 5, 0, 0], [-6, -2, -2, -1, 1, 0], [-5, -1, -2, -3, 0, 1]];
        let mut coefficients: Vec<Rational> = rows.iter().flatten().map(|&value| Rational::from(value)).collect();
        coefficients[7] = Rational::new(-5, 2);
        let tableau = Tableau::new(3, 6, coefficients).unwrap();

        save_tableau(&tableau, &numerators, &denominators).unwrap();
        assert_eq!(std::fs::metadata(&numerators).unwrap().len(), 72);

        let loaded = load_tableau(&numerators, &denominators, 3, 6).unwrap();
        assert_eq!(loaded, tableau);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = load_tableau(dir.path().join("missing.num"), dir.path().join("missing.den"), 1, 1);
        assert!(matches!(result, Err(LoadError::File { .. })));
    }
}
