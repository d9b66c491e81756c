//! Relation models (precomputed fuzzy rule matrices).
//!
//! A relation model is a plain-text matrix: one row per line, fields
//! separated by commas, no header. Rows are indexed by the combined
//! antecedent universe, columns by the selection-rate universe.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::error::{MappingError, Result};

/// Immutable relation matrix consumed by max-min inference.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationModel {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl RelationModel {
    /// Builds a model from row vectors.
    ///
    /// Fails with `EmptyModel` for no rows (or empty rows) and
    /// `RaggedModel` when a row width differs from the first.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(MappingError::EmptyModel);
        }
        let row_count = rows.len();
        let mut values = Vec::with_capacity(row_count * cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(MappingError::RaggedModel {
                    line: i + 1,
                    expected: cols,
                    found: row.len(),
                });
            }
            values.extend(row);
        }
        Ok(Self {
            rows: row_count,
            cols,
            values,
        })
    }

    /// Parses the textual matrix format. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut rows = Vec::new();
        let mut cols: Option<usize> = None;

        for (line_idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let row = line
                .split(',')
                .enumerate()
                .map(|(col_idx, field)| {
                    let field = field.trim();
                    field.parse::<f64>().map_err(|_| MappingError::Parse {
                        line: line_idx + 1,
                        column: col_idx + 1,
                        value: field.to_string(),
                    })
                })
                .collect::<Result<Vec<f64>>>()?;

            match cols {
                None => cols = Some(row.len()),
                Some(expected) if expected != row.len() => {
                    return Err(MappingError::RaggedModel {
                        line: line_idx + 1,
                        expected,
                        found: row.len(),
                    });
                }
                Some(_) => {}
            }
            rows.push(row);
        }

        Self::from_rows(rows)
    }

    /// Reads and parses a model file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| MappingError::from_io(path, e))?;
        let model = Self::parse(&text)?;
        debug!(path = %path.display(), rows = model.rows, cols = model.cols, "loaded relation model");
        Ok(model)
    }

    /// Number of rows (antecedent universe size).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (output universe size).
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Value at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    /// Values of one row.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row * self.cols..(row + 1) * self.cols]
    }
}

impl FromStr for RelationModel {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Which fuzzy controller a relation model belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Allocation controller (CONT1).
    Allocation,
    /// Task-selection controller type 2 (CONT2).
    DispatchType2,
    /// Task-selection controller type 3 (CONT3).
    DispatchType3,
}

impl ModelKind {
    /// File name of the model inside a [`ModelStore`] directory.
    pub fn file_name(self) -> &'static str {
        match self {
            ModelKind::Allocation => "model1.dat",
            ModelKind::DispatchType2 => "model2.dat",
            ModelKind::DispatchType3 => "model3.dat",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Directory holding the relation model files.
///
/// Models are selected by controller, never by content inspection.
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    /// Creates a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file for `kind`.
    pub fn path_for(&self, kind: ModelKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    /// Loads the model for `kind`.
    pub fn load(&self, kind: ModelKind) -> Result<Arc<RelationModel>> {
        RelationModel::load(self.path_for(kind)).map(Arc::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("u-fuzzymap-{tag}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_matrix() {
        let m = RelationModel::parse("0,0.5,1\n0.25,0.75,0\n").unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert!((m.get(0, 1) - 0.5).abs() < 1e-10);
        assert!((m.get(1, 0) - 0.25).abs() < 1e-10);
        assert_eq!(m.row(1), &[0.25, 0.75, 0.0]);
    }

    #[test]
    fn test_parse_tolerates_whitespace_and_blank_lines() {
        let m: RelationModel = " 0.1 , 0.2\r\n\n0.3,0.4\n\n".parse().unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 2);
    }

    #[test]
    fn test_parse_non_numeric_field() {
        let err = RelationModel::parse("0.1,0.2\n0.3,abc\n").unwrap_err();
        match err {
            MappingError::Parse {
                line,
                column,
                value,
            } => {
                assert_eq!(line, 2);
                assert_eq!(column, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_ragged_rows() {
        let err = RelationModel::parse("0.1,0.2\n0.3\n").unwrap_err();
        assert!(matches!(
            err,
            MappingError::RaggedModel {
                line: 2,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(
            RelationModel::parse("\n\n").unwrap_err(),
            MappingError::EmptyModel
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let store = ModelStore::new(temp_dir("missing").join("nowhere"));
        let err = store.load(ModelKind::Allocation).unwrap_err();
        assert!(matches!(err, MappingError::FileNotFound { .. }));
    }

    #[test]
    fn test_store_selects_file_by_kind() {
        let dir = temp_dir("store");
        fs::write(dir.join("model2.dat"), "0.5,0.5\n").unwrap();
        fs::write(dir.join("model3.dat"), "0.1,0.2,0.3\n").unwrap();

        let store = ModelStore::new(&dir);
        assert_eq!(store.load(ModelKind::DispatchType2).unwrap().cols(), 2);
        assert_eq!(store.load(ModelKind::DispatchType3).unwrap().cols(), 3);
        assert_eq!(store.path_for(ModelKind::Allocation), dir.join("model1.dat"));
    }
}
