//! Feature tables: named columns over segmented-structure rows.
//!
//! Rows are structures, columns are either numeric feature channels or
//! pass-through text columns (labels, identifiers, hover data). Missing
//! numeric entries are carried as `f64::NAN` and handled downstream by
//! standardization. All columns in a table share one row count; constructors
//! enforce the invariant.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Column payload: one value per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnData {
    /// Numeric feature channel; missing entries are `NaN`.
    Numeric(Vec<f64>),
    /// Pass-through text column (labels, identifiers, hover data).
    Text(Vec<String>),
}

impl ColumnData {
    /// Number of rows in the column.
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Text(values) => values.len(),
        }
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, unique within a table.
    pub name: String,
    /// Column payload.
    pub data: ColumnData,
}

impl Column {
    /// Numeric column.
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    /// Text column.
    pub fn text(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Text(values),
        }
    }
}

/// Named-column table over a fixed row count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    columns: Vec<Column>,
    rows: usize,
}

impl FeatureTable {
    /// Empty table (no columns, no rows).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from columns, validating the shared row count.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let mut table = Self::new();
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    /// Append a column. The first column fixes the table's row count.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if self.columns.is_empty() {
            self.rows = column.data.len();
        } else if column.data.len() != self.rows {
            return Err(Error::ColumnLength {
                column: column.name,
                expected: self.rows,
                actual: column.data.len(),
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Whether the table has the named column.
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Iterate over all columns.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Assemble the numeric matrix for the requested feature columns.
    ///
    /// Requested names that are absent or non-numeric are skipped, not
    /// errors: callers select from a fixed feature vocabulary and any given
    /// slide only carries a subset.
    pub fn select_numeric(&self, requested: &[&str]) -> FeatureMatrix {
        let selected: Vec<(&str, &[f64])> = requested
            .iter()
            .filter_map(|&name| match self.column(name) {
                Some(Column {
                    data: ColumnData::Numeric(values),
                    ..
                }) => Some((name, values.as_slice())),
                _ => None,
            })
            .collect();

        let cols = selected.len();
        let mut data = vec![0.0; self.rows * cols];
        for (c, (_, values)) in selected.iter().enumerate() {
            for (r, &v) in values.iter().enumerate() {
                data[r * cols + c] = v;
            }
        }

        FeatureMatrix {
            names: selected.iter().map(|(name, _)| name.to_string()).collect(),
            data,
            rows: self.rows,
            cols,
        }
    }

    /// Clone the requested pass-through columns, in request order, skipping
    /// absent names.
    pub fn select_columns(&self, requested: &[&str]) -> Vec<Column> {
        requested
            .iter()
            .filter_map(|&name| self.column(name).cloned())
            .collect()
    }
}

/// Dense row-major numeric matrix with column names attached.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    /// Names of the selected columns, in selection order.
    pub names: Vec<String>,
    /// Row-major values, `rows * cols` entries.
    pub data: Vec<f64>,
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
}

impl FeatureMatrix {
    /// Value at (row, col).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// One row as a slice.
    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Whether the matrix has no cells.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Squared Euclidean distance between two rows.
    #[inline]
    pub fn row_distance_sq(&self, a: usize, b: usize) -> f64 {
        let (ra, rb) = (self.row(a), self.row(b));
        ra.iter()
            .zip(rb)
            .map(|(x, y)| (x - y) * (x - y))
            .sum()
    }
}
