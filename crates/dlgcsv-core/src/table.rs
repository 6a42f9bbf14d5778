//! Core table types produced by the codec

use serde::{Deserialize, Serialize};

/// A parsed table: an ordered list of rows, the first conventionally
/// holding column headers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Row data, in input order
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row
    pub fn push(&mut self, row: impl Into<Row>) {
        self.rows.push(row.into());
    }

    /// Get the number of rows, header included
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows at all
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The header row, if any
    pub fn headers(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Rows after the header
    pub fn records(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Number of cells in the widest row
    pub fn width(&self) -> usize {
        self.rows.iter().map(Row::len).max().unwrap_or(0)
    }
}

impl<R: Into<Row>> FromIterator<R> for Table {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// A row of cells. Rows are never padded, so two rows of the same
/// table may have different lengths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    pub cells: Vec<String>,
}

impl Row {
    /// Create a new row
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Get a cell by column index; `None` past the end of a short row
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for Row {
    fn from(cells: Vec<String>) -> Self {
        Self { cells }
    }
}

impl From<Vec<&str>> for Row {
    fn from(cells: Vec<&str>) -> Self {
        Self {
            cells: cells.into_iter().map(str::to_string).collect(),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_and_records() {
        let table: Table = vec![vec!["id", "English"], vec!["1", "Hello"], vec!["2", "Bye"]]
            .into_iter()
            .collect();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.headers().unwrap().get(1), Some("English"));
        assert_eq!(table.records().len(), 2);
        assert_eq!(table.records()[1].get(1), Some("Bye"));
    }

    #[test]
    fn test_empty_table() {
        let table = Table::new();
        assert!(table.is_empty());
        assert!(table.headers().is_none());
        assert!(table.records().is_empty());
        assert_eq!(table.width(), 0);
    }

    #[test]
    fn test_short_row_get() {
        let row = Row::from(vec!["a", "b"]);
        assert_eq!(row.get(1), Some("b"));
        assert_eq!(row.get(2), None);
    }

    #[test]
    fn test_width_uses_widest_row() {
        let mut table = Table::new();
        table.push(vec!["a", "b", "c"]);
        table.push(vec!["x"]);
        assert_eq!(table.width(), 3);
    }

    #[test]
    fn test_row_serializes_as_array() {
        let table: Table = vec![vec!["a", "b"]].into_iter().collect();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"rows":[["a","b"]]}"#);
    }
}
