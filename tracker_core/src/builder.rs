use crate::table::RawTable;

/// A builder for raw tables, one row at a time.
///
/// All the file readers go through the builder, so that the header and the rows are
/// cleaned up the same way regardless of the source format.
///
/// ```
/// use tracker_core::builder::TableBuilder;
///
/// let mut builder = TableBuilder::new(&["RFI #".to_string(), "Status".to_string()]);
/// builder.add_row(&["RFI-0001".to_string(), "Open".to_string()]);
/// builder.add_row(&["RFI-0002".to_string()]);
///
/// let raw = builder.build();
/// assert_eq!(raw.num_rows(), 2);
/// assert_eq!(raw.rows[1][1], "");
/// ```
pub struct TableBuilder {
    pub(crate) _columns: Vec<String>,
    pub(crate) _rows: Vec<Vec<String>>,
}

impl TableBuilder {
    pub fn new(columns: &[String]) -> TableBuilder {
        TableBuilder {
            _columns: columns.to_vec(),
            _rows: Vec::new(),
        }
    }

    /// Convenience for static data.
    pub fn from_strs(columns: &[&str]) -> TableBuilder {
        TableBuilder::new(&columns.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    pub fn num_columns(&self) -> usize {
        self._columns.len()
    }

    /// Adds a row. Rows that are too short are padded with empty cells.
    pub fn add_row(&mut self, cells: &[String]) {
        self._rows.push(cells.to_vec());
    }

    pub fn add_row_strs(&mut self, cells: &[&str]) {
        self._rows.push(cells.iter().map(|s| s.to_string()).collect());
    }

    /// Adds a row unless all its cells are blank.
    ///
    /// Returns true if the row was added.
    pub fn add_non_blank_row(&mut self, cells: &[String]) -> bool {
        if cells.iter().all(|c| c.trim().is_empty()) {
            false
        } else {
            self.add_row(cells);
            true
        }
    }

    pub fn build(self) -> RawTable {
        RawTable::new(self._columns, self._rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_rows_are_skipped() {
        let mut b = TableBuilder::from_strs(&["A", "B"]);
        assert!(!b.add_non_blank_row(&[" ".to_string(), "".to_string()]));
        assert!(b.add_non_blank_row(&["".to_string(), "x".to_string()]));
        let raw = b.build();
        assert_eq!(raw.num_rows(), 1);
        assert_eq!(raw.rows[0], vec!["".to_string(), "x".to_string()]);
    }
}
