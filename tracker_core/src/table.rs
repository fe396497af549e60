use std::fmt::Display;

use chrono::NaiveDate;

use crate::config::*;

/// A table as produced by the file readers: a header row and string cells.
///
/// Invariant: every row has exactly as many cells as there are columns.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Creates a table, trimming the labels and fitting every row to the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> RawTable {
        let columns = unique_labels(columns.iter().map(|c| c.trim().to_string()));
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.resize(width, String::new());
                r
            })
            .collect();
        RawTable { columns, rows }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Makes a list of labels unique: a repeated label gets the first free `.1`, `.2`, ...
/// suffix, in order of appearance.
pub fn unique_labels<I: IntoIterator<Item = String>>(labels: I) -> Vec<String> {
    let mut res: Vec<String> = Vec::new();
    for label in labels {
        let name = free_label(&label, |n| res.iter().any(|r| r == n));
        res.push(name);
    }
    res
}

/// The label itself if it is not used yet, otherwise the label with the first free
/// numeric suffix.
pub(crate) fn free_label<F: Fn(&str) -> bool>(label: &str, is_used: F) -> String {
    if !is_used(label) {
        return label.to_string();
    }
    let mut suffix: usize = 1;
    loop {
        let name = format!("{}.{}", label, suffix);
        if !is_used(&name) {
            return name;
        }
        suffix += 1;
    }
}

/// A single cell value of a normalized table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Value {
    Text(String),
    /// A date column cell. `None` when the source cell was empty or could not be parsed.
    Date(Option<NaiveDate>),
    Int(i64),
    Flag(bool),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => *d,
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Value::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Date(Some(d)) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Date(None) => Ok(()),
            Value::Int(i) => write!(f, "{}", i),
            Value::Flag(b) => write!(f, "{}", b),
        }
    }
}

/// The cells of one column, all of the same type.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Cells {
    Text(Vec<String>),
    Date(Vec<Option<NaiveDate>>),
    Int(Vec<i64>),
    Flag(Vec<bool>),
}

impl Cells {
    pub fn len(&self) -> usize {
        match self {
            Cells::Text(v) => v.len(),
            Cells::Date(v) => v.len(),
            Cells::Int(v) => v.len(),
            Cells::Flag(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, idx: usize) -> Option<Value> {
        match self {
            Cells::Text(v) => v.get(idx).map(|s| Value::Text(s.clone())),
            Cells::Date(v) => v.get(idx).map(|d| Value::Date(*d)),
            Cells::Int(v) => v.get(idx).map(|i| Value::Int(*i)),
            Cells::Flag(v) => v.get(idx).map(|b| Value::Flag(*b)),
        }
    }

    /// The string rendering of every cell.
    pub fn to_strings(&self) -> Vec<String> {
        (0..self.len())
            .filter_map(|idx| self.get(idx).map(|v| v.to_string()))
            .collect()
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Column {
    pub name: String,
    pub cells: Cells,
}

/// A column-oriented table with typed columns.
///
/// Invariants: column names are unique and all the columns have `len` cells.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
    len: usize,
}

impl Table {
    /// Turns a raw table into a table of text columns.
    ///
    /// Duplicated labels are not expected after column mapping. If they occur anyway,
    /// the later duplicates get a numeric suffix.
    pub fn from_raw(raw: &RawTable) -> Table {
        let mut t = Table {
            columns: Vec::new(),
            len: raw.rows.len(),
        };
        for (idx, label) in raw.columns.iter().enumerate() {
            let name = free_label(label, |n| t.has_column(n));
            let cells: Vec<String> = raw
                .rows
                .iter()
                .map(|r| r.get(idx).cloned().unwrap_or_default())
                .collect();
            t.columns.push(Column {
                name,
                cells: Cells::Text(cells),
            });
        }
        t
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Cells> {
        self.columns.iter().find(|c| c.name == name).map(|c| &c.cells)
    }

    /// The cells of a text column. `None` if the column is absent or not a text column.
    pub fn text(&self, name: &str) -> Option<&[String]> {
        match self.column(name) {
            Some(Cells::Text(v)) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn dates(&self, name: &str) -> Option<&[Option<NaiveDate>]> {
        match self.column(name) {
            Some(Cells::Date(v)) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn ints(&self, name: &str) -> Option<&[i64]> {
        match self.column(name) {
            Some(Cells::Int(v)) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn flags(&self, name: &str) -> Option<&[bool]> {
        match self.column(name) {
            Some(Cells::Flag(v)) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Replaces the content of a column in place, or appends it at the end.
    pub fn set_column(&mut self, name: &str, cells: Cells) {
        assert_eq!(
            cells.len(),
            self.len,
            "column {} does not have the length of the table",
            name
        );
        if let Some(c) = self.columns.iter_mut().find(|c| c.name == name) {
            c.cells = cells;
        } else {
            self.columns.push(Column {
                name: name.to_string(),
                cells,
            });
        }
    }

    pub fn drop_column(&mut self, name: &str) {
        self.columns.retain(|c| c.name != name);
    }

    /// Keeps only the rows whose index passes the predicate.
    pub fn retain_rows<F: Fn(usize) -> bool>(&self, keep: F) -> Table {
        let kept: Vec<usize> = (0..self.len).filter(|idx| keep(*idx)).collect();
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                cells: match &c.cells {
                    Cells::Text(v) => Cells::Text(kept.iter().map(|i| v[*i].clone()).collect()),
                    Cells::Date(v) => Cells::Date(kept.iter().map(|i| v[*i]).collect()),
                    Cells::Int(v) => Cells::Int(kept.iter().map(|i| v[*i]).collect()),
                    Cells::Flag(v) => Cells::Flag(kept.iter().map(|i| v[*i]).collect()),
                },
            })
            .collect();
        Table {
            columns,
            len: kept.len(),
        }
    }

    pub fn record(&self, idx: usize) -> Option<Record> {
        if idx >= self.len {
            return None;
        }
        let values = self
            .columns
            .iter()
            .filter_map(|c| c.cells.get(idx).map(|v| (c.name.clone(), v)))
            .collect();
        Some(Record { values })
    }

    pub fn records(&self) -> Vec<Record> {
        (0..self.len).filter_map(|idx| self.record(idx)).collect()
    }
}

/// One row of a normalized table: a mapping from column name to value.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Record {
    values: Vec<(String, Value)>,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// The string rendering of a field, empty if the field is absent.
    pub fn text(&self, name: &str) -> String {
        self.get(name).map(|v| v.to_string()).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }
}

/// The output of the pipeline for one file.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct NormalizedTable {
    pub kind: RecordKind,
    pub table: Table,
    /// The column renamings applied to the source, in source column order.
    pub substitutions: Vec<ColumnSubstitution>,
    pub statuses: StatusBuckets,
}

impl NormalizedTable {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn records(&self) -> Vec<Record> {
        self.table.records()
    }
}
