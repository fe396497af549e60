// Primitives for reading CSV files.

use tracker_core::builder::TableBuilder;

use crate::tracker::io_common::strip_bom;
use crate::tracker::*;

/// Reads a CSV export. The first line is the header, blank lines are skipped.
pub fn read_csv_table(path: &str) -> TrackerResult<RawTable> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut records = rdr.into_records();

    let header: Vec<String> = match records.next() {
        Some(line_r) => line_r
            .context(CsvLineParseSnafu { path, lineno: 1_usize })?
            .iter()
            .map(|s| strip_bom(s).to_string())
            .collect(),
        None => return EmptyInputSnafu { path }.fail(),
    };
    debug!("read_csv_table: header: {:?}", header);

    let mut builder = TableBuilder::new(&header);
    let mut skipped: usize = 0;
    for (idx, line_r) in records.enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        let cells: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        if cells.len() > builder.num_columns() {
            debug!(
                "read_csv_table: line {}: {} cells for {} columns, extra cells dropped",
                lineno,
                cells.len(),
                builder.num_columns()
            );
        }
        if !builder.add_non_blank_row(&cells) {
            skipped += 1;
        }
    }
    let res = builder.build();
    info!(
        "read_csv_table: {:?}: {} rows, {} blank lines skipped",
        path,
        res.num_rows(),
        skipped
    );
    Ok(res)
}
