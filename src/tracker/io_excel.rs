use calamine::{open_workbook_auto, DataType, Range, Reader};

use tracker_core::builder::TableBuilder;

use crate::tracker::io_common::{format_number, serial_to_date};
use crate::tracker::*;

/// Reads a worksheet of an Excel workbook (xlsx or xls).
///
/// Without a worksheet name, the first worksheet is used.
pub fn read_excel_table(path: &str, worksheet_name: Option<&str>) -> TrackerResult<RawTable> {
    let wrange = get_range(path, worksheet_name)?;
    let mut rows = wrange.rows();
    let header: Vec<String> = rows
        .next()
        .context(EmptyInputSnafu { path })?
        .iter()
        .map(read_cell)
        .collect();
    debug!("read_excel_table: header: {:?}", header);

    let mut builder = TableBuilder::new(&header);
    for (idx, row) in rows.enumerate() {
        let cells: Vec<String> = row.iter().map(read_cell).collect();
        if !builder.add_non_blank_row(&cells) {
            debug!("read_excel_table: row {}: blank, skipped", idx + 2);
        }
    }
    let res = builder.build();
    info!("read_excel_table: {:?}: {} rows", path, res.num_rows());
    Ok(res)
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> TrackerResult<Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook = open_workbook_auto(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet) = worksheet_name {
        let wrange = workbook
            .worksheet_range(worksheet)
            .context(MissingWorksheetSnafu { worksheet, path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.into_iter().next() {
            Some((worksheet, wrange)) => {
                debug!("get_range: using the first worksheet {:?}", worksheet);
                Ok(wrange)
            }
            None => EmptyInputSnafu { path }.fail(),
        }
    }
}

/// The text of a cell, as it would be displayed.
fn read_cell(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Float(f) => format_number(*f),
        DataType::Int(i) => i.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::DateTime(f) => serial_to_date(*f)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| format_number(*f)),
        DataType::Empty => String::new(),
        DataType::Error(e) => {
            debug!("read_cell: error cell {:?}", e);
            String::new()
        }
        #[allow(unreachable_patterns)]
        other => format!("{:?}", other),
    }
}
