// Reading tables printed in PDF reports.

use regex::Regex;

use tracker_core::builder::TableBuilder;

use crate::tracker::*;

/// Reads the table printed across the pages of a PDF report.
#[cfg(feature = "pdf")]
pub fn read_pdf_table(path: &str) -> TrackerResult<RawTable> {
    let doc = lopdf::Document::load(path).map_err(|e| TrackerError::ReadingPdf {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    if doc.is_encrypted() {
        return ReadingPdfSnafu {
            path,
            message: "the document is encrypted",
        }
        .fail();
    }
    let pages = doc.get_pages();
    debug!("read_pdf_table: {:?}: {} pages", path, pages.len());
    let mut texts: Vec<String> = Vec::with_capacity(pages.len());
    for page_num in pages.keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(text) => texts.push(text),
            Err(e) => {
                warn!(
                    "read_pdf_table: {:?}: no text on page {}: {}",
                    path, page_num, e
                );
                texts.push(String::new());
            }
        }
    }
    table_from_pages(path, &texts)
}

#[cfg(not(feature = "pdf"))]
pub fn read_pdf_table(path: &str) -> TrackerResult<RawTable> {
    MissingPdfSupportSnafu { path }.fail()
}

/// Splits a line of text in cells, on tabs or on runs of two spaces or more.
fn split_cells(separator: &Regex, line: &str) -> Vec<String> {
    separator
        .split(line.trim())
        .map(|s| s.trim().to_string())
        .collect()
}

/// Builds a table from the text of the pages, in page order.
///
/// The first line with at least two cells is the header. The lines repeating the header
/// (at the top of each page) are skipped, as well as the lines with a single cell (titles,
/// page numbers).
#[cfg_attr(not(feature = "pdf"), allow(dead_code))]
fn table_from_pages(path: &str, pages: &[String]) -> TrackerResult<RawTable> {
    let separator = Regex::new(r"\t+|\s{2,}").map_err(|e| TrackerError::ReadingPdf {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    let mut builder: Option<TableBuilder> = None;
    let mut header: Vec<String> = Vec::new();
    for (page_idx, text) in pages.iter().enumerate() {
        for line in text.lines() {
            let cells = split_cells(&separator, line);
            if cells.len() < 2 {
                continue;
            }
            match builder.as_mut() {
                None => {
                    debug!(
                        "table_from_pages: header on page {}: {:?}",
                        page_idx + 1,
                        cells
                    );
                    builder = Some(TableBuilder::new(&cells));
                    header = cells;
                }
                Some(_) if cells == header => {
                    debug!("table_from_pages: repeated header on page {}", page_idx + 1);
                }
                Some(b) => {
                    b.add_non_blank_row(&cells);
                }
            }
        }
    }
    let res = builder.context(NoPdfTableSnafu { path })?.build();
    info!(
        "table_from_pages: {:?}: {} rows over {} pages",
        path,
        res.num_rows(),
        pages.len()
    );
    Ok(res)
}
