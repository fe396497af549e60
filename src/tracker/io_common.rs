use std::path::Path;

use chrono::{Duration, NaiveDate};

/// The readers of input files.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Provider {
    Csv,
    Excel,
    Pdf,
}

impl Provider {
    pub fn from_name(name: &str) -> Option<Provider> {
        match name.trim().to_lowercase().as_str() {
            "csv" => Some(Provider::Csv),
            "excel" | "xlsx" | "xls" | "xlsm" => Some(Provider::Excel),
            "pdf" => Some(Provider::Pdf),
            _ => None,
        }
    }

    /// Guesses the provider from the extension of a file.
    pub fn from_path(path: &Path) -> Option<Provider> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Provider::from_name)
    }
}

pub fn simplify_file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Renders a number read from a spreadsheet. Whole numbers have no decimals.
pub fn format_number(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}

/// Converts a spreadsheet date serial (days since 1899-12-30) to a date.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    // 2958465 is 9999-12-31.
    if !serial.is_finite() || !(1.0..2958466.0).contains(&serial) {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|epoch| epoch.checked_add_signed(Duration::days(serial.trunc() as i64)))
}

/// Strips the byte order mark some tools put at the start of exported files.
pub fn strip_bom(s: &str) -> &str {
    s.trim_start_matches('\u{feff}')
}
