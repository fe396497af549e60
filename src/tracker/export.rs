// Writing the CSV exports.

use std::path::Path;

use tracker_core::fields::IS_OVERDUE;
use tracker_core::report::Summary;
use tracker_core::table::Column;

use crate::tracker::*;

pub const OVERDUE_REPORT_FILE: &str = "overdue_report.csv";

const OVERDUE_REPORT_HEADER: [&str; 5] = [
    "Item #",
    "Description",
    "Contractor",
    "Ball in Court",
    "Days Open",
];

pub fn export_file_name(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Submittal => "submittals_export.csv",
        RecordKind::Rfi => "rfis_export.csv",
    }
}

fn csv_writer(path: &Path) -> TrackerResult<csv::Writer<fs::File>> {
    csv::Writer::from_path(path).context(WritingCsvSnafu {
        path: path.display().to_string(),
    })
}

/// Writes the overdue items of all the summaries, in the order of the summaries.
pub fn write_overdue_report(path: &Path, summaries: &[Summary]) -> TrackerResult<usize> {
    let p = path.display().to_string();
    let mut wtr = csv_writer(path)?;
    wtr.write_record(OVERDUE_REPORT_HEADER)
        .context(WritingCsvSnafu { path: p.clone() })?;
    let mut count: usize = 0;
    for item in summaries.iter().flat_map(|s| s.overdue_items.iter()) {
        wtr.write_record([
            item.id.as_str(),
            item.description.as_str(),
            item.contractor.as_str(),
            item.ball_in_court.as_str(),
            item.days_open.to_string().as_str(),
        ])
        .context(WritingCsvSnafu { path: p.clone() })?;
        count += 1;
    }
    wtr.flush().context(WritingOutputSnafu { path: p })?;
    Ok(count)
}

/// Writes a normalized table, without the computed overdue flag.
pub fn write_table(path: &Path, nt: &NormalizedTable) -> TrackerResult<()> {
    let p = path.display().to_string();
    let columns: Vec<&Column> = nt
        .table
        .columns()
        .iter()
        .filter(|c| c.name != IS_OVERDUE)
        .collect();
    let cells: Vec<Vec<String>> = columns.iter().map(|c| c.cells.to_strings()).collect();

    let mut wtr = csv_writer(path)?;
    wtr.write_record(columns.iter().map(|c| c.name.as_str()))
        .context(WritingCsvSnafu { path: p.clone() })?;
    for idx in 0..nt.len() {
        wtr.write_record(cells.iter().map(|col| col[idx].as_str()))
            .context(WritingCsvSnafu { path: p.clone() })?;
    }
    wtr.flush().context(WritingOutputSnafu { path: p })?;
    Ok(())
}

/// Writes the overdue report and one export per table in the given directory.
pub fn write_exports(
    dir: &Path,
    tables: &[NormalizedTable],
    summaries: &[Summary],
) -> TrackerResult<()> {
    fs::create_dir_all(dir).context(WritingOutputSnafu {
        path: dir.display().to_string(),
    })?;
    let num_overdue = write_overdue_report(&dir.join(OVERDUE_REPORT_FILE), summaries)?;
    for nt in tables.iter() {
        write_table(&dir.join(export_file_name(nt.kind)), nt)?;
    }
    info!(
        "write_exports: {:?}: {} overdue items, {} tables",
        dir,
        num_overdue,
        tables.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tracker_core::builder::TableBuilder;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("subtrack_{}_{}", std::process::id(), name))
    }

    fn tables() -> Vec<NormalizedTable> {
        let settings = Settings::at(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        let mut b = TableBuilder::from_strs(&["Submittal #", "Title", "Status", "Contractor", "Days Open"]);
        b.add_row_strs(&["S-1", "Rebar", "Open", "CRB", "20"]);
        b.add_row_strs(&["S-2", "Doors", "Open", "CRB", "40"]);
        b.add_row_strs(&["S-3", "Paint", "Approved", "CRB", "90"]);
        let subs = normalize(b.build(), RecordKind::Submittal, &settings);
        let mut b = TableBuilder::from_strs(&["RFI #", "Subject", "Status", "Contractor", "Days Open"]);
        b.add_row_strs(&["R-1", "Beam", "Open", "CRB", "11"]);
        let rfis = normalize(b.build(), RecordKind::Rfi, &settings);
        vec![subs, rfis]
    }

    #[test]
    fn exports() {
        let dir = temp_dir("exports");
        let tables = tables();
        let summaries: Vec<Summary> = tables.iter().map(Summary::compute).collect();
        write_exports(&dir, &tables, &summaries).unwrap();

        let report = fs::read_to_string(dir.join(OVERDUE_REPORT_FILE)).unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Item #,Description,Contractor,Ball in Court,Days Open",
                "S-2,Doors,CRB,Unknown,40",
                "S-1,Rebar,CRB,Unknown,20",
                "R-1,Beam,CRB,Unknown,11",
            ]
        );

        let subs = fs::read_to_string(dir.join("submittals_export.csv")).unwrap();
        let header = subs.lines().next().unwrap();
        assert!(header.starts_with("Submittal #,Title,Status,Contractor,Days Open"));
        assert!(!header.contains(IS_OVERDUE));
        assert_eq!(subs.lines().count(), 4);
        assert!(dir.join("rfis_export.csv").exists());
    }
}
