mod config;
use log::{debug, info};

pub mod builder;
pub mod columns;
pub mod derive;
pub mod fields;
pub mod manual;
pub mod organizations;
pub mod overdue;
pub mod report;
pub mod sample;
pub mod status;
pub mod table;

pub use crate::config::*;
pub use crate::table::{NormalizedTable, RawTable, Record, Table, Value};

use crate::columns::ColumnDictionary;
use crate::organizations::{NameResolver, OrganizationDirectory};

/// Turns a raw export into a normalized table.
///
/// Arguments:
/// * `raw` the table as read from the file, with its original headers
/// * `kind` whether the rows are submittals or RFIs
/// * `settings` the thresholds, the current date and the extra organization entries
///
/// This function does not fail: a missing column gets its default value, an unreadable
/// date is treated as absent, and a name that cannot be resolved becomes `Unknown`.
/// The input table is consumed and a new table is returned.
pub fn normalize(raw: RawTable, kind: RecordKind, settings: &Settings) -> NormalizedTable {
    info!(
        "normalize: {} {} rows, columns: {:?}, settings: {:?}",
        raw.num_rows(),
        kind,
        raw.columns,
        settings
    );
    let dict = ColumnDictionary::builtin(kind);
    let (mapped, substitutions) = columns::map_columns(raw, &dict);
    debug!("normalize: substitutions: {:?}", substitutions);

    let resolver = NameResolver::new(OrganizationDirectory::with_extra(&settings.organizations));
    let mut table = derive::derive_fields(&mapped, kind, settings, &resolver);
    let statuses = status::classify_table(&table);
    overdue::apply_overdue(
        &mut table,
        settings.threshold_days(kind),
        settings.today,
        &statuses,
    );

    NormalizedTable {
        kind,
        table,
        substitutions,
        statuses,
    }
}

#[cfg(test)]
mod tests {
    use super::builder::TableBuilder;
    use super::fields::*;
    use super::*;
    use chrono::NaiveDate;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn settings() -> Settings {
        Settings::at(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())
    }

    fn submittals() -> RawTable {
        let mut b = TableBuilder::from_strs(&[
            "Number",
            "Title",
            "Status",
            "Responsible Contractor",
            "Ball In Court",
            "Created At",
            "Closed Date",
        ]);
        b.add_row_strs(&["S-001", "Rebar shop drawings", "Open", "Bird Construction", "Trent Eklund", "2025-01-01", ""]);
        b.add_row_strs(&["S-002", "Curtain wall", "Approved", "Bird Construction", "Rachel Whitcombe", "2024-11-01", "2024-11-20"]);
        b.add_row_strs(&["S-003", "Lighting fixtures", "Pending Review", "Icon Electric", "", "2025-01-10", ""]);
        b.add_row_strs(&["S-004", "Doors", "Open", "Bird Construction", "Jane Doe (Acme Corp)", "not a date", ""]);
        b.build()
    }

    #[test]
    fn submittal_pipeline() {
        init();
        let res = normalize(submittals(), RecordKind::Submittal, &settings());
        assert_eq!(res.len(), 4);
        assert_eq!(res.kind, RecordKind::Submittal);
        assert_eq!(res.statuses.open, vec!["Open", "Pending Review"]);
        assert_eq!(res.statuses.closed, vec!["Approved"]);
        let t = &res.table;
        assert_eq!(
            t.text(SUBMITTAL_ID).unwrap(),
            &["S-001", "S-002", "S-003", "S-004"]
        );
        assert_eq!(t.ints(DAYS_OPEN).unwrap(), &[14, 19, 5, 0]);
        assert_eq!(
            t.text(BALL_IN_COURT).unwrap(),
            &["SMP", "CRB", "Unknown", "Acme Corp"]
        );
        assert_eq!(
            t.text(CONTRACTOR).unwrap(),
            &["Bird Construction", "Bird Construction", "Icon Electric", "Bird Construction"]
        );
        // 14 days is not more than the 14 days threshold.
        assert_eq!(t.flags(IS_OVERDUE).unwrap(), &[false, false, false, false]);
        assert_eq!(t.text(SPEC_SECTION).unwrap(), &["", "", "", ""]);
    }

    #[test]
    fn overdue_depends_on_threshold() {
        init();
        let mut s = settings();
        s.submittal_threshold_days = 7;
        let res = normalize(submittals(), RecordKind::Submittal, &s);
        assert_eq!(
            res.table.flags(IS_OVERDUE).unwrap(),
            &[true, false, false, false]
        );
    }

    #[test]
    fn rfi_pipeline_with_missing_columns() {
        init();
        let mut b = TableBuilder::from_strs(&["RFI Number", "Question", "Status", "Date Initiated", "Response Due"]);
        b.add_row_strs(&["R-1", "Beam size?", "Open", "2025-01-02", "2025-01-10"]);
        b.add_row_strs(&["R-2", "Slab edge?", "Answered", "2024-12-01", "2024-12-10"]);
        b.add_row_strs(&["R-3", "Grid line?", "Open", "2025-01-12", "2025-02-01"]);
        let res = normalize(b.build(), RecordKind::Rfi, &settings());
        let t = &res.table;
        assert_eq!(t.text(RFI_ID).unwrap(), &["R-1", "R-2", "R-3"]);
        assert_eq!(t.text(SUBJECT).unwrap(), &["Beam size?", "Slab edge?", "Grid line?"]);
        assert_eq!(t.text(DISCIPLINE).unwrap(), &["General", "General", "General"]);
        assert_eq!(t.text(PRIORITY).unwrap(), &["Medium", "Medium", "Medium"]);
        assert_eq!(t.text(CONTRACTOR).unwrap(), &["Unknown", "Unknown", "Unknown"]);
        // Past due date, closed, not yet due.
        assert_eq!(t.flags(IS_OVERDUE).unwrap(), &[true, false, false]);
        assert_eq!(res.substitutions.len(), 4);
    }

    #[test]
    fn extra_organizations_are_used() {
        init();
        let mut s = settings();
        s.organizations = vec![("Zed Quill".to_string(), "Quill Mechanical".to_string())];
        let mut b = TableBuilder::from_strs(&["Submittal #", "Status", "Ball in Court"]);
        b.add_row_strs(&["1", "Open", "Zed Quill"]);
        let res = normalize(b.build(), RecordKind::Submittal, &s);
        assert_eq!(res.table.text(BALL_IN_COURT).unwrap(), &["Quill Mechanical"]);
    }

    #[test]
    fn empty_table() {
        init();
        let raw = TableBuilder::from_strs(&["Status"]).build();
        let res = normalize(raw, RecordKind::Rfi, &settings());
        assert!(res.is_empty());
        assert!(res.statuses.open.is_empty());
        assert!(res.table.has_column(IS_OVERDUE));
    }

    #[test]
    fn invariants_hold_on_sample_data() {
        init();
        for kind in RecordKind::ALL {
            let res = normalize(sample::sample_table(kind), kind, &settings());
            let t = &res.table;
            assert!(!res.is_empty());
            assert!(t.ints(DAYS_OPEN).unwrap().iter().all(|d| *d >= 0));
            for name in [CONTRACTOR, BALL_IN_COURT] {
                assert!(t.text(name).unwrap().iter().all(|s| !s.trim().is_empty()));
            }
            let statuses = t.text(STATUS).unwrap();
            for (s, overdue) in statuses.iter().zip(t.flags(IS_OVERDUE).unwrap()) {
                assert!(res.statuses.is_open(s) ^ res.statuses.is_closed(s));
                if *overdue {
                    assert!(res.statuses.is_open(s));
                }
            }
        }
    }
}
