use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use log::{debug, info, warn};

use crate::config::*;
use crate::fields::*;
use crate::organizations::NameResolver;
use crate::table::{Cells, RawTable, Table};

/// How many values are looked at to decide if a contractor column holds organizations.
const CONTRACTOR_SAMPLE_SIZE: usize = 20;
/// How many values are looked at to decide if a ball-in-court column holds names.
const BALL_IN_COURT_SAMPLE_SIZE: usize = 10;

/// Fragments of headers of columns that hold the names of people.
const PERSON_COLUMN_HINTS: &[&str] = &[
    "ball in court",
    "assigned to",
    "responsible",
    "reviewer",
    "received from",
    "created by",
    "submitted by",
    "distributed to",
    "approver",
    "name",
];

/// The usual values of a ball-in-court column, when it holds roles and not people.
const BALL_IN_COURT_ROLES: &[&str] = &[
    "consultant",
    "contractor",
    "owner",
    "architect",
    "closed",
    "unknown",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
];

// Two-digit years come before four-digit years: `%Y` happily reads `25` as year 25.
// Dates before MIN_YEAR are rejected for the same reason.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%d-%b-%y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
];

const MIN_YEAR: i32 = 1900;

/// Parses a date as found in exports. Returns `None` for anything that does not look like
/// a date.
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let s = cell.trim();
    if s.is_empty() {
        return None;
    }
    let plausible = |d: &NaiveDate| d.year() >= MIN_YEAR;
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive()).filter(plausible);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|f| {
            NaiveDateTime::parse_from_str(s, f)
                .ok()
                .map(|dt| dt.date())
                .filter(plausible)
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok().filter(plausible))
        })
}

/// Reads a day count. Anything that is not a number counts as 0, and so do negative counts.
pub fn parse_days(cell: &str) -> i64 {
    let s = cell.trim();
    let x = match s.parse::<i64>() {
        Ok(x) => x,
        Err(_) => match s.parse::<f64>() {
            Ok(f) if f.is_finite() => f.trunc() as i64,
            _ => 0,
        },
    };
    x.max(0)
}

/// Builds the typed table from a table with canonical column names.
///
/// The steps run in order:
/// 1. the date columns are parsed,
/// 2. the contractor column is kept, derived from a column of names, or defaulted,
/// 3. the age of each item is read or computed,
/// 4. the missing required columns are added with their default values,
/// 5. a ball-in-court column holding names is turned into organizations.
///
/// At the end, no contractor and no ball-in-court cell is empty.
pub fn derive_fields(
    raw: &RawTable,
    kind: RecordKind,
    settings: &Settings,
    resolver: &NameResolver,
) -> Table {
    let mut table = Table::from_raw(raw);
    parse_date_columns(&mut table);
    derive_contractor(&mut table, resolver);
    derive_days_open(&mut table, settings.today);
    fill_defaults(&mut table, kind);
    normalize_ball_in_court(&mut table, resolver);
    fill_blanks(&mut table, &[CONTRACTOR, BALL_IN_COURT], UNKNOWN);
    info!(
        "derive_fields: {} {} rows, columns: {:?}",
        table.len(),
        kind,
        table.column_names()
    );
    table
}

fn parse_date_columns(table: &mut Table) {
    for name in DATE_FIELDS {
        if let Some(cells) = table.text(name) {
            let dates: Vec<Option<NaiveDate>> = cells.iter().map(|c| parse_date(c)).collect();
            let unparsed = cells
                .iter()
                .zip(dates.iter())
                .filter(|(c, d)| !c.trim().is_empty() && d.is_none())
                .count();
            if unparsed > 0 {
                warn!(
                    "parse_date_columns: {}: {} cells could not be read as dates",
                    name, unparsed
                );
            }
            table.set_column(name, Cells::Date(dates));
        }
    }
}

fn sample(values: &[String], size: usize) -> Vec<&str> {
    values
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(size)
        .collect()
}

/// True if some of the first values of the column mention a known organization.
fn holds_organizations(values: &[String], tokens: &BTreeSet<String>) -> bool {
    sample(values, CONTRACTOR_SAMPLE_SIZE).iter().any(|v| {
        let v = v.to_lowercase();
        tokens.iter().any(|t| v.contains(t.as_str()))
    })
}

/// The first column, in table order, that holds the names of people.
fn find_person_column(table: &Table) -> Option<String> {
    table
        .columns()
        .iter()
        .filter(|c| c.name != CONTRACTOR && matches!(c.cells, Cells::Text(_)))
        .find(|c| {
            let label = c.name.to_lowercase();
            PERSON_COLUMN_HINTS.iter().any(|h| label.contains(h))
        })
        .map(|c| c.name.clone())
}

fn resolve_all(values: &[String], resolver: &NameResolver) -> Vec<String> {
    let mut cache: HashMap<&str, String> = HashMap::new();
    values
        .iter()
        .map(|v| {
            cache
                .entry(v.as_str())
                .or_insert_with(|| resolver.resolve(v))
                .clone()
        })
        .collect()
}

fn derive_contractor(table: &mut Table, resolver: &NameResolver) {
    let tokens = resolver.directory().organization_tokens();
    if let Some(values) = table.text(CONTRACTOR) {
        if holds_organizations(values, &tokens) {
            debug!("derive_contractor: keeping the contractor column");
            return;
        }
    }
    let contractors = match find_person_column(table) {
        Some(name) => {
            info!("derive_contractor: resolving organizations from column {:?}", name);
            table
                .text(&name)
                .map(|v| resolve_all(v, resolver))
                .unwrap_or_default()
        }
        None => {
            warn!("derive_contractor: no column to find contractors, using {:?}", UNKNOWN);
            vec![UNKNOWN.to_string(); table.len()]
        }
    };
    table.set_column(CONTRACTOR, Cells::Text(contractors));
}

fn derive_days_open(table: &mut Table, today: NaiveDate) {
    let days: Vec<i64> = if let Some(values) = table.text(DAYS_OPEN) {
        debug!("derive_days_open: using the source column");
        values.iter().map(|v| parse_days(v)).collect()
    } else if let Some(created) = table.dates(DATE_CREATED) {
        let closed: Vec<Option<NaiveDate>> = table
            .dates(DATE_CLOSED)
            .map(|v| v.to_vec())
            .unwrap_or_else(|| vec![None; created.len()]);
        created
            .iter()
            .zip(closed.iter())
            .map(|(c, cl)| match c {
                Some(c) => (cl.unwrap_or(today) - *c).num_days().max(0),
                None => 0,
            })
            .collect()
    } else {
        warn!("derive_days_open: no creation date, all the ages are 0");
        vec![0; table.len()]
    };
    table.set_column(DAYS_OPEN, Cells::Int(days));
}

/// The value given to each required column when the source does not have it.
pub fn required_defaults(kind: RecordKind) -> Vec<(&'static str, &'static str)> {
    let mut res = vec![
        (kind.id_field(), ""),
        (STATUS, "Open"),
        (CONTRACTOR, UNKNOWN),
        (BALL_IN_COURT, UNKNOWN),
    ];
    match kind {
        RecordKind::Submittal => res.extend([(TITLE, ""), (SPEC_SECTION, ""), (REVIEWER, "")]),
        RecordKind::Rfi => res.extend([
            (SUBJECT, ""),
            (DISCIPLINE, "General"),
            (PRIORITY, "Medium"),
            (COST_IMPACT, "None"),
            (SCHEDULE_IMPACT, "No"),
        ]),
    }
    res
}

fn fill_defaults(table: &mut Table, kind: RecordKind) {
    for (name, default) in required_defaults(kind) {
        if !table.has_column(name) {
            debug!("fill_defaults: adding {:?} = {:?}", name, default);
            table.set_column(name, Cells::Text(vec![default.to_string(); table.len()]));
        }
    }
}

fn normalize_ball_in_court(table: &mut Table, resolver: &NameResolver) {
    let resolved = match table.text(BALL_IN_COURT) {
        Some(values) => {
            let s = sample(values, BALL_IN_COURT_SAMPLE_SIZE);
            let has_roles = s
                .iter()
                .any(|v| BALL_IN_COURT_ROLES.contains(&v.to_lowercase().as_str()));
            if s.is_empty() || has_roles {
                return;
            }
            info!("normalize_ball_in_court: the column holds names, resolving organizations");
            resolve_all(values, resolver)
        }
        None => return,
    };
    table.set_column(BALL_IN_COURT, Cells::Text(resolved));
}

fn fill_blanks(table: &mut Table, names: &[&str], default: &str) {
    for name in names {
        if let Some(values) = table.text(name) {
            if values.iter().any(|v| v.trim().is_empty()) {
                let filled: Vec<String> = values
                    .iter()
                    .map(|v| {
                        if v.trim().is_empty() {
                            default.to_string()
                        } else {
                            v.clone()
                        }
                    })
                    .collect();
                table.set_column(name, Cells::Text(filled));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn table(cols: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            cols.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    fn derive(raw: &RawTable, kind: RecordKind) -> Table {
        derive_fields(raw, kind, &Settings::at(today()), &NameResolver::default())
    }

    #[test]
    fn dates() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 7);
        assert_eq!(parse_date("2025-03-07"), d);
        assert_eq!(parse_date(" 03/07/2025 "), d);
        assert_eq!(parse_date("03/07/25"), d);
        assert_eq!(parse_date("2025-03-07 13:45:00"), d);
        assert_eq!(parse_date("2025-03-07T13:45:00Z"), d);
        assert_eq!(parse_date("Mar 07, 2025"), d);
        assert_eq!(parse_date("07-Mar-2025"), d);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("TBD"), None);
        assert_eq!(parse_date("2025-13-45"), None);
    }

    #[test]
    fn days() {
        assert_eq!(parse_days("12"), 12);
        assert_eq!(parse_days(" 12.0 "), 12);
        assert_eq!(parse_days("n/a"), 0);
        assert_eq!(parse_days(""), 0);
        assert_eq!(parse_days("-4"), 0);
    }

    #[test]
    fn days_open_from_creation_date() {
        let raw = table(&["Date Created"], &[&["2025-01-01"]]);
        let t = derive(&raw, RecordKind::Submittal);
        assert_eq!(t.ints(DAYS_OPEN), Some(&[14][..]));
    }

    #[test]
    fn days_open_uses_close_date_and_is_never_negative() {
        let raw = table(
            &["Date Created", "Date Closed"],
            &[
                &["2025-01-01", "2025-01-05"],
                &["2025-01-10", "2025-01-02"],
                &["garbage", ""],
                &["2025-02-01", ""],
            ],
        );
        let t = derive(&raw, RecordKind::Rfi);
        assert_eq!(t.ints(DAYS_OPEN), Some(&[4, 0, 0, 0][..]));
    }

    #[test]
    fn days_open_from_source_column() {
        let raw = table(
            &["Date Created", "Days Open"],
            &[&["2024-01-01", "3"], &["2024-01-01", "soon"]],
        );
        let t = derive(&raw, RecordKind::Submittal);
        assert_eq!(t.ints(DAYS_OPEN), Some(&[3, 0][..]));
    }

    #[test]
    fn no_creation_date_means_zero_days() {
        let raw = table(&["Status"], &[&["Open"], &["Closed"]]);
        let t = derive(&raw, RecordKind::Rfi);
        assert_eq!(t.ints(DAYS_OPEN), Some(&[0, 0][..]));
    }

    #[test]
    fn unparseable_dates_are_missing() {
        let raw = table(&["Due Date"], &[&["2025-01-20"], &["ASAP"]]);
        let t = derive(&raw, RecordKind::Rfi);
        assert_eq!(
            t.dates(DUE_DATE),
            Some(&[NaiveDate::from_ymd_opt(2025, 1, 20), None][..])
        );
    }

    #[test]
    fn contractor_from_ball_in_court_names() {
        let raw = table(&["Ball in Court"], &[&["Trent Eklund"], &["Nobody Known"]]);
        let t = derive(&raw, RecordKind::Submittal);
        let contractors = t.text(CONTRACTOR).unwrap();
        assert_eq!(contractors[0], "SMP");
        assert_eq!(contractors[1], "Unknown");
        // The names are also turned into organizations in the ball in court.
        assert_eq!(t.text(BALL_IN_COURT).unwrap()[0], "SMP");
    }

    #[test]
    fn known_contractor_column_is_kept() {
        let raw = table(
            &["Contractor", "Assigned To"],
            &[&["SMP Engineering"], &["Local Plumbing Ltd", "Trent Eklund"]],
        );
        let t = derive(&raw, RecordKind::Submittal);
        assert_eq!(
            t.text(CONTRACTOR).unwrap(),
            &["SMP Engineering".to_string(), "Local Plumbing Ltd".to_string()][..]
        );
    }

    #[test]
    fn unknown_contractor_column_is_derived_from_names() {
        let raw = table(
            &["Contractor", "Reviewer"],
            &[&["Jane", "Rachel Whitcombe"], &["Bob", "Kendra Mills"]],
        );
        let t = derive(&raw, RecordKind::Submittal);
        assert_eq!(
            t.text(CONTRACTOR).unwrap(),
            &["CRB".to_string(), "Bird Construction".to_string()][..]
        );
    }

    #[test]
    fn role_names_in_contractor_column_are_not_organizations() {
        let raw = table(
            &["Contractor", "Reviewer"],
            &[&["Owner Rep", "Rachel Whitcombe"], &["Owner", "Kendra Mills"]],
        );
        let t = derive(&raw, RecordKind::Submittal);
        assert_eq!(
            t.text(CONTRACTOR).unwrap(),
            &["CRB".to_string(), "Bird Construction".to_string()][..]
        );
    }

    #[test]
    fn contractor_defaults_to_unknown() {
        let raw = table(&["Status"], &[&["Open"]]);
        let t = derive(&raw, RecordKind::Rfi);
        assert_eq!(t.text(CONTRACTOR).unwrap(), &["Unknown".to_string()][..]);
    }

    #[test]
    fn rfi_defaults() {
        let raw = table(&["RFI #"], &[&["RFI-1"]]);
        let t = derive(&raw, RecordKind::Rfi);
        let r = t.record(0).unwrap();
        assert_eq!(r.get(DISCIPLINE), Some(&Value::Text("General".to_string())));
        assert_eq!(r.text(PRIORITY), "Medium");
        assert_eq!(r.text(COST_IMPACT), "None");
        assert_eq!(r.text(SCHEDULE_IMPACT), "No");
        assert_eq!(r.text(SUBJECT), "");
        assert_eq!(r.text(STATUS), "Open");
        assert_eq!(r.text(BALL_IN_COURT), "Unknown");
        assert!(r.get(TITLE).is_none());
    }

    #[test]
    fn submittal_defaults() {
        let raw = table(&["Status"], &[&["Approved"]]);
        let t = derive(&raw, RecordKind::Submittal);
        for name in [SUBMITTAL_ID, TITLE, SPEC_SECTION, REVIEWER] {
            assert_eq!(t.text(name), Some(&["".to_string()][..]), "{}", name);
        }
        assert!(!t.has_column(DISCIPLINE));
    }

    #[test]
    fn ball_in_court_roles_are_kept() {
        let raw = table(
            &["Ball in Court", "Contractor"],
            &[&["Consultant", "CRB"], &["Trent Eklund", "CRB"], &["", "CRB"]],
        );
        let t = derive(&raw, RecordKind::Rfi);
        assert_eq!(
            t.text(BALL_IN_COURT).unwrap(),
            &[
                "Consultant".to_string(),
                "Trent Eklund".to_string(),
                "Unknown".to_string()
            ][..]
        );
    }

    #[test]
    fn blank_ball_in_court_is_a_missing_value() {
        let raw = table(
            &["Ball in Court", "Contractor"],
            &[&["", "CRB"], &["Trent Eklund", "CRB"]],
        );
        let t = derive(&raw, RecordKind::Submittal);
        assert_eq!(
            t.text(BALL_IN_COURT).unwrap(),
            &["Unknown".to_string(), "SMP".to_string()][..]
        );
    }

    #[test]
    fn ball_in_court_sample_is_the_first_values() {
        let name: &[&str] = &["Trent Eklund"];
        let mut rows = vec![name; 10];
        rows.push(&["Owner"]);
        let raw = table(&["Ball in Court"], &rows);
        let t = derive(&raw, RecordKind::Submittal);
        let bic = t.text(BALL_IN_COURT).unwrap();
        assert_eq!(bic[0], "SMP");
        assert_eq!(bic.len(), 11);
    }
}
