use std::collections::{HashMap, HashSet};

use log::{debug, info};

use crate::config::*;
use crate::fields::*;
use crate::table::{free_label, RawTable};

// Header variations found in the exports, lowercased, and the canonical column they
// correspond to. Every canonical name also maps to itself.

const SUBMITTAL_COLUMNS: &[(&str, &str)] = &[
    ("submittal #", SUBMITTAL_ID),
    ("number", SUBMITTAL_ID),
    ("#", SUBMITTAL_ID),
    ("submittal number", SUBMITTAL_ID),
    ("submittal no", SUBMITTAL_ID),
    ("submittal no.", SUBMITTAL_ID),
    ("no.", SUBMITTAL_ID),
    ("title", TITLE),
    ("subject", TITLE),
    ("description", TITLE),
    ("submittal title", TITLE),
    ("spec section", SPEC_SECTION),
    ("specification section", SPEC_SECTION),
    ("spec #", SPEC_SECTION),
    ("spec no", SPEC_SECTION),
    ("csi code", SPEC_SECTION),
    ("contractor", CONTRACTOR),
    ("responsible contractor", CONTRACTOR),
    ("subcontractor", CONTRACTOR),
    ("sub", CONTRACTOR),
    ("trade", CONTRACTOR),
    ("company", CONTRACTOR),
    ("received from", CONTRACTOR),
    ("status", STATUS),
    ("submittal status", STATUS),
    ("current status", STATUS),
    ("ball in court", BALL_IN_COURT),
    ("responsible", BALL_IN_COURT),
    ("assigned to", BALL_IN_COURT),
    ("date created", DATE_CREATED),
    ("submitted on", DATE_CREATED),
    ("created date", DATE_CREATED),
    ("date submitted", DATE_CREATED),
    ("created at", DATE_CREATED),
    ("submit by", DATE_CREATED),
    ("received date", DATE_CREATED),
    ("due date", DUE_DATE),
    ("required date", DUE_DATE),
    ("response due", DUE_DATE),
    ("needed by", DUE_DATE),
    ("date closed", DATE_CLOSED),
    ("date returned", DATE_CLOSED),
    ("closed date", DATE_CLOSED),
    ("completed date", DATE_CLOSED),
    ("date completed", DATE_CLOSED),
    ("returned date", DATE_CLOSED),
    ("closed on", DATE_CLOSED),
    ("reviewer", REVIEWER),
    ("approver", REVIEWER),
    ("reviewed by", REVIEWER),
    ("days open", DAYS_OPEN),
    ("lead time", LEAD_TIME),
    ("lead time (days)", LEAD_TIME),
];

const RFI_COLUMNS: &[(&str, &str)] = &[
    ("rfi #", RFI_ID),
    ("number", RFI_ID),
    ("#", RFI_ID),
    ("rfi number", RFI_ID),
    ("rfi no", RFI_ID),
    ("rfi no.", RFI_ID),
    ("no.", RFI_ID),
    ("subject", SUBJECT),
    ("description", SUBJECT),
    ("question", SUBJECT),
    ("rfi title", SUBJECT),
    ("title", SUBJECT),
    ("discipline", DISCIPLINE),
    ("category", DISCIPLINE),
    ("trade", DISCIPLINE),
    ("contractor", CONTRACTOR),
    ("responsible contractor", CONTRACTOR),
    ("subcontractor", CONTRACTOR),
    ("sub", CONTRACTOR),
    ("company", CONTRACTOR),
    ("initiated by", CONTRACTOR),
    ("from", CONTRACTOR),
    ("created by", CONTRACTOR),
    ("status", STATUS),
    ("rfi status", STATUS),
    ("current status", STATUS),
    ("priority", PRIORITY),
    ("importance", PRIORITY),
    ("ball in court", BALL_IN_COURT),
    ("responsible", BALL_IN_COURT),
    ("assigned to", BALL_IN_COURT),
    ("rfi manager", BALL_IN_COURT),
    ("date created", DATE_CREATED),
    ("date initiated", DATE_CREATED),
    ("created date", DATE_CREATED),
    ("created at", DATE_CREATED),
    ("sent date", DATE_CREATED),
    ("due date", DUE_DATE),
    ("response due", DUE_DATE),
    ("required date", DUE_DATE),
    ("date closed", DATE_CLOSED),
    ("closed date", DATE_CLOSED),
    ("date answered", DATE_CLOSED),
    ("answered date", DATE_CLOSED),
    ("completed date", DATE_CLOSED),
    ("cost impact", COST_IMPACT),
    ("cost code", COST_IMPACT),
    ("schedule impact", SCHEDULE_IMPACT),
    ("days open", DAYS_OPEN),
];

/// A lookup table from source header to canonical column name.
#[derive(Debug, Clone)]
pub struct ColumnDictionary {
    entries: HashMap<String, String>,
}

impl ColumnDictionary {
    /// The built-in dictionary for a record kind.
    pub fn builtin(kind: RecordKind) -> ColumnDictionary {
        let entries = match kind {
            RecordKind::Submittal => SUBMITTAL_COLUMNS,
            RecordKind::Rfi => RFI_COLUMNS,
        };
        ColumnDictionary::from_entries(entries)
    }

    pub fn from_entries(entries: &[(&str, &str)]) -> ColumnDictionary {
        ColumnDictionary {
            entries: entries
                .iter()
                .map(|(k, v)| (normalize_label(k), v.to_string()))
                .collect(),
        }
    }

    /// The canonical name for a source label, if any. The label is trimmed and
    /// lowercased before the lookup.
    pub fn lookup(&self, label: &str) -> Option<&str> {
        self.entries.get(&normalize_label(label)).map(|s| s.as_str())
    }
}

fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Renames the columns of a table to their canonical names.
///
/// A canonical name is given to at most one column:
/// - the first column already carrying the exact canonical name keeps it,
/// - otherwise the first column in source order that maps to a name gets it,
/// - the later columns mapping to a name already given keep their source label.
///
/// Unknown columns pass through unchanged. A label kept as is that collides with another
/// column gets a numeric suffix, so the output labels are unique. Returns the renamed
/// table and the renamings that were applied.
pub fn map_columns(raw: RawTable, dict: &ColumnDictionary) -> (RawTable, Vec<ColumnSubstitution>) {
    let targets: Vec<Option<&str>> = raw.columns.iter().map(|c| dict.lookup(c)).collect();

    // Columns already named canonically claim their name first.
    let mut taken: HashSet<String> = HashSet::new();
    let claims: Vec<bool> = raw
        .columns
        .iter()
        .zip(targets.iter())
        .map(|(label, target)| match target {
            Some(t) if *t == label.as_str() => taken.insert(label.clone()),
            _ => false,
        })
        .collect();

    let mut substitutions: Vec<ColumnSubstitution> = Vec::new();
    // None for the columns keeping their source label.
    let mut assigned: Vec<Option<String>> = Vec::with_capacity(raw.columns.len());
    for ((label, target), claimed) in raw.columns.iter().zip(targets.iter()).zip(claims) {
        match target {
            _ if claimed => {
                assigned.push(Some(label.clone()));
            }
            Some(t) if !taken.contains(*t) => {
                debug!("map_columns: {:?} -> {:?}", label, t);
                taken.insert(t.to_string());
                substitutions.push(ColumnSubstitution {
                    source: label.clone(),
                    canonical: t.to_string(),
                });
                assigned.push(Some(t.to_string()));
            }
            Some(t) => {
                debug!(
                    "map_columns: {:?} also maps to {:?} which is already used, keeping it as is",
                    label, t
                );
                assigned.push(None);
            }
            None => {
                debug!("map_columns: no mapping for {:?}", label);
                assigned.push(None);
            }
        }
    }

    let mut used: HashSet<String> = assigned.iter().flatten().cloned().collect();
    let columns: Vec<String> = raw
        .columns
        .iter()
        .zip(assigned)
        .map(|(label, name)| match name {
            Some(n) => n,
            None => {
                let n = free_label(label, |x| used.contains(x));
                if &n != label {
                    debug!("map_columns: {:?} is already used, renamed to {:?}", label, n);
                }
                used.insert(n.clone());
                n
            }
        })
        .collect();
    info!(
        "map_columns: {} columns, {} renamed",
        columns.len(),
        substitutions.len()
    );
    (
        RawTable {
            columns,
            rows: raw.rows,
        },
        substitutions,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(cols: &[&str]) -> RawTable {
        RawTable::new(
            cols.iter().map(|s| s.to_string()).collect(),
            vec![cols.iter().map(|s| format!("v {}", s)).collect()],
        )
    }

    #[test]
    fn renames_case_insensitive() {
        let dict = ColumnDictionary::builtin(RecordKind::Submittal);
        let (t, subs) = map_columns(
            raw(&["  NUMBER ", "Submitted On", "Weird Column"]),
            &dict,
        );
        assert_eq!(t.columns, vec!["Submittal #", "Date Created", "Weird Column"]);
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].source, "NUMBER");
        assert_eq!(subs[0].canonical, "Submittal #");
        // The cells do not move.
        assert_eq!(t.rows[0][2], "v Weird Column");
    }

    #[test]
    fn first_mapping_wins() {
        let dict = ColumnDictionary::builtin(RecordKind::Submittal);
        let (t, subs) = map_columns(raw(&["Subject", "Description"]), &dict);
        assert_eq!(t.columns, vec!["Title", "Description"]);
        assert_eq!(subs.len(), 1);
    }

    #[test]
    fn exact_canonical_name_is_kept() {
        let dict = ColumnDictionary::builtin(RecordKind::Submittal);
        let (t, subs) = map_columns(raw(&["Number", "Submittal #"]), &dict);
        assert_eq!(t.columns, vec!["Number", "Submittal #"]);
        assert!(subs.is_empty());
    }

    #[test]
    fn repeated_headers_give_unique_columns() {
        let dict = ColumnDictionary::builtin(RecordKind::Submittal);
        let t = RawTable {
            columns: vec!["Status".to_string(), "Status".to_string(), "status".to_string()],
            rows: vec![vec!["Open".to_string(), "Closed".to_string(), "Void".to_string()]],
        };
        let (t, subs) = map_columns(t, &dict);
        assert_eq!(t.columns, vec!["Status", "Status.1", "status"]);
        assert!(subs.is_empty());
        assert_eq!(t.rows[0][0], "Open");

        // Through the table boundary, repeated headers are already suffixed.
        let (t, _) = map_columns(raw(&["Status", "Status", "Current Status", "Number"]), &dict);
        assert_eq!(t.columns, vec!["Status", "Status.1", "Current Status", "Submittal #"]);
        let unique: HashSet<&String> = t.columns.iter().collect();
        assert_eq!(unique.len(), t.columns.len());
        let (again, subs) = map_columns(t.clone(), &dict);
        assert_eq!(again, t);
        assert!(subs.is_empty());
    }

    #[test]
    fn kinds_have_their_own_dictionary() {
        let sub = ColumnDictionary::builtin(RecordKind::Submittal);
        let rfi = ColumnDictionary::builtin(RecordKind::Rfi);
        assert_eq!(sub.lookup("Trade"), Some(CONTRACTOR));
        assert_eq!(rfi.lookup("Trade"), Some(DISCIPLINE));
        assert_eq!(rfi.lookup("Title"), Some(SUBJECT));
        assert_eq!(rfi.lookup("Question"), Some(SUBJECT));
        assert_eq!(sub.lookup("Question"), None);
    }

    #[test]
    fn mapping_is_idempotent() {
        let dict = ColumnDictionary::builtin(RecordKind::Rfi);
        let (t1, _) = map_columns(
            raw(&["Number", "RFI #", "Title", "Question", "From", "Sent Date", "Zone"]),
            &dict,
        );
        let (t2, subs2) = map_columns(t1.clone(), &dict);
        assert_eq!(t1, t2);
        assert!(subs2.is_empty());
        let unique: HashSet<&String> = t2.columns.iter().collect();
        assert_eq!(unique.len(), t2.columns.len());
    }

    #[test]
    fn every_canonical_name_maps_to_itself() {
        for kind in RecordKind::ALL {
            let entries = match kind {
                RecordKind::Submittal => SUBMITTAL_COLUMNS,
                RecordKind::Rfi => RFI_COLUMNS,
            };
            let dict = ColumnDictionary::builtin(kind);
            for (_, canonical) in entries {
                assert_eq!(dict.lookup(canonical), Some(*canonical), "{:?}", kind);
            }
        }
    }
}
