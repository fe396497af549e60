use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use log::{debug, info};

use crate::config::*;
use crate::fields;
use crate::table::Table;

/// Statuses meaning that nobody needs to act on the item anymore, lowercased.
const CLOSED_STATUSES: &[&str] = &[
    "approved",
    "approved as noted",
    "approved as submitted",
    "no exceptions taken",
    "make corrections noted",
    "for record only",
    "reviewed",
    "rejected",
    "closed",
    "void",
    "voided",
    "cancelled",
    "canceled",
    "complete",
    "completed",
    "answered",
    "responded",
    "returned",
    "distributed",
];

/// Statuses of items still waiting on someone, lowercased.
const OPEN_STATUSES: &[&str] = &[
    "open",
    "pending",
    "pending review",
    "pending response",
    "revise & resubmit",
    "revise and resubmit",
    "resubmit",
    "draft",
    "submitted",
    "in review",
    "under review",
    "in progress",
    "awaiting response",
    "requested",
    "overdue",
];

/// Above this share of rows with a close date, an unknown status counts as closed.
pub const CLOSED_DATE_RATIO: f64 = 0.7;

/// The ways of classifying a status, tried in order.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum StatusStrategy {
    ClosedKeyword,
    OpenKeyword,
    /// Most of the items with this status have a close date.
    CloseDateRatio,
    /// Everything else is open.
    DefaultOpen,
}

impl StatusStrategy {
    pub const CHAIN: [StatusStrategy; 4] = [
        StatusStrategy::ClosedKeyword,
        StatusStrategy::OpenKeyword,
        StatusStrategy::CloseDateRatio,
        StatusStrategy::DefaultOpen,
    ];
}

/// Facts about the rows carrying one status.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct StatusEvidence {
    pub rows: usize,
    /// `None` when the table has no close date column.
    pub rows_with_close_date: Option<usize>,
}

impl StatusStrategy {
    pub fn apply(&self, status: &str, evidence: &StatusEvidence) -> Option<Bucket> {
        let key = status.trim().to_lowercase();
        match self {
            StatusStrategy::ClosedKeyword if CLOSED_STATUSES.contains(&key.as_str()) => {
                Some(Bucket::Closed)
            }
            StatusStrategy::OpenKeyword if OPEN_STATUSES.contains(&key.as_str()) => {
                Some(Bucket::Open)
            }
            StatusStrategy::CloseDateRatio => match evidence.rows_with_close_date {
                Some(closed) if evidence.rows > 0 => {
                    let ratio = closed as f64 / evidence.rows as f64;
                    if ratio > CLOSED_DATE_RATIO {
                        Some(Bucket::Closed)
                    } else {
                        Some(Bucket::Open)
                    }
                }
                _ => None,
            },
            StatusStrategy::DefaultOpen => Some(Bucket::Open),
            _ => None,
        }
    }
}

/// Classifies one status. Always returns a bucket.
pub fn classify_status(status: &str, evidence: &StatusEvidence) -> Bucket {
    StatusStrategy::CHAIN
        .iter()
        .find_map(|s| s.apply(status, evidence).map(|b| (*s, b)))
        .map(|(s, b)| {
            debug!("classify_status: {:?} -> {:?} ({:?})", status, b, s);
            b
        })
        .unwrap_or(Bucket::Open)
}

/// Splits the distinct statuses of the given rows between open and closed.
///
/// `close_dates`, when provided, is aligned with `statuses`.
pub fn classify_statuses(
    statuses: &[String],
    close_dates: Option<&[Option<NaiveDate>]>,
) -> StatusBuckets {
    let mut evidence: BTreeMap<&str, StatusEvidence> = BTreeMap::new();
    for (idx, s) in statuses.iter().enumerate() {
        let e = evidence.entry(s.as_str()).or_default();
        e.rows += 1;
        if let Some(dates) = close_dates {
            let has_date = dates.get(idx).map(|d| d.is_some()).unwrap_or(false);
            e.rows_with_close_date = Some(e.rows_with_close_date.unwrap_or(0) + has_date as usize);
        }
    }

    let mut open: BTreeSet<String> = BTreeSet::new();
    let mut closed: BTreeSet<String> = BTreeSet::new();
    for (status, e) in evidence.iter() {
        match classify_status(status, e) {
            Bucket::Open => open.insert(status.to_string()),
            Bucket::Closed => closed.insert(status.to_string()),
        };
    }
    StatusBuckets {
        open: open.into_iter().collect(),
        closed: closed.into_iter().collect(),
    }
}

/// Classifies the statuses found in a derived table.
pub fn classify_table(table: &Table) -> StatusBuckets {
    let statuses: Vec<String> = table
        .text(fields::STATUS)
        .map(|v| v.to_vec())
        .unwrap_or_default();
    let res = classify_statuses(&statuses, table.dates(fields::DATE_CLOSED));
    info!(
        "classify_table: open statuses: {:?} closed statuses: {:?}",
        res.open, res.closed
    );
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(l: &[&str]) -> Vec<String> {
        l.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn keywords_without_close_date() {
        let b = classify_statuses(&strs(&["Approved", "Open", "Pending Review"]), None);
        assert_eq!(b.open, strs(&["Open", "Pending Review"]));
        assert_eq!(b.closed, strs(&["Approved"]));
    }

    #[test]
    fn keywords_ignore_case_and_spaces() {
        let b = classify_statuses(&strs(&[" APPROVED AS NOTED", "revise & resubmit "]), None);
        assert_eq!(b.open, strs(&["revise & resubmit "]));
        assert_eq!(b.closed, strs(&[" APPROVED AS NOTED"]));
    }

    #[test]
    fn unknown_status_without_close_date_is_open() {
        let b = classify_statuses(&strs(&["With Architect", "With Architect"]), None);
        assert_eq!(b.open, strs(&["With Architect"]));
        assert!(b.closed.is_empty());
    }

    #[test]
    fn unknown_status_uses_close_dates() {
        let d = NaiveDate::from_ymd_opt(2025, 2, 1);
        let statuses = strs(&["Filed", "Filed", "Filed", "Filed", "Routing", "Routing"]);
        let dates = vec![d, d, d, d, d, None];
        let b = classify_statuses(&statuses, Some(dates.as_slice()));
        assert_eq!(b.closed, strs(&["Filed"]));
        assert_eq!(b.open, strs(&["Routing"]));
    }

    #[test]
    fn ratio_must_exceed_threshold() {
        // 7 out of 10 is not more than 70%.
        let d = NaiveDate::from_ymd_opt(2025, 2, 1);
        let statuses: Vec<String> = (0..10).map(|_| "Filed".to_string()).collect();
        let dates: Vec<Option<NaiveDate>> = (0..10).map(|i| if i < 7 { d } else { None }).collect();
        let b = classify_statuses(&statuses, Some(dates.as_slice()));
        assert_eq!(b.open, strs(&["Filed"]));
    }

    #[test]
    fn keywords_beat_close_dates() {
        let statuses = strs(&["Open", "Open"]);
        let d = NaiveDate::from_ymd_opt(2025, 2, 1);
        let b = classify_statuses(&statuses, Some(&[d, d][..]));
        assert_eq!(b.open, strs(&["Open"]));
    }

    #[test]
    fn buckets_partition_statuses() {
        let statuses = strs(&["Open", "Closed", "", "Mystery", "Void", "Open"]);
        let b = classify_statuses(&statuses, None);
        let mut all: Vec<String> = b.open.iter().chain(b.closed.iter()).cloned().collect();
        all.sort();
        let mut distinct = statuses.clone();
        distinct.sort();
        distinct.dedup();
        assert_eq!(all, distinct);
        assert!(b.open.iter().all(|s| !b.closed.contains(s)));
    }
}
