use chrono::NaiveDate;
use log::{debug, info};

use crate::config::*;
use crate::fields::*;
use crate::table::{Cells, Table};

/// Headers of source columns that already flag late items, lowercased.
const OVERDUE_FLAG_COLUMNS: &[&str] = &["is overdue", "overdue", "overdue?", "late", "is late", "past due"];

/// Values of such a column meaning "late", lowercased.
const OVERDUE_FLAG_VALUES: &[&str] = &["yes", "true", "1", "overdue", "y"];

/// The overdue flags provided by the source, if it has a column for them.
fn explicit_flags(table: &Table) -> Option<Vec<bool>> {
    let col = table
        .columns()
        .iter()
        .find(|c| OVERDUE_FLAG_COLUMNS.contains(&c.name.trim().to_lowercase().as_str()))?;
    debug!("explicit_flags: using column {:?}", col.name);
    let flags = match &col.cells {
        Cells::Text(v) => v
            .iter()
            .map(|s| OVERDUE_FLAG_VALUES.contains(&s.trim().to_lowercase().as_str()))
            .collect(),
        Cells::Flag(v) => v.clone(),
        Cells::Int(v) => v.iter().map(|x| *x == 1).collect(),
        Cells::Date(v) => vec![false; v.len()],
    };
    Some(flags)
}

/// Computes the overdue flag of every row.
///
/// An item is overdue if its status is open and at least one of these holds:
/// - the source flags it as overdue,
/// - it has been open for more than `threshold_days`,
/// - its due date is before `today`.
///
/// Missing columns simply do not contribute.
pub fn evaluate_overdue(
    table: &Table,
    threshold_days: i64,
    today: NaiveDate,
    statuses: &StatusBuckets,
) -> Vec<bool> {
    let flags = explicit_flags(table);
    let status = table.text(STATUS);
    let days = table.ints(DAYS_OPEN);
    let due = table.dates(DUE_DATE);
    let res: Vec<bool> = (0..table.len())
        .map(|idx| {
            let is_open = status
                .and_then(|v| v.get(idx))
                .map(|s| statuses.is_open(s))
                .unwrap_or(false);
            if !is_open {
                return false;
            }
            let flagged = flags
                .as_ref()
                .and_then(|v| v.get(idx).cloned())
                .unwrap_or(false);
            let too_old = days
                .and_then(|v| v.get(idx))
                .map(|d| *d > threshold_days)
                .unwrap_or(false);
            let past_due = due
                .and_then(|v| v.get(idx).cloned().flatten())
                .map(|d| d < today)
                .unwrap_or(false);
            flagged || too_old || past_due
        })
        .collect();
    info!(
        "evaluate_overdue: {} overdue items out of {} (threshold: {} days)",
        res.iter().filter(|x| **x).count(),
        res.len(),
        threshold_days
    );
    res
}

/// Adds (or replaces) the overdue column of a table.
pub fn apply_overdue(table: &mut Table, threshold_days: i64, today: NaiveDate, statuses: &StatusBuckets) {
    let flags = evaluate_overdue(table, threshold_days, today, statuses);
    table.set_column(IS_OVERDUE, Cells::Flag(flags));
}
