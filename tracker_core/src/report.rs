//! Filtering of normalized tables and the metrics computed over them.

use std::collections::BTreeMap;

use log::{debug, info};

use crate::config::*;
use crate::fields::*;
use crate::table::{NormalizedTable, Record};

/// A selection of contractors and disciplines.
///
/// An empty selection keeps everything. Disciplines only apply to RFIs.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RecordFilter {
    pub contractors: Vec<String>,
    pub disciplines: Vec<String>,
}

impl RecordFilter {
    pub fn is_empty(&self) -> bool {
        self.contractors.is_empty() && self.disciplines.is_empty()
    }

    fn keeps(selection: &[String], value: Option<&String>) -> bool {
        selection.is_empty() || value.map_or(false, |v| selection.iter().any(|s| s == v))
    }

    /// Returns the rows passing the filter. The status buckets and the substitutions
    /// are not recomputed.
    pub fn apply(&self, nt: &NormalizedTable) -> NormalizedTable {
        if self.is_empty() {
            return nt.clone();
        }
        let contractors = nt.table.text(CONTRACTOR);
        let disciplines = match nt.kind {
            RecordKind::Rfi => nt.table.text(DISCIPLINE),
            RecordKind::Submittal => None,
        };
        let table = nt.table.retain_rows(|idx| {
            RecordFilter::keeps(&self.contractors, contractors.and_then(|v| v.get(idx)))
                && (nt.kind != RecordKind::Rfi
                    || RecordFilter::keeps(&self.disciplines, disciplines.and_then(|v| v.get(idx))))
        });
        info!(
            "apply: {} filter kept {} rows out of {}",
            nt.kind,
            table.len(),
            nt.len()
        );
        NormalizedTable {
            kind: nt.kind,
            table,
            substitutions: nt.substitutions.clone(),
            statuses: nt.statuses.clone(),
        }
    }
}

/// One line of the overdue report.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct OverdueItem {
    pub kind: RecordKind,
    pub id: String,
    pub description: String,
    pub contractor: String,
    pub ball_in_court: String,
    pub days_open: i64,
}

impl OverdueItem {
    fn from_record(kind: RecordKind, r: &Record) -> OverdueItem {
        OverdueItem {
            kind,
            id: r.text(kind.id_field()),
            description: r.text(kind.description_field()),
            contractor: r.text(CONTRACTOR),
            ball_in_court: r.text(BALL_IN_COURT),
            days_open: r.get(DAYS_OPEN).and_then(|v| v.as_int()).unwrap_or(0),
        }
    }
}

/// The metrics of one normalized table.
#[derive(PartialEq, Debug, Clone)]
pub struct Summary {
    pub kind: RecordKind,
    pub total: usize,
    pub open: usize,
    pub closed: usize,
    pub overdue: usize,
    /// Open items per ball-in-court, by decreasing count then by name.
    pub open_by_ball_in_court: Vec<(String, usize)>,
    /// Mean age per contractor, oldest first, ties by name.
    pub avg_days_open_by_contractor: Vec<(String, f64)>,
    /// Overdue items, oldest first. Items of the same age keep the table order.
    pub overdue_items: Vec<OverdueItem>,
}

impl Summary {
    pub fn compute(nt: &NormalizedTable) -> Summary {
        let records = nt.records();
        let is_open = |r: &Record| nt.statuses.is_open(&r.text(STATUS));

        let open = records.iter().filter(|r| is_open(r)).count();
        let mut bic: BTreeMap<String, usize> = BTreeMap::new();
        for r in records.iter().filter(|r| is_open(r)) {
            *bic.entry(r.text(BALL_IN_COURT)).or_default() += 1;
        }
        let mut open_by_ball_in_court: Vec<(String, usize)> = bic.into_iter().collect();
        open_by_ball_in_court.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let mut ages: BTreeMap<String, (i64, usize)> = BTreeMap::new();
        for r in records.iter() {
            let e = ages.entry(r.text(CONTRACTOR)).or_default();
            e.0 += r.get(DAYS_OPEN).and_then(|v| v.as_int()).unwrap_or(0);
            e.1 += 1;
        }
        let mut avg_days_open_by_contractor: Vec<(String, f64)> = ages
            .into_iter()
            .map(|(c, (sum, n))| (c, sum as f64 / n as f64))
            .collect();
        avg_days_open_by_contractor
            .sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let mut overdue_items: Vec<OverdueItem> = records
            .iter()
            .filter(|r| r.get(IS_OVERDUE).and_then(|v| v.as_flag()).unwrap_or(false))
            .map(|r| OverdueItem::from_record(nt.kind, r))
            .collect();
        overdue_items.sort_by(|a, b| b.days_open.cmp(&a.days_open));

        let res = Summary {
            kind: nt.kind,
            total: records.len(),
            open,
            closed: records.len() - open,
            overdue: overdue_items.len(),
            open_by_ball_in_court,
            avg_days_open_by_contractor,
            overdue_items,
        };
        debug!("compute: {:?}", res);
        res
    }
}
