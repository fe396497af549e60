//! Canonical column names.
//!
//! These names are the contract with everything downstream of the pipeline (exports,
//! summaries, dashboards): they must not change.

pub const SUBMITTAL_ID: &str = "Submittal #";
pub const RFI_ID: &str = "RFI #";
pub const TITLE: &str = "Title";
pub const SUBJECT: &str = "Subject";
pub const SPEC_SECTION: &str = "Spec Section";
pub const DISCIPLINE: &str = "Discipline";
pub const CONTRACTOR: &str = "Contractor";
pub const STATUS: &str = "Status";
pub const PRIORITY: &str = "Priority";
pub const BALL_IN_COURT: &str = "Ball in Court";
pub const REVIEWER: &str = "Reviewer";
pub const COST_IMPACT: &str = "Cost Impact";
pub const SCHEDULE_IMPACT: &str = "Schedule Impact";
pub const DATE_CREATED: &str = "Date Created";
pub const DUE_DATE: &str = "Due Date";
pub const DATE_CLOSED: &str = "Date Closed";
pub const DAYS_OPEN: &str = "Days Open";
/// Computed by the overdue evaluator. Internal: never exported.
pub const IS_OVERDUE: &str = "Is Overdue";
pub const LEAD_TIME: &str = "Lead Time";

/// The columns holding dates.
pub const DATE_FIELDS: [&str; 3] = [DATE_CREATED, DUE_DATE, DATE_CLOSED];

/// The label of the organization used when nothing better is known.
pub const UNKNOWN: &str = "Unknown";
