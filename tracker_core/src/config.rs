// ********* Input data structures ***********

use std::fmt::Display;

use chrono::NaiveDate;

use crate::fields;

/// The two kinds of tracked items.
///
/// Both kinds go through the same pipeline, but each one has its own
/// column dictionary, its own canonical identifier column and its own
/// defaults for missing fields.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum RecordKind {
    /// A document submitted by a contractor for review by the design team.
    Submittal,
    /// A Request for Information raised during construction.
    Rfi,
}

impl RecordKind {
    pub const ALL: [RecordKind; 2] = [RecordKind::Submittal, RecordKind::Rfi];

    /// The canonical name of the identifier column.
    pub fn id_field(&self) -> &'static str {
        match self {
            RecordKind::Submittal => fields::SUBMITTAL_ID,
            RecordKind::Rfi => fields::RFI_ID,
        }
    }

    /// The canonical name of the free-text description column.
    pub fn description_field(&self) -> &'static str {
        match self {
            RecordKind::Submittal => fields::TITLE,
            RecordKind::Rfi => fields::SUBJECT,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::Submittal => "submittal",
            RecordKind::Rfi => "rfi",
        }
    }

    /// Parses the name of a kind, as found in configuration files.
    pub fn from_name(s: &str) -> Option<RecordKind> {
        match s.trim().to_lowercase().as_str() {
            "submittal" | "submittals" => Some(RecordKind::Submittal),
            "rfi" | "rfis" => Some(RecordKind::Rfi),
            _ => None,
        }
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ********* Configuration **********

/// Per-run settings for the pipeline.
///
/// The settings are passed explicitly to [crate::normalize]. Changing a
/// threshold means running the pipeline again over the full dataset.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Settings {
    /// Open submittals older than this many days are overdue.
    pub submittal_threshold_days: i64,
    /// Open RFIs older than this many days are overdue.
    pub rfi_threshold_days: i64,
    /// The date used for every "now" comparison (age, due dates).
    pub today: NaiveDate,
    /// Extra name to organization entries, on top of the built-in directory.
    pub organizations: Vec<(String, String)>,
}

impl Settings {
    pub const DEFAULT_SUBMITTAL_THRESHOLD_DAYS: i64 = 14;
    pub const DEFAULT_RFI_THRESHOLD_DAYS: i64 = 10;

    /// Default thresholds, evaluated at the given date.
    pub fn at(today: NaiveDate) -> Settings {
        Settings {
            submittal_threshold_days: Settings::DEFAULT_SUBMITTAL_THRESHOLD_DAYS,
            rfi_threshold_days: Settings::DEFAULT_RFI_THRESHOLD_DAYS,
            today,
            organizations: Vec::new(),
        }
    }

    pub fn threshold_days(&self, kind: RecordKind) -> i64 {
        match kind {
            RecordKind::Submittal => self.submittal_threshold_days,
            RecordKind::Rfi => self.rfi_threshold_days,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::at(chrono::Local::now().date_naive())
    }
}

// ******** Output data structures *********

/// The bucket a status string falls into.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Bucket {
    Open,
    Closed,
}

/// The partition of all the distinct statuses of a table.
///
/// Invariant: every distinct status appears in exactly one of the lists.
/// Both lists are sorted.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct StatusBuckets {
    pub open: Vec<String>,
    pub closed: Vec<String>,
}

impl StatusBuckets {
    pub fn is_open(&self, status: &str) -> bool {
        self.open.iter().any(|s| s == status)
    }

    pub fn is_closed(&self, status: &str) -> bool {
        self.closed.iter().any(|s| s == status)
    }
}

/// A renaming applied by the column mapper.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnSubstitution {
    pub source: String,
    pub canonical: String,
}
