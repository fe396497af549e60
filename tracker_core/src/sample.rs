//! A small built-in dataset.
//!
//! It is used when no file is given for a kind, and as a fallback when a file cannot be
//! read. The ages are not stored: they follow from the dates and the report date.

use crate::builder::TableBuilder;
use crate::config::*;
use crate::fields::*;
use crate::table::RawTable;

const SUBMITTAL_ROWS: &[[&str; 10]] = &[
    ["SUB-0001", "Submittal for Cast-in-Place Concrete", "03 30 00 - Cast-in-Place Concrete", "Bird Construction", "Approved", "Closed", "Bird PM", "2025-01-06", "2025-01-20", "2025-01-18"],
    ["SUB-0002", "Submittal for Firestopping", "07 84 00 - Firestopping", "CRB", "Open", "Consultant", "CRB Design Team", "2025-02-03", "2025-02-17", ""],
    ["SUB-0003", "Submittal for HVAC Piping", "23 05 00 - HVAC Piping", "SMP Engineering", "Pending Review", "Architect", "CIMA+ Review", "2025-02-10", "2025-02-24", ""],
    ["SUB-0004", "Submittal for Electrical General", "26 05 00 - Electrical General", "Icon Electric", "Approved as Noted", "Closed", "CIMA+ Review", "2025-01-13", "2025-01-27", "2025-02-03"],
    ["SUB-0005", "Submittal for Fire Detection", "28 31 00 - Fire Detection", "Icon Electric", "Revise & Resubmit", "Contractor", "Owner Rep", "2025-02-17", "2025-03-03", ""],
    ["SUB-0006", "Submittal for Plumbing Piping", "22 10 00 - Plumbing Piping", "SMP Engineering", "Rejected", "Closed", "CRB Design Team", "2025-01-20", "2025-02-03", "2025-02-05"],
    ["SUB-0007", "Submittal for Steel Doors & Frames", "08 11 00 - Steel Doors & Frames", "Bird Construction", "Open", "Owner", "Bird PM", "2025-03-03", "2025-03-17", ""],
    ["SUB-0008", "Submittal for Fire Sprinkler Systems", "21 13 00 - Fire Sprinkler Systems", "CIMA+", "Pending Review", "Consultant", "CIMA+ Review", "2025-03-10", "2025-03-31", ""],
    ["SUB-0009", "Submittal for Air Handling Units", "23 73 00 - Air Handling Units", "SMP Engineering", "Approved", "Closed", "Owner Rep", "2025-02-24", "2025-03-10", "2025-03-07"],
    ["SUB-0010", "Submittal for Cleanroom Construction", "13 34 00 - Cleanroom Construction", "CRB", "Open", "Architect", "CRB Design Team", "2025-03-17", "2025-03-31", ""],
];

const RFI_ROWS: &[[&str; 13]] = &[
    ["RFI-0001", "Clarification on Structural detail #214", "Structural", "Bird Construction", "Closed", "High", "Closed", "2025-01-15", "2025-01-24", "2025-01-23", "None", "No", ""],
    ["RFI-0002", "Clarification on Mechanical detail #388", "Mechanical", "SMP Engineering", "Open", "Medium", "Consultant", "2025-02-04", "2025-02-14", "", "Potential", "Yes", ""],
    ["RFI-0003", "Clarification on Electrical detail #512", "Electrical", "Icon Electric", "Pending Response", "Critical", "Architect", "2025-02-18", "2025-02-25", "", "Confirmed", "Yes", ""],
    ["RFI-0004", "Clarification on Plumbing detail #127", "Plumbing", "SMP Engineering", "Closed", "Low", "Closed", "2025-01-28", "2025-02-07", "2025-02-12", "None", "No", ""],
    ["RFI-0005", "Clarification on Fire Protection detail #905", "Fire Protection", "CIMA+", "Overdue", "High", "Owner", "2025-02-11", "2025-02-20", "", "Potential", "No", "Yes"],
    ["RFI-0006", "Clarification on Architectural detail #640", "Architectural", "CRB", "Open", "Medium", "Contractor", "2025-03-04", "2025-03-14", "", "None", "No", ""],
    ["RFI-0007", "Clarification on Process/Pharma detail #733", "Process/Pharma", "CRB", "Pending Response", "High", "Consultant", "2025-03-11", "2025-03-21", "", "Confirmed", "Yes", ""],
    ["RFI-0008", "Clarification on Structural detail #451", "Structural", "Bird Construction", "Closed", "Medium", "Closed", "2025-02-25", "2025-03-07", "2025-03-06", "None", "No", ""],
];

/// The raw sample table of a kind, with the headers of a typical export.
pub fn sample_table(kind: RecordKind) -> RawTable {
    match kind {
        RecordKind::Submittal => {
            let mut b = TableBuilder::from_strs(&[
                SUBMITTAL_ID,
                TITLE,
                SPEC_SECTION,
                CONTRACTOR,
                STATUS,
                BALL_IN_COURT,
                REVIEWER,
                DATE_CREATED,
                DUE_DATE,
                DATE_CLOSED,
            ]);
            for row in SUBMITTAL_ROWS {
                b.add_row_strs(row);
            }
            b.build()
        }
        RecordKind::Rfi => {
            let mut b = TableBuilder::from_strs(&[
                RFI_ID,
                SUBJECT,
                DISCIPLINE,
                CONTRACTOR,
                STATUS,
                PRIORITY,
                BALL_IN_COURT,
                DATE_CREATED,
                DUE_DATE,
                DATE_CLOSED,
                COST_IMPACT,
                SCHEDULE_IMPACT,
                "Overdue",
            ]);
            for row in RFI_ROWS {
                b.add_row_strs(row);
            }
            b.build()
        }
    }
}
