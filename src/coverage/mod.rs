// src/coverage/mod.rs

//! Porter coverage analysis.
//!
//! Given a department's or service's required window and the porters
//! assigned into it, reports stretches with nobody on duty (gaps) and
//! stretches with fewer porters than the minimum (shortages). Everything here
//! is pure and synchronous; absences are supplied through [`AbsenceFilter`].

use thiserror::Error;

pub mod absence;
pub mod analyzer;
pub mod gaps;
pub mod issues;
pub mod model;
pub mod shift_type;
pub mod shortages;
mod sweep;
pub mod time;

pub use absence::{merge_porter_assignments, present_assignments, AbsenceCalendar, AbsenceFilter, NoAbsences, PorterAbsence};
pub use analyzer::{CoverageAnalyzer, CoverageReport, CoverageSource};
pub use gaps::{coverage_gaps, GapDetection};
pub use issues::coverage_issues;
pub use model::{
    CoverageIssue, CoverageWindow, DailyMinimums, Gap, GapReport, IssueKind, IssueReport, PorterAssignment, Shortage,
    ShortageReport,
};
pub use shift_type::{classify_shift, ShiftDefaults, ShiftType, ShiftWindow};
pub use shortages::staffing_shortages;
pub use time::{minutes_to_time, time_to_minutes, TimeOfDay, MINUTES_PER_DAY};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoverageError {
    #[error("invalid time of day '{0}'")]
    InvalidTime(String),
    #[error("{0} minutes is outside a single day")]
    OutOfRange(u32),
    #[error("missing {0}")]
    MissingTime(String),
    #[error("{0} crosses midnight")]
    CrossesMidnight(String),
    #[error("unknown gap detection '{0}' (expected 'sweep' or 'adjacent')")]
    UnknownDetection(String),
}
