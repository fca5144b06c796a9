// src/models/mod.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::coverage::{
    self, CoverageError, CoverageSource, CoverageWindow, DailyMinimums, PorterAssignment, ShiftWindow,
};

// ───────────────────────────────────────
// Staff & absences
// ───────────────────────────────────────
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Staff {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub role: String, // porter | supervisor
    pub email: Option<String>,
    pub availability_pattern: Option<String>,
    pub contracted_hours_start: Option<NaiveTime>,
    pub contracted_hours_end: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Staff {
    pub fn contracted_hours(&self) -> Option<ShiftWindow> {
        match (self.contracted_hours_start, self.contracted_hours_end) {
            (Some(start), Some(end)) => Some(ShiftWindow::new(start.into(), end.into())),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct PorterAbsence {
    pub id: Uuid,
    pub porter_id: Uuid,
    pub absence_type: String, // illness | annual_leave | training | other
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&PorterAbsence> for coverage::PorterAbsence {
    fn from(row: &PorterAbsence) -> Self {
        coverage::PorterAbsence {
            porter_id: row.porter_id.to_string(),
            start_date: row.start_date,
            end_date: row.end_date,
            absence_type: Some(row.absence_type.clone()),
        }
    }
}

// ───────────────────────────────────────
// Settings
// ───────────────────────────────────────
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct ShiftDefault {
    pub id: Uuid,
    pub shift_type: String, // week_day | week_night | weekend_day | weekend_night
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShiftDefault {
    pub fn window(&self) -> ShiftWindow {
        ShiftWindow::new(self.start_time.into(), self.end_time.into())
    }
}

// ───────────────────────────────────────
// Area / service cover
// ───────────────────────────────────────

/// A required cover window. `target_id` is the department (area cover) or
/// support service (service cover) being covered.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct CoverAssignment {
    pub id: Uuid,
    pub target_id: Uuid,
    pub shift_type: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub color: String,
    pub minimum_porters: i32,
    pub minimum_porters_mon: Option<i32>,
    pub minimum_porters_tue: Option<i32>,
    pub minimum_porters_wed: Option<i32>,
    pub minimum_porters_thu: Option<i32>,
    pub minimum_porters_fri: Option<i32>,
    pub minimum_porters_sat: Option<i32>,
    pub minimum_porters_sun: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn headcount(n: i32) -> u32 {
    u32::try_from(n).unwrap_or(0)
}

impl CoverAssignment {
    pub fn daily_minimums(&self) -> DailyMinimums {
        DailyMinimums {
            mon: self.minimum_porters_mon.map(headcount),
            tue: self.minimum_porters_tue.map(headcount),
            wed: self.minimum_porters_wed.map(headcount),
            thu: self.minimum_porters_thu.map(headcount),
            fri: self.minimum_porters_fri.map(headcount),
            sat: self.minimum_porters_sat.map(headcount),
            sun: self.minimum_porters_sun.map(headcount),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct CoverPorterAssignment {
    pub id: Uuid,
    pub cover_assignment_id: Uuid,
    pub porter_id: Uuid,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored cover window with its porter rows, ready for analysis.
pub struct StoredCover<'a> {
    pub kind: &'static str,
    pub assignment: &'a CoverAssignment,
    pub porters: &'a [CoverPorterAssignment],
}

impl CoverageSource for StoredCover<'_> {
    fn label(&self) -> String {
        format!("{} {}", self.kind, self.assignment.id)
    }

    fn window(&self, date: NaiveDate) -> Result<CoverageWindow, CoverageError> {
        let a = self.assignment;
        if a.start_time > a.end_time {
            return Err(CoverageError::CrossesMidnight(self.label()));
        }
        let minimum = a.daily_minimums().resolve(headcount(a.minimum_porters), date);
        Ok(CoverageWindow::new(a.start_time.into(), a.end_time.into(), minimum))
    }

    fn assignments(&self) -> Result<Vec<PorterAssignment>, CoverageError> {
        self.porters
            .iter()
            .map(|p| {
                if p.start_time > p.end_time {
                    return Err(CoverageError::CrossesMidnight(format!("porter assignment {}", p.id)));
                }
                Ok(PorterAssignment::new(p.porter_id.to_string(), p.start_time.into(), p.end_time.into()))
            })
            .collect()
    }
}

// ───────────────────────────────────────
// DTOs helpful for endpoints
// ───────────────────────────────────────
#[derive(Debug, Serialize, Deserialize)]
pub struct Deleted {
    pub deleted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PorterShiftType {
    pub porter_id: Uuid,
    pub shift_type: coverage::ShiftType,
}
