// src/routes/analyze.rs

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::coverage::{
    AbsenceCalendar, CoverageAnalyzer, CoverageError, CoverageReport, CoverageSource, CoverageWindow, GapDetection,
    PorterAbsence, PorterAssignment, TimeOfDay,
};
use crate::AppState;
use super::{report_date, ApiError};

// Times are kept raw; a malformed one yields an empty report, not a 4xx.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWindow {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(default)] pub minimum_required: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAssignment {
    pub porter_id: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeBody {
    pub window: RawWindow,
    #[serde(default)] pub assignments: Vec<RawAssignment>,
    #[serde(default)] pub absences: Vec<PorterAbsence>,
    pub date: Option<NaiveDate>,
    /// Overrides the server's configured detection for this request.
    pub detection: Option<GapDetection>,
}

fn required_time(value: &Option<String>, what: impl FnOnce() -> String) -> Result<TimeOfDay, CoverageError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Err(CoverageError::MissingTime(what())),
        Some(raw) => TimeOfDay::parse(raw),
    }
}

impl CoverageSource for AnalyzeBody {
    fn label(&self) -> String {
        "posted window".into()
    }

    fn window(&self, _date: NaiveDate) -> Result<CoverageWindow, CoverageError> {
        let start = required_time(&self.window.start_time, || "window startTime".into())?;
        let end = required_time(&self.window.end_time, || "window endTime".into())?;
        if start > end {
            return Err(CoverageError::CrossesMidnight(self.label()));
        }
        Ok(CoverageWindow::new(start, end, self.window.minimum_required))
    }

    fn assignments(&self) -> Result<Vec<PorterAssignment>, CoverageError> {
        self.assignments
            .iter()
            .map(|a| {
                let start = required_time(&a.start_time, || format!("startTime for porter {}", a.porter_id))?;
                let end = required_time(&a.end_time, || format!("endTime for porter {}", a.porter_id))?;
                if start > end {
                    return Err(CoverageError::CrossesMidnight(format!("assignment for porter {}", a.porter_id)));
                }
                Ok(PorterAssignment::new(a.porter_id.clone(), start, end))
            })
            .collect()
    }
}

// POST /api/v1/coverage/analyze
// Without `date`, the server's local calendar day is analyzed.
pub async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeBody>,
) -> Result<Json<CoverageReport>, ApiError> {
    let date = report_date(body.date);
    let analyzer = CoverageAnalyzer::new(AbsenceCalendar::new(body.absences.clone()))
        .with_detection(body.detection.unwrap_or(state.gap_detection));
    Ok(Json(analyzer.analyze_source(&body, date)))
}
