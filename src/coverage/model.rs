// src/coverage/model.rs

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::TimeOfDay;

/// Required-coverage interval and headcount floor for one department or
/// service in one shift context. Start and end are same-day times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageWindow {
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    #[serde(default)]
    pub minimum_required: u32,
}

impl CoverageWindow {
    pub fn new(start_time: TimeOfDay, end_time: TimeOfDay, minimum_required: u32) -> Self {
        Self { start_time, end_time, minimum_required }
    }
}

/// One porter's covering interval inside a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PorterAssignment {
    pub porter_id: String,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl PorterAssignment {
    pub fn new(porter_id: impl Into<String>, start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
        Self { porter_id: porter_id.into(), start_time, end_time }
    }

    /// Covers `[start, end]` entirely.
    pub fn spans(&self, start: TimeOfDay, end: TimeOfDay) -> bool {
        self.start_time <= start && self.end_time >= end
    }
}

/// Per-weekday overrides of a window's base minimum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyMinimums {
    pub mon: Option<u32>,
    pub tue: Option<u32>,
    pub wed: Option<u32>,
    pub thu: Option<u32>,
    pub fri: Option<u32>,
    pub sat: Option<u32>,
    pub sun: Option<u32>,
}

impl DailyMinimums {
    pub fn for_weekday(&self, day: Weekday) -> Option<u32> {
        match day {
            Weekday::Mon => self.mon,
            Weekday::Tue => self.tue,
            Weekday::Wed => self.wed,
            Weekday::Thu => self.thu,
            Weekday::Fri => self.fri,
            Weekday::Sat => self.sat,
            Weekday::Sun => self.sun,
        }
    }

    pub fn resolve(&self, base: u32, date: NaiveDate) -> u32 {
        self.for_weekday(date.weekday()).unwrap_or(base)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Gap,
    Shortage,
}

/// A stretch of the window with nobody assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gap {
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    #[serde(rename = "type")]
    pub kind: IssueKind,
}

impl Gap {
    pub fn new(start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
        Self { start_time, end_time, kind: IssueKind::Gap }
    }
}

/// A stretch of the window where fewer porters are active than required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortage {
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub porter_count: u32,
    pub required_count: u32,
}

impl Shortage {
    pub fn new(start_time: TimeOfDay, end_time: TimeOfDay, porter_count: u32, required_count: u32) -> Self {
        Self { start_time, end_time, kind: IssueKind::Shortage, porter_count, required_count }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CoverageIssue {
    Gap(Gap),
    Shortage(Shortage),
}

impl CoverageIssue {
    pub fn start_time(&self) -> TimeOfDay {
        match self {
            CoverageIssue::Gap(g) => g.start_time,
            CoverageIssue::Shortage(s) => s.start_time,
        }
    }

    pub fn kind(&self) -> IssueKind {
        match self {
            CoverageIssue::Gap(_) => IssueKind::Gap,
            CoverageIssue::Shortage(_) => IssueKind::Shortage,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapReport {
    pub has_gap: bool,
    pub gaps: Vec<Gap>,
}

impl GapReport {
    pub fn from_gaps(gaps: Vec<Gap>) -> Self {
        Self { has_gap: !gaps.is_empty(), gaps }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortageReport {
    pub has_shortage: bool,
    pub shortages: Vec<Shortage>,
}

impl ShortageReport {
    pub fn from_shortages(shortages: Vec<Shortage>) -> Self {
        Self { has_shortage: !shortages.is_empty(), shortages }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueReport {
    pub has_issues: bool,
    pub issues: Vec<CoverageIssue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    #[test]
    fn weekday_minimum_falls_back_to_base() {
        let mins = DailyMinimums { sat: Some(1), sun: Some(0), ..Default::default() };
        let saturday = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(mins.resolve(3, saturday), 1);
        assert_eq!(mins.resolve(3, sunday), 0);
        assert_eq!(mins.resolve(3, monday), 3);
    }

    #[test]
    fn records_serialize_in_camel_case_with_type_tag() {
        let json = serde_json::to_value(Shortage::new(t("08:00"), t("12:00"), 1, 2)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "startTime": "08:00:00",
                "endTime": "12:00:00",
                "type": "shortage",
                "porterCount": 1,
                "requiredCount": 2
            })
        );
        let gap = serde_json::to_value(CoverageIssue::Gap(Gap::new(t("09:00"), t("10:00")))).unwrap();
        assert_eq!(gap["type"], "gap");
        assert_eq!(gap["startTime"], "09:00:00");
    }

    #[test]
    fn window_minimum_defaults_to_zero() {
        let w: CoverageWindow =
            serde_json::from_str(r#"{"startTime":"08:00","endTime":"16:00"}"#).unwrap();
        assert_eq!(w.minimum_required, 0);
        assert_eq!(w.end_time, t("16:00"));
    }
}
