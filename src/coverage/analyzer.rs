// src/coverage/analyzer.rs

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use super::absence::{absent_porters, merge_porter_assignments, present_assignments};
use super::{
    coverage_gaps, coverage_issues, staffing_shortages, AbsenceFilter, CoverageError, CoverageWindow, GapDetection,
    GapReport, IssueReport, NoAbsences, PorterAssignment, ShortageReport,
};

/// Anything that can hand over a coverage window and its porter assignments:
/// stored area cover, stored service cover, an ad hoc request.
pub trait CoverageSource {
    /// Human-readable identity used in log lines.
    fn label(&self) -> String;

    /// The window in force on `date`; weekday minimums are resolved here.
    fn window(&self, date: NaiveDate) -> Result<CoverageWindow, CoverageError>;

    fn assignments(&self) -> Result<Vec<PorterAssignment>, CoverageError>;
}

/// Full analysis of one window on one date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    pub date: Option<NaiveDate>,
    pub window: Option<CoverageWindow>,
    pub absent_porters: Vec<String>,
    pub gaps: GapReport,
    pub shortages: ShortageReport,
    pub issues: IssueReport,
}

/// Gap and shortage analysis with the absence lookup injected.
#[derive(Debug, Clone)]
pub struct CoverageAnalyzer<F = NoAbsences> {
    absences: F,
    detection: GapDetection,
}

impl Default for CoverageAnalyzer<NoAbsences> {
    fn default() -> Self {
        Self::new(NoAbsences)
    }
}

impl<F: AbsenceFilter> CoverageAnalyzer<F> {
    pub fn new(absences: F) -> Self {
        Self { absences, detection: GapDetection::default() }
    }

    pub fn with_detection(mut self, detection: GapDetection) -> Self {
        self.detection = detection;
        self
    }

    pub fn detection(&self) -> GapDetection {
        self.detection
    }

    /// Present porters' assignments, merged per porter.
    fn on_duty(&self, assignments: &[PorterAssignment], date: NaiveDate) -> Vec<PorterAssignment> {
        merge_porter_assignments(&present_assignments(assignments, date, &self.absences))
    }

    pub fn coverage_gaps(&self, window: &CoverageWindow, assignments: &[PorterAssignment], date: NaiveDate) -> GapReport {
        coverage_gaps(window, &self.on_duty(assignments, date), self.detection)
    }

    pub fn staffing_shortages(
        &self,
        window: &CoverageWindow,
        assignments: &[PorterAssignment],
        date: NaiveDate,
    ) -> ShortageReport {
        staffing_shortages(window, &self.on_duty(assignments, date))
    }

    pub fn coverage_issues(&self, window: &CoverageWindow, assignments: &[PorterAssignment], date: NaiveDate) -> IssueReport {
        self.report(window, assignments, date).issues
    }

    pub fn report(&self, window: &CoverageWindow, assignments: &[PorterAssignment], date: NaiveDate) -> CoverageReport {
        let on_duty = self.on_duty(assignments, date);
        let gaps = coverage_gaps(window, &on_duty, self.detection);
        let shortages = staffing_shortages(window, &on_duty);
        let issues = coverage_issues(&gaps, &shortages);

        CoverageReport {
            date: Some(date),
            window: Some(window.clone()),
            absent_porters: absent_porters(assignments, date, &self.absences),
            gaps,
            shortages,
            issues,
        }
    }

    /// Analyzes a source, reporting "no issues" when its data can't be read.
    pub fn analyze_source<S>(&self, source: &S, date: NaiveDate) -> CoverageReport
    where
        S: CoverageSource + ?Sized,
    {
        let loaded = source.window(date).and_then(|w| Ok((w, source.assignments()?)));
        match loaded {
            Ok((window, assignments)) => {
                let report = self.report(&window, &assignments, date);
                debug!(
                    source = %source.label(),
                    %date,
                    gaps = report.gaps.gaps.len(),
                    shortages = report.shortages.shortages.len(),
                    "coverage analyzed"
                );
                report
            }
            Err(e) => {
                warn!(source = %source.label(), %date, error = %e, "coverage analysis skipped");
                CoverageReport { date: Some(date), ..CoverageReport::default() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::{AbsenceCalendar, Gap, IssueKind, NoAbsences, PorterAbsence, TimeOfDay};

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    struct Fixed {
        window: Result<CoverageWindow, CoverageError>,
        assignments: Vec<PorterAssignment>,
    }

    impl CoverageSource for Fixed {
        fn label(&self) -> String {
            "fixed".into()
        }
        fn window(&self, _date: NaiveDate) -> Result<CoverageWindow, CoverageError> {
            self.window.clone()
        }
        fn assignments(&self) -> Result<Vec<PorterAssignment>, CoverageError> {
            Ok(self.assignments.clone())
        }
    }

    #[test]
    fn absent_porter_counts_as_never_assigned() {
        let window = CoverageWindow::new(t("08:00"), t("16:00"), 1);
        let assignments = vec![
            PorterAssignment::new("p1", t("08:00"), t("16:00")),
            PorterAssignment::new("p2", t("08:00"), t("12:00")),
        ];
        let cal = AbsenceCalendar::new(vec![PorterAbsence {
            porter_id: "p1".into(),
            start_date: date(),
            end_date: date(),
            absence_type: Some("annual_leave".into()),
        }]);

        let with_absence = CoverageAnalyzer::new(cal).report(&window, &assignments, date());
        let without_p1 = CoverageAnalyzer::new(NoAbsences).report(&window, &assignments[1..], date());

        assert_eq!(with_absence.gaps, without_p1.gaps);
        assert_eq!(with_absence.shortages, without_p1.shortages);
        assert_eq!(with_absence.absent_porters, vec!["p1".to_string()]);
        assert!(with_absence.gaps.has_gap);
    }

    #[test]
    fn double_booked_porter_counts_once() {
        let window = CoverageWindow::new(t("08:00"), t("16:00"), 2);
        let assignments = vec![
            PorterAssignment::new("p1", t("08:00"), t("16:00")),
            PorterAssignment::new("p1", t("08:00"), t("16:00")),
        ];
        let analyzer = CoverageAnalyzer::new(NoAbsences);

        let shortages = analyzer.staffing_shortages(&window, &assignments, date());
        assert!(shortages.has_shortage);
        assert_eq!(shortages.shortages.len(), 1);
        assert_eq!(shortages.shortages[0].porter_count, 1);
        assert_eq!(shortages.shortages[0].required_count, 2);

        let issues = analyzer.coverage_issues(&window, &assignments, date());
        assert_eq!(issues.issues.len(), 1);
        assert_eq!(issues.issues[0].kind(), IssueKind::Shortage);
    }

    #[test]
    fn split_bookings_of_one_porter_still_leave_their_gap() {
        let window = CoverageWindow::new(t("08:00"), t("16:00"), 1);
        let assignments = vec![
            PorterAssignment::new("p1", t("08:00"), t("10:00")),
            PorterAssignment::new("p1", t("09:00"), t("12:00")),
            PorterAssignment::new("p1", t("13:00"), t("16:00")),
        ];
        let report = CoverageAnalyzer::new(NoAbsences).report(&window, &assignments, date());
        assert_eq!(report.gaps.gaps, vec![Gap::new(t("12:00"), t("13:00"))]);
        assert_eq!(report.shortages.shortages.len(), 1);
        assert_eq!(report.shortages.shortages[0].porter_count, 0);
    }

    #[test]
    fn detection_is_configurable() {
        let window = CoverageWindow::new(t("08:00"), t("16:00"), 1);
        let assignments = vec![
            PorterAssignment::new("a", t("08:00"), t("15:00")),
            PorterAssignment::new("b", t("08:30"), t("09:00")),
            PorterAssignment::new("c", t("14:00"), t("16:00")),
        ];
        let legacy = CoverageAnalyzer::new(NoAbsences).with_detection(GapDetection::AdjacentPairs);
        assert_eq!(legacy.detection(), GapDetection::AdjacentPairs);
        assert!(legacy.coverage_gaps(&window, &assignments, date()).has_gap);
        assert!(!CoverageAnalyzer::new(NoAbsences).coverage_gaps(&window, &assignments, date()).has_gap);
    }

    #[test]
    fn unreadable_source_fails_safe() {
        let source = Fixed {
            window: Err(CoverageError::MissingTime("start_time".into())),
            assignments: vec![],
        };
        let report = CoverageAnalyzer::new(NoAbsences).analyze_source(&source, date());
        assert_eq!(report.window, None);
        assert!(!report.gaps.has_gap);
        assert!(!report.shortages.has_shortage);
        assert!(!report.issues.has_issues);
    }

    #[test]
    fn readable_source_is_analyzed() {
        let source = Fixed { window: Ok(CoverageWindow::new(t("08:00"), t("16:00"), 2)), assignments: vec![] };
        let analyzer = CoverageAnalyzer::new(|_: &str, _: NaiveDate| false);
        let report = analyzer.analyze_source(&source, date());
        assert!(report.gaps.has_gap);
        assert_eq!(report.shortages.shortages[0].porter_count, 0);
        assert_eq!(report.issues.issues.len(), 2);
        assert_eq!(analyzer.staffing_shortages(&report.window.unwrap(), &[], date()).shortages.len(), 1);
    }
}
