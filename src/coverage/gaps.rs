// src/coverage/gaps.rs

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::sweep::segments;
use super::{CoverageError, CoverageWindow, Gap, GapReport, PorterAssignment};

/// How gaps between assignments are detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapDetection {
    /// Compares each assignment (sorted by start) with its immediate
    /// predecessor only. Reports a spurious gap when an assignment nested in
    /// an earlier, longer one is followed by a later start.
    #[serde(alias = "adjacent", alias = "legacy")]
    AdjacentPairs,
    /// Reports every maximal stretch where no assignment is active.
    #[default]
    #[serde(alias = "sweep")]
    SweepLine,
}

impl FromStr for GapDetection {
    type Err = CoverageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adjacent" | "adjacent_pairs" | "legacy" => Ok(GapDetection::AdjacentPairs),
            "sweep" | "sweep_line" => Ok(GapDetection::SweepLine),
            other => Err(CoverageError::UnknownDetection(other.to_string())),
        }
    }
}

/// Zero-coverage stretches of `window`. Callers filter absences first.
pub fn coverage_gaps(
    window: &CoverageWindow,
    assignments: &[PorterAssignment],
    detection: GapDetection,
) -> GapReport {
    if assignments.is_empty() {
        return GapReport::from_gaps(vec![Gap::new(window.start_time, window.end_time)]);
    }

    // One porter spanning the whole window settles it.
    if assignments.iter().any(|a| a.spans(window.start_time, window.end_time)) {
        return GapReport::default();
    }

    let gaps = match detection {
        GapDetection::AdjacentPairs => adjacent_pair_gaps(window, assignments),
        GapDetection::SweepLine => sweep_line_gaps(window, assignments),
    };
    GapReport::from_gaps(gaps)
}

fn adjacent_pair_gaps(window: &CoverageWindow, assignments: &[PorterAssignment]) -> Vec<Gap> {
    let mut sorted: Vec<&PorterAssignment> = assignments.iter().collect();
    sorted.sort_by_key(|a| a.start_time);

    let mut gaps = Vec::new();
    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return gaps;
    };

    if first.start_time > window.start_time {
        gaps.push(Gap::new(window.start_time, first.start_time));
    }
    for pair in sorted.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if next.start_time > prev.end_time {
            gaps.push(Gap::new(prev.end_time, next.start_time));
        }
    }
    if last.end_time < window.end_time {
        gaps.push(Gap::new(last.end_time, window.end_time));
    }
    gaps
}

fn sweep_line_gaps(window: &CoverageWindow, assignments: &[PorterAssignment]) -> Vec<Gap> {
    let mut gaps: Vec<Gap> = Vec::new();
    for seg in segments(window, assignments).into_iter().filter(|s| s.active == 0) {
        match gaps.last_mut() {
            Some(open) if open.end_time == seg.start => open.end_time = seg.end,
            _ => gaps.push(Gap::new(seg.start, seg.end)),
        }
    }
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::TimeOfDay;

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn window() -> CoverageWindow {
        CoverageWindow::new(t("08:00"), t("16:00"), 1)
    }

    fn pa(id: &str, start: &str, end: &str) -> PorterAssignment {
        PorterAssignment::new(id, t(start), t(end))
    }

    fn spans(report: &GapReport) -> Vec<(String, String)> {
        report
            .gaps
            .iter()
            .map(|g| (g.start_time.to_string(), g.end_time.to_string()))
            .collect()
    }

    const BOTH: [GapDetection; 2] = [GapDetection::AdjacentPairs, GapDetection::SweepLine];

    #[test]
    fn no_assignments_is_one_whole_window_gap() {
        for mode in BOTH {
            let report = coverage_gaps(&window(), &[], mode);
            assert!(report.has_gap);
            assert_eq!(spans(&report), vec![("08:00:00".into(), "16:00:00".into())]);
        }
    }

    #[test]
    fn exact_single_cover_has_no_gap() {
        for mode in BOTH {
            let report = coverage_gaps(&window(), &[pa("a", "08:00", "16:00")], mode);
            assert_eq!(report, GapReport::default());
        }
    }

    #[test]
    fn leading_middle_and_trailing_gaps() {
        let assignments = [pa("b", "12:00", "14:00"), pa("a", "09:00", "11:00")];
        for mode in BOTH {
            let report = coverage_gaps(&window(), &assignments, mode);
            assert_eq!(
                spans(&report),
                vec![
                    ("08:00:00".into(), "09:00:00".into()),
                    ("11:00:00".into(), "12:00:00".into()),
                    ("14:00:00".into(), "16:00:00".into()),
                ],
                "{mode:?}"
            );
        }
    }

    #[test]
    fn overlapping_pair_jointly_covering_has_no_gap() {
        let assignments = [pa("a", "08:00", "10:00"), pa("b", "09:00", "16:00")];
        for mode in BOTH {
            assert!(!coverage_gaps(&window(), &assignments, mode).has_gap);
        }
    }

    #[test]
    fn chained_overlaps_have_no_gap() {
        let assignments =
            [pa("a", "08:00", "09:00"), pa("b", "08:30", "10:00"), pa("c", "09:30", "16:00")];
        for mode in BOTH {
            assert!(!coverage_gaps(&window(), &assignments, mode).has_gap);
        }
    }

    // A covers 08:00-15:00, B is nested inside A, C finishes the day.
    fn nested_case() -> [PorterAssignment; 3] {
        [pa("a", "08:00", "15:00"), pa("b", "08:30", "09:00"), pa("c", "14:00", "16:00")]
    }

    #[test]
    fn adjacent_pairs_reports_spurious_gap_after_nested_assignment() {
        let report = coverage_gaps(&window(), &nested_case(), GapDetection::AdjacentPairs);
        assert_eq!(spans(&report), vec![("09:00:00".into(), "14:00:00".into())]);
    }

    #[test]
    fn sweep_line_suppresses_gap_hidden_by_longer_predecessor() {
        let report = coverage_gaps(&window(), &nested_case(), GapDetection::SweepLine);
        assert!(!report.has_gap);
    }

    #[test]
    fn sweep_line_merges_contiguous_empty_segments() {
        // 10:00 and 11:00 boundaries come from assignments outside the gap.
        let assignments = [pa("a", "08:00", "10:00"), pa("b", "13:00", "16:00"), pa("c", "11:00", "11:00")];
        let report = coverage_gaps(&window(), &assignments, GapDetection::SweepLine);
        assert_eq!(spans(&report), vec![("10:00:00".into(), "13:00:00".into())]);
    }

    #[test]
    fn ties_keep_input_order_for_adjacent_pairs() {
        // Same start; the first-listed one is compared with the later start.
        let assignments = [pa("short", "08:00", "09:00"), pa("long", "08:00", "12:00"), pa("c", "12:00", "16:00")];
        let report = coverage_gaps(&window(), &assignments, GapDetection::AdjacentPairs);
        assert!(!report.has_gap);

        let reordered = [pa("long", "08:00", "12:00"), pa("short", "08:00", "09:00"), pa("c", "12:00", "16:00")];
        let report = coverage_gaps(&window(), &reordered, GapDetection::AdjacentPairs);
        assert_eq!(spans(&report), vec![("09:00:00".into(), "12:00:00".into())]);
    }

    #[test]
    fn detection_parses_from_config_strings() {
        assert_eq!("sweep".parse::<GapDetection>().unwrap(), GapDetection::SweepLine);
        assert_eq!("Adjacent".parse::<GapDetection>().unwrap(), GapDetection::AdjacentPairs);
        assert!("merge".parse::<GapDetection>().is_err());
    }
}
