// src/coverage/issues.rs

use super::{CoverageIssue, GapReport, IssueReport, ShortageReport};

/// Gaps followed by shortages, stably sorted by start time. A fully uncovered
/// stretch shows up twice: once as a gap, once as a zero-porter shortage.
pub fn coverage_issues(gaps: &GapReport, shortages: &ShortageReport) -> IssueReport {
    let mut issues: Vec<CoverageIssue> = gaps
        .gaps
        .iter()
        .cloned()
        .map(CoverageIssue::Gap)
        .chain(shortages.shortages.iter().cloned().map(CoverageIssue::Shortage))
        .collect();
    issues.sort_by_key(CoverageIssue::start_time);

    IssueReport { has_issues: !issues.is_empty(), issues }
}
