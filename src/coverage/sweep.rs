// src/coverage/sweep.rs

use super::{CoverageWindow, PorterAssignment, TimeOfDay};

/// Minimal sub-interval of a window with a constant active headcount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Segment {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub active: usize,
}

/// Cuts the window at every assignment boundary that falls inside it and
/// counts, per piece, the assignments spanning that whole piece.
pub(crate) fn segments(window: &CoverageWindow, assignments: &[PorterAssignment]) -> Vec<Segment> {
    let (start, end) = (window.start_time, window.end_time);

    let mut points = vec![start, end];
    for a in assignments {
        for p in [a.start_time, a.end_time] {
            if p >= start && p <= end {
                points.push(p);
            }
        }
    }
    points.sort();
    points.dedup();

    points
        .windows(2)
        .filter(|pair| pair[0] != pair[1])
        .map(|pair| Segment {
            start: pair[0],
            end: pair[1],
            active: assignments.iter().filter(|a| a.spans(pair[0], pair[1])).count(),
        })
        .collect()
}
