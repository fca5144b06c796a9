// src/coverage/shortages.rs

use super::sweep::segments;
use super::{CoverageWindow, PorterAssignment, Shortage, ShortageReport};

/// Segments of `window` where fewer than `minimum_required` porters are
/// active. One record per segment; neighbouring short segments stay separate.
pub fn staffing_shortages(window: &CoverageWindow, assignments: &[PorterAssignment]) -> ShortageReport {
    let required = window.minimum_required;
    if required == 0 {
        return ShortageReport::default();
    }

    if assignments.is_empty() {
        return ShortageReport::from_shortages(vec![Shortage::new(
            window.start_time,
            window.end_time,
            0,
            required,
        )]);
    }

    let shortages = segments(window, assignments)
        .into_iter()
        .filter_map(|seg| {
            let active = u32::try_from(seg.active).unwrap_or(u32::MAX);
            (active < required).then(|| Shortage::new(seg.start, seg.end, active, required))
        })
        .collect();
    ShortageReport::from_shortages(shortages)
}
