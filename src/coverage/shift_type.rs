// src/coverage/shift_type.rs

use serde::{Deserialize, Serialize};

use super::{TimeOfDay, MINUTES_PER_DAY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftType {
    Day,
    Night,
    Unknown,
}

/// A daily time range; `end < start` means it runs past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftWindow {
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl ShiftWindow {
    pub fn new(start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
        Self { start_time, end_time }
    }

    pub fn crosses_midnight(&self) -> bool {
        self.start_time > self.end_time
    }

    /// Same-day pieces as half-open minute ranges.
    fn pieces(&self) -> Vec<(u32, u32)> {
        let (s, e) = (self.start_time.minutes(), self.end_time.minutes());
        if self.crosses_midnight() {
            vec![(s, MINUTES_PER_DAY), (0, e)]
        } else {
            vec![(s, e)]
        }
    }

    /// Minutes both ranges have in common within a day.
    pub fn overlap_minutes(&self, other: &ShiftWindow) -> u32 {
        let theirs = other.pieces();
        self.pieces()
            .iter()
            .flat_map(|a| theirs.iter().map(move |b| (a, b)))
            .map(|(a, b)| a.1.min(b.1).saturating_sub(a.0.max(b.0)))
            .sum()
    }
}

/// The weekday day/night defaults porters are compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShiftDefaults {
    pub day: Option<ShiftWindow>,
    pub night: Option<ShiftWindow>,
}

/// Day or night, by which default the contracted hours overlap more.
/// Missing hours, missing defaults or an exact tie give `Unknown`.
pub fn classify_shift(contracted: Option<ShiftWindow>, defaults: &ShiftDefaults) -> ShiftType {
    let (Some(hours), Some(day), Some(night)) = (contracted, defaults.day, defaults.night) else {
        return ShiftType::Unknown;
    };
    let day_overlap = hours.overlap_minutes(&day);
    let night_overlap = hours.overlap_minutes(&night);

    match day_overlap.cmp(&night_overlap) {
        std::cmp::Ordering::Greater => ShiftType::Day,
        std::cmp::Ordering::Less => ShiftType::Night,
        std::cmp::Ordering::Equal => ShiftType::Unknown,
    }
}
