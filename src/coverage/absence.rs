// src/coverage/absence.rs

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::PorterAssignment;

/// Answers whether a porter is on leave on a given date.
pub trait AbsenceFilter {
    fn is_porter_absent(&self, porter_id: &str, date: NaiveDate) -> bool;
}

impl<F> AbsenceFilter for F
where
    F: Fn(&str, NaiveDate) -> bool,
{
    fn is_porter_absent(&self, porter_id: &str, date: NaiveDate) -> bool {
        self(porter_id, date)
    }
}

/// Everyone is always present.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAbsences;

impl AbsenceFilter for NoAbsences {
    fn is_porter_absent(&self, _porter_id: &str, _date: NaiveDate) -> bool {
        false
    }
}

/// A leave period, inclusive at both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PorterAbsence {
    pub porter_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub absence_type: Option<String>,
}

impl PorterAbsence {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[derive(Debug, Clone, Default)]
pub struct AbsenceCalendar {
    absences: Vec<PorterAbsence>,
}

impl AbsenceCalendar {
    pub fn new(absences: Vec<PorterAbsence>) -> Self {
        Self { absences }
    }

    pub fn push(&mut self, absence: PorterAbsence) {
        self.absences.push(absence);
    }

    pub fn len(&self) -> usize {
        self.absences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.absences.is_empty()
    }

    /// The first recorded absence of `porter_id` covering `date`.
    pub fn absence_for(&self, porter_id: &str, date: NaiveDate) -> Option<&PorterAbsence> {
        self.absences.iter().find(|a| a.porter_id == porter_id && a.covers(date))
    }
}

impl AbsenceFilter for AbsenceCalendar {
    fn is_porter_absent(&self, porter_id: &str, date: NaiveDate) -> bool {
        self.absence_for(porter_id, date).is_some()
    }
}

/// Assignments whose porter is present on `date`.
pub fn present_assignments<F>(assignments: &[PorterAssignment], date: NaiveDate, filter: &F) -> Vec<PorterAssignment>
where
    F: AbsenceFilter + ?Sized,
{
    assignments
        .iter()
        .filter(|a| !filter.is_porter_absent(&a.porter_id, date))
        .cloned()
        .collect()
}

/// One entry per continuous stretch each porter is on duty: a porter's
/// overlapping or back-to-back assignments collapse into one, so a porter
/// booked twice still counts once. Output is ordered by porter, then start.
pub fn merge_porter_assignments(assignments: &[PorterAssignment]) -> Vec<PorterAssignment> {
    let mut by_porter: BTreeMap<&str, Vec<&PorterAssignment>> = BTreeMap::new();
    for a in assignments {
        by_porter.entry(a.porter_id.as_str()).or_default().push(a);
    }

    let mut merged = Vec::with_capacity(assignments.len());
    for (porter_id, mut spans) in by_porter {
        spans.sort_by_key(|a| (a.start_time, a.end_time));
        let mut current: Option<PorterAssignment> = None;
        for span in spans {
            match current.as_mut() {
                Some(open) if span.start_time <= open.end_time => {
                    open.end_time = open.end_time.max(span.end_time);
                }
                _ => {
                    merged.extend(current.take());
                    current = Some(PorterAssignment::new(porter_id, span.start_time, span.end_time));
                }
            }
        }
        merged.extend(current);
    }
    merged
}

/// Distinct porters dropped from `assignments` on `date`, in id order.
pub fn absent_porters<F>(assignments: &[PorterAssignment], date: NaiveDate, filter: &F) -> Vec<String>
where
    F: AbsenceFilter + ?Sized,
{
    assignments
        .iter()
        .filter(|a| filter.is_porter_absent(&a.porter_id, date))
        .map(|a| a.porter_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::TimeOfDay;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn leave(porter: &str, from: &str, to: &str) -> PorterAbsence {
        PorterAbsence { porter_id: porter.into(), start_date: d(from), end_date: d(to), absence_type: None }
    }

    #[test]
    fn absence_range_is_inclusive() {
        let cal = AbsenceCalendar::new(vec![leave("p1", "2026-10-10", "2026-10-12")]);
        assert!(!cal.is_porter_absent("p1", d("2026-10-09")));
        assert!(cal.is_porter_absent("p1", d("2026-10-10")));
        assert!(cal.is_porter_absent("p1", d("2026-10-12")));
        assert!(!cal.is_porter_absent("p1", d("2026-10-13")));
        assert!(!cal.is_porter_absent("p2", d("2026-10-11")));
    }

    #[test]
    fn absent_porters_are_dropped_entirely() {
        let nine = TimeOfDay::parse("09:00").unwrap();
        let five = TimeOfDay::parse("17:00").unwrap();
        let assignments = vec![
            PorterAssignment::new("p1", nine, five),
            PorterAssignment::new("p2", nine, five),
            PorterAssignment::new("p1", nine, five),
        ];
        let cal = AbsenceCalendar::new(vec![leave("p1", "2026-10-01", "2026-10-31")]);
        let kept = present_assignments(&assignments, d("2026-10-19"), &cal);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].porter_id, "p2");
        assert_eq!(absent_porters(&assignments, d("2026-10-19"), &cal), vec!["p1".to_string()]);
    }

    #[test]
    fn porter_bookings_merge_only_when_continuous() {
        let t = |s: &str| TimeOfDay::parse(s).unwrap();
        let assignments = vec![
            PorterAssignment::new("p2", t("08:00"), t("10:00")),
            PorterAssignment::new("p1", t("12:00"), t("16:00")),
            PorterAssignment::new("p1", t("08:00"), t("12:00")),
            PorterAssignment::new("p1", t("09:00"), t("10:00")),
            PorterAssignment::new("p2", t("13:00"), t("15:00")),
        ];
        assert_eq!(
            merge_porter_assignments(&assignments),
            vec![
                PorterAssignment::new("p1", t("08:00"), t("16:00")),
                PorterAssignment::new("p2", t("08:00"), t("10:00")),
                PorterAssignment::new("p2", t("13:00"), t("15:00")),
            ]
        );
        assert!(merge_porter_assignments(&[]).is_empty());
    }

    #[test]
    fn calendar_grows_as_absences_are_recorded() {
        let mut cal = AbsenceCalendar::default();
        assert!(cal.is_empty());
        cal.push(leave("p1", "2026-10-19", "2026-10-19"));
        cal.push(leave("p1", "2026-10-01", "2026-10-31"));
        assert_eq!(cal.len(), 2);
        assert_eq!(cal.absence_for("p1", d("2026-10-19")), Some(&leave("p1", "2026-10-19", "2026-10-19")));
        assert_eq!(cal.absence_for("p1", d("2026-10-20")).map(|a| a.end_date), Some(d("2026-10-31")));
    }

    #[test]
    fn closures_work_as_filters() {
        let only_p2 = |id: &str, _date: NaiveDate| id == "p2";
        assert!(only_p2.is_porter_absent("p2", d("2026-01-01")));
        assert!(!NoAbsences.is_porter_absent("p2", d("2026-01-01")));
    }
}
