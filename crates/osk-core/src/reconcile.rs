//! Reservation dates versus the instructor schedule.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use osk_domain::{AppState, Booking, Course, Reservation, ScheduleEntry, ScheduleTable};

use crate::CoreError;

pub const UNASSIGNED_LABEL: &str = "Nie przypisano";

/// Dates a reservation needs driving sessions on.
///
/// Course bookings whose course no longer exists yield no dates.
pub fn relevant_dates(reservation: &Reservation, courses: &[Course]) -> BTreeSet<NaiveDate> {
    match &reservation.booking {
        Booking::Individual { dates } => dates.clone(),
        Booking::Course { course_id } => courses
            .iter()
            .find(|course| &course.id == course_id)
            .map(|course| course.dates.clone())
            .unwrap_or_default(),
        Booking::Unassigned => BTreeSet::new(),
    }
}

/// Course column label for a reservation.
pub fn booking_label(reservation: &Reservation, courses: &[Course]) -> String {
    match &reservation.booking {
        Booking::Individual { .. } => {
            format!("Indywidualny - {}", reservation.effective_category())
        }
        Booking::Course { course_id } => courses
            .iter()
            .find(|course| &course.id == course_id)
            .map(|course| course.name.clone())
            .unwrap_or_else(|| UNASSIGNED_LABEL.into()),
        Booking::Unassigned => UNASSIGNED_LABEL.into(),
    }
}

/// A reservation date still waiting for an instructor session.
#[derive(Debug, Clone, Copy)]
pub struct UnscheduledItem<'a> {
    pub date: NaiveDate,
    pub reservation: &'a Reservation,
}

/// A planned session with its calendar date.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledItem<'a> {
    pub date: NaiveDate,
    pub entry: &'a ScheduleEntry,
}

/// Every (reservation, date) pair lacking a schedule entry, ordered by date.
///
/// Pairs on the same date keep reservation order.
pub fn unscheduled_items(state: &AppState) -> Vec<UnscheduledItem<'_>> {
    let mut items: Vec<UnscheduledItem<'_>> = state
        .reservations
        .iter()
        .flat_map(|reservation| {
            relevant_dates(reservation, &state.courses)
                .into_iter()
                .filter(move |date| !state.schedule.has_entry_for(*date, &reservation.id))
                .map(move |date| UnscheduledItem { date, reservation })
        })
        .collect();
    items.sort_by_key(|item| item.date);
    items
}

/// The whole schedule flattened and ordered by date, then start time.
pub fn scheduled_items(schedule: &ScheduleTable) -> Vec<ScheduledItem<'_>> {
    let mut items: Vec<ScheduledItem<'_>> = schedule
        .iter()
        .map(|(date, entry)| ScheduledItem { date, entry })
        .collect();
    items.sort_by_key(|item| (item.date, item.entry.start_time));
    items
}

/// Split of one reservation's dates into planned and unplanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationPlan {
    pub reservation_id: String,
    pub scheduled: Vec<NaiveDate>,
    pub unscheduled: Vec<NaiveDate>,
}

impl ReservationPlan {
    pub fn total(&self) -> usize {
        self.scheduled.len() + self.unscheduled.len()
    }

    pub fn is_complete(&self) -> bool {
        self.unscheduled.is_empty()
    }
}

pub fn reconcile_reservation(
    state: &AppState,
    reservation_id: &str,
) -> Result<ReservationPlan, CoreError> {
    let reservation = state
        .reservation(reservation_id)
        .ok_or_else(|| CoreError::ReservationNotFound(reservation_id.into()))?;
    let (scheduled, unscheduled): (Vec<NaiveDate>, Vec<NaiveDate>) =
        relevant_dates(reservation, &state.courses)
            .into_iter()
            .partition(|date| state.schedule.has_entry_for(*date, &reservation.id));
    Ok(ReservationPlan {
        reservation_id: reservation.id.clone(),
        scheduled,
        unscheduled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use osk_domain::{CourseCategory, Student, TimeOfDay};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn time(raw: &str) -> TimeOfDay {
        raw.parse().unwrap()
    }

    #[test]
    fn dangling_course_reference_yields_no_dates_and_fallback_label() {
        let reservation = Reservation::new(
            Booking::Course {
                course_id: "gone".into(),
            },
            Student::new("Jan", "600"),
        );
        assert!(relevant_dates(&reservation, &[]).is_empty());
        assert_eq!(booking_label(&reservation, &[]), UNASSIGNED_LABEL);
    }

    #[test]
    fn individual_label_uses_category() {
        let reservation = Reservation::new(
            Booking::Individual {
                dates: BTreeSet::from([day(5)]),
            },
            Student::new("Ola", "700"),
        )
        .with_category(CourseCategory::C);
        assert_eq!(booking_label(&reservation, &[]), "Indywidualny - C");
    }

    #[test]
    fn unscheduled_items_are_stable_by_date() {
        let mut state = AppState::default();
        let first = Reservation::new(
            Booking::Individual {
                dates: BTreeSet::from([day(3), day(1)]),
            },
            Student::new("A", "1"),
        );
        let second = Reservation::new(
            Booking::Individual {
                dates: BTreeSet::from([day(1)]),
            },
            Student::new("B", "2"),
        );
        let (first_id, second_id) = (first.id.clone(), second.id.clone());
        state.reservations = vec![first, second];

        let items = unscheduled_items(&state);
        let order: Vec<_> = items
            .iter()
            .map(|item| (item.date, item.reservation.id.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (day(1), first_id.as_str()),
                (day(1), second_id.as_str()),
                (day(3), first_id.as_str()),
            ]
        );
    }

    #[test]
    fn scheduled_items_sort_by_start_within_day() {
        let mut schedule = ScheduleTable::new();
        schedule.add_entry(
            day(2),
            ScheduleEntry::new("inst1", "r", time("12:00"), time("14:00"), ""),
        );
        schedule.add_entry(
            day(2),
            ScheduleEntry::new("inst1", "r", time("08:00"), time("10:00"), ""),
        );
        schedule.add_entry(
            day(1),
            ScheduleEntry::new("inst1", "r", time("16:00"), time("18:00"), ""),
        );
        let starts: Vec<_> = scheduled_items(&schedule)
            .iter()
            .map(|item| (item.date, item.entry.start_time.to_string()))
            .collect();
        assert_eq!(
            starts,
            vec![
                (day(1), "16:00".to_string()),
                (day(2), "08:00".to_string()),
                (day(2), "12:00".to_string()),
            ]
        );
    }
}
