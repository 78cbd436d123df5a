//! Planning, editing and unplanning instructor sessions.

use chrono::NaiveDate;
use osk_domain::{AppState, EntryPatch, ScheduleEntry, TimeOfDay};

use crate::reconcile::{scheduled_items, ScheduledItem};
use crate::{CoreError, CoreResult};

/// Requested session for a reservation date. Unset fields take the planning defaults.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub date: NaiveDate,
    pub reservation_id: String,
    pub instructor_id: Option<String>,
    pub start_time: Option<TimeOfDay>,
    pub end_time: Option<TimeOfDay>,
    pub description: Option<String>,
}

impl PlanRequest {
    pub fn new(date: NaiveDate, reservation_id: impl Into<String>) -> Self {
        Self {
            date,
            reservation_id: reservation_id.into(),
            instructor_id: None,
            start_time: None,
            end_time: None,
            description: None,
        }
    }
}

pub fn default_start_time() -> TimeOfDay {
    TimeOfDay::new(8, 0).unwrap_or_default()
}

pub fn default_end_time() -> TimeOfDay {
    TimeOfDay::new(10, 0).unwrap_or_default()
}

/// Manages the date-keyed instructor schedule.
///
/// Sessions are not checked for overlaps; an instructor may be double-booked.
pub struct ScheduleService;

impl ScheduleService {
    /// Creates a schedule entry and returns its identifier.
    pub fn plan(state: &mut AppState, request: PlanRequest) -> CoreResult<String> {
        let date = request.date;
        let student_name = state
            .reservation(&request.reservation_id)
            .map(|reservation| reservation.student.name.clone())
            .ok_or_else(|| CoreError::ReservationNotFound(request.reservation_id.clone()))?;
        let instructor_id = match request.instructor_id {
            Some(id) => {
                if state.instructor(&id).is_none() {
                    return Err(CoreError::InstructorNotFound(id));
                }
                id
            }
            None => state
                .instructors
                .first()
                .map(|instructor| instructor.id.clone())
                .ok_or_else(|| CoreError::validation("Brak instruktorów do przypisania."))?,
        };
        let entry = ScheduleEntry::new(
            instructor_id,
            request.reservation_id,
            request.start_time.unwrap_or_else(default_start_time),
            request.end_time.unwrap_or_else(default_end_time),
            request
                .description
                .unwrap_or_else(|| format!("Jazda - {student_name}")),
        );
        let id = entry.id.clone();
        tracing::debug!(%date, entry = %id, instructor = %entry.instructor_id, "planned session");
        state.schedule.add_entry(date, entry);
        Ok(id)
    }

    /// Edits instructor, times or description. The linked reservation stays.
    pub fn update(
        state: &mut AppState,
        date: NaiveDate,
        entry_id: &str,
        patch: &EntryPatch,
    ) -> CoreResult<()> {
        if let Some(instructor_id) = &patch.instructor_id {
            if state.instructor(instructor_id).is_none() {
                return Err(CoreError::InstructorNotFound(instructor_id.clone()));
            }
        }
        state
            .schedule
            .update_entry(date, entry_id, patch)
            .ok_or_else(|| CoreError::EntryNotFound(entry_id.into()))?;
        Ok(())
    }

    /// Removes an entry, returning it. Its date drops out of the schedule once empty.
    pub fn unplan(
        state: &mut AppState,
        date: NaiveDate,
        entry_id: &str,
    ) -> CoreResult<ScheduleEntry> {
        let removed = state
            .schedule
            .remove_entry(date, entry_id)
            .ok_or_else(|| CoreError::EntryNotFound(entry_id.into()))?;
        tracing::debug!(%date, entry = %entry_id, "unplanned session");
        Ok(removed)
    }

    /// Locates an entry by id anywhere in the schedule.
    pub fn locate(state: &AppState, entry_id: &str) -> CoreResult<NaiveDate> {
        state
            .schedule
            .find(entry_id)
            .map(|(date, _)| date)
            .ok_or_else(|| CoreError::EntryNotFound(entry_id.into()))
    }

    /// Sessions of one instructor, ordered by date and start time.
    pub fn for_instructor<'a>(
        state: &'a AppState,
        instructor_id: &str,
    ) -> Vec<ScheduledItem<'a>> {
        scheduled_items(&state.schedule)
            .into_iter()
            .filter(|item| item.entry.instructor_id == instructor_id)
            .collect()
    }
}
