use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use osk_domain::{AppState, Booking};

use crate::CoreResult;

/// Abstraction over persistence backends holding the single application state document.
pub trait StateStorage: Send + Sync {
    /// Returns `None` when nothing has been stored yet.
    fn load(&self) -> CoreResult<Option<AppState>>;
    fn save(&self, state: &AppState) -> CoreResult<()>;
    /// Writes a dated backup of `state` into `directory` and returns the file path.
    fn export_backup(
        &self,
        state: &AppState,
        directory: &Path,
        date: NaiveDate,
    ) -> CoreResult<PathBuf>;
    /// Parses a backup file. Nothing is applied here; callers replace their state on success.
    fn import_from_path(&self, path: &Path) -> CoreResult<AppState>;
}

/// Detects dangling references and other anomalies within a state snapshot.
pub fn state_warnings(state: &AppState) -> Vec<String> {
    let course_ids: HashSet<&str> = state.courses.iter().map(|c| c.id.as_str()).collect();
    let reservation_ids: HashSet<&str> =
        state.reservations.iter().map(|r| r.id.as_str()).collect();
    let instructor_ids: HashSet<&str> = state.instructors.iter().map(|i| i.id.as_str()).collect();
    let mut warnings = Vec::new();

    for reservation in &state.reservations {
        if let Booking::Course { course_id } = &reservation.booking {
            if !course_ids.contains(course_id.as_str()) {
                warnings.push(format!(
                    "reservation {} references unknown course {}",
                    reservation.id, course_id
                ));
            }
        }
    }
    for course in state.courses.iter().filter(|c| c.is_individual) {
        let owner = course.reservation_id.as_deref().unwrap_or_default();
        if !reservation_ids.contains(owner) {
            warnings.push(format!(
                "individual course {} has no matching reservation",
                course.id
            ));
        }
    }
    for (date, entry) in state.schedule.iter() {
        if !reservation_ids.contains(entry.reservation_id.as_str()) {
            warnings.push(format!(
                "schedule entry {} on {} references unknown reservation {}",
                entry.id, date, entry.reservation_id
            ));
        }
        if !instructor_ids.contains(entry.instructor_id.as_str()) {
            warnings.push(format!(
                "schedule entry {} on {} references unknown instructor {}",
                entry.id, date, entry.instructor_id
            ));
        }
    }
    let mut claimed: HashSet<NaiveDate> = HashSet::new();
    for course in &state.courses {
        for date in &course.dates {
            if !claimed.insert(*date) {
                warnings.push(format!("date {date} is claimed by more than one course"));
            }
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use osk_domain::{Course, Reservation, ScheduleEntry, Student};

    #[test]
    fn warnings_flag_dangling_references() {
        let mut state = AppState::default();
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        state.courses.push(Course::new("A", 1, [day]));
        state.courses.push(Course::new("B", 1, [day]));
        state.reservations.push(Reservation::new(
            Booking::Course {
                course_id: "missing".into(),
            },
            Student::new("Jan", "1"),
        ));
        state.schedule.add_entry(
            day,
            ScheduleEntry::new(
                "ghost",
                "nobody",
                "08:00".parse().unwrap(),
                "10:00".parse().unwrap(),
                "",
            ),
        );
        let warnings = state_warnings(&state);
        assert_eq!(warnings.len(), 4, "{warnings:?}");
        assert!(state_warnings(&AppState::default()).is_empty());
    }
}
