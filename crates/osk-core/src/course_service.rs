//! Course creation, editing and the upcoming-courses view.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use osk_domain::{AppState, Course, DEFAULT_COURSE_COLOR};

use crate::availability::DateSelection;
use crate::format::format_date;
use crate::{CoreError, CoreResult};

pub const MSG_COURSE_NAME_REQUIRED: &str = "Proszę podać nazwę kursu.";
pub const MSG_COURSE_DATES_REQUIRED: &str = "Proszę wybrać co najmniej jeden dzień na kalendarzu.";
pub const MSG_INDIVIDUAL_COURSE_LOCKED: &str =
    "Rezerwację indywidualną zmienia się z poziomu rezerwacji.";
pub const UPCOMING_LIMIT: usize = 5;

/// Editable course details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDraft {
    pub name: String,
    pub slots: u32,
    pub info: String,
    pub color: String,
}

impl Default for CourseDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            slots: 0,
            info: String::new(),
            color: DEFAULT_COURSE_COLOR.into(),
        }
    }
}

impl CourseDraft {
    pub fn named(name: impl Into<String>, slots: u32) -> Self {
        Self {
            name: name.into(),
            slots,
            ..Self::default()
        }
    }

    pub fn from_course(course: &Course) -> Self {
        Self {
            name: course.name.clone(),
            slots: course.slots,
            info: course.info.clone(),
            color: course.color.clone(),
        }
    }
}

pub struct CourseService;

impl CourseService {
    /// Creates a course on the selected dates and returns its identifier.
    pub fn create(
        state: &mut AppState,
        draft: CourseDraft,
        selection: DateSelection,
    ) -> CoreResult<String> {
        if selection.is_empty() {
            return Err(CoreError::validation(MSG_COURSE_DATES_REQUIRED));
        }
        if draft.name.trim().is_empty() {
            return Err(CoreError::validation(MSG_COURSE_NAME_REQUIRED));
        }
        if let Some(date) = selection.conflicts(&state.courses).first() {
            return Err(CoreError::DateTaken(*date));
        }
        let course = Course::new(draft.name, draft.slots, selection.into_dates())
            .with_info(draft.info)
            .with_color(draft.color);
        let id = course.id.clone();
        tracing::info!(course = %id, dates = course.dates.len(), "course created");
        state.courses.push(course);
        Ok(id)
    }

    /// Replaces name, capacity, info and color. Dates and the reservation count stay.
    pub fn update_details(
        state: &mut AppState,
        course_id: &str,
        draft: CourseDraft,
    ) -> CoreResult<()> {
        if draft.name.trim().is_empty() {
            return Err(CoreError::validation(MSG_COURSE_NAME_REQUIRED));
        }
        let course = state
            .course_mut(course_id)
            .ok_or_else(|| CoreError::CourseNotFound(course_id.into()))?;
        if course.is_individual {
            return Err(CoreError::validation(MSG_INDIVIDUAL_COURSE_LOCKED));
        }
        course.name = draft.name;
        course.slots = draft.slots;
        course.info = draft.info;
        course.color = draft.color;
        Ok(())
    }

    /// Replaces the course's date set with the edited selection.
    pub fn update_dates(
        state: &mut AppState,
        course_id: &str,
        selection: DateSelection,
    ) -> CoreResult<()> {
        match state.course(course_id) {
            None => return Err(CoreError::CourseNotFound(course_id.into())),
            Some(course) if course.is_individual => {
                return Err(CoreError::validation(MSG_INDIVIDUAL_COURSE_LOCKED))
            }
            Some(_) => {}
        }
        if selection.editing() != Some(course_id) {
            return Err(CoreError::validation("Wybór dat nie dotyczy edytowanego kursu."));
        }
        if selection.is_empty() {
            return Err(CoreError::validation(MSG_COURSE_DATES_REQUIRED));
        }
        if let Some(date) = selection.conflicts(&state.courses).first() {
            return Err(CoreError::DateTaken(*date));
        }
        if let Some(course) = state.course_mut(course_id) {
            course.dates = selection.into_dates();
        }
        Ok(())
    }

    /// Removes a course. Reservations pointing at it keep the dangling reference.
    /// Individual booking days go away only with their reservation.
    pub fn delete(state: &mut AppState, course_id: &str) -> CoreResult<Course> {
        let position = state
            .courses
            .iter()
            .position(|course| course.id == course_id)
            .ok_or_else(|| CoreError::CourseNotFound(course_id.into()))?;
        if state.courses[position].is_individual {
            return Err(CoreError::validation(MSG_INDIVIDUAL_COURSE_LOCKED));
        }
        let removed = state.courses.remove(position);
        tracing::info!(course = %removed.id, "course deleted");
        Ok(removed)
    }

    /// Regular courses that have not started yet, soonest first.
    pub fn upcoming(state: &AppState, today: NaiveDate) -> Vec<&Course> {
        let mut upcoming: Vec<(NaiveDate, &Course)> = state
            .regular_courses()
            .filter_map(|course| course.earliest_date().map(|start| (start, course)))
            .filter(|(start, _)| *start >= today)
            .collect();
        upcoming.sort_by_key(|(start, _)| *start);
        upcoming
            .into_iter()
            .take(UPCOMING_LIMIT)
            .map(|(_, course)| course)
            .collect()
    }
}

/// `01.03.2024`, `01.03.2024 - 15.03.2024` or `Brak dat`.
pub fn course_term(dates: &BTreeSet<NaiveDate>) -> String {
    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) if first == last => format_date(*first),
        (Some(first), Some(last)) => format!("{} - {}", format_date(*first), format_date(*last)),
        _ => "Brak dat".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn selection(days: &[u32]) -> DateSelection {
        DateSelection::new().with_dates(days.iter().map(|d| day(*d)))
    }

    fn create(state: &mut AppState, name: &str, days: &[u32]) -> CoreResult<String> {
        CourseService::create(state, CourseDraft::named(name, 5), selection(days))
    }

    #[test]
    fn create_requires_name_and_dates() {
        let mut state = AppState::default();
        let err = create(&mut state, " ", &[1]).unwrap_err();
        assert_eq!(err.to_string(), MSG_COURSE_NAME_REQUIRED);
        let err = create(&mut state, "Kat B", &[]).unwrap_err();
        assert_eq!(err.to_string(), MSG_COURSE_DATES_REQUIRED);
        assert!(state.courses.is_empty());
    }

    #[test]
    fn create_rejects_taken_dates() {
        let mut state = AppState::default();
        create(&mut state, "Kat B", &[1, 2]).unwrap();
        let err = create(&mut state, "Kat A", &[2]).unwrap_err();
        assert!(matches!(err, CoreError::DateTaken(date) if date == day(2)));
    }

    #[test]
    fn update_dates_keeps_own_dates_available() {
        let mut state = AppState::default();
        let id = create(&mut state, "Kat B", &[1, 2]).unwrap();
        let mut edit = DateSelection::for_course(state.course(&id).unwrap());
        edit.toggle(&state.courses, day(1)).unwrap();
        edit.toggle(&state.courses, day(3)).unwrap();
        CourseService::update_dates(&mut state, &id, edit).unwrap();
        let dates: Vec<_> = state.course(&id).unwrap().dates.iter().copied().collect();
        assert_eq!(dates, vec![day(2), day(3)]);
    }

    #[test]
    fn individual_booking_days_cannot_be_changed_as_a_course() {
        let mut state = AppState::default();
        let mut shadow = Course::new("Indywidualny", 1, [day(10)]);
        shadow.is_individual = true;
        let shadow_id = shadow.id.clone();
        state.courses.push(shadow);

        let err = CourseService::update_details(
            &mut state,
            &shadow_id,
            CourseDraft::named("Renamed", 3),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), MSG_INDIVIDUAL_COURSE_LOCKED);

        let mut edit = DateSelection::for_course(state.course(&shadow_id).unwrap());
        edit.toggle(&state.courses, day(12)).unwrap();
        let err = CourseService::update_dates(&mut state, &shadow_id, edit).unwrap_err();
        assert_eq!(err.to_string(), MSG_INDIVIDUAL_COURSE_LOCKED);

        let err = CourseService::delete(&mut state, &shadow_id).unwrap_err();
        assert_eq!(err.to_string(), MSG_INDIVIDUAL_COURSE_LOCKED);

        let shadow = state.course(&shadow_id).unwrap();
        assert_eq!(shadow.name, "Indywidualny");
        assert_eq!(shadow.dates.iter().copied().collect::<Vec<_>>(), vec![day(10)]);
        let err = create(&mut state, "Kat A", &[10]).unwrap_err();
        assert!(matches!(err, CoreError::DateTaken(date) if date == day(10)));
    }

    #[test]
    fn upcoming_skips_started_and_individual_courses() {
        let mut state = AppState::default();
        state.courses.push(Course::new("Past", 1, [day(1)]));
        state.courses.push(Course::new("Later", 1, [day(20)]));
        state.courses.push(Course::new("Soon", 1, [day(10), day(30)]));
        let mut shadow = Course::new("Ind", 1, [day(11)]);
        shadow.is_individual = true;
        state.courses.push(shadow);
        let names: Vec<_> = CourseService::upcoming(&state, day(5))
            .iter()
            .map(|course| course.name.as_str())
            .collect();
        assert_eq!(names, vec!["Soon", "Later"]);
    }

    #[test]
    fn term_labels() {
        assert_eq!(course_term(&BTreeSet::new()), "Brak dat");
        assert_eq!(course_term(&BTreeSet::from([day(1)])), "01.03.2024");
        assert_eq!(
            course_term(&BTreeSet::from([day(15), day(1)])),
            "01.03.2024 - 15.03.2024"
        );
    }
}
