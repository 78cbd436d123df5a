//! Booking students into courses or individual dates.

use osk_domain::{AppState, Booking, Course, CourseCategory, Reservation, Student};

use crate::availability::DateSelection;
use crate::{CoreError, CoreResult};

pub const MSG_COURSE_REQUIRED: &str = "Proszę wybrać kurs.";
pub const MSG_COURSE_UNAVAILABLE: &str = "Wybrany kurs jest pełny lub nie istnieje.";
pub const MSG_INDIVIDUAL_DATES_REQUIRED: &str =
    "Proszę wybrać przynajmniej jeden dzień w kalendarzu dla rezerwacji indywidualnej.";
pub const MSG_STUDENT_REQUIRED: &str = "Proszę podać imię i nazwisko oraz numer telefonu kursanta.";

/// Student details and payment captured by the reservation form.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationForm {
    pub student: Student,
    pub category: CourseCategory,
    pub advance_paid: bool,
    pub advance_amount: f64,
}

impl ReservationForm {
    /// Empty form pre-filled with the school's default advance.
    pub fn new(state: &AppState) -> Self {
        Self {
            student: Student::default(),
            category: CourseCategory::default(),
            advance_paid: false,
            advance_amount: state.default_advance_amount,
        }
    }

    pub fn with_student(mut self, student: Student) -> Self {
        self.student = student;
        self
    }

    fn validate(&self) -> CoreResult<()> {
        if self.student.name.trim().is_empty() || self.student.phone.trim().is_empty() {
            return Err(CoreError::validation(MSG_STUDENT_REQUIRED));
        }
        if self.advance_paid && !(self.advance_amount.is_finite() && self.advance_amount >= 0.0) {
            return Err(CoreError::validation("Kwota zaliczki nie może być ujemna."));
        }
        Ok(())
    }
}

/// What the new reservation is attached to.
#[derive(Debug, Clone)]
pub enum BookingRequest {
    Course(String),
    Individual(DateSelection),
}

pub struct ReservationService;

impl ReservationService {
    /// Books the student and returns the reservation id.
    ///
    /// A course booking takes one seat. An individual booking also registers a
    /// shadow course so its dates show as occupied.
    pub fn create(
        state: &mut AppState,
        form: ReservationForm,
        request: BookingRequest,
    ) -> CoreResult<String> {
        form.validate()?;
        match request {
            BookingRequest::Course(course_id) => Self::book_course(state, form, course_id),
            BookingRequest::Individual(selection) => Self::book_individual(state, form, selection),
        }
    }

    fn book_course(
        state: &mut AppState,
        form: ReservationForm,
        course_id: String,
    ) -> CoreResult<String> {
        if course_id.trim().is_empty() {
            return Err(CoreError::validation(MSG_COURSE_REQUIRED));
        }
        let course = state
            .course_mut(&course_id)
            .filter(|course| !course.is_individual && course.has_free_slot())
            .ok_or_else(|| CoreError::validation(MSG_COURSE_UNAVAILABLE))?;
        course.slots -= 1;
        course.reservations += 1;

        let reservation = build(form, Booking::Course { course_id });
        let id = reservation.id.clone();
        tracing::info!(reservation = %id, "course reservation created");
        state.reservations.push(reservation);
        Ok(id)
    }

    fn book_individual(
        state: &mut AppState,
        form: ReservationForm,
        selection: DateSelection,
    ) -> CoreResult<String> {
        if selection.is_empty() {
            return Err(CoreError::validation(MSG_INDIVIDUAL_DATES_REQUIRED));
        }
        if let Some(date) = selection.conflicts(&state.courses).first() {
            return Err(CoreError::DateTaken(*date));
        }
        let dates = selection.into_dates();
        let category = form.category;
        let reservation = build(
            form,
            Booking::Individual {
                dates: dates.clone(),
            },
        );
        let shadow = Course::individual_for(&reservation.id, &reservation.student, category, dates);
        let id = reservation.id.clone();
        tracing::info!(reservation = %id, shadow = %shadow.id, "individual reservation created");
        state.reservations.push(reservation);
        state.courses.push(shadow);
        Ok(id)
    }

    /// Deletes a reservation and everything hanging off it: the course seat is
    /// returned, a shadow course is dropped, and its schedule entries go away.
    pub fn remove(state: &mut AppState, reservation_id: &str) -> CoreResult<Reservation> {
        let position = state
            .reservations
            .iter()
            .position(|reservation| reservation.id == reservation_id)
            .ok_or_else(|| CoreError::ReservationNotFound(reservation_id.into()))?;
        let removed = state.reservations.remove(position);

        match &removed.booking {
            Booking::Course { course_id } => {
                if let Some(course) = state.course_mut(course_id) {
                    course.slots += 1;
                    course.reservations = course.reservations.saturating_sub(1);
                }
            }
            Booking::Individual { .. } => state.courses.retain(|course| {
                !(course.is_individual && course.reservation_id.as_deref() == Some(reservation_id))
            }),
            Booking::Unassigned => {}
        }
        let entries = state.schedule.remove_reservation(reservation_id);
        tracing::info!(reservation = %reservation_id, entries, "reservation removed");
        Ok(removed)
    }

    /// Courses a student can still join.
    pub fn available_courses(state: &AppState) -> Vec<&Course> {
        state
            .regular_courses()
            .filter(|course| course.has_free_slot())
            .collect()
    }

    /// Reservations whose student matches `needle`; an empty needle returns all.
    pub fn search<'a>(state: &'a AppState, needle: &str) -> Vec<&'a Reservation> {
        let needle = needle.trim();
        state
            .reservations
            .iter()
            .filter(|reservation| needle.is_empty() || reservation.student.matches(needle))
            .collect()
    }
}

fn build(form: ReservationForm, booking: Booking) -> Reservation {
    Reservation::new(booking, form.student)
        .with_category(form.category)
        .with_advance(form.advance_paid, form.advance_amount)
}
