//! The full persisted application state.

use serde::{Deserialize, Serialize};

use crate::course::Course;
use crate::instructor::{default_instructors, Instructor};
use crate::reservation::Reservation;
use crate::schedule::ScheduleTable;
use crate::settings::{CoursePrices, OperatingHours};

pub const DEFAULT_APP_TITLE: &str = "Osk Menager";
pub const DEFAULT_ADVANCE_AMOUNT: f64 = 300.0;

/// Everything the school keeps: courses, reservations, staff, calendar and pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StateDocument")]
pub struct AppState {
    pub app_title: String,
    pub courses: Vec<Course>,
    pub reservations: Vec<Reservation>,
    pub instructors: Vec<Instructor>,
    pub schedule: ScheduleTable,
    pub course_prices: CoursePrices,
    pub operating_hours: OperatingHours,
    pub default_advance_amount: f64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            app_title: DEFAULT_APP_TITLE.into(),
            courses: Vec::new(),
            reservations: Vec::new(),
            instructors: default_instructors(),
            schedule: ScheduleTable::new(),
            course_prices: CoursePrices::default(),
            operating_hours: OperatingHours::default(),
            default_advance_amount: DEFAULT_ADVANCE_AMOUNT,
        }
    }
}

impl AppState {
    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|course| course.id == id)
    }

    pub fn course_mut(&mut self, id: &str) -> Option<&mut Course> {
        self.courses.iter_mut().find(|course| course.id == id)
    }

    pub fn reservation(&self, id: &str) -> Option<&Reservation> {
        self.reservations.iter().find(|reservation| reservation.id == id)
    }

    pub fn reservation_mut(&mut self, id: &str) -> Option<&mut Reservation> {
        self.reservations
            .iter_mut()
            .find(|reservation| reservation.id == id)
    }

    pub fn instructor(&self, id: &str) -> Option<&Instructor> {
        self.instructors
            .iter()
            .find(|instructor| instructor.id == id)
    }

    /// Courses open for booking, shadow courses excluded.
    pub fn regular_courses(&self) -> impl Iterator<Item = &Course> + '_ {
        self.courses.iter().filter(|course| !course.is_individual)
    }
}

/// Lenient input shape: every top-level field may be missing or null.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StateDocument {
    app_title: Option<String>,
    courses: Option<Vec<Course>>,
    reservations: Option<Vec<Reservation>>,
    instructors: Option<Vec<Instructor>>,
    schedule: Option<ScheduleTable>,
    course_prices: Option<CoursePrices>,
    operating_hours: Option<OperatingHours>,
    default_advance_amount: Option<f64>,
}

impl From<StateDocument> for AppState {
    fn from(doc: StateDocument) -> Self {
        let defaults = AppState::default();
        Self {
            app_title: doc.app_title.unwrap_or(defaults.app_title),
            courses: doc.courses.unwrap_or(defaults.courses),
            reservations: doc.reservations.unwrap_or(defaults.reservations),
            instructors: doc.instructors.unwrap_or(defaults.instructors),
            schedule: doc.schedule.unwrap_or(defaults.schedule),
            course_prices: doc.course_prices.unwrap_or(defaults.course_prices),
            operating_hours: doc.operating_hours.unwrap_or(defaults.operating_hours),
            default_advance_amount: doc
                .default_advance_amount
                .unwrap_or(defaults.default_advance_amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_and_null_fields_fall_back_to_defaults() {
        let state: AppState = serde_json::from_value(json!({
            "appTitle": "Szkoła",
            "instructors": null,
            "coursePrices": {"A": 1000}
        }))
        .unwrap();
        assert_eq!(state.app_title, "Szkoła");
        assert_eq!(state.instructors.len(), 4);
        assert_eq!(state.course_prices.a, 1000.0);
        assert_eq!(state.course_prices.b, 0.0);
        assert_eq!(state.default_advance_amount, DEFAULT_ADVANCE_AMOUNT);
        assert!(state.schedule.is_empty());
    }

    #[test]
    fn serialized_state_uses_camel_case_keys() {
        let value = serde_json::to_value(AppState::default()).unwrap();
        assert_eq!(value["appTitle"], DEFAULT_APP_TITLE);
        assert_eq!(value["operatingHours"]["start"], "08:00");
        assert_eq!(value["coursePrices"]["D"], 6000.0);
        assert_eq!(value["defaultAdvanceAmount"], 300.0);
    }
}
