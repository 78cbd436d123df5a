//! Course offerings occupying one or more calendar dates.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::{date_set, new_id, Displayable, Identifiable, NamedEntity};
use crate::reservation::{CourseCategory, Student};

pub const DEFAULT_COURSE_COLOR: &str = "#d32f2f";
pub const INDIVIDUAL_COURSE_COLOR: &str = "#757575";
pub const INDIVIDUAL_COURSE_PREFIX: &str = "ind-";

/// A scheduled group offering with a slot capacity.
///
/// Individual bookings are mirrored by a shadow course (`is_individual`) so the
/// calendar treats their dates as occupied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slots: u32,
    #[serde(default)]
    pub info: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default, deserialize_with = "date_set::deserialize")]
    pub dates: BTreeSet<NaiveDate>,
    #[serde(default)]
    pub reservations: u32,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_individual: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<String>,
}

fn default_color() -> String {
    DEFAULT_COURSE_COLOR.into()
}

impl Course {
    pub fn new(
        name: impl Into<String>,
        slots: u32,
        dates: impl IntoIterator<Item = NaiveDate>,
    ) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            slots,
            info: String::new(),
            color: default_color(),
            dates: dates.into_iter().collect(),
            reservations: 0,
            is_individual: false,
            reservation_id: None,
        }
    }

    /// Builds the shadow course that blocks the calendar for an individual booking.
    pub fn individual_for(
        reservation_id: &str,
        student: &Student,
        category: CourseCategory,
        dates: impl IntoIterator<Item = NaiveDate>,
    ) -> Self {
        Self {
            id: format!("{INDIVIDUAL_COURSE_PREFIX}{reservation_id}"),
            name: format!("Ind: {}", student.name),
            slots: 1,
            info: format!(
                "Rezerwacja indywidualna dla {}. Kategoria: {}. Kontakt: {}",
                student.name, category, student.phone
            ),
            color: INDIVIDUAL_COURSE_COLOR.into(),
            dates: dates.into_iter().collect(),
            reservations: 1,
            is_individual: true,
            reservation_id: Some(reservation_id.to_string()),
        }
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn occupies(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn earliest_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn has_free_slot(&self) -> bool {
        self.slots > 0
    }
}

impl Identifiable for Course {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Course {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Course {
    fn display_label(&self) -> String {
        format!("{} ({} wolnych miejsc)", self.name, self.slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_are_deduplicated_and_ordered() {
        let d1 = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let d0 = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let course = Course::new("Kat B", 10, [d1, d0, d1]);
        assert_eq!(course.dates.len(), 2);
        assert_eq!(course.earliest_date(), Some(d0));
        assert_eq!(course.latest_date(), Some(d1));
    }

    #[test]
    fn regular_course_omits_individual_fields() {
        let course = Course::new("Kat B", 10, []);
        let json = serde_json::to_value(&course).unwrap();
        assert!(json.get("isIndividual").is_none());
        assert!(json.get("reservationId").is_none());
        assert_eq!(json["slots"], 10);
    }
}
