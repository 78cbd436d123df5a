//! Student reservations and the booking variants they carry.

use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::{date_set, new_id, Displayable, Identifiable};
use crate::DomainError;

/// Licence category a course prepares for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CourseCategory {
    A,
    B,
    C,
    D,
}

impl CourseCategory {
    pub const ALL: [CourseCategory; 4] = [
        CourseCategory::A,
        CourseCategory::B,
        CourseCategory::C,
        CourseCategory::D,
    ];
}

impl Default for CourseCategory {
    fn default() -> Self {
        CourseCategory::B
    }
}

impl fmt::Display for CourseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CourseCategory::A => "A",
            CourseCategory::B => "B",
            CourseCategory::C => "C",
            CourseCategory::D => "D",
        };
        f.write_str(label)
    }
}

impl FromStr for CourseCategory {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(CourseCategory::A),
            "B" => Ok(CourseCategory::B),
            "C" => Ok(CourseCategory::C),
            "D" => Ok(CourseCategory::D),
            _ => Err(DomainError::InvalidCategory(value.into())),
        }
    }
}

/// Contact and identity details captured for a student.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Student {
    pub name: String,
    pub pesel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pkk: Option<String>,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl Student {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }

    /// Case-insensitive match over the searchable identity fields.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [
            Some(self.name.as_str()),
            Some(self.pesel.as_str()),
            self.pkk.as_deref(),
            Some(self.phone.as_str()),
            Some(self.email.as_str()),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// What a reservation is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Booking {
    /// Seat in a shared course; dates come from the course.
    Course { course_id: String },
    /// Private booking with its own date set.
    Individual { dates: BTreeSet<NaiveDate> },
    /// Persisted without a course and without custom dates.
    Unassigned,
}

impl Booking {
    pub fn course_id(&self) -> Option<&str> {
        match self {
            Booking::Course { course_id } => Some(course_id),
            _ => None,
        }
    }

    pub fn is_individual(&self) -> bool {
        matches!(self, Booking::Individual { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ReservationRecord", into = "ReservationRecord")]
pub struct Reservation {
    pub id: String,
    pub booking: Booking,
    pub student: Student,
    pub advance_paid: bool,
    pub advance_amount: f64,
    pub category: Option<CourseCategory>,
}

impl Reservation {
    pub fn new(booking: Booking, student: Student) -> Self {
        Self {
            id: new_id(),
            booking,
            student,
            advance_paid: false,
            advance_amount: 0.0,
            category: None,
        }
    }

    pub fn with_category(mut self, category: CourseCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Records the advance; an unpaid advance always stores zero.
    pub fn with_advance(mut self, paid: bool, amount: f64) -> Self {
        self.advance_paid = paid;
        self.advance_amount = if paid { amount } else { 0.0 };
        self
    }

    /// Category used for pricing when none was chosen.
    pub fn effective_category(&self) -> CourseCategory {
        self.category.unwrap_or_default()
    }

    pub fn paid_amount(&self) -> f64 {
        if self.advance_paid {
            self.advance_amount
        } else {
            0.0
        }
    }
}

impl Identifiable for Reservation {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Reservation {
    fn display_label(&self) -> String {
        format!("{} ({})", self.student.name, self.student.phone)
    }
}

/// Persisted layout: `courseId` (string or null) plus optional `customDates`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReservationRecord {
    id: String,
    #[serde(default)]
    course_id: Option<String>,
    #[serde(default)]
    student: Student,
    #[serde(default)]
    advance_paid: bool,
    #[serde(default)]
    advance_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<CourseCategory>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "date_set::deserialize_optional"
    )]
    custom_dates: Option<BTreeSet<NaiveDate>>,
}

impl From<ReservationRecord> for Reservation {
    fn from(record: ReservationRecord) -> Self {
        let booking = match (record.custom_dates, record.course_id) {
            (Some(dates), _) => Booking::Individual { dates },
            (None, Some(course_id)) if !course_id.is_empty() => Booking::Course { course_id },
            _ => Booking::Unassigned,
        };
        Self {
            id: record.id,
            booking,
            student: record.student,
            advance_paid: record.advance_paid,
            advance_amount: record.advance_amount,
            category: record.category,
        }
    }
}

impl From<Reservation> for ReservationRecord {
    fn from(reservation: Reservation) -> Self {
        let (course_id, custom_dates) = match reservation.booking {
            Booking::Course { course_id } => (Some(course_id), None),
            Booking::Individual { dates } => (None, Some(dates)),
            Booking::Unassigned => (None, None),
        };
        Self {
            id: reservation.id,
            course_id,
            student: reservation.student,
            advance_paid: reservation.advance_paid,
            advance_amount: reservation.advance_amount,
            category: reservation.category,
            custom_dates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn custom_dates_take_precedence_over_course_id() {
        let raw = json!({
            "id": "r1",
            "courseId": "c1",
            "student": {"name": "Jan", "pesel": "", "phone": "600", "email": "", "address": ""},
            "advancePaid": false,
            "advanceAmount": 0,
            "customDates": ["2024-03-05"]
        });
        let reservation: Reservation = serde_json::from_value(raw).unwrap();
        assert!(reservation.booking.is_individual());
    }

    #[test]
    fn null_course_without_dates_is_unassigned_and_roundtrips() {
        let raw = json!({
            "id": "r2",
            "courseId": null,
            "student": {"name": "Ala", "pesel": "", "phone": "700", "email": "", "address": ""},
            "advancePaid": true,
            "advanceAmount": 300
        });
        let reservation: Reservation = serde_json::from_value(raw).unwrap();
        assert_eq!(reservation.booking, Booking::Unassigned);
        let back = serde_json::to_value(&reservation).unwrap();
        assert!(back["courseId"].is_null());
        assert!(back.get("customDates").is_none());
    }

    #[test]
    fn unpaid_advance_is_stored_as_zero() {
        let reservation = Reservation::new(Booking::Unassigned, Student::new("Ola", "1"))
            .with_advance(false, 500.0);
        assert_eq!(reservation.advance_amount, 0.0);
        assert_eq!(reservation.effective_category(), CourseCategory::B);
    }

    #[test]
    fn student_search_is_case_insensitive_and_covers_pkk() {
        let mut student = Student::new("Anna Nowak", "600100200");
        student.pkk = Some("PKK-XYZ".into());
        assert!(student.matches("nowak"));
        assert!(student.matches("pkk-x"));
        assert!(!student.matches("kowalski"));
    }
}
