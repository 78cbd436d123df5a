//! Which calendar days are taken, and by whom.

use std::collections::{btree_map::Entry, BTreeMap, BTreeSet};

use chrono::NaiveDate;
use osk_domain::Course;

use crate::CoreError;

/// First course whose date set contains `date`.
pub fn occupant(courses: &[Course], date: NaiveDate) -> Option<&Course> {
    courses.iter().find(|course| course.occupies(date))
}

pub fn is_free(courses: &[Course], date: NaiveDate) -> bool {
    occupant(courses, date).is_none()
}

/// Date → course id lookup built once per snapshot of the course list.
///
/// Agrees with [`occupant`]: when data is inconsistent and two courses claim a
/// date, the earlier course in list order wins.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityIndex {
    by_date: BTreeMap<NaiveDate, String>,
}

impl AvailabilityIndex {
    pub fn build(courses: &[Course]) -> Self {
        let mut by_date = BTreeMap::new();
        for course in courses {
            for date in &course.dates {
                if let Entry::Vacant(slot) = by_date.entry(*date) {
                    slot.insert(course.id.clone());
                }
            }
        }
        Self { by_date }
    }

    pub fn occupant_id(&self, date: NaiveDate) -> Option<&str> {
        self.by_date.get(&date).map(String::as_str)
    }

    pub fn occupant<'a>(&self, courses: &'a [Course], date: NaiveDate) -> Option<&'a Course> {
        let id = self.occupant_id(date)?;
        courses.iter().find(|course| course.id == id)
    }

    pub fn is_free(&self, date: NaiveDate) -> bool {
        !self.by_date.contains_key(&date)
    }

    pub fn occupied_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.by_date.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}

/// Dates being picked for a new course, an edited course or an individual booking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateSelection {
    editing: Option<String>,
    dates: BTreeSet<NaiveDate>,
}

impl DateSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the course's current dates; its own days stay toggleable.
    pub fn for_course(course: &Course) -> Self {
        Self {
            editing: Some(course.id.clone()),
            dates: course.dates.clone(),
        }
    }

    pub fn with_dates(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.dates.extend(dates);
        self
    }

    /// Adds or removes `date`. Returns whether the date is selected afterwards.
    pub fn toggle(&mut self, courses: &[Course], date: NaiveDate) -> Result<bool, CoreError> {
        if let Some(course) = occupant(courses, date) {
            if self.editing.as_deref() != Some(course.id.as_str()) {
                return Err(CoreError::DateTaken(date));
            }
        }
        if self.dates.remove(&date) {
            Ok(false)
        } else {
            self.dates.insert(date);
            Ok(true)
        }
    }

    /// Dates in the selection that another course has claimed since they were picked.
    pub fn conflicts(&self, courses: &[Course]) -> Vec<NaiveDate> {
        self.dates
            .iter()
            .copied()
            .filter(|date| match occupant(courses, *date) {
                Some(course) => self.editing.as_deref() != Some(course.id.as_str()),
                None => false,
            })
            .collect()
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn dates(&self) -> &BTreeSet<NaiveDate> {
        &self.dates
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn into_dates(self) -> BTreeSet<NaiveDate> {
        self.dates
    }
}
