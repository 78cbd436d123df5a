//! Month view with Monday-first weeks.

use chrono::{Datelike, Duration, NaiveDate};
use osk_domain::Course;

use crate::availability::{AvailabilityIndex, DateSelection};
use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// False for the leading/trailing days borrowed from neighbouring months.
    pub in_month: bool,
    pub is_today: bool,
    pub pending: bool,
    pub course_id: Option<String>,
    pub course_name: Option<String>,
    pub individual: bool,
}

/// One calendar month padded to whole weeks.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

impl MonthGrid {
    pub fn build(
        year: i32,
        month: u32,
        courses: &[Course],
        selection: Option<&DateSelection>,
        today: NaiveDate,
    ) -> CoreResult<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            CoreError::validation(format!("Nieprawidłowy miesiąc: {year}-{month}"))
        })?;
        let index = AvailabilityIndex::build(courses);
        let leading = i64::from(first.weekday().num_days_from_monday());
        let in_month = days_in_month(first);
        let trailing = (7 - (leading + in_month) % 7) % 7;
        let start = first - Duration::days(leading);

        let days = (0..leading + in_month + trailing)
            .map(|offset| {
                let date = start + Duration::days(offset);
                let course = index.occupant(courses, date);
                CalendarDay {
                    date,
                    in_month: date.month() == month,
                    is_today: date == today,
                    pending: selection.is_some_and(|selection| selection.dates().contains(&date)),
                    course_id: course.map(|course| course.id.clone()),
                    course_name: course.map(|course| course.name.clone()),
                    individual: course.is_some_and(|course| course.is_individual),
                }
            })
            .collect();
        Ok(Self { year, month, days })
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDay]> + '_ {
        self.days.chunks(7)
    }
}

fn days_in_month(first: NaiveDate) -> i64 {
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    next.map(|next| (next - first).num_days()).unwrap_or(31)
}
