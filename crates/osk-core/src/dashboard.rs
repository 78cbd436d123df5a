//! Start-page overview.

use chrono::NaiveDate;
use osk_domain::{AppState, Course};

use crate::course_service::CourseService;
use crate::finance::{financial_summary, FinancialSummary};
use crate::reconcile::{unscheduled_items, UnscheduledItem};

pub const DASHBOARD_UNSCHEDULED_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct DashboardOverview<'a> {
    pub students: usize,
    pub courses: usize,
    pub instructors: usize,
    pub finances: FinancialSummary,
    pub unscheduled: Vec<UnscheduledItem<'a>>,
    pub unscheduled_total: usize,
    pub upcoming: Vec<&'a Course>,
}

pub fn dashboard_overview(state: &AppState, today: NaiveDate) -> DashboardOverview<'_> {
    let mut unscheduled = unscheduled_items(state);
    let unscheduled_total = unscheduled.len();
    unscheduled.truncate(DASHBOARD_UNSCHEDULED_LIMIT);
    DashboardOverview {
        students: state.reservations.len(),
        courses: state.regular_courses().count(),
        instructors: state.instructors.len(),
        finances: financial_summary(state),
        unscheduled,
        unscheduled_total,
        upcoming: CourseService::upcoming(state, today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use osk_domain::{Booking, Reservation, Student};

    #[test]
    fn overview_caps_unscheduled_list() {
        let mut state = AppState::default();
        let dates: BTreeSet<NaiveDate> = (1..=8)
            .map(|d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap())
            .collect();
        state.reservations.push(Reservation::new(
            Booking::Individual { dates },
            Student::new("Jan", "600"),
        ));
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let overview = dashboard_overview(&state, today);
        assert_eq!(overview.students, 1);
        assert_eq!(overview.courses, 0);
        assert_eq!(overview.instructors, 4);
        assert_eq!(overview.unscheduled.len(), DASHBOARD_UNSCHEDULED_LIMIT);
        assert_eq!(overview.unscheduled_total, 8);
        assert_eq!(overview.finances.revenue, 3200.0);
    }
}
