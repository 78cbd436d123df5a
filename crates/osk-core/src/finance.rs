//! Per-student balances and the school-wide totals.

use std::fmt;

use osk_domain::{AppState, CourseCategory, Reservation};

use crate::reconcile::booking_label;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Due,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentStatus::Paid => "Opłacono",
            PaymentStatus::Due => "Do zapłaty",
        })
    }
}

/// One line of the finances table.
#[derive(Debug, Clone, PartialEq)]
pub struct FinanceRow {
    pub reservation_id: String,
    pub student_name: String,
    pub course_label: String,
    pub category: CourseCategory,
    pub price: f64,
    pub paid: f64,
    /// Shown balance, never below zero.
    pub remaining: f64,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FinancialSummary {
    pub revenue: f64,
    pub paid: f64,
    /// Revenue minus paid; overpayments reduce it and it may go negative.
    pub outstanding: f64,
}

fn price_and_paid(state: &AppState, reservation: &Reservation) -> (f64, f64) {
    let price = state
        .course_prices
        .price_for(reservation.effective_category());
    (price, reservation.paid_amount())
}

pub fn finance_row(state: &AppState, reservation: &Reservation) -> FinanceRow {
    let (price, paid) = price_and_paid(state, reservation);
    let balance = price - paid;
    FinanceRow {
        reservation_id: reservation.id.clone(),
        student_name: reservation.student.name.clone(),
        course_label: booking_label(reservation, &state.courses),
        category: reservation.effective_category(),
        price,
        paid,
        remaining: balance.max(0.0),
        status: if balance <= 0.0 {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Due
        },
    }
}

pub fn finance_rows(state: &AppState) -> Vec<FinanceRow> {
    state
        .reservations
        .iter()
        .map(|reservation| finance_row(state, reservation))
        .collect()
}

pub fn financial_summary(state: &AppState) -> FinancialSummary {
    let (revenue, paid) = state
        .reservations
        .iter()
        .map(|reservation| price_and_paid(state, reservation))
        .fold((0.0, 0.0), |(revenue, paid), (price, amount)| {
            (revenue + price, paid + amount)
        });
    FinancialSummary {
        revenue,
        paid,
        outstanding: revenue - paid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osk_domain::{Booking, Student};

    fn reservation(category: Option<CourseCategory>, paid: bool, amount: f64) -> Reservation {
        let reservation = Reservation::new(Booking::Unassigned, Student::new("Jan", "600"))
            .with_advance(paid, amount);
        match category {
            Some(category) => reservation.with_category(category),
            None => reservation,
        }
    }

    #[test]
    fn missing_category_prices_as_b() {
        let state = AppState::default();
        let row = finance_row(&state, &reservation(None, false, 0.0));
        assert_eq!(row.category, CourseCategory::B);
        assert_eq!(row.price, 3200.0);
        assert_eq!(row.status, PaymentStatus::Due);
    }

    #[test]
    fn overpayment_floors_row_but_not_summary() {
        let mut state = AppState::default();
        state.course_prices.a = 100.0;
        state.reservations = vec![reservation(Some(CourseCategory::A), true, 300.0)];
        let row = finance_row(&state, &state.reservations[0]);
        assert_eq!(row.remaining, 0.0);
        assert_eq!(row.status, PaymentStatus::Paid);
        assert_eq!(row.status.to_string(), "Opłacono");

        let summary = financial_summary(&state);
        assert_eq!(summary.revenue, 100.0);
        assert_eq!(summary.paid, 300.0);
        assert_eq!(summary.outstanding, -200.0);
    }

    #[test]
    fn exact_payment_counts_as_paid() {
        let mut state = AppState::default();
        state.reservations = vec![reservation(Some(CourseCategory::C), true, 4500.0)];
        let row = finance_row(&state, &state.reservations[0]);
        assert_eq!(row.status, PaymentStatus::Paid);
    }
}
