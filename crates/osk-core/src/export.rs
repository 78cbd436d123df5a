//! Plain-text schedule and student reports.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, NaiveDate};
use osk_domain::{AppState, Booking, Reservation, INDIVIDUAL_COURSE_PREFIX};
use serde::{Deserialize, Serialize};

use crate::format::{
    format_date, format_plain_amount, format_short_date, format_timestamp, month_label,
};
use crate::reconcile::{booking_label, relevant_dates, scheduled_items, ScheduledItem};
use crate::{Clock, CoreError, CoreResult};

pub const NO_SCHEDULE_DATA: &str = "Brak danych do wyeksportowania dla wybranych kryteriów.";
pub const NO_STUDENT_DATA: &str = "Brak danych do wyeksportowania dla wybranego okresu.";
pub const ALL_INSTRUCTORS_LABEL: &str = "Wszyscy instruktorzy";

const HEADER_RULE: &str = "========================================";
const BLOCK_SEPARATOR: &str = "\n\n----------------------------------------\n\n";
const MISSING: &str = "Brak";

/// Time window a report covers, relative to today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportPeriod {
    Day,
    Week,
    Month,
    #[default]
    All,
}

impl ExportPeriod {
    pub fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            ExportPeriod::Day => date == today,
            ExportPeriod::Week => {
                let (start, end) = week_bounds(today);
                start <= date && date <= end
            }
            ExportPeriod::Month => date.year() == today.year() && date.month() == today.month(),
            ExportPeriod::All => true,
        }
    }

    pub fn label(self, today: NaiveDate) -> String {
        match self {
            ExportPeriod::Day => format_short_date(today),
            ExportPeriod::Week => {
                let (start, end) = week_bounds(today);
                format!("{} - {}", format_short_date(start), format_short_date(end))
            }
            ExportPeriod::Month => month_label(today),
            ExportPeriod::All => "Wszystkie dane".into(),
        }
    }
}

impl fmt::Display for ExportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExportPeriod::Day => "day",
            ExportPeriod::Week => "week",
            ExportPeriod::Month => "month",
            ExportPeriod::All => "all",
        };
        f.write_str(label)
    }
}

impl FromStr for ExportPeriod {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "day" | "dzien" | "dzień" => Ok(ExportPeriod::Day),
            "week" | "tydzien" | "tydzień" => Ok(ExportPeriod::Week),
            "month" | "miesiac" | "miesiąc" => Ok(ExportPeriod::Month),
            "all" | "wszystko" => Ok(ExportPeriod::All),
            other => Err(CoreError::validation(format!("Nieznany okres: {other}"))),
        }
    }
}

/// Monday through Sunday of the week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = i64::from(date.weekday().num_days_from_monday());
    let start = date - Duration::days(offset);
    (start, start + Duration::days(6))
}

/// Output flavour; only the extension and MIME type differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Txt,
    Doc,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Doc => "doc",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Txt => "text/plain",
            ExportFormat::Doc => "application/msword",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "txt" => Ok(ExportFormat::Txt),
            "doc" => Ok(ExportFormat::Doc),
            other => Err(CoreError::validation(format!("Nieznany format: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InstructorFilter {
    #[default]
    All,
    Only(String),
}

impl InstructorFilter {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" | "all" => InstructorFilter::All,
            id => InstructorFilter::Only(id.into()),
        }
    }

    fn accepts(&self, instructor_id: &str) -> bool {
        match self {
            InstructorFilter::All => true,
            InstructorFilter::Only(id) => id == instructor_id,
        }
    }
}

/// A rendered report ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub filename: String,
    pub mime_type: &'static str,
    pub content: String,
}

/// Builds the "Raport grafiku" listing of planned sessions.
pub fn schedule_report(
    state: &AppState,
    filter: &InstructorFilter,
    period: ExportPeriod,
    format: ExportFormat,
    clock: &dyn Clock,
) -> CoreResult<ExportDocument> {
    let today = clock.today();
    let items: Vec<ScheduledItem<'_>> = scheduled_items(&state.schedule)
        .into_iter()
        .filter(|item| filter.accepts(&item.entry.instructor_id))
        .filter(|item| period.contains(item.date, today))
        .collect();
    if items.is_empty() {
        return Err(CoreError::validation(NO_SCHEDULE_DATA));
    }

    let instructor_name = match filter {
        InstructorFilter::All => ALL_INSTRUCTORS_LABEL.to_string(),
        InstructorFilter::Only(id) => state
            .instructor(id)
            .map(|instructor| instructor.name.clone())
            .unwrap_or_else(|| "Nieznany".into()),
    };

    let mut content = String::new();
    content.push_str("Raport grafiku\n");
    content.push_str(&format!("Wygenerowano: {}\n", format_timestamp(clock.now())));
    content.push_str(&format!("Instruktor: {instructor_name}\n"));
    content.push_str(&format!("Okres: {}\n", period.label(today)));
    content.push_str(&format!("Liczba wpisów: {}\n", items.len()));
    content.push_str(HEADER_RULE);
    content.push('\n');

    let mut current = None;
    for item in &items {
        if current != Some(item.date) {
            content.push_str(&format!("\n--- {} ---\n", format_date(item.date)));
            current = Some(item.date);
        }
        let entry = item.entry;
        let student = state
            .reservation(&entry.reservation_id)
            .map(|reservation| reservation.student.name.as_str())
            .unwrap_or("Brak kursanta");
        let instructor = state
            .instructor(&entry.instructor_id)
            .map(|instructor| instructor.name.as_str())
            .unwrap_or("Brak instruktora");
        content.push_str(&format!(
            "{} - {} | Instruktor: {} | Kursant: {} | Opis: {}\n",
            entry.start_time, entry.end_time, instructor, student, entry.description
        ));
    }

    tracing::info!(entries = items.len(), %period, "schedule report generated");
    Ok(ExportDocument {
        filename: format!(
            "grafik_{}_{}.{}",
            instructor_name.replacen(' ', "_", 1),
            today.format("%Y-%m-%d"),
            format.extension()
        ),
        mime_type: format.mime_type(),
        content,
    })
}

/// Builds the "Raport kursantów" listing of reservations active in the period.
///
/// `course_filter` narrows the report to one course; a shadow course id selects
/// its individual booking.
pub fn students_report(
    state: &AppState,
    course_filter: Option<&str>,
    period: ExportPeriod,
    format: ExportFormat,
    clock: &dyn Clock,
) -> CoreResult<ExportDocument> {
    let today = clock.today();
    let selected: Vec<&Reservation> = state
        .reservations
        .iter()
        .filter(|reservation| {
            course_filter.map_or(true, |course_id| books_course(reservation, course_id))
        })
        .filter(|reservation| {
            relevant_dates(reservation, &state.courses)
                .into_iter()
                .any(|date| period.contains(date, today))
        })
        .collect();
    if selected.is_empty() {
        return Err(CoreError::validation(NO_STUDENT_DATA));
    }

    let mut content = String::new();
    content.push_str("Raport kursantów\n");
    content.push_str(&format!("Wygenerowano: {}\n", format_timestamp(clock.now())));
    content.push_str(&format!("Okres: {}\n", period.label(today)));
    content.push_str(&format!("Liczba rezerwacji: {}\n", selected.len()));
    content.push_str(HEADER_RULE);
    content.push_str("\n\n");
    let blocks: Vec<String> = selected
        .iter()
        .map(|reservation| student_block(state, reservation))
        .collect();
    content.push_str(&blocks.join(BLOCK_SEPARATOR));

    tracing::info!(reservations = selected.len(), %period, "students report generated");
    Ok(ExportDocument {
        filename: format!(
            "eksport_kursantow_{}.{}",
            today.format("%Y-%m-%d"),
            format.extension()
        ),
        mime_type: format.mime_type(),
        content,
    })
}

fn books_course(reservation: &Reservation, course_id: &str) -> bool {
    match &reservation.booking {
        Booking::Course { course_id: booked } => booked == course_id,
        Booking::Individual { .. } => course_id
            .strip_prefix(INDIVIDUAL_COURSE_PREFIX)
            .is_some_and(|id| id == reservation.id),
        Booking::Unassigned => false,
    }
}

fn or_missing(value: &str) -> &str {
    if value.is_empty() {
        MISSING
    } else {
        value
    }
}

fn student_block(state: &AppState, reservation: &Reservation) -> String {
    let student = &reservation.student;
    let category = reservation
        .category
        .map(|category| category.to_string())
        .unwrap_or_else(|| MISSING.into());
    let advance = if reservation.advance_paid {
        format!(
            "Zapłacono ({} zł)",
            format_plain_amount(reservation.advance_amount)
        )
    } else {
        "Nie zapłacono".to_string()
    };
    [
        format!("Imię i nazwisko: {}", student.name),
        format!("Nr telefonu: {}", student.phone),
        format!("Email: {}", or_missing(&student.email)),
        format!("PESEL: {}", or_missing(&student.pesel)),
        format!("PKK: {}", or_missing(student.pkk.as_deref().unwrap_or_default())),
        format!("Adres: {}", or_missing(&student.address)),
        String::new(),
        format!("Kurs: {}", booking_label(reservation, &state.courses)),
        format!("Kategoria: {category}"),
        format!("Zaliczka: {advance}"),
    ]
    .join("\n")
}
