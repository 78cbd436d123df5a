use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use osk_core::{
    booking_label, course_term, dashboard_overview, format_date, format_money_compact, month_label,
    MonthGrid,
};

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::render::{calendar_lines, Table};
use crate::cli::shell_context::ShellContext;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "dashboard",
            "Podsumowanie: kursanci, finanse, zajęcia do zaplanowania",
            "dashboard",
            cmd_dashboard,
        ),
        CommandEntry::new(
            "calendar",
            "Kalendarz zajętości dni",
            "calendar [RRRR-MM]",
            cmd_calendar,
        ),
    ]
}

fn cmd_dashboard(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let state = context.manager.state();
    let overview = dashboard_overview(state, context.manager.today());

    output::section(&state.app_title);
    output::plain(format!(
        "Kursanci: {}   Kursy: {}   Instruktorzy: {}",
        overview.students, overview.courses, overview.instructors
    ));
    output::plain(format!(
        "Przychód: {}   Wpłacono: {}   Do zapłaty: {}",
        format_money_compact(overview.finances.revenue),
        format_money_compact(overview.finances.paid),
        format_money_compact(overview.finances.outstanding)
    ));

    output::section(format!("Do zaplanowania ({})", overview.unscheduled_total));
    if overview.unscheduled.is_empty() {
        output::info("Wszystkie zajęcia są zaplanowane.");
    } else {
        let mut table = Table::new(["Data", "Kursant", "Kurs"]);
        for item in &overview.unscheduled {
            table.add_row([
                format_date(item.date),
                item.reservation.student.name.clone(),
                booking_label(item.reservation, &state.courses),
            ]);
        }
        table.print();
    }

    output::section("Nadchodzące kursy");
    if overview.upcoming.is_empty() {
        output::info("Brak nadchodzących kursów.");
    } else {
        let mut table = Table::new(["Kurs", "Termin", "Wolne miejsca"]);
        for course in &overview.upcoming {
            table.add_row([
                course.name.clone(),
                course_term(&course.dates),
                course.slots.to_string(),
            ]);
        }
        table.print();
    }
    Ok(())
}

fn cmd_calendar(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let today = context.manager.today();
    let (year, month) = match args.first() {
        Some(raw) => parse_month(raw)?,
        None => (today.year(), today.month()),
    };
    let state = context.manager.state();
    let grid = MonthGrid::build(year, month, &state.courses, None, today)?;

    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(today);
    output::section(month_label(first));
    for line in calendar_lines(&grid) {
        output::plain(line);
    }

    let mut listed = HashSet::new();
    let names: Vec<&str> = grid
        .days
        .iter()
        .filter(|day| day.in_month)
        .filter_map(|day| Some((day.course_id.as_deref()?, day.course_name.as_deref()?)))
        .filter(|(id, _)| listed.insert(*id))
        .map(|(_, name)| name)
        .collect();
    if !names.is_empty() {
        output::plain("");
        for name in names {
            output::plain(format!("  {name}"));
        }
    }
    output::hint("[dd] kurs, (dd) zajęcia indywidualne, *dd* dzisiaj");
    Ok(())
}

fn parse_month(raw: &str) -> Result<(i32, u32), CommandError> {
    let invalid = || CommandError::InvalidArguments(format!("invalid month `{raw}` (use YYYY-MM)"));
    let (year, month) = raw.split_once('-').ok_or_else(invalid)?;
    let year = year.parse::<i32>().map_err(|_| invalid())?;
    let month = month.parse::<u32>().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_argument_is_validated() {
        assert_eq!(parse_month("2024-03").unwrap(), (2024, 3));
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("marzec").is_err());
    }
}
