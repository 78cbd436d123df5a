use osk_core::{
    booking_label, format_date, scheduled_items, unscheduled_items, PlanRequest, ScheduleService,
    ScheduledItem,
};
use osk_domain::{AppState, EntryPatch};

use super::reservation::resolve_reservation;
use super::{split_action, unknown_action};
use crate::cli::args::{parse_date, parse_time, resolve_id, short_id, ParsedArgs};
use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::render::Table;
use crate::cli::shell_context::ShellContext;

const USAGE: &str = "schedule list [--instructor <id>] [--date <RRRR-MM-DD>]
schedule pending
schedule plan <rezerwacja> <RRRR-MM-DD> [--instructor <id>] [--from <GG:MM>] [--to <GG:MM>] [--desc <opis>]
schedule edit <wpis> [--instructor <id>] [--from <GG:MM>] [--to <GG:MM>] [--desc <opis>]
schedule remove <wpis>
schedule instructors";

const ENTRY_OPTIONS: &[&str] = &["instructor", "from", "to", "desc"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "schedule",
        "Grafik jazd instruktorów",
        USAGE,
        cmd_schedule,
    )]
}

fn cmd_schedule(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(
        args,
        "schedule <list|pending|plan|edit|remove|instructors>",
    )?;
    match action.as_str() {
        "list" => handle_list(context, rest),
        "pending" => handle_pending(context),
        "plan" => handle_plan(context, rest),
        "edit" => handle_edit(context, rest),
        "remove" | "delete" => handle_remove(context, rest),
        "instructors" => handle_instructors(context),
        other => Err(unknown_action("schedule", other)),
    }
}

fn resolve_instructor(context: &ShellContext, raw: &str) -> Result<String, CommandError> {
    let instructors = &context.manager.state().instructors;
    resolve_id(
        instructors.iter().map(|instructor| instructor.id.as_str()),
        raw,
        "instruktora",
    )
}

fn resolve_entry(context: &ShellContext, raw: Option<&str>) -> Result<String, CommandError> {
    let raw = raw.ok_or_else(|| CommandError::usage("schedule <edit|remove> <wpis>"))?;
    let schedule = &context.manager.state().schedule;
    resolve_id(
        schedule.iter().map(|(_, entry)| entry.id.as_str()),
        raw,
        "wpisu",
    )
}

fn instructor_name(state: &AppState, id: &str) -> String {
    state
        .instructor(id)
        .map(|instructor| instructor.name.clone())
        .unwrap_or_else(|| format!("? ({id})"))
}

fn handle_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["instructor", "date"], &[])?;
    let instructor = parsed
        .value("instructor")
        .map(|raw| resolve_instructor(context, raw))
        .transpose()?;
    let date = parsed.value("date").map(parse_date).transpose()?;

    let state = context.manager.state();
    let items: Vec<ScheduledItem<'_>> = match &instructor {
        Some(id) => ScheduleService::for_instructor(state, id),
        None => scheduled_items(&state.schedule),
    }
    .into_iter()
    .filter(|item| date.map_or(true, |date| item.date == date))
    .collect();

    output::section(match &instructor {
        Some(id) => format!("Grafik: {}", instructor_name(state, id)),
        None => "Grafik".to_string(),
    });
    if items.is_empty() {
        output::info("Brak zaplanowanych jazd.");
        return Ok(());
    }
    let mut table = Table::new(["Wpis", "Data", "Godziny", "Instruktor", "Kursant", "Opis"]);
    for item in items {
        let entry = item.entry;
        let student = state
            .reservation(&entry.reservation_id)
            .map(|reservation| reservation.student.name.clone())
            .unwrap_or_else(|| "Brak kursanta".into());
        table.add_row([
            short_id(&entry.id).to_string(),
            format_date(item.date),
            format!("{} - {}", entry.start_time, entry.end_time),
            instructor_name(state, &entry.instructor_id),
            student,
            entry.description.clone(),
        ]);
    }
    table.print();
    Ok(())
}

fn handle_pending(context: &mut ShellContext) -> CommandResult {
    let state = context.manager.state();
    let pending = unscheduled_items(state);
    output::section(format!("Do zaplanowania ({})", pending.len()));
    if pending.is_empty() {
        output::info("Wszystkie zajęcia są zaplanowane.");
        return Ok(());
    }
    let mut table = Table::new(["Data", "Rezerwacja", "Kursant", "Kurs"]);
    for item in pending {
        table.add_row([
            format_date(item.date),
            short_id(&item.reservation.id).to_string(),
            item.reservation.student.name.clone(),
            booking_label(item.reservation, &state.courses),
        ]);
    }
    table.print();
    Ok(())
}

fn entry_patch(context: &ShellContext, parsed: &ParsedArgs<'_>) -> Result<EntryPatch, CommandError> {
    Ok(EntryPatch {
        instructor_id: parsed
            .value("instructor")
            .map(|raw| resolve_instructor(context, raw))
            .transpose()?,
        start_time: parsed.value("from").map(parse_time).transpose()?,
        end_time: parsed.value("to").map(parse_time).transpose()?,
        description: parsed.value("desc").map(str::to_string),
    })
}

fn handle_plan(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, ENTRY_OPTIONS, &[])?;
    let usage = || CommandError::usage("schedule plan <rezerwacja> <RRRR-MM-DD>");
    let raw_reservation = parsed.positional(0).ok_or_else(usage)?;
    let reservation_id = resolve_reservation(context, Some(raw_reservation))?;
    let date = parse_date(parsed.positional(1).ok_or_else(usage)?)?;
    let patch = entry_patch(context, &parsed)?;

    let hours = context.manager.state().operating_hours;
    for time in [patch.start_time, patch.end_time].into_iter().flatten() {
        if !hours.contains(time) {
            output::warning(format!(
                "Godzina {time} wykracza poza godziny pracy ({} - {}).",
                hours.start, hours.end
            ));
        }
    }

    let request = PlanRequest {
        instructor_id: patch.instructor_id,
        start_time: patch.start_time,
        end_time: patch.end_time,
        description: patch.description,
        ..PlanRequest::new(date, reservation_id)
    };
    let id = context.manager.plan_session(request)?;
    output::success(format!(
        "Zaplanowano jazdę na {} ({}).",
        format_date(date),
        short_id(&id)
    ));
    Ok(())
}

fn handle_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, ENTRY_OPTIONS, &[])?;
    let id = resolve_entry(context, parsed.positional(0))?;
    let patch = entry_patch(context, &parsed)?;
    if patch.is_empty() {
        output::info("Brak zmian do zapisania.");
        return Ok(());
    }
    context.manager.update_session(&id, &patch)?;
    output::success("Zapisano zmiany wpisu.");
    Ok(())
}

fn handle_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = resolve_entry(context, args.first().copied())?;
    let removed = context.manager.unplan_session(&id)?;
    output::success(format!(
        "Usunięto wpis `{}` ({} - {}).",
        removed.description, removed.start_time, removed.end_time
    ));
    Ok(())
}

fn handle_instructors(context: &mut ShellContext) -> CommandResult {
    let state = context.manager.state();
    output::section("Instruktorzy");
    let mut table = Table::new(["Id", "Imię i nazwisko", "Kolor", "Jazdy"]);
    for instructor in &state.instructors {
        let sessions = ScheduleService::for_instructor(state, &instructor.id).len();
        table.add_row([
            instructor.id.clone(),
            instructor.name.clone(),
            instructor.color.clone(),
            sessions.to_string(),
        ]);
    }
    table.print();
    Ok(())
}
