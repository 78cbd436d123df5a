use osk_core::{course_term, format_date, CourseDraft, CourseService, DateSelection};
use osk_domain::Booking;

use super::{split_action, unknown_action};
use crate::cli::args::{parse_count, parse_dates, resolve_named, short_id, ParsedArgs};
use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::render::Table;
use crate::cli::shell_context::ShellContext;

const USAGE: &str = "course list [--all]
course show <id>
course add <nazwa> --slots <n> <data>... [--info <tekst>] [--color <#hex>]
course edit <id> [--name <nazwa>] [--slots <n>] [--info <tekst>] [--color <#hex>]
course dates <id> <data>...   (przełącza podane dni)
course delete <id> [--yes]
course upcoming";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "course",
        "Kursy grupowe i ich terminy",
        USAGE,
        cmd_course,
    )]
}

fn cmd_course(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, "course <list|show|add|edit|dates|delete|upcoming>")?;
    match action.as_str() {
        "list" => handle_list(context, rest),
        "show" => handle_show(context, rest),
        "add" => handle_add(context, rest),
        "edit" => handle_edit(context, rest),
        "dates" => handle_dates(context, rest),
        "delete" | "remove" => handle_delete(context, rest),
        "upcoming" => handle_upcoming(context),
        other => Err(unknown_action("course", other)),
    }
}

pub(crate) fn resolve_course(
    context: &ShellContext,
    raw: Option<&str>,
) -> Result<String, CommandError> {
    let raw = raw.ok_or_else(|| CommandError::usage("course <action> <id>"))?;
    let courses = &context.manager.state().courses;
    resolve_named(
        courses
            .iter()
            .map(|course| (course.id.as_str(), course.name.as_str())),
        raw,
        "kursu",
    )
}

fn handle_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &["all"])?;
    let include_individual = parsed.has("all");
    let courses: Vec<_> = context
        .manager
        .state()
        .courses
        .iter()
        .filter(|course| include_individual || !course.is_individual)
        .collect();

    output::section("Kursy");
    if courses.is_empty() {
        output::info("Brak kursów.");
        return Ok(());
    }
    let mut table = Table::new(["Id", "Nazwa", "Termin", "Wolne miejsca", "Rezerwacje"]);
    for course in courses {
        table.add_row([
            short_id(&course.id).to_string(),
            course.name.clone(),
            course_term(&course.dates),
            course.slots.to_string(),
            course.reservations.to_string(),
        ]);
    }
    table.print();
    Ok(())
}

fn handle_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = resolve_course(context, args.first().copied())?;
    let state = context.manager.state();
    let Some(course) = state.course(&id) else {
        return Err(CommandError::Message(format!("Nie znaleziono kursu: {id}")));
    };

    output::section(&course.name);
    output::plain(format!("  Id:            {}", course.id));
    output::plain(format!("  Termin:        {}", course_term(&course.dates)));
    output::plain(format!("  Wolne miejsca: {}", course.slots));
    output::plain(format!("  Rezerwacje:    {}", course.reservations));
    output::plain(format!("  Kolor:         {}", course.color));
    if !course.info.is_empty() {
        output::plain(format!("  Informacje:    {}", course.info));
    }
    let dates: Vec<String> = course.dates.iter().copied().map(format_date).collect();
    output::plain(format!("  Dni:           {}", dates.join(", ")));

    let students: Vec<&str> = state
        .reservations
        .iter()
        .filter(|reservation| match &reservation.booking {
            Booking::Course { course_id } => *course_id == course.id,
            _ => course.reservation_id.as_deref() == Some(reservation.id.as_str()),
        })
        .map(|reservation| reservation.student.name.as_str())
        .collect();
    if !students.is_empty() {
        output::plain(format!("  Kursanci:      {}", students.join(", ")));
    }
    Ok(())
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["slots", "info", "color", "dates"], &[])?;
    let usage = || CommandError::usage("course add <nazwa> --slots <n> <data>...");
    let name = parsed.positional(0).ok_or_else(usage)?;
    let slots = parse_count(parsed.value("slots").ok_or_else(usage)?)?;
    let raw_dates = parsed.positionals()[1..]
        .iter()
        .copied()
        .chain(parsed.value("dates"));
    let dates = parse_dates(raw_dates)?;

    let mut selection = DateSelection::new();
    for date in dates {
        if !selection.dates().contains(&date) {
            selection.toggle(&context.manager.state().courses, date)?;
        }
    }

    let mut draft = CourseDraft::named(name, slots);
    if let Some(info) = parsed.value("info") {
        draft.info = info.to_string();
    }
    if let Some(color) = parsed.value("color") {
        draft.color = color.to_string();
    }

    let id = context.manager.create_course(draft, selection)?;
    output::success(format!("Dodano kurs `{name}` ({}).", short_id(&id)));
    Ok(())
}

fn handle_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["name", "slots", "info", "color"], &[])?;
    let id = resolve_course(context, parsed.positional(0))?;
    let Some(course) = context.manager.state().course(&id) else {
        return Err(CommandError::Message(format!("Nie znaleziono kursu: {id}")));
    };
    let mut draft = CourseDraft::from_course(course);
    if let Some(name) = parsed.value("name") {
        draft.name = name.to_string();
    }
    if let Some(slots) = parsed.value("slots") {
        draft.slots = parse_count(slots)?;
    }
    if let Some(info) = parsed.value("info") {
        draft.info = info.to_string();
    }
    if let Some(color) = parsed.value("color") {
        draft.color = color.to_string();
    }
    context.manager.update_course(&id, draft)?;
    output::success("Zapisano zmiany kursu.");
    Ok(())
}

fn handle_dates(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = resolve_course(context, args.first().copied())?;
    let toggles = parse_dates(args.iter().skip(1).copied())?;
    if toggles.is_empty() {
        return Err(CommandError::usage("course dates <id> <data>..."));
    }
    let state = context.manager.state();
    let Some(course) = state.course(&id) else {
        return Err(CommandError::Message(format!("Nie znaleziono kursu: {id}")));
    };
    let mut selection = DateSelection::for_course(course);
    for date in toggles {
        selection.toggle(&state.courses, date)?;
    }
    let term = course_term(selection.dates());
    context.manager.update_course_dates(&id, selection)?;
    output::success(format!("Zaktualizowano dni kursu: {term}."));
    Ok(())
}

fn handle_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &["yes"])?;
    let id = resolve_course(context, parsed.positional(0))?;
    let name = context
        .manager
        .state()
        .course(&id)
        .map(|course| course.name.clone())
        .unwrap_or_default();
    if !context.confirm(&format!("Usunąć kurs `{name}`?"), parsed.has("yes"))? {
        return Ok(());
    }
    let removed = context.manager.delete_course(&id)?;
    output::success(format!("Usunięto kurs `{}`.", removed.name));
    if removed.reservations > 0 {
        output::warning(format!(
            "{} rezerwacji wskazuje teraz na nieistniejący kurs.",
            removed.reservations
        ));
    }
    Ok(())
}

fn handle_upcoming(context: &mut ShellContext) -> CommandResult {
    let today = context.manager.today();
    let upcoming = CourseService::upcoming(context.manager.state(), today);
    output::section("Nadchodzące kursy");
    if upcoming.is_empty() {
        output::info("Brak nadchodzących kursów.");
        return Ok(());
    }
    let mut table = Table::new(["Id", "Nazwa", "Termin", "Wolne miejsca"]);
    for course in upcoming {
        table.add_row([
            short_id(&course.id).to_string(),
            course.name.clone(),
            course_term(&course.dates),
            course.slots.to_string(),
        ]);
    }
    table.print();
    Ok(())
}
