use osk_core::{
    booking_label, course_term, finance_row, format_date, format_money, reconcile_reservation,
    BookingRequest, DateSelection, ReservationForm, ReservationService,
};
use osk_domain::{Reservation, Student};

use super::course::resolve_course;
use super::{split_action, unknown_action};
use crate::cli::args::{
    parse_amount, parse_category, parse_dates, resolve_named, short_id, ParsedArgs,
};
use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::render::Table;
use crate::cli::shell_context::ShellContext;

const USAGE: &str = "reservation list
reservation show <id>
reservation search <tekst>
reservation add --name <imię i nazwisko> --phone <telefon> (--course <id> | --dates <d1,d2,...>)
                [--pesel <pesel>] [--pkk <pkk>] [--email <email>] [--address <adres>]
                [--category <A-D>] [--paid] [--advance <kwota>]
                [--paste \"Imię i nazwisko: ...; Telefon: ...\"]
reservation remove <id> [--yes]
reservation courses   (kursy z wolnymi miejscami)";

const ADD_OPTIONS: &[&str] = &[
    "name", "phone", "pesel", "pkk", "email", "address", "course", "dates", "category",
    "advance", "paste",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "reservation",
        "Rezerwacje kursantów",
        USAGE,
        cmd_reservation,
    )]
}

fn cmd_reservation(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(
        args,
        "reservation <list|show|search|add|remove|courses>",
    )?;
    match action.as_str() {
        "list" => handle_list(context, ""),
        "search" => handle_list(context, &rest.join(" ")),
        "show" => handle_show(context, rest),
        "add" => handle_add(context, rest),
        "remove" | "delete" => handle_remove(context, rest),
        "courses" => handle_courses(context),
        other => Err(unknown_action("reservation", other)),
    }
}

pub(crate) fn resolve_reservation(
    context: &ShellContext,
    raw: Option<&str>,
) -> Result<String, CommandError> {
    let raw = raw.ok_or_else(|| CommandError::usage("reservation <action> <id>"))?;
    let reservations = &context.manager.state().reservations;
    resolve_named(
        reservations
            .iter()
            .map(|reservation| (reservation.id.as_str(), reservation.student.name.as_str())),
        raw,
        "rezerwacji",
    )
}

fn handle_list(context: &mut ShellContext, needle: &str) -> CommandResult {
    let state = context.manager.state();
    let found = ReservationService::search(state, needle);
    output::section("Rezerwacje");
    if found.is_empty() {
        output::info(if needle.trim().is_empty() {
            "Brak rezerwacji."
        } else {
            "Brak rezerwacji pasujących do wyszukiwania."
        });
        return Ok(());
    }
    let mut table = Table::new(["Id", "Kursant", "Telefon", "Kurs", "Kat.", "Zaliczka"]);
    for reservation in found {
        table.add_row([
            short_id(&reservation.id).to_string(),
            reservation.student.name.clone(),
            reservation.student.phone.clone(),
            booking_label(reservation, &state.courses),
            reservation.effective_category().to_string(),
            advance_label(reservation),
        ]);
    }
    table.print();
    Ok(())
}

fn advance_label(reservation: &Reservation) -> String {
    if reservation.advance_paid {
        format_money(reservation.advance_amount)
    } else {
        "-".into()
    }
}

fn handle_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = resolve_reservation(context, args.first().copied())?;
    let state = context.manager.state();
    let reservation = state
        .reservation(&id)
        .ok_or_else(|| CommandError::Message(format!("Nie znaleziono rezerwacji: {id}")))?;
    let student = &reservation.student;
    let row = finance_row(state, reservation);
    let plan = reconcile_reservation(state, &id)?;

    output::section(&student.name);
    output::plain(format!("  Id:          {}", reservation.id));
    output::plain(format!("  Telefon:     {}", student.phone));
    for (label, value) in [
        ("PESEL:      ", student.pesel.as_str()),
        ("PKK:        ", student.pkk.as_deref().unwrap_or_default()),
        ("Email:      ", student.email.as_str()),
        ("Adres:      ", student.address.as_str()),
    ] {
        if !value.is_empty() {
            output::plain(format!("  {label} {value}"));
        }
    }
    output::plain(format!("  Kurs:        {}", row.course_label));
    output::plain(format!("  Kategoria:   {}", row.category));
    output::plain(format!("  Cena:        {}", format_money(row.price)));
    output::plain(format!("  Wpłacono:    {}", format_money(row.paid)));
    output::plain(format!(
        "  Pozostało:   {} ({})",
        format_money(row.remaining),
        row.status
    ));

    let join = |dates: &[chrono::NaiveDate]| {
        dates
            .iter()
            .copied()
            .map(format_date)
            .collect::<Vec<_>>()
            .join(", ")
    };
    if plan.total() == 0 {
        output::plain("  Jazdy:       brak terminów");
    } else {
        output::plain(format!(
            "  Zaplanowane: {}/{}",
            plan.scheduled.len(),
            plan.total()
        ));
        if !plan.scheduled.is_empty() {
            output::plain(format!("    {}", join(&plan.scheduled)));
        }
        if !plan.unscheduled.is_empty() {
            output::plain(format!("  Do zaplanowania: {}", join(&plan.unscheduled)));
        }
    }
    Ok(())
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, ADD_OPTIONS, &["paid"])?;
    if let Some(extra) = parsed.positional(0) {
        return Err(CommandError::InvalidArguments(format!(
            "unexpected argument `{extra}`"
        )));
    }

    let mut student = Student::default();
    if let Some(text) = parsed.value("paste") {
        let text = text.replace(';', "\n");
        context.manager.fill_student(&text, &mut student)?;
        output::info("Uzupełniono dane kursanta z wklejonego tekstu.");
    }
    apply_student_options(&parsed, &mut student);

    let mut form = ReservationForm::new(context.manager.state()).with_student(student);
    if let Some(category) = parsed.value("category") {
        form.category = parse_category(category)?;
    }
    if let Some(amount) = parsed.value("advance") {
        form.advance_amount = parse_amount(amount)?;
        form.advance_paid = true;
    }
    if parsed.has("paid") {
        form.advance_paid = true;
    }

    let request = match (parsed.value("course"), parsed.value("dates")) {
        (Some(_), Some(_)) => {
            return Err(CommandError::InvalidArguments(
                "use either `--course` or `--dates`, not both".into(),
            ))
        }
        (Some(raw), None) => BookingRequest::Course(resolve_course(context, Some(raw))?),
        (None, Some(raw)) => {
            let courses = &context.manager.state().courses;
            let mut selection = DateSelection::new();
            for date in parse_dates([raw])? {
                if !selection.dates().contains(&date) {
                    selection.toggle(courses, date)?;
                }
            }
            BookingRequest::Individual(selection)
        }
        (None, None) => BookingRequest::Course(String::new()),
    };

    let name = form.student.name.clone();
    let id = context.manager.create_reservation(form, request)?;
    let label = context
        .manager
        .state()
        .reservation(&id)
        .map(|reservation| booking_label(reservation, &context.manager.state().courses))
        .unwrap_or_default();
    output::success(format!(
        "Dodano rezerwację dla `{name}` ({}): {label}.",
        short_id(&id)
    ));
    Ok(())
}

fn apply_student_options(parsed: &ParsedArgs<'_>, student: &mut Student) {
    let set = |option: &str, field: &mut String| {
        if let Some(value) = parsed.value(option) {
            *field = value.trim().to_string();
        }
    };
    set("name", &mut student.name);
    set("phone", &mut student.phone);
    set("pesel", &mut student.pesel);
    set("email", &mut student.email);
    set("address", &mut student.address);
    if let Some(pkk) = parsed.value("pkk") {
        student.pkk = Some(pkk.trim().to_string()).filter(|pkk| !pkk.is_empty());
    }
}

fn handle_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &["yes"])?;
    let id = resolve_reservation(context, parsed.positional(0))?;
    let name = context
        .manager
        .state()
        .reservation(&id)
        .map(|reservation| reservation.student.name.clone())
        .unwrap_or_default();
    if !context.confirm(&format!("Usunąć rezerwację `{name}`?"), parsed.has("yes"))? {
        return Ok(());
    }
    let removed = context.manager.remove_reservation(&id)?;
    output::success(format!("Usunięto rezerwację `{}`.", removed.student.name));
    Ok(())
}

fn handle_courses(context: &mut ShellContext) -> CommandResult {
    let available = ReservationService::available_courses(context.manager.state());
    output::section("Kursy z wolnymi miejscami");
    if available.is_empty() {
        output::info("Brak kursów z wolnymi miejscami.");
        return Ok(());
    }
    let mut table = Table::new(["Id", "Nazwa", "Termin", "Wolne miejsca"]);
    for course in available {
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
