use osk_core::{format_money, SettingsDraft};
use osk_domain::CourseCategory;

use super::{split_action, unknown_action};
use crate::cli::args::{parse_amount, parse_category, parse_time, resolve_id, ParsedArgs};
use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::render::Table;
use crate::cli::shell_context::ShellContext;

const USAGE: &str = "settings show
settings title <nazwa>
settings price <A|B|C|D> <kwota>
settings hours <GG:MM> <GG:MM>
settings advance <kwota>
settings instructor-add <imię i nazwisko> [--color <#hex>]
settings instructor-remove <id>
settings save
settings cancel

Zmiany czekają w szkicu aż do `settings save`.";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "settings",
        "Ustawienia szkoły (ceny, instruktorzy, godziny pracy)",
        USAGE,
        cmd_settings,
    )]
}

fn cmd_settings(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(
        args,
        "settings <show|title|price|hours|advance|instructor-add|instructor-remove|save|cancel>",
    )?;
    match action.as_str() {
        "show" => handle_show(context),
        "title" => handle_title(context, rest),
        "price" => handle_price(context, rest),
        "hours" => handle_hours(context, rest),
        "advance" => handle_advance(context, rest),
        "instructor-add" => handle_instructor_add(context, rest),
        "instructor-remove" => handle_instructor_remove(context, rest),
        "save" => handle_save(context),
        "cancel" => handle_cancel(context),
        other => Err(unknown_action("settings", other)),
    }
}

fn staged() {
    output::hint("Zmiana czeka w szkicu. Użyj `settings save`, aby ją zapisać.");
}

fn handle_show(context: &mut ShellContext) -> CommandResult {
    let dirty = context.manager.has_unsaved_settings();
    let draft: &SettingsDraft = context.manager.settings_draft();

    output::section("Ustawienia");
    output::plain(format!("  Nazwa:          {}", draft.app_title()));
    let hours = draft.operating_hours();
    output::plain(format!("  Godziny pracy:  {} - {}", hours.start, hours.end));
    output::plain(format!(
        "  Zaliczka:       {}",
        format_money(draft.default_advance_amount())
    ));
    let prices: Vec<String> = CourseCategory::ALL
        .iter()
        .map(|category| {
            format!(
                "{category}: {}",
                format_money(draft.course_prices().price_for(*category))
            )
        })
        .collect();
    output::plain(format!("  Ceny:           {}", prices.join("   ")));

    output::section("Instruktorzy");
    let mut table = Table::new(["Id", "Imię i nazwisko", "Kolor"]);
    for instructor in draft.instructors() {
        table.add_row([
            instructor.id.clone(),
            instructor.name.clone(),
            instructor.color.clone(),
        ]);
    }
    table.print();

    if dirty {
        output::warning("Są niezapisane zmiany. Użyj `settings save` lub `settings cancel`.");
    }
    Ok(())
}

fn handle_title(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::usage("settings title <nazwa>"));
    }
    context.manager.settings_draft().set_app_title(args.join(" "));
    staged();
    Ok(())
}

fn handle_price(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [category, amount] = args else {
        return Err(CommandError::usage("settings price <A|B|C|D> <kwota>"));
    };
    let category = parse_category(category)?;
    let amount = parse_amount(amount)?;
    context.manager.settings_draft().set_price(category, amount)?;
    staged();
    Ok(())
}

fn handle_hours(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [start, end] = args else {
        return Err(CommandError::usage("settings hours <GG:MM> <GG:MM>"));
    };
    let start = parse_time(start)?;
    let end = parse_time(end)?;
    if end <= start {
        return Err(CommandError::InvalidArguments(
            "closing time must be after opening time".into(),
        ));
    }
    context.manager.settings_draft().set_operating_hours(start, end);
    staged();
    Ok(())
}

fn handle_advance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [amount] = args else {
        return Err(CommandError::usage("settings advance <kwota>"));
    };
    let amount = parse_amount(amount)?;
    context.manager.settings_draft().set_default_advance(amount)?;
    staged();
    Ok(())
}

fn handle_instructor_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["color"], &[])?;
    let name = parsed.positionals().join(" ");
    let id = context
        .manager
        .settings_draft()
        .add_instructor(&name, parsed.value("color"))?;
    output::success(format!("Dodano instruktora `{}` ({id}).", name.trim()));
    staged();
    Ok(())
}

fn handle_instructor_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args
        .first()
        .ok_or_else(|| CommandError::usage("settings instructor-remove <id>"))?;
    let draft = context.manager.settings_draft();
    let id = resolve_id(
        draft.instructors().iter().map(|instructor| instructor.id.as_str()),
        raw,
        "instruktora",
    )?;
    let removed = draft.remove_instructor(&id)?;
    output::success(format!("Usunięto instruktora `{}`.", removed.name));
    staged();
    Ok(())
}

fn handle_save(context: &mut ShellContext) -> CommandResult {
    if !context.manager.has_unsaved_settings() {
        context.manager.cancel_settings();
        output::info("Brak zmian do zapisania.");
        return Ok(());
    }
    context.manager.save_settings();
    output::success("Ustawienia zostały zapisane.");
    Ok(())
}

fn handle_cancel(context: &mut ShellContext) -> CommandResult {
    let dirty = context.manager.has_unsaved_settings();
    context.manager.cancel_settings();
    if dirty {
        output::info("Odrzucono niezapisane zmiany.");
    } else {
        output::info("Brak zmian do odrzucenia.");
    }
    Ok(())
}
