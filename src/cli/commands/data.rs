use std::path::PathBuf;

use osk_core::state_warnings;
use osk_storage_json::list_backups;

use super::{split_action, unknown_action};
use crate::cli::args::ParsedArgs;
use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

const USAGE: &str = "data backup [katalog]
data backups [katalog]
data import <plik> [--yes]
data check
data path";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "data",
        "Kopia zapasowa, import i kontrola danych",
        USAGE,
        cmd_data,
    )]
}

fn cmd_data(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, "data <backup|backups|import|check|path>")?;
    match action.as_str() {
        "backup" | "export" => handle_backup(context, rest),
        "backups" => handle_backups(context, rest),
        "import" => handle_import(context, rest),
        "check" => handle_check(context),
        "path" => handle_path(context),
        other => Err(unknown_action("data", other)),
    }
}

fn handle_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let directory = context.resolve_output_dir(args.first().copied());
    let path = context.manager.export_backup(&directory)?;
    output::success(format!("Zapisano kopię zapasową: {}", path.display()));
    Ok(())
}

fn handle_backups(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let directory = context.resolve_output_dir(args.first().copied());
    let backups = list_backups(&directory)?;
    output::section(format!("Kopie zapasowe w {}", directory.display()));
    if backups.is_empty() {
        output::info("Brak kopii zapasowych.");
    }
    for path in backups {
        output::plain(format!("  {}", path.display()));
    }
    Ok(())
}

fn handle_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &["yes"])?;
    let path = parsed
        .positional(0)
        .map(PathBuf::from)
        .ok_or_else(|| CommandError::usage("data import <plik> [--yes]"))?;
    let prompt = "Import zastąpi wszystkie obecne dane. Kontynuować?";
    if !context.confirm(prompt, parsed.has("yes"))? {
        return Ok(());
    }
    context.manager.import_backup(&path)?;
    output::success("Dane zostały zaimportowane.");
    for warning in context.manager.warnings() {
        output::warning(warning);
    }
    Ok(())
}

fn handle_check(context: &mut ShellContext) -> CommandResult {
    let warnings = state_warnings(context.manager.state());
    if warnings.is_empty() {
        output::success("Dane są spójne.");
        return Ok(());
    }
    output::section(format!("Znalezione problemy ({})", warnings.len()));
    for warning in warnings {
        output::warning(warning);
    }
    Ok(())
}

fn handle_path(context: &mut ShellContext) -> CommandResult {
    output::plain(format!("Dane:          {}", context.data_file().display()));
    output::plain(format!(
        "Konfiguracja:  {}",
        context.config_manager.config_path().display()
    ));
    output::plain(format!("Eksport:       {}", context.export_dir().display()));
    Ok(())
}
