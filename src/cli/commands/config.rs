use osk_config::Config;

use super::{split_action, unknown_action};
use crate::cli::core::{CliMode, CommandError, CommandResult};
use crate::cli::output::{self, OutputPreferences};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

const USAGE: &str = "config show
config get <klucz>
config set <klucz> <wartość>   (`default` przywraca wartość domyślną)

Klucze: data_dir, export_dir, default_export_format, log_filter, ui_color_enabled";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Konfiguracja programu",
        USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, "config <show|get|set>")?;
    match action.as_str() {
        "show" | "list" => handle_show(context),
        "get" => handle_get(context, rest),
        "set" => handle_set(context, rest),
        other => Err(unknown_action("config", other)),
    }
}

fn handle_show(context: &mut ShellContext) -> CommandResult {
    output::section("Konfiguracja");
    for key in Config::KEYS {
        let value = context.config.get(key)?;
        output::plain(format!("  {key:<22} {value}"));
    }
    output::plain(format!(
        "  {:<22} {}",
        "(plik)",
        context.config_manager.config_path().display()
    ));
    Ok(())
}

fn handle_get(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [key] = args else {
        return Err(CommandError::usage("config get <klucz>"));
    };
    output::plain(context.config.get(key)?);
    Ok(())
}

fn handle_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((key, value)) = args.split_first() else {
        return Err(CommandError::usage("config set <klucz> <wartość>"));
    };
    if value.is_empty() {
        return Err(CommandError::usage("config set <klucz> <wartość>"));
    }
    let value = value.join(" ");
    let mut updated = context.config.clone();
    updated.set(key, &value)?;
    context.config_manager.save(&updated)?;
    context.config = updated;

    if *key == "ui_color_enabled" {
        output::set_preferences(OutputPreferences {
            color_enabled: context.config.ui_color_enabled && context.mode == CliMode::Interactive,
            ..output::preferences()
        });
    }
    if matches!(*key, "data_dir" | "log_filter") {
        output::hint("Zmiana zacznie obowiązywać po ponownym uruchomieniu.");
    }
    output::success(format!("Ustawiono {key} = {}", context.config.get(key)?));
    Ok(())
}
