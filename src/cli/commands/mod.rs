pub mod config;
pub mod course;
pub mod data;
pub mod export;
pub mod finance;
pub mod overview;
pub mod reservation;
pub mod schedule;
pub mod settings;
pub mod system;

use crate::cli::core::CommandError;
use crate::cli::registry::{CommandEntry, CommandRegistry};

const ROOT_COMMAND_ORDER: &[&str] = &[
    "dashboard",
    "calendar",
    "course",
    "reservation",
    "schedule",
    "finance",
    "export",
    "settings",
    "data",
    "config",
    "help",
    "version",
    "exit",
];

pub(crate) fn all_entries() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(overview::definitions());
    commands.extend(course::definitions());
    commands.extend(reservation::definitions());
    commands.extend(schedule::definitions());
    commands.extend(finance::definitions());
    commands.extend(export::definitions());
    commands.extend(settings::definitions());
    commands.extend(data::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let mut entries = all_entries();
    entries.sort_by_key(|entry| {
        ROOT_COMMAND_ORDER
            .iter()
            .position(|name| entry.name.eq_ignore_ascii_case(name))
            .unwrap_or(ROOT_COMMAND_ORDER.len())
    });
    for entry in entries {
        registry.register(entry);
    }
}

/// Splits `args` into the subcommand and its arguments.
pub(crate) fn split_action<'a, 'b>(
    args: &'b [&'a str],
    usage: &str,
) -> Result<(String, &'b [&'a str]), CommandError> {
    match args.split_first() {
        Some((action, rest)) => Ok((action.to_lowercase(), rest)),
        None => Err(CommandError::usage(usage)),
    }
}

pub(crate) fn unknown_action(command: &str, action: &str) -> CommandError {
    CommandError::InvalidArguments(format!("unknown {command} subcommand `{action}`"))
}
