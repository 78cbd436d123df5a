use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub fn print_overview(registry: &CommandRegistry) {
    output::section("Dostępne polecenia");
    for entry in registry.list() {
        output::plain(format!("  {:<12} {}", entry.name, entry.description));
    }
    output::hint("Użyj `help <polecenie>`, aby zobaczyć szczegóły.");
}

pub fn print_command(entry: &CommandEntry) {
    output::section(format!("Pomoc: {}", entry.name));
    output::plain(format!("  Opis:   {}", entry.description));
    for (index, line) in entry.usage.lines().enumerate() {
        let label = if index == 0 { "  Użycie:" } else { "         " };
        output::plain(format!("{label} {line}"));
    }
}
