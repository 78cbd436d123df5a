use osk_core::{
    finance_rows, financial_summary, format_money, format_money_compact, PaymentStatus,
};

use crate::cli::args::{short_id, ParsedArgs};
use crate::cli::core::CommandResult;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::render::Table;
use crate::cli::shell_context::ShellContext;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "finance",
        "Rozliczenia kursantów i podsumowanie finansów",
        "finance [--due]",
        cmd_finance,
    )]
}

fn cmd_finance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &["due"])?;
    let state = context.manager.state();
    let rows: Vec<_> = finance_rows(state)
        .into_iter()
        .filter(|row| !parsed.has("due") || row.status == PaymentStatus::Due)
        .collect();

    output::section("Finanse");
    if rows.is_empty() {
        output::info("Brak rezerwacji do rozliczenia.");
    } else {
        let mut table = Table::new([
            "Id", "Kursant", "Kurs", "Kat.", "Cena", "Wpłacono", "Pozostało", "Status",
        ]);
        for row in rows {
            table.add_row([
                short_id(&row.reservation_id).to_string(),
                row.student_name,
                row.course_label,
                row.category.to_string(),
                format_money(row.price),
                format_money(row.paid),
                format_money(row.remaining),
                row.status.to_string(),
            ]);
        }
        table.print();
    }

    let summary = financial_summary(state);
    output::section("Podsumowanie");
    output::plain(format!("  Przychód:    {}", format_money_compact(summary.revenue)));
    output::plain(format!("  Wpłacono:    {}", format_money_compact(summary.paid)));
    output::plain(format!("  Do zapłaty:  {}", format_money_compact(summary.outstanding)));
    Ok(())
}
