use osk_core::{ExportDocument, ExportFormat, ExportPeriod, InstructorFilter};

use super::course::resolve_course;
use super::{split_action, unknown_action};
use crate::cli::args::{resolve_id, ParsedArgs};
use crate::cli::core::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

const USAGE: &str = "export schedule [--instructor <id>|all] [--period day|week|month|all] [--format txt|doc] [--out <katalog>] [--print]
export students [--course <id>] [--period day|week|month|all] [--format txt|doc] [--out <katalog>] [--print]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "export",
        "Raporty grafiku i kursantów do pliku",
        USAGE,
        cmd_export,
    )]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, "export <schedule|students>")?;
    match action.as_str() {
        "schedule" | "grafik" => export_schedule(context, rest),
        "students" | "kursanci" => export_students(context, rest),
        other => Err(unknown_action("export", other)),
    }
}

struct ReportOptions<'a> {
    period: ExportPeriod,
    format: ExportFormat,
    out: Option<&'a str>,
    print: bool,
}

fn report_options<'a>(
    context: &ShellContext,
    parsed: &ParsedArgs<'a>,
) -> Result<ReportOptions<'a>, CommandError> {
    let period = match parsed.value("period") {
        Some(raw) => raw.parse::<ExportPeriod>()?,
        None => ExportPeriod::default(),
    };
    let format = match parsed.value("format") {
        Some(raw) => raw.parse::<ExportFormat>()?,
        None => context.default_export_format(),
    };
    Ok(ReportOptions {
        period,
        format,
        out: parsed.value("out"),
        print: parsed.has("print"),
    })
}

fn export_schedule(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["instructor", "period", "format", "out"], &["print"])?;
    let options = report_options(context, &parsed)?;
    let filter = match parsed.value("instructor").map(InstructorFilter::parse) {
        Some(InstructorFilter::Only(raw)) => {
            let instructors = &context.manager.state().instructors;
            InstructorFilter::Only(resolve_id(
                instructors.iter().map(|instructor| instructor.id.as_str()),
                &raw,
                "instruktora",
            )?)
        }
        _ => InstructorFilter::All,
    };
    let document = context
        .manager
        .export_schedule(&filter, options.period, options.format)?;
    deliver(context, &document, &options)
}

fn export_students(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["course", "period", "format", "out"], &["print"])?;
    let options = report_options(context, &parsed)?;
    let course = parsed
        .value("course")
        .map(|raw| resolve_course(context, Some(raw)))
        .transpose()?;
    let document = context
        .manager
        .export_students(course.as_deref(), options.period, options.format)?;
    deliver(context, &document, &options)
}

fn deliver(
    context: &ShellContext,
    document: &ExportDocument,
    options: &ReportOptions<'_>,
) -> CommandResult {
    if options.print {
        for line in document.content.lines() {
            output::plain(line);
        }
        return Ok(());
    }
    let directory = context.resolve_output_dir(options.out);
    let path = context.manager.write_document(document, &directory)?;
    output::success(format!("Zapisano raport: {}", path.display()));
    Ok(())
}
