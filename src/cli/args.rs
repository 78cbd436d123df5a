//! Token-level parsing for script-friendly command arguments.

use chrono::NaiveDate;
use osk_domain::{parse_iso_date, CourseCategory, TimeOfDay};

use crate::cli::core::CommandError;

/// Positional arguments plus `--option value` / `--option=value` pairs and bare switches.
#[derive(Debug, Default)]
pub struct ParsedArgs<'a> {
    positional: Vec<&'a str>,
    options: Vec<(&'a str, &'a str)>,
    switches: Vec<&'a str>,
}

impl<'a> ParsedArgs<'a> {
    /// `valued` options consume the next token; `switches` stand alone.
    pub fn parse(
        args: &[&'a str],
        valued: &[&str],
        switches: &[&str],
    ) -> Result<Self, CommandError> {
        let mut parsed = ParsedArgs::default();
        let mut tokens = args.iter().copied();
        while let Some(token) = tokens.next() {
            let Some(flag) = token.strip_prefix("--") else {
                parsed.positional.push(token);
                continue;
            };
            if let Some((name, value)) = flag.split_once('=') {
                if !valued.contains(&name) {
                    return Err(unknown_option(name));
                }
                parsed.options.push((name, value));
            } else if valued.contains(&flag) {
                let value = tokens.next().ok_or_else(|| {
                    CommandError::InvalidArguments(format!("option `--{flag}` needs a value"))
                })?;
                parsed.options.push((flag, value));
            } else if switches.contains(&flag) {
                parsed.switches.push(flag);
            } else {
                return Err(unknown_option(flag));
            }
        }
        Ok(parsed)
    }

    pub fn positional(&self, index: usize) -> Option<&'a str> {
        self.positional.get(index).copied()
    }

    pub fn positionals(&self) -> &[&'a str] {
        &self.positional
    }

    /// Last value given for `name`.
    pub fn value(&self, name: &str) -> Option<&'a str> {
        self.options
            .iter()
            .rev()
            .find(|(option, _)| *option == name)
            .map(|(_, value)| *value)
    }

    pub fn has(&self, name: &str) -> bool {
        self.switches.contains(&name)
    }
}

fn unknown_option(name: &str) -> CommandError {
    CommandError::InvalidArguments(format!("unknown option `--{name}`"))
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    parse_iso_date(raw).map_err(|err| CommandError::InvalidArguments(err.to_string()))
}

/// Dates given as separate tokens and/or comma separated lists.
pub fn parse_dates<'a>(
    raw: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<NaiveDate>, CommandError> {
    raw.into_iter()
        .flat_map(|token| token.split(','))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_date)
        .collect()
}

pub fn parse_time(raw: &str) -> Result<TimeOfDay, CommandError> {
    raw.parse::<TimeOfDay>()
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))
}

/// Accepts `3200`, `3200.50` and `3200,50`.
pub fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid amount `{raw}`")))
}

pub fn parse_count(raw: &str) -> Result<u32, CommandError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid number `{raw}`")))
}

pub fn parse_category(raw: &str) -> Result<CourseCategory, CommandError> {
    raw.parse::<CourseCategory>()
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))
}

/// Resolves a full id or a unique prefix of one.
pub fn resolve_id<'a>(
    ids: impl IntoIterator<Item = &'a str>,
    raw: &str,
    kind: &str,
) -> Result<String, CommandError> {
    let mut matches = Vec::new();
    for id in ids {
        if id == raw {
            return Ok(id.to_string());
        }
        if id.starts_with(raw) {
            matches.push(id);
        }
    }
    match matches.as_slice() {
        [single] => Ok(single.to_string()),
        [] => Err(CommandError::Message(format!("Nie znaleziono {kind}: {raw}"))),
        _ => Err(CommandError::InvalidArguments(format!(
            "identifier `{raw}` is ambiguous ({} matches)",
            matches.len()
        ))),
    }
}

/// Like [`resolve_id`], but also accepts the exact name (case-insensitive).
pub fn resolve_named<'a>(
    items: impl IntoIterator<Item = (&'a str, &'a str)> + Clone,
    raw: &str,
    kind: &str,
) -> Result<String, CommandError> {
    match resolve_id(items.clone().into_iter().map(|(id, _)| id), raw, kind) {
        Err(CommandError::Message(not_found)) => {
            let needle = raw.trim().to_lowercase();
            let named: Vec<&str> = items
                .into_iter()
                .filter(|(_, name)| name.to_lowercase() == needle)
                .map(|(id, _)| id)
                .collect();
            match named.as_slice() {
                [single] => Ok(single.to_string()),
                [] => Err(CommandError::Message(not_found)),
                _ => Err(CommandError::InvalidArguments(format!(
                    "name `{raw}` is ambiguous, use the id"
                ))),
            }
        }
        other => other,
    }
}

/// First eight characters, enough to type back as a prefix.
pub fn short_id(id: &str) -> &str {
    id.char_indices()
        .nth(8)
        .map(|(index, _)| &id[..index])
        .unwrap_or(id)
}
