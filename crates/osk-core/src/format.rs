use chrono::{Datelike, NaiveDate, NaiveDateTime};

pub const CURRENCY_SUFFIX: &str = "zł";

const MONTHS: [&str; 12] = [
    "styczeń",
    "luty",
    "marzec",
    "kwiecień",
    "maj",
    "czerwiec",
    "lipiec",
    "sierpień",
    "wrzesień",
    "październik",
    "listopad",
    "grudzień",
];

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: f64, currency: &str) -> String;
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
}

/// Polish presentation rules used throughout reports and listings.
#[derive(Debug, Default, Clone, Copy)]
pub struct PolishFormatter;

impl CurrencyFormatter for PolishFormatter {
    fn format_amount(&self, amount: f64, currency: &str) -> String {
        format!("{amount:.2} {currency}")
    }
}

impl DateFormatter for PolishFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        date.format("%d.%m.%Y").to_string()
    }
}

/// `3200.00 zł`
pub fn format_money(amount: f64) -> String {
    PolishFormatter.format_amount(amount, CURRENCY_SUFFIX)
}

/// Like [`format_money`] with a whole-number `.00` dropped: `3200 zł`, `12.50 zł`.
pub fn format_money_compact(amount: f64) -> String {
    let fixed = format!("{amount:.2}");
    let trimmed = fixed.strip_suffix(".00").unwrap_or(&fixed);
    format!("{trimmed} {CURRENCY_SUFFIX}")
}

/// Shortest plain rendering of an amount: `300`, `300.5`.
pub fn format_plain_amount(amount: f64) -> String {
    format!("{amount}")
}

/// `01.03.2024`
pub fn format_date(date: NaiveDate) -> String {
    PolishFormatter.format_date(date)
}

/// `1.03.2024`, the day left unpadded.
pub fn format_short_date(date: NaiveDate) -> String {
    format!("{}.{:02}.{}", date.day(), date.month(), date.year())
}

/// `1.03.2024, 09:05:00`
pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    format!(
        "{}, {}",
        format_short_date(timestamp.date()),
        timestamp.format("%H:%M:%S")
    )
}

const MONTHS_SHORT: [&str; 12] = [
    "sty", "lut", "mar", "kwi", "maj", "cze", "lip", "sie", "wrz", "paź", "lis", "gru",
];

/// `01 mar`
pub fn format_day_month(date: NaiveDate) -> String {
    let month = MONTHS_SHORT
        .get(date.month0() as usize)
        .copied()
        .unwrap_or_default();
    format!("{:02} {month}", date.day())
}

pub fn month_name(month: u32) -> &'static str {
    MONTHS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or_default()
}

/// `marzec 2024`
pub fn month_label(date: NaiveDate) -> String {
    format!("{} {}", month_name(date.month()), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_formats() {
        assert_eq!(format_money(3200.0), "3200.00 zł");
        assert_eq!(format_money_compact(3200.0), "3200 zł");
        assert_eq!(format_money_compact(12.5), "12.50 zł");
        assert_eq!(format_money_compact(-300.0), "-300 zł");
        assert_eq!(format_plain_amount(300.0), "300");
        assert_eq!(format_plain_amount(300.5), "300.5");
    }

    #[test]
    fn date_formats() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(format_date(date), "01.03.2024");
        assert_eq!(format_short_date(date), "1.03.2024");
        assert_eq!(month_label(date), "marzec 2024");
        assert_eq!(format_day_month(date), "01 mar");
        let stamp = date.and_hms_opt(9, 5, 0).unwrap();
        assert_eq!(format_timestamp(stamp), "1.03.2024, 09:05:00");
    }
}
