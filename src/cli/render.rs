//! Plain-text tables and the month calendar.

use osk_core::MonthGrid;

use crate::cli::output;

/// Column-aligned table sized to its widest cell.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row<S: Into<String>>(&mut self, cells: impl IntoIterator<Item = S>) {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (index, cell) in row.iter().enumerate() {
                let width = cell.chars().count();
                match widths.get_mut(index) {
                    Some(current) => *current = (*current).max(width),
                    None => widths.push(width),
                }
            }
        }
        widths
    }

    pub fn lines(&self) -> Vec<String> {
        let widths = self.widths();
        let format_row = |cells: &[String]| {
            widths
                .iter()
                .enumerate()
                .map(|(index, width)| {
                    let cell = cells.get(index).map(String::as_str).unwrap_or("");
                    let pad = width.saturating_sub(cell.chars().count());
                    format!("{cell}{}", " ".repeat(pad))
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };
        let total = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        let mut lines = vec![format_row(&self.headers), "-".repeat(total)];
        lines.extend(self.rows.iter().map(|row| format_row(row)));
        lines
    }

    pub fn print(&self) {
        for line in self.lines() {
            output::plain(line);
        }
    }
}

/// Month grid as text: `[dd]` occupied by a course, `(dd)` individual,
/// `*dd*` today, ` dd ` free; days of neighbouring months are dotted.
pub fn calendar_lines(grid: &MonthGrid) -> Vec<String> {
    let mut lines = vec![" Pn   Wt   Śr   Cz   Pt   So   Nd".to_string()];
    for week in grid.weeks() {
        let cells: Vec<String> = week
            .iter()
            .map(|day| {
                let number = chrono::Datelike::day(&day.date);
                if !day.in_month {
                    return " .. ".to_string();
                }
                match (day.course_id.is_some(), day.individual, day.is_today) {
                    (true, true, _) => format!("({number:>2})"),
                    (true, false, _) => format!("[{number:>2}]"),
                    (false, _, true) => format!("*{number:>2}*"),
                    (false, _, false) => format!(" {number:>2} "),
                }
            })
            .collect();
        lines.push(cells.join(" "));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use osk_domain::Course;

    #[test]
    fn table_pads_to_widest_cell() {
        let mut table = Table::new(["Kurs", "Miejsca"]);
        table.add_row(["Kat B 03/2024", "9"]);
        let lines = table.lines();
        assert_eq!(lines[0], "Kurs           Miejsca");
        assert_eq!(lines[1].len(), "Kat B 03/2024".len() + 2 + "Miejsca".len());
        assert_eq!(lines[2], "Kat B 03/2024  9");
    }

    #[test]
    fn calendar_marks_course_days() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        let courses = vec![Course::new("B", 10, [day(1)])];
        let grid = MonthGrid::build(2024, 3, &courses, None, day(4)).unwrap();
        let lines = calendar_lines(&grid);
        assert_eq!(lines.len(), 1 + 5);
        assert_eq!(lines[1], " ..   ..   ..   ..  [ 1]   2    3 ");
        assert!(lines[2].starts_with("* 4*"));
    }
}
