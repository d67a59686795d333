//! Row parsing service.
//!
//! Turns the cell texts of one results table row into a finisher, a
//! retirement, or nothing, by trying each configured [`ColumnLayout`] in
//! order until one yields a structurally valid parse.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{ColumnLayout, DnfEntry, Outcome, ParsedEntry};

/// Trailing `(note)`, `[a]` footnote or `*` marker.
static TRAILING_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*(?:\([^()]*\)|\[[^\[\]]*\]|\*+)\s*$").expect("annotation pattern is valid")
});

/// Reduce a driver cell to the surname used as the result key.
///
/// Trailing annotations are stripped, the last whitespace-separated token is
/// kept, and annotations are stripped again. Normalizing an already
/// normalized name returns it unchanged.
pub fn normalize_driver_name(raw: &str) -> String {
    let stripped = strip_annotations(raw);
    let surname = stripped.split_whitespace().last().unwrap_or("");
    strip_annotations(surname).to_string()
}

fn strip_annotations(text: &str) -> &str {
    let mut current = text.trim();
    while let Some(m) = TRAILING_ANNOTATION.find(current) {
        current = current[..m.start()].trim_end();
    }
    current
}

/// `true` for `^\d+$`.
fn is_unsigned_integer(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Substring check, so "Retired" and "DNF (engine)" both count.
fn is_retirement_marker(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("ret") || lower.contains("dnf")
}

/// Parses results rows against an ordered list of layouts.
#[derive(Debug, Clone)]
pub struct RowParser {
    layouts: Vec<ColumnLayout>,
    roster: Option<HashSet<String>>,
    min_width: usize,
}

impl RowParser {
    /// Create a row parser.
    ///
    /// With a roster, rows naming a driver outside it are skipped. That keeps
    /// stray tables from leaking into results, at the cost of silently
    /// dropping drivers the roster has not caught up with yet.
    pub fn new(layouts: Vec<ColumnLayout>, roster: Option<HashSet<String>>) -> Self {
        let min_width = layouts.iter().map(ColumnLayout::min_cells).min().unwrap_or(0);
        Self {
            layouts,
            roster,
            min_width,
        }
    }

    /// Classify a row.
    pub fn parse_row(&self, row: &[String]) -> Outcome {
        self.parse_row_with_layout(row).0
    }

    /// Classify a row and report which layout produced the parse.
    ///
    /// The layout name is `None` when every layout rejected the row.
    pub fn parse_row_with_layout(&self, row: &[String]) -> (Outcome, Option<&str>) {
        if self.layouts.is_empty() || row.len() < self.min_width {
            return (Outcome::Skip, None);
        }

        for layout in &self.layouts {
            let Some(outcome) = Self::apply_layout(layout, row) else {
                continue;
            };

            if let Some(roster) = &self.roster {
                let driver = match &outcome {
                    Outcome::Finisher(entry) => entry.driver.as_str(),
                    Outcome::Retirement(entry) => entry.driver.as_str(),
                    Outcome::Skip => "",
                };
                if !roster.contains(driver) {
                    log::debug!("Skipping '{}': not in roster", driver);
                    return (Outcome::Skip, Some(layout.name.as_str()));
                }
            }

            return (outcome, Some(layout.name.as_str()));
        }

        (Outcome::Skip, None)
    }

    fn apply_layout(layout: &ColumnLayout, row: &[String]) -> Option<Outcome> {
        if row.len() < layout.min_cells() {
            return None;
        }

        let driver_text = row[layout.driver].trim();
        if !driver_text.chars().any(char::is_alphabetic) {
            return None;
        }

        let position_text = row[layout.position].trim();
        let status_text = layout.status.map_or("", |i| row[i].trim());
        let numeric_position = is_unsigned_integer(position_text);
        let retired = is_retirement_marker(status_text)
            || (!numeric_position && is_retirement_marker(position_text));

        if !numeric_position && !retired {
            return None;
        }

        let driver = normalize_driver_name(driver_text);
        if driver.is_empty() {
            return None;
        }

        if retired {
            let lap = layout
                .laps
                .and_then(|i| row[i].trim().parse::<u32>().ok())
                .unwrap_or(0);
            return Some(Outcome::Retirement(DnfEntry { driver, lap }));
        }

        let position = position_text.parse::<u32>().ok().filter(|p| *p >= 1)?;
        Some(Outcome::Finisher(ParsedEntry { driver, position }))
    }
}

impl Default for RowParser {
    fn default() -> Self {
        Self::new(ColumnLayout::defaults(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn finisher(driver: &str, position: u32) -> Outcome {
        Outcome::Finisher(ParsedEntry {
            driver: driver.to_string(),
            position,
        })
    }

    fn retirement(driver: &str, lap: u32) -> Outcome {
        Outcome::Retirement(DnfEntry {
            driver: driver.to_string(),
            lap,
        })
    }

    #[test]
    fn test_normalize_strips_asterisk() {
        assert_eq!(normalize_driver_name("Verstappen*"), "Verstappen");
        assert_eq!(normalize_driver_name("Max Verstappen**"), "Verstappen");
    }

    #[test]
    fn test_normalize_strips_parenthetical() {
        assert_eq!(normalize_driver_name("Hulkenberg (FTD)"), "Hulkenberg");
        assert_eq!(normalize_driver_name("Nico Hülkenberg (FTD)"), "Hülkenberg");
    }

    #[test]
    fn test_normalize_strips_footnotes_and_stacked_markers() {
        assert_eq!(normalize_driver_name("Lewis Hamilton[a]"), "Hamilton");
        assert_eq!(normalize_driver_name("Oscar Piastri* (R) [1]"), "Piastri");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in [
            "Max Verstappen",
            "Verstappen*",
            "Hulkenberg (FTD)",
            "Zhou Guanyu",
            "  Charles   Leclerc ",
            "",
        ] {
            let once = normalize_driver_name(raw);
            assert_eq!(normalize_driver_name(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn test_standard_row_finisher() {
        let parser = RowParser::default();
        let cells = row(&["1", "", "Max Verstappen", "Red Bull", "58", "1:30:00", "1"]);
        assert_eq!(parser.parse_row(&cells), finisher("Verstappen", 1));
    }

    #[test]
    fn test_standard_row_with_car_number() {
        let parser = RowParser::default();
        let cells = row(&["3", "16", "Charles Leclerc", "Ferrari", "57", "+7.612", "2", "15"]);
        let (outcome, layout) = parser.parse_row_with_layout(&cells);
        assert_eq!(outcome, finisher("Leclerc", 3));
        assert_eq!(layout, Some("standard"));
    }

    #[test]
    fn test_row_without_number_column() {
        let parser = RowParser::default();
        let cells = row(&["2", "Lando Norris", "McLaren", "57", "+2.1", "3"]);
        let (outcome, layout) = parser.parse_row_with_layout(&cells);
        assert_eq!(outcome, finisher("Norris", 2));
        assert_eq!(layout, Some("without_number"));
    }

    #[test]
    fn test_retirement_reads_laps() {
        let parser = RowParser::default();
        let cells = row(&["DNF", "", "Checo Perez", "Red Bull", "45", "Retired", "3"]);
        assert_eq!(parser.parse_row(&cells), retirement("Perez", 45));
    }

    #[test]
    fn test_retirement_from_numeric_position_and_status() {
        let parser = RowParser::default();
        let cells = row(&["18", "2", "Logan Sargeant", "Williams", "27", "Ret", "20"]);
        assert_eq!(parser.parse_row(&cells), retirement("Sargeant", 27));
    }

    #[test]
    fn test_retirement_from_position_marker() {
        let parser = RowParser::default();
        let cells = row(&["Ret", "23", "Alexander Albon", "Williams", "12", "Collision", "14", ""]);
        assert_eq!(parser.parse_row(&cells), retirement("Albon", 12));
    }

    #[test]
    fn test_retirement_without_numeric_laps_defaults_to_zero() {
        let parser = RowParser::default();
        let cells = row(&["Ret", "", "Kevin Magnussen", "Haas", "—", "Retired", "10"]);
        assert_eq!(parser.parse_row(&cells), retirement("Magnussen", 0));

        let no_laps = RowParser::new(
            vec![ColumnLayout::new("no_laps", 0, 2, Some(3), None)],
            None,
        );
        let cells = row(&["Ret", "", "Kevin Magnussen", "DNF"]);
        assert_eq!(no_laps.parse_row(&cells), retirement("Magnussen", 0));
    }

    #[test]
    fn test_status_substring_is_permissive() {
        let parser = RowParser::default();
        let cells = row(&["5", "", "Some Driver", "Team", "50", "Interpreted penalty", "4"]);
        assert_eq!(parser.parse_row(&cells), retirement("Driver", 50));
    }

    #[test]
    fn test_short_row_is_skipped() {
        let parser = RowParser::default();
        assert_eq!(parser.parse_row(&row(&["1", "Max Verstappen", "x"])), Outcome::Skip);
        assert_eq!(parser.parse_row(&row(&[])), Outcome::Skip);
    }

    #[test]
    fn test_non_numeric_position_is_skipped() {
        let parser = RowParser::default();
        let cells = row(&["DSQ", "", "Some Driver", "Team", "50", "Disqualified", "4"]);
        assert_eq!(parser.parse_row(&cells), Outcome::Skip);
        let cells = row(&["1st", "", "Some Driver", "Team", "50", "1:30:00", "4"]);
        assert_eq!(parser.parse_row(&cells), Outcome::Skip);
    }

    #[test]
    fn test_zero_position_is_skipped() {
        let parser = RowParser::default();
        let cells = row(&["0", "", "Some Driver", "Team", "50", "1:30:00", "4"]);
        assert_eq!(parser.parse_row(&cells), Outcome::Skip);
    }

    #[test]
    fn test_empty_driver_is_skipped() {
        let parser = RowParser::default();
        let cells = row(&["1", "", "  ", "Red Bull", "58", "1:30:00", "1"]);
        assert_eq!(parser.parse_row(&cells), Outcome::Skip);
    }

    #[test]
    fn test_roster_filters_unknown_drivers() {
        let roster: HashSet<String> = ["Verstappen".to_string()].into_iter().collect();
        let parser = RowParser::new(ColumnLayout::defaults(), Some(roster));

        let known = row(&["1", "", "Max Verstappen", "Red Bull", "58", "1:30:00", "1"]);
        assert_eq!(parser.parse_row(&known), finisher("Verstappen", 1));

        let unknown = row(&["2", "", "Jane Rookie", "Team", "58", "+1.0", "2"]);
        let (outcome, layout) = parser.parse_row_with_layout(&unknown);
        assert_eq!(outcome, Outcome::Skip);
        assert_eq!(layout, Some("standard"));
    }

    #[test]
    fn test_first_valid_layout_wins() {
        let parser = RowParser::new(
            vec![
                ColumnLayout::new("first", 0, 1, None, None),
                ColumnLayout::new("second", 0, 2, None, None),
            ],
            None,
        );
        let cells = row(&["4", "Alpha Driver", "Beta Driver"]);
        let (outcome, layout) = parser.parse_row_with_layout(&cells);
        assert_eq!(outcome, finisher("Driver", 4));
        assert_eq!(layout, Some("first"));
    }
}
