//! Results table detection service.
//!
//! Picks the race classification table out of every candidate table on a
//! race report page. A table is matched first by its label (caption, or the
//! nearest section heading when uncaptioned) and, failing that, by the
//! keywords in its header row. Within each pass the first table in document
//! order wins.

use scraper::{ElementRef, Html, Selector};

use crate::error::Result;
use crate::models::{CaptionMatch, ExtractorConfig, HeaderMatch, MatchedBy, RawRow};
use crate::utils::{element_text, parse_selector};

/// A selected results table.
#[derive(Debug, Clone)]
pub struct TableMatch<'a> {
    pub table: ElementRef<'a>,
    /// Position among candidate tables, in document order
    pub index: usize,
    pub matched_by: MatchedBy,
    /// Caption or section heading text
    pub label: Option<String>,
    /// Lower-cased header cell texts
    pub headers: Vec<String>,
}

impl TableMatch<'_> {
    /// Cell texts of every data row (rows with at least one `td`).
    pub fn rows(&self) -> Vec<RawRow> {
        data_rows(self.table)
    }
}

/// Outcome of scanning a document for the results table.
#[derive(Debug, Clone)]
pub struct TableSelection<'a> {
    pub candidates: usize,
    pub selected: Option<TableMatch<'a>>,
}

struct Candidate<'a> {
    table: ElementRef<'a>,
    label: Option<(String, MatchedBy)>,
    headers: Vec<String>,
}

/// Locates the results table using caption and header heuristics.
#[derive(Debug, Clone)]
pub struct TableSelector {
    tables: Selector,
    headings: Selector,
    caption_policy: CaptionMatch,
    caption_phrase: String,
    caption_keywords: Vec<String>,
    exclude: Vec<String>,
    section_headings: bool,
    header_policy: HeaderMatch,
    header_keywords: Vec<String>,
    header_exclude: Vec<String>,
}

fn lowered(words: &[String]) -> Vec<String> {
    words
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

fn is_heading(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

fn row_cells<'a>(row: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "td" | "th"))
}

fn has_data_cell(row: ElementRef<'_>) -> bool {
    row_cells(row).any(|cell| cell.value().name() == "td")
}

fn table_rows(table: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    table
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "tr")
}

fn data_rows(table: ElementRef<'_>) -> Vec<RawRow> {
    table_rows(table)
        .filter(|row| has_data_cell(*row))
        .map(|row| row_cells(row).map(|cell| element_text(&cell)).collect())
        .collect()
}

fn header_texts(table: ElementRef<'_>) -> Vec<String> {
    table_rows(table)
        .filter(|row| !has_data_cell(*row))
        .flat_map(row_cells)
        .map(|cell| element_text(&cell).to_lowercase())
        .filter(|text| !text.is_empty())
        .collect()
}

fn caption_text(table: ElementRef<'_>) -> Option<String> {
    table
        .children()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "caption")
        .map(|caption| element_text(&caption))
        .filter(|text| !text.is_empty())
}

impl TableSelector {
    /// Create a table selector from extractor configuration.
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        Ok(Self {
            tables: parse_selector(&config.table_selector)?,
            headings: parse_selector("h1, h2, h3, h4, h5, h6")?,
            caption_policy: config.caption.policy,
            caption_phrase: config.caption.phrase.trim().to_lowercase(),
            caption_keywords: lowered(&config.caption.keywords),
            exclude: lowered(&config.caption.exclude),
            section_headings: config.caption.section_headings,
            header_policy: config.header.policy,
            header_keywords: lowered(&config.header.keywords),
            header_exclude: lowered(&config.header.exclude),
        })
    }

    /// Find the results table in a parsed document.
    pub fn select_results_table<'a>(&self, document: &'a Html) -> TableSelection<'a> {
        let candidates: Vec<Candidate<'a>> = document
            .select(&self.tables)
            .map(|table| self.describe(table))
            .collect();

        let by_label = candidates.iter().enumerate().find(|(_, c)| {
            c.label
                .as_ref()
                .is_some_and(|(text, _)| self.label_matches(text))
        });

        let found = by_label
            .map(|(index, c)| {
                let kind = c.label.as_ref().map_or(MatchedBy::Caption, |(_, k)| *k);
                (index, c, kind)
            })
            .or_else(|| {
                candidates
                    .iter()
                    .enumerate()
                    .find(|(_, c)| !self.is_excluded(c) && self.headers_match(&c.headers))
                    .map(|(index, c)| (index, c, MatchedBy::Header))
            });

        let selected = found.map(|(index, c, matched_by)| TableMatch {
            table: c.table,
            index,
            matched_by,
            label: c.label.as_ref().map(|(text, _)| text.clone()),
            headers: c.headers.clone(),
        });

        TableSelection {
            candidates: candidates.len(),
            selected,
        }
    }

    fn describe<'a>(&self, table: ElementRef<'a>) -> Candidate<'a> {
        let label = caption_text(table)
            .map(|text| (text, MatchedBy::Caption))
            .or_else(|| {
                self.section_headings
                    .then(|| self.section_heading(table))
                    .flatten()
                    .map(|text| (text, MatchedBy::SectionHeading))
            });

        Candidate {
            table,
            label,
            headers: header_texts(table),
        }
    }

    /// Nearest heading before `table` in document order.
    fn section_heading(&self, table: ElementRef<'_>) -> Option<String> {
        let mut node = Some(*table);
        while let Some(current) = node {
            for sibling in current.prev_siblings() {
                let Some(el) = ElementRef::wrap(sibling) else {
                    continue;
                };
                if is_heading(el.value().name()) {
                    return Some(element_text(&el));
                }
                if el.value().name() == "table" {
                    continue;
                }
                if let Some(heading) = el.select(&self.headings).last() {
                    return Some(element_text(&heading));
                }
            }
            node = current.parent();
        }
        None
    }

    fn label_matches(&self, label: &str) -> bool {
        let lower = label.to_lowercase();
        if self.exclude.iter().any(|k| lower.contains(k.as_str())) {
            return false;
        }
        match self.caption_policy {
            CaptionMatch::Phrase => {
                !self.caption_phrase.is_empty() && lower.contains(&self.caption_phrase)
            }
            CaptionMatch::AnyKeyword => self
                .caption_keywords
                .iter()
                .any(|k| lower.contains(k.as_str())),
        }
    }

    fn is_excluded(&self, candidate: &Candidate<'_>) -> bool {
        let label_excluded = candidate.label.as_ref().is_some_and(|(text, _)| {
            let lower = text.to_lowercase();
            self.exclude.iter().any(|k| lower.contains(k.as_str()))
        });
        let header_excluded = candidate
            .headers
            .iter()
            .any(|h| self.header_exclude.iter().any(|k| h.contains(k.as_str())));
        label_excluded || header_excluded
    }

    fn headers_match(&self, headers: &[String]) -> bool {
        let hits = self
            .header_keywords
            .iter()
            .filter(|k| headers.iter().any(|h| h.contains(k.as_str())))
            .count();

        match self.header_policy {
            HeaderMatch::Any => hits > 0,
            HeaderMatch::All => {
                !self.header_keywords.is_empty() && hits == self.header_keywords.len()
            }
            HeaderMatch::AtLeast(n) => n > 0 && hits >= n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CaptionRule, HeaderRule};

    fn selector() -> TableSelector {
        TableSelector::new(&ExtractorConfig::default()).unwrap()
    }

    fn select_index(selector: &TableSelector, html: &str) -> Option<(usize, MatchedBy)> {
        let document = Html::parse_document(html);
        selector
            .select_results_table(&document)
            .selected
            .map(|m| (m.index, m.matched_by))
    }

    const HEADER: &str =
        "<tr><th>Pos.</th><th>No.</th><th>Driver</th><th>Constructor</th><th>Laps</th><th>Time/Retired</th><th>Grid</th></tr>";

    #[test]
    fn test_caption_match() {
        let html = format!(
            r#"<table class="wikitable"><caption>Fastest laps</caption><tr><td>x</td></tr></table>
               <table class="wikitable"><caption>2024 Race Result</caption>{HEADER}</table>"#
        );
        assert_eq!(select_index(&selector(), &html), Some((1, MatchedBy::Caption)));
    }

    #[test]
    fn test_first_matching_table_in_document_order() {
        let html = format!(
            r#"<table class="wikitable"><caption>Race classification</caption>{HEADER}</table>
               <table class="wikitable"><caption>Race result</caption>{HEADER}</table>"#
        );
        assert_eq!(select_index(&selector(), &html), Some((0, MatchedBy::Caption)));
    }

    #[test]
    fn test_caption_beats_earlier_header_match() {
        let html = format!(
            r#"<table class="wikitable">{HEADER}</table>
               <table class="wikitable"><caption>Race result</caption>{HEADER}</table>"#
        );
        assert_eq!(select_index(&selector(), &html), Some((1, MatchedBy::Caption)));
    }

    #[test]
    fn test_excluded_caption_is_skipped() {
        let html = format!(
            r#"<table class="wikitable"><caption>Qualifying classification</caption>{HEADER}</table>
               <table class="wikitable"><caption>Race classification</caption>{HEADER}</table>"#
        );
        assert_eq!(select_index(&selector(), &html), Some((1, MatchedBy::Caption)));
    }

    #[test]
    fn test_strict_phrase_policy() {
        let config = ExtractorConfig {
            caption: CaptionRule {
                policy: CaptionMatch::Phrase,
                ..CaptionRule::default()
            },
            ..ExtractorConfig::default()
        };
        let selector = TableSelector::new(&config).unwrap();
        let html = r#"<table class="wikitable"><caption>Race classification</caption><tr><td>x</td></tr></table>
                      <table class="wikitable"><caption>Official race results</caption><tr><td>x</td></tr></table>"#;
        assert_eq!(select_index(&selector, html), Some((1, MatchedBy::Caption)));
    }

    #[test]
    fn test_section_heading_fallback() {
        let html = format!(
            r#"<div class="mw-heading mw-heading3"><h3 id="Qualifying">Qualifying</h3></div>
               <table class="wikitable"><tr><th>Pos.</th><th>Driver</th><th>Q1</th></tr></table>
               <div class="mw-heading mw-heading3"><h3 id="Sprint">Sprint</h3></div>
               <table class="wikitable">{HEADER}</table>
               <div class="mw-heading mw-heading3"><h3 id="Race">Race</h3></div>
               <table class="wikitable">{HEADER}</table>"#
        );
        assert_eq!(
            select_index(&selector(), &html),
            Some((2, MatchedBy::SectionHeading))
        );
    }

    #[test]
    fn test_header_fallback_any_keyword() {
        let html = r#"<table class="wikitable"><tr><th>Season</th><th>Venue</th></tr></table>
                      <table class="wikitable"><tr><th>Pos</th><th>Name</th></tr></table>"#;
        let config = ExtractorConfig {
            caption: CaptionRule {
                section_headings: false,
                ..CaptionRule::default()
            },
            ..ExtractorConfig::default()
        };
        let selector = TableSelector::new(&config).unwrap();
        assert_eq!(select_index(&selector, html), Some((1, MatchedBy::Header)));
    }

    #[test]
    fn test_header_all_policy() {
        let config = ExtractorConfig {
            header: HeaderRule {
                policy: HeaderMatch::All,
                ..HeaderRule::default()
            },
            ..ExtractorConfig::default()
        };
        let selector = TableSelector::new(&config).unwrap();
        let partial = r#"<table class="wikitable"><tr><th>Pos</th><th>Driver</th></tr></table>"#;
        assert_eq!(select_index(&selector, partial), None);

        let full = r#"<table class="wikitable"><tr><th>Pos</th><th>Driver</th><th>Time</th>
                      <th>Laps</th><th>Grid</th><th>Points</th></tr></table>"#;
        assert_eq!(select_index(&selector, full), Some((0, MatchedBy::Header)));
    }

    #[test]
    fn test_header_at_least_policy() {
        let config = ExtractorConfig {
            header: HeaderRule {
                policy: HeaderMatch::AtLeast(3),
                ..HeaderRule::default()
            },
            ..ExtractorConfig::default()
        };
        let selector = TableSelector::new(&config).unwrap();
        let html = r#"<table class="wikitable"><tr><th>Pos</th><th>Driver</th></tr></table>
                      <table class="wikitable"><tr><th>Pos</th><th>Driver</th><th>Grid</th></tr></table>"#;
        assert_eq!(select_index(&selector, html), Some((1, MatchedBy::Header)));
    }

    #[test]
    fn test_qualifying_headers_are_excluded() {
        let html = r#"<table class="wikitable"><tr><th>Pos.</th><th>Driver</th><th>Q1</th></tr></table>"#;
        assert_eq!(select_index(&selector(), html), None);
    }

    #[test]
    fn test_non_wikitable_ignored() {
        let html = format!(r#"<table class="infobox"><caption>Race result</caption>{HEADER}</table>"#);
        let document = Html::parse_document(&html);
        let selection = selector().select_results_table(&document);
        assert_eq!(selection.candidates, 0);
        assert!(selection.selected.is_none());
    }

    #[test]
    fn test_rows_skip_header_and_keep_th_cells() {
        let html = format!(
            r#"<table class="wikitable"><caption>Race</caption>{HEADER}
               <tr><th>1</th><td>1</td><td>Max Verstappen</td><td>Red Bull</td></tr>
               <tr><td colspan="4">Fastest lap: x</td></tr></table>"#
        );
        let document = Html::parse_document(&html);
        let selection = selector().select_results_table(&document);
        let table = selection.selected.unwrap();
        assert_eq!(table.headers[0], "pos.");
        let rows = table.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["1", "1", "Max Verstappen", "Red Bull"]);
        assert_eq!(rows[1], vec!["Fastest lap: x"]);
    }
}
