//! Race result extraction service.
//!
//! Runs table selection, row parsing and aggregation over a raw page body.
//! Extraction never fails: a page without a recognizable results table
//! yields an empty result.

use scraper::Html;

use crate::error::Result;
use crate::models::{ExtractionDiagnostics, ExtractorConfig, Outcome, RaceResult};
use crate::services::aggregate::aggregate;
use crate::services::rows::RowParser;
use crate::services::table::TableSelector;

/// A race result plus what the extractor saw on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub result: RaceResult,
    pub diagnostics: ExtractionDiagnostics,
}

/// Extracts finishers and retirements from race report pages.
#[derive(Debug, Clone)]
pub struct RaceExtractor {
    tables: TableSelector,
    rows: RowParser,
}

impl RaceExtractor {
    /// Create an extractor from configuration.
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        Ok(Self {
            tables: TableSelector::new(config)?,
            rows: RowParser::new(config.layouts.clone(), config.roster_set()),
        })
    }

    /// Extract the race result from a page body.
    pub fn extract(&self, body: &str, source_url: &str) -> Extraction {
        let document = Html::parse_document(body);
        let selection = self.tables.select_results_table(&document);

        let mut diagnostics = ExtractionDiagnostics {
            candidate_tables: selection.candidates,
            ..ExtractionDiagnostics::default()
        };

        let Some(table) = selection.selected else {
            log::info!(
                "No results table among {} candidates at {}",
                selection.candidates,
                source_url
            );
            return Extraction {
                result: RaceResult::empty(source_url),
                diagnostics,
            };
        };

        log::debug!(
            "Selected table #{} by {:?} ({:?})",
            table.index,
            table.matched_by,
            table.label
        );

        diagnostics.found_table = true;
        diagnostics.table_index = Some(table.index);
        diagnostics.matched_by = Some(table.matched_by);
        diagnostics.caption = table.label.clone();
        diagnostics.headers = table.headers.clone();
        diagnostics.table_html = Some(table.table.html());

        let rows = table.rows();
        diagnostics.rows_seen = rows.len();

        let mut outcomes = Vec::with_capacity(rows.len());
        for row in &rows {
            let (outcome, layout) = self.rows.parse_row_with_layout(row);
            if outcome == Outcome::Skip {
                diagnostics.rows_skipped += 1;
            } else if let Some(name) = layout {
                *diagnostics.layout_hits.entry(name.to_string()).or_default() += 1;
            }
            outcomes.push(outcome);
        }

        let result = aggregate(outcomes, source_url);
        diagnostics.found_positions = result.positions.len();
        diagnostics.found_dnfs = result.dnfs.len();

        log::info!(
            "Extracted {} finishers and {} retirements from {}",
            diagnostics.found_positions,
            diagnostics.found_dnfs,
            source_url
        );

        Extraction {
            result,
            diagnostics,
        }
    }
}
