// src/models/mod.rs

//! Domain models for the race results service.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod layout;
mod race;

// Re-export all public types
pub use config::{
    CaptionMatch, CaptionRule, Config, ExtractorConfig, FetcherConfig, HeaderMatch, HeaderRule,
    LoggingConfig, ServerConfig,
};
pub use layout::ColumnLayout;
pub use race::{DnfEntry, Outcome, ParsedEntry, RaceQuery, RaceResult, RawRow};

use std::collections::BTreeMap;

use serde::Serialize;

/// Which heuristic selected the results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedBy {
    Caption,
    SectionHeading,
    Header,
}

/// What the extractor saw while parsing a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionDiagnostics {
    pub found_table: bool,
    pub candidate_tables: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_by: Option<MatchedBy>,
    /// Caption, or section heading for uncaptioned tables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub headers: Vec<String>,
    /// Outer HTML of the selected table
    #[serde(rename = "tableHTML", skip_serializing_if = "Option::is_none")]
    pub table_html: Option<String>,
    pub rows_seen: usize,
    pub rows_skipped: usize,
    /// Rows parsed per layout name
    pub layout_hits: BTreeMap<String, usize>,
    pub found_positions: usize,
    #[serde(rename = "foundDNFs")]
    pub found_dnfs: usize,
}
