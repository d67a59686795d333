// src/models/race.rs

//! Race query and result data structures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identifies the race report page to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceQuery {
    /// Season year (e.g., 2024)
    pub year: u32,

    /// Race name as it appears in the page title (e.g., "Miami")
    pub race_name: String,
}

impl RaceQuery {
    pub fn new(year: u32, race_name: impl Into<String>) -> Self {
        Self {
            year,
            race_name: race_name.into(),
        }
    }
}

/// Cell texts of one table row, in column order.
pub type RawRow = Vec<String>;

/// A classified finisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    pub driver: String,
    pub position: u32,
}

/// A retirement. `lap == 0` means the lap is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnfEntry {
    pub driver: String,
    pub lap: u32,
}

/// Result of parsing a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Finisher(ParsedEntry),
    Retirement(DnfEntry),
    Skip,
}

/// Aggregated outcome of one race.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceResult {
    /// Driver surname to finishing position
    pub positions: BTreeMap<String, u32>,

    /// Retirements, ordered by lap ascending
    pub dnfs: Vec<DnfEntry>,

    /// Page the result was extracted from
    #[serde(rename = "url")]
    pub source_url: String,
}

impl RaceResult {
    /// Empty result for a page with no usable results table.
    pub fn empty(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.dnfs.is_empty()
    }

    /// Driver who retired earliest, if any.
    pub fn first_retirement(&self) -> Option<&DnfEntry> {
        self.dnfs.first()
    }
}
