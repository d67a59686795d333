// src/models/layout.rs

//! Column layout hypotheses for results table rows.

use serde::{Deserialize, Serialize};

/// Maps semantic fields to cell indices within a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    /// Name reported in diagnostics
    pub name: String,

    /// Index of the finishing position cell
    pub position: usize,

    /// Index of the driver name cell
    pub driver: usize,

    /// Index of the time/status cell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<usize>,

    /// Index of the completed laps cell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub laps: Option<usize>,
}

impl ColumnLayout {
    pub fn new(
        name: impl Into<String>,
        position: usize,
        driver: usize,
        status: Option<usize>,
        laps: Option<usize>,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            driver,
            status,
            laps,
        }
    }

    /// Pos | No. | Driver | Constructor | Laps | Time/Retired | Grid | Points
    pub fn standard() -> Self {
        Self::new("standard", 0, 2, Some(5), Some(4))
    }

    /// Pos | Driver | Constructor | Laps | Time/Retired | Grid | Points
    pub fn without_number() -> Self {
        Self::new("without_number", 0, 1, Some(4), Some(3))
    }

    /// Smallest row width with every field of this layout in bounds.
    pub fn min_cells(&self) -> usize {
        [Some(self.position), Some(self.driver), self.status, self.laps]
            .into_iter()
            .flatten()
            .max()
            .map_or(0, |max| max + 1)
    }

    /// Layouts tried in order when none are configured.
    ///
    /// `without_number` comes first: on a standard row its driver cell holds
    /// the car number (or nothing), which fails the driver check and falls
    /// through to `standard`.
    pub fn defaults() -> Vec<Self> {
        vec![Self::without_number(), Self::standard()]
    }
}
