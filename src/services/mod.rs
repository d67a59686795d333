//! Service layer for the race results application.
//!
//! This module contains the business logic for:
//! - Page fetching (`DocumentFetcher`, `HttpFetcher`)
//! - Results table detection (`TableSelector`)
//! - Row parsing and driver name normalization (`RowParser`)
//! - Outcome aggregation (`aggregate`)
//! - The combined extraction (`RaceExtractor`)

pub mod aggregate;
pub mod extractor;
pub mod fetcher;
pub mod rows;
pub mod table;

pub use aggregate::aggregate;
pub use extractor::{Extraction, RaceExtractor};
pub use fetcher::{Document, DocumentFetcher, HttpFetcher};
pub use rows::{RowParser, normalize_driver_name};
pub use table::{TableMatch, TableSelection, TableSelector};
