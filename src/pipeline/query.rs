// src/pipeline/query.rs

//! Fetch → extract pipeline for a single race.

use std::path::Path;

use crate::error::Result;
use crate::models::RaceQuery;
use crate::services::{DocumentFetcher, Extraction, RaceExtractor};

/// Fetch the race report for `query` and extract its results.
///
/// Only the fetch can fail; a page the heuristics cannot read yields an
/// empty result.
pub async fn run_query(
    fetcher: &dyn DocumentFetcher,
    extractor: &RaceExtractor,
    query: &RaceQuery,
) -> Result<Extraction> {
    log::info!("Fetching results for {} {}", query.year, query.race_name);

    let document = match fetcher.fetch(query).await {
        Ok(document) => document,
        Err(e) => {
            log::error!("Fetch failed: {}", e);
            return Err(e);
        }
    };

    let extraction = extractor.extract(&document.body, &document.url);
    log_first_retirement(&extraction);
    Ok(extraction)
}

/// Extract results from a race report saved on disk.
///
/// `source_url` is reported as the result's URL.
pub async fn run_file(
    extractor: &RaceExtractor,
    path: &Path,
    source_url: &str,
) -> Result<Extraction> {
    log::info!("Reading race report from {}", path.display());
    let body = tokio::fs::read_to_string(path).await?;
    let extraction = extractor.extract(&body, source_url);
    log_first_retirement(&extraction);
    Ok(extraction)
}

fn log_first_retirement(extraction: &Extraction) {
    if let Some(dnf) = extraction.result.first_retirement() {
        log::debug!("First retirement: {} on lap {}", dnf.driver, dnf.lap);
    }
}
