//! Route handlers.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{AppState, error::ApiError};
use crate::models::{ExtractionDiagnostics, RaceQuery, RaceResult};
use crate::pipeline::run_query;

/// Raw query string parameters.
#[derive(Debug, Default, Deserialize)]
pub struct RaceParams {
    pub year: Option<String>,
    pub race: Option<String>,
}

impl RaceParams {
    /// Validate into a [`RaceQuery`]. Empty values count as missing.
    pub fn into_query(self) -> Result<RaceQuery, ApiError> {
        let year = self.year.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let race = self.race.as_deref().map(str::trim).filter(|s| !s.is_empty());

        let (Some(year), Some(race)) = (year, race) else {
            return Err(ApiError::MissingParameters);
        };

        let year = year
            .parse::<u32>()
            .map_err(|_| ApiError::InvalidYear(year.to_string()))?;

        Ok(RaceQuery::new(year, race))
    }
}

/// Success body: the race result, plus diagnostics in debug mode.
#[derive(Debug, Serialize)]
pub struct RaceResultsResponse {
    #[serde(flatten)]
    pub result: RaceResult,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<ExtractionDiagnostics>,
}

/// `GET /race-results?year=..&race=..`
pub async fn race_results_handler(
    State(state): State<AppState>,
    params: Result<Query<RaceParams>, QueryRejection>,
) -> Result<Json<RaceResultsResponse>, ApiError> {
    let query = match params {
        Ok(Query(params)) => params.into_query(),
        Err(rejection) => {
            log::debug!("Unparseable query string: {}", rejection);
            Err(ApiError::MissingParameters)
        }
    }
    .inspect_err(|e| {
        log::warn!("Rejected race results request: {}", e);
    })?;

    let extraction = run_query(state.fetcher.as_ref(), &state.extractor, &query).await?;

    Ok(Json(RaceResultsResponse {
        result: extraction.result,
        debug: state.debug.then_some(extraction.diagnostics),
    }))
}

/// `GET /health`
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
