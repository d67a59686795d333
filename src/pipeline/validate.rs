// src/pipeline/validate.rs

use crate::error::Result;
use crate::models::Config;
use crate::services::RaceExtractor;

/// Validate configuration and check the extractor can be built from it.
pub fn run_validate(config: &Config) -> Result<()> {
    log::info!("Validating configuration...");

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }
    RaceExtractor::new(&config.extractor)?;

    log::info!("  bind address: {}", config.server.bind_addr);
    log::info!("  upstream: {}", config.fetcher.base_url);
    log::info!(
        "  layouts: {}",
        config
            .extractor
            .layouts
            .iter()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    match &config.extractor.roster {
        Some(roster) => log::info!("  roster: {} drivers", roster.len()),
        None => log::info!("  roster: disabled"),
    }

    log::info!("All validations passed!");
    Ok(())
}
