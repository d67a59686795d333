//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::ColumnLayout;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP endpoint settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream document retrieval settings
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Table and row heuristics
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        self.server.bind_addr.parse::<SocketAddr>().map_err(|e| {
            AppError::validation(format!(
                "server.bind_addr '{}' is invalid: {e}",
                self.server.bind_addr
            ))
        })?;
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetcher.user_agent is empty"));
        }
        url::Url::parse(&self.fetcher.base_url).map_err(|e| {
            AppError::validation(format!(
                "fetcher.base_url '{}' is invalid: {e}",
                self.fetcher.base_url
            ))
        })?;
        if self.fetcher.timeout_secs == Some(0) {
            return Err(AppError::validation("fetcher.timeout_secs must be > 0"));
        }
        crate::utils::parse_selector(&self.extractor.table_selector)?;
        if self.extractor.layouts.is_empty() {
            return Err(AppError::validation("No column layouts defined"));
        }
        for layout in &self.extractor.layouts {
            if layout.position == layout.driver {
                return Err(AppError::validation(format!(
                    "layout '{}' uses cell {} for both position and driver",
                    layout.name, layout.position
                )));
            }
        }
        if self.extractor.caption.keywords.is_empty() && self.extractor.header.keywords.is_empty()
        {
            return Err(AppError::validation(
                "extractor needs caption or header keywords",
            ));
        }
        if let HeaderMatch::AtLeast(n) = self.extractor.header.policy {
            if n == 0 || n > self.extractor.header.keywords.len() {
                return Err(AppError::validation(format!(
                    "extractor.header at_least({n}) is out of range for {} keywords",
                    self.extractor.header.keywords.len()
                )));
            }
        }
        if matches!(&self.extractor.roster, Some(roster) if roster.is_empty()) {
            return Err(AppError::validation(
                "extractor.roster is empty; remove it to disable roster checks",
            ));
        }
        Ok(())
    }
}

/// HTTP endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "defaults::bind_addr")]
    pub bind_addr: String,

    /// Attach table-detection diagnostics to success responses
    #[serde(default)]
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: defaults::bind_addr(),
            debug: false,
        }
    }
}

/// Upstream fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Scheme and host the race report pages live under
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds; the client default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: None,
        }
    }
}

/// Results table and row heuristics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// CSS selector for candidate tables
    #[serde(default = "defaults::table_selector")]
    pub table_selector: String,

    /// Caption heuristic
    #[serde(default)]
    pub caption: CaptionRule,

    /// Header row heuristic
    #[serde(default)]
    pub header: HeaderRule,

    /// Column layouts, tried in order
    #[serde(default = "ColumnLayout::defaults")]
    pub layouts: Vec<ColumnLayout>,

    /// Known driver surnames; rows naming anyone else are skipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster: Option<Vec<String>>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            table_selector: defaults::table_selector(),
            caption: CaptionRule::default(),
            header: HeaderRule::default(),
            layouts: ColumnLayout::defaults(),
            roster: None,
        }
    }
}

impl ExtractorConfig {
    /// Roster as a lookup set, if configured.
    pub fn roster_set(&self) -> Option<HashSet<String>> {
        self.roster
            .as_ref()
            .map(|names| names.iter().map(|n| n.trim().to_string()).collect())
    }
}

/// How caption text is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptionMatch {
    /// Caption contains the configured phrase
    Phrase,
    /// Caption contains any configured keyword
    AnyKeyword,
}

/// Caption heuristic settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionRule {
    #[serde(default = "defaults::caption_policy")]
    pub policy: CaptionMatch,

    #[serde(default = "defaults::caption_phrase")]
    pub phrase: String,

    #[serde(default = "defaults::caption_keywords")]
    pub keywords: Vec<String>,

    /// Tables labelled with any of these are never selected
    #[serde(default = "defaults::caption_exclude")]
    pub exclude: Vec<String>,

    /// Use the nearest preceding section heading when a table has no caption
    #[serde(default = "defaults::enabled")]
    pub section_headings: bool,
}

impl Default for CaptionRule {
    fn default() -> Self {
        Self {
            policy: defaults::caption_policy(),
            phrase: defaults::caption_phrase(),
            keywords: defaults::caption_keywords(),
            exclude: defaults::caption_exclude(),
            section_headings: true,
        }
    }
}

/// How many header keywords must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMatch {
    Any,
    All,
    AtLeast(usize),
}

/// Header heuristic settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderRule {
    #[serde(default = "defaults::header_policy")]
    pub policy: HeaderMatch,

    #[serde(default = "defaults::header_keywords")]
    pub keywords: Vec<String>,

    /// Header rows containing any of these never match
    #[serde(default = "defaults::header_exclude")]
    pub exclude: Vec<String>,
}

impl Default for HeaderRule {
    fn default() -> Self {
        Self {
            policy: defaults::header_policy(),
            keywords: defaults::header_keywords(),
            exclude: defaults::header_exclude(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level when RUST_LOG is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use super::{CaptionMatch, HeaderMatch};

    // Server defaults
    pub fn bind_addr() -> String {
        "127.0.0.1:3000".into()
    }

    // Fetcher defaults
    pub fn base_url() -> String {
        "https://en.wikipedia.org".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; race-results/0.1)".into()
    }

    // Extractor defaults
    pub fn table_selector() -> String {
        "table.wikitable".into()
    }
    pub fn caption_policy() -> CaptionMatch {
        CaptionMatch::AnyKeyword
    }
    pub fn caption_phrase() -> String {
        "race result".into()
    }
    pub fn caption_keywords() -> Vec<String> {
        vec![
            "race".into(),
            "result".into(),
            "classification".into(),
            "finishers".into(),
        ]
    }
    pub fn caption_exclude() -> Vec<String> {
        vec!["qualifying".into(), "sprint".into(), "practice".into()]
    }
    pub fn header_policy() -> HeaderMatch {
        HeaderMatch::Any
    }
    pub fn header_keywords() -> Vec<String> {
        vec![
            "pos".into(),
            "driver".into(),
            "time".into(),
            "laps".into(),
            "grid".into(),
            "points".into(),
        ]
    }

    pub fn header_exclude() -> Vec<String> {
        vec!["q1".into()]
    }
    pub fn enabled() -> bool {
        true
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}
