// src/utils/url.rs

//! Race report URL construction.

use crate::models::RaceQuery;

/// Build the race report URL for a query.
///
/// The race name is used verbatim apart from spaces, which become
/// underscores the way wiki titles are written.
///
/// # Examples
/// ```
/// use race_results::models::RaceQuery;
/// use race_results::utils::url::race_page_url;
///
/// assert_eq!(
///     race_page_url("https://en.wikipedia.org", &RaceQuery::new(2024, "Miami")),
///     "https://en.wikipedia.org/wiki/2024_Miami_Grand_Prix"
/// );
/// ```
pub fn race_page_url(base_url: &str, query: &RaceQuery) -> String {
    let race = query.race_name.trim().replace(' ', "_");
    format!(
        "{}/wiki/{}_{}_Grand_Prix",
        base_url.trim_end_matches('/'),
        query.year,
        race
    )
}

/// Extract domain from a URL.
///
/// # Examples
/// ```
/// use race_results::utils::url::get_domain;
///
/// assert_eq!(
///     get_domain("https://en.wikipedia.org/wiki/Formula_One"),
///     Some("en.wikipedia.org".to_string())
/// );
/// ```
pub fn get_domain(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_lowercase()))
}
