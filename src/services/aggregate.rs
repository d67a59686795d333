//! Folds row outcomes into a [`RaceResult`].

use crate::models::{Outcome, RaceResult};

/// Aggregate row outcomes, in table order, into a race result.
///
/// The last outcome seen for a driver decides whether they end up in
/// `positions` or `dnfs`; the other collection loses any earlier entry.
/// Every retirement row is kept, even when two entrants share a surname.
/// Retirements are stably sorted by lap so equal laps keep row order.
pub fn aggregate<I>(outcomes: I, source_url: impl Into<String>) -> RaceResult
where
    I: IntoIterator<Item = Outcome>,
{
    let mut result = RaceResult::empty(source_url);

    for outcome in outcomes {
        match outcome {
            Outcome::Finisher(entry) => {
                result.dnfs.retain(|dnf| dnf.driver != entry.driver);
                result.positions.insert(entry.driver, entry.position);
            }
            Outcome::Retirement(entry) => {
                result.positions.remove(&entry.driver);
                result.dnfs.push(entry);
            }
            Outcome::Skip => {}
        }
    }

    result.dnfs.sort_by_key(|dnf| dnf.lap);
    result
}
