use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use super::stats::{Accumulator, Mean};
use crate::data::filter::{Condition, Field, Filter};
use crate::data::model::Dataset;

/// Which end of the ranking wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Extremum {
    Max,
    Min,
}

/// The winning country of a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub country: String,
    pub mean: f64,
    pub count: usize,
}

/// Cross-country ranking of one indicator.
///
/// Rows passing `filter` and belonging to an allowed country are grouped by
/// country. Countries with fewer than `min_samples` non-null values are
/// dropped, then the highest (or lowest) mean wins. Equal means go to the
/// alphabetically first country.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    pub filter: Filter,
    pub countries: Vec<String>,
    pub min_samples: usize,
    pub extremum: Extremum,
}

impl Leaderboard {
    /// Per-country means over the allowed countries, keyed by country name.
    pub fn standings(&self, dataset: &Dataset) -> BTreeMap<String, Mean> {
        let scope = self
            .filter
            .clone()
            .with(Condition::one_of(Field::Country, &self.countries));

        let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();
        for r in scope.apply(dataset.records()) {
            if let Some(country) = r.country.as_deref() {
                groups.entry(country).or_default().push(r.value);
            }
        }

        groups
            .into_iter()
            .filter_map(|(country, acc)| acc.finish().map(|m| (country.to_string(), m)))
            .collect()
    }

    /// The extremal country, or `None` when no country has enough samples.
    pub fn winner(&self, dataset: &Dataset) -> Option<Standing> {
        let standings = self.standings(dataset);
        let eligible = standings
            .into_iter()
            .filter(|(_, m)| m.count >= self.min_samples);

        // Standings iterate alphabetically; only a strictly better mean
        // replaces the current leader.
        let mut best: Option<(String, Mean)> = None;
        for (country, m) in eligible {
            let better = match &best {
                None => true,
                Some((_, current)) => {
                    let ord = m.value.total_cmp(&current.value);
                    match self.extremum {
                        Extremum::Max => ord == Ordering::Greater,
                        Extremum::Min => ord == Ordering::Less,
                    }
                }
            };
            if better {
                best = Some((country, m));
            }
        }

        let winner = best.map(|(country, m)| Standing {
            country,
            mean: m.value,
            count: m.count,
        });
        log::debug!("leaderboard {:?}: {:?}", self.extremum, winner);
        winner
    }
}
