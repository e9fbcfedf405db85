use std::fmt;

use serde::Serialize;

use crate::data::filter::{Field, Filter};
use crate::data::model::{distinct, Dataset, Record};

/// Choices for a dependent selector plus the default pick.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Options {
    pub options: Vec<String>,
    /// First option, or `None` when there is nothing to choose from.
    pub selected: Option<String>,
}

impl Options {
    pub fn from_sorted(options: Vec<String>) -> Self {
        let selected = options.first().cloned();
        Options { options, selected }
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.options.iter().any(|o| o == value)
    }
}

/// Indicators present for a country/topic pair, sorted and deduplicated,
/// nulls excluded. The first one is selected by default.
pub fn indicator_options(dataset: &Dataset, country: &str, topic: &str) -> Options {
    let slice = Filter::new().country(country).topic(topic).apply(dataset.records());
    Options::from_sorted(distinct_values(&slice, Field::Indicator))
}

/// Sorted distinct non-null values of `field` within `rows`.
pub fn distinct_values(rows: &[&Record], field: Field) -> Vec<String> {
    distinct(rows.iter().filter_map(|r| field.of(r)))
}

// ---------------------------------------------------------------------------
// Sector selector
// ---------------------------------------------------------------------------

/// Technology/sector selection: every sector, or one by name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorChoice {
    #[default]
    All,
    Sector(String),
}

impl SectorChoice {
    pub fn label(&self) -> &str {
        match self {
            SectorChoice::All => "All",
            SectorChoice::Sector(s) => s,
        }
    }
}

impl fmt::Display for SectorChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `All` followed by the sorted sectors present in `rows`.
pub fn sector_options(rows: &[&Record]) -> Vec<SectorChoice> {
    std::iter::once(SectorChoice::All)
        .chain(
            distinct_values(rows, Field::TechnologyOrSector)
                .into_iter()
                .map(SectorChoice::Sector),
        )
        .collect()
}
