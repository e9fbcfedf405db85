use serde::Serialize;

use crate::config::DashboardConfig;
use crate::data::model::{Dataset, YearRange};
use crate::query::options::{indicator_options, Options, SectorChoice};
use crate::query::sections::innovation_sectors;

// ---------------------------------------------------------------------------
// Dashboard selections
// ---------------------------------------------------------------------------

/// Every user selection, independent of rendering. Dependent selectors
/// (explorer indicator, innovation sector) are recomputed whenever their
/// upstream selection changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardState {
    /// Countries offered by every country selector.
    pub countries: Vec<String>,
    /// Topics offered by the explorer.
    pub topics: Vec<String>,
    /// Full year span of the data, `None` for an undated table.
    pub year_bounds: Option<YearRange>,

    pub overview_country: String,
    pub overview_years: Option<YearRange>,
    pub employment_country: String,
    pub senior_country: String,
    pub entrepreneurship_country: String,

    pub innovation_country: String,
    pub innovation_sectors: Vec<SectorChoice>,
    pub innovation_sector: SectorChoice,

    pub explorer_country: String,
    pub explorer_topic: String,
    pub explorer_indicators: Options,
}

impl DashboardState {
    /// Initial selections: the configured default country (or the first one
    /// available), the full year range, the configured default topic.
    pub fn new(dataset: &Dataset, config: &DashboardConfig) -> Self {
        let countries = dataset.countries();
        let topics = dataset.topics();
        let year_bounds = dataset.year_bounds();

        let country = pick_default(&countries, &config.default_country);
        let topic = pick_default(&topics, &config.default_topic);

        let mut state = DashboardState {
            countries,
            topics,
            year_bounds,
            overview_country: country.clone(),
            overview_years: year_bounds,
            employment_country: country.clone(),
            senior_country: country.clone(),
            entrepreneurship_country: country.clone(),
            innovation_country: country.clone(),
            innovation_sectors: Vec::new(),
            innovation_sector: SectorChoice::All,
            explorer_country: country,
            explorer_topic: topic,
            explorer_indicators: Options::default(),
        };
        state.refresh_indicators(dataset);
        state.refresh_sectors(dataset);
        state
    }

    /// Set the overview year range, clamped to the data's span.
    pub fn set_overview_years(&mut self, years: YearRange) {
        self.overview_years = self.year_bounds.map(|bounds| years.clamp_to(bounds));
    }

    pub fn set_explorer_country(&mut self, dataset: &Dataset, country: &str) {
        self.explorer_country = country.to_string();
        self.refresh_indicators(dataset);
    }

    pub fn set_explorer_topic(&mut self, dataset: &Dataset, topic: &str) {
        self.explorer_topic = topic.to_string();
        self.refresh_indicators(dataset);
    }

    /// Pick an explorer indicator. Values not on offer are ignored.
    pub fn set_explorer_indicator(&mut self, indicator: &str) {
        if self.explorer_indicators.contains(indicator) {
            self.explorer_indicators.selected = Some(indicator.to_string());
        } else {
            log::warn!("indicator '{indicator}' is not available for the current selection");
        }
    }

    pub fn set_innovation_country(&mut self, dataset: &Dataset, country: &str) {
        self.innovation_country = country.to_string();
        self.refresh_sectors(dataset);
    }

    /// Pick an innovation sector. Values not on offer fall back to `All`.
    pub fn set_innovation_sector(&mut self, sector: SectorChoice) {
        self.innovation_sector = if self.innovation_sectors.contains(&sector) {
            sector
        } else {
            SectorChoice::All
        };
    }

    /// Recompute indicator options and auto-select the first one.
    fn refresh_indicators(&mut self, dataset: &Dataset) {
        self.explorer_indicators =
            indicator_options(dataset, &self.explorer_country, &self.explorer_topic);
        log::debug!(
            "explorer {} / {}: {} indicators",
            self.explorer_country,
            self.explorer_topic,
            self.explorer_indicators.options.len()
        );
    }

    fn refresh_sectors(&mut self, dataset: &Dataset) {
        self.innovation_sectors = innovation_sectors(dataset, &self.innovation_country);
        if !self.innovation_sectors.contains(&self.innovation_sector) {
            self.innovation_sector = SectorChoice::All;
        }
    }
}

fn pick_default(available: &[String], preferred: &str) -> String {
    if available.iter().any(|c| c == preferred) {
        return preferred.to_string();
    }
    match available.first() {
        Some(first) => {
            log::warn!("default '{preferred}' not present in data, using '{first}'");
            first.clone()
        }
        None => preferred.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{dataset, record, with_sector};

    fn sample() -> Dataset {
        dataset(vec![
            record("France", 2012, "Employment", "Wage gap", Some(1.0)),
            record("France", 2018, "Employment", "Employment rate", Some(1.0)),
            record("France", 2015, "Innovation", "Female inventors", Some(1.0)),
            with_sector(record("Spain", 2015, "Innovation", "Female inventors", Some(1.0)), "Solar"),
            record("Spain", 2016, "Entrepreneurship", "Gender diverse founders", Some(1.0)),
        ])
    }

    #[test]
    fn defaults_come_from_config_and_data() {
        let ds = sample();
        let state = DashboardState::new(&ds, &DashboardConfig::default());

        assert_eq!(state.overview_country, "France");
        assert_eq!(state.overview_years, Some(YearRange::new(2012, 2018)));
        assert_eq!(state.explorer_topic, "Employment");
        assert_eq!(state.explorer_indicators.selected.as_deref(), Some("Employment rate"));
        assert_eq!(state.innovation_sector, SectorChoice::All);
    }

    #[test]
    fn missing_default_country_falls_back_to_first() {
        let ds = sample();
        let config = DashboardConfig {
            default_country: "Portugal".into(),
            ..DashboardConfig::default()
        };
        let state = DashboardState::new(&ds, &config);
        assert_eq!(state.employment_country, "France");
    }

    #[test]
    fn changing_topic_reselects_indicator() {
        let ds = sample();
        let mut state = DashboardState::new(&ds, &DashboardConfig::default());

        state.set_explorer_topic(&ds, "Innovation");
        assert_eq!(state.explorer_indicators.options, vec!["Female inventors"]);
        assert_eq!(state.explorer_indicators.selected.as_deref(), Some("Female inventors"));

        state.set_explorer_topic(&ds, "Entrepreneurship");
        assert!(state.explorer_indicators.is_empty());
        assert_eq!(state.explorer_indicators.selected, None);
    }

    #[test]
    fn unavailable_indicator_is_ignored() {
        let ds = sample();
        let mut state = DashboardState::new(&ds, &DashboardConfig::default());
        state.set_explorer_indicator("Wage gap");
        assert_eq!(state.explorer_indicators.selected.as_deref(), Some("Wage gap"));
        state.set_explorer_indicator("Female inventors");
        assert_eq!(state.explorer_indicators.selected.as_deref(), Some("Wage gap"));
    }

    #[test]
    fn sector_resets_when_country_lacks_it() {
        let ds = sample();
        let mut state = DashboardState::new(&ds, &DashboardConfig::default());

        state.set_innovation_country(&ds, "Spain");
        state.set_innovation_sector(SectorChoice::Sector("Solar".into()));
        assert_eq!(state.innovation_sector, SectorChoice::Sector("Solar".into()));

        state.set_innovation_country(&ds, "France");
        assert_eq!(state.innovation_sector, SectorChoice::All);
    }

    #[test]
    fn year_range_is_clamped_to_data() {
        let ds = sample();
        let mut state = DashboardState::new(&ds, &DashboardConfig::default());
        state.set_overview_years(YearRange::new(2000, 2015));
        assert_eq!(state.overview_years, Some(YearRange::new(2012, 2015)));
    }
}
