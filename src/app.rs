use serde::Serialize;

use crate::chart::Chart;
use crate::config::DashboardConfig;
use crate::data::model::Dataset;
use crate::query::sections::{
    self, AdvancedInsights, EmploymentView, EntrepreneurshipView, InnovationView, OverviewKpis,
    SeniorManagementView,
};
use crate::state::DashboardState;

// ---------------------------------------------------------------------------
// Dashboard: table + settings + selections
// ---------------------------------------------------------------------------

/// Owns the loaded table for the lifetime of the process. Selections change
/// through `state`; the table never does.
pub struct Dashboard {
    dataset: Dataset,
    config: DashboardConfig,
    pub state: DashboardState,
}

/// Everything a renderer needs for one frame, one field per tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub state: DashboardState,
    /// `None` when the table has no dated rows to range over.
    pub overview: Option<OverviewKpis>,
    pub employment: EmploymentView,
    pub senior_management: SeniorManagementView,
    pub innovation: InnovationView,
    pub entrepreneurship: EntrepreneurshipView,
    pub explorer: Chart,
    pub advanced_insights: AdvancedInsights,
}

impl Dashboard {
    pub fn new(dataset: Dataset, config: DashboardConfig) -> Self {
        let state = DashboardState::new(&dataset, &config);
        Dashboard {
            dataset,
            config,
            state,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Recompute every section for the current selections.
    pub fn render(&self) -> DashboardView {
        let ds = &self.dataset;
        let s = &self.state;

        DashboardView {
            state: s.clone(),
            overview: s
                .overview_years
                .map(|years| sections::overview(ds, &s.overview_country, years)),
            employment: sections::employment(ds, &s.employment_country, &self.config),
            senior_management: sections::senior_management(ds, &s.senior_country),
            innovation: sections::innovation(ds, &s.innovation_country, &s.innovation_sector),
            entrepreneurship: sections::entrepreneurship(ds, &s.entrepreneurship_country),
            explorer: sections::explorer_trend(
                ds,
                &s.explorer_country,
                &s.explorer_topic,
                s.explorer_indicators.selected.as_deref(),
            ),
            advanced_insights: sections::advanced_insights(ds, &self.config),
        }
    }
}
