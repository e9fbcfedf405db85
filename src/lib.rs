//! Gender-gap indicator analytics for the energy sector.
//!
//! Loads the employment, senior-management, innovation and entrepreneurship
//! tables into one immutable [`data::model::Dataset`] and shapes the
//! dashboard's KPIs, charts, leaderboards and selector options from it.

pub mod app;
pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod query;
pub mod state;

pub use app::{Dashboard, DashboardView};
pub use config::DashboardConfig;
pub use data::error::DataError;
pub use data::model::{Dataset, Record, YearRange};
