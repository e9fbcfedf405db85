use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use gender_gap_dash::config::DashboardConfig;
use gender_gap_dash::data::loader::load_sources;
use gender_gap_dash::Dashboard;

/// `gender-gap-dash [DATA_DIR]`
///
/// Loads the configured tables and prints the default dashboard view as
/// JSON. Any load failure aborts start-up.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = DashboardConfig::from_env().context("loading configuration")?;
    if let Some(dir) = std::env::args_os().nth(1) {
        config.data_dir = PathBuf::from(dir);
    }
    log::info!(
        "Data directory {} ({} sources)",
        config.data_dir.display(),
        config.sources.len()
    );

    let dataset = load_sources(&config.data_dir, &config.sources)
        .with_context(|| format!("loading tables from {}", config.data_dir.display()))?;
    let dashboard = Dashboard::new(dataset, config);
    let view = dashboard.render();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &view).context("writing dashboard view")?;
    writeln!(out)?;
    Ok(())
}
