mod app;
mod binder;
mod color;
mod config;
mod data;
mod export;
mod state;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use app::LaunchDashApp;
use clap::Parser;
use config::{DashConfig, DATA_ENV_VAR};
use data::model::SiteSelector;
use eframe::egui;
use state::AppState;

/// Interactive dashboard for launch records: successes by site and payload
/// correlation.
#[derive(Debug, Parser)]
#[command(name = "launch-dash", version, about)]
struct Args {
    /// Launch table (.csv, .json or .parquet). Overrides LAUNCH_DASH_DATA and the config file.
    data: Option<PathBuf>,

    /// TOML config file (default: ./launch-dash.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Site to select on startup ("ALL" for every site).
    #[arg(long, default_value = data::model::ALL_SITES)]
    site: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = DashConfig::load(args.config.as_deref())?;
    let env_data = std::env::var(DATA_ENV_VAR).ok();
    let data_path = config.resolve_data_path(args.data.as_deref(), env_data.as_deref());

    // No partial dashboard: a dataset that does not load ends the process.
    let dataset = match data::loader::load_file(&data_path) {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("Failed to load {}: {e}", data_path.display());
            return Err(e)
                .with_context(|| format!("loading launch records from {}", data_path.display()));
        }
    };

    log::info!(
        "Loaded {} launches from {} ({} sites, payload {})",
        dataset.len(),
        data_path.display(),
        dataset.sites().len(),
        dataset.payload_bounds()
    );

    let mut state = AppState::new(Arc::new(dataset), config.controls.payload_step);
    state.select_site(SiteSelector::parse(&args.site));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SpaceX Launch Records Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(LaunchDashApp::new(state)))),
    )
    .map_err(|e| anyhow!("running dashboard window: {e}"))
}
