//! Main application entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use bb_core::TripSource;
use bb_data::{CsvTripSource, TripTable};
use bb_ui::Theme;
use chrono::NaiveDate;
use clap::Parser;
use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod controller;
mod demo;
mod export;

use app::{DashboardApp, Session};
use config::DashboardConfig;
use controller::Controller;
use demo::DemoTripSource;

#[derive(Parser, Debug)]
#[command(name = "bikeboard")]
#[command(about = "Interactive dashboard for bike-share trip data", long_about = None)]
struct Args {
    /// Trip CSV file; overrides the path in the config file
    data: Option<PathBuf>,

    /// JSON dashboard configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write every output to this directory and exit without a window
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,

    /// Initial start station
    #[arg(long)]
    station: Option<String>,

    /// First start date shown on the map (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last start date shown on the map (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Use a generated dataset instead of a file
    #[arg(long, conflicts_with = "data")]
    demo: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(data) = &args.data {
        config.data.path = data.clone();
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;

    let source: Option<Box<dyn TripSource>> = if args.demo {
        Some(Box::new(DemoTripSource::default()))
    } else if config.data.path.as_os_str().is_empty() {
        None
    } else {
        Some(Box::new(CsvTripSource::new(config.data.clone())))
    };

    let session = match source {
        Some(source) => {
            let table = runtime
                .block_on(TripTable::load(source.as_ref()))
                .with_context(|| format!("Failed to load trips from {}", source.source_name()))?;
            let controller = Controller::new(Arc::new(table), config.map.clone());
            let selection = app::initial_selection(args.station.clone(), args.from, args.to);
            Some(Session::new(controller, source.source_name().to_string(), selection))
        }
        None => None,
    };

    if let Some(dir) = &args.export {
        let session = session.context("--export needs a data file or --demo")?;
        let summary = export::export(session.controller(), session.selection(), dir)?;
        info!("Export finished: {} files", summary.files.len());
        return Ok(());
    }

    info!("Starting {}", config.title);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title(config.title.clone()),
        default_theme: if config.dark_mode {
            eframe::Theme::Dark
        } else {
            eframe::Theme::Light
        },
        persist_window: false,
        ..Default::default()
    };

    let title = config.title.clone();
    let theme = Theme {
        dark_mode: config.dark_mode,
        ..Theme::default()
    };
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            Box::new(DashboardApp::new(
                cc,
                runtime,
                config.title,
                config.data,
                config.map,
                theme,
                session,
            ))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
