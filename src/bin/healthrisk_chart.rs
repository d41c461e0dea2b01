//! healthrisk-chart: render the health-risk scatter chart to SVG.
//!
//! Loads the data file, replays axis-label clicks in order and writes the
//! settled final frame.
//!
//! Run: `healthrisk-chart --data healthRisk.csv --click age --click smokes -o chart.svg`

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use healthrisk_viz::chart::ChartController;
use healthrisk_viz::config::Config;
use healthrisk_viz::dataset::Dataset;
use healthrisk_viz::render::HoverTarget;
use healthrisk_viz::state::AxisLabel;

/// Render the health-risk scatter chart to SVG.
#[derive(Parser, Debug)]
#[command(name = "healthrisk-chart")]
#[command(author = "PAIML Team")]
#[command(version)]
#[command(about = "Scatter chart of U.S. state health-risk metrics", long_about = None)]
struct Cli {
    /// CSV data file (overrides the configured path)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Axis label to click, in order (poverty, age, income, healthcare, smokes, obesity)
    #[arg(long = "click")]
    clicks: Vec<AxisLabel>,

    /// Show the tooltip for this state code
    #[arg(long)]
    hover: Option<String>,

    /// Output SVG file (stdout if absent)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "healthrisk_viz=info,healthrisk_chart=info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(data) = &cli.data {
        config.data_path.clone_from(data);
    }

    let dataset = Dataset::from_path(&config.data_path)
        .with_context(|| format!("failed to load {}", config.data_path.display()))?;
    let mut chart = ChartController::new(dataset, &config)?;

    // One full transition per click so each starts from rest.
    let step = chart.duration();
    let mut now = Duration::ZERO;
    for &label in &cli.clicks {
        now += step;
        match chart.click(label, now) {
            Some(axis) => tracing::info!(%label, ?axis, "switched axis"),
            None => tracing::info!(%label, "label already active"),
        }
    }
    now += step;

    if let Some(abbr) = &cli.hover {
        match chart.dataset().position_by_abbr(abbr) {
            Some(index) => {
                if let Some(content) = chart.hover(HoverTarget::Marker(index), now) {
                    tracing::info!(tooltip = %content.to_plain(), "hover");
                }
            }
            None => tracing::warn!(%abbr, "no record with this state code"),
        }
    }

    let scene = chart.scene(now);
    match &cli.output {
        Some(path) => {
            scene
                .write_to_file(path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "chart written");
        }
        None => std::io::stdout().write_all(scene.render().as_bytes())?,
    }

    Ok(())
}
