use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

mod aggregate;
mod charts;
mod controller;
mod dataset;
mod error;
mod filter;
mod models;
mod report;
mod server;

use filter::{DateWindow, RangeSelection};
use models::{RatingMetric, Scope, ALL_TEAMS};

#[derive(Parser)]
#[command(name = "virtuoffice-analytics")]
#[command(about = "Weekly work-from-home survey dashboard", long_about = None)]
struct Cli {
    /// Survey CSV to load
    #[arg(long, global = true, default_value = "survey_data.csv")]
    data: PathBuf,

    /// Verbose logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard over HTTP
    Serve {
        #[arg(long, default_value_t = 8050)]
        port: u16,
    },
    /// Print weekly modes for a team or the whole company
    Weeks {
        #[arg(long, default_value = ALL_TEAMS)]
        team: String,
        #[arg(long)]
        lo: Option<usize>,
        #[arg(long)]
        hi: Option<usize>,
        #[arg(long, default_value_t = 60)]
        limit: usize,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = ALL_TEAMS)]
        team: String,
        #[arg(long)]
        lo: Option<usize>,
        #[arg(long)]
        hi: Option<usize>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .init();
}

fn resolve_range(dataset: &dataset::Dataset, lo: Option<usize>, hi: Option<usize>) -> RangeSelection {
    let default = dataset.default_range();
    RangeSelection::new(lo.unwrap_or(default.lo), hi.unwrap_or(default.hi))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    debug!("Data file: {}", cli.data.display());

    let dataset = dataset::load_path(&cli.data)
        .with_context(|| format!("failed to load survey data from {}", cli.data.display()))?;
    debug!("{} responses held in memory", dataset.records().len());

    match cli.command {
        Commands::Serve { port } => {
            server::DashboardServer::new(Arc::new(dataset), port)
                .start()
                .await?;
        }
        Commands::Weeks { team, lo, hi, limit } => {
            let scope = Scope::from_selection(&team);
            let range = resolve_range(&dataset, lo, hi);
            let window = DateWindow::from_marks(dataset.marks(), range)?;
            let rows = filter::filter_weeks(dataset.table(&scope)?, window);

            if rows.is_empty() {
                println!("No weeks found for this window.");
                return Ok(());
            }

            println!("Weekly modes for {} ({} to {}):", scope.label(), window.after, window.before);
            for row in rows.iter().take(limit) {
                println!(
                    "- {}: {} days WFH, productivity {}%, connection {}%, loneliness {}%",
                    row.date,
                    row.home_days,
                    row.rating(RatingMetric::Productivity),
                    row.rating(RatingMetric::Connections),
                    row.rating(RatingMetric::Loneliness),
                );
            }
        }
        Commands::Report { team, lo, hi, out } => {
            let scope = Scope::from_selection(&team);
            let range = resolve_range(&dataset, lo, hi);
            let report = report::build_report(&dataset, &scope, range)?;
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
