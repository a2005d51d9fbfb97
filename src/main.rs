use anyhow::{Context, Result};
use clap::Parser;
use listforge::batch::{self, BatchOptions};
use std::fs::File;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Convert messy product-listing CSVs into a Shopify-ready template layout.
#[derive(Debug, Parser)]
#[command(name = "listforge", version)]
struct Args {
    /// Source CSV file(s) to convert
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Template CSV whose columns and order the output must match;
    /// defaults to the first well-known template found in the working
    /// directory
    #[arg(long)]
    template: Option<PathBuf>,

    /// Output file or directory; defaults to
    /// "<source> - Converted - Shopify.csv" beside each source
    #[arg(long)]
    out: Option<PathBuf>,

    /// Do NOT advertise the cost price when the selling price is missing
    #[arg(long = "no-fallback-cost")]
    no_fallback_cost: bool,

    /// Write the per-file results as a JSON report
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();

    // ─── 2) convert each source, independently ───────────────────────
    let reports = batch::run(
        &args.sources,
        &BatchOptions {
            template: args.template,
            out: args.out,
            fallback_price_to_cost: !args.no_fallback_cost,
        },
    )?;

    // ─── 3) per-file status, then the batch summary ──────────────────
    for report in &reports {
        match report.status {
            "ok" => info!(
                source = %report.source,
                output = report.output.as_deref().unwrap_or(""),
                rows = report.rows.unwrap_or(0),
                "converted"
            ),
            _ => error!(
                source = %report.source,
                "failed: {}",
                report.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
    let converted = reports.iter().filter(|r| r.status == "ok").count();
    info!("converted {} of {} file(s)", converted, reports.len());

    if let Some(path) = &args.report {
        let file = File::create(path)
            .with_context(|| format!("failed to create report {}", path.display()))?;
        serde_json::to_writer_pretty(file, &reports)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        info!(report = %path.display(), "wrote batch report");
    }

    Ok(())
}
