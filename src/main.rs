use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tabletidy::{
    chart::{vega_lite_spec, Encoding},
    config::PipelineConfig,
    export, fetch,
    pipeline::Pipeline,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Scrape an HTML table, clean it, and reshape it into long format"
)]
struct Args {
    /// Pipeline description (YAML).
    #[arg(short, long)]
    config: PathBuf,
    /// Fetch this URL instead of the configured source.
    #[arg(long, conflicts_with = "file")]
    url: Option<String>,
    /// Read a saved HTML page instead of the configured source.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Write the long table as parquet.
    #[arg(long)]
    parquet: Option<PathBuf>,
    /// Write the long table as CSV.
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Write a Vega-Lite chart spec.
    #[arg(long)]
    chart: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();

    // ─── 2) load config, apply source overrides ─────────────────────
    let mut config = PipelineConfig::from_path(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(url) = args.url {
        config.source.url = Some(url);
        config.source.file = None;
    }
    if let Some(file) = args.file {
        config.source.file = Some(file);
        config.source.url = None;
    }
    let pipeline = Pipeline::new(config).context("invalid pipeline config")?;

    // ─── 3) run ──────────────────────────────────────────────────────
    let client = fetch::build_client(&pipeline.config().fetch)?;
    let out = pipeline.run(&client).await.context("pipeline run failed")?;

    println!("tables found:   {}", out.tables_found);
    println!("rows kept:      {}", out.cleaned.num_rows());
    println!("long records:   {}", out.long.len());
    println!("missing values: {}", out.long.missing_values());

    // ─── 4) write artifacts ─────────────────────────────────────────
    if let Some(path) = &args.parquet {
        export::write_parquet(&out.long, path)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &args.csv {
        export::write_csv(&out.long, path)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &args.chart {
        let encoding = pipeline
            .config()
            .chart
            .clone()
            .unwrap_or_else(|| Encoding::pyramid(&out.long));
        let spec = vega_lite_spec(&out.long, &encoding).context("building chart spec")?;
        export::write_chart_spec(&spec, path)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    info!("all done");
    Ok(())
}
