use anyhow::{bail, Context, Result};
use clap::Parser;
use std::{fs, path::PathBuf};
use tabletidy::{config::FetchConfig, extract::extract_tables, fetch};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "List the tables a page exposes, to pick a selector and table_index"
)]
struct Args {
    /// Page to fetch.
    url: Option<String>,
    /// Saved HTML page to read instead of fetching.
    #[arg(long, conflicts_with = "url")]
    file: Option<PathBuf>,
    /// CSS selector; defaults to every <table>.
    #[arg(long)]
    selector: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env).init();

    let args = Args::parse();
    let body = match (&args.url, &args.file) {
        (Some(url), _) => {
            let client = fetch::build_client(&FetchConfig::default())?;
            fetch::fetch_text(&client, url).await?
        }
        (None, Some(path)) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
        }
        (None, None) => bail!("pass a URL or --file PATH"),
    };

    let document = fetch::parse_document(&body);
    let tables = extract_tables(&document, args.selector.as_deref())?;
    for (i, table) in tables.iter().enumerate() {
        println!(
            "[{}] {} rows x {} cols: {}",
            i,
            table.num_rows(),
            table.width(),
            table.column_names().join(" | ")
        );
    }
    Ok(())
}
