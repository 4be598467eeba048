// src/fetch/mod.rs
//! Document fetching: a plain GET plus HTML parsing. Failures are reported
//! as-is; nothing here retries.

use crate::config::FetchConfig;
use crate::error::{Result, TidyError};
use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = concat!("tabletidy/", env!("CARGO_PKG_VERSION"));

pub fn build_client(cfg: &FetchConfig) -> Result<Client> {
    Client::builder()
        .user_agent(cfg.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .build()
        .map_err(|e| TidyError::Config(format!("building HTTP client: {}", e)))
}

/// GET `url` and return the body. Non-2xx statuses are errors.
#[instrument(level = "info", skip(client))]
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|source| TidyError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    let fetch_err = |source: reqwest::Error| TidyError::Fetch {
        url: url.to_string(),
        source,
    };

    debug!("Fetching text from {}", parsed);
    let body = client
        .get(parsed)
        .send()
        .await
        .map_err(fetch_err)?
        .error_for_status()
        .map_err(fetch_err)?
        .text()
        .await
        .map_err(fetch_err)?;

    debug!(bytes = body.len(), "fetched");
    Ok(body)
}

/// Fetch and parse in one step.
pub async fn fetch_document(client: &Client, url: &str) -> Result<Html> {
    let body = fetch_text(client, url).await?;
    Ok(parse_document(&body))
}

/// Parse already-fetched HTML.
pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}
