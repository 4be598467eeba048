// src/pipeline.rs
//! fetch → extract → clean → reshape, driven by a `PipelineConfig`.

use crate::clean::{clean_table, CleaningRule};
use crate::config::{PipelineConfig, Source};
use crate::error::{Result, TidyError};
use crate::extract::extract_tables;
use crate::fetch::{fetch_text, parse_document};
use crate::reshape::{to_long, LongTable};
use crate::table::CleanedTable;
use reqwest::Client;
use scraper::Html;
use std::fs;
use tracing::{info, instrument};

/// What one run produces: the cleaned wide table and its long form.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub tables_found: usize,
    pub cleaned: CleanedTable,
    pub long: LongTable,
}

/// A validated config with its cleaning rules compiled.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    rules: Vec<CleaningRule>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let rules = config.validated_rules()?;
        Ok(Pipeline { config, rules })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load the source document (URL or local file) and run every stage.
    #[instrument(level = "info", skip(self, client))]
    pub async fn run(&self, client: &Client) -> Result<PipelineOutput> {
        let body = match self.config.source.location()? {
            Source::Url(url) => fetch_text(client, &url).await?,
            Source::File(path) => {
                info!(path = %path.display(), "reading local document");
                fs::read_to_string(&path)?
            }
        };
        self.run_html(&parse_document(&body))
    }

    /// Run extract → clean → reshape on an already-parsed document.
    #[instrument(level = "info", skip_all, fields(table_index = self.config.source.table_index))]
    pub fn run_html(&self, document: &Html) -> Result<PipelineOutput> {
        let source = &self.config.source;

        // 1) extract
        let mut tables = extract_tables(document, source.selector.as_deref())?;
        let tables_found = tables.len();
        if source.table_index >= tables_found {
            return Err(TidyError::TableOutOfRange {
                index: source.table_index,
                available: tables_found,
            });
        }
        let raw = tables.swap_remove(source.table_index);

        // 2) clean
        let cleaned = clean_table(&raw, &self.rules)?;

        // 3) reshape, then the presentation tweaks
        let reshape = &self.config.reshape;
        let mut long = to_long(&cleaned, &reshape.spec())?;
        if !reshape.sign_flip.is_empty() {
            long = long.flip_sign(|v| reshape.sign_flip.iter().any(|f| f == v));
        }
        if let Some(order) = &reshape.category_order {
            long = long.with_category_order(order);
        }

        info!(
            tables_found,
            rows = cleaned.num_rows(),
            records = long.len(),
            missing = long.missing_values(),
            "pipeline done"
        );
        Ok(PipelineOutput {
            tables_found,
            cleaned,
            long,
        })
    }
}
