// src/config/mod.rs
//! YAML pipeline description. Parsed with `serde_yaml`, validated once, then
//! compiled into the typed rules the cleaner and reshaper consume.

use crate::chart::Encoding;
use crate::clean::{CleaningRule, RowPredicate};
use crate::error::{Result, TidyError};
use crate::reshape::ReshapeSpec;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub clean: Vec<RuleConfig>,
    pub reshape: ReshapeConfig,
    #[serde(default)]
    pub chart: Option<Encoding>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub selector: Option<String>,
    /// Which of the extracted tables to clean.
    #[serde(default)]
    pub table_index: usize,
}

/// Where the document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    File(PathBuf),
}

impl SourceConfig {
    pub fn location(&self) -> Result<Source> {
        match (&self.url, &self.file) {
            (Some(url), None) => Ok(Source::Url(url.clone())),
            (None, Some(file)) => Ok(Source::File(file.clone())),
            (Some(_), Some(_)) => Err(TidyError::Config(
                "source: set either `url` or `file`, not both".into(),
            )),
            (None, None) => Err(TidyError::Config(
                "source: one of `url` or `file` is required".into(),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            user_agent: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Serialized form of a `CleaningRule`; patterns are still strings here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleConfig {
    DropRows(DropRowsConfig),
    Rename {
        from: String,
        to: String,
    },
    CoerceNumeric {
        column: String,
        #[serde(default)]
        strip: Option<String>,
    },
    StripText {
        column: String,
        pattern: String,
    },
}

/// Exactly one of `equals`, `contains`, `matches` or `missing: true`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DropRowsConfig {
    pub column: String,
    #[serde(default)]
    pub equals: Option<String>,
    #[serde(default)]
    pub contains: Option<String>,
    #[serde(default)]
    pub matches: Option<String>,
    #[serde(default)]
    pub missing: bool,
}

impl DropRowsConfig {
    fn predicate(&self) -> Result<RowPredicate> {
        let mut preds = Vec::new();
        if let Some(v) = &self.equals {
            preds.push(RowPredicate::Equals(v.clone()));
        }
        if let Some(v) = &self.contains {
            preds.push(RowPredicate::Contains(v.clone()));
        }
        if let Some(p) = &self.matches {
            preds.push(RowPredicate::Matches(compile_pattern(p)?));
        }
        if self.missing {
            preds.push(RowPredicate::Missing);
        }

        match preds.len() {
            1 => Ok(preds.remove(0)),
            n => Err(TidyError::Config(format!(
                "drop_rows on `{}` needs exactly one condition, got {}",
                self.column, n
            ))),
        }
    }
}

impl RuleConfig {
    pub fn compile(&self) -> Result<CleaningRule> {
        Ok(match self {
            RuleConfig::DropRows(cfg) => CleaningRule::DropRows {
                column: cfg.column.clone(),
                predicate: cfg.predicate()?,
            },
            RuleConfig::Rename { from, to } => CleaningRule::Rename {
                from: from.clone(),
                to: to.clone(),
            },
            RuleConfig::CoerceNumeric { column, strip } => CleaningRule::CoerceNumeric {
                column: column.clone(),
                strip: strip.as_deref().map(compile_pattern).transpose()?,
            },
            RuleConfig::StripText { column, pattern } => CleaningRule::StripText {
                column: column.clone(),
                pattern: compile_pattern(pattern)?,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReshapeConfig {
    pub id_columns: Vec<String>,
    pub measure_columns: Vec<String>,
    /// Measure variables whose values are negated after reshaping.
    #[serde(default)]
    pub sign_flip: Vec<String>,
    /// Fixed level order for the first id column.
    #[serde(default)]
    pub category_order: Option<Vec<String>>,
}

impl ReshapeConfig {
    pub fn spec(&self) -> ReshapeSpec {
        ReshapeSpec::new(self.id_columns.clone(), self.measure_columns.clone())
    }

    pub fn validate(&self) -> Result<()> {
        self.spec().validate()?;
        if let Some(v) = self
            .sign_flip
            .iter()
            .find(|v| !self.measure_columns.contains(v))
        {
            return Err(TidyError::Config(format!(
                "sign_flip names `{}`, which is not a measure column",
                v
            )));
        }
        if matches!(&self.category_order, Some(order) if order.is_empty()) {
            return Err(TidyError::Config("category_order must not be empty".into()));
        }
        Ok(())
    }
}

impl PipelineConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            TidyError::Config(format!("failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_yaml_str(&text)
    }

    /// Structural checks; does not touch the network or any table.
    pub fn validate(&self) -> Result<()> {
        self.validated_rules().map(|_| ())
    }

    /// Run every structural check and hand back the compiled cleaning rules.
    pub fn validated_rules(&self) -> Result<Vec<CleaningRule>> {
        self.source.location()?;
        if self.fetch.timeout_secs == 0 {
            return Err(TidyError::Config("fetch.timeout_secs must be positive".into()));
        }
        self.reshape.validate()?;
        self.compile_rules()
    }

    pub fn compile_rules(&self) -> Result<Vec<CleaningRule>> {
        self.clean.iter().map(RuleConfig::compile).collect()
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| TidyError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
source:
  url: https://example.org/population
  selector: table.wikitable
  table_index: 1
clean:
  - drop_rows: { column: Age, equals: Total }
  - rename: { from: Male Population, to: Male }
  - coerce_numeric: { column: Male, strip: "," }
  - strip_text: { column: Age, pattern: "\\[.*?\\]" }
reshape:
  id_columns: [Age]
  measure_columns: [Male, Female]
  sign_flip: [Male]
  category_order: ["0-4", "5-9"]
chart:
  x: value
  y: Age
  fill: variable
"#;

    #[test]
    fn parses_full_config() {
        let cfg = PipelineConfig::from_yaml_str(YAML).unwrap();
        assert_eq!(
            cfg.source.location().unwrap(),
            Source::Url("https://example.org/population".into())
        );
        assert_eq!(cfg.source.table_index, 1);
        assert_eq!(cfg.fetch, FetchConfig::default());
        assert_eq!(cfg.clean.len(), 4);
        assert_eq!(
            cfg.clean[1],
            RuleConfig::Rename {
                from: "Male Population".into(),
                to: "Male".into()
            }
        );
        assert_eq!(cfg.reshape.sign_flip, vec!["Male"]);
        assert!(cfg.chart.is_some());
        cfg.validate().unwrap();

        let rules = cfg.compile_rules().unwrap();
        assert!(matches!(
            &rules[0],
            CleaningRule::DropRows { predicate: RowPredicate::Equals(v), .. } if v == "Total"
        ));
        assert!(matches!(&rules[2], CleaningRule::CoerceNumeric { strip: Some(_), .. }));
    }

    #[test]
    fn example_config_is_valid() {
        let cfg = PipelineConfig::from_yaml_str(include_str!("../../pipeline.example.yaml")).unwrap();
        cfg.validate().unwrap();
    }

    #[test]
    fn bad_pattern_is_reported() {
        let rule = RuleConfig::StripText {
            column: "Age".into(),
            pattern: "(".into(),
        };
        assert!(matches!(
            rule.compile(),
            Err(TidyError::InvalidPattern { ref pattern, .. }) if pattern == "("
        ));
    }

    #[test]
    fn drop_rows_needs_one_condition() {
        let none = DropRowsConfig {
            column: "Age".into(),
            ..Default::default()
        };
        assert!(RuleConfig::DropRows(none).compile().is_err());

        let two = DropRowsConfig {
            column: "Age".into(),
            equals: Some("Total".into()),
            missing: true,
            ..Default::default()
        };
        assert!(RuleConfig::DropRows(two).compile().is_err());
    }

    #[test]
    fn source_must_be_exactly_one() {
        let both = SourceConfig {
            url: Some("https://example.org".into()),
            file: Some("page.html".into()),
            ..Default::default()
        };
        assert!(both.location().is_err());
        assert!(SourceConfig::default().location().is_err());
    }

    #[test]
    fn sign_flip_must_name_a_measure() {
        let cfg = ReshapeConfig {
            id_columns: vec!["Age".into()],
            measure_columns: vec!["Male".into(), "Female".into()],
            sign_flip: vec!["Age".into()],
            category_order: None,
        };
        assert!(matches!(cfg.validate(), Err(TidyError::Config(_))));
    }
}
