// src/chart.rs
//! Hand-off to a charting tool: a Vega-Lite spec carrying the long table
//! inline plus the channel encoding. Drawing stays with the renderer.

use crate::error::{Result, TidyError};
use crate::reshape::{LongTable, VALUE_COLUMN, VARIABLE_COLUMN};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Long-table column per visual channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encoding {
    pub x: String,
    pub y: String,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default = "default_mark")]
    pub mark: String,
}

fn default_mark() -> String {
    "bar".to_string()
}

impl Encoding {
    /// Value on x, first id column on y, variable as fill: the pyramid layout.
    pub fn pyramid(long: &LongTable) -> Self {
        Encoding {
            x: VALUE_COLUMN.to_string(),
            y: long.id_columns().first().cloned().unwrap_or_default(),
            fill: Some(VARIABLE_COLUMN.to_string()),
            mark: default_mark(),
        }
    }
}

pub fn vega_lite_spec(long: &LongTable, encoding: &Encoding) -> Result<Value> {
    let mut channels = Map::new();
    channels.insert("x".into(), channel(long, &encoding.x)?);
    channels.insert("y".into(), channel(long, &encoding.y)?);
    if let Some(fill) = &encoding.fill {
        channels.insert("color".into(), channel(long, fill)?);
    }

    let values: Vec<Value> = long
        .records()
        .iter()
        .map(|r| {
            let mut row = Map::new();
            for (name, id) in long.id_columns().iter().zip(&r.ids) {
                row.insert(name.clone(), json!(id));
            }
            row.insert(VARIABLE_COLUMN.into(), json!(r.variable));
            row.insert(VALUE_COLUMN.into(), json!(r.value));
            Value::Object(row)
        })
        .collect();

    Ok(json!({
        "$schema": VEGA_LITE_SCHEMA,
        "data": { "values": values },
        "mark": encoding.mark,
        "encoding": channels,
    }))
}

fn channel(long: &LongTable, field: &str) -> Result<Value> {
    if field == VALUE_COLUMN {
        return Ok(json!({ "field": field, "type": "quantitative" }));
    }
    if field == VARIABLE_COLUMN {
        return Ok(json!({ "field": field, "type": "nominal", "sort": long.variables() }));
    }
    match long.id_columns().iter().position(|c| c == field) {
        Some(0) => Ok(json!({ "field": field, "type": "ordinal", "sort": long.levels() })),
        Some(_) => Ok(json!({ "field": field, "type": "nominal" })),
        None => {
            let mut available = long.id_columns().to_vec();
            available.push(VARIABLE_COLUMN.to_string());
            available.push(VALUE_COLUMN.to_string());
            Err(TidyError::column_not_found(field, available))
        }
    }
}
