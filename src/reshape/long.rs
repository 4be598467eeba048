// src/reshape/long.rs
use crate::error::Result;
use arrow::{
    array::{ArrayRef, Float64Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::warn;

pub const VARIABLE_COLUMN: &str = "variable";
pub const VALUE_COLUMN: &str = "value";

/// One (identifier, variable, value) observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRecord {
    /// One entry per identifier column, in declared order.
    pub ids: Vec<Option<String>>,
    pub variable: String,
    pub value: Option<f64>,
}

impl LongRecord {
    /// Value of the first identifier column.
    pub fn id(&self) -> Option<&str> {
        self.ids.first().and_then(|v| v.as_deref())
    }
}

/// Tidy long-format table: records are measure-major, source-row-minor.
#[derive(Debug, Clone, PartialEq)]
pub struct LongTable {
    id_columns: Vec<String>,
    variables: Vec<String>,
    records: Vec<LongRecord>,
    category_order: Option<Vec<String>>,
}

impl LongTable {
    pub(crate) fn new(id_columns: Vec<String>, variables: Vec<String>, records: Vec<LongRecord>) -> Self {
        LongTable {
            id_columns,
            variables,
            records,
            category_order: None,
        }
    }

    pub fn id_columns(&self) -> &[String] {
        &self.id_columns
    }

    /// Measure column names, in declared order.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn records(&self) -> &[LongRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn missing_values(&self) -> usize {
        self.records.iter().filter(|r| r.value.is_none()).count()
    }

    /// Negate the values of every variable selected by `pred`. Used for
    /// mirrored layouts such as population pyramids.
    pub fn flip_sign(&self, pred: impl Fn(&str) -> bool) -> LongTable {
        let records = self
            .records
            .iter()
            .map(|r| {
                if pred(&r.variable) {
                    LongRecord {
                        // 0 stays 0 rather than becoming -0
                        value: r.value.map(|v| if v == 0.0 { 0.0 } else { -v }),
                        ..r.clone()
                    }
                } else {
                    r.clone()
                }
            })
            .collect();
        LongTable {
            records,
            ..self.clone()
        }
    }

    /// Bind the first identifier column to a fixed sequence of levels.
    /// Record order is untouched; values not in `order` are appended after it
    /// in first-appearance order.
    pub fn with_category_order(&self, order: &[String]) -> LongTable {
        let mut levels: Vec<String> = Vec::with_capacity(order.len());
        let mut seen: HashSet<&str> = HashSet::new();
        for level in order {
            if seen.insert(level.as_str()) {
                levels.push(level.clone());
            }
        }

        let mut unknown = Vec::new();
        for id in self.records.iter().filter_map(LongRecord::id) {
            if seen.insert(id) {
                unknown.push(id.to_string());
            }
        }
        if !unknown.is_empty() {
            warn!(?unknown, "identifier values missing from category order; appended");
            levels.extend(unknown);
        }

        LongTable {
            category_order: Some(levels),
            ..self.clone()
        }
    }

    pub fn has_category_order(&self) -> bool {
        self.category_order.is_some()
    }

    /// Levels of the first identifier column: the override if one was set,
    /// otherwise the distinct values in lexicographic order.
    pub fn levels(&self) -> Vec<String> {
        match &self.category_order {
            Some(order) => order.clone(),
            None => self
                .records
                .iter()
                .filter_map(LongRecord::id)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn category_rank(&self, value: &str) -> Option<usize> {
        self.levels().iter().position(|l| l == value)
    }

    /// Copy with records stably sorted by variable order, then category rank.
    /// Missing identifiers sort last.
    pub fn sorted_by_category(&self) -> LongTable {
        let levels = self.levels();
        let rank = |r: &LongRecord| {
            r.id()
                .and_then(|id| levels.iter().position(|l| l == id))
                .unwrap_or(usize::MAX)
        };
        let var_rank = |r: &LongRecord| {
            self.variables
                .iter()
                .position(|v| *v == r.variable)
                .unwrap_or(usize::MAX)
        };

        let mut records = self.records.clone();
        records.sort_by_key(|r| (var_rank(r), rank(r)));
        LongTable {
            records,
            ..self.clone()
        }
    }

    /// Regroup values per variable, in declared order.
    pub fn by_variable(&self) -> Vec<(String, Vec<Option<f64>>)> {
        self.variables
            .iter()
            .map(|v| {
                let values = self
                    .records
                    .iter()
                    .filter(|r| r.variable == *v)
                    .map(|r| r.value)
                    .collect();
                (v.clone(), values)
            })
            .collect()
    }

    /// Arrow view: one Utf8 column per identifier, then `variable` and `value`.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let mut fields = Vec::with_capacity(self.id_columns.len() + 2);
        let mut cols: Vec<ArrayRef> = Vec::with_capacity(self.id_columns.len() + 2);

        for (i, name) in self.id_columns.iter().enumerate() {
            fields.push(Field::new(name, DataType::Utf8, true));
            let arr: StringArray = self
                .records
                .iter()
                .map(|r| r.ids.get(i).and_then(|v| v.as_deref()))
                .collect();
            cols.push(Arc::new(arr));
        }

        fields.push(Field::new(VARIABLE_COLUMN, DataType::Utf8, false));
        let vars: StringArray = self.records.iter().map(|r| Some(r.variable.as_str())).collect();
        cols.push(Arc::new(vars));

        fields.push(Field::new(VALUE_COLUMN, DataType::Float64, true));
        let values: Float64Array = self.records.iter().map(|r| r.value).collect();
        cols.push(Arc::new(values));

        Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), cols)?)
    }
}
