// src/table/cleaned.rs
use crate::error::{Result, TidyError};
use crate::table::RawTable;
use arrow::{
    array::{Array, ArrayRef, Float64Array, StringArray},
    datatypes::{DataType, Field, Schema, SchemaRef},
    record_batch::{RecordBatch, RecordBatchOptions},
};
use std::sync::Arc;

/// Declared type of a cleaned column. Both kinds are nullable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Numeric,
}

impl ColumnType {
    pub fn data_type(self) -> DataType {
        match self {
            ColumnType::Text => DataType::Utf8,
            ColumnType::Numeric => DataType::Float64,
        }
    }

    pub fn from_data_type(dt: &DataType) -> Option<Self> {
        match dt {
            DataType::Utf8 => Some(ColumnType::Text),
            DataType::Float64 => Some(ColumnType::Numeric),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Numeric => "numeric",
        }
    }
}

/// A table with stable column names and a declared type per column,
/// backed by an Arrow `RecordBatch` whose schema is the column → type map.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedTable {
    batch: RecordBatch,
}

impl CleanedTable {
    /// Every raw column as nullable text; padding cells become nulls.
    pub fn from_raw(raw: &RawTable) -> Result<Self> {
        let names = raw.column_names();
        let fields: Vec<Field> = names
            .iter()
            .map(|n| Field::new(n, DataType::Utf8, true))
            .collect();
        let cols: Vec<ArrayRef> = (0..raw.width())
            .map(|i| Arc::new(raw.column(i).collect::<StringArray>()) as ArrayRef)
            .collect();

        Self::try_new(Arc::new(Schema::new(fields)), cols, raw.num_rows())
    }

    /// Assemble from parts. The row count is explicit so zero-column tables survive.
    pub(crate) fn try_new(schema: SchemaRef, cols: Vec<ArrayRef>, num_rows: usize) -> Result<Self> {
        let opts = RecordBatchOptions::new().with_row_count(Some(num_rows));
        let batch = RecordBatch::try_new_with_options(schema, cols, &opts)?;
        Ok(CleanedTable { batch })
    }

    pub(crate) fn from_batch(batch: RecordBatch) -> Self {
        CleanedTable { batch }
    }

    /// Copy of this table with column `idx` swapped for `field`/`array`.
    pub(crate) fn replace_column(&self, idx: usize, field: Field, array: ArrayRef) -> Result<Self> {
        let schema = self.batch.schema();
        let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
        fields[idx] = field;
        let mut cols = self.batch.columns().to_vec();
        cols[idx] = array;
        Self::try_new(Arc::new(Schema::new(fields)), cols, self.num_rows())
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn into_batch(self) -> RecordBatch {
        self.batch
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.batch
            .schema()
            .index_of(name)
            .map_err(|_| TidyError::column_not_found(name, self.column_names()))
    }

    pub fn column_type(&self, name: &str) -> Result<ColumnType> {
        let idx = self.column_index(name)?;
        Ok(self.type_at(idx))
    }

    pub(crate) fn type_at(&self, idx: usize) -> ColumnType {
        ColumnType::from_data_type(self.batch.schema().field(idx).data_type())
            .unwrap_or(ColumnType::Text)
    }

    pub fn text_column(&self, name: &str) -> Result<Vec<Option<String>>> {
        let idx = self.column_index(name)?;
        let arr = self.text_array(idx).ok_or_else(|| TidyError::ColumnType {
            column: name.to_string(),
            expected: ColumnType::Text.name(),
            found: self.type_at(idx).name(),
        })?;
        Ok(arr.iter().map(|v| v.map(str::to_string)).collect())
    }

    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let idx = self.column_index(name)?;
        let arr = self.numeric_array(idx).ok_or_else(|| TidyError::ColumnType {
            column: name.to_string(),
            expected: ColumnType::Numeric.name(),
            found: self.type_at(idx).name(),
        })?;
        Ok(arr.iter().collect())
    }

    pub(crate) fn text_array(&self, idx: usize) -> Option<&StringArray> {
        self.batch.column(idx).as_any().downcast_ref::<StringArray>()
    }

    pub(crate) fn numeric_array(&self, idx: usize) -> Option<&Float64Array> {
        self.batch.column(idx).as_any().downcast_ref::<Float64Array>()
    }

    /// Cells of column `idx` rendered as text; numbers use `f64`'s `Display`.
    pub fn rendered_column(&self, idx: usize) -> Vec<Option<String>> {
        if let Some(arr) = self.numeric_array(idx) {
            return arr.iter().map(|v| v.map(|n| n.to_string())).collect();
        }
        match self.text_array(idx) {
            Some(arr) => arr.iter().map(|v| v.map(str::to_string)).collect(),
            None => vec![None; self.num_rows()],
        }
    }

    /// Number of missing cells in the named column.
    pub fn missing_count(&self, name: &str) -> Result<usize> {
        let idx = self.column_index(name)?;
        Ok(self.batch.column(idx).null_count())
    }
}
