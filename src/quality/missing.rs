//! Missingness Table Builder
//!
//! Derives a per-column missing-count/share table straight from the
//! Arrow null buffers, independently of the summarizer. The two must
//! agree on missing counts when run on the same dataset.

// Share computation requires usize->f64 casts
#![allow(clippy::cast_precision_loss)]

use std::sync::Arc;

use arrow::{
    array::{Array, Float64Array, RecordBatch, StringArray, UInt64Array},
    datatypes::{DataType, Field, Schema},
};
use serde::Serialize;

use crate::{
    dataset::{ArrowDataset, Dataset},
    error::{Error, Result},
};

/// Missingness of one column.
#[derive(Debug, Clone, Serialize)]
pub struct MissingColumn {
    /// Column name.
    pub name: String,
    /// Number of missing (null) values.
    pub missing_count: usize,
    /// `missing_count / n_rows`, 0.0 (not NaN) for a zero-row dataset.
    pub missing_share: f64,
}

/// Per-column missingness table, keyed by every column name in the
/// dataset, in declaration order.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct MissingTable {
    columns: Vec<MissingColumn>,
}

impl MissingTable {
    /// Number of columns in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when the dataset had no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Look up a column by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MissingColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// All columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[MissingColumn] {
        &self.columns
    }

    /// Mean of the per-column missing shares, 0.0 when there are no
    /// columns.
    #[must_use]
    pub fn overall_missing_share(&self) -> f64 {
        if self.columns.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.columns.iter().map(|c| c.missing_share).sum();
        sum / self.columns.len() as f64
    }

    /// Flattens the table into a printable RecordBatch.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch cannot be assembled.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let schema = Arc::new(Schema::new(vec![
            Field::new("name", DataType::Utf8, false),
            Field::new("missing_count", DataType::UInt64, false),
            Field::new("missing_share", DataType::Float64, false),
        ]));

        let names: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        let counts: Vec<u64> = self
            .columns
            .iter()
            .map(|c| c.missing_count as u64)
            .collect();
        let shares: Vec<f64> = self.columns.iter().map(|c| c.missing_share).collect();

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(names)),
                Arc::new(UInt64Array::from(counts)),
                Arc::new(Float64Array::from(shares)),
            ],
        )
        .map_err(Error::Arrow)
    }
}

/// Builds the missingness table for a dataset.
///
/// Counts nulls directly from the column arrays; does not go through the
/// summarizer, so the two can cross-check each other.
#[must_use]
pub fn missing_table(dataset: &ArrowDataset) -> MissingTable {
    let schema = dataset.schema();
    let n_rows = dataset.len();

    let mut counts = vec![0usize; schema.fields().len()];
    for batch in dataset.iter() {
        for (idx, count) in counts.iter_mut().enumerate() {
            *count += batch.column(idx).null_count();
        }
    }

    let columns = schema
        .fields()
        .iter()
        .zip(counts)
        .map(|(field, missing_count)| MissingColumn {
            name: field.name().clone(),
            missing_count,
            missing_share: if n_rows == 0 {
                0.0
            } else {
                missing_count as f64 / n_rows as f64
            },
        })
        .collect();

    MissingTable { columns }
}
