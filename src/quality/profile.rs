//! Column Profiler and Dataset Summarizer
//!
//! Classifies and describes single columns, then aggregates the per-column
//! profiles into a dataset-level summary.

// Share computation requires usize->f64 casts
#![allow(clippy::cast_precision_loss)]

use std::{collections::HashSet, fmt, sync::Arc};

use arrow::{
    array::{Array, Float64Array, RecordBatch, StringArray, UInt64Array},
    datatypes::{DataType, Field, Schema},
};
use serde::Serialize;

use crate::{
    dataset::{ArrowDataset, Dataset},
    error::{Error, Result},
};

/// Kind of data a column holds, as seen by the profiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DtypeKind {
    /// Integer, float or decimal storage, or text where every non-missing
    /// value parses as a number.
    Numeric,
    /// Text that is not numeric (including all-missing text columns).
    Categorical,
    /// Boolean storage.
    Boolean,
    /// Date, time, timestamp or duration storage.
    Datetime,
    /// Anything else (nested types, binary, null-typed columns).
    Other,
}

impl DtypeKind {
    /// Short lowercase name, matching the serialized form.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Boolean => "boolean",
            Self::Datetime => "datetime",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for DtypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Basic statistics for a numeric column, over non-missing values only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericSummary {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
    /// Arithmetic mean.
    pub mean: f64,
}

/// Descriptive profile of a single column. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnProfile {
    /// Column name, unique within the dataset.
    pub name: String,
    /// Classified kind of the column.
    pub dtype_kind: DtypeKind,
    /// Number of missing (null) values.
    pub missing_count: usize,
    /// `missing_count / n_rows`, 0.0 for a zero-row dataset.
    pub missing_share: f64,
    /// Number of distinct non-missing values.
    pub distinct_count: usize,
    /// Min/max/mean for numeric columns with at least one non-missing
    /// value; `None` otherwise.
    pub stats: Option<NumericSummary>,
}

/// Dataset-level summary: row/column counts plus one [`ColumnProfile`]
/// per column in original declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    /// Total number of rows.
    pub n_rows: usize,
    /// Total number of columns; always equals `columns.len()`.
    pub n_cols: usize,
    /// Per-column profiles in declaration order.
    pub columns: Vec<ColumnProfile>,
}

impl DatasetSummary {
    /// Look up a column profile by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Flattens the summary into a printable RecordBatch with one row per
    /// column (name, dtype, missingness, distinct count, numeric stats).
    ///
    /// # Errors
    ///
    /// Returns an error if the batch cannot be assembled.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let schema = Arc::new(Schema::new(vec![
            Field::new("name", DataType::Utf8, false),
            Field::new("dtype", DataType::Utf8, false),
            Field::new("missing_count", DataType::UInt64, false),
            Field::new("missing_share", DataType::Float64, false),
            Field::new("distinct_count", DataType::UInt64, false),
            Field::new("min", DataType::Float64, true),
            Field::new("max", DataType::Float64, true),
            Field::new("mean", DataType::Float64, true),
        ]));

        let names: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        let dtypes: Vec<&str> = self.columns.iter().map(|c| c.dtype_kind.as_str()).collect();
        let missing_counts: Vec<u64> = self
            .columns
            .iter()
            .map(|c| c.missing_count as u64)
            .collect();
        let missing_shares: Vec<f64> = self.columns.iter().map(|c| c.missing_share).collect();
        let distinct_counts: Vec<u64> = self
            .columns
            .iter()
            .map(|c| c.distinct_count as u64)
            .collect();
        let mins: Vec<Option<f64>> = self
            .columns
            .iter()
            .map(|c| c.stats.map(|s| s.min))
            .collect();
        let maxs: Vec<Option<f64>> = self
            .columns
            .iter()
            .map(|c| c.stats.map(|s| s.max))
            .collect();
        let means: Vec<Option<f64>> = self
            .columns
            .iter()
            .map(|c| c.stats.map(|s| s.mean))
            .collect();

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(names)),
                Arc::new(StringArray::from(dtypes)),
                Arc::new(UInt64Array::from(missing_counts)),
                Arc::new(Float64Array::from(missing_shares)),
                Arc::new(UInt64Array::from(distinct_counts)),
                Arc::new(Float64Array::from(mins)),
                Arc::new(Float64Array::from(maxs)),
                Arc::new(Float64Array::from(means)),
            ],
        )
        .map_err(Error::Arrow)
    }
}

/// One column's raw values, rendered to display strings with missing
/// values kept as `None`. Shared by the profiler and the reporters.
pub(crate) struct ColumnValues {
    pub(crate) name: String,
    pub(crate) data_type: DataType,
    pub(crate) values: Vec<Option<String>>,
}

impl ColumnValues {
    /// Non-missing values parsed as f64 where possible, positionally
    /// aligned with the rows (missing and unparsable values are `None`).
    pub(crate) fn numeric_values(&self) -> Vec<Option<f64>> {
        self.values
            .iter()
            .map(|v| v.as_deref().and_then(|s| s.parse::<f64>().ok()))
            .collect()
    }
}

/// Renders every column of the dataset to [`ColumnValues`], in
/// declaration order.
pub(crate) fn collect_columns(dataset: &ArrowDataset) -> Result<Vec<ColumnValues>> {
    use arrow::util::display::array_value_to_string;

    let schema = dataset.schema();
    let mut columns: Vec<ColumnValues> = schema
        .fields()
        .iter()
        .map(|field| ColumnValues {
            name: field.name().clone(),
            data_type: field.data_type().clone(),
            values: Vec::with_capacity(dataset.len()),
        })
        .collect();

    for batch in dataset.iter() {
        for (idx, column) in columns.iter_mut().enumerate() {
            let array = batch.column(idx);
            for row in 0..array.len() {
                if array.is_null(row) {
                    column.values.push(None);
                } else {
                    let rendered =
                        array_value_to_string(array.as_ref(), row).map_err(Error::Arrow)?;
                    column.values.push(Some(rendered));
                }
            }
        }
    }

    Ok(columns)
}

/// Classifies a column from its Arrow storage type and rendered values.
///
/// Values are not coerced once a kind is assigned: a text column where
/// every non-missing value parses as a number is Numeric, everything
/// else stays what its storage says it is.
pub(crate) fn classify_dtype(data_type: &DataType, values: &[Option<String>]) -> DtypeKind {
    match data_type {
        DataType::Boolean => DtypeKind::Boolean,
        DataType::Date32
        | DataType::Date64
        | DataType::Timestamp(_, _)
        | DataType::Time32(_)
        | DataType::Time64(_)
        | DataType::Duration(_) => DtypeKind::Datetime,
        dt if dt.is_numeric() => DtypeKind::Numeric,
        DataType::Utf8 | DataType::LargeUtf8 => {
            let mut non_missing = values.iter().flatten().peekable();
            if non_missing.peek().is_some()
                && non_missing.all(|v| v.parse::<f64>().is_ok())
            {
                DtypeKind::Numeric
            } else {
                DtypeKind::Categorical
            }
        }
        _ => DtypeKind::Other,
    }
}

/// Profiles a single column: missingness, classification, distinct count
/// and numeric stats. Pure function of its input.
pub(crate) fn profile_column(column: &ColumnValues, n_rows: usize) -> ColumnProfile {
    let missing_count = column.values.iter().filter(|v| v.is_none()).count();
    let missing_share = if n_rows == 0 {
        0.0
    } else {
        missing_count as f64 / n_rows as f64
    };

    let dtype_kind = classify_dtype(&column.data_type, &column.values);

    let distinct: HashSet<&str> = column.values.iter().flatten().map(String::as_str).collect();
    let distinct_count = distinct.len();

    let stats = if dtype_kind == DtypeKind::Numeric {
        numeric_summary(&column.numeric_values())
    } else {
        None
    };

    ColumnProfile {
        name: column.name.clone(),
        dtype_kind,
        missing_count,
        missing_share,
        distinct_count,
        stats,
    }
}

fn numeric_summary(values: &[Option<f64>]) -> Option<NumericSummary> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for v in &present {
        min = min.min(*v);
        max = max.max(*v);
        sum += v;
    }

    Some(NumericSummary {
        min,
        max,
        mean: sum / present.len() as f64,
    })
}

/// Summarizes a dataset by profiling every column in declaration order.
///
/// Zero-row and zero-column datasets are valid and summarized as such;
/// downstream flag logic decides whether that is "bad".
///
/// # Errors
///
/// Returns an error only if a column value cannot be rendered.
pub fn summarize(dataset: &ArrowDataset) -> Result<DatasetSummary> {
    let n_rows = dataset.len();
    let columns: Vec<ColumnProfile> = collect_columns(dataset)?
        .iter()
        .map(|column| profile_column(column, n_rows))
        .collect();

    Ok(DatasetSummary {
        n_rows,
        n_cols: columns.len(),
        columns,
    })
}
