//! Correlation Reporter
//!
//! Pairwise Pearson correlation over the numeric columns of a dataset.
//! A dataset with fewer than two numeric columns yields an empty matrix,
//! not an error.

// Statistical computation requires usize->f64 casts
#![allow(clippy::cast_precision_loss)]

use std::sync::Arc;

use arrow::{
    array::{ArrayRef, Float64Array, RecordBatch, StringArray},
    datatypes::{DataType, Field, Schema},
};
use serde::Serialize;

use crate::{
    dataset::ArrowDataset,
    error::{Error, Result},
    quality::profile::{classify_dtype, collect_columns},
    quality::DtypeKind,
};

/// Symmetric Pearson correlation matrix over numeric columns.
///
/// The diagonal is fixed at 1.0. Pairs with no defined coefficient
/// (fewer than two complete observations, or zero variance on either
/// side) are reported as 0.0 rather than NaN, so the matrix always
/// serializes cleanly.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    /// Numeric column names in declaration order.
    pub columns: Vec<String>,
    /// `values[i][j]` is the coefficient between `columns[i]` and
    /// `columns[j]`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Number of numeric columns covered by the matrix.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when the dataset had fewer than two numeric columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Coefficient between two columns by name.
    #[must_use]
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }

    /// Flattens the matrix into a printable RecordBatch with one row per
    /// column and one value column per numeric column.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch cannot be assembled.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let mut fields = vec![Field::new("column", DataType::Utf8, false)];
        for name in &self.columns {
            fields.push(Field::new(name, DataType::Float64, false));
        }
        let schema = Arc::new(Schema::new(fields));

        let mut arrays: Vec<ArrayRef> = vec![Arc::new(StringArray::from(
            self.columns.iter().map(String::as_str).collect::<Vec<_>>(),
        ))];
        for j in 0..self.columns.len() {
            let column: Vec<f64> = (0..self.columns.len()).map(|i| self.values[i][j]).collect();
            arrays.push(Arc::new(Float64Array::from(column)));
        }

        RecordBatch::try_new(schema, arrays).map_err(Error::Arrow)
    }
}

/// Pearson coefficient over rows where both values are present.
/// `None` when undefined.
fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some((*x, *y)),
            _ => None,
        })
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x: f64 = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y: f64 = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Computes the pairwise Pearson correlation matrix over the numeric
/// columns of a dataset, using pairwise-complete observations.
///
/// # Errors
///
/// Returns an error only if a column value cannot be rendered.
pub fn correlation_matrix(dataset: &ArrowDataset) -> Result<CorrelationMatrix> {
    let columns = collect_columns(dataset)?;

    let numeric: Vec<_> = columns
        .iter()
        .filter(|c| classify_dtype(&c.data_type, &c.values) == DtypeKind::Numeric)
        .collect();

    if numeric.len() < 2 {
        return Ok(CorrelationMatrix {
            columns: Vec::new(),
            values: Vec::new(),
        });
    }

    let names: Vec<String> = numeric.iter().map(|c| c.name.clone()).collect();
    let series: Vec<Vec<Option<f64>>> = numeric.iter().map(|c| c.numeric_values()).collect();

    let n = names.len();
    let mut values = vec![vec![0.0; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let coefficient = pearson(&series[i], &series[j]).unwrap_or(0.0);
            values[i][j] = coefficient;
            values[j][i] = coefficient;
        }
    }

    Ok(CorrelationMatrix {
        columns: names,
        values,
    })
}

#[cfg(test)]
mod tests {
    use arrow::array::{Float64Array, Int32Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    use super::*;
    use crate::dataset::ArrowDataset;

    fn dataset_with(
        fields: Vec<Field>,
        arrays: Vec<ArrayRef>,
    ) -> ArrowDataset {
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema, arrays).unwrap();
        ArrowDataset::from_batch(batch).unwrap()
    }

    #[test]
    fn test_perfect_positive_and_negative_correlation() {
        let dataset = dataset_with(
            vec![
                Field::new("x", DataType::Float64, false),
                Field::new("y", DataType::Float64, false),
                Field::new("z", DataType::Float64, false),
            ],
            vec![
                Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0, 4.0])),
                Arc::new(Float64Array::from(vec![2.0, 4.0, 6.0, 8.0])),
                Arc::new(Float64Array::from(vec![4.0, 3.0, 2.0, 1.0])),
            ],
        );

        let matrix = correlation_matrix(&dataset).unwrap();
        assert_eq!(matrix.len(), 3);
        assert!((matrix.get("x", "y").unwrap() - 1.0).abs() < 1e-12);
        assert!((matrix.get("x", "z").unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_matrix_is_symmetric_with_unit_diagonal() {
        let dataset = dataset_with(
            vec![
                Field::new("a", DataType::Int32, false),
                Field::new("b", DataType::Float64, false),
            ],
            vec![
                Arc::new(Int32Array::from(vec![1, 5, 2, 9])),
                Arc::new(Float64Array::from(vec![3.0, 1.0, 4.0, 1.5])),
            ],
        );

        let matrix = correlation_matrix(&dataset).unwrap();
        for i in 0..matrix.len() {
            assert!((matrix.values[i][i] - 1.0).abs() < f64::EPSILON);
            for j in 0..matrix.len() {
                assert!((matrix.values[i][j] - matrix.values[j][i]).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn test_fewer_than_two_numeric_columns_is_empty() {
        let dataset = dataset_with(
            vec![
                Field::new("x", DataType::Float64, false),
                Field::new("city", DataType::Utf8, false),
            ],
            vec![
                Arc::new(Float64Array::from(vec![1.0, 2.0])),
                Arc::new(StringArray::from(vec!["A", "B"])),
            ],
        );

        let matrix = correlation_matrix(&dataset).unwrap();
        assert!(matrix.is_empty());
        assert_eq!(matrix.len(), 0);
    }

    #[test]
    fn test_constant_column_yields_zero_not_nan() {
        let dataset = dataset_with(
            vec![
                Field::new("x", DataType::Float64, false),
                Field::new("c", DataType::Float64, false),
            ],
            vec![
                Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0])),
                Arc::new(Float64Array::from(vec![5.0, 5.0, 5.0])),
            ],
        );

        let matrix = correlation_matrix(&dataset).unwrap();
        let value = matrix.get("x", "c").unwrap();
        assert!(value.abs() < f64::EPSILON);
        assert!(!value.is_nan());
    }

    #[test]
    fn test_pairwise_complete_observations() {
        let dataset = dataset_with(
            vec![
                Field::new("x", DataType::Float64, true),
                Field::new("y", DataType::Float64, true),
            ],
            vec![
                Arc::new(Float64Array::from(vec![
                    Some(1.0),
                    Some(2.0),
                    None,
                    Some(4.0),
                ])),
                Arc::new(Float64Array::from(vec![
                    Some(2.0),
                    Some(4.0),
                    Some(100.0),
                    Some(8.0),
                ])),
            ],
        );

        // Row 3 is dropped from the pair; the rest is a perfect line.
        let matrix = correlation_matrix(&dataset).unwrap();
        assert!((matrix.get("x", "y").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_to_record_batch_shape() {
        let dataset = dataset_with(
            vec![
                Field::new("a", DataType::Float64, false),
                Field::new("b", DataType::Float64, false),
            ],
            vec![
                Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0])),
                Arc::new(Float64Array::from(vec![2.0, 1.0, 3.0])),
            ],
        );

        let matrix = correlation_matrix(&dataset).unwrap();
        let batch = matrix.to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 3);
    }
}
