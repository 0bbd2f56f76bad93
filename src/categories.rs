//! Top-Categories Reporter
//!
//! Frequency tables of the most common values in categorical columns.
//! Caps both the number of columns examined and the number of rows per
//! table; everything beyond the caps is skipped, not erred.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    dataset::ArrowDataset,
    error::Result,
    quality::profile::{classify_dtype, collect_columns, ColumnValues},
    quality::DtypeKind,
};

/// One value of a categorical column with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    /// The distinct value.
    pub value: String,
    /// How many rows carry it.
    pub count: usize,
}

/// Frequency table for a single categorical column, descending by count.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnCategories {
    /// Column name.
    pub name: String,
    /// Most frequent values, at most `top_k` rows.
    pub categories: Vec<CategoryCount>,
}

/// Frequency tables for the first `max_columns` categorical columns of
/// a dataset, in declaration order.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct TopCategories {
    columns: Vec<ColumnCategories>,
}

impl TopCategories {
    /// Number of categorical columns covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when no categorical column was examined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Frequency table for a column by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[CategoryCount]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.categories.as_slice())
    }

    /// All covered columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnCategories] {
        &self.columns
    }
}

/// Counts distinct non-missing values and keeps the `top_k` most
/// frequent, ties broken by first-encountered order (stable sort over
/// encounter order).
fn count_categories(column: &ColumnValues, top_k: usize) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for value in column.values.iter().flatten() {
        if let Some(count) = counts.get_mut(value.as_str()) {
            *count += 1;
        } else {
            counts.insert(value, 1);
            order.push(value);
        }
    }

    let mut rows: Vec<CategoryCount> = order
        .into_iter()
        .map(|value| CategoryCount {
            value: value.to_string(),
            count: counts.get(value).copied().unwrap_or(0),
        })
        .collect();

    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows.truncate(top_k);
    rows
}

/// Builds frequency tables for the first `max_columns` categorical
/// columns of a dataset, each capped at `top_k` rows.
///
/// # Errors
///
/// Returns an error only if a column value cannot be rendered.
pub fn top_categories(
    dataset: &ArrowDataset,
    max_columns: usize,
    top_k: usize,
) -> Result<TopCategories> {
    let columns = collect_columns(dataset)?;

    let tables = columns
        .iter()
        .filter(|c| classify_dtype(&c.data_type, &c.values) == DtypeKind::Categorical)
        .take(max_columns)
        .map(|column| ColumnCategories {
            name: column.name.clone(),
            categories: count_categories(column, top_k),
        })
        .collect();

    Ok(TopCategories { columns: tables })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::{
        array::{Int32Array, RecordBatch, StringArray},
        datatypes::{DataType, Field, Schema},
    };

    use super::*;
    use crate::dataset::ArrowDataset;

    fn sample_dataset() -> ArrowDataset {
        let schema = Arc::new(Schema::new(vec![
            Field::new("age", DataType::Int32, true),
            Field::new("city", DataType::Utf8, true),
            Field::new("color", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int32Array::from(vec![Some(10), Some(20), Some(30), None])),
                Arc::new(StringArray::from(vec![
                    Some("A"),
                    Some("B"),
                    Some("A"),
                    None,
                ])),
                Arc::new(StringArray::from(vec![
                    Some("red"),
                    Some("blue"),
                    Some("green"),
                    Some("red"),
                ])),
            ],
        )
        .unwrap();
        ArrowDataset::from_batch(batch).unwrap()
    }

    #[test]
    fn test_top_k_caps_rows_and_sorts_descending() {
        let top = top_categories(&sample_dataset(), 5, 2).unwrap();

        let city = top.get("city").unwrap();
        assert!(city.len() <= 2);
        assert_eq!(city[0], CategoryCount { value: "A".to_string(), count: 2 });
        assert_eq!(city[1], CategoryCount { value: "B".to_string(), count: 1 });
    }

    #[test]
    fn test_ties_keep_first_encountered_order() {
        let top = top_categories(&sample_dataset(), 5, 3).unwrap();

        // blue and green both occur once; blue was seen first.
        let color = top.get("color").unwrap();
        assert_eq!(color[0].value, "red");
        assert_eq!(color[1].value, "blue");
        assert_eq!(color[2].value, "green");
    }

    #[test]
    fn test_numeric_columns_are_not_examined() {
        let top = top_categories(&sample_dataset(), 5, 2).unwrap();
        assert!(top.get("age").is_none());
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn test_max_columns_skips_the_rest() {
        let top = top_categories(&sample_dataset(), 1, 2).unwrap();
        assert_eq!(top.len(), 1);
        assert!(top.get("city").is_some());
        assert!(top.get("color").is_none());
    }

    #[test]
    fn test_missing_values_are_not_counted() {
        let top = top_categories(&sample_dataset(), 5, 10).unwrap();
        let city = top.get("city").unwrap();
        let total: usize = city.iter().map(|c| c.count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_no_categorical_columns_is_empty() {
        let schema = Arc::new(Schema::new(vec![Field::new("x", DataType::Int32, false)]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(Int32Array::from(vec![1, 2, 3]))],
        )
        .unwrap();
        let dataset = ArrowDataset::from_batch(batch).unwrap();

        let top = top_categories(&dataset, 5, 2).unwrap();
        assert!(top.is_empty());
    }
}
