//! Integration tests for perfilar.

#![allow(clippy::float_cmp, clippy::cast_precision_loss)]

use std::sync::Arc;

use arrow::{
    array::{Float64Array, Int32Array, RecordBatch, StringArray},
    datatypes::{DataType, Field, Schema},
};
use perfilar::{
    compute_quality_flags, correlation_matrix, missing_table, summarize, top_categories,
    ArrowDataset, Dataset, DtypeKind,
};

/// Creates a test dataset with the given number of rows: a numeric id,
/// a score correlated with it, and a low-cardinality label.
fn create_test_dataset(rows: usize) -> ArrowDataset {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int32, false),
        Field::new("score", DataType::Float64, false),
        Field::new("label", DataType::Utf8, false),
    ]));

    let ids: Vec<i32> = (0..rows as i32).collect();
    let scores: Vec<f64> = ids.iter().map(|i| *i as f64 * 1.5).collect();
    let labels: Vec<String> = ids.iter().map(|i| format!("c{}", i % 3)).collect();

    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int32Array::from(ids)),
            Arc::new(Float64Array::from(scores)),
            Arc::new(StringArray::from(
                labels.iter().map(String::as_str).collect::<Vec<_>>(),
            )),
        ],
    )
    .ok()
    .unwrap_or_else(|| panic!("Should create batch"));

    ArrowDataset::from_batch(batch)
        .ok()
        .unwrap_or_else(|| panic!("Should create dataset"))
}

#[test]
fn test_end_to_end_pipeline() {
    let dataset = create_test_dataset(200);

    // 1. Summarize
    let summary = summarize(&dataset).unwrap();
    assert_eq!(summary.n_rows, 200);
    assert_eq!(summary.n_cols, 3);
    assert_eq!(summary.column("id").unwrap().dtype_kind, DtypeKind::Numeric);
    assert_eq!(
        summary.column("label").unwrap().dtype_kind,
        DtypeKind::Categorical
    );

    // 2. Missingness agrees with the summary
    let missing = missing_table(&dataset);
    assert_eq!(missing.len(), summary.n_cols);
    for profile in &summary.columns {
        assert_eq!(
            missing.get(&profile.name).unwrap().missing_count,
            profile.missing_count
        );
    }

    // 3. Flags: clean dataset, nothing raised
    let flags = compute_quality_flags(&summary, &missing);
    assert!(!flags.too_few_rows);
    assert!(!flags.too_many_missing);
    assert!(!flags.has_constant_columns);
    assert!(!flags.has_high_cardinality_categoricals);
    assert_eq!(flags.quality_score, 1.0);

    // 4. Correlation: id and score are a perfect line
    let matrix = correlation_matrix(&dataset).unwrap();
    assert_eq!(matrix.len(), 2);
    assert!((matrix.get("id", "score").unwrap() - 1.0).abs() < 1e-12);

    // 5. Categories: three labels, capped at two rows
    let top = top_categories(&dataset, 5, 2).unwrap();
    let label = top.get("label").unwrap();
    assert_eq!(label.len(), 2);
    assert!(label[0].count >= label[1].count);
}

#[test]
fn test_csv_file_pipeline() {
    use std::io::Write as _;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, "age,height,city\n10,140,A\n20,150,B\n30,160,A\n,170,").unwrap();
    drop(file);

    let dataset = ArrowDataset::from_csv(&path).unwrap();
    assert_eq!(dataset.len(), 4);

    let summary = summarize(&dataset).unwrap();
    let age = summary.column("age").unwrap();
    assert_eq!(age.missing_count, 1);
    assert_eq!(age.missing_share, 0.25);

    let missing = missing_table(&dataset);
    assert_eq!(missing.get("age").unwrap().missing_count, 1);

    let flags = compute_quality_flags(&summary, &missing);
    assert!(flags.too_few_rows);
    assert!((0.0..=1.0).contains(&flags.quality_score));
}

#[test]
fn test_csv_bytes_match_file_load() {
    let csv = "x,y\n1,2\n3,4\n5,6\n";

    let from_bytes = ArrowDataset::from_csv_bytes(csv.as_bytes()).unwrap();

    use std::io::Write as _;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("same.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, "{csv}").unwrap();
    drop(file);
    let from_file = ArrowDataset::from_csv(&path).unwrap();

    let summary_bytes = summarize(&from_bytes).unwrap();
    let summary_file = summarize(&from_file).unwrap();
    assert_eq!(summary_bytes.n_rows, summary_file.n_rows);
    assert_eq!(summary_bytes.n_cols, summary_file.n_cols);
}

#[test]
fn test_flags_serialize_with_expected_keys() {
    let dataset = create_test_dataset(10);
    let summary = summarize(&dataset).unwrap();
    let missing = missing_table(&dataset);
    let flags = compute_quality_flags(&summary, &missing);

    let json = serde_json::to_value(&flags).unwrap();
    for key in [
        "quality_score",
        "too_few_rows",
        "too_many_missing",
        "has_constant_columns",
        "has_high_cardinality_categoricals",
    ] {
        assert!(json.get(key).is_some(), "missing key {key}");
    }
}

#[test]
fn test_summary_serializes_dtype_as_lowercase() {
    let dataset = create_test_dataset(5);
    let summary = summarize(&dataset).unwrap();

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["columns"][0]["dtype_kind"], "numeric");
    assert_eq!(json["columns"][2]["dtype_kind"], "categorical");
    assert_eq!(json["n_rows"], 5);
}

#[test]
fn test_degenerate_datasets_never_error() {
    let zero_rows = ArrowDataset::from_schema(Arc::new(Schema::new(vec![Field::new(
        "a",
        DataType::Float64,
        true,
    )])));
    let zero_cols = ArrowDataset::from_schema(Arc::new(Schema::empty()));

    for dataset in [&zero_rows, &zero_cols] {
        let summary = summarize(dataset).unwrap();
        let missing = missing_table(dataset);
        assert_eq!(summary.n_cols, missing.len());

        let flags = compute_quality_flags(&summary, &missing);
        assert!((0.0..=1.0).contains(&flags.quality_score));

        let matrix = correlation_matrix(dataset).unwrap();
        assert!(matrix.is_empty());

        let top = top_categories(dataset, 5, 3).unwrap();
        assert!(top.is_empty());
    }
}

#[test]
fn test_parquet_pipeline() {
    // Write a batch out through the parquet writer, read it back, profile.
    use parquet::arrow::ArrowWriter;

    let dataset = create_test_dataset(50);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.parquet");

    let file = std::fs::File::create(&path).unwrap();
    let batch = dataset.get_batch(0).unwrap();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
    writer.write(batch).unwrap();
    writer.close().unwrap();

    let loaded = ArrowDataset::from_parquet(&path).unwrap();
    assert_eq!(loaded.len(), 50);

    let summary = summarize(&loaded).unwrap();
    assert_eq!(summary.n_cols, 3);
}
