//! Request handlers for the quality service.
//!
//! Each handler builds its own dataset snapshot and entity graph and
//! discards them once the response is produced; nothing is shared
//! across requests. Every failure is reported as HTTP 400 with a
//! descriptive message.

use std::time::Instant;

use axum::{extract::Multipart, http::StatusCode, Json};

use crate::{
    dataset::{ArrowDataset, Dataset},
    error::Error,
    quality::{compute_quality_flags, missing_table, summarize, QualityFlags, MIN_ROWS},
};

use super::types::{
    BasicFlags, CsvQualityResponse, ErrorResponse, FlagsResponse, HealthResponse, QualityRequest,
    QualityResponse,
};

/// Error type shared by all handlers: status + JSON body.
pub(crate) type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// `GET /health`
pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `POST /quality` - evaluates caller-supplied dataset facts without
/// touching any data. Penalizes only few-rows and constant columns.
pub(crate) async fn quality(
    Json(request): Json<QualityRequest>,
) -> Result<Json<QualityResponse>, ApiError> {
    let start = Instant::now();

    let too_few_rows = (request.n_rows as usize) < MIN_ROWS;
    let too_many_missing = request.max_missing_share > 0.5;
    let ok_for_model =
        !too_few_rows && request.max_missing_share <= 0.1 && !request.has_constant_columns;

    let mut score = 1.0 - request.max_missing_share;
    if too_few_rows {
        score -= 0.2;
    }
    if request.has_constant_columns {
        score -= 0.1;
    }

    Ok(Json(QualityResponse {
        ok_for_model,
        quality_score: round3(score.clamp(0.0, 1.0)),
        latency_ms: elapsed_ms(start),
        flags: BasicFlags {
            too_few_rows,
            too_many_missing,
            has_constant_columns: request.has_constant_columns,
        },
    }))
}

/// `POST /quality-from-csv` - runs the full pipeline on an uploaded CSV.
pub(crate) async fn quality_from_csv(
    multipart: Multipart,
) -> Result<Json<CsvQualityResponse>, ApiError> {
    let start = Instant::now();

    let dataset = read_csv_upload(multipart).await?;
    let flags = evaluate_dataset(&dataset)?;

    let ok_for_model = !flags.too_few_rows
        && !flags.too_many_missing
        && !flags.has_constant_columns
        && !flags.has_high_cardinality_categoricals;

    tracing::info!(
        rows = dataset.len(),
        cols = dataset.schema().fields().len(),
        score = flags.quality_score,
        ok_for_model,
        "evaluated uploaded CSV"
    );

    Ok(Json(CsvQualityResponse {
        ok_for_model,
        quality_score: round3(flags.quality_score),
        latency_ms: elapsed_ms(start),
        flags,
    }))
}

/// `POST /quality-flags-from-csv` - same upload contract, flags only.
pub(crate) async fn quality_flags_from_csv(
    multipart: Multipart,
) -> Result<Json<FlagsResponse>, ApiError> {
    let dataset = read_csv_upload(multipart).await?;
    let flags = evaluate_dataset(&dataset)?;

    Ok(Json(FlagsResponse { flags }))
}

/// Reads the first multipart field as CSV bytes and parses a dataset
/// snapshot out of it. Empty uploads, non-UTF-8 bytes, unparsable CSV
/// and zero-row CSV are all rejected with a 400.
async fn read_csv_upload(mut multipart: Multipart) -> Result<ArrowDataset, ApiError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Invalid multipart body: {e}")))?
        .ok_or_else(|| bad_request("Missing file upload"))?;

    let data = field
        .bytes()
        .await
        .map_err(|e| bad_request(format!("Failed to read upload: {e}")))?;

    let dataset = ArrowDataset::from_csv_bytes(&data).map_err(|e| match e {
        Error::NonUtf8 => bad_request("File must be UTF-8 encoded"),
        Error::EmptyDataset => bad_request("CSV is empty"),
        other => bad_request(format!("Failed to process CSV: {other}")),
    })?;

    if dataset.is_empty() {
        return Err(bad_request("CSV is empty"));
    }

    Ok(dataset)
}

/// Full pipeline: summary + missingness table + flag engine.
fn evaluate_dataset(dataset: &ArrowDataset) -> Result<QualityFlags, ApiError> {
    let summary =
        summarize(dataset).map_err(|e| bad_request(format!("Failed to process CSV: {e}")))?;
    let missing = missing_table(dataset);
    Ok(compute_quality_flags(&summary, &missing))
}
