//! Typed request and response bodies for the quality service.
//!
//! Requests are explicit structs with defaulted optional fields; no
//! dynamically-shaped JSON reaches the flag engine.

use serde::{Deserialize, Serialize};

use crate::quality::QualityFlags;

/// Body of `POST /quality`: caller-supplied dataset facts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QualityRequest {
    /// Row count of the caller's dataset (default 0).
    pub n_rows: u64,
    /// Largest per-column missing share the caller observed (default 0.0).
    pub max_missing_share: f64,
    /// Whether the caller's dataset has constant columns (default false).
    pub has_constant_columns: bool,
}

impl Default for QualityRequest {
    fn default() -> Self {
        Self {
            n_rows: 0,
            max_missing_share: 0.0,
            has_constant_columns: false,
        }
    }
}

/// Flags reported by `POST /quality`, which only evaluates the facts
/// supplied in the request.
#[derive(Debug, Clone, Serialize)]
pub struct BasicFlags {
    /// Fewer rows than the modeling minimum.
    pub too_few_rows: bool,
    /// Reported missing share above the tolerated maximum.
    pub too_many_missing: bool,
    /// Caller reported constant columns.
    pub has_constant_columns: bool,
}

/// Response of `POST /quality`.
#[derive(Debug, Clone, Serialize)]
pub struct QualityResponse {
    /// Overall verdict: dataset looks fit for modeling.
    pub ok_for_model: bool,
    /// Quality score rounded to 3 decimals.
    pub quality_score: f64,
    /// Server-side processing time in milliseconds.
    pub latency_ms: u64,
    /// Individual flags behind the verdict.
    pub flags: BasicFlags,
}

/// Response of `POST /quality-from-csv`: full-pipeline verdict.
#[derive(Debug, Clone, Serialize)]
pub struct CsvQualityResponse {
    /// Overall verdict: no flag raised.
    pub ok_for_model: bool,
    /// Quality score rounded to 3 decimals.
    pub quality_score: f64,
    /// Server-side processing time in milliseconds.
    pub latency_ms: u64,
    /// Full quality flags computed from the uploaded CSV.
    pub flags: QualityFlags,
}

/// Response of `POST /quality-flags-from-csv`: flags only.
#[derive(Debug, Clone, Serialize)]
pub struct FlagsResponse {
    /// Full quality flags computed from the uploaded CSV.
    pub flags: QualityFlags,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: &'static str,
}

/// Error body returned with HTTP 400.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Human-readable description of what went wrong.
    pub error: String,
}
