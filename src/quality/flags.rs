//! Quality Flag Engine
//!
//! Consumes a [`DatasetSummary`] and a [`MissingTable`] for the same
//! dataset and derives a bounded quality score plus structural flags.
//! The heuristic constants are fixed, not configurable.

// Share computation requires usize->f64 casts
#![allow(clippy::cast_precision_loss)]

use serde::Serialize;

use super::{missing::MissingTable, profile::DatasetSummary, profile::DtypeKind};

/// Minimum row count before a dataset is considered big enough to model.
pub const MIN_ROWS: usize = 100;

/// Overall missing share above which the dataset is flagged.
pub const MAX_OVERALL_MISSING_SHARE: f64 = 0.5;

/// Distinct count above which a categorical column is high-cardinality
/// regardless of row count.
pub const HIGH_CARDINALITY_DISTINCT: usize = 100;

/// Distinct share above which a categorical column is high-cardinality,
/// applied only at or above [`HIGH_CARDINALITY_MIN_ROWS`].
pub const HIGH_CARDINALITY_SHARE: f64 = 0.9;

/// Minimum row count for the distinct-share rule. Below this, a nearly
/// fully unique column is expected (two rows of distinct strings are not
/// an identifier) and only the absolute distinct-count rule applies.
pub const HIGH_CARDINALITY_MIN_ROWS: usize = 20;

/// Score penalty for too few rows.
pub const FEW_ROWS_PENALTY: f64 = 0.2;

/// Score penalty for constant columns.
pub const CONSTANT_PENALTY: f64 = 0.1;

/// Score penalty for high-cardinality categoricals.
pub const HIGH_CARDINALITY_PENALTY: f64 = 0.1;

/// Quality flags for a dataset. Derived, stateless, recomputed per call.
#[derive(Debug, Clone, Serialize)]
pub struct QualityFlags {
    /// Bounded heuristic score in `[0, 1]`.
    pub quality_score: f64,
    /// Fewer than [`MIN_ROWS`] rows.
    pub too_few_rows: bool,
    /// Overall missing share above [`MAX_OVERALL_MISSING_SHARE`].
    pub too_many_missing: bool,
    /// Some column has at most one distinct non-missing value (and at
    /// least one non-missing value; all-missing columns do not count).
    pub has_constant_columns: bool,
    /// Some categorical column looks like an identifier rather than a
    /// feature (see [`compute_quality_flags`] for the exact rule).
    pub has_high_cardinality_categoricals: bool,
}

/// A categorical column is high-cardinality when its distinct count
/// exceeds [`HIGH_CARDINALITY_DISTINCT`], or when the dataset has at
/// least [`HIGH_CARDINALITY_MIN_ROWS`] rows and the distinct share
/// exceeds [`HIGH_CARDINALITY_SHARE`]. The second rule catches small
/// fully-unique datasets the absolute threshold misses.
fn is_high_cardinality(distinct_count: usize, n_rows: usize) -> bool {
    if distinct_count > HIGH_CARDINALITY_DISTINCT {
        return true;
    }
    n_rows >= HIGH_CARDINALITY_MIN_ROWS
        && distinct_count as f64 / n_rows as f64 > HIGH_CARDINALITY_SHARE
}

/// Computes quality flags from a summary and a missingness table built
/// over the same dataset.
///
/// Keeping the two inputs consistent is the caller's responsibility; no
/// cross-validation is performed, mismatched inputs produce mismatched
/// output rather than an error. Total over degenerate input: zero-row
/// and zero-column datasets get a defined score, never an error.
///
/// The score starts at `1.0 - overall_missing_share`, loses
/// [`FEW_ROWS_PENALTY`] for too few rows, [`CONSTANT_PENALTY`] for
/// constant columns and [`HIGH_CARDINALITY_PENALTY`] for
/// high-cardinality categoricals, then clamps to `[0, 1]`.
#[must_use]
pub fn compute_quality_flags(summary: &DatasetSummary, missing: &MissingTable) -> QualityFlags {
    let too_few_rows = summary.n_rows < MIN_ROWS;

    let overall_missing_share = missing.overall_missing_share();
    let too_many_missing = overall_missing_share > MAX_OVERALL_MISSING_SHARE;

    let has_constant_columns = summary
        .columns
        .iter()
        .any(|c| c.distinct_count <= 1 && c.missing_count < summary.n_rows);

    let has_high_cardinality_categoricals = summary.columns.iter().any(|c| {
        c.dtype_kind == DtypeKind::Categorical && is_high_cardinality(c.distinct_count, summary.n_rows)
    });

    let mut score = 1.0 - overall_missing_share;
    if too_few_rows {
        score -= FEW_ROWS_PENALTY;
    }
    if has_constant_columns {
        score -= CONSTANT_PENALTY;
    }
    if has_high_cardinality_categoricals {
        score -= HIGH_CARDINALITY_PENALTY;
    }

    QualityFlags {
        quality_score: score.clamp(0.0, 1.0),
        too_few_rows,
        too_many_missing,
        has_constant_columns,
        has_high_cardinality_categoricals,
    }
}
