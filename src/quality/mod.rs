//! Dataset quality pipeline
//!
//! Profiles every column of a dataset, builds a missingness table and
//! derives a bounded quality score with structural flags (constant
//! columns, high-cardinality categoricals).
//!
//! The three stages are independent pure functions over an in-memory
//! [`crate::ArrowDataset`] snapshot:
//!
//! ```ignore
//! let summary = summarize(&dataset)?;
//! let missing = missing_table(&dataset);
//! let flags = compute_quality_flags(&summary, &missing);
//! assert!((0.0..=1.0).contains(&flags.quality_score));
//! ```

pub(crate) mod flags;
pub(crate) mod missing;
pub(crate) mod profile;


pub use flags::{
    compute_quality_flags, QualityFlags, CONSTANT_PENALTY, FEW_ROWS_PENALTY,
    HIGH_CARDINALITY_DISTINCT, HIGH_CARDINALITY_MIN_ROWS, HIGH_CARDINALITY_PENALTY,
    HIGH_CARDINALITY_SHARE, MAX_OVERALL_MISSING_SHARE, MIN_ROWS,
};
pub use missing::{missing_table, MissingColumn, MissingTable};
pub use profile::{summarize, ColumnProfile, DatasetSummary, DtypeKind, NumericSummary};
