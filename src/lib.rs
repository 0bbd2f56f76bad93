//! perfilar - Dataset Profiling and Quality Diagnostics in Pure Rust
//!
//! Computes descriptive-quality diagnostics for tabular datasets (row and
//! column counts, per-column type and missingness, correlation, category
//! frequency) and derives a bounded quality score so a caller can decide
//! whether a dataset is fit for modeling. A small HTTP service exposes
//! the same pipeline over CSV uploads.
//!
//! # Design Principles
//!
//! 1. **Snapshot-pure core** - every diagnostic is a pure function over
//!    an in-memory Arrow snapshot; no shared mutable state
//! 2. **One fixed heuristic pipeline** - thresholds are constants, not
//!    configuration
//! 3. **Thin boundaries** - CSV decoding, HTTP routing and start-up are
//!    wrappers around the core, never part of it
//!
//! # Quick Start
//!
//! ```no_run
//! use perfilar::{compute_quality_flags, missing_table, summarize, ArrowDataset};
//!
//! let dataset = ArrowDataset::from_csv("data/train.csv").unwrap();
//!
//! let summary = summarize(&dataset).unwrap();
//! let missing = missing_table(&dataset);
//! let flags = compute_quality_flags(&summary, &missing);
//!
//! println!("quality score: {:.3}", flags.quality_score);
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::float_cmp,
        clippy::too_many_lines
    )
)]
// Allow some pedantic lints for cleaner code
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]

pub mod categories;
pub mod correlation;
pub mod dataset;
pub mod error;
pub mod quality;
pub mod serve;

// Re-exports for convenience
// Re-export arrow types commonly needed
pub use arrow::{
    array::RecordBatch,
    datatypes::{Schema, SchemaRef},
};
pub use categories::{top_categories, CategoryCount, ColumnCategories, TopCategories};
pub use correlation::{correlation_matrix, CorrelationMatrix};
pub use dataset::{ArrowDataset, CsvOptions, Dataset, JsonOptions};
pub use error::{Error, Result};
pub use quality::{
    compute_quality_flags, missing_table, summarize, ColumnProfile, DatasetSummary, DtypeKind,
    MissingColumn, MissingTable, NumericSummary, QualityFlags,
};
pub use serve::{serve, AppState, ServeConfig};
