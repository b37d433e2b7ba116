//! casegen core library
//!
//! Orchestrates the batch pipeline that turns extracted requirement text into
//! validated, de-duplicated test cases:
//! - Artifact store over a fixed, date-stamped directory layout
//! - Append-only daily audit trail
//! - Pluggable stage collaborators with deterministic built-ins
//! - JSON and XLSX exports

pub mod audit;
pub mod collaborators;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod obs;
pub mod pipeline;
pub mod store;
pub mod telemetry;

pub use audit::AuditLogger;
pub use collaborators::{
    Collaborators, CoverageExpander, Deduplicator, Generator, IntentExpander, KeywordNormalizer,
    Normalizer, RuleValidator, TemplateGenerator, TitleDeduplicator, Validator,
};
pub use config::{parse_run_date, Layout, PipelineConfig};
pub use domain::{
    CoverageIntent, CoverageItem, RawText, RejectedCase, Requirement, TestCase, ValidationOutcome,
};
pub use error::{PipelineError, Result};
pub use export::{cell_text, columns, render_spreadsheet, to_records, MAX_CELL_CHARS};
pub use pipeline::{Pipeline, PipelineState, RunReport, REJECT_LOG_FILE, REQUIREMENTS_FILE};
pub use store::{dated_name, raw_text_name, ArtifactStore};
pub use telemetry::init_tracing;

/// casegen version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
