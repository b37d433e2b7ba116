//! Stage orchestration.
//!
//! A run walks a fixed, linear sequence of stages:
//!
//! ```text
//! Idle -> LayoutReady -> RawLoaded -> Normalized -> Expanded -> Generated
//!      -> Validated -> Deduplicated -> Exported -> Done
//! ```
//!
//! Any error moves the pipeline to `Aborted` and is returned to the caller.
//! There is no retry and no resumption; every run starts again from `Idle`
//! and re-derives all artifacts from the latest raw text.
//!
//! An empty normalization result is fatal. An empty coverage expansion and
//! any number of validator rejections, including all of them, are not: the
//! run continues and may export an empty set.

use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

use tracing::debug;
use uuid::Uuid;

use crate::audit::AuditLogger;
use crate::collaborators::Collaborators;
use crate::config::PipelineConfig;
use crate::domain::ValidationOutcome;
use crate::error::{PipelineError, Result};
use crate::export::render_spreadsheet;
use crate::obs::{
    emit_run_aborted, emit_run_finished, emit_run_started, emit_stage_completed, RunSpan,
};
use crate::store::{dated_name, ArtifactStore};

/// Snapshot of the normalized requirements, overwritten each run.
pub const REQUIREMENTS_FILE: &str = "normalized_requirements.json";

/// Rejected test cases with reasons, written only when there are any.
pub const REJECT_LOG_FILE: &str = "reject_log.json";

/// Where a pipeline is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Idle,
    LayoutReady,
    RawLoaded,
    Normalized,
    Expanded,
    Generated,
    Validated,
    Deduplicated,
    Exported,
    Done,
    Aborted,
}

impl PipelineState {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::LayoutReady => "layout_ready",
            PipelineState::RawLoaded => "raw_loaded",
            PipelineState::Normalized => "normalized",
            PipelineState::Expanded => "expanded",
            PipelineState::Generated => "generated",
            PipelineState::Validated => "validated",
            PipelineState::Deduplicated => "deduplicated",
            PipelineState::Exported => "exported",
            PipelineState::Done => "done",
            PipelineState::Aborted => "aborted",
        }
    }

    /// The only successor on the success path. Terminal states have none.
    pub fn next(&self) -> Option<PipelineState> {
        match self {
            PipelineState::Idle => Some(PipelineState::LayoutReady),
            PipelineState::LayoutReady => Some(PipelineState::RawLoaded),
            PipelineState::RawLoaded => Some(PipelineState::Normalized),
            PipelineState::Normalized => Some(PipelineState::Expanded),
            PipelineState::Expanded => Some(PipelineState::Generated),
            PipelineState::Generated => Some(PipelineState::Validated),
            PipelineState::Validated => Some(PipelineState::Deduplicated),
            PipelineState::Deduplicated => Some(PipelineState::Exported),
            PipelineState::Exported => Some(PipelineState::Done),
            PipelineState::Done | PipelineState::Aborted => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: String,
    /// File name of the raw text artifact that was processed.
    pub raw_source: String,
    /// SHA-256 hex digest of the raw text.
    pub input_digest: String,
    pub requirements: usize,
    pub coverage_items: usize,
    pub generated: usize,
    pub valid: usize,
    pub rejected: usize,
    pub final_count: usize,
    pub requirements_path: PathBuf,
    pub reject_log_path: Option<PathBuf>,
    pub json_path: PathBuf,
    pub spreadsheet_path: PathBuf,
    pub duration_ms: u64,
}

/// Drives the collaborators in order and persists every stage artifact.
pub struct Pipeline {
    config: PipelineConfig,
    store: ArtifactStore,
    audit: AuditLogger,
    collaborators: Collaborators,
    state: PipelineState,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, collaborators: Collaborators) -> Result<Self> {
        config.validate()?;
        let layout = config.layout();
        let audit =
            AuditLogger::new(&layout.audit, config.audit_name.clone()).pinned(config.run_date);
        let store = ArtifactStore::new(layout, config.raw_text_prefix.clone());
        Ok(Self {
            config,
            store,
            audit,
            collaborators,
            state: PipelineState::Idle,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Execute one full run.
    pub fn run(&mut self) -> Result<RunReport> {
        self.state = PipelineState::Idle;
        let run_id = Uuid::new_v4().to_string();
        let _span = RunSpan::enter(&run_id);
        emit_run_started(&run_id, &self.config.base_dir);

        let start = Instant::now();
        match self.execute(&run_id, start) {
            Ok(report) => {
                emit_run_finished(&run_id, report.duration_ms, report.final_count);
                Ok(report)
            }
            Err(err) => {
                emit_run_aborted(&run_id, self.state, &err);
                self.state = PipelineState::Aborted;
                Err(err)
            }
        }
    }

    fn advance(&mut self, next: PipelineState, count: usize) {
        debug_assert_eq!(self.state.next(), Some(next), "out-of-order transition");
        debug!(from = %self.state, to = %next, "state transition");
        self.state = next;
        emit_stage_completed(next, count);
    }

    fn execute(&mut self, run_id: &str, start: Instant) -> Result<RunReport> {
        let layout = self.store.layout().clone();

        self.store.ensure_layout()?;
        self.advance(PipelineState::LayoutReady, 0);
        self.audit.record("Pipeline started")?;

        let raw = self.store.find_latest_raw_text()?;
        self.advance(PipelineState::RawLoaded, 1);
        self.audit.record(&format!("Loaded raw input: {}", raw.source))?;

        let requirements = self
            .collaborators
            .normalizer
            .normalize(&raw)
            .map_err(PipelineError::Collaborator)?;
        if requirements.is_empty() {
            return Err(PipelineError::EmptyResult {
                artifact: raw.source.clone(),
            });
        }
        let requirements_path =
            self.store.write_json(&layout.requirements, REQUIREMENTS_FILE, &requirements)?;
        self.advance(PipelineState::Normalized, requirements.len());
        self.audit.record(&format!("Normalized {} requirements", requirements.len()))?;

        let coverage = self
            .collaborators
            .expander
            .expand(&requirements)
            .map_err(PipelineError::Collaborator)?;
        self.advance(PipelineState::Expanded, coverage.len());
        self.audit.record(&format!("Expanded to {} coverage intents", coverage.len()))?;

        let generated = self
            .collaborators
            .generator
            .generate(&coverage)
            .map_err(PipelineError::Collaborator)?;
        self.advance(PipelineState::Generated, generated.len());
        self.audit.record(&format!("Generated {} raw test cases", generated.len()))?;

        let ValidationOutcome { valid, rejected } = self
            .collaborators
            .validator
            .validate(&generated)
            .map_err(PipelineError::Collaborator)?;
        let reject_log_path = if rejected.is_empty() {
            None
        } else {
            let path = self.store.write_json(&layout.rejects, REJECT_LOG_FILE, &rejected)?;
            self.audit.record(&format!("Rejected {} invalid test cases", rejected.len()))?;
            Some(path)
        };
        self.advance(PipelineState::Validated, valid.len());

        let final_cases = self
            .collaborators
            .deduplicator
            .deduplicate(&valid)
            .map_err(PipelineError::Collaborator)?;
        self.advance(PipelineState::Deduplicated, final_cases.len());
        self.audit.record(&format!(
            "Final test case count after de-duplication: {}",
            final_cases.len()
        ))?;

        // Both exports are rendered before either is written.
        let date = self.config.effective_date();
        let json_name = dated_name(&self.config.export_name, date, "json");
        let xlsx_name = dated_name(&self.config.export_name, date, "xlsx");
        let workbook =
            render_spreadsheet(&final_cases, date, &layout.excel_output.join(&xlsx_name))?;

        let json_path = self.store.write_json(&layout.json_output, &json_name, &final_cases)?;
        self.audit.record(&format!("Exported JSON: {}", json_path.display()))?;

        let spreadsheet_path =
            self.store.write_artifact(&layout.excel_output, &xlsx_name, &workbook)?;
        self.audit.record(&format!("Exported Excel: {}", spreadsheet_path.display()))?;
        self.advance(PipelineState::Exported, final_cases.len());

        self.audit.record("Pipeline completed successfully")?;
        self.advance(PipelineState::Done, final_cases.len());

        Ok(RunReport {
            run_id: run_id.to_string(),
            input_digest: raw.digest(),
            raw_source: raw.source,
            requirements: requirements.len(),
            coverage_items: coverage.len(),
            generated: generated.len(),
            valid: valid.len(),
            rejected: rejected.len(),
            final_count: final_cases.len(),
            requirements_path,
            reject_log_path,
            json_path,
            spreadsheet_path,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}
