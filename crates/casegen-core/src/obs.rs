//! Structured tracing hooks for the run lifecycle.
//!
//! These are diagnostic events only. The durable, human-readable trail is the
//! [`AuditLogger`](crate::audit::AuditLogger).

use tracing::{info, warn};

use crate::pipeline::PipelineState;

/// RAII guard that keeps a run-scoped span entered.
pub struct RunSpan {
    _span: tracing::span::EnteredSpan,
}

impl RunSpan {
    pub fn enter(run_id: &str) -> Self {
        let span = tracing::info_span!("casegen.run", run_id = %run_id);
        Self {
            _span: span.entered(),
        }
    }
}

pub fn emit_run_started(run_id: &str, base_dir: &std::path::Path) {
    info!(event = "run.started", run_id = %run_id, base_dir = %base_dir.display());
}

/// A stage finished and the pipeline moved to `state`.
pub fn emit_stage_completed(state: PipelineState, count: usize) {
    info!(event = "stage.completed", state = %state, count = count);
}

pub fn emit_run_finished(run_id: &str, duration_ms: u64, final_count: usize) {
    info!(
        event = "run.finished",
        run_id = %run_id,
        duration_ms = duration_ms,
        final_count = final_count,
    );
}

/// The run aborted while in `state`.
pub fn emit_run_aborted(run_id: &str, state: PipelineState, error: &dyn std::error::Error) {
    warn!(
        event = "run.aborted",
        run_id = %run_id,
        state = %state,
        error = %error,
        cause = ?error.source().map(|s| s.to_string()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_span_create() {
        let _span = RunSpan::enter("test-run-id");
        emit_stage_completed(PipelineState::Normalized, 3);
    }
}
