use std::sync::LazyLock;

use regex::Regex;

use super::CoverageExpander;
use crate::domain::{CoverageIntent, CoverageItem, Requirement};

static LIMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:\d+|maximum|minimum|max|min|at least|at most|limit|limits|up to|exceed|exceeds|within)\b",
    )
    .expect("valid regex")
});

/// Expands every requirement into a happy-path and a negative intent, plus a
/// boundary intent when the statement mentions a number or a limit.
///
/// Ids are `COV-<requirement position>-<intent position>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentExpander;

impl IntentExpander {
    pub fn new() -> Self {
        Self
    }

    fn intents_for(requirement: &Requirement) -> Vec<CoverageIntent> {
        let mut intents = vec![CoverageIntent::HappyPath, CoverageIntent::Negative];
        if LIMIT.is_match(&requirement.text) {
            intents.push(CoverageIntent::Boundary);
        }
        intents
    }
}

impl CoverageExpander for IntentExpander {
    fn expand(&self, requirements: &[Requirement]) -> anyhow::Result<Vec<CoverageItem>> {
        let mut items = Vec::new();
        for (req_idx, requirement) in requirements.iter().enumerate() {
            for (intent_idx, intent) in Self::intents_for(requirement).into_iter().enumerate() {
                items.push(CoverageItem {
                    id: format!("COV-{:03}-{:02}", req_idx + 1, intent_idx + 1),
                    requirement_id: requirement.id.clone(),
                    intent,
                    description: requirement.text.clone(),
                });
            }
        }
        Ok(items)
    }
}
