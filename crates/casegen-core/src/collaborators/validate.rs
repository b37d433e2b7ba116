use std::collections::HashSet;

use super::Validator;
use crate::domain::{RejectedCase, TestCase, ValidationOutcome};

pub const MISSING_TITLE: &str = "missing_title";
pub const MISSING_STEPS: &str = "missing_steps";
pub const MISSING_EXPECTED_RESULT: &str = "missing_expected_result";
pub const MISSING_TRACEABILITY: &str = "missing_traceability";
pub const DUPLICATE_ID: &str = "duplicate_id";

/// Structural checks on generated cases. The first failing rule is the
/// rejection reason. An id already taken by an earlier valid case is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleValidator;

impl RuleValidator {
    fn check(case: &TestCase) -> Option<&'static str> {
        if case.title.trim().is_empty() {
            return Some(MISSING_TITLE);
        }
        if case.steps.iter().all(|s| s.trim().is_empty()) {
            return Some(MISSING_STEPS);
        }
        if case.expected_result.trim().is_empty() {
            return Some(MISSING_EXPECTED_RESULT);
        }
        if case.requirement_id.trim().is_empty() {
            return Some(MISSING_TRACEABILITY);
        }
        None
    }
}

impl Validator for RuleValidator {
    fn validate(&self, cases: &[TestCase]) -> anyhow::Result<ValidationOutcome> {
        let mut outcome = ValidationOutcome::default();
        let mut ids = HashSet::new();

        for case in cases {
            let reason = Self::check(case)
                .or_else(|| (!ids.insert(case.id.as_str())).then_some(DUPLICATE_ID));
            match reason {
                Some(reason) => outcome.rejected.push(RejectedCase {
                    test_case: case.clone(),
                    reason: reason.to_string(),
                }),
                None => outcome.valid.push(case.clone()),
            }
        }

        Ok(outcome)
    }
}
