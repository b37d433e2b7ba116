use serde_json::json;

use super::Generator;
use crate::domain::{CoverageIntent, CoverageItem, TestCase};

/// Renders one test case per coverage item from fixed templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    fn render(seq: usize, item: &CoverageItem) -> TestCase {
        let statement = item.description.trim_end_matches(['.', ' ']);
        let (steps, expected, priority) = match item.intent {
            CoverageIntent::HappyPath => (
                vec![
                    format!("Prepare valid data and access needed for: {statement}"),
                    "Perform the action with valid inputs".to_string(),
                    "Observe the system response".to_string(),
                ],
                format!("The system behaves as required: {statement}"),
                "High",
            ),
            CoverageIntent::Negative => (
                vec![
                    format!("Prepare invalid, missing or unauthorized input for: {statement}"),
                    "Attempt the action".to_string(),
                    "Observe the system response".to_string(),
                ],
                "The attempt is rejected with a clear error and no state change".to_string(),
                "Medium",
            ),
            CoverageIntent::Boundary => (
                vec![
                    format!("Identify the limits stated in: {statement}"),
                    "Exercise values at, just below and just above each limit".to_string(),
                    "Observe the system response for each value".to_string(),
                ],
                "Values within the limit are accepted and values beyond it are rejected"
                    .to_string(),
                "Medium",
            ),
        };

        let mut case = TestCase::new(
            format!("TC-{seq:04}"),
            format!("{} - {}", item.intent.label(), statement),
        )
        .with_requirement(item.requirement_id.clone())
        .with_coverage(item.id.clone())
        .with_steps(steps)
        .with_expected(expected)
        .with_field("intent", json!(item.intent))
        .with_field("priority", json!(priority));
        case.preconditions = vec!["System under test is reachable".to_string()];
        case
    }
}

impl Generator for TemplateGenerator {
    fn generate(&self, items: &[CoverageItem]) -> anyhow::Result<Vec<TestCase>> {
        Ok(items
            .iter()
            .enumerate()
            .map(|(idx, item)| Self::render(idx + 1, item))
            .collect())
    }
}
