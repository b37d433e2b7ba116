//! Records that flow between pipeline stages.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Raw text loaded from the latest extraction artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawText {
    /// File name the text was loaded from.
    pub source: String,
    pub content: String,
}

impl RawText {
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
        }
    }

    /// SHA-256 hex digest of the content.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.content.as_bytes()))
    }
}

/// A normalized, testable statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub id: String,
    pub text: String,
}

/// Kind of scenario a coverage item asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageIntent {
    HappyPath,
    Negative,
    Boundary,
}

impl CoverageIntent {
    pub fn label(&self) -> &'static str {
        match self {
            CoverageIntent::HappyPath => "Happy path",
            CoverageIntent::Negative => "Negative",
            CoverageIntent::Boundary => "Boundary",
        }
    }
}

impl fmt::Display for CoverageIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A concrete test intent traced to one requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageItem {
    pub id: String,
    pub requirement_id: String,
    pub intent: CoverageIntent,
    pub description: String,
}

/// A generated test case record.
///
/// Fields not known to this crate are kept in `extra` and exported as
/// additional columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub requirement_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_id: Option<String>,
    #[serde(default)]
    pub preconditions: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub expected_result: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl TestCase {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            requirement_id: String::new(),
            coverage_id: None,
            preconditions: Vec::new(),
            steps: Vec::new(),
            expected_result: String::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_requirement(mut self, requirement_id: impl Into<String>) -> Self {
        self.requirement_id = requirement_id.into();
        self
    }

    pub fn with_coverage(mut self, coverage_id: impl Into<String>) -> Self {
        self.coverage_id = Some(coverage_id.into());
        self
    }

    pub fn with_steps<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps = steps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_expected(mut self, expected_result: impl Into<String>) -> Self {
        self.expected_result = expected_result.into();
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extra.insert(name.into(), value);
        self
    }
}

/// A test case the validator refused, with its reason code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedCase {
    pub test_case: TestCase,
    pub reason: String,
}

/// Validator output: valid cases in generation order plus rejections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationOutcome {
    pub valid: Vec<TestCase>,
    pub rejected: Vec<RejectedCase>,
}
