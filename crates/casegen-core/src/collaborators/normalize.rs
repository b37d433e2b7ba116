//! Keyword-driven requirement extraction.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::Normalizer;
use crate::domain::{RawText, Requirement};

// Patterns are literals; compilation cannot fail.
static BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*\x{2022}]|\(?\d+[.)]|\(?[a-zA-Z][.)])\s+").expect("valid regex")
});
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("valid regex"));
static MODAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:must|shall|should|required|requires|will|able to|cannot|can not|may not|needs? to)\b",
    )
    .expect("valid regex")
});

/// Keeps sentences that read like requirements.
///
/// Input is split into lines, list markers are stripped, lines are split into
/// sentences, and a sentence is kept when it contains a requirement modal
/// ("must", "shall", "should", ...). Whitespace is collapsed and exact repeats
/// (ignoring case) are dropped. Ids are `REQ-001`, `REQ-002`, ...
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordNormalizer;

impl KeywordNormalizer {
    pub fn new() -> Self {
        Self
    }

    fn statements(text: &str) -> impl Iterator<Item = String> + '_ {
        text.lines()
            .map(|line| BULLET.replace(line, "").into_owned())
            .flat_map(|line| {
                SENTENCE_END
                    .split(&line)
                    .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
                    .collect::<Vec<_>>()
            })
            .filter(|s| !s.is_empty())
    }
}

impl Normalizer for KeywordNormalizer {
    fn normalize(&self, raw: &RawText) -> anyhow::Result<Vec<Requirement>> {
        let mut seen = HashSet::new();
        let mut requirements = Vec::new();

        for statement in Self::statements(&raw.content) {
            if !MODAL.is_match(&statement) {
                continue;
            }
            if !seen.insert(statement.to_lowercase()) {
                continue;
            }
            requirements.push(Requirement {
                id: format!("REQ-{:03}", requirements.len() + 1),
                text: statement,
            });
        }

        Ok(requirements)
    }
}
