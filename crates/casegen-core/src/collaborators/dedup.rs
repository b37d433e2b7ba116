use std::collections::HashSet;

use super::Deduplicator;
use crate::domain::TestCase;

/// Two cases are duplicates when their titles match ignoring case and runs
/// of whitespace. The first occurrence wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleDeduplicator;

impl TitleDeduplicator {
    pub fn key(title: &str) -> String {
        title
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

impl Deduplicator for TitleDeduplicator {
    fn deduplicate(&self, cases: &[TestCase]) -> anyhow::Result<Vec<TestCase>> {
        let mut seen = HashSet::new();
        Ok(cases
            .iter()
            .filter(|case| seen.insert(Self::key(&case.title)))
            .cloned()
            .collect())
    }
}
