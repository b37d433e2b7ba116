//! Stage collaborator interfaces.
//!
//! The orchestrator only knows these traits. Each returns `anyhow::Result` so
//! a backend can fail with whatever error it has; the orchestrator passes that
//! error through unchanged. The built-in implementations are deterministic and
//! rule based, so a run needs no generation backend.

pub mod coverage;
pub mod dedup;
pub mod generate;
pub mod normalize;
pub mod validate;

use crate::domain::{CoverageItem, RawText, Requirement, TestCase, ValidationOutcome};

pub use coverage::IntentExpander;
pub use dedup::TitleDeduplicator;
pub use generate::TemplateGenerator;
pub use normalize::KeywordNormalizer;
pub use validate::RuleValidator;

/// Turns raw text into an ordered sequence of requirements.
pub trait Normalizer {
    fn normalize(&self, raw: &RawText) -> anyhow::Result<Vec<Requirement>>;
}

/// Expands requirements into concrete test intents.
pub trait CoverageExpander {
    fn expand(&self, requirements: &[Requirement]) -> anyhow::Result<Vec<CoverageItem>>;
}

/// Produces raw, unvalidated test cases from coverage items.
pub trait Generator {
    fn generate(&self, items: &[CoverageItem]) -> anyhow::Result<Vec<TestCase>>;
}

/// Partitions generated cases into valid and rejected.
pub trait Validator {
    fn validate(&self, cases: &[TestCase]) -> anyhow::Result<ValidationOutcome>;
}

/// Removes equivalent cases, keeping generation order.
pub trait Deduplicator {
    fn deduplicate(&self, cases: &[TestCase]) -> anyhow::Result<Vec<TestCase>>;
}

/// The full set of collaborators a pipeline calls, in stage order.
pub struct Collaborators {
    pub normalizer: Box<dyn Normalizer>,
    pub expander: Box<dyn CoverageExpander>,
    pub generator: Box<dyn Generator>,
    pub validator: Box<dyn Validator>,
    pub deduplicator: Box<dyn Deduplicator>,
}

impl Collaborators {
    /// Deterministic rule-based collaborators.
    pub fn builtin() -> Self {
        Self {
            normalizer: Box::new(KeywordNormalizer::new()),
            expander: Box::new(IntentExpander::new()),
            generator: Box::new(TemplateGenerator),
            validator: Box::new(RuleValidator),
            deduplicator: Box::new(TitleDeduplicator),
        }
    }

    pub fn with_normalizer(mut self, normalizer: impl Normalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    pub fn with_expander(mut self, expander: impl CoverageExpander + 'static) -> Self {
        self.expander = Box::new(expander);
        self
    }

    pub fn with_generator(mut self, generator: impl Generator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    pub fn with_deduplicator(mut self, deduplicator: impl Deduplicator + 'static) -> Self {
        self.deduplicator = Box::new(deduplicator);
        self
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::builtin()
    }
}
