//! Pipeline configuration and the on-disk directory layout.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::{PipelineError, Result};

pub const DEFAULT_RAW_TEXT_PREFIX: &str = "RAW_TEXT_";
pub const DEFAULT_EXPORT_NAME: &str = "banking_test_cases";
pub const DEFAULT_AUDIT_NAME: &str = "generation_trace";

pub const ENV_BASE_DIR: &str = "CASEGEN_BASE_DIR";
pub const ENV_EXPORT_NAME: &str = "CASEGEN_EXPORT_NAME";
pub const ENV_RUN_DATE: &str = "CASEGEN_RUN_DATE";

/// Settings for one pipeline instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Root that every artifact directory hangs off.
    pub base_dir: PathBuf,
    /// File name prefix that marks raw text artifacts.
    pub raw_text_prefix: String,
    /// Purpose stem of the dated JSON/XLSX exports.
    pub export_name: String,
    /// Purpose stem of the dated audit log.
    pub audit_name: String,
    /// Pins the calendar date for dated names. `None` uses the local date.
    pub run_date: Option<NaiveDate>,
}

impl PipelineConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            raw_text_prefix: DEFAULT_RAW_TEXT_PREFIX.to_string(),
            export_name: DEFAULT_EXPORT_NAME.to_string(),
            audit_name: DEFAULT_AUDIT_NAME.to_string(),
            run_date: None,
        }
    }

    /// Build from `CASEGEN_*` environment variables, defaulting the base
    /// directory to the current directory.
    pub fn from_env() -> Result<Self> {
        let base_dir = std::env::var_os(ENV_BASE_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let mut config = Self::new(base_dir);

        if let Ok(name) = std::env::var(ENV_EXPORT_NAME) {
            config.export_name = name;
        }
        if let Ok(raw) = std::env::var(ENV_RUN_DATE) {
            config.run_date = Some(parse_run_date(&raw)?);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_run_date(mut self, date: NaiveDate) -> Self {
        self.run_date = Some(date);
        self
    }

    pub fn with_export_name(mut self, name: impl Into<String>) -> Self {
        self.export_name = name.into();
        self
    }

    /// Reject names that would escape their directory or produce empty stems.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("raw_text_prefix", &self.raw_text_prefix),
            ("export_name", &self.export_name),
            ("audit_name", &self.audit_name),
        ] {
            if value.trim().is_empty() {
                return Err(PipelineError::Config(format!("{field} must not be empty")));
            }
            if value.contains('/') || value.contains('\\') {
                return Err(PipelineError::Config(format!(
                    "{field} must not contain path separators: {value:?}"
                )));
            }
        }
        Ok(())
    }

    pub fn layout(&self) -> Layout {
        Layout::new(&self.base_dir)
    }

    /// The pinned run date, or today's local date.
    pub fn effective_date(&self) -> NaiveDate {
        self.run_date.unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// Parse an ISO `YYYY-MM-DD` run date.
pub fn parse_run_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| PipelineError::Config(format!("invalid run date {raw:?}: {e}")))
}

/// Fixed directory layout under the base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub inputs: PathBuf,
    pub raw_text: PathBuf,
    pub requirements: PathBuf,
    pub json_output: PathBuf,
    pub excel_output: PathBuf,
    pub audit: PathBuf,
    pub rejects: PathBuf,
}

impl Layout {
    pub fn new(base: &Path) -> Self {
        Self {
            inputs: base.join("inputs"),
            raw_text: base.join("extracted").join("raw_text"),
            requirements: base.join("requirements"),
            json_output: base.join("output").join("json"),
            excel_output: base.join("output").join("excel"),
            audit: base.join("output").join("audit"),
            rejects: base.join("validation"),
        }
    }

    /// Directories the pipeline creates before running. `inputs/` belongs to
    /// the extraction step and is left alone.
    pub fn managed_dirs(&self) -> [&Path; 6] {
        [
            self.raw_text.as_path(),
            self.requirements.as_path(),
            self.json_output.as_path(),
            self.excel_output.as_path(),
            self.audit.as_path(),
            self.rejects.as_path(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = Layout::new(Path::new("/srv/casegen"));
        assert_eq!(layout.raw_text, PathBuf::from("/srv/casegen/extracted/raw_text"));
        assert_eq!(layout.requirements, PathBuf::from("/srv/casegen/requirements"));
        assert_eq!(layout.json_output, PathBuf::from("/srv/casegen/output/json"));
        assert_eq!(layout.excel_output, PathBuf::from("/srv/casegen/output/excel"));
        assert_eq!(layout.audit, PathBuf::from("/srv/casegen/output/audit"));
        assert_eq!(layout.rejects, PathBuf::from("/srv/casegen/validation"));
        assert!(!layout.managed_dirs().contains(&layout.inputs.as_path()));
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::new("/tmp/x");
        assert_eq!(config.raw_text_prefix, "RAW_TEXT_");
        assert_eq!(config.export_name, "banking_test_cases");
        assert_eq!(config.audit_name, "generation_trace");
        assert!(config.run_date.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_separators_and_empty() {
        let config = PipelineConfig::new("/tmp/x").with_export_name("../escape");
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));

        let config = PipelineConfig::new("/tmp/x").with_export_name("  ");
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_parse_run_date() {
        let date = parse_run_date("2026-03-09").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 3, 9).unwrap());
        assert!(matches!(
            parse_run_date("09/03/2026"),
            Err(PipelineError::Config(_))
        ));
    }

    // The only test touching CASEGEN_* variables, so no cross-test races.
    #[test]
    fn test_from_env() {
        std::env::set_var(ENV_BASE_DIR, "/srv/casegen");
        std::env::set_var(ENV_EXPORT_NAME, "cards_test_cases");
        std::env::set_var(ENV_RUN_DATE, "2026-02-28");

        let config = PipelineConfig::from_env().unwrap();
        assert_eq!(config.base_dir, PathBuf::from("/srv/casegen"));
        assert_eq!(config.export_name, "cards_test_cases");
        assert_eq!(config.run_date, NaiveDate::from_ymd_opt(2026, 2, 28));

        std::env::set_var(ENV_RUN_DATE, "yesterday");
        assert!(matches!(
            PipelineConfig::from_env(),
            Err(PipelineError::Config(_))
        ));

        for var in [ENV_BASE_DIR, ENV_EXPORT_NAME, ENV_RUN_DATE] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_pinned_date_wins() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        let config = PipelineConfig::new("/tmp/x").with_run_date(date);
        assert_eq!(config.effective_date(), date);
    }
}
