use crate::core::report::DEFAULT_SELLER_QUESTIONS;
use crate::core::ConfigProvider;
use crate::domain::{FilterConfig, ReferenceTable};
use crate::utils::error::{Result, ScoutError};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_url, Validate,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://www.facebook.com";
pub const SUPPORTED_FORMATS: [&str; 2] = ["json", "csv"];

lazy_static! {
    static ref ENV_VAR_REGEX: Regex = Regex::new(r"\$\{([^}]+)\}").expect("env pattern is valid");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutConfig {
    /// Models to search for, in processing order. Names must match the
    /// reference table exactly for listings to be valued.
    #[serde(default)]
    pub models: Vec<String>,
    pub scan: Option<ScanInfo>,
    pub source: SourceConfig,
    #[serde(default)]
    pub filters: FilterConfig,
    pub reference: Option<ReferenceConfig>,
    pub load: LoadConfig,
    pub report: Option<ReportConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub snapshot_path: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// Start from the bundled price table. Defaults to true.
    pub use_builtin: Option<bool>,
    /// model -> year -> price; replaces bundled prices for the same pair.
    pub models: Option<HashMap<String, HashMap<String, u32>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    pub seller_questions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_output_formats() -> Vec<String> {
    vec!["json".to_string()]
}

impl ScoutConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ScoutError::ConfigParseError {
            field: "toml_parsing".to_string(),
            message: e.to_string(),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are left
    /// as written so validation can point at them.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_REGEX
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.models.is_empty() {
            return Err(ScoutError::MissingConfigError {
                field: "models".to_string(),
            });
        }
        for model in &self.models {
            validate_non_empty_string("models", model)?;
        }

        validate_path("source.snapshot_path", &self.source.snapshot_path)?;
        validate_url("source.base_url", &self.source.base_url)?;
        self.filters.validate()?;
        validate_path("load.output_path", &self.load.output_path)?;

        for format in &self.load.output_formats {
            if !SUPPORTED_FORMATS.contains(&format.as_str()) {
                return Err(ScoutError::InvalidConfigValueError {
                    field: "load.output_formats".to_string(),
                    value: format.clone(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        SUPPORTED_FORMATS.join(", ")
                    ),
                });
            }
        }

        if let Some(compression) = self.load.compression.as_ref().filter(|c| c.enabled) {
            validate_non_empty_string("load.compression.filename", &compression.filename)?;
        }

        let table = self.reference_table()?;
        if table.is_empty() {
            return Err(ScoutError::ConfigError {
                message: "reference table is empty; enable use_builtin or add [reference.models]"
                    .to_string(),
            });
        }
        for model in &self.models {
            if !table.contains_model(model) {
                tracing::warn!(
                    "⚠️ Model '{}' has no reference prices; its listings cannot be valued",
                    model
                );
            }
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn scan_name(&self) -> &str {
        self.scan.as_ref().map(|s| s.name.as_str()).unwrap_or("deal-scout")
    }

    pub fn seller_questions(&self) -> Vec<String> {
        self.report
            .as_ref()
            .and_then(|r| r.seller_questions.clone())
            .unwrap_or_else(|| DEFAULT_SELLER_QUESTIONS.iter().map(|q| q.to_string()).collect())
    }

    fn build_reference_table(&self) -> Result<ReferenceTable> {
        let reference = self.reference.clone().unwrap_or_default();
        let mut table = if reference.use_builtin.unwrap_or(true) {
            ReferenceTable::builtin()
        } else {
            ReferenceTable::new()
        };

        for (model, years) in reference.models.unwrap_or_default() {
            for (year, price) in years {
                let parsed: i32 = year.trim().parse().map_err(|_| {
                    ScoutError::InvalidConfigValueError {
                        field: format!("reference.models.\"{}\"", model),
                        value: year.clone(),
                        reason: "Year keys must be whole numbers".to_string(),
                    }
                })?;
                table.insert(model.clone(), parsed, price);
            }
        }

        Ok(table)
    }
}

impl ConfigProvider for ScoutConfig {
    fn snapshot_path(&self) -> &str {
        &self.source.snapshot_path
    }

    fn base_url(&self) -> &str {
        &self.source.base_url
    }

    fn target_models(&self) -> &[String] {
        &self.models
    }

    fn filters(&self) -> &FilterConfig {
        &self.filters
    }

    fn reference_table(&self) -> Result<ReferenceTable> {
        self.build_reference_table()
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn archive_name(&self) -> Option<&str> {
        self.load
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_str())
    }
}

impl Validate for ScoutConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
