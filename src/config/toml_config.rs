use crate::core::aggregate::TotalMarksPolicy;
use crate::core::schema::UnknownColumns;
use crate::core::ScoringProvider;
use crate::utils::error::{PortalError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    GoogleSheets,
    Csv,
}

/// Data source settings, credentials included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub r#type: SourceKind,
    pub spreadsheet_id: Option<String>,
    /// 未設定時讀取第一個工作表
    pub sheet_name: Option<String>,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub api_base: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub path: Option<String>,
}

impl SourceConfig {
    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_SHEETS_API_BASE)
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn api_key(&self) -> Option<&str> {
        resolved(&self.api_key)
    }

    pub fn access_token(&self) -> Option<&str> {
        resolved(&self.access_token)
    }

    pub fn sheet_name(&self) -> Option<&str> {
        resolved(&self.sheet_name)
    }
}

/// 空字串或未替換的 `${VAR}` 視為未設定
fn resolved(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.contains("${"))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalMarksMode {
    #[default]
    PerSubject,
    Fixed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub total_marks_policy: TotalMarksMode,
    pub marks_per_subject: Option<u32>,
    pub fixed_total_marks: Option<u32>,
    #[serde(default)]
    pub unknown_columns: UnknownColumns,
}

impl ScoringProvider for ScoringConfig {
    fn total_marks_policy(&self) -> TotalMarksPolicy {
        match self.total_marks_policy {
            TotalMarksMode::PerSubject => TotalMarksPolicy::PerSubject {
                marks_per_subject: self.marks_per_subject.unwrap_or(100),
            },
            TotalMarksMode::Fixed => TotalMarksPolicy::Fixed {
                total_marks: self.fixed_total_marks.unwrap_or(100),
            },
        }
    }

    fn unknown_columns(&self) -> UnknownColumns {
        self.unknown_columns
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn json(&self) -> bool {
        self.json.unwrap_or(false)
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PortalError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PortalError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GOOGLE_API_KEY})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PortalError::ConfigError {
            message: format!("Invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn validate_source(&self) -> Result<()> {
        let source = &self.source;
        match source.r#type {
            SourceKind::GoogleSheets => {
                let id = validation::validate_required_field(
                    "source.spreadsheet_id",
                    &source.spreadsheet_id,
                )?;
                validation::validate_non_empty_string("source.spreadsheet_id", id)?;
                if id.contains("${") {
                    return Err(PortalError::InvalidConfigValueError {
                        field: "source.spreadsheet_id".to_string(),
                        value: id.clone(),
                        reason: "Environment variable is not set".to_string(),
                    });
                }

                validation::validate_url("source.api_base", source.api_base())?;
                validation::validate_positive_number(
                    "source.timeout_seconds",
                    source.timeout_seconds(),
                    1,
                )?;

                if source.api_key().is_none() && source.access_token().is_none() {
                    return Err(PortalError::MissingConfigError {
                        field: "source.api_key or source.access_token".to_string(),
                    });
                }
            }
            SourceKind::Csv => {
                let path = validation::validate_required_field("source.path", &source.path)?;
                validation::validate_path("source.path", path)?;
            }
        }
        Ok(())
    }

    fn validate_scoring(&self) -> Result<()> {
        if let Some(marks) = self.scoring.marks_per_subject {
            validation::validate_positive_number("scoring.marks_per_subject", marks.into(), 1)?;
        }
        if let Some(total) = self.scoring.fixed_total_marks {
            validation::validate_positive_number("scoring.fixed_total_marks", total.into(), 1)?;
        }
        Ok(())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_socket_addr("server.bind_address", &self.server.bind_address)?;
        self.validate_source()?;
        self.validate_scoring()?;

        let level = self.logging.level();
        if !LOG_LEVELS.contains(&level) {
            return Err(PortalError::InvalidConfigValueError {
                field: "logging.level".to_string(),
                value: level.to_string(),
                reason: format!("Valid levels: {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
