use crate::core::ConfigProvider;
use crate::utils::error::{Result, TallyError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "http://eu.battle.net/api/wow/character/";
pub const DEFAULT_DROP_RATE: f64 = 0.01;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub default_realm: Option<String>,
    pub locale: Option<String>,
    pub api_key: Option<String>,
    pub concurrent_requests: Option<usize>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    #[serde(default = "default_drop_rate")]
    pub drop_rate: f64,
    #[serde(default = "default_true")]
    pub include_total: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_drop_rate() -> f64 {
    DEFAULT_DROP_RATE
}

fn default_true() -> bool {
    true
}

fn default_output_path() -> String {
    ".".to_string()
}

fn default_formats() -> Vec<String> {
    vec!["txt".to_string()]
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_realm: None,
            locale: None,
            api_key: None,
            concurrent_requests: None,
            timeout_seconds: None,
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            drop_rate: DEFAULT_DROP_RATE,
            include_total: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            formats: default_formats(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TallyError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 檔案不存在時使用預設值
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().exists() {
            tracing::debug!(
                "Config file {} not found, using defaults",
                path.as_ref().display()
            );
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TallyError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WOW_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TallyError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_url("lookup.base_url", &self.lookup.base_url)?;

        if let Some(realm) = &self.lookup.default_realm {
            crate::utils::validation::validate_realm(realm)?;
        }

        if let Some(concurrent) = self.lookup.concurrent_requests {
            crate::utils::validation::validate_positive_number(
                "lookup.concurrent_requests",
                concurrent,
                1,
            )?;
        }

        crate::utils::validation::validate_range("stats.drop_rate", self.stats.drop_rate, 0.0, 1.0)?;
        crate::utils::validation::validate_path("output.path", &self.output.path)?;

        let valid_formats = ["txt", "csv"];
        for format in &self.output.formats {
            if !valid_formats.contains(&format.as_str()) {
                return Err(TallyError::InvalidConfigValueError {
                    field: "output.formats".to_string(),
                    value: format.clone(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        valid_formats.join(", ")
                    ),
                });
            }
        }

        Ok(())
    }

    pub fn output_path(&self) -> &str {
        &self.output.path
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        &self.lookup.base_url
    }

    fn locale(&self) -> Option<&str> {
        self.lookup.locale.as_deref()
    }

    fn api_key(&self) -> Option<&str> {
        // 未替換的 ${VAR} 視為未設定
        self.lookup
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty() && !key.starts_with("${"))
    }

    fn default_realm(&self) -> Option<&str> {
        self.lookup.default_realm.as_deref()
    }

    fn concurrent_requests(&self) -> usize {
        self.lookup.concurrent_requests.unwrap_or(5)
    }

    fn request_timeout_secs(&self) -> u64 {
        self.lookup.timeout_seconds.unwrap_or(30)
    }

    fn drop_rate(&self) -> f64 {
        self.stats.drop_rate
    }

    fn include_total(&self) -> bool {
        self.stats.include_total
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
