use crate::core::lookup::LookupSource;
use crate::core::preference::DEFAULT_TTL_DAYS;
use crate::core::ConfigProvider;
use crate::utils::error::{Result, SurveyError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub preference: PreferenceConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_title")]
    pub title: String,
    /// 頁面所在位置，查詢資源以此為基準解析
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceConfig {
    #[serde(default = "default_preference_name")]
    pub name: String,
    #[serde(default = "default_ttl_days")]
    pub ttl_days: u32,
    #[serde(default = "default_preference_path")]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default = "default_resource")]
    pub resource: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub verbose: bool,
}

fn default_title() -> String {
    "SWE642 Survey".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8080/".to_string()
}

fn default_preference_name() -> String {
    "swe642_user".to_string()
}

fn default_ttl_days() -> u32 {
    DEFAULT_TTL_DAYS
}

fn default_preference_path() -> String {
    "./.campus-survey/preferences.json".to_string()
}

fn default_resource() -> String {
    "zipcodes.json".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            base_url: default_base_url(),
        }
    }
}

impl Default for PreferenceConfig {
    fn default() -> Self {
        Self {
            name: default_preference_name(),
            ttl_days: default_ttl_days(),
            path: default_preference_path(),
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            resource: default_resource(),
        }
    }
}

impl SurveyConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SurveyError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 檔案不存在時使用預設值
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "Config file {} not found, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SurveyError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SURVEY_BASE_URL})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn lookup_source(&self) -> Result<LookupSource> {
        LookupSource::resolve(&self.site.base_url, &self.lookup.resource)
    }
}

impl ConfigProvider for SurveyConfig {
    fn site_title(&self) -> &str {
        &self.site.title
    }

    fn preference_name(&self) -> &str {
        &self.preference.name
    }

    fn preference_ttl_days(&self) -> u32 {
        self.preference.ttl_days
    }
}

impl Validate for SurveyConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("site.title", &self.site.title)?;
        validation::validate_url("site.base_url", &self.site.base_url)?;
        validation::validate_non_empty_string("preference.name", &self.preference.name)?;
        validation::validate_range("preference.ttl_days", self.preference.ttl_days, 1, 3650)?;
        validation::validate_path("preference.path", &self.preference.path)?;
        validation::validate_required_field("lookup.resource", &self.lookup.resource)?;

        // 確認資源可以相對於頁面解析
        self.lookup_source()?;
        Ok(())
    }
}
