use crate::adapters::http::DEFAULT_TIMEOUT_SECONDS;
use crate::domain::model::{ExtraAliases, Platform};
use crate::domain::ports::{default_output_filename, ConfigProvider};
use crate::utils::error::{EtlError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    pub normalize: Option<NormalizeConfig>,
    pub load: LoadConfig,
    pub publish: Option<PublishConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: String,
    pub platform: Platform,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizeConfig {
    #[serde(default)]
    pub extra_aliases: ExtraAliases,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
    pub filenames: Option<FilenameConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilenameConfig {
    pub json: Option<String>,
    pub jsonl: Option<String>,
    pub csv: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    #[serde(default)]
    pub endpoints: Vec<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${EXPORT_DIR})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validation::validate_path("source.path", &self.source.path)?;
        validation::validate_file_extension("source.path", &self.source.path, &["csv"])?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_output_formats("load.output_formats", &self.load.output_formats)?;

        if let Some(compression) = self.load.compression.as_ref().filter(|c| c.enabled) {
            validation::validate_file_extension(
                "load.compression.filename",
                &compression.filename,
                &["zip"],
            )?;
        }

        if let Some(normalize) = &self.normalize {
            for (field, aliases) in &normalize.extra_aliases {
                for alias in aliases {
                    validation::validate_non_empty_string(
                        &format!("normalize.extra_aliases.{:?}", field).to_lowercase(),
                        alias,
                    )?;
                }
            }
        }

        if let Some(publish) = &self.publish {
            for endpoint in &publish.endpoints {
                validation::validate_url("publish.endpoints", endpoint)?;
            }
            if let Some(timeout) = publish.timeout_seconds {
                validation::validate_positive_number("publish.timeout_seconds", timeout, 1)?;
            }
        }

        Ok(())
    }

    pub fn publish_endpoints(&self) -> &[String] {
        self.publish
            .as_ref()
            .map(|p| p.endpoints.as_slice())
            .unwrap_or_default()
    }

    pub fn publish_timeout(&self) -> u64 {
        self.publish
            .as_ref()
            .and_then(|p| p.timeout_seconds)
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }

    pub fn log_format(&self) -> LogFormat {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .map(LogFormat::from_name)
            .unwrap_or_default()
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.source.path
    }

    fn platform(&self) -> Platform {
        self.source.platform
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn compression_filename(&self) -> Option<&str> {
        self.load
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_str())
    }

    fn output_filename(&self, format: &str) -> String {
        let configured = self.load.filenames.as_ref().and_then(|f| match format {
            "json" => f.json.clone(),
            "jsonl" => f.jsonl.clone(),
            "csv" => f.csv.clone(),
            _ => None,
        });
        configured.unwrap_or_else(|| default_output_filename(format))
    }

    fn extra_aliases(&self) -> Option<&ExtraAliases> {
        self.normalize.as_ref().map(|n| &n.extra_aliases)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
