use crate::config::{validate_payload_bounds, validate_proximities};
use crate::domain::model::{GeoPoint, Proximity, SiteSelection};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex")
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub report: ReportConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub proximities: Vec<ProximityConfig>,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub url: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub site: Option<String>,
    pub payload_min: Option<f64>,
    pub payload_max: Option<f64>,
    pub strict_coordinates: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximityConfig {
    pub name: String,
    pub site: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub archive_filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATASET_URL})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn dataset_url(&self) -> &str {
        &self.source.url
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn site_selection(&self) -> SiteSelection {
        self.analysis
            .site
            .clone()
            .map(SiteSelection::from)
            .unwrap_or_default()
    }

    fn payload_min(&self) -> Option<f64> {
        self.analysis.payload_min
    }

    fn payload_max(&self) -> Option<f64> {
        self.analysis.payload_max
    }

    fn proximities(&self) -> Vec<Proximity> {
        self.proximities
            .iter()
            .map(|p| Proximity {
                name: p.name.clone(),
                site: p.site.clone(),
                coordinate: GeoPoint::new(p.latitude, p.longitude),
            })
            .collect()
    }

    fn strict_coordinates(&self) -> bool {
        self.analysis.strict_coordinates.unwrap_or(false)
    }

    fn request_timeout_seconds(&self) -> Option<u64> {
        self.source.timeout_seconds
    }

    fn archive_filename(&self) -> &str {
        self.load
            .archive_filename
            .as_deref()
            .unwrap_or("launch_report.zip")
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("report.name", &self.report.name)?;
        validation::validate_url("source.url", &self.source.url)?;
        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_range("source.timeout_seconds", timeout, 1, 3600)?;
        }
        if let Some(site) = &self.analysis.site {
            validation::validate_non_empty_string("analysis.site", site)?;
        }
        validate_payload_bounds(
            "analysis.payload",
            self.analysis.payload_min,
            self.analysis.payload_max,
        )?;
        validate_proximities("proximities", &self.proximities())?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_file_extension(
            "load.archive_filename",
            self.archive_filename(),
            &["zip"],
        )?;
        Ok(())
    }
}
