use crate::config::{OutputFormat, DATA_EXTENSIONS};
use crate::core::ConfigProvider;
use crate::core::engine::DEFAULT_PAGE_SIZE;
use crate::core::highlight::{DEFAULT_CLOSE_MARKER, DEFAULT_OPEN_MARKER};
use crate::domain::model::{FilterCriteria, JoinMode};
use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::{
    validate_delimiter, validate_file_extension, validate_non_empty_string, validate_path,
    validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub dashboard: DashboardInfo,
    pub data: DataConfig,
    pub view: Option<ViewConfig>,
    pub highlight: Option<HighlightConfig>,
    pub filters: Option<FiltersConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub dir: String,
    pub doctors: String,
    pub reviews: String,
    pub delimiter: Option<char>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewConfig {
    pub page_size: Option<usize>,
    pub join: Option<JoinMode>,
    pub format: Option<OutputFormat>,
    pub export: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightConfig {
    pub open: String,
    pub close: String,
}

/// Starting criteria for the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FiltersConfig {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub institution: Option<String>,
    pub degrees: Option<Vec<String>>,
    pub min_experience: Option<u32>,
    pub min_rating: Option<f64>,
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub verbose: Option<bool>,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DashboardError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashboardError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("dashboard.name", &self.dashboard.name)?;

        validate_path("data.dir", &self.data.dir)?;
        validate_path("data.doctors", &self.data.doctors)?;
        validate_path("data.reviews", &self.data.reviews)?;
        validate_file_extension("data.doctors", &self.data.doctors, DATA_EXTENSIONS)?;
        validate_file_extension("data.reviews", &self.data.reviews, DATA_EXTENSIONS)?;
        if let Some(delimiter) = self.data.delimiter {
            validate_delimiter("data.delimiter", delimiter)?;
        }

        if let Some(export) = self.view.as_ref().and_then(|v| v.export.as_deref()) {
            validate_path("view.export", export)?;
            validate_file_extension("view.export", export, DATA_EXTENSIONS)?;
        }

        if let Some(highlight) = &self.highlight {
            validate_non_empty_string("highlight.open", &highlight.open)?;
            validate_non_empty_string("highlight.close", &highlight.close)?;
        }

        if let Some(min_rating) = self.filters.as_ref().and_then(|f| f.min_rating) {
            validate_range("filters.min_rating", min_rating, 0.0, 5.0)?;
        }

        Ok(())
    }

    /// 取得資料目錄
    pub fn data_dir(&self) -> &str {
        &self.data.dir
    }

    pub fn output_format(&self) -> OutputFormat {
        self.view
            .as_ref()
            .and_then(|v| v.format)
            .unwrap_or_default()
    }

    pub fn export_path(&self) -> Option<&str> {
        self.view.as_ref().and_then(|v| v.export.as_deref())
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn verbose(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }

    /// 將 [filters] 區段轉成初始篩選條件
    pub fn criteria(&self) -> FilterCriteria {
        let filters = self.filters.clone().unwrap_or_default();
        let degrees = filters.degrees.map(|list| {
            list.into_iter()
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect::<BTreeSet<_>>()
        });

        FilterCriteria {
            name: filters.name.unwrap_or_default(),
            specialty: filters.specialty.unwrap_or_default(),
            institution: filters.institution.unwrap_or_default(),
            degrees,
            min_experience: filters.min_experience.unwrap_or(0),
            min_rating: filters.min_rating.unwrap_or(0.0),
            keyword: filters.keyword.unwrap_or_default(),
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn doctors_file(&self) -> &str {
        &self.data.doctors
    }

    fn reviews_file(&self) -> &str {
        &self.data.reviews
    }

    fn delimiter(&self) -> u8 {
        self.data.delimiter.map(|c| c as u8).unwrap_or(b',')
    }

    fn page_size(&self) -> usize {
        self.view
            .as_ref()
            .and_then(|v| v.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    fn join_mode(&self) -> JoinMode {
        self.view.as_ref().and_then(|v| v.join).unwrap_or_default()
    }

    fn highlight_markers(&self) -> (&str, &str) {
        match &self.highlight {
            Some(h) => (h.open.as_str(), h.close.as_str()),
            None => (DEFAULT_OPEN_MARKER, DEFAULT_CLOSE_MARKER),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
[dashboard]
name = "gastro"

[data]
dir = "./data"
doctors = "doctors.csv"
reviews = "reviews.csv"
"#;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let config = TomlConfig::from_toml_str(MINIMAL).unwrap();

        assert_eq!(config.dashboard.name, "gastro");
        assert_eq!(config.data_dir(), "./data");
        assert_eq!(config.delimiter(), b',');
        assert_eq!(config.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(config.join_mode(), JoinMode::Left);
        assert_eq!(config.highlight_markers(), ("<mark>", "</mark>"));
        assert_eq!(config.output_format(), OutputFormat::Text);
        assert!(!config.monitoring_enabled());
        assert!(config.criteria().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[dashboard]
name = "gastro"
description = "Гастроэнтерологи"

[data]
dir = "./data"
doctors = "doctors.tsv"
reviews = "reviews.tsv"
delimiter = "\t"

[view]
page_size = 25
join = "inner"
format = "json"

[highlight]
open = "**"
close = "**"

[filters]
specialty = "гастро"
degrees = ["кмн", "дмн"]
min_experience = 10
min_rating = 4.5
keyword = "отличный"

[monitoring]
enabled = true
verbose = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.delimiter(), b'\t');
        assert_eq!(config.page_size(), 25);
        assert_eq!(config.join_mode(), JoinMode::Inner);
        assert_eq!(config.output_format(), OutputFormat::Json);
        assert_eq!(config.highlight_markers(), ("**", "**"));
        assert!(config.monitoring_enabled());
        assert!(config.verbose());

        let criteria = config.criteria();
        assert_eq!(criteria.specialty, "гастро");
        assert_eq!(criteria.degrees.as_ref().map(|d| d.len()), Some(2));
        assert_eq!(criteria.min_experience, 10);
        assert_eq!(criteria.min_rating, 4.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("REVIEW_DASHBOARD_TEST_DIR", "/srv/prodoctorov");

        let toml_content = r#"
[dashboard]
name = "env"

[data]
dir = "${REVIEW_DASHBOARD_TEST_DIR}"
doctors = "doctors.csv"
reviews = "reviews.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.data_dir(), "/srv/prodoctorov");

        std::env::remove_var("REVIEW_DASHBOARD_TEST_DIR");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[dashboard]
name = "bad"

[data]
dir = "./data"
doctors = "doctors.xlsx"
reviews = "reviews.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let out_of_range = format!("{}\n[filters]\nmin_rating = 6.0\n", MINIMAL);
        let config = TomlConfig::from_toml_str(&out_of_range).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.dashboard.name, "gastro");
    }

    #[test]
    fn test_missing_section_is_parse_error() {
        let err = TomlConfig::from_toml_str("[dashboard]\nname = \"x\"\n").unwrap_err();
        assert!(matches!(err, DashboardError::ConfigValidationError { .. }));
    }
}
