pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::{FilterCriteria, JoinMode};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{
    validate_delimiter, validate_file_extension, validate_non_empty_string, validate_path,
    validate_range, Validate,
};
use serde::{Deserialize, Serialize};

pub const DATA_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}', expected text or json", other)),
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, clap::Parser)]
#[command(name = "review-dashboard")]
#[command(about = "Filter, group and page through doctor reviews")]
pub struct CliConfig {
    #[arg(long, default_value = ".")]
    pub data_dir: String,

    #[arg(long, default_value = "doctors.csv")]
    pub doctors_file: String,

    #[arg(long, default_value = "reviews.csv")]
    pub reviews_file: String,

    #[arg(long, default_value = ",")]
    pub delimiter: char,

    #[arg(long, default_value = "10", help = "Rows per page, 0 shows everything")]
    pub page_size: usize,

    #[arg(long, default_value = "1")]
    pub page: usize,

    #[arg(long, default_value = "left")]
    pub join: JoinMode,

    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub specialty: String,

    #[arg(long, default_value = "")]
    pub institution: String,

    #[arg(long, value_delimiter = ',', help = "Accepted degrees, comma separated")]
    pub degree: Vec<String>,

    #[arg(long, default_value = "0")]
    pub min_experience: u32,

    #[arg(long, default_value = "0")]
    pub min_rating: f64,

    #[arg(long, default_value = "", help = "Keywords to find in review text")]
    pub search: String,

    #[arg(long, default_value = "<mark>")]
    pub mark_open: String,

    #[arg(long, default_value = "</mark>")]
    pub mark_close: String,

    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    #[arg(long, help = "Write the full filtered view to this CSV file")]
    pub export: Option<String>,

    #[arg(long, short, help = "Read commands from stdin after the first page")]
    pub interactive: bool,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn criteria(&self) -> FilterCriteria {
        let degrees: Vec<String> = self
            .degree
            .iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();

        FilterCriteria {
            name: self.name.clone(),
            specialty: self.specialty.clone(),
            institution: self.institution.clone(),
            degrees: if degrees.is_empty() {
                None
            } else {
                Some(degrees.into_iter().collect())
            },
            min_experience: self.min_experience,
            min_rating: self.min_rating,
            keyword: self.search.clone(),
        }
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn doctors_file(&self) -> &str {
        &self.doctors_file
    }

    fn reviews_file(&self) -> &str {
        &self.reviews_file
    }

    fn delimiter(&self) -> u8 {
        self.delimiter as u8
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    fn join_mode(&self) -> JoinMode {
        self.join
    }

    fn highlight_markers(&self) -> (&str, &str) {
        (self.mark_open.as_str(), self.mark_close.as_str())
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("data_dir", &self.data_dir)?;
        validate_path("doctors_file", &self.doctors_file)?;
        validate_path("reviews_file", &self.reviews_file)?;
        validate_file_extension("doctors_file", &self.doctors_file, DATA_EXTENSIONS)?;
        validate_file_extension("reviews_file", &self.reviews_file, DATA_EXTENSIONS)?;
        validate_delimiter("delimiter", self.delimiter)?;
        validate_range("min_rating", self.min_rating, 0.0, 5.0)?;
        validate_non_empty_string("mark_open", &self.mark_open)?;
        validate_non_empty_string("mark_close", &self.mark_close)?;
        if let Some(export) = &self.export {
            validate_path("export", export)?;
            validate_file_extension("export", export, DATA_EXTENSIONS)?;
        }
        Ok(())
    }
}
