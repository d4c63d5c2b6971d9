pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig, OutputFormat};

pub use crate::core::engine::{DashboardEngine, Session, ViewOptions};
pub use crate::core::filter::{filter_doctors, filter_reviews};
pub use crate::core::highlight::{highlight, Highlighter};
pub use crate::core::paginator::{paginate, Paginator};
pub use crate::core::projector::project;
pub use crate::core::store::RecordStore;
pub use crate::domain::model::{Doctor, FilterCriteria, JoinMode, ProjectedRow, ResultPage, Review};
pub use crate::utils::error::{DashboardError, Result};
