pub mod engine;
pub mod filter;
pub mod highlight;
pub mod metrics;
pub mod paginator;
pub mod projector;
pub mod store;

pub use crate::domain::model::{
    Doctor, FilterCriteria, JoinMode, JoinedRow, ProjectedRow, ResultPage, Review, ReviewMetrics,
};
pub use crate::domain::ports::{ConfigProvider, DatasetSource, Storage};
pub use crate::utils::error::Result;
