use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One doctor profile. The profile link is the unique key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub link: String,
    pub name: String,
    pub specialty: String,
    pub degree: Option<String>,
    pub experience: u32,
    pub rating: f64,
    pub review_count: u32,
    pub institutions: Vec<String>,
}

/// One patient review, tied to a doctor through `link`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub link: String,
    pub reviewer: String,
    pub date: String,
    pub text: Option<String>,
    pub rating: Option<f64>,
    pub booking_confirmed: bool,
}

/// Filter predicates for one interaction cycle. Defaults match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub name: String,
    pub specialty: String,
    pub institution: String,
    /// `None` means the user never touched the degree selection.
    pub degrees: Option<BTreeSet<String>>,
    pub min_experience: u32,
    pub min_rating: f64,
    pub keyword: String,
}

impl FilterCriteria {
    /// True when any of degree, experience or rating differs from its default.
    pub fn has_profile_filters(&self) -> bool {
        self.degrees.is_some() || self.min_experience > 0 || self.min_rating > 0.0
    }

    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
            && self.specialty.trim().is_empty()
            && self.institution.trim().is_empty()
            && self.keyword.trim().is_empty()
            && !self.has_profile_filters()
    }
}

/// Review enriched with its doctor's attributes. Doctor fields are `None`
/// when the doctor is not part of the joined subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRow {
    pub review: Review,
    pub doctor: Option<Doctor>,
}

/// Display copy of a joined row. `link`, `name` and `specialty` are blank on
/// every row of a doctor's run except the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedRow {
    pub link: String,
    pub name: String,
    pub specialty: String,
    pub experience: Option<u32>,
    pub degree: Option<String>,
    pub institutions: Vec<String>,
    pub review_count: Option<u32>,
    pub doctor_rating: Option<f64>,
    pub reviewer: String,
    pub date: String,
    pub text: Option<String>,
    pub review_rating: Option<f64>,
    pub booking_confirmed: bool,
}

impl ProjectedRow {
    pub fn is_group_header(&self) -> bool {
        !self.link.is_empty() || !self.name.is_empty() || !self.specialty.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewMetrics {
    pub total_reviews: usize,
    pub unique_doctors: usize,
    pub average_rating: Option<f64>,
    pub first_review: Option<chrono::NaiveDate>,
    pub last_review: Option<chrono::NaiveDate>,
}

/// One rendered page of the current result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    pub rows: Vec<ProjectedRow>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    pub metrics: ReviewMetrics,
}

/// How reviews whose doctor is missing from the doctor subset are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinMode {
    /// Keep every review; absent doctors leave the doctor fields empty.
    #[default]
    Left,
    /// Drop reviews whose doctor is absent.
    Inner,
}

impl std::str::FromStr for JoinMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(JoinMode::Left),
            "inner" => Ok(JoinMode::Inner),
            other => Err(format!("unknown join mode '{}', expected left or inner", other)),
        }
    }
}

impl std::fmt::Display for JoinMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinMode::Left => write!(f, "left"),
            JoinMode::Inner => write!(f, "inner"),
        }
    }
}
