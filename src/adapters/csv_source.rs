use crate::core::{ConfigProvider, DatasetSource, Storage};
use crate::domain::model::{Doctor, Review};
use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::validate_range;
use serde::Deserialize;

/// Carriage-return artefact left in cells by spreadsheet exports.
const SPREADSHEET_CR: &str = "_x000D_";

const RATING_MIN: f64 = 0.0;
const RATING_MAX: f64 = 5.0;

#[derive(Debug, Deserialize)]
struct DoctorRow {
    #[serde(rename = "Ссылка", alias = "link")]
    link: Option<String>,
    #[serde(rename = "Имя врача", alias = "name")]
    name: Option<String>,
    #[serde(rename = "Специальность", alias = "specialty", default)]
    specialty: Option<String>,
    #[serde(rename = "Степень", alias = "degree", default)]
    degree: Option<String>,
    #[serde(rename = "Стаж", alias = "experience", default)]
    experience: Option<String>,
    #[serde(rename = "Рейтинг", alias = "rating", default)]
    rating: Option<String>,
    #[serde(rename = "Количество отзывов", alias = "review_count", default)]
    review_count: Option<String>,
    #[serde(rename = "Места работы", alias = "institutions", default)]
    institutions: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReviewRow {
    #[serde(rename = "Ссылка", alias = "link")]
    link: Option<String>,
    #[serde(rename = "Имя пациента", alias = "reviewer", default)]
    reviewer: Option<String>,
    #[serde(rename = "Дата отзыва", alias = "date", default)]
    date: Option<String>,
    #[serde(rename = "Отзыв", alias = "text", default)]
    text: Option<String>,
    #[serde(rename = "Рейтинг_1", alias = "rating", default)]
    rating: Option<String>,
    #[serde(rename = "Запись подтверждена", alias = "confirmed", default)]
    confirmed: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(dataset: &str, row: usize, column: &str, value: Option<String>) -> Result<String> {
    non_blank(value)
        .ok_or_else(|| DashboardError::dataset(dataset, row, format!("missing {}", column)))
}

/// Whole non-negative number; spreadsheet exports sometimes write `12.0`.
fn parse_count(dataset: &str, row: usize, column: &str, value: Option<String>) -> Result<u32> {
    let Some(raw) = non_blank(value) else {
        return Ok(0);
    };
    let normalized = raw.replace(',', ".");
    let trimmed = normalized
        .strip_suffix(".0")
        .unwrap_or(normalized.as_str());

    trimmed.parse::<u32>().map_err(|_| {
        DashboardError::dataset(
            dataset,
            row,
            format!("{} '{}' is not a non-negative integer", column, raw),
        )
    })
}

fn parse_rating(dataset: &str, row: usize, column: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw.replace(',', ".").parse().map_err(|_| {
        DashboardError::dataset(dataset, row, format!("{} '{}' is not a number", column, raw))
    })?;

    validate_range(column, value, RATING_MIN, RATING_MAX)
        .map_err(|e| DashboardError::dataset(dataset, row, e.to_string()))?;
    Ok(value)
}

fn parse_flag(dataset: &str, row: usize, column: &str, value: Option<String>) -> Result<bool> {
    let Some(raw) = non_blank(value) else {
        return Ok(false);
    };
    match raw.to_lowercase().as_str() {
        "да" | "true" | "yes" | "1" => Ok(true),
        "нет" | "false" | "no" | "0" => Ok(false),
        _ => Err(DashboardError::dataset(
            dataset,
            row,
            format!("{} '{}' is not a yes/no value", column, raw),
        )),
    }
}

fn split_institutions(value: Option<String>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split([';', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn clean_review_text(value: Option<String>) -> Option<String> {
    non_blank(value.map(|text| text.replace(SPREADSHEET_CR, " ")))
}

fn reader(data: &[u8], delimiter: u8) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(data)
}

pub fn parse_doctors(data: &[u8], delimiter: u8) -> Result<Vec<Doctor>> {
    const DATASET: &str = "doctors";
    let mut doctors = Vec::new();

    for (index, result) in reader(data, delimiter).deserialize::<DoctorRow>().enumerate() {
        let row = index + 1;
        let raw = result?;

        let rating = match non_blank(raw.rating) {
            Some(value) => parse_rating(DATASET, row, "rating", &value)?,
            None => 0.0,
        };

        doctors.push(Doctor {
            link: required(DATASET, row, "profile link", raw.link)?,
            name: required(DATASET, row, "doctor name", raw.name)?,
            specialty: non_blank(raw.specialty).unwrap_or_default(),
            degree: non_blank(raw.degree),
            experience: parse_count(DATASET, row, "experience", raw.experience)?,
            rating,
            review_count: parse_count(DATASET, row, "review count", raw.review_count)?,
            institutions: split_institutions(raw.institutions),
        });
    }

    Ok(doctors)
}

pub fn parse_reviews(data: &[u8], delimiter: u8) -> Result<Vec<Review>> {
    const DATASET: &str = "reviews";
    let mut reviews = Vec::new();

    for (index, result) in reader(data, delimiter).deserialize::<ReviewRow>().enumerate() {
        let row = index + 1;
        let raw = result?;

        let rating = match non_blank(raw.rating) {
            Some(value) => Some(parse_rating(DATASET, row, "review rating", &value)?),
            None => None,
        };

        reviews.push(Review {
            link: required(DATASET, row, "profile link", raw.link)?,
            reviewer: non_blank(raw.reviewer).unwrap_or_default(),
            date: non_blank(raw.date).unwrap_or_default(),
            text: clean_review_text(raw.text),
            rating,
            booking_confirmed: parse_flag(DATASET, row, "booking flag", raw.confirmed)?,
        });
    }

    Ok(reviews)
}

/// Reads both datasets as CSV through a [`Storage`] backend.
pub struct CsvSource<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CsvSource<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> DatasetSource for CsvSource<S, C> {
    async fn doctors(&self) -> Result<Vec<Doctor>> {
        tracing::debug!("Reading doctors from: {}", self.config.doctors_file());
        let data = self.storage.read_file(self.config.doctors_file()).await?;
        parse_doctors(&data, self.config.delimiter())
    }

    async fn reviews(&self) -> Result<Vec<Review>> {
        tracing::debug!("Reading reviews from: {}", self.config.reviews_file());
        let data = self.storage.read_file(self.config.reviews_file()).await?;
        parse_reviews(&data, self.config.delimiter())
    }
}
