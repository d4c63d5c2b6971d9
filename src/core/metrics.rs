use crate::domain::model::{JoinedRow, ReviewMetrics};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashSet;

const DATE_FORMATS: &[&str] = &["%d.%m.%Y", "%Y-%m-%d", "%d/%m/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%d.%m.%Y %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parse a review date as exported by the source site. Unknown shapes give `None`.
pub fn parse_review_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Summary figures over the whole filtered result, not just one page.
pub fn summarize(rows: &[JoinedRow]) -> ReviewMetrics {
    let unique_doctors = rows
        .iter()
        .map(|row| row.review.link.as_str())
        .collect::<HashSet<_>>()
        .len();

    let ratings: Vec<f64> = rows.iter().filter_map(|row| row.review.rating).collect();
    let average_rating = if ratings.is_empty() {
        None
    } else {
        let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
        Some((mean * 100.0).round() / 100.0)
    };

    let dates: Vec<NaiveDate> = rows
        .iter()
        .filter_map(|row| parse_review_date(&row.review.date))
        .collect();

    ReviewMetrics {
        total_reviews: rows.len(),
        unique_doctors,
        average_rating,
        first_review: dates.iter().min().copied(),
        last_review: dates.iter().max().copied(),
    }
}
