use crate::config::OutputFormat;
use crate::domain::model::{ProjectedRow, ResultPage, ReviewMetrics};
use crate::utils::error::Result;
use std::io::Write;

fn metrics_line(metrics: &ReviewMetrics) -> String {
    let mut line = format!(
        "📊 Reviews: {} | Doctors: {} | Average rating: {}",
        metrics.total_reviews,
        metrics.unique_doctors,
        metrics
            .average_rating
            .map(|r| format!("{:.2}", r))
            .unwrap_or_else(|| "-".to_string())
    );
    if let (Some(first), Some(last)) = (metrics.first_review, metrics.last_review) {
        line.push_str(&format!(" | {} .. {}", first, last));
    }
    line
}

fn doctor_details(row: &ProjectedRow) -> Option<String> {
    let experience = row.experience?;
    let mut parts = vec![format!("{} years", experience)];
    if let Some(degree) = &row.degree {
        parts.push(degree.clone());
    }
    if let Some(rating) = row.doctor_rating {
        parts.push(format!("rating {:.1}", rating));
    }
    if let Some(count) = row.review_count {
        parts.push(format!("{} reviews", count));
    }
    Some(parts.join(" · "))
}

fn review_line(row: &ProjectedRow) -> String {
    let rating = row
        .review_rating
        .map(|r| format!(" ★{}", r))
        .unwrap_or_default();
    let confirmed = if row.booking_confirmed { " ✔" } else { "" };
    let orphan = if row.experience.is_none() {
        " (doctor not in current filter)"
    } else {
        ""
    };
    format!(
        "  - {}, {}{}{}{}: {}",
        row.reviewer,
        row.date,
        rating,
        confirmed,
        orphan,
        row.text.as_deref().unwrap_or("")
    )
}

/// Plain text listing: one header block per doctor run, one line per review.
pub fn render_text<W: Write>(page: &ResultPage, out: &mut W) -> Result<()> {
    writeln!(out, "{}", metrics_line(&page.metrics))?;
    writeln!(
        out,
        "Page {}/{} ({} rows)",
        page.page, page.total_pages, page.total_rows
    )?;

    if page.rows.is_empty() {
        writeln!(out, "No reviews match the current filters.")?;
        return Ok(());
    }

    for row in &page.rows {
        if row.is_group_header() {
            writeln!(out)?;
            writeln!(out, "{} · {} · {}", row.name, row.specialty, row.link)?;
            if let Some(details) = doctor_details(row) {
                writeln!(out, "  {}", details)?;
            }
            if !row.institutions.is_empty() {
                writeln!(out, "  {}", row.institutions.join("; "))?;
            }
        }
        writeln!(out, "{}", review_line(row))?;
    }
    Ok(())
}

pub fn render_json<W: Write>(page: &ResultPage, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, page)?;
    writeln!(out)?;
    Ok(())
}

pub fn render<W: Write>(page: &ResultPage, format: OutputFormat, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Text => render_text(page, out),
        OutputFormat::Json => render_json(page, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, text: &str) -> ProjectedRow {
        ProjectedRow {
            link: if name.is_empty() { String::new() } else { "/d/1".to_string() },
            name: name.to_string(),
            specialty: if name.is_empty() { String::new() } else { "Терапевт".to_string() },
            experience: Some(12),
            degree: Some("кмн".to_string()),
            institutions: vec!["ГКБ №1".to_string()],
            review_count: Some(2),
            doctor_rating: Some(4.75),
            reviewer: "Анна".to_string(),
            date: "01.02.2024".to_string(),
            text: Some(text.to_string()),
            review_rating: Some(5.0),
            booking_confirmed: true,
        }
    }

    fn page(rows: Vec<ProjectedRow>) -> ResultPage {
        ResultPage {
            total_rows: rows.len(),
            rows,
            page: 1,
            page_size: 10,
            total_pages: 1,
            metrics: ReviewMetrics {
                total_reviews: 2,
                unique_doctors: 1,
                average_rating: Some(5.0),
                first_review: None,
                last_review: None,
            },
        }
    }

    #[test]
    fn test_render_text_prints_header_once() {
        let page = page(vec![row("Иванов", "<mark>хорошо</mark>"), row("", "ok")]);
        let mut out = Vec::new();
        render_text(&page, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.matches("Иванов · Терапевт · /d/1").count(), 1);
        assert!(text.contains("12 years · кмн · rating 4.8 · 2 reviews"));
        assert!(text.contains("  - Анна, 01.02.2024 ★5 ✔: <mark>хорошо</mark>"));
        assert!(text.starts_with("📊 Reviews: 2 | Doctors: 1 | Average rating: 5.00"));
    }

    #[test]
    fn test_render_text_empty_page() {
        let mut out = Vec::new();
        render_text(&page(Vec::new()), &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("No reviews match"));
    }

    #[test]
    fn test_render_json() {
        let mut out = Vec::new();
        render(&page(vec![row("Иванов", "текст")]), OutputFormat::Json, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["rows"][0]["name"], "Иванов");
        assert_eq!(value["total_pages"], 1);
    }
}
