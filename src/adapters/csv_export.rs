use crate::core::Storage;
use crate::domain::model::ProjectedRow;
use crate::utils::error::Result;

const HEADERS: [&str; 13] = [
    "Ссылка",
    "Имя врача",
    "Специальность",
    "Стаж",
    "Степень",
    "Места работы",
    "Количество отзывов",
    "Рейтинг",
    "Имя пациента",
    "Дата отзыва",
    "Отзыв",
    "Рейтинг_1",
    "Запись подтверждена",
];

fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Serialize projected rows with the same column names the loader reads.
pub fn rows_to_csv(rows: &[ProjectedRow], delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(HEADERS)?;
    for row in rows {
        writer.write_record([
            row.link.clone(),
            row.name.clone(),
            row.specialty.clone(),
            opt(&row.experience),
            row.degree.clone().unwrap_or_default(),
            row.institutions.join("; "),
            opt(&row.review_count),
            opt(&row.doctor_rating),
            row.reviewer.clone(),
            row.date.clone(),
            row.text.clone().unwrap_or_default(),
            opt(&row.review_rating),
            if row.booking_confirmed { "да" } else { "нет" }.to_string(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()).into())
}

/// Write the rows through `storage`; returns the bytes written.
pub async fn export_rows<S: Storage>(
    storage: &S,
    path: &str,
    rows: &[ProjectedRow],
    delimiter: u8,
) -> Result<usize> {
    let data = rows_to_csv(rows, delimiter)?;
    tracing::debug!("Writing {} rows ({} bytes) to {}", rows.len(), data.len(), path);
    storage.write_file(path, &data).await?;
    Ok(data.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, text: Option<&str>) -> ProjectedRow {
        ProjectedRow {
            link: if name.is_empty() { String::new() } else { "/d/1".to_string() },
            name: name.to_string(),
            specialty: String::new(),
            experience: Some(4),
            degree: None,
            institutions: vec!["Клиника А".to_string(), "Клиника Б".to_string()],
            review_count: Some(2),
            doctor_rating: Some(4.5),
            reviewer: "Анна".to_string(),
            date: "01.01.2024".to_string(),
            text: text.map(str::to_string),
            review_rating: None,
            booking_confirmed: true,
        }
    }

    #[test]
    fn test_rows_to_csv() {
        let rows = vec![row("Иванов", Some("хорошо, спасибо")), row("", None)];
        let data = rows_to_csv(&rows, b',').unwrap();
        let text = String::from_utf8(data).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Ссылка,Имя врача"));
        assert_eq!(
            lines[1],
            "/d/1,Иванов,,4,,Клиника А; Клиника Б,2,4.5,Анна,01.01.2024,\"хорошо, спасибо\",,да"
        );
        assert!(lines[2].starts_with(",,,4,"));
    }
}
