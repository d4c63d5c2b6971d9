use crate::domain::model::{Doctor, JoinMode, JoinedRow, ProjectedRow, Review};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Join reviews to doctors on the profile link, driven by the review side.
pub fn join(reviews: &[&Review], doctors: &[&Doctor], mode: JoinMode) -> Vec<JoinedRow> {
    let by_link: HashMap<&str, &Doctor> = doctors.iter().map(|d| (d.link.as_str(), *d)).collect();

    let mut unmatched = 0usize;
    let rows: Vec<JoinedRow> = reviews
        .iter()
        .filter_map(|review| {
            let doctor = by_link.get(review.link.as_str()).map(|d| (*d).clone());
            if doctor.is_none() {
                unmatched += 1;
                if mode == JoinMode::Inner {
                    return None;
                }
            }
            Some(JoinedRow {
                review: (*review).clone(),
                doctor,
            })
        })
        .collect();

    if unmatched > 0 {
        tracing::debug!(
            "{} reviews have no doctor in the subset ({} join)",
            unmatched,
            mode
        );
    }
    rows
}

/// Stable ascending sort by doctor name; rows without a doctor go last.
pub fn sort_by_doctor_name(rows: &mut [JoinedRow]) {
    rows.sort_by(|a, b| match (&a.doctor, &b.doctor) {
        (Some(x), Some(y)) => x.name.cmp(&y.name),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Display copies of `rows` where only the first row of each doctor keeps
/// link, name and specialty. Uses a seen-set, so namesakes that interleave
/// after the name sort still get one header each.
pub fn group_headers(rows: &[JoinedRow]) -> Vec<ProjectedRow> {
    let mut seen: HashSet<&str> = HashSet::new();

    rows.iter()
        .map(|row| {
            let review = &row.review;
            let mut projected = ProjectedRow {
                link: String::new(),
                name: String::new(),
                specialty: String::new(),
                experience: None,
                degree: None,
                institutions: Vec::new(),
                review_count: None,
                doctor_rating: None,
                reviewer: review.reviewer.clone(),
                date: review.date.clone(),
                text: review.text.clone(),
                review_rating: review.rating,
                booking_confirmed: review.booking_confirmed,
            };

            if let Some(doctor) = &row.doctor {
                if seen.insert(doctor.link.as_str()) {
                    projected.link = doctor.link.clone();
                    projected.name = doctor.name.clone();
                    projected.specialty = doctor.specialty.clone();
                }
                projected.experience = Some(doctor.experience);
                projected.degree = doctor.degree.clone();
                projected.institutions = doctor.institutions.clone();
                projected.review_count = Some(doctor.review_count);
                projected.doctor_rating = Some(doctor.rating);
            }
            projected
        })
        .collect()
}

/// Join, sort and dedup in one go with the given join mode.
pub fn project_with_mode(
    reviews: &[&Review],
    doctors: &[&Doctor],
    mode: JoinMode,
) -> Vec<ProjectedRow> {
    let mut rows = join(reviews, doctors, mode);
    sort_by_doctor_name(&mut rows);
    group_headers(&rows)
}

pub fn project(reviews: &[&Review], doctors: &[&Doctor]) -> Vec<ProjectedRow> {
    project_with_mode(reviews, doctors, JoinMode::Left)
}
