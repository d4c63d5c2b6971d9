use crate::core::highlight::literal_matcher;
use crate::domain::model::{Doctor, FilterCriteria, Review};
use std::collections::BTreeSet;

/// Lowercased needle for a text filter, or `None` when the filter is blank.
fn needle(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Distinct non-missing degrees among `doctors`.
pub fn degree_universe(doctors: &[Doctor]) -> BTreeSet<String> {
    doctors
        .iter()
        .filter_map(|d| d.degree.as_ref())
        .cloned()
        .collect()
}

/// The degree selection to enforce, or `None` when it covers every observed degree.
fn effective_degrees<'c>(
    selected: Option<&'c BTreeSet<String>>,
    universe: &BTreeSet<String>,
) -> Option<&'c BTreeSet<String>> {
    selected.filter(|sel| !universe.is_subset(sel))
}

fn matches_profile(
    doctor: &Doctor,
    degrees: Option<&BTreeSet<String>>,
    min_experience: u32,
    min_rating: f64,
) -> bool {
    let degree_ok = match degrees {
        Some(selected) => doctor
            .degree
            .as_ref()
            .is_some_and(|degree| selected.contains(degree)),
        None => true,
    };

    degree_ok
        && (min_experience == 0 || doctor.experience >= min_experience)
        && (min_rating <= 0.0 || doctor.rating >= min_rating)
}

pub fn filter_doctors<'a>(doctors: &'a [Doctor], criteria: &FilterCriteria) -> Vec<&'a Doctor> {
    let name = needle(&criteria.name);
    let specialty = needle(&criteria.specialty);
    let institution = needle(&criteria.institution);

    let mut subset: Vec<&Doctor> = doctors
        .iter()
        .filter(|doctor| {
            name.as_deref().is_none_or(|n| contains_ci(&doctor.name, n))
                && specialty
                    .as_deref()
                    .is_none_or(|s| contains_ci(&doctor.specialty, s))
                && institution.as_deref().is_none_or(|i| {
                    doctor
                        .institutions
                        .iter()
                        .any(|place| contains_ci(place, i))
                })
        })
        .collect();

    // Untouched degree/experience/rating controls skip the second pass.
    if criteria.has_profile_filters() {
        let universe = degree_universe(doctors);
        let degrees = effective_degrees(criteria.degrees.as_ref(), &universe);
        if criteria.degrees.is_some() && degrees.is_none() {
            tracing::debug!("Degree selection covers all {} degrees, ignoring it", universe.len());
        }
        subset.retain(|doctor| {
            matches_profile(doctor, degrees, criteria.min_experience, criteria.min_rating)
        });
    }

    tracing::debug!("Doctor filter kept {} of {}", subset.len(), doctors.len());
    subset
}

pub fn filter_reviews<'a>(reviews: &'a [Review], keyword: &str) -> Vec<&'a Review> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return reviews.iter().collect();
    }

    // Same case folding as the highlighter; plain lowercasing only if the
    // keyword is too large to compile.
    let matcher = literal_matcher(keyword)
        .inspect_err(|e| tracing::warn!("⚠️ Keyword matcher unavailable, lowercasing instead: {}", e))
        .ok();
    let lowered = keyword.to_lowercase();

    let subset: Vec<&Review> = reviews
        .iter()
        .filter(|review| {
            review.text.as_deref().is_some_and(|text| match &matcher {
                Some(re) => re.is_match(text),
                None => contains_ci(text, &lowered),
            })
        })
        .collect();

    tracing::debug!(
        "Keyword '{}' matched {} of {} reviews",
        keyword,
        subset.len(),
        reviews.len()
    );
    subset
}
