use crate::core::filter::degree_universe;
use crate::domain::model::{Doctor, Review};
use crate::domain::ports::DatasetSource;
use crate::utils::error::{DashboardError, Result};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

/// Both datasets, loaded once at start and read-only afterwards. Share it
/// between sessions through the `Arc` returned by [`RecordStore::load`].
#[derive(Debug)]
pub struct RecordStore {
    doctors: Vec<Doctor>,
    reviews: Vec<Review>,
    degrees: BTreeSet<String>,
}

impl RecordStore {
    /// Build a store from already parsed records. Duplicate profile links are
    /// a load failure.
    pub fn new(doctors: Vec<Doctor>, reviews: Vec<Review>) -> Result<Self> {
        let mut first_seen: HashMap<&str, usize> = HashMap::with_capacity(doctors.len());
        for (index, doctor) in doctors.iter().enumerate() {
            if let Some(previous) = first_seen.insert(doctor.link.as_str(), index + 1) {
                return Err(DashboardError::dataset(
                    "doctors",
                    index + 1,
                    format!(
                        "profile link '{}' already used by row {}",
                        doctor.link, previous
                    ),
                ));
            }
        }

        let links: HashSet<&str> = first_seen.into_keys().collect();
        let orphans = reviews
            .iter()
            .filter(|r| !links.contains(r.link.as_str()))
            .count();
        if orphans > 0 {
            tracing::warn!("⚠️ {} reviews reference unknown doctors", orphans);
        }

        let degrees = degree_universe(&doctors);
        Ok(Self {
            doctors,
            reviews,
            degrees,
        })
    }

    pub async fn load<D: DatasetSource + ?Sized>(source: &D) -> Result<Arc<Self>> {
        let doctors = source.doctors().await?;
        let reviews = source.reviews().await?;
        tracing::info!(
            "📂 Loaded {} doctors and {} reviews",
            doctors.len(),
            reviews.len()
        );
        Ok(Arc::new(Self::new(doctors, reviews)?))
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// Every degree value present in the doctor dataset.
    pub fn degrees(&self) -> &BTreeSet<String> {
        &self.degrees
    }

    pub fn doctor(&self, link: &str) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.link == link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor(link: &str, degree: Option<&str>) -> Doctor {
        Doctor {
            link: link.to_string(),
            name: format!("Врач {}", link),
            specialty: String::new(),
            degree: degree.map(str::to_string),
            experience: 0,
            rating: 0.0,
            review_count: 0,
            institutions: Vec::new(),
        }
    }

    #[test]
    fn test_duplicate_links_rejected() {
        let err = RecordStore::new(vec![doctor("a", None), doctor("a", None)], Vec::new())
            .unwrap_err();
        assert!(err.to_string().contains("already used by row 1"));
    }

    #[test]
    fn test_degrees_collected() {
        let store = RecordStore::new(
            vec![doctor("a", Some("кмн")), doctor("b", None), doctor("c", Some("дмн"))],
            Vec::new(),
        )
        .unwrap();
        let degrees: Vec<&str> = store.degrees().iter().map(String::as_str).collect();
        assert_eq!(degrees, vec!["дмн", "кмн"]);
        assert_eq!(store.doctor("b").map(|d| d.link.as_str()), Some("b"));
    }
}
