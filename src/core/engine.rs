use crate::core::filter::{filter_doctors, filter_reviews};
use crate::core::highlight::{Highlighter, DEFAULT_CLOSE_MARKER, DEFAULT_OPEN_MARKER};
use crate::core::metrics::summarize;
use crate::core::paginator::{paginate, Paginator};
use crate::core::projector::{group_headers, join, sort_by_doctor_name};
use crate::core::store::RecordStore;
use crate::domain::model::{FilterCriteria, JoinMode, JoinedRow, ProjectedRow, ResultPage};
use crate::domain::ports::{ConfigProvider, DatasetSource};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::sync::Arc;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Per-session presentation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    pub page_size: usize,
    pub join_mode: JoinMode,
    pub open_marker: String,
    pub close_marker: String,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            join_mode: JoinMode::Left,
            open_marker: DEFAULT_OPEN_MARKER.to_string(),
            close_marker: DEFAULT_CLOSE_MARKER.to_string(),
        }
    }
}

impl ViewOptions {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        let (open, close) = config.highlight_markers();
        Self {
            page_size: config.page_size(),
            join_mode: config.join_mode(),
            open_marker: open.to_string(),
            close_marker: close.to_string(),
        }
    }
}

/// Loads the record store once and hands out sessions over it.
pub struct DashboardEngine<D: DatasetSource> {
    source: D,
    monitor: SystemMonitor,
}

impl<D: DatasetSource> DashboardEngine<D> {
    pub fn new(source: D) -> Self {
        Self::new_with_monitoring(source, false)
    }

    pub fn new_with_monitoring(source: D, monitor_enabled: bool) -> Self {
        Self {
            source,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn monitor(&self) -> &SystemMonitor {
        &self.monitor
    }

    pub async fn load(&self) -> Result<Arc<RecordStore>> {
        tracing::info!("📥 Loading datasets...");
        self.monitor.log_stats("Before load");
        let store = RecordStore::load(&self.source).await?;
        self.monitor.log_stats("After load");
        Ok(store)
    }
}

/// Session-local state: the current criteria and page. Every render re-runs
/// filter, projection, pagination and highlighting over the shared store.
pub struct Session {
    store: Arc<RecordStore>,
    criteria: FilterCriteria,
    paginator: Paginator,
    options: ViewOptions,
    /// Row count for the current criteria, `None` until the next query.
    total_rows: Option<usize>,
    #[cfg(test)]
    query_runs: std::cell::Cell<usize>,
}

impl Session {
    pub fn new(store: Arc<RecordStore>, options: ViewOptions) -> Self {
        Self {
            store,
            criteria: FilterCriteria::default(),
            paginator: Paginator::new(options.page_size),
            options,
            total_rows: None,
            #[cfg(test)]
            query_runs: std::cell::Cell::new(0),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    pub fn current_page(&self) -> usize {
        self.paginator.current_page()
    }

    pub fn total_pages(&mut self) -> usize {
        self.ensure_total();
        self.paginator.total_pages()
    }

    /// Replace the criteria and go back to page 1.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        if criteria != self.criteria {
            self.criteria = criteria;
            self.paginator.reset();
            self.total_rows = None;
        }
    }

    /// Replace the criteria but keep the current page, clamped to the new result.
    pub fn set_criteria_keep_page(&mut self, criteria: FilterCriteria) {
        if criteria != self.criteria {
            self.criteria = criteria;
            self.total_rows = None;
        }
    }

    /// Edit the criteria in place; the page resets only if something changed.
    pub fn update_criteria(&mut self, edit: impl FnOnce(&mut FilterCriteria)) {
        let mut criteria = self.criteria.clone();
        edit(&mut criteria);
        self.set_criteria(criteria);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.options.page_size = page_size;
        self.paginator.set_page_size(page_size);
        if let Some(total) = self.total_rows {
            self.paginator.set_total_rows(total);
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.ensure_total();
        self.paginator.next()
    }

    pub fn prev_page(&mut self) -> bool {
        self.ensure_total();
        self.paginator.prev()
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.ensure_total();
        self.paginator.go_to(page);
    }

    /// Filtered, joined rows sorted by doctor name. Doctor fields are intact.
    pub fn query(&self) -> Vec<JoinedRow> {
        #[cfg(test)]
        self.query_runs.set(self.query_runs.get() + 1);
        let doctors = filter_doctors(self.store.doctors(), &self.criteria);
        let reviews = filter_reviews(self.store.reviews(), &self.criteria.keyword);
        let mut rows = join(&reviews, &doctors, self.options.join_mode);
        sort_by_doctor_name(&mut rows);
        rows
    }

    /// The full grouped projection, without pagination or highlighting.
    pub fn projection(&self) -> Vec<ProjectedRow> {
        group_headers(&self.query())
    }

    /// Navigation needs the page count, so run the query only if the
    /// criteria changed since the last one.
    fn ensure_total(&mut self) {
        if self.total_rows.is_none() {
            self.record_total(self.query().len());
        }
    }

    fn record_total(&mut self, total: usize) {
        self.total_rows = Some(total);
        self.paginator.set_total_rows(total);
    }

    pub fn render(&mut self) -> Result<ResultPage> {
        let joined = self.query();
        self.record_total(joined.len());

        let metrics = summarize(&joined);
        let projected = group_headers(&joined);
        let (page_rows, total_pages) = paginate(
            &projected,
            self.paginator.page_size(),
            self.paginator.current_page(),
        );

        // Filtering already succeeded; a keyword too large to compile only
        // costs the marks.
        let highlighter = Highlighter::with_markers(
            &self.criteria.keyword,
            &self.options.open_marker,
            &self.options.close_marker,
        )
        .inspect_err(|e| tracing::warn!("⚠️ Highlighting disabled for this keyword: {}", e))
        .ok()
        .filter(Highlighter::is_active);
        let rows: Vec<ProjectedRow> = page_rows
            .iter()
            .cloned()
            .map(|mut row| {
                if let Some(highlighter) = &highlighter {
                    row.text = row
                        .text
                        .map(|text| highlighter.highlight(&text).into_owned());
                }
                row
            })
            .collect();

        tracing::debug!(
            "Rendered page {}/{} with {} of {} rows",
            self.paginator.current_page(),
            total_pages,
            rows.len(),
            projected.len()
        );

        Ok(ResultPage {
            rows,
            page: self.paginator.current_page(),
            page_size: self.paginator.page_size(),
            total_pages,
            total_rows: projected.len(),
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Doctor, Review};

    fn store(reviews_per_doctor: usize) -> Arc<RecordStore> {
        let doctors: Vec<Doctor> = ["Борисов", "Алексеев"]
            .iter()
            .enumerate()
            .map(|(i, name)| Doctor {
                link: format!("/d/{}", i + 1),
                name: name.to_string(),
                specialty: "Терапевт".to_string(),
                degree: None,
                experience: 10 * (i as u32 + 1),
                rating: 4.0,
                review_count: reviews_per_doctor as u32,
                institutions: Vec::new(),
            })
            .collect();
        let reviews: Vec<Review> = doctors
            .iter()
            .flat_map(|d| {
                (0..reviews_per_doctor).map(move |n| Review {
                    link: d.link.clone(),
                    reviewer: format!("пациент {}", n),
                    date: "01.02.2024".to_string(),
                    text: Some(format!("Отзыв номер {} о враче", n)),
                    rating: Some(5.0),
                    booking_confirmed: n % 2 == 0,
                })
            })
            .collect();
        Arc::new(RecordStore::new(doctors, reviews).unwrap())
    }

    fn options(page_size: usize) -> ViewOptions {
        ViewOptions {
            page_size,
            ..ViewOptions::default()
        }
    }

    fn inner_options(page_size: usize) -> ViewOptions {
        ViewOptions {
            join_mode: JoinMode::Inner,
            ..options(page_size)
        }
    }

    #[test]
    fn test_render_first_page() {
        let mut session = Session::new(store(3), options(4));
        let page = session.render().unwrap();

        assert_eq!(page.total_rows, 6);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.rows.len(), 4);
        assert_eq!(page.rows[0].name, "Алексеев");
        assert!(page.rows[1].name.is_empty());
        assert_eq!(page.metrics.unique_doctors, 2);
    }

    #[test]
    fn test_keyword_highlights_page_rows() {
        let mut session = Session::new(store(2), options(10));
        session.update_criteria(|c| c.keyword = "номер 1".to_string());
        let page = session.render().unwrap();

        assert_eq!(page.total_rows, 2);
        for row in &page.rows {
            let text = row.text.as_deref().unwrap();
            assert!(text.contains("<mark>номер</mark>"), "{}", text);
            assert!(text.contains("<mark>1</mark>"), "{}", text);
        }
    }

    #[test]
    fn test_criteria_change_resets_page() {
        let mut session = Session::new(store(10), inner_options(5));
        assert_eq!(session.total_pages(), 4);
        assert!(session.next_page());
        assert!(session.next_page());
        assert_eq!(session.current_page(), 3);

        session.update_criteria(|c| c.min_experience = 15);
        assert_eq!(session.current_page(), 1);
        assert_eq!(session.total_pages(), 2);
    }

    #[test]
    fn test_keep_page_is_clamped() {
        let mut session = Session::new(store(10), inner_options(5));
        session.go_to_page(4);

        let criteria = FilterCriteria {
            min_experience: 15,
            ..FilterCriteria::default()
        };
        session.set_criteria_keep_page(criteria);
        let page = session.render().unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_left_join_keeps_reviews_of_filtered_doctors() {
        let mut session = Session::new(store(3), options(10));
        session.update_criteria(|c| c.min_experience = 15);
        let page = session.render().unwrap();

        assert_eq!(page.total_rows, 6);
        assert_eq!(page.rows[0].name, "Алексеев");
        assert!(page.rows[3..].iter().all(|r| r.experience.is_none()));
    }

    #[test]
    fn test_unchanged_criteria_keep_page() {
        let mut session = Session::new(store(10), options(5));
        session.next_page();
        session.update_criteria(|_| {});
        assert_eq!(session.current_page(), 2);
    }

    /// Tens of thousands of distinct Cyrillic terms: too large for the regex
    /// size limit once case-insensitive classes are expanded.
    fn oversized_keyword() -> String {
        const DIGITS: [char; 10] = ['а', 'б', 'в', 'г', 'д', 'е', 'ж', 'з', 'и', 'к'];
        (0..30_000usize)
            .map(|i| {
                let mut term = "врачебный".to_string();
                let mut k = i;
                loop {
                    term.push(DIGITS[k % 10]);
                    k /= 10;
                    if k == 0 {
                        break;
                    }
                }
                term
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_uncompilable_keyword_renders_without_marks() {
        let keyword = oversized_keyword();
        assert!(Highlighter::new(&keyword).is_err());

        let doctors = vec![Doctor {
            link: "/d/1".to_string(),
            name: "Алексеев".to_string(),
            specialty: "Терапевт".to_string(),
            degree: None,
            experience: 10,
            rating: 4.0,
            review_count: 1,
            institutions: Vec::new(),
        }];
        let reviews = vec![Review {
            link: "/d/1".to_string(),
            reviewer: "Анна".to_string(),
            date: "01.02.2024".to_string(),
            text: Some(keyword.clone()),
            rating: Some(5.0),
            booking_confirmed: true,
        }];
        let store = Arc::new(RecordStore::new(doctors, reviews).unwrap());
        let mut session = Session::new(store, options(10));
        session.update_criteria(|c| c.keyword = keyword.clone());

        let page = session.render().unwrap();
        assert_eq!(page.total_rows, 1);
        assert_eq!(page.rows[0].text.as_deref(), Some(keyword.as_str()));
        // the keyword stays and later renders keep working
        assert_eq!(session.criteria().keyword, keyword);
        session.go_to_page(2);
        assert!(session.render().is_ok());
    }

    #[test]
    fn test_each_interaction_queries_once() {
        let mut session = Session::new(store(10), options(5));
        session.render().unwrap();
        assert_eq!(session.query_runs.get(), 1);

        session.update_criteria(|c| c.keyword = "номер".to_string());
        session.render().unwrap();
        assert_eq!(session.query_runs.get(), 2);

        // paging over known results needs no new query
        session.next_page();
        session.render().unwrap();
        assert_eq!(session.query_runs.get(), 3);

        session.update_criteria(|c| c.min_experience = 15);
        assert_eq!(session.query_runs.get(), 3);
        session.go_to_page(9);
        assert_eq!(session.query_runs.get(), 4);
        assert_eq!(session.current_page(), 4);
    }

    #[test]
    fn test_empty_store_renders_single_empty_page() {
        let empty = Arc::new(RecordStore::new(Vec::new(), Vec::new()).unwrap());
        let mut session = Session::new(empty, ViewOptions::default());
        session.go_to_page(5);
        let page = session.render().unwrap();

        assert!(page.rows.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
    }
}
