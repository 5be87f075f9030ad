use serde::{Deserialize, Serialize};

/// Parameters sent with every list fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListQuery {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            status: None,
            search: None,
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = normalized(Some(status.into()));
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = normalized(Some(search.into()));
        self
    }

    /// Query-string pairs; unset filters are omitted.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(status) = &self.status {
            pairs.push(("status".to_string(), status.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        pairs
    }
}

fn normalized(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Filter and page selection for one list view.
///
/// Filters combine with AND. Changing any filter returns to page 1; moving
/// between pages leaves every filter as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    query: ListQuery,
    category: Option<String>,
}

impl FilterState {
    pub fn new(limit: u32) -> Self {
        Self {
            query: ListQuery::new(limit),
            category: None,
        }
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.query.page
    }

    pub fn status(&self) -> Option<&str> {
        self.query.status.as_deref()
    }

    pub fn search(&self) -> Option<&str> {
        self.query.search.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn set_page(&mut self, page: u32) {
        self.query.page = page.max(1);
    }

    pub fn set_limit(&mut self, limit: u32) {
        let limit = limit.max(1);
        if self.query.limit != limit {
            self.query.limit = limit;
            self.query.page = 1;
        }
    }

    pub fn set_status(&mut self, status: Option<&str>) {
        self.query.status = normalized(status.map(str::to_string));
        self.query.page = 1;
    }

    pub fn set_search(&mut self, search: Option<&str>) {
        self.query.search = normalized(search.map(str::to_string));
        self.query.page = 1;
    }

    /// Category narrows the loaded page locally; it is not sent to the server.
    pub fn set_category(&mut self, category: Option<&str>) {
        self.category = normalized(category.map(str::to_string));
        self.query.page = 1;
    }

    pub fn clear(&mut self) {
        self.query.status = None;
        self.query.search = None;
        self.category = None;
        self.query.page = 1;
    }

    pub fn matches_category(&self, category: Option<&str>) -> bool {
        match (&self.category, category) {
            (None, _) => true,
            (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual.trim()),
            (Some(_), None) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changing_page_keeps_filters() {
        let mut filters = FilterState::new(20);
        filters.set_status(Some("pending"));
        filters.set_search(Some("ana"));
        filters.set_page(3);

        assert_eq!(filters.page(), 3);
        assert_eq!(filters.status(), Some("pending"));
        assert_eq!(filters.search(), Some("ana"));
    }

    #[test]
    fn changing_any_filter_resets_page() {
        let mut filters = FilterState::new(20);

        filters.set_page(4);
        filters.set_status(Some("approved"));
        assert_eq!(filters.page(), 1);

        filters.set_page(4);
        filters.set_search(Some("lee"));
        assert_eq!(filters.page(), 1);
        assert_eq!(filters.status(), Some("approved"));

        filters.set_page(4);
        filters.set_category(Some("family"));
        assert_eq!(filters.page(), 1);
        assert_eq!(filters.search(), Some("lee"));

        filters.set_page(4);
        filters.set_limit(50);
        assert_eq!(filters.page(), 1);
    }

    #[test]
    fn blank_filters_are_unset() {
        let mut filters = FilterState::new(20);
        filters.set_search(Some("   "));
        assert_eq!(filters.search(), None);
        assert_eq!(
            filters.query().pairs(),
            vec![
                ("page".to_string(), "1".to_string()),
                ("limit".to_string(), "20".to_string())
            ]
        );
    }

    #[test]
    fn category_match_is_case_insensitive() {
        let mut filters = FilterState::new(20);
        assert!(filters.matches_category(None));
        filters.set_category(Some("Family Therapy"));
        assert!(filters.matches_category(Some("family therapy")));
        assert!(!filters.matches_category(Some("grief")));
        assert!(!filters.matches_category(None));
    }
}
