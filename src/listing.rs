//! The shared listing pipeline: every resource funnels its collection through
//! the same parse-filters → AND predicates → sort → offset-paginate steps, so
//! the eight content types behave identically instead of each hand-rolling the
//! sequence.

use serde::{Deserialize, Serialize};

/// Page size for visitor-facing listings.
pub const PUBLIC_PAGE_SIZE: i64 = 12;
/// Page size for admin listings.
pub const ADMIN_PAGE_SIZE: i64 = 20;
/// How many "related" items a detail page carries.
pub const RELATED_LIMIT: usize = 3;

/// The bag of optional string-valued filters a listing endpoint accepts.
/// Filters are best-effort: an unrecognized value matches nothing rather than
/// failing the request.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub period: Option<String>,
    pub year: Option<String>,
    pub featured: Option<String>,
    pub rating: Option<String>,
    #[serde(skip_serializing)]
    pub page: Option<i64>,
}

impl ListQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn featured_filter(&self) -> FeaturedFilter {
        FeaturedFilter::from_param(self.featured.as_deref())
    }

    pub fn active_filter(&self) -> ActiveFilter {
        ActiveFilter::from_param(self.status.as_deref())
    }
}

/// Tri-state `featured` filter. Absence of the parameter is its own state and
/// must not collapse into "no".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeaturedFilter {
    Any,
    Only,
    Exclude,
}

impl FeaturedFilter {
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("yes") => FeaturedFilter::Only,
            Some("no") => FeaturedFilter::Exclude,
            _ => FeaturedFilter::Any,
        }
    }

    pub fn admits(self, is_featured: bool) -> bool {
        match self {
            FeaturedFilter::Any => true,
            FeaturedFilter::Only => is_featured,
            FeaturedFilter::Exclude => !is_featured,
        }
    }
}

/// Tri-state `status` filter over a resource's `is_active` flag, for admin
/// listings. The public surface scopes to active rows unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveFilter {
    Any,
    Active,
    Inactive,
}

impl ActiveFilter {
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("active") => ActiveFilter::Active,
            Some("inactive") => ActiveFilter::Inactive,
            _ => ActiveFilter::Any,
        }
    }

    pub fn admits(self, is_active: bool) -> bool {
        match self {
            ActiveFilter::Any => true,
            ActiveFilter::Active => is_active,
            ActiveFilter::Inactive => !is_active,
        }
    }
}

/// A conjunction of predicates over one resource type. Each combinator is a
/// no-op when its parameter is absent or empty, so the set only ever narrows
/// for filters the caller actually supplied.
pub struct FilterSet<T> {
    predicates: Vec<Box<dyn Fn(&T) -> bool + Send + Sync>>,
}

impl<T> Default for FilterSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FilterSet<T> {
    pub fn new() -> Self {
        Self { predicates: Vec::new() }
    }

    /// Case-insensitive substring search, OR'd across the resource's
    /// searchable text fields.
    pub fn search<F>(mut self, term: Option<&str>, haystacks: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Vec<&'a str> + Send + Sync + 'static,
    {
        if let Some(term) = term.filter(|t| !t.trim().is_empty()) {
            let needle = term.to_lowercase();
            self.predicates.push(Box::new(move |item| {
                haystacks(item)
                    .iter()
                    .any(|haystack| haystack.to_lowercase().contains(&needle))
            }));
        }
        self
    }

    /// Exact equality against an enum-valued field; absent means no filter.
    pub fn equals<F>(mut self, value: Option<&str>, key: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            let wanted = value.to_string();
            self.predicates.push(Box::new(move |item| key(item) == wanted));
        }
        self
    }

    pub fn featured<F>(mut self, filter: FeaturedFilter, flag: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        if filter != FeaturedFilter::Any {
            self.predicates.push(Box::new(move |item| filter.admits(flag(item))));
        }
        self
    }

    pub fn active<F>(mut self, filter: ActiveFilter, flag: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        if filter != ActiveFilter::Any {
            self.predicates.push(Box::new(move |item| filter.admits(flag(item))));
        }
        self
    }

    /// Unconditional predicate, used for visibility scoping on public
    /// listings.
    pub fn require<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.predicates.push(Box::new(predicate));
        self
    }

    pub fn matches(&self, item: &T) -> bool {
        self.predicates.iter().all(|predicate| predicate(item))
    }

    pub fn apply(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().filter(|item| self.matches(item)).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

/// Offset pagination over an already-filtered, already-sorted collection.
pub fn paginate<T>(items: Vec<T>, page: i64, per_page: i64) -> Page<T> {
    let page = page.max(1);
    let total = items.len() as i64;
    let total_pages = (total + per_page - 1) / per_page;
    let offset = ((page - 1) * per_page) as usize;
    let items = items
        .into_iter()
        .skip(offset)
        .take(per_page as usize)
        .collect();

    Page { items, total, page, per_page, total_pages }
}

/// A page of results plus the filter state that produced it, echoed back so
/// the caller can re-render its controls.
#[derive(Debug, Serialize)]
pub struct Listing<T> {
    #[serde(flatten)]
    pub page: Page<T>,
    pub filters: ListQuery,
}

impl<T> Listing<T> {
    pub fn new(page: Page<T>, filters: &ListQuery) -> Self {
        Self { page, filters: filters.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        title: String,
        category: String,
        featured: bool,
    }

    fn items() -> Vec<Item> {
        vec![
            Item { title: "Science fair".into(), category: "academic".into(), featured: true },
            Item { title: "Beach cleanup".into(), category: "volunteer".into(), featured: false },
            Item { title: "Chess open".into(), category: "competition".into(), featured: true },
        ]
    }

    #[test]
    fn featured_filter_is_three_way() {
        assert_eq!(FeaturedFilter::from_param(None), FeaturedFilter::Any);
        assert_eq!(FeaturedFilter::from_param(Some("yes")), FeaturedFilter::Only);
        assert_eq!(FeaturedFilter::from_param(Some("no")), FeaturedFilter::Exclude);
        // Unrecognized values fall back to no filter rather than erroring.
        assert_eq!(FeaturedFilter::from_param(Some("maybe")), FeaturedFilter::Any);

        assert!(FeaturedFilter::Any.admits(true));
        assert!(FeaturedFilter::Any.admits(false));
        assert!(FeaturedFilter::Only.admits(true));
        assert!(!FeaturedFilter::Only.admits(false));
        assert!(!FeaturedFilter::Exclude.admits(true));
        assert!(FeaturedFilter::Exclude.admits(false));
    }

    #[test]
    fn active_filter_is_three_way() {
        assert_eq!(ActiveFilter::from_param(None), ActiveFilter::Any);
        assert_eq!(ActiveFilter::from_param(Some("active")), ActiveFilter::Active);
        assert_eq!(ActiveFilter::from_param(Some("inactive")), ActiveFilter::Inactive);
        assert_eq!(ActiveFilter::from_param(Some("archived")), ActiveFilter::Any);

        assert!(ActiveFilter::Active.admits(true));
        assert!(!ActiveFilter::Active.admits(false));
        assert!(!ActiveFilter::Inactive.admits(true));
        assert!(ActiveFilter::Inactive.admits(false));
    }

    #[test]
    fn predicates_are_anded() {
        let set = FilterSet::new()
            .search(Some("e"), |item: &Item| vec![item.title.as_str()])
            .featured(FeaturedFilter::Only, |item| item.featured);
        let matched = set.apply(items());
        assert_eq!(matched.len(), 2);
        assert!(matched.iter().all(|item| item.featured));
    }

    #[test]
    fn unknown_enum_value_matches_nothing() {
        let set = FilterSet::new().equals(Some("athletics"), |item: &Item| item.category.clone());
        assert!(set.apply(items()).is_empty());
    }

    #[test]
    fn empty_search_is_no_filter() {
        let set = FilterSet::new().search(Some("   "), |item: &Item| vec![item.title.as_str()]);
        assert_eq!(set.apply(items()).len(), 3);
    }

    #[test]
    fn pagination_math() {
        let page = paginate((0..25).collect::<Vec<_>>(), 2, 12);
        assert_eq!(page.items, (12..24).collect::<Vec<_>>());
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);

        let past_end = paginate(vec![1, 2, 3], 5, 12);
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 3);
    }
}
