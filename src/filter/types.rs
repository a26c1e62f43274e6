use serde::Serialize;

/// Optional-field filter narrowing a catalog query. Absent fields impose no
/// constraint; present fields are ANDed together.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_year: Option<i32>,
}

impl GameFilters {
    pub fn is_empty(&self) -> bool {
        self.keyword.is_none()
            && self.genre.is_none()
            && self.platform.is_none()
            && self.min_rating.is_none()
            && self.max_price.is_none()
            && self.in_stock.is_none()
            && self.min_year.is_none()
            && self.max_year.is_none()
    }
}

/// Sortable columns, keyed by their wire names. Unknown names fall back to
/// the caller's default so user input never reaches an ORDER BY clause.
const SORTABLE: &[(&str, &str)] = &[
    ("title", "title"),
    ("genre", "genre"),
    ("publisher", "publisher"),
    ("rating", "rating"),
    ("price", "price"),
    ("releaseYear", "release_year"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
];

pub fn resolve_sort_column(sort_by: Option<&str>, default: &'static str) -> &'static str {
    sort_by
        .and_then(|name| {
            SORTABLE
                .iter()
                .find(|(wire, _)| *wire == name)
                .map(|(_, column)| *column)
        })
        .unwrap_or(default)
}
