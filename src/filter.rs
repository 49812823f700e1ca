//! Filter engine shared by the gallery and the blog listing.
//!
//! A filter key is either the sentinel `all` or one exact, case-sensitive
//! label. Photos match on their single category, posts on membership in their
//! tag set. Filtering returns a sub-sequence of the input: it never reorders,
//! never copies items, and applying the same key twice changes nothing.

use crate::types::{Photo, Post, Quote};
use std::fmt;

/// Sentinel accepted by [`FilterKey::parse`] for "show everything".
pub const ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterKey {
    All,
    Only(String),
}

impl FilterKey {
    pub fn parse(key: &str) -> Self {
        if key == ALL {
            FilterKey::All
        } else {
            FilterKey::Only(key.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FilterKey::All => ALL,
            FilterKey::Only(key) => key,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, FilterKey::All)
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Items that can be narrowed by a filter key.
pub trait Filterable {
    /// Exact match against a single key.
    fn matches(&self, key: &str) -> bool;

    /// Labels this item can be filtered by, in display order.
    fn filter_labels(&self) -> Vec<&str>;
}

impl Filterable for Photo {
    fn matches(&self, key: &str) -> bool {
        self.category == key
    }

    fn filter_labels(&self) -> Vec<&str> {
        vec![self.category.as_str()]
    }
}

impl Filterable for Post {
    fn matches(&self, key: &str) -> bool {
        self.tags.iter().any(|t| t == key)
    }

    fn filter_labels(&self) -> Vec<&str> {
        self.tags.iter().map(String::as_str).collect()
    }
}

impl Filterable for Quote {
    fn matches(&self, key: &str) -> bool {
        self.author == key
    }

    fn filter_labels(&self) -> Vec<&str> {
        vec![self.author.as_str()]
    }
}

/// Positions (into `items`) of the items visible under `key`.
pub fn visible_positions<T: Filterable>(items: &[T], key: &FilterKey) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| match key {
            FilterKey::All => true,
            FilterKey::Only(k) => item.matches(k),
        })
        .map(|(i, _)| i)
        .collect()
}

/// The visible subset under `key`, in input order.
pub fn filter<'a, T: Filterable>(items: &'a [T], key: &FilterKey) -> Vec<&'a T> {
    visible_positions(items, key)
        .into_iter()
        .map(|i| &items[i])
        .collect()
}

/// Distinct labels across `items`, in first-seen order.
pub fn filter_keys<T: Filterable>(items: &[T]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for label in items.iter().flat_map(|item| item.filter_labels()) {
        if !keys.iter().any(|k| k == label) {
            keys.push(label.to_string());
        }
    }
    keys
}

/// A row of filter buttons with exactly one active key.
#[derive(Debug, Clone)]
pub struct FilterBar {
    keys: Vec<FilterKey>,
    active: FilterKey,
}

impl FilterBar {
    /// Buttons for `all` followed by `keys`. Starts with `all` active.
    pub fn new(keys: impl IntoIterator<Item = String>) -> Self {
        let mut all = vec![FilterKey::All];
        for key in keys {
            let key = FilterKey::parse(&key);
            if !all.contains(&key) {
                all.push(key);
            }
        }
        Self {
            keys: all,
            active: FilterKey::All,
        }
    }

    pub fn keys(&self) -> &[FilterKey] {
        &self.keys
    }

    pub fn active(&self) -> &FilterKey {
        &self.active
    }

    pub fn is_active(&self, key: &FilterKey) -> bool {
        &self.active == key
    }

    /// Make `key` the only active filter. Returns false when it already was.
    pub fn select(&mut self, key: FilterKey) -> bool {
        if self.active == key {
            return false;
        }
        self.active = key;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(file: &str, category: &str) -> Photo {
        Photo {
            id: None,
            file: file.to_string(),
            title: file.to_string(),
            category: category.to_string(),
            description: None,
        }
    }

    fn post(id: &str, tags: &[&str]) -> Post {
        Post {
            id: id.to_string(),
            title: id.to_string(),
            date: "2024-01-01".to_string(),
            excerpt: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            file: format!("{id}.md"),
        }
    }

    fn sample_photos() -> Vec<Photo> {
        vec![photo("0", "A"), photo("1", "B"), photo("2", "A")]
    }

    fn files<'a>(photos: &[&'a Photo]) -> Vec<&'a str> {
        photos.iter().map(|p| p.file.as_str()).collect()
    }

    #[test]
    fn parse_recognises_sentinel() {
        assert_eq!(FilterKey::parse("all"), FilterKey::All);
        assert_eq!(FilterKey::parse("All"), FilterKey::Only("All".to_string()));
        assert_eq!(FilterKey::parse("street").as_str(), "street");
    }

    #[test]
    fn all_returns_everything_in_order() {
        let photos = sample_photos();
        assert_eq!(files(&filter(&photos, &FilterKey::All)), vec!["0", "1", "2"]);
    }

    #[test]
    fn category_filter_preserves_order() {
        let photos = sample_photos();
        let key = FilterKey::parse("A");
        assert_eq!(files(&filter(&photos, &key)), vec!["0", "2"]);
        assert_eq!(visible_positions(&photos, &key), vec![0, 2]);
    }

    #[test]
    fn filter_is_case_sensitive() {
        let photos = sample_photos();
        assert!(filter(&photos, &FilterKey::parse("a")).is_empty());
    }

    #[test]
    fn filter_is_idempotent() {
        let photos = sample_photos();
        let key = FilterKey::parse("A");
        let once: Vec<Photo> = filter(&photos, &key).into_iter().cloned().collect();
        let twice: Vec<Photo> = filter(&once, &key).into_iter().cloned().collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn tag_filter_matches_membership() {
        let posts = vec![
            post("rust", &["rust", "cli"]),
            post("none", &[]),
            post("aws", &["aws"]),
            post("both", &["aws", "rust"]),
        ];
        let hits: Vec<&str> = filter(&posts, &FilterKey::parse("rust"))
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(hits, vec!["rust", "both"]);
    }

    #[test]
    fn quotes_filter_by_author() {
        let quotes = vec![
            Quote {
                text: "a".to_string(),
                author: "Knuth".to_string(),
                source: String::new(),
            },
            Quote {
                text: "b".to_string(),
                author: "Hopper".to_string(),
                source: String::new(),
            },
        ];
        let hits = filter(&quotes, &FilterKey::parse("Hopper"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "b");
    }

    #[test]
    fn unknown_key_yields_nothing() {
        let photos = sample_photos();
        assert!(filter(&photos, &FilterKey::parse("Z")).is_empty());
    }

    #[test]
    fn filter_of_empty_collection_is_empty() {
        let photos: Vec<Photo> = vec![];
        assert!(filter(&photos, &FilterKey::All).is_empty());
    }

    #[test]
    fn filter_keys_first_seen_order() {
        let posts = vec![
            post("1", &["b", "a"]),
            post("2", &["c", "b"]),
            post("3", &[]),
        ];
        assert_eq!(filter_keys(&posts), vec!["b", "a", "c"]);
        assert_eq!(filter_keys(&sample_photos()), vec!["A", "B"]);
    }

    #[test]
    fn filter_bar_starts_on_all() {
        let bar = FilterBar::new(vec!["A".to_string(), "B".to_string()]);
        assert_eq!(bar.active(), &FilterKey::All);
        assert_eq!(bar.keys().len(), 3);
    }

    #[test]
    fn filter_bar_has_single_active_key() {
        let mut bar = FilterBar::new(vec!["A".to_string(), "B".to_string()]);
        assert!(bar.select(FilterKey::parse("A")));
        assert!(bar.select(FilterKey::parse("B")));
        let active: Vec<&FilterKey> = bar.keys().iter().filter(|k| bar.is_active(k)).collect();
        assert_eq!(active, vec![&FilterKey::parse("B")]);
        assert!(!bar.select(FilterKey::parse("B")));
    }

    #[test]
    fn filter_bar_dedupes_keys_and_sentinel() {
        let bar = FilterBar::new(vec!["A".to_string(), "all".to_string(), "A".to_string()]);
        assert_eq!(bar.keys(), &[FilterKey::All, FilterKey::parse("A")]);
    }
}
