//! Content items loaded from the site's data files.
//!
//! These are the shapes of the JSON records under `data/` and `blog/`. They
//! are deserialized once per page build and never mutated afterwards.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// A photograph in the gallery collection (`data/photos.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    /// Stable identifier, written by `folio catalog`. Older entries may lack it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Image filename relative to the images directory.
    pub file: String,
    pub title: String,
    /// Exactly one classification label.
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Photo {
    /// Caption shown in the lightbox: the description, or the category when
    /// there is none.
    pub fn caption(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(&self.category)
    }
}

/// Blog post metadata (`blog/posts.json`). The body lives in a separate
/// markdown file named by `file`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    /// ISO-8601 date or date-time.
    pub date: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Markdown filename under the posts directory.
    pub file: String,
}

impl Post {
    /// Parsed publication date, if `date` is a valid ISO-8601 date or
    /// RFC 3339 date-time.
    pub fn published(&self) -> Option<NaiveDate> {
        let raw = self.date.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
    }

    /// Long-form date such as "January 5, 2024". Falls back to the raw string.
    pub fn display_date(&self) -> String {
        match self.published() {
            Some(date) => date.format("%B %-d, %Y").to_string(),
            None => self.date.clone(),
        }
    }
}

/// An entry of `data/quotes.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
    #[serde(default)]
    pub source: String,
}
