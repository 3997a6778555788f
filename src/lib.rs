//! Browser-side UI core for the web scraper.
//!
//! Everything in this library is headless: the page session, the selector
//! dropdown model, notifications and the view preference are plain Rust state
//! that the Yew front-end in `main.rs` renders and drives. Network and storage
//! sit behind the [`api::Backend`] and [`view::PreferenceStorage`] traits so the
//! whole cycle can be exercised without a live page.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod dropdown;
pub mod error;
pub mod events;
pub mod feedback;
pub mod session;
pub mod utils;
pub mod view;
pub mod visualization;

pub use error::{UiError, ValidationError};

/// One of the fixed extraction modes offered by the scrape form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorCategory {
    #[default]
    Tag,
    Class,
    Id,
    Css,
    Images,
    Links,
    Robots,
    Meta,
}

impl SelectorCategory {
    pub const ALL: [SelectorCategory; 8] = [
        SelectorCategory::Tag,
        SelectorCategory::Class,
        SelectorCategory::Id,
        SelectorCategory::Css,
        SelectorCategory::Images,
        SelectorCategory::Links,
        SelectorCategory::Robots,
        SelectorCategory::Meta,
    ];

    /// Form value, as posted in `selector_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            SelectorCategory::Tag => "tag",
            SelectorCategory::Class => "class",
            SelectorCategory::Id => "id",
            SelectorCategory::Css => "css",
            SelectorCategory::Images => "images",
            SelectorCategory::Links => "links",
            SelectorCategory::Robots => "robots",
            SelectorCategory::Meta => "meta",
        }
    }

    /// Human label shown in the selector type dropdown.
    pub fn label(self) -> &'static str {
        match self {
            SelectorCategory::Tag => "HTML Tag",
            SelectorCategory::Class => "CSS Class",
            SelectorCategory::Id => "Element ID",
            SelectorCategory::Css => "CSS Selector",
            SelectorCategory::Images => "Images",
            SelectorCategory::Links => "Links",
            SelectorCategory::Robots => "Robots.txt",
            SelectorCategory::Meta => "Meta Information",
        }
    }

    /// Noun used in "Recommended ..." group labels and empty-state messages.
    pub fn description(self) -> &'static str {
        match self {
            SelectorCategory::Tag => "HTML Tags",
            SelectorCategory::Class => "CSS Classes",
            SelectorCategory::Id => "Element IDs",
            SelectorCategory::Css => "CSS Selectors",
            SelectorCategory::Images => "Image Types",
            SelectorCategory::Links => "Link Types",
            SelectorCategory::Robots => "Robots Rules",
            SelectorCategory::Meta => "Meta Information",
        }
    }
}

impl fmt::Display for SelectorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SelectorCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SelectorCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}

/// Page-structure metadata returned by the backend for one URL.
///
/// Missing keys decode as empty lists. Once stored in the session cache the
/// value is shared behind an `Rc` and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorOptions {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub classes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ids: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub css: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub links: Vec<String>,
}

// The backend may send `null` for a category it found nothing for.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl SelectorOptions {
    /// Labels discovered for `category`. `robots` and `meta` are never
    /// reported by the backend and always come back empty.
    pub fn values(&self, category: SelectorCategory) -> &[String] {
        match category {
            SelectorCategory::Tag => &self.tags,
            SelectorCategory::Class => &self.classes,
            SelectorCategory::Id => &self.ids,
            SelectorCategory::Css => &self.css,
            SelectorCategory::Images => &self.images,
            SelectorCategory::Links => &self.links,
            SelectorCategory::Robots | SelectorCategory::Meta => &[],
        }
    }
}

/// Display mode of the scraped-items page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewPreference {
    #[default]
    Table,
    Card,
}

impl ViewPreference {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewPreference::Table => "table",
            ViewPreference::Card => "card",
        }
    }

    /// Parse a stored value. Anything unrecognized falls back to `Table`.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("card") => ViewPreference::Card,
            _ => ViewPreference::Table,
        }
    }
}

/// Severity of a notification, mapped onto `alert-<severity>` classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        }
    }
}

/// The user's current extraction intent, as read from the live form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorSelection {
    pub selector_type: SelectorCategory,
    pub selector_value: String,
    pub url: String,
}
