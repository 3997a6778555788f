use crate::config::{API_BASE, EXPORT_PATH};
use crate::error::ValidationError;
use crate::{SelectorCategory, SelectorSelection};
use once_cell::sync::Lazy;
use regex::Regex;

// Loose URL pattern: optional scheme, dotted host with a 2-6 char TLD, optional path.
// Classes are spelled out as ASCII; `\d` and `\w` would also match non-ASCII digits and letters.
static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)?([0-9a-z.-]+)\.([a-z.]{2,6})([/A-Za-z0-9_ .-]*)*/?$").unwrap()
});

/// Visual validity state of an input (`is-valid` / `is-invalid`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputValidity {
    #[default]
    Valid,
    Invalid,
}

impl InputValidity {
    pub fn is_valid(self) -> bool {
        self == InputValidity::Valid
    }

    pub fn css_class(self) -> &'static str {
        match self {
            InputValidity::Valid => "is-valid",
            InputValidity::Invalid => "is-invalid",
        }
    }
}

/// Check a URL field value.
///
/// An empty field counts as valid: nothing has been attempted yet.
pub fn validate_url(input: &str) -> InputValidity {
    if input.is_empty() || URL_REGEX.is_match(input) {
        InputValidity::Valid
    } else {
        InputValidity::Invalid
    }
}

/// Gate for the scrape form submit.
pub fn check_submission(selection: &SelectorSelection) -> Result<(), ValidationError> {
    if selection.url.is_empty() || !validate_url(&selection.url).is_valid() {
        return Err(ValidationError::InvalidUrl);
    }
    if selection.selector_value.is_empty() {
        return Err(ValidationError::MissingSelectorValue);
    }
    Ok(())
}

/// Gate for the preview button. Same rules, different wording for a missing value.
pub fn check_preview(selection: &SelectorSelection) -> Result<(), ValidationError> {
    match check_submission(selection) {
        Err(ValidationError::MissingSelectorValue) => Err(ValidationError::MissingPreviewValue),
        other => other,
    }
}

/// Gate for the "Analyze URL" button.
pub fn check_analyze(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() || !validate_url(url).is_valid() {
        return Err(ValidationError::UrlRequired);
    }
    Ok(())
}

pub fn check_search_term(term: &str) -> Result<(), ValidationError> {
    if term.trim().is_empty() {
        Err(ValidationError::EmptySearchTerm)
    } else {
        Ok(())
    }
}

/// Help text shown under the selector type.
pub fn selector_help(category: SelectorCategory) -> &'static str {
    match category {
        SelectorCategory::Tag => {
            "Select from recommended HTML tags found on the page (e.g., div, a, p)."
        }
        SelectorCategory::Class => {
            "Select from important CSS classes identified on the page (e.g., container, nav-item)."
        }
        SelectorCategory::Id => {
            "Select from page IDs found during analysis (e.g., header, main-content)."
        }
        SelectorCategory::Css => {
            "Select from pre-defined CSS selectors to target specific content patterns."
        }
        SelectorCategory::Images => {
            "Extract all image links from the page. System will categorize by size and relevance."
        }
        SelectorCategory::Links => {
            "Extract all hyperlinks from the page. System will categorize by type (internal, external, etc)."
        }
        SelectorCategory::Robots => {
            "Analyze the robots.txt file and crawling permissions for this website."
        }
        SelectorCategory::Meta => {
            "Extract meta information like titles, descriptions, keywords, and Open Graph data."
        }
    }
}

pub fn export_url(format: &str, session_id: &str) -> String {
    format!("{}{}/{}/{}", API_BASE, EXPORT_PATH, format, session_id)
}

/// Milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
