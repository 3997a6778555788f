//! Selector value dropdown and the controller that keeps it in sync with the
//! selector type and the session cache.

use crate::cache::SessionCache;
use crate::config::{
    DEFAULT_IMAGE_OPTIONS, DEFAULT_LINK_OPTIONS, META_OPTIONS, ROBOTS_LABEL, ROBOTS_VALUE,
    SENTINEL_LABEL,
};
use crate::events::{EventEmitter, PageEvent};
use crate::utils::{selector_help, validate_url, InputValidity};
use crate::{SelectorCategory, SelectorOptions, SelectorSelection};
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

impl DropdownOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Option whose label doubles as its value.
    fn same(label: &str) -> Self {
        Self::new(label, label)
    }
}

/// A top-level `<option>` or an `<optgroup>` with its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropdownEntry {
    Choice(DropdownOption),
    Group {
        label: String,
        options: Vec<DropdownOption>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropdownState {
    #[default]
    Empty,
    Loading,
    Populated(SelectorCategory),
    Error,
}

/// Render model for the `selector_value` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValueDropdown {
    pub entries: Vec<DropdownEntry>,
    pub disabled: bool,
    pub state: DropdownState,
}

impl ValueDropdown {
    /// Value the browser selects after a repopulation: the first option.
    pub fn first_value(&self) -> String {
        self.options().next().map(|o| o.value.clone()).unwrap_or_default()
    }

    /// All options in document order, groups flattened.
    pub fn options(&self) -> impl Iterator<Item = &DropdownOption> {
        self.entries.iter().flat_map(|e| match e {
            DropdownEntry::Choice(o) => std::slice::from_ref(o).iter(),
            DropdownEntry::Group { options, .. } => options.iter(),
        })
    }

    fn placeholder(&mut self, label: &str, disabled: bool, state: DropdownState) {
        self.entries = vec![DropdownEntry::Choice(DropdownOption::new(label, ""))];
        self.disabled = disabled;
        self.state = state;
    }
}

/// Build the dropdown contents for `category`.
///
/// `robots` is a single fixed option. Every other category starts with the
/// empty sentinel, followed by the recommended group or an empty-state entry.
pub fn build_entries(
    category: SelectorCategory,
    options: Option<&SelectorOptions>,
) -> Vec<DropdownEntry> {
    let values: Vec<DropdownOption> = match category {
        SelectorCategory::Robots => {
            return vec![DropdownEntry::Choice(DropdownOption::new(
                ROBOTS_LABEL,
                ROBOTS_VALUE,
            ))];
        }
        SelectorCategory::Meta => META_OPTIONS.iter().map(|s| DropdownOption::same(s)).collect(),
        _ => {
            let found = options.map(|o| o.values(category)).unwrap_or(&[]);
            if !found.is_empty() {
                found.iter().map(|s| DropdownOption::same(s)).collect()
            } else {
                match category {
                    SelectorCategory::Images => {
                        DEFAULT_IMAGE_OPTIONS.iter().map(|s| DropdownOption::same(s)).collect()
                    }
                    SelectorCategory::Links => {
                        DEFAULT_LINK_OPTIONS.iter().map(|s| DropdownOption::same(s)).collect()
                    }
                    _ => Vec::new(),
                }
            }
        }
    };

    let description = category.description();
    let mut entries = vec![DropdownEntry::Choice(DropdownOption::new(SENTINEL_LABEL, ""))];
    if values.is_empty() {
        entries.push(DropdownEntry::Choice(DropdownOption::new(
            format!("No {} found", description.to_lowercase()),
            "",
        )));
    } else {
        entries.push(DropdownEntry::Group {
            label: format!("Recommended {}", description),
            options: values,
        });
    }
    entries
}

#[derive(Debug, Default)]
struct FormState {
    category: SelectorCategory,
    selected_value: String,
    url: String,
    url_validity: InputValidity,
    url_checked: bool,
    dropdown: ValueDropdown,
}

/// Binds the selector type to the cached options. Clones share state.
#[derive(Clone)]
pub struct SelectorFormController {
    state: Rc<RefCell<FormState>>,
    cache: Rc<RefCell<SessionCache>>,
    events: EventEmitter<PageEvent>,
}

impl SelectorFormController {
    pub fn new(cache: Rc<RefCell<SessionCache>>, events: EventEmitter<PageEvent>) -> Self {
        Self {
            state: Rc::new(RefCell::new(FormState::default())),
            cache,
            events,
        }
    }

    /// Record a selector type change and repopulate from the cache.
    ///
    /// While a fetch is pending only the category is recorded; the response
    /// populates for whichever category is current when it lands.
    pub fn on_type_change(&self, category: SelectorCategory) {
        self.state.borrow_mut().category = category;
        if self.cache.borrow().is_loading() && category != SelectorCategory::Robots {
            debug!("type changed to {category} during fetch, deferring population");
            return;
        }
        let options = self.cache.borrow().current();
        self.populate(category, options.as_deref());
    }

    /// Replace the dropdown contents for `category` and re-enable it.
    pub fn populate(&self, category: SelectorCategory, options: Option<&SelectorOptions>) {
        {
            let mut st = self.state.borrow_mut();
            st.dropdown.entries = build_entries(category, options);
            st.dropdown.disabled = false;
            st.dropdown.state = DropdownState::Populated(category);
            st.selected_value = st.dropdown.first_value();
        }
        self.events.emit(&PageEvent::DropdownChanged);
    }

    /// Populate for the current category from the given options.
    pub fn populate_current(&self, options: &SelectorOptions) {
        let category = self.category();
        self.populate(category, Some(options));
    }

    /// Disable the dropdown behind a loading placeholder.
    pub fn begin_loading(&self, placeholder: &str) {
        self.set_placeholder(placeholder, true, DropdownState::Loading);
    }

    /// Re-enable the dropdown behind an error placeholder.
    pub fn fail(&self, placeholder: &str) {
        self.set_placeholder(placeholder, false, DropdownState::Error);
    }

    fn set_placeholder(&self, label: &str, disabled: bool, state: DropdownState) {
        {
            let mut st = self.state.borrow_mut();
            st.dropdown.placeholder(label, disabled, state);
            st.selected_value.clear();
        }
        self.events.emit(&PageEvent::DropdownChanged);
    }

    /// Update the URL field and its validity styling. Returns whether the
    /// value is acceptable.
    pub fn set_url(&self, url: &str) -> bool {
        let validity = validate_url(url);
        {
            let mut st = self.state.borrow_mut();
            st.url = url.to_string();
            st.url_validity = validity;
            st.url_checked = true;
        }
        self.events.emit(&PageEvent::UrlValidityChanged);
        validity.is_valid()
    }

    pub fn select_value(&self, value: &str) {
        self.state.borrow_mut().selected_value = value.to_string();
    }

    pub fn category(&self) -> SelectorCategory {
        self.state.borrow().category
    }

    pub fn help_text(&self) -> &'static str {
        selector_help(self.category())
    }

    pub fn url_validity(&self) -> InputValidity {
        self.state.borrow().url_validity
    }

    /// Validity class for the URL field: none before the first change, then
    /// `is-valid`/`is-invalid`, including `is-valid` for a cleared field.
    pub fn url_class(&self) -> Option<&'static str> {
        let st = self.state.borrow();
        st.url_checked.then(|| st.url_validity.css_class())
    }

    pub fn dropdown(&self) -> ValueDropdown {
        self.state.borrow().dropdown.clone()
    }

    pub fn selection(&self) -> SelectorSelection {
        let st = self.state.borrow();
        SelectorSelection {
            selector_type: st.category,
            selector_value: st.selected_value.clone(),
            url: st.url.clone(),
        }
    }
}
