//! Pure Yew view components for the scraper UI.
//!
//! Components here render from props only; state lives in the page session
//! and the hooks that drive it.

use crate::hooks::use_clipboard;
use scraper_ui::api::ScrapedItem;
use scraper_ui::dropdown::{DropdownEntry, DropdownOption, ValueDropdown};
use scraper_ui::feedback::{FeedbackController, Notification, NotificationId};
use scraper_ui::view::ViewLayout;
use scraper_ui::ViewPreference;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

/// Stacked, dismissible alerts.
#[derive(Properties, PartialEq)]
pub struct NotificationRegionProps {
    pub notifications: Vec<Notification>,
    pub on_dismiss: Callback<NotificationId>,
}

#[function_component(NotificationRegion)]
pub fn notification_region(props: &NotificationRegionProps) -> Html {
    html! {
        <div id="alert_container" class="alert-container">
            { props.notifications.iter().map(|n| {
                let id = n.id;
                let on_dismiss = props.on_dismiss.reform(move |_: MouseEvent| id);
                html! {
                    <div key={n.id} class={n.css_class()} role="alert">
                        { &n.message }
                        <button type="button" class="btn-close" aria-label="Close" onclick={on_dismiss}></button>
                    </div>
                }
            }).collect::<Html>() }
        </div>
    }
}

/// Full-page busy indicator.
#[derive(Properties, PartialEq)]
pub struct LoadingOverlayProps {
    pub class: &'static str,
    pub message: Option<String>,
}

#[function_component(LoadingOverlay)]
pub fn loading_overlay(props: &LoadingOverlayProps) -> Html {
    html! {
        <div class={props.class}>
            <div class="spinner-border text-light" role="status"></div>
            <p>{ props.message.clone().unwrap_or_default() }</p>
        </div>
    }
}

fn render_option(option: &DropdownOption, selected: &str) -> Html {
    html! {
        <option value={option.value.clone()} selected={option.value == selected}>
            { &option.label }
        </option>
    }
}

/// The dependent `selector_value` dropdown.
#[derive(Properties, PartialEq)]
pub struct SelectorValueSelectProps {
    pub dropdown: ValueDropdown,
    pub selected: String,
    pub onchange: Callback<String>,
}

#[function_component(SelectorValueSelect)]
pub fn selector_value_select(props: &SelectorValueSelectProps) -> Html {
    let onchange = props.onchange.reform(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        select.value()
    });
    let selected = props.selected.as_str();

    html! {
        <select id="selector_value" name="selector_value" class="form-select"
            disabled={props.dropdown.disabled}
            {onchange}>
            { props.dropdown.entries.iter().map(|entry| match entry {
                DropdownEntry::Choice(option) => render_option(option, selected),
                DropdownEntry::Group { label, options } => html! {
                    <optgroup label={label.clone()}>
                        { options.iter().map(|o| render_option(o, selected)).collect::<Html>() }
                    </optgroup>
                },
            }).collect::<Html>() }
        </select>
    }
}

#[derive(Properties, PartialEq)]
pub struct ViewToggleProps {
    pub layout: ViewLayout,
    pub onselect: Callback<ViewPreference>,
}

#[function_component(ViewToggle)]
pub fn view_toggle(props: &ViewToggleProps) -> Html {
    html! {
        <div class="btn-group" role="group">
            <button id="table_view_btn" type="button" data-view="table"
                class={ViewLayout::button_class(props.layout.table_button_active)}
                onclick={props.onselect.reform(|_: MouseEvent| ViewPreference::Table)}>
                { "Table" }
            </button>
            <button id="card_view_btn" type="button" data-view="card"
                class={ViewLayout::button_class(props.layout.card_button_active)}
                onclick={props.onselect.reform(|_: MouseEvent| ViewPreference::Card)}>
                { "Cards" }
            </button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct CopyButtonProps {
    pub text: AttrValue,
    pub feedback: FeedbackController,
}

#[function_component(CopyButton)]
pub fn copy_button(props: &CopyButtonProps) -> Html {
    let (copied, copy) = use_clipboard(props.feedback.clone());
    let text = props.text.to_string();
    html! {
        <button type="button" class="btn btn-sm btn-outline-secondary copy-content"
            onclick={copy.reform(move |_: MouseEvent| text.clone())}>
            { if copied { "Copied!" } else { "Copy" } }
        </button>
    }
}

fn item_content(item: &ScrapedItem) -> &str {
    item.content.as_deref().unwrap_or("")
}

fn item_type(item: &ScrapedItem) -> &str {
    item.element_type.as_deref().unwrap_or("unknown")
}

/// Table view of the visible items.
pub fn render_items_table(items: &[ScrapedItem], visible: &[usize], shown: bool) -> Html {
    html! {
        <div id="table_view" class={ViewLayout::container_class(shown)}>
            <table class="table table-striped">
                <thead>
                    <tr>
                        <th>{ "#" }</th>
                        <th>{ "Type" }</th>
                        <th>{ "Content" }</th>
                    </tr>
                </thead>
                <tbody>
                    { visible.iter().map(|&i| {
                        let item = &items[i];
                        html! {
                            <tr class="data-item">
                                <td>{ i + 1 }</td>
                                <td><code>{ item_type(item) }</code></td>
                                <td class="item-content">{ item_content(item) }</td>
                            </tr>
                        }
                    }).collect::<Html>() }
                </tbody>
            </table>
        </div>
    }
}

/// Card view of the visible items, each with a copy button.
pub fn render_items_cards(
    items: &[ScrapedItem],
    visible: &[usize],
    shown: bool,
    feedback: &FeedbackController,
) -> Html {
    html! {
        <div id="card_view" class={classes!("row", ViewLayout::container_class(shown))}>
            { visible.iter().map(|&i| {
                let item = &items[i];
                let content = item_content(item).to_string();
                html! {
                    <div class="col-md-6 mb-3 data-item">
                        <div class="card">
                            <div class="card-header d-flex justify-content-between">
                                <code>{ item_type(item) }</code>
                                <CopyButton text={content.clone()} feedback={feedback.clone()} />
                            </div>
                            <div class="card-body item-content">{ content }</div>
                        </div>
                    </div>
                }
            }).collect::<Html>() }
        </div>
    }
}
