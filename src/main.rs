//! Scraper front-end built with Yew.
//! Wires the page session, hooks and components into the scrape form page
//! and the session visualization page.

use gloo_timers::future::TimeoutFuture;
use log::{debug, error, warn};
use scraper_ui::api::{Backend, HttpBackend, SessionData};
use scraper_ui::config::{
    CHART_ERROR_MESSAGE, CONTENT_LENGTH_CANVAS, ELEMENT_TYPE_CANVAS, PREVIEW_SUBMIT_DELAY_MS,
    SCRAPE_ACTION, SEARCH_ACTION, SESSION_QUERY_PARAM,
};
use scraper_ui::events::{EventEmitter, PageEvent};
use scraper_ui::feedback::{FeedbackController, NotificationId};
use scraper_ui::utils::{check_search_term, export_url};
use scraper_ui::view::ViewLayout;
use scraper_ui::visualization::{
    content_length_histogram, element_type_counts, filter_items, filter_summary, ExportFormat,
};
use scraper_ui::SelectorCategory;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlFormElement, HtmlInputElement, HtmlSelectElement, UrlSearchParams};
use yew::prelude::*;

mod chart;
mod components;
mod hooks;

use chart::{draw_content_length_chart, draw_element_type_chart};
use components::{
    render_items_cards, render_items_table, LoadingOverlay, NotificationRegion,
    SelectorValueSelect, ViewToggle,
};
use hooks::{
    use_notification_sweeper, use_page_events, use_page_session, use_scroll_lock,
    use_view_preference,
};

/// Scrape form with URL analysis and the dependent selector dropdown.
#[function_component(ScrapePage)]
fn scrape_page() -> Html {
    let session = use_page_session();
    use_page_events(session.events().clone());
    use_notification_sweeper(session.feedback().clone(), session.events().clone());
    use_scroll_lock(session.feedback().scroll_locked());

    let url_ref = use_node_ref();
    let form_ref = use_node_ref();
    let previewing = use_state(|| false);

    let form = session.form();
    let feedback = session.feedback();
    let selection = form.selection();
    let category = form.category();

    let on_url_change = {
        let session = session.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let session = session.clone();
            spawn_local(async move {
                if let Some(outcome) = session.on_url_change(&input.value()).await {
                    debug!("selector options: {:?}", outcome);
                }
            });
        })
    };

    let on_analyze = {
        let session = session.clone();
        let url_ref = url_ref.clone();
        Callback::from(move |_: MouseEvent| {
            let url = url_ref
                .cast::<HtmlInputElement>()
                .map(|input| input.value())
                .unwrap_or_default();
            let session = session.clone();
            spawn_local(async move {
                if let Err(e) = session.on_analyze(&url).await {
                    debug!("analyze rejected: {}", e);
                }
            });
        })
    };

    let on_type_change = {
        let session = session.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            match select.value().parse::<SelectorCategory>() {
                Ok(category) => session.on_type_change(category),
                Err(e) => warn!("{}", e),
            }
        })
    };

    let on_value_change = {
        let session = session.clone();
        Callback::from(move |value: String| session.form().select_value(&value))
    };

    let on_submit = {
        let session = session.clone();
        Callback::from(move |e: SubmitEvent| {
            if session.on_submit().is_err() {
                e.prevent_default();
            }
        })
    };

    let on_preview = {
        let session = session.clone();
        let form_ref = form_ref.clone();
        let previewing = previewing.clone();
        Callback::from(move |_: MouseEvent| {
            if session.on_preview().is_err() {
                return;
            }
            previewing.set(true);
            let form_ref = form_ref.clone();
            spawn_local(async move {
                TimeoutFuture::new(PREVIEW_SUBMIT_DELAY_MS).await;
                match form_ref.cast::<HtmlFormElement>() {
                    Some(form) => {
                        if let Err(e) = form.submit() {
                            error!("scrape form submit failed: {:?}", e);
                        }
                    }
                    None => warn!("scrape form is not mounted"),
                }
            });
        })
    };

    let on_dismiss = {
        let feedback = feedback.clone();
        Callback::from(move |id: NotificationId| {
            feedback.dismiss(id);
        })
    };

    let url_class = classes!("form-control", form.url_class());

    html! {
        <div class="container py-4">
            <NotificationRegion notifications={feedback.notifications()} {on_dismiss} />
            <LoadingOverlay class={feedback.overlay_class()} message={feedback.busy_message()} />

            <form id="scrape_form" ref={form_ref} action={SCRAPE_ACTION} method="post"
                onsubmit={on_submit}>
                <div class="mb-3">
                    <label for="url" class="form-label">{ "Website URL" }</label>
                    <div class="input-group">
                        <input id="url" name="url" type="text" class={url_class}
                            ref={url_ref}
                            placeholder="https://example.com"
                            onchange={on_url_change} />
                        <button id="analyze_url_btn" type="button" class="btn btn-outline-primary"
                            disabled={feedback.is_busy()}
                            onclick={on_analyze}>
                            { "Analyze URL" }
                        </button>
                    </div>
                </div>

                <div class="mb-3">
                    <label for="selector_type" class="form-label">{ "Selector Type" }</label>
                    <select id="selector_type" name="selector_type" class="form-select"
                        onchange={on_type_change}>
                        { for SelectorCategory::ALL.iter().map(|c| html! {
                            <option value={c.as_str()} selected={*c == category}>{ c.label() }</option>
                        }) }
                    </select>
                    <div id="selector_help" class="form-text">{ form.help_text() }</div>
                </div>

                <div class="mb-3">
                    <label for="selector_value" class="form-label">{ "Selector Value" }</label>
                    <SelectorValueSelect dropdown={form.dropdown()}
                        selected={selection.selector_value.clone()}
                        onchange={on_value_change} />
                </div>

                <div class="d-flex gap-2">
                    <button type="submit" class="btn btn-primary">{ "Scrape" }</button>
                    <button id="preview_btn" type="button" class="btn btn-outline-secondary"
                        disabled={*previewing}
                        onclick={on_preview}>
                        if *previewing {
                            <span class="spinner-border spinner-border-sm me-1" role="status"></span>
                            { "Processing..." }
                        } else {
                            { "Preview" }
                        }
                    </button>
                </div>
            </form>
        </div>
    }
}

#[derive(Clone, PartialEq)]
enum LoadState {
    Loading,
    Loaded(Rc<SessionData>),
    Failed,
}

#[derive(Properties, PartialEq)]
struct VisualizationPageProps {
    session_id: AttrValue,
}

/// Charts, filterable item listing and export links for one scrape session.
#[function_component(VisualizationPage)]
fn visualization_page(props: &VisualizationPageProps) -> Html {
    let page = use_memo((), |_| {
        let events = EventEmitter::<PageEvent>::new();
        let feedback = FeedbackController::new(events.clone());
        (events, feedback)
    });
    let (events, feedback) = (&page.0, &page.1);
    use_page_events(events.clone());
    use_notification_sweeper(feedback.clone(), events.clone());

    let view = use_view_preference(events.clone());
    let load = use_state(|| LoadState::Loading);
    let chart_failed = use_state(|| false);
    let filter = use_state(String::new);
    let search_ref = use_node_ref();

    {
        let load = load.clone();
        use_effect_with(props.session_id.clone(), move |session_id| {
            let session_id = session_id.to_string();
            spawn_local(async move {
                let backend = HttpBackend::default();
                match backend.session_data(&session_id).await {
                    Ok(data) => load.set(LoadState::Loaded(Rc::new(data))),
                    Err(e) => {
                        error!("session data for {} failed: {}", session_id, e);
                        load.set(LoadState::Failed);
                    }
                }
            });
            || ()
        });
    }

    {
        let chart_failed = chart_failed.clone();
        use_effect_with((*load).clone(), move |state| {
            if let LoadState::Loaded(data) = state {
                let drawn = draw_element_type_chart(&element_type_counts(&data.items)).and_then(
                    |_| draw_content_length_chart(&content_length_histogram(&data.items)),
                );
                if let Err(e) = drawn {
                    error!("chart rendering failed: {}", e);
                    chart_failed.set(true);
                }
            }
            || ()
        });
    }

    let on_filter = {
        let filter = filter.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            filter.set(input.value());
        })
    };

    let on_search = {
        let feedback = feedback.clone();
        let search_ref = search_ref.clone();
        Callback::from(move |e: SubmitEvent| {
            let term = search_ref
                .cast::<HtmlInputElement>()
                .map(|input| input.value())
                .unwrap_or_default();
            if let Err(err) = check_search_term(&term) {
                e.prevent_default();
                feedback.notify(err.to_string(), err.severity());
            }
        })
    };

    let export = |format: ExportFormat| {
        let href = export_url(format.as_str(), &props.session_id);
        Callback::from(move |_: MouseEvent| {
            if let Err(e) = gloo_utils::window().location().set_href(&href) {
                error!("export navigation failed: {:?}", e);
            }
        })
    };

    let on_dismiss = {
        let feedback = feedback.clone();
        Callback::from(move |id: NotificationId| {
            feedback.dismiss(id);
        })
    };

    let layout = ViewLayout::from(view.current);
    let charts = match &*load {
        LoadState::Failed => html! {
            <div class="alert alert-danger">{ CHART_ERROR_MESSAGE }</div>
        },
        _ if *chart_failed => html! {
            <div class="alert alert-danger">{ CHART_ERROR_MESSAGE }</div>
        },
        LoadState::Loading => html! {
            <div class="spinner-border" role="status"></div>
        },
        LoadState::Loaded(_) => html! {
            <div class="row">
                <div class="col-md-6"><canvas id={ELEMENT_TYPE_CANVAS}></canvas></div>
                <div class="col-md-6"><canvas id={CONTENT_LENGTH_CANVAS}></canvas></div>
            </div>
        },
    };

    let items = match &*load {
        LoadState::Loaded(data) => {
            let visible = filter_items(&data.items, &filter);
            html! {
                <>
                    if let Some(summary) = filter_summary(&filter, visible.len()) {
                        <p id="filter_summary" class="text-muted">{ summary }</p>
                    }
                    { render_items_table(&data.items, &visible, layout.table_visible) }
                    { render_items_cards(&data.items, &visible, layout.card_visible, feedback) }
                </>
            }
        }
        _ => Html::default(),
    };

    html! {
        <div class="container py-4">
            <NotificationRegion notifications={feedback.notifications()} {on_dismiss} />

            <div id="charts_container" class="mb-4">{ charts }</div>

            <div class="d-flex justify-content-between align-items-center mb-3">
                <input id="filter_input" type="text" class="form-control w-50"
                    placeholder="Filter items..."
                    oninput={on_filter} />
                <ViewToggle {layout} onselect={view.set.clone()} />
            </div>

            <form id="search_form" action={SEARCH_ACTION} method="post" onsubmit={on_search}
                class="input-group mb-3">
                <input type="hidden" name="session_id" value={props.session_id.clone()} />
                <input id="search_term" name="search_term" type="text" class="form-control"
                    ref={search_ref} />
                <button type="submit" class="btn btn-outline-primary">{ "Search" }</button>
            </form>

            <div class="btn-group mb-3">
                <button type="button" class="btn btn-outline-success"
                    onclick={export(ExportFormat::Csv)}>{ "Export CSV" }</button>
                <button type="button" class="btn btn-outline-success"
                    onclick={export(ExportFormat::Json)}>{ "Export JSON" }</button>
            </div>

            { items }
        </div>
    }
}

fn session_from_query() -> Option<String> {
    let search = gloo_utils::window().location().search().ok()?;
    let params = UrlSearchParams::new_with_str(&search).ok()?;
    params.get(SESSION_QUERY_PARAM).filter(|id| !id.is_empty())
}

/// Picks the page from the query string: `?session=<id>` shows that
/// session's visualization, anything else the scrape form.
#[function_component]
pub fn App() -> Html {
    match session_from_query() {
        Some(id) => html! { <VisualizationPage session_id={id} /> },
        None => html! { <ScrapePage /> },
    }
}

/// Entry point: routes panics and logs to the console, then mounts the app.
fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::error_1(&format!("logger init failed: {}", e).into());
    }
    yew::Renderer::<App>::new().render();
}
