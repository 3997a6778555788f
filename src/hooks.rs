use gloo_timers::future::TimeoutFuture;
use log::warn;
use scraper_ui::api::HttpBackend;
use scraper_ui::config::COPY_RESET_MS;
use scraper_ui::events::{EventEmitter, PageEvent};
use scraper_ui::feedback::FeedbackController;
use scraper_ui::session::PageSession;
use scraper_ui::utils::now_ms;
use scraper_ui::view::{BrowserStorage, ViewPreferenceStore};
use scraper_ui::{UiError, ViewPreference};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use yew::prelude::*;

/// Page session for the scrape form, built once per mount.
#[hook]
pub fn use_page_session() -> Rc<PageSession<HttpBackend>> {
    use_memo((), |_| PageSession::new(HttpBackend::default()))
}

/// Re-render the calling component whenever `events` fires. The subscription
/// is disposed on unmount.
#[hook]
pub fn use_page_events(events: EventEmitter<PageEvent>) {
    let trigger = use_force_update();
    use_effect_with((), move |_| {
        let sub = events.subscribe(move |_| trigger.force_update());
        move || drop(sub)
    });
}

/// Drive notification expiry from a single pending timer.
///
/// Every change to the notification list re-arms the timer for the next
/// deadline; a bumped generation makes older timers no-ops.
#[hook]
pub fn use_notification_sweeper(feedback: FeedbackController, events: EventEmitter<PageEvent>) {
    use_effect_with((), move |_| {
        let generation = Rc::new(Cell::new(0u64));
        let sub = {
            let generation = generation.clone();
            events.subscribe(move |event| {
                if *event != PageEvent::NotificationsChanged {
                    return;
                }
                generation.set(generation.get() + 1);
                let Some(deadline) = feedback.next_deadline() else {
                    return;
                };
                let armed = generation.get();
                let generation = generation.clone();
                let feedback = feedback.clone();
                let delay = (deadline - now_ms()).max(0.0).ceil() as u32;
                spawn_local(async move {
                    TimeoutFuture::new(delay).await;
                    if generation.get() == armed {
                        feedback.expire(deadline);
                    }
                });
            })
        };
        move || {
            generation.set(generation.get() + 1);
            drop(sub);
        }
    });
}

/// Hide page scrollbars while `locked`.
#[hook]
pub fn use_scroll_lock(locked: bool) {
    use_effect_with(locked, |&locked| {
        let overflow = if locked { "hidden" } else { "" };
        if let Err(e) = gloo_utils::body().style().set_property("overflow", overflow) {
            warn!("could not set body overflow: {:?}", e);
        }
        || ()
    });
}

/// Current view preference and a setter that persists it.
#[derive(Clone)]
pub struct ViewPreferenceHandle {
    pub current: ViewPreference,
    pub set: Callback<ViewPreference>,
}

/// Restore the stored view preference. Switching emits
/// [`PageEvent::ViewChanged`] on `events`, which re-renders subscribers.
#[hook]
pub fn use_view_preference(events: EventEmitter<PageEvent>) -> ViewPreferenceHandle {
    let store = use_memo((), move |_| ViewPreferenceStore::load(BrowserStorage).with_events(events));
    let current = store.current();

    let set = Callback::from(move |pref: ViewPreference| {
        store.set(pref);
    });

    ViewPreferenceHandle { current, set }
}

async fn write_clipboard(text: &str) -> Result<(), UiError> {
    let window = web_sys::window().ok_or_else(|| UiError::Clipboard("no window".into()))?;
    let promise = window.navigator().clipboard().write_text(text);
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| UiError::Clipboard(format!("{:?}", e)))
}

/// Copy-to-clipboard state for one button: `copied` is true for a short
/// while after a successful copy. Failures become a notification and leave
/// the button untouched.
#[hook]
pub fn use_clipboard(feedback: FeedbackController) -> (bool, Callback<String>) {
    let copied = use_state(|| false);

    let copy = {
        let copied = copied.clone();
        Callback::from(move |text: String| {
            let copied = copied.clone();
            let feedback = feedback.clone();
            spawn_local(async move {
                match write_clipboard(&text).await {
                    Ok(()) => {
                        copied.set(true);
                        TimeoutFuture::new(COPY_RESET_MS).await;
                        copied.set(false);
                    }
                    Err(e) => {
                        warn!("{}", e);
                        feedback.notify(e.user_message(), e.severity());
                    }
                }
            });
        })
    };

    (*copied, copy)
}
