//! Per-page-load wiring of the UI controllers.
//!
//! A [`PageSession`] owns the session cache, the controllers and the event
//! emitter they report through. It is constructed once per page load; nothing
//! here is global.

use crate::api::Backend;
use crate::cache::SessionCache;
use crate::client::{FetchOutcome, SelectorOptionsClient};
use crate::config::{ANALYZE_BUTTON_BUSY_MESSAGE, SUBMIT_BUSY_MESSAGE};
use crate::dropdown::SelectorFormController;
use crate::error::{UiError, ValidationError};
use crate::events::{EventEmitter, PageEvent};
use crate::feedback::FeedbackController;
use crate::utils::{check_analyze, check_preview, check_submission};
use crate::{SelectorCategory, Severity};
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

pub struct PageSession<B> {
    events: EventEmitter<PageEvent>,
    cache: Rc<RefCell<SessionCache>>,
    form: SelectorFormController,
    feedback: FeedbackController,
    client: SelectorOptionsClient<B>,
}

impl<B> Clone for PageSession<B> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
            cache: self.cache.clone(),
            form: self.form.clone(),
            feedback: self.feedback.clone(),
            client: self.client.clone(),
        }
    }
}

impl<B> PartialEq for PageSession<B> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cache, &other.cache)
    }
}

impl<B: Backend> PageSession<B> {
    pub fn new(backend: B) -> Self {
        let events = EventEmitter::new();
        let cache = Rc::new(RefCell::new(SessionCache::new()));
        let form = SelectorFormController::new(cache.clone(), events.clone());
        let feedback = FeedbackController::new(events.clone());
        let client =
            SelectorOptionsClient::new(Rc::new(backend), cache.clone(), form.clone(), feedback.clone());
        Self {
            events,
            cache,
            form,
            feedback,
            client,
        }
    }

    pub fn events(&self) -> &EventEmitter<PageEvent> {
        &self.events
    }

    pub fn form(&self) -> &SelectorFormController {
        &self.form
    }

    pub fn feedback(&self) -> &FeedbackController {
        &self.feedback
    }

    pub fn client(&self) -> &SelectorOptionsClient<B> {
        &self.client
    }

    pub fn cache(&self) -> std::cell::Ref<'_, SessionCache> {
        self.cache.borrow()
    }

    /// URL field `change`: validate, then fetch options for a non-empty valid
    /// URL. Returns `None` when no fetch was started.
    pub async fn on_url_change(&self, url: &str) -> Option<FetchOutcome> {
        if !self.form.set_url(url) || url.is_empty() {
            return None;
        }
        Some(self.client.fetch_options(url).await)
    }

    /// "Analyze URL" button.
    pub async fn on_analyze(&self, url: &str) -> Result<FetchOutcome, UiError> {
        self.form.set_url(url);
        if let Err(e) = check_analyze(url) {
            self.report(&e);
            return Err(e.into());
        }
        self.feedback.set_busy(true, Some(ANALYZE_BUTTON_BUSY_MESSAGE));
        Ok(self.client.fetch_options(url).await)
    }

    pub fn on_type_change(&self, category: SelectorCategory) {
        self.form.on_type_change(category);
    }

    /// Scrape form submit. On success the overlay is already showing when
    /// this returns, so the caller can let the submit proceed.
    pub fn on_submit(&self) -> Result<(), ValidationError> {
        let selection = self.form.selection();
        self.form.set_url(&selection.url);
        if let Err(e) = check_submission(&selection) {
            self.report(&e);
            return Err(e);
        }
        self.feedback.set_busy(true, Some(SUBMIT_BUSY_MESSAGE));
        Ok(())
    }

    /// Preview button: validate, announce the extraction and show the
    /// overlay. The caller submits the form after a short delay.
    pub fn on_preview(&self) -> Result<(), ValidationError> {
        let selection = self.form.selection();
        if let Err(e) = check_preview(&selection) {
            self.report(&e);
            return Err(e);
        }
        let busy = format!(
            "Extracting data using {}: \"{}\"...",
            selection.selector_type, selection.selector_value
        );
        self.feedback.set_busy(true, Some(&busy));
        self.feedback.notify(
            format!(
                "Initiating data extraction with {}: \"{}\"",
                selection.selector_type, selection.selector_value
            ),
            Severity::Info,
        );
        Ok(())
    }

    fn report(&self, e: &ValidationError) {
        debug!("form check failed: {e}");
        self.feedback.notify(e.to_string(), e.severity());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{SelectorOptionsResponse, SessionData};
    use crate::config::{
        ANALYSIS_COMPLETE_MESSAGE, ANALYSIS_ERROR_MESSAGE, FETCH_ERROR_PLACEHOLDER,
        MANUAL_ENTRY_PLACEHOLDER, SENTINEL_LABEL,
    };
    use crate::dropdown::{DropdownEntry, DropdownOption, DropdownState};
    use crate::SelectorOptions;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use futures::future::{FutureExt, LocalBoxFuture};
    use std::collections::{HashMap, VecDeque};

    type Reply = Result<SelectorOptionsResponse, UiError>;

    /// Canned backend: replies are queued per URL.
    #[derive(Default)]
    struct FakeBackend {
        replies: RefCell<HashMap<String, VecDeque<Reply>>>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeBackend {
        fn reply(self, url: &str, reply: Reply) -> Self {
            self.replies
                .borrow_mut()
                .entry(url.to_string())
                .or_default()
                .push_back(reply);
            self
        }
    }

    impl Backend for FakeBackend {
        fn selector_options(&self, url: &str) -> LocalBoxFuture<'_, Reply> {
            self.calls.borrow_mut().push(url.to_string());
            let reply = self
                .replies
                .borrow_mut()
                .get_mut(url)
                .and_then(VecDeque::pop_front)
                .unwrap_or_else(|| Err(UiError::Fetch("no reply queued".into())));
            async move { reply }.boxed_local()
        }

        fn session_data(&self, _: &str) -> LocalBoxFuture<'_, Result<SessionData, UiError>> {
            async { Ok(SessionData::default()) }.boxed_local()
        }
    }

    /// Backend whose replies are released by the test, to interleave requests.
    #[derive(Default)]
    struct GatedBackend {
        gates: RefCell<HashMap<String, oneshot::Receiver<Reply>>>,
    }

    impl Backend for GatedBackend {
        fn selector_options(&self, url: &str) -> LocalBoxFuture<'_, Reply> {
            let rx = self.gates.borrow_mut().remove(url);
            async move {
                match rx {
                    Some(rx) => rx.await.unwrap_or_else(|_| Err(UiError::Fetch("dropped".into()))),
                    None => Err(UiError::Fetch("no gate".into())),
                }
            }
            .boxed_local()
        }

        fn session_data(&self, _: &str) -> LocalBoxFuture<'_, Result<SessionData, UiError>> {
            async { Ok(SessionData::default()) }.boxed_local()
        }
    }

    fn ok_tags(tags: &[&str]) -> Reply {
        Ok(SelectorOptionsResponse {
            success: true,
            options: Some(SelectorOptions {
                tags: tags.iter().map(|t| t.to_string()).collect(),
                ..Default::default()
            }),
            message: None,
        })
    }

    fn tag_values<B: Backend>(session: &PageSession<B>) -> Vec<String> {
        session
            .form()
            .dropdown()
            .options()
            .map(|o| o.value.clone())
            .filter(|v| !v.is_empty())
            .collect()
    }

    #[test]
    fn end_to_end_tags_for_example_com() {
        let backend = FakeBackend::default().reply("https://example.com", ok_tags(&["div", "a"]));
        let session = PageSession::new(backend);

        let outcome = block_on(session.on_url_change("https://example.com"));
        assert!(matches!(outcome, Some(FetchOutcome::Applied(_))));

        session.on_type_change(SelectorCategory::Tag);
        let dropdown = session.form().dropdown();
        assert_eq!(
            dropdown.entries,
            vec![
                DropdownEntry::Choice(DropdownOption::new(SENTINEL_LABEL, "")),
                DropdownEntry::Group {
                    label: "Recommended HTML Tags".into(),
                    options: vec![DropdownOption::new("div", "div"), DropdownOption::new("a", "a")],
                },
            ]
        );
        assert!(!dropdown.disabled);
        assert!(!session.feedback().is_busy());

        let notes = session.feedback().notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].message, ANALYSIS_COMPLETE_MESSAGE);
        assert_eq!(notes[0].severity, Severity::Success);
    }

    #[test]
    fn failed_fetch_keeps_previous_cache() {
        let backend = FakeBackend::default()
            .reply("https://a.example.com", ok_tags(&["section"]))
            .reply(
                "https://b.example.com",
                Ok(SelectorOptionsResponse {
                    success: false,
                    options: None,
                    message: Some("Failed to analyze the webpage.".into()),
                }),
            );
        let session = PageSession::new(backend);

        block_on(session.on_url_change("https://a.example.com"));
        let outcome = block_on(session.on_url_change("https://b.example.com"));
        assert!(matches!(outcome, Some(FetchOutcome::Failed(UiError::ServerReported { .. }))));

        let dropdown = session.form().dropdown();
        assert_eq!(dropdown.state, DropdownState::Error);
        assert!(!dropdown.disabled);
        assert_eq!(dropdown.options().next().unwrap().label, MANUAL_ENTRY_PLACEHOLDER);

        let last = session.feedback().notifications().pop().unwrap();
        assert_eq!(last.message, "Failed to analyze the webpage.");
        assert_eq!(last.severity, Severity::Warning);

        session.on_type_change(SelectorCategory::Tag);
        assert_eq!(tag_values(&session), vec!["section"]);
        assert_eq!(session.cache().source_url(), Some("https://a.example.com"));
    }

    #[test]
    fn network_error_shows_danger_and_error_placeholder() {
        let session = PageSession::new(FakeBackend::default());

        let outcome = block_on(session.on_url_change("https://down.example.com"));
        assert!(matches!(outcome, Some(FetchOutcome::Failed(UiError::Fetch(_)))));

        let dropdown = session.form().dropdown();
        assert_eq!(dropdown.options().next().unwrap().label, FETCH_ERROR_PLACEHOLDER);
        let note = session.feedback().notifications()[0].clone();
        assert_eq!(note.message, ANALYSIS_ERROR_MESSAGE);
        assert_eq!(note.severity, Severity::Danger);
        assert!(!session.feedback().is_busy());
    }

    #[test]
    fn invalid_or_empty_url_does_not_fetch() {
        let session = PageSession::new(FakeBackend::default());
        assert!(block_on(session.on_url_change("")).is_none());
        assert!(block_on(session.on_url_change("nope")).is_none());
        assert!(session.client().backend().calls.borrow().is_empty());
    }

    #[test]
    fn late_response_from_older_request_is_discarded() {
        let (tx_a, rx_a) = oneshot::channel();
        let (tx_b, rx_b) = oneshot::channel();
        let backend = GatedBackend::default();
        backend.gates.borrow_mut().insert("https://a.example.com".into(), rx_a);
        backend.gates.borrow_mut().insert("https://b.example.com".into(), rx_b);
        let session = PageSession::new(backend);

        let first = session.on_url_change("https://a.example.com");
        let second = session.on_url_change("https://b.example.com");

        let outcome = block_on(async {
            // Start both requests, then resolve B before A.
            let mut first = Box::pin(first);
            let mut second = Box::pin(second);
            assert!(futures::poll!(first.as_mut()).is_pending());
            assert!(futures::poll!(second.as_mut()).is_pending());
            tx_b.send(ok_tags(&["b"])).ok();
            let b = second.await;
            tx_a.send(ok_tags(&["a"])).ok();
            let a = first.await;
            (a, b)
        });

        assert_eq!(outcome.0, Some(FetchOutcome::Superseded));
        assert!(matches!(outcome.1, Some(FetchOutcome::Applied(_))));
        session.on_type_change(SelectorCategory::Tag);
        assert_eq!(tag_values(&session), vec!["b"]);
        assert_eq!(session.feedback().notifications().len(), 1);
    }

    #[test]
    fn type_change_while_loading_is_applied_when_response_lands() {
        let (tx, rx) = oneshot::channel();
        let backend = GatedBackend::default();
        backend.gates.borrow_mut().insert("https://example.com".into(), rx);
        let session = PageSession::new(backend);

        block_on(async {
            let mut fetch = Box::pin(session.on_url_change("https://example.com"));
            assert!(futures::poll!(fetch.as_mut()).is_pending());
            session.on_type_change(SelectorCategory::Class);
            assert_eq!(session.form().dropdown().state, DropdownState::Loading);
            tx.send(Ok(SelectorOptionsResponse {
                success: true,
                options: Some(SelectorOptions {
                    classes: vec!["container".into()],
                    ..Default::default()
                }),
                message: None,
            }))
            .ok();
            fetch.await;
        });

        assert_eq!(
            session.form().dropdown().state,
            DropdownState::Populated(SelectorCategory::Class)
        );
        assert_eq!(tag_values(&session), vec!["container"]);
    }

    #[test]
    fn submit_blocks_without_selector_value() {
        let session = PageSession::new(FakeBackend::default());
        session.form().set_url("https://example.com");
        assert_eq!(session.on_submit(), Err(ValidationError::MissingSelectorValue));
        assert!(!session.feedback().is_busy());

        session.form().select_value("div");
        assert_eq!(session.on_submit(), Ok(()));
        assert_eq!(session.feedback().busy_message().as_deref(), Some(SUBMIT_BUSY_MESSAGE));
    }

    #[test]
    fn submit_blocks_on_empty_url() {
        let session = PageSession::new(FakeBackend::default());
        session.form().select_value("div");
        assert_eq!(session.on_submit(), Err(ValidationError::InvalidUrl));
        let note = session.feedback().notifications()[0].clone();
        assert_eq!(note.severity, Severity::Danger);
    }

    #[test]
    fn preview_announces_extraction() {
        let session = PageSession::new(FakeBackend::default());
        session.form().set_url("example.com");
        session.on_type_change(SelectorCategory::Robots);
        assert_eq!(session.on_preview(), Ok(()));
        assert_eq!(
            session.feedback().notifications()[0].message,
            "Initiating data extraction with robots: \"analyze\""
        );
        assert_eq!(
            session.feedback().busy_message().as_deref(),
            Some("Extracting data using robots: \"analyze\"...")
        );
    }

    #[test]
    fn analyze_requires_url() {
        let session = PageSession::new(FakeBackend::default());
        let res = block_on(session.on_analyze(""));
        assert_eq!(res, Err(UiError::Validation(ValidationError::UrlRequired)));
        assert_eq!(
            session.feedback().notifications()[0].message,
            "Please enter a valid URL first"
        );
    }

    #[test]
    fn analyze_fetches_and_populates_dropdown() {
        let backend = FakeBackend::default().reply("https://example.com", ok_tags(&["h1", "p"]));
        let session = PageSession::new(backend);

        let outcome = block_on(session.on_analyze("https://example.com"));
        assert!(matches!(outcome, Ok(FetchOutcome::Applied(_))));
        assert_eq!(
            *session.client().backend().calls.borrow(),
            vec!["https://example.com".to_string()]
        );
        assert_eq!(tag_values(&session), vec!["h1", "p"]);
        assert_eq!(
            session.form().dropdown().state,
            DropdownState::Populated(SelectorCategory::Tag)
        );
        assert!(!session.feedback().is_busy());
        assert_eq!(session.cache().source_url(), Some("https://example.com"));
    }

    #[test]
    fn events_fire_for_dropdown_and_busy_changes() {
        let backend = FakeBackend::default().reply("https://example.com", ok_tags(&["p"]));
        let session = PageSession::new(backend);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = seen.clone();
            session.events().subscribe(move |e| seen.borrow_mut().push(e.clone()))
        };

        block_on(session.on_url_change("https://example.com"));
        let seen = seen.borrow();
        assert!(seen.contains(&PageEvent::DropdownChanged));
        assert!(seen.contains(&PageEvent::BusyChanged));
        assert!(seen.contains(&PageEvent::NotificationsChanged));
    }
}
