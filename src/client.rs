//! Fetches selector options for a URL and drives the dropdown and feedback
//! surfaces through the request lifecycle.

use crate::api::Backend;
use crate::cache::SessionCache;
use crate::config::{
    ANALYSIS_COMPLETE_MESSAGE, ANALYZING_BUSY_MESSAGE, FETCH_ERROR_PLACEHOLDER,
    LOADING_PLACEHOLDER, MANUAL_ENTRY_PLACEHOLDER,
};
use crate::dropdown::SelectorFormController;
use crate::error::UiError;
use crate::feedback::FeedbackController;
use crate::{SelectorOptions, Severity};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::Rc;

/// Outcome of one [`SelectorOptionsClient::fetch_options`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Applied(Rc<SelectorOptions>),
    Failed(UiError),
    /// A newer request was issued before this one completed.
    Superseded,
}

pub struct SelectorOptionsClient<B> {
    backend: Rc<B>,
    cache: Rc<RefCell<SessionCache>>,
    form: SelectorFormController,
    feedback: FeedbackController,
}

impl<B> Clone for SelectorOptionsClient<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            cache: self.cache.clone(),
            form: self.form.clone(),
            feedback: self.feedback.clone(),
        }
    }
}

impl<B: Backend> SelectorOptionsClient<B> {
    pub fn new(
        backend: Rc<B>,
        cache: Rc<RefCell<SessionCache>>,
        form: SelectorFormController,
        feedback: FeedbackController,
    ) -> Self {
        Self {
            backend,
            cache,
            form,
            feedback,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Request options for `url` once, with no retry.
    ///
    /// The dropdown is disabled and the overlay shown until the response
    /// lands. A failure leaves the cached options from any earlier success in
    /// place; a superseded response is dropped without touching the UI.
    pub async fn fetch_options(&self, url: &str) -> FetchOutcome {
        let ticket = self.cache.borrow_mut().issue(url);
        debug!("selector options request #{} for {}", ticket.generation(), url);

        self.form.begin_loading(LOADING_PLACEHOLDER);
        self.feedback.set_busy(true, Some(ANALYZING_BUSY_MESSAGE));

        let result = self
            .backend
            .selector_options(url)
            .await
            .and_then(|body| body.into_result());

        if !self.cache.borrow().is_latest(&ticket) {
            debug!(
                "discarding selector options #{} for {}: superseded",
                ticket.generation(),
                ticket.url()
            );
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(options) => {
                let stored = self.cache.borrow_mut().store(&ticket, options);
                let Some(options) = stored else {
                    return FetchOutcome::Superseded;
                };
                info!(
                    "loaded selector options for {} ({} tags, {} classes)",
                    url,
                    options.tags.len(),
                    options.classes.len()
                );
                self.form.populate_current(&options);
                self.feedback.set_busy(false, None);
                self.feedback.notify(ANALYSIS_COMPLETE_MESSAGE, Severity::Success);
                FetchOutcome::Applied(options)
            }
            Err(err) => {
                self.cache.borrow_mut().settle(&ticket);
                warn!("selector options for {} failed: {}", url, err);
                let placeholder = match err {
                    UiError::ServerReported { .. } => MANUAL_ENTRY_PLACEHOLDER,
                    _ => FETCH_ERROR_PLACEHOLDER,
                };
                self.form.fail(placeholder);
                self.feedback.set_busy(false, None);
                self.feedback.notify(err.user_message(), err.severity());
                FetchOutcome::Failed(err)
            }
        }
    }
}
