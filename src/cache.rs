//! Session-scoped cache for selector options.
//!
//! A fresh [`SessionCache`] is built for every page load and shared between
//! the options client and the form controller. Each request takes a
//! [`RequestTicket`] carrying a generation number; only the completion of the
//! latest issued ticket may touch the cache, so overlapping fetches resolve
//! deterministically instead of last-write-wins.

use crate::SelectorOptions;
use std::rc::Rc;

/// Handle for one in-flight selector-options request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
    url: String,
}

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Debug, Default)]
pub struct SessionCache {
    issued: u64,
    pending: Option<u64>,
    options: Option<Rc<SelectorOptions>>,
    source_url: Option<String>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding any that is still pending.
    pub fn issue(&mut self, url: &str) -> RequestTicket {
        self.issued += 1;
        self.pending = Some(self.issued);
        RequestTicket {
            generation: self.issued,
            url: url.to_string(),
        }
    }

    pub fn is_latest(&self, ticket: &RequestTicket) -> bool {
        ticket.generation == self.issued
    }

    /// True while the latest issued request has not completed.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Record a successful response. Returns the cached value, or `None` when
    /// the ticket was superseded and the response was discarded.
    pub fn store(
        &mut self,
        ticket: &RequestTicket,
        options: SelectorOptions,
    ) -> Option<Rc<SelectorOptions>> {
        if !self.settle(ticket) {
            return None;
        }
        let options = Rc::new(options);
        self.options = Some(options.clone());
        self.source_url = Some(ticket.url.clone());
        Some(options)
    }

    /// Mark the latest request as finished without changing the cached value.
    /// Returns false for a superseded ticket.
    pub fn settle(&mut self, ticket: &RequestTicket) -> bool {
        if !self.is_latest(ticket) {
            return false;
        }
        self.pending = None;
        true
    }

    pub fn current(&self) -> Option<Rc<SelectorOptions>> {
        self.options.clone()
    }

    /// URL whose fetch produced the cached options.
    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }
}
