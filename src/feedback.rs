//! Loading overlay and transient alerts.
//!
//! Notifications carry their creation time; [`FeedbackController::expire`]
//! is driven by the UI with the deadline returned from
//! [`FeedbackController::next_deadline`], so the timing logic itself has no
//! clock and can be tested directly.

use crate::config::{ALERT_FADE_MS, ALERT_TIMEOUT_MS, DEFAULT_BUSY_MESSAGE};
use crate::events::{EventEmitter, PageEvent};
use crate::utils::now_ms;
use crate::Severity;
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

pub type NotificationId = u64;

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub created_ms: f64,
    /// Set once the display timeout has elapsed; removal follows after the fade.
    pub fading: bool,
}

impl Notification {
    pub fn fade_at(&self) -> f64 {
        self.created_ms + ALERT_TIMEOUT_MS
    }

    pub fn remove_at(&self) -> f64 {
        self.fade_at() + ALERT_FADE_MS
    }

    /// Bootstrap-style class list for the alert element.
    pub fn css_class(&self) -> String {
        format!(
            "alert alert-{} alert-dismissible fade{}",
            self.severity.as_str(),
            if self.fading { "" } else { " show" }
        )
    }
}

#[derive(Debug, Default)]
struct FeedbackState {
    next_id: NotificationId,
    notifications: Vec<Notification>,
    busy: Option<String>,
}

/// Shared notification surface. Clones share state.
#[derive(Clone)]
pub struct FeedbackController {
    state: Rc<RefCell<FeedbackState>>,
    events: EventEmitter<PageEvent>,
}

impl PartialEq for FeedbackController {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl FeedbackController {
    pub fn new(events: EventEmitter<PageEvent>) -> Self {
        Self {
            state: Rc::new(RefCell::new(FeedbackState::default())),
            events,
        }
    }

    pub fn notify(&self, message: impl Into<String>, severity: Severity) -> NotificationId {
        self.notify_at(message, severity, now_ms())
    }

    /// Append a notification created at `now`. Notifications stack in
    /// arrival order.
    pub fn notify_at(
        &self,
        message: impl Into<String>,
        severity: Severity,
        now: f64,
    ) -> NotificationId {
        let id = {
            let mut st = self.state.borrow_mut();
            st.next_id += 1;
            let id = st.next_id;
            st.notifications.push(Notification {
                id,
                message: message.into(),
                severity,
                created_ms: now,
                fading: false,
            });
            id
        };
        self.events.emit(&PageEvent::NotificationsChanged);
        id
    }

    /// Remove one notification. Returns false if it was already gone.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let removed = {
            let mut st = self.state.borrow_mut();
            let before = st.notifications.len();
            st.notifications.retain(|n| n.id != id);
            st.notifications.len() != before
        };
        if removed {
            self.events.emit(&PageEvent::NotificationsChanged);
        }
        removed
    }

    /// Apply timeouts as of `now`: start fading notifications whose display
    /// time has elapsed and drop those whose fade has finished.
    pub fn expire(&self, now: f64) -> bool {
        let changed = {
            let mut st = self.state.borrow_mut();
            let before = st.notifications.len();
            st.notifications.retain(|n| now < n.remove_at());
            let mut changed = st.notifications.len() != before;
            for n in st.notifications.iter_mut() {
                if !n.fading && now >= n.fade_at() {
                    n.fading = true;
                    changed = true;
                }
            }
            changed
        };
        if changed {
            debug!("notifications expired at {now}");
            self.events.emit(&PageEvent::NotificationsChanged);
        }
        changed
    }

    /// Earliest instant at which [`expire`](Self::expire) would change anything.
    pub fn next_deadline(&self) -> Option<f64> {
        self.state
            .borrow()
            .notifications
            .iter()
            .map(|n| if n.fading { n.remove_at() } else { n.fade_at() })
            .reduce(f64::min)
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.state.borrow().notifications.clone()
    }

    /// Show (`message` or the default text) or hide the page-covering overlay.
    /// Showing twice only replaces the text.
    pub fn set_busy(&self, is_busy: bool, message: Option<&str>) {
        let changed = {
            let mut st = self.state.borrow_mut();
            let next = is_busy.then(|| message.unwrap_or(DEFAULT_BUSY_MESSAGE).to_string());
            let changed = st.busy != next;
            st.busy = next;
            changed
        };
        if changed {
            self.events.emit(&PageEvent::BusyChanged);
        }
    }

    pub fn busy_message(&self) -> Option<String> {
        self.state.borrow().busy.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state.borrow().busy.is_some()
    }

    /// Class list for the page-covering overlay element.
    pub fn overlay_class(&self) -> &'static str {
        if self.is_busy() {
            "loading-overlay"
        } else {
            "loading-overlay d-none"
        }
    }

    /// Page scrolling is suppressed exactly while the overlay is shown.
    pub fn scroll_locked(&self) -> bool {
        self.is_busy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn controller() -> FeedbackController {
        FeedbackController::new(EventEmitter::new())
    }

    #[test]
    fn notifications_stack_in_arrival_order() {
        let fb = controller();
        fb.notify_at("first", Severity::Info, 0.0);
        fb.notify_at("second", Severity::Danger, 10.0);

        let msgs: Vec<_> = fb.notifications().into_iter().map(|n| n.message).collect();
        assert_eq!(msgs, vec!["first", "second"]);
    }

    #[test]
    fn dismiss_removes_only_that_notification() {
        let fb = controller();
        let a = fb.notify_at("a", Severity::Info, 0.0);
        fb.notify_at("b", Severity::Info, 0.0);

        assert!(fb.dismiss(a));
        assert!(!fb.dismiss(a));
        let left: Vec<_> = fb.notifications().into_iter().map(|n| n.message).collect();
        assert_eq!(left, vec!["b"]);
    }

    #[test]
    fn notification_survives_until_timeout_then_fades_and_goes() {
        let fb = controller();
        fb.notify_at("hello", Severity::Success, 1_000.0);

        fb.expire(1_000.0 + ALERT_TIMEOUT_MS - 1.0);
        let n = fb.notifications()[0].clone();
        assert!(!n.fading);

        fb.expire(1_000.0 + ALERT_TIMEOUT_MS);
        let n = fb.notifications()[0].clone();
        assert!(n.fading);
        assert!(!n.css_class().contains("show"));

        fb.expire(1_000.0 + ALERT_TIMEOUT_MS + ALERT_FADE_MS);
        assert!(fb.notifications().is_empty());
    }

    #[test]
    fn automatic_expiry_leaves_younger_notifications() {
        let fb = controller();
        fb.notify_at("old", Severity::Info, 0.0);
        fb.notify_at("new", Severity::Info, 3_000.0);

        fb.expire(ALERT_TIMEOUT_MS + ALERT_FADE_MS);
        let left: Vec<_> = fb.notifications().into_iter().map(|n| n.message).collect();
        assert_eq!(left, vec!["new"]);
    }

    #[test]
    fn next_deadline_tracks_fade_then_removal() {
        let fb = controller();
        assert_eq!(fb.next_deadline(), None);

        fb.notify_at("x", Severity::Info, 0.0);
        assert_eq!(fb.next_deadline(), Some(ALERT_TIMEOUT_MS));
        fb.expire(ALERT_TIMEOUT_MS);
        assert_eq!(fb.next_deadline(), Some(ALERT_TIMEOUT_MS + ALERT_FADE_MS));
    }

    #[test]
    fn busy_is_idempotent_and_updates_message() {
        let events = EventEmitter::new();
        let hits = Rc::new(Cell::new(0));
        let _sub = {
            let hits = hits.clone();
            events.subscribe(move |e| {
                if *e == PageEvent::BusyChanged {
                    hits.set(hits.get() + 1);
                }
            })
        };
        let fb = FeedbackController::new(events);

        fb.set_busy(true, Some("Working..."));
        fb.set_busy(true, Some("Working..."));
        assert_eq!(hits.get(), 1);
        assert!(fb.scroll_locked());

        fb.set_busy(true, Some("Still working..."));
        assert_eq!(fb.busy_message().as_deref(), Some("Still working..."));

        fb.set_busy(false, None);
        assert!(!fb.is_busy());
        assert!(!fb.scroll_locked());
        assert_eq!(hits.get(), 3);
    }

    #[test]
    fn overlay_is_hidden_unless_busy() {
        let fb = controller();
        assert_eq!(fb.overlay_class(), "loading-overlay d-none");
        fb.set_busy(true, None);
        assert_eq!(fb.overlay_class(), "loading-overlay");
    }

    #[test]
    fn stylesheet_pins_overlay_and_alerts_to_viewport() {
        let css = include_str!("../style.css");
        for selector in [".loading-overlay {", ".alert-container {"] {
            let start = css.find(selector).unwrap();
            let rule = &css[start..start + css[start..].find('}').unwrap()];
            assert!(rule.contains("position: fixed"), "{selector}");
            assert!(rule.contains("z-index"), "{selector}");
        }
        assert!(css.contains("inset: 0"));
    }

    #[test]
    fn busy_without_message_uses_default() {
        let fb = controller();
        fb.set_busy(true, None);
        assert_eq!(fb.busy_message().as_deref(), Some(DEFAULT_BUSY_MESSAGE));
    }
}
