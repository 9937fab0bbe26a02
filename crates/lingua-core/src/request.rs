//! Busy guards and request-token invalidation.
//!
//! Every outbound call is bracketed by [`RequestTracker::begin`] and
//! [`RequestTracker::finish`]. `begin` enforces "at most one in flight per
//! feature"; `finish` decides whether the answer may still be applied. A
//! ticket goes stale as soon as the user navigates to another screen, even if
//! they come back before the answer arrives.

use crate::error::{LinguaError, Result};
use crate::screen::Screen;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumIter};

/// A kind of user action that calls the generative service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Feature {
    Chat,
    Lesson,
    Vocab,
    Quiz,
    Speech,
}

impl Feature {
    /// The screen whose state this feature updates.
    pub fn screen(self) -> Screen {
        match self {
            Feature::Chat => Screen::Chat,
            Feature::Lesson => Screen::Lessons,
            Feature::Vocab | Feature::Speech => Screen::Vocabulary,
            Feature::Quiz => Screen::Quiz,
        }
    }
}

/// Token handed out for one outstanding request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    id: u64,
    feature: Feature,
    screen: Screen,
    epoch: u64,
}

impl RequestTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn feature(&self) -> Feature {
        self.feature
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }
}

/// Whether a finished request may still touch screen state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketState {
    /// The user is still on the screen the request was issued for.
    Current,
    /// The user navigated away after the request was issued.
    Stale,
}

/// Outcome of a controller operation that involved an outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery<T> {
    /// The response was applied to screen state.
    Applied(T),
    /// The response arrived after the user left the screen and was dropped.
    Discarded,
}

impl<T> Delivery<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Delivery::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Delivery::Applied(value) => Some(value),
            Delivery::Discarded => None,
        }
    }
}

/// Tracks the active screen and the outstanding request of each feature.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    screen: Screen,
    epoch: u64,
    next_id: u64,
    pending: HashMap<Feature, RequestTicket>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Switches the active screen.
    ///
    /// Returns `true` if the screen actually changed. A change invalidates
    /// every ticket issued before it; outstanding requests keep running and
    /// keep their busy flags until they finish.
    pub fn navigate(&mut self, screen: Screen) -> bool {
        if self.screen == screen {
            return false;
        }
        self.screen = screen;
        self.epoch += 1;
        true
    }

    /// Returns `true` while a request of `feature` is outstanding.
    pub fn is_busy(&self, feature: Feature) -> bool {
        self.pending.contains_key(&feature)
    }

    /// Features with an outstanding request.
    pub fn busy_features(&self) -> Vec<Feature> {
        let mut features: Vec<Feature> = self.pending.keys().copied().collect();
        features.sort_by_key(|feature| *feature as u8);
        features
    }

    /// Marks `feature` busy and issues a ticket for the call.
    ///
    /// # Errors
    ///
    /// Returns [`LinguaError::Busy`] if a request of the same feature is
    /// still outstanding.
    pub fn begin(&mut self, feature: Feature) -> Result<RequestTicket> {
        if self.is_busy(feature) {
            return Err(LinguaError::Busy { feature });
        }

        self.next_id += 1;
        let ticket = RequestTicket {
            id: self.next_id,
            feature,
            screen: feature.screen(),
            epoch: self.epoch,
        };
        self.pending.insert(feature, ticket.clone());
        Ok(ticket)
    }

    /// Whether a response for `ticket` could still be applied, without
    /// releasing the busy flag.
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        ticket.epoch == self.epoch && ticket.screen == self.screen
    }

    /// Clears the busy flag held by `ticket` and reports whether its response
    /// may be applied.
    pub fn finish(&mut self, ticket: &RequestTicket) -> TicketState {
        if self
            .pending
            .get(&ticket.feature)
            .is_some_and(|pending| pending.id == ticket.id)
        {
            self.pending.remove(&ticket.feature);
        }

        if self.is_current(ticket) {
            TicketState::Current
        } else {
            TicketState::Stale
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_on(screen: Screen) -> RequestTracker {
        let mut tracker = RequestTracker::new();
        tracker.navigate(screen);
        tracker
    }

    #[test]
    fn test_second_begin_is_rejected_while_busy() {
        let mut tracker = tracker_on(Screen::Chat);
        let ticket = tracker.begin(Feature::Chat).unwrap();

        let err = tracker.begin(Feature::Chat).unwrap_err();
        assert_eq!(err, LinguaError::Busy { feature: Feature::Chat });

        tracker.finish(&ticket);
        assert!(!tracker.is_busy(Feature::Chat));
        assert!(tracker.begin(Feature::Chat).is_ok());
    }

    #[test]
    fn test_features_are_guarded_independently() {
        let mut tracker = tracker_on(Screen::Vocabulary);
        tracker.begin(Feature::Vocab).unwrap();
        assert!(tracker.begin(Feature::Speech).is_ok());
        assert_eq!(tracker.busy_features(), vec![Feature::Vocab, Feature::Speech]);
    }

    #[test]
    fn test_ticket_is_current_when_screen_unchanged() {
        let mut tracker = tracker_on(Screen::Quiz);
        let ticket = tracker.begin(Feature::Quiz).unwrap();
        assert_eq!(tracker.finish(&ticket), TicketState::Current);
    }

    #[test]
    fn test_navigation_makes_ticket_stale_and_still_clears_busy() {
        let mut tracker = tracker_on(Screen::Lessons);
        let ticket = tracker.begin(Feature::Lesson).unwrap();

        tracker.navigate(Screen::Home);
        assert_eq!(tracker.finish(&ticket), TicketState::Stale);
        assert!(!tracker.is_busy(Feature::Lesson));
    }

    #[test]
    fn test_leaving_and_returning_still_invalidates() {
        let mut tracker = tracker_on(Screen::Chat);
        let ticket = tracker.begin(Feature::Chat).unwrap();

        tracker.navigate(Screen::Quiz);
        tracker.navigate(Screen::Chat);
        assert_eq!(tracker.finish(&ticket), TicketState::Stale);
    }

    #[test]
    fn test_navigate_to_same_screen_is_noop() {
        let mut tracker = tracker_on(Screen::Vocabulary);
        let ticket = tracker.begin(Feature::Speech).unwrap();

        assert!(!tracker.navigate(Screen::Vocabulary));
        assert_eq!(tracker.finish(&ticket), TicketState::Current);
    }

    #[test]
    fn test_ticket_issued_off_screen_is_stale() {
        let mut tracker = tracker_on(Screen::Home);
        let ticket = tracker.begin(Feature::Vocab).unwrap();
        assert_eq!(ticket.screen(), Screen::Vocabulary);
        assert_eq!(tracker.finish(&ticket), TicketState::Stale);
    }

    #[test]
    fn test_finishing_twice_does_not_release_newer_ticket() {
        let mut tracker = tracker_on(Screen::Chat);
        let first = tracker.begin(Feature::Chat).unwrap();
        tracker.finish(&first);

        let second = tracker.begin(Feature::Chat).unwrap();
        tracker.finish(&first);
        assert!(tracker.is_busy(Feature::Chat));

        tracker.finish(&second);
        assert!(!tracker.is_busy(Feature::Chat));
    }
}
