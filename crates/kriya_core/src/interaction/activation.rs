//! Single vs. double activation disambiguation for edges.
//!
//! # Responsibility
//! - Provide a cancellable deferred-action queue driven by caller time.
//! - Coalesce "activate" and "activate twice quickly" on one edge into either
//!   a style cycle or a delete, never both.
//!
//! # Invariants
//! - A cancelled or superseded action never fires.
//! - Each key has at most one pending action.
//! - Time only advances through the `now` arguments; no real timers.

use crate::model::edge::EdgeId;
use std::borrow::Borrow;
use std::time::{Duration, Instant};

/// Default coalescing window between single and double activation.
pub const DEFAULT_ACTIVATION_WINDOW: Duration = Duration::from_millis(250);

/// Keyed deferred actions with schedule / cancel-if-pending semantics.
#[derive(Debug, Clone)]
pub struct DeferredActions<K> {
    delay: Duration,
    pending: Vec<(K, Instant)>,
}

impl<K: PartialEq + Clone> DeferredActions<K> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Vec::new(),
        }
    }

    /// Schedules `key` to become due at `now + delay`, replacing any pending
    /// action for the same key. Returns whether one was replaced.
    pub fn schedule(&mut self, key: K, now: Instant) -> bool {
        let replaced = self.cancel(&key);
        self.pending.push((key, now + self.delay));
        replaced
    }

    /// Cancels the pending action for `key`, if any.
    pub fn cancel<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        let before = self.pending.len();
        self.pending.retain(|(pending, _)| <K as Borrow<Q>>::borrow(pending) != key);
        before != self.pending.len()
    }

    pub fn is_pending<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.pending.iter().any(|(pending, _)| <K as Borrow<Q>>::borrow(pending) == key)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest deadline among pending actions.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|(_, due)| *due).min()
    }

    /// Removes and returns every action due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<K> {
        let mut due = Vec::new();
        self.pending.retain(|(key, deadline)| {
            if *deadline <= now {
                due.push((key.clone(), *deadline));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(_, deadline)| *deadline);
        due.into_iter().map(|(key, _)| key).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Splits raw edge activations into deferred style cycles and immediate
/// deletions.
#[derive(Debug, Clone)]
pub struct ActivationDisambiguator {
    deferred: DeferredActions<EdgeId>,
}

impl Default for ActivationDisambiguator {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVATION_WINDOW)
    }
}

impl ActivationDisambiguator {
    pub fn new(window: Duration) -> Self {
        Self {
            deferred: DeferredActions::new(window),
        }
    }

    /// Records a single activation; the style cycle is deferred.
    pub fn activate(&mut self, edge_id: impl Into<EdgeId>, now: Instant) {
        self.deferred.schedule(edge_id.into(), now);
    }

    /// Records a double activation: drops the deferred style cycle for the
    /// same edge and returns the edge to delete right away.
    pub fn double_activate(&mut self, edge_id: impl Into<EdgeId>) -> EdgeId {
        let edge_id = edge_id.into();
        self.deferred.cancel(&edge_id);
        edge_id
    }

    /// Edges whose style cycle window elapsed by `now`, earliest first.
    pub fn poll(&mut self, now: Instant) -> Vec<EdgeId> {
        self.deferred.take_due(now)
    }

    pub fn is_pending(&self, edge_id: &str) -> bool {
        self.deferred.is_pending(edge_id)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deferred.next_deadline()
    }

    /// Drops a pending activation, e.g. after its edge was removed.
    pub fn forget(&mut self, edge_id: &str) {
        self.deferred.cancel(edge_id);
    }

    pub fn clear(&mut self) {
        self.deferred.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{ActivationDisambiguator, DeferredActions};
    use std::time::{Duration, Instant};

    const WINDOW: Duration = Duration::from_millis(250);

    #[test]
    fn deferred_action_fires_only_after_delay() {
        let start = Instant::now();
        let mut actions = DeferredActions::new(WINDOW);
        actions.schedule("a", start);

        assert!(actions.take_due(start + Duration::from_millis(249)).is_empty());
        assert_eq!(actions.take_due(start + WINDOW), vec!["a"]);
        assert!(actions.is_empty());
    }

    #[test]
    fn rescheduling_replaces_pending_action() {
        let start = Instant::now();
        let mut actions = DeferredActions::new(WINDOW);
        assert!(!actions.schedule("a", start));
        assert!(actions.schedule("a", start + Duration::from_millis(100)));

        assert!(actions.take_due(start + WINDOW).is_empty());
        assert_eq!(actions.take_due(start + Duration::from_millis(350)), vec!["a"]);
    }

    #[test]
    fn due_actions_come_out_in_deadline_order() {
        let start = Instant::now();
        let mut actions = DeferredActions::new(WINDOW);
        actions.schedule("late", start + Duration::from_millis(10));
        actions.schedule("early", start);

        assert_eq!(
            actions.take_due(start + Duration::from_secs(1)),
            vec!["early", "late"]
        );
    }

    #[test]
    fn double_activation_within_window_supersedes_style_cycle() {
        let start = Instant::now();
        let mut disambiguator = ActivationDisambiguator::new(WINDOW);
        disambiguator.activate("e1", start);

        assert_eq!(disambiguator.double_activate("e1"), "e1");
        assert!(!disambiguator.is_pending("e1"));
        assert!(disambiguator.poll(start + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn double_activation_keeps_other_edges_pending() {
        let start = Instant::now();
        let mut disambiguator = ActivationDisambiguator::new(WINDOW);
        disambiguator.activate("e1", start);
        disambiguator.activate("e2", start);
        disambiguator.double_activate("e1");

        assert!(disambiguator.is_pending("e2"));
        assert_eq!(
            disambiguator.poll(start + WINDOW),
            vec!["e2".to_string()]
        );
    }

    #[test]
    fn forget_drops_only_that_edge() {
        let start = Instant::now();
        let mut disambiguator = ActivationDisambiguator::new(WINDOW);
        disambiguator.activate("e1", start);
        disambiguator.activate("e2", start + Duration::from_millis(5));
        disambiguator.forget("e1");

        assert!(!disambiguator.is_pending("e1"));
        assert_eq!(
            disambiguator.next_deadline(),
            Some(start + Duration::from_millis(5) + WINDOW)
        );
        assert_eq!(
            disambiguator.poll(start + Duration::from_secs(1)),
            vec!["e2".to_string()]
        );
    }
}
