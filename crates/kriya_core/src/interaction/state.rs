//! Selection cursor and two-phase link gesture.
//!
//! # Responsibility
//! - Track the single selected node and the pending link source.
//! - Decide what a node activation means for the link gesture.
//!
//! # Invariants
//! - At most one node is selected.
//! - Edges are only requested by `LinkOutcome::Completed`, and only for two
//!   distinct node ids.
//! - This state is transient and never persisted.

use crate::model::node::NodeId;

/// Link gesture phase.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LinkGesture {
    #[default]
    Idle,
    /// First node chosen; waiting for the target.
    Pending(NodeId),
}

/// Result of one node activation on the link gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Node became the pending link source.
    Started(NodeId),
    /// Same node activated twice; gesture abandoned.
    Cancelled(NodeId),
    /// Caller must create an edge `source -> target`.
    Completed { source: NodeId, target: NodeId },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionState {
    selected: Option<NodeId>,
    link: LinkGesture,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn link(&self) -> &LinkGesture {
        &self.link
    }

    /// Id of the pending link source, if a gesture is in progress.
    pub fn link_source(&self) -> Option<&str> {
        match &self.link {
            LinkGesture::Pending(id) => Some(id.as_str()),
            LinkGesture::Idle => None,
        }
    }

    /// Selects `id`, returning the previously selected id when it differs.
    pub fn select(&mut self, id: impl Into<NodeId>) -> Option<NodeId> {
        let id = id.into();
        match self.selected.replace(id) {
            Some(previous) if Some(&previous) != self.selected.as_ref() => Some(previous),
            _ => None,
        }
    }

    /// Clears the selection, returning what was selected.
    pub fn deselect(&mut self) -> Option<NodeId> {
        self.selected.take()
    }

    /// Applies one node activation: updates the selection and steps the
    /// link gesture.
    pub fn activate_node(&mut self, id: impl Into<NodeId>) -> LinkOutcome {
        let id = id.into();
        self.select(id.clone());
        match std::mem::take(&mut self.link) {
            LinkGesture::Idle => {
                self.link = LinkGesture::Pending(id.clone());
                LinkOutcome::Started(id)
            }
            LinkGesture::Pending(source) if source == id => LinkOutcome::Cancelled(id),
            LinkGesture::Pending(source) => LinkOutcome::Completed { source, target: id },
        }
    }

    /// Drops every reference to a node that no longer exists.
    pub fn forget_node(&mut self, id: &str) {
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        if self.link_source() == Some(id) {
            self.link = LinkGesture::Idle;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::{InteractionState, LinkGesture, LinkOutcome};

    #[test]
    fn select_reports_previous_only_when_changed() {
        let mut state = InteractionState::new();
        assert_eq!(state.select("a"), None);
        assert_eq!(state.select("a"), None);
        assert_eq!(state.select("b"), Some("a".to_string()));
        assert_eq!(state.selected(), Some("b"));
        assert_eq!(state.deselect(), Some("b".to_string()));
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn activating_same_node_twice_cancels() {
        let mut state = InteractionState::new();
        assert_eq!(state.activate_node("a"), LinkOutcome::Started("a".to_string()));
        assert_eq!(state.link_source(), Some("a"));
        assert_eq!(state.activate_node("a"), LinkOutcome::Cancelled("a".to_string()));
        assert_eq!(state.link(), &LinkGesture::Idle);
        assert_eq!(state.selected(), Some("a"));
    }

    #[test]
    fn activating_two_nodes_completes_and_returns_to_idle() {
        let mut state = InteractionState::new();
        state.activate_node("a");
        assert_eq!(
            state.activate_node("b"),
            LinkOutcome::Completed {
                source: "a".to_string(),
                target: "b".to_string(),
            }
        );
        assert_eq!(state.link(), &LinkGesture::Idle);
        assert_eq!(state.selected(), Some("b"));
    }

    #[test]
    fn forget_node_clears_selection_and_pending_link() {
        let mut state = InteractionState::new();
        state.activate_node("a");
        state.forget_node("a");
        assert_eq!(state.selected(), None);
        assert_eq!(state.link_source(), None);
    }
}
