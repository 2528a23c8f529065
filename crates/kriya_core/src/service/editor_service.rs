//! Editing session: gesture entry points over one diagram.
//!
//! # Responsibility
//! - Translate UI gestures into `Diagram` and `InteractionState` calls.
//! - Persist the full snapshot and re-render after every mutation.
//! - Import and export snapshots.
//!
//! # Invariants
//! - Each entry point runs to completion; nothing is queued except deferred
//!   edge style cycles, which fire only through `poll_activations`.
//! - Gestures against unknown ids are no-ops and return `Ok`.
//! - A failed import leaves the diagram and the stored snapshot untouched.

use crate::interaction::activation::{ActivationDisambiguator, DEFAULT_ACTIVATION_WINDOW};
use crate::interaction::state::{InteractionState, LinkOutcome};
use crate::model::diagram::{Diagram, SnapshotError};
use crate::model::edge::{EdgeId, EdgeStyle};
use crate::model::node::{NodeId, NodeType};
use crate::render::{layout_edges, NodeView, RenderSurface, ViewOptions};
use crate::repo::snapshot_repo::{SnapshotStore, StoreError, DEFAULT_STORAGE_KEY};
use crate::service::export::suggested_file_name;
use chrono::Utc;
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use uuid::Uuid;

pub type SessionResult<T> = Result<T, SessionError>;

/// Errors surfaced to the UI by session operations.
#[derive(Debug)]
pub enum SessionError {
    Snapshot(SnapshotError),
    Store(StoreError),
    Io { path: PathBuf, source: std::io::Error },
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Snapshot(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "failed to persist diagram: {err}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Snapshot(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<SnapshotError> for SessionError {
    fn from(value: SnapshotError) -> Self {
        Self::Snapshot(value)
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Session settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Key the snapshot is stored under.
    pub storage_key: String,
    /// Window separating a single edge activation from a double one.
    pub activation_window: Duration,
    pub show_distractions: bool,
    pub show_details: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            activation_window: DEFAULT_ACTIVATION_WINDOW,
            show_distractions: true,
            show_details: true,
        }
    }
}

/// Single owner of the diagram, interaction state and collaborators.
pub struct EditorSession<S: SnapshotStore, R: RenderSurface> {
    store: S,
    surface: R,
    diagram: Diagram,
    interaction: InteractionState,
    activations: ActivationDisambiguator,
    view: ViewOptions,
}

impl<S: SnapshotStore, R: RenderSurface> EditorSession<S, R> {
    /// Starts a session from whatever `store` holds and renders it.
    ///
    /// A missing snapshot starts empty. A corrupt snapshot is logged and also
    /// starts empty; it is overwritten by the next mutation.
    ///
    /// # Errors
    /// - Returns `SessionError::Store` when the store cannot be read.
    pub fn open(store: S, surface: R, config: &EditorConfig) -> SessionResult<Self> {
        let diagram = match store.load()? {
            None => Diagram::new(),
            Some(payload) => Diagram::from_json(&payload).unwrap_or_else(|err| {
                warn!(
                    "event=session_open module=service status=error reason=corrupt_snapshot error={err}"
                );
                Diagram::new()
            }),
        };

        let mut session = Self {
            store,
            surface,
            diagram,
            interaction: InteractionState::new(),
            activations: ActivationDisambiguator::new(config.activation_window),
            view: ViewOptions {
                show_distractions: config.show_distractions,
                show_details: config.show_details,
            },
        };
        info!(
            "event=session_open module=service status=ok nodes={} edges={}",
            session.diagram.nodes().len(),
            session.diagram.edges().len()
        );
        session.render();
        Ok(session)
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn view_options(&self) -> ViewOptions {
        self.view
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    /// Adds a node of `node_type` at the origin and returns its id.
    pub fn add_node(&mut self, node_type: NodeType) -> SessionResult<NodeId> {
        let id = format!("n{}", Uuid::new_v4().simple());
        self.diagram
            .add_node(id.clone(), node_type, node_type.default_title());
        self.commit("node_add")?;
        Ok(id)
    }

    pub fn add_task(&mut self) -> SessionResult<NodeId> {
        self.add_node(NodeType::Task)
    }

    pub fn add_distraction(&mut self) -> SessionResult<NodeId> {
        self.add_node(NodeType::Distraction)
    }

    pub fn on_node_moved(&mut self, id: &str, x: f64, y: f64) -> SessionResult<()> {
        if !self.diagram.move_node(id, x, y) {
            return Ok(());
        }
        self.commit("node_move")
    }

    pub fn on_node_title_changed(&mut self, id: &str, text: &str) -> SessionResult<()> {
        if !self.diagram.rename_node(id, text) {
            return Ok(());
        }
        self.commit("node_rename")
    }

    pub fn on_title_changed(&mut self, text: &str) -> SessionResult<()> {
        self.diagram.set_title(text);
        self.commit("diagram_rename")
    }

    /// Advances a task's status, stamping completion with the current time.
    pub fn on_node_status_activated(&mut self, id: &str) -> SessionResult<()> {
        if self.diagram.advance_task_status(id, Utc::now()).is_none() {
            return Ok(());
        }
        self.commit("task_status")
    }

    pub fn on_distraction_bar_activated(&mut self, id: &str) -> SessionResult<()> {
        if self.diagram.advance_distraction_type(id).is_none() {
            return Ok(());
        }
        self.commit("distraction_type")
    }

    /// Edits a task's xp and deadline.
    pub fn update_task_details(&mut self, id: &str, xp: u32, deadline: &str) -> SessionResult<()> {
        if !self.diagram.update_task_details(id, xp, deadline) {
            return Ok(());
        }
        self.commit("task_details")
    }

    /// Feeds a node activation into selection and the link gesture.
    ///
    /// Returns `None` when `id` is not a node of the diagram.
    pub fn on_node_activated(&mut self, id: &str) -> SessionResult<Option<LinkOutcome>> {
        if self.diagram.node(id).is_none() {
            return Ok(None);
        }

        let outcome = self.interaction.activate_node(id);
        match &outcome {
            LinkOutcome::Completed { source, target } => {
                let edge_id = format!("e{}", Uuid::new_v4().simple());
                self.diagram.add_edge(edge_id, source.clone(), target.clone());
                self.commit("edge_add")?;
            }
            LinkOutcome::Started(_) | LinkOutcome::Cancelled(_) => self.render(),
        }
        Ok(Some(outcome))
    }

    /// Clears the selection, e.g. after a click on empty canvas.
    pub fn on_canvas_activated(&mut self) {
        if self.interaction.deselect().is_some() {
            self.render();
        }
    }

    /// Records a single activation on an edge; the style cycle is applied
    /// by `poll_activations` once the window has elapsed.
    pub fn on_edge_activated(&mut self, id: &str, now: Instant) {
        if self.diagram.edge(id).is_some() {
            self.activations.activate(id, now);
        }
    }

    /// Deletes an edge immediately, superseding a pending style cycle.
    pub fn on_edge_double_activated(&mut self, id: &str) -> SessionResult<()> {
        let edge_id = self.activations.double_activate(id);
        if !self.diagram.delete_edge(&edge_id) {
            return Ok(());
        }
        self.commit("edge_delete")
    }

    /// Applies every style cycle whose window elapsed by `now`.
    ///
    /// Returns the edges that changed, with their new style.
    pub fn poll_activations(&mut self, now: Instant) -> SessionResult<Vec<(EdgeId, EdgeStyle)>> {
        let mut applied = Vec::new();
        for edge_id in self.activations.poll(now) {
            if let Some(style) = self.diagram.cycle_edge_style(&edge_id) {
                self.commit("edge_style")?;
                applied.push((edge_id, style));
            }
        }
        Ok(applied)
    }

    /// When the caller should next call `poll_activations`.
    pub fn next_activation_deadline(&self) -> Option<Instant> {
        self.activations.next_deadline()
    }

    /// Deletes a node with its edges and drops it from interaction state.
    pub fn delete_node(&mut self, id: &str) -> SessionResult<()> {
        let touching: Vec<EdgeId> = self
            .diagram
            .edges()
            .iter()
            .filter(|edge| edge.touches(id))
            .map(|edge| edge.id.clone())
            .collect();

        let Some(cascaded) = self.diagram.delete_node(id) else {
            return Ok(());
        };
        for edge_id in &touching {
            self.activations.forget(edge_id);
        }
        self.interaction.forget_node(id);
        debug!("event=node_delete module=service status=ok cascaded_edges={cascaded}");
        self.commit("node_delete")
    }

    /// Deletes the selected node, if any.
    pub fn delete_selected(&mut self) -> SessionResult<()> {
        match self.interaction.selected().map(str::to_string) {
            Some(id) => self.delete_node(&id),
            None => Ok(()),
        }
    }

    /// Shows or hides distraction nodes. Returns the new visibility.
    pub fn toggle_distractions(&mut self) -> bool {
        self.view.show_distractions = !self.view.show_distractions;
        self.render();
        self.view.show_distractions
    }

    /// Shows or hides task details. Returns the new visibility.
    pub fn toggle_details(&mut self) -> bool {
        self.view.show_details = !self.view.show_details;
        self.render();
        self.view.show_details
    }

    /// Replaces the diagram with an empty one.
    pub fn clear_all(&mut self) -> SessionResult<()> {
        self.diagram = Diagram::new();
        self.interaction.reset();
        self.activations.clear();
        self.commit("diagram_clear")
    }

    /// Pretty-printed snapshot for export.
    pub fn export_json(&self) -> SessionResult<String> {
        Ok(self.diagram.to_json_pretty()?)
    }

    pub fn export_file_name(&self) -> String {
        suggested_file_name(self.diagram.title())
    }

    /// Writes the export into `dir` and returns the file path.
    pub fn export_to_dir(&self, dir: impl AsRef<Path>) -> SessionResult<PathBuf> {
        let path = dir.as_ref().join(self.export_file_name());
        let payload = self.export_json()?;
        std::fs::write(&path, payload).map_err(|source| SessionError::Io {
            path: path.clone(),
            source,
        })?;
        info!("event=diagram_export module=service status=ok");
        Ok(path)
    }

    /// Replaces the diagram with a parsed snapshot.
    ///
    /// # Errors
    /// - `SessionError::Snapshot` for malformed payloads; nothing changes.
    /// - `SessionError::Store` when the new snapshot cannot be persisted;
    ///   nothing changes either.
    pub fn import_json(&mut self, payload: &str) -> SessionResult<()> {
        let diagram = Diagram::from_json(payload).inspect_err(|err| {
            warn!("event=diagram_import module=service status=error error={err}");
        })?;
        self.store.save(&diagram.to_json()?)?;

        self.diagram = diagram;
        self.interaction.reset();
        self.activations.clear();
        info!(
            "event=diagram_import module=service status=ok nodes={} edges={}",
            self.diagram.nodes().len(),
            self.diagram.edges().len()
        );
        self.render();
        Ok(())
    }

    pub fn import_file(&mut self, path: impl AsRef<Path>) -> SessionResult<()> {
        let path = path.as_ref();
        let payload = std::fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.import_json(&payload)
    }

    /// Persists the whole snapshot, then re-renders.
    fn commit(&mut self, event: &str) -> SessionResult<()> {
        let result = self
            .diagram
            .to_json()
            .map_err(SessionError::from)
            .and_then(|payload| self.store.save(&payload).map_err(SessionError::from));
        match &result {
            Ok(()) => debug!("event={event} module=service status=ok"),
            Err(err) => error!("event={event} module=service status=error error={err}"),
        }
        self.render();
        result
    }

    fn render(&mut self) {
        let selected = self.interaction.selected();
        let link_source = self.interaction.link_source();
        let show_distractions = self.view.show_distractions;

        let views: Vec<NodeView<'_>> = self
            .diagram
            .nodes()
            .iter()
            .filter(|node| show_distractions || node.node_type() == NodeType::Task)
            .map(|node| NodeView {
                node,
                selected: selected == Some(node.id()),
                link_source: link_source == Some(node.id()),
            })
            .collect();
        self.surface.render_nodes(&views, self.view);

        let visible: HashSet<&str> = views.iter().map(|view| view.node.id()).collect();
        let edges = self.diagram.edges().iter().filter(|edge| {
            visible.contains(edge.source_id.as_str()) && visible.contains(edge.target_id.as_str())
        });
        let layouts = layout_edges(edges, &self.surface);
        self.surface.render_edges(&layouts);
    }
}
