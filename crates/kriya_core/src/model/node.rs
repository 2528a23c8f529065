//! Node domain model.
//!
//! # Responsibility
//! - Define the positioned canvas entity and its two variants.
//! - Own the cyclic task status and distraction category progressions.
//!
//! # Invariants
//! - `id` and the variant tag never change after creation.
//! - `completed_time` is set iff `status == TaskStatus::Done`, maintained by
//!   `TaskFields::advance_status`; no other setter exists.
//! - Serialized nodes carry only the fields of their own variant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque node identifier assigned by the caller at creation.
pub type NodeId = String;

/// Placeholder used when a title is edited down to empty text.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Number of distraction categories in the fixed palette.
pub const DISTRACTION_TYPE_COUNT: u8 = 8;

/// Distraction category colours, indexed by `DistractionType`.
pub const DISTRACTION_PALETTE: [&str; DISTRACTION_TYPE_COUNT as usize] = [
    "#333333", "#3498db", "#c0392b", "#e75c12", "#2ecc71", "#e9c40f", "#f0f0f0", "#9b59b6",
];

/// Variant tag of a node, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    #[serde(rename = "TASK")]
    Task,
    #[serde(rename = "DISTRACTION")]
    Distraction,
}

impl NodeType {
    /// Title given to freshly added nodes of this type.
    pub fn default_title(self) -> &'static str {
        match self {
            Self::Task => "New Task",
            Self::Distraction => "Distr.",
        }
    }
}

/// Task lifecycle state. Strictly cyclic: todo -> in-progress -> done -> todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo = 0,
    InProgress = 1,
    Done = 2,
}

impl TaskStatus {
    /// Cycle order. Discriminants index into this array.
    pub const CYCLE: [TaskStatus; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Returns the successor in the cycle.
    pub fn next(self) -> Self {
        Self::CYCLE[(self as usize + 1) % Self::CYCLE.len()]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }

    /// Indicator colour used by rendering surfaces.
    pub fn color(self) -> &'static str {
        match self {
            Self::Todo => "#e74c3c",
            Self::InProgress => "#f1c40f",
            Self::Done => "#2ecc71",
        }
    }

    /// Parses the wire value, also accepting the upper-case spellings older
    /// files were written with.
    fn parse(value: &str) -> Option<Self> {
        match value {
            "TODO" => Some(Self::Todo),
            "IN_PROGRESS" => Some(Self::InProgress),
            "COMPLETE" => Some(Self::Done),
            _ => Self::CYCLE.into_iter().find(|status| status.as_str() == value),
        }
    }
}

/// Index into `DISTRACTION_PALETTE`, always `< DISTRACTION_TYPE_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DistractionType(u8);

/// Rejected distraction category index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistractionTypeOutOfRange(pub u8);

impl Display for DistractionTypeOutOfRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "distractionType {} is outside palette range 0..{}",
            self.0, DISTRACTION_TYPE_COUNT
        )
    }
}

impl std::error::Error for DistractionTypeOutOfRange {}

impl DistractionType {
    pub fn new(index: u8) -> Result<Self, DistractionTypeOutOfRange> {
        if index < DISTRACTION_TYPE_COUNT {
            Ok(Self(index))
        } else {
            Err(DistractionTypeOutOfRange(index))
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Returns `(current + 1) mod 8`.
    pub fn next(self) -> Self {
        Self((self.0 + 1) % DISTRACTION_TYPE_COUNT)
    }

    pub fn color(self) -> &'static str {
        DISTRACTION_PALETTE[usize::from(self.0)]
    }
}

impl TryFrom<u8> for DistractionType {
    type Error = DistractionTypeOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DistractionType> for u8 {
    fn from(value: DistractionType) -> Self {
        value.0
    }
}

/// Task-only payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFields {
    #[serde(default, deserialize_with = "status_or_todo")]
    status: TaskStatus,
    /// Experience points awarded for the task.
    #[serde(default)]
    pub xp: u32,
    /// Date string, or empty when unset.
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    completed_time: Option<DateTime<Utc>>,
}

impl TaskFields {
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn completed_time(&self) -> Option<DateTime<Utc>> {
        self.completed_time
    }

    /// Advances the status one step and applies the completion stamp.
    ///
    /// Entering `done` stamps `now`; the wrap `done -> todo` clears the stamp.
    pub fn advance_status(&mut self, now: DateTime<Utc>) -> TaskStatus {
        let next = self.status.next();
        match next {
            TaskStatus::Done => self.completed_time = Some(now),
            TaskStatus::Todo => self.completed_time = None,
            TaskStatus::InProgress => {}
        }
        self.status = next;
        next
    }
}

/// Distraction-only payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistractionFields {
    #[serde(default, deserialize_with = "distraction_type_or_default")]
    pub distraction_type: DistractionType,
}

/// Variant payload; the serde tag doubles as the wire `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    #[serde(rename = "TASK")]
    Task(TaskFields),
    #[serde(rename = "DISTRACTION")]
    Distraction(DistractionFields),
}

impl NodeKind {
    /// Variant payload with creation defaults.
    pub fn with_defaults(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Task => Self::Task(TaskFields::default()),
            NodeType::Distraction => Self::Distraction(DistractionFields::default()),
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Task(_) => NodeType::Task,
            Self::Distraction(_) => NodeType::Distraction,
        }
    }
}

/// Positioned canvas entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    #[serde(flatten)]
    kind: NodeKind,
    pub x: f64,
    pub y: f64,
    pub title: String,
}

impl Node {
    /// Creates a node at the origin with variant defaults.
    pub fn new(id: impl Into<NodeId>, node_type: NodeType, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::with_defaults(node_type),
            x: 0.0,
            y: 0.0,
            title: normalize_title(title.into()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn task(&self) -> Option<&TaskFields> {
        match &self.kind {
            NodeKind::Task(task) => Some(task),
            NodeKind::Distraction(_) => None,
        }
    }

    pub fn task_mut(&mut self) -> Option<&mut TaskFields> {
        match &mut self.kind {
            NodeKind::Task(task) => Some(task),
            NodeKind::Distraction(_) => None,
        }
    }

    pub fn distraction(&self) -> Option<&DistractionFields> {
        match &self.kind {
            NodeKind::Distraction(fields) => Some(fields),
            NodeKind::Task(_) => None,
        }
    }

    /// Replaces the title, normalizing empty text to `DEFAULT_TITLE`.
    pub fn set_title(&mut self, text: impl Into<String>) {
        self.title = normalize_title(text.into());
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Advances the task status. Returns `None` for distraction nodes.
    pub fn advance_status(&mut self, now: DateTime<Utc>) -> Option<TaskStatus> {
        self.task_mut().map(|task| task.advance_status(now))
    }

    /// Advances the distraction category. Returns `None` for task nodes.
    pub fn advance_distraction_type(&mut self) -> Option<DistractionType> {
        match &mut self.kind {
            NodeKind::Distraction(fields) => {
                fields.distraction_type = fields.distraction_type.next();
                Some(fields.distraction_type)
            }
            NodeKind::Task(_) => None,
        }
    }
}

/// Substitutes `DEFAULT_TITLE` for blank text; other text is kept as typed.
pub fn normalize_title(text: String) -> String {
    if text.trim().is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        text
    }
}

// Absent, null and empty statuses all load as `todo`.
fn status_or_todo<'de, D>(deserializer: D) -> Result<TaskStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(TaskStatus::Todo),
        Some(value) => TaskStatus::parse(value).ok_or_else(|| {
            serde::de::Error::unknown_variant(value, &["todo", "in-progress", "done"])
        }),
    }
}

// A null category loads as the first palette entry.
fn distraction_type_or_default<'de, D>(deserializer: D) -> Result<DistractionType, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<u8>::deserialize(deserializer)? {
        None => Ok(DistractionType::default()),
        Some(index) => DistractionType::new(index).map_err(serde::de::Error::custom),
    }
}
