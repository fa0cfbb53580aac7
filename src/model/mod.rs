//! Element model extracted from XMI.
//!
//! ```text
//! ElementStore
//! └── records: IndexMap<ElementId, ElementRecord>  (preserves first-reference order)
//! ```
//!
//! Records are merge targets: the same ID can be touched by several
//! extraction passes (a bare association reference first, the owning
//! element later) and every pass only adds fields.

mod store;

pub use store::{ElementRecord, ElementStore, Entry, Field, RequirementData, StoreSummary};

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

// ============================================================================
// IDs
// ============================================================================

/// Opaque identifier of a model element (`xmi:id`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub SmolStr);

impl ElementId {
    /// Create a new element ID.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(SmolStr::new(id))
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

// ============================================================================
// ELEMENT TYPES
// ============================================================================

/// The modeled kind of an element.
///
/// Only these kinds are tracked; any other `xmi:type` leaves a record
/// untyped, which keeps it out of every type-filtered query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Actor,
    UseCase,
    Class,
    Association,
    Component,
    Requirement,
    Dependency,
}

impl ElementType {
    /// Parse an XMI type tag such as `uml:Actor`.
    ///
    /// The prefix is ignored so documents binding UML to another prefix
    /// still resolve.
    pub fn from_xmi_type(xmi_type: &str) -> Option<Self> {
        let local = xmi_type.rsplit(':').next().unwrap_or(xmi_type);
        match local {
            "Actor" => Some(Self::Actor),
            "UseCase" => Some(Self::UseCase),
            "Class" => Some(Self::Class),
            "Association" => Some(Self::Association),
            "Component" => Some(Self::Component),
            "Requirement" => Some(Self::Requirement),
            "Dependency" => Some(Self::Dependency),
            _ => None,
        }
    }

    /// The canonical `uml:` tag for this kind.
    pub fn xmi_type(self) -> &'static str {
        match self {
            Self::Actor => "uml:Actor",
            Self::UseCase => "uml:UseCase",
            Self::Class => "uml:Class",
            Self::Association => "uml:Association",
            Self::Component => "uml:Component",
            Self::Requirement => "sysml:Requirement",
            Self::Dependency => "uml:Dependency",
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.xmi_type())
    }
}

/// UML aggregation qualifier of an association end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Composite,
    Shared,
    None,
}

impl Aggregation {
    /// Parse the UML `aggregation` attribute value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "composite" => Some(Self::Composite),
            "shared" => Some(Self::Shared),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}
