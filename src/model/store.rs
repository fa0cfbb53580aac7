//! Identifier-keyed element store.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{Aggregation, ElementId, ElementType};

// ============================================================================
// RECORDS
// ============================================================================

/// Requirement stereotype data attached to a class.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementData {
    /// External requirement identifier (the stereotype's `id`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement_id: Option<String>,

    /// Requirement text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Everything known about one element ID.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRecord {
    /// Explicitly set kind. `None` for stubs created through references.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ElementType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Attached comment bodies, in encounter order.
    #[serde(rename = "comment", default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,

    /// Endpoint references (association records).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<ElementId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Aggregation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement: Option<RequirementData>,

    /// Child requirements. `Some` only once the class is confirmed as a
    /// requirement-bearing class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<Vec<ElementId>>,

    /// Use cases that name this record as their subject.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub use_cases: Vec<ElementId>,
}

impl ElementRecord {
    /// Whether the record's kind was explicitly set to `kind`.
    pub fn is(&self, kind: ElementType) -> bool {
        self.kind == Some(kind)
    }

    /// Whether the record has been confirmed as a requirement-bearing class.
    pub fn is_requirement_class(&self) -> bool {
        self.nested.is_some()
    }
}

/// A scalar field write for [`ElementStore::set`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Field {
    Type(ElementType),
    Name(String),
    Aggregation(Aggregation),
    RequirementId(String),
    Text(String),
}

/// A list append for [`ElementStore::append`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    Comment(String),
    Node(ElementId),
    Nested(ElementId),
    UseCase(ElementId),
}

// ============================================================================
// STORE
// ============================================================================

/// Identifier-keyed element records, in first-reference order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementStore {
    records: IndexMap<ElementId, ElementRecord>,
}

impl ElementStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn record_mut(&mut self, id: &ElementId) -> &mut ElementRecord {
        self.records.entry(id.clone()).or_default()
    }

    /// Overwrite one scalar field, creating the record if absent.
    pub fn set(&mut self, id: &ElementId, field: Field) {
        let record = self.record_mut(id);
        match field {
            Field::Type(kind) => record.kind = Some(kind),
            Field::Name(name) => record.name = Some(name),
            Field::Aggregation(aggregation) => record.aggregation = Some(aggregation),
            Field::RequirementId(requirement_id) => {
                record.requirement.get_or_insert_with(Default::default).requirement_id =
                    Some(requirement_id);
            }
            Field::Text(text) => {
                record.requirement.get_or_insert_with(Default::default).text = Some(text);
            }
        }
    }

    /// Append to one list field, creating the record and list if absent.
    pub fn append(&mut self, id: &ElementId, entry: Entry) {
        let record = self.record_mut(id);
        match entry {
            Entry::Comment(body) => record.comments.push(body),
            Entry::Node(node) => record.nodes.push(node),
            Entry::Nested(child) => record.nested.get_or_insert_with(Vec::new).push(child),
            Entry::UseCase(use_case) => record.use_cases.push(use_case),
        }
    }

    /// Confirm `id` as a requirement-bearing class by giving it a `nested` list.
    pub fn init_nested(&mut self, id: &ElementId) {
        self.record_mut(id).nested.get_or_insert_with(Vec::new);
    }

    pub fn get(&self, id: &ElementId) -> Option<&ElementRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.records.contains_key(id)
    }

    /// Number of records, typed or not.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all records in first-reference order.
    pub fn iter(&self) -> impl Iterator<Item = (&ElementId, &ElementRecord)> {
        self.records.iter()
    }

    /// The kind of the record for `id`, if it exists and is typed.
    pub fn kind_of(&self, id: &ElementId) -> Option<ElementType> {
        self.records.get(id).and_then(|record| record.kind)
    }

    /// All records explicitly typed as `kind`.
    pub fn select_by_type(&self, kind: ElementType) -> IndexMap<&ElementId, &ElementRecord> {
        self.records
            .iter()
            .filter(|(_, record)| record.is(kind))
            .collect()
    }

    pub fn actors(&self) -> IndexMap<&ElementId, &ElementRecord> {
        self.select_by_type(ElementType::Actor)
    }

    pub fn use_cases(&self) -> IndexMap<&ElementId, &ElementRecord> {
        self.select_by_type(ElementType::UseCase)
    }

    pub fn classes(&self) -> IndexMap<&ElementId, &ElementRecord> {
        self.select_by_type(ElementType::Class)
    }

    pub fn associations(&self) -> IndexMap<&ElementId, &ElementRecord> {
        self.select_by_type(ElementType::Association)
    }

    pub fn components(&self) -> IndexMap<&ElementId, &ElementRecord> {
        self.select_by_type(ElementType::Component)
    }

    pub fn dependencies(&self) -> IndexMap<&ElementId, &ElementRecord> {
        self.select_by_type(ElementType::Dependency)
    }

    /// Records carrying requirement stereotype data, typed or not.
    pub fn requirements(&self) -> IndexMap<&ElementId, &ElementRecord> {
        self.records
            .iter()
            .filter(|(_, record)| record.requirement.is_some())
            .collect()
    }

    /// Pick the endpoints of `record` typed `type_a` and `type_b`.
    ///
    /// Referenced IDs are bucketed by their own record's kind; IDs with no
    /// record or no kind fall out. For equal types the bucket must hold
    /// exactly two IDs, otherwise each bucket must hold exactly one. The
    /// result follows the argument order.
    pub fn resolve_pair(
        &self,
        record: &ElementRecord,
        type_a: ElementType,
        type_b: ElementType,
    ) -> Option<(ElementId, ElementId)> {
        let mut buckets: IndexMap<ElementType, Vec<&ElementId>> = IndexMap::new();
        for node in &record.nodes {
            if let Some(kind) = self.kind_of(node) {
                buckets.entry(kind).or_default().push(node);
            }
        }

        let bucket = |kind: ElementType| buckets.get(&kind).map(Vec::as_slice).unwrap_or(&[]);

        if type_a == type_b {
            return match bucket(type_a) {
                [first, second] => Some(((*first).clone(), (*second).clone())),
                _ => None,
            };
        }

        match (bucket(type_a), bucket(type_b)) {
            ([a], [b]) => Some(((*a).clone(), (*b).clone())),
            _ => None,
        }
    }

    /// Snapshot of the type-filtered collections.
    pub fn summary(&self) -> StoreSummary<'_> {
        StoreSummary {
            actors: self.actors(),
            use_cases: self.use_cases(),
            classes: self.classes(),
            associations: self.associations(),
            dependencies: self.dependencies(),
            components: self.components(),
        }
    }
}

/// Serializable view of the type-filtered collections, used by the
/// verbose dump.
#[derive(Debug, Serialize)]
pub struct StoreSummary<'s> {
    pub actors: IndexMap<&'s ElementId, &'s ElementRecord>,
    pub use_cases: IndexMap<&'s ElementId, &'s ElementRecord>,
    pub classes: IndexMap<&'s ElementId, &'s ElementRecord>,
    pub associations: IndexMap<&'s ElementId, &'s ElementRecord>,
    pub dependencies: IndexMap<&'s ElementId, &'s ElementRecord>,
    pub components: IndexMap<&'s ElementId, &'s ElementRecord>,
}
