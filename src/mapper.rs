//! Maps an [`ElementStore`] onto an RDF [`Graph`].
//!
//! Emission order is fixed: actors, use cases, classes, requirement
//! records, components, association edges, then subject edges. Node IRIs
//! are minted from element IDs, so an edge can name its endpoints without
//! looking the nodes up again.

use tracing::{debug, info, trace, warn};

use crate::config::Config;
use crate::model::{Aggregation, ElementId, ElementRecord, ElementStore, ElementType};
use crate::rdf::{Graph, RDFS_LABEL, RDFS_SUB_PROPERTY_OF, Term, Vocabulary};

/// Endpoint shapes resolved for every association, as `(from, to)`.
const ASSOCIATION_SHAPES: [(ElementType, ElementType); 3] = [
    (ElementType::UseCase, ElementType::Actor),
    (ElementType::Actor, ElementType::Class),
    (ElementType::Class, ElementType::Class),
];

pub struct GraphMapper<'s> {
    store: &'s ElementStore,
    vocab: Vocabulary,
    graph: Graph,
}

impl<'s> GraphMapper<'s> {
    pub fn new(store: &'s ElementStore, config: &Config) -> Self {
        let vocab = Vocabulary::new(&config.output);
        let mut graph = Graph::new();
        vocab.bind(&mut graph);
        Self { store, vocab, graph }
    }

    /// Build the graph.
    pub fn map(mut self) -> Graph {
        let store = self.store;

        for (id, record) in store.actors() {
            self.add_node(id, record, Vocabulary::ACTOR);
        }
        for (id, record) in store.use_cases() {
            self.add_node(id, record, Vocabulary::USE_CASE);
        }
        for (id, record) in store.classes() {
            if record.is_requirement_class() {
                self.add_requirement(id, record);
            } else {
                self.add_node(id, record, Vocabulary::BLOCK);
            }
        }
        for (id, record) in store.select_by_type(ElementType::Requirement) {
            self.add_requirement(id, record);
        }
        for (id, record) in store.components() {
            self.add_node(id, record, Vocabulary::SUBJECT);
        }
        for (id, record) in store.associations() {
            self.add_association(id, record);
        }
        for (id, record) in store.iter().filter(|(_, r)| r.kind.is_some()) {
            self.add_subject_edges(id, record);
        }

        info!(triples = self.graph.len(), "Mapped model to RDF");
        self.graph
    }

    fn node(&self, id: &ElementId) -> Term {
        Term::iri(self.vocab.element(id))
    }

    fn add_node(&mut self, id: &ElementId, record: &ElementRecord, class: &str) -> Term {
        debug!(id = %id, class, "Node");
        let node = self.graph.create_typed_node(
            &self.vocab.element(id),
            &self.vocab.term(class),
            record.name.as_deref(),
        );
        if !record.comments.is_empty() {
            self.graph.add_comment(&node, &record.comments.join("\n"));
        }
        node
    }

    fn add_requirement(&mut self, id: &ElementId, record: &ElementRecord) {
        let node = self.add_node(id, record, Vocabulary::REQUIREMENT);

        if let Some(requirement) = &record.requirement {
            if let Some(text) = &requirement.text {
                let predicate = self.vocab.term(Vocabulary::REQUIREMENT_TEXT);
                self.graph.add_property(&node, &predicate, text);
            }
            if let Some(requirement_id) = &requirement.requirement_id {
                let predicate = self.vocab.term(Vocabulary::REQUIREMENT_ID);
                self.graph.add_property(&node, &predicate, requirement_id);
            }
        }

        let predicate = self.vocab.term(Vocabulary::NESTED_REQUIREMENT);
        for child in record.nested.iter().flatten() {
            let child = self.node(child);
            self.graph.add_relation(&predicate, &node, &child);
        }
    }

    /// Edge predicate for an association: aggregation first, then name.
    /// The name is returned when the predicate is a named sub-property.
    fn association_predicate<'r>(&self, record: &'r ElementRecord) -> (String, Option<&'r str>) {
        match record.aggregation {
            Some(Aggregation::Composite) => (self.vocab.term(Vocabulary::COMPOSITION), None),
            Some(Aggregation::Shared) => (self.vocab.term(Vocabulary::SHARED), None),
            _ => match record.name.as_deref().filter(|name| !name.is_empty()) {
                Some(name) => (self.vocab.named_association(name), Some(name)),
                None => (self.vocab.term(Vocabulary::ASSOCIATION), None),
            },
        }
    }

    fn add_association(&mut self, id: &ElementId, record: &ElementRecord) {
        let (predicate, name) = self.association_predicate(record);

        for (from_type, to_type) in ASSOCIATION_SHAPES {
            let Some((from, to)) = self.store.resolve_pair(record, from_type, to_type) else {
                trace!(association = %id, ?from_type, ?to_type, "No endpoint pair");
                continue;
            };
            debug!(association = %id, from = %from, to = %to, predicate = %predicate, "Association edge");

            if let Some(name) = name {
                self.declare_named_association(&predicate, name);
            }
            let (from, to) = (self.node(&from), self.node(&to));
            self.graph.add_relation(&predicate, &from, &to);
        }
    }

    fn declare_named_association(&mut self, predicate: &str, name: &str) {
        let property = Term::iri(predicate);
        let parent = Term::iri(self.vocab.term(Vocabulary::ASSOCIATION));
        self.graph.add_relation(RDFS_SUB_PROPERTY_OF, &property, &parent);
        self.graph.add_property(&property, RDFS_LABEL, name);
    }

    fn add_subject_edges(&mut self, subject: &ElementId, record: &ElementRecord) {
        if record.use_cases.is_empty() {
            return;
        }
        let predicate = self.vocab.term(Vocabulary::HAS_SUBJECT);
        let subject_node = self.node(subject);

        for use_case in &record.use_cases {
            if self.store.kind_of(use_case) != Some(ElementType::UseCase) {
                warn!(subject = %subject, use_case = %use_case, "Subject refers to an element that is not a use case; skipping");
                continue;
            }
            let use_case = self.node(use_case);
            self.graph.add_relation(&predicate, &use_case, &subject_node);
        }
    }
}
