//! Minimal RDF graph for the converter's output.
//!
//! The graph is an insertion-ordered set of triples plus prefix bindings.
//! Duplicate triples collapse, so callers can emit the same fact from
//! several places without producing duplicate output.

mod turtle;
mod vocab;

pub use turtle::{escape_literal, write_turtle};
pub use vocab::Vocabulary;

use indexmap::{IndexMap, IndexSet};

pub const RDF_NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NAMESPACE: &str = "http://www.w3.org/2000/01/rdf-schema#";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
pub const RDFS_SUB_PROPERTY_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subPropertyOf";

/// An RDF term.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// Absolute IRI.
    Iri(String),
    /// Plain string literal.
    Literal(String),
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            Self::Literal(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

/// Insertion-ordered triple set with prefix bindings.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    prefixes: IndexMap<String, String>,
    triples: IndexSet<Triple>,
}

impl Graph {
    /// Create a graph with the `rdf` and `rdfs` prefixes bound.
    pub fn new() -> Self {
        let mut graph = Self::default();
        graph.bind("rdf", RDF_NAMESPACE);
        graph.bind("rdfs", RDFS_NAMESPACE);
        graph
    }

    /// Bind `prefix` to `namespace`, replacing any earlier binding.
    pub fn bind(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Prefix bindings in bind order.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }

    /// Add one triple. Returns `false` when it was already present.
    pub fn add(&mut self, subject: Term, predicate: &str, object: Term) -> bool {
        self.triples.insert(Triple {
            subject,
            predicate: Term::iri(predicate),
            object,
        })
    }

    /// Create a node of type `class`, labeled when a label is given.
    pub fn create_typed_node(&mut self, node: &str, class: &str, label: Option<&str>) -> Term {
        let subject = Term::iri(node);
        self.add(subject.clone(), RDF_TYPE, Term::iri(class));
        if let Some(label) = label {
            self.add(subject.clone(), RDFS_LABEL, Term::literal(label));
        }
        subject
    }

    /// Attach a literal property.
    pub fn add_property(&mut self, subject: &Term, predicate: &str, value: &str) {
        self.add(subject.clone(), predicate, Term::literal(value));
    }

    /// Attach a directed edge `from --predicate--> to`.
    pub fn add_relation(&mut self, predicate: &str, from: &Term, to: &Term) {
        self.add(from.clone(), predicate, to.clone());
    }

    /// Attach an `rdfs:comment`.
    pub fn add_comment(&mut self, subject: &Term, text: &str) {
        self.add_property(subject, RDFS_COMMENT, text);
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn contains(&self, subject: &Term, predicate: &str, object: &Term) -> bool {
        self.triples.contains(&Triple {
            subject: subject.clone(),
            predicate: Term::iri(predicate),
            object: object.clone(),
        })
    }

    /// All triples in insertion order.
    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Triples whose predicate is `predicate`.
    pub fn triples_with_predicate<'g>(
        &'g self,
        predicate: &'g str,
    ) -> impl Iterator<Item = &'g Triple> + 'g {
        self.triples
            .iter()
            .filter(move |t| t.predicate.as_iri() == Some(predicate))
    }

    /// Objects of `subject --predicate--> ?`.
    pub fn objects<'g>(
        &'g self,
        subject: &'g Term,
        predicate: &'g str,
    ) -> impl Iterator<Item = &'g Term> + 'g {
        self.triples_with_predicate(predicate)
            .filter(move |t| &t.subject == subject)
            .map(|t| &t.object)
    }

    /// Serialize as Turtle.
    pub fn to_turtle(&self) -> String {
        write_turtle(self)
    }
}
