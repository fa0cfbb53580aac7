//! Output vocabulary and IRI minting.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use super::Graph;
use crate::config::OutputConfig;
use crate::model::ElementId;

/// Characters escaped when an XMI ID or name becomes part of an IRI.
const IRI_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Vocabulary IRIs of the emitted graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabulary {
    prefix: String,
    namespace: String,
    element_prefix: String,
    element_namespace: String,
}

impl Vocabulary {
    // Node types
    pub const ACTOR: &'static str = "Actor";
    pub const USE_CASE: &'static str = "UseCase";
    pub const BLOCK: &'static str = "Block";
    pub const SUBJECT: &'static str = "Subject";
    pub const REQUIREMENT: &'static str = "Requirement";

    // Edge and property types
    pub const COMPOSITION: &'static str = "composition";
    pub const SHARED: &'static str = "shared";
    pub const ASSOCIATION: &'static str = "association";
    pub const HAS_SUBJECT: &'static str = "hasSubject";
    pub const REQUIREMENT_TEXT: &'static str = "requirementText";
    pub const REQUIREMENT_ID: &'static str = "requirementId";
    pub const NESTED_REQUIREMENT: &'static str = "nestedRequirement";

    pub fn new(output: &OutputConfig) -> Self {
        Self {
            prefix: output.vocabulary_prefix.clone(),
            namespace: output.vocabulary_namespace.clone(),
            element_prefix: output.element_prefix.clone(),
            element_namespace: output.element_namespace.clone(),
        }
    }

    /// Bind the vocabulary and element prefixes on `graph`.
    pub fn bind(&self, graph: &mut Graph) {
        graph.bind(&self.prefix, &self.namespace);
        graph.bind(&self.element_prefix, &self.element_namespace);
    }

    /// IRI of a vocabulary term such as [`Vocabulary::ACTOR`].
    pub fn term(&self, local: &str) -> String {
        format!("{}{local}", self.namespace)
    }

    /// IRI of a model element, keyed by its XMI ID.
    pub fn element(&self, id: &ElementId) -> String {
        format!("{}{}", self.element_namespace, encode(id.as_str()))
    }

    /// IRI of the sub-property of `association` for a named association.
    pub fn named_association(&self, name: &str) -> String {
        format!("{}{}/{}", self.namespace, Self::ASSOCIATION, encode(name))
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(&OutputConfig::default())
    }
}

fn encode(s: &str) -> String {
    utf8_percent_encode(s, IRI_ENCODE_SET).to_string()
}
