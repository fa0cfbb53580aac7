//! Conversion settings.
//!
//! A [`Config`] carries the namespace URIs used to recognise the input
//! document and the namespaces minted into the output graph. Every field has
//! a default, so a config file only needs the keys it overrides:
//!
//! ```json
//! {
//!   "namespaces": { "uml": "http://www.eclipse.org/uml2/5.0.0/UML" },
//!   "output": { "vocabulary_namespace": "http://example.org/sysml#" }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Default XMI namespace.
pub const XMI_NAMESPACE: &str = "http://www.omg.org/spec/XMI/20131001";
/// Default UML namespace.
pub const UML_NAMESPACE: &str = "http://www.eclipse.org/uml2/5.0.0/UML";
/// Default SysML requirements profile namespace.
pub const REQ_NAMESPACE: &str = "http://www.eclipse.org/papyrus/sysml/1.6/SysML/Requirements";

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input namespaces.
    pub namespaces: Namespaces,

    /// Output vocabulary and element namespaces.
    pub output: OutputConfig,
}

impl Config {
    /// Parse a JSON config document.
    pub fn from_json(input: &[u8]) -> Result<Self, ConvertError> {
        serde_json::from_slice(input).map_err(|e| ConvertError::config(e.to_string()))
    }

    /// Load the config at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConvertError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let bytes = std::fs::read(path).map_err(|e| ConvertError::read(path, e))?;
        let config = Self::from_json(&bytes)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}

/// Namespace URIs of the input document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Namespaces {
    /// XMI root-metadata namespace (`xmi:id`, `xmi:type`).
    pub xmi: String,
    /// UML model namespace.
    pub uml: String,
    /// SysML requirements profile namespace.
    pub requirements: String,
}

impl Default for Namespaces {
    fn default() -> Self {
        Self {
            xmi: XMI_NAMESPACE.to_string(),
            uml: UML_NAMESPACE.to_string(),
            requirements: REQ_NAMESPACE.to_string(),
        }
    }
}

/// Namespaces and prefixes of the emitted graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Prefix bound to the vocabulary namespace.
    pub vocabulary_prefix: String,
    /// Namespace of node types, edge types and properties.
    pub vocabulary_namespace: String,
    /// Prefix bound to the element namespace.
    pub element_prefix: String,
    /// Namespace that element IDs are minted into.
    pub element_namespace: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            vocabulary_prefix: "sysml".to_string(),
            vocabulary_namespace: "http://example.org/sysml#".to_string(),
            element_prefix: "elem".to_string(),
            element_namespace: "http://example.org/sysml/element#".to_string(),
        }
    }
}
