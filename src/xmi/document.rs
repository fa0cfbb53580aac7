//! Owned, namespace-resolved XML element tree.
//!
//! The extractor walks the document several times (packaged elements,
//! comments, requirement stereotypes), so the input is read once into a
//! small tree rather than streamed. Text is kept verbatim, whitespace
//! included.

use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, QName, ResolveResult};

use crate::error::ConvertError;

/// A name with its resolved namespace URI and the literal prefix used in the
/// document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlName {
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub local: String,
}

impl XmlName {
    fn matches(&self, namespace: Option<&str>, local: &str) -> bool {
        self.local == local && self.namespace.as_deref() == namespace
    }
}

/// One attribute of an element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlAttribute {
    pub name: XmlName,
    pub value: String,
    /// Resolved namespace of a `prefix:local` value, for `xmi:type`-style
    /// attributes whose value prefix is bound in scope.
    pub value_namespace: Option<String>,
}

/// One element with its attributes, children and concatenated text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: XmlName,
    pub attributes: Vec<XmlAttribute>,
    pub children: Vec<XmlElement>,
    pub text: String,
}

impl XmlElement {
    /// Local tag name.
    pub fn local_name(&self) -> &str {
        &self.name.local
    }

    /// Unqualified attribute lookup (`name`, `type`, `association`, ...).
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.matches(None, local))
            .map(|a| a.value.as_str())
    }

    /// Attribute lookup by resolved namespace URI.
    pub fn attr_ns(&self, namespace: &str, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.matches(Some(namespace), local))
            .map(|a| a.value.as_str())
    }

    /// Attribute lookup by namespace URI, falling back to a literal prefix.
    ///
    /// Covers documents that bind `xmi:` to an older XMI namespace.
    pub fn attr_ns_or_prefix(&self, namespace: &str, prefix: &str, local: &str) -> Option<&str> {
        self.attribute_ns_or_prefix(namespace, prefix, local)
            .map(|a| a.value.as_str())
    }

    /// Like [`XmlElement::attr_ns_or_prefix`], returning the whole attribute.
    pub fn attribute_ns_or_prefix(
        &self,
        namespace: &str,
        prefix: &str,
        local: &str,
    ) -> Option<&XmlAttribute> {
        self.attributes
            .iter()
            .find(|a| a.name.matches(Some(namespace), local))
            .or_else(|| {
                self.attributes
                    .iter()
                    .find(|a| a.name.local == local && a.name.prefix.as_deref() == Some(prefix))
            })
    }

    /// First direct child with the given local name.
    pub fn child(&self, local: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.local_name() == local)
    }

    /// This element and all of its descendants, in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

// Deeply nested documents would otherwise recurse once per level on drop.
impl Drop for XmlElement {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut element) = pending.pop() {
            pending.append(&mut element.children);
        }
    }
}

/// Pre-order iterator over an element subtree.
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}

/// A parsed XML document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlDocument {
    pub root: XmlElement,
}

impl XmlDocument {
    /// Parse a complete document. Malformed markup is fatal.
    pub fn parse(input: &[u8]) -> Result<Self, ConvertError> {
        let mut reader = NsReader::from_reader(input);

        let mut buf = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let element = open_element(&reader, e)?;
                    stack.push(element);
                }
                Ok(Event::Empty(ref e)) => {
                    // Self-closing element - handle as start + end
                    let element = open_element(&reader, e)?;
                    close_element(element, &mut stack, &mut root)?;
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| ConvertError::xml("Unexpected closing tag"))?;
                    close_element(element, &mut stack, &mut root)?;
                }
                Ok(Event::Text(ref e)) => {
                    if let Some(current) = stack.last_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| ConvertError::xml(format!("Text error: {e}")))?;
                        current.text.push_str(&text);
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if let Some(current) = stack.last_mut() {
                        let text = std::str::from_utf8(&e[..])
                            .map_err(|e| ConvertError::xml(format!("Invalid UTF-8: {e}")))?;
                        current.text.push_str(text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ConvertError::xml(format!(
                        "XML parse error at position {}: {e}",
                        reader.error_position()
                    )));
                }
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(ConvertError::xml(format!(
                "Unexpected end of document inside <{}>",
                open.name.local
            )));
        }

        root.map(|root| Self { root })
            .ok_or_else(|| ConvertError::xml("Document has no root element"))
    }

    /// All elements in document order, root included.
    pub fn elements(&self) -> Descendants<'_> {
        self.root.descendants()
    }
}

fn close_element(
    element: XmlElement,
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
) -> Result<(), ConvertError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(ConvertError::xml(format!(
            "Multiple root elements: <{}>",
            element.name.local
        )));
    }
    *root = Some(element);
    Ok(())
}

fn open_element(reader: &NsReader<&[u8]>, e: &BytesStart<'_>) -> Result<XmlElement, ConvertError> {
    let (resolved, local) = reader.resolve_element(e.name());
    let name = XmlName {
        namespace: namespace_uri(resolved)?,
        prefix: prefix_of(e.name().prefix().map(|p| p.into_inner()))?,
        local: utf8(local.into_inner(), "tag name")?,
    };

    let mut attributes = Vec::new();
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| ConvertError::xml(format!("Attribute error: {e}")))?;
        let raw_key = attr.key.as_ref();
        if raw_key == b"xmlns" || raw_key.starts_with(b"xmlns:") {
            continue;
        }

        let (resolved, local) = reader.resolve_attribute(attr.key);
        let value = attr
            .unescape_value()
            .map_err(|e| ConvertError::xml(format!("Attribute value error: {e}")))?
            .to_string();
        let name = XmlName {
            namespace: namespace_uri(resolved)?,
            prefix: prefix_of(attr.key.prefix().map(|p| p.into_inner()))?,
            local: utf8(local.into_inner(), "attribute key")?,
        };
        let value_namespace = if name.prefix.is_some() && name.local == "type" {
            value_namespace(reader, &value)?
        } else {
            None
        };

        attributes.push(XmlAttribute {
            name,
            value,
            value_namespace,
        });
    }

    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn namespace_uri(resolved: ResolveResult<'_>) -> Result<Option<String>, ConvertError> {
    match resolved {
        ResolveResult::Bound(Namespace(uri)) => utf8(uri, "namespace").map(Some),
        ResolveResult::Unbound => Ok(None),
        // Undeclared prefix: keep the literal prefix only
        ResolveResult::Unknown(prefix) => {
            tracing::debug!(prefix = %String::from_utf8_lossy(&prefix), "Undeclared namespace prefix");
            Ok(None)
        }
    }
}

/// Namespace bound to the prefix of a `prefix:local` value such as `uml:Actor`.
fn value_namespace(reader: &NsReader<&[u8]>, value: &str) -> Result<Option<String>, ConvertError> {
    if !value.contains(':') {
        return Ok(None);
    }
    match reader.resolve_element(QName(value.as_bytes())).0 {
        ResolveResult::Bound(Namespace(uri)) => utf8(uri, "namespace").map(Some),
        _ => Ok(None),
    }
}

fn prefix_of(prefix: Option<&[u8]>) -> Result<Option<String>, ConvertError> {
    prefix.map(|p| utf8(p, "prefix")).transpose()
}

fn utf8(bytes: &[u8], what: &str) -> Result<String, ConvertError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| ConvertError::xml(format!("Invalid {what}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const XMI: &str = "http://www.omg.org/spec/XMI/20131001";
    const UML: &str = "http://www.eclipse.org/uml2/5.0.0/UML";

    #[test]
    fn test_parse_resolves_namespaces() {
        let doc = XmlDocument::parse(
            br#"<?xml version="1.0" encoding="UTF-8"?>
<xmi:XMI xmi:version="20131001" xmlns:xmi="http://www.omg.org/spec/XMI/20131001"
         xmlns:uml="http://www.eclipse.org/uml2/5.0.0/UML">
  <uml:Model xmi:id="m1" name="Model">
    <packagedElement xmi:type="uml:Actor" xmi:id="a1" name="Operator"/>
  </uml:Model>
</xmi:XMI>"#,
        )
        .expect("parse");

        assert_eq!(doc.root.local_name(), "XMI");
        assert_eq!(doc.root.name.namespace.as_deref(), Some(XMI));

        let model = &doc.root.children[0];
        assert_eq!(model.name.namespace.as_deref(), Some(UML));
        assert_eq!(model.attr_ns(XMI, "id"), Some("m1"));

        let actor = &model.children[0];
        assert_eq!(actor.local_name(), "packagedElement");
        assert_eq!(actor.name.namespace, None);
        assert_eq!(actor.attr_ns(XMI, "type"), Some("uml:Actor"));
        assert_eq!(actor.attr("name"), Some("Operator"));
        assert_eq!(actor.attr("id"), None);
    }

    #[test]
    fn test_prefix_fallback_for_other_xmi_versions() {
        let doc = XmlDocument::parse(
            br#"<xmi:XMI xmlns:xmi="http://www.omg.org/spec/XMI/20110701">
  <packagedElement xmi:id="a1"/>
</xmi:XMI>"#,
        )
        .expect("parse");

        let element = &doc.root.children[0];
        assert_eq!(element.attr_ns(XMI, "id"), None);
        assert_eq!(element.attr_ns_or_prefix(XMI, "xmi", "id"), Some("a1"));
    }

    #[test]
    fn test_text_and_child_lookup() {
        let doc = XmlDocument::parse(
            br#"<ownedComment annotatedElement="a1"><body>Line &amp; more</body></ownedComment>"#,
        )
        .expect("parse");

        let body = doc.root.child("body").expect("body child");
        assert_eq!(body.text, "Line & more");
    }

    #[test]
    fn test_text_keeps_surrounding_whitespace() {
        let doc = XmlDocument::parse(b"<body>\n  Indented note.\n</body>").expect("parse");
        assert_eq!(doc.root.text, "\n  Indented note.\n");
    }

    #[test]
    fn test_type_values_resolve_their_prefix() {
        let doc = XmlDocument::parse(
            br#"<xmi:XMI xmlns:xmi="http://www.omg.org/spec/XMI/20131001"
         xmlns:uml="http://www.eclipse.org/uml2/5.0.0/UML">
  <packagedElement xmi:type="uml:Actor" xmi:id="a1" type="c1"/>
  <packagedElement xmi:type="other:Actor" xmi:id="a2"/>
</xmi:XMI>"#,
        )
        .expect("parse");

        let bound = doc.root.children[0]
            .attribute_ns_or_prefix(XMI, "xmi", "type")
            .expect("xmi:type");
        assert_eq!(bound.value_namespace.as_deref(), Some(UML));
        let plain_type = doc.root.children[0]
            .attributes
            .iter()
            .find(|a| a.name.prefix.is_none() && a.name.local == "type")
            .expect("plain type");
        assert_eq!(plain_type.value_namespace, None);

        let unbound = doc.root.children[1]
            .attribute_ns_or_prefix(XMI, "xmi", "type")
            .expect("xmi:type");
        assert_eq!(unbound.value_namespace, None);
    }

    #[test]
    fn test_deep_nesting_parses_and_drops() {
        let depth = 100_000;
        let mut xml = "<a>".repeat(depth);
        xml.push_str(&"</a>".repeat(depth));

        let doc = XmlDocument::parse(xml.as_bytes()).expect("parse");
        assert_eq!(doc.elements().count(), depth);
        drop(doc);
    }

    #[test]
    fn test_descendants_in_document_order() {
        let doc = XmlDocument::parse(b"<a><b><c/></b><d/></a>").expect("parse");
        let order: Vec<_> = doc.elements().map(|e| e.local_name().to_string()).collect();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_mismatched_tags_are_fatal() {
        let err = XmlDocument::parse(b"<a><b></a>").unwrap_err();
        assert!(matches!(err, ConvertError::Xml(_)), "{err}");
    }

    #[test]
    fn test_unclosed_document_is_fatal() {
        let err = XmlDocument::parse(b"<a><b/>").unwrap_err();
        assert!(matches!(err, ConvertError::Xml(_)), "{err}");
    }

    #[test]
    fn test_empty_document_is_fatal() {
        let err = XmlDocument::parse(b"").unwrap_err();
        assert!(err.to_string().contains("no root"), "{err}");
    }
}
