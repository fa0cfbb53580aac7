//! Model extraction from an XMI document into an [`ElementStore`].
//!
//! Extraction runs three passes over the document tree:
//!
//! 1. **Packaged elements** - every `packagedElement`, `nestedClassifier` and
//!    `ownedUseCase` records its name and type; direct children are routed
//!    through the [`InjectionTable`] (association ends, owned use cases).
//! 2. **Comments** - `uml:Comment` bodies are appended to the elements they
//!    annotate.
//! 3. **Requirements** - requirement stereotypes seed the class they extend,
//!    then requirement classes nested inside each other are linked
//!    parent → child.
//!
//! References to IDs that are not declared anywhere in the document are
//! logged and skipped; they never abort extraction.

use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, trace, warn};

use super::document::{XmlDocument, XmlElement};
use crate::config::Namespaces;
use crate::model::{Aggregation, ElementId, ElementStore, ElementType, Entry, Field};

/// Tags of elements visited in the packaged-element pass.
const MODELED_TAGS: &[&str] = &["packagedElement", "nestedClassifier", "ownedUseCase"];

// ============================================================================
// CONTEXT
// ============================================================================

/// Per-document lookup state shared by all passes and handlers.
pub struct XmiContext<'d> {
    namespaces: &'d Namespaces,
    declared: FxHashSet<&'d str>,
}

impl<'d> XmiContext<'d> {
    fn new(namespaces: &'d Namespaces, doc: &'d XmlDocument) -> Self {
        let mut cx = Self {
            namespaces,
            declared: FxHashSet::default(),
        };
        let declared = doc.elements().filter_map(|e| cx.raw_id(e)).collect();
        cx.declared = declared;
        cx
    }

    fn raw_id<'e>(&self, element: &'e XmlElement) -> Option<&'e str> {
        element.attr_ns_or_prefix(&self.namespaces.xmi, "xmi", "id")
    }

    /// The element's `xmi:id`.
    pub fn id(&self, element: &XmlElement) -> Option<ElementId> {
        self.raw_id(element).map(ElementId::new)
    }

    /// The element's `xmi:type`.
    pub fn xmi_type<'e>(&self, element: &'e XmlElement) -> Option<&'e str> {
        element.attr_ns_or_prefix(&self.namespaces.xmi, "xmi", "type")
    }

    /// Whether `id` is the `xmi:id` of some element in the document.
    pub fn is_declared(&self, id: &str) -> bool {
        self.declared.contains(id)
    }

    /// Local part of the element's `xmi:type` when the type's prefix
    /// resolves to `namespace`.
    ///
    /// Values whose prefix is not bound in the document are matched by
    /// local name alone.
    fn type_in<'e>(&self, element: &'e XmlElement, namespace: &str) -> Option<&'e str> {
        let attribute = element.attribute_ns_or_prefix(&self.namespaces.xmi, "xmi", "type")?;
        let local = attribute.value.rsplit(':').next()?;
        match attribute.value_namespace.as_deref() {
            Some(bound) if bound != namespace => None,
            _ => Some(local),
        }
    }

    /// The modeled kind of an element, from a UML type or the requirements
    /// profile's `Requirement`.
    pub fn element_type(&self, element: &XmlElement) -> Option<ElementType> {
        if let Some(local) = self.type_in(element, &self.namespaces.uml) {
            return ElementType::from_xmi_type(local);
        }
        self.type_in(element, &self.namespaces.requirements)
            .filter(|local| *local == "Requirement")
            .map(|_| ElementType::Requirement)
    }

    fn child_shape(&self, element: &XmlElement) -> Option<ChildShape> {
        self.type_in(element, &self.namespaces.uml)
            .and_then(ChildShape::from_xmi_type)
    }

    fn has_uml_type(&self, element: &XmlElement, local: &str) -> bool {
        self.type_in(element, &self.namespaces.uml) == Some(local)
    }

    fn is_class(&self, element: &XmlElement) -> bool {
        self.has_uml_type(element, "Class")
    }
}

// ============================================================================
// INJECTION TABLE
// ============================================================================

/// Shape of a child element that a handler can consume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChildShape {
    /// `uml:Property` (`ownedAttribute`, `ownedEnd`).
    Property,
    /// `uml:UseCase` (`ownedUseCase`).
    UseCase,
}

impl ChildShape {
    pub fn from_xmi_type(xmi_type: &str) -> Option<Self> {
        match xmi_type.rsplit(':').next()? {
            "Property" => Some(Self::Property),
            "UseCase" => Some(Self::UseCase),
            _ => None,
        }
    }
}

/// Handler for one `(owner type, child shape)` pair.
pub type ChildHandler = fn(&XmiContext<'_>, &ElementId, &XmlElement, &mut ElementStore);

/// Dispatch table from `(owner type, child shape)` to a handler, built once.
#[derive(Clone, Debug)]
pub struct InjectionTable {
    handlers: FxHashMap<(ElementType, ChildShape), ChildHandler>,
}

impl InjectionTable {
    /// The handlers used for UML/SysML models.
    pub fn standard() -> Self {
        let mut handlers: FxHashMap<(ElementType, ChildShape), ChildHandler> = FxHashMap::default();
        for owner in [
            ElementType::Association,
            ElementType::Class,
            ElementType::Component,
            ElementType::Actor,
        ] {
            handlers.insert((owner, ChildShape::Property), handle_association_property);
        }
        for owner in [ElementType::Class, ElementType::Component] {
            handlers.insert((owner, ChildShape::UseCase), handle_owned_use_case);
        }
        Self { handlers }
    }

    pub fn get(&self, owner: ElementType, child: ChildShape) -> Option<ChildHandler> {
        self.handlers.get(&(owner, child)).copied()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for InjectionTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Route an association end to the association's record.
///
/// ```xml
/// <ownedEnd xmi:type="uml:Property" type="_uc" association="_as"/>
/// <ownedAttribute xmi:type="uml:Property" type="_b" aggregation="composite" association="_as"/>
/// ```
///
/// The end may be hosted by the association itself or by a participating
/// class; either way the reference lands on the association.
fn handle_association_property(
    cx: &XmiContext<'_>,
    owner: &ElementId,
    child: &XmlElement,
    store: &mut ElementStore,
) {
    // Plain attribute, not an association end
    let Some(association) = child.attr("association") else {
        return;
    };
    let Some(endpoint) = child.attr("type") else {
        debug!(owner = %owner, association, "Association end without a type attribute");
        return;
    };

    if !cx.is_declared(association) {
        warn!(owner = %owner, association, "Association end refers to an undeclared association; skipping");
        return;
    }
    if !cx.is_declared(endpoint) {
        warn!(association, endpoint, "Association end refers to an undeclared element; skipping");
        return;
    }

    let association = ElementId::new(association);
    if let Some(aggregation @ (Aggregation::Composite | Aggregation::Shared)) =
        child.attr("aggregation").and_then(Aggregation::parse)
    {
        store.set(&association, Field::Aggregation(aggregation));
    }
    store.append(&association, Entry::Node(ElementId::new(endpoint)));
}

/// Adopt a use case declared as a structural child of its subject.
fn handle_owned_use_case(
    cx: &XmiContext<'_>,
    owner: &ElementId,
    child: &XmlElement,
    store: &mut ElementStore,
) {
    if let Some(use_case) = cx.id(child) {
        store.append(owner, Entry::UseCase(use_case));
    }
}

// ============================================================================
// EXTRACTOR
// ============================================================================

/// Extracts actors, use cases, classes, associations, subjects and
/// requirements from an XMI document.
#[derive(Clone, Debug)]
pub struct Extractor {
    namespaces: Namespaces,
    injections: InjectionTable,
}

impl Extractor {
    pub fn new(namespaces: Namespaces) -> Self {
        Self {
            namespaces,
            injections: InjectionTable::standard(),
        }
    }

    /// Run all passes into a fresh store.
    pub fn extract(&self, doc: &XmlDocument) -> ElementStore {
        let mut store = ElementStore::new();
        self.extract_into(doc, &mut store);
        store
    }

    /// Run all passes, merging into an existing store.
    pub fn extract_into(&self, doc: &XmlDocument, store: &mut ElementStore) {
        let cx = XmiContext::new(&self.namespaces, doc);

        self.scan_packaged_elements(&cx, doc, store);
        self.attach_comments(&cx, doc, store);
        self.resolve_requirements(&cx, doc, store);

        info!(
            records = store.len(),
            actors = store.actors().len(),
            use_cases = store.use_cases().len(),
            classes = store.classes().len(),
            associations = store.associations().len(),
            "Extracted model"
        );
    }

    fn scan_packaged_elements(&self, cx: &XmiContext<'_>, doc: &XmlDocument, store: &mut ElementStore) {
        for element in doc
            .elements()
            .filter(|e| MODELED_TAGS.contains(&e.local_name()))
        {
            let Some(id) = cx.id(element) else {
                continue;
            };
            let xmi_type = cx.xmi_type(element);
            let name = element.attr("name");
            debug!(id = %id, name, xmi_type, "Packaged element");

            if let Some(name) = name {
                store.set(&id, Field::Name(name.to_string()));
            }
            let Some(kind) = cx.element_type(element) else {
                continue;
            };
            store.set(&id, Field::Type(kind));

            if kind == ElementType::UseCase {
                link_subjects(cx, &id, element, store);
            }

            for child in &element.children {
                let Some(shape) = cx.child_shape(child) else {
                    continue;
                };
                if let Some(handler) = self.injections.get(kind, shape) {
                    trace!(owner = %id, child = child.local_name(), ?shape, "Injecting child");
                    handler(cx, &id, child, store);
                }
            }
        }
    }

    fn attach_comments(&self, cx: &XmiContext<'_>, doc: &XmlDocument, store: &mut ElementStore) {
        for comment in doc.elements().filter(|e| cx.has_uml_type(e, "Comment")) {
            let body = comment
                .child("body")
                .map(|b| b.text.as_str())
                .or_else(|| comment.attr("body"));
            let Some(body) = body else {
                debug!(id = ?cx.id(comment), "Comment without body");
                continue;
            };
            let Some(targets) = comment.attr("annotatedElement") else {
                debug!(id = ?cx.id(comment), "Comment without annotated element");
                continue;
            };

            for annotated in targets.split_whitespace() {
                if !cx.is_declared(annotated) {
                    warn!(annotated, "Comment annotates an undeclared element; dropping");
                    continue;
                }
                debug!(annotated, body, "Comment");
                store.append(&ElementId::new(annotated), Entry::Comment(body.to_string()));
            }
        }
    }

    fn resolve_requirements(&self, cx: &XmiContext<'_>, doc: &XmlDocument, store: &mut ElementStore) {
        let mut seeds: IndexSet<ElementId> = IndexSet::new();
        for stereotype in doc.elements().filter(|e| {
            e.name.namespace.as_deref() == Some(self.namespaces.requirements.as_str())
        }) {
            let Some(base) = stereotype.attr("base_Class") else {
                continue;
            };
            let base = ElementId::new(base);
            if let Some(requirement_id) = stereotype.attr("id") {
                store.set(&base, Field::RequirementId(requirement_id.to_string()));
            }
            if let Some(text) = stereotype.attr("text") {
                store.set(&base, Field::Text(text.to_string()));
            }
            debug!(base_class = %base, requirement_id = stereotype.attr("id"), "Requirement");
            seeds.insert(base);
        }

        if seeds.is_empty() {
            return;
        }

        let mut visited: FxHashSet<ElementId> = FxHashSet::default();
        for class in doc.elements().filter(|e| cx.is_class(e)) {
            match cx.id(class) {
                Some(id) if seeds.contains(&id) && !visited.contains(&id) => {
                    nest_requirements(cx, class, &seeds, &mut visited, store);
                }
                _ => {}
            }
        }

        for seed in seeds.iter().filter(|seed| !visited.contains(*seed)) {
            warn!(base_class = %seed, "Requirement base class does not match any class; not nested");
        }
    }
}

/// Record the use case on every subject named in its `subject` attribute.
fn link_subjects(cx: &XmiContext<'_>, use_case: &ElementId, element: &XmlElement, store: &mut ElementStore) {
    let Some(subjects) = element.attr("subject") else {
        return;
    };
    for subject in subjects.split_whitespace() {
        if !cx.is_declared(subject) {
            warn!(use_case = %use_case, subject, "Use case subject is undeclared; skipping");
            continue;
        }
        store.append(&ElementId::new(subject), Entry::UseCase(use_case.clone()));
    }
}

/// Walk a requirement class and its nested requirement classes.
///
/// Worklist of `(class, parent)` pairs; each class is visited once.
fn nest_requirements<'d>(
    cx: &XmiContext<'_>,
    root: &'d XmlElement,
    seeds: &IndexSet<ElementId>,
    visited: &mut FxHashSet<ElementId>,
    store: &mut ElementStore,
) {
    let mut worklist: Vec<(&'d XmlElement, Option<ElementId>)> = vec![(root, None)];

    while let Some((class, parent)) = worklist.pop() {
        let Some(id) = cx.id(class) else {
            continue;
        };
        if !visited.insert(id.clone()) {
            continue;
        }

        if let Some(name) = class.attr("name") {
            store.set(&id, Field::Name(name.to_string()));
        }
        store.init_nested(&id);
        if let Some(parent) = parent.filter(|parent| *parent != id) {
            debug!(parent = %parent, child = %id, "Nested requirement");
            store.append(&parent, Entry::Nested(id.clone()));
        }

        // Reversed so children pop in document order
        for child in class.children.iter().rev().filter(|c| cx.is_class(c)) {
            match cx.id(child) {
                Some(child_id) if seeds.contains(&child_id) && !visited.contains(&child_id) => {
                    worklist.push((child, Some(id.clone())));
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xmi:XMI xmi:version="20131001" xmlns:xmi="http://www.omg.org/spec/XMI/20131001"
         xmlns:uml="http://www.eclipse.org/uml2/5.0.0/UML"
         xmlns:Requirements="http://www.eclipse.org/papyrus/sysml/1.6/SysML/Requirements">"#;

    fn extract(body: &str) -> ElementStore {
        let xml = format!("{HEADER}{body}</xmi:XMI>");
        let doc = XmlDocument::parse(xml.as_bytes()).expect("parse");
        Extractor::new(Namespaces::default()).extract(&doc)
    }

    fn id(s: &str) -> ElementId {
        ElementId::new(s)
    }

    #[test]
    fn test_standard_injection_table() {
        let table = InjectionTable::standard();
        assert!(table.get(ElementType::Association, ChildShape::Property).is_some());
        assert!(table.get(ElementType::Class, ChildShape::Property).is_some());
        assert!(table.get(ElementType::Component, ChildShape::UseCase).is_some());
        assert!(table.get(ElementType::UseCase, ChildShape::Property).is_none());
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn test_child_shape_from_xmi_type() {
        assert_eq!(ChildShape::from_xmi_type("uml:Property"), Some(ChildShape::Property));
        assert_eq!(ChildShape::from_xmi_type("uml:UseCase"), Some(ChildShape::UseCase));
        assert_eq!(ChildShape::from_xmi_type("uml:Comment"), None);
    }

    #[test]
    fn test_packaged_elements_are_typed_and_named() {
        let store = extract(
            r#"<uml:Model xmi:id="m" name="Model">
  <packagedElement xmi:type="uml:Actor" xmi:id="a1" name="Operator"/>
  <packagedElement xmi:type="uml:Package" xmi:id="p1" name="Pkg">
    <packagedElement xmi:type="uml:UseCase" xmi:id="uc1" name="Exchange data"/>
  </packagedElement>
</uml:Model>"#,
        );

        assert_eq!(store.actors().len(), 1);
        assert_eq!(store.use_cases().len(), 1);
        let package = store.get(&id("p1")).expect("package record");
        assert_eq!(package.name.as_deref(), Some("Pkg"));
        assert_eq!(package.kind, None);
    }

    #[test]
    fn test_association_ends_route_to_association() {
        let store = extract(
            r#"<uml:Model xmi:id="m">
  <packagedElement xmi:type="uml:Class" xmi:id="c1" name="KME-1">
    <ownedAttribute xmi:type="uml:Property" xmi:id="p1" name="kme-2" type="c2" aggregation="composite" association="as1"/>
    <ownedAttribute xmi:type="uml:Property" xmi:id="p2" name="keyLength"/>
  </packagedElement>
  <packagedElement xmi:type="uml:Class" xmi:id="c2" name="KME-2"/>
  <packagedElement xmi:type="uml:Association" xmi:id="as1" memberEnd="p1 p3">
    <ownedEnd xmi:type="uml:Property" xmi:id="p3" name="kme-1" type="c1" association="as1"/>
  </packagedElement>
</uml:Model>"#,
        );

        let association = store.get(&id("as1")).expect("association");
        assert!(association.is(ElementType::Association));
        assert_eq!(association.nodes, vec![id("c2"), id("c1")]);
        assert_eq!(association.aggregation, Some(Aggregation::Composite));
        assert!(store.get(&id("c1")).unwrap().nodes.is_empty());
    }

    #[test]
    fn test_aggregation_none_is_not_recorded() {
        let store = extract(
            r#"<uml:Model xmi:id="m">
  <packagedElement xmi:type="uml:Class" xmi:id="c1"/>
  <packagedElement xmi:type="uml:Association" xmi:id="as1">
    <ownedEnd xmi:type="uml:Property" xmi:id="e1" type="c1" aggregation="none" association="as1"/>
  </packagedElement>
</uml:Model>"#,
        );

        assert_eq!(store.get(&id("as1")).unwrap().aggregation, None);
    }

    #[test]
    fn test_undeclared_endpoint_is_skipped() {
        let store = extract(
            r#"<uml:Model xmi:id="m">
  <packagedElement xmi:type="uml:Association" xmi:id="as1">
    <ownedEnd xmi:type="uml:Property" xmi:id="e1" type="ghost" association="as1"/>
  </packagedElement>
</uml:Model>"#,
        );

        assert!(store.get(&id("as1")).unwrap().nodes.is_empty());
        assert!(!store.contains(&id("ghost")));
    }

    #[test]
    fn test_comments_accumulate_and_unknown_targets_drop() {
        let store = extract(
            r#"<uml:Model xmi:id="m">
  <ownedComment xmi:type="uml:Comment" xmi:id="k1" annotatedElement="a1"><body>First</body></ownedComment>
  <packagedElement xmi:type="uml:Actor" xmi:id="a1" name="Operator">
    <ownedComment xmi:type="uml:Comment" xmi:id="k2" annotatedElement="a1"><body>Second</body></ownedComment>
  </packagedElement>
  <ownedComment xmi:type="uml:Comment" xmi:id="k3" annotatedElement="ghost"><body>Lost</body></ownedComment>
</uml:Model>"#,
        );

        assert_eq!(store.get(&id("a1")).unwrap().comments, vec!["First", "Second"]);
        assert!(!store.contains(&id("ghost")));
    }

    #[test]
    fn test_use_case_subjects() {
        let store = extract(
            r#"<uml:Model xmi:id="m">
  <packagedElement xmi:type="uml:Component" xmi:id="s1" name="QKD System">
    <ownedUseCase xmi:type="uml:UseCase" xmi:id="uc1" name="Exchange keys" subject="s1"/>
  </packagedElement>
  <packagedElement xmi:type="uml:UseCase" xmi:id="uc2" name="Manage keys" subject="s1 ghost"/>
</uml:Model>"#,
        );

        let subject = store.get(&id("s1")).unwrap();
        assert_eq!(subject.use_cases, vec![id("uc1"), id("uc1"), id("uc2")]);
        assert_eq!(store.use_cases().len(), 2);
        assert!(!store.contains(&id("ghost")));
    }

    #[test]
    fn test_nested_requirements() {
        let store = extract(
            r#"<uml:Model xmi:id="m">
  <packagedElement xmi:type="uml:Class" xmi:id="r1" name="Security">
    <nestedClassifier xmi:type="uml:Class" xmi:id="r2" name="Key Length">
      <nestedClassifier xmi:type="uml:Class" xmi:id="r4" name="Minimum"/>
    </nestedClassifier>
    <nestedClassifier xmi:type="uml:Class" xmi:id="plain" name="Not a requirement"/>
    <nestedClassifier xmi:type="uml:Class" xmi:id="r3" name="Key Refresh"/>
  </packagedElement>
</uml:Model>
<Requirements:Requirement xmi:id="s1" base_Class="r1" id="REQ-1" text="Protect keys"/>
<Requirements:Requirement xmi:id="s2" base_Class="r2" id="REQ-2" text="256 bit"/>
<Requirements:Requirement xmi:id="s3" base_Class="r3" id="REQ-3"/>
<Requirements:Requirement xmi:id="s4" base_Class="r4" id="REQ-4"/>"#,
        );

        let root = store.get(&id("r1")).unwrap();
        assert_eq!(root.nested, Some(vec![id("r2"), id("r3")]));
        let requirement = root.requirement.as_ref().unwrap();
        assert_eq!(requirement.requirement_id.as_deref(), Some("REQ-1"));
        assert_eq!(requirement.text.as_deref(), Some("Protect keys"));

        assert_eq!(store.get(&id("r2")).unwrap().nested, Some(vec![id("r4")]));
        assert_eq!(store.get(&id("r3")).unwrap().nested, Some(vec![]));
        assert_eq!(store.get(&id("plain")).unwrap().nested, None);
        assert_eq!(store.classes().len(), 5);
    }

    #[test]
    fn test_unmatched_requirement_is_retained_without_nesting() {
        let store = extract(
            r#"<uml:Model xmi:id="m"/>
<Requirements:Requirement xmi:id="s1" base_Class="missing" id="REQ-9" text="Orphan"/>"#,
        );

        let record = store.get(&id("missing")).expect("seed retained");
        assert!(record.requirement.is_some());
        assert_eq!(record.nested, None);
        assert_eq!(record.name, None);
        assert_eq!(record.kind, None);
    }

    #[test]
    fn test_requirement_never_nests_under_itself() {
        let store = extract(
            r#"<uml:Model xmi:id="m">
  <packagedElement xmi:type="uml:Class" xmi:id="r1" name="Loop">
    <nestedClassifier xmi:type="uml:Class" xmi:id="r1" name="Loop again"/>
  </packagedElement>
</uml:Model>
<Requirements:Requirement xmi:id="s1" base_Class="r1" id="REQ-1"/>"#,
        );

        assert_eq!(store.get(&id("r1")).unwrap().nested, Some(vec![]));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let xml = format!(
            "{HEADER}{}</xmi:XMI>",
            r#"<uml:Model xmi:id="m">
  <packagedElement xmi:type="uml:Actor" xmi:id="a1" name="Operator"/>
  <packagedElement xmi:type="uml:UseCase" xmi:id="uc1" name="Exchange"/>
  <packagedElement xmi:type="uml:Association" xmi:id="as1">
    <ownedEnd xmi:type="uml:Property" xmi:id="e1" type="a1" association="as1"/>
    <ownedEnd xmi:type="uml:Property" xmi:id="e2" type="uc1" association="as1"/>
  </packagedElement>
</uml:Model>"#
        );
        let doc = XmlDocument::parse(xml.as_bytes()).expect("parse");
        let extractor = Extractor::new(Namespaces::default());

        let first = extractor.extract(&doc);
        let second = extractor.extract(&doc);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_comment_annotates_several_elements() {
        let store = extract(
            r#"<uml:Model xmi:id="m">
  <packagedElement xmi:type="uml:Actor" xmi:id="a1" name="Operator"/>
  <packagedElement xmi:type="uml:UseCase" xmi:id="uc1" name="Exchange"/>
  <ownedComment xmi:type="uml:Comment" xmi:id="k1" annotatedElement="a1  ghost
      uc1"><body>Shared note</body></ownedComment>
</uml:Model>"#,
        );

        assert_eq!(store.get(&id("a1")).unwrap().comments, vec!["Shared note"]);
        assert_eq!(store.get(&id("uc1")).unwrap().comments, vec!["Shared note"]);
        assert!(!store.contains(&id("ghost")));
    }

    #[test]
    fn test_comment_body_attribute_fallback() {
        let store = extract(
            r#"<uml:Model xmi:id="m">
  <packagedElement xmi:type="uml:Actor" xmi:id="a1" name="Operator"/>
  <ownedComment xmi:type="uml:Comment" xmi:id="k1" annotatedElement="a1" body="From attribute"/>
  <ownedComment xmi:type="uml:Comment" xmi:id="k2" annotatedElement="a1" body="Ignored"><body>From child</body></ownedComment>
  <ownedComment xmi:type="uml:Comment" xmi:id="k3" annotatedElement="a1"/>
</uml:Model>"#,
        );

        assert_eq!(
            store.get(&id("a1")).unwrap().comments,
            vec!["From attribute", "From child"]
        );
    }

    #[test]
    fn test_comment_body_keeps_whitespace() {
        let store = extract(
            r#"<uml:Model xmi:id="m">
  <packagedElement xmi:type="uml:Actor" xmi:id="a1" name="Operator"/>
  <ownedComment xmi:type="uml:Comment" xmi:id="k1" annotatedElement="a1"><body>
  Indented note
</body></ownedComment>
</uml:Model>"#,
        );

        assert_eq!(store.get(&id("a1")).unwrap().comments, vec!["\n  Indented note\n"]);
    }

    #[test]
    fn test_types_outside_the_uml_namespace_are_ignored() {
        let xml = r#"<xmi:XMI xmlns:xmi="http://www.omg.org/spec/XMI/20131001"
         xmlns:uml="http://example.org/not-uml">
  <uml:Model xmi:id="m">
    <packagedElement xmi:type="uml:Actor" xmi:id="a1" name="Operator"/>
    <ownedComment xmi:type="uml:Comment" xmi:id="k1" annotatedElement="a1"><body>Note</body></ownedComment>
  </uml:Model>
</xmi:XMI>"#;
        let doc = XmlDocument::parse(xml.as_bytes()).expect("parse");

        let store = Extractor::new(Namespaces::default()).extract(&doc);
        assert_eq!(store.actors().len(), 0);
        assert!(store.get(&id("a1")).unwrap().comments.is_empty());

        let namespaces = Namespaces {
            uml: "http://example.org/not-uml".to_string(),
            ..Namespaces::default()
        };
        let store = Extractor::new(namespaces).extract(&doc);
        assert_eq!(store.actors().len(), 1);
        assert_eq!(store.get(&id("a1")).unwrap().comments, vec!["Note"]);
    }

    #[test]
    fn test_deep_requirement_chain() {
        let depth = 50_000;
        let mut body = String::from(r#"<uml:Model xmi:id="m">"#);
        body.push_str(r#"<packagedElement xmi:type="uml:Class" xmi:id="r0" name="R0">"#);
        for level in 1..depth {
            body.push_str(&format!(
                r#"<nestedClassifier xmi:type="uml:Class" xmi:id="r{level}" name="R{level}">"#
            ));
        }
        body.push_str(&"</nestedClassifier>".repeat(depth - 1));
        body.push_str("</packagedElement></uml:Model>");
        for level in 0..depth {
            body.push_str(&format!(
                r#"<Requirements:Requirement xmi:id="s{level}" base_Class="r{level}" id="REQ-{level}"/>"#
            ));
        }

        let xml = format!("{HEADER}{body}</xmi:XMI>");
        let doc = XmlDocument::parse(xml.as_bytes()).expect("parse");
        let store = Extractor::new(Namespaces::default()).extract(&doc);
        drop(doc);

        assert_eq!(store.classes().len(), depth);
        assert_eq!(store.get(&id("r0")).unwrap().nested, Some(vec![id("r1")]));
        let last = format!("r{}", depth - 1);
        assert_eq!(store.get(&id(&last)).unwrap().nested, Some(vec![]));
    }
}
