//! XMI input: document tree and model extraction.
//!
//! ## XMI Structure
//!
//! ```xml
//! <xmi:XMI xmlns:xmi="http://www.omg.org/spec/XMI/20131001"
//!          xmlns:uml="http://www.eclipse.org/uml2/5.0.0/UML"
//!          xmlns:Requirements="http://www.eclipse.org/papyrus/sysml/1.6/SysML/Requirements">
//!   <uml:Model xmi:id="model" name="Model">
//!     <packagedElement xmi:type="uml:Actor" xmi:id="a1" name="Operator"/>
//!     <packagedElement xmi:type="uml:Class" xmi:id="c1" name="Security">
//!       <nestedClassifier xmi:type="uml:Class" xmi:id="c2" name="Key Length"/>
//!     </packagedElement>
//!   </uml:Model>
//!   <Requirements:Requirement xmi:id="s1" base_Class="c1" id="REQ-1" text="..."/>
//! </xmi:XMI>
//! ```

mod document;
mod extract;

pub use document::{Descendants, XmlAttribute, XmlDocument, XmlElement, XmlName};
pub use extract::{ChildHandler, ChildShape, Extractor, InjectionTable, XmiContext};
