//! Turtle serialization.
//!
//! Output layout: `@prefix` lines, a blank line, then one block per subject
//! in first-appearance order with `;` continuations:
//!
//! ```text
//! elem:_a1 a sysml:Actor ;
//!     rdfs:label "Operator" .
//! ```

use indexmap::IndexMap;

use super::{Graph, RDF_TYPE, Term};

/// Serialize `graph` as Turtle.
pub fn write_turtle(graph: &Graph) -> String {
    let prefixes: Vec<(&str, &str)> = graph.prefixes().collect();
    let mut turtle = String::new();

    for (prefix, namespace) in &prefixes {
        turtle.push_str(&format!("@prefix {prefix}: <{namespace}> .\n"));
    }

    let mut subjects: IndexMap<&Term, Vec<(&Term, &Term)>> = IndexMap::new();
    for triple in graph.triples() {
        subjects
            .entry(&triple.subject)
            .or_default()
            .push((&triple.predicate, &triple.object));
    }

    for (subject, statements) in subjects {
        turtle.push('\n');
        turtle.push_str(&format_term(subject, &prefixes));

        for (i, (predicate, object)) in statements.iter().enumerate() {
            let predicate = if predicate.as_iri() == Some(RDF_TYPE) {
                "a".to_string()
            } else {
                format_term(predicate, &prefixes)
            };
            if i > 0 {
                turtle.push_str(" ;\n   ");
            }
            turtle.push_str(&format!(" {predicate} {}", format_term(object, &prefixes)));
        }
        turtle.push_str(" .\n");
    }

    turtle
}

fn format_term(term: &Term, prefixes: &[(&str, &str)]) -> String {
    match term {
        Term::Iri(iri) => compact_iri(iri, prefixes).unwrap_or_else(|| format!("<{iri}>")),
        Term::Literal(value) => format!("\"{}\"", escape_literal(value)),
    }
}

/// `prefix:local` when some binding covers `iri` and the remainder is a
/// plain local name.
fn compact_iri(iri: &str, prefixes: &[(&str, &str)]) -> Option<String> {
    prefixes.iter().find_map(|(prefix, namespace)| {
        let local = iri.strip_prefix(namespace)?;
        is_plain_local_name(local).then(|| format!("{prefix}:{local}"))
    })
}

fn is_plain_local_name(local: &str) -> bool {
    let mut chars = local.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphanumeric() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Escape a string for use inside a double-quoted Turtle literal.
pub fn escape_literal(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\x08' => escaped.push_str("\\b"),
            '\x0C' => escaped.push_str("\\f"),
            other => escaped.push(other),
        }
    }
    escaped
}
