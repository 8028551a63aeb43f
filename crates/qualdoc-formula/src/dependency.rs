//! Field references and dependency extraction
//!
//! Formulas refer to other fields with `{id}` (row scope) or
//! `{header.id}` (header scope). The same pattern drives static
//! dependency extraction and reference lexing.

use std::fmt;

use ahash::AHashSet;
use lazy_regex::{lazy_regex, Lazy, Regex};

use crate::error::FieldScope;

/// Pattern for a field reference; group 1 marks header scope, group 2 is the id
pub(crate) static FIELD_REF: Lazy<Regex> = lazy_regex!(r"\{(header\.)?([A-Za-z_][A-Za-z0-9_]*)\}");

/// A reference to another field from inside a formula
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldRef {
    /// `{id}`: a field in the same row
    Row(String),
    /// `{header.id}`: a document-level field
    Header(String),
}

impl FieldRef {
    pub fn id(&self) -> &str {
        match self {
            FieldRef::Row(id) | FieldRef::Header(id) => id,
        }
    }

    pub fn scope(&self) -> FieldScope {
        match self {
            FieldRef::Row(_) => FieldScope::Row,
            FieldRef::Header(_) => FieldScope::Header,
        }
    }

    pub(crate) fn from_captures(caps: &regex::Captures<'_>) -> Self {
        let id = caps[2].to_string();
        if caps.get(1).is_some() {
            FieldRef::Header(id)
        } else {
            FieldRef::Row(id)
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Row(id) => write!(f, "{{{}}}", id),
            FieldRef::Header(id) => write!(f, "{{header.{}}}", id),
        }
    }
}

/// Field ids a formula depends on, split by scope
///
/// Each list is deduplicated and keeps first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDependencies {
    pub row: Vec<String>,
    pub header: Vec<String>,
}

impl FieldDependencies {
    pub fn is_empty(&self) -> bool {
        self.row.is_empty() && self.header.is_empty()
    }
}

/// All field references in a formula, in order of appearance
pub fn extract_field_refs(formula: &str) -> Vec<FieldRef> {
    FIELD_REF
        .captures_iter(formula)
        .map(|caps| FieldRef::from_captures(&caps))
        .collect()
}

/// Extract the row-scope and header-scope field ids a formula references
///
/// # Example
/// ```rust
/// use qualdoc_formula::extract_field_dependencies;
///
/// let deps = extract_field_dependencies("({gross}-{header.tare})/{gross}");
/// assert_eq!(deps.row, vec!["gross"]);
/// assert_eq!(deps.header, vec!["tare"]);
/// ```
pub fn extract_field_dependencies(formula: &str) -> FieldDependencies {
    let mut deps = FieldDependencies::default();
    let mut seen = AHashSet::new();

    for field_ref in extract_field_refs(formula) {
        if !seen.insert(field_ref.clone()) {
            continue;
        }
        match field_ref {
            FieldRef::Row(id) => deps.row.push(id),
            FieldRef::Header(id) => deps.header.push(id),
        }
    }

    deps
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_refs() {
        let refs = extract_field_refs("{a} + {header.b} * {a}");
        assert_eq!(
            refs,
            vec![
                FieldRef::Row("a".into()),
                FieldRef::Header("b".into()),
                FieldRef::Row("a".into()),
            ]
        );
        assert_eq!(refs[1].scope(), FieldScope::Header);
        assert_eq!(refs[1].id(), "b");
        assert_eq!(refs[1].to_string(), "{header.b}");
    }

    #[test]
    fn test_extract_dependencies() {
        let deps = extract_field_dependencies("{x}+{header.y}-{x}/{header.y}+{_z1}");
        assert_eq!(deps.row, vec!["x", "_z1"]);
        assert_eq!(deps.header, vec!["y"]);
    }

    #[test]
    fn test_same_id_in_both_scopes() {
        let deps = extract_field_dependencies("{w}-{header.w}");
        assert_eq!(deps.row, vec!["w"]);
        assert_eq!(deps.header, vec!["w"]);
    }

    #[test]
    fn test_malformed_references_ignored() {
        // Not identifiers, so not references; the tokenizer rejects the braces later
        let deps = extract_field_dependencies("{1a}+{header.}+{a.b}+{ a }+{header.c.d}");
        assert!(deps.is_empty());
        assert!(extract_field_dependencies("2+3").is_empty());
    }

    #[test]
    fn test_header_as_row_id() {
        let deps = extract_field_dependencies("{header}");
        assert_eq!(deps.row, vec!["header"]);
        assert!(deps.header.is_empty());
    }
}
