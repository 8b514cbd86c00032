//! Property values and the RDF terms they lower to.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;

use super::ontology::standard;
use crate::engine::collection::Collection;

// ---------------------------------------------------------------------------
// Literals
// ---------------------------------------------------------------------------

/// Language tag or datatype attached to a literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LiteralAnnotation {
    Plain,
    Language(String),
    Datatype(String),
}

/// An RDF literal: lexical form plus an optional language tag or datatype IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    lexical: String,
    annotation: LiteralAnnotation,
}

impl Literal {
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            annotation: LiteralAnnotation::Plain,
        }
    }

    pub fn lang(lexical: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            annotation: LiteralAnnotation::Language(tag.into().to_ascii_lowercase()),
        }
    }

    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            annotation: LiteralAnnotation::Datatype(datatype.into()),
        }
    }

    pub fn integer(value: i64) -> Self {
        Self::typed(value.to_string(), standard::XSD_INTEGER)
    }

    /// `xsd:double`; infinities use the XSD spellings `INF` and `-INF`.
    pub fn double(value: f64) -> Self {
        let lexical = if value == f64::INFINITY {
            "INF".to_string()
        } else if value == f64::NEG_INFINITY {
            "-INF".to_string()
        } else {
            value.to_string()
        };
        Self::typed(lexical, standard::XSD_DOUBLE)
    }

    pub fn boolean(value: bool) -> Self {
        Self::typed(value.to_string(), standard::XSD_BOOLEAN)
    }

    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    pub fn annotation(&self) -> &LiteralAnnotation {
        &self.annotation
    }
}

// ---------------------------------------------------------------------------
// References and blank resources
// ---------------------------------------------------------------------------

/// A link to another (named) resource of a given class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    class: String,
    iri: String,
}

impl Reference {
    pub fn new(class: impl Into<String>, iri: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            iri: iri.into(),
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn iri(&self) -> &str {
        &self.iri
    }
}

/// Local token of a blank node, unique within one `BuildSession`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlankNodeId(String);

impl BlankNodeId {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derived node for the `index`-th cell of an RDF list rooted here.
    pub fn cell(&self, index: usize) -> Self {
        if index == 0 {
            self.clone()
        } else {
            Self(format!("{}c{index}", self.0))
        }
    }
}

impl fmt::Display for BlankNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// A closed blank-node resource embedded as the value of another resource.
///
/// Identity is its blank-node token: two embedded resources with the same
/// property values are still distinct nodes.
#[derive(Debug, Clone)]
pub struct BlankResource {
    pub(crate) class: String,
    pub(crate) node: BlankNodeId,
    pub(crate) properties: IndexMap<String, Vec<Value>>,
}

impl BlankResource {
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn node(&self) -> &BlankNodeId {
        &self.node
    }

    pub fn values(&self, property: &str) -> &[Value] {
        self.properties.get(property).map_or(&[], Vec::as_slice)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.properties
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

impl PartialEq for BlankResource {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl Eq for BlankResource {}

impl Hash for BlankResource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.hash(state);
    }
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// The value of one property assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Literal(Literal),
    Reference(Reference),
    BlankResource(Arc<BlankResource>),
    Collection(Collection),
}

impl Value {
    /// Plain string literal.
    pub fn literal(lexical: impl Into<String>) -> Self {
        Value::Literal(Literal::plain(lexical))
    }

    pub fn reference(class: impl Into<String>, iri: impl Into<String>) -> Self {
        Value::Reference(Reference::new(class, iri))
    }

    /// Class of the resource this value points to, if it points to one.
    pub fn resource_class(&self) -> Option<&str> {
        match self {
            Value::Reference(r) => Some(r.class()),
            Value::BlankResource(b) => Some(b.class()),
            Value::Literal(_) | Value::Collection(_) => None,
        }
    }

    /// Text an identifier can be derived from.
    pub fn identifier_text(&self) -> Option<&str> {
        match self {
            Value::Literal(l) => Some(l.lexical()),
            Value::Reference(r) => Some(r.iri()),
            Value::BlankResource(_) | Value::Collection(_) => None,
        }
    }

    /// Short human-readable description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Value::Literal(l) => format!("literal \"{}\"", l.lexical()),
            Value::Reference(r) => format!("reference to {}", r.class()),
            Value::BlankResource(b) => format!("blank {}", b.class()),
            Value::Collection(c) => format!("{:?} collection", c.kind()),
        }
    }
}

impl From<Literal> for Value {
    fn from(l: Literal) -> Self {
        Value::Literal(l)
    }
}

impl From<Reference> for Value {
    fn from(r: Reference) -> Self {
        Value::Reference(r)
    }
}

impl From<Collection> for Value {
    fn from(c: Collection) -> Self {
        Value::Collection(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::literal(s)
    }
}

// ---------------------------------------------------------------------------
// Terms and triples
// ---------------------------------------------------------------------------

/// A node or literal in subject/object position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Iri(String),
    Blank(BlankNodeId),
    Literal(Literal),
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }
}

/// A (subject, predicate, object) statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}
