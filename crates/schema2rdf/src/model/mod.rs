pub mod iri;
pub mod ontology;
pub mod value;

pub use value::{BlankNodeId, BlankResource, Literal, LiteralAnnotation, Reference, Term, Triple, Value};
