//! Build validated RDF resources and triples from a declarative class schema.
//!
//! A [`SchemaRegistry`] is loaded once from class (and optional property)
//! definitions and shared by reference. A [`BuildSession`] over it holds the
//! identifiers of closed resources; the [`ResourceBuilder`]s it hands out open
//! [`Resource`]s of its classes; every assignment is checked by the
//! [`ConstraintValidator`], and `finalize` hands the resulting triples to a
//! [`GraphAssembler`](emitter::GraphAssembler).

pub mod dataset;
pub mod emitter;
pub mod engine;
pub mod error;
pub mod model;
pub mod schema;

pub use engine::{
    BuildSession, Collection, CollectionBuilder, CollectionKind, ConstraintValidator, EngineOptions,
    Resource, ResourceBuilder,
};
pub use error::{AssemblyError, CollectionError, EngineError, LocaleError, SchemaError};
pub use model::{Literal, Reference, Term, Triple, Value};
pub use schema::{Locale, SchemaRegistry, SchemaSource};
