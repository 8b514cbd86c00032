//! Error types for schema loading, resource building and graph assembly.

use std::path::PathBuf;

use thiserror::Error;

/// A language tag that is not well-formed BCP 47.
#[derive(Debug, Error)]
#[error("invalid language tag {tag:?}: {source}")]
pub struct LocaleError {
    pub tag: String,
    #[source]
    pub source: oxilangtag::LanguageTagParseError,
}

/// Errors raised while loading and resolving a schema. Fatal at startup.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("cannot read schema file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported schema file format: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("duplicate class: {0}")]
    DuplicateClass(String),

    #[error("class {class} lists property {property} more than once")]
    DuplicateProperty { class: String, property: String },

    #[error("class {class} constrains undeclared property {property}")]
    UndeclaredConstraintProperty { class: String, property: String },

    #[error("class {class}: property {property} is constrained to unknown class {target}")]
    UnknownConstraintClass {
        class: String,
        property: String,
        target: String,
    },

    #[error("class {class}: identifier property {property} is not declared on the class")]
    UnknownIdentifierProperty { class: String, property: String },

    #[error("class {0} has an empty locale map for its identifier rule")]
    EmptyIdentifierRule(String),

    #[error("class {class}: {source}")]
    InvalidLocale {
        class: String,
        #[source]
        source: LocaleError,
    },

    #[error("class {class} maps locale {locale} to more than one identifier property")]
    DuplicateLocale { class: String, locale: String },

    #[error("class {0} is a blank node and cannot declare an identifier rule")]
    BlankNodeWithIdentifier(String),

    #[error("property {property} declares unknown inverse {inverse}")]
    UnknownInverse { property: String, inverse: String },

    #[error("property {property} is declared inverse of both {first} and {second}")]
    InconsistentInverse {
        property: String,
        first: String,
        second: String,
    },
}

/// Errors raised by the graph assembler boundary.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("assembler rejected fragment: {0}")]
    Rejected(String),
}

/// Errors raised while editing a collection value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollectionError {
    #[error("index {index} out of range for a collection of {len} elements")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{0} is already in a collection that does not keep duplicates")]
    DuplicateElement(String),

    #[error("{0} is not in the collection")]
    MissingElement(String),
}

/// Errors raised while creating, mutating and finalizing resources.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown class: {0}")]
    UnknownClass(String),

    #[error("property {property} is not declared on class {class}")]
    UnknownProperty { class: String, property: String },

    #[error("{class}.{property} expects a {expected} resource, got {found}")]
    ConstraintViolation {
        class: String,
        property: String,
        expected: String,
        found: String,
    },

    #[error("{class}.{property} is functional and already holds a different value")]
    FunctionalPropertyViolation { class: String, property: String },

    #[error("{0} resource has no identifier")]
    MissingIdentifier(String),

    #[error("duplicate identifier for class {class}: {identifier}")]
    DuplicateIdentifier { class: String, identifier: String },

    #[error("{0} resource is closed and cannot be modified")]
    FrozenResource(String),

    #[error("{class}: {reason}")]
    BlankNodeMismatch { class: String, reason: &'static str },

    #[error("{class}.{property} is an identifier property and needs a literal or reference value")]
    InvalidIdentifierValue { class: String, property: String },

    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}

/// Errors raised while loading and building a dataset document.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("cannot read dataset file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported dataset file format: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("duplicate resource key: {0}")]
    DuplicateKey(String),

    #[error("resource {resource}: {source}")]
    Locale {
        resource: String,
        #[source]
        source: LocaleError,
    },

    #[error("resource {resource}: no earlier resource has key {key}")]
    UnresolvedReference { resource: String, key: String },

    #[error("resource {resource}: {source}")]
    Resource {
        resource: String,
        #[source]
        source: EngineError,
    },
}
