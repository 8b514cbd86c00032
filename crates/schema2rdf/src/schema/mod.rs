pub mod descriptor;
pub mod export;
pub mod registry;
pub mod source;

pub use descriptor::{ClassDescriptor, IdentifierRule, Locale, PropertyDescriptor};
pub use registry::SchemaRegistry;
pub use source::{ClassEntry, LabelId, PropertyEntry, SchemaSource};
