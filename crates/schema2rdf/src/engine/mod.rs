//! Resource building: validation, identifiers, collections and finalization.

pub mod collection;
pub mod resource;
pub mod validator;

pub use collection::{Collection, CollectionBuilder, CollectionKind};
pub use resource::{BuildSession, Resource, ResourceBuilder, ResourceState};
pub use validator::ConstraintValidator;

use crate::schema::Locale;

/// Default base for minted IRIs.
pub const DEFAULT_BASE_URI: &str = "http://schema2rdf.example";

/// Options shared by every resource a [`ResourceBuilder`] opens.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub base_uri: String,
    /// Locale used when `create` is called without one.
    pub default_locale: Option<Locale>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            base_uri: DEFAULT_BASE_URI.to_string(),
            default_locale: None,
        }
    }
}
