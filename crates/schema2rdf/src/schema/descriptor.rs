//! Immutable class and property descriptors produced by the registry.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};
use oxilangtag::LanguageTag;

use crate::error::LocaleError;

/// A normalized BCP 47 language tag (`en`, `fr-FR`, `zh-Hant-TW`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(String);

impl Locale {
    /// Parse and normalize a tag. `_` is accepted as a subtag separator;
    /// case follows RFC 5646 (lowercase language, title-case script,
    /// uppercase region).
    pub fn parse(tag: &str) -> Result<Self, LocaleError> {
        let tag = tag.trim().replace('_', "-");
        LanguageTag::parse_and_normalize(&tag)
            .map(|normalized| Self(normalized.into_inner()))
            .map_err(|source| LocaleError { tag, source })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which property supplies a resource's identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierRule {
    Single(String),
    Localized(IndexMap<Locale, String>),
}

/// Resolved metadata for one class.
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    pub(crate) name: String,
    pub(crate) properties: IndexSet<String>,
    pub(crate) constraints: HashMap<String, String>,
    pub(crate) blank_node: bool,
    pub(crate) identifier: Option<IdentifierRule>,
}

impl ClassDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared properties, in schema order.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(String::as_str)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains(name)
    }

    /// Target class a property's values must belong to, if constrained.
    pub fn constraint_for(&self, name: &str) -> Option<&str> {
        self.constraints.get(name).map(String::as_str)
    }

    pub fn is_blank_node(&self) -> bool {
        self.blank_node
    }

    pub fn identifier_rule(&self) -> Option<&IdentifierRule> {
        self.identifier.as_ref()
    }

    /// Identifier property for a locale. A single rule applies to every
    /// locale (and to none); a localized rule only to the locales it maps.
    pub fn identifier_property_for(&self, locale: Option<&Locale>) -> Option<&str> {
        match self.identifier.as_ref()? {
            IdentifierRule::Single(property) => Some(property),
            IdentifierRule::Localized(map) => locale.and_then(|l| map.get(l)).map(String::as_str),
        }
    }

    /// Whether `name` supplies the identifier for some locale.
    pub fn is_identifier_property(&self, name: &str) -> bool {
        match &self.identifier {
            Some(IdentifierRule::Single(property)) => property == name,
            Some(IdentifierRule::Localized(map)) => map.values().any(|p| p == name),
            None => false,
        }
    }

    pub fn is_locale_keyed(&self) -> bool {
        matches!(self.identifier, Some(IdentifierRule::Localized(_)))
    }
}

/// Resolved metadata for one property.
#[derive(Debug, Clone, Default)]
pub struct PropertyDescriptor {
    pub(crate) name: String,
    pub(crate) inverse: Option<String>,
    pub(crate) functional: bool,
    pub(crate) symmetric: bool,
    pub(crate) transitive: bool,
}

impl PropertyDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared inverse property. Metadata only: no inverse triple is stored.
    pub fn inverse(&self) -> Option<&str> {
        self.inverse.as_deref()
    }

    pub fn is_functional(&self) -> bool {
        self.functional
    }

    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    pub fn is_transitive(&self) -> bool {
        self.transitive
    }
}
