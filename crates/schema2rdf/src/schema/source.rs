//! Deserialization of class and property definition documents.
//!
//! A class document maps class names to entries:
//!
//! ```yaml
//! Molecule:
//!   properties: [name, inchiKey, isFormOf]
//!   constraints: { isFormOf: Molecule }
//!   label_id: inchiKey
//! AdverseEffect:
//!   properties: [nameEn, nameFr]
//!   label_id: { en: nameEn, fr: nameFr }
//! ```
//!
//! A property document maps property names to their characteristics
//! (`inverse`, `functional`, `symmetric`, `transitive`).

use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use indexmap::IndexMap;
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::SchemaError;

/// One class declaration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassEntry {
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub constraints: IndexMap<String, String>,
    #[serde(default)]
    pub bnode: bool,
    #[serde(default)]
    pub label_id: Option<LabelId>,
}

/// Identifier rule as written in the schema: one property, or locale → property.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LabelId {
    Single(String),
    Localized(IndexMap<String, String>),
}

/// One property declaration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyEntry {
    #[serde(default)]
    pub inverse: Option<String>,
    #[serde(default)]
    pub functional: bool,
    #[serde(default)]
    pub symmetric: bool,
    #[serde(default)]
    pub transitive: bool,
}

/// Mapping entries kept in document order, duplicates included, so the
/// registry can report duplicated names instead of silently overwriting.
struct Entries<T>(Vec<(String, T)>);

impl<'de, T: Deserialize<'de> + Default> Deserialize<'de> for Entries<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de> + Default> Visitor<'de> for EntriesVisitor<T> {
            type Value = Entries<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of names to definitions")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(Entries(Vec::new()))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, entry)) = map.next_entry::<String, Option<T>>()? {
                    entries.push((name, entry.unwrap_or_default()));
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_any(EntriesVisitor(PhantomData))
    }
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Yaml,
    Json,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, SchemaError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => Err(SchemaError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    fn parse<T: DeserializeOwned + Default>(self, text: &str) -> Result<Vec<(String, T)>, SchemaError> {
        let entries: Entries<T> = match self {
            Format::Yaml => serde_yaml::from_str(text)?,
            Format::Json => serde_json::from_str(text)?,
        };
        Ok(entries.0)
    }
}

fn read(path: &Path) -> Result<(Format, String), SchemaError> {
    let format = Format::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((format, text))
}

/// Unresolved schema input: class and property declarations in source order.
#[derive(Debug, Clone, Default)]
pub struct SchemaSource {
    pub(crate) classes: Vec<(String, ClassEntry)>,
    pub(crate) properties: Vec<(String, PropertyEntry)>,
}

impl SchemaSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML class document.
    pub fn from_yaml_str(text: &str) -> Result<Self, SchemaError> {
        Ok(Self {
            classes: Format::Yaml.parse(text)?,
            properties: Vec::new(),
        })
    }

    /// Parse a JSON class document.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        Ok(Self {
            classes: Format::Json.parse(text)?,
            properties: Vec::new(),
        })
    }

    /// Read a class document; the format follows the file extension.
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let (format, text) = read(path)?;
        Ok(Self {
            classes: format.parse(&text)?,
            properties: Vec::new(),
        })
    }

    /// Add the declarations of a YAML property document.
    pub fn with_properties_yaml_str(mut self, text: &str) -> Result<Self, SchemaError> {
        self.properties.extend(Format::Yaml.parse::<PropertyEntry>(text)?);
        Ok(self)
    }

    /// Add the declarations of a property document read from disk.
    pub fn with_properties_path(mut self, path: &Path) -> Result<Self, SchemaError> {
        let (format, text) = read(path)?;
        self.properties.extend(format.parse::<PropertyEntry>(&text)?);
        Ok(self)
    }

    /// Append one class declaration.
    pub fn class(mut self, name: impl Into<String>, entry: ClassEntry) -> Self {
        self.classes.push((name.into(), entry));
        self
    }

    /// Append one property declaration.
    pub fn property(mut self, name: impl Into<String>, entry: PropertyEntry) -> Self {
        self.properties.push((name.into(), entry));
        self
    }

    /// Concatenate two sources. Names declared in both are reported at load.
    pub fn merge(mut self, other: SchemaSource) -> Self {
        self.classes.extend(other.classes);
        self.properties.extend(other.properties);
        self
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }
}
