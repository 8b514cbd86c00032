//! The schema registry: two-pass resolution of a [`SchemaSource`] into
//! immutable descriptors.

use std::collections::{HashMap, HashSet};

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use super::descriptor::{ClassDescriptor, IdentifierRule, Locale, PropertyDescriptor};
use super::source::{ClassEntry, LabelId, SchemaSource};
use crate::error::{EngineError, SchemaError};

/// Immutable lookup of class and property descriptors.
///
/// Built once with [`SchemaRegistry::load`] and shared by reference with
/// every builder; it has no interior mutability and is `Sync`.
#[derive(Debug)]
pub struct SchemaRegistry {
    classes: IndexMap<String, ClassDescriptor>,
    properties: IndexMap<String, PropertyDescriptor>,
}

impl SchemaRegistry {
    /// Resolve a schema source.
    ///
    /// Pass 1 registers every class and property name; pass 2 resolves
    /// constraint targets, identifier rules and inverses against the complete
    /// name sets, so forward and self references are legal.
    pub fn load(source: SchemaSource) -> Result<Self, SchemaError> {
        // Pass 1: names.
        let mut class_names = HashSet::with_capacity(source.classes.len());
        for (name, _) in &source.classes {
            if !class_names.insert(name.as_str()) {
                return Err(SchemaError::DuplicateClass(name.clone()));
            }
        }

        let mut properties: IndexMap<String, PropertyDescriptor> = IndexMap::new();
        let class_properties = source.classes.iter().flat_map(|(_, entry)| &entry.properties);
        let declared_properties = source.properties.iter().map(|(name, _)| name);
        for name in class_properties.chain(declared_properties) {
            properties
                .entry(name.clone())
                .or_insert_with(|| PropertyDescriptor {
                    name: name.clone(),
                    ..PropertyDescriptor::default()
                });
        }
        for (name, entry) in &source.properties {
            if let Some(descriptor) = properties.get_mut(name) {
                descriptor.functional |= entry.functional;
                descriptor.symmetric |= entry.symmetric;
                descriptor.transitive |= entry.transitive;
            }
        }

        // Pass 2: classes.
        let mut classes = IndexMap::with_capacity(source.classes.len());
        for (name, entry) in &source.classes {
            let descriptor = resolve_class(name, entry, &class_names)?;
            classes.insert(name.clone(), descriptor);
        }

        // Pass 2: inverses, recorded in both directions.
        for (name, entry) in &source.properties {
            let Some(inverse) = &entry.inverse else {
                continue;
            };
            if !properties.contains_key(inverse) {
                return Err(SchemaError::UnknownInverse {
                    property: name.clone(),
                    inverse: inverse.clone(),
                });
            }
            set_inverse(&mut properties, name, inverse)?;
            set_inverse(&mut properties, inverse, name)?;
        }

        debug!(
            classes = classes.len(),
            properties = properties.len(),
            "schema loaded"
        );

        Ok(Self {
            classes,
            properties,
        })
    }

    /// Descriptor of a class, or [`EngineError::UnknownClass`].
    pub fn resolve(&self, class: &str) -> Result<&ClassDescriptor, EngineError> {
        self.classes
            .get(class)
            .ok_or_else(|| EngineError::UnknownClass(class.to_string()))
    }

    pub fn class(&self, class: &str) -> Option<&ClassDescriptor> {
        self.classes.get(class)
    }

    pub fn property(&self, property: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(property)
    }

    /// All classes, in schema order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.classes.values()
    }

    /// All properties, in order of first appearance.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.values()
    }

    /// The inverse of a property, whichever side of the pair declared it.
    pub fn inverse_of(&self, property: &str) -> Option<&str> {
        self.properties.get(property).and_then(PropertyDescriptor::inverse)
    }

    pub fn is_functional(&self, property: &str) -> bool {
        self.properties
            .get(property)
            .is_some_and(PropertyDescriptor::is_functional)
    }
}

fn resolve_class(
    name: &str,
    entry: &ClassEntry,
    class_names: &HashSet<&str>,
) -> Result<ClassDescriptor, SchemaError> {
    let mut properties = IndexSet::with_capacity(entry.properties.len());
    for property in &entry.properties {
        if !properties.insert(property.clone()) {
            return Err(SchemaError::DuplicateProperty {
                class: name.to_string(),
                property: property.clone(),
            });
        }
    }

    let mut constraints = HashMap::with_capacity(entry.constraints.len());
    for (property, target) in &entry.constraints {
        if !properties.contains(property) {
            return Err(SchemaError::UndeclaredConstraintProperty {
                class: name.to_string(),
                property: property.clone(),
            });
        }
        if !class_names.contains(target.as_str()) {
            return Err(SchemaError::UnknownConstraintClass {
                class: name.to_string(),
                property: property.clone(),
                target: target.clone(),
            });
        }
        constraints.insert(property.clone(), target.clone());
    }

    let check_property = |property: &String| {
        if properties.contains(property) {
            Ok(property.clone())
        } else {
            Err(SchemaError::UnknownIdentifierProperty {
                class: name.to_string(),
                property: property.clone(),
            })
        }
    };

    let identifier = match (&entry.label_id, entry.bnode) {
        (None, _) => None,
        (Some(_), true) => return Err(SchemaError::BlankNodeWithIdentifier(name.to_string())),
        (Some(LabelId::Single(property)), false) => {
            Some(IdentifierRule::Single(check_property(property)?))
        }
        (Some(LabelId::Localized(map)), false) => {
            if map.is_empty() {
                return Err(SchemaError::EmptyIdentifierRule(name.to_string()));
            }
            let mut rule = IndexMap::with_capacity(map.len());
            for (tag, property) in map {
                let locale = Locale::parse(tag).map_err(|source| SchemaError::InvalidLocale {
                    class: name.to_string(),
                    source,
                })?;
                if rule.contains_key(&locale) {
                    return Err(SchemaError::DuplicateLocale {
                        class: name.to_string(),
                        locale: locale.to_string(),
                    });
                }
                rule.insert(locale, check_property(property)?);
            }
            Some(IdentifierRule::Localized(rule))
        }
    };

    Ok(ClassDescriptor {
        name: name.to_string(),
        properties,
        constraints,
        blank_node: entry.bnode,
        identifier,
    })
}

fn set_inverse(
    properties: &mut IndexMap<String, PropertyDescriptor>,
    property: &str,
    inverse: &str,
) -> Result<(), SchemaError> {
    let Some(descriptor) = properties.get_mut(property) else {
        return Ok(());
    };
    match &descriptor.inverse {
        Some(existing) if existing != inverse => Err(SchemaError::InconsistentInverse {
            property: property.to_string(),
            first: existing.clone(),
            second: inverse.to_string(),
        }),
        _ => {
            descriptor.inverse = Some(inverse.to_string());
            Ok(())
        }
    }
}
