//! Side-effect-free validation of property assignments.

use crate::error::EngineError;
use crate::model::Value;
use crate::schema::{ClassDescriptor, SchemaRegistry};

/// Checks one assignment against the resolved schema.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintValidator<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> ConstraintValidator<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Validate assigning `value` to `property` on a resource of class
    /// `descriptor` that currently holds `current` for that property.
    ///
    /// - `UnknownProperty`: the class does not declare the property.
    /// - `ConstraintViolation`: the property is constrained to a class and the
    ///   value is not a reference or blank resource of exactly that class
    ///   (a collection must satisfy this for every element).
    /// - `FunctionalPropertyViolation`: the property is functional and
    ///   already holds a different value.
    pub fn validate_assignment(
        &self,
        descriptor: &ClassDescriptor,
        property: &str,
        value: &Value,
        current: &[Value],
    ) -> Result<(), EngineError> {
        if !descriptor.has_property(property) {
            return Err(EngineError::UnknownProperty {
                class: descriptor.name().to_string(),
                property: property.to_string(),
            });
        }

        if let Some(target) = descriptor.constraint_for(property) {
            if let Some(offending) = first_mismatch(value, target) {
                return Err(EngineError::ConstraintViolation {
                    class: descriptor.name().to_string(),
                    property: property.to_string(),
                    expected: target.to_string(),
                    found: offending.describe(),
                });
            }
        }

        if self.registry.is_functional(property) && current.iter().any(|v| v != value) {
            return Err(EngineError::FunctionalPropertyViolation {
                class: descriptor.name().to_string(),
                property: property.to_string(),
            });
        }

        Ok(())
    }
}

/// First value (the value itself, or a collection element) not pointing to
/// a resource of class `target`.
fn first_mismatch<'v>(value: &'v Value, target: &str) -> Option<&'v Value> {
    match value {
        Value::Collection(collection) => collection.iter().find_map(|e| first_mismatch(e, target)),
        other if other.resource_class() == Some(target) => None,
        other => Some(other),
    }
}
