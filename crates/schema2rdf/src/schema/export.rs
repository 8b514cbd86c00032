//! Export a resolved schema as RDFS/OWL triples.
//!
//! Domains and ranges use `schema:domainIncludes` / `schema:rangeIncludes`
//! because one property may be declared on several classes, and
//! `rdfs:domain` would make those classes intersect.

use indexmap::IndexSet;

use super::registry::SchemaRegistry;
use crate::emitter::GraphFragment;
use crate::model::iri::IriMinter;
use crate::model::ontology::{owl, schema, standard};
use crate::model::{Literal, Term, Triple};

/// Build the triples describing every class and property of `registry`.
pub fn schema_fragment(registry: &SchemaRegistry, iris: &IriMinter) -> GraphFragment {
    let mut triples: IndexSet<Triple> = IndexSet::new();

    for class in registry.classes() {
        let class_iri = Term::iri(iris.class_iri(class.name()));
        triples.insert(Triple::new(
            class_iri.clone(),
            standard::RDF_TYPE,
            Term::iri(standard::RDFS_CLASS),
        ));
        triples.insert(Triple::new(
            class_iri.clone(),
            standard::RDFS_LABEL,
            Term::Literal(Literal::plain(class.name())),
        ));

        for property in class.properties() {
            let property_iri = Term::iri(iris.property_iri(property));
            triples.insert(Triple::new(
                property_iri.clone(),
                schema::DOMAIN_INCLUDES,
                class_iri.clone(),
            ));
            if let Some(target) = class.constraint_for(property) {
                triples.insert(Triple::new(
                    property_iri,
                    schema::RANGE_INCLUDES,
                    Term::iri(iris.class_iri(target)),
                ));
            }
        }
    }

    for property in registry.properties() {
        let property_iri = Term::iri(iris.property_iri(property.name()));
        triples.insert(Triple::new(
            property_iri.clone(),
            standard::RDF_TYPE,
            Term::iri(standard::RDF_PROPERTY),
        ));

        let characteristics = [
            (property.is_functional(), owl::FUNCTIONAL_PROPERTY),
            (property.is_symmetric(), owl::SYMMETRIC_PROPERTY),
            (property.is_transitive(), owl::TRANSITIVE_PROPERTY),
        ];
        for (_, kind) in characteristics.iter().filter(|(set, _)| *set) {
            triples.insert(Triple::new(
                property_iri.clone(),
                standard::RDF_TYPE,
                Term::iri(*kind),
            ));
        }

        // One owl:inverseOf per pair.
        if let Some(inverse) = property.inverse() {
            if property.name() <= inverse {
                triples.insert(Triple::new(
                    property_iri,
                    owl::INVERSE_OF,
                    Term::iri(iris.property_iri(inverse)),
                ));
            }
        }
    }

    GraphFragment {
        triples: triples.into_iter().collect(),
        collections: Vec::new(),
    }
}
