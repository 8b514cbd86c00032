//! In-memory graph: an assembler that keeps every triple for lookup.
//!
//! Declared inverse properties are never stored as extra triples; [`MemoryGraph::follow`]
//! answers an inverse traversal by rewriting `(s, p, ?)` into `(?, inverse(p), s)`.

use super::{GraphAssembler, GraphFragment};
use crate::error::AssemblyError;
use crate::model::iri::IriMinter;
use crate::model::{Term, Triple};
use crate::schema::SchemaRegistry;

#[derive(Debug, Default)]
pub struct MemoryGraph {
    triples: Vec<Triple>,
    fragments: usize,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Number of fragments accepted so far.
    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    pub fn contains(&self, subject: &Term, predicate: &str, object: &Term) -> bool {
        self.triples
            .iter()
            .any(|t| &t.subject == subject && t.predicate == predicate && &t.object == object)
    }

    /// Objects of `(subject, predicate, ?)`, in insertion order.
    pub fn objects<'a>(&'a self, subject: &'a Term, predicate: &'a str) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| &t.subject == subject && t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// Subjects of `(?, predicate, object)`, in insertion order.
    pub fn subjects<'a>(&'a self, predicate: &'a str, object: &'a Term) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| t.predicate == predicate && &t.object == object)
            .map(|t| &t.subject)
    }

    /// Terms related to `subject` through `predicate`, also following stored
    /// `inverse` triples backwards.
    pub fn related(&self, subject: &Term, predicate: &str, inverse: Option<&str>) -> Vec<Term> {
        let mut related: Vec<Term> = self.objects(subject, predicate).cloned().collect();
        if let Some(inverse) = inverse {
            for term in self.subjects(inverse, subject) {
                if !related.contains(term) {
                    related.push(term.clone());
                }
            }
        }
        related
    }

    /// [`related`](Self::related) keyed by schema property name.
    pub fn follow(
        &self,
        registry: &SchemaRegistry,
        iris: &IriMinter,
        subject: &Term,
        property: &str,
    ) -> Vec<Term> {
        let predicate = iris.property_iri(property);
        let inverse = registry.inverse_of(property).map(|p| iris.property_iri(p));
        self.related(subject, &predicate, inverse.as_deref())
    }
}

impl GraphAssembler for MemoryGraph {
    fn assemble(&mut self, fragment: &GraphFragment) -> Result<(), AssemblyError> {
        self.triples.extend(fragment.encoded());
        self.fragments += 1;
        Ok(())
    }
}
