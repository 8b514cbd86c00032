pub mod memory;
pub mod ntriples;
pub mod turtle;

use std::io;

use crate::engine::collection::CollectionKind;
use crate::error::AssemblyError;
use crate::model::ontology::standard;
use crate::model::{BlankNodeId, Term, Triple};

/// A collection value lowered to terms, rooted at a blank node.
///
/// The assembler decides how to write it; [`CollectionNode::encode`] gives the
/// standard RDF container/list idiom.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionNode {
    pub node: BlankNodeId,
    pub kind: CollectionKind,
    pub members: Vec<Term>,
}

impl CollectionNode {
    /// Bag/Seq/Alt: typed container with `rdf:_n` members.
    /// List: `rdf:first`/`rdf:rest` cells ending in `rdf:nil`.
    pub fn encode(&self) -> Vec<Triple> {
        match self.kind {
            CollectionKind::Bag | CollectionKind::Seq | CollectionKind::Alt => {
                let container_type = match self.kind {
                    CollectionKind::Bag => standard::RDF_BAG,
                    CollectionKind::Seq => standard::RDF_SEQ,
                    _ => standard::RDF_ALT,
                };
                let subject = Term::Blank(self.node.clone());
                let mut triples = Vec::with_capacity(self.members.len() + 1);
                triples.push(Triple::new(
                    subject.clone(),
                    standard::RDF_TYPE,
                    Term::iri(container_type),
                ));
                for (i, member) in self.members.iter().enumerate() {
                    triples.push(Triple::new(
                        subject.clone(),
                        standard::member(i + 1),
                        member.clone(),
                    ));
                }
                triples
            }
            CollectionKind::List => {
                let mut triples = Vec::with_capacity(self.members.len() * 2);
                let last = self.members.len().saturating_sub(1);
                for (i, member) in self.members.iter().enumerate() {
                    let cell = Term::Blank(self.node.cell(i));
                    let rest = if i == last {
                        Term::iri(standard::RDF_NIL)
                    } else {
                        Term::Blank(self.node.cell(i + 1))
                    };
                    triples.push(Triple::new(cell.clone(), standard::RDF_FIRST, member.clone()));
                    triples.push(Triple::new(cell, standard::RDF_REST, rest));
                }
                triples
            }
        }
    }
}

/// Everything one finalized resource contributes to the graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphFragment {
    pub triples: Vec<Triple>,
    pub collections: Vec<CollectionNode>,
}

impl GraphFragment {
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty() && self.collections.is_empty()
    }

    /// Resource triples followed by the encoded collections.
    pub fn encoded(&self) -> impl Iterator<Item = Triple> + '_ {
        self.triples
            .iter()
            .cloned()
            .chain(self.collections.iter().flat_map(CollectionNode::encode))
    }
}

/// Receiver of finalized fragments (the backing store boundary).
pub trait GraphAssembler {
    /// Take one fragment as a unit. An error means the fragment was not accepted.
    fn assemble(&mut self, fragment: &GraphFragment) -> Result<(), AssemblyError>;
}

/// Trait for emitting RDF triples in different serialization formats.
pub trait TriplesEmitter {
    /// Emit one triple.
    fn emit(&mut self, triple: &Triple) -> io::Result<()>;
    /// Register a namespace prefix (used by Turtle format).
    fn add_prefix(&mut self, prefix: &str, iri: &str) -> io::Result<()>;
    /// Flush any buffered output.
    fn flush(&mut self) -> io::Result<()>;
    /// Return the number of triples emitted so far.
    fn triple_count(&self) -> u64;
}

/// Stream a fragment, collections encoded, through an emitter.
pub fn emit_fragment<E: TriplesEmitter + ?Sized>(
    emitter: &mut E,
    fragment: &GraphFragment,
) -> io::Result<()> {
    for triple in fragment.encoded() {
        emitter.emit(&triple)?;
    }
    Ok(())
}

/// Escape a string for an N-Triples / Turtle quoted literal.
pub(crate) fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                // Control chars: \uXXXX
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            _ => out.push(c),
        }
    }
    out
}
