use std::io::Write;

use super::{emit_fragment, escape_literal, GraphAssembler, GraphFragment, TriplesEmitter};
use crate::error::AssemblyError;
use crate::model::{LiteralAnnotation, Term, Triple};

/// N-Triples format emitter. Streams triples as `<s> <p> <o> .` lines.
pub struct NTriplesEmitter<W: Write> {
    writer: W,
    count: u64,
}

impl<W: Write> NTriplesEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, count: 0 }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn render(term: &Term) -> String {
        match term {
            Term::Iri(iri) => format!("<{iri}>"),
            Term::Blank(node) => node.to_string(),
            Term::Literal(literal) => {
                let escaped = escape_literal(literal.lexical());
                match literal.annotation() {
                    LiteralAnnotation::Plain => format!("\"{escaped}\""),
                    LiteralAnnotation::Language(tag) => format!("\"{escaped}\"@{tag}"),
                    LiteralAnnotation::Datatype(dt) => format!("\"{escaped}\"^^<{dt}>"),
                }
            }
        }
    }
}

impl<W: Write> TriplesEmitter for NTriplesEmitter<W> {
    fn emit(&mut self, triple: &Triple) -> std::io::Result<()> {
        let s = Self::render(&triple.subject);
        let o = Self::render(&triple.object);
        writeln!(self.writer, "{s} <{}> {o} .", triple.predicate)?;
        self.count += 1;
        Ok(())
    }

    fn add_prefix(&mut self, prefix: &str, iri: &str) -> std::io::Result<()> {
        // N-Triples doesn't use prefixes, but emit as comment for readability
        writeln!(self.writer, "# @prefix {prefix}: <{iri}> .")
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    fn triple_count(&self) -> u64 {
        self.count
    }
}

impl<W: Write> GraphAssembler for NTriplesEmitter<W> {
    fn assemble(&mut self, fragment: &GraphFragment) -> Result<(), AssemblyError> {
        emit_fragment(self, fragment)?;
        Ok(())
    }
}
