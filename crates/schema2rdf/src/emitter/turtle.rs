use std::collections::HashMap;
use std::io::Write;

use super::{emit_fragment, escape_literal, GraphAssembler, GraphFragment, TriplesEmitter};
use crate::error::AssemblyError;
use crate::model::{LiteralAnnotation, Term, Triple};

/// Turtle format emitter with prefix support.
pub struct TurtleEmitter<W: Write> {
    writer: W,
    count: u64,
    prefixes: HashMap<String, String>,
    prefix_written: bool,
}

impl<W: Write> TurtleEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            count: 0,
            prefixes: HashMap::new(),
            prefix_written: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write all registered prefixes (called before first triple).
    fn write_prefixes(&mut self) -> std::io::Result<()> {
        if self.prefix_written {
            return Ok(());
        }
        self.prefix_written = true;
        // Sort for deterministic output
        let mut prefixes: Vec<_> = self.prefixes.iter().collect();
        prefixes.sort_by_key(|(k, _)| (*k).clone());
        for (prefix, iri) in prefixes {
            writeln!(self.writer, "@prefix {prefix}: <{iri}> .")?;
        }
        if !self.prefixes.is_empty() {
            writeln!(self.writer)?;
        }
        Ok(())
    }

    /// Try to compact an IRI using registered prefixes.
    fn compact_iri(&self, iri: &str) -> String {
        // Find longest matching prefix
        let mut best: Option<(&str, &str)> = None;
        for (prefix, ns) in &self.prefixes {
            if iri.starts_with(ns.as_str())
                && best.is_none_or(|(_, prev_ns)| ns.len() > prev_ns.len())
            {
                best = Some((prefix.as_str(), ns.as_str()));
            }
        }
        if let Some((prefix, ns)) = best {
            let local = &iri[ns.len()..];
            // Only compact if local name is valid (alphanumeric + _)
            if !local.is_empty() && local.chars().all(|c| c.is_alphanumeric() || c == '_') {
                return format!("{prefix}:{local}");
            }
        }
        format!("<{iri}>")
    }

    fn render(&self, term: &Term) -> String {
        match term {
            Term::Iri(iri) => self.compact_iri(iri),
            Term::Blank(node) => node.to_string(),
            Term::Literal(literal) => {
                let escaped = escape_literal(literal.lexical());
                match literal.annotation() {
                    LiteralAnnotation::Plain => format!("\"{escaped}\""),
                    LiteralAnnotation::Language(tag) => format!("\"{escaped}\"@{tag}"),
                    LiteralAnnotation::Datatype(dt) => {
                        format!("\"{escaped}\"^^{}", self.compact_iri(dt))
                    }
                }
            }
        }
    }
}

impl<W: Write> TriplesEmitter for TurtleEmitter<W> {
    fn emit(&mut self, triple: &Triple) -> std::io::Result<()> {
        self.write_prefixes()?;
        let s = self.render(&triple.subject);
        let p = self.compact_iri(&triple.predicate);
        let o = self.render(&triple.object);
        writeln!(self.writer, "{s} {p} {o} .")?;
        self.count += 1;
        Ok(())
    }

    fn add_prefix(&mut self, prefix: &str, iri: &str) -> std::io::Result<()> {
        self.prefixes.insert(prefix.to_string(), iri.to_string());
        Ok(())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    fn triple_count(&self) -> u64 {
        self.count
    }
}

impl<W: Write> GraphAssembler for TurtleEmitter<W> {
    fn assemble(&mut self, fragment: &GraphFragment) -> Result<(), AssemblyError> {
        emit_fragment(self, fragment)?;
        Ok(())
    }
}
