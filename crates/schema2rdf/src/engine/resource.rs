//! Resource construction: open resources accumulate validated values, then
//! `finalize` closes them and hands their triples to a [`GraphAssembler`].

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use super::collection::CollectionKind;
use super::validator::ConstraintValidator;
use super::EngineOptions;
use crate::emitter::{CollectionNode, GraphAssembler, GraphFragment};
use crate::error::EngineError;
use crate::model::iri::IriMinter;
use crate::model::ontology::{skos, standard};
use crate::model::{BlankNodeId, BlankResource, Literal, Reference, Term, Triple, Value};
use crate::schema::{ClassDescriptor, Locale, SchemaRegistry};

// ---------------------------------------------------------------------------
// BuildSession
// ---------------------------------------------------------------------------

/// State shared by every [`ResourceBuilder`] over one registry: the
/// identifiers of closed resources, the blank-node allocator and the blank
/// resources already written.
///
/// Create one session per registry and open every builder from it; two
/// sessions do not see each other's identifiers.
#[derive(Debug)]
pub struct BuildSession<'r> {
    registry: &'r SchemaRegistry,
    /// One lock per class so that finalizing two resources of the same class
    /// serializes while other classes proceed.
    ledger: HashMap<String, Mutex<HashSet<String>>>,
    /// Embedded blank resources whose triples reached an assembler. Taken
    /// after the class lock.
    embedded: Mutex<HashSet<BlankNodeId>>,
    next_blank: AtomicU64,
}

impl<'r> BuildSession<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Arc<Self> {
        let ledger = registry
            .classes()
            .filter(|c| !c.is_blank_node())
            .map(|c| (c.name().to_string(), Mutex::new(HashSet::new())))
            .collect();
        Arc::new(Self {
            registry,
            ledger,
            embedded: Mutex::new(HashSet::new()),
            next_blank: AtomicU64::new(0),
        })
    }

    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    /// Open a builder sharing this session's ledger and blank allocator.
    pub fn builder(self: &Arc<Self>, options: &EngineOptions) -> ResourceBuilder<'r> {
        ResourceBuilder {
            session: Arc::clone(self),
            iris: IriMinter::new(&options.base_uri),
            default_locale: options.default_locale.clone(),
        }
    }

    /// Whether a closed resource of `class` holds `identifier`.
    pub fn is_committed(&self, class: &str, identifier: &str) -> bool {
        self.ledger.get(class).is_some_and(|slot| {
            slot.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .contains(identifier)
        })
    }

    /// Number of closed, named resources of `class`.
    pub fn committed_count(&self, class: &str) -> usize {
        self.ledger.get(class).map_or(0, |slot| {
            slot.lock().unwrap_or_else(PoisonError::into_inner).len()
        })
    }

    fn slot(&self, class: &str) -> Result<&Mutex<HashSet<String>>, EngineError> {
        self.ledger
            .get(class)
            .ok_or_else(|| EngineError::UnknownClass(class.to_string()))
    }

    fn allocate_blank(&self) -> BlankNodeId {
        let n = self.next_blank.fetch_add(1, Ordering::Relaxed);
        BlankNodeId::new(format!("b{n}"))
    }
}

// ---------------------------------------------------------------------------
// ResourceBuilder
// ---------------------------------------------------------------------------

/// Opens resources of schema classes. Builders come from a [`BuildSession`]
/// and differ only in their IRI base and default locale.
///
/// `ResourceBuilder` is `Sync`: any number of threads may share one by
/// reference and build resources concurrently.
#[derive(Debug)]
pub struct ResourceBuilder<'r> {
    session: Arc<BuildSession<'r>>,
    iris: IriMinter,
    default_locale: Option<Locale>,
}

impl<'r> ResourceBuilder<'r> {
    pub fn registry(&self) -> &'r SchemaRegistry {
        self.session.registry
    }

    pub fn session(&self) -> &Arc<BuildSession<'r>> {
        &self.session
    }

    pub fn iris(&self) -> &IriMinter {
        &self.iris
    }

    /// Open a resource of `class`. Blank-node classes get a fresh token; other
    /// classes wait for an identifier assignment. Without `locale`, the
    /// builder's default locale applies.
    pub fn create(&self, class: &str, locale: Option<&Locale>) -> Result<Resource<'_>, EngineError> {
        let descriptor = self.registry().resolve(class)?;
        let subject = if descriptor.is_blank_node() {
            Subject::Blank(self.session.allocate_blank())
        } else {
            Subject::Named(None)
        };
        trace!(class, "resource opened");
        Ok(Resource {
            builder: self,
            class: descriptor,
            locale: locale.or(self.default_locale.as_ref()).cloned(),
            subject,
            properties: IndexMap::new(),
            identifying: HashMap::new(),
            pref_label: None,
            state: ResourceState::Open,
        })
    }

    /// Whether a closed resource of `class` holds `identifier`.
    pub fn is_committed(&self, class: &str, identifier: &str) -> bool {
        self.session.is_committed(class, identifier)
    }

    /// Number of closed, named resources of `class`.
    pub fn committed_count(&self, class: &str) -> usize {
        self.session.committed_count(class)
    }
}

// ---------------------------------------------------------------------------
// Resource
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    Open,
    Closed,
}

#[derive(Debug, Clone)]
enum Subject {
    Blank(BlankNodeId),
    /// Pending IRI, `None` until an identifier is assigned.
    Named(Option<String>),
}

/// A graph node under construction.
#[derive(Debug)]
pub struct Resource<'b> {
    builder: &'b ResourceBuilder<'b>,
    class: &'b ClassDescriptor,
    locale: Option<Locale>,
    subject: Subject,
    properties: IndexMap<String, Vec<Value>>,
    /// Last identifier text written to each identifier property.
    identifying: HashMap<String, String>,
    pref_label: Option<String>,
    state: ResourceState,
}

impl<'b> Resource<'b> {
    pub fn class(&self) -> &ClassDescriptor {
        self.class
    }

    pub fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    pub fn state(&self) -> ResourceState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == ResourceState::Closed
    }

    /// Pending or final IRI. Always `None` for blank-node resources.
    pub fn identifier(&self) -> Option<&str> {
        match &self.subject {
            Subject::Named(iri) => iri.as_deref(),
            Subject::Blank(_) => None,
        }
    }

    pub fn blank_node(&self) -> Option<&BlankNodeId> {
        match &self.subject {
            Subject::Blank(node) => Some(node),
            Subject::Named(_) => None,
        }
    }

    pub fn values(&self, property: &str) -> &[Value] {
        self.properties.get(property).map_or(&[], Vec::as_slice)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.properties
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn pref_label(&self) -> Option<&str> {
        self.pref_label.as_deref()
    }

    /// Assign a value. Functional properties replace their value, others
    /// append it unless an identical value is already present. Assigning the
    /// identifier property of the active locale recomputes the pending
    /// identifier.
    pub fn set_property(&mut self, property: &str, value: impl Into<Value>) -> Result<(), EngineError> {
        self.ensure_open()?;
        let value = value.into();

        ConstraintValidator::new(self.builder.registry()).validate_assignment(
            self.class,
            property,
            &value,
            self.values(property),
        )?;

        let identifier = match self.class.identifier_property_for(self.locale.as_ref()) {
            Some(id_property) if id_property == property => {
                let text = value.identifier_text().ok_or_else(|| {
                    EngineError::InvalidIdentifierValue {
                        class: self.class.name().to_string(),
                        property: property.to_string(),
                    }
                })?;
                Some(self.mint_identifier(property, text))
            }
            _ => None,
        };

        if self.class.is_identifier_property(property) {
            if let Some(text) = value.identifier_text() {
                self.identifying.insert(property.to_string(), text.to_string());
            }
        }

        let functional = self.builder.registry().is_functional(property);
        let values = self.properties.entry(property.to_string()).or_default();
        if functional {
            values.clear();
            values.push(value);
        } else if !values.contains(&value) {
            values.push(value);
        }

        if let Some(iri) = identifier {
            trace!(class = self.class.name(), %iri, "identifier recomputed");
            self.subject = Subject::Named(Some(iri));
        }
        trace!(class = self.class.name(), property, "property set");
        Ok(())
    }

    /// Switch the active locale. The pending identifier is recomputed from the
    /// last identifying value written to the new locale's identifier
    /// property, and becomes unresolved if there is none.
    pub fn set_locale(&mut self, locale: Option<&Locale>) -> Result<(), EngineError> {
        self.ensure_open()?;
        self.locale = locale.cloned();
        if self.class.identifier_rule().is_none() || self.class.is_blank_node() {
            return Ok(());
        }
        let recomputed = self
            .class
            .identifier_property_for(self.locale.as_ref())
            .and_then(|property| {
                self.identifying
                    .get(property)
                    .map(|text| self.mint_identifier(property, text))
            });
        self.subject = Subject::Named(recomputed);
        Ok(())
    }

    /// Assign an explicit identifier, for classes whose schema declares no
    /// identifier rule. A later identifier-property assignment overrides it.
    pub fn set_identifier(&mut self, identifier: &str) -> Result<(), EngineError> {
        self.ensure_open()?;
        if self.class.is_blank_node() {
            return Err(EngineError::BlankNodeMismatch {
                class: self.class.name().to_string(),
                reason: "blank-node resources have no external identifier",
            });
        }
        let iri = self.builder.iris.resource_iri(self.class.name(), identifier);
        self.subject = Subject::Named(Some(iri));
        Ok(())
    }

    /// Set the preferred label, written as `skos:prefLabel` tagged with the
    /// locale active at finalize. Surrounding whitespace is stripped and an
    /// empty label is ignored.
    pub fn set_pref_label(&mut self, label: &str) -> Result<(), EngineError> {
        self.ensure_open()?;
        if self.class.is_blank_node() {
            return Err(EngineError::BlankNodeMismatch {
                class: self.class.name().to_string(),
                reason: "blank-node resources carry no label",
            });
        }
        let label = label.trim();
        if label.is_empty() {
            warn!(class = self.class.name(), "empty label ignored");
            return Ok(());
        }
        self.pref_label = Some(label.to_string());
        Ok(())
    }

    /// A reference to this resource, usable as a value once its identifier
    /// is resolved.
    pub fn reference(&self) -> Result<Reference, EngineError> {
        match &self.subject {
            Subject::Named(Some(iri)) => Ok(Reference::new(self.class.name(), iri.clone())),
            Subject::Named(None) => Err(EngineError::MissingIdentifier(self.class.name().to_string())),
            Subject::Blank(_) => Err(EngineError::BlankNodeMismatch {
                class: self.class.name().to_string(),
                reason: "blank-node resources cannot be referenced by IRI",
            }),
        }
    }

    /// Close a blank-node resource and turn it into an embeddable value. Its
    /// triples are emitted by the first resource that finalizes with it;
    /// later embeddings only point to the node.
    pub fn into_blank(self) -> Result<Value, EngineError> {
        self.ensure_open()?;
        let Subject::Blank(node) = self.subject else {
            return Err(EngineError::BlankNodeMismatch {
                class: self.class.name().to_string(),
                reason: "only blank-node classes can be embedded",
            });
        };
        trace!(class = self.class.name(), %node, "blank resource embedded");
        Ok(Value::BlankResource(Arc::new(BlankResource {
            class: self.class.name().to_string(),
            node,
            properties: self.properties,
        })))
    }

    /// Close the resource and hand its triples to `assembler`.
    ///
    /// Named resources need a resolved identifier that no other closed
    /// resource of the session holds for the class. The uniqueness check, the
    /// hand-off and the commit run under the class lock (then the session's
    /// written-blank lock); on any error nothing is committed and the
    /// resource stays open.
    pub fn finalize<A: GraphAssembler + ?Sized>(&mut self, assembler: &mut A) -> Result<Term, EngineError> {
        self.ensure_open()?;
        let class = self.class.name();
        let session = &self.builder.session;

        let subject = match &self.subject {
            Subject::Blank(node) => Term::Blank(node.clone()),
            Subject::Named(Some(iri)) => Term::Iri(iri.clone()),
            Subject::Named(None) => return Err(EngineError::MissingIdentifier(class.to_string())),
        };

        let mut committed = match &subject {
            Term::Iri(iri) => {
                let committed = session
                    .slot(class)?
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                if committed.contains(iri) {
                    return Err(EngineError::DuplicateIdentifier {
                        class: class.to_string(),
                        identifier: iri.clone(),
                    });
                }
                Some(committed)
            }
            _ => None,
        };
        let mut embedded = session.embedded.lock().unwrap_or_else(PoisonError::into_inner);

        let mut lowering = Lowering::new(self.builder, &embedded);
        lowering.resource(&subject, class, &self.properties);
        if let Some(label) = &self.pref_label {
            let literal = match &self.locale {
                Some(locale) => Literal::lang(label.as_str(), locale.as_str()),
                None => Literal::plain(label.as_str()),
            };
            lowering.fragment.triples.push(Triple::new(
                subject.clone(),
                skos::PREF_LABEL,
                Term::Literal(literal),
            ));
        }
        let Lowering { fragment, emitted, .. } = lowering;

        assembler.assemble(&fragment)?;
        embedded.extend(emitted);
        if let (Some(committed), Term::Iri(iri)) = (committed.as_mut(), &subject) {
            committed.insert(iri.clone());
        }

        self.state = ResourceState::Closed;
        debug!(
            class,
            triples = fragment.triples.len(),
            collections = fragment.collections.len(),
            "resource finalized"
        );
        Ok(subject)
    }

    fn ensure_open(&self) -> Result<(), EngineError> {
        match self.state {
            ResourceState::Open => Ok(()),
            ResourceState::Closed => Err(EngineError::FrozenResource(self.class.name().to_string())),
        }
    }

    fn mint_identifier(&self, property: &str, text: &str) -> String {
        let iris = &self.builder.iris;
        if self.class.is_locale_keyed() {
            iris.localized_resource_iri(self.class.name(), property, text)
        } else {
            iris.resource_iri(self.class.name(), text)
        }
    }
}

// ---------------------------------------------------------------------------
// Lowering values to triples
// ---------------------------------------------------------------------------

struct Lowering<'a, 'r> {
    builder: &'a ResourceBuilder<'r>,
    /// Blank resources written by earlier fragments of the session.
    written: &'a HashSet<BlankNodeId>,
    fragment: GraphFragment,
    /// Blank resources written by this fragment.
    emitted: HashSet<BlankNodeId>,
}

impl<'a, 'r> Lowering<'a, 'r> {
    fn new(builder: &'a ResourceBuilder<'r>, written: &'a HashSet<BlankNodeId>) -> Self {
        Self {
            builder,
            written,
            fragment: GraphFragment::default(),
            emitted: HashSet::new(),
        }
    }

    fn resource(&mut self, subject: &Term, class: &str, properties: &IndexMap<String, Vec<Value>>) {
        let iris = &self.builder.iris;
        self.fragment.triples.push(Triple::new(
            subject.clone(),
            standard::RDF_TYPE,
            Term::iri(iris.class_iri(class)),
        ));
        for (property, values) in properties {
            let predicate = self.builder.iris.property_iri(property);
            for value in values {
                let object = self.value(value);
                self.fragment
                    .triples
                    .push(Triple::new(subject.clone(), predicate.clone(), object));
            }
        }
    }

    fn value(&mut self, value: &Value) -> Term {
        match value {
            Value::Literal(literal) => Term::Literal(literal.clone()),
            Value::Reference(reference) => Term::iri(reference.iri()),
            Value::BlankResource(blank) => {
                let node = Term::Blank(blank.node.clone());
                if !self.written.contains(&blank.node) && self.emitted.insert(blank.node.clone()) {
                    self.resource(&node, &blank.class, &blank.properties);
                }
                node
            }
            Value::Collection(c) if c.kind() == CollectionKind::List && c.is_empty() => {
                Term::iri(standard::RDF_NIL)
            }
            Value::Collection(collection) => {
                let node = self.builder.session.allocate_blank();
                let members = collection.iter().map(|e| self.value(e)).collect();
                self.fragment.collections.push(CollectionNode {
                    node: node.clone(),
                    kind: collection.kind(),
                    members,
                });
                Term::Blank(node)
            }
        }
    }
}
