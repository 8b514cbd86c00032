//! Dataset documents: declarative lists of resources built against a schema.
//!
//! ```yaml
//! resources:
//!   - class: Molecule
//!     key: aspirin
//!     label: Aspirin
//!     properties:
//!       name: Acetylsalicylic acid
//!       inchiKey: BSYNRYMUTXBXSQ-UHFFFAOYSA-N
//!   - class: Drug
//!     properties:
//!       name: Aspirin 500
//!       hasMolecule: { ref: aspirin }
//!       synonyms: { seq: [ASA, Aspirine] }
//!       hasDosage: { blank: { class: Dosage, properties: { quantity: 500, unit: mg } } }
//! ```
//!
//! Resources are built and finalized in document order; `ref` resolves to an
//! earlier resource's `key`.

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::emitter::GraphAssembler;
use crate::engine::{CollectionBuilder, CollectionKind, Resource, ResourceBuilder};
use crate::error::{DatasetError, EngineError};
use crate::model::ontology::expand_prefixed;
use crate::model::{Literal, Reference, Value};
use crate::schema::Locale;

/// A dataset document.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dataset {
    #[serde(default)]
    pub resources: Vec<ResourceSpec>,
}

/// One top-level resource.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceSpec {
    pub class: String,
    /// Local handle other resources use in `ref` values.
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    /// Explicit identifier, for classes without an identifier rule.
    #[serde(default)]
    pub identifier: Option<String>,
    /// Preferred label, written as `skos:prefLabel` in the resource's locale.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub properties: IndexMap<String, PropertySpec>,
}

/// An embedded blank-node resource.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NestedSpec {
    pub class: String,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub properties: IndexMap<String, PropertySpec>,
}

/// One value or a list of values for a property.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PropertySpec {
    Many(Vec<ValueSpec>),
    One(ValueSpec),
}

impl PropertySpec {
    fn values(&self) -> &[ValueSpec] {
        match self {
            PropertySpec::Many(values) => values,
            PropertySpec::One(value) => std::slice::from_ref(value),
        }
    }
}

/// A scalar (plain literal, integer, double, boolean) or a tagged value.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ValueSpec {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Tagged(TaggedValue),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaggedValue {
    Literal(LiteralSpec),
    Ref(String),
    Iri(IriSpec),
    Blank(Box<NestedSpec>),
    Bag(CollectionSpec),
    Seq(CollectionSpec),
    List(CollectionSpec),
    Alt(CollectionSpec),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LiteralSpec {
    pub value: String,
    #[serde(default)]
    pub lang: Option<String>,
    /// Datatype IRI; `xsd:`-style prefixes are expanded.
    #[serde(default)]
    pub datatype: Option<String>,
}

/// Reference to a resource outside the document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IriSpec {
    pub class: String,
    pub iri: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CollectionSpec {
    Items(Vec<ValueSpec>),
    Configured {
        items: Vec<ValueSpec>,
        #[serde(default)]
        allow_duplicates: bool,
    },
}

/// What a dataset build produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSummary {
    /// Top-level resources finalized.
    pub resources: usize,
    /// Blank resources embedded in them.
    pub embedded: usize,
}

impl Dataset {
    pub fn from_yaml_str(text: &str) -> Result<Self, DatasetError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a dataset; the format follows the file extension.
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let read = || {
            std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
                path: path.to_path_buf(),
                source,
            })
        };
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&read()?),
            Some("json") => Self::from_json_str(&read()?),
            _ => Err(DatasetError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Build and finalize every resource in document order.
    ///
    /// Stops at the first failing resource; resources finalized before it
    /// have already reached the assembler.
    pub fn build<A: GraphAssembler + ?Sized>(
        &self,
        builder: &ResourceBuilder<'_>,
        assembler: &mut A,
    ) -> Result<DatasetSummary, DatasetError> {
        let mut seen = std::collections::HashSet::new();
        for key in self.resources.iter().filter_map(|r| r.key.as_deref()) {
            if !seen.insert(key) {
                return Err(DatasetError::DuplicateKey(key.to_string()));
            }
        }

        let mut loader = Loader {
            builder,
            keys: HashMap::new(),
            summary: DatasetSummary::default(),
        };
        for (index, spec) in self.resources.iter().enumerate() {
            let label = spec.key.clone().unwrap_or_else(|| format!("#{index}"));
            loader.top_level(spec, &label, assembler)?;
        }

        debug!(
            resources = loader.summary.resources,
            embedded = loader.summary.embedded,
            "dataset built"
        );
        Ok(loader.summary)
    }
}

struct Loader<'a, 'r> {
    builder: &'a ResourceBuilder<'r>,
    keys: HashMap<String, Reference>,
    summary: DatasetSummary,
}

impl<'a, 'r> Loader<'a, 'r> {
    fn top_level<A: GraphAssembler + ?Sized>(
        &mut self,
        spec: &ResourceSpec,
        label: &str,
        assembler: &mut A,
    ) -> Result<(), DatasetError> {
        let fail = |source: EngineError| DatasetError::Resource {
            resource: label.to_string(),
            source,
        };

        let locale = parse_locale(spec.locale.as_deref(), label)?;
        let builder = self.builder;
        let mut resource = builder.create(&spec.class, locale.as_ref()).map_err(fail)?;
        if let Some(identifier) = &spec.identifier {
            resource.set_identifier(identifier).map_err(fail)?;
        }
        if let Some(text) = &spec.label {
            resource.set_pref_label(text).map_err(fail)?;
        }
        self.populate(&mut resource, &spec.properties, label)?;
        resource.finalize(assembler).map_err(fail)?;
        self.summary.resources += 1;

        if let Some(key) = &spec.key {
            if !resource.class().is_blank_node() {
                let reference = resource.reference().map_err(fail)?;
                self.keys.insert(key.clone(), reference);
            }
        }
        Ok(())
    }

    fn populate(
        &mut self,
        resource: &mut Resource<'_>,
        properties: &IndexMap<String, PropertySpec>,
        label: &str,
    ) -> Result<(), DatasetError> {
        for (property, spec) in properties {
            for value_spec in spec.values() {
                let value = self.value(value_spec, label)?;
                resource.set_property(property, value).map_err(|source| {
                    warn!(resource = label, property = property.as_str(), error = %source, "assignment rejected");
                    DatasetError::Resource {
                        resource: label.to_string(),
                        source,
                    }
                })?;
            }
        }
        Ok(())
    }

    fn value(&mut self, spec: &ValueSpec, label: &str) -> Result<Value, DatasetError> {
        let value: Value = match spec {
            ValueSpec::Boolean(b) => Literal::boolean(*b).into(),
            ValueSpec::Integer(i) => Literal::integer(*i).into(),
            ValueSpec::Float(f) => Literal::double(*f).into(),
            ValueSpec::Text(text) => Value::literal(text.as_str()),
            ValueSpec::Tagged(TaggedValue::Literal(literal)) => literal_value(literal).into(),
            ValueSpec::Tagged(TaggedValue::Ref(key)) => self
                .keys
                .get(key)
                .cloned()
                .map(Value::Reference)
                .ok_or_else(|| DatasetError::UnresolvedReference {
                    resource: label.to_string(),
                    key: key.clone(),
                })?,
            ValueSpec::Tagged(TaggedValue::Iri(iri)) => Value::reference(&iri.class, &iri.iri),
            ValueSpec::Tagged(TaggedValue::Blank(nested)) => self.blank(nested, label)?,
            ValueSpec::Tagged(TaggedValue::Bag(c)) => self.collection(CollectionKind::Bag, c, label)?,
            ValueSpec::Tagged(TaggedValue::Seq(c)) => self.collection(CollectionKind::Seq, c, label)?,
            ValueSpec::Tagged(TaggedValue::List(c)) => self.collection(CollectionKind::List, c, label)?,
            ValueSpec::Tagged(TaggedValue::Alt(c)) => self.collection(CollectionKind::Alt, c, label)?,
        };
        Ok(value)
    }

    fn blank(&mut self, spec: &NestedSpec, label: &str) -> Result<Value, DatasetError> {
        let fail = |source: EngineError| DatasetError::Resource {
            resource: label.to_string(),
            source,
        };
        let locale = parse_locale(spec.locale.as_deref(), label)?;
        let builder = self.builder;
        let mut resource = builder.create(&spec.class, locale.as_ref()).map_err(fail)?;
        self.populate(&mut resource, &spec.properties, label)?;
        let value = resource.into_blank().map_err(fail)?;
        self.summary.embedded += 1;
        Ok(value)
    }

    fn collection(
        &mut self,
        kind: CollectionKind,
        spec: &CollectionSpec,
        label: &str,
    ) -> Result<Value, DatasetError> {
        let (items, allow_duplicates) = match spec {
            CollectionSpec::Items(items) => (items, false),
            CollectionSpec::Configured {
                items,
                allow_duplicates,
            } => (items, *allow_duplicates),
        };
        let mut elements = Vec::with_capacity(items.len());
        for item in items {
            elements.push(self.value(item, label)?);
        }
        Ok(CollectionBuilder::from_elements(kind, elements, allow_duplicates).into())
    }
}

fn parse_locale(tag: Option<&str>, label: &str) -> Result<Option<Locale>, DatasetError> {
    tag.map(Locale::parse)
        .transpose()
        .map_err(|source| DatasetError::Locale {
            resource: label.to_string(),
            source,
        })
}

fn literal_value(spec: &LiteralSpec) -> Literal {
    match (&spec.lang, &spec.datatype) {
        (Some(lang), _) => Literal::lang(spec.value.as_str(), lang.as_str()),
        (None, Some(datatype)) => {
            let datatype = expand_prefixed(datatype).unwrap_or_else(|| datatype.clone());
            Literal::typed(spec.value.as_str(), datatype)
        }
        (None, None) => Literal::plain(spec.value.as_str()),
    }
}
