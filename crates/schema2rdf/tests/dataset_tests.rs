use std::path::PathBuf;

use schema2rdf::dataset::{Dataset, DatasetSummary};
use schema2rdf::emitter::memory::MemoryGraph;
use schema2rdf::error::DatasetError;
use schema2rdf::model::ontology::{skos, standard};
use schema2rdf::model::{BlankNodeId, Literal, Term};
use schema2rdf::{BuildSession, EngineError, EngineOptions, SchemaRegistry, SchemaSource};

const BASE: &str = "http://ex.org";

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn pharma() -> SchemaRegistry {
    let source = SchemaSource::from_path(&fixture("classes.yaml"))
        .unwrap()
        .with_properties_path(&fixture("properties.yaml"))
        .unwrap();
    SchemaRegistry::load(source).unwrap()
}

fn options() -> EngineOptions {
    EngineOptions {
        base_uri: BASE.to_string(),
        default_locale: None,
    }
}

fn p(name: &str) -> String {
    format!("{BASE}/ontology/{name}")
}

fn build(
    registry: &SchemaRegistry,
    yaml: &str,
) -> (Result<DatasetSummary, DatasetError>, MemoryGraph) {
    let builder = BuildSession::new(registry).builder(&options());
    let mut graph = MemoryGraph::new();
    let result = Dataset::from_yaml_str(yaml).unwrap().build(&builder, &mut graph);
    (result, graph)
}

#[test]
fn fixture_dataset_builds() {
    let registry = pharma();
    let dataset = Dataset::from_path(&fixture("dataset.yaml")).unwrap();
    assert_eq!(dataset.resources.len(), 6);

    let builder = BuildSession::new(&registry).builder(&options());
    let mut graph = MemoryGraph::new();
    let summary = dataset.build(&builder, &mut graph).unwrap();
    assert_eq!(
        summary,
        DatasetSummary {
            resources: 6,
            embedded: 1
        }
    );
    assert_eq!(graph.fragment_count(), 6);
    assert_eq!(graph.len(), 40);

    let drug = Term::iri("http://ex.org/resource/Drug/Aspirin%20500");
    let aspirin = Term::iri("http://ex.org/resource/Molecule/BSYNRYMUTXBXSQ-UHFFFAOYSA-N");
    let nausea = Term::iri("http://ex.org/resource/AdverseEffect/nameEn/Nausea");
    let tablet = Term::iri("http://ex.org/resource/DosageForm/nameFr/Comprim%C3%A9");
    assert!(graph.contains(&drug, &p("hasMolecule"), &aspirin));
    assert!(graph.contains(&drug, &p("hasAdverseEffect"), &nausea));
    assert!(graph.contains(&drug, &p("hasDosageForm"), &tablet));
    assert!(graph.contains(
        &tablet,
        &p("route"),
        &Term::Literal(Literal::lang("oral", "en"))
    ));
    assert!(builder.is_committed("PackagedDrug", "http://ex.org/resource/PackagedDrug/3400930000001"));
}

#[test]
fn fixture_dataset_values() {
    let registry = pharma();
    let builder = BuildSession::new(&registry).builder(&options());
    let mut graph = MemoryGraph::new();
    Dataset::from_path(&fixture("dataset.yaml"))
        .unwrap()
        .build(&builder, &mut graph)
        .unwrap();

    // Embedded dosage: the first blank token allocated.
    let dosage = Term::Blank(BlankNodeId::new("b0"));
    assert!(graph.contains(
        &dosage,
        &p("quantity"),
        &Term::Literal(Literal::integer(500))
    ));

    let packaged = Term::iri("http://ex.org/resource/PackagedDrug/3400930000001");
    assert!(graph.contains(
        &packaged,
        &p("packagingPrice"),
        &Term::Literal(Literal::typed("2.18", format!("{}decimal", standard::XSD)))
    ));

    // The Seq keeps its repeated synonym, the Bag drops its repeated indication.
    let drug = Term::iri("http://ex.org/resource/Drug/Aspirin%20500");
    let seq = graph.objects(&drug, &p("synonyms")).next().unwrap().clone();
    let bag = graph.objects(&drug, &p("indications")).next().unwrap().clone();
    let members = |node: &Term| {
        graph
            .triples()
            .iter()
            .filter(|t| &t.subject == node && t.predicate.starts_with(&format!("{}_", standard::RDF)))
            .count()
    };
    assert_eq!(members(&seq), 3);
    assert_eq!(members(&bag), 2);
}

#[test]
fn json_dataset() {
    let registry = pharma();
    let builder = BuildSession::new(&registry).builder(&options());
    let mut graph = MemoryGraph::new();
    let json = r#"{
        "resources": [
            { "class": "Molecule", "properties": { "inchiKey": "KEY", "name": ["a", "b"] } }
        ]
    }"#;
    let summary = Dataset::from_json_str(json)
        .unwrap()
        .build(&builder, &mut graph)
        .unwrap();
    assert_eq!(summary.resources, 1);
    assert_eq!(graph.len(), 4);
}

#[test]
fn unresolved_reference() {
    let registry = pharma();
    let yaml = "
resources:
  - class: Drug
    properties:
      name: Aspirin
      hasMolecule: { ref: aspirin }
  - class: Molecule
    key: aspirin
    properties: { inchiKey: KEY }
";
    let (result, graph) = build(&registry, yaml);
    assert!(matches!(
        result,
        Err(DatasetError::UnresolvedReference { key, .. }) if key == "aspirin"
    ));
    assert!(graph.is_empty());
}

#[test]
fn duplicate_key_rejected_before_building() {
    let registry = pharma();
    let yaml = "
resources:
  - { class: Molecule, key: m, properties: { inchiKey: A } }
  - { class: Molecule, key: m, properties: { inchiKey: B } }
";
    let (result, graph) = build(&registry, yaml);
    assert!(matches!(result, Err(DatasetError::DuplicateKey(key)) if key == "m"));
    assert!(graph.is_empty());
}

#[test]
fn engine_errors_name_the_resource() {
    let registry = pharma();
    let yaml = "
resources:
  - { class: Molecule, key: m, properties: { inchiKey: A } }
  - { class: Molecule, properties: { inchiKey: A } }
";
    let (result, graph) = build(&registry, yaml);
    let err = result.unwrap_err();
    assert!(matches!(
        &err,
        DatasetError::Resource { resource, source: EngineError::DuplicateIdentifier { .. } }
            if resource == "#1"
    ));
    assert_eq!(graph.fragment_count(), 1);
}

#[test]
fn constraint_violation_in_dataset() {
    let registry = pharma();
    let yaml = "
resources:
  - { class: AdverseEffect, key: nausea, locale: en, properties: { nameEn: Nausea } }
  - class: Molecule
    key: m
    properties:
      inchiKey: A
      isFormOf: { ref: nausea }
";
    let (result, _) = build(&registry, yaml);
    assert!(matches!(
        result,
        Err(DatasetError::Resource { source: EngineError::ConstraintViolation { .. }, .. })
    ));
}

#[test]
fn external_iri_reference() {
    let registry = pharma();
    let yaml = "
resources:
  - class: Drug
    properties:
      name: Aspirin
      hasMolecule: { iri: { class: Molecule, iri: 'http://other.org/m/1' } }
";
    let (result, graph) = build(&registry, yaml);
    result.unwrap();
    assert!(graph.contains(
        &Term::iri("http://ex.org/resource/Drug/Aspirin"),
        &p("hasMolecule"),
        &Term::iri("http://other.org/m/1")
    ));
}

#[test]
fn explicit_identifier_and_bag_duplicates() {
    let registry =
        SchemaRegistry::load(SchemaSource::from_yaml_str("Note:\n  properties: [tags]\n").unwrap())
            .unwrap();
    let yaml = "
resources:
  - class: Note
    identifier: n1
    properties:
      tags: { bag: { items: [a, a, b], allow_duplicates: true } }
";
    let (result, graph) = build(&registry, yaml);
    result.unwrap();
    // type + tags, then the Bag: type + three members
    assert_eq!(graph.len(), 6);
}

#[test]
fn typed_scalars() {
    let registry =
        SchemaRegistry::load(SchemaSource::from_yaml_str("Note:\n  properties: [v]\n").unwrap())
            .unwrap();
    let yaml = "
resources:
  - class: Note
    identifier: n1
    properties:
      v: [true, 3, 2.5, text]
";
    let (result, graph) = build(&registry, yaml);
    result.unwrap();
    let note = Term::iri("http://ex.org/resource/Note/n1");
    let v = p("v");
    let values: Vec<&Term> = graph.objects(&note, &v).collect();
    assert_eq!(
        values,
        [
            &Term::Literal(Literal::boolean(true)),
            &Term::Literal(Literal::integer(3)),
            &Term::Literal(Literal::double(2.5)),
            &Term::Literal(Literal::plain("text")),
        ]
    );
}

#[test]
fn label_written_in_resource_locale() {
    let registry = pharma();
    let yaml = "
resources:
  - class: DosageForm
    locale: fr
    label: Comprimé pelliculé
    properties: { nameFr: Comprimé }
";
    let (result, graph) = build(&registry, yaml);
    result.unwrap();
    assert!(graph.contains(
        &Term::iri("http://ex.org/resource/DosageForm/nameFr/Comprim%C3%A9"),
        skos::PREF_LABEL,
        &Term::Literal(Literal::lang("Comprimé pelliculé", "fr"))
    ));
}

#[test]
fn malformed_locale_names_the_resource() {
    let registry = pharma();
    let yaml = "
resources:
  - { class: AdverseEffect, key: bad, locale: 'en--GB', properties: { nameEn: Rash } }
";
    let (result, graph) = build(&registry, yaml);
    assert!(matches!(
        result,
        Err(DatasetError::Locale { resource, .. }) if resource == "bad"
    ));
    assert!(graph.is_empty());
}

#[test]
fn unknown_dataset_field_rejected() {
    assert!(matches!(
        Dataset::from_yaml_str("resources:\n  - { class: Drug, colour: red }\n"),
        Err(DatasetError::Yaml(_))
    ));
}

#[test]
fn empty_dataset() {
    let registry = pharma();
    let (result, graph) = build(&registry, "resources: []\n");
    assert_eq!(result.unwrap(), DatasetSummary::default());
    assert!(graph.is_empty());
}
