use std::path::PathBuf;

use indexmap::IndexMap;
use schema2rdf::model::iri::IriMinter;
use schema2rdf::model::ontology::{owl, schema, standard};
use schema2rdf::model::{Literal, Term, Triple};
use schema2rdf::schema::export::schema_fragment;
use schema2rdf::schema::{
    ClassEntry, IdentifierRule, LabelId, Locale, PropertyEntry, SchemaRegistry, SchemaSource,
};
use schema2rdf::{EngineError, SchemaError};

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

fn class(properties: &[&str]) -> ClassEntry {
    ClassEntry {
        properties: properties.iter().map(|p| p.to_string()).collect(),
        ..ClassEntry::default()
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn loads_bundled_schema() {
    let registry = pharma();
    let names: Vec<&str> = registry.classes().map(|c| c.name()).collect();
    assert_eq!(
        names,
        [
            "Drug",
            "PackagedDrug",
            "Molecule",
            "AdverseEffect",
            "DosageForm",
            "Dosage"
        ]
    );

    let drug = registry.resolve("Drug").unwrap();
    assert!(drug.has_property("hasMolecule"));
    assert!(!drug.has_property("inchiKey"));
    assert_eq!(drug.constraint_for("hasMolecule"), Some("Molecule"));
    assert_eq!(drug.constraint_for("name"), None);
    assert_eq!(
        drug.identifier_rule(),
        Some(&IdentifierRule::Single("name".to_string()))
    );
    assert!(!drug.is_locale_keyed());
}

#[test]
fn declared_property_order_is_kept() {
    let registry = pharma();
    let packaged = registry.resolve("PackagedDrug").unwrap();
    let properties: Vec<&str> = packaged.properties().collect();
    assert_eq!(
        properties,
        ["cip13", "packagingLabel", "packagingPrice", "isPackagingOf"]
    );
}

#[test]
fn forward_reference_resolves() {
    // Drug is declared before Molecule and constrains hasMolecule to it.
    let registry = pharma();
    let drug = registry.resolve("Drug").unwrap();
    let target = drug.constraint_for("hasMolecule").unwrap();
    assert!(registry.class(target).is_some());
}

#[test]
fn self_reference_resolves() {
    let registry = pharma();
    let molecule = registry.resolve("Molecule").unwrap();
    assert_eq!(molecule.constraint_for("isFormOf"), Some("Molecule"));
    assert_eq!(molecule.constraint_for("hasForm"), Some("Molecule"));
}

#[test]
fn localized_identifier_rule() {
    let registry = pharma();
    let effect = registry.resolve("AdverseEffect").unwrap();
    assert!(effect.is_locale_keyed());
    assert_eq!(
        effect.identifier_property_for(Some(&Locale::parse("en").unwrap())),
        Some("nameEn")
    );
    assert_eq!(
        effect.identifier_property_for(Some(&Locale::parse("FR").unwrap())),
        Some("nameFr")
    );
    assert_eq!(effect.identifier_property_for(Some(&Locale::parse("de").unwrap())), None);
    assert_eq!(effect.identifier_property_for(None), None);
}

#[test]
fn single_rule_applies_to_every_locale() {
    let registry = pharma();
    let drug = registry.resolve("Drug").unwrap();
    assert_eq!(drug.identifier_property_for(None), Some("name"));
    assert_eq!(drug.identifier_property_for(Some(&Locale::parse("ja").unwrap())), Some("name"));
}

#[test]
fn blank_node_class_has_no_identifier() {
    let registry = pharma();
    let dosage = registry.resolve("Dosage").unwrap();
    assert!(dosage.is_blank_node());
    assert!(dosage.identifier_rule().is_none());
}

#[test]
fn inverse_is_recorded_both_ways() {
    let registry = pharma();
    assert_eq!(registry.inverse_of("hasForm"), Some("isFormOf"));
    assert_eq!(registry.inverse_of("isFormOf"), Some("hasForm"));
    assert_eq!(registry.inverse_of("isPackagingOf"), Some("hasPackagedDrug"));
    assert_eq!(registry.inverse_of("name"), None);
}

#[test]
fn property_characteristics() {
    let registry = pharma();
    assert!(registry.is_functional("cip13"));
    assert!(!registry.is_functional("synonyms"));
    assert!(!registry.is_functional("undeclared"));
    let is_form_of = registry.property("isFormOf").unwrap();
    assert!(is_form_of.is_transitive());
    assert!(!is_form_of.is_symmetric());
}

#[test]
fn unknown_class_lookup() {
    let registry = pharma();
    assert!(matches!(
        registry.resolve("Unicorn"),
        Err(EngineError::UnknownClass(name)) if name == "Unicorn"
    ));
    assert!(registry.class("Unicorn").is_none());
}

#[test]
fn json_schema_loads() {
    let source = SchemaSource::from_path(&fixture("classes.json")).unwrap();
    assert_eq!(source.class_count(), 2);
    let registry = SchemaRegistry::load(source).unwrap();
    assert_eq!(registry.resolve("Author").unwrap().constraint_for("wrote"), Some("Book"));
    assert!(registry.resolve("Book").unwrap().is_locale_keyed());
}

#[test]
fn class_with_no_fields() {
    let source = SchemaSource::from_yaml_str("Thing:\n").unwrap();
    let registry = SchemaRegistry::load(source).unwrap();
    let thing = registry.resolve("Thing").unwrap();
    assert_eq!(thing.properties().count(), 0);
    assert!(!thing.is_blank_node());
}

#[test]
fn builder_source() {
    let source = SchemaSource::new()
        .class("Person", class(&["name", "knows"]))
        .property(
            "knows",
            PropertyEntry {
                symmetric: true,
                ..PropertyEntry::default()
            },
        );
    let registry = SchemaRegistry::load(source).unwrap();
    assert!(registry.property("knows").unwrap().is_symmetric());
}

#[test]
fn merged_sources() {
    let a = SchemaSource::new().class("A", class(&["x"]));
    let b = SchemaSource::new().class("B", class(&["y"]));
    let registry = SchemaRegistry::load(a.merge(b)).unwrap();
    assert_eq!(registry.classes().count(), 2);
}

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

#[test]
fn duplicate_class_rejected() {
    let a = SchemaSource::new().class("Drug", class(&["name"]));
    let b = SchemaSource::new().class("Drug", class(&["title"]));
    assert!(matches!(
        SchemaRegistry::load(a.merge(b)),
        Err(SchemaError::DuplicateClass(name)) if name == "Drug"
    ));
}

#[test]
fn duplicate_property_rejected() {
    let source = SchemaSource::new().class("Drug", class(&["name", "name"]));
    assert!(matches!(
        SchemaRegistry::load(source),
        Err(SchemaError::DuplicateProperty { .. })
    ));
}

#[test]
fn constraint_on_undeclared_property_rejected() {
    let yaml = "Drug:\n  properties: [name]\n  constraints: { hasMolecule: Drug }\n";
    let source = SchemaSource::from_yaml_str(yaml).unwrap();
    assert!(matches!(
        SchemaRegistry::load(source),
        Err(SchemaError::UndeclaredConstraintProperty { property, .. }) if property == "hasMolecule"
    ));
}

#[test]
fn constraint_to_unknown_class_rejected() {
    let yaml = "Drug:\n  properties: [hasMolecule]\n  constraints: { hasMolecule: Molecule }\n";
    let source = SchemaSource::from_yaml_str(yaml).unwrap();
    assert!(matches!(
        SchemaRegistry::load(source),
        Err(SchemaError::UnknownConstraintClass { target, .. }) if target == "Molecule"
    ));
}

#[test]
fn identifier_property_must_be_declared() {
    let yaml = "Drug:\n  properties: [name]\n  label_id: title\n";
    let source = SchemaSource::from_yaml_str(yaml).unwrap();
    assert!(matches!(
        SchemaRegistry::load(source),
        Err(SchemaError::UnknownIdentifierProperty { property, .. }) if property == "title"
    ));

    let yaml = "Effect:\n  properties: [nameEn]\n  label_id: { en: nameEn, fr: nameFr }\n";
    let source = SchemaSource::from_yaml_str(yaml).unwrap();
    assert!(matches!(
        SchemaRegistry::load(source),
        Err(SchemaError::UnknownIdentifierProperty { property, .. }) if property == "nameFr"
    ));
}

#[test]
fn empty_locale_map_rejected() {
    let source = SchemaSource::new().class(
        "Effect",
        ClassEntry {
            label_id: Some(LabelId::Localized(IndexMap::new())),
            ..class(&["nameEn"])
        },
    );
    assert!(matches!(
        SchemaRegistry::load(source),
        Err(SchemaError::EmptyIdentifierRule(_))
    ));
}

#[test]
fn locale_keys_colliding_after_normalization_rejected() {
    let yaml = "Effect:\n  properties: [nameEn, nameEN]\n  label_id: { en: nameEn, EN: nameEN }\n";
    let err = SchemaRegistry::load(SchemaSource::from_yaml_str(yaml).unwrap()).unwrap_err();
    assert!(matches!(
        &err,
        SchemaError::DuplicateLocale { class, locale } if class == "Effect" && locale == "en"
    ));
}

#[test]
fn malformed_locale_key_rejected() {
    let yaml = "Effect:\n  properties: [name]\n  label_id: { 'not a tag': name }\n";
    let err = SchemaRegistry::load(SchemaSource::from_yaml_str(yaml).unwrap()).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidLocale { .. }));
    assert!(err.to_string().contains("Effect"));
}

#[test]
fn blank_node_with_identifier_rejected() {
    let yaml = "Dosage:\n  properties: [quantity]\n  bnode: true\n  label_id: quantity\n";
    let source = SchemaSource::from_yaml_str(yaml).unwrap();
    assert!(matches!(
        SchemaRegistry::load(source),
        Err(SchemaError::BlankNodeWithIdentifier(_))
    ));
}

#[test]
fn unknown_inverse_rejected() {
    let source = SchemaSource::new()
        .class("Molecule", class(&["hasForm"]))
        .with_properties_yaml_str("hasForm: { inverse: isFormOf }\n")
        .unwrap();
    assert!(matches!(
        SchemaRegistry::load(source),
        Err(SchemaError::UnknownInverse { inverse, .. }) if inverse == "isFormOf"
    ));
}

#[test]
fn inconsistent_inverse_rejected() {
    let source = SchemaSource::new()
        .class("Molecule", class(&["a", "b", "c"]))
        .with_properties_yaml_str("a: { inverse: b }\nc: { inverse: b }\n")
        .unwrap();
    assert!(matches!(
        SchemaRegistry::load(source),
        Err(SchemaError::InconsistentInverse { .. })
    ));
}

#[test]
fn unknown_field_rejected() {
    let yaml = "Drug:\n  properties: [name]\n  parent: Thing\n";
    assert!(matches!(
        SchemaSource::from_yaml_str(yaml),
        Err(SchemaError::Yaml(_))
    ));
}

#[test]
fn unsupported_extension_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("classes.toml");
    std::fs::write(&path, "").unwrap();
    assert!(matches!(
        SchemaSource::from_path(&path),
        Err(SchemaError::UnsupportedFormat(_))
    ));
}

#[test]
fn missing_file_reports_path() {
    let err = SchemaSource::from_path(&fixture("missing.yaml")).unwrap_err();
    assert!(matches!(err, SchemaError::Io { .. }));
    assert!(err.to_string().contains("missing.yaml"));
}

// ---------------------------------------------------------------------------
// Locale
// ---------------------------------------------------------------------------

#[test]
fn locale_normalization() {
    assert_eq!(Locale::parse("EN").unwrap().as_str(), "en");
    assert_eq!(Locale::parse("fr_fr").unwrap().as_str(), "fr-FR");
    assert_eq!(Locale::parse("zh-HANT-tw").unwrap().as_str(), "zh-Hant-TW");
    assert_eq!(Locale::parse("es-419").unwrap().as_str(), "es-419");
    assert_eq!(Locale::parse("pt_BR").unwrap(), Locale::parse("pt-br").unwrap());
    assert_eq!(" de ".parse::<Locale>().unwrap().as_str(), "de");
}

#[test]
fn malformed_locale() {
    let err = Locale::parse("en--US").unwrap_err();
    assert_eq!(err.tag, "en--US");
    assert!(Locale::parse("").is_err());
}

// ---------------------------------------------------------------------------
// Schema export
// ---------------------------------------------------------------------------

#[test]
fn schema_export_describes_classes_and_properties() {
    let registry = pharma();
    let iris = IriMinter::new("http://ex.org");
    let fragment = schema_fragment(&registry, &iris);
    let has = |s: &str, p: &str, o: Term| {
        fragment
            .triples
            .contains(&Triple::new(Term::iri(s), p, o))
    };

    assert!(has(
        "http://ex.org/ontology/Drug",
        standard::RDF_TYPE,
        Term::iri(standard::RDFS_CLASS)
    ));
    assert!(has(
        "http://ex.org/ontology/Drug",
        standard::RDFS_LABEL,
        Term::Literal(Literal::plain("Drug"))
    ));
    assert!(has(
        "http://ex.org/ontology/hasMolecule",
        schema::RANGE_INCLUDES,
        Term::iri("http://ex.org/ontology/Molecule")
    ));
    assert!(has(
        "http://ex.org/ontology/name",
        schema::DOMAIN_INCLUDES,
        Term::iri("http://ex.org/ontology/Drug")
    ));
    assert!(has(
        "http://ex.org/ontology/name",
        schema::DOMAIN_INCLUDES,
        Term::iri("http://ex.org/ontology/Molecule")
    ));
    assert!(has(
        "http://ex.org/ontology/cip13",
        standard::RDF_TYPE,
        Term::iri(owl::FUNCTIONAL_PROPERTY)
    ));
    assert!(has(
        "http://ex.org/ontology/isFormOf",
        standard::RDF_TYPE,
        Term::iri(owl::TRANSITIVE_PROPERTY)
    ));
    assert!(fragment.collections.is_empty());
}

#[test]
fn schema_export_states_each_inverse_pair_once() {
    let registry = pharma();
    let fragment = schema_fragment(&registry, &IriMinter::new("http://ex.org"));
    let inverses: Vec<&Triple> = fragment
        .triples
        .iter()
        .filter(|t| t.predicate == owl::INVERSE_OF)
        .collect();
    assert_eq!(inverses.len(), 2);
    assert!(inverses.iter().any(|t| {
        t.subject == Term::iri("http://ex.org/ontology/hasForm")
            && t.object == Term::iri("http://ex.org/ontology/isFormOf")
    }));
}

#[test]
fn schema_export_has_no_duplicate_triples() {
    let registry = pharma();
    let fragment = schema_fragment(&registry, &IriMinter::new("http://ex.org"));
    let unique: std::collections::HashSet<&Triple> = fragment.triples.iter().collect();
    assert_eq!(unique.len(), fragment.triples.len());
}
