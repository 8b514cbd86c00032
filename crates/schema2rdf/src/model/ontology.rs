//! RDF vocabulary constants used when emitting resources and schema triples.
//!
//! - `rdf:` / `rdfs:` / `xsd:` -- W3C core vocabularies
//! - `owl:` -- property characteristics and inverse declarations
//! - `schema:` -- `domainIncludes` / `rangeIncludes` for non-inferring schema export
//! - `skos:` -- preferred labels of resources

/// Standard RDF/RDFS/XSD namespace URIs
pub mod standard {
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const RDF_PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";
    pub const RDFS_CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

    // Containers and lists
    pub const RDF_BAG: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Bag";
    pub const RDF_SEQ: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Seq";
    pub const RDF_ALT: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Alt";
    pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";

    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";

    /// Container membership predicate `rdf:_n` (1-based).
    pub fn member(index: usize) -> String {
        format!("{RDF}_{index}")
    }
}

/// OWL property characteristics (`owl:` prefix)
pub mod owl {
    pub const PREFIX: &str = "owl";
    pub const NS: &str = "http://www.w3.org/2002/07/owl#";

    pub const INVERSE_OF: &str = "http://www.w3.org/2002/07/owl#inverseOf";
    pub const FUNCTIONAL_PROPERTY: &str = "http://www.w3.org/2002/07/owl#FunctionalProperty";
    pub const SYMMETRIC_PROPERTY: &str = "http://www.w3.org/2002/07/owl#SymmetricProperty";
    pub const TRANSITIVE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#TransitiveProperty";
}

/// schema.org predicates (`schema:` prefix)
pub mod schema {
    pub const PREFIX: &str = "schema";
    pub const NS: &str = "https://schema.org/";

    pub const DOMAIN_INCLUDES: &str = "https://schema.org/domainIncludes";
    pub const RANGE_INCLUDES: &str = "https://schema.org/rangeIncludes";
}

/// SKOS labels (`skos:` prefix)
pub mod skos {
    pub const PREFIX: &str = "skos";
    pub const NS: &str = "http://www.w3.org/2004/02/skos/core#";

    pub const PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
}

/// Well-known prefixes accepted in schema names such as `rdfs:label`.
pub const KNOWN_PREFIXES: &[(&str, &str)] = &[
    ("rdf", standard::RDF),
    ("rdfs", standard::RDFS),
    ("xsd", standard::XSD),
    (owl::PREFIX, owl::NS),
    (schema::PREFIX, schema::NS),
    (skos::PREFIX, skos::NS),
];

/// Expand a `prefix:local` name against [`KNOWN_PREFIXES`].
pub fn expand_prefixed(name: &str) -> Option<String> {
    let (prefix, local) = name.split_once(':')?;
    if local.starts_with("//") {
        return None;
    }
    KNOWN_PREFIXES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, ns)| format!("{ns}{local}"))
}
