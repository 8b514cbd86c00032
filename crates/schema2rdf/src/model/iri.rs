//! IRI minting for schema classes, properties and resources.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use super::ontology::expand_prefixed;

/// Characters that need percent-encoding in IRI path segments.
/// We keep alphanumeric, -, _, ., ~ as unreserved per RFC 3987.
const IRI_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'!')
    .add(b'"')
    .add(b'#')
    .add(b'$')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'*')
    .add(b'+')
    .add(b',')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Generates consistent IRIs for the classes, properties and resources of a schema.
#[derive(Debug, Clone)]
pub struct IriMinter {
    base_uri: String,
}

impl IriMinter {
    pub fn new(base_uri: &str) -> Self {
        Self {
            base_uri: base_uri.trim_end_matches(['/', '#']).to_string(),
        }
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Escape a string for use in an IRI path segment.
    pub fn escape(value: &str) -> String {
        utf8_percent_encode(value, IRI_ENCODE_SET).to_string()
    }

    /// Absolute IRIs and known `prefix:local` names pass through (expanded);
    /// anything else is minted under `{base}/ontology/`.
    fn term_iri(&self, name: &str) -> String {
        if name.contains("://") {
            return name.to_string();
        }
        expand_prefixed(name)
            .unwrap_or_else(|| format!("{}/ontology/{}", self.base_uri, Self::escape(name)))
    }

    /// IRI for a schema class.
    pub fn class_iri(&self, class: &str) -> String {
        self.term_iri(class)
    }

    /// IRI for a schema property (used as triple predicate).
    pub fn property_iri(&self, property: &str) -> String {
        self.term_iri(property)
    }

    /// IRI for a resource identified by a single identifier value.
    pub fn resource_iri(&self, class: &str, identifier: &str) -> String {
        format!(
            "{}/resource/{}/{}",
            self.base_uri,
            Self::escape(class),
            Self::escape(identifier)
        )
    }

    /// IRI for a resource identified through a locale-keyed rule. The
    /// identifier property is part of the path, as the same value may
    /// identify different resources under different locales.
    pub fn localized_resource_iri(&self, class: &str, property: &str, identifier: &str) -> String {
        format!(
            "{}/resource/{}/{}/{}",
            self.base_uri,
            Self::escape(class),
            Self::escape(property),
            Self::escape(identifier)
        )
    }
}
