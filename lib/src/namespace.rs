//! Project namespace and the prefix tables used when serializing.
use crate::error::ConfigError;
use crate::named_nodes::{RDFS_NS, RDF_NS, SHACL_NS, XSD_NS};
use oxigraph::model::NamedNode;
use regex::Regex;
use std::sync::OnceLock;
use url::form_urlencoded;

/// Ordered prefix → namespace IRI bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixTable {
    entries: Vec<(String, String)>,
}

impl PrefixTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in prefixes for the RDFS vocabulary output.
    pub fn rdfs() -> Self {
        let mut table = Self::new();
        table.insert("rdf", RDF_NS);
        table.insert("rdfs", RDFS_NS);
        table.insert("xsd", XSD_NS);
        table
    }

    /// Built-in prefixes for the SHACL shapes output.
    pub fn shacl() -> Self {
        let mut table = Self::rdfs();
        table.insert("sh", SHACL_NS);
        table
    }

    /// Binds `prefix`, replacing an earlier binding of the same name.
    pub fn insert(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        let prefix = prefix.into();
        let iri = iri.into();
        match self.entries.iter_mut().find(|(p, _)| *p == prefix) {
            Some(entry) => entry.1 = iri,
            None => self.entries.push((prefix, iri)),
        }
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, iri)| iri.as_str())
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.get(prefix).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, i)| (p.as_str(), i.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The project's namespace plus the built-in tables extended with it.
///
/// Built once per run and shared read-only by every mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceContext {
    prefix: String,
    uri: String,
    rdfs_prefixes: PrefixTable,
    shacl_prefixes: PrefixTable,
}

impl NamespaceContext {
    pub fn new(prefix: &str, uri: &str) -> Result<Self, ConfigError> {
        if prefix.is_empty() {
            return Err(ConfigError::MissingPrefix);
        }
        if !is_valid_prefix(prefix) {
            return Err(ConfigError::InvalidPrefix(prefix.to_string()));
        }
        if uri.is_empty() {
            return Err(ConfigError::MissingUri);
        }
        if !is_valid_http_uri(uri) || NamedNode::new(uri).is_err() {
            return Err(ConfigError::InvalidUri(uri.to_string()));
        }

        let mut rdfs_prefixes = PrefixTable::rdfs();
        let mut shacl_prefixes = PrefixTable::shacl();
        if shacl_prefixes.contains(prefix) {
            return Err(ConfigError::ReservedPrefix(prefix.to_string()));
        }
        if !is_turtle_prefix(prefix) {
            return Err(ConfigError::UnserializablePrefix(prefix.to_string()));
        }
        rdfs_prefixes.insert(prefix, uri);
        shacl_prefixes.insert(prefix, uri);

        Ok(NamespaceContext {
            prefix: prefix.to_string(),
            uri: uri.to_string(),
            rdfs_prefixes,
            shacl_prefixes,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn rdfs_prefixes(&self) -> &PrefixTable {
        &self.rdfs_prefixes
    }

    pub fn shacl_prefixes(&self) -> &PrefixTable {
        &self.shacl_prefixes
    }

    /// Mints `<uri><local>`. `local` must already be encoded.
    pub fn iri(&self, local: &str) -> Result<NamedNode, String> {
        let iri = format!("{}{}", self.uri, local);
        NamedNode::new(iri.as_str()).map_err(|_| iri)
    }
}

fn prefix_regex() -> &'static Regex {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    PREFIX.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("static regex"))
}

/// Validates a namespace prefix: one or more ASCII word characters.
pub fn is_valid_prefix(prefix: &str) -> bool {
    prefix_regex().is_match(prefix)
}

/// Turtle's `PN_PREFIX` must start with a letter, so `_` or `1ex` cannot be
/// declared even though they are word characters.
fn is_turtle_prefix(prefix: &str) -> bool {
    prefix.starts_with(|c: char| c.is_ascii_alphabetic())
}

/// A deliberately loose URL check: the namespace only has to look like HTTP(S).
pub fn is_valid_http_uri(uri: &str) -> bool {
    uri.starts_with("http") || uri.starts_with("https")
}

/// Encodes a schema name so it can be appended to a namespace IRI.
pub fn encode_local_name(name: &str) -> String {
    form_urlencoded::byte_serialize(name.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_word_prefixes() {
        for prefix in ["ex", "EX", "ex_1", "_", "a1b2", "123"] {
            assert!(is_valid_prefix(prefix), "{prefix} should be accepted");
        }
    }

    #[test]
    fn rejects_prefixes_with_punctuation_or_whitespace() {
        for prefix in ["", "ex ns", "ex-ns", "ex:", "ex.ns", " ex", "ex\n", "préfixe", "名前"] {
            assert!(!is_valid_prefix(prefix), "{prefix:?} should be rejected");
        }
    }

    #[test]
    fn http_uri_check() {
        assert!(is_valid_http_uri("http://example.org/"));
        assert!(is_valid_http_uri("https://example.org/ns#"));
        assert!(!is_valid_http_uri(""));
        assert!(!is_valid_http_uri("ftp://example.org/"));
        assert!(!is_valid_http_uri("urn:example:ns"));
        assert!(!is_valid_http_uri(" http://example.org/"));
    }

    #[test]
    fn context_merges_project_prefix() -> Result<(), Box<dyn std::error::Error>> {
        let ns = NamespaceContext::new("ex", "https://example.org/ns#")?;
        assert_eq!(ns.rdfs_prefixes().get("ex"), Some("https://example.org/ns#"));
        assert_eq!(ns.shacl_prefixes().get("ex"), Some("https://example.org/ns#"));
        assert_eq!(ns.shacl_prefixes().get("sh"), Some(SHACL_NS));
        assert!(!ns.rdfs_prefixes().contains("sh"));
        assert_eq!(
            ns.iri("Person")?.as_str(),
            "https://example.org/ns#Person"
        );
        Ok(())
    }

    #[test]
    fn context_rejects_bad_input() {
        assert!(matches!(
            NamespaceContext::new("", "https://example.org/"),
            Err(ConfigError::MissingPrefix)
        ));
        assert!(matches!(
            NamespaceContext::new("e x", "https://example.org/"),
            Err(ConfigError::InvalidPrefix(_))
        ));
        assert!(matches!(
            NamespaceContext::new("ex", ""),
            Err(ConfigError::MissingUri)
        ));
        assert!(matches!(
            NamespaceContext::new("ex", "example.org"),
            Err(ConfigError::InvalidUri(_))
        ));
        assert!(matches!(
            NamespaceContext::new("sh", "https://example.org/"),
            Err(ConfigError::ReservedPrefix(_))
        ));
        for prefix in ["_", "123", "1ex", "_ex"] {
            assert!(matches!(
                NamespaceContext::new(prefix, "https://example.org/"),
                Err(ConfigError::UnserializablePrefix(_))
            ));
        }
        assert!(NamespaceContext::new("ex_1", "https://example.org/").is_ok());
    }

    #[test]
    fn local_names_are_iri_safe() {
        assert_eq!(encode_local_name("name"), "name");
        assert_eq!(encode_local_name("first name"), "first+name");
        assert_eq!(encode_local_name("a/b#c"), "a%2Fb%23c");
        assert_eq!(encode_local_name("snake_case-ok"), "snake_case-ok");
    }
}
