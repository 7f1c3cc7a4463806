use oxigraph::model::vocab::xsd;
use oxigraph::model::{NamedNode, NamedNodeRef};
use serde_json::{Number, Value};
use std::fmt;

/// Stable identity of an object type: the JSON pointer of the schema node
/// declaring it. `$ref`s are resolved before a key is built, so every
/// reference to the same definition yields the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(pub String);

impl TypeKey {
    pub fn pointer(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Dotted path from the document root to a property, used to name the
/// offending node in mapping errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyPath(Vec<String>);

impl PropertyPath {
    pub fn root(name: &str) -> Self {
        PropertyPath(vec![name.to_string()])
    }

    pub fn child(&self, property: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(property.to_string());
        PropertyPath(segments)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// JSON Schema primitive types with a datatype counterpart.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Number,
    Integer,
    Boolean,
}

impl Primitive {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Primitive::String),
            "number" => Some(Primitive::Number),
            "integer" => Some(Primitive::Integer),
            "boolean" => Some(Primitive::Boolean),
            _ => None,
        }
    }

    /// The XSD datatype for values of this type, refined by a string `format`.
    pub fn datatype(self, format: Option<&str>) -> NamedNodeRef<'static> {
        match (self, format) {
            (Primitive::String, Some("date-time")) => xsd::DATE_TIME,
            (Primitive::String, Some("date")) => xsd::DATE,
            (Primitive::String, Some("time")) => xsd::TIME,
            (Primitive::String, Some("uri" | "iri" | "uri-reference" | "iri-reference")) => {
                xsd::ANY_URI
            }
            (Primitive::String, _) => xsd::STRING,
            (Primitive::Number, _) => xsd::DECIMAL,
            (Primitive::Integer, _) => xsd::INTEGER,
            (Primitive::Boolean, _) => xsd::BOOLEAN,
        }
    }
}

/// What a property's values are once `$ref`s and array `items` are followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    Primitive(Primitive),
    Object(TypeKey),
    Null,
}

/// The `rdfs:range` / `sh:datatype` / `sh:class` of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Range {
    Datatype(NamedNode),
    Class(NamedNode),
    Unresolved,
}

/// `sh:minCount` / `sh:maxCount` of a property shape. `max: None` allows any
/// number of values.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Cardinality {
    pub min: u64,
    pub max: Option<u64>,
}

impl Cardinality {
    pub fn single(required: bool) -> Self {
        Cardinality {
            min: u64::from(required),
            max: Some(1),
        }
    }

    pub fn absent() -> Self {
        Cardinality {
            min: 0,
            max: Some(0),
        }
    }
}

/// A property whose values are instances of another mapped class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    pub domain: NamedNode,
    pub property: NamedNode,
    pub class: NamedNode,
}

/// Value constraints carried over from the schema into the property shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Facets {
    pub format: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
    pub exclusive_minimum: Option<Number>,
    pub exclusive_maximum: Option<Number>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub enumeration: Vec<Value>,
}
