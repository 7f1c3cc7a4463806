//! Read-only view over a JSON Schema document.
//!
//! Schema nodes are addressed by JSON pointer. [`JsonSchemaDocument::classify`]
//! inspects exactly one node and reports its kind together with the pointers
//! of its children; it never follows references itself.
use crate::error::{FileError, MappingError};
use crate::types::{Facets, Primitive, PropertyPath};
use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// A loaded JSON Schema document.
#[derive(Debug, Clone)]
pub struct JsonSchemaDocument {
    name: String,
    source: Option<PathBuf>,
    root: Value,
}

/// The kind of a single schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Properties in document order as `(name, child pointer)`.
    Object {
        properties: Vec<(String, String)>,
        required: Vec<String>,
    },
    Array {
        items: String,
    },
    Primitive(Primitive),
    Null,
    /// Target pointer of a local `$ref`.
    Ref(String),
}

/// One classified schema node.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub kind: NodeKind,
    /// `null` was listed next to another type.
    pub nullable: bool,
    pub title: Option<String>,
    pub description: Option<String>,
    pub facets: Facets,
}

impl JsonSchemaDocument {
    /// Wraps an already parsed document. `fallback_name` is used when the
    /// root has no `title`.
    pub fn from_value(fallback_name: &str, root: Value) -> Self {
        let name = root
            .get("title")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(fallback_name)
            .to_string();
        JsonSchemaDocument {
            name,
            source: None,
            root,
        }
    }

    pub fn from_json(fallback_name: &str, text: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::from_value(fallback_name, serde_json::from_str(text)?))
    }

    /// Reads and parses a schema file; the file stem names the root type
    /// when the schema has no `title`.
    pub fn load(path: &Path) -> Result<Self, FileError> {
        let text = fs::read_to_string(path).map_err(|source| FileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut document = Self::from_json(&file_stem(path), &text).map_err(|source| {
            FileError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        document.source = Some(path.to_path_buf());
        Ok(document)
    }

    /// Name of the root type.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn node(&self, pointer: &str) -> Option<&Value> {
        self.root.pointer(pointer)
    }

    /// Pointers of the entries under `definitions` and `$defs`, in document order.
    pub fn definitions(&self) -> Vec<(String, String)> {
        let mut definitions = Vec::new();
        for container in ["definitions", "$defs"] {
            if let Some(Value::Object(entries)) = self.root.get(container) {
                for name in entries.keys() {
                    definitions.push((
                        name.clone(),
                        format!("/{}/{}", container, escape_pointer(name)),
                    ));
                }
            }
        }
        definitions
    }

    /// Every property name declared anywhere in the document.
    pub fn property_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        collect_property_names(&self.root, &mut names);
        names
    }

    /// Resolves a local `$ref` to the pointer of its target.
    pub fn resolve_ref(&self, reference: &str, path: &PropertyPath) -> Result<String, MappingError> {
        let unresolvable = || MappingError::UnresolvableReference {
            path: path.to_string(),
            reference: reference.to_string(),
        };
        let fragment = reference.strip_prefix('#').ok_or_else(unresolvable)?;
        // The fragment is URI-encoded before it is read as a JSON pointer.
        let pointer = percent_decode_str(fragment)
            .decode_utf8()
            .map_err(|_| unresolvable())?;
        if !pointer.is_empty() && !pointer.starts_with('/') {
            return Err(unresolvable());
        }
        self.node(&pointer).ok_or_else(unresolvable)?;
        Ok(pointer.into_owned())
    }

    /// Classifies the node at `pointer`.
    pub fn classify(&self, pointer: &str, path: &PropertyPath) -> Result<SchemaNode, MappingError> {
        let invalid = |keyword: &str| MappingError::InvalidKeyword {
            path: path.to_string(),
            keyword: keyword.to_string(),
        };
        let node = match self.node(pointer) {
            Some(Value::Object(node)) => node,
            _ => {
                return Err(MappingError::MissingType {
                    path: path.to_string(),
                })
            }
        };

        let title = optional_str(node, "title").map_err(|_| invalid("title"))?;
        let description = optional_str(node, "description").map_err(|_| invalid("description"))?;
        let facets = read_facets(node).map_err(invalid)?;

        if let Some(reference) = node.get("$ref") {
            let reference = reference.as_str().ok_or_else(|| invalid("$ref"))?;
            return Ok(SchemaNode {
                kind: NodeKind::Ref(self.resolve_ref(reference, path)?),
                nullable: false,
                title,
                description,
                facets,
            });
        }

        let (type_name, nullable) = match node.get("type") {
            Some(Value::String(name)) => (Some(name.clone()), false),
            Some(Value::Array(names)) => {
                let mut kinds = Vec::new();
                for name in names {
                    kinds.push(name.as_str().ok_or_else(|| invalid("type"))?.to_string());
                }
                let nullable = kinds.iter().any(|k| k == "null");
                kinds.retain(|k| k != "null");
                if kinds.iter().all(|k| k == "number" || k == "integer") && kinds.len() > 1 {
                    kinds = vec!["number".to_string()];
                }
                match kinds.len() {
                    0 => (Some("null".to_string()), false),
                    1 => (kinds.pop(), nullable),
                    _ => {
                        return Err(MappingError::UnionType {
                            path: path.to_string(),
                            kinds,
                        })
                    }
                }
            }
            Some(_) => return Err(invalid("type")),
            None if node.contains_key("properties") => (Some("object".to_string()), false),
            None if node.contains_key("items") => (Some("array".to_string()), false),
            None => (None, false),
        };
        let type_name = type_name.ok_or_else(|| MappingError::MissingType {
            path: path.to_string(),
        })?;

        let kind = match type_name.as_str() {
            "object" => {
                let properties = match node.get("properties") {
                    None => Vec::new(),
                    Some(Value::Object(properties)) => properties
                        .keys()
                        .map(|name| {
                            (
                                name.clone(),
                                format!("{}/properties/{}", pointer, escape_pointer(name)),
                            )
                        })
                        .collect(),
                    Some(_) => return Err(invalid("properties")),
                };
                let required = match node.get("required") {
                    None => Vec::new(),
                    Some(Value::Array(names)) => names
                        .iter()
                        .map(|n| n.as_str().map(str::to_string))
                        .collect::<Option<Vec<_>>>()
                        .ok_or_else(|| invalid("required"))?,
                    Some(_) => return Err(invalid("required")),
                };
                NodeKind::Object {
                    properties,
                    required,
                }
            }
            "array" => {
                let items = match (node.get("items"), node.get("prefixItems")) {
                    (Some(Value::Object(_)), _) => format!("{}/items", pointer),
                    (Some(Value::Array(tuple)), _) if !tuple.is_empty() => {
                        format!("{}/items/0", pointer)
                    }
                    (_, Some(Value::Array(tuple))) if !tuple.is_empty() => {
                        format!("{}/prefixItems/0", pointer)
                    }
                    _ => {
                        return Err(MappingError::MissingItems {
                            path: path.to_string(),
                        })
                    }
                };
                NodeKind::Array { items }
            }
            "null" => NodeKind::Null,
            other => match Primitive::from_name(other) {
                Some(primitive) => NodeKind::Primitive(primitive),
                None => {
                    return Err(MappingError::UnsupportedType {
                        path: path.to_string(),
                        kind: other.to_string(),
                    })
                }
            },
        };

        Ok(SchemaNode {
            kind,
            nullable,
            title,
            description,
            facets,
        })
    }
}

/// Name of the definition a pointer designates, if it is a direct child of
/// `definitions` or `$defs`.
pub fn definition_name(pointer: &str) -> Option<String> {
    let rest = pointer
        .strip_prefix("/definitions/")
        .or_else(|| pointer.strip_prefix("/$defs/"))?;
    if rest.contains('/') {
        return None;
    }
    Some(unescape_pointer(rest))
}

/// Escapes one JSON pointer reference token (RFC 6901).
pub fn escape_pointer(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

fn unescape_pointer(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Schema".to_string())
}

fn optional_str(node: &Map<String, Value>, keyword: &str) -> Result<Option<String>, ()> {
    match node.get(keyword) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(()),
    }
}

fn read_facets(node: &Map<String, Value>) -> Result<Facets, &'static str> {
    fn count(node: &Map<String, Value>, keyword: &'static str) -> Result<Option<u64>, &'static str> {
        match node.get(keyword) {
            None => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or(keyword),
        }
    }
    fn number(
        node: &Map<String, Value>,
        keyword: &'static str,
    ) -> Result<Option<serde_json::Number>, &'static str> {
        match node.get(keyword) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(Some(n.clone())),
            Some(_) => Err(keyword),
        }
    }
    fn string(node: &Map<String, Value>, keyword: &'static str) -> Result<Option<String>, &'static str> {
        optional_str(node, keyword).map_err(|_| keyword)
    }

    let minimum = number(node, "minimum")?;
    let maximum = number(node, "maximum")?;
    // Draft 4 spells exclusive bounds as booleans next to minimum/maximum.
    let (minimum, exclusive_minimum) = match node.get("exclusiveMinimum") {
        Some(Value::Bool(true)) => (None, minimum),
        Some(Value::Bool(false)) | None => (minimum, None),
        Some(_) => (minimum, number(node, "exclusiveMinimum")?),
    };
    let (maximum, exclusive_maximum) = match node.get("exclusiveMaximum") {
        Some(Value::Bool(true)) => (None, maximum),
        Some(Value::Bool(false)) | None => (maximum, None),
        Some(_) => (maximum, number(node, "exclusiveMaximum")?),
    };
    let enumeration = match node.get("enum") {
        None => Vec::new(),
        Some(Value::Array(values)) => values.clone(),
        Some(_) => return Err("enum"),
    };

    Ok(Facets {
        format: string(node, "format")?,
        min_length: count(node, "minLength")?,
        max_length: count(node, "maxLength")?,
        pattern: string(node, "pattern")?,
        minimum,
        maximum,
        exclusive_minimum,
        exclusive_maximum,
        min_items: count(node, "minItems")?,
        max_items: count(node, "maxItems")?,
        enumeration,
    })
}

fn collect_property_names(value: &Value, names: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key == "properties" {
                    if let Value::Object(properties) = child {
                        names.extend(properties.keys().cloned());
                    }
                }
                collect_property_names(child, names);
            }
        }
        Value::Array(items) => items.iter().for_each(|v| collect_property_names(v, names)),
        _ => {}
    }
}
