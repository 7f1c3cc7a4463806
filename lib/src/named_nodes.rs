use oxigraph::model::NamedNodeRef;

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";
pub const SHACL_NS: &str = "http://www.w3.org/ns/shacl#";

/// The subset of the SHACL vocabulary emitted by the shape graph builder.
pub struct SHACL {
    pub node_shape: NamedNodeRef<'static>,
    pub property_shape: NamedNodeRef<'static>,
    pub target_class: NamedNodeRef<'static>,
    pub property: NamedNodeRef<'static>,
    pub path: NamedNodeRef<'static>,
    pub name: NamedNodeRef<'static>,
    pub description: NamedNodeRef<'static>,
    pub min_count: NamedNodeRef<'static>,
    pub max_count: NamedNodeRef<'static>,
    pub datatype: NamedNodeRef<'static>,
    pub class: NamedNodeRef<'static>,
    pub min_length: NamedNodeRef<'static>,
    pub max_length: NamedNodeRef<'static>,
    pub pattern: NamedNodeRef<'static>,
    pub min_inclusive: NamedNodeRef<'static>,
    pub max_inclusive: NamedNodeRef<'static>,
    pub min_exclusive: NamedNodeRef<'static>,
    pub max_exclusive: NamedNodeRef<'static>,
    pub in_: NamedNodeRef<'static>,
}

impl SHACL {
    pub fn new() -> Self {
        SHACL {
            node_shape: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#NodeShape"),
            property_shape: NamedNodeRef::new_unchecked(
                "http://www.w3.org/ns/shacl#PropertyShape",
            ),
            target_class: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#targetClass"),
            property: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#property"),
            path: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#path"),
            name: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#name"),
            description: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#description"),
            min_count: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#minCount"),
            max_count: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#maxCount"),
            datatype: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#datatype"),
            class: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#class"),
            min_length: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#minLength"),
            max_length: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#maxLength"),
            pattern: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#pattern"),
            min_inclusive: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#minInclusive"),
            max_inclusive: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#maxInclusive"),
            min_exclusive: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#minExclusive"),
            max_exclusive: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#maxExclusive"),
            in_: NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#in"),
        }
    }
}

impl Default for SHACL {
    fn default() -> Self {
        Self::new()
    }
}
