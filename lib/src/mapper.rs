//! Translation of a JSON Schema document into an RDFS vocabulary and a SHACL
//! shape graph.
//!
//! Object types are discovered while walking properties, array items and
//! `$ref`s. Every type is registered under its [`TypeKey`] the first time it
//! is seen and queued; the queue is drained until empty. A type is therefore
//! expanded at most once, which is what makes self- and mutually-referencing
//! schemas terminate.
use crate::error::MappingError;
use crate::graph::{PropertyShapeSpec, ShapeGraph, VocabularyGraph};
use crate::namespace::{encode_local_name, NamespaceContext};
use crate::schema::{definition_name, JsonSchemaDocument, NodeKind};
use crate::types::{Association, Cardinality, Facets, PropertyPath, Range, TypeKey, ValueKind};
use log::{debug, info};
use oxigraph::model::NamedNode;
use std::collections::{HashMap, HashSet, VecDeque};

/// Output of mapping one document.
#[derive(Debug)]
pub struct MappedSchema {
    pub vocabulary: VocabularyGraph,
    pub shapes: ShapeGraph,
    /// Classes in the order they were expanded.
    pub classes: Vec<NamedNode>,
    pub associations: Vec<Association>,
}

/// Maps `document` under `namespace`. With `auto_resolve` off, object-valued
/// properties get no `rdfs:range` / `sh:class`.
pub fn map(
    document: &JsonSchemaDocument,
    namespace: &NamespaceContext,
    auto_resolve: bool,
) -> Result<MappedSchema, MappingError> {
    SchemaMapper::new(document, namespace, auto_resolve).run()
}

#[derive(Debug, Clone)]
struct RegisteredClass {
    label: String,
    class: NamedNode,
    shape: NamedNode,
}

/// Type key → minted class and shape IRIs.
#[derive(Debug, Default)]
struct ClassRegistry {
    classes: HashMap<TypeKey, RegisteredClass>,
    /// Encoded local names already minted or reserved in the namespace.
    taken: HashSet<String>,
}

impl ClassRegistry {
    fn get(&self, key: &TypeKey) -> Option<&RegisteredClass> {
        self.classes.get(key)
    }

    fn reserve(&mut self, local: String) {
        self.taken.insert(local);
    }

    /// Mints IRIs for a new type. A local name that clashes with an existing
    /// class, shape or property gets a numeric suffix.
    fn register(
        &mut self,
        key: TypeKey,
        label: &str,
        namespace: &NamespaceContext,
        path: &PropertyPath,
    ) -> Result<RegisteredClass, MappingError> {
        let base = encode_local_name(label);
        let mut local = base.clone();
        let mut n = 2;
        while self.taken.contains(&local) || self.taken.contains(&format!("{}Shape", local)) {
            local = format!("{}_{}", base, n);
            n += 1;
        }
        let shape_local = format!("{}Shape", local);
        let invalid = |iri: String| MappingError::InvalidIri {
            path: path.to_string(),
            iri,
        };
        let registered = RegisteredClass {
            label: label.to_string(),
            class: namespace.iri(&local).map_err(invalid)?,
            shape: namespace.iri(&shape_local).map_err(invalid)?,
        };
        debug!("Registered {} as <{}>", key, registered.class);
        self.taken.insert(local);
        self.taken.insert(shape_local);
        self.classes.insert(key, registered.clone());
        Ok(registered)
    }
}

#[derive(Debug)]
struct PendingType {
    key: TypeKey,
    path: PropertyPath,
}

/// A property's value schema after following `$ref`s and array `items`.
#[derive(Debug)]
struct ResolvedValue {
    kind: ValueKind,
    many: bool,
    nullable: bool,
    /// `minItems` / `maxItems` of the outermost array.
    min_items: Option<u64>,
    max_items: Option<u64>,
    /// Facets of the node that determined `kind`.
    facets: Facets,
    description: Option<String>,
}

struct SchemaMapper<'a> {
    document: &'a JsonSchemaDocument,
    namespace: &'a NamespaceContext,
    auto_resolve: bool,
    registry: ClassRegistry,
    pending: VecDeque<PendingType>,
    vocabulary: VocabularyGraph,
    shapes: ShapeGraph,
    classes: Vec<NamedNode>,
    associations: Vec<Association>,
}

impl<'a> SchemaMapper<'a> {
    fn new(document: &'a JsonSchemaDocument, namespace: &'a NamespaceContext, auto_resolve: bool) -> Self {
        let mut registry = ClassRegistry::default();
        for name in document.property_names() {
            registry.reserve(encode_local_name(&name));
        }
        SchemaMapper {
            document,
            namespace,
            auto_resolve,
            registry,
            pending: VecDeque::new(),
            vocabulary: VocabularyGraph::new(),
            shapes: ShapeGraph::new(),
            classes: Vec::new(),
            associations: Vec::new(),
        }
    }

    fn run(mut self) -> Result<MappedSchema, MappingError> {
        let root_path = PropertyPath::root(self.document.name());
        let root_key = self.root_type(&root_path)?;
        let root_label = match definition_name(root_key.pointer()) {
            Some(name) => name,
            None => self.document.name().to_string(),
        };
        self.enqueue(root_key, &root_label, root_path)?;
        self.drain()?;

        for (name, pointer) in self.document.definitions() {
            let key = TypeKey(pointer);
            if self.registry.get(&key).is_some() {
                continue;
            }
            let path = PropertyPath::root(&name);
            match self.document.classify(key.pointer(), &path) {
                Ok(node) if matches!(node.kind, NodeKind::Object { .. }) => {
                    self.enqueue(key, &name, path)?;
                    self.drain()?;
                }
                Ok(_) => {}
                Err(e) => debug!("Skipping unreferenced definition {}: {}", name, e),
            }
        }

        info!(
            "Mapped {}: {} classes, {} properties, {} associations",
            self.document.name(),
            self.classes.len(),
            self.vocabulary.properties().len(),
            self.associations.len()
        );
        Ok(MappedSchema {
            vocabulary: self.vocabulary,
            shapes: self.shapes,
            classes: self.classes,
            associations: self.associations,
        })
    }

    /// The root must be an object, possibly behind a chain of `$ref`s.
    fn root_type(&self, path: &PropertyPath) -> Result<TypeKey, MappingError> {
        let mut pointer = String::new();
        let mut seen = HashSet::new();
        loop {
            let node = self.document.classify(&pointer, path)?;
            match node.kind {
                NodeKind::Object { .. } => return Ok(TypeKey(pointer)),
                NodeKind::Ref(target) => {
                    if !seen.insert(target.clone()) {
                        return Err(MappingError::ReferenceCycle {
                            path: path.to_string(),
                            reference: format!("#{}", target),
                        });
                    }
                    pointer = target;
                }
                _ => {
                    return Err(MappingError::RootNotObject {
                        path: path.to_string(),
                    })
                }
            }
        }
    }

    /// Returns the class for `key`, registering and queueing it when new.
    fn enqueue(
        &mut self,
        key: TypeKey,
        label: &str,
        path: PropertyPath,
    ) -> Result<NamedNode, MappingError> {
        if let Some(registered) = self.registry.get(&key) {
            return Ok(registered.class.clone());
        }
        let registered = self
            .registry
            .register(key.clone(), label, self.namespace, &path)?;
        self.pending.push_back(PendingType { key, path });
        Ok(registered.class)
    }

    fn drain(&mut self) -> Result<(), MappingError> {
        while let Some(pending) = self.pending.pop_front() {
            self.expand(&pending)?;
        }
        Ok(())
    }

    /// Emits the class, its node shape and one property + property shape per
    /// schema property.
    fn expand(&mut self, pending: &PendingType) -> Result<(), MappingError> {
        let node = self.document.classify(pending.key.pointer(), &pending.path)?;
        let (properties, required) = match node.kind {
            NodeKind::Object {
                properties,
                required,
            } => (properties, required),
            _ => {
                return Err(MappingError::RootNotObject {
                    path: pending.path.to_string(),
                })
            }
        };
        let owner = match self.registry.get(&pending.key) {
            Some(registered) => registered.clone(),
            None => {
                return Err(MappingError::UnresolvableReference {
                    path: pending.path.to_string(),
                    reference: pending.key.to_string(),
                })
            }
        };

        self.vocabulary
            .add_class(owner.class.as_ref(), &owner.label, node.description.as_deref());
        self.shapes
            .add_node_shape(owner.shape.as_ref(), owner.class.as_ref(), node.description.as_deref());
        self.classes.push(owner.class.clone());

        for (name, pointer) in properties {
            let path = pending.path.child(&name);
            let value = self.resolve_value(&pointer, &path, &owner.label, &name)?;
            let encoded = encode_local_name(&name);
            let invalid = |iri: String| MappingError::InvalidIri {
                path: path.to_string(),
                iri,
            };
            let property = self.namespace.iri(&encoded).map_err(invalid)?;
            let shape_iri = format!("{}/{}", owner.shape.as_str(), encoded);
            let property_shape = NamedNode::new(shape_iri.as_str()).map_err(|_| invalid(shape_iri.clone()))?;

            let mandatory = required.contains(&name) && !value.nullable;
            let cardinality = match (&value.kind, value.many) {
                (ValueKind::Null, _) => Cardinality::absent(),
                (_, true) => Cardinality {
                    min: if mandatory {
                        value.min_items.unwrap_or(1)
                    } else {
                        0
                    },
                    max: value.max_items,
                },
                (_, false) => Cardinality::single(mandatory),
            };

            let range = match &value.kind {
                ValueKind::Primitive(primitive) => {
                    Range::Datatype(primitive.datatype(value.facets.format.as_deref()).into_owned())
                }
                ValueKind::Object(key) => match self.registry.get(key) {
                    Some(target) if self.auto_resolve => {
                        self.associations.push(Association {
                            domain: owner.class.clone(),
                            property: property.clone(),
                            class: target.class.clone(),
                        });
                        Range::Class(target.class.clone())
                    }
                    _ => Range::Unresolved,
                },
                ValueKind::Null => Range::Unresolved,
            };

            self.vocabulary.add_property(
                property.as_ref(),
                &name,
                owner.class.as_ref(),
                &range,
                value.description.as_deref(),
            );
            self.shapes.add_property_shape(
                owner.shape.as_ref(),
                &PropertyShapeSpec {
                    id: property_shape.as_ref(),
                    path: property.as_ref(),
                    name: &name,
                    cardinality,
                    range: &range,
                    facets: &value.facets,
                    description: value.description.as_deref(),
                },
            );
        }
        Ok(())
    }

    /// Follows `$ref`s and array `items` from a property's schema down to a
    /// primitive, an object type or `null`. Object types met on the way are
    /// registered (and queued) but not expanded here.
    fn resolve_value(
        &mut self,
        pointer: &str,
        path: &PropertyPath,
        owner: &str,
        property: &str,
    ) -> Result<ResolvedValue, MappingError> {
        let mut current = pointer.to_string();
        let mut seen_refs = HashSet::new();
        let mut value = ResolvedValue {
            kind: ValueKind::Null,
            many: false,
            nullable: false,
            min_items: None,
            max_items: None,
            facets: Facets::default(),
            description: None,
        };

        loop {
            let node = self.document.classify(&current, path)?;
            value.nullable |= node.nullable;
            if value.description.is_none() {
                value.description = node.description.clone();
            }
            match node.kind {
                NodeKind::Ref(target) => {
                    if !seen_refs.insert(target.clone()) {
                        return Err(MappingError::ReferenceCycle {
                            path: path.to_string(),
                            reference: format!("#{}", target),
                        });
                    }
                    current = target;
                }
                NodeKind::Array { items } => {
                    if !value.many {
                        value.many = true;
                        value.min_items = node.facets.min_items;
                        value.max_items = node.facets.max_items;
                    }
                    current = items;
                }
                NodeKind::Primitive(primitive) => {
                    value.kind = ValueKind::Primitive(primitive);
                    value.facets = node.facets;
                    return Ok(value);
                }
                NodeKind::Null => {
                    value.kind = ValueKind::Null;
                    return Ok(value);
                }
                NodeKind::Object { .. } => {
                    let key = TypeKey(current);
                    let label = match (definition_name(key.pointer()), node.title) {
                        _ if key.pointer().is_empty() => self.document.name().to_string(),
                        (Some(name), _) => name,
                        (None, Some(title)) if !title.trim().is_empty() => title.trim().to_string(),
                        _ => format!("{}_{}", owner, property),
                    };
                    self.enqueue(key.clone(), &label, path.clone())?;
                    value.kind = ValueKind::Object(key);
                    return Ok(value);
                }
            }
        }
    }
}
