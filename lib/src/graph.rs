//! In-memory RDFS vocabulary and SHACL shape graphs.
use crate::named_nodes::SHACL;
use crate::types::{Cardinality, Facets, Range};
use log::debug;
use oxigraph::model::vocab::{rdf, rdfs};
use oxigraph::model::{
    BlankNode, Graph, Literal, NamedNode, NamedNodeRef, NamedOrBlankNodeRef, Term, TermRef,
    TripleRef,
};
use serde_json::{Number, Value};

fn insert<'a>(
    graph: &mut Graph,
    subject: impl Into<NamedOrBlankNodeRef<'a>>,
    predicate: impl Into<NamedNodeRef<'a>>,
    object: impl Into<TermRef<'a>>,
) {
    graph.insert(TripleRef::new(subject, predicate, object));
}

/// `rdfs:Class` and `rdf:Property` declarations of one schema document.
#[derive(Debug, Default)]
pub struct VocabularyGraph {
    graph: Graph,
}

impl VocabularyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&mut self, class: NamedNodeRef<'_>, label: &str, comment: Option<&str>) {
        insert(&mut self.graph, class, rdf::TYPE, rdfs::CLASS);
        insert(
            &mut self.graph,
            class,
            rdfs::LABEL,
            Literal::new_simple_literal(label).as_ref(),
        );
        if let Some(comment) = comment {
            insert(
                &mut self.graph,
                class,
                rdfs::COMMENT,
                Literal::new_simple_literal(comment).as_ref(),
            );
        }
    }

    /// Declares `property` on `domain`. A property shared by several classes
    /// accumulates one `rdfs:domain` per class.
    pub fn add_property(
        &mut self,
        property: NamedNodeRef<'_>,
        label: &str,
        domain: NamedNodeRef<'_>,
        range: &Range,
        comment: Option<&str>,
    ) {
        insert(&mut self.graph, property, rdf::TYPE, rdf::PROPERTY);
        insert(
            &mut self.graph,
            property,
            rdfs::LABEL,
            Literal::new_simple_literal(label).as_ref(),
        );
        insert(&mut self.graph, property, rdfs::DOMAIN, domain);
        match range {
            Range::Datatype(range) | Range::Class(range) => {
                insert(&mut self.graph, property, rdfs::RANGE, range.as_ref())
            }
            Range::Unresolved => {}
        }
        if let Some(comment) = comment {
            insert(
                &mut self.graph,
                property,
                rdfs::COMMENT,
                Literal::new_simple_literal(comment).as_ref(),
            );
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Declared classes, sorted by IRI.
    pub fn classes(&self) -> Vec<NamedNode> {
        subjects_of_type(&self.graph, rdfs::CLASS)
    }

    /// Declared properties, sorted by IRI.
    pub fn properties(&self) -> Vec<NamedNode> {
        subjects_of_type(&self.graph, rdf::PROPERTY)
    }

    pub fn objects(&self, subject: NamedNodeRef<'_>, predicate: NamedNodeRef<'_>) -> Vec<Term> {
        objects(&self.graph, subject, predicate)
    }
}

/// Everything needed to emit one `sh:PropertyShape`.
#[derive(Debug)]
pub struct PropertyShapeSpec<'a> {
    pub id: NamedNodeRef<'a>,
    pub path: NamedNodeRef<'a>,
    pub name: &'a str,
    pub cardinality: Cardinality,
    pub range: &'a Range,
    pub facets: &'a Facets,
    pub description: Option<&'a str>,
}

/// `sh:NodeShape` / `sh:PropertyShape` declarations of one schema document.
#[derive(Debug, Default)]
pub struct ShapeGraph {
    graph: Graph,
    list_nodes: usize,
}

impl ShapeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node_shape(
        &mut self,
        shape: NamedNodeRef<'_>,
        target_class: NamedNodeRef<'_>,
        description: Option<&str>,
    ) {
        let sh = SHACL::new();
        insert(&mut self.graph, shape, rdf::TYPE, sh.node_shape);
        insert(&mut self.graph, shape, sh.target_class, target_class);
        if let Some(description) = description {
            insert(
                &mut self.graph,
                shape,
                sh.description,
                Literal::new_simple_literal(description).as_ref(),
            );
        }
    }

    pub fn add_property_shape(&mut self, node_shape: NamedNodeRef<'_>, spec: &PropertyShapeSpec<'_>) {
        let sh = SHACL::new();
        let id = spec.id;
        insert(&mut self.graph, node_shape, sh.property, id);
        insert(&mut self.graph, id, rdf::TYPE, sh.property_shape);
        insert(&mut self.graph, id, sh.path, spec.path);
        insert(
            &mut self.graph,
            id,
            sh.name,
            Literal::new_simple_literal(spec.name).as_ref(),
        );
        if let Some(description) = spec.description {
            insert(
                &mut self.graph,
                id,
                sh.description,
                Literal::new_simple_literal(description).as_ref(),
            );
        }
        insert(
            &mut self.graph,
            id,
            sh.min_count,
            Literal::from(spec.cardinality.min).as_ref(),
        );
        if let Some(max) = spec.cardinality.max {
            insert(&mut self.graph, id, sh.max_count, Literal::from(max).as_ref());
        }
        match spec.range {
            Range::Datatype(datatype) => insert(&mut self.graph, id, sh.datatype, datatype.as_ref()),
            Range::Class(class) => insert(&mut self.graph, id, sh.class, class.as_ref()),
            Range::Unresolved => {}
        }
        self.add_facets(id, spec.facets);
    }

    fn add_facets(&mut self, id: NamedNodeRef<'_>, facets: &Facets) {
        let sh = SHACL::new();
        if let Some(n) = facets.min_length {
            insert(&mut self.graph, id, sh.min_length, Literal::from(n).as_ref());
        }
        if let Some(n) = facets.max_length {
            insert(&mut self.graph, id, sh.max_length, Literal::from(n).as_ref());
        }
        if let Some(pattern) = &facets.pattern {
            insert(
                &mut self.graph,
                id,
                sh.pattern,
                Literal::new_simple_literal(pattern).as_ref(),
            );
        }
        let bounds = [
            (sh.min_inclusive, &facets.minimum),
            (sh.max_inclusive, &facets.maximum),
            (sh.min_exclusive, &facets.exclusive_minimum),
            (sh.max_exclusive, &facets.exclusive_maximum),
        ];
        for (predicate, bound) in bounds {
            if let Some(bound) = bound {
                insert(&mut self.graph, id, predicate, number_literal(bound).as_ref());
            }
        }
        if !facets.enumeration.is_empty() {
            let members: Vec<Term> = facets
                .enumeration
                .iter()
                .filter_map(|value| {
                    let literal = value_literal(value);
                    if literal.is_none() {
                        debug!("Dropping non-scalar enum member {} from sh:in", value);
                    }
                    literal.map(Term::from)
                })
                .collect();
            // An empty sh:in would reject every value.
            if !members.is_empty() {
                let head = self.build_rdf_list(members);
                insert(&mut self.graph, id, sh.in_, head.as_ref());
            }
        }
    }

    /// Writes `items` as an RDF collection and returns its head. List nodes
    /// get sequential labels so repeated runs produce the same graph.
    fn build_rdf_list(&mut self, items: Vec<Term>) -> Term {
        if items.is_empty() {
            return rdf::NIL.into_owned().into();
        }
        let nodes: Vec<BlankNode> = (0..items.len())
            .map(|_| {
                let node = BlankNode::new_unchecked(format!("list{}", self.list_nodes));
                self.list_nodes += 1;
                node
            })
            .collect();
        for (i, item) in items.iter().enumerate() {
            insert(&mut self.graph, nodes[i].as_ref(), rdf::FIRST, item.as_ref());
            match nodes.get(i + 1) {
                Some(next) => insert(&mut self.graph, nodes[i].as_ref(), rdf::REST, next.as_ref()),
                None => insert(&mut self.graph, nodes[i].as_ref(), rdf::REST, rdf::NIL),
            }
        }
        nodes[0].clone().into()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Declared node shapes, sorted by IRI.
    pub fn node_shapes(&self) -> Vec<NamedNode> {
        subjects_of_type(&self.graph, SHACL::new().node_shape)
    }

    /// Property shapes attached to `node_shape`, sorted by IRI.
    pub fn property_shapes(&self, node_shape: NamedNodeRef<'_>) -> Vec<NamedNode> {
        let mut shapes: Vec<NamedNode> = objects(&self.graph, node_shape, SHACL::new().property)
            .into_iter()
            .filter_map(|t| match t {
                Term::NamedNode(n) => Some(n),
                _ => None,
            })
            .collect();
        shapes.sort();
        shapes
    }

    pub fn objects(&self, subject: NamedNodeRef<'_>, predicate: NamedNodeRef<'_>) -> Vec<Term> {
        objects(&self.graph, subject, predicate)
    }
}

fn subjects_of_type(graph: &Graph, class: NamedNodeRef<'_>) -> Vec<NamedNode> {
    let mut subjects: Vec<NamedNode> = graph
        .subjects_for_predicate_object(rdf::TYPE, class)
        .filter_map(|s| {
            if let NamedOrBlankNodeRef::NamedNode(n) = s {
                Some(n.into_owned())
            } else {
                None
            }
        })
        .collect();
    subjects.sort();
    subjects
}

fn objects(graph: &Graph, subject: NamedNodeRef<'_>, predicate: NamedNodeRef<'_>) -> Vec<Term> {
    let mut objects: Vec<Term> = graph
        .objects_for_subject_predicate(subject, predicate)
        .map(TermRef::into_owned)
        .collect();
    objects.sort_by_key(ToString::to_string);
    objects
}

fn number_literal(n: &Number) -> Literal {
    if let Some(i) = n.as_i64() {
        Literal::from(i)
    } else if let Some(u) = n.as_u64() {
        Literal::from(u)
    } else {
        Literal::from(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn value_literal(value: &Value) -> Option<Literal> {
    match value {
        Value::String(s) => Some(Literal::new_simple_literal(s)),
        Value::Number(n) => Some(number_literal(n)),
        Value::Bool(b) => Some(Literal::from(*b)),
        _ => None,
    }
}
