//! Rendering of the vocabulary and shape graphs and writing them to disk.
use crate::error::SerializationError;
use crate::graph::{ShapeGraph, VocabularyGraph};
use crate::namespace::{NamespaceContext, PrefixTable};
use log::{debug, warn};
use oxigraph::io::{RdfFormat, RdfSerializer};
use oxigraph::model::vocab::rdf;
use oxigraph::model::{Graph, TripleRef};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Renders the vocabulary with the RDFS prefix table.
pub fn serialize(
    vocabulary: &VocabularyGraph,
    namespace: &NamespaceContext,
    format: RdfFormat,
) -> Result<String, SerializationError> {
    render(vocabulary.graph(), namespace.rdfs_prefixes(), format)
}

/// Renders the shapes with the SHACL prefix table.
pub fn materialize(
    shapes: &ShapeGraph,
    namespace: &NamespaceContext,
    format: RdfFormat,
) -> Result<String, SerializationError> {
    render(shapes.graph(), namespace.shacl_prefixes(), format)
}

fn render(
    graph: &Graph,
    prefixes: &PrefixTable,
    format: RdfFormat,
) -> Result<String, SerializationError> {
    let mut serializer = RdfSerializer::from_format(format);
    for (prefix, iri) in prefixes.iter() {
        serializer =
            serializer
                .with_prefix(prefix, iri)
                .map_err(|_| SerializationError::Prefix {
                    prefix: prefix.to_string(),
                    iri: iri.to_string(),
                })?;
    }
    let mut writer = serializer.for_writer(Vec::new());
    for triple in canonical_order(graph) {
        writer
            .serialize_triple(triple)
            .map_err(SerializationError::Render)?;
    }
    let bytes = writer.finish().map_err(SerializationError::Render)?;
    String::from_utf8(bytes).map_err(|_| SerializationError::Encoding)
}

/// Graph iteration order is not stable between runs; sort by subject, then
/// `rdf:type` before other predicates, then predicate and object.
fn canonical_order(graph: &Graph) -> Vec<TripleRef<'_>> {
    let mut triples: Vec<TripleRef<'_>> = graph.iter().collect();
    triples.sort_by_cached_key(|t| {
        (
            t.subject.to_string(),
            t.predicate != rdf::TYPE,
            t.predicate.as_str().to_owned(),
            t.object.to_string(),
        )
    });
    triples
}

/// `<stem>.<ext>` and `<stem>_shacl.<ext>` inside `out_dir`.
pub fn output_paths(out_dir: &Path, source: &Path, format: RdfFormat) -> (PathBuf, PathBuf) {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "schema".to_string());
    let extension = format.file_extension();
    (
        out_dir.join(format!("{}.{}", stem, extension)),
        out_dir.join(format!("{}_shacl.{}", stem, extension)),
    )
}

/// Writes both outputs of `source` into `out_dir`, creating the directory if
/// needed. Existing files are overwritten. When the shapes file cannot be
/// written the vocabulary file is removed again.
pub fn write_outputs(
    out_dir: &Path,
    source: &Path,
    vocabulary: &str,
    shapes: &str,
    format: RdfFormat,
) -> Result<(PathBuf, PathBuf), SerializationError> {
    let write_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source: io::Error| SerializationError::Write { path, source }
    };
    fs::create_dir_all(out_dir).map_err(write_error(out_dir))?;

    let (vocabulary_path, shapes_path) = output_paths(out_dir, source, format);
    fs::write(&vocabulary_path, vocabulary).map_err(write_error(&vocabulary_path))?;
    debug!("Wrote {}", vocabulary_path.display());
    if let Err(e) = fs::write(&shapes_path, shapes) {
        if let Err(cleanup) = fs::remove_file(&vocabulary_path) {
            warn!(
                "Could not remove {} after a failed write: {}",
                vocabulary_path.display(),
                cleanup
            );
        }
        return Err(write_error(&shapes_path)(e));
    }
    debug!("Wrote {}", shapes_path.display());
    Ok((vocabulary_path, shapes_path))
}
