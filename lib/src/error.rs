//! Error kinds for configuration, mapping and serialization.
//!
//! Configuration errors are fatal for a run. Everything else is scoped to a
//! single source file and ends up in the [`BatchReport`](crate::BatchReport).
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn the `--source` argument into a list of schema files.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source {} neither points to a directory nor to a file", .0.display())]
    NotFound(PathBuf),
    #[error("no JSON Schema files can be found in {}", .0.display())]
    NoSchemaFiles(PathBuf),
    #[error("no schema source was configured")]
    NoSourceConfigured,
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Fatal configuration problem, detected before any mapping starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("prefix argument required")]
    MissingPrefix,
    #[error("invalid namespace prefix {0:?}")]
    InvalidPrefix(String),
    #[error("namespace prefix {0:?} is reserved for a built-in vocabulary")]
    ReservedPrefix(String),
    #[error("namespace prefix {0:?} must start with a letter to be declared in Turtle")]
    UnserializablePrefix(String),
    #[error("namespace URI argument required")]
    MissingUri,
    #[error("invalid namespace URI {0:?}")]
    InvalidUri(String),
    #[error("can not locate configuration file at {}", .0.display())]
    ConfigFileNotFound(PathBuf),
    #[error("failed to read configuration file {}: {source}", path.display())]
    ConfigFileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse configuration file {}: {source}", path.display())]
    ConfigFileParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown serialization format {0:?}")]
    UnknownFormat(String),
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// A schema document that cannot be mapped. `path` is the dotted property
/// path of the offending node, e.g. `Person.friend.name`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("{path}: the root schema must be an object type")]
    RootNotObject { path: String },
    #[error("{path}: missing type keyword")]
    MissingType { path: String },
    #[error("{path}: unsupported type {kind:?}")]
    UnsupportedType { path: String, kind: String },
    #[error("{path}: union of types {kinds:?} can not be mapped")]
    UnionType { path: String, kinds: Vec<String> },
    #[error("{path}: array has no items schema")]
    MissingItems { path: String },
    #[error("{path}: can not resolve reference {reference:?}")]
    UnresolvableReference { path: String, reference: String },
    #[error("{path}: reference {reference:?} loops without reaching a schema")]
    ReferenceCycle { path: String, reference: String },
    #[error("{path}: keyword {keyword:?} has an invalid value")]
    InvalidKeyword { path: String, keyword: String },
    #[error("{path}: invalid IRI {iri:?}")]
    InvalidIri { path: String, iri: String },
}

/// Failure to render a graph or to write it to disk.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("invalid IRI for prefix {prefix}: {iri}")]
    Prefix { prefix: String, iri: String },
    #[error("failed to render graph: {0}")]
    Render(#[source] io::Error),
    #[error("rendered graph is not valid UTF-8")]
    Encoding,
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} was already written for {} in this run", path.display(), claimed_by.display())]
    OutputClash { path: PathBuf, claimed_by: PathBuf },
}

/// Everything that can go wrong while converting one source file.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {} as JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error(transparent)]
    Serialization(#[from] SerializationError),
}
