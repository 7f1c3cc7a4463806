//! Converts JSON Schema documents into an RDFS vocabulary and a matching
//! SHACL shapes graph.
#![deny(clippy::all)]

// Publicly visible items
pub mod config;
pub mod error;
pub mod graph;
pub mod mapper;
pub mod namespace;
pub mod schema;
pub mod serialize;
pub mod types;

pub use config::{Config, ConfigBuilder};
pub use error::{ConfigError, FileError, MappingError, SerializationError, SourceError};
pub use mapper::MappedSchema;
pub use namespace::NamespaceContext;
pub use report::{BatchReport, FileOutcome, Written};
pub use schema::JsonSchemaDocument;

// Internal modules.
pub(crate) mod named_nodes;
pub mod report;
pub mod test_utils; // Often pub for integration tests

use log::{error, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A simple facade over the conversion pipeline.
///
/// Each source listed in the [`Config`] is loaded, mapped, rendered in the
/// configured format and written to the output directory. A failing file is
/// recorded in the [`BatchReport`] and the run moves on to the next one.
pub struct Converter {
    config: Config,
}

impl Converter {
    pub fn new(config: Config) -> Self {
        Converter { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Maps an already loaded document under the configured namespace.
    pub fn map_document(&self, document: &JsonSchemaDocument) -> Result<MappedSchema, MappingError> {
        mapper::map(
            document,
            self.config.namespace(),
            self.config.auto_resolve(),
        )
    }

    /// Renders both graphs, vocabulary first.
    pub fn render(&self, mapped: &MappedSchema) -> Result<(String, String), SerializationError> {
        let namespace = self.config.namespace();
        let format = self.config.format();
        Ok((
            serialize::serialize(&mapped.vocabulary, namespace, format)?,
            serialize::materialize(&mapped.shapes, namespace, format)?,
        ))
    }

    /// Converts one schema file and writes its two outputs.
    pub fn convert_file(&self, source: &Path) -> Result<Written, FileError> {
        let document = JsonSchemaDocument::load(source)?;
        let mapped = self.map_document(&document)?;
        let (vocabulary, shapes) = self.render(&mapped)?;
        let (vocabulary_path, shapes_path) = serialize::write_outputs(
            &self.config.out,
            source,
            &vocabulary,
            &shapes,
            self.config.format(),
        )?;
        Ok(Written {
            vocabulary: vocabulary_path,
            shapes: shapes_path,
            classes: mapped.classes.len(),
            properties: mapped.vocabulary.properties().len(),
        })
    }

    /// Converts every configured source in order. A source whose output
    /// names were already written by an earlier source fails instead of
    /// overwriting them.
    pub fn run(&self) -> BatchReport {
        let mut report = BatchReport::new();
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
        for source in self.config.sources() {
            info!("Converting {}", source.display());
            let (vocabulary, shapes) =
                serialize::output_paths(&self.config.out, source, self.config.format());
            let clash = [vocabulary, shapes]
                .into_iter()
                .find_map(|path| claimed.get(&path).map(|owner| (path, owner.clone())));
            let result = match clash {
                Some((path, claimed_by)) => Err(FileError::Serialization(
                    SerializationError::OutputClash { path, claimed_by },
                )),
                None => self.convert_file(source),
            };
            match &result {
                Ok(written) => {
                    info!(
                        "Wrote {} and {}",
                        written.vocabulary.display(),
                        written.shapes.display()
                    );
                    claimed.insert(written.vocabulary.clone(), source.clone());
                    claimed.insert(written.shapes.clone(), source.clone());
                }
                Err(e) => error!("Failed to convert {}: {}", source.display(), e),
            }
            report.push(source, result);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::unique_temp_dir;
    use oxigraph::io::RdfFormat;
    use std::error::Error;
    use std::fs;

    const PERSON: &str = r#"{
        "type": "object",
        "properties": {
            "name": {"type": "string"},
            "friend": {"type": "object", "properties": {"name": {"type": "string"}}}
        },
        "required": ["name"]
    }"#;

    const BROKEN: &str = r#"{
        "type": "object",
        "properties": {
            "friend": {"type": "object", "properties": {"x": {"description": "untyped"}}}
        }
    }"#;

    #[test]
    fn batch_continues_past_a_bad_file() -> Result<(), Box<dyn Error>> {
        let dir = unique_temp_dir("jscld_batch")?;
        let schemas = dir.join("schemas");
        fs::create_dir(&schemas)?;
        fs::write(schemas.join("broken.json"), BROKEN)?;
        fs::write(schemas.join("person.json"), PERSON)?;
        fs::write(schemas.join("truncated.json"), "{\"type\": ")?;
        let out = dir.join("out");

        let config = Config::builder("ex", "https://example.org/ns#")
            .source(&schemas)
            .out(&out)
            .build()?;
        let report = Converter::new(config).run();

        assert!(!report.is_success());
        assert_eq!(report.outcomes().len(), 3);
        let succeeded: Vec<_> = report.succeeded().collect();
        assert_eq!(succeeded.len(), 1);
        assert_eq!(succeeded[0].0, schemas.join("person.json"));
        assert_eq!(succeeded[0].1.classes, 2);
        assert_eq!(succeeded[0].1.properties, 2);

        let failed: Vec<_> = report.failed().collect();
        assert_eq!(failed.len(), 2);
        assert_eq!(failed[0].0, schemas.join("broken.json"));
        assert!(matches!(
            failed[0].1,
            FileError::Mapping(MappingError::MissingType { path }) if path == "broken.friend.x"
        ));
        assert!(matches!(failed[1].1, FileError::Parse { .. }));

        assert!(out.join("person.ttl").is_file());
        assert!(out.join("person_shacl.ttl").is_file());
        assert!(!out.join("broken.ttl").exists());

        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn output_names_are_never_written_twice() -> Result<(), Box<dyn Error>> {
        let dir = unique_temp_dir("jscld_clash")?;
        let schemas = dir.join("schemas");
        fs::create_dir(&schemas)?;
        fs::write(schemas.join("person.json"), PERSON)?;
        fs::write(
            schemas.join("person_shacl.json"),
            r#"{"title": "Other", "type": "object", "properties": {"x": {"type": "integer"}}}"#,
        )?;
        let out = dir.join("out");

        let config = Config::builder("ex", "https://example.org/ns#")
            .source(&schemas)
            .out(&out)
            .build()?;
        let report = Converter::new(config).run();

        let failed: Vec<_> = report.failed().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0, schemas.join("person_shacl.json"));
        assert!(matches!(
            failed[0].1,
            FileError::Serialization(SerializationError::OutputClash { path, claimed_by })
                if *path == out.join("person_shacl.ttl") && *claimed_by == schemas.join("person.json")
        ));
        let shapes = fs::read_to_string(out.join("person_shacl.ttl"))?;
        assert!(shapes.contains("ex:personShape"));
        assert!(!shapes.contains("ex:OtherShape"));

        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn configured_format_sets_extension() -> Result<(), Box<dyn Error>> {
        let dir = unique_temp_dir("jscld_format")?;
        let schema = dir.join("person.json");
        fs::write(&schema, PERSON)?;
        let out = dir.join("out");

        let config = Config::builder("ex", "https://example.org/ns#")
            .source(&schema)
            .out(&out)
            .format(RdfFormat::NTriples)
            .build()?;
        let converter = Converter::new(config);
        let written = converter.convert_file(&schema)?;
        assert_eq!(written.vocabulary, out.join("person.nt"));
        assert_eq!(written.shapes, out.join("person_shacl.nt"));

        let first = fs::read_to_string(&written.shapes)?;
        converter.convert_file(&schema)?;
        assert_eq!(fs::read_to_string(&written.shapes)?, first);

        fs::remove_dir_all(&dir)?;
        Ok(())
    }
}
