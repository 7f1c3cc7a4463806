//! Run configuration and discovery of the JSON Schema files to convert.
use crate::error::{ConfigError, SourceError};
use crate::namespace::NamespaceContext;
use log::{debug, info};
use oxigraph::io::RdfFormat;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Output directory used when neither the CLI nor the config file sets one.
pub const DEFAULT_OUT: &str = "out";

/// The JSON configuration file passed with `--config`.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub prefix: Option<String>,
    pub uri: Option<String>,
    pub out: Option<PathBuf>,
    pub format: Option<String>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::ConfigFileNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::ConfigFileRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::ConfigFileParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Validated parameters for one run. Only `out` may change after construction.
#[derive(Debug, Clone)]
pub struct Config {
    namespace: NamespaceContext,
    sources: Vec<PathBuf>,
    pub out: PathBuf,
    format: RdfFormat,
    auto: bool,
}

impl Config {
    /// Merges a config file with the CLI arguments.
    ///
    /// `out` and `format` given on the command line win over the file; the
    /// file wins over the defaults.
    pub fn from_file(
        config_path: &Path,
        source: &Path,
        out: Option<PathBuf>,
        format: Option<RdfFormat>,
    ) -> Result<Self, ConfigError> {
        let file = ConfigFile::load(config_path)?;
        debug!("Loaded configuration file {}", config_path.display());

        let mut builder = ConfigBuilder::new(
            file.prefix.unwrap_or_default(),
            file.uri.unwrap_or_default(),
        )
        .source(source);
        if let Some(out) = out.or(file.out) {
            builder = builder.out(out);
        }
        match (format, file.format) {
            (Some(format), _) => builder = builder.format(format),
            (None, Some(name)) => {
                let format =
                    parse_format(&name).ok_or_else(|| ConfigError::UnknownFormat(name.clone()))?;
                builder = builder.format(format);
            }
            (None, None) => {}
        }
        builder.build()
    }

    pub fn builder(prefix: impl Into<String>, uri: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder::new(prefix, uri)
    }

    pub fn namespace(&self) -> &NamespaceContext {
        &self.namespace
    }

    pub fn prefix(&self) -> &str {
        self.namespace.prefix()
    }

    pub fn uri(&self) -> &str {
        self.namespace.uri()
    }

    /// Schema files to convert, in processing order.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn format(&self) -> RdfFormat {
        self.format
    }

    /// Whether object-valued properties are linked to the class they reference.
    pub fn auto_resolve(&self) -> bool {
        self.auto
    }
}

/// Builds a [`Config`] without a configuration file.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    prefix: String,
    uri: String,
    sources: Vec<PathBuf>,
    out: PathBuf,
    format: RdfFormat,
    auto: bool,
}

impl ConfigBuilder {
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        ConfigBuilder {
            prefix: prefix.into(),
            uri: uri.into(),
            sources: Vec::new(),
            out: PathBuf::from(DEFAULT_OUT),
            format: RdfFormat::Turtle,
            auto: true,
        }
    }

    /// Adds a schema file or a directory of schema files.
    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(path.into());
        self
    }

    pub fn out(mut self, out: impl Into<PathBuf>) -> Self {
        self.out = out.into();
        self
    }

    pub fn format(mut self, format: RdfFormat) -> Self {
        self.format = format;
        self
    }

    pub fn auto_resolve(mut self, auto: bool) -> Self {
        self.auto = auto;
        self
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        let namespace = NamespaceContext::new(&self.prefix, &self.uri)?;

        let mut seen = HashSet::new();
        let mut sources = Vec::new();
        for source in &self.sources {
            for file in resolve_sources(source)? {
                if seen.insert(file.clone()) {
                    sources.push(file);
                }
            }
        }
        if sources.is_empty() {
            return Err(SourceError::NoSourceConfigured.into());
        }
        info!(
            "Namespace {}: <{}>, {} schema file(s), output to {}",
            namespace.prefix(),
            namespace.uri(),
            sources.len(),
            self.out.display()
        );

        Ok(Config {
            namespace,
            sources,
            out: self.out,
            format: self.format,
            auto: self.auto,
        })
    }
}

/// Lists the JSON Schema files designated by `path`.
///
/// A file is returned as is. For a directory, every direct child whose name
/// ends in `.json` but not in `config.json` is returned, sorted by name.
/// Subdirectories are not searched.
pub fn resolve_sources(path: &Path) -> Result<Vec<PathBuf>, SourceError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(SourceError::NotFound(path.to_path_buf()));
    }

    let io_error = |source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut entries = fs::read_dir(path)
        .map_err(io_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_error)?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut sources = Vec::new();
    for entry in entries {
        let child = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if child.is_dir() {
            info!(
                "Skipping directory {}: only .json files directly inside --source are converted",
                child.display()
            );
        } else if !name.ends_with(".json") {
            info!("Skipping {}: not a .json file", child.display());
        } else if name.ends_with("config.json") {
            debug!("Skipping configuration file {}", child.display());
        } else {
            sources.push(child);
        }
    }

    if sources.is_empty() {
        return Err(SourceError::NoSchemaFiles(path.to_path_buf()));
    }
    Ok(sources)
}

/// Looks up a serialization format by name or by file extension.
pub fn parse_format(name: &str) -> Option<RdfFormat> {
    match name.trim().to_ascii_lowercase().as_str() {
        "turtle" | "ttl" => Some(RdfFormat::Turtle),
        "n-triples" | "ntriples" | "nt" => Some(RdfFormat::NTriples),
        "n-quads" | "nquads" | "nq" => Some(RdfFormat::NQuads),
        "trig" => Some(RdfFormat::TriG),
        "n3" => Some(RdfFormat::N3),
        "rdf/xml" | "rdfxml" | "rdf" | "xml" => Some(RdfFormat::RdfXml),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::unique_temp_dir;
    use std::error::Error;

    #[test]
    fn directory_listing_skips_config_and_non_json() -> Result<(), Box<dyn Error>> {
        let dir = unique_temp_dir("jscld_resolve")?;
        for name in ["b.json", "a.json", "b.config.json", "notes.txt"] {
            fs::write(dir.join(name), "{}")?;
        }
        fs::create_dir(dir.join("nested"))?;
        fs::write(dir.join("nested").join("c.json"), "{}")?;

        let sources = resolve_sources(&dir)?;
        assert_eq!(sources, vec![dir.join("a.json"), dir.join("b.json")]);

        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn single_file_resolves_to_itself() -> Result<(), Box<dyn Error>> {
        let dir = unique_temp_dir("jscld_single")?;
        let file = dir.join("person.json");
        fs::write(&file, "{}")?;

        assert_eq!(resolve_sources(&file)?, vec![file.clone()]);

        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn empty_directory_has_no_schema_files() -> Result<(), Box<dyn Error>> {
        let dir = unique_temp_dir("jscld_empty")?;
        assert!(matches!(
            resolve_sources(&dir),
            Err(SourceError::NoSchemaFiles(_))
        ));
        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn builder_without_source_fails() {
        let result = Config::builder("ex", "https://example.org/").build();
        assert!(matches!(
            result,
            Err(ConfigError::Source(SourceError::NoSourceConfigured))
        ));
        if let Err(e) = result {
            assert_eq!(e.to_string(), "no schema source was configured");
        }
    }

    #[test]
    fn missing_source_is_not_found() {
        let missing = std::env::temp_dir().join("jscld_definitely_missing_source");
        assert!(matches!(
            resolve_sources(&missing),
            Err(SourceError::NotFound(_))
        ));
    }

    #[test]
    fn config_file_merges_with_cli() -> Result<(), Box<dyn Error>> {
        let dir = unique_temp_dir("jscld_config")?;
        let schema = dir.join("person.json");
        fs::write(&schema, "{}")?;
        let config_path = dir.join("jscld.config.json");
        fs::write(
            &config_path,
            r#"{"prefix": "ex", "uri": "https://example.org/", "out": "from-file", "format": "N-Triples"}"#,
        )?;

        let config = Config::from_file(&config_path, &schema, None, None)?;
        assert_eq!(config.prefix(), "ex");
        assert_eq!(config.uri(), "https://example.org/");
        assert_eq!(config.out, PathBuf::from("from-file"));
        assert_eq!(config.format(), RdfFormat::NTriples);
        assert!(config.auto_resolve());
        assert_eq!(config.sources(), &[schema.clone()]);

        let config = Config::from_file(
            &config_path,
            &schema,
            Some(PathBuf::from("from-cli")),
            Some(RdfFormat::Turtle),
        )?;
        assert_eq!(config.out, PathBuf::from("from-cli"));
        assert_eq!(config.format(), RdfFormat::Turtle);

        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn config_file_errors_are_fatal() -> Result<(), Box<dyn Error>> {
        let dir = unique_temp_dir("jscld_config_errors")?;
        let schema = dir.join("person.json");
        fs::write(&schema, "{}")?;

        assert!(matches!(
            Config::from_file(&dir.join("missing.json"), &schema, None, None),
            Err(ConfigError::ConfigFileNotFound(_))
        ));

        let config_path = dir.join("config.json");
        fs::write(&config_path, r#"{"prefix": "ex ns", "uri": "https://example.org/"}"#)?;
        assert!(matches!(
            Config::from_file(&config_path, &schema, None, None),
            Err(ConfigError::InvalidPrefix(_))
        ));

        fs::write(&config_path, r#"{"prefix": "ex"}"#)?;
        assert!(matches!(
            Config::from_file(&config_path, &schema, None, None),
            Err(ConfigError::MissingUri)
        ));

        fs::write(
            &config_path,
            r#"{"prefix": "ex", "uri": "https://example.org/", "format": "yaml"}"#,
        )?;
        assert!(matches!(
            Config::from_file(&config_path, &schema, None, None),
            Err(ConfigError::UnknownFormat(_))
        ));

        fs::write(&config_path, "not json")?;
        assert!(matches!(
            Config::from_file(&config_path, &schema, None, None),
            Err(ConfigError::ConfigFileParse { .. })
        ));

        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn builder_deduplicates_sources() -> Result<(), Box<dyn Error>> {
        let dir = unique_temp_dir("jscld_dedup")?;
        fs::write(dir.join("a.json"), "{}")?;
        fs::write(dir.join("b.json"), "{}")?;

        let config = Config::builder("ex", "http://example.org/")
            .source(dir.join("b.json"))
            .source(&dir)
            .auto_resolve(false)
            .build()?;
        assert_eq!(
            config.sources(),
            &[dir.join("b.json"), dir.join("a.json")]
        );
        assert!(!config.auto_resolve());
        assert_eq!(config.out, PathBuf::from(DEFAULT_OUT));

        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn format_names() {
        assert_eq!(parse_format("Turtle"), Some(RdfFormat::Turtle));
        assert_eq!(parse_format("ttl"), Some(RdfFormat::Turtle));
        assert_eq!(parse_format("N-Triples"), Some(RdfFormat::NTriples));
        assert_eq!(parse_format("RDF/XML"), Some(RdfFormat::RdfXml));
        assert_eq!(parse_format("json"), None);
    }
}
