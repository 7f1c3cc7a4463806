use crate::error::FileError;
use log::{error, info};
use std::path::{Path, PathBuf};

/// Files written for one successfully converted source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    pub vocabulary: PathBuf,
    pub shapes: PathBuf,
    pub classes: usize,
    pub properties: usize,
}

/// Result of converting a single source file.
#[derive(Debug)]
pub struct FileOutcome {
    pub source: PathBuf,
    pub result: Result<Written, FileError>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-file outcomes of a run, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: &Path, result: Result<Written, FileError>) {
        self.outcomes.push(FileOutcome {
            source: source.to_path_buf(),
            result,
        });
    }

    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    pub fn succeeded(&self) -> impl Iterator<Item = (&Path, &Written)> {
        self.outcomes.iter().filter_map(|o| match &o.result {
            Ok(written) => Some((o.source.as_path(), written)),
            Err(_) => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&Path, &FileError)> {
        self.outcomes.iter().filter_map(|o| match &o.result {
            Ok(_) => None,
            Err(e) => Some((o.source.as_path(), e)),
        })
    }

    /// True when every source converted, including the empty batch.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(FileOutcome::is_success)
    }

    pub fn log_summary(&self) {
        for (source, e) in self.failed() {
            error!("{}: {}", source.display(), e);
        }
        info!(
            "Converted {} of {} schema file(s)",
            self.succeeded().count(),
            self.outcomes.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MappingError;

    #[test]
    fn failures_are_kept_apart_from_successes() {
        let mut report = BatchReport::new();
        assert!(report.is_success());

        report.push(
            Path::new("a.json"),
            Ok(Written {
                vocabulary: PathBuf::from("out/a.ttl"),
                shapes: PathBuf::from("out/a_shacl.ttl"),
                classes: 1,
                properties: 2,
            }),
        );
        assert!(report.is_success());

        report.push(
            Path::new("b.json"),
            Err(MappingError::MissingType {
                path: "B.x".to_string(),
            }
            .into()),
        );
        assert!(!report.is_success());
        assert_eq!(report.outcomes().len(), 2);

        let succeeded: Vec<&Path> = report.succeeded().map(|(p, _)| p).collect();
        assert_eq!(succeeded, vec![Path::new("a.json")]);
        let failed: Vec<String> = report.failed().map(|(_, e)| e.to_string()).collect();
        assert_eq!(failed, vec!["B.x: missing type keyword".to_string()]);
    }
}
