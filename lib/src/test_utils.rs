//! Helpers shared by unit tests and the CLI integration tests.
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Creates a fresh directory under the system temp dir.
pub fn unique_temp_dir(prefix: &str) -> Result<PathBuf, Box<dyn Error>> {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let mut dir = std::env::temp_dir();
    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    dir.push(format!("{}_{}_{}_{}", prefix, std::process::id(), timestamp, n));
    fs::create_dir_all(&dir)?;
    Ok(dir)
}
