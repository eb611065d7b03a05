//! Environment abstraction for testability.
//!
//! Provides the [`Environment`] trait to abstract the little external I/O a
//! run needs (env vars and appending to the output file), enabling fully
//! sandboxed testing.

use std::{
    cell::RefCell,
    collections::HashMap,
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use crate::error::Result;

/// Abstracts all interaction with the operating system.
///
/// The real application uses [`RealEnvironment`]; tests inject
/// [`MockEnvironment`] so that nothing touches the real system.
pub trait Environment {
    /// Read an environment variable.
    fn var(&self, key: &str) -> Option<String>;

    /// Append `contents` to the file at `path`, creating it when missing.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or written.
    fn append_to_file(&self, path: &Path, contents: &str) -> Result<()>;

    /// Write a line to standard output.
    fn print_line(&self, line: &str);
}

// ---------------------------------------------------------------------------
// Real implementation (used in production)
// ---------------------------------------------------------------------------

/// Production [`Environment`] backed by the real OS.
pub struct RealEnvironment;

impl Environment for RealEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn append_to_file(&self, path: &Path, contents: &str) -> Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }

    fn print_line(&self, line: &str) {
        println!("{line}");
    }
}

// ---------------------------------------------------------------------------
// Mock implementation (used in tests — zero real I/O)
// ---------------------------------------------------------------------------

/// A fully in-memory [`Environment`] for sandboxed testing.
///
/// Every field is public so tests can construct scenarios declaratively.
#[derive(Debug, Clone, Default)]
pub struct MockEnvironment {
    pub env_vars: HashMap<String, String>,
    /// Virtual filesystem: path → file contents.
    pub files: RefCell<HashMap<PathBuf, String>>,
    /// Lines written to standard output.
    pub stdout: RefCell<Vec<String>>,
}

impl MockEnvironment {
    /// Build a mock environment from `(name, value)` pairs.
    #[must_use]
    pub fn with_vars(vars: &[(&str, &str)]) -> Self {
        Self {
            env_vars: vars
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            ..Default::default()
        }
    }

    /// Contents of a virtual file, if it was ever written.
    #[must_use]
    pub fn file(&self, path: &Path) -> Option<String> {
        self.files.borrow().get(path).cloned()
    }
}

impl Environment for MockEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        self.env_vars.get(key).cloned()
    }

    fn append_to_file(&self, path: &Path, contents: &str) -> Result<()> {
        self.files
            .borrow_mut()
            .entry(path.to_path_buf())
            .or_default()
            .push_str(contents);
        Ok(())
    }

    fn print_line(&self, line: &str) {
        self.stdout.borrow_mut().push(line.to_string());
    }
}
