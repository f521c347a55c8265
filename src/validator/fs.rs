//! File access used by the legacy validator
//!
//! Architectural Principle: Ports and Adapters - rule evaluation only sees the ProjectFs port
//! - DiskFs is the production adapter over std::fs
//! - Tests plug in an in-memory adapter to observe exactly which files were read

use crate::domain::violations::{PreflightError, PreflightResult};
use std::fs;
use std::io;
use std::path::Path;

/// `.babelrc` shipped with the CLI, written over projects still using `"transform-runtime"`
pub const BUNDLED_BABELRC: &str = include_str!("../../templates/app/babelrc");

/// Minimal file-system surface needed to validate a project
pub trait ProjectFs {
    fn exists(&self, path: &Path) -> bool;
    /// Invalid UTF-8 is replaced rather than rejected; markers are plain ASCII
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// Project files on the local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

impl ProjectFs for DiskFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }
}

impl<T: ProjectFs + ?Sized> ProjectFs for &T {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        (**self).write(path, contents)
    }
}

/// Load the `.babelrc` template, preferring an override from the CLI installation
pub fn load_babelrc_template(override_path: Option<&Path>) -> PreflightResult<String> {
    match override_path {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            PreflightError::template(format!(
                "Failed to read .babelrc template '{}': {}",
                path.display(),
                e
            ))
        }),
        None => Ok(BUNDLED_BABELRC.to_string()),
    }
}
