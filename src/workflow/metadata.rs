//! Package Metadata Resolution
//!
//! Reads the package name and current version from the project files so the
//! run context can be seeded before the first step.
//!
//! The package name comes from the first `NAME = "..."` line of the package
//! descriptor (`setup.py` by default). The version comes from a
//! `__version__ = "..."` line in the version-declaration file.
//!
//! The version file is read as text and never evaluated. Computed versions
//! (string concatenation, imports) resolve as not found.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::RunConfig;
use crate::error::{ReleaseError, Result};

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^NAME\s*=\s*["']([^"'\r\n]+)["']\s*(?:#.*)?$"#).expect("valid NAME pattern")
});

static VERSION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^__version__\s*=\s*["']([^"'\r\n]+)["']\s*(?:#.*)?$"#).expect("valid version pattern")
});

/// Package name and version read from the project files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    pub pkgname: String,
    pub version: String,
}

/// Locates and reads package metadata from the local filesystem.
#[derive(Debug, Clone)]
pub struct PackageMetadataResolver {
    root: PathBuf,
    descriptor: PathBuf,
    version_template: String,
}

impl PackageMetadataResolver {
    /// Creates a resolver for the files named in the run configuration.
    pub fn new(config: &RunConfig) -> Self {
        Self {
            root: config.root.clone(),
            descriptor: config.descriptor.clone(),
            version_template: config.version_file.clone(),
        }
    }

    /// Reads both the package name and the version.
    pub fn resolve(&self) -> Result<PackageMetadata> {
        let pkgname = self.package_name()?;
        let version = self.version(&pkgname)?;
        debug!("Resolved package metadata: {} {}", pkgname, version);
        Ok(PackageMetadata { pkgname, version })
    }

    /// Reads the package name from the descriptor file.
    pub fn package_name(&self) -> Result<String> {
        let path = self.root.join(&self.descriptor);
        let content = read(&path)?;
        extract(&NAME_PATTERN, &content, false).ok_or_else(|| ReleaseError::MetadataNotFound {
            what: "a NAME = \"...\" declaration".to_string(),
            path,
        })
    }

    /// Reads the current version from the package's version file.
    ///
    /// When the file assigns `__version__` more than once, the last
    /// assignment wins, as it would if the file were evaluated.
    pub fn version(&self, pkgname: &str) -> Result<String> {
        let path = self.version_file(pkgname);
        let content = read(&path)?;
        extract(&VERSION_PATTERN, &content, true).ok_or_else(|| ReleaseError::MetadataNotFound {
            what: "a __version__ declaration".to_string(),
            path,
        })
    }

    /// Path of the version file for a package, relative to the project root.
    pub fn relative_version_file(&self, pkgname: &str) -> String {
        self.version_template
            .replace("{pkgname}", &pkgname.to_lowercase())
    }

    /// Path of the version file for a package.
    pub fn version_file(&self, pkgname: &str) -> PathBuf {
        self.root.join(self.relative_version_file(pkgname))
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| ReleaseError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn extract(pattern: &Regex, content: &str, last: bool) -> Option<String> {
    let mut values = pattern
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string());

    if last {
        values.last()
    } else {
        values.next()
    }
}
