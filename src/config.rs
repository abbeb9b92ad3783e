//! Run Configuration
//!
//! Settings that shape one release run: where the package metadata lives,
//! which status pages the browser steps open, whether failing commands
//! abort the run, and an optional procedure file replacing the built-in
//! ritual.

use std::path::PathBuf;

/// Default package-descriptor file.
pub const DEFAULT_DESCRIPTOR: &str = "setup.py";

/// Default version-declaration file, relative to the project root.
/// `{pkgname}` is replaced with the lower-cased package name.
pub const DEFAULT_VERSION_FILE: &str = "{pkgname}/__version__.py";

/// Default CI status page opened after each push.
pub const DEFAULT_CI_URL: &str = "https://travis-ci.org/alan-turing-institute/CleverCSV";

/// Default documentation build page.
pub const DEFAULT_DOCS_URL: &str = "https://readthedocs.org/projects/clevercsv/builds/";

/// Settings for a single release run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Project root; descriptor and version file are resolved against it
    pub root: PathBuf,

    /// Package-descriptor file holding the `NAME = "..."` line
    pub descriptor: PathBuf,

    /// Version-declaration file template
    pub version_file: String,

    /// CI status page
    pub ci_url: String,

    /// Documentation build page
    pub docs_url: String,

    /// Abort when an automated command exits non-zero
    pub strict: bool,

    /// Optional YAML procedure replacing the built-in ritual
    pub procedure_file: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            descriptor: PathBuf::from(DEFAULT_DESCRIPTOR),
            version_file: DEFAULT_VERSION_FILE.to_string(),
            ci_url: DEFAULT_CI_URL.to_string(),
            docs_url: DEFAULT_DOCS_URL.to_string(),
            strict: false,
            procedure_file: None,
        }
    }
}

impl RunConfig {
    /// Creates a configuration rooted at the given project directory.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Returns the descriptor path resolved against the project root.
    pub fn descriptor_path(&self) -> PathBuf {
        self.root.join(&self.descriptor)
    }
}
