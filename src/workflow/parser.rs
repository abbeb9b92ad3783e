//! Procedure Parser
//!
//! Loads a procedure from a YAML file as an alternative to the built-in
//! release ritual.
//!
//! # Example YAML Format
//!
//! ```yaml
//! steps:
//!   - name: gittomaster
//!     kind: instruct
//!     notes:
//!       - say: Make sure you're on master and changes are merged in
//!       - run: git checkout master
//!
//!   - name: runtests
//!     kind: command
//!     command: make test
//!
//!   - name: ci
//!     kind: browse
//!     url: https://ci.example.org/builds
//!     say: Wait for CI to complete and verify that it succeeded
//!
//!   - name: bumpversion
//!     kind: bump-version
//! ```

use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{ReleaseError, Result};
use crate::execution::step::{BumpVersion, Instruct, Note, OpenBrowser, RunCommand};

use super::metadata::PackageMetadataResolver;
use super::model::{Procedure, ProcedureEntry};
use super::validator::validate_definitions;

/// Top-level shape of a procedure file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProcedureFile {
    #[serde(default)]
    pub steps: Vec<StepDefinition>,
}

/// One entry of a procedure file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StepDefinition {
    /// Unique name, used as a resume target
    pub name: String,

    /// What the step does
    #[serde(flatten)]
    pub kind: StepKind,
}

/// The step variants a procedure file can declare.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StepKind {
    /// Instructions and commands the operator carries out by hand
    Instruct {
        #[serde(default)]
        notes: Vec<Note>,
    },

    /// A command run after confirmation
    Command { command: String },

    /// A status page to open and check
    Browse {
        url: String,
        #[serde(default)]
        say: String,
    },

    /// Version file edit followed by a re-read of the version
    BumpVersion,
}

impl StepDefinition {
    /// Builds the procedure entry described by this definition.
    pub fn into_entry(self, resolver: &PackageMetadataResolver) -> ProcedureEntry {
        let name = self.name;
        match self.kind {
            StepKind::Instruct { notes } => ProcedureEntry::new(name, Instruct { notes }),
            StepKind::Command { command } => ProcedureEntry::new(name, RunCommand::new(command)),
            StepKind::Browse { url, say } => ProcedureEntry::new(name, OpenBrowser::new(url, say)),
            StepKind::BumpVersion => ProcedureEntry::new(name, BumpVersion::new(resolver.clone())),
        }
    }
}

/// Loads and validates a procedure from a YAML file.
///
/// # Example
///
/// ```rust,no_run
/// use releaserunner::config::RunConfig;
/// use releaserunner::workflow::{load_procedure, PackageMetadataResolver};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let resolver = PackageMetadataResolver::new(&RunConfig::default());
///     let procedure = load_procedure("release.yaml", &resolver)?;
///     println!("Loaded {} steps", procedure.len());
///     Ok(())
/// }
/// ```
pub fn load_procedure(
    path: impl AsRef<Path>,
    resolver: &PackageMetadataResolver,
) -> Result<Procedure> {
    let path = path.as_ref();
    info!("Loading procedure from: {}", path.display());

    let content = fs::read_to_string(path).map_err(|source| ReleaseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Procedure file loaded ({} bytes)", content.len());

    let file: ProcedureFile =
        serde_yaml::from_str(&content).map_err(|source| ReleaseError::ProcedureParse {
            path: path.to_path_buf(),
            source,
        })?;

    build_procedure(file, resolver)
}

/// Validates parsed definitions and turns them into a procedure.
pub fn build_procedure(file: ProcedureFile, resolver: &PackageMetadataResolver) -> Result<Procedure> {
    validate_definitions(&file.steps)?;

    let mut procedure = Procedure::new();
    for definition in file.steps {
        procedure.push_entry(definition.into_entry(resolver))?;
    }

    info!("Procedure loaded: {} steps", procedure.len());
    Ok(procedure)
}
