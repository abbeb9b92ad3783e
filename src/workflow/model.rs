//! Procedure Data Model
//!
//! A procedure is the fixed, ordered list of named steps that makes up a
//! release. Entry names are the resume targets accepted on the command
//! line, so they must be unique.

use std::fmt;

use crate::error::{ReleaseError, Result};
use crate::execution::step::Step;

/// A named step in a procedure.
pub struct ProcedureEntry {
    /// Unique name, used as a resume target
    pub name: String,

    /// The step run for this entry
    pub step: Box<dyn Step>,
}

impl ProcedureEntry {
    pub fn new(name: impl Into<String>, step: impl Step + 'static) -> Self {
        Self {
            name: name.into().trim().to_string(),
            step: Box::new(step),
        }
    }
}

impl fmt::Debug for ProcedureEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcedureEntry")
            .field("name", &self.name)
            .field("step", &self.step.describe())
            .finish()
    }
}

/// An ordered sequence of uniquely named steps.
#[derive(Debug, Default)]
pub struct Procedure {
    entries: Vec<ProcedureEntry>,
}

impl Procedure {
    /// Creates an empty procedure.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a step, rejecting a name that is already taken.
    pub fn push(&mut self, name: impl Into<String>, step: impl Step + 'static) -> Result<()> {
        self.push_entry(ProcedureEntry::new(name, step))
    }

    /// Appends a prepared entry, rejecting a name that is already taken.
    pub fn push_entry(&mut self, entry: ProcedureEntry) -> Result<()> {
        if self.contains(&entry.name) {
            return Err(ReleaseError::DuplicateStep(entry.name));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Builder form of [`Procedure::push`].
    pub fn with(mut self, name: impl Into<String>, step: impl Step + 'static) -> Result<Self> {
        self.push(name, step)?;
        Ok(self)
    }

    /// Returns true if an entry has the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Position of the entry with the given name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Entry names in order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Iterates over the entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ProcedureEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Procedure {
    type Item = &'a ProcedureEntry;
    type IntoIter = std::slice::Iter<'a, ProcedureEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
