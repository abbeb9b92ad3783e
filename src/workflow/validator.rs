//! Procedure Validation
//!
//! Checks a parsed procedure file before any step is built:
//! - Names present, unique, and usable as a command-line argument
//! - Commands and URLs present where the step kind needs them
//! - Instruction steps that actually instruct

use std::collections::HashSet;

use log::{debug, info, warn};

use crate::error::{ReleaseError, Result};

use super::parser::{StepDefinition, StepKind};

/// Validation error types for user-friendly error messages.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyStepName,
    WhitespaceInName(String),
    DuplicateStepName(String),
    EmptyCommand(String),
    EmptyUrl(String),
    NoNotes(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyStepName => write!(f, "Step has empty or whitespace-only name"),
            Self::WhitespaceInName(name) => {
                write!(f, "Step name '{}' contains whitespace and cannot be used as a resume target", name)
            }
            Self::DuplicateStepName(name) => write!(f, "Duplicate step name: '{}'", name),
            Self::EmptyCommand(name) => write!(f, "Step '{}' has no command specified", name),
            Self::EmptyUrl(name) => write!(f, "Step '{}' has no URL specified", name),
            Self::NoNotes(name) => write!(f, "Step '{}' has no instructions", name),
        }
    }
}

/// Validates a single definition's fields.
fn validate_definition(definition: &StepDefinition) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let name = definition.name.trim();

    if name.is_empty() {
        errors.push(ValidationError::EmptyStepName);
        return errors;
    }

    if name.chars().any(char::is_whitespace) {
        errors.push(ValidationError::WhitespaceInName(name.to_string()));
    }

    match &definition.kind {
        StepKind::Instruct { notes } if notes.is_empty() => {
            errors.push(ValidationError::NoNotes(name.to_string()));
        }
        StepKind::Command { command } if command.trim().is_empty() => {
            errors.push(ValidationError::EmptyCommand(name.to_string()));
        }
        StepKind::Browse { url, say } => {
            if url.trim().is_empty() {
                errors.push(ValidationError::EmptyUrl(name.to_string()));
            }
            if say.trim().is_empty() {
                debug!("Step '{}' opens a page without instructions", name);
            }
        }
        _ => {}
    }

    errors
}

/// Validates every definition and reports all problems at once.
///
/// An empty list is accepted with a warning: running it only prints the
/// completion message.
pub fn validate_definitions(definitions: &[StepDefinition]) -> Result<()> {
    if definitions.is_empty() {
        warn!("Procedure has no steps");
        return Ok(());
    }

    let mut all_errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for definition in definitions {
        all_errors.extend(validate_definition(definition));

        let name = definition.name.trim();
        if !name.is_empty() && !seen.insert(name) {
            all_errors.push(ValidationError::DuplicateStepName(name.to_string()));
        }
    }

    if !all_errors.is_empty() {
        let messages: Vec<String> = all_errors.iter().map(|e| e.to_string()).collect();
        return Err(ReleaseError::InvalidProcedure(messages.join("\n")));
    }

    info!("Procedure validated: {} steps", definitions.len());
    Ok(())
}
