//! Release Steps
//!
//! A step is one operator-supervised unit of the release procedure with a
//! three-phase lifecycle run against the shared [`Context`]:
//!
//! 1. `pre` - setup, a no-op unless overridden
//! 2. `action` - the step's visible effect (required)
//! 3. `post` - by default, wait for the operator to press Enter
//!
//! [`Step::run`] chains the phases and turns an operator interrupt in any of
//! them into [`ReleaseError::Aborted`] after printing a notice. Every other
//! error passes through untouched.
//!
//! Text fields of the concrete steps may contain `{key}` placeholders; they
//! are rendered from the context when the action runs, so a version bumped
//! earlier in the run shows up in later messages.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{ReleaseError, Result};
use crate::workflow::context::{Context, VERSION};
use crate::workflow::metadata::PackageMetadataResolver;

use super::operator::{do_cmd, instruct, print_cmd, print_run, Operator, Tone};

/// One unit of the release procedure.
pub trait Step {
    /// One-line summary used when listing a procedure.
    fn describe(&self) -> String;

    /// Runs before the action. No-op by default.
    fn pre(&self, _context: &mut Context, _operator: &mut dyn Operator) -> Result<()> {
        Ok(())
    }

    /// Performs the step's visible effect.
    fn action(&self, context: &mut Context, operator: &mut dyn Operator) -> Result<()>;

    /// Runs after the action. Waits for confirmation by default.
    fn post(&self, _context: &mut Context, operator: &mut dyn Operator) -> Result<()> {
        operator.confirm()
    }

    /// Runs the full lifecycle.
    fn run(&self, context: &mut Context, operator: &mut dyn Operator) -> Result<()> {
        let result = self
            .pre(context, operator)
            .and_then(|()| self.action(context, operator))
            .and_then(|()| self.post(context, operator));

        match result {
            Err(ReleaseError::Interrupted) => {
                operator.show(Tone::Alert, "\nInterrupted.");
                Err(ReleaseError::Aborted)
            }
            other => other,
        }
    }
}

/// One line of a manual instruction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Note {
    /// Text telling the operator what to do
    Say(String),
    /// A command the operator runs by hand
    Run(String),
}

/// Prints instructions and commands for the operator to carry out by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruct {
    pub notes: Vec<Note>,
}

impl Instruct {
    pub fn new() -> Self {
        Self { notes: Vec::new() }
    }

    /// Adds an instruction line.
    pub fn say(mut self, text: impl Into<String>) -> Self {
        self.notes.push(Note::Say(text.into()));
        self
    }

    /// Adds a command line.
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.notes.push(Note::Run(command.into()));
        self
    }
}

impl Default for Instruct {
    fn default() -> Self {
        Self::new()
    }
}

impl Step for Instruct {
    fn describe(&self) -> String {
        let first = self.notes.first().map(|note| match note {
            Note::Say(text) => text.clone(),
            Note::Run(command) => format!("run `{}`", command),
        });
        first.unwrap_or_else(|| "(no instructions)".to_string())
    }

    fn action(&self, context: &mut Context, operator: &mut dyn Operator) -> Result<()> {
        let mut previous_was_command = false;
        for note in &self.notes {
            match note {
                Note::Say(text) => {
                    instruct(operator, &context.render(text));
                    previous_was_command = false;
                }
                Note::Run(command) if previous_was_command => {
                    print_cmd(operator, &context.render(command));
                }
                Note::Run(command) => {
                    print_run(operator, &context.render(command));
                    previous_was_command = true;
                }
            }
        }
        Ok(())
    }
}

/// Runs a shell command after explicit confirmation.
///
/// The exit status is reported but does not stop the procedure unless the
/// context is strict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCommand {
    pub command: String,
}

impl RunCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Step for RunCommand {
    fn describe(&self) -> String {
        format!("execute `{}`", self.command)
    }

    fn action(&self, context: &mut Context, operator: &mut dyn Operator) -> Result<()> {
        let command = context.render(&self.command);
        let outcome = do_cmd(operator, &command)?;

        if !outcome.success() {
            if context.is_strict() {
                return Err(ReleaseError::CommandFailed {
                    command,
                    code: outcome.code,
                });
            }
            warn!(
                "'{}' exited with status {:?}; continuing (use --strict to stop on failures)",
                command, outcome.code
            );
        }
        Ok(())
    }
}

/// Opens a status page and asks the operator to check it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenBrowser {
    pub url: String,
    pub instruction: String,
}

impl OpenBrowser {
    pub fn new(url: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            instruction: instruction.into(),
        }
    }
}

impl Step for OpenBrowser {
    fn describe(&self) -> String {
        format!("open {}", self.url)
    }

    fn action(&self, context: &mut Context, operator: &mut dyn Operator) -> Result<()> {
        operator.open_url(&context.render(&self.url))?;
        instruct(operator, &context.render(&self.instruction));
        Ok(())
    }
}

/// Has the operator edit the version file, then re-reads the version.
#[derive(Debug, Clone)]
pub struct BumpVersion {
    resolver: PackageMetadataResolver,
}

impl BumpVersion {
    pub fn new(resolver: PackageMetadataResolver) -> Self {
        Self { resolver }
    }
}

impl Step for BumpVersion {
    fn describe(&self) -> String {
        "update the version file and re-read the version".to_string()
    }

    fn action(&self, context: &mut Context, operator: &mut dyn Operator) -> Result<()> {
        let file = self.resolver.relative_version_file(context.pkgname());
        instruct(operator, &format!("Update {} with new version", file));
        print_run(operator, &format!("vi {}", file));
        Ok(())
    }

    fn post(&self, context: &mut Context, operator: &mut dyn Operator) -> Result<()> {
        operator.confirm()?;

        let previous = context.version().to_string();
        let version = self.resolver.version(context.pkgname())?;
        if version == previous {
            warn!("Version is still {}", version);
        } else {
            info!("Version bumped: {} -> {}", previous, version);
        }
        context.set(VERSION, version);
        Ok(())
    }
}
