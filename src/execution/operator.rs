//! Operator Interaction
//!
//! Steps never talk to the terminal directly. They go through an
//! [`Operator`], which shows text, waits for confirmation, spawns commands
//! and opens URLs. The interactive implementation lives in
//! [`console`](super::console); tests use [`ScriptedOperator`].
//!
//! The helper functions here ([`instruct`], [`print_run`], [`print_cmd`],
//! [`do_cmd`]) are the message vocabulary every step is written in.

use std::collections::VecDeque;

use colored::{ColoredString, Colorize};
use log::debug;

use crate::error::{ReleaseError, Result};

/// Presentation class of a line of operator-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Something the operator has to do
    Instruction,
    /// The `Run:` header before manual commands
    Heading,
    /// A literal command, printed indented
    Command,
    /// Announcement of a command about to be executed
    Pending,
    /// Confirmation prompt
    Prompt,
    /// Cancellation notice
    Alert,
    /// Completion signal
    Success,
    /// Uncoloured output (summaries, URLs)
    Plain,
}

impl Tone {
    /// Applies the tone's colour and emphasis to a message.
    pub fn paint(self, text: &str) -> ColoredString {
        match self {
            Tone::Instruction => text.green(),
            Tone::Heading | Tone::Command => text.cyan().bold(),
            Tone::Pending => text.magenta().bold(),
            Tone::Prompt => text.dimmed(),
            Tone::Alert => text.red(),
            Tone::Success => text.yellow().bold(),
            Tone::Plain => text.normal(),
        }
    }
}

/// Result of an automated command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Exit code, or `None` when the process was killed by a signal
    pub code: Option<i32>,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// The human supervising a release, as seen by the steps.
pub trait Operator {
    /// Shows one line of text.
    fn show(&mut self, tone: Tone, text: &str);

    /// Blocks until the operator confirms.
    ///
    /// Returns [`ReleaseError::Interrupted`] when the operator interrupts
    /// the wait instead.
    fn confirm(&mut self) -> Result<()>;

    /// Runs a shell command to completion with inherited stdio.
    fn run_command(&mut self, command: &str) -> Result<CommandOutcome>;

    /// Opens a URL in the operator's browser.
    fn open_url(&mut self, url: &str) -> Result<()>;
}

/// Tells the operator what to do.
pub fn instruct(operator: &mut dyn Operator, message: &str) {
    operator.show(Tone::Instruction, message);
}

/// Prints a command for the operator to run, under a `Run:` header.
pub fn print_run(operator: &mut dyn Operator, command: &str) {
    operator.show(Tone::Heading, "Run:");
    print_cmd(operator, command);
}

/// Prints an additional command without a header.
pub fn print_cmd(operator: &mut dyn Operator, command: &str) {
    operator.show(Tone::Command, &format!("\t{}", command));
}

/// Announces a command, waits for confirmation, then runs it.
pub fn do_cmd(operator: &mut dyn Operator, command: &str) -> Result<CommandOutcome> {
    operator.show(Tone::Pending, &format!("Going to run: {}", command));
    operator.confirm()?;
    debug!("Spawning: {}", command);
    operator.run_command(command)
}

/// Records every interaction and replays scripted confirmation results.
///
/// Confirmations succeed unless a result was queued with
/// [`ScriptedOperator::then_confirm`]; commands report the queued exit code
/// or success. Nothing is printed and nothing is spawned.
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    /// Every line shown, in order
    pub shown: Vec<(Tone, String)>,
    /// Commands that would have been spawned
    pub commands: Vec<String>,
    /// URLs that would have been opened
    pub urls: Vec<String>,
    /// Number of confirmation waits so far
    pub confirmations: usize,
    confirm_script: VecDeque<Result<()>>,
    exit_codes: VecDeque<Option<i32>>,
}

impl ScriptedOperator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the result of the next unscripted confirmation.
    pub fn then_confirm(mut self, result: Result<()>) -> Self {
        self.confirm_script.push_back(result);
        self
    }

    /// Queues an interrupt for the confirmation after `waits` successful ones.
    pub fn interrupt_after(mut self, waits: usize) -> Self {
        for _ in 0..waits {
            self.confirm_script.push_back(Ok(()));
        }
        self.confirm_script.push_back(Err(ReleaseError::Interrupted));
        self
    }

    /// Queues the exit code of the next spawned command.
    pub fn then_exit(mut self, code: Option<i32>) -> Self {
        self.exit_codes.push_back(code);
        self
    }

    /// All shown text joined by newlines.
    pub fn transcript(&self) -> String {
        self.shown
            .iter()
            .map(|(_, text)| text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Operator for ScriptedOperator {
    fn show(&mut self, tone: Tone, text: &str) {
        self.shown.push((tone, text.to_string()));
    }

    fn confirm(&mut self) -> Result<()> {
        self.confirmations += 1;
        self.confirm_script.pop_front().unwrap_or(Ok(()))
    }

    fn run_command(&mut self, command: &str) -> Result<CommandOutcome> {
        self.commands.push(command.to_string());
        let code = self.exit_codes.pop_front().unwrap_or(Some(0));
        Ok(CommandOutcome { code })
    }

    fn open_url(&mut self, url: &str) -> Result<()> {
        self.urls.push(url.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_run_adds_header() {
        let mut op = ScriptedOperator::new();
        print_run(&mut op, "git checkout master");

        assert_eq!(op.shown.len(), 2);
        assert_eq!(op.shown[0], (Tone::Heading, "Run:".to_string()));
        assert_eq!(op.shown[1], (Tone::Command, "\tgit checkout master".to_string()));
    }

    #[test]
    fn test_do_cmd_confirms_before_running() {
        let mut op = ScriptedOperator::new();
        let outcome = do_cmd(&mut op, "make test").unwrap();

        assert!(outcome.success());
        assert_eq!(op.confirmations, 1);
        assert_eq!(op.commands, vec!["make test"]);
        assert!(op.transcript().contains("Going to run: make test"));
    }

    #[test]
    fn test_do_cmd_interrupted_does_not_run() {
        let mut op = ScriptedOperator::new().interrupt_after(0);
        let result = do_cmd(&mut op, "git push");

        assert!(matches!(result, Err(ReleaseError::Interrupted)));
        assert!(op.commands.is_empty());
    }

    #[test]
    fn test_scripted_exit_codes() {
        let mut op = ScriptedOperator::new().then_exit(Some(3)).then_exit(None);
        assert_eq!(op.run_command("a").unwrap().code, Some(3));
        assert!(!op.run_command("b").unwrap().success());
        assert!(op.run_command("c").unwrap().success());
    }

    #[test]
    fn test_command_outcome_success() {
        assert!(CommandOutcome { code: Some(0) }.success());
        assert!(!CommandOutcome { code: Some(1) }.success());
        assert!(!CommandOutcome { code: None }.success());
    }
}
