//! Release Execution Engine
//!
//! Runs a procedure's steps one at a time, in order, against a shared
//! context:
//! - Resume from a named step, skipping every entry before it
//! - Stop at the first error; nothing is retried or rolled back
//! - Print the completion signal once the last entry has been handled
//!
//! A resume target that names no entry skips the whole procedure and the
//! run still completes normally.

use log::{debug, error, info, warn};

use crate::error::Result;
use crate::monitoring::{EventType, ExecutionTimeline};
use crate::workflow::{Context, Procedure};

use super::operator::{Operator, Tone};

/// Sequential, resumable procedure runner.
///
/// # Example
///
/// ```rust,no_run
/// use releaserunner::config::RunConfig;
/// use releaserunner::execution::{ConsoleOperator, Engine};
/// use releaserunner::workflow::{release_procedure, Context, PackageMetadataResolver};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = RunConfig::default();
///     let resolver = PackageMetadataResolver::new(&config);
///     let procedure = release_procedure(&config, &resolver)?;
///     let mut context = Context::from_metadata(resolver.resolve()?);
///
///     let mut engine = Engine::new(procedure);
///     engine.set_target("bumpversion");
///     engine.run(&mut context, &mut ConsoleOperator::new()?)?;
///     Ok(())
/// }
/// ```
pub struct Engine {
    procedure: Procedure,
    target: Option<String>,
}

impl Engine {
    /// Creates an engine that runs the whole procedure.
    pub fn new(procedure: Procedure) -> Self {
        Self {
            procedure,
            target: None,
        }
    }

    /// Sets the entry to resume from.
    ///
    /// The name is trimmed the same way entry names are.
    pub fn set_target(&mut self, target: impl Into<String>) {
        self.target = Some(target.into().trim().to_string());
    }

    /// Sets or clears the resume target.
    pub fn set_target_opt(&mut self, target: Option<String>) {
        match target {
            Some(target) => self.set_target(target),
            None => self.target = None,
        }
    }

    /// The procedure this engine runs.
    pub fn procedure(&self) -> &Procedure {
        &self.procedure
    }

    /// Executes the procedure.
    ///
    /// Entries before the resume target are skipped without any lifecycle
    /// call. From the target on, every entry runs in order. The first error
    /// ends the run and is returned as is; an interrupted step returns
    /// [`ReleaseError::Aborted`](crate::error::ReleaseError::Aborted).
    pub fn run(&self, context: &mut Context, operator: &mut dyn Operator) -> Result<ExecutionTimeline> {
        let mut timeline = ExecutionTimeline::new();
        let mut skipping = self.target.is_some();

        if let Some(target) = &self.target {
            match self.procedure.position(target) {
                Some(index) => info!(
                    "Resuming from step '{}' ({} of {})",
                    target,
                    index + 1,
                    self.procedure.len()
                ),
                None => warn!(
                    "Resume target '{}' matches no step; every step will be skipped",
                    target
                ),
            }
        }

        for entry in &self.procedure {
            if skipping && self.target.as_deref() != Some(entry.name.as_str()) {
                debug!("Skipping step '{}'", entry.name);
                timeline.add_event(entry.name.as_str(), EventType::Skipped);
                continue;
            }
            skipping = false;

            info!("Step '{}': {}", entry.name, entry.step.describe());
            timeline.add_event(entry.name.as_str(), EventType::Started);

            if let Err(e) = entry.step.run(context, operator) {
                timeline.add_event(entry.name.as_str(), EventType::Failed);
                if e.is_interrupt() {
                    info!("Stopped at step '{}'; resume with: {}", entry.name, entry.name);
                } else {
                    error!("Step '{}' failed: {}", entry.name, e);
                }
                return Err(e);
            }

            timeline.add_event(entry.name.as_str(), EventType::Completed);
        }

        operator.show(Tone::Success, "\nDone!");
        Ok(timeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;
    use crate::execution::operator::ScriptedOperator;
    use crate::execution::step::Step;
    use crate::workflow::metadata::PackageMetadata;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Step that records its name and can write to the context.
    struct Probe {
        label: &'static str,
        log: Log,
        write: Option<(&'static str, &'static str)>,
    }

    impl Step for Probe {
        fn describe(&self) -> String {
            format!("probe {}", self.label)
        }

        fn action(&self, context: &mut Context, _operator: &mut dyn Operator) -> Result<()> {
            self.log
                .borrow_mut()
                .push(format!("{}:{}", self.label, context.get("note").unwrap_or("-")));
            Ok(())
        }

        fn post(&self, context: &mut Context, operator: &mut dyn Operator) -> Result<()> {
            operator.confirm()?;
            if let Some((key, value)) = self.write {
                context.set(key, value);
            }
            Ok(())
        }
    }

    fn probe(label: &'static str, log: &Log) -> Probe {
        Probe {
            label,
            log: Rc::clone(log),
            write: None,
        }
    }

    fn abc(log: &Log) -> Procedure {
        Procedure::new()
            .with("a", probe("A", log))
            .unwrap()
            .with("b", probe("B", log))
            .unwrap()
            .with("c", probe("C", log))
            .unwrap()
    }

    fn context() -> Context {
        Context::from_metadata(PackageMetadata {
            pkgname: "demo".to_string(),
            version: "1.2.3".to_string(),
        })
    }

    fn labels(log: &Log) -> Vec<String> {
        log.borrow()
            .iter()
            .map(|entry| entry.split(':').next().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_runs_every_step_without_target() {
        let log = Log::default();
        let engine = Engine::new(abc(&log));
        let mut op = ScriptedOperator::new();

        let timeline = engine.run(&mut context(), &mut op).unwrap();

        assert_eq!(labels(&log), vec!["A", "B", "C"]);
        assert_eq!(timeline.executed(), vec!["a", "b", "c"]);
        assert!(timeline.skipped().is_empty());
        assert!(op.transcript().ends_with("Done!"));
    }

    #[test]
    fn test_resume_from_target() {
        let log = Log::default();
        let mut engine = Engine::new(abc(&log));
        engine.set_target("b");

        let timeline = engine.run(&mut context(), &mut ScriptedOperator::new()).unwrap();

        assert_eq!(labels(&log), vec!["B", "C"]);
        assert_eq!(timeline.skipped(), vec!["a"]);
    }

    #[test]
    fn test_resume_from_first_step_runs_all() {
        let log = Log::default();
        let mut engine = Engine::new(abc(&log));
        engine.set_target("a");

        engine.run(&mut context(), &mut ScriptedOperator::new()).unwrap();
        assert_eq!(labels(&log), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_unknown_target_runs_nothing_but_completes() {
        let log = Log::default();
        let mut engine = Engine::new(abc(&log));
        engine.set_target("z");
        let mut op = ScriptedOperator::new();

        let timeline = engine.run(&mut context(), &mut op).unwrap();

        assert!(log.borrow().is_empty());
        assert_eq!(timeline.skipped(), vec!["a", "b", "c"]);
        assert_eq!(op.confirmations, 0);
        assert!(op.transcript().contains("Done!"));
    }

    #[test]
    fn test_target_is_trimmed_like_entry_names() {
        let log = Log::default();
        let mut engine = Engine::new(abc(&log));
        engine.set_target_opt(Some(" b ".to_string()));

        let timeline = engine.run(&mut context(), &mut ScriptedOperator::new()).unwrap();

        assert_eq!(labels(&log), vec!["B", "C"]);
        assert_eq!(timeline.skipped(), vec!["a"]);
    }

    #[test]
    fn test_cleared_target_runs_all() {
        let log = Log::default();
        let mut engine = Engine::new(abc(&log));
        engine.set_target("c");
        engine.set_target_opt(None);

        engine.run(&mut context(), &mut ScriptedOperator::new()).unwrap();
        assert_eq!(labels(&log), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_context_written_in_post_is_visible_later() {
        let log = Log::default();
        let procedure = Procedure::new()
            .with("a", probe("A", &log))
            .unwrap()
            .with(
                "b",
                Probe {
                    label: "B",
                    log: Rc::clone(&log),
                    write: Some(("note", "from-b")),
                },
            )
            .unwrap()
            .with("c", probe("C", &log))
            .unwrap();

        let mut ctx = context();
        Engine::new(procedure)
            .run(&mut ctx, &mut ScriptedOperator::new())
            .unwrap();

        assert_eq!(*log.borrow(), vec!["A:-", "B:-", "C:from-b"]);
        assert_eq!(ctx.get("note"), Some("from-b"));
    }

    #[test]
    fn test_interrupt_stops_before_next_step() {
        let log = Log::default();
        let engine = Engine::new(abc(&log));
        // A confirms, B is interrupted
        let mut op = ScriptedOperator::new().interrupt_after(1);

        let err = engine.run(&mut context(), &mut op).unwrap_err();

        assert!(matches!(err, ReleaseError::Aborted));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(labels(&log), vec!["A", "B"]);
        assert!(!op.transcript().contains("Done!"));
    }

    #[test]
    fn test_other_errors_propagate_unchanged() {
        let log = Log::default();
        let engine = Engine::new(abc(&log));
        let mut op = ScriptedOperator::new()
            .then_confirm(Ok(()))
            .then_confirm(Err(ReleaseError::InputClosed));

        let err = engine.run(&mut context(), &mut op).unwrap_err();

        assert!(matches!(err, ReleaseError::InputClosed));
        assert_eq!(labels(&log), vec!["A", "B"]);
    }

    #[test]
    fn test_empty_procedure_completes() {
        let engine = Engine::new(Procedure::new());
        let mut op = ScriptedOperator::new();
        let timeline = engine.run(&mut context(), &mut op).unwrap();

        assert!(timeline.executed().is_empty());
        assert!(op.transcript().contains("Done!"));
    }
}
