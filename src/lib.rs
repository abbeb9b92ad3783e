//! ReleaseRunner - Resumable Release Procedure Runner
//!
//! Walks an operator through a release one step at a time. Each step tells
//! the operator what to do, or runs a command once they confirm, and then
//! waits until they are ready to move on. A run can be resumed from any
//! named step, and Ctrl-C during a wait aborts cleanly with a dedicated
//! exit status.
//!
//! # Architecture
//!
//! The library is organized into four main modules:
//!
//! - [`workflow`]: Procedure definition, run context and package metadata
//! - [`execution`]: Step lifecycle, operator I/O and the runner
//! - [`monitoring`]: Per-run timeline and summary
//! - [`config`]: Run-wide settings
//!
//! # Example
//!
//! ```rust,no_run
//! use releaserunner::config::RunConfig;
//! use releaserunner::execution::{ConsoleOperator, Engine};
//! use releaserunner::workflow::{release_procedure, Context, PackageMetadataResolver};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfig::default();
//!     let resolver = PackageMetadataResolver::new(&config);
//!
//!     // Seed the context before any step runs
//!     let mut context = Context::from_metadata(resolver.resolve()?);
//!
//!     let engine = Engine::new(release_procedure(&config, &resolver)?);
//!     engine.run(&mut context, &mut ConsoleOperator::new()?)?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod execution;
pub mod monitoring;
pub mod workflow;

// Re-export commonly used types
pub use error::{ReleaseError, Result};
pub use execution::engine::Engine;
pub use execution::step::Step;
pub use workflow::{Context, Procedure};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "ReleaseRunner";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_app_name() {
        assert_eq!(APP_NAME, "ReleaseRunner");
    }

    #[test]
    fn test_module_exports_procedure() {
        let procedure = Procedure::new();
        assert!(procedure.is_empty());
    }

    #[test]
    fn test_module_exports_context() {
        let context = Context::default();
        assert!(!context.is_seeded());
    }
}
