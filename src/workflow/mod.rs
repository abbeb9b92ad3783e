//! Procedure Definition Module
//!
//! Provides the data structures that describe a release and the state it
//! runs against.
//!
//! # Structure
//!
//! - [`context`]: Shared state threaded through all steps (Context)
//! - [`model`]: Named, ordered steps (Procedure, ProcedureEntry)
//! - [`metadata`]: Package name and version lookup
//! - [`parser`]: YAML procedure loading
//! - [`validator`]: Procedure file validation
//! - [`ritual`]: The built-in release procedure

pub mod context;
pub mod metadata;
pub mod model;
pub mod parser;
pub mod ritual;
pub mod validator;

pub use context::Context;
pub use metadata::{PackageMetadata, PackageMetadataResolver};
pub use model::{Procedure, ProcedureEntry};
pub use parser::load_procedure;
pub use ritual::release_procedure;
