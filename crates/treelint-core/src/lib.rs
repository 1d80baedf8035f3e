//! # treelint-core
//!
//! Core framework for tree-based style checking.
//!
//! An external parser hands this crate a token-typed [`SyntaxTree`] plus the
//! file's raw lines ([`FileSource`]); the [`Engine`] walks the tree once and
//! fans each node out to every configured [`Check`] in enter and leave
//! phases, collecting [`Violation`]s ordered by position.
//!
//! ## Example
//!
//! ```ignore
//! use treelint_core::{Engine, Config, FileSource};
//!
//! let mut engine = Engine::builder()
//!     .check(MyCheck::new())
//!     .config(Config::parse(toml_str)?)
//!     .build()?;
//!
//! let violations = engine.run_file(&tree, &source)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod check;
mod config;
mod engine;
mod source;
mod tree;
mod types;

pub use check::{Check, CheckBox, CheckContext, CheckError};
pub use config::{CheckConfig, CheckOptions, Config, ConfigError};
pub use engine::{Engine, EngineBuilder, EngineError};
pub use source::{read_lines, Charset, FileSource, SourceError};
pub use tree::{Descendants, Kind, NodeId, NodeRef, SyntaxTree, TreeBuilder};
pub use types::{messages, RunSummary, Severity, Violation, ViolationDiagnostic};
