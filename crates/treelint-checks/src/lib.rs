//! # treelint-checks
//!
//! Built-in style checks for treelint.
//!
//! Every check implements the [`treelint_core::Check`] contract: it declares
//! the node kinds it listens to, binds its options fail-fast at configure
//! time, and reports violations through the per-file context.
//!
//! ## Available Checks
//!
//! | Name | Description |
//! |------|-------------|
//! | `illegal-type` | Forbids configured type names in declarations |
//! | `illegal-catch` | Forbids broad exception types in catch clauses |
//! | `illegal-throws` | Forbids broad exception types in throws clauses |
//! | `multiple-string-literals` | Flags duplicated string literals per file |
//! | `empty-block` | Flags undocumented empty blocks |
//! | `empty-catch-block` | Flags undocumented empty catch blocks |
//! | `header` | Matches a literal file header |
//! | `regexp-header` | Matches a per-line-pattern file header |
//! | `multi-header` | Matches any of several candidate headers |
//! | `javadoc-tags` | Validates Javadoc block tags and `@param` coverage |
//!
//! ## Usage
//!
//! ```ignore
//! use treelint_core::{Engine, Config};
//! use treelint_checks::{IllegalCatch, MultipleStringLiterals};
//!
//! let mut engine = Engine::builder()
//!     .check(IllegalCatch::new())
//!     .check(MultipleStringLiterals::new())
//!     .config(Config::parse(toml_str)?)
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod empty_blocks;
#[cfg(test)]
mod fixtures;
mod header;
mod illegal_catch;
mod illegal_throws;
mod illegal_type;
mod javadoc;
mod multiple_string_literals;
mod presets;
mod util;

pub use empty_blocks::{EmptyBlock, EmptyCatchBlock};
pub use header::{HeaderCheck, HeaderMatch, HeaderSpec, MultiHeaderCheck, RegexpHeaderCheck};
pub use illegal_catch::IllegalCatch;
pub use illegal_throws::IllegalThrows;
pub use illegal_type::IllegalType;
pub use javadoc::{javadoc_before, scan_block_tags, BlockTag, JavadocComment, JavadocTagsCheck};
pub use multiple_string_literals::MultipleStringLiterals;
pub use presets::{all_checks, structural_checks};
pub use util::{catch_alternatives, dotted_name, type_references, TypeRef};

/// Re-export core types for convenience.
pub use treelint_core::{Check, Severity, Violation};
