//! Check forbidding overly broad exception types in catch clauses.
//!
//! # Rationale
//!
//! Catching `Exception`, `Throwable`, or `RuntimeException` swallows errors
//! the code cannot meaningfully handle. Each alternative of a multi-catch is
//! judged on its own, so one clause can produce several violations.
//!
//! # Configuration
//!
//! - `illegalClassNames`: exception names that must not be caught, simple or
//!   fully qualified (default: the broad built-in throwables)

use std::collections::HashSet;
use treelint_core::{Check, CheckContext, CheckError, CheckOptions, ConfigError, Kind, NodeRef};

use crate::util::{catch_alternatives, type_references};

/// Check name for illegal-catch.
pub const NAME: &str = "illegal-catch";

const DEFAULT_ILLEGAL: &[&str] = &[
    "Exception",
    "Error",
    "RuntimeException",
    "Throwable",
    "java.lang.Error",
    "java.lang.Exception",
    "java.lang.RuntimeException",
    "java.lang.Throwable",
];

/// Flags catch clauses naming disallowed exception types.
pub struct IllegalCatch {
    illegal_class_names: HashSet<String>,
}

impl Default for IllegalCatch {
    fn default() -> Self {
        Self::new()
    }
}

impl IllegalCatch {
    /// Creates the check with its default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            illegal_class_names: DEFAULT_ILLEGAL.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    /// Replaces the illegal name set.
    #[must_use]
    pub fn illegal_class_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.illegal_class_names = names.into_iter().map(Into::into).collect();
        self
    }

    fn is_illegal(&self, name: &str) -> bool {
        let simple = name.rsplit('.').next().unwrap_or(name);
        self.illegal_class_names.contains(name) || self.illegal_class_names.contains(simple)
    }
}

impl Check for IllegalCatch {
    fn name(&self) -> &'static str {
        NAME
    }

    fn acceptable_kinds(&self) -> &'static [Kind] {
        &[Kind::Catch]
    }

    fn required_kinds(&self) -> &'static [Kind] {
        &[Kind::Catch]
    }

    fn configure(&mut self, options: &CheckOptions<'_>) -> Result<(), ConfigError> {
        if let Some(names) = options.get_str_list("illegalClassNames")? {
            self.illegal_class_names = names.into_iter().collect();
        }
        Ok(())
    }

    fn enter(&mut self, node: NodeRef<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if node.kind() != Kind::Catch {
            return Err(CheckError::unsupported(node));
        }
        // Alternatives come back in source order, so violations for one
        // multi-catch are emitted left to right.
        for alternative in catch_alternatives(node) {
            if let Some(type_ref) = type_references(alternative).into_iter().next() {
                if self.is_illegal(&type_ref.name) {
                    ctx.report_with(
                        type_ref.line,
                        type_ref.column,
                        "illegal.catch",
                        [type_ref.name],
                    );
                }
            }
        }
        Ok(())
    }
}
