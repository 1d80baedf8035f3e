//! Check forbidding overly broad exception types in throws clauses.
//!
//! # Configuration
//!
//! - `illegalClassNames`: exception names that must not be declared thrown
//!   (default: the broad built-in throwables)
//! - `ignoredMethodNames`: methods whose throws clause is skipped
//!   (default: `finalize`)
//! - `ignoreOverriddenMethods`: skip methods annotated `@Override`
//!   (default: true)

use std::collections::HashSet;
use treelint_core::{Check, CheckContext, CheckError, CheckOptions, ConfigError, Kind, NodeRef};

use crate::util::{declared_name, has_annotation, type_references};

/// Check name for illegal-throws.
pub const NAME: &str = "illegal-throws";

const DEFAULT_ILLEGAL: &[&str] = &[
    "Error",
    "RuntimeException",
    "Throwable",
    "java.lang.Error",
    "java.lang.RuntimeException",
    "java.lang.Throwable",
];

/// Flags throws clauses naming disallowed exception types.
pub struct IllegalThrows {
    illegal_class_names: HashSet<String>,
    ignored_method_names: HashSet<String>,
    ignore_overridden_methods: bool,
}

impl Default for IllegalThrows {
    fn default() -> Self {
        Self::new()
    }
}

impl IllegalThrows {
    /// Creates the check with its default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            illegal_class_names: DEFAULT_ILLEGAL.iter().map(|s| (*s).to_owned()).collect(),
            ignored_method_names: std::iter::once("finalize".to_owned()).collect(),
            ignore_overridden_methods: true,
        }
    }

    fn is_illegal(&self, name: &str) -> bool {
        let simple = name.rsplit('.').next().unwrap_or(name);
        self.illegal_class_names.contains(name) || self.illegal_class_names.contains(simple)
    }

    fn owner_is_exempt(&self, throws: NodeRef<'_>) -> bool {
        let Some(owner) = throws.parent() else {
            return false;
        };
        if !matches!(owner.kind(), Kind::MethodDef | Kind::CtorDef) {
            return false;
        }
        if self.ignore_overridden_methods && has_annotation(owner, "Override") {
            return true;
        }
        declared_name(owner).is_some_and(|n| self.ignored_method_names.contains(n))
    }
}

impl Check for IllegalThrows {
    fn name(&self) -> &'static str {
        NAME
    }

    fn acceptable_kinds(&self) -> &'static [Kind] {
        &[Kind::Throws]
    }

    fn required_kinds(&self) -> &'static [Kind] {
        &[Kind::Throws]
    }

    fn configure(&mut self, options: &CheckOptions<'_>) -> Result<(), ConfigError> {
        if let Some(names) = options.get_str_list("illegalClassNames")? {
            self.illegal_class_names = names.into_iter().collect();
        }
        if let Some(names) = options.get_str_list("ignoredMethodNames")? {
            self.ignored_method_names = names.into_iter().collect();
        }
        self.ignore_overridden_methods =
            options.get_bool("ignoreOverriddenMethods", self.ignore_overridden_methods)?;
        Ok(())
    }

    fn enter(&mut self, node: NodeRef<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if node.kind() != Kind::Throws {
            return Err(CheckError::unsupported(node));
        }
        if self.owner_is_exempt(node) {
            return Ok(());
        }
        // Children are the thrown types in declaration order.
        for thrown in node.children().filter(|c| c.kind() == Kind::Type) {
            if let Some(type_ref) = type_references(thrown).into_iter().next() {
                if self.is_illegal(&type_ref.name) {
                    ctx.report_with(
                        type_ref.line,
                        type_ref.column,
                        "illegal.throws",
                        [type_ref.name],
                    );
                }
            }
        }
        Ok(())
    }
}
