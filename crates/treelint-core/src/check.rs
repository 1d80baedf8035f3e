//! The check contract: interest sets, lifecycle hooks, and the violation sink.

use thiserror::Error;

use crate::config::{CheckOptions, ConfigError};
use crate::source::FileSource;
use crate::tree::{Kind, NodeRef, SyntaxTree};
use crate::types::{Severity, Violation};

/// Traversal-time failure of a check.
///
/// Checks validate configuration at [`Check::configure`] time, so the only
/// error a traversal can raise is a contract breach between the dispatcher
/// and a check: being handed a node shape it does not know how to handle.
/// Any such error aborts the whole run.
#[derive(Debug, Error)]
pub enum CheckError {
    /// A check was asked to visit a node it does not structurally support.
    #[error("unsupported token {kind} `{text}` at {line}:{column}")]
    UnsupportedNode {
        /// Kind of the offending node.
        kind: Kind,
        /// The node's textual identity (lexeme for leaves, kind name otherwise).
        text: String,
        /// 1-based line of the node.
        line: usize,
        /// 1-based column of the node.
        column: usize,
    },
}

impl CheckError {
    /// Builds an unsupported-token error carrying the node's own identity.
    #[must_use]
    pub fn unsupported(node: NodeRef<'_>) -> Self {
        Self::UnsupportedNode {
            kind: node.kind(),
            text: node.text().unwrap_or(node.kind().as_str()).to_owned(),
            line: node.line(),
            column: node.column(),
        }
    }
}

/// A style check: one rule run over every file of an analysis.
///
/// Checks are stateful per file. The engine brackets each file with
/// [`begin_file`](Check::begin_file) and [`end_file`](Check::end_file); any
/// per-file accumulator MUST be reset in `begin_file`, never trusted to be
/// clean, or counts leak between files.
///
/// # Interest sets
///
/// A check declares which node [`Kind`]s it can handle
/// ([`acceptable_kinds`](Check::acceptable_kinds)), which it listens to out
/// of the box ([`default_kinds`](Check::default_kinds)), and which it cannot
/// function without ([`required_kinds`](Check::required_kinds)). The engine
/// validates `required ⊆ configured ⊆ acceptable` once at build time.
/// File-level checks (header matching) declare empty sets and work from raw
/// lines in `begin_file`.
pub trait Check: Send {
    /// Kebab-case name of this check (e.g. `"illegal-catch"`); appears in
    /// every violation it produces.
    fn name(&self) -> &'static str;

    /// Kinds this check is capable of handling if configured to.
    fn acceptable_kinds(&self) -> &'static [Kind];

    /// Kinds this check listens to with no configuration.
    fn default_kinds(&self) -> &'static [Kind] {
        self.acceptable_kinds()
    }

    /// Kinds without which this check cannot produce meaningful results.
    fn required_kinds(&self) -> &'static [Kind] {
        &[]
    }

    /// Default severity for this check's violations.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Binds configuration. Every pattern is compiled and every resource read
    /// here; a failure aborts the run before any file is walked.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for any invalid or uninterpretable option.
    fn configure(&mut self, options: &CheckOptions<'_>) -> Result<(), ConfigError> {
        let _ = options;
        Ok(())
    }

    /// Called before each file's traversal. Reset per-file state here.
    fn begin_file(&mut self, ctx: &mut CheckContext<'_>) {
        let _ = ctx;
    }

    /// Called for each interesting node before its children are visited.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckError`] only for dispatcher/check contract breaches.
    fn enter(&mut self, node: NodeRef<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        let _ = (node, ctx);
        Ok(())
    }

    /// Called for each interesting node after all its children were visited.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckError`] only for dispatcher/check contract breaches.
    fn leave(&mut self, node: NodeRef<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        let _ = (node, ctx);
        Ok(())
    }

    /// Called after each file's traversal; aggregate findings are emitted here.
    fn end_file(&mut self, ctx: &mut CheckContext<'_>) {
        let _ = ctx;
    }
}

/// Type alias for boxed [`Check`] trait objects.
pub type CheckBox = Box<dyn Check>;

/// Per-file context handed to every check hook.
///
/// Carries the tree, the raw source lines, and the violation sink. Reported
/// violations are attributed to the currently dispatched check and its
/// configured severity by the engine.
#[derive(Debug)]
pub struct CheckContext<'a> {
    tree: &'a SyntaxTree,
    source: &'a FileSource,
    violations: Vec<Violation>,
    current_check: &'static str,
    current_severity: Severity,
}

impl<'a> CheckContext<'a> {
    /// Creates a context for one file.
    #[must_use]
    pub fn new(tree: &'a SyntaxTree, source: &'a FileSource) -> Self {
        Self {
            tree,
            source,
            violations: Vec::new(),
            current_check: "",
            current_severity: Severity::Error,
        }
    }

    /// The file's syntax tree.
    #[must_use]
    pub fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    /// The file's raw source lines.
    #[must_use]
    pub fn source(&self) -> &'a FileSource {
        self.source
    }

    /// Reports a violation with no message arguments. Use column `0` for
    /// file-level findings.
    pub fn report(&mut self, line: usize, column: usize, key: &str) {
        let v = Violation::new(self.current_check, key, self.current_severity, line, column);
        self.violations.push(v);
    }

    /// Reports a violation with message arguments.
    pub fn report_with<I, S>(&mut self, line: usize, column: usize, key: &str, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let v = Violation::new(self.current_check, key, self.current_severity, line, column)
            .with_args(args);
        self.violations.push(v);
    }

    /// Number of violations reported so far (all checks).
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    pub(crate) fn set_current(&mut self, check: &'static str, severity: Severity) {
        self.current_check = check;
        self.current_severity = severity;
    }

    pub(crate) fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeBuilder;

    struct CountingCheck;

    impl Check for CountingCheck {
        fn name(&self) -> &'static str {
            "counting"
        }
        fn acceptable_kinds(&self) -> &'static [Kind] {
            &[Kind::ClassDef, Kind::MethodDef]
        }
        fn required_kinds(&self) -> &'static [Kind] {
            &[Kind::ClassDef]
        }
    }

    #[test]
    fn defaults_satisfy_contract() {
        let check = CountingCheck;
        let acceptable = check.acceptable_kinds();
        assert!(check.default_kinds().iter().all(|k| acceptable.contains(k)));
        assert!(check.required_kinds().iter().all(|k| acceptable.contains(k)));
    }

    #[test]
    fn unsupported_error_carries_node_identity() {
        let mut b = TreeBuilder::new(Kind::CompilationUnit, 1, 1);
        b.leaf(b.root(), Kind::Ident, 4, 9, "Widget");
        let tree = b.build();
        let node = tree.root().find_child(Kind::Ident).unwrap();

        let err = CheckError::unsupported(node);
        let rendered = err.to_string();
        assert!(rendered.contains("IDENT"));
        assert!(rendered.contains("Widget"));
        assert!(rendered.contains("4:9"));
    }

    #[test]
    fn context_attributes_current_check() {
        let tree = TreeBuilder::new(Kind::CompilationUnit, 1, 1).build();
        let source = FileSource::new("T.java", "");
        let mut ctx = CheckContext::new(&tree, &source);

        ctx.set_current("first", Severity::Warning);
        ctx.report(3, 1, "some.key");
        ctx.set_current("second", Severity::Error);
        ctx.report_with(1, 1, "other.key", ["arg"]);

        let violations = ctx.into_violations();
        assert_eq!(violations[0].check, "first");
        assert_eq!(violations[0].severity, Severity::Warning);
        assert_eq!(violations[1].check, "second");
        assert_eq!(violations[1].args, vec!["arg".to_owned()]);
    }
}
