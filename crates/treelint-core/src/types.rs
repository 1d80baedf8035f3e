//! Core types for check violations and run results.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};

use crate::source::FileSource;

/// Severity level for violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail a run.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Default English templates for the built-in message keys.
///
/// Violations carry a stable key plus positional arguments; rendering into
/// human text is the host's job, but the crate ships defaults so reports work
/// out of the box. `{0}`, `{1}`, … are substituted from the argument list.
pub mod messages {
    const TEMPLATES: &[(&str, &str)] = &[
        ("illegal.type", "Usage of type '{0}' is not allowed"),
        ("illegal.catch", "Catching '{0}' is not allowed"),
        ("illegal.throws", "Throwing '{0}' is not allowed"),
        ("duplicate.string", "The string {0} appears again (occurrence {1})"),
        ("block.empty", "Empty {0} block"),
        ("catch.empty", "Empty catch block"),
        ("header.missing", "Missing or too-short file header"),
        ("header.mismatch", "Header line does not match expected line '{0}'"),
        ("javadoc.unknownTag", "Unknown tag '@{0}'"),
        ("javadoc.unusedTag", "Unused @param tag for '{0}'"),
        ("javadoc.missingParamTag", "Missing @param tag for '{0}'"),
    ];

    /// Looks up the default template for a message key.
    #[must_use]
    pub fn template(key: &str) -> Option<&'static str> {
        TEMPLATES.iter().find(|(k, _)| *k == key).map(|(_, t)| *t)
    }

    /// Substitutes `{n}` placeholders from `args`.
    #[must_use]
    pub fn render(template: &str, args: &[String]) -> String {
        let mut out = template.to_owned();
        for (i, arg) in args.iter().enumerate() {
            out = out.replace(&format!("{{{i}}}"), arg);
        }
        out
    }
}

/// One finding reported by a check.
///
/// Violations are immutable once created. A file's final report is ordered
/// by `(line, column)` with insertion order breaking ties; the engine does
/// that sort, not individual checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Name of the check that produced this finding.
    pub check: String,
    /// Stable message key (e.g. `"illegal.catch"`), not pre-rendered text.
    pub key: String,
    /// Positional arguments for template substitution.
    pub args: Vec<String>,
    /// Severity of this finding.
    pub severity: Severity,
    /// 1-based line.
    pub line: usize,
    /// 1-based column; `0` for file-level findings.
    pub column: usize,
}

impl Violation {
    /// Creates a new violation with no arguments.
    #[must_use]
    pub fn new(
        check: impl Into<String>,
        key: impl Into<String>,
        severity: Severity,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            check: check.into(),
            key: key.into(),
            args: Vec::new(),
            severity,
            line,
            column,
        }
    }

    /// Adds positional message arguments.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sort key for the final per-file ordering.
    #[must_use]
    pub fn sort_key(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    /// Renders the message using the built-in default templates.
    ///
    /// Falls back to `key(arg, arg, …)` for keys without a template.
    #[must_use]
    pub fn render(&self) -> String {
        messages::template(&self.key).map_or_else(
            || {
                if self.args.is_empty() {
                    self.key.clone()
                } else {
                    format!("{}({})", self.key, self.args.join(", "))
                }
            },
            |t| messages::render(t, &self.args),
        )
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.line,
            self.column,
            self.severity,
            self.check,
            self.render()
        )
    }
}

/// Converts a [`Violation`] to a miette [`Diagnostic`] for rich display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl ViolationDiagnostic {
    /// Builds a diagnostic, resolving the span offset through the file source.
    #[must_use]
    pub fn new(violation: &Violation, source: &FileSource) -> Self {
        let offset = source.offset_for(violation.line, violation.column.max(1));
        Self {
            message: violation.render(),
            span: SourceSpan::from((offset, 0)),
            label_message: violation.check.clone(),
        }
    }
}

/// Aggregated outcome of checking one or more files.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// All violations found, in report order.
    pub violations: Vec<Violation>,
    /// Number of files checked.
    pub files_checked: usize,
}

impl RunSummary {
    /// Creates an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True if any violation is at [`Severity::Error`].
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// True if any violation meets or exceeds the given severity.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Counts violations as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for v in &self.violations {
            match v.severity {
                Severity::Error => counts.0 += 1,
                Severity::Warning => counts.1 += 1,
                Severity::Info => counts.2 += 1,
            }
        }
        counts
    }

    /// Records one file's violations.
    pub fn add_file(&mut self, violations: Vec<Violation>) {
        self.violations.extend(violations);
        self.files_checked += 1;
    }

    /// Merges another summary into this one.
    pub fn extend(&mut self, other: Self) {
        self.violations.extend(other.violations);
        self.files_checked += other.files_checked;
    }
}
