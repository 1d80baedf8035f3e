//! Check counting duplicated string literals within one file.
//!
//! # Rationale
//!
//! The same literal repeated across a file usually wants to be a named
//! constant. Occurrences are accumulated over the whole file and judged at
//! end-of-file, so the reported counts are final.
//!
//! The occurrence map MUST be reset at `begin_file`: this check is the
//! canonical cross-file-leak hazard, and the reset is load-bearing for hosts
//! that reuse one engine across many files.
//!
//! # Configuration
//!
//! - `allowedDuplicates`: how many occurrences of one literal are fine
//!   (default: 1)
//! - `ignoreStringsRegexp`: literals (quotes included) to exempt
//!   (default: `^""$`, the empty string)
//! - `ignoreOccurrenceContext`: node kinds whose subtrees are exempt
//!   (default: `["ANNOTATION"]`)

use indexmap::IndexMap;
use regex::Regex;
use treelint_core::{Check, CheckContext, CheckError, CheckOptions, ConfigError, Kind, NodeRef};

use crate::util::has_ancestor_kind;

/// Check name for multiple-string-literals.
pub const NAME: &str = "multiple-string-literals";

const DEFAULT_IGNORE_STRINGS: &str = "^\"\"$";

/// Flags string literals occurring more often than the allowed count.
pub struct MultipleStringLiterals {
    allowed_duplicates: usize,
    ignore_strings_regexp: Option<Regex>,
    ignore_occurrence_context: Vec<Kind>,
    occurrences: IndexMap<String, Vec<(usize, usize)>>,
}

impl Default for MultipleStringLiterals {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipleStringLiterals {
    /// Creates the check with its default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allowed_duplicates: 1,
            ignore_strings_regexp: Regex::new(DEFAULT_IGNORE_STRINGS).ok(),
            ignore_occurrence_context: vec![Kind::Annotation],
            occurrences: IndexMap::new(),
        }
    }

    /// Sets how many occurrences of one literal are allowed.
    #[must_use]
    pub fn allowed_duplicates(mut self, allowed: usize) -> Self {
        self.allowed_duplicates = allowed;
        self
    }

    fn in_ignored_context(&self, node: NodeRef<'_>) -> bool {
        has_ancestor_kind(node, &self.ignore_occurrence_context)
    }
}

/// Canonical single-line quoted form of a text block, so a text block and an
/// equivalent ordinary literal share one occurrence key.
///
/// Strips the `"""` delimiters and the incidental indentation, then escapes
/// line breaks and quotes the way an ordinary literal lexeme would.
fn normalized_text_block(text: &str) -> String {
    let inner = text.strip_prefix("\"\"\"").unwrap_or(text);
    let inner = inner.strip_suffix("\"\"\"").unwrap_or(inner);

    let mut lines: Vec<&str> = inner.split('\n').collect();
    if lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }
    // The last segment is the closing delimiter's indentation when the block
    // ends with a newline before `"""`.
    if lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let body = lines
        .iter()
        .map(|l| if l.len() >= indent { &l[indent..] } else { l.trim_start() })
        .collect::<Vec<_>>()
        .join("\\n");

    format!("\"{}\"", body.replace('"', "\\\""))
}

impl Check for MultipleStringLiterals {
    fn name(&self) -> &'static str {
        NAME
    }

    fn acceptable_kinds(&self) -> &'static [Kind] {
        &[Kind::StringLiteral, Kind::TextBlock]
    }

    fn required_kinds(&self) -> &'static [Kind] {
        &[Kind::StringLiteral]
    }

    fn configure(&mut self, options: &CheckOptions<'_>) -> Result<(), ConfigError> {
        self.allowed_duplicates = options.get_uint("allowedDuplicates", self.allowed_duplicates)?;
        if self.allowed_duplicates == 0 {
            return Err(ConfigError::InvalidOption {
                check: NAME.to_owned(),
                option: "allowedDuplicates".to_owned(),
                message: "must be at least 1".to_owned(),
            });
        }
        if let Some(re) = options.get_regex("ignoreStringsRegexp")? {
            self.ignore_strings_regexp = Some(re);
        }
        if let Some(names) = options.get_str_list("ignoreOccurrenceContext")? {
            let mut kinds = Vec::new();
            for name in names {
                let kind = Kind::from_name(&name).ok_or_else(|| ConfigError::UnknownKind {
                    check: NAME.to_owned(),
                    token: name.clone(),
                })?;
                kinds.push(kind);
            }
            self.ignore_occurrence_context = kinds;
        }
        Ok(())
    }

    fn begin_file(&mut self, _ctx: &mut CheckContext<'_>) {
        self.occurrences.clear();
    }

    fn enter(&mut self, node: NodeRef<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        let _ = ctx;
        let raw = match node.kind() {
            Kind::StringLiteral => node.text().unwrap_or_default().to_owned(),
            Kind::TextBlock => normalized_text_block(node.text().unwrap_or_default()),
            _ => return Err(CheckError::unsupported(node)),
        };
        if self.in_ignored_context(node) {
            return Ok(());
        }
        if self
            .ignore_strings_regexp
            .as_ref()
            .is_some_and(|re| re.is_match(&raw))
        {
            return Ok(());
        }
        self.occurrences
            .entry(raw)
            .or_default()
            .push((node.line(), node.column()));
        Ok(())
    }

    fn end_file(&mut self, ctx: &mut CheckContext<'_>) {
        for (text, positions) in &self.occurrences {
            if positions.len() <= self.allowed_duplicates {
                continue;
            }
            for (index, &(line, column)) in positions.iter().enumerate().skip(self.allowed_duplicates)
            {
                ctx.report_with(
                    line,
                    column,
                    "duplicate.string",
                    [text.clone(), (index + 1).to_string()],
                );
            }
        }
    }
}
