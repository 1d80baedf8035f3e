//! Header matching: literal and regexp header checks, single and multi.
//!
//! A header spec is an ordered list of line specs, each a literal string or a
//! full-line pattern, with a sorted set of line numbers exempt from
//! comparison. These are file-level checks: they declare no node kinds and do
//! all their work from raw lines in `begin_file`.

use regex::Regex;
use tracing::debug;
use treelint_core::{
    read_lines, Charset, Check, CheckContext, CheckOptions, ConfigError, Kind,
};

/// Check name for header.
pub const HEADER_NAME: &str = "header";

/// Check name for regexp-header.
pub const REGEXP_HEADER_NAME: &str = "regexp-header";

/// Check name for multi-header.
pub const MULTI_HEADER_NAME: &str = "multi-header";

/// One expected header line.
#[derive(Debug, Clone)]
enum HeaderLine {
    /// Exact string equality.
    Literal(String),
    /// Full-line pattern match. A blank spec line compiles to `^$`: it must
    /// match a blank source line, not anything.
    Pattern(Regex),
}

impl HeaderLine {
    fn matches(&self, line: &str) -> bool {
        match self {
            Self::Literal(expected) => expected == line,
            Self::Pattern(re) => re.is_match(line),
        }
    }

    fn display(&self) -> String {
        match self {
            Self::Literal(expected) => expected.clone(),
            Self::Pattern(re) => re.as_str().to_owned(),
        }
    }
}

/// Outcome of matching one header spec against one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderMatch {
    /// Every compared line matched.
    Matches,
    /// The file has fewer lines than the header.
    TooShort,
    /// The earliest non-exempt line that failed, with what was expected.
    MismatchAt {
        /// 1-based failing line number.
        line: usize,
        /// Display form of the expected line spec.
        expected: String,
    },
}

impl HeaderMatch {
    /// The line the failure is reported at, `None` on a full match.
    /// A too-short file reports at line 1.
    #[must_use]
    pub fn failing_line(&self) -> Option<usize> {
        match self {
            Self::Matches => None,
            Self::TooShort => Some(1),
            Self::MismatchAt { line, .. } => Some(*line),
        }
    }
}

/// An ordered header spec plus its exempt line numbers.
#[derive(Debug, Clone)]
pub struct HeaderSpec {
    lines: Vec<HeaderLine>,
    skip_lines: Vec<usize>,
}

impl HeaderSpec {
    /// Builds a literal-comparison spec.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyHeader`] when no line is non-blank.
    pub fn literal(
        check: &str,
        source_id: &str,
        lines: Vec<String>,
        skip_lines: Vec<usize>,
    ) -> Result<Self, ConfigError> {
        Self::require_non_blank(check, source_id, &lines)?;
        Ok(Self {
            lines: lines.into_iter().map(HeaderLine::Literal).collect(),
            skip_lines: Self::normalize_skips(skip_lines),
        })
    }

    /// Builds a full-line-pattern spec. Blank lines compile to `^$`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyHeader`] when no line is non-blank, or
    /// [`ConfigError::InvalidOption`] for an invalid pattern.
    pub fn regexp(
        check: &str,
        source_id: &str,
        lines: Vec<String>,
        skip_lines: Vec<usize>,
    ) -> Result<Self, ConfigError> {
        Self::require_non_blank(check, source_id, &lines)?;
        let mut compiled = Vec::with_capacity(lines.len());
        for line in &lines {
            let pattern = if line.trim().is_empty() {
                "^$".to_owned()
            } else {
                format!("^(?:{line})$")
            };
            let re = Regex::new(&pattern).map_err(|e| ConfigError::InvalidOption {
                check: check.to_owned(),
                option: source_id.to_owned(),
                message: e.to_string(),
            })?;
            compiled.push(HeaderLine::Pattern(re));
        }
        Ok(Self {
            lines: compiled,
            skip_lines: Self::normalize_skips(skip_lines),
        })
    }

    fn require_non_blank(
        check: &str,
        source_id: &str,
        lines: &[String],
    ) -> Result<(), ConfigError> {
        if lines.iter().all(|l| l.trim().is_empty()) {
            return Err(ConfigError::EmptyHeader {
                check: check.to_owned(),
                resource: source_id.to_owned(),
            });
        }
        Ok(())
    }

    /// Exempt line numbers may arrive unsorted; behavior must not depend on
    /// the raw configuration order.
    fn normalize_skips(mut skip_lines: Vec<usize>) -> Vec<usize> {
        skip_lines.sort_unstable();
        skip_lines.dedup();
        skip_lines
    }

    /// Number of header lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the spec has no lines. Construction rejects blank specs, so
    /// built specs are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Matches this spec against a file's lines.
    ///
    /// Exempt lines are skipped before any other rule, so an exempt blank
    /// header line matches anything. The first failing line wins; at most one
    /// mismatch is ever reported per file.
    #[must_use]
    pub fn evaluate(&self, file_lines: &[String]) -> HeaderMatch {
        if file_lines.len() < self.lines.len() {
            return HeaderMatch::TooShort;
        }
        for (index, spec) in self.lines.iter().enumerate() {
            let number = index + 1;
            if self.skip_lines.binary_search(&number).is_ok() {
                continue;
            }
            if !spec.matches(&file_lines[index]) {
                return HeaderMatch::MismatchAt {
                    line: number,
                    expected: spec.display(),
                };
            }
        }
        HeaderMatch::Matches
    }
}

/// Reads the shared `charset`, `headerFile`, and `header` options, returning
/// the header's lines and a source identity for error messages.
fn load_header_lines(
    check: &'static str,
    options: &CheckOptions<'_>,
) -> Result<Option<(String, Vec<String>)>, ConfigError> {
    let header_file = options.get_str("headerFile")?;
    let header_inline = options.get_str("header")?;
    match (header_file, header_inline) {
        (Some(_), Some(_)) => Err(ConfigError::InvalidOption {
            check: check.to_owned(),
            option: "header".to_owned(),
            message: "headerFile and header are mutually exclusive".to_owned(),
        }),
        (Some(path), None) => {
            let charset = match options.get_str("charset")? {
                Some(name) => Charset::from_name(&name).map_err(|source| {
                    ConfigError::Resource {
                        check: check.to_owned(),
                        source,
                    }
                })?,
                None => Charset::default(),
            };
            let lines = read_lines(std::path::Path::new(&path), charset).map_err(|source| {
                ConfigError::Resource {
                    check: check.to_owned(),
                    source,
                }
            })?;
            Ok(Some((path, lines)))
        }
        (None, Some(text)) => {
            let lines: Vec<String> = text.split('\n').map(str::to_owned).collect();
            debug!("{check}: using {} inline header line(s)", lines.len());
            Ok(Some(("header".to_owned(), lines)))
        }
        // No header configured: the check is inert rather than broken, so
        // presets can register it unconditionally.
        (None, None) => Ok(None),
    }
}

fn report_outcome(ctx: &mut CheckContext<'_>, outcome: &HeaderMatch) {
    match outcome {
        HeaderMatch::Matches => {}
        HeaderMatch::TooShort => ctx.report(1, 0, "header.missing"),
        HeaderMatch::MismatchAt { line, expected } => {
            ctx.report_with(*line, 0, "header.mismatch", [expected.clone()]);
        }
    }
}

/// Verifies that a file starts with an exact expected header.
#[derive(Default)]
pub struct HeaderCheck {
    spec: Option<HeaderSpec>,
}

impl HeaderCheck {
    /// Creates the check; inert until a header is configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Check for HeaderCheck {
    fn name(&self) -> &'static str {
        HEADER_NAME
    }

    fn acceptable_kinds(&self) -> &'static [Kind] {
        &[]
    }

    fn configure(&mut self, options: &CheckOptions<'_>) -> Result<(), ConfigError> {
        if let Some((source_id, lines)) = load_header_lines(HEADER_NAME, options)? {
            let skips = options.get_uint_list("ignoreLines")?.unwrap_or_default();
            self.spec = Some(HeaderSpec::literal(HEADER_NAME, &source_id, lines, skips)?);
        }
        Ok(())
    }

    fn begin_file(&mut self, ctx: &mut CheckContext<'_>) {
        if let Some(spec) = &self.spec {
            report_outcome(ctx, &spec.evaluate(ctx.source().lines()));
        }
    }
}

/// Verifies that a file's leading lines match per-line patterns.
#[derive(Default)]
pub struct RegexpHeaderCheck {
    spec: Option<HeaderSpec>,
}

impl RegexpHeaderCheck {
    /// Creates the check; inert until a header is configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Check for RegexpHeaderCheck {
    fn name(&self) -> &'static str {
        REGEXP_HEADER_NAME
    }

    fn acceptable_kinds(&self) -> &'static [Kind] {
        &[]
    }

    fn configure(&mut self, options: &CheckOptions<'_>) -> Result<(), ConfigError> {
        if let Some((source_id, lines)) = load_header_lines(REGEXP_HEADER_NAME, options)? {
            let skips = options.get_uint_list("multiLines")?.unwrap_or_default();
            self.spec = Some(HeaderSpec::regexp(
                REGEXP_HEADER_NAME,
                &source_id,
                lines,
                skips,
            )?);
        }
        Ok(())
    }

    fn begin_file(&mut self, ctx: &mut CheckContext<'_>) {
        if let Some(spec) = &self.spec {
            report_outcome(ctx, &spec.evaluate(ctx.source().lines()));
        }
    }
}

/// Verifies a file against a list of candidate headers; matching any one
/// suffices.
///
/// On a total mismatch only the closest candidate reports: the one whose
/// first failing line is earliest, ties broken by declaration order. This
/// avoids flooding a report with one mismatch per candidate.
#[derive(Default)]
pub struct MultiHeaderCheck {
    specs: Vec<HeaderSpec>,
}

impl MultiHeaderCheck {
    /// Creates the check; inert until candidates are configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Check for MultiHeaderCheck {
    fn name(&self) -> &'static str {
        MULTI_HEADER_NAME
    }

    fn acceptable_kinds(&self) -> &'static [Kind] {
        &[]
    }

    fn configure(&mut self, options: &CheckOptions<'_>) -> Result<(), ConfigError> {
        let regexp_mode = options.get_bool("regexp", false)?;
        let skips = options.get_uint_list("ignoreLines")?.unwrap_or_default();

        let mut sources: Vec<(String, Vec<String>)> = Vec::new();
        if let Some(texts) = options.get_str_list("headers")? {
            for (index, text) in texts.iter().enumerate() {
                let lines = text.split('\n').map(str::to_owned).collect();
                sources.push((format!("headers[{index}]"), lines));
            }
        }
        if let Some(paths) = options.get_str_list("headerFiles")? {
            let charset = match options.get_str("charset")? {
                Some(name) => Charset::from_name(&name).map_err(|source| {
                    ConfigError::Resource {
                        check: MULTI_HEADER_NAME.to_owned(),
                        source,
                    }
                })?,
                None => Charset::default(),
            };
            for path in paths {
                let lines =
                    read_lines(std::path::Path::new(&path), charset).map_err(|source| {
                        ConfigError::Resource {
                            check: MULTI_HEADER_NAME.to_owned(),
                            source,
                        }
                    })?;
                sources.push((path, lines));
            }
        }

        for (source_id, lines) in sources {
            let spec = if regexp_mode {
                HeaderSpec::regexp(MULTI_HEADER_NAME, &source_id, lines, skips.clone())?
            } else {
                HeaderSpec::literal(MULTI_HEADER_NAME, &source_id, lines, skips.clone())?
            };
            self.specs.push(spec);
        }
        Ok(())
    }

    fn begin_file(&mut self, ctx: &mut CheckContext<'_>) {
        if self.specs.is_empty() {
            return;
        }
        let outcomes: Vec<HeaderMatch> = self
            .specs
            .iter()
            .map(|s| s.evaluate(ctx.source().lines()))
            .collect();
        if outcomes.iter().any(|o| *o == HeaderMatch::Matches) {
            return;
        }
        // min_by_key keeps the first of equal keys: declaration order breaks
        // ties.
        let closest = outcomes
            .iter()
            .min_by_key(|o| o.failing_line().unwrap_or(usize::MAX));
        if let Some(outcome) = closest {
            report_outcome(ctx, outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{empty_tree, run_configured};
    use std::io::Write;
    use treelint_core::{EngineError, Violation};

    const LICENSE: &str = "// Copyright (c) Acme\n// All rights reserved.\n// See LICENSE.";

    fn run_header(config: &str, content: &str) -> Result<Vec<Violation>, EngineError> {
        run_configured(HeaderCheck::new(), config, &empty_tree(), content)
    }

    #[test]
    fn matching_header_is_clean() {
        let config = format!("[checks.header]\nheader = '''{LICENSE}'''\n");
        let content = format!("{LICENSE}\n\nclass A {{}}\n");
        assert!(run_header(&config, &content).unwrap().is_empty());
    }

    #[test]
    fn first_mismatching_line_reports_once() {
        let config = format!("[checks.header]\nheader = '''{LICENSE}'''\n");
        let content = "// Copyright (c) Acme\n// All rights reversed.\n// Something else.\n";
        let violations = run_header(&config, content).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].key, "header.mismatch");
        assert_eq!(violations[0].line, 2);
        assert_eq!(violations[0].column, 0);
        assert_eq!(violations[0].args, vec!["// All rights reserved.".to_owned()]);
    }

    #[test]
    fn short_file_reports_missing_header_at_line_one() {
        let config = format!("[checks.header]\nheader = '''{LICENSE}'''\n");
        let violations = run_header(&config, "// Copyright (c) Acme\n").unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].key, "header.missing");
        assert_eq!((violations[0].line, violations[0].column), (1, 0));
    }

    #[test]
    fn ignore_lines_skip_comparison_and_order_does_not_matter() {
        let config = format!(
            "[checks.header]\nheader = '''{LICENSE}'''\nignoreLines = [3, 2]\n"
        );
        let content = "// Copyright (c) Acme\n// anything at all\n// here too\n";
        assert!(run_header(&config, content).unwrap().is_empty());
    }

    #[test]
    fn header_file_resource_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{LICENSE}").unwrap();
        let config = format!(
            "[checks.header]\nheaderFile = \"{}\"\n",
            file.path().display()
        );
        let content = format!("{LICENSE}\n");
        assert!(run_header(&config, &content).unwrap().is_empty());
    }

    #[test]
    fn unreadable_header_file_is_a_resource_error() {
        let config = "[checks.header]\nheaderFile = \"/no/such/header.txt\"\n";
        let err = run_header(config, "").unwrap_err();
        assert!(matches!(
            err,
            EngineError::Config(ConfigError::Resource { .. })
        ));
    }

    #[test]
    fn all_blank_header_is_rejected() {
        let config = "[checks.header]\nheader = \"\\n\\n\"\n";
        let err = run_header(config, "").unwrap_err();
        assert!(matches!(
            err,
            EngineError::Config(ConfigError::EmptyHeader { .. })
        ));
    }

    #[test]
    fn unconfigured_header_check_is_inert() {
        assert!(run_header("", "anything\n").unwrap().is_empty());
    }

    #[test]
    fn regexp_header_matches_per_line_patterns() {
        let config = "[checks.regexp-header]\nheader = '''// Copyright \\(c\\) \\d{4}\n// .*'''\n";
        let content = "// Copyright (c) 2024\n// Acme Corp.\n";
        let violations =
            run_configured(RegexpHeaderCheck::new(), config, &empty_tree(), content).unwrap();
        assert!(violations.is_empty());

        let content = "// Copyright (c) twenty\n// Acme Corp.\n";
        let violations =
            run_configured(RegexpHeaderCheck::new(), config, &empty_tree(), content).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, 1);
    }

    #[test]
    fn blank_pattern_line_must_match_blank_source_line() {
        let config = "[checks.regexp-header]\nheader = '''// top\n\n// bottom'''\n";
        let content = "// top\n\n// bottom\n";
        let violations =
            run_configured(RegexpHeaderCheck::new(), config, &empty_tree(), content).unwrap();
        assert!(violations.is_empty());

        let content = "// top\n// not blank\n// bottom\n";
        let violations =
            run_configured(RegexpHeaderCheck::new(), config, &empty_tree(), content).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, 2);
    }

    #[test]
    fn explicit_ignore_beats_blank_must_match() {
        let config =
            "[checks.regexp-header]\nheader = '''// top\n\n// bottom'''\nmultiLines = [2]\n";
        let content = "// top\n// not blank\n// bottom\n";
        let violations =
            run_configured(RegexpHeaderCheck::new(), config, &empty_tree(), content).unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn invalid_pattern_fails_configuration() {
        let config = "[checks.regexp-header]\nheader = \"(\"\n";
        let err = run_configured(RegexpHeaderCheck::new(), config, &empty_tree(), "")
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Config(ConfigError::InvalidOption { .. })
        ));
    }

    #[test]
    fn any_matching_candidate_wins() {
        let config =
            "[checks.multi-header]\nheaders = [\"// Old header\", \"// New header\"]\n";
        let violations = run_configured(
            MultiHeaderCheck::new(),
            config,
            &empty_tree(),
            "// New header\nclass A {}\n",
        )
        .unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn closest_candidate_reports_on_total_mismatch() {
        // Candidate 1 fails at line 1, candidate 2 at line 3: candidate 1 is
        // the closest failure and the only one reported.
        let config = "[checks.multi-header]\nheaders = [\"// A\\n// B\\n// C\", \"// x\\n// y\\n// C\"]\n";
        let content = "// x\n// y\n// z\n";
        let violations =
            run_configured(MultiHeaderCheck::new(), config, &empty_tree(), content).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, 1);
        assert_eq!(violations[0].args, vec!["// A".to_owned()]);
    }

    #[test]
    fn candidate_ties_break_by_declaration_order() {
        let config =
            "[checks.multi-header]\nheaders = [\"// first\", \"// second\"]\n";
        let content = "// neither\n";
        let violations =
            run_configured(MultiHeaderCheck::new(), config, &empty_tree(), content).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].args, vec!["// first".to_owned()]);
    }
}
