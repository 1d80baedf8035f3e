//! Checks for empty blocks, with comment-aware "documented empty" detection.
//!
//! Comments are not tree nodes, so emptiness is judged in two steps: the
//! block has no statement children (tree), and the raw text between its
//! braces carries no comment marker (source lines). A block containing only
//! a comment counts as intentionally empty and is not flagged.

use regex::Regex;
use treelint_core::{
    Check, CheckContext, CheckError, CheckOptions, ConfigError, FileSource, Kind, NodeRef,
};

/// Check name for empty-block.
pub const EMPTY_BLOCK_NAME: &str = "empty-block";

/// Check name for empty-catch-block.
pub const EMPTY_CATCH_NAME: &str = "empty-catch-block";

const DEFAULT_EXEMPT_VARIABLES: &str = "^(expected|ignore)$";
const DEFAULT_COMMENT_FORMAT: &str = ".*";

/// True when the block node has no statement children (`RCURLY` is the
/// closing brace, not a statement).
fn has_no_statements(block: NodeRef<'_>) -> bool {
    !block.children().any(|c| c.kind() != Kind::RCurly)
}

/// The raw text strictly between a block's braces, if both are known.
fn brace_interior(block: NodeRef<'_>, source: &FileSource) -> Option<String> {
    let rcurly = block
        .children()
        .filter(|c| c.kind() == Kind::RCurly)
        .last()?;
    Some(source.text_range(
        block.line(),
        block.column() + 1,
        rcurly.line(),
        rcurly.column(),
    ))
}

/// First comment's content within a brace interior, if any.
fn first_comment(interior: &str) -> Option<String> {
    if let Some(pos) = interior.find("/*") {
        let rest = &interior[pos + 2..];
        let end = rest.find("*/").unwrap_or(rest.len());
        return Some(rest[..end].trim_matches(['*', ' ', '\t', '\n']).to_owned());
    }
    if let Some(pos) = interior.find("//") {
        let rest = &interior[pos + 2..];
        let end = rest.find('\n').unwrap_or(rest.len());
        return Some(rest[..end].trim().to_owned());
    }
    None
}

/// Flags empty statement blocks that carry no explanatory comment.
pub struct EmptyBlock;

impl Default for EmptyBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl EmptyBlock {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn construct_word(kind: Kind) -> &'static str {
        match kind {
            Kind::Try => "try",
            Kind::Finally => "finally",
            Kind::If => "if",
            Kind::Else => "else",
            Kind::While => "while",
            _ => "for",
        }
    }
}

impl Check for EmptyBlock {
    fn name(&self) -> &'static str {
        EMPTY_BLOCK_NAME
    }

    fn acceptable_kinds(&self) -> &'static [Kind] {
        &[
            Kind::Try,
            Kind::Finally,
            Kind::If,
            Kind::Else,
            Kind::While,
            Kind::For,
        ]
    }

    fn enter(&mut self, node: NodeRef<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if !self.acceptable_kinds().contains(&node.kind()) {
            return Err(CheckError::unsupported(node));
        }
        let Some(block) = node.find_child(Kind::Block) else {
            return Ok(());
        };
        if !has_no_statements(block) {
            return Ok(());
        }
        let documented = brace_interior(block, ctx.source())
            .as_deref()
            .and_then(first_comment)
            .is_some();
        if !documented {
            ctx.report_with(
                block.line(),
                block.column(),
                "block.empty",
                [Self::construct_word(node.kind())],
            );
        }
        Ok(())
    }
}

/// Flags empty catch blocks, with comment and variable-name exemptions.
///
/// Catch and finally blocks are judged independently: a documented-empty
/// catch never exempts its paired finally.
pub struct EmptyCatchBlock {
    exemption_variables: Regex,
    comment_format: Regex,
}

impl Default for EmptyCatchBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl EmptyCatchBlock {
    /// Creates the check with its default settings.
    #[must_use]
    pub fn new() -> Self {
        #[allow(clippy::expect_used)]
        let exemption_variables =
            Regex::new(DEFAULT_EXEMPT_VARIABLES).expect("default exemption pattern is valid");
        #[allow(clippy::expect_used)]
        let comment_format =
            Regex::new(DEFAULT_COMMENT_FORMAT).expect("default comment pattern is valid");
        Self {
            exemption_variables,
            comment_format,
        }
    }

    fn parameter_name<'t>(catch: NodeRef<'t>) -> Option<&'t str> {
        catch
            .find_child(Kind::ParameterDef)
            .and_then(|p| p.find_child(Kind::Ident))
            .and_then(|i| i.text())
    }
}

impl Check for EmptyCatchBlock {
    fn name(&self) -> &'static str {
        EMPTY_CATCH_NAME
    }

    fn acceptable_kinds(&self) -> &'static [Kind] {
        &[Kind::Catch]
    }

    fn required_kinds(&self) -> &'static [Kind] {
        &[Kind::Catch]
    }

    fn configure(&mut self, options: &CheckOptions<'_>) -> Result<(), ConfigError> {
        self.exemption_variables =
            options.get_regex_or("exemptionVariablesFormat", DEFAULT_EXEMPT_VARIABLES)?;
        self.comment_format = options.get_regex_or("commentFormat", DEFAULT_COMMENT_FORMAT)?;
        Ok(())
    }

    fn enter(&mut self, node: NodeRef<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if node.kind() != Kind::Catch {
            return Err(CheckError::unsupported(node));
        }
        let Some(block) = node.find_child(Kind::Block) else {
            return Ok(());
        };
        if !has_no_statements(block) {
            return Ok(());
        }
        if Self::parameter_name(node).is_some_and(|n| self.exemption_variables.is_match(n)) {
            return Ok(());
        }
        let comment = brace_interior(block, ctx.source())
            .as_deref()
            .and_then(first_comment);
        let documented = comment.is_some_and(|c| self.comment_format.is_match(&c));
        if !documented {
            ctx.report(node.line(), node.column(), "catch.empty");
        }
        Ok(())
    }
}
