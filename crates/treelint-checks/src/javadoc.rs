//! Javadoc tag scanning: block-tag detection with verbatim-region tracking,
//! and `@param` correspondence against declared parameters.
//!
//! The hard part is that `{@code …}`, `{@literal …}`, and `{@snippet …}`
//! regions may span lines and nest braces (`{@code Map<String, List<String>>
//! m = new HashMap<>() {{ }};}`), and nothing inside them is a block tag. The
//! scanner walks the comment character by character with a brace-depth
//! counter; a naive "find the next `}`" is exactly what it must not do.

use std::collections::HashSet;
use treelint_core::{
    Check, CheckContext, CheckError, CheckOptions, ConfigError, FileSource, Kind, NodeRef,
};

/// Check name for javadoc-tags.
pub const NAME: &str = "javadoc-tags";

const KNOWN_TAGS: &[&str] = &[
    "param",
    "return",
    "throws",
    "exception",
    "see",
    "since",
    "author",
    "version",
    "deprecated",
    "serial",
    "serialData",
    "serialField",
    "hidden",
    "uses",
    "provides",
];

const VERBATIM_TAGS: &[&str] = &["code", "literal", "snippet"];

/// Raw text of one `/** … */` block plus its starting position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavadocComment {
    /// The comment text from `/**` through `*/`, lines joined with `\n`.
    pub text: String,
    /// 1-based line of the `/**`.
    pub line: usize,
    /// 1-based column of the `/**`.
    pub column: usize,
}

/// One block tag (`@name …`) found outside every verbatim region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTag {
    /// Tag name without the `@`.
    pub name: String,
    /// Rest of the tag's line, trimmed.
    pub arg: String,
    /// 1-based absolute line of the `@`.
    pub line: usize,
    /// 1-based absolute column of the `@`.
    pub column: usize,
}

/// Finds the doc comment ending immediately above a declaration, skipping
/// blank lines and annotation lines between them.
#[must_use]
pub fn javadoc_before(source: &FileSource, decl_line: usize) -> Option<JavadocComment> {
    let mut end = decl_line.checked_sub(1)?;
    loop {
        let line = source.line(end)?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('@') {
            end = end.checked_sub(1)?;
            continue;
        }
        if trimmed.ends_with("*/") {
            break;
        }
        return None;
    }

    let mut start = end;
    loop {
        let line = source.line(start)?;
        if let Some(byte) = line.find("/**") {
            let column = line[..byte].chars().count() + 1;
            let mut text = line[byte..].to_owned();
            for n in (start + 1)..=end {
                text.push('\n');
                text.push_str(source.line(n).unwrap_or_default());
            }
            return Some(JavadocComment {
                text,
                line: start,
                column,
            });
        }
        start = start.checked_sub(1)?;
        if start == 0 {
            return None;
        }
    }
}

/// True when the `{` at `open` starts a verbatim inline tag (whitespace is
/// allowed between the brace and the `@`). The lookahead stays on one line.
fn is_verbatim_opener(chars: &[char], open: usize) -> bool {
    let mut i = open + 1;
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    if i >= chars.len() || chars[i] != '@' {
        return false;
    }
    i += 1;
    let start = i;
    while i < chars.len() && chars[i].is_alphanumeric() {
        i += 1;
    }
    let word: String = chars[start..i].iter().collect();
    VERBATIM_TAGS.contains(&word.as_str())
}

/// Scans a comment for block tags, honoring verbatim regions.
///
/// State carries across lines: an unterminated region runs to the end of the
/// comment and suppresses every later would-be tag, which is also the
/// graceful answer for a bare unmatched `{`-as-verbatim-opener.
#[must_use]
pub fn scan_block_tags(comment: &JavadocComment) -> Vec<BlockTag> {
    let mut tags = Vec::new();
    let mut verbatim_depth = 0usize;

    for (rel, raw_line) in comment.text.split('\n').enumerate() {
        let chars: Vec<char> = raw_line.chars().collect();
        let content_start = content_start(&chars, rel == 0);

        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            let escaped = i > 0 && chars[i - 1] == '\\';
            if c == '{' && !escaped {
                if verbatim_depth > 0 {
                    verbatim_depth += 1;
                } else if is_verbatim_opener(&chars, i) {
                    verbatim_depth = 1;
                }
            } else if c == '}' && !escaped {
                verbatim_depth = verbatim_depth.saturating_sub(1);
            } else if c == '@' && Some(i) == content_start && verbatim_depth == 0 {
                let word_start = i + 1;
                let mut word_end = word_start;
                while word_end < chars.len() && chars[word_end].is_alphanumeric() {
                    word_end += 1;
                }
                if word_end > word_start {
                    let name: String = chars[word_start..word_end].iter().collect();
                    let arg: String =
                        chars[word_end..].iter().collect::<String>().trim().to_owned();
                    let line = comment.line + rel;
                    let column = if rel == 0 { comment.column + i } else { i + 1 };
                    tags.push(BlockTag {
                        name,
                        arg,
                        line,
                        column,
                    });
                }
            }
            i += 1;
        }
    }
    tags
}

/// Index of the first character after leading whitespace and `*` decoration
/// (and after the `/**` itself on the opening line).
fn content_start(chars: &[char], opening_line: bool) -> Option<usize> {
    let mut i = 0;
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    if opening_line && chars[i..].starts_with(&['/', '*', '*']) {
        i += 3;
    } else {
        while i < chars.len() && chars[i] == '*' {
            i += 1;
        }
    }
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    (i < chars.len()).then_some(i)
}

/// Validates Javadoc block tags on declarations: unknown tag names, and
/// `@param` correspondence for generic type parameters, method/constructor
/// parameters, and record components.
pub struct JavadocTagsCheck {
    allow_missing_param_tags: bool,
    known_tags: HashSet<String>,
}

impl Default for JavadocTagsCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl JavadocTagsCheck {
    /// Creates the check with its default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allow_missing_param_tags: false,
            known_tags: KNOWN_TAGS.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    /// The parameter names a declaration's Javadoc must cover: `<T>` entries
    /// for generic type parameters, plain names for value parameters and
    /// record components. A compact constructor documents its record's
    /// components.
    fn declared_params(node: NodeRef<'_>) -> Vec<String> {
        let mut declared = Vec::new();

        if let Some(type_params) = node.find_child(Kind::TypeParameters) {
            for tp in type_params
                .children()
                .filter(|c| c.kind() == Kind::TypeParameter)
            {
                if let Some(name) = tp.find_child(Kind::Ident).and_then(|i| i.text()) {
                    declared.push(format!("<{name}>"));
                }
            }
        }

        if let Some(params) = node.find_child(Kind::Parameters) {
            for p in params.children().filter(|c| c.kind() == Kind::ParameterDef) {
                if let Some(name) = p.find_child(Kind::Ident).and_then(|i| i.text()) {
                    declared.push(name.to_owned());
                }
            }
        }

        let components_holder = match node.kind() {
            Kind::RecordDef => Some(node),
            Kind::CompactCtorDef => node.parent().filter(|p| p.kind() == Kind::RecordDef),
            _ => None,
        };
        if let Some(holder) = components_holder {
            if let Some(components) = holder.find_child(Kind::RecordComponents) {
                for c in components
                    .children()
                    .filter(|c| c.kind() == Kind::RecordComponent)
                {
                    if let Some(name) = c.find_child(Kind::Ident).and_then(|i| i.text()) {
                        declared.push(name.to_owned());
                    }
                }
            }
        }

        declared
    }

    /// The `<T>` or plain-name target of a `@param` tag's argument.
    fn param_target(arg: &str) -> Option<String> {
        let arg = arg.trim_start();
        if let Some(rest) = arg.strip_prefix('<') {
            let inner: String = rest.chars().take_while(|c| *c != '>').collect();
            if inner.is_empty() {
                return None;
            }
            return Some(format!("<{inner}>"));
        }
        let word: String = arg
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        (!word.is_empty()).then_some(word)
    }
}

impl Check for JavadocTagsCheck {
    fn name(&self) -> &'static str {
        NAME
    }

    fn acceptable_kinds(&self) -> &'static [Kind] {
        &[
            Kind::ClassDef,
            Kind::InterfaceDef,
            Kind::EnumDef,
            Kind::RecordDef,
            Kind::MethodDef,
            Kind::CtorDef,
            Kind::CompactCtorDef,
        ]
    }

    fn configure(&mut self, options: &CheckOptions<'_>) -> Result<(), ConfigError> {
        self.allow_missing_param_tags =
            options.get_bool("allowMissingParamTags", self.allow_missing_param_tags)?;
        if let Some(extra) = options.get_str_list("additionalTags")? {
            self.known_tags.extend(extra);
        }
        Ok(())
    }

    fn enter(&mut self, node: NodeRef<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if !self.acceptable_kinds().contains(&node.kind()) {
            return Err(CheckError::unsupported(node));
        }
        let Some(comment) = javadoc_before(ctx.source(), node.line()) else {
            return Ok(());
        };
        let tags = scan_block_tags(&comment);

        for tag in &tags {
            if !self.known_tags.contains(&tag.name) {
                ctx.report_with(tag.line, tag.column, "javadoc.unknownTag", [tag.name.clone()]);
            }
        }

        let declared = Self::declared_params(node);
        let mut documented: Vec<String> = Vec::new();
        for tag in tags.iter().filter(|t| t.name == "param") {
            let Some(target) = Self::param_target(&tag.arg) else {
                continue;
            };
            if !declared.contains(&target) {
                ctx.report_with(tag.line, tag.column, "javadoc.unusedTag", [target.clone()]);
            }
            documented.push(target);
        }
        if !self.allow_missing_param_tags {
            for want in &declared {
                if !documented.contains(want) {
                    ctx.report_with(
                        node.line(),
                        node.column(),
                        "javadoc.missingParamTag",
                        [want.clone()],
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::run_check;
    use treelint_core::{SyntaxTree, TreeBuilder};

    fn comment(text: &str) -> JavadocComment {
        JavadocComment {
            text: text.to_owned(),
            line: 1,
            column: 1,
        }
    }

    fn tag_names(text: &str) -> Vec<String> {
        scan_block_tags(&comment(text))
            .into_iter()
            .map(|t| t.name)
            .collect()
    }

    #[test]
    fn finds_plain_block_tags() {
        let names = tag_names("/**\n * Widget factory.\n * @param size the size\n * @return a widget\n */");
        assert_eq!(names, vec!["param".to_owned(), "return".to_owned()]);
    }

    #[test]
    fn code_region_suppresses_tags() {
        let names = tag_names("/** {@code @NotReal class X {} } */");
        assert!(names.is_empty());
    }

    #[test]
    fn nested_braces_inside_code_are_balanced() {
        let names = tag_names(
            "/**\n * {@code Map<String, List<String>> m = new HashMap<>() {{ }};}\n * @since 1.2\n */",
        );
        assert_eq!(names, vec!["since".to_owned()]);
    }

    #[test]
    fn multi_line_code_region_swallows_inner_lines() {
        let names = tag_names(
            "/**\n * {@code\n * @notatag\n * }\n * @see Widget\n */",
        );
        assert_eq!(names, vec!["see".to_owned()]);
    }

    #[test]
    fn bare_brace_does_not_open_a_region() {
        let tags = scan_block_tags(&comment("/** text {  \n * @unknown \n */"));
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "unknown");
        assert_eq!(tags[0].line, 2);
    }

    #[test]
    fn link_is_not_verbatim() {
        let names = tag_names("/**\n * {@link Widget}\n * @return it\n */");
        assert_eq!(names, vec!["return".to_owned()]);
    }

    #[test]
    fn empty_code_tag_closes_immediately() {
        let names = tag_names("/** {@code} \n * @since 2\n */");
        assert_eq!(names, vec!["since".to_owned()]);
    }

    #[test]
    fn unterminated_region_runs_to_comment_end() {
        let names = tag_names("/**\n * {@code Map<K, V> m;\n * @param x\n */");
        assert!(names.is_empty());
    }

    #[test]
    fn literal_and_snippet_also_open_regions() {
        let names = tag_names("/** {@literal a < b }\n * {@snippet :\n * @main\n * }\n * @since 3\n */");
        assert_eq!(names, vec!["since".to_owned()]);
    }

    #[test]
    fn tag_positions_are_absolute() {
        let c = JavadocComment {
            text: "/**\n     * @param x the x\n     */".to_owned(),
            line: 10,
            column: 5,
        };
        let tags = scan_block_tags(&c);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].line, 11);
        assert_eq!(tags[0].column, 8);
        assert_eq!(tags[0].arg, "x the x");
    }

    // --- extraction ---

    #[test]
    fn extracts_comment_above_declaration() {
        let source = treelint_core::FileSource::new(
            "T.java",
            "package p;\n\n/**\n * A widget.\n */\n@Deprecated\npublic class Widget {}\n",
        );
        let c = javadoc_before(&source, 7).unwrap();
        assert_eq!(c.line, 3);
        assert_eq!(c.column, 1);
        assert!(c.text.starts_with("/**"));
        assert!(c.text.ends_with("*/"));
    }

    #[test]
    fn no_comment_means_none() {
        let source = treelint_core::FileSource::new(
            "T.java",
            "package p;\n\nint x;\npublic class Widget {}\n",
        );
        assert!(javadoc_before(&source, 4).is_none());
    }

    // --- the check ---

    fn class_with_type_params(names: &[&str], decl_line: usize) -> SyntaxTree {
        let mut b = TreeBuilder::new(Kind::CompilationUnit, 1, 1);
        let class = b.node(b.root(), Kind::ClassDef, decl_line, 1);
        b.leaf(class, Kind::Ident, decl_line, 14, "Foo");
        let tps = b.node(class, Kind::TypeParameters, decl_line, 17);
        let mut col = 18;
        for name in names {
            let tp = b.node(tps, Kind::TypeParameter, decl_line, col);
            b.leaf(tp, Kind::Ident, decl_line, col, name);
            col += name.len() + 2;
        }
        b.build()
    }

    #[test]
    fn missing_type_param_tag_is_reported_once() {
        let content = "/**\n * A pair.\n * @param <A> the first\n */\npublic class Foo<A, B> {}\n";
        let tree = class_with_type_params(&["A", "B"], 5);
        let violations = run_check(JavadocTagsCheck::new(), &tree, content);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].key, "javadoc.missingParamTag");
        assert_eq!(violations[0].args, vec!["<B>".to_owned()]);
        assert_eq!(violations[0].line, 5);
    }

    #[test]
    fn undeclared_type_param_tag_is_unused() {
        let content =
            "/**\n * @param <A> the first\n * @param <B> the second\n * @param <C> extra\n */\npublic class Foo<A, B> {}\n";
        let tree = class_with_type_params(&["A", "B"], 6);
        let violations = run_check(JavadocTagsCheck::new(), &tree, content);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].key, "javadoc.unusedTag");
        assert_eq!(violations[0].args, vec!["<C>".to_owned()]);
        assert_eq!(violations[0].line, 4);
    }

    #[test]
    fn unknown_tag_reported_with_name() {
        let content = "/**\n * @returns the thing\n */\npublic class Foo {}\n";
        let tree = class_with_type_params(&[], 4);
        let violations = run_check(JavadocTagsCheck::new(), &tree, content);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].key, "javadoc.unknownTag");
        assert_eq!(violations[0].args, vec!["returns".to_owned()]);
    }

    #[test]
    fn verbatim_pseudo_tags_do_not_trip_the_check() {
        let content = "/** {@code @NotReal class X {} } */\npublic class Foo {}\n";
        let tree = class_with_type_params(&[], 2);
        assert!(run_check(JavadocTagsCheck::new(), &tree, content).is_empty());
    }

    fn method_with_params(names: &[&str], decl_line: usize) -> SyntaxTree {
        let mut b = TreeBuilder::new(Kind::CompilationUnit, 1, 1);
        let method = b.node(b.root(), Kind::MethodDef, decl_line, 5);
        b.leaf(method, Kind::Ident, decl_line, 10, "run");
        let params = b.node(method, Kind::Parameters, decl_line, 13);
        let mut col = 14;
        for name in names {
            let p = b.node(params, Kind::ParameterDef, decl_line, col);
            crate::fixtures::type_with_name(&mut b, p, decl_line, col, "int");
            b.leaf(p, Kind::Ident, decl_line, col + 4, name);
            col += name.len() + 7;
        }
        b.build()
    }

    #[test]
    fn method_params_follow_the_same_correspondence() {
        let content = "/**\n * @param x the x\n */\nvoid run(int x, int y) {}\n";
        let tree = method_with_params(&["x", "y"], 4);
        let violations = run_check(JavadocTagsCheck::new(), &tree, content);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].key, "javadoc.missingParamTag");
        assert_eq!(violations[0].args, vec!["y".to_owned()]);
    }

    #[test]
    fn allow_missing_param_tags_suppresses_missing_only() {
        let content = "/**\n * @param z stray\n */\nvoid run(int x) {}\n";
        let tree = method_with_params(&["x"], 4);
        let violations = crate::fixtures::run_configured(
            JavadocTagsCheck::new(),
            "[checks.javadoc-tags]\nallowMissingParamTags = true\n",
            &tree,
            content,
        )
        .unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].key, "javadoc.unusedTag");
    }

    fn record_with_components(names: &[&str], decl_line: usize, compact_ctor: bool) -> SyntaxTree {
        let mut b = TreeBuilder::new(Kind::CompilationUnit, 1, 1);
        let record = b.node(b.root(), Kind::RecordDef, decl_line, 1);
        b.leaf(record, Kind::Ident, decl_line, 15, "Point");
        let comps = b.node(record, Kind::RecordComponents, decl_line, 20);
        let mut col = 21;
        for name in names {
            let c = b.node(comps, Kind::RecordComponent, decl_line, col);
            crate::fixtures::type_with_name(&mut b, c, decl_line, col, "int");
            b.leaf(c, Kind::Ident, decl_line, col + 4, name);
            col += name.len() + 7;
        }
        if compact_ctor {
            let ctor = b.node(record, Kind::CompactCtorDef, decl_line + 4, 5);
            b.leaf(ctor, Kind::Ident, decl_line + 4, 12, "Point");
        }
        b.build()
    }

    #[test]
    fn record_components_validate_like_parameters() {
        let content = "/**\n * @param x the x\n */\npublic record Point(int x, int y) {}\n";
        let tree = record_with_components(&["x", "y"], 4, false);
        let violations = run_check(JavadocTagsCheck::new(), &tree, content);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].args, vec!["y".to_owned()]);
    }

    #[test]
    fn compact_ctor_documents_the_records_components() {
        // Compact ctor at line 8; its record declares component `x`.
        let content = "public record Point(int x) {\n\n\n\n    /**\n     * @param x the x\n     */\n    Point {\n    }\n}\n";
        let tree = record_with_components(&["x"], 4, true);
        let violations = run_check(JavadocTagsCheck::new(), &tree, content);
        assert!(violations.is_empty());
    }
}
