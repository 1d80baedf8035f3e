//! Hand-built tree fixtures and engine helpers shared by the unit tests.

use treelint_core::{
    Check, Config, Engine, EngineError, FileSource, Kind, NodeId, SyntaxTree, TreeBuilder,
    Violation,
};

/// Builds an `IDENT` leaf or a `DOT` chain for a possibly-qualified name.
pub(crate) fn dotted(
    b: &mut TreeBuilder,
    parent: NodeId,
    line: usize,
    col: usize,
    path: &str,
) -> NodeId {
    match path.rsplit_once('.') {
        None => b.leaf(parent, Kind::Ident, line, col, path),
        Some((qualifier, last)) => {
            let dot = b.node(parent, Kind::Dot, line, col);
            dotted(b, dot, line, col, qualifier);
            b.leaf(dot, Kind::Ident, line, col + qualifier.len() + 1, last);
            dot
        }
    }
}

/// Builds a `TYPE` node containing a possibly-qualified name.
pub(crate) fn type_with_name(
    b: &mut TreeBuilder,
    parent: NodeId,
    line: usize,
    col: usize,
    name: &str,
) -> NodeId {
    let ty = b.node(parent, Kind::Type, line, col);
    dotted(b, ty, line, col, name);
    ty
}

/// Runs one check with default configuration over a tree and raw content.
pub(crate) fn run_check<C: Check + 'static>(
    check: C,
    tree: &SyntaxTree,
    content: &str,
) -> Vec<Violation> {
    run_configured(check, "", tree, content).unwrap()
}

/// Runs one check with the given TOML configuration.
pub(crate) fn run_configured<C: Check + 'static>(
    check: C,
    config: &str,
    tree: &SyntaxTree,
    content: &str,
) -> Result<Vec<Violation>, EngineError> {
    let config = Config::parse(config).map_err(EngineError::from)?;
    let mut engine = Engine::builder().check(check).config(config).build()?;
    let source = FileSource::new("Test.java", content);
    engine.run_file(tree, &source)
}

/// An empty compilation unit, for file-level checks.
pub(crate) fn empty_tree() -> SyntaxTree {
    TreeBuilder::new(Kind::CompilationUnit, 1, 1).build()
}
