//! Shared tree-walking helpers for check implementations.

use treelint_core::{Kind, NodeRef};

/// One textual type reference extracted from a `TYPE` subtree: the dotted
/// name plus one `[]` per array declarator, and the reference's position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Dotted name including any `[]` suffixes (e.g. `java.util.HashMap`,
    /// `String[]`).
    pub name: String,
    /// 1-based line of the reference.
    pub line: usize,
    /// 1-based column of the reference.
    pub column: usize,
}

impl TypeRef {
    /// The last dot segment, array suffix kept (`SQLException[]` for
    /// `java.sql.SQLException[]`).
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// Extracts every type reference in a `TYPE` subtree, outermost first, then
/// each generic type argument in source order, recursively.
///
/// Union alternatives (multi-catch) are not descended here; split them with
/// [`catch_alternatives`] first.
#[must_use]
pub fn type_references(ty: NodeRef<'_>) -> Vec<TypeRef> {
    let mut out = Vec::new();
    collect_type(ty, &mut out);
    out
}

fn collect_type(ty: NodeRef<'_>, out: &mut Vec<TypeRef>) {
    let mut name = String::new();
    let mut arrays = 0;
    let mut argument_lists = Vec::new();

    for child in ty.children() {
        match child.kind() {
            Kind::Ident => {
                if name.is_empty() {
                    name = child.text().unwrap_or_default().to_owned();
                }
            }
            Kind::Dot => name = dotted_name(child),
            Kind::ArrayDeclarator => arrays += 1,
            Kind::TypeArguments => argument_lists.push(child),
            _ => {}
        }
    }

    if !name.is_empty() {
        for _ in 0..arrays {
            name.push_str("[]");
        }
        out.push(TypeRef {
            name,
            line: ty.line(),
            column: ty.column(),
        });
    }

    for args in argument_lists {
        for arg in args.children().filter(|c| c.kind() == Kind::Type) {
            collect_type(arg, out);
        }
    }
}

/// Joins a `DOT` subtree into its dotted source text.
#[must_use]
pub fn dotted_name(node: NodeRef<'_>) -> String {
    match node.kind() {
        Kind::Ident => node.text().unwrap_or_default().to_owned(),
        Kind::Dot => {
            let mut parts = node.children().map(dotted_name);
            let head = parts.next().unwrap_or_default();
            parts.fold(head, |acc, p| format!("{acc}.{p}"))
        }
        _ => String::new(),
    }
}

/// The alternative `TYPE` nodes of a catch clause, in source order.
///
/// A multi-catch parameter's `TYPE` holds one child `TYPE` per alternative;
/// a plain catch yields the parameter type itself.
#[must_use]
pub fn catch_alternatives<'t>(catch: NodeRef<'t>) -> Vec<NodeRef<'t>> {
    let Some(param) = catch.find_child(Kind::ParameterDef) else {
        return Vec::new();
    };
    let Some(ty) = param.find_child(Kind::Type) else {
        return Vec::new();
    };
    let unions: Vec<NodeRef<'t>> = ty.children().filter(|c| c.kind() == Kind::Type).collect();
    if unions.is_empty() {
        vec![ty]
    } else {
        unions
    }
}

/// Modifier keywords of a declaration (the `IDENT` leaves of its `MODIFIERS`
/// child).
#[must_use]
pub fn modifier_names(def: NodeRef<'_>) -> Vec<String> {
    def.find_child(Kind::Modifiers)
        .map(|mods| {
            mods.children()
                .filter(|c| c.kind() == Kind::Ident)
                .filter_map(|c| c.text().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

/// Whether a declaration carries the named annotation (`@Override` etc.,
/// without the `@`).
#[must_use]
pub fn has_annotation(def: NodeRef<'_>, name: &str) -> bool {
    def.find_child(Kind::Modifiers)
        .map(|mods| {
            mods.children()
                .filter(|c| c.kind() == Kind::Annotation)
                .any(|a| {
                    a.find_child(Kind::Ident)
                        .and_then(|i| i.text())
                        .is_some_and(|t| t == name)
                })
        })
        .unwrap_or(false)
}

/// The declared name of a definition node (its first `IDENT` child).
#[must_use]
pub fn declared_name<'t>(def: NodeRef<'t>) -> Option<&'t str> {
    def.find_child(Kind::Ident).and_then(|i| i.text())
}

/// Whether any ancestor of `node` has one of the given kinds.
#[must_use]
pub fn has_ancestor_kind(node: NodeRef<'_>, kinds: &[Kind]) -> bool {
    node.ancestors().any(|a| kinds.contains(&a.kind()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{dotted, type_with_name};
    use treelint_core::TreeBuilder;

    #[test]
    fn extracts_simple_and_qualified_names() {
        let mut b = TreeBuilder::new(Kind::CompilationUnit, 1, 1);
        let ty = b.node(b.root(), Kind::Type, 3, 9);
        dotted(&mut b, ty, 3, 9, "java.util.HashMap");
        let tree = b.build();

        let refs = type_references(tree.root().find_child(Kind::Type).unwrap());
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "java.util.HashMap");
        assert_eq!(refs[0].simple_name(), "HashMap");
        assert_eq!((refs[0].line, refs[0].column), (3, 9));
    }

    #[test]
    fn array_suffix_is_part_of_the_name() {
        let mut b = TreeBuilder::new(Kind::CompilationUnit, 1, 1);
        let ty = b.node(b.root(), Kind::Type, 2, 5);
        dotted(&mut b, ty, 2, 5, "String");
        b.node(ty, Kind::ArrayDeclarator, 2, 11);
        b.node(ty, Kind::ArrayDeclarator, 2, 13);
        let tree = b.build();

        let refs = type_references(tree.root().find_child(Kind::Type).unwrap());
        assert_eq!(refs[0].name, "String[][]");
        assert_eq!(refs[0].simple_name(), "String[][]");
    }

    #[test]
    fn generic_arguments_are_enumerated_in_order() {
        // Map<String, HashSet>
        let mut b = TreeBuilder::new(Kind::CompilationUnit, 1, 1);
        let ty = b.node(b.root(), Kind::Type, 4, 5);
        dotted(&mut b, ty, 4, 5, "Map");
        let args = b.node(ty, Kind::TypeArguments, 4, 8);
        type_with_name(&mut b, args, 4, 9, "String");
        type_with_name(&mut b, args, 4, 17, "HashSet");
        let tree = b.build();

        let refs = type_references(tree.root().find_child(Kind::Type).unwrap());
        let names: Vec<&str> = refs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Map", "String", "HashSet"]);
    }

    #[test]
    fn splits_multi_catch_alternatives() {
        let mut b = TreeBuilder::new(Kind::CompilationUnit, 1, 1);
        let catch = b.node(b.root(), Kind::Catch, 5, 5);
        let param = b.node(catch, Kind::ParameterDef, 5, 12);
        let union = b.node(param, Kind::Type, 5, 12);
        type_with_name(&mut b, union, 5, 12, "IOException");
        type_with_name(&mut b, union, 5, 26, "SQLException");
        b.leaf(param, Kind::Ident, 5, 39, "e");
        let tree = b.build();

        let catch = tree.root().find_child(Kind::Catch).unwrap();
        let alts = catch_alternatives(catch);
        assert_eq!(alts.len(), 2);
        assert_eq!(type_references(alts[0])[0].name, "IOException");
        assert_eq!(type_references(alts[1])[0].name, "SQLException");
    }

    #[test]
    fn plain_catch_yields_its_own_type() {
        let mut b = TreeBuilder::new(Kind::CompilationUnit, 1, 1);
        let catch = b.node(b.root(), Kind::Catch, 2, 3);
        let param = b.node(catch, Kind::ParameterDef, 2, 10);
        type_with_name(&mut b, param, 2, 10, "Exception");
        b.leaf(param, Kind::Ident, 2, 20, "e");
        let tree = b.build();

        let catch = tree.root().find_child(Kind::Catch).unwrap();
        let alts = catch_alternatives(catch);
        assert_eq!(alts.len(), 1);
        assert_eq!(type_references(alts[0])[0].name, "Exception");
    }

    #[test]
    fn reads_modifiers_and_annotations() {
        let mut b = TreeBuilder::new(Kind::CompilationUnit, 1, 1);
        let method = b.node(b.root(), Kind::MethodDef, 3, 5);
        let mods = b.node(method, Kind::Modifiers, 3, 5);
        b.leaf(mods, Kind::Ident, 3, 5, "public");
        let ann = b.node(mods, Kind::Annotation, 2, 5);
        b.leaf(ann, Kind::Ident, 2, 6, "Override");
        let tree = b.build();

        let method = tree.root().find_child(Kind::MethodDef).unwrap();
        assert_eq!(modifier_names(method), vec!["public".to_owned()]);
        assert!(has_annotation(method, "Override"));
        assert!(!has_annotation(method, "Deprecated"));
    }
}
