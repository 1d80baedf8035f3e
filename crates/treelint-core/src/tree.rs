//! Token-typed syntax tree model.
//!
//! Trees are produced by an external parser and handed to the engine as an
//! arena of positioned, kind-tagged nodes. Checks traverse them through
//! [`NodeRef`] handles; the tree itself is immutable after [`TreeBuilder::build`].

/// Syntactic category of a tree node.
///
/// A closed set: the external parser maps its grammar onto these kinds, and
/// checks declare interest in them. Each kind has a stable `UPPER_SNAKE` wire
/// name used in configuration (`tokens = ["CLASS_DEF"]`) and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum Kind {
    /// Root of a parsed file.
    CompilationUnit,
    /// `class` declaration.
    ClassDef,
    /// `interface` declaration.
    InterfaceDef,
    /// `enum` declaration.
    EnumDef,
    /// `record` declaration.
    RecordDef,
    /// Annotation type declaration.
    AnnotationDef,
    /// Method declaration.
    MethodDef,
    /// Constructor declaration.
    CtorDef,
    /// Compact record constructor declaration.
    CompactCtorDef,
    /// Field or local variable declaration.
    VariableDef,
    /// Single formal parameter.
    ParameterDef,
    /// Formal parameter list.
    Parameters,
    /// Record component list.
    RecordComponents,
    /// Single record component.
    RecordComponent,
    /// Generic type parameter list (`<T, U>`).
    TypeParameters,
    /// Single generic type parameter.
    TypeParameter,
    /// Type reference.
    Type,
    /// Generic type argument list.
    TypeArguments,
    /// One `[]` pair on an array type.
    ArrayDeclarator,
    /// Modifier list of a declaration.
    Modifiers,
    /// Annotation use (`@Foo`).
    Annotation,
    /// `try` statement.
    Try,
    /// `catch` clause.
    Catch,
    /// `finally` clause.
    Finally,
    /// Brace-delimited statement block.
    Block,
    /// Closing `}` of a block.
    RCurly,
    /// `throws` clause of a method or constructor.
    Throws,
    /// `if` statement.
    If,
    /// `else` branch.
    Else,
    /// `while` statement.
    While,
    /// `for` statement.
    For,
    /// Expression statement.
    ExpressionStatement,
    /// String literal token, text includes the surrounding quotes.
    StringLiteral,
    /// Multi-line text block token, text includes the `"""` delimiters.
    TextBlock,
    /// Numeric literal token.
    NumericLiteral,
    /// Identifier token.
    Ident,
    /// Qualified-name dot; children are the qualifier and the member ident.
    Dot,
}

impl Kind {
    const ALL: [Self; 37] = [
        Self::CompilationUnit,
        Self::ClassDef,
        Self::InterfaceDef,
        Self::EnumDef,
        Self::RecordDef,
        Self::AnnotationDef,
        Self::MethodDef,
        Self::CtorDef,
        Self::CompactCtorDef,
        Self::VariableDef,
        Self::ParameterDef,
        Self::Parameters,
        Self::RecordComponents,
        Self::RecordComponent,
        Self::TypeParameters,
        Self::TypeParameter,
        Self::Type,
        Self::TypeArguments,
        Self::ArrayDeclarator,
        Self::Modifiers,
        Self::Annotation,
        Self::Try,
        Self::Catch,
        Self::Finally,
        Self::Block,
        Self::RCurly,
        Self::Throws,
        Self::If,
        Self::Else,
        Self::While,
        Self::For,
        Self::ExpressionStatement,
        Self::StringLiteral,
        Self::TextBlock,
        Self::NumericLiteral,
        Self::Ident,
        Self::Dot,
    ];

    /// Returns the stable wire name of this kind (e.g. `"CLASS_DEF"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CompilationUnit => "COMPILATION_UNIT",
            Self::ClassDef => "CLASS_DEF",
            Self::InterfaceDef => "INTERFACE_DEF",
            Self::EnumDef => "ENUM_DEF",
            Self::RecordDef => "RECORD_DEF",
            Self::AnnotationDef => "ANNOTATION_DEF",
            Self::MethodDef => "METHOD_DEF",
            Self::CtorDef => "CTOR_DEF",
            Self::CompactCtorDef => "COMPACT_CTOR_DEF",
            Self::VariableDef => "VARIABLE_DEF",
            Self::ParameterDef => "PARAMETER_DEF",
            Self::Parameters => "PARAMETERS",
            Self::RecordComponents => "RECORD_COMPONENTS",
            Self::RecordComponent => "RECORD_COMPONENT",
            Self::TypeParameters => "TYPE_PARAMETERS",
            Self::TypeParameter => "TYPE_PARAMETER",
            Self::Type => "TYPE",
            Self::TypeArguments => "TYPE_ARGUMENTS",
            Self::ArrayDeclarator => "ARRAY_DECLARATOR",
            Self::Modifiers => "MODIFIERS",
            Self::Annotation => "ANNOTATION",
            Self::Try => "LITERAL_TRY",
            Self::Catch => "LITERAL_CATCH",
            Self::Finally => "LITERAL_FINALLY",
            Self::Block => "BLOCK",
            Self::RCurly => "RCURLY",
            Self::Throws => "LITERAL_THROWS",
            Self::If => "LITERAL_IF",
            Self::Else => "LITERAL_ELSE",
            Self::While => "LITERAL_WHILE",
            Self::For => "LITERAL_FOR",
            Self::ExpressionStatement => "EXPR_STMT",
            Self::StringLiteral => "STRING_LITERAL",
            Self::TextBlock => "TEXT_BLOCK",
            Self::NumericLiteral => "NUM_LITERAL",
            Self::Ident => "IDENT",
            Self::Dot => "DOT",
        }
    }

    /// Resolves a wire name back to a kind.
    ///
    /// Returns `None` for names outside the closed set; configuration binding
    /// turns that into a fatal error rather than guessing.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == name)
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index of a node within its [`SyntaxTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct NodeData {
    kind: Kind,
    line: usize,
    column: usize,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An immutable parsed file: a strict rooted tree of positioned nodes.
///
/// Nodes live in an arena and are addressed by [`NodeId`]; checks work with
/// borrowed [`NodeRef`] handles instead of owning pointers, which keeps
/// parent back-references cycle-free.
#[derive(Debug)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
}

impl SyntaxTree {
    /// Returns the root node.
    #[must_use]
    pub fn root(&self) -> NodeRef<'_> {
        self.get(NodeId(0))
    }

    /// Resolves an id into a handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn get(&self, id: NodeId) -> NodeRef<'_> {
        assert!(id.index() < self.nodes.len(), "node id out of bounds");
        NodeRef { tree: self, id }
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes. Built trees always have a root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    pub(crate) fn child_ids(&self, id: NodeId) -> &[NodeId] {
        &self.data(id).children
    }
}

/// Borrowed handle to one node of a [`SyntaxTree`].
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

impl<'t> NodeRef<'t> {
    /// The node's arena id.
    #[must_use]
    pub fn id(self) -> NodeId {
        self.id
    }

    /// The node's syntactic category.
    #[must_use]
    pub fn kind(self) -> Kind {
        self.tree.data(self.id).kind
    }

    /// 1-based line of the node's first character.
    #[must_use]
    pub fn line(self) -> usize {
        self.tree.data(self.id).line
    }

    /// 1-based column of the node's first character.
    #[must_use]
    pub fn column(self) -> usize {
        self.tree.data(self.id).column
    }

    /// Literal lexeme for leaf nodes, `None` for interior nodes.
    #[must_use]
    pub fn text(self) -> Option<&'t str> {
        self.tree.data(self.id).text.as_deref()
    }

    /// Parent handle, `None` for the root.
    #[must_use]
    pub fn parent(self) -> Option<NodeRef<'t>> {
        self.tree.data(self.id).parent.map(|id| self.tree.get(id))
    }

    /// Children in source order.
    pub fn children(self) -> impl Iterator<Item = NodeRef<'t>> {
        let tree = self.tree;
        tree.data(self.id)
            .children
            .iter()
            .map(move |&id| tree.get(id))
    }

    /// Number of children.
    #[must_use]
    pub fn child_count(self) -> usize {
        self.tree.data(self.id).children.len()
    }

    /// First child of the given kind, if any.
    #[must_use]
    pub fn find_child(self, kind: Kind) -> Option<NodeRef<'t>> {
        self.children().find(|c| c.kind() == kind)
    }

    /// Last child, if any.
    #[must_use]
    pub fn last_child(self) -> Option<NodeRef<'t>> {
        let tree = self.tree;
        tree.data(self.id)
            .children
            .last()
            .map(|&id| tree.get(id))
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(self) -> impl Iterator<Item = NodeRef<'t>> {
        std::iter::successors(self.parent(), |n| n.parent())
    }

    /// Pre-order walk of this node's subtree, including the node itself.
    pub fn descendants(self) -> Descendants<'t> {
        Descendants {
            tree: self.tree,
            stack: vec![self.id],
        }
    }
}

/// Pre-order iterator over a subtree. Created by [`NodeRef::descendants`].
#[derive(Debug)]
pub struct Descendants<'t> {
    tree: &'t SyntaxTree,
    stack: Vec<NodeId>,
}

impl<'t> Iterator for Descendants<'t> {
    type Item = NodeRef<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let data = self.tree.data(id);
        self.stack.extend(data.children.iter().rev());
        Some(self.tree.get(id))
    }
}

/// Incremental constructor for a [`SyntaxTree`].
///
/// The external parser appends nodes top-down; tests build fixture trees the
/// same way. Children are attached in call order, which must be source order.
#[derive(Debug)]
pub struct TreeBuilder {
    nodes: Vec<NodeData>,
}

impl TreeBuilder {
    /// Starts a tree with the given root node.
    #[must_use]
    pub fn new(kind: Kind, line: usize, column: usize) -> Self {
        Self {
            nodes: vec![NodeData {
                kind,
                line,
                column,
                text: None,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The root's id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends an interior node under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not returned by this builder.
    pub fn node(&mut self, parent: NodeId, kind: Kind, line: usize, column: usize) -> NodeId {
        self.push(parent, kind, line, column, None)
    }

    /// Appends a leaf node with its lexeme under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not returned by this builder.
    pub fn leaf(
        &mut self,
        parent: NodeId,
        kind: Kind,
        line: usize,
        column: usize,
        text: &str,
    ) -> NodeId {
        self.push(parent, kind, line, column, Some(text.to_owned()))
    }

    fn push(
        &mut self,
        parent: NodeId,
        kind: Kind,
        line: usize,
        column: usize,
        text: Option<String>,
    ) -> NodeId {
        assert!(parent.index() < self.nodes.len(), "unknown parent node");
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or_else(|_| {
            panic!("tree exceeds u32::MAX nodes");
        }));
        self.nodes.push(NodeData {
            kind,
            line,
            column,
            text,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Finalizes the tree.
    #[must_use]
    pub fn build(self) -> SyntaxTree {
        SyntaxTree { nodes: self.nodes }
    }
}
