use crate::{
    node::{NodeKind, Span, SyntaxNode},
    program::Program,
    types::{FileId, NodeId, ResolvedType, SourceFile, Symbol, SymbolId, TypeId},
};

/// Incrementally assembles a [`Program`].
///
/// Front-end adapters use it to translate their own trees; tests use it to
/// describe small declaration graphs without writing snapshot JSON by hand.
/// Ids handed out by one builder are only meaningful for the program it
/// finishes.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    program: Program,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty file together with its `SourceFile` root node.
    pub fn file(&mut self, name: &str) -> FileId {
        let file = FileId(self.program.files.len() as u32);
        let root = self.push_node(SyntaxNode::new(NodeKind::SourceFile, file, None));
        self.program.files.push(SourceFile {
            name: name.to_string(),
            text: String::new(),
            root,
        });
        file
    }

    pub fn root(&self, file: FileId) -> NodeId {
        self.program.files[file.index()].root
    }

    /// Appends `text` to the file and returns the span it now occupies.
    pub fn push_text(&mut self, file: FileId, text: &str) -> Span {
        let source = &mut self.program.files[file.index()].text;
        let pos = source.len();
        source.push_str(text);
        Span::new(pos, source.len())
    }

    /// Adds a child node under `parent`, in the same file.
    pub fn add_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let file = self.program.nodes[parent.index()].file;
        let id = self.push_node(SyntaxNode::new(kind, file, Some(parent)));
        self.program.nodes[parent.index()].children.push(id);
        id
    }

    /// Adds a child of `decl` and makes it the declaration's type annotation.
    /// For shapes without an annotation slot the child is added unlinked.
    pub fn annotate(&mut self, decl: NodeId, kind: NodeKind) -> NodeId {
        let child = self.add_node(decl, kind);
        if let Some(slot) = self.program.nodes[decl.index()].kind.type_annotation_mut() {
            *slot = Some(child);
        }
        child
    }

    /// Adds the initializer of an enum member.
    pub fn set_initializer(&mut self, member: NodeId, kind: NodeKind) -> NodeId {
        let child = self.add_node(member, kind);
        if let NodeKind::EnumMember { initializer } = &mut self.program.nodes[member.index()].kind {
            *initializer = Some(child);
        }
        child
    }

    pub fn set_span(&mut self, node: NodeId, span: Span) {
        self.program.nodes[node.index()].span = Some(span);
    }

    pub fn set_type(&mut self, node: NodeId, ty: TypeId) {
        self.program.nodes[node.index()].ty = Some(ty);
    }

    pub fn add_type(&mut self, ty: ResolvedType) -> TypeId {
        let id = TypeId(self.program.types.len() as u32);
        self.program.types.push(ty);
        id
    }

    pub fn add_symbol(&mut self, name: &str) -> SymbolId {
        let id = SymbolId(self.program.symbols.len() as u32);
        self.program.symbols.push(Symbol {
            name:         name.to_string(),
            declarations: Vec::new(),
        });
        id
    }

    pub fn declare(&mut self, symbol: SymbolId, decl: NodeId) {
        self.program.symbols[symbol.index()].declarations.push(decl);
    }

    pub fn finish(self) -> Program {
        self.program
    }

    fn push_node(&mut self, node: SyntaxNode) -> NodeId {
        let id = NodeId(self.program.nodes.len() as u32);
        self.program.nodes.push(node);
        id
    }
}
