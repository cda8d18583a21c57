use crate::{
    node::SyntaxNode,
    types::{FileId, NodeId, ResolvedType, SourceFile, Symbol, SymbolId, TypeId},
};

/// Read access to a parsed program and the types resolved over it.
///
/// Every lookup is fallible: an id the oracle does not recognize yields
/// `None`, and callers treat that as "nothing to do" rather than an error.
pub trait TypeOracle {
    fn file(&self, id: FileId) -> Option<&SourceFile>;

    fn node(&self, id: NodeId) -> Option<&SyntaxNode>;

    fn resolved_type(&self, id: TypeId) -> Option<&ResolvedType>;

    fn symbol(&self, id: SymbolId) -> Option<&Symbol>;

    /// Type recorded at a syntax position.
    fn type_at(&self, node: NodeId) -> Option<TypeId> {
        self.node(node).and_then(|n| n.ty)
    }

    fn declarations(&self, symbol: SymbolId) -> &[NodeId] {
        self.symbol(symbol)
            .map(|s| s.declarations.as_slice())
            .unwrap_or(&[])
    }

    /// Source text of a declaration including its leading trivia.
    fn full_text(&self, decl: NodeId) -> Option<&str> {
        let node = self.node(decl)?;
        let span = node.span?;
        self.file(node.file)?.text.get(span.pos..span.end)
    }

    fn source_file_of(&self, decl: NodeId) -> Option<&SourceFile> {
        self.node(decl).and_then(|n| self.file(n.file))
    }
}
