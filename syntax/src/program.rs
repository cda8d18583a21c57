use crate::{
    node::SyntaxNode,
    traits::TypeOracle,
    types::{FileId, NodeId, ResolvedType, SourceFile, Symbol, SymbolId, TypeId},
};
use serde::{Deserialize, Serialize};

/// A complete snapshot of what the front end knows: every file, node, type
/// and symbol, each addressed by its index.
///
/// This is the format the `protodts` CLI reads from disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub files:   Vec<SourceFile>,
    #[serde(default)]
    pub nodes:   Vec<SyntaxNode>,
    #[serde(default)]
    pub types:   Vec<ResolvedType>,
    #[serde(default)]
    pub symbols: Vec<Symbol>,
}

impl Program {
    pub fn find_file(&self, name: &str) -> Option<FileId> {
        self.files
            .iter()
            .position(|f| f.name == name || f.base_name() == name)
            .map(|i| FileId(i as u32))
    }

    pub fn file_ids(&self) -> impl Iterator<Item = FileId> {
        (0..self.files.len() as u32).map(FileId)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }
}

impl TypeOracle for Program {
    fn file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.index())
    }

    fn node(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.index())
    }

    fn resolved_type(&self, id: TypeId) -> Option<&ResolvedType> {
        self.types.get(id.index())
    }

    fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }
}
