//! Declaration extraction.
//!
//! Walks every syntax node of a root file, resolves the types written at
//! type-bearing positions, and collects the declaration text of every symbol
//! the root file depends on but does not itself declare. Spliced
//! declarations are walked in turn, so the result is closed over the whole
//! reachable declaration graph.

use crate::{config::DEFAULT_ARRAY_LIKE_TYPES, error::DtsError};
use lazy_static::lazy_static;
use protodts_syntax::{
    FileId, HeritageToken, NodeId, NodeKind, SymbolId, SyntaxNode, TypeId, TypeOracle,
};
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, trace, warn};

lazy_static! {
    static ref LIB_FILE: Regex = Regex::new(crate::config::DEFAULT_BUILTIN_FILE_PATTERN).unwrap();
}

/// Which declarations count as already visible to consumers.
#[derive(Debug, Clone)]
pub struct WalkerOptions {
    /// Matched against the base name of a declaration's file.
    pub builtin_files: Regex,
    /// Generic wrappers that are skipped in favour of their first type
    /// argument.
    pub array_like:    Vec<String>,
}

impl Default for WalkerOptions {
    fn default() -> Self {
        WalkerOptions {
            builtin_files: LIB_FILE.clone(),
            array_like:    DEFAULT_ARRAY_LIKE_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl WalkerOptions {
    pub fn is_builtin_file(&self, base_name: &str) -> bool {
        self.builtin_files.is_match(base_name)
    }

    pub fn is_array_like(&self, name: &str) -> bool {
        self.array_like.iter().any(|n| n == name)
    }
}

/// Result of one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extraction {
    /// Full text of every inlined declaration, in discovery order, each
    /// followed by a newline.
    pub text:    String,
    /// Names of non-string enums that must be replaced by opaque stubs.
    pub stubbed: Vec<String>,
}

/// Collects every declaration `root` depends on that is declared neither in
/// `root` itself nor in a built-in library file.
///
/// Fails only when the root file breaks an assumption the walk relies on,
/// such as an interface heritage clause other than `extends`.
pub fn extract<O>(root: FileId, oracle: &O, options: &WalkerOptions) -> Result<Extraction, DtsError>
where
    O: TypeOracle + ?Sized,
{
    let root_node = match oracle.file(root) {
        Some(file) => file.root,
        None => return Ok(Extraction::default()),
    };

    let mut walker = DeclarationsWalker {
        oracle,
        root,
        options,
        visited_types:   HashSet::new(),
        emitted:         HashSet::new(),
        stubbed_symbols: HashSet::new(),
        result:          Extraction::default(),
    };
    walker.visit_type_nodes(root_node)?;

    debug!(
        inlined_bytes = walker.result.text.len(),
        stubbed = walker.result.stubbed.len(),
        "extraction.complete"
    );
    Ok(walker.result)
}

struct DeclarationsWalker<'a, O: ?Sized> {
    oracle:          &'a O,
    root:            FileId,
    options:         &'a WalkerOptions,
    visited_types:   HashSet<TypeId>,
    emitted:         HashSet<NodeId>,
    stubbed_symbols: HashSet<SymbolId>,
    result:          Extraction,
}

impl<'a, O: TypeOracle + ?Sized> DeclarationsWalker<'a, O> {
    fn visit_type_nodes(&mut self, id: NodeId) -> Result<(), DtsError> {
        let oracle = self.oracle;
        let Some(node) = oracle.node(id) else {
            return Ok(());
        };

        // A node is type-bearing when it sits in its parent's annotation slot.
        if let Some(parent) = node.parent.and_then(|p| oracle.node(p)) {
            if parent.kind.type_annotation() == Some(id) {
                self.process_type_of_node(id)?;
            }
        }

        if let NodeKind::InterfaceDeclaration = node.kind {
            self.process_heritage_clauses(id, node)?;
        }

        for &child in &node.children {
            self.visit_type_nodes(child)?;
        }
        Ok(())
    }

    fn process_heritage_clauses(&mut self, id: NodeId, interface: &SyntaxNode) -> Result<(), DtsError> {
        let oracle = self.oracle;
        for &clause_id in &interface.children {
            let Some(clause) = oracle.node(clause_id) else {
                continue;
            };
            let NodeKind::HeritageClause { token } = clause.kind else {
                continue;
            };
            if token != HeritageToken::Extends {
                return Err(DtsError::UnexpectedHeritageClause {
                    token,
                    interface: declaration_name(oracle, id),
                });
            }
            for &ty in &clause.children {
                self.process_type_of_node(ty)?;
            }
        }
        Ok(())
    }

    fn process_type_of_node(&mut self, id: NodeId) -> Result<(), DtsError> {
        let oracle = self.oracle;
        let Some(node) = oracle.node(id) else {
            return Ok(());
        };

        // Every arm of a union is resolved on its own.
        if let NodeKind::UnionType = node.kind {
            for &member in &node.children {
                self.process_type_of_node(member)?;
            }
            return Ok(());
        }

        match oracle.type_at(id) {
            Some(ty) => self.process_type(ty),
            None => {
                trace!(node = %id, kind = node.kind.name(), "position has no type");
                Ok(())
            }
        }
    }

    fn process_type(&mut self, ty: TypeId) -> Result<(), DtsError> {
        if !self.visited_types.insert(ty) {
            return Ok(());
        }

        let oracle = self.oracle;
        let Some(resolved) = oracle.resolved_type(ty) else {
            return Ok(());
        };
        if resolved.is_type_parameter() {
            return Ok(());
        }
        // Primitives and anonymous types have nothing to inline.
        let Some(symbol_id) = resolved.named_symbol() else {
            return Ok(());
        };
        let Some(symbol) = oracle.symbol(symbol_id) else {
            return Ok(());
        };

        if self.options.is_array_like(&symbol.name) {
            return match resolved.type_arguments.first() {
                Some(&element) => self.process_type(element),
                None => Ok(()),
            };
        }

        for &decl in oracle.declarations(symbol_id) {
            let Some(decl_node) = oracle.node(decl) else {
                continue;
            };
            let Some(file) = oracle.file(decl_node.file) else {
                continue;
            };
            if decl_node.file == self.root || self.options.is_builtin_file(file.base_name()) {
                trace!(symbol = %symbol.name, file = %file.name, "already visible");
                return Ok(());
            }

            if let NodeKind::EnumDeclaration = decl_node.kind {
                if !is_string_enum(oracle, decl_node) {
                    if self.stubbed_symbols.insert(symbol_id) {
                        debug!(symbol = %symbol.name, "stubbing non-string enum");
                        self.result.stubbed.push(symbol.name.clone());
                    }
                    return Ok(());
                }
            }

            if !self.emitted.insert(decl) {
                continue;
            }
            let Some(text) = oracle.full_text(decl) else {
                warn!(symbol = %symbol.name, decl = %decl, "declaration has no source text");
                continue;
            };
            debug!(symbol = %symbol.name, file = %file.name, "inlining declaration");
            self.result.text.push_str(text);
            self.result.text.push('\n');

            // The spliced declaration may reference further external types.
            self.visit_type_nodes(decl)?;
        }
        Ok(())
    }
}

/// An enum is string-valued when it has members and every one of them is
/// initialized with a string literal.
pub fn is_string_enum<O: TypeOracle + ?Sized>(oracle: &O, decl: &SyntaxNode) -> bool {
    let mut members = decl
        .children
        .iter()
        .filter_map(|&id| oracle.node(id))
        .filter(|n| matches!(n.kind, NodeKind::EnumMember { .. }))
        .peekable();

    if members.peek().is_none() {
        return false;
    }
    members.all(|member| match member.kind {
        NodeKind::EnumMember { initializer: Some(init) } => {
            matches!(oracle.node(init).map(|n| &n.kind), Some(NodeKind::StringLiteral))
        }
        _ => false,
    })
}

/// Best-effort name of a declaration for error messages: the text of its
/// first identifier child, or its node id.
fn declaration_name<O: TypeOracle + ?Sized>(oracle: &O, decl: NodeId) -> String {
    oracle
        .node(decl)
        .into_iter()
        .flat_map(|n| n.children.iter())
        .filter(|&&c| matches!(oracle.node(c).map(|n| &n.kind), Some(NodeKind::Identifier)))
        .find_map(|&c| oracle.full_text(c))
        .map(|text| text.trim().to_string())
        .unwrap_or_else(|| decl.to_string())
}
