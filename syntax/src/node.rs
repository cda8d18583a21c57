use crate::types::{FileId, NodeId, TypeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte range of a node's full text, leading trivia (comments, whitespace)
/// included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub pos: usize,
    pub end: usize,
}

impl Span {
    pub fn new(pos: usize, end: usize) -> Self {
        Span { pos, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Relationship keyword of an interface or class heritage clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeritageToken {
    Extends,
    Implements,
}

impl fmt::Display for HeritageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeritageToken::Extends    => f.write_str("extends"),
            HeritageToken::Implements => f.write_str("implements"),
        }
    }
}

/// Shape of a syntax node. Only the shapes the extractor dispatches on carry
/// data; everything else is a plain tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum NodeKind {
    SourceFile,
    ModuleDeclaration,
    ModuleBlock,
    InterfaceDeclaration,
    ClassDeclaration,
    TypeAliasDeclaration,
    EnumDeclaration,
    EnumMember {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initializer: Option<NodeId>,
    },
    VariableStatement,
    VariableDeclaration {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        type_annotation: Option<NodeId>,
    },
    PropertyDeclaration {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        type_annotation: Option<NodeId>,
    },
    PropertySignature {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        type_annotation: Option<NodeId>,
    },
    MethodDeclaration {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        type_annotation: Option<NodeId>,
    },
    MethodSignature {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        type_annotation: Option<NodeId>,
    },
    Parameter {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        type_annotation: Option<NodeId>,
    },
    IndexSignature {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        type_annotation: Option<NodeId>,
    },
    HeritageClause {
        token: HeritageToken,
    },
    ExpressionWithTypeArguments,
    TypeReference,
    UnionType,
    ArrayType,
    TypeLiteral,
    LiteralType,
    Identifier,
    StringLiteral,
    NumericLiteral,
    Keyword,
    #[serde(other)]
    Unknown,
}

impl NodeKind {
    /// The node holding this declaration's type annotation, for the shapes
    /// that have one.
    pub fn type_annotation(&self) -> Option<NodeId> {
        match *self {
            NodeKind::VariableDeclaration { type_annotation }
            | NodeKind::PropertyDeclaration { type_annotation }
            | NodeKind::PropertySignature { type_annotation }
            | NodeKind::MethodDeclaration { type_annotation }
            | NodeKind::MethodSignature { type_annotation }
            | NodeKind::Parameter { type_annotation }
            | NodeKind::IndexSignature { type_annotation } => type_annotation,
            _ => None,
        }
    }

    /// Mutable access to the annotation slot; `None` when this shape cannot
    /// carry an annotation at all.
    pub fn type_annotation_mut(&mut self) -> Option<&mut Option<NodeId>> {
        match self {
            NodeKind::VariableDeclaration { type_annotation }
            | NodeKind::PropertyDeclaration { type_annotation }
            | NodeKind::PropertySignature { type_annotation }
            | NodeKind::MethodDeclaration { type_annotation }
            | NodeKind::MethodSignature { type_annotation }
            | NodeKind::Parameter { type_annotation }
            | NodeKind::IndexSignature { type_annotation } => Some(type_annotation),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::SourceFile                  => "SourceFile",
            NodeKind::ModuleDeclaration           => "ModuleDeclaration",
            NodeKind::ModuleBlock                 => "ModuleBlock",
            NodeKind::InterfaceDeclaration        => "InterfaceDeclaration",
            NodeKind::ClassDeclaration            => "ClassDeclaration",
            NodeKind::TypeAliasDeclaration        => "TypeAliasDeclaration",
            NodeKind::EnumDeclaration             => "EnumDeclaration",
            NodeKind::EnumMember { .. }           => "EnumMember",
            NodeKind::VariableStatement           => "VariableStatement",
            NodeKind::VariableDeclaration { .. }  => "VariableDeclaration",
            NodeKind::PropertyDeclaration { .. }  => "PropertyDeclaration",
            NodeKind::PropertySignature { .. }    => "PropertySignature",
            NodeKind::MethodDeclaration { .. }    => "MethodDeclaration",
            NodeKind::MethodSignature { .. }      => "MethodSignature",
            NodeKind::Parameter { .. }            => "Parameter",
            NodeKind::IndexSignature { .. }       => "IndexSignature",
            NodeKind::HeritageClause { .. }       => "HeritageClause",
            NodeKind::ExpressionWithTypeArguments => "ExpressionWithTypeArguments",
            NodeKind::TypeReference               => "TypeReference",
            NodeKind::UnionType                   => "UnionType",
            NodeKind::ArrayType                   => "ArrayType",
            NodeKind::TypeLiteral                 => "TypeLiteral",
            NodeKind::LiteralType                 => "LiteralType",
            NodeKind::Identifier                  => "Identifier",
            NodeKind::StringLiteral               => "StringLiteral",
            NodeKind::NumericLiteral              => "NumericLiteral",
            NodeKind::Keyword                     => "Keyword",
            NodeKind::Unknown                     => "Unknown",
        }
    }
}

/// One node of a parsed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxNode {
    #[serde(flatten)]
    pub kind:     NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent:   Option<NodeId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeId>,
    pub file:     FileId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span:     Option<Span>,
    /// Type the front end resolved at this position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ty:       Option<TypeId>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, file: FileId, parent: Option<NodeId>) -> Self {
        SyntaxNode {
            kind,
            parent,
            children: Vec::new(),
            file,
            span: None,
            ty: None,
        }
    }
}
