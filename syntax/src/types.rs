use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

id_type!(
    /// Index of a [`SyntaxNode`](crate::SyntaxNode) in its program.
    NodeId
);
id_type!(
    /// Identity of a [`ResolvedType`]. Two positions with the same `TypeId`
    /// resolved to the very same type object.
    TypeId
);
id_type!(SymbolId);
id_type!(FileId);

/// Bit set describing what kind of type a [`ResolvedType`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeFlags(pub u32);

impl TypeFlags {
    pub const NONE:           TypeFlags = TypeFlags(0);
    pub const PRIMITIVE:      TypeFlags = TypeFlags(1 << 0);
    pub const OBJECT:         TypeFlags = TypeFlags(1 << 1);
    pub const UNION:          TypeFlags = TypeFlags(1 << 2);
    pub const ENUM:           TypeFlags = TypeFlags(1 << 3);
    pub const TYPE_PARAMETER: TypeFlags = TypeFlags(1 << 4);

    pub fn contains(self, other: TypeFlags) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }
}

impl std::ops::BitOr for TypeFlags {
    type Output = TypeFlags;

    fn bitor(self, rhs: TypeFlags) -> TypeFlags {
        TypeFlags(self.0 | rhs.0)
    }
}

/// What the front end answered for "what type does this position have".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolvedType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_symbol:   Option<SymbolId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol:         Option<SymbolId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_arguments: Vec<TypeId>,
    #[serde(default)]
    pub flags:          TypeFlags,
}

impl ResolvedType {
    /// The alias symbol wins over the structural one, so `type Foo = Bar`
    /// resolves to `Foo`.
    pub fn named_symbol(&self) -> Option<SymbolId> {
        self.alias_symbol.or(self.symbol)
    }

    pub fn is_type_parameter(&self) -> bool {
        self.flags.contains(TypeFlags::TYPE_PARAMETER)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub name:         String,
    #[serde(default)]
    pub declarations: Vec<NodeId>,
}

/// A parsed file. `text` is the complete source so that declaration spans
/// can be sliced out of it verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: String,
    pub text: String,
    pub root: NodeId,
}

impl SourceFile {
    /// File name without any leading directories.
    pub fn base_name(&self) -> &str {
        self.name
            .rsplit(&['/', '\\'][..])
            .next()
            .unwrap_or(&self.name)
    }
}
