//! Data model for the declaration graph consumed by the protodts extractor.
//!
//! A front end (the real language service, or a test fixture) describes the
//! parsed files, the types it resolved at each syntax position and the
//! symbols behind those types. The extractor only ever reads this model
//! through the [`TypeOracle`] trait, so anything that can answer those
//! queries can drive it.
//!
//! ```
//! use protodts_syntax::*;
//!
//! let mut b = ProgramBuilder::new();
//! let file = b.file("protocol.d.ts");
//! let root = b.root(file);
//! let decl = b.add_node(root, NodeKind::InterfaceDeclaration);
//! let span = b.push_text(file, "interface Request {}\n");
//! b.set_span(decl, span);
//!
//! let program = b.finish();
//! assert_eq!(program.full_text(decl), Some("interface Request {}\n"));
//! ```

pub mod builder;
pub mod node;
pub mod program;
pub mod traits;
pub mod types;

pub use builder::*;
pub use node::*;
pub use program::*;
pub use traits::*;
pub use types::*;
