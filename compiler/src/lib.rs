//! protodts-compiler
//!
//! This crate implements:
//!  1) Declaration extraction (`walker::extract`): every external type a
//!     protocol file depends on, collected from a [`TypeOracle`],
//!  2) A program verifier for snapshots loaded from disk,
//!  3) Protocol assembly (`build_protocol` → `String`),
//!  4) Diagnostic table code generation,
//!  5) Configuration (`ProtocolConfig`) and the error type (`DtsError`).
//!
//! [`TypeOracle`]: protodts_syntax::TypeOracle

pub mod error;
pub mod config;
pub mod utils;
pub mod verifier;
pub mod walker;
pub mod protocol;
pub mod diagnostics;

pub use config::ProtocolConfig;
pub use error::DtsError;
pub use protocol::{build_protocol, render_extra_declarations};
pub use walker::{extract, Extraction, WalkerOptions};
