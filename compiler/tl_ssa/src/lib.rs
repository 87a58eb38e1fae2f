//! SSA code generation for the tinylang front end.
//!
//! Takes the annotated [`tl_ir::Ast`] of a unit without errors and produces
//! an IR [`Module`] in SSA form:
//!
//! ```text
//! Ast + Unit ──► lower_unit ──► Module ──► Display (textual IR)
//!                   │
//!                   └── FunctionBuilder: blocks, phis, sealing
//! ```
//!
//! SSA is built on the fly while lowering (Braun et al., "Simple and
//! Efficient Construction of Static Single Assignment Form"): scalar
//! variables never touch memory unless their address is needed, and
//! trivial phis are removed as soon as they are detected.
//!
//! # Modules
//!
//! - [`ir`]: the IR data model and its text form
//! - [`builder`]: [`FunctionBuilder`] and variable tracking
//! - `lower`: AST → IR, including the division fault path
//! - [`mangle`]: symbol names for nested declarations
//! - [`verify`]: structural checks used by tests and the driver

pub mod builder;
mod error;
pub mod ir;
mod lower;
pub mod mangle;
pub mod verify;

pub use builder::{FunctionBuilder, Var};
pub use error::CodegenError;
pub use ir::Module;
pub use lower::{lower_unit, CodegenOptions};
pub use mangle::{demangle, Mangler};
pub use verify::{verify, VerifyError};
