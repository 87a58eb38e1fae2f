//! Grammar productions, one file per area.
//!
//! - `unit`: `MODULE ... END name.`, imports and blocks
//! - `decl`: CONST / TYPE / VAR / PROCEDURE
//! - `stmt`: statement sequences
//! - `expr`: expressions, selectors, qualified identifiers
//! - `calc`: expression units

mod calc;
mod decl;
mod expr;
mod stmt;
mod unit;
