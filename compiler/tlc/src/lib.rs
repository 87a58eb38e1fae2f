//! The `tlc` driver.
//!
//! Wires the phases together for the command line:
//!
//! ```text
//! source ──► tl_parse (lexer + parser + Sema) ──► diagnostics
//!                     │
//!                     └── no errors ──► tl_ssa::lower_unit ──► IR text
//! ```
//!
//! The binary in `main.rs` only dispatches subcommands; everything it calls
//! lives in [`commands`].

pub mod commands;
mod options;
mod pipeline;

pub use options::{parse_compile_options, CompileOptions};
pub use pipeline::{compile, Compilation, Stage};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber.
///
/// Does nothing unless `RUST_LOG` is set, e.g. `RUST_LOG=tl_ssa=debug`.
/// `TLC_LOG_TREE=1` prints spans as an indented tree instead of flat lines.
/// Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }

        let tree = std::env::var("TLC_LOG_TREE").is_ok_and(|value| value == "1");
        let tree_layer = tree.then(|| {
            tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true)
        });
        let flat_layer = (!tree).then(|| fmt::layer().with_target(true).with_level(true));

        tracing_subscriber::registry()
            .with(tree_layer)
            .with(flat_layer)
            .with(EnvFilter::from_default_env())
            .init();
    });
}
