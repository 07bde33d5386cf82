//! Tree-walking LOLCODE interpreter library.
//!
//! No parse tree is ever built. The loader tokenizes the source into a
//! queue of token lines, and the interpreter consumes that queue directly,
//! classifying each line by its leading keyword as it reaches it.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

// Defined first so that the macros can be used in the other modules.
#[macro_use]
pub mod context;

pub mod config;
mod interpret;
mod loader;
pub mod reporter;
mod stream;

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate anyhow;

use std::io::{BufRead, Write};
use std::time::Instant;

use anyhow::Result;
pub use config::Config;
pub use context::Context;
pub use interpret::{Type, Value};
pub use loader::load;
pub use stream::{Line, TokenStream};

/// Executes the program held by `ctx`, returning its standard output.
///
/// `stdin` feeds the program's `GIMMEH` statements.
pub fn execute<'ctx>(ctx: &Context<'ctx>, stdin: &mut dyn BufRead) -> Result<String> {
    verbose_print!(ctx, "Tokenizing...");
    std::io::stdout().flush()?;
    let start = Instant::now();
    let stream = load(ctx.config.input);
    verbose_println!(ctx, "\rTokenized [{:?}]", start.elapsed());

    verbose_print!(ctx, "Running the program...");
    std::io::stdout().flush()?;
    let start = Instant::now();
    let res = interpret::interpret(stream, stdin);
    verbose_println!(ctx, "\rRan the program in [{:?}]", start.elapsed());
    res
}
