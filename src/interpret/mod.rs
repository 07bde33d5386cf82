//! Executing the token stream directly.
//!
//! No parse tree is ever built: the interpreter classifies and consumes
//! tokens from the front of the stream as it goes. This module brings the
//! value model, the environment chain and the dispatcher together.

mod env;
mod interpreter;
mod value;

pub use value::{Type, Value};

use std::io::BufRead;

use anyhow::Result;

use crate::stream::TokenStream;
use interpreter::Interpreter;

/// Runs a fully tokenized program, returning its standard output.
///
/// `stdin` feeds `GIMMEH` statements. Function declarations are hoisted by
/// a pre-scan so forward references resolve.
pub fn interpret<'ctx>(stream: TokenStream<'ctx>, stdin: &mut dyn BufRead) -> Result<String> {
    let mut interpreter = Interpreter::new(stream, stdin);
    interpreter.hoist()?;
    interpreter.run()?;
    interpreter.stdout()
}
