//! Defining the interpreter context.

use codespan_reporting::files::SimpleFile;

use crate::config::Config;
use crate::reporter::Reporter;

/// Prints to the standard output, only if the context is in verbose mode.
macro_rules! verbose_print {
    ($ctx:expr, $($arg:tt)*) => {
        if $ctx.config.verbose {
            print!($($arg)*);
        }
    };
}

/// Prints to the standard output with a trailing newline, only if the
/// context is in verbose mode.
macro_rules! verbose_println {
    ($ctx:expr, $($arg:tt)*) => {
        if $ctx.config.verbose {
            println!($($arg)*);
        }
    };
}

/// Interpreter context.
pub struct Context<'ctx> {
    /// Interpreter configuration.
    pub config: Config<'ctx>,
    /// Error reporter.
    pub reporter: Reporter<'ctx>,
}

impl<'ctx> Context<'ctx> {
    /// Creates a new interpreter context.
    pub fn new(config: Config<'ctx>) -> Self {
        let files = SimpleFile::new(config.filename.unwrap_or("<input>"), config.input);
        Self {
            reporter: Reporter::new(files),
            config,
        }
    }
}
