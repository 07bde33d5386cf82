//! Defining the interpreter config options.

/// Run configuration.
#[derive(Default)]
pub struct Config<'ctx> {
    /// Interpreter input string.
    pub input: &'ctx str,
    /// Interpreter input filename.
    pub filename: Option<&'ctx str>,
    /// Verbose mode.
    pub verbose: bool,
}
