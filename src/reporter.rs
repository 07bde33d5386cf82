//! User-facing error reporting facility.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use codespan_reporting::diagnostic::Severity;
use codespan_reporting::files::SimpleFile;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use crossbeam_queue::SegQueue;

/// An interpreter diagnostic.
pub type Diagnostic = codespan_reporting::diagnostic::Diagnostic<()>;

lazy_static! {
    /// Terminal configuration.
    static ref TERM_CONFIG: term::Config = term::Config::default();
    /// Standard stream handle.
    static ref STD_STREAM: StandardStream = StandardStream::stderr(ColorChoice::Always);
}

/// Interpreter reporter.
///
/// Collects and reports any diagnostics emitted while running a program.
pub struct Reporter<'ctx> {
    /// Reference into the original file/source code.
    ///
    /// Needed to display the diagnostics to the stderr.
    files: SimpleFile<&'ctx str, &'ctx str>,
    /// The actual list of diagnostics.
    diagnostics: SegQueue<Diagnostic>,
    /// True iff `self.diagnostics` contains at least one error diagnostic.
    is_error: AtomicBool,
}

impl<'ctx> Reporter<'ctx> {
    /// Create a new `Reporter` for the given source file.
    pub fn new(files: SimpleFile<&'ctx str, &'ctx str>) -> Self {
        Self {
            files,
            diagnostics: SegQueue::default(),
            is_error: AtomicBool::new(false),
        }
    }

    /// Pushes a new diagnostic to the list.
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.is_error.fetch_or(
            matches!(diagnostic.severity, Severity::Error | Severity::Bug),
            Ordering::Relaxed,
        );
        self.diagnostics.push(diagnostic);
    }

    /// Records a runtime error, turning its whole causal chain into one
    /// diagnostic.
    pub fn report(&self, err: &anyhow::Error) {
        let mut chain = err.chain().rev();
        if let Some(final_error) = chain.next() {
            let caused_by: Vec<_> = chain.map(|x| format!("Caused by: {x}")).collect();
            self.emit(
                Diagnostic::error()
                    .with_message(final_error.to_string())
                    .with_notes(caused_by),
            );
        } else {
            self.emit(Diagnostic::error().with_message("internal interpreter error"));
        }
    }

    /// Was there any errors so far?
    pub fn has_errors(&self) -> bool {
        self.is_error.load(Ordering::SeqCst)
    }

    /// Displays all the diagnostics with nice colors and formatting to the
    /// standard error.
    ///
    /// # Warning
    /// WILL FLUSH/TRASH the diagnostics that are displayed.
    pub fn display(&self) -> anyhow::Result<()> {
        let mut writer = STD_STREAM.lock();
        write!(&mut writer, "\r")?; // Flush anything on our line, in particular loading indicators
        while let Some(diagnostic) = self.diagnostics.pop() {
            term::emit(&mut writer, &TERM_CONFIG, &self.files, &diagnostic)?;
        }
        Ok(())
    }
}
