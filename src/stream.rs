//! The token stream that drives interpretation.
//!
//! The stream is a queue of lines, each line a queue of tokens. Statements
//! and expressions consume it destructively from the front; block constructs
//! splice cloned template lines back onto the front before re-executing
//! them.

use std::collections::VecDeque;

/// A single soft line of tokens.
///
/// Soft lines are the unit of lookahead for block boundaries: loop and
/// function terminators span exactly one line of fixed token count.
pub type Line<'ctx> = VecDeque<&'ctx str>;

/// Queue of token lines holding the program's remaining unconsumed tokens.
///
/// Invariant: the front line is never empty at a statement or expression
/// boundary. Any routine that exhausts the front line pops it (see
/// [`TokenStream::trim_front`]) before handing control back.
#[derive(Debug, Default, Clone)]
pub struct TokenStream<'ctx> {
    /// The lines, front first.
    lines: VecDeque<Line<'ctx>>,
}

impl<'ctx> TokenStream<'ctx> {
    /// Creates a new, empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line to the back of the stream.
    pub fn push_line(&mut self, line: Line<'ctx>) {
        self.lines.push_back(line);
    }

    /// Number of lines left in the stream.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Is the stream exhausted?
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Peeks at the front line.
    pub fn front(&self) -> Option<&Line<'ctx>> {
        self.lines.front()
    }

    /// Peeks at the first token of the front line.
    pub fn front_token(&self) -> Option<&'ctx str> {
        self.lines.front().and_then(|line| line.front().copied())
    }

    /// Peeks at the `i`-th token of the front line.
    pub fn token_at(&self, i: usize) -> Option<&'ctx str> {
        self.lines.front().and_then(|line| line.get(i).copied())
    }

    /// Pops the first token of the front line.
    ///
    /// Never crosses a line boundary: returns `None` if the stream is
    /// exhausted or the front line is (transiently) empty.
    pub fn pop_token(&mut self) -> Option<&'ctx str> {
        self.lines.front_mut().and_then(|line| line.pop_front())
    }

    /// Pops the whole front line.
    pub fn pop_line(&mut self) -> Option<Line<'ctx>> {
        self.lines.pop_front()
    }

    /// Pops the front line if it has been fully consumed, restoring the
    /// non-empty-front invariant for the next consumer.
    pub fn trim_front(&mut self) {
        if self.lines.front().is_some_and(|line| line.is_empty()) {
            self.lines.pop_front();
        }
    }

    /// Splices lines onto the front of the stream, preserving their order.
    ///
    /// Used to re-insert a loop condition, or a cloned loop/function body,
    /// before the lines already queued.
    pub fn splice_front(&mut self, lines: impl IntoIterator<Item = Line<'ctx>>) {
        let mut spliced: VecDeque<_> = lines.into_iter().collect();
        while let Some(line) = spliced.pop_back() {
            self.lines.push_front(line);
        }
    }

    /// Iterates over the remaining lines, front first, without consuming.
    pub fn iter(&self) -> impl Iterator<Item = &Line<'ctx>> {
        self.lines.iter()
    }
}
