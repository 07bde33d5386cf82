//! Turning raw program text into a [`TokenStream`].
//!
//! Each non-blank physical line is split on commas into "soft" lines, and
//! each soft line is whitespace-tokenized. The interpreter core only ever
//! sees the resulting stream.

use crate::stream::{Line, TokenStream};

/// Tokenizes `input` into a stream of token lines.
///
/// Blank soft lines (blank physical lines, stray commas) are dropped, so
/// the returned stream never holds an empty line.
pub fn load(input: &str) -> TokenStream<'_> {
    let mut stream = TokenStream::new();
    for line in input.lines() {
        for soft in line.split(',') {
            let tokens: Line<'_> = soft.split_whitespace().collect();
            if !tokens.is_empty() {
                stream.push_line(tokens);
            }
        }
    }
    stream
}
