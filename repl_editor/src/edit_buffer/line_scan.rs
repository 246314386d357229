// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Line oriented queries over text that may contain embedded newlines. Lines are found
//! by a `line\n | line` scan: every line keeps its trailing newline, and a final line
//! without one is only produced if it is non-empty. So `"a\nb"` scans to `["a\n", "b"]`
//! and `"a\n"` scans to `["a\n"]`.

use crate::compute_layout;

/// Splits `text` into lines, each one keeping its trailing `\n`.
#[must_use]
pub fn split_lines(text: &str) -> Vec<&str> { text.split_inclusive('\n').collect() }

/// Number of newline separated lines in `text`. Unlike [`split_lines`] this counts the
/// empty line after a trailing newline, since the cursor can sit on it.
#[must_use]
pub fn count_lines(text: &str) -> usize { text.matches('\n').count() + 1 }

/// The prefix of `text` made of the whole lines that start on a screen row before
/// `end_row`, when `text` is laid out `width` columns wide. A logical line that wraps
/// takes up as many screen rows as it wraps onto.
#[must_use]
pub fn lines_before(text: &str, end_row: usize, width: usize) -> &str {
    &text[..split_at_row(text, end_row, width)]
}

/// The rest of `text` after [`lines_before`], ie: the lines that start on `start_row`
/// or later.
#[must_use]
pub fn lines_after(text: &str, start_row: usize, width: usize) -> &str {
    &text[split_at_row(text, start_row, width)..]
}

fn split_at_row(text: &str, row: usize, width: usize) -> usize {
    let mut line_start_row = 0;
    let mut byte_offset = 0;
    for line in split_lines(text) {
        if line_start_row >= row {
            break;
        }
        byte_offset += line.len();
        line_start_row += compute_layout(line, width).rows.max(1);
    }
    byte_offset
}
