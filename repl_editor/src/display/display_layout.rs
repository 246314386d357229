// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::code_point_width;

/// Where text ends up on screen when written starting at column 0 of some row, in a
/// terminal that is `width` columns wide. `rows` counts the row transitions (so a
/// single unwrapped line is `rows: 0`), and `columns` is the column just past the last
/// glyph on the final row.
///
/// Text that fills its last row exactly reports `columns == width` on that row. This is
/// the terminal's pending wrap state, see [`DisplayLayout::to_screen_position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayLayout {
    pub columns: usize,
    pub rows: usize,
}

impl DisplayLayout {
    /// The cell the terminal cursor can actually be moved to. A layout in the pending
    /// wrap state is resolved onto column 0 of the next row.
    #[must_use]
    pub fn to_screen_position(self, width: usize) -> Self {
        if self.columns >= width.max(1) {
            Self {
                columns: 0,
                rows: self.rows + 1,
            }
        } else {
            self
        }
    }

    #[must_use]
    pub fn is_pending_wrap(self, width: usize) -> bool { self.columns >= width.max(1) }
}

/// Computes the [`DisplayLayout`] of `text` under a terminal that is `width` columns
/// wide.
///
/// 1. Escape sequences (colors from a presenter, function key codes) are stripped
///    first, since they occupy no columns.
/// 2. A newline ends the current row. If the content before it wrapped, the extra rows
///    it wrapped onto are counted as well. Content that lands exactly on a width
///    boundary sits in the terminal's pending wrap state, so it does not add a row of
///    its own before the newline.
/// 3. A full width code point takes 2 columns. If it would straddle the wrap boundary
///    then one filler column is consumed first, since terminals never split a glyph.
///
/// A `width` of 0 is treated as 1.
#[must_use]
pub fn compute_layout(text: &str, width: usize) -> DisplayLayout {
    let width = width.max(1);
    let stripped = strip_ansi_escapes::strip_str(text);

    let mut offset = 0;
    let mut rows = 0;

    for ch in stripped.chars() {
        if ch == '\n' {
            rows += 1 + wrap(offset, width).rows;
            offset = 0;
            continue;
        }

        let ch_width = code_point_width(ch);
        if ch_width == 2 && (offset + 1) % width == 0 {
            offset += 1;
        }
        offset += ch_width;
    }

    let tail = wrap(offset, width);
    DisplayLayout {
        columns: tail.columns,
        rows: rows + tail.rows,
    }
}

/// Lays out `offset` columns of a single line.
fn wrap(offset: usize, width: usize) -> DisplayLayout {
    if offset > 0 && offset % width == 0 {
        DisplayLayout {
            columns: width,
            rows: offset / width - 1,
        }
    } else {
        DisplayLayout {
            columns: offset % width,
            rows: offset / width,
        }
    }
}
