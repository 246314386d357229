// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use strum_macros::Display;

/// The construct a rule recognizes. This is a closed set, so every rule effect in
/// [`crate::IndentTracker::advance`] is matched exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FrameKind {
    /// Opens two nested indent units, eg: `data`, `cases`.
    OpenDouble,
    /// Opens one indent unit, eg: `fun`, `if`, `(`.
    OpenSingle,
    /// Dedents only its own line, eg: `else`, `|`.
    SoftUnindent,
    /// Dedents its own line by two and leaves one level open for what follows.
    Sharing,
    /// Closes one unit opened by `(`.
    CloseParen,
    /// Terminates the innermost open block, eg: `end`.
    End,
}

/// The indent contribution of a single logical line.
///
/// - `level` is the running depth after this line, inherited by the next one.
/// - `level_offset` is added to `level` to get the depth this line itself renders at.
///
/// Neither is clamped here. [`IndentFrame::depth`] clamps at 0 when converting to a
/// literal indent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndentFrame {
    /// The first rule matched on the line, if any.
    pub kind: Option<FrameKind>,
    pub level_offset: isize,
    pub level: isize,
}

impl IndentFrame {
    /// Number of indent units this line renders with.
    #[must_use]
    pub fn depth(&self) -> usize {
        usize::try_from(self.level + self.level_offset).unwrap_or(0)
    }
}
