// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io,
          sync::{Arc, PoisonError}};

use strip_ansi_escapes::strip_str;

use crate::{FALLBACK_TERMINAL_SIZE, StdMutex, TerminalSink};

/// One call made on a [`TerminalSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOp {
    CursorTo(usize, Option<usize>),
    MoveCursor(isize, isize),
    ClearToEndOfScreen,
    Write(String),
}

/// Records every call made on it. You can safely clone this struct, since the clones
/// share the same recording and the same geometry, so a test keeps one clone and hands
/// the other to the editor.
///
/// The geometry starts at 80 columns by 24 rows, see [`TerminalSinkMock::set_size`].
#[derive(Debug, Clone)]
pub struct TerminalSinkMock {
    pub ops: Arc<StdMutex<Vec<SinkOp>>>,
    pub size: Arc<StdMutex<(usize, usize)>>,
}

impl Default for TerminalSinkMock {
    fn default() -> Self {
        Self {
            ops: Arc::new(StdMutex::new(vec![])),
            size: Arc::new(StdMutex::new(FALLBACK_TERMINAL_SIZE)),
        }
    }
}

impl TerminalSinkMock {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn get_copy_of_ops(&self) -> Vec<SinkOp> {
        self.ops.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Everything written, concatenated.
    #[must_use]
    pub fn get_written_text(&self) -> String {
        self.get_copy_of_ops()
            .into_iter()
            .filter_map(|op| match op {
                SinkOp::Write(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn get_written_text_strip_ansi(&self) -> String { strip_str(self.get_written_text()) }

    pub fn set_size(&self, columns: usize, rows: usize) {
        *self.size.lock().unwrap_or_else(PoisonError::into_inner) = (columns, rows);
    }

    pub fn clear_ops(&self) { self.ops.lock().unwrap_or_else(PoisonError::into_inner).clear(); }

    fn record(&self, op: SinkOp) {
        self.ops.lock().unwrap_or_else(PoisonError::into_inner).push(op);
    }
}

impl TerminalSink for TerminalSinkMock {
    fn cursor_to(&mut self, col: usize, row: Option<usize>) -> io::Result<()> {
        self.record(SinkOp::CursorTo(col, row));
        Ok(())
    }

    fn move_cursor(&mut self, d_col: isize, d_row: isize) -> io::Result<()> {
        self.record(SinkOp::MoveCursor(d_col, d_row));
        Ok(())
    }

    fn clear_to_end_of_screen(&mut self) -> io::Result<()> {
        self.record(SinkOp::ClearToEndOfScreen);
        Ok(())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.record(SinkOp::Write(text.to_string()));
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> { Ok(()) }

    fn columns(&self) -> usize { self.size.lock().unwrap_or_else(PoisonError::into_inner).0 }

    fn rows(&self) -> usize { self.size.lock().unwrap_or_else(PoisonError::into_inner).1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_recording() {
        let sink = TerminalSinkMock::default();
        let mut clone = sink.clone();
        clone.write("\x1b[1mhi\x1b[0m").unwrap();
        clone.move_cursor(0, -1).unwrap();
        pretty_assertions::assert_eq!(sink.get_written_text_strip_ansi(), "hi");
        pretty_assertions::assert_eq!(sink.get_copy_of_ops().len(), 2);

        sink.set_size(10, 5);
        pretty_assertions::assert_eq!((clone.columns(), clone.rows()), (10, 5));
    }
}
