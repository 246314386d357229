// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{self, Write};

use crossterm::{QueueableCommand,
                cursor::{MoveDown, MoveLeft, MoveRight, MoveTo, MoveToColumn, MoveUp},
                style::Print,
                terminal::{self, Clear, ClearType}};

/// Where the editor draws. The geometry queries are re-read on every redraw, since the
/// terminal can be resized at any time.
pub trait TerminalSink {
    /// Moves to column `col`, and to row `row` (from the top of the screen) if given.
    fn cursor_to(&mut self, col: usize, row: Option<usize>) -> io::Result<()>;
    /// Moves relative to where the cursor is now.
    fn move_cursor(&mut self, d_col: isize, d_row: isize) -> io::Result<()>;
    fn clear_to_end_of_screen(&mut self) -> io::Result<()>;
    fn write(&mut self, text: &str) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
    fn columns(&self) -> usize;
    fn rows(&self) -> usize;
}

pub const FALLBACK_TERMINAL_SIZE: (usize, usize) = (80, 24);

/// A [`TerminalSink`] that queues crossterm commands on `out`, which is usually
/// [`std::io::stdout`]. The terminal is expected to be in raw mode, so `\n` is written
/// as `\r\n`.
pub struct CrosstermTerminal {
    out: Box<dyn Write + Send>,
}

impl std::fmt::Debug for CrosstermTerminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrosstermTerminal").finish_non_exhaustive()
    }
}

impl Default for CrosstermTerminal {
    fn default() -> Self { Self::new(Box::new(io::stdout())) }
}

impl CrosstermTerminal {
    #[must_use]
    pub fn new(out: Box<dyn Write + Send>) -> Self { Self { out } }

    fn size() -> (usize, usize) {
        terminal::size().map_or(FALLBACK_TERMINAL_SIZE, |(columns, rows)| {
            (usize::from(columns), usize::from(rows))
        })
    }
}

fn to_u16(value: usize) -> u16 { u16::try_from(value).unwrap_or(u16::MAX) }

impl TerminalSink for CrosstermTerminal {
    fn cursor_to(&mut self, col: usize, row: Option<usize>) -> io::Result<()> {
        match row {
            Some(row) => self.out.queue(MoveTo(to_u16(col), to_u16(row)))?,
            None => self.out.queue(MoveToColumn(to_u16(col)))?,
        };
        Ok(())
    }

    fn move_cursor(&mut self, d_col: isize, d_row: isize) -> io::Result<()> {
        let cols = to_u16(d_col.unsigned_abs());
        let rows = to_u16(d_row.unsigned_abs());
        if d_col < 0 {
            self.out.queue(MoveLeft(cols))?;
        } else if d_col > 0 {
            self.out.queue(MoveRight(cols))?;
        }
        if d_row < 0 {
            self.out.queue(MoveUp(rows))?;
        } else if d_row > 0 {
            self.out.queue(MoveDown(rows))?;
        }
        Ok(())
    }

    fn clear_to_end_of_screen(&mut self) -> io::Result<()> {
        self.out.queue(Clear(ClearType::FromCursorDown))?;
        Ok(())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.queue(Print(text.replace('\n', "\r\n")))?;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> { self.out.flush() }

    fn columns(&self) -> usize { Self::size().0 }

    fn rows(&self) -> usize { Self::size().1 }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::StdMutex;

    #[derive(Clone, Default)]
    struct SharedBytes(Arc<StdMutex<Vec<u8>>>);

    impl Write for SharedBytes {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    #[test]
    fn test_write_uses_crlf_in_raw_mode() {
        let bytes = SharedBytes::default();
        let mut sink = CrosstermTerminal::new(Box::new(bytes.clone()));
        sink.write("a\nb").unwrap();
        sink.flush().unwrap();
        let written = String::from_utf8(bytes.0.lock().unwrap().clone()).unwrap();
        pretty_assertions::assert_eq!(written, "a\r\nb");
    }

    #[test]
    fn test_zero_moves_queue_nothing() {
        let bytes = SharedBytes::default();
        let mut sink = CrosstermTerminal::new(Box::new(bytes.clone()));
        sink.move_cursor(0, 0).unwrap();
        sink.flush().unwrap();
        assert!(bytes.0.lock().unwrap().is_empty());
    }
}
