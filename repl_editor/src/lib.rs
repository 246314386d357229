// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # r3bl_repl_editor
//!
//! A multi-line terminal line editor that drives a read-eval-print loop for a block
//! structured language, where blocks are opened by keywords and closed by an explicit
//! `end` terminator. The editor owns:
//!
//! 1. Raw keypress handling, including double-press disambiguation for `Tab` and
//!    `Ctrl+Y`.
//! 2. Multi-row display geometry that matches how a terminal wraps text, with wide
//!    characters and embedded escape sequences ([`compute_layout`]).
//! 3. Lexical auto-indentation and "is this submittable yet" detection
//!    ([`IndentTracker`]).
//! 4. A navigable history that keeps in-progress edits apart from committed ones
//!    ([`HistoryStore`]).
//!
//! Evaluation of submitted text is not part of this crate. [`LineEditor::readline`]
//! returns an [`EditorEvent::Command`] and the caller decides when to show the next
//! prompt via [`LineEditor::prompt`].
//!
//! ```no_run
//! use r3bl_repl_editor::{EditorConfig, EditorEvent, LineEditor};
//!
//! # async fn run() -> miette::Result<()> {
//! let mut editor = LineEditor::try_new_with_terminal(EditorConfig::default())?;
//! loop {
//!     match editor.readline().await? {
//!         EditorEvent::Command(text) => {
//!             println!("{text}");
//!             editor.prompt()?;
//!         }
//!         EditorEvent::Close => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```

// https://github.com/rust-lang/rust-clippy
// Test code may use `.unwrap()`. Production library code may not.
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod display;
pub mod edit_buffer;
pub mod history;
pub mod indent;
pub mod line_editor;
pub mod log;
pub mod test_fixtures;

// Re-export.
pub use display::*;
pub use edit_buffer::*;
pub use history::*;
pub use indent::*;
pub use line_editor::*;
pub use log::*;
pub use test_fixtures::*;

// Type aliases.
use std::pin::Pin;

use futures_core::Stream;
use smallvec::SmallVec;

pub type StdMutex<T> = std::sync::Mutex<T>;

pub type PinnedInputStream<T> = Pin<Box<dyn Stream<Item = T>>>;

pub const INLINE_VEC_SIZE: usize = 8;
pub type InlineVec<T> = SmallVec<[T; INLINE_VEC_SIZE]>;

// Constants.
pub const DEFAULT_PROMPT: &str = "> ";
pub const DEFAULT_CONTINUATION_PROMPT: &str = "  ";
pub const DEFAULT_INDENT_UNIT: &str = "  ";
pub const TAB_DOUBLE_PRESS_WINDOW_MS: u64 = 200;
pub const COPY_DOUBLE_PRESS_WINDOW_MS: u64 = 300;
pub const NEW_LINE: &str = "\n";
