// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Mocks for the terminal, the clipboard and the input stream, used by the tests in
//! this crate and by its integration tests.

// Attach.
pub mod input_stream_mock;
pub mod terminal_sink_mock;
pub mod test_clipboard;

// Re-export.
pub use input_stream_mock::*;
pub use terminal_sink_mock::*;
pub use test_clipboard::*;
