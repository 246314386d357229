// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod clipboard;
pub mod double_press;
pub mod editor_config;
pub mod editor_error;
pub mod editor_event;
pub mod event_handlers;
pub mod key_press;
pub mod line_editor_impl;
pub mod presenter;
pub mod render;
pub mod terminal_sink;

// Re-export.
pub use clipboard::*;
pub use double_press::*;
pub use editor_config::*;
pub use editor_error::*;
pub use editor_event::*;
pub use key_press::*;
pub use line_editor_impl::*;
pub use presenter::*;
pub use terminal_sink::*;
