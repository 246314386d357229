// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod display_context;
pub mod edit_buffer_impl;
pub mod line_scan;

// Re-export.
pub use display_context::*;
pub use edit_buffer_impl::*;
pub use line_scan::*;
