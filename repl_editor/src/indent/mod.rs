// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod indent_frame;
pub mod indent_rules;
pub mod indent_tracker;

// Re-export.
pub use indent_frame::*;
pub use indent_rules::*;
pub use indent_tracker::*;
