// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum EditorError {
    #[error(transparent)]
    #[diagnostic(code(repl_editor::io))]
    IO(#[from] std::io::Error),

    #[error("invalid indent rule pattern")]
    #[diagnostic(code(repl_editor::pattern))]
    Pattern(#[from] regex::Error),

    #[error("readline called after the editor closed")]
    #[diagnostic(code(repl_editor::closed))]
    Closed,
}
