// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::error::Error;

use copypasta_ext::{copypasta::ClipboardProvider, x11_fork::ClipboardContext};

pub type ClipboardResult<T> = Result<T, Box<dyn Error + Send + Sync + 'static>>;

/// Abstraction for the clipboard for dependency injection. Implemented by the system
/// clipboard and by [`crate::TestClipboard`].
pub trait ClipboardService {
    fn try_to_put_content_into_clipboard(&mut self, content: String)
    -> ClipboardResult<()>;
    fn try_to_get_content_from_clipboard(&mut self) -> ClipboardResult<String>;
}

#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardService for SystemClipboard {
    fn try_to_put_content_into_clipboard(
        &mut self,
        content: String,
    ) -> ClipboardResult<()> {
        let mut ctx = ClipboardContext::new()?;
        ctx.set_contents(content.clone())?;
        // % is Display, ? is Debug.
        tracing::debug!(message = "📋 copied to clipboard", copied = %content);
        Ok(())
    }

    fn try_to_get_content_from_clipboard(&mut self) -> ClipboardResult<String> {
        let mut ctx = ClipboardContext::new()?;
        let content = ctx.get_contents()?;
        Ok(content)
    }
}
