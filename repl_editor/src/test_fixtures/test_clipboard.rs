// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{ClipboardResult, ClipboardService};

/// In memory clipboard. `content` is what a paste returns.
#[derive(Debug, Default, Clone)]
pub struct TestClipboard {
    pub content: String,
}

impl ClipboardService for TestClipboard {
    fn try_to_put_content_into_clipboard(
        &mut self,
        content: String,
    ) -> ClipboardResult<()> {
        self.content = content;
        Ok(())
    }

    fn try_to_get_content_from_clipboard(&mut self) -> ClipboardResult<String> {
        Ok(self.content.clone())
    }
}
