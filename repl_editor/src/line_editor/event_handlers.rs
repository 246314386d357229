// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::time::Instant;

use super::{DoublePressKey, DoublePressOutcome, EditorAction, EditorError, EditorEvent,
            EditorState, InputLiveness, LineEditor, line_editor_impl::display_context,
            normalize_newlines};
use crate::{NEW_LINE, count_lines};

type HandlerResult = Result<Option<EditorEvent>, EditorError>;

impl LineEditor {
    pub(crate) fn apply_action(&mut self, action: EditorAction, now: Instant) -> HandlerResult {
        match action {
            EditorAction::Tab => return self.press_double(DoublePressKey::Tab, now),
            EditorAction::Copy => return self.press_double(DoublePressKey::Copy, now),
            _ => {
                // Any other key settles a pending press first.
                if let Some(key) = self.double_press.take_pending() {
                    self.run_single(key)?;
                }
            }
        }

        match action {
            EditorAction::Enter => {
                if self.state == EditorState::Ready {
                    return self.submit();
                }
                self.insert_text(NEW_LINE)?;
            }
            EditorAction::InsertNewline => self.insert_text(NEW_LINE)?,
            EditorAction::Insert(text) => self.insert_text(&text)?,
            EditorAction::Paste => self.paste()?,
            EditorAction::Up => {
                if self.buffer.is_cursor_on_first_line() {
                    self.history_prev()?;
                } else {
                    self.buffer.move_to_prev_line();
                    self.redraw(false)?;
                }
            }
            EditorAction::Down => {
                if self.buffer.is_cursor_on_last_line() {
                    self.history_next()?;
                } else {
                    self.buffer.move_to_next_line();
                    self.redraw(false)?;
                }
            }
            EditorAction::Left => {
                self.buffer.move_left();
                self.redraw(false)?;
            }
            EditorAction::Right => {
                self.buffer.move_right();
                self.redraw(false)?;
            }
            EditorAction::LineStart => {
                self.buffer.move_to_line_start();
                self.redraw(false)?;
            }
            EditorAction::LineEnd => {
                self.buffer.move_to_line_end();
                self.redraw(false)?;
            }
            EditorAction::Backspace => {
                if self.buffer.delete_before_cursor() {
                    self.after_text_change()?;
                }
            }
            EditorAction::Delete => {
                if self.buffer.delete_at_cursor() {
                    self.after_text_change()?;
                }
            }
            EditorAction::ClearScreen => self.clear_screen()?,
            EditorAction::Interrupt => return self.interrupt(),
            EditorAction::Exit => return Ok(Some(self.close())),
            EditorAction::Tab | EditorAction::Copy => {}
        }

        Ok(None)
    }

    fn press_double(&mut self, key: DoublePressKey, now: Instant) -> HandlerResult {
        let window = match key {
            DoublePressKey::Tab => self.config.tab_double_press_window,
            DoublePressKey::Copy => self.config.copy_double_press_window,
        };
        match self.double_press.press(key, now, window) {
            DoublePressOutcome::Double(key) => self.run_double(key)?,
            DoublePressOutcome::Armed { flushed: Some(key) } => self.run_single(key)?,
            DoublePressOutcome::Armed { flushed: None } => {}
        }
        Ok(None)
    }

    /// `Tab` reindents the cursor's line, `Ctrl+Y` copies it.
    pub(crate) fn run_single(&mut self, key: DoublePressKey) -> Result<(), EditorError> {
        tracing::debug!(message = "single press", key = %key);
        match key {
            DoublePressKey::Tab => {
                let ctx = display_context(&self.config, self.sink.columns().max(1));
                self.buffer
                    .reindent_current_line(&self.tracker, &self.config.indent_unit, &ctx);
                self.after_text_change()
            }
            DoublePressKey::Copy => {
                let line = self.buffer.get_line(0, true).to_string();
                self.copy_to_clipboard(line);
                Ok(())
            }
        }
    }

    /// `Tab Tab` reindents the whole buffer, `Ctrl+Y Ctrl+Y` copies it.
    pub(crate) fn run_double(&mut self, key: DoublePressKey) -> Result<(), EditorError> {
        tracing::debug!(message = "double press", key = %key);
        match key {
            DoublePressKey::Tab => {
                let ctx = display_context(&self.config, self.sink.columns().max(1));
                self.buffer
                    .reindent_all(&self.tracker, &self.config.indent_unit, &ctx);
                self.after_text_change()
            }
            DoublePressKey::Copy => {
                let text = self.buffer.text().to_string();
                self.copy_to_clipboard(text);
                Ok(())
            }
        }
    }

    /// Inserts `text` at the cursor. Unless it is a lone space, the cursor's line is
    /// reindented, so a keyword like `end` snaps to its depth as soon as it is typed.
    fn insert_text(&mut self, text: &str) -> Result<(), EditorError> {
        self.buffer.insert(text);
        if text != " " {
            let ctx = display_context(&self.config, self.sink.columns().max(1));
            self.buffer
                .reindent_current_line(&self.tracker, &self.config.indent_unit, &ctx);
        }
        self.after_text_change()
    }

    fn after_text_change(&mut self) -> Result<(), EditorError> {
        self.refresh_frames();
        self.history.sync(self.buffer.text());
        self.redraw(false)?;
        Ok(())
    }

    fn paste(&mut self) -> Result<(), EditorError> {
        match self.clipboard.try_to_get_content_from_clipboard() {
            Ok(text) => self.insert_text(&normalize_newlines(&text)),
            Err(error) => {
                tracing::warn!(message = "clipboard paste failed", error = %error);
                Ok(())
            }
        }
    }

    fn copy_to_clipboard(&mut self, content: String) {
        if let Err(error) = self.clipboard.try_to_put_content_into_clipboard(content) {
            tracing::warn!(message = "clipboard copy failed", error = %error);
        }
    }

    fn history_prev(&mut self) -> Result<(), EditorError> {
        if let Some(text) = self.history.prev() {
            let text = text.to_string();
            self.show_history_entry(text)?;
        }
        Ok(())
    }

    fn history_next(&mut self) -> Result<(), EditorError> {
        if let Some(text) = self.history.next() {
            let text = text.to_string();
            self.show_history_entry(text)?;
        }
        Ok(())
    }

    fn show_history_entry(&mut self, text: String) -> Result<(), EditorError> {
        self.buffer.set_text(text);
        self.refresh_frames();
        self.redraw(true)?;
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<(), EditorError> {
        self.sink.cursor_to(0, Some(0))?;
        self.sink.clear_to_end_of_screen()?;
        self.last_cursor_row = 0;
        self.redraw(false)?;
        Ok(())
    }

    /// The buffer is complete: record it, move past it, and hand it over.
    fn submit(&mut self) -> HandlerResult {
        let text = self.buffer.text().to_string();
        self.history.commit(&text);
        self.redraw(true)?;
        self.sink.write(NEW_LINE)?;
        self.sink.flush()?;

        tracing::info!(
            message = "submit",
            lines = count_lines(&text),
            prompt_number = self.prompt_number
        );

        self.buffer.reset();
        self.refresh_frames();
        self.last_cursor_row = 0;
        self.last_display_row = 0;
        self.liveness = InputLiveness::AwaitingPrompt;

        let event = EditorEvent::Command(text);
        self.publish(&event);
        Ok(Some(event))
    }

    /// `Ctrl+C` drops what was typed and shows a fresh prompt. On an empty prompt it
    /// closes the editor instead.
    fn interrupt(&mut self) -> HandlerResult {
        self.redraw(true)?;

        if self.buffer.is_empty() && self.frames.is_empty() {
            return Ok(Some(self.close()));
        }

        tracing::debug!(message = "interrupt", prompt_number = self.prompt_number);
        self.history.sync(self.buffer.text());
        self.show_prompt(true)?;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use smallvec::smallvec;

    use super::*;
    use crate::{ClipboardResult, ClipboardService, EditorConfig, KeyName, KeyPressEvent,
                PlainPresenter, TerminalSinkMock, TestClipboard, gen_input_stream};

    #[derive(Debug)]
    struct UnavailableClipboard;

    impl ClipboardService for UnavailableClipboard {
        fn try_to_put_content_into_clipboard(&mut self, _content: String) -> ClipboardResult<()> {
            Err("no display".into())
        }

        fn try_to_get_content_from_clipboard(&mut self) -> ClipboardResult<String> {
            Err("no display".into())
        }
    }

    fn editor_with(clipboard: impl ClipboardService + 'static) -> (LineEditor, TerminalSinkMock) {
        let sink = TerminalSinkMock::default();
        let editor = LineEditor::try_new(
            EditorConfig::default(),
            Box::new(sink.clone()),
            Box::new(PlainPresenter),
            Box::new(clipboard),
            gen_input_stream(smallvec![]),
        )
        .unwrap();
        (editor, sink)
    }

    fn type_str(editor: &mut LineEditor, text: &str) {
        for ch in text.chars() {
            let event = match ch {
                '\n' => KeyPressEvent::key(KeyName::Enter),
                _ => KeyPressEvent::char(ch),
            };
            editor.handle_key_press(event).unwrap();
        }
    }

    #[test]
    fn test_enter_inserts_newline_until_ready() {
        let (mut editor, _) = editor_with(TestClipboard::default());
        type_str(&mut editor, "fun f():\n1\nend");
        pretty_assertions::assert_eq!(editor.text(), "fun f():\n  1\nend");
        pretty_assertions::assert_eq!(editor.state(), EditorState::Ready);

        let event = editor
            .handle_key_press(KeyPressEvent::key(KeyName::Enter))
            .unwrap();
        pretty_assertions::assert_eq!(
            event,
            Some(EditorEvent::Command("fun f():\n  1\nend".into()))
        );
        assert!(editor.text().is_empty());
        assert!(!editor.is_listening());
        pretty_assertions::assert_eq!(editor.history().len(), 2);
    }

    #[test]
    fn test_keys_are_dropped_until_prompt() {
        let (mut editor, _) = editor_with(TestClipboard::default());
        type_str(&mut editor, "1\n");
        type_str(&mut editor, "x");
        assert!(editor.text().is_empty());

        editor.prompt().unwrap();
        pretty_assertions::assert_eq!(editor.prompt_number(), 2);
        type_str(&mut editor, "x");
        pretty_assertions::assert_eq!(editor.text(), "x");
    }

    #[test]
    fn test_ctrl_n_inserts_newline_even_when_ready() {
        let (mut editor, _) = editor_with(TestClipboard::default());
        type_str(&mut editor, "1");
        editor.handle_key_press(KeyPressEvent::ctrl('n')).unwrap();
        pretty_assertions::assert_eq!(editor.text(), "1\n");
        assert!(editor.is_listening());
    }

    #[test]
    fn test_interrupt_with_content_reprompts() {
        let (mut editor, sink) = editor_with(TestClipboard::default());
        type_str(&mut editor, "fun f():\n1");
        let event = editor.handle_key_press(KeyPressEvent::ctrl('c')).unwrap();
        pretty_assertions::assert_eq!(event, None);
        assert!(editor.text().is_empty());
        assert!(editor.frames().is_empty());
        pretty_assertions::assert_eq!(editor.state(), EditorState::Ready);
        pretty_assertions::assert_eq!(editor.prompt_number(), 2);
        assert!(sink.get_written_text().ends_with("\n> "));
    }

    #[test]
    fn test_interrupt_on_empty_prompt_closes() {
        let (mut editor, _) = editor_with(TestClipboard::default());
        let mut receiver = editor.subscribe();
        let event = editor.handle_key_press(KeyPressEvent::ctrl('c')).unwrap();
        pretty_assertions::assert_eq!(event, Some(EditorEvent::Close));
        pretty_assertions::assert_eq!(receiver.try_recv().ok(), Some(EditorEvent::Close));
    }

    #[test]
    fn test_up_browses_history_on_first_line_only() {
        let (mut editor, _) = editor_with(TestClipboard::default());
        type_str(&mut editor, "1\n");
        editor.prompt().unwrap();
        type_str(&mut editor, "2\n");
        editor.prompt().unwrap();

        editor.handle_key_press(KeyPressEvent::key(KeyName::Up)).unwrap();
        pretty_assertions::assert_eq!(editor.text(), "2");
        editor.handle_key_press(KeyPressEvent::key(KeyName::Up)).unwrap();
        pretty_assertions::assert_eq!(editor.text(), "1");
        editor.handle_key_press(KeyPressEvent::key(KeyName::Down)).unwrap();
        pretty_assertions::assert_eq!(editor.text(), "2");

        // Inside a multi-line buffer, up moves between lines.
        editor.handle_key_press(KeyPressEvent::ctrl('n')).unwrap();
        type_str(&mut editor, "3");
        editor.handle_key_press(KeyPressEvent::key(KeyName::Up)).unwrap();
        pretty_assertions::assert_eq!(editor.text(), "2\n3");
        pretty_assertions::assert_eq!(editor.buffer().cursor_line_index(), 0);
    }

    #[test]
    fn test_copy_and_paste() {
        let (mut editor, _) = editor_with(TestClipboard::default());
        type_str(&mut editor, "abc");
        let now = Instant::now();
        editor.apply_action(EditorAction::Copy, now).unwrap();
        // Settled by the next key.
        editor.handle_key_press(KeyPressEvent::ctrl('v')).unwrap();
        pretty_assertions::assert_eq!(editor.text(), "abcabc");
    }

    #[test]
    fn test_double_copy_takes_whole_buffer() {
        let (mut editor, _) = editor_with(TestClipboard::default());
        type_str(&mut editor, "fun f():\n1");
        let now = Instant::now();
        editor.apply_action(EditorAction::Copy, now).unwrap();
        editor
            .apply_action(EditorAction::Copy, now + Duration::from_millis(100))
            .unwrap();
        editor.handle_key_press(KeyPressEvent::ctrl('n')).unwrap();
        editor.handle_key_press(KeyPressEvent::ctrl('v')).unwrap();
        // The pasted block lands inside the open one, and its last line is reindented.
        pretty_assertions::assert_eq!(
            editor.text(),
            "fun f():\n  1\n  fun f():\n    1"
        );
    }

    #[test]
    fn test_paste_normalizes_line_endings() {
        let clipboard = TestClipboard {
            content: "a\r\nb\rc".into(),
        };
        let (mut editor, _) = editor_with(clipboard);
        editor.handle_key_press(KeyPressEvent::ctrl('v')).unwrap();
        pretty_assertions::assert_eq!(editor.text(), "a\nb\nc");
    }

    #[test]
    fn test_clipboard_failures_are_ignored() {
        let (mut editor, _) = editor_with(UnavailableClipboard);
        type_str(&mut editor, "abc");
        let now = Instant::now();
        editor.apply_action(EditorAction::Copy, now).unwrap();
        editor
            .apply_action(EditorAction::Copy, now + Duration::from_millis(100))
            .unwrap();
        let event = editor.handle_key_press(KeyPressEvent::ctrl('v')).unwrap();
        pretty_assertions::assert_eq!(event, None);
        pretty_assertions::assert_eq!(editor.text(), "abc");
        assert!(editor.is_listening());
    }

    #[test]
    fn test_double_tab_reindents_everything() {
        let (mut editor, _) = editor_with(TestClipboard::default());
        editor
            .handle_key_press(KeyPressEvent::text("if x:\n      1\nend"))
            .unwrap();
        // Only the line being typed is reindented on insert.
        pretty_assertions::assert_eq!(editor.text(), "if x:\n      1\nend");

        let now = Instant::now();
        editor.apply_action(EditorAction::Tab, now).unwrap();
        editor
            .apply_action(EditorAction::Tab, now + Duration::from_millis(50))
            .unwrap();
        pretty_assertions::assert_eq!(editor.text(), "if x:\n  1\nend");
    }

    #[test]
    fn test_backspace_and_delete() {
        let (mut editor, _) = editor_with(TestClipboard::default());
        type_str(&mut editor, "abc");
        editor
            .handle_key_press(KeyPressEvent::key(KeyName::Backspace))
            .unwrap();
        editor.handle_key_press(KeyPressEvent::key(KeyName::Home)).unwrap();
        editor
            .handle_key_press(KeyPressEvent::key(KeyName::Delete))
            .unwrap();
        pretty_assertions::assert_eq!(editor.text(), "b");
        pretty_assertions::assert_eq!(editor.history().entry(0).unwrap().current, "b");
    }
}
