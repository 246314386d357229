// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::Debug, time::Instant};

use crossterm::event::EventStream;
use futures_util::StreamExt as _;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use super::{ClipboardService, CrosstermTerminal, DoublePress, EditorConfig, EditorError,
            EditorEvent, EditorState, InputLiveness, KeyPressEvent, PlainPresenter,
            Presenter, SystemClipboard, TerminalSink};
use crate::{DisplayContext, EditBuffer, HistoryStore, IndentFrame, IndentTracker,
            NEW_LINE, PinnedInputStream};

/// Drop key events until the evaluator has answered and [`LineEditor::prompt`] ran.
macro_rules! early_return_if_not_listening {
    ($self:ident @None) => {
        if matches!($self.liveness, InputLiveness::AwaitingPrompt) {
            return Ok(None);
        }
    };
}

/// # Mental model and overview
///
/// A multi-line prompt for a block structured language. Keystrokes are pulled from an
/// input stream by [`LineEditor::readline`], which returns once the user has typed a
/// complete chunk of source (every block it opens is closed) and pressed `Enter`.
///
/// ```text
/// > fun f(x):
///     x + 1
///   end
/// ```
///
/// Until then `Enter` inserts a newline, and every line is reindented as it is typed
/// using [`IndentTracker`]. The lines after the first are drawn after the continuation
/// prompt.
///
/// # Handing off to an evaluator
///
/// After a command is returned, keystrokes are dropped until the caller has shown the
/// result (see [`LineEditor::print`]) and calls [`LineEditor::prompt`]. Events are also
/// published to every receiver handed out by [`LineEditor::subscribe`].
///
/// # Inputs and dependency injection
///
/// Everything the editor talks to is passed into [`LineEditor::try_new`], so tests can
/// supply a mock terminal, a test clipboard and a generated input stream.
/// [`LineEditor::try_new_with_terminal`] wires up the real ones.
pub struct LineEditor {
    pub(crate) config: EditorConfig,
    pub(crate) buffer: EditBuffer,
    pub(crate) tracker: IndentTracker,
    /// One frame per line of `buffer`, empty when the buffer is.
    pub(crate) frames: Vec<IndentFrame>,
    pub(crate) history: HistoryStore,
    pub(crate) double_press: DoublePress,
    pub(crate) state: EditorState,
    pub(crate) liveness: InputLiveness,
    pub(crate) prompt_number: usize,
    /// Screen row of the cursor after the last redraw, counted from the prompt's row.
    pub(crate) last_cursor_row: usize,
    /// Last row of the display that fits on screen when it is taller than the terminal.
    pub(crate) last_display_row: usize,
    pub(crate) is_closed: bool,
    pub(crate) sink: Box<dyn TerminalSink>,
    pub(crate) presenter: Box<dyn Presenter>,
    pub(crate) clipboard: Box<dyn ClipboardService>,
    pub(crate) input: PinnedInputStream<KeyPressEvent>,
    pub(crate) subscribers: Vec<UnboundedSender<EditorEvent>>,
}

impl Debug for LineEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineEditor")
            .field("config", &self.config)
            .field("buffer", &self.buffer)
            .field("history", &self.history)
            .field("state", &self.state)
            .field("liveness", &self.liveness)
            .field("prompt_number", &self.prompt_number)
            .finish_non_exhaustive()
    }
}

impl LineEditor {
    /// Creates the editor and draws the first prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the indent rules fail to compile, or if the prompt can't be
    /// drawn.
    pub fn try_new(
        config: EditorConfig,
        sink: Box<dyn TerminalSink>,
        presenter: Box<dyn Presenter>,
        clipboard: Box<dyn ClipboardService>,
        input: PinnedInputStream<KeyPressEvent>,
    ) -> Result<Self, EditorError> {
        let history = HistoryStore::new().with_max_entries(config.history_max_entries);
        let mut editor = Self {
            config,
            buffer: EditBuffer::new(),
            tracker: IndentTracker::try_default()?,
            frames: vec![],
            history,
            double_press: DoublePress::new(),
            state: EditorState::default(),
            liveness: InputLiveness::default(),
            prompt_number: 0,
            last_cursor_row: 0,
            last_display_row: 0,
            is_closed: false,
            sink,
            presenter,
            clipboard,
            input,
            subscribers: vec![],
        };
        editor.show_prompt(false)?;
        Ok(editor)
    }

    /// Reads keys from [`EventStream`] and draws on stdout. The terminal must already be
    /// in raw mode.
    ///
    /// # Errors
    ///
    /// See [`LineEditor::try_new`].
    pub fn try_new_with_terminal(config: EditorConfig) -> Result<Self, EditorError> {
        let input = EventStream::new().filter_map(|result| async move {
            match result {
                Ok(event) => KeyPressEvent::from_crossterm(event),
                Err(error) => {
                    // % is Display, ? is Debug.
                    tracing::error!(message = "terminal input error", error = %error);
                    None
                }
            }
        });
        Self::try_new(
            config,
            Box::new(CrosstermTerminal::default()),
            Box::new(PlainPresenter),
            Box::new(SystemClipboard),
            Box::pin(input),
        )
    }

    /// Every [`EditorEvent`] is also sent to the returned receiver.
    pub fn subscribe(&mut self) -> UnboundedReceiver<EditorEvent> {
        let (sender, receiver) = unbounded_channel();
        self.subscribers.push(sender);
        receiver
    }

    pub(crate) fn publish(&mut self, event: &EditorEvent) {
        self.subscribers
            .retain(|sender| sender.send(event.clone()).is_ok());
    }

    #[must_use]
    pub fn text(&self) -> &str { self.buffer.text() }

    #[must_use]
    pub fn buffer(&self) -> &EditBuffer { &self.buffer }

    #[must_use]
    pub fn history(&self) -> &HistoryStore { &self.history }

    #[must_use]
    pub fn frames(&self) -> &[IndentFrame] { &self.frames }

    #[must_use]
    pub fn state(&self) -> EditorState { self.state }

    #[must_use]
    pub fn is_listening(&self) -> bool { self.liveness == InputLiveness::Listening }

    /// Number of prompts shown so far, starting at 1 for the first one.
    #[must_use]
    pub fn prompt_number(&self) -> usize { self.prompt_number }

    /// Shows a fresh prompt on a new line and starts listening again. Call this after
    /// the output for a command has been printed.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal can't be written to.
    pub fn prompt(&mut self) -> Result<(), EditorError> { self.show_prompt(true) }

    /// Writes `text` at the cursor, eg: the result of evaluating a command.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal can't be written to.
    pub fn print(&mut self, text: &str) -> Result<(), EditorError> {
        self.sink.write(text)?;
        self.sink.flush()?;
        Ok(())
    }

    pub(crate) fn show_prompt(&mut self, on_new_line: bool) -> Result<(), EditorError> {
        self.prompt_number += 1;
        self.buffer.reset();
        self.refresh_frames();
        self.last_cursor_row = 0;
        self.last_display_row = 0;
        if on_new_line {
            self.sink.write(NEW_LINE)?;
        }
        self.redraw(false)?;
        self.liveness = InputLiveness::Listening;
        Ok(())
    }

    /// Waits for the next [`EditorEvent`]. While waiting, keystrokes are applied to the
    /// buffer and the display is redrawn. A pending `Tab` or `Ctrl+Y` press turns into a
    /// single press when its window runs out with no second press.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Closed`] if called after [`EditorEvent::Close`], or an
    /// error if the terminal can't be written to.
    pub async fn readline(&mut self) -> Result<EditorEvent, EditorError> {
        if self.is_closed {
            return Err(EditorError::Closed);
        }

        loop {
            let deadline = self.double_press.deadline();
            tokio::select! {
                // Cancel safe: no state lives in this future, an item that isn't
                // polled to completion stays in the stream.
                maybe_event = self.input.next() => {
                    match maybe_event {
                        Some(event) => {
                            if let Some(editor_event) = self.handle_key_press(event)? {
                                return Ok(editor_event);
                            }
                        }
                        None => return Ok(self.close()),
                    }
                }

                () = sleep_until(deadline) => {
                    if let Some(key) = self.double_press.take_pending() {
                        self.run_single(key)?;
                    }
                }
            }
        }
    }

    /// Applies one keystroke. Returns the event it produced, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal can't be written to.
    pub fn handle_key_press(
        &mut self,
        event: KeyPressEvent,
    ) -> Result<Option<EditorEvent>, EditorError> {
        early_return_if_not_listening!(self @None);

        let Some(action) = super::EditorAction::from_key_press(&event) else {
            return Ok(None);
        };
        tracing::trace!(message = "key press", action = %action);
        self.apply_action(action, Instant::now())
    }

    pub(crate) fn close(&mut self) -> EditorEvent {
        self.is_closed = true;
        tracing::info!(message = "editor closed", prompt_number = self.prompt_number);
        let event = EditorEvent::Close;
        self.publish(&event);
        event
    }

    /// Rescans the buffer and updates the submit state.
    pub(crate) fn refresh_frames(&mut self) {
        self.frames = if self.buffer.is_empty() {
            vec![]
        } else {
            self.tracker.scan(self.buffer.text().split('\n'))
        };
        self.state = if IndentTracker::is_submit_ready(&self.frames) {
            EditorState::Ready
        } else {
            EditorState::Collecting
        };
    }
}

pub(crate) fn display_context(config: &EditorConfig, width: usize) -> DisplayContext<'_> {
    DisplayContext {
        prompt: &config.prompt,
        continuation_prompt: &config.continuation_prompt,
        width,
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        }
        None => std::future::pending().await,
    }
}
