// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::time::{Duration, Instant};

use strum_macros::Display;

/// Keys whose second press inside a short window means something other than two single
/// presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DoublePressKey {
    Tab,
    Copy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoublePressOutcome {
    /// Second press of `key` inside its window. Run the double action.
    Double(DoublePressKey),
    /// The press is now pending. If a different key was pending it is handed back in
    /// `flushed`, and its single action is due now.
    Armed { flushed: Option<DoublePressKey> },
}

/// Tracks at most one pending press. A pending press becomes a single press when its
/// [`DoublePress::deadline`] passes, or when anything else happens first. Either way the
/// owner collects it with [`DoublePress::take_pending`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoublePress {
    pending: Option<(DoublePressKey, Instant)>,
}

impl DoublePress {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Registers a press of `key` at `now`. `window` is how long the press stays pending.
    pub fn press(
        &mut self,
        key: DoublePressKey,
        now: Instant,
        window: Duration,
    ) -> DoublePressOutcome {
        match self.pending.take() {
            Some((pending, deadline)) if pending == key && now <= deadline => {
                DoublePressOutcome::Double(key)
            }
            Some((pending, _)) => {
                self.pending = Some((key, now + window));
                DoublePressOutcome::Armed {
                    flushed: Some(pending),
                }
            }
            None => {
                self.pending = Some((key, now + window));
                DoublePressOutcome::Armed { flushed: None }
            }
        }
    }

    /// When the pending press turns into a single press.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> { self.pending.map(|(_, deadline)| deadline) }

    #[must_use]
    pub fn is_pending(&self) -> bool { self.pending.is_some() }

    pub fn take_pending(&mut self) -> Option<DoublePressKey> {
        self.pending.take().map(|(key, _)| key)
    }
}
