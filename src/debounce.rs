//! Per-button debounce state machine.
//!
//! [`ButtonRuntime`] holds everything that changes at runtime for one button. It
//! is plain `Copy` data: [`Buttons`](crate::Buttons) keeps one per button inside a
//! critical-section mutex and applies these transitions to a copy before writing
//! it back, so every update is a single atomic read-modify-write.
//!
//! The gate is simple. An edge is accepted only while the button is `settled`
//! and its debounce timer is idle. Accepting an edge clears `settled` and counts
//! the press immediately. `settled` comes back only when a timer expiry observes
//! the line released, so any chatter in between is dropped.

use crate::types::ButtonState;

/// What the timer path must do after a debounce timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeoutAction {
    /// Line still pressed: restart the timer for another full window.
    Rearm,
    /// Line released: the button may accept a new press.
    Settled,
    /// Button is not initialized; nothing to do.
    Ignore,
}

/// Runtime state of one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonRuntime {
    initialized: bool,
    state: ButtonState,
    settled: bool,
    presses: u64,
}

impl ButtonRuntime {
    /// Creates the state of a button that has never been initialized.
    pub const fn new() -> Self {
        Self {
            initialized: false,
            state: ButtonState::NotPressed,
            settled: false,
            presses: 0,
        }
    }

    /// Marks the button initialized and eligible for its first press.
    pub fn arm(&mut self) {
        self.initialized = true;
        self.settled = true;
    }

    /// Marks the button de-initialized. History is kept.
    pub fn disarm(&mut self) {
        self.initialized = false;
    }

    /// Returns true if an edge arriving now would be accepted as a press.
    #[inline]
    pub fn accepts_edge(&self, timer_active: bool) -> bool {
        self.initialized && self.settled && !timer_active
    }

    /// Opens a debounce window without counting a press.
    ///
    /// Used when the edge was accepted but the line could not be read.
    #[inline]
    pub fn open_window(&mut self) {
        self.settled = false;
    }

    /// Records an accepted press observed with the given line state.
    ///
    /// The counter wraps on overflow of `u64`.
    pub fn record_press(&mut self, state: ButtonState) {
        self.settled = false;
        self.state = state;
        self.presses = self.presses.wrapping_add(1);
    }

    /// Applies a debounce timeout that observed the given line state.
    ///
    /// `None` means the line could not be read; the window stays open and the
    /// timer is re-armed so the next expiry can try again.
    pub fn on_timeout(&mut self, observed: Option<ButtonState>) -> TimeoutAction {
        if !self.initialized {
            return TimeoutAction::Ignore;
        }

        match observed {
            Some(ButtonState::Pressed) => {
                self.state = ButtonState::Pressed;
                TimeoutAction::Rearm
            }
            Some(ButtonState::NotPressed) => {
                self.state = ButtonState::NotPressed;
                self.settled = true;
                TimeoutAction::Settled
            }
            None => TimeoutAction::Rearm,
        }
    }

    /// Returns true if the button's line is configured and its interrupt enabled.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the last observed logical state.
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Returns true if no debounce window is open.
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Returns the number of accepted presses.
    pub fn presses(&self) -> u64 {
        self.presses
    }
}

impl Default for ButtonRuntime {
    fn default() -> Self {
        Self::new()
    }
}
