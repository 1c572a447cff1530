//! Time abstraction traits for platform-agnostic timing.

use crate::types::ButtonId;

/// Trait for abstracting a one-shot timer service.
///
/// Implement this on top of your platform's software timers (FreeRTOS timers,
/// an embassy task per button, a hardware timer channel, ...). One timer is
/// created per button when the module is initialized.
///
/// When a timer expires, the platform must call
/// [`Buttons::on_debounce_timeout`](crate::Buttons::on_debounce_timeout) with the
/// [`ButtonId`] the timer was created for. `start` and `is_active` are called
/// from the edge interrupt path and must not block.
///
/// Methods are called while the button table is borrowed. An expiry must be
/// delivered later, from the timer's own context, never from inside `start`.
pub trait DebounceTimer {
    /// Opaque handle to a created timer.
    type Handle: Copy;

    /// Duration type used for timer periods.
    type Duration: TimeDuration;

    /// Error reported by the timer service.
    type Error;

    /// Creates a one-shot timer with the given period, bound to `id`.
    fn create(&mut self, id: ButtonId, period: Self::Duration) -> Result<Self::Handle, Self::Error>;

    /// Starts the timer, or restarts it with a fresh deadline if already running.
    fn start(&mut self, handle: Self::Handle) -> Result<(), Self::Error>;

    /// Returns true while the timer is counting down.
    fn is_active(&self, handle: Self::Handle) -> bool;
}

/// Trait abstraction for duration types.
///
/// Debounce delays are stored in this type and handed to the
/// [`DebounceTimer`](crate::DebounceTimer) when timers are created.
pub trait TimeDuration: Copy + PartialEq {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;
}

impl TimeDuration for core::time::Duration {
    const ZERO: Self = core::time::Duration::ZERO;

    fn as_millis(&self) -> u64 {
        // Debounce delays never get anywhere near u64::MAX milliseconds.
        core::time::Duration::as_millis(self) as u64
    }

    fn from_millis(millis: u64) -> Self {
        core::time::Duration::from_millis(millis)
    }
}
