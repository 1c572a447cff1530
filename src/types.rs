//! Core types for button configuration.

use crate::time::TimeDuration;

/// Default debounce window used by [`ButtonConfig::with_default_delay`].
pub const DEFAULT_DEBOUNCE_MS: u64 = 50;

/// Largest number of buttons one table can hold; every [`ButtonId`] fits in a `u8`.
pub const MAX_BUTTONS: usize = u8::MAX as usize + 1;

/// An identifier for a button within a [`Buttons`](crate::Buttons) table.
///
/// Identifiers are dense: a table of `N` buttons uses exactly the ids
/// `0..N`, so `N` is capped at [`MAX_BUTTONS`]. The same value is handed to
/// the GPIO driver when the edge handler is attached and to the timer service
/// when the debounce timer is created, so both interrupt paths can route back
/// to the right button without a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonId(pub u8);

impl ButtonId {
    /// Returns the table index for this identifier.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u8> for ButtonId {
    fn from(id: u8) -> Self {
        ButtonId(id)
    }
}

impl From<ButtonId> for u8 {
    fn from(id: ButtonId) -> Self {
        id.0
    }
}

impl core::fmt::Display for ButtonId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "button {}", self.0)
    }
}

/// Logical state of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    /// The line reads its active level.
    Pressed,
    /// The line reads its idle level.
    NotPressed,
}

impl ButtonState {
    /// Returns true for [`ButtonState::Pressed`].
    #[inline]
    pub fn is_pressed(self) -> bool {
        self == ButtonState::Pressed
    }
}

/// Internal pull resistor configuration for a button line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// Pull-up only.
    Up,
    /// Pull-down only.
    Down,
    /// Both pull-up and pull-down enabled.
    UpDown,
    /// No internal pull; the board provides one.
    Floating,
}

/// Which line transitions raise the edge interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeTrigger {
    /// Low to high transition.
    Rising,
    /// High to low transition.
    Falling,
    /// Any transition.
    AnyEdge,
    /// While the line is low.
    LowLevel,
    /// While the line is high.
    HighLevel,
}

/// Electrical level that means "pressed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Pressed reads high.
    #[default]
    High,
    /// Pressed reads low.
    Low,
}

impl ActiveLevel {
    /// Maps a raw line level onto a logical button state.
    #[inline]
    pub fn state_for(self, is_high: bool) -> ButtonState {
        let pressed = match self {
            ActiveLevel::High => is_high,
            ActiveLevel::Low => !is_high,
        };

        if pressed {
            ButtonState::Pressed
        } else {
            ButtonState::NotPressed
        }
    }
}

/// Static configuration of a single button.
///
/// # Type Parameters
/// * `L` - The GPIO driver's line type
/// * `D` - The duration type used for the debounce delay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonConfig<L, D: TimeDuration> {
    /// Button identifier.
    pub id: ButtonId,

    /// Physical line the button is wired to.
    pub line: L,

    /// Pull resistor configuration.
    pub pull: Pull,

    /// Interrupt trigger.
    pub edge: EdgeTrigger,

    /// Debounce window.
    pub delay: D,

    /// Level that reads as pressed.
    pub active: ActiveLevel,
}

impl<L, D: TimeDuration> ButtonConfig<L, D> {
    /// Creates a new active-high button configuration.
    #[inline]
    pub const fn new(id: ButtonId, line: L, pull: Pull, edge: EdgeTrigger, delay: D) -> Self {
        Self {
            id,
            line,
            pull,
            edge,
            delay,
            active: ActiveLevel::High,
        }
    }

    /// Creates a new configuration with the [`DEFAULT_DEBOUNCE_MS`] window.
    #[inline]
    pub fn with_default_delay(id: ButtonId, line: L, pull: Pull, edge: EdgeTrigger) -> Self {
        Self::new(id, line, pull, edge, D::from_millis(DEFAULT_DEBOUNCE_MS))
    }

    /// Marks the button as pressed when its line reads low.
    #[inline]
    pub const fn active_low(mut self) -> Self {
        self.active = ActiveLevel::Low;
        self
    }

    /// Marks the button as pressed when its line reads high.
    #[inline]
    pub const fn active_high(mut self) -> Self {
        self.active = ActiveLevel::High;
        self
    }
}
