#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Buttons`**: Owns the button table, the GPIO driver and the timer service; exposes lifecycle, queries and the two interrupt entry points
//! - **`ButtonConfig`**: Static description of one button (ID, line, pull, edge trigger, debounce delay)
//! - **`ButtonId`**: Dense button identifier, also used as the context value for edge handlers and timers
//! - **`ButtonRuntime`**: Per-button debounce state (settled flag, last state, press counter)
//! - **`ButtonRegistry`**: Validated table indexed by `ButtonId`
//! - **`GpioDriver`**: Trait to implement for your GPIO and interrupt hardware
//! - **`DebounceTimer`**: Trait to implement for your one-shot timer service
//! - **`PressEvents`**: Interrupt-safe queue for handing presses to task code
//!
//! A press is counted, and the callback fires, on the first accepted edge. The
//! button then ignores every edge until a debounce timeout sees the line released.

// Must come first so the logging macros are visible to every other module.
mod fmt;

pub mod time;
pub mod types;
pub mod gpio;
pub mod registry;
pub mod debounce;
pub mod buttons;
pub mod events;

pub use types::{
    ActiveLevel, ButtonConfig, ButtonId, ButtonState, DEFAULT_DEBOUNCE_MS, EdgeTrigger, MAX_BUTTONS, Pull,
};
pub use time::{DebounceTimer, TimeDuration};
pub use gpio::GpioDriver;
pub use registry::{ButtonRegistry, ConfigError, RegistryEntry};
pub use debounce::{ButtonRuntime, TimeoutAction};
pub use buttons::{ButtonError, Buttons, PressCallback, log_result};
pub use events::PressEvents;
