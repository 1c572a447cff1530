//! GPIO hardware abstraction.

use crate::types::{ButtonId, EdgeTrigger, Pull};

/// Trait for abstracting the GPIO line driver and its interrupt dispatcher.
///
/// Implement this for your HAL. Every method except
/// [`install_interrupt_service`](GpioDriver::install_interrupt_service) targets a
/// single line. [`is_high`](GpioDriver::is_high) is called from interrupt and
/// timer context and must be fast and non-blocking.
///
/// After [`attach_edge_handler`](GpioDriver::attach_edge_handler) succeeds, the
/// platform's interrupt handler for that line must call
/// [`Buttons::on_edge`](crate::Buttons::on_edge) with the same [`ButtonId`]. No method
/// here may call into [`Buttons`](crate::Buttons) itself.
pub trait GpioDriver {
    /// Line (pin number) type.
    type Line: Copy + PartialEq;

    /// Error reported by the driver.
    type Error;

    /// Returns true if `line` exists on this controller and can be used as an input.
    fn is_valid_line(&self, line: Self::Line) -> bool;

    /// Installs the shared per-line interrupt dispatch service.
    fn install_interrupt_service(&mut self) -> Result<(), Self::Error>;

    /// Returns the line to its power-on default configuration.
    fn reset_line(&mut self, line: Self::Line) -> Result<(), Self::Error>;

    /// Configures the line as an input with the given pull resistors.
    fn configure_input(&mut self, line: Self::Line, pull: Pull) -> Result<(), Self::Error>;

    /// Selects which transitions raise the line's interrupt.
    fn set_edge_trigger(&mut self, line: Self::Line, edge: EdgeTrigger) -> Result<(), Self::Error>;

    /// Registers the edge handler for the line, bound to `id`.
    fn attach_edge_handler(&mut self, line: Self::Line, id: ButtonId) -> Result<(), Self::Error>;

    /// Removes the line's edge handler.
    fn detach_edge_handler(&mut self, line: Self::Line) -> Result<(), Self::Error>;

    /// Stops the line from raising interrupts.
    fn disable_interrupt(&mut self, line: Self::Line) -> Result<(), Self::Error>;

    /// Reads the current electrical level of the line.
    fn is_high(&mut self, line: Self::Line) -> Result<bool, Self::Error>;
}
