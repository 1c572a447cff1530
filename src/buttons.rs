//! Button module: lifecycle, interrupt entry points and queries.
//!
//! Provides [`Buttons`], which owns the GPIO driver, the timer service and one
//! [`ButtonRuntime`] per button. Task code calls the lifecycle and query methods.
//! The platform's GPIO interrupt calls [`Buttons::on_edge`] and its timer
//! callback calls [`Buttons::on_debounce_timeout`].

use crate::debounce::{ButtonRuntime, TimeoutAction};
use crate::gpio::GpioDriver;
use crate::registry::{ButtonRegistry, ConfigError, RegistryEntry};
use crate::time::{DebounceTimer, TimeDuration};
use crate::types::{ButtonConfig, ButtonId, ButtonState, MAX_BUTTONS};
use core::cell::{Cell, RefCell};
use critical_section::Mutex;

/// Callback invoked once per accepted press.
///
/// Runs on the edge interrupt path, outside any critical section. Keep it short;
/// pushing into a [`PressEvents`](crate::PressEvents) queue is the intended use.
pub type PressCallback = fn(ButtonId);

/// Errors that can occur during button operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonError {
    /// The button table failed validation.
    InvalidConfiguration(ConfigError),
    /// The driver failed while installing the interrupt service or configuring a line.
    InitError,
    /// The driver failed while releasing a line.
    DeinitError,
    /// [`Buttons::init_module`] has not completed successfully.
    ModuleNotInitialized,
    /// The ID is not part of the button table.
    ButtonNotFound(ButtonId),
    /// The button is already initialized.
    AlreadyInitialized(ButtonId),
    /// The button has not been initialized.
    ButtonNotInitialized(ButtonId),
}

impl core::fmt::Display for ButtonError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ButtonError::InvalidConfiguration(err) => {
                write!(f, "invalid button configuration: {}", err)
            }
            ButtonError::InitError => write!(f, "GPIO or interrupt setup failed"),
            ButtonError::DeinitError => write!(f, "GPIO release failed"),
            ButtonError::ModuleNotInitialized => write!(f, "button module not initialized"),
            ButtonError::ButtonNotFound(id) => {
                write!(f, "button ID {} does not exist", id.0)
            }
            ButtonError::AlreadyInitialized(id) => {
                write!(f, "button ID {} is already initialized", id.0)
            }
            ButtonError::ButtonNotInitialized(id) => {
                write!(f, "button ID {} is not initialized", id.0)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ButtonError {}

impl From<ConfigError> for ButtonError {
    fn from(err: ConfigError) -> Self {
        ButtonError::InvalidConfiguration(err)
    }
}

/// Logs the outcome of a button operation and passes it through unchanged.
///
/// Successes are logged at info level, failures at error level. Without the
/// `defmt` feature this is a no-op.
#[cfg_attr(not(feature = "defmt"), allow(unused_variables))]
pub fn log_result<T>(result: Result<T, ButtonError>) -> Result<T, ButtonError> {
    match &result {
        Ok(_) => info!("button operation ok"),
        Err(err) => error!("button operation failed: {}", err),
    }
    result
}

type Entry<G, T> = RegistryEntry<
    <G as GpioDriver>::Line,
    <T as DebounceTimer>::Duration,
    <T as DebounceTimer>::Handle,
>;

type Registry<G, T, const N: usize> = ButtonRegistry<
    <G as GpioDriver>::Line,
    <T as DebounceTimer>::Duration,
    <T as DebounceTimer>::Handle,
    N,
>;

struct Hardware<G: GpioDriver, T: DebounceTimer, const N: usize> {
    gpio: G,
    timers: T,
    // Some once the module is initialized; never goes back to None.
    registry: Option<Registry<G, T, N>>,
}

impl<G: GpioDriver, T: DebounceTimer, const N: usize> Hardware<G, T, N> {
    fn entry(&self, id: ButtonId) -> Result<Entry<G, T>, ButtonError> {
        let registry = self
            .registry
            .as_ref()
            .ok_or(ButtonError::ModuleNotInitialized)?;

        registry
            .entry(id)
            .copied()
            .ok_or(ButtonError::ButtonNotFound(id))
    }
}

/// Debounces a fixed table of interrupt-driven buttons.
///
/// Since this is shared between task code, the GPIO interrupt and the timer
/// callback, it is generally put into a `static`. [`new`](Self::new) is a
/// `const fn` for that purpose. Every method takes `&self`; shared state is
/// guarded by `critical_section`.
///
/// The GPIO driver and timer service are called with that state borrowed, so
/// their methods must not call back into the same `Buttons`. A timer that
/// expires synchronously inside [`DebounceTimer::start`] has its
/// [`on_debounce_timeout`](Self::on_debounce_timeout) call dropped and logged;
/// the same goes for an edge raised inside a driver call.
///
/// A table holds at most [`MAX_BUTTONS`] buttons; larger tables fail to compile.
///
/// # Type Parameters
/// * `G` - GPIO driver
/// * `T` - Debounce timer service
/// * `N` - Number of buttons
pub struct Buttons<G: GpioDriver, T: DebounceTimer, const N: usize> {
    configs: [ButtonConfig<G::Line, T::Duration>; N],
    hardware: Mutex<RefCell<Hardware<G, T, N>>>,
    slots: [Mutex<Cell<ButtonRuntime>>; N],
    on_press: Option<PressCallback>,
}

impl<G: GpioDriver, T: DebounceTimer, const N: usize> Buttons<G, T, N> {
    /// Creates an uninitialized button module.
    ///
    /// The configuration table is only validated by [`init_module`](Self::init_module).
    pub const fn new(gpio: G, timers: T, configs: [ButtonConfig<G::Line, T::Duration>; N]) -> Self {
        const { assert!(N <= MAX_BUTTONS, "a button table holds at most 256 buttons") };

        Self {
            configs,
            hardware: Mutex::new(RefCell::new(Hardware {
                gpio,
                timers,
                registry: None,
            })),
            slots: [const { Mutex::new(Cell::new(ButtonRuntime::new())) }; N],
            on_press: None,
        }
    }

    /// Sets the callback invoked on every accepted press.
    pub const fn with_press_callback(mut self, on_press: PressCallback) -> Self {
        self.on_press = Some(on_press);
        self
    }

    /// Replaces or removes the press callback.
    pub fn set_press_callback(&mut self, on_press: Option<PressCallback>) {
        self.on_press = on_press;
    }

    /// Validates the button table, installs the GPIO interrupt service and
    /// creates the debounce timers.
    ///
    /// Timers are only created once the table is valid and the interrupt
    /// service is installed, so a failed attempt can be retried without
    /// leaking timers. Calling this again after it succeeded does nothing and
    /// returns `Ok`.
    ///
    /// # Errors
    /// * `InvalidConfiguration` - The table failed validation or a timer could not be created
    /// * `InitError` - The interrupt service could not be installed
    pub fn init_module(&self) -> Result<(), ButtonError> {
        critical_section::with(|cs| -> Result<(), ButtonError> {
            let mut hardware = self.hardware.borrow_ref_mut(cs);
            if hardware.registry.is_some() {
                return Ok(());
            }

            let hw = &mut *hardware;
            Registry::<G, T, N>::validate(&self.configs, &hw.gpio).map_err(|err| {
                error!("rejected button table: {}", err);
                err
            })?;

            hw.gpio.install_interrupt_service().map_err(|_| {
                error!("could not install GPIO interrupt service");
                ButtonError::InitError
            })?;

            let registry = ButtonRegistry::build(&self.configs, &hw.gpio, &mut hw.timers)
                .map_err(|err| {
                    error!("could not create debounce timers: {}", err);
                    err
                })?;

            hw.registry = Some(registry);
            info!("button module ready with {} buttons", N);
            Ok(())
        })
    }

    /// Configures a button's line and enables its edge interrupt.
    ///
    /// The button is eligible for a press as soon as this returns.
    ///
    /// # Errors
    /// * `ModuleNotInitialized` - [`init_module`](Self::init_module) has not succeeded
    /// * `ButtonNotFound` - Unknown ID
    /// * `AlreadyInitialized` - The button is already initialized
    /// * `InitError` - The driver failed; the button stays uninitialized
    pub fn init_button(&self, id: ButtonId) -> Result<(), ButtonError> {
        critical_section::with(|cs| -> Result<(), ButtonError> {
            let mut hardware = self.hardware.borrow_ref_mut(cs);
            let entry = hardware.entry(id)?;

            let slot = self.slots[id.index()].borrow(cs);
            let mut runtime = slot.get();
            if runtime.is_initialized() {
                return Err(ButtonError::AlreadyInitialized(id));
            }

            configure_line(&mut hardware.gpio, &entry.config).map_err(|_| {
                error!("could not configure line for {}", id);
                ButtonError::InitError
            })?;

            runtime.arm();
            slot.set(runtime);
            info!("{} initialized", id);
            Ok(())
        })
    }

    /// Disables a button's interrupt and releases its line.
    ///
    /// The press counter and last state are kept, and the button can be
    /// initialized again later.
    ///
    /// # Errors
    /// * `ModuleNotInitialized` - [`init_module`](Self::init_module) has not succeeded
    /// * `ButtonNotFound` - Unknown ID
    /// * `ButtonNotInitialized` - The button is not initialized
    /// * `DeinitError` - The driver failed; the button stays initialized
    pub fn deinit_button(&self, id: ButtonId) -> Result<(), ButtonError> {
        critical_section::with(|cs| -> Result<(), ButtonError> {
            let mut hardware = self.hardware.borrow_ref_mut(cs);
            let entry = hardware.entry(id)?;

            let slot = self.slots[id.index()].borrow(cs);
            let mut runtime = slot.get();
            if !runtime.is_initialized() {
                return Err(ButtonError::ButtonNotInitialized(id));
            }

            release_line(&mut hardware.gpio, entry.config.line).map_err(|_| {
                error!("could not release line for {}", id);
                ButtonError::DeinitError
            })?;

            runtime.disarm();
            slot.set(runtime);
            info!("{} de-initialized", id);
            Ok(())
        })
    }

    /// Returns the last observed state of a button.
    ///
    /// # Errors
    /// * `ModuleNotInitialized` - [`init_module`](Self::init_module) has not succeeded
    /// * `ButtonNotFound` - Unknown ID
    /// * `ButtonNotInitialized` - The button is not initialized
    pub fn read_state(&self, id: ButtonId) -> Result<ButtonState, ButtonError> {
        let runtime = self.runtime(id)?;
        if !runtime.is_initialized() {
            return Err(ButtonError::ButtonNotInitialized(id));
        }
        Ok(runtime.state())
    }

    /// Returns how many presses a button has registered.
    ///
    /// Works on de-initialized buttons too; the count survives de-init.
    ///
    /// # Errors
    /// * `ModuleNotInitialized` - [`init_module`](Self::init_module) has not succeeded
    /// * `ButtonNotFound` - Unknown ID
    pub fn press_count(&self, id: ButtonId) -> Result<u64, ButtonError> {
        Ok(self.runtime(id)?.presses())
    }

    /// Returns true if the given button is currently initialized.
    ///
    /// # Errors
    /// * `ModuleNotInitialized` - [`init_module`](Self::init_module) has not succeeded
    /// * `ButtonNotFound` - Unknown ID
    pub fn is_button_initialized(&self, id: ButtonId) -> Result<bool, ButtonError> {
        Ok(self.runtime(id)?.is_initialized())
    }

    /// Returns the validated configuration of a button.
    ///
    /// # Errors
    /// * `ModuleNotInitialized` - [`init_module`](Self::init_module) has not succeeded
    /// * `ButtonNotFound` - Unknown ID
    pub fn config(&self, id: ButtonId) -> Result<ButtonConfig<G::Line, T::Duration>, ButtonError> {
        critical_section::with(|cs| -> Result<_, ButtonError> {
            Ok(self.hardware.borrow_ref(cs).entry(id)?.config)
        })
    }

    /// Returns true once [`init_module`](Self::init_module) has succeeded.
    pub fn is_initialized(&self) -> bool {
        critical_section::with(|cs| self.hardware.borrow_ref(cs).registry.is_some())
    }

    /// Returns true if `id` is part of the button table.
    #[inline]
    pub fn exists(&self, id: ButtonId) -> bool {
        id.index() < N
    }

    /// Returns the number of buttons in the table.
    #[inline]
    pub fn len(&self) -> usize {
        N
    }

    /// Returns true if the table has no buttons.
    #[inline]
    pub fn is_empty(&self) -> bool {
        N == 0
    }

    /// Edge interrupt entry point.
    ///
    /// Call this from the GPIO interrupt handler with the ID the handler was
    /// attached with. Accepts the edge as a press only if the button is settled
    /// and its debounce timer is idle; everything else is bounce and is dropped.
    /// On acceptance the press is counted, the debounce timer is started and the
    /// press callback is invoked.
    pub fn on_edge(&self, id: ButtonId) {
        let accepted = critical_section::with(|cs| {
            let Ok(mut hardware) = self.hardware.borrow(cs).try_borrow_mut() else {
                warn!("re-entrant edge for {} dropped", id);
                return false;
            };
            let hw = &mut *hardware;
            let Ok(entry) = hw.entry(id) else {
                warn!("edge for unknown {}", id);
                return false;
            };

            let slot = self.slots[id.index()].borrow(cs);
            let mut runtime = slot.get();
            if !runtime.accepts_edge(hw.timers.is_active(entry.timer)) {
                trace!("bounce on {} ignored", id);
                return false;
            }

            let accepted = match hw.gpio.is_high(entry.config.line) {
                Ok(high) => {
                    runtime.record_press(entry.config.active.state_for(high));
                    true
                }
                Err(_) => {
                    error!("could not read line for {}", id);
                    runtime.open_window();
                    false
                }
            };
            slot.set(runtime);

            if hw.timers.start(entry.timer).is_err() {
                error!("could not start debounce timer for {}", id);
            }

            accepted
        });

        if accepted {
            debug!("{} pressed", id);
            if let Some(on_press) = self.on_press {
                on_press(id);
            }
        }
    }

    /// Debounce timer entry point.
    ///
    /// Call this when the timer created for `id` expires. If the line still
    /// reads pressed the timer is restarted; otherwise the button settles and
    /// may accept its next press. Releases are never counted.
    pub fn on_debounce_timeout(&self, id: ButtonId) {
        critical_section::with(|cs| {
            let Ok(mut hardware) = self.hardware.borrow(cs).try_borrow_mut() else {
                warn!("re-entrant timeout for {} dropped", id);
                return;
            };
            let hw = &mut *hardware;
            let Ok(entry) = hw.entry(id) else {
                warn!("timeout for unknown {}", id);
                return;
            };

            let slot = self.slots[id.index()].borrow(cs);
            let mut runtime = slot.get();

            let observed = if runtime.is_initialized() {
                match hw.gpio.is_high(entry.config.line) {
                    Ok(high) => Some(entry.config.active.state_for(high)),
                    Err(_) => {
                        error!("could not read line for {}", id);
                        None
                    }
                }
            } else {
                None
            };

            let action = runtime.on_timeout(observed);
            slot.set(runtime);

            match action {
                TimeoutAction::Rearm => {
                    if hw.timers.start(entry.timer).is_err() {
                        error!("could not restart debounce timer for {}", id);
                    }
                }
                TimeoutAction::Settled => debug!("{} settled", id),
                TimeoutAction::Ignore => trace!("timeout on released {}", id),
            }
        })
    }

    fn runtime(&self, id: ButtonId) -> Result<ButtonRuntime, ButtonError> {
        critical_section::with(|cs| -> Result<ButtonRuntime, ButtonError> {
            self.hardware.borrow_ref(cs).entry(id)?;
            Ok(self.slots[id.index()].borrow(cs).get())
        })
    }
}

fn configure_line<G: GpioDriver, D: TimeDuration>(
    gpio: &mut G,
    config: &ButtonConfig<G::Line, D>,
) -> Result<(), G::Error> {
    gpio.reset_line(config.line)?;
    gpio.configure_input(config.line, config.pull)?;
    gpio.set_edge_trigger(config.line, config.edge)?;
    gpio.attach_edge_handler(config.line, config.id)
}

fn release_line<G: GpioDriver>(gpio: &mut G, line: G::Line) -> Result<(), G::Error> {
    gpio.disable_interrupt(line)?;
    gpio.detach_edge_handler(line)?;
    gpio.reset_line(line)
}
