//! Validated, identifier-indexed button table.

use crate::gpio::GpioDriver;
use crate::time::{DebounceTimer, TimeDuration};
use crate::types::{ButtonConfig, ButtonId, MAX_BUTTONS};
use heapless::Vec;

/// Reasons a button table is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The button ID exceeds the table's capacity.
    IdOutOfRange { id: ButtonId, capacity: usize },

    /// The same button ID appears more than once.
    DuplicateId(ButtonId),

    /// The GPIO driver does not recognise the button's line.
    InvalidLine(ButtonId),

    /// The debounce delay is zero.
    ZeroDelay(ButtonId),

    /// The timer service could not create the button's debounce timer.
    TimerUnavailable(ButtonId),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::IdOutOfRange { id, capacity } => {
                write!(f, "button ID {} exceeds table capacity of {}", id.0, capacity)
            }
            ConfigError::DuplicateId(id) => {
                write!(f, "button ID {} is configured more than once", id.0)
            }
            ConfigError::InvalidLine(id) => {
                write!(f, "button ID {} uses a line the GPIO driver does not recognise", id.0)
            }
            ConfigError::ZeroDelay(id) => {
                write!(f, "button ID {} has a zero debounce delay", id.0)
            }
            ConfigError::TimerUnavailable(id) => {
                write!(f, "could not create debounce timer for button ID {}", id.0)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// A validated button together with its debounce timer.
#[derive(Debug, Clone, Copy)]
pub struct RegistryEntry<L, D: TimeDuration, H> {
    /// The button's static configuration.
    pub config: ButtonConfig<L, D>,

    /// Timer created for this button.
    pub timer: H,
}

/// Dense table of validated buttons, indexed by [`ButtonId`].
///
/// Built once from the caller's configuration list. Entries are reordered so that
/// entry `i` belongs to `ButtonId(i)`; after construction the table can be neither
/// resized nor reordered.
///
/// # Type Parameters
/// * `L` - GPIO line type
/// * `D` - Debounce delay type
/// * `H` - Timer handle type
/// * `N` - Number of buttons
#[derive(Debug)]
pub struct ButtonRegistry<L, D: TimeDuration, H, const N: usize> {
    entries: Vec<RegistryEntry<L, D, H>, N>,
}

impl<L, D, H, const N: usize> ButtonRegistry<L, D, H, N>
where
    L: Copy,
    D: TimeDuration,
    H: Copy,
{
    /// Checks `configs` without touching the timer service.
    ///
    /// Fails for exactly the tables [`build`](Self::build) would reject before
    /// creating its first timer.
    ///
    /// # Errors
    /// * `IdOutOfRange` - An ID is not below `N`
    /// * `DuplicateId` - Two entries share an ID
    /// * `InvalidLine` - The driver rejects a line
    /// * `ZeroDelay` - A debounce delay is zero
    pub fn validate<G>(configs: &[ButtonConfig<L, D>; N], gpio: &G) -> Result<(), ConfigError>
    where
        G: GpioDriver<Line = L>,
    {
        Self::sort(configs, gpio).map(|_| ())
    }

    /// Validates `configs`, sorts them into identifier order and creates one
    /// debounce timer per button.
    ///
    /// No timer is created unless the whole table is valid.
    ///
    /// # Errors
    /// * `IdOutOfRange` - An ID is not below `N`
    /// * `DuplicateId` - Two entries share an ID
    /// * `InvalidLine` - The driver rejects a line
    /// * `ZeroDelay` - A debounce delay is zero
    /// * `TimerUnavailable` - The timer service failed to create a timer
    pub fn build<G, T>(
        configs: &[ButtonConfig<L, D>; N],
        gpio: &G,
        timers: &mut T,
    ) -> Result<Self, ConfigError>
    where
        G: GpioDriver<Line = L>,
        T: DebounceTimer<Handle = H, Duration = D>,
    {
        let sorted = Self::sort(configs, gpio)?;

        let mut entries = Vec::new();
        for config in sorted.iter().flatten() {
            let timer = timers
                .create(config.id, config.delay)
                .map_err(|_| ConfigError::TimerUnavailable(config.id))?;

            let pushed = entries.push(RegistryEntry {
                config: *config,
                timer,
            });
            debug_assert!(pushed.is_ok(), "sorted table holds at most N entries");
        }

        Ok(Self { entries })
    }

    fn sort<G>(
        configs: &[ButtonConfig<L, D>; N],
        gpio: &G,
    ) -> Result<[Option<ButtonConfig<L, D>>; N], ConfigError>
    where
        G: GpioDriver<Line = L>,
    {
        const { assert!(N <= MAX_BUTTONS, "a button table holds at most 256 buttons") };

        let mut sorted: [Option<ButtonConfig<L, D>>; N] = [None; N];

        for config in configs {
            let id = config.id;
            let idx = id.index();

            if idx >= N {
                return Err(ConfigError::IdOutOfRange { id, capacity: N });
            }

            if sorted[idx].is_some() {
                return Err(ConfigError::DuplicateId(id));
            }

            if !gpio.is_valid_line(config.line) {
                return Err(ConfigError::InvalidLine(id));
            }

            if config.delay == D::ZERO {
                return Err(ConfigError::ZeroDelay(id));
            }

            sorted[idx] = Some(*config);
        }

        // N entries with N distinct IDs below N fill every slot.
        Ok(sorted)
    }

    /// Returns the configuration of the given button, if it exists.
    #[inline]
    pub fn lookup(&self, id: ButtonId) -> Option<&ButtonConfig<L, D>> {
        self.entries.get(id.index()).map(|entry| &entry.config)
    }

    /// Returns the full entry for the given button, if it exists.
    #[inline]
    pub fn entry(&self, id: ButtonId) -> Option<&RegistryEntry<L, D, H>> {
        self.entries.get(id.index())
    }

    /// Returns true if the table contains the given button.
    #[inline]
    pub fn exists(&self, id: ButtonId) -> bool {
        id.index() < self.entries.len()
    }

    /// Returns the number of buttons in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry<L, D, H>> {
        self.entries.iter()
    }
}
