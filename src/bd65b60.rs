//! Driver for the ROHM BD65B60 two channel LED backlight driver

use crate::configuration::{LedConfig, LedState};
use crate::errors::{InitializationError, Step, StepFailures};
use crate::field::Field;
use crate::register::{Register, RegisterMap};
use core::cell::RefCell;
use core::fmt::{Debug, Formatter};
use embassy_sync::blocking_mutex::raw::{NoopRawMutex, RawMutex};
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::i2c::I2c;

/// Highest brightness level
pub const MAX_BRIGHTNESS: u8 = 255;

/// Brightness a freshly registered backlight starts with
pub const DEFAULT_BRIGHTNESS: u8 = 255;

/// Value written to [`Bd65b60Register::SoftReset`] to reset the chip
pub const SOFT_RESET: u8 = 0x01;

/// Addresses of the registers of the BD65B60
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bd65b60Register {
    SoftReset = 0x00,
    /// Contains the over-voltage protection level
    ComSet1 = 0x01,
    ComSet2 = 0x02,
    LedSelect = 0x03,
    /// LED current, i.e. brightness
    Iled = 0x05,
    /// Contains the PWM enable bit
    CtrlSet = 0x07,
    SlewSet = 0x08,
    PowerOn = 0x0E,
}

impl Register for Bd65b60Register {
    fn address(self) -> u8 {
        self as u8
    }
}

/// PWM control enable
pub const PWM_ENABLE: Field<Bd65b60Register> = Field::new(Bd65b60Register::CtrlSet, 0b0010_0000);

/// Over-voltage protection level, see [`crate::configuration::Ovp`]
pub const OVP: Field<Bd65b60Register> = Field::new(Bd65b60Register::ComSet1, 0b0001_1000);

/// Enabled LED channels, bits 0 and 2. See [`crate::configuration::LedSelect`]
pub const LED_SELECT: Field<Bd65b60Register> =
    Field::new(Bd65b60Register::LedSelect, 0b0000_0101);

struct Inner<I2C> {
    map: RegisterMap<I2C>,
    state: LedState,
}

/// BD65B60 backlight driver
///
/// The register map and the current power state sit behind a mutex so the backlight can be
/// driven through a shared reference. Every operation holds the lock for all of its bus
/// accesses. Pick a raw mutex `M` that fits the contexts the driver is shared between,
/// e.g. `CriticalSectionRawMutex` when it is used from interrupts.
pub struct Bd65b60<I2C, M: RawMutex = NoopRawMutex> {
    inner: Mutex<M, RefCell<Inner<I2C>>>,
    config: LedConfig,
}

impl<I2C, M: RawMutex> Debug for Bd65b60<I2C, M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Bd65b60")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<I2C, M> Bd65b60<I2C, M>
where
    I2C: I2c,
    M: RawMutex,
{
    /// Create a driver and bring the chip into the configured state
    ///
    /// # Errors
    /// If any step of [`Bd65b60::initialize`] fails an `InitializationError` containing the
    /// I2C device is returned.
    pub fn new(
        i2c: I2C,
        address: u8,
        config: LedConfig,
    ) -> Result<Self, InitializationError<I2C, I2C::Error>> {
        let led = Self::new_unchecked(i2c, address, config);

        match led.initialize() {
            Ok(()) => Ok(led),
            Err(e) => Err(InitializationError::new(e, led.destroy())),
        }
    }

    /// Create a driver without touching the chip
    pub fn new_unchecked(i2c: I2C, address: u8, config: LedConfig) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                map: RegisterMap::new(i2c, address),
                state: config.default_state(),
            })),
            config,
        }
    }

    /// Destroy the driver returning the underlying I2C device
    ///
    /// This leaves the chip in its current state, see [`Bd65b60::shutdown`].
    pub fn destroy(self) -> I2C {
        self.inner.into_inner().into_inner().map.destroy()
    }

    /// The configuration the driver was created with
    #[must_use]
    pub const fn config(&self) -> &LedConfig {
        &self.config
    }

    /// Current power state
    ///
    /// This is the configured default state until the first call to
    /// [`Bd65b60::set_brightness`].
    pub fn state(&self) -> LedState {
        self.inner.lock(|inner| inner.borrow().state)
    }

    /// Program the chip according to the configuration
    ///
    /// - Soft reset, skipped if the state is [`LedState::Keep`]
    /// - Set the over-voltage protection level
    /// - Select the LED channels
    /// - Enable PWM control
    /// - Switch the chip on, or off if the state is [`LedState::Off`]
    ///
    /// A failing step does not stop the following ones.
    ///
    /// # Errors
    /// Returns the bus errors of all steps that failed.
    pub fn initialize(&self) -> Result<(), StepFailures<I2C::Error>> {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let Inner { map, state } = &mut *inner;
            let mut failures = StepFailures::new();

            if *state != LedState::Keep {
                failures.record(
                    Step::SoftReset,
                    map.write(Bd65b60Register::SoftReset, SOFT_RESET),
                );
            }

            failures.record(
                Step::Ovp,
                map.update(OVP.register(), OVP.mask(), self.config.ovp()),
            );
            failures.record(
                Step::LedSelect,
                map.update(LED_SELECT.register(), LED_SELECT.mask(), self.config.select()),
            );
            failures.record(Step::PwmEnable, map.write_field(PWM_ENABLE, 1));

            // A backlight left on by the bootloader stays on for `Keep`
            let power = if *state == LedState::Off {
                LedState::Off
            } else {
                LedState::On
            };
            failures.record(
                Step::PowerOn,
                map.write(Bd65b60Register::PowerOn, power as u8),
            );

            failures.into_result()
        })
    }

    /// Set the brightness, switching the chip on or off when crossing zero
    ///
    /// The brightness register is always written. The power-on register is only written when
    /// the power state changes. The stored state follows the request even if the power-on write
    /// fails.
    ///
    /// # Errors
    /// Returns the bus errors of the writes that failed.
    pub fn set_brightness(&self, level: u8) -> Result<(), StepFailures<I2C::Error>> {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let Inner { map, state } = &mut *inner;
            let mut failures = StepFailures::new();

            failures.record(Step::Brightness, map.write(Bd65b60Register::Iled, level));

            let new_state = if level > 0 {
                LedState::On
            } else {
                LedState::Off
            };

            if new_state != *state {
                log::debug!("Backlight {:?} -> {:?}", *state, new_state);
                failures.record(
                    Step::PowerOn,
                    map.write(Bd65b60Register::PowerOn, new_state as u8),
                );
                *state = new_state;
            }

            failures.into_result()
        })
    }

    /// Switch the chip off before it is detached
    ///
    /// The stored state becomes [`LedState::Off`] even if the write fails, so a later
    /// [`Bd65b60::set_brightness`] with a non-zero level switches the chip on again.
    ///
    /// # Errors
    /// Returns Err() when the underlying I2C device returns an error. The failure is logged as
    /// well, it is safe to ignore and continue with [`Bd65b60::destroy`].
    pub fn shutdown(&self) -> Result<(), I2C::Error> {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let result = inner.map.write(Bd65b60Register::PowerOn, LedState::Off as u8);
            inner.state = LedState::Off;

            if result.is_err() {
                log::error!("Failed to turn off backlight");
            }

            result
        })
    }
}
