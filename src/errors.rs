//! Errors that can be returned by the different functions

use crate::property::Property;
use core::fmt::{Debug, Display, Formatter};

/// Problems with the static configuration, detected before any bus access
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The required LED select value was not given
    MissingSelect,
    /// The LED select value uses bits outside of the select field
    SelectOutOfRange(u32),
    /// The over-voltage protection value uses bits outside of the OVP field
    OvpOutOfRange(u32),
    /// The default state is not one of `off`, `on` or `keep`
    InvalidDefaultState,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingSelect => write!(f, "No LED select value configured"),
            Self::SelectOutOfRange(v) => write!(f, "LED select value {v:#x} is out of range"),
            Self::OvpOutOfRange(v) => write!(f, "OVP value {v:#x} is out of range"),
            Self::InvalidDefaultState => write!(f, "Invalid default state"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// A single bus operation of a multi step sequence
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Step {
    /// Writing the soft reset register
    SoftReset = 0,
    /// Updating the over-voltage protection field
    Ovp = 1,
    /// Updating the LED select field
    LedSelect = 2,
    /// Enabling PWM control
    PwmEnable = 3,
    /// Writing the power-on register
    PowerOn = 4,
    /// Writing the brightness register
    Brightness = 5,
}

impl Step {
    const COUNT: usize = 6;

    const ALL: [Self; Self::COUNT] = [
        Self::SoftReset,
        Self::Ovp,
        Self::LedSelect,
        Self::PwmEnable,
        Self::PowerOn,
        Self::Brightness,
    ];
}

/// The bus errors of every step of a sequence that failed
///
/// Sequences keep going after a failed step, so more than one step can fail.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct StepFailures<E> {
    errors: [Option<E>; Step::COUNT],
}

impl<E> StepFailures<E> {
    pub(crate) fn new() -> Self {
        Self {
            errors: core::array::from_fn(|_| None),
        }
    }

    /// Remember the outcome of `step`
    pub(crate) fn record(&mut self, step: Step, result: Result<(), E>) {
        if let Err(e) = result {
            log::error!("Step {step:?} failed");
            self.errors[step as usize] = Some(e);
        }
    }

    pub(crate) fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// True if no step failed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.iter().all(Option::is_none)
    }

    /// True if `step` failed
    #[must_use]
    pub fn failed(&self, step: Step) -> bool {
        self.errors[step as usize].is_some()
    }

    /// The bus error returned by `step`, if it failed
    #[must_use]
    pub fn error(&self, step: Step) -> Option<&E> {
        self.errors[step as usize].as_ref()
    }

    /// All failed steps in the order they are executed
    pub fn failed_steps(&self) -> impl Iterator<Item = Step> + '_ {
        Step::ALL.into_iter().filter(|&step| self.failed(step))
    }
}

impl<E: Debug> Debug for StepFailures<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(
                Step::ALL
                    .iter()
                    .filter_map(|step| self.error(*step).map(|e| (step, e))),
            )
            .finish()
    }
}

impl<E: Debug> Display for StepFailures<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "Failed steps: {self:?}")
    }
}

#[cfg(feature = "std")]
impl<E: Debug> std::error::Error for StepFailures<E> {}

/// Error returned when the device could not be brought into its configured state
///
/// The I2C device is handed back so it can be reused.
pub struct InitializationError<I2C, E> {
    /// The steps of the initialization that failed
    pub reason: StepFailures<E>,
    /// The I2C device the driver was using
    pub device: I2C,
}

impl<I2C, E> InitializationError<I2C, E> {
    pub(crate) const fn new(reason: StepFailures<E>, device: I2C) -> Self {
        Self { reason, device }
    }
}

impl<I2C, E: Debug> Debug for InitializationError<I2C, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InitializationError")
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}

impl<I2C, E: Debug> Display for InitializationError<I2C, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "Initialization failed: {:?}", self.reason)
    }
}

#[cfg(feature = "std")]
impl<I2C, E: Debug> std::error::Error for InitializationError<I2C, E> {}

/// A power supply property request that is not supported
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PropertyError {
    /// The property can not be read
    NotReadable(Property),
    /// The property can not be written
    NotWritable(Property),
}

impl Display for PropertyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotReadable(p) => write!(f, "Property {p:?} can not be read"),
            Self::NotWritable(p) => write!(f, "Property {p:?} can not be written"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PropertyError {}
