//! Static configuration of the BD65B60
//!
//! The configuration is fixed when the driver is created. It is either built from the typed
//! values or validated from the raw values of a device tree style description.
//!
//! # Example
//! ```rust
//! use bd65b60_fan5404x::configuration::{LedConfig, LedSelect, LedState, Ovp};
//!
//! let typed = LedConfig::new(LedSelect::Both, LedState::On, Ovp::V35);
//! let raw = LedConfig::from_raw(Some(0x05), Some("on"), None).unwrap();
//! assert_eq!(typed, raw);
//! ```

use crate::bd65b60::{LED_SELECT, OVP};
use crate::errors::ConfigError;
use core::str::FromStr;

/// Power state of the backlight
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LedState {
    #[default]
    Off = 0,
    On = 1,
    /// Leave the power state set up by the bootloader untouched during initialization
    ///
    /// Only valid as the configured default. The first brightness change moves the driver to
    /// `On` or `Off`.
    Keep = 2,
}

impl FromStr for LedState {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Self::Off),
            "on" => Ok(Self::On),
            "keep" => Ok(Self::Keep),
            _ => Err(ConfigError::InvalidDefaultState),
        }
    }
}

/// Over-voltage protection level, already positioned in COMSET1
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Ovp {
    V25 = 0x00,
    V30 = 0x08,
    #[default]
    V35 = 0x10,
}

/// LED channels driven by the chip, already positioned in LEDSEL
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LedSelect {
    Disable = 0x00,
    Led1 = 0x01,
    Led2 = 0x04,
    #[default]
    Both = 0x05,
}

/// Configuration of a BD65B60 instance
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedConfig {
    select: u8,
    default_state: LedState,
    ovp: u8,
}

impl LedConfig {
    /// Build a configuration from typed values
    #[must_use]
    pub const fn new(select: LedSelect, default_state: LedState, ovp: Ovp) -> Self {
        Self {
            select: select as u8,
            default_state,
            ovp: ovp as u8,
        }
    }

    /// Validate raw configuration values
    ///
    /// `select` is required. A missing `default_state` means `off` and a missing `ovp` means
    /// 35V. `select` and `ovp` are register values in position and must only use the bits of
    /// their fields; values without a name such as OVP `0x18` are passed through.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] describing the first invalid value.
    pub fn from_raw(
        select: Option<u32>,
        default_state: Option<&str>,
        ovp: Option<u32>,
    ) -> Result<Self, ConfigError> {
        let select = select.ok_or(ConfigError::MissingSelect)?;
        if !LED_SELECT.fits(select) {
            return Err(ConfigError::SelectOutOfRange(select));
        }

        let default_state = default_state.map_or(Ok(LedState::Off), str::parse::<LedState>)?;

        let ovp = ovp.unwrap_or(Ovp::default() as u32);
        if !OVP.fits(ovp) {
            return Err(ConfigError::OvpOutOfRange(ovp));
        }

        // Both values were checked to fit their 8 bit masks
        #[allow(clippy::cast_possible_truncation)]
        let (select, ovp) = (select as u8, ovp as u8);

        Ok(Self {
            select,
            default_state,
            ovp,
        })
    }

    /// LEDSEL value selecting the driven channels
    #[must_use]
    pub const fn select(&self) -> u8 {
        self.select
    }

    /// State to bring the backlight into during initialization
    #[must_use]
    pub const fn default_state(&self) -> LedState {
        self.default_state
    }

    /// COMSET1 value of the over-voltage protection
    #[must_use]
    pub const fn ovp(&self) -> u8 {
        self.ovp
    }
}

impl Default for LedConfig {
    fn default() -> Self {
        Self::new(LedSelect::default(), LedState::default(), Ovp::default())
    }
}
