//! Drivers for two small I2C power management chips
//!
//! - [`Bd65b60`]: ROHM BD65B60 two channel LED backlight driver
//! - [`Fan5404x`]: onsemi FAN5404x single cell battery charger
//!
//! Both chips are built from 8 bit registers made of independent [fields](field::Field). The
//! [`conversion`] module turns currents and voltages into the codes used by the charger.
//!
//! # Example
//! ```rust,no_run
//! # fn run<I2C: embedded_hal::i2c::I2c>(i2c: I2C) {
//! use bd65b60_fan5404x::configuration::{LedConfig, LedSelect, LedState, Ovp};
//! use bd65b60_fan5404x::Bd65b60;
//!
//! let config = LedConfig::new(LedSelect::Both, LedState::On, Ovp::V35);
//! let led: Bd65b60<_> = Bd65b60::new(i2c, 0x64, config).expect("Backlight initialization failed");
//! led.set_brightness(128).expect("Failed to set brightness");
//! # }
//! ```
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bd65b60;
pub mod configuration;
pub mod conversion;
pub mod errors;
pub mod fan5404x;
pub mod field;
pub mod property;
pub mod register;

pub use bd65b60::Bd65b60;
pub use fan5404x::Fan5404x;

#[cfg(test)]
mod tests;
