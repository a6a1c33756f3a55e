//! Byte wide register access over I2C
//!
//! Both chips use 8 bit register addresses and 8 bit values. A read is a single `write_read`
//! transaction, a write sends the address followed by the value.

use crate::field::Field;
use embedded_hal::i2c::I2c;

/// A register address on one of the chips
pub trait Register: Copy {
    /// Address of the register on the bus
    fn address(self) -> u8;
}

/// Register map of a single peripheral on the bus
///
/// None of the operations retry on failure. [`RegisterMap::update`] is a read followed by a
/// write, so callers that need it to be atomic with respect to other writers have to serialize
/// access themselves.
#[derive(Debug)]
pub struct RegisterMap<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> RegisterMap<I2C> {
    /// Create a register map for the peripheral at `address`. Does not touch the bus.
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Address of the peripheral on the bus
    #[must_use]
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Destroy the register map returning the underlying I2C device
    pub fn destroy(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> RegisterMap<I2C> {
    /// Read the current value of `reg`
    ///
    /// # Errors
    /// Returns Err() when the underlying I2C device returns an error.
    pub fn read(&mut self, reg: impl Register) -> Result<u8, I2C::Error> {
        let mut buf = [0u8];
        self.i2c.write_read(self.address, &[reg.address()], &mut buf)?;
        Ok(buf[0])
    }

    /// Write `value` to `reg`
    ///
    /// # Errors
    /// Returns Err() when the underlying I2C device returns an error.
    pub fn write(&mut self, reg: impl Register, value: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[reg.address(), value])
    }

    /// Read-modify-write: replace the bits selected by `mask` with the same bits of `value`
    ///
    /// The write is always issued, even if the register already holds the requested bits.
    ///
    /// # Errors
    /// Returns Err() when the underlying I2C device returns an error. If the read fails no
    /// write is attempted.
    pub fn update(&mut self, reg: impl Register, mask: u8, value: u8) -> Result<(), I2C::Error> {
        let old = self.read(reg)?;
        self.write(reg, (old & !mask) | (value & mask))
    }

    /// Read `field` and return its value shifted down to its natural range
    ///
    /// # Errors
    /// Returns Err() when the underlying I2C device returns an error.
    pub fn read_field<R: Register>(&mut self, field: Field<R>) -> Result<u8, I2C::Error> {
        Ok(field.decode(self.read(field.register())?))
    }

    /// Set `field` to `value`, leaving the rest of the register untouched
    ///
    /// `value` is truncated to the width of the field.
    ///
    /// # Errors
    /// Returns Err() when the underlying I2C device returns an error.
    pub fn write_field<R: Register>(
        &mut self,
        field: Field<R>,
        value: u8,
    ) -> Result<(), I2C::Error> {
        self.update(field.register(), field.mask(), field.encode(value))
    }
}
