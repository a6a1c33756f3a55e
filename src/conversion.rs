//! Conversion of physical quantities into FAN5404x register codes
//!
//! Most settings of the charger are linear: `code = (value - base) / step`, with values below
//! `base` mapping to code 0. Only the input current limit is a threshold table, see
//! [`bus_current_limit_code`].
//!
//! Unless stated otherwise a table does not clamp at its upper end. A value past the
//! representable range yields a code that is wider than its register field and gets truncated
//! when it is encoded, which can wrap around to a low setting. For example 2150 mA gives charge
//! current code 16, and the 4 bit IOCHARGE field encodes that as 0, the lowest charge current.
//! Check requests against the range of the table before writing them.

/// A current in mA
#[derive(Debug, Default, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MilliAmpere(pub u32);

/// A voltage in mV
#[derive(Debug, Default, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MilliVolt(pub u32);

/// Linear mapping from a physical value to a register code
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LinearTable {
    base: u32,
    step: u32,
    /// Values above `.0` map to code `.1`
    clamp: Option<(u32, u8)>,
}

impl LinearTable {
    /// Create a table starting at `base` with increments of `step`
    #[must_use]
    pub const fn new(base: u32, step: u32) -> Self {
        assert!(step != 0, "Step size must not be zero");
        Self {
            base,
            step,
            clamp: None,
        }
    }

    /// Map every value above `limit` to `code`
    #[must_use]
    pub const fn clamp_above(self, limit: u32, code: u8) -> Self {
        Self {
            clamp: Some((limit, code)),
            ..self
        }
    }

    /// Smallest value that has its own code
    #[must_use]
    pub const fn base(&self) -> u32 {
        self.base
    }

    /// Increment per code
    #[must_use]
    pub const fn step(&self) -> u32 {
        self.step
    }

    /// Quantize `value`, rounding down to the next lower step
    ///
    /// Codes that would not fit into a byte saturate at `u8::MAX`. The result is not limited
    /// to the width of any register field.
    #[must_use]
    pub const fn quantize(&self, value: u32) -> u8 {
        if value < self.base {
            return 0;
        }

        if let Some((limit, code)) = self.clamp {
            if value > limit {
                return code;
            }
        }

        let code = (value - self.base) / self.step;
        if code > u8::MAX as u32 {
            u8::MAX
        } else {
            code as u8
        }
    }
}

/// Fast charge current, IBAT[6:3]
pub const CHARGE_CURRENT: LinearTable = LinearTable::new(550, 100);

/// Termination current, IBAT[2:0]
pub const TERMINATION_CURRENT: LinearTable = LinearTable::new(50, 50);

/// Maximum battery regulation voltage, SAFETY[3:0]
pub const SAFETY_VOLTAGE: LinearTable = LinearTable::new(4200, 20);

/// Maximum charge current, SAFETY[7:4]. Same steps as the charge current.
pub const SAFETY_CURRENT: LinearTable = CHARGE_CURRENT;

/// Special charger input voltage limit, VBUS_CTRL[2:0]
///
/// Only inputs above 4773 mV clamp to the highest code 7.
pub const BUS_VOLTAGE_LIMIT: LinearTable = LinearTable::new(4213, 20).clamp_above(4773, 7);

/// Battery regulation voltage, OREG[7:2]
pub const OUTPUT_VOLTAGE: LinearTable = LinearTable::new(3500, 20);

/// Code for the fast charge current
#[must_use]
pub const fn charge_current_code(current: MilliAmpere) -> u8 {
    CHARGE_CURRENT.quantize(current.0)
}

/// Code for the charge termination current
#[must_use]
pub const fn termination_current_code(current: MilliAmpere) -> u8 {
    TERMINATION_CURRENT.quantize(current.0)
}

/// Code for the safety limit of the battery voltage
#[must_use]
pub const fn safety_voltage_code(voltage: MilliVolt) -> u8 {
    SAFETY_VOLTAGE.quantize(voltage.0)
}

/// Code for the safety limit of the charge current
#[must_use]
pub const fn safety_current_code(current: MilliAmpere) -> u8 {
    SAFETY_CURRENT.quantize(current.0)
}

/// Code for the input voltage limit
#[must_use]
pub const fn bus_voltage_limit_code(voltage: MilliVolt) -> u8 {
    BUS_VOLTAGE_LIMIT.quantize(voltage.0)
}

/// Code for the battery regulation voltage
#[must_use]
pub const fn output_voltage_code(voltage: MilliVolt) -> u8 {
    OUTPUT_VOLTAGE.quantize(voltage.0)
}

/// Code for the input current limit, CTRL1[7:6]
///
/// The chip only supports 100 mA, 500 mA, 800 mA and no limit. The limit is kept at or below
/// the requested current where possible:
///
/// | Requested        | Code |
/// |------------------|------|
/// | below 500 mA     | 0    |
/// | 500 to 799 mA    | 1    |
/// | exactly 800 mA   | 2    |
/// | above 800 mA     | 3    |
#[must_use]
pub const fn bus_current_limit_code(current: MilliAmpere) -> u8 {
    match current.0 {
        0..=499 => 0,
        500..=799 => 1,
        800 => 2,
        _ => 3,
    }
}
