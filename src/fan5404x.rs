//! Driver for the onsemi FAN5404x single cell Li-Ion switching charger
//!
//! The charge state machine runs autonomously on the chip. The driver only observes it and
//! keeps no state of its own, every query reads the registers again.

use crate::errors::PropertyError;
use crate::field::Field;
use crate::property::{ChargeStatus, ChargeType, Health, Property, PropertyValue, SupplyType};
use crate::register::{Register, RegisterMap};
use embedded_hal::i2c::I2c;

/// Name of the power supply
pub const NAME: &str = "fan5404x";

/// Kind of power supply
pub const SUPPLY_TYPE: SupplyType = SupplyType::Usb;

/// Properties reported by [`Fan5404x::property`]
pub const PROPERTIES: [Property; 5] = [
    Property::Status,
    Property::ChargeType,
    Property::Health,
    Property::Present,
    Property::Online,
];

/// Value written to [`Fan5404xRegister::Restart`] to restart the chip
pub const RESTART: u8 = 0xB5;

/// Addresses of the registers of the FAN5404x
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fan5404xRegister {
    Ctrl0 = 0x00,
    Ctrl1 = 0x01,
    /// Output regulation voltage
    Oreg = 0x02,
    IcInfo = 0x03,
    /// Charge and termination current
    Ibat = 0x04,
    VbusCtrl = 0x05,
    Safety = 0x06,
    PostCharge = 0x07,
    Mon0 = 0x10,
    Mon1 = 0x11,
    Ntc = 0x12,
    WdCtrl = 0x13,
    Restart = 0xFA,
}

impl Register for Fan5404xRegister {
    fn address(self) -> u8 {
        self as u8
    }
}

macro_rules! fields {
    ($($(#[$attr:meta])* $name:ident: $reg:ident, $mask:expr;)+) => {
        $(
            $(#[$attr])*
            pub const $name: Field<Fan5404xRegister> = Field::new(Fan5404xRegister::$reg, $mask);
        )+
    };
}

// Bits not listed here are reserved
fields! {
    /// Fault code, see [`Fault`]
    CTRL0_FAULT: Ctrl0, 0b0000_0111;
    CTRL0_BOOST: Ctrl0, 0b0000_1000;
    /// Charger status, see [`Stat`]
    CTRL0_STAT: Ctrl0, 0b0011_0000;
    CTRL0_EN_STAT: Ctrl0, 0b0100_0000;
    /// Writing 1 resets the 32s safety timer
    CTRL0_TMR_RST: Ctrl0, 0b1000_0000;

    CTRL1_OPA_MODE: Ctrl1, 0b0000_0001;
    CTRL1_HZ_MODE: Ctrl1, 0b0000_0010;
    /// Charging is disabled while set
    CTRL1_CE_N: Ctrl1, 0b0000_0100;
    CTRL1_TE: Ctrl1, 0b0000_1000;
    CTRL1_V_LOWV: Ctrl1, 0b0011_0000;
    /// See [`crate::conversion::bus_current_limit_code`]
    CTRL1_I_BUSLIM: Ctrl1, 0b1100_0000;

    OREG_EOC: Oreg, 0b0000_0001;
    OREG_DBAT_B: Oreg, 0b0000_0010;
    /// See [`crate::conversion::OUTPUT_VOLTAGE`]
    OREG_OREG: Oreg, 0b1111_1100;

    IC_INFO_REV: IcInfo, 0b0000_0111;
    IC_INFO_PN: IcInfo, 0b0011_1000;
    IC_INFO_VENDOR_CODE: IcInfo, 0b1100_0000;

    /// See [`crate::conversion::TERMINATION_CURRENT`]
    IBAT_ITERM: Ibat, 0b0000_0111;
    /// See [`crate::conversion::CHARGE_CURRENT`]
    IBAT_IOCHARGE: Ibat, 0b0111_1000;
    IBAT_RESET: Ibat, 0b1000_0000;

    /// See [`crate::conversion::BUS_VOLTAGE_LIMIT`]
    VBUS_CTRL_VBUSLIM: VbusCtrl, 0b0000_0111;
    VBUS_CTRL_SP: VbusCtrl, 0b0000_1000;
    VBUS_CTRL_VBUS_CON: VbusCtrl, 0b0001_0000;
    VBUS_CTRL_IO_LEVEL: VbusCtrl, 0b0010_0000;
    VBUS_CTRL_PROD: VbusCtrl, 0b0100_0000;

    /// See [`crate::conversion::SAFETY_VOLTAGE`]
    SAFETY_VSAFE: Safety, 0b0000_1111;
    /// See [`crate::conversion::SAFETY_CURRENT`]
    SAFETY_ISAFE: Safety, 0b1111_0000;

    POST_CHARGE_PC_IT: PostCharge, 0b0000_0111;
    POST_CHARGE_PC_EN: PostCharge, 0b0000_1000;
    POST_CHARGE_VBUS_LOAD: PostCharge, 0b0011_0000;
    POST_CHARGE_BDET: PostCharge, 0b1100_0000;

    MON0_CV: Mon0, 0b0000_0001;
    MON0_VBUS_VALID: Mon0, 0b0000_0010;
    MON0_IBUS: Mon0, 0b0000_0100;
    MON0_ICHG: Mon0, 0b0000_1000;
    MON0_T_120: Mon0, 0b0001_0000;
    MON0_LINCHG: Mon0, 0b0010_0000;
    MON0_VBAT_CMP: Mon0, 0b0100_0000;
    MON0_ITERM_CMP: Mon0, 0b1000_0000;

    MON1_PC_ON: Mon1, 0b0000_0100;
    MON1_NOBAT: Mon1, 0b0000_1000;
    MON1_DIS_LEVEL: Mon1, 0b0001_0000;
    MON1_POK_B: Mon1, 0b0010_0000;
    MON1_VBAT: Mon1, 0b0100_0000;
    MON1_GATE: Mon1, 0b1000_0000;

    NTC_TH: Ntc, 0b0000_1111;
    NTC_OK: Ntc, 0b0001_0000;
    NTC_TEMP_DIS: Ntc, 0b0010_0000;

    WD_CTRL_WD_DIS: WdCtrl, 0b0000_0010;
    WD_CTRL_EN_VREG: WdCtrl, 0b0000_0100;

    RESTART_FIELD: Restart, 0b1111_1111;
}

/// Value of [`CTRL0_STAT`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Stat {
    Ready = 0,
    PwmEnabled = 1,
    ChargeDone = 2,
    Fault = 3,
}

impl Stat {
    #[must_use]
    const fn from_register(ctrl0: u8) -> Self {
        match CTRL0_STAT.decode(ctrl0) {
            0 => Self::Ready,
            1 => Self::PwmEnabled,
            2 => Self::ChargeDone,
            3 => Self::Fault,
            4..=u8::MAX => unreachable!(), // Two bit field
        }
    }
}

/// Value of [`CTRL0_FAULT`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Fault {
    None = 0,
    VbusOvp = 1,
    SleepMode = 2,
    PoorInputSource = 3,
    BatteryOvp = 4,
    ThermalShutdown = 5,
    TimerFault = 6,
    NoBattery = 7,
}

impl Fault {
    #[must_use]
    const fn from_register(ctrl0: u8) -> Self {
        match CTRL0_FAULT.decode(ctrl0) {
            0 => Self::None,
            1 => Self::VbusOvp,
            2 => Self::SleepMode,
            3 => Self::PoorInputSource,
            4 => Self::BatteryOvp,
            5 => Self::ThermalShutdown,
            6 => Self::TimerFault,
            7 => Self::NoBattery,
            8..=u8::MAX => unreachable!(), // Three bit field
        }
    }
}

/// Chip identification from the IC_INFO register
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IcInfo {
    pub vendor_code: u8,
    pub part_number: u8,
    pub revision: u8,
}

impl IcInfo {
    #[must_use]
    pub const fn from_register(reg: u8) -> Self {
        Self {
            vendor_code: IC_INFO_VENDOR_CODE.decode(reg),
            part_number: IC_INFO_PN.decode(reg),
            revision: IC_INFO_REV.decode(reg),
        }
    }
}

impl ChargeStatus {
    /// Derive the charging state from the CTRL0 and CTRL1 registers
    ///
    /// A fault reported in STAT is shown as `Discharging`, use [`Fan5404x::fault`] for details.
    #[must_use]
    pub const fn from_registers(ctrl0: u8, ctrl1: u8) -> Self {
        match Stat::from_register(ctrl0) {
            Stat::ChargeDone => Self::Full,
            Stat::PwmEnabled => {
                if CTRL1_CE_N.decode(ctrl1) == 0 {
                    Self::Charging
                } else {
                    Self::NotCharging
                }
            }
            Stat::Ready | Stat::Fault => Self::Discharging,
        }
    }
}

/// FAN5404x charger driver
pub struct Fan5404x<I2C> {
    map: RegisterMap<I2C>,
}

impl<I2C: I2c> Fan5404x<I2C> {
    /// Create a driver for the charger at `address`. Does not touch the chip.
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self {
            map: RegisterMap::new(i2c, address),
        }
    }

    /// Destroy the driver returning the underlying I2C device
    pub fn destroy(self) -> I2C {
        self.map.destroy()
    }

    /// Direct access to the registers, e.g. to program the charge parameters computed with
    /// [`crate::conversion`]
    pub fn registers(&mut self) -> &mut RegisterMap<I2C> {
        &mut self.map
    }

    /// Read the current charging state
    ///
    /// CTRL0 and CTRL1 are read one after the other. A change of the chip state in between
    /// can give a stale result, poll again if needed.
    ///
    /// # Errors
    /// Returns Err() when the underlying I2C device returns an error. Both registers are read
    /// even if the first read fails.
    pub fn read_status(&mut self) -> Result<ChargeStatus, I2C::Error> {
        let ctrl0 = self.map.read(Fan5404xRegister::Ctrl0);
        let ctrl1 = self.map.read(Fan5404xRegister::Ctrl1);

        Ok(ChargeStatus::from_registers(ctrl0?, ctrl1?))
    }

    /// Read the fault code
    ///
    /// # Errors
    /// Returns Err() when the underlying I2C device returns an error.
    pub fn fault(&mut self) -> Result<Fault, I2C::Error> {
        let ctrl0 = self.map.read(Fan5404xRegister::Ctrl0)?;
        Ok(Fault::from_register(ctrl0))
    }

    /// Read the vendor, part number and revision of the chip
    ///
    /// # Errors
    /// Returns Err() when the underlying I2C device returns an error.
    pub fn ic_info(&mut self) -> Result<IcInfo, I2C::Error> {
        let reg = self.map.read(Fan5404xRegister::IcInfo)?;
        Ok(IcInfo::from_register(reg))
    }

    /// Restart the chip, resetting all registers to their defaults
    ///
    /// # Errors
    /// Returns Err() when the underlying I2C device returns an error.
    pub fn restart(&mut self) -> Result<(), I2C::Error> {
        log::info!("Restarting charger");
        self.map.write(Fan5404xRegister::Restart, RESTART)
    }

    /// Reset the 32s safety timer
    ///
    /// The chip stops charging when the timer runs out, so this has to be called periodically
    /// while charging.
    ///
    /// # Errors
    /// Returns Err() when the underlying I2C device returns an error.
    pub fn reset_safety_timer(&mut self) -> Result<(), I2C::Error> {
        self.map.write_field(CTRL0_TMR_RST, 1)
    }

    /// Read a power supply property
    ///
    /// A failed status read is logged and reported as [`ChargeStatus::Unknown`], the bus error
    /// itself is not returned. Callers that need the error use [`Fan5404x::read_status`].
    ///
    /// # Errors
    /// Returns [`PropertyError::NotReadable`] for properties not in [`PROPERTIES`].
    pub fn property(&mut self, property: Property) -> Result<PropertyValue, PropertyError> {
        log::debug!("Get property {property:?}");

        match property {
            Property::Status => Ok(PropertyValue::Status(self.read_status().unwrap_or_else(|_| {
                log::error!("Failed to read charger status");
                ChargeStatus::Unknown
            }))),
            Property::ChargeType => Ok(PropertyValue::ChargeType(ChargeType::Standard)),
            Property::Health => Ok(PropertyValue::Health(Health::Good)),
            Property::Present => Ok(PropertyValue::Present(true)),
            Property::Online => Ok(PropertyValue::Online(true)),
            _ => Err(PropertyError::NotReadable(property)),
        }
    }

    /// Write a power supply property. No property is writable.
    ///
    /// # Errors
    /// Always returns [`PropertyError::NotWritable`].
    pub fn set_property(
        &mut self,
        property: Property,
        _value: PropertyValue,
    ) -> Result<(), PropertyError> {
        log::debug!("Set property {property:?}");
        Err(PropertyError::NotWritable(property))
    }

    /// Check if a property can be written
    #[must_use]
    pub const fn property_is_writeable(&self, _property: Property) -> bool {
        false
    }
}
