//! Power supply properties reported by the charger

/// Properties a power supply framework may ask for
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Property {
    Status,
    ChargeType,
    Health,
    Present,
    Online,
    VoltageMax,
    VoltageMin,
    CurrentMax,
    ConstantChargeCurrent,
    ConstantChargeVoltage,
    InputCurrentLimit,
    InputVoltageLimit,
    ChargeTermCurrent,
}

/// Kind of power supply
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SupplyType {
    Battery,
    Usb,
    Mains,
}

/// Coarse charging state of the battery
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChargeStatus {
    /// The status could not be read
    #[default]
    Unknown,
    Discharging,
    Charging,
    /// Charging is possible but disabled
    NotCharging,
    Full,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChargeType {
    Unknown,
    None,
    Trickle,
    Fast,
    Standard,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Health {
    Unknown,
    Good,
    Overheat,
    Dead,
    OverVoltage,
}

/// Value of a single property
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PropertyValue {
    Status(ChargeStatus),
    ChargeType(ChargeType),
    Health(Health),
    Present(bool),
    Online(bool),
}
