use crate::bd65b60::{Bd65b60Register, SOFT_RESET};
use crate::configuration::{LedConfig, LedSelect, LedState, Ovp};
use crate::errors::{PropertyError, Step};
use crate::fan5404x::{Fan5404xRegister, Fault, CTRL0_STAT, CTRL1_CE_N, RESTART};
use crate::property::{ChargeStatus, ChargeType, Health, Property, PropertyValue};
use crate::register::Register;
use crate::{Bd65b60, Fan5404x};
use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};

const LED_ADDR: u8 = 0x64;
const CHARGER_ADDR: u8 = 0x6B;

/// Create the expected `Transaction` for a register read
fn read_reg(addr: u8, reg: impl Register, value: u8) -> Transaction {
    Transaction::write_read(addr, vec![reg.address()], vec![value])
}

/// Create the expected `Transaction` for a register write
fn write_reg(addr: u8, reg: impl Register, value: u8) -> Transaction {
    Transaction::write(addr, vec![reg.address(), value])
}

fn led_read(reg: Bd65b60Register, value: u8) -> Transaction {
    read_reg(LED_ADDR, reg, value)
}

fn led_write(reg: Bd65b60Register, value: u8) -> Transaction {
    write_reg(LED_ADDR, reg, value)
}

/// Expected transactions of the initialization after a soft reset, with all registers
/// reading zero
fn init_transactions(config: &LedConfig, power: u8) -> Vec<Transaction> {
    use Bd65b60Register::{ComSet1, CtrlSet, PowerOn};

    vec![
        led_read(ComSet1, 0x00),
        led_write(ComSet1, config.ovp()),
        led_read(Bd65b60Register::LedSelect, 0x00),
        led_write(Bd65b60Register::LedSelect, config.select()),
        led_read(CtrlSet, 0x00),
        led_write(CtrlSet, 0x20),
        led_write(PowerOn, power),
    ]
}

/// Create an initialized `Bd65b60` that will react with the given transactions to a test
fn mock_led(default_state: LedState, transactions: &[Transaction]) -> Bd65b60<I2cMock> {
    let config = LedConfig::new(LedSelect::Both, default_state, Ovp::V30);

    let mut all_transactions = Vec::new();
    if default_state != LedState::Keep {
        all_transactions.push(led_write(Bd65b60Register::SoftReset, SOFT_RESET));
    }
    let power = u8::from(default_state != LedState::Off);
    all_transactions.extend(init_transactions(&config, power));
    all_transactions.extend_from_slice(transactions);

    Bd65b60::new(I2cMock::new(&all_transactions), LED_ADDR, config).unwrap()
}

#[test]
fn led_initialization_on() {
    let led = mock_led(LedState::On, &[]);
    assert_eq!(led.state(), LedState::On);
    led.destroy().done();
}

#[test]
fn led_initialization_off() {
    let led = mock_led(LedState::Off, &[]);
    assert_eq!(led.state(), LedState::Off);
    led.destroy().done();
}

#[test]
fn led_initialization_keep_skips_reset() {
    // `mock_led` leaves out the soft reset write for `Keep`
    let led = mock_led(LedState::Keep, &[]);
    assert_eq!(led.state(), LedState::Keep);
    led.destroy().done();
}

#[test]
fn led_initialization_keep_leaves_power_on() {
    use Bd65b60Register::{ComSet1, CtrlSet, PowerOn};

    let config = LedConfig::new(LedSelect::Led1, LedState::Keep, Ovp::V25);
    let i2c = I2cMock::new(&[
        led_read(ComSet1, 0x00),
        led_write(ComSet1, 0x00),
        led_read(Bd65b60Register::LedSelect, 0x00),
        led_write(Bd65b60Register::LedSelect, 0x01),
        led_read(CtrlSet, 0x00),
        led_write(CtrlSet, 0x20),
        led_write(PowerOn, 1),
    ]);

    let led: Bd65b60<_> = Bd65b60::new(i2c, LED_ADDR, config).unwrap();
    assert_eq!(led.state(), LedState::Keep);
    led.destroy().done();
}

#[test]
fn led_initialization_preserves_other_bits() {
    use Bd65b60Register::{ComSet1, CtrlSet, PowerOn, SoftReset};

    let config = LedConfig::new(LedSelect::Led2, LedState::Off, Ovp::V25);
    let mock = I2cMock::new(&[
        led_write(SoftReset, SOFT_RESET),
        led_read(ComSet1, 0b1111_1111),
        led_write(ComSet1, 0b1110_0111),
        led_read(Bd65b60Register::LedSelect, 0b0000_0011),
        led_write(Bd65b60Register::LedSelect, 0b0000_0110),
        led_read(CtrlSet, 0b0000_0001),
        led_write(CtrlSet, 0b0010_0001),
        led_write(PowerOn, 0),
    ]);

    let led: Bd65b60<_> = Bd65b60::new(mock, LED_ADDR, config).unwrap();
    led.destroy().done();
}

#[test]
fn led_initialization_is_best_effort() {
    use Bd65b60Register::{ComSet1, CtrlSet, PowerOn, SoftReset};

    let config = LedConfig::new(LedSelect::Both, LedState::On, Ovp::V35);
    let mock = I2cMock::new(&[
        led_write(SoftReset, SOFT_RESET).with_error(ErrorKind::Other),
        // A failed read skips the write of the update
        led_read(ComSet1, 0x00).with_error(ErrorKind::Other),
        led_read(Bd65b60Register::LedSelect, 0x00),
        led_write(Bd65b60Register::LedSelect, 0x05),
        led_read(CtrlSet, 0x00),
        led_write(CtrlSet, 0x20),
        led_write(PowerOn, 1).with_error(ErrorKind::Other),
    ]);

    let err = Bd65b60::<_>::new(mock, LED_ADDR, config).unwrap_err();
    assert_eq!(
        err.reason.failed_steps().collect::<Vec<_>>(),
        [Step::SoftReset, Step::Ovp, Step::PowerOn]
    );
    assert_eq!(err.reason.error(Step::Ovp), Some(&ErrorKind::Other));
    assert!(!err.reason.failed(Step::PwmEnable));

    let mut i2c = err.device;
    i2c.done();
}

#[test]
fn led_brightness_switches_power() {
    use Bd65b60Register::{Iled, PowerOn};

    let led = mock_led(
        LedState::Off,
        &[
            led_write(Iled, 100),
            led_write(PowerOn, 1),
            led_write(Iled, 200),
            led_write(Iled, 0),
            led_write(PowerOn, 0),
        ],
    );

    led.set_brightness(100).unwrap();
    assert_eq!(led.state(), LedState::On);
    // Staying on does not touch the power-on register
    led.set_brightness(200).unwrap();
    led.set_brightness(0).unwrap();
    assert_eq!(led.state(), LedState::Off);

    led.destroy().done();
}

#[test]
fn led_brightness_zero_twice() {
    use Bd65b60Register::{Iled, PowerOn};

    let led = mock_led(
        LedState::On,
        &[
            led_write(Iled, 0),
            led_write(PowerOn, 0),
            // Only the brightness is written the second time
            led_write(Iled, 0),
        ],
    );

    led.set_brightness(0).unwrap();
    led.set_brightness(0).unwrap();
    assert_eq!(led.state(), LedState::Off);

    led.destroy().done();
}

#[test]
fn led_brightness_leaves_keep() {
    use Bd65b60Register::{Iled, PowerOn};

    let led = mock_led(
        LedState::Keep,
        &[led_write(Iled, 0), led_write(PowerOn, 0)],
    );

    led.set_brightness(0).unwrap();
    assert_eq!(led.state(), LedState::Off);

    led.destroy().done();
}

#[test]
fn led_brightness_failure_still_switches_power() {
    use Bd65b60Register::{Iled, PowerOn};

    let led = mock_led(
        LedState::Off,
        &[
            led_write(Iled, 255).with_error(ErrorKind::Other),
            led_write(PowerOn, 1),
        ],
    );

    let err = led.set_brightness(255).unwrap_err();
    assert!(err.failed(Step::Brightness));
    assert!(!err.failed(Step::PowerOn));
    assert_eq!(led.state(), LedState::On);

    led.destroy().done();
}

#[test]
fn led_state_follows_failed_power_write() {
    use Bd65b60Register::{Iled, PowerOn};

    let led = mock_led(
        LedState::Off,
        &[
            led_write(Iled, 10),
            led_write(PowerOn, 1).with_error(ErrorKind::Other),
        ],
    );

    let err = led.set_brightness(10).unwrap_err();
    assert_eq!(err.failed_steps().collect::<Vec<_>>(), [Step::PowerOn]);
    assert_eq!(led.state(), LedState::On);

    led.destroy().done();
}

#[test]
fn led_shutdown() {
    let led = mock_led(
        LedState::On,
        &[led_write(Bd65b60Register::PowerOn, 0).with_error(ErrorKind::Other)],
    );

    assert_eq!(led.shutdown(), Err(ErrorKind::Other));
    assert_eq!(led.state(), LedState::Off);
    // Teardown continues regardless
    led.destroy().done();
}

#[test]
fn led_brightness_after_shutdown_switches_power_on() {
    use Bd65b60Register::{Iled, PowerOn};

    let led = mock_led(
        LedState::On,
        &[
            led_write(PowerOn, 0),
            led_write(Iled, 200),
            led_write(PowerOn, 1),
        ],
    );

    led.shutdown().unwrap();
    assert_eq!(led.state(), LedState::Off);

    led.set_brightness(200).unwrap();
    assert_eq!(led.state(), LedState::On);

    led.destroy().done();
}

fn charger_read(reg: Fan5404xRegister, value: u8) -> Transaction {
    read_reg(CHARGER_ADDR, reg, value)
}

fn mock_charger(transactions: &[Transaction]) -> Fan5404x<I2cMock> {
    Fan5404x::new(I2cMock::new(transactions), CHARGER_ADDR)
}

#[test]
fn charger_status() {
    use Fan5404xRegister::{Ctrl0, Ctrl1};

    let mut charger = mock_charger(&[
        charger_read(Ctrl0, CTRL0_STAT.encode(1)),
        charger_read(Ctrl1, 0x00),
        charger_read(Ctrl0, CTRL0_STAT.encode(1)),
        charger_read(Ctrl1, CTRL1_CE_N.mask()),
        charger_read(Ctrl0, CTRL0_STAT.encode(2)),
        charger_read(Ctrl1, CTRL1_CE_N.mask()),
        charger_read(Ctrl0, CTRL0_STAT.encode(0)),
        charger_read(Ctrl1, 0x00),
        charger_read(Ctrl0, CTRL0_STAT.encode(3)),
        charger_read(Ctrl1, 0x00),
    ]);

    assert_eq!(charger.read_status().unwrap(), ChargeStatus::Charging);
    assert_eq!(charger.read_status().unwrap(), ChargeStatus::NotCharging);
    assert_eq!(charger.read_status().unwrap(), ChargeStatus::Full);
    assert_eq!(charger.read_status().unwrap(), ChargeStatus::Discharging);
    // Documented behaviour: a STAT fault is reported as discharging
    assert_eq!(charger.read_status().unwrap(), ChargeStatus::Discharging);

    charger.destroy().done();
}

#[test]
fn charger_status_read_failure() {
    use Fan5404xRegister::{Ctrl0, Ctrl1};

    let mut charger = mock_charger(&[
        // The second register is read even though the first read failed
        charger_read(Ctrl0, 0x00).with_error(ErrorKind::Other),
        charger_read(Ctrl1, 0x00),
        charger_read(Ctrl0, CTRL0_STAT.encode(2)),
        charger_read(Ctrl1, 0x00).with_error(ErrorKind::Other),
    ]);

    assert_eq!(charger.read_status(), Err(ErrorKind::Other));
    assert_eq!(
        charger.property(Property::Status),
        Ok(PropertyValue::Status(ChargeStatus::Unknown))
    );

    charger.destroy().done();
}

#[test]
fn charger_properties() {
    use Fan5404xRegister::{Ctrl0, Ctrl1};

    let mut charger = mock_charger(&[
        charger_read(Ctrl0, CTRL0_STAT.encode(2)),
        charger_read(Ctrl1, 0x00),
    ]);

    assert_eq!(
        charger.property(Property::Status),
        Ok(PropertyValue::Status(ChargeStatus::Full))
    );
    assert_eq!(
        charger.property(Property::ChargeType),
        Ok(PropertyValue::ChargeType(ChargeType::Standard))
    );
    assert_eq!(
        charger.property(Property::Health),
        Ok(PropertyValue::Health(Health::Good))
    );
    assert_eq!(
        charger.property(Property::Present),
        Ok(PropertyValue::Present(true))
    );
    assert_eq!(
        charger.property(Property::Online),
        Ok(PropertyValue::Online(true))
    );
    assert_eq!(
        charger.property(Property::VoltageMax),
        Err(PropertyError::NotReadable(Property::VoltageMax))
    );

    charger.destroy().done();
}

#[test]
fn charger_properties_are_read_only() {
    let mut charger = mock_charger(&[]);

    for property in crate::fan5404x::PROPERTIES {
        assert!(!charger.property_is_writeable(property));
    }
    assert_eq!(
        charger.set_property(Property::Online, PropertyValue::Online(false)),
        Err(PropertyError::NotWritable(Property::Online))
    );

    charger.destroy().done();
}

#[test]
fn charger_fault_and_info() {
    let mut charger = mock_charger(&[
        charger_read(Fan5404xRegister::Ctrl0, 0b0011_0110),
        charger_read(Fan5404xRegister::IcInfo, 0b1001_0100),
    ]);

    assert_eq!(charger.fault().unwrap(), Fault::TimerFault);
    let info = charger.ic_info().unwrap();
    assert_eq!(info.vendor_code, 0b10);
    assert_eq!(info.part_number, 0b010);
    assert_eq!(info.revision, 0b100);

    charger.destroy().done();
}

#[test]
fn charger_restart_and_timer() {
    use Fan5404xRegister::{Ctrl0, Restart};

    let mut charger = mock_charger(&[
        Transaction::write(CHARGER_ADDR, vec![Restart.address(), RESTART]),
        charger_read(Ctrl0, 0b0001_0000),
        Transaction::write(CHARGER_ADDR, vec![Ctrl0.address(), 0b1001_0000]),
    ]);

    charger.restart().unwrap();
    charger.reset_safety_timer().unwrap();

    charger.destroy().done();
}

#[test]
fn charger_register_access() {
    use crate::conversion::{charge_current_code, MilliAmpere};
    use crate::fan5404x::IBAT_IOCHARGE;
    use Fan5404xRegister::Ibat;

    let mut charger = mock_charger(&[
        charger_read(Ibat, 0b1000_0010),
        Transaction::write(CHARGER_ADDR, vec![Ibat.address(), 0b1010_1010]),
    ]);

    let code = charge_current_code(MilliAmpere(1050));
    charger.registers().write_field(IBAT_IOCHARGE, code).unwrap();

    charger.destroy().done();
}
