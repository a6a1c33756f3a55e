use bd65b60_fan5404x::conversion::{
    bus_current_limit_code, charge_current_code, termination_current_code, MilliAmpere,
};
use bd65b60_fan5404x::fan5404x::{CTRL1_I_BUSLIM, IBAT_IOCHARGE, IBAT_ITERM, PROPERTIES};
use bd65b60_fan5404x::Fan5404x;
use linux_embedded_hal::I2cdev;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let device = I2cdev::new("/dev/i2c-1")?;
    let mut charger = Fan5404x::new(device, 0x6B);

    println!("Chip: {:?}", charger.ic_info()?);

    let registers = charger.registers();
    registers.write_field(IBAT_IOCHARGE, charge_current_code(MilliAmpere(1050)))?;
    registers.write_field(IBAT_ITERM, termination_current_code(MilliAmpere(100)))?;
    registers.write_field(CTRL1_I_BUSLIM, bus_current_limit_code(MilliAmpere(500)))?;

    charger.reset_safety_timer()?;

    for property in PROPERTIES {
        println!("{property:?}: {:?}", charger.property(property)?);
    }
    println!("Fault: {:?}", charger.fault()?);

    Ok(())
}
