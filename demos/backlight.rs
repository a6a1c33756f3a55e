use bd65b60_fan5404x::configuration::LedConfig;
use bd65b60_fan5404x::Bd65b60;
use linux_embedded_hal::I2cdev;
use std::error::Error;
use std::time::Duration;

fn main() -> Result<(), Box<dyn Error>> {
    let device = I2cdev::new("/dev/i2c-1")?;
    let config = LedConfig::from_raw(Some(0x05), Some("keep"), None)?;
    let led: Bd65b60<_> = Bd65b60::new(device, 0x64, config)?;

    for level in (0..=u8::MAX).step_by(16).chain([u8::MAX, 0]) {
        led.set_brightness(level)?;
        println!("Brightness {level}, {:?}", led.state());
        std::thread::sleep(Duration::from_millis(100));
    }

    if let Err(e) = led.shutdown() {
        eprintln!("Shutdown failed: {e:?}");
    }
    led.destroy();

    Ok(())
}
