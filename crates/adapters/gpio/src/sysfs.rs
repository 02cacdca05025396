//! sysfs GPIO driver.

use std::fs;
use std::path::{Path, PathBuf};

use mediacenter_app::ports::DigitalOutput;
use mediacenter_domain::error::HardwareIoError;
use mediacenter_domain::relay::{Level, Pin};

use crate::error::GpioError;

pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/gpio";

/// Output pins under a sysfs GPIO root.
#[derive(Debug, Clone)]
pub struct SysfsGpio {
    root: PathBuf,
}

impl SysfsGpio {
    /// Export `pins` under `root` and configure them as outputs.
    ///
    /// # Errors
    ///
    /// Returns [`GpioError`] if a pin cannot be exported or configured.
    pub fn open(
        root: impl Into<PathBuf>,
        pins: impl IntoIterator<Item = Pin>,
    ) -> Result<Self, GpioError> {
        let gpio = Self { root: root.into() };
        for pin in pins {
            gpio.setup(pin)?;
        }
        tracing::info!(root = %gpio.root.display(), "sysfs GPIO ready");
        Ok(gpio)
    }

    fn setup(&self, pin: Pin) -> Result<(), GpioError> {
        let dir = self.pin_dir(pin);
        if !dir.exists() {
            write_attr(&self.root.join("export"), &pin.number().to_string())?;
            tracing::debug!(pin = %pin, "exported GPIO pin");
        }
        let direction = dir.join("direction");
        if read_attr(&direction)? != "out" {
            write_attr(&direction, "out")?;
        }
        Ok(())
    }

    fn pin_dir(&self, pin: Pin) -> PathBuf {
        self.root.join(format!("gpio{}", pin.number()))
    }

    fn read_level(&self, pin: Pin) -> Result<Level, GpioError> {
        let path = self.pin_dir(pin).join("value");
        match read_attr(&path)?.as_str() {
            "1" => Ok(Level::High),
            "0" => Ok(Level::Low),
            other => Err(GpioError::InvalidValue {
                value: other.to_string(),
                path,
            }),
        }
    }

    fn write_level(&self, pin: Pin, level: Level) -> Result<(), GpioError> {
        let value = if level.is_high() { "1" } else { "0" };
        write_attr(&self.pin_dir(pin).join("value"), value)
    }
}

impl DigitalOutput for SysfsGpio {
    fn read(&self, pin: Pin) -> Result<Level, HardwareIoError> {
        self.read_level(pin).map_err(|err| err.into_domain(pin))
    }

    fn write(&self, pin: Pin, level: Level) -> Result<(), HardwareIoError> {
        self.write_level(pin, level)
            .map_err(|err| err.into_domain(pin))
    }
}

fn read_attr(path: &Path) -> Result<String, GpioError> {
    fs::read_to_string(path)
        .map(|value| value.trim().to_string())
        .map_err(|source| GpioError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn write_attr(path: &Path, value: &str) -> Result<(), GpioError> {
    fs::write(path, value).map_err(|source| GpioError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lay out an already-exported pin, as the kernel would.
    fn fake_pin(root: &Path, pin: u8, direction: &str, value: &str) {
        let dir = root.join(format!("gpio{pin}"));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("direction"), direction).unwrap();
        fs::write(dir.join("value"), value).unwrap();
    }

    #[test]
    fn should_configure_exported_pins_as_outputs() {
        let root = tempfile::tempdir().unwrap();
        fake_pin(root.path(), 6, "in\n", "0\n");

        SysfsGpio::open(root.path(), [Pin::new(6)]).unwrap();

        let direction = fs::read_to_string(root.path().join("gpio6/direction")).unwrap();
        assert_eq!(direction, "out");
    }

    #[test]
    fn should_export_missing_pin() {
        let root = tempfile::tempdir().unwrap();

        // nothing creates gpio13 after the export, so configuring it fails
        let err = SysfsGpio::open(root.path(), [Pin::new(13)]).unwrap_err();

        assert_eq!(fs::read_to_string(root.path().join("export")).unwrap(), "13");
        assert!(matches!(err, GpioError::Io { .. }));
    }

    #[test]
    fn should_read_and_write_levels() {
        let root = tempfile::tempdir().unwrap();
        fake_pin(root.path(), 19, "out\n", "0\n");
        let gpio = SysfsGpio::open(root.path(), [Pin::new(19)]).unwrap();

        assert_eq!(gpio.read(Pin::new(19)).unwrap(), Level::Low);
        gpio.write(Pin::new(19), Level::High).unwrap();
        assert_eq!(gpio.read(Pin::new(19)).unwrap(), Level::High);
    }

    #[test]
    fn should_reject_garbage_value() {
        let root = tempfile::tempdir().unwrap();
        fake_pin(root.path(), 26, "out", "maybe");
        let gpio = SysfsGpio::open(root.path(), [Pin::new(26)]).unwrap();

        let err = gpio.read(Pin::new(26)).unwrap_err();
        assert_eq!(err.pin, Pin::new(26));
    }

    #[test]
    fn should_report_pin_on_unconfigured_read() {
        let root = tempfile::tempdir().unwrap();
        let gpio = SysfsGpio::open(root.path(), std::iter::empty()).unwrap();

        let err = gpio.read(Pin::new(6)).unwrap_err();
        assert_eq!(err.pin, Pin::new(6));
    }
}
