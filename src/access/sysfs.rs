//! Sysfs-backed access layer for Linux.

use super::{AccessError, UsbAccess};
use crate::model::{
    ConfigurationDescriptor, DESCRIPTOR_LEN_CONFIGURATION, DESCRIPTOR_LEN_DEVICE,
    DESCRIPTOR_TYPE_CONFIGURATION, DeviceDescriptor, DevicePath, UsbSpeed,
};
use log::{debug, warn};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

const SYSFS_USB_DEVICES: &str = "/sys/bus/usb/devices";
const USBFS_ROOT: &str = "/dev/bus/usb";

/// A device directory under the sysfs root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysfsDevice {
    pub name: DevicePath,
    pub path: PathBuf,
}

/// An opened usbfs node.
#[derive(Debug)]
pub struct SysfsHandle {
    _file: File,
    sysfs_path: PathBuf,
}

/// Access layer reading Linux sysfs and usbfs.
pub struct SysfsAccess {
    base_path: PathBuf,
    devfs_path: PathBuf,
}

impl Default for SysfsAccess {
    fn default() -> Self {
        Self::new()
    }
}

impl SysfsAccess {
    /// Create an access layer using the default sysfs and usbfs paths.
    pub fn new() -> Self {
        Self {
            base_path: PathBuf::from(SYSFS_USB_DEVICES),
            devfs_path: PathBuf::from(USBFS_ROOT),
        }
    }

    /// Create an access layer with custom roots (for testing or chroots).
    pub fn with_paths(base_path: impl AsRef<Path>, devfs_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            devfs_path: devfs_path.as_ref().to_path_buf(),
        }
    }

    /// Raw `descriptors` attribute: device descriptor followed by the
    /// configuration descriptors.
    fn read_descriptors(&self, device: &SysfsDevice) -> Result<Vec<u8>, AccessError> {
        let path = device.path.join("descriptors");
        std::fs::read(&path).map_err(|e| AccessError::from_io(e, &path.display().to_string()))
    }

    /// `bConfigurationValue`, with an empty attribute meaning unconfigured.
    fn read_configuration_value(&self, path: &Path) -> Result<u8, AccessError> {
        let content = read_attr_string(path, "bConfigurationValue")?;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }
        trimmed
            .parse()
            .map_err(|_| invalid_data(format!("bConfigurationValue '{}' is not a number", trimmed)))
    }

    fn usbfs_node(&self, device: &SysfsDevice) -> PathBuf {
        self.devfs_path.join(format!(
            "{:03}/{:03}",
            self.bus_number(device),
            self.device_address(device)
        ))
    }
}

impl UsbAccess for SysfsAccess {
    type Device = SysfsDevice;
    type Handle = SysfsHandle;

    fn init(&mut self) -> Result<(), AccessError> {
        if !self.base_path.is_dir() {
            return Err(AccessError::NotFound(format!(
                "{} is not a directory",
                self.base_path.display()
            )));
        }
        debug!("using sysfs root {}", self.base_path.display());
        Ok(())
    }

    fn teardown(&mut self) {
        debug!("access layer torn down");
    }

    fn list_devices(&self) -> Result<Vec<SysfsDevice>, AccessError> {
        let mut devices = Vec::new();

        for entry in std::fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();

            // Root hubs ("usb3") and devices ("3-1.2"); interfaces contain ':'
            let path = DevicePath::new(name.as_str());
            let is_device = name.contains('-') && !name.contains(':');
            if (path.is_root_hub() || is_device) && path.port_numbers().is_some() {
                devices.push(SysfsDevice {
                    name: path,
                    path: entry.path(),
                });
            } else {
                debug!("skipping sysfs entry {}", name);
            }
        }

        devices.sort_by_key(|d| d.name.sort_key());
        Ok(devices)
    }

    fn release_device_list(&self, devices: Vec<SysfsDevice>) {
        debug!("released {} devices", devices.len());
    }

    fn device_descriptor(&self, device: &SysfsDevice) -> Result<DeviceDescriptor, AccessError> {
        let raw = self.read_descriptors(device)?;
        Ok(DeviceDescriptor::parse(&raw)?)
    }

    fn bus_number(&self, device: &SysfsDevice) -> u8 {
        read_attr_u8(&device.path, "busnum")
            .ok()
            .or_else(|| device.name.bus_num())
            .unwrap_or(0)
    }

    fn port_number(&self, device: &SysfsDevice) -> u8 {
        device
            .name
            .port_numbers()
            .and_then(|ports| ports.last().copied())
            .unwrap_or(0)
    }

    fn port_numbers(
        &self,
        device: &SysfsDevice,
        capacity: usize,
    ) -> Result<Vec<u8>, AccessError> {
        let ports = device
            .name
            .port_numbers()
            .ok_or_else(|| AccessError::NotFound(format!("no port path in {}", device.name)))?;
        if ports.len() > capacity {
            return Err(AccessError::Overflow(capacity));
        }
        Ok(ports)
    }

    fn device_address(&self, device: &SysfsDevice) -> u8 {
        read_attr_u8(&device.path, "devnum").unwrap_or(0)
    }

    fn device_speed(&self, device: &SysfsDevice) -> u8 {
        read_attr_string(&device.path, "speed")
            .map(|s| UsbSpeed::from_sysfs(&s))
            .unwrap_or(UsbSpeed::Unknown)
            .code()
    }

    fn open(&self, device: &SysfsDevice) -> Result<SysfsHandle, AccessError> {
        let node = self.usbfs_node(device);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&node)
            .map_err(|e| AccessError::from_io(e, &node.display().to_string()))?;
        debug!("opened {}", node.display());
        Ok(SysfsHandle {
            _file: file,
            sysfs_path: device.path.clone(),
        })
    }

    fn configuration(&self, handle: &SysfsHandle) -> Result<u8, AccessError> {
        self.read_configuration_value(&handle.sysfs_path)
    }

    fn close(&self, handle: SysfsHandle) {
        debug!("closing {}", handle.sysfs_path.display());
        drop(handle);
    }

    fn active_config_descriptor(
        &self,
        device: &SysfsDevice,
    ) -> Result<Option<ConfigurationDescriptor>, AccessError> {
        let value = self.read_configuration_value(&device.path)?;
        if value == 0 {
            return Ok(None);
        }

        let raw = self.read_descriptors(device)?;
        for (index, blob) in configuration_blobs(&raw).into_iter().enumerate() {
            match ConfigurationDescriptor::parse(blob) {
                Ok(config) if config.configuration_value == value => return Ok(Some(config)),
                Ok(_) => {}
                Err(e) => warn!("{}: skipping configuration {}: {}", device.name, index, e),
            }
        }

        Err(AccessError::NotFound(format!(
            "{}: no configuration descriptor with value {}",
            device.name, value
        )))
    }
}

/// Split the configuration descriptors that follow the device descriptor.
fn configuration_blobs(raw: &[u8]) -> Vec<&[u8]> {
    let mut blobs = Vec::new();
    let mut pos = raw
        .first()
        .map(|&len| (len as usize).max(DESCRIPTOR_LEN_DEVICE))
        .unwrap_or(DESCRIPTOR_LEN_DEVICE);

    while pos + DESCRIPTOR_LEN_CONFIGURATION <= raw.len() {
        if raw[pos + 1] != DESCRIPTOR_TYPE_CONFIGURATION {
            warn!(
                "expected configuration descriptor at offset {}, found type {:#04x}",
                pos,
                raw[pos + 1]
            );
            break;
        }
        let total = u16::from_le_bytes([raw[pos + 2], raw[pos + 3]]) as usize;
        if total < DESCRIPTOR_LEN_CONFIGURATION {
            warn!("configuration wTotalLength {} too short", total);
            break;
        }
        let end = (pos + total).min(raw.len());
        blobs.push(&raw[pos..end]);
        pos = end;
    }

    blobs
}

// Helpers for reading sysfs attributes

fn read_attr_string(path: &Path, attr: &str) -> Result<String, AccessError> {
    let content = std::fs::read_to_string(path.join(attr))?;
    Ok(content)
}

fn read_attr_u8(path: &Path, attr: &str) -> Result<u8, AccessError> {
    let content = read_attr_string(path, attr)?;
    content
        .trim()
        .parse()
        .map_err(|_| invalid_data(format!("{} '{}' is not a number", attr, content.trim())))
}

fn invalid_data(msg: String) -> AccessError {
    AccessError::Io(io::Error::new(io::ErrorKind::InvalidData, msg))
}
