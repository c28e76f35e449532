//! USB access layer: the host-side source of descriptors and topology.
//!
//! The report engine only talks to the [`UsbAccess`] trait. [`SysfsAccess`]
//! implements it on Linux by reading `/sys/bus/usb/devices` and opening the
//! usbfs nodes under `/dev/bus/usb`.

mod sysfs;

#[cfg(test)]
pub(crate) mod mock;

pub use sysfs::{SysfsAccess, SysfsDevice, SysfsHandle};

use crate::model::{ConfigurationDescriptor, DescriptorError, DeviceDescriptor};
use thiserror::Error;

/// Errors reported by an access layer.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("access denied: {0}")]
    Access(String),
    #[error("no such device: {0}")]
    NoDevice(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("port path deeper than {0} hops")]
    Overflow(usize),
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(#[from] DescriptorError),
}

impl AccessError {
    /// Negative status code, used as the process exit status for fatal errors.
    pub fn code(&self) -> i32 {
        match self {
            Self::Io(_) => -1,
            Self::Access(_) => -3,
            Self::NoDevice(_) => -4,
            Self::NotFound(_) => -5,
            Self::Overflow(_) => -8,
            Self::InvalidDescriptor(_) => -99,
        }
    }

    /// Map an IO error, keeping permission and missing-node failures distinct.
    pub fn from_io(err: std::io::Error, what: &str) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => Self::Access(what.to_string()),
            std::io::ErrorKind::NotFound => Self::NoDevice(what.to_string()),
            _ => Self::Io(err),
        }
    }
}

/// Operations the report engine needs from the host's USB stack.
///
/// `init` and `teardown` bracket all other calls. Queries documented as
/// always available return plain values; everything else is fallible.
pub trait UsbAccess {
    /// Opaque per-device reference, valid until the list is released.
    type Device;
    /// A device opened for the configuration query.
    type Handle;

    fn init(&mut self) -> Result<(), AccessError>;
    fn teardown(&mut self);

    fn list_devices(&self) -> Result<Vec<Self::Device>, AccessError>;
    fn release_device_list(&self, devices: Vec<Self::Device>);

    fn device_descriptor(&self, device: &Self::Device) -> Result<DeviceDescriptor, AccessError>;

    fn bus_number(&self, device: &Self::Device) -> u8;
    fn port_number(&self, device: &Self::Device) -> u8;
    /// Port numbers from the root hub; `Overflow` if deeper than `capacity`.
    fn port_numbers(
        &self,
        device: &Self::Device,
        capacity: usize,
    ) -> Result<Vec<u8>, AccessError>;
    fn device_address(&self, device: &Self::Device) -> u8;
    /// Speed code, see [`crate::symbols::SPEED`].
    fn device_speed(&self, device: &Self::Device) -> u8;

    fn open(&self, device: &Self::Device) -> Result<Self::Handle, AccessError>;
    /// Currently active configuration value of an open device.
    fn configuration(&self, handle: &Self::Handle) -> Result<u8, AccessError>;
    fn close(&self, handle: Self::Handle);

    /// The active configuration, or `None` if the device is unconfigured.
    fn active_config_descriptor(
        &self,
        device: &Self::Device,
    ) -> Result<Option<ConfigurationDescriptor>, AccessError>;
}

/// An open device that is closed when dropped.
pub struct OpenDevice<'a, A: UsbAccess> {
    access: &'a A,
    handle: Option<A::Handle>,
}

impl<'a, A: UsbAccess> OpenDevice<'a, A> {
    pub fn open(access: &'a A, device: &A::Device) -> Result<Self, AccessError> {
        let handle = access.open(device)?;
        Ok(Self {
            access,
            handle: Some(handle),
        })
    }

    pub fn configuration(&self) -> Result<u8, AccessError> {
        match &self.handle {
            Some(handle) => self.access.configuration(handle),
            // Only taken by drop.
            None => Err(AccessError::NoDevice("handle already closed".to_string())),
        }
    }
}

impl<A: UsbAccess> Drop for OpenDevice<'_, A> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.access.close(handle);
        }
    }
}
