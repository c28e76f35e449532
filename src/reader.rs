//! Per-device descriptor snapshot.

use crate::access::{AccessError, OpenDevice, UsbAccess};
use crate::model::{
    BusLocation, ConfigurationDescriptor, DeviceDescriptor, MAX_PORT_NUMBERS, PortPath,
};
use log::{debug, warn};

/// Result of a fallible sub-query.
#[derive(Debug)]
pub enum Outcome<T> {
    Present(T),
    /// A defined empty state, not an error.
    Absent,
    Failed(AccessError),
}

impl<T> Outcome<T> {
    pub fn present(&self) -> Option<&T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent | Self::Failed(_) => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Options for a read pass.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    /// Open each device to query its active configuration value.
    pub query_active_configuration: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            query_active_configuration: true,
        }
    }
}

/// Everything reported about one device.
#[derive(Debug)]
pub struct DeviceSnapshot {
    pub descriptor: DeviceDescriptor,
    pub location: BusLocation,
    pub address: u8,
    /// Speed code.
    pub speed: u8,
    /// Configuration value read from the opened device.
    pub active_configuration: Outcome<u8>,
    pub configuration: Outcome<ConfigurationDescriptor>,
}

/// Read a snapshot of `device`.
///
/// Fails only if the device descriptor cannot be read; every other failure
/// is recorded in the snapshot.
pub fn read_device<A: UsbAccess>(
    access: &A,
    device: &A::Device,
    options: &ReadOptions,
) -> Result<DeviceSnapshot, AccessError> {
    let descriptor = access.device_descriptor(device)?;

    let port_path = match access.port_numbers(device, MAX_PORT_NUMBERS) {
        Ok(ports) => PortPath::from_ports(ports),
        Err(e) => {
            debug!("port path unavailable: {}", e);
            PortPath::Unavailable
        }
    };
    let location = BusLocation {
        bus_number: access.bus_number(device),
        port_number: access.port_number(device),
        port_path,
    };

    let address = access.device_address(device);
    let speed = access.device_speed(device);

    let active_configuration = if options.query_active_configuration {
        query_active_configuration(access, device)
    } else {
        Outcome::Absent
    };

    let configuration = match access.active_config_descriptor(device) {
        Ok(Some(config)) => Outcome::Present(config),
        Ok(None) => Outcome::Absent,
        Err(e) => {
            warn!(
                "bus {} address {}: failed to read active configuration: {}",
                location.bus_number, address, e
            );
            Outcome::Failed(e)
        }
    };

    Ok(DeviceSnapshot {
        descriptor,
        location,
        address,
        speed,
        active_configuration,
        configuration,
    })
}

/// Best effort: a device we may not open yields `Absent`.
fn query_active_configuration<A: UsbAccess>(access: &A, device: &A::Device) -> Outcome<u8> {
    let opened = match OpenDevice::open(access, device) {
        Ok(opened) => opened,
        Err(e) => {
            debug!("skipping configuration query: {}", e);
            return Outcome::Absent;
        }
    };

    match opened.configuration() {
        Ok(value) => Outcome::Present(value),
        Err(e) => {
            debug!("configuration query failed: {}", e);
            Outcome::Failed(e)
        }
    }
}
