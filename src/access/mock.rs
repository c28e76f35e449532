//! In-memory access layer for tests.

use super::{AccessError, UsbAccess};
use crate::model::{ConfigurationDescriptor, DeviceDescriptor};
use std::cell::{Cell, RefCell};

/// What [`MockAccess::open`] and the configuration query do for a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenBehavior {
    Succeed(u8),
    Deny,
    QueryFails,
}

#[derive(Debug, Clone)]
pub struct MockDevice {
    pub descriptor: Option<DeviceDescriptor>,
    pub bus_number: u8,
    pub port_numbers: Vec<u8>,
    pub address: u8,
    pub speed: u8,
    pub open: OpenBehavior,
    /// `Ok(None)` is an unconfigured device, `Err(())` a failed read.
    pub config: Result<Option<ConfigurationDescriptor>, ()>,
}

impl MockDevice {
    pub fn new(descriptor: DeviceDescriptor) -> Self {
        Self {
            descriptor: Some(descriptor),
            bus_number: 1,
            port_numbers: vec![2],
            address: 5,
            speed: 2,
            open: OpenBehavior::Succeed(1),
            config: Ok(None),
        }
    }
}

#[derive(Debug)]
pub struct MockHandle(usize);

#[derive(Debug, Default)]
pub struct MockAccess {
    pub devices: Vec<MockDevice>,
    pub fail_init: bool,
    pub fail_list: bool,
    pub inits: Cell<usize>,
    pub teardowns: Cell<usize>,
    pub releases: Cell<usize>,
    pub opens: Cell<usize>,
    /// Device indices in the order their handles were closed.
    pub closed: RefCell<Vec<usize>>,
}

impl MockAccess {
    pub fn with_devices(devices: Vec<MockDevice>) -> Self {
        Self {
            devices,
            ..Self::default()
        }
    }
}

impl UsbAccess for MockAccess {
    type Device = usize;
    type Handle = MockHandle;

    fn init(&mut self) -> Result<(), AccessError> {
        self.inits.set(self.inits.get() + 1);
        if self.fail_init {
            return Err(AccessError::NotFound("mock bus".to_string()));
        }
        Ok(())
    }

    fn teardown(&mut self) {
        self.teardowns.set(self.teardowns.get() + 1);
    }

    fn list_devices(&self) -> Result<Vec<usize>, AccessError> {
        if self.fail_list {
            return Err(AccessError::Io(std::io::Error::other("list failed")));
        }
        Ok((0..self.devices.len()).collect())
    }

    fn release_device_list(&self, _devices: Vec<usize>) {
        self.releases.set(self.releases.get() + 1);
    }

    fn device_descriptor(&self, device: &usize) -> Result<DeviceDescriptor, AccessError> {
        self.devices[*device]
            .descriptor
            .clone()
            .ok_or_else(|| AccessError::NoDevice(format!("mock {}", device)))
    }

    fn bus_number(&self, device: &usize) -> u8 {
        self.devices[*device].bus_number
    }

    fn port_number(&self, device: &usize) -> u8 {
        self.devices[*device]
            .port_numbers
            .last()
            .copied()
            .unwrap_or(0)
    }

    fn port_numbers(&self, device: &usize, capacity: usize) -> Result<Vec<u8>, AccessError> {
        let ports = &self.devices[*device].port_numbers;
        if ports.len() > capacity {
            return Err(AccessError::Overflow(capacity));
        }
        Ok(ports.clone())
    }

    fn device_address(&self, device: &usize) -> u8 {
        self.devices[*device].address
    }

    fn device_speed(&self, device: &usize) -> u8 {
        self.devices[*device].speed
    }

    fn open(&self, device: &usize) -> Result<MockHandle, AccessError> {
        match self.devices[*device].open {
            OpenBehavior::Deny => Err(AccessError::Access(format!("mock {}", device))),
            _ => {
                self.opens.set(self.opens.get() + 1);
                Ok(MockHandle(*device))
            }
        }
    }

    fn configuration(&self, handle: &MockHandle) -> Result<u8, AccessError> {
        match self.devices[handle.0].open {
            OpenBehavior::Succeed(value) => Ok(value),
            _ => Err(AccessError::NoDevice(format!("mock {}", handle.0))),
        }
    }

    fn close(&self, handle: MockHandle) {
        self.closed.borrow_mut().push(handle.0);
    }

    fn active_config_descriptor(
        &self,
        device: &usize,
    ) -> Result<Option<ConfigurationDescriptor>, AccessError> {
        self.devices[*device]
            .config
            .clone()
            .map_err(|_| AccessError::Io(std::io::Error::other("config read failed")))
    }
}
