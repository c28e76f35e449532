//! USB descriptor data model types.

pub mod descriptor;
pub mod endpoint;
pub mod speed;
pub mod topology;

#[cfg(test)]
pub(crate) mod fixtures;

pub use descriptor::{
    AltSetting, ConfigurationDescriptor, DESCRIPTOR_LEN_CONFIGURATION, DESCRIPTOR_LEN_DEVICE,
    DESCRIPTOR_TYPE_CONFIGURATION, DescriptorError, DeviceDescriptor, InterfaceGroup,
};
pub use endpoint::{AddressFields, AttributeFields, EndpointDescriptor, TransferType};
pub use speed::UsbSpeed;
pub use topology::{BusLocation, DevicePath, MAX_PORT_NUMBERS, PortPath};
