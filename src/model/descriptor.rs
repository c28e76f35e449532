//! Device and configuration descriptors, decoded from their raw bytes.
//!
//! Multi-byte fields are little-endian on the wire and are decoded here, so
//! everything above this module only sees host-order integers.

use super::endpoint::EndpointDescriptor;
use log::{debug, warn};
use thiserror::Error;

pub const DESCRIPTOR_TYPE_DEVICE: u8 = 0x01;
pub const DESCRIPTOR_LEN_DEVICE: usize = 18;

pub const DESCRIPTOR_TYPE_CONFIGURATION: u8 = 0x02;
pub const DESCRIPTOR_LEN_CONFIGURATION: usize = 9;

pub const DESCRIPTOR_TYPE_INTERFACE: u8 = 0x04;
pub const DESCRIPTOR_LEN_INTERFACE: usize = 9;

pub const DESCRIPTOR_TYPE_ENDPOINT: u8 = 0x05;
pub const DESCRIPTOR_LEN_ENDPOINT: usize = 7;
/// Audio class endpoints append `bRefresh` and `bSynchAddress`.
pub const DESCRIPTOR_LEN_AUDIO_ENDPOINT: usize = 9;

/// Errors for malformed raw descriptors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("descriptor buffer is {actual} bytes, need {needed}")]
    Truncated { needed: usize, actual: usize },
    #[error("expected descriptor type {expected:#04x}, found {found:#04x}")]
    WrongType { expected: u8, found: u8 },
    #[error("invalid bLength {0}")]
    InvalidLength(u8),
}

fn read_u16(buf: &[u8], pos: usize) -> u16 {
    u16::from_le_bytes([buf[pos], buf[pos + 1]])
}

fn check_header(buf: &[u8], min_len: usize, descriptor_type: u8) -> Result<(), DescriptorError> {
    if buf.len() < min_len {
        return Err(DescriptorError::Truncated {
            needed: min_len,
            actual: buf.len(),
        });
    }
    if (buf[0] as usize) < min_len {
        return Err(DescriptorError::InvalidLength(buf[0]));
    }
    if buf[1] != descriptor_type {
        return Err(DescriptorError::WrongType {
            expected: descriptor_type,
            found: buf[1],
        });
    }
    Ok(())
}

/// The standard device descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub length: u8,
    pub descriptor_type: u8,
    /// USB specification release, BCD.
    pub usb_version: u16,
    pub device_class: u8,
    pub device_subclass: u8,
    pub device_protocol: u8,
    /// Maximum packet size for endpoint 0.
    pub max_packet_size0: u8,
    pub vendor_id: u16,
    pub product_id: u16,
    /// Device release number, BCD.
    pub device_version: u16,
    pub manufacturer_index: u8,
    pub product_index: u8,
    pub serial_number_index: u8,
    pub num_configurations: u8,
}

impl DeviceDescriptor {
    /// Decode the first 18 bytes of `buf`.
    pub fn parse(buf: &[u8]) -> Result<Self, DescriptorError> {
        check_header(buf, DESCRIPTOR_LEN_DEVICE, DESCRIPTOR_TYPE_DEVICE)?;

        Ok(Self {
            length: buf[0],
            descriptor_type: buf[1],
            usb_version: read_u16(buf, 2),
            device_class: buf[4],
            device_subclass: buf[5],
            device_protocol: buf[6],
            max_packet_size0: buf[7],
            vendor_id: read_u16(buf, 8),
            product_id: read_u16(buf, 10),
            device_version: read_u16(buf, 12),
            manufacturer_index: buf[14],
            product_index: buf[15],
            serial_number_index: buf[16],
            num_configurations: buf[17],
        })
    }

    /// Vendor and product ID formatted as "vvvv:pppp".
    pub fn vid_pid(&self) -> String {
        format!("{:04x}:{:04x}", self.vendor_id, self.product_id)
    }
}

/// One alternate setting of an interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AltSetting {
    pub length: u8,
    pub descriptor_type: u8,
    pub interface_number: u8,
    pub alternate_setting: u8,
    /// `bNumEndpoints` as declared by the device.
    pub num_endpoints: u8,
    pub interface_class: u8,
    pub interface_subclass: u8,
    pub interface_protocol: u8,
    pub interface_index: u8,
    /// Endpoints in descriptor order.
    pub endpoints: Vec<EndpointDescriptor>,
}

/// All alternate settings sharing one interface number, in descriptor order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InterfaceGroup {
    pub alt_settings: Vec<AltSetting>,
}

impl InterfaceGroup {
    /// Interface number shared by the alternate settings.
    pub fn number(&self) -> Option<u8> {
        self.alt_settings.first().map(|alt| alt.interface_number)
    }
}

/// A configuration descriptor with its interfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationDescriptor {
    pub length: u8,
    pub descriptor_type: u8,
    pub total_length: u16,
    /// `bNumInterfaces` as declared by the device.
    pub num_interfaces: u8,
    pub configuration_value: u8,
    pub configuration_index: u8,
    pub attributes: u8,
    /// Raw `bMaxPower` (2 mA units, 8 mA for SuperSpeed).
    pub max_power: u8,
    /// Interfaces in order of first appearance.
    pub interfaces: Vec<InterfaceGroup>,
}

impl ConfigurationDescriptor {
    /// Decode a configuration descriptor followed by its interface and
    /// endpoint descriptors.
    ///
    /// The walk stops at `wTotalLength` or the end of `buf`, whichever comes
    /// first. Descriptors other than interfaces and endpoints are skipped.
    pub fn parse(buf: &[u8]) -> Result<Self, DescriptorError> {
        check_header(
            buf,
            DESCRIPTOR_LEN_CONFIGURATION,
            DESCRIPTOR_TYPE_CONFIGURATION,
        )?;

        let total_length = read_u16(buf, 2);
        let end = (total_length as usize).min(buf.len());
        if end < buf.len() {
            debug!(
                "ignoring {} bytes past wTotalLength {}",
                buf.len() - end,
                total_length
            );
        }

        let mut config = Self {
            length: buf[0],
            descriptor_type: buf[1],
            total_length,
            num_interfaces: buf[4],
            configuration_value: buf[5],
            configuration_index: buf[6],
            attributes: buf[7],
            max_power: buf[8],
            interfaces: Vec::new(),
        };

        // (interface group, alt-setting) that endpoints currently attach to
        let mut current: Option<(usize, usize)> = None;
        let mut pos = buf[0] as usize;
        while pos + 2 <= end {
            let len = buf[pos] as usize;
            if len < 2 {
                warn!("descriptor with bLength {} can't point to next descriptor", len);
                break;
            }
            if pos + len > end {
                warn!(
                    "descriptor with bLength {} exceeds remaining buffer length {}",
                    len,
                    end - pos
                );
                break;
            }

            let desc = &buf[pos..pos + len];
            match desc[1] {
                DESCRIPTOR_TYPE_INTERFACE if len >= DESCRIPTOR_LEN_INTERFACE => {
                    current = Some(config.push_alt_setting(parse_alt_setting(desc)));
                }
                DESCRIPTOR_TYPE_ENDPOINT if len >= DESCRIPTOR_LEN_ENDPOINT => {
                    let alt = match current {
                        Some((group, alt)) => config
                            .interfaces
                            .get_mut(group)
                            .and_then(|g| g.alt_settings.get_mut(alt)),
                        None => None,
                    };
                    match alt {
                        Some(alt) => alt.endpoints.push(parse_endpoint(desc)),
                        None => warn!("endpoint descriptor before any interface, skipping"),
                    }
                }
                DESCRIPTOR_TYPE_INTERFACE | DESCRIPTOR_TYPE_ENDPOINT => {
                    warn!(
                        "ignoring descriptor of type {} and length {} below the minimum",
                        desc[1], len
                    );
                }
                other => debug!("skipping descriptor type {:#04x}", other),
            }

            pos += len;
        }

        Ok(config)
    }

    /// Append `alt` to the group with its interface number, creating the
    /// group on first appearance. Returns the position of `alt`.
    fn push_alt_setting(&mut self, alt: AltSetting) -> (usize, usize) {
        let number = alt.interface_number;
        match self
            .interfaces
            .iter()
            .position(|group| group.number() == Some(number))
        {
            Some(index) => {
                let group = &mut self.interfaces[index];
                group.alt_settings.push(alt);
                (index, group.alt_settings.len() - 1)
            }
            None => {
                self.interfaces.push(InterfaceGroup {
                    alt_settings: vec![alt],
                });
                (self.interfaces.len() - 1, 0)
            }
        }
    }
}

fn parse_alt_setting(desc: &[u8]) -> AltSetting {
    AltSetting {
        length: desc[0],
        descriptor_type: desc[1],
        interface_number: desc[2],
        alternate_setting: desc[3],
        num_endpoints: desc[4],
        interface_class: desc[5],
        interface_subclass: desc[6],
        interface_protocol: desc[7],
        interface_index: desc[8],
        endpoints: Vec::new(),
    }
}

fn parse_endpoint(desc: &[u8]) -> EndpointDescriptor {
    let (refresh, synch_address) = if desc.len() >= DESCRIPTOR_LEN_AUDIO_ENDPOINT {
        (desc[7], desc[8])
    } else {
        (0, 0)
    };

    EndpointDescriptor {
        length: desc[0],
        descriptor_type: desc[1],
        address: desc[2],
        attributes: desc[3],
        max_packet_size: read_u16(desc, 4),
        interval: desc[6],
        refresh,
        synch_address,
    }
}
