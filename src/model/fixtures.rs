//! Sample descriptors shared by unit tests.

use super::{ConfigurationDescriptor, DeviceDescriptor};

/// A full-speed vendor device, 1d50:615c.
pub const DEVICE_DESCRIPTOR: [u8; 18] = [
    18, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 64, 0x50, 0x1d, 0x5c, 0x61, 0x04, 0x01, 1, 2, 3, 1,
];

/// Configuration 1: a bulk interface with two endpoints, then an audio
/// streaming interface with a zero-bandwidth alt-setting and an isochronous
/// alt-setting, plus class-specific descriptors that must be skipped.
pub fn config_blob() -> Vec<u8> {
    let mut blob = vec![
        // configuration, wTotalLength patched below
        9, 0x02, 0, 0, 2, 1, 0, 0x80, 0xFA, //
        // interface 0 alt 0, mass storage
        9, 0x04, 0, 0, 2, 0x08, 0x06, 0x50, 0, //
        7, 0x05, 0x81, 0x02, 0x00, 0x02, 0, //
        7, 0x05, 0x02, 0x02, 0x00, 0x02, 0, //
        // interface association
        8, 0x0B, 1, 2, 1, 1, 0, 0, //
        // interface 1 alt 0 and alt 1, audio streaming
        9, 0x04, 1, 0, 0, 0x01, 0x02, 0, 0, //
        9, 0x04, 1, 1, 1, 0x01, 0x02, 0, 0, //
        7, 0x24, 1, 1, 1, 1, 0, //
        9, 0x05, 0x03, 0x25, 0xC0, 0x00, 1, 0, 0x83,
    ];
    let total = blob.len() as u16;
    blob[2..4].copy_from_slice(&total.to_le_bytes());
    blob
}

pub fn device_descriptor() -> DeviceDescriptor {
    DeviceDescriptor::parse(&DEVICE_DESCRIPTOR).expect("fixture device descriptor")
}

pub fn configuration() -> ConfigurationDescriptor {
    ConfigurationDescriptor::parse(&config_blob()).expect("fixture configuration")
}
