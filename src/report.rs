//! Text rendering of device snapshots.
//!
//! Output is line oriented and deterministic: one-byte values are printed as
//! `0xNN`, two-byte values as `0xNNNN`, counts and sizes in decimal, and a
//! symbolic name (possibly empty) follows raw codes after three spaces.

use crate::access::AccessError;
use crate::model::{
    AltSetting, ConfigurationDescriptor, DeviceDescriptor, EndpointDescriptor, InterfaceGroup,
    TransferType,
};
use crate::reader::{DeviceSnapshot, Outcome};
use crate::symbols::{
    CLASS, DESCRIPTOR_TYPE, ENDPOINT_DIRECTION, SPEED, SYNC_TYPE, TRANSFER_TYPE, USAGE_TYPE,
    lookup,
};
use std::fmt::Display;
use std::io::{self, Write};

/// Line printed before every device.
pub const DEVICE_SEPARATOR: &str =
    "+++++++++++++++++++++++++++++++++++++++++++++++++++++++++++++++++++";

/// Label column for device, connection and configuration fields.
const TOP_LABEL_WIDTH: usize = 35;
/// Label column for alt-setting and endpoint fields.
const NESTED_LABEL_WIDTH: usize = 38;

fn hex8(value: u8) -> String {
    format!("0x{:02X}", value)
}

fn hex16(value: u16) -> String {
    format!("0x{:04X}", value)
}

/// Raw code followed by its symbolic name.
fn annotated(value: u8, name: &str) -> String {
    format!("0x{:02X}   {}", value, name)
}

/// A run of `label : value` lines at one indentation level.
struct Fields<'a, W: Write> {
    out: &'a mut W,
    indent: usize,
    width: usize,
}

impl<'a, W: Write> Fields<'a, W> {
    fn new(out: &'a mut W, indent: usize, width: usize) -> Self {
        Self { out, indent, width }
    }

    fn heading(&mut self, title: &str, underline: char) -> io::Result<()> {
        let rule: String = std::iter::repeat_n(underline, title.len()).collect();
        writeln!(self.out, "{:indent$}{}", "", title, indent = self.indent)?;
        writeln!(self.out, "{:indent$}{}", "", rule, indent = self.indent)
    }

    fn field(&mut self, label: &str, value: impl Display) -> io::Result<()> {
        writeln!(
            self.out,
            "{:indent$}{:<width$}: {}",
            "",
            label,
            value,
            indent = self.indent,
            width = self.width
        )
    }
}

/// Write the full report for one device, starting with the separator.
pub fn write_device_report<W: Write>(out: &mut W, snapshot: &DeviceSnapshot) -> io::Result<()> {
    writeln!(out, "{}", DEVICE_SEPARATOR)?;
    write_device_descriptor(out, &snapshot.descriptor)?;
    write_connection(out, snapshot)?;
    match &snapshot.configuration {
        Outcome::Present(config) => write_configuration(out, config)?,
        Outcome::Absent => {}
        Outcome::Failed(_) => {
            writeln!(out, "  Error: failed to get active configuration descriptor")?;
            writeln!(out)?;
        }
    }
    writeln!(out)
}

/// Write the separator and an inline notice for a device that could not be read.
pub fn write_device_error<W: Write>(out: &mut W, err: &AccessError) -> io::Result<()> {
    writeln!(out, "{}", DEVICE_SEPARATOR)?;
    writeln!(out, "Error: failed to get device descriptor ({})", err)?;
    writeln!(out)
}

pub fn write_device_descriptor<W: Write>(out: &mut W, desc: &DeviceDescriptor) -> io::Result<()> {
    let mut f = Fields::new(out, 0, 0);
    f.heading("Device descriptor", '-')?;

    let mut f = Fields::new(f.out, 2, TOP_LABEL_WIDTH);
    f.field("Size of the descriptor", desc.length)?;
    f.field(
        "Descriptor type",
        annotated(desc.descriptor_type, lookup(desc.descriptor_type, &DESCRIPTOR_TYPE)),
    )?;
    f.field("USB specification", hex16(desc.usb_version))?;
    f.field(
        "USB-IF class code",
        annotated(desc.device_class, lookup(desc.device_class, &CLASS)),
    )?;
    f.field("USB-IF subclass code", hex8(desc.device_subclass))?;
    f.field("USB-IF protocol code", hex8(desc.device_protocol))?;
    f.field("Maximum packet size for endpoint 0", desc.max_packet_size0)?;
    f.field("USB-IF vendor ID", hex16(desc.vendor_id))?;
    f.field("USB-IF product ID", hex16(desc.product_id))?;
    f.field("Device release number", hex16(desc.device_version))?;
    f.field("Index of manufacturer string", hex8(desc.manufacturer_index))?;
    f.field("Index of product string", hex8(desc.product_index))?;
    f.field("Index of serial number string", hex8(desc.serial_number_index))?;
    f.field("Number of possible configurations", hex8(desc.num_configurations))?;
    writeln!(f.out)
}

pub fn write_connection<W: Write>(out: &mut W, snapshot: &DeviceSnapshot) -> io::Result<()> {
    let location = &snapshot.location;
    let mut f = Fields::new(out, 2, TOP_LABEL_WIDTH);
    f.field("Bus number", hex8(location.bus_number))?;
    f.field("Port number", hex8(location.port_number))?;
    if let Some(hops) = location.port_path.format_hops() {
        f.field("Port path from root", hops)?;
    }
    f.field("Device address", hex8(snapshot.address))?;
    f.field(
        "Device speed",
        annotated(snapshot.speed, lookup(snapshot.speed, &SPEED)),
    )?;
    if let Some(value) = snapshot.active_configuration.present() {
        f.field("Currently active configuration", value)?;
    }
    writeln!(f.out)
}

pub fn write_configuration<W: Write>(
    out: &mut W,
    config: &ConfigurationDescriptor,
) -> io::Result<()> {
    let mut f = Fields::new(out, 2, TOP_LABEL_WIDTH);
    f.heading("Active configuration", '-')?;
    f.field("Size of this descriptor", config.length)?;
    f.field(
        "Descriptor type",
        annotated(config.descriptor_type, lookup(config.descriptor_type, &DESCRIPTOR_TYPE)),
    )?;
    f.field("Total length of data", config.total_length)?;
    f.field("Number of interfaces", config.num_interfaces)?;
    f.field("Identifier value", hex8(config.configuration_value))?;
    f.field("Index of string descriptor", hex8(config.configuration_index))?;
    f.field("Configuration characteristics", hex8(config.attributes))?;
    f.field("Maximum power consumption", hex8(config.max_power))?;

    for interface in &config.interfaces {
        write_interface(f.out, interface)?;
    }
    writeln!(f.out)
}

fn write_interface<W: Write>(out: &mut W, interface: &InterfaceGroup) -> io::Result<()> {
    writeln!(out)?;
    Fields::new(&mut *out, 2, 0).heading("Interface", '=')?;
    writeln!(out)?;

    for alt in &interface.alt_settings {
        write_alt_setting(out, alt)?;
    }
    Ok(())
}

fn write_alt_setting<W: Write>(out: &mut W, alt: &AltSetting) -> io::Result<()> {
    let mut f = Fields::new(out, 4, NESTED_LABEL_WIDTH);
    f.heading("Alt-Interface descriptor", '-')?;
    f.field("Size of this descriptor", alt.length)?;
    f.field(
        "Descriptor type",
        annotated(alt.descriptor_type, lookup(alt.descriptor_type, &DESCRIPTOR_TYPE)),
    )?;
    f.field("Number of this interface", alt.interface_number)?;
    f.field("Value used for this alternate setting", alt.alternate_setting)?;
    f.field("Number of endpoints", alt.num_endpoints)?;
    f.field(
        "USB-IF class code",
        annotated(alt.interface_class, lookup(alt.interface_class, &CLASS)),
    )?;
    f.field("USB-IF subclass code", hex8(alt.interface_subclass))?;
    f.field("USB-IF protocol code", hex8(alt.interface_protocol))?;
    f.field("Index of string descriptor", hex8(alt.interface_index))?;
    writeln!(f.out)?;

    for endpoint in &alt.endpoints {
        write_endpoint(f.out, endpoint)?;
    }
    Ok(())
}

/// Transfer type name, then sync and usage names for isochronous endpoints.
fn attribute_names(endpoint: &EndpointDescriptor) -> String {
    let fields = endpoint.attribute_fields();
    let (sync, usage) = if endpoint.transfer_type() == TransferType::Isochronous {
        (
            lookup(fields.sync_type, &SYNC_TYPE),
            lookup(fields.usage_type, &USAGE_TYPE),
        )
    } else {
        ("", "")
    };
    format!(
        "{} {} {}",
        lookup(fields.transfer_type, &TRANSFER_TYPE),
        sync,
        usage
    )
}

fn write_endpoint<W: Write>(out: &mut W, endpoint: &EndpointDescriptor) -> io::Result<()> {
    let address = endpoint.address_fields();
    let mut f = Fields::new(out, 6, NESTED_LABEL_WIDTH);
    f.heading("Endpoint descriptor", '-')?;
    f.field("Size of this descriptor", endpoint.length)?;
    f.field(
        "Descriptor type",
        annotated(
            endpoint.descriptor_type,
            lookup(endpoint.descriptor_type, &DESCRIPTOR_TYPE),
        ),
    )?;
    f.field(
        "Endpoint address",
        annotated(address.number, lookup(address.direction, &ENDPOINT_DIRECTION)),
    )?;
    f.field(
        "Attributes",
        format!("0x{:02X}   {}", endpoint.attributes, attribute_names(endpoint)),
    )?;
    f.field("Maximum packet size for the endpoint", endpoint.max_packet_size)?;
    f.field("Interval for polling endpoint", endpoint.interval)?;
    f.field("Audio devices only: rate of feedback", endpoint.refresh)?;
    f.field("Audio devices only: address of synch", hex8(endpoint.synch_address))?;
    writeln!(f.out)
}
