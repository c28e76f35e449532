//! USB Device Descriptor Report
//!
//! A library and CLI tool that walks the USB devices attached to a Linux host
//! and prints the device, configuration, interface and endpoint descriptors
//! of each one.

pub mod access;
pub mod config;
pub mod enumerate;
pub mod model;
pub mod reader;
pub mod report;
pub mod symbols;

pub use access::{AccessError, SysfsAccess, UsbAccess};
pub use config::Config;
pub use enumerate::{EnumerateError, PassSummary, run};
pub use reader::{DeviceSnapshot, Outcome, ReadOptions, read_device};
