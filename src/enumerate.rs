//! One report pass over every attached device.

use crate::access::{AccessError, UsbAccess};
use crate::reader::{ReadOptions, read_device};
use crate::report::{write_device_error, write_device_report};
use log::{debug, info, warn};
use std::io::Write;
use thiserror::Error;

/// Errors that end a pass.
#[derive(Debug, Error)]
pub enum EnumerateError {
    #[error("USB access failed: {0}")]
    Access(#[from] AccessError),
    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

impl EnumerateError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Access(e) => e.code(),
            Self::Output(_) => 1,
        }
    }
}

/// Counts from a completed pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub devices: usize,
    pub reported: usize,
    pub failed: usize,
}

/// Initialize `access`, report every device to `out` in list order, then
/// release the list and tear the access layer down.
pub fn run<A: UsbAccess, W: Write>(
    access: &mut A,
    options: &ReadOptions,
    out: &mut W,
) -> Result<PassSummary, EnumerateError> {
    access.init()?;
    let result = report_all(&*access, options, out);
    access.teardown();
    result
}

fn report_all<A: UsbAccess, W: Write>(
    access: &A,
    options: &ReadOptions,
    out: &mut W,
) -> Result<PassSummary, EnumerateError> {
    let devices = access.list_devices()?;
    let mut summary = PassSummary {
        devices: devices.len(),
        ..PassSummary::default()
    };

    let mut written = Ok(());
    for device in &devices {
        written = match read_device(access, device, options) {
            Ok(snapshot) => {
                debug!(
                    "bus {} address {}: {}",
                    snapshot.location.bus_number,
                    snapshot.address,
                    snapshot.descriptor.vid_pid()
                );
                summary.reported += 1;
                write_device_report(out, &snapshot)
            }
            Err(e) => {
                warn!("failed to get device descriptor: {}", e);
                summary.failed += 1;
                write_device_error(out, &e)
            }
        };
        if written.is_err() {
            break;
        }
    }
    access.release_device_list(devices);
    written?;
    out.flush()?;

    info!(
        "reported {} of {} devices ({} failed)",
        summary.reported, summary.devices, summary.failed
    );
    Ok(summary)
}
