//! Bus topology: where a device hangs off the host.

/// Maximum hub depth a port path can describe.
pub const MAX_PORT_NUMBERS: usize = 16;

/// Sysfs device name: "usbN" for a root hub, "bus-port.port.port..." otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DevicePath(pub String);

impl DevicePath {
    /// Create a new device path.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Check if this is a root hub path (e.g., "usb3").
    pub fn is_root_hub(&self) -> bool {
        self.0.starts_with("usb")
    }

    /// Get bus number from path.
    /// - "3-1.2" -> 3
    /// - "usb3" -> 3
    pub fn bus_num(&self) -> Option<u8> {
        match self.0.strip_prefix("usb") {
            Some(num) => num.parse().ok(),
            None => self.0.split('-').next().and_then(|s| s.parse().ok()),
        }
    }

    /// Port numbers from the root hub down, empty for a root hub.
    /// Returns `None` if the name is not a device path.
    pub fn port_numbers(&self) -> Option<Vec<u8>> {
        if self.is_root_hub() {
            return self.bus_num().map(|_| Vec::new());
        }
        let (_, ports) = self.0.split_once('-')?;
        ports.split('.').map(|p| p.parse().ok()).collect()
    }

    /// Sort key: bus number, then port path (root hub sorts first).
    pub fn sort_key(&self) -> (u8, Vec<u8>) {
        (
            self.bus_num().unwrap_or(u8::MAX),
            self.port_numbers().unwrap_or_default(),
        )
    }
}

impl std::fmt::Display for DevicePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of a port path query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortPath {
    /// Depth 0: the device is a root hub.
    Root,
    /// Port numbers from the root hub, 1 to `MAX_PORT_NUMBERS` hops.
    Ports(Vec<u8>),
    /// Deeper than the buffer or otherwise not reported.
    Unavailable,
}

impl PortPath {
    /// Classify the ports returned by the access layer.
    pub fn from_ports(ports: Vec<u8>) -> Self {
        match ports.len() {
            0 => Self::Root,
            n if n <= MAX_PORT_NUMBERS => Self::Ports(ports),
            _ => Self::Unavailable,
        }
    }

    /// Hops as comma-separated hex bytes, e.g. "0x01, 0x04".
    pub fn format_hops(&self) -> Option<String> {
        match self {
            Self::Ports(ports) => Some(
                ports
                    .iter()
                    .map(|p| format!("0x{:02X}", p))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            Self::Root | Self::Unavailable => None,
        }
    }
}

/// Where a device is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusLocation {
    pub bus_number: u8,
    /// Port on the parent hub, 0 for root hubs.
    pub port_number: u8,
    pub port_path: PortPath,
}
