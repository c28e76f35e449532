//! USB speed codes as reported by the access layer.

/// Negotiated device speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsbSpeed {
    /// Speed not reported by the host controller.
    Unknown,
    /// USB 1.0 Low Speed - 1.5 Mbps
    Low,
    /// USB 1.1 Full Speed - 12 Mbps
    Full,
    /// USB 2.0 High Speed - 480 Mbps
    High,
    /// USB 3.0/3.1 Gen 1 SuperSpeed - 5 Gbps
    Super,
    /// USB 3.1 Gen 2 and later SuperSpeed+ - 10 Gbps and up
    SuperPlus,
}

impl UsbSpeed {
    /// Parse from the sysfs 'speed' attribute (value in Mbps, low speed is "1.5").
    pub fn from_sysfs(s: &str) -> Self {
        match s.trim() {
            "1.5" => Self::Low,
            "12" => Self::Full,
            "480" => Self::High,
            "5000" => Self::Super,
            "10000" | "20000" => Self::SuperPlus,
            _ => Self::Unknown,
        }
    }

    /// Numeric speed code used in reports.
    pub fn code(&self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Low => 1,
            Self::Full => 2,
            Self::High => 3,
            Self::Super => 4,
            Self::SuperPlus => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{SPEED, lookup};

    #[test]
    fn test_from_sysfs() {
        assert_eq!(UsbSpeed::from_sysfs("1.5\n"), UsbSpeed::Low);
        assert_eq!(UsbSpeed::from_sysfs("480"), UsbSpeed::High);
        assert_eq!(UsbSpeed::from_sysfs("20000"), UsbSpeed::SuperPlus);
        assert_eq!(UsbSpeed::from_sysfs("999"), UsbSpeed::Unknown);
    }

    #[test]
    fn test_codes_have_names() {
        assert_eq!(lookup(UsbSpeed::Unknown.code(), &SPEED), "UNKNOWN");
        assert_eq!(lookup(UsbSpeed::Full.code(), &SPEED), "FULL");
        assert_eq!(lookup(UsbSpeed::Super.code(), &SPEED), "SUPER");
    }
}
