//! Code to display-name tables for USB descriptor fields.
//!
//! Every table is an ordered, static slice. Lookups are exact matches where
//! the first entry wins, and a code that is not in the table maps to an
//! empty string so vendor-specific or future values never break a report.

/// A fixed mapping from small integer codes to canonical names.
#[derive(Debug)]
pub struct SymbolTable {
    /// Domain name, used in logs and tests.
    pub domain: &'static str,
    entries: &'static [(u8, &'static str)],
}

impl SymbolTable {
    const fn new(domain: &'static str, entries: &'static [(u8, &'static str)]) -> Self {
        Self { domain, entries }
    }

    /// Name for `code`, or `""` if the table has no entry for it.
    pub fn lookup(&self, code: u8) -> &'static str {
        self.entries
            .iter()
            .find(|(value, _)| *value == code)
            .map(|(_, name)| *name)
            .unwrap_or("")
    }

    /// All entries in table order.
    pub fn entries(&self) -> &'static [(u8, &'static str)] {
        self.entries
    }
}

/// Name for `code` in `table`, or `""` if unknown.
pub fn lookup(code: u8, table: &SymbolTable) -> &'static str {
    table.lookup(code)
}

pub static SPEED: SymbolTable = SymbolTable::new(
    "speed",
    &[
        (0, "UNKNOWN"),
        (1, "LOW"),
        (2, "FULL"),
        (3, "HIGH"),
        (4, "SUPER"),
        (5, "SUPER_PLUS"),
    ],
);

pub static DESCRIPTOR_TYPE: SymbolTable = SymbolTable::new(
    "descriptor type",
    &[
        (0x01, "DEVICE"),
        (0x02, "CONFIG"),
        (0x03, "STRING"),
        (0x04, "INTERFACE"),
        (0x05, "ENDPOINT"),
        (0x21, "HID"),
        (0x22, "REPORT"),
        (0x23, "PHYSICAL"),
        (0x29, "HUB"),
    ],
);

pub static CLASS: SymbolTable = SymbolTable::new(
    "class",
    &[
        (0x00, "PER_INTERFACE"),
        (0x01, "AUDIO"),
        (0x02, "COMM"),
        (0x03, "HID"),
        (0x05, "PHYSICAL"),
        (0x07, "PRINTER"),
        (0x06, "IMAGE"),
        (0x08, "MASS_STORAGE"),
        (0x09, "HUB"),
        (0x0A, "DATA"),
        (0x0B, "SMART_CARD"),
        (0x0D, "CONTENT_SECURITY"),
        (0x0E, "VIDEO"),
        (0x0F, "PERSONAL_HEALTHCARE"),
        (0xDC, "DIAGNOSTIC_DEVICE"),
        (0xE0, "WIRELESS"),
        (0xFE, "APPLICATION"),
        (0xFF, "VENDOR_SPEC"),
    ],
);

/// Keyed by the masked direction bit (`address & 0x80`).
pub static ENDPOINT_DIRECTION: SymbolTable =
    SymbolTable::new("endpoint direction", &[(0x80, "IN"), (0x00, "OUT")]);

pub static TRANSFER_TYPE: SymbolTable = SymbolTable::new(
    "transfer type",
    &[
        (0, "CONTROL"),
        (1, "ISOCHRONOUS"),
        (2, "BULK"),
        (3, "INTERRUPT"),
        (4, "BULK_STREAM"),
    ],
);

pub static SYNC_TYPE: SymbolTable = SymbolTable::new(
    "synchronization type",
    &[(0, ""), (1, "ASYNC"), (2, "ADAPTIVE"), (3, "SYNC")],
);

pub static USAGE_TYPE: SymbolTable = SymbolTable::new(
    "isochronous usage type",
    &[(0, "DATA"), (1, "FEEDBACK"), (2, "IMPLICIT")],
);

#[cfg(test)]
mod tests {
    use super::*;

    static DUPLICATED: SymbolTable =
        SymbolTable::new("duplicated", &[(1, "FIRST"), (2, "OTHER"), (1, "SECOND")]);

    #[test]
    fn test_known_codes() {
        assert_eq!(lookup(3, &SPEED), "HIGH");
        assert_eq!(lookup(0x29, &DESCRIPTOR_TYPE), "HUB");
        assert_eq!(lookup(0xFF, &CLASS), "VENDOR_SPEC");
        assert_eq!(lookup(0x80, &ENDPOINT_DIRECTION), "IN");
        assert_eq!(lookup(0x00, &ENDPOINT_DIRECTION), "OUT");
        assert_eq!(lookup(2, &TRANSFER_TYPE), "BULK");
        assert_eq!(lookup(2, &USAGE_TYPE), "IMPLICIT");
    }

    #[test]
    fn test_lookup_is_total() {
        let tables = [
            &SPEED,
            &DESCRIPTOR_TYPE,
            &CLASS,
            &ENDPOINT_DIRECTION,
            &TRANSFER_TYPE,
            &SYNC_TYPE,
            &USAGE_TYPE,
        ];
        for table in tables {
            for code in 0..=u8::MAX {
                let name = table.lookup(code);
                let expected = table
                    .entries()
                    .iter()
                    .find(|(value, _)| *value == code)
                    .map(|(_, name)| *name)
                    .unwrap_or("");
                assert_eq!(name, expected, "{} code {:#04x}", table.domain, code);
            }
        }
    }

    #[test]
    fn test_unknown_code_is_empty() {
        assert_eq!(lookup(0x42, &CLASS), "");
        assert_eq!(lookup(9, &SPEED), "");
        assert_eq!(lookup(3, &USAGE_TYPE), "");
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(DUPLICATED.lookup(1), "FIRST");
        assert_eq!(DUPLICATED.lookup(2), "OTHER");
    }

    #[test]
    fn test_no_conflicting_duplicates() {
        for table in [&SPEED, &DESCRIPTOR_TYPE, &CLASS, &TRANSFER_TYPE, &SYNC_TYPE] {
            let entries = table.entries();
            for (i, (code, name)) in entries.iter().enumerate() {
                for (other, other_name) in &entries[i + 1..] {
                    assert!(
                        code != other || name == other_name,
                        "{} maps {:#04x} twice",
                        table.domain,
                        code
                    );
                }
            }
        }
    }
}
