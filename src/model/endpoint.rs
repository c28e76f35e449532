//! Endpoint descriptor and the bit-packed fields inside it.

/// Endpoint number bits of `bEndpointAddress`.
pub const ADDRESS_NUMBER_MASK: u8 = 0x0F;
/// Direction bit of `bEndpointAddress`.
pub const ADDRESS_DIRECTION_MASK: u8 = 0x80;

/// Transfer type bits of `bmAttributes`.
pub const ATTR_TRANSFER_TYPE_MASK: u8 = 0x03;
/// Synchronization type bits of `bmAttributes`.
pub const ATTR_SYNC_TYPE_MASK: u8 = 0x0C;
pub const ATTR_SYNC_TYPE_SHIFT: u8 = 2;
/// Usage type bits of `bmAttributes`.
pub const ATTR_USAGE_TYPE_MASK: u8 = 0x30;
pub const ATTR_USAGE_TYPE_SHIFT: u8 = 4;

/// Sub-fields of `bEndpointAddress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressFields {
    /// Endpoint number (bits 3:0).
    pub number: u8,
    /// Masked direction bit: 0x80 for IN, 0x00 for OUT.
    pub direction: u8,
}

impl AddressFields {
    pub fn decode(address: u8) -> Self {
        Self {
            number: address & ADDRESS_NUMBER_MASK,
            direction: address & ADDRESS_DIRECTION_MASK,
        }
    }
}

/// Sub-fields of `bmAttributes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeFields {
    /// Transfer type (bits 1:0).
    pub transfer_type: u8,
    /// Synchronization type (bits 3:2), isochronous only.
    pub sync_type: u8,
    /// Usage type (bits 5:4), isochronous only.
    pub usage_type: u8,
}

impl AttributeFields {
    pub fn decode(attributes: u8) -> Self {
        Self {
            transfer_type: attributes & ATTR_TRANSFER_TYPE_MASK,
            sync_type: (attributes & ATTR_SYNC_TYPE_MASK) >> ATTR_SYNC_TYPE_SHIFT,
            usage_type: (attributes & ATTR_USAGE_TYPE_MASK) >> ATTR_USAGE_TYPE_SHIFT,
        }
    }

    /// Pack the fields back into bits 5:0 of `bmAttributes`.
    pub fn encode(&self) -> u8 {
        self.transfer_type
            | (self.sync_type << ATTR_SYNC_TYPE_SHIFT)
            | (self.usage_type << ATTR_USAGE_TYPE_SHIFT)
    }
}

/// USB transfer types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferType {
    Control,
    Isochronous,
    Bulk,
    Interrupt,
}

impl TransferType {
    /// Decode the two transfer type bits.
    pub fn from_bits(bits: u8) -> Self {
        match bits & ATTR_TRANSFER_TYPE_MASK {
            0 => Self::Control,
            1 => Self::Isochronous,
            2 => Self::Bulk,
            _ => Self::Interrupt,
        }
    }
}

/// A standard endpoint descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub length: u8,
    pub descriptor_type: u8,
    /// `bEndpointAddress`: direction bit plus endpoint number.
    pub address: u8,
    /// `bmAttributes`: transfer, sync and usage type.
    pub attributes: u8,
    pub max_packet_size: u16,
    pub interval: u8,
    /// Audio endpoints only: rate of synchronization feedback.
    pub refresh: u8,
    /// Audio endpoints only: address of the synch endpoint.
    pub synch_address: u8,
}

impl EndpointDescriptor {
    pub fn address_fields(&self) -> AddressFields {
        AddressFields::decode(self.address)
    }

    pub fn attribute_fields(&self) -> AttributeFields {
        AttributeFields::decode(self.attributes)
    }

    pub fn transfer_type(&self) -> TransferType {
        TransferType::from_bits(self.attributes)
    }
}
