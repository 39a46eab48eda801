//! Wire packet framing.
//!
//! ```text
//! offset  size  field
//! 0       1     version (= 1)
//! 1       1     type (1 = Handshake, 2 = Data)
//! 2       2     nonce_size
//! 4       2     length (= nonce_size + payload_size)
//! 6       32    prev_hash
//! 38      ..    nonce (nonce_size bytes)
//! 38+n    ..    payload
//! ```

use crate::error::FramingError;

/// Current (only) wire protocol version.
pub const VERSION: u8 = 1;

/// Fixed size of the packet header in bytes.
pub const HEADER_SIZE: usize = 38;

/// Size of the `prev_hash` field.
pub const HASH_SIZE: usize = 32;

/// Packet type discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    Handshake = 1,
    Data = 2,
}

impl TryFrom<u8> for PacketType {
    type Error = FramingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PacketType::Handshake),
            2 => Ok(PacketType::Data),
            other => Err(FramingError::UnknownType(other)),
        }
    }
}

impl From<PacketType> for u8 {
    fn from(t: PacketType) -> u8 {
        t as u8
    }
}

/// Parsed packet header (everything but nonce/payload).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    pub version: u8,
    pub packet_type: PacketType,
    pub nonce_size: u16,
    pub length: u16,
    pub prev_hash: [u8; HASH_SIZE],
}

/// A complete wire packet: header plus the raw nonce and payload bytes.
///
/// `payload` is the AEAD ciphertext (tag included) for Data packets, or the
/// raw handshake payload for Handshake packets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurePacket {
    pub header: PacketHeader,
    pub nonce: Vec<u8>,
    pub payload: Vec<u8>,
}

impl SecurePacket {
    /// Build a Handshake packet. Handshake packets carry no nonce and an
    /// all-zero `prev_hash` - they are not part of either chain.
    pub fn handshake(payload: Vec<u8>) -> Self {
        SecurePacket {
            header: PacketHeader {
                version: VERSION,
                packet_type: PacketType::Handshake,
                nonce_size: 0,
                length: payload.len() as u16,
                prev_hash: [0u8; HASH_SIZE],
            },
            nonce: Vec::new(),
            payload,
        }
    }

    /// Build a Data packet with an explicit chain `prev_hash`, AEAD nonce,
    /// and ciphertext payload.
    pub fn data(prev_hash: [u8; HASH_SIZE], nonce: Vec<u8>, payload: Vec<u8>) -> Self {
        let length = (nonce.len() + payload.len()) as u16;
        SecurePacket {
            header: PacketHeader {
                version: VERSION,
                packet_type: PacketType::Data,
                nonce_size: nonce.len() as u16,
                length,
                prev_hash,
            },
            nonce,
            payload,
        }
    }

    /// Serialize to the fixed wire layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE + self.nonce.len() + self.payload.len());
        out.push(self.header.version);
        out.push(self.header.packet_type.into());
        out.extend_from_slice(&self.header.nonce_size.to_be_bytes());
        out.extend_from_slice(&self.header.length.to_be_bytes());
        out.extend_from_slice(&self.header.prev_hash);
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.payload);
        out
    }

    /// Parse a wire packet, rejecting short reads, length mismatches, and
    /// unsupported versions.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FramingError> {
        if bytes.len() < HEADER_SIZE {
            return Err(FramingError::ShortRead {
                needed: HEADER_SIZE,
                got: bytes.len(),
            });
        }

        let version = bytes[0];
        if version != VERSION {
            return Err(FramingError::VersionMismatch(version));
        }

        let packet_type = PacketType::try_from(bytes[1])?;
        let nonce_size = u16::from_be_bytes([bytes[2], bytes[3]]);
        let length = u16::from_be_bytes([bytes[4], bytes[5]]);

        let mut prev_hash = [0u8; HASH_SIZE];
        prev_hash.copy_from_slice(&bytes[6..6 + HASH_SIZE]);

        let remaining = &bytes[HEADER_SIZE..];
        if remaining.len() != length as usize {
            return Err(FramingError::LengthMismatch {
                declared: length as usize,
                actual: remaining.len(),
            });
        }
        if remaining.len() < nonce_size as usize {
            return Err(FramingError::ShortRead {
                needed: nonce_size as usize,
                got: remaining.len(),
            });
        }

        let (nonce, payload) = remaining.split_at(nonce_size as usize);

        Ok(SecurePacket {
            header: PacketHeader {
                version,
                packet_type,
                nonce_size,
                length,
                prev_hash,
            },
            nonce: nonce.to_vec(),
            payload: payload.to_vec(),
        })
    }
}
