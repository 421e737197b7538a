// Error types shared by every decode/encode path in the library.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Failure modes of the wire codec. Every variant is fatal to the current
/// decode or encode; nothing is retried inside the library.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("buffer underrun at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    Underrun {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("varint did not terminate within {max_bytes} bytes")]
    VarIntTooBig { max_bytes: usize },

    #[error("invalid UTF-8 in string field: {0}")]
    InvalidString(#[from] std::string::FromUtf8Error),

    #[error("unexpected NBT tag {tag} while reading {context}")]
    UnexpectedNbtTag { tag: u8, context: &'static str },

    #[error("negative length {len} for {context}")]
    NegativeLength { len: i64, context: &'static str },

    #[error("unknown {what} discriminator {value}")]
    BadDiscriminator { what: &'static str, value: i64 },

    #[error("packet id {id:#04x} registered twice")]
    DuplicatePacketId { id: u32 },

    #[error("no decoder registered for packet id {id:#04x}")]
    UnknownPacketId { id: u32 },

    #[error("malformed packet data: {0}")]
    Malformed(String),
}
