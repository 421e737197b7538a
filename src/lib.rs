// Wire codec for the Minecraft Bedrock Edition network protocol.
//
// Pure, synchronous encode/decode between packet structs and versioned byte
// streams, plus handler dispatch. Transport concerns (framing, compression,
// encryption) live outside this crate.

pub mod binary_stream;
pub mod capture;
pub mod error;
pub mod nbt;
pub mod packet;
pub mod packets;
pub mod protocol;
pub mod serializer;
pub mod types;
pub mod varint;

pub use error::{ProtocolError, Result};
pub use packet::{encode_packet, AnyPacket, Packet, PacketBound, PacketHandler, PacketRegistry};
pub use serializer::{BlockPosition, PacketReader, PacketWriter, Vector3};
