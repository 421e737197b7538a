// Packet model, handler dispatch and the id registry.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProtocolError, Result};
use crate::packets::{
    CraftingDataPacket, ItemStackResponsePacket, SetActorDataPacket, StartGamePacket,
};
use crate::serializer::{PacketReader, PacketWriter};

/// Which side of the connection originates a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PacketBound {
    Client,
    Server,
    Both,
}

/// The contract every packet type implements. Decode fails on malformed or
/// short input instead of partially populating; encode is total for values
/// built through the type's own fields (the codec never enforces game rules);
/// dispatch calls exactly one handler method and returns its verdict.
pub trait Packet: Sized + fmt::Debug {
    const NETWORK_ID: u32;
    const BOUND: PacketBound;

    fn decode(r: &mut PacketReader<'_>) -> Result<Self>;
    fn encode(&self, w: &mut PacketWriter) -> Result<()>;
    fn dispatch(&self, handler: &mut dyn PacketHandler) -> bool;
}

/// One method per packet type, supplied by the embedding application. A
/// `false` return means "unhandled, stop routing" by convention, not an
/// error; every default does exactly that.
pub trait PacketHandler {
    fn handle_start_game(&mut self, _packet: &StartGamePacket) -> bool {
        false
    }

    fn handle_set_actor_data(&mut self, _packet: &SetActorDataPacket) -> bool {
        false
    }

    fn handle_crafting_data(&mut self, _packet: &CraftingDataPacket) -> bool {
        false
    }

    fn handle_item_stack_response(&mut self, _packet: &ItemStackResponsePacket) -> bool {
        false
    }
}

/// Object-safe view of a decoded packet, for callers that only know the
/// numeric id at runtime (the frame reader feeding the registry).
pub trait AnyPacket: fmt::Debug {
    fn network_id(&self) -> u32;
    fn bound(&self) -> PacketBound;
    fn encode(&self, w: &mut PacketWriter) -> Result<()>;
    fn dispatch(&self, handler: &mut dyn PacketHandler) -> bool;
}

impl<P: Packet> AnyPacket for P {
    fn network_id(&self) -> u32 {
        P::NETWORK_ID
    }

    fn bound(&self) -> PacketBound {
        P::BOUND
    }

    fn encode(&self, w: &mut PacketWriter) -> Result<()> {
        Packet::encode(self, w)
    }

    fn dispatch(&self, handler: &mut dyn PacketHandler) -> bool {
        Packet::dispatch(self, handler)
    }
}

type DecodeFn = fn(&mut PacketReader<'_>) -> Result<Box<dyn AnyPacket>>;

fn decode_boxed<P: Packet + 'static>(r: &mut PacketReader<'_>) -> Result<Box<dyn AnyPacket>> {
    Ok(Box::new(P::decode(r)?))
}

/// Maps numeric packet ids to decoders. The external frame reader depends on
/// this mapping being collision-free, so registering an id twice is an error
/// rather than a silent replacement.
#[derive(Default)]
pub struct PacketRegistry {
    decoders: HashMap<u32, DecodeFn>,
}

impl PacketRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in packet set.
    pub fn bedrock() -> Self {
        let mut registry = Self::new();
        // Ids are distinct constants; the duplicate check cannot fire.
        registry
            .decoders
            .insert(StartGamePacket::NETWORK_ID, decode_boxed::<StartGamePacket>);
        registry.decoders.insert(
            SetActorDataPacket::NETWORK_ID,
            decode_boxed::<SetActorDataPacket>,
        );
        registry.decoders.insert(
            CraftingDataPacket::NETWORK_ID,
            decode_boxed::<CraftingDataPacket>,
        );
        registry.decoders.insert(
            ItemStackResponsePacket::NETWORK_ID,
            decode_boxed::<ItemStackResponsePacket>,
        );
        registry
    }

    pub fn register<P: Packet + 'static>(&mut self) -> Result<()> {
        match self.decoders.entry(P::NETWORK_ID) {
            Entry::Occupied(_) => Err(ProtocolError::DuplicatePacketId { id: P::NETWORK_ID }),
            Entry::Vacant(entry) => {
                entry.insert(decode_boxed::<P>);
                Ok(())
            }
        }
    }

    pub fn contains(&self, id: u32) -> bool {
        self.decoders.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Reads the unsigned-varint packet id, then the payload with the
    /// decoder registered for it.
    pub fn decode_packet(&self, r: &mut PacketReader<'_>) -> Result<Box<dyn AnyPacket>> {
        let id = r.read_unsigned_var_int()?;
        let decode = self
            .decoders
            .get(&id)
            .ok_or(ProtocolError::UnknownPacketId { id })?;
        debug!(id, remaining = r.remaining(), "decoding packet payload");
        let packet = decode(r).map_err(|err| {
            debug!(id, %err, "packet decode failed");
            err
        })?;
        Ok(packet)
    }
}

/// Encodes a packet with its unsigned-varint id header, the mirror of
/// `PacketRegistry::decode_packet`.
pub fn encode_packet(packet: &dyn AnyPacket, protocol_id: u32) -> Result<Bytes> {
    let mut w = PacketWriter::new(protocol_id);
    w.write_unsigned_var_int(packet.network_id());
    packet.encode(&mut w)?;
    Ok(w.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol;
    use crate::types::stack_response::ItemStackResponse;

    #[derive(Default)]
    struct CountingHandler {
        start_game: usize,
        set_actor_data: usize,
        crafting_data: usize,
        item_stack_response: usize,
    }

    impl PacketHandler for CountingHandler {
        fn handle_set_actor_data(&mut self, _packet: &SetActorDataPacket) -> bool {
            self.set_actor_data += 1;
            true
        }

        fn handle_item_stack_response(&mut self, _packet: &ItemStackResponsePacket) -> bool {
            self.item_stack_response += 1;
            true
        }
    }

    #[test]
    fn test_registry_rejects_duplicate_ids() {
        let mut registry = PacketRegistry::bedrock();
        assert!(matches!(
            registry.register::<SetActorDataPacket>(),
            Err(ProtocolError::DuplicatePacketId {
                id: SetActorDataPacket::NETWORK_ID
            })
        ));
    }

    #[test]
    fn test_builtin_ids_are_distinct() {
        let mut registry = PacketRegistry::new();
        registry.register::<StartGamePacket>().unwrap();
        registry.register::<SetActorDataPacket>().unwrap();
        registry.register::<CraftingDataPacket>().unwrap();
        registry.register::<ItemStackResponsePacket>().unwrap();
        assert_eq!(registry.len(), PacketRegistry::bedrock().len());
    }

    #[test]
    fn test_unknown_id_fails() {
        let registry = PacketRegistry::bedrock();
        let mut w = PacketWriter::new(protocol::CURRENT);
        w.write_unsigned_var_int(0x3ff);
        let bytes = w.into_bytes();
        let mut r = PacketReader::new(&bytes, protocol::CURRENT);
        assert!(matches!(
            registry.decode_packet(&mut r),
            Err(ProtocolError::UnknownPacketId { id: 0x3ff })
        ));
    }

    #[test]
    fn test_registry_roundtrip_and_dispatch() {
        let packet = SetActorDataPacket {
            actor_runtime_id: 11,
            metadata: Default::default(),
            synced_properties: Default::default(),
            tick: 20,
        };
        let bytes = encode_packet(&packet, protocol::CURRENT).unwrap();

        let registry = PacketRegistry::bedrock();
        let mut r = PacketReader::new(&bytes, protocol::CURRENT);
        let decoded = registry.decode_packet(&mut r).unwrap();
        assert_eq!(r.remaining(), 0);
        assert_eq!(decoded.network_id(), SetActorDataPacket::NETWORK_ID);
        assert_eq!(decoded.bound(), PacketBound::Both);

        // Exactly one handler method fires, exactly once.
        let mut handler = CountingHandler::default();
        assert!(decoded.dispatch(&mut handler));
        assert_eq!(handler.set_actor_data, 1);
        assert_eq!(handler.start_game, 0);
        assert_eq!(handler.crafting_data, 0);
        assert_eq!(handler.item_stack_response, 0);
    }

    #[test]
    fn test_dispatch_default_is_unhandled() {
        struct NullHandler;
        impl PacketHandler for NullHandler {}

        let packet = ItemStackResponsePacket {
            responses: vec![ItemStackResponse {
                result: 0,
                request_id: 1,
                container_infos: vec![],
            }],
        };
        assert!(!Packet::dispatch(&packet, &mut NullHandler));
    }
}
