// Actor data sync. Nominally clientbound but observed in both directions,
// so the direction tag stays Both.

use crate::error::Result;
use crate::packet::{Packet, PacketBound, PacketHandler};
use crate::protocol;
use crate::serializer::{PacketReader, PacketWriter};
use crate::types::metadata::{
    read_entity_metadata, write_entity_metadata, EntityMetadata, PropertySyncData,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SetActorDataPacket {
    pub actor_runtime_id: u64,
    pub metadata: EntityMetadata,
    /// Empty below 1.19.40, where the tables are not on the wire.
    pub synced_properties: PropertySyncData,
    /// 0 below 1.16.100.
    pub tick: u64,
}

impl Packet for SetActorDataPacket {
    const NETWORK_ID: u32 = 0x27;
    const BOUND: PacketBound = PacketBound::Both;

    fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let actor_runtime_id = r.read_actor_runtime_id()?;
        let metadata = read_entity_metadata(r)?;
        let synced_properties = if r.protocol_id() >= protocol::PROTOCOL_1_19_40 {
            PropertySyncData::read(r)?
        } else {
            PropertySyncData::default()
        };
        let tick = if r.protocol_id() >= protocol::PROTOCOL_1_16_100 {
            r.read_unsigned_var_long()?
        } else {
            0
        };
        Ok(Self {
            actor_runtime_id,
            metadata,
            synced_properties,
            tick,
        })
    }

    fn encode(&self, w: &mut PacketWriter) -> Result<()> {
        w.write_actor_runtime_id(self.actor_runtime_id);
        write_entity_metadata(w, &self.metadata)?;
        if w.protocol_id() >= protocol::PROTOCOL_1_19_40 {
            self.synced_properties.write(w);
        }
        if w.protocol_id() >= protocol::PROTOCOL_1_16_100 {
            w.write_unsigned_var_long(self.tick);
        }
        Ok(())
    }

    fn dispatch(&self, handler: &mut dyn PacketHandler) -> bool {
        handler.handle_set_actor_data(self)
    }
}
