// Server replies to item stack requests, one response per request id.

use crate::error::Result;
use crate::packet::{Packet, PacketBound, PacketHandler};
use crate::serializer::{PacketReader, PacketWriter};
use crate::types::stack_response::ItemStackResponse;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStackResponsePacket {
    pub responses: Vec<ItemStackResponse>,
}

impl Packet for ItemStackResponsePacket {
    const NETWORK_ID: u32 = 0x94;
    const BOUND: PacketBound = PacketBound::Client;

    fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let mut responses = Vec::new();
        for _ in 0..r.read_unsigned_var_int()? {
            responses.push(ItemStackResponse::read(r)?);
        }
        Ok(Self { responses })
    }

    fn encode(&self, w: &mut PacketWriter) -> Result<()> {
        w.write_unsigned_var_int(self.responses.len() as u32);
        for response in &self.responses {
            response.write(w);
        }
        Ok(())
    }

    fn dispatch(&self, handler: &mut dyn PacketHandler) -> bool {
        handler.handle_item_stack_response(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol;
    use crate::types::stack_response::{
        ItemStackResponseContainerInfo, ItemStackResponseSlotInfo, RESULT_ERROR, RESULT_OK,
    };

    fn roundtrip(packet: &ItemStackResponsePacket, protocol_id: u32) -> ItemStackResponsePacket {
        let mut w = PacketWriter::new(protocol_id);
        packet.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = PacketReader::new(&bytes, protocol_id);
        let out = ItemStackResponsePacket::decode(&mut r).unwrap();
        assert_eq!(r.remaining(), 0);
        out
    }

    #[test]
    fn test_roundtrip_both_result_widths() {
        let packet = ItemStackResponsePacket {
            responses: vec![
                ItemStackResponse {
                    result: RESULT_OK,
                    request_id: 1,
                    container_infos: vec![ItemStackResponseContainerInfo {
                        container_id: 28,
                        slots: vec![ItemStackResponseSlotInfo {
                            slot: 0,
                            hotbar_slot: 0,
                            count: 1,
                            item_stack_id: 44,
                            custom_name: String::new(),
                        }],
                    }],
                },
                ItemStackResponse {
                    result: RESULT_ERROR,
                    request_id: -2,
                    container_infos: vec![],
                },
            ],
        };
        assert_eq!(roundtrip(&packet, protocol::CURRENT), packet);
        assert_eq!(roundtrip(&packet, protocol::PROTOCOL_1_16_0), packet);
    }

    #[test]
    fn test_empty_packet() {
        let packet = ItemStackResponsePacket { responses: vec![] };
        assert_eq!(roundtrip(&packet, protocol::CURRENT), packet);
    }
}
