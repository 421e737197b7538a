// Item stack response records.
//
// The result code was a plain boolean until 1.16.100 widened it to a full
// byte. The library only names OK and ERROR; every other byte value is
// structurally valid and round-trips untouched, since a reader can store it
// without interpreting it.

use crate::error::Result;
use crate::protocol;
use crate::serializer::{PacketReader, PacketWriter};

pub const RESULT_OK: u8 = 0;
pub const RESULT_ERROR: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStackResponse {
    pub result: u8,
    pub request_id: i32,
    pub container_infos: Vec<ItemStackResponseContainerInfo>,
}

impl ItemStackResponse {
    pub fn read(r: &mut PacketReader<'_>) -> Result<Self> {
        let result = if r.protocol_id() >= protocol::PROTOCOL_1_16_100 {
            r.read_u8()?
        } else if r.read_bool()? {
            RESULT_OK
        } else {
            RESULT_ERROR
        };
        let request_id = r.read_generic_type_network_id()?;
        let mut container_infos = Vec::new();
        for _ in 0..r.read_unsigned_var_int()? {
            container_infos.push(ItemStackResponseContainerInfo::read(r)?);
        }
        Ok(Self {
            result,
            request_id,
            container_infos,
        })
    }

    pub fn write(&self, w: &mut PacketWriter) {
        if w.protocol_id() >= protocol::PROTOCOL_1_16_100 {
            w.write_u8(self.result);
        } else {
            w.write_bool(self.result == RESULT_OK);
        }
        w.write_generic_type_network_id(self.request_id);
        w.write_unsigned_var_int(self.container_infos.len() as u32);
        for info in &self.container_infos {
            info.write(w);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStackResponseContainerInfo {
    pub container_id: u8,
    pub slots: Vec<ItemStackResponseSlotInfo>,
}

impl ItemStackResponseContainerInfo {
    pub fn read(r: &mut PacketReader<'_>) -> Result<Self> {
        let container_id = r.read_u8()?;
        let mut slots = Vec::new();
        for _ in 0..r.read_unsigned_var_int()? {
            slots.push(ItemStackResponseSlotInfo::read(r)?);
        }
        Ok(Self {
            container_id,
            slots,
        })
    }

    pub fn write(&self, w: &mut PacketWriter) {
        w.write_u8(self.container_id);
        w.write_unsigned_var_int(self.slots.len() as u32);
        for slot in &self.slots {
            slot.write(w);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStackResponseSlotInfo {
    pub slot: u8,
    pub hotbar_slot: u8,
    pub count: u8,
    pub item_stack_id: i32,
    /// Empty below 1.16.200, where the field is not on the wire.
    pub custom_name: String,
}

impl ItemStackResponseSlotInfo {
    pub fn read(r: &mut PacketReader<'_>) -> Result<Self> {
        let slot = r.read_u8()?;
        let hotbar_slot = r.read_u8()?;
        let count = r.read_u8()?;
        let item_stack_id = r.read_generic_type_network_id()?;
        let custom_name = if r.protocol_id() >= protocol::PROTOCOL_1_16_200 {
            r.read_string()?
        } else {
            String::new()
        };
        Ok(Self {
            slot,
            hotbar_slot,
            count,
            item_stack_id,
            custom_name,
        })
    }

    pub fn write(&self, w: &mut PacketWriter) {
        w.write_u8(self.slot);
        w.write_u8(self.hotbar_slot);
        w.write_u8(self.count);
        w.write_generic_type_network_id(self.item_stack_id);
        if w.protocol_id() >= protocol::PROTOCOL_1_16_200 {
            w.write_string(&self.custom_name);
        }
    }
}
