// Entity metadata properties and synced property data.
//
// Metadata is a map of numeric keys to values whose wire shape is selected by
// a type id written before the value. The type set is closed; an id outside
// it makes the rest of the stream uninterpretable and fails the decode.

use std::collections::BTreeMap;

use crate::error::{ProtocolError, Result};
use crate::nbt::CacheableNbt;
use crate::serializer::{BlockPosition, PacketReader, PacketWriter, Vector3};

pub const DATA_TYPE_BYTE: u32 = 0;
pub const DATA_TYPE_SHORT: u32 = 1;
pub const DATA_TYPE_INT: u32 = 2;
pub const DATA_TYPE_FLOAT: u32 = 3;
pub const DATA_TYPE_STRING: u32 = 4;
pub const DATA_TYPE_COMPOUND: u32 = 5;
pub const DATA_TYPE_POS: u32 = 6;
pub const DATA_TYPE_LONG: u32 = 7;
pub const DATA_TYPE_VECTOR3: u32 = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum MetadataProperty {
    Byte(i8),
    Short(i16),
    Int(i32),
    Float(f32),
    String(String),
    CompoundTag(CacheableNbt),
    BlockPos(BlockPosition),
    Long(i64),
    Vec3(Vector3),
}

impl MetadataProperty {
    pub fn type_id(&self) -> u32 {
        match self {
            MetadataProperty::Byte(_) => DATA_TYPE_BYTE,
            MetadataProperty::Short(_) => DATA_TYPE_SHORT,
            MetadataProperty::Int(_) => DATA_TYPE_INT,
            MetadataProperty::Float(_) => DATA_TYPE_FLOAT,
            MetadataProperty::String(_) => DATA_TYPE_STRING,
            MetadataProperty::CompoundTag(_) => DATA_TYPE_COMPOUND,
            MetadataProperty::BlockPos(_) => DATA_TYPE_POS,
            MetadataProperty::Long(_) => DATA_TYPE_LONG,
            MetadataProperty::Vec3(_) => DATA_TYPE_VECTOR3,
        }
    }

    fn read(type_id: u32, r: &mut PacketReader<'_>) -> Result<Self> {
        match type_id {
            DATA_TYPE_BYTE => Ok(MetadataProperty::Byte(r.read_i8()?)),
            DATA_TYPE_SHORT => Ok(MetadataProperty::Short(r.read_i16le()?)),
            DATA_TYPE_INT => Ok(MetadataProperty::Int(r.read_var_int()?)),
            DATA_TYPE_FLOAT => Ok(MetadataProperty::Float(r.read_f32le()?)),
            DATA_TYPE_STRING => Ok(MetadataProperty::String(r.read_string()?)),
            DATA_TYPE_COMPOUND => Ok(MetadataProperty::CompoundTag(CacheableNbt::new(
                r.read_nbt_compound_root()?,
            ))),
            DATA_TYPE_POS => Ok(MetadataProperty::BlockPos(r.read_signed_block_position()?)),
            DATA_TYPE_LONG => Ok(MetadataProperty::Long(r.read_var_long()?)),
            DATA_TYPE_VECTOR3 => Ok(MetadataProperty::Vec3(r.read_vector3()?)),
            other => Err(ProtocolError::BadDiscriminator {
                what: "metadata property type",
                value: other as i64,
            }),
        }
    }

    fn write(&self, w: &mut PacketWriter) -> Result<()> {
        match self {
            MetadataProperty::Byte(v) => w.write_i8(*v),
            MetadataProperty::Short(v) => w.write_i16le(*v),
            MetadataProperty::Int(v) => w.write_var_int(*v),
            MetadataProperty::Float(v) => w.write_f32le(*v),
            MetadataProperty::String(v) => w.write_string(v),
            MetadataProperty::CompoundTag(v) => w.write_cacheable_nbt(v)?,
            MetadataProperty::BlockPos(v) => w.write_signed_block_position(*v),
            MetadataProperty::Long(v) => w.write_var_long(*v),
            MetadataProperty::Vec3(v) => w.write_vector3(*v),
        }
        Ok(())
    }
}

/// Keyed storage keeps encode order deterministic, so a decoded map encodes
/// back to the same bytes.
pub type EntityMetadata = BTreeMap<u32, MetadataProperty>;

pub fn read_entity_metadata(r: &mut PacketReader<'_>) -> Result<EntityMetadata> {
    let mut metadata = BTreeMap::new();
    for _ in 0..r.read_unsigned_var_int()? {
        let key = r.read_unsigned_var_int()?;
        let type_id = r.read_unsigned_var_int()?;
        metadata.insert(key, MetadataProperty::read(type_id, r)?);
    }
    Ok(metadata)
}

pub fn write_entity_metadata(w: &mut PacketWriter, metadata: &EntityMetadata) -> Result<()> {
    w.write_unsigned_var_int(metadata.len() as u32);
    for (key, property) in metadata {
        w.write_unsigned_var_int(*key);
        w.write_unsigned_var_int(property.type_id());
        property.write(w)?;
    }
    Ok(())
}

/// Synced actor properties, split into int and float tables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertySyncData {
    pub int_properties: Vec<(u32, i32)>,
    pub float_properties: Vec<(u32, f32)>,
}

impl PropertySyncData {
    pub fn read(r: &mut PacketReader<'_>) -> Result<Self> {
        let mut int_properties = Vec::new();
        for _ in 0..r.read_unsigned_var_int()? {
            let index = r.read_unsigned_var_int()?;
            let value = r.read_var_int()?;
            int_properties.push((index, value));
        }
        let mut float_properties = Vec::new();
        for _ in 0..r.read_unsigned_var_int()? {
            let index = r.read_unsigned_var_int()?;
            let value = r.read_f32le()?;
            float_properties.push((index, value));
        }
        Ok(Self {
            int_properties,
            float_properties,
        })
    }

    pub fn write(&self, w: &mut PacketWriter) {
        w.write_unsigned_var_int(self.int_properties.len() as u32);
        for (index, value) in &self.int_properties {
            w.write_unsigned_var_int(*index);
            w.write_var_int(*value);
        }
        w.write_unsigned_var_int(self.float_properties.len() as u32);
        for (index, value) in &self.float_properties {
            w.write_unsigned_var_int(*index);
            w.write_f32le(*value);
        }
    }
}
