// Item stacks and recipe ingredients.
//
// Wire id 0 is the "no item" discriminator for both, so the in-memory types
// are explicit Empty/Item variants instead of a struct with a magic id.

use crate::binary_stream::ByteReader;
use crate::error::{ProtocolError, Result};
use crate::nbt::{CacheableNbt, TreeRoot};
use crate::protocol;
use crate::serializer::{PacketReader, PacketWriter};

/// The length-prefixed user data block trailing an item stack. The prefix
/// lets a reader skip content it does not understand, so any bytes after the
/// document are carried verbatim and written back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemUserData {
    pub nbt: CacheableNbt,
    pub extension: Vec<u8>,
}

impl ItemUserData {
    pub fn new(nbt: CacheableNbt) -> Self {
        Self {
            nbt,
            extension: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemStackData {
    pub id: i32,
    pub count: u16,
    pub aux_value: u32,
    /// Server-authoritative stack handle. Only on the wire at/after
    /// 1.16.100; defaults to 0 below and in the without-stack-id forms.
    pub stack_id: i32,
    pub user_data: Option<ItemUserData>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemStack {
    Empty,
    Item(ItemStackData),
}

impl ItemStack {
    pub fn read(r: &mut PacketReader<'_>) -> Result<Self> {
        Self::read_inner(r, true)
    }

    /// Recipe outputs never carry the stack id, at any revision.
    pub fn read_without_stack_id(r: &mut PacketReader<'_>) -> Result<Self> {
        Self::read_inner(r, false)
    }

    fn read_inner(r: &mut PacketReader<'_>, with_stack_id: bool) -> Result<Self> {
        let id = r.read_var_int()?;
        if id == 0 {
            return Ok(ItemStack::Empty);
        }
        let count = r.read_u16le()?;
        let aux_value = r.read_unsigned_var_int()?;
        let stack_id = if with_stack_id && r.protocol_id() >= protocol::PROTOCOL_1_16_100 {
            r.read_generic_type_network_id()?
        } else {
            0
        };
        let user_data = read_user_data(r)?;
        Ok(ItemStack::Item(ItemStackData {
            id,
            count,
            aux_value,
            stack_id,
            user_data,
        }))
    }

    pub fn write(&self, w: &mut PacketWriter) -> Result<()> {
        self.write_inner(w, true)
    }

    pub fn write_without_stack_id(&self, w: &mut PacketWriter) -> Result<()> {
        self.write_inner(w, false)
    }

    fn write_inner(&self, w: &mut PacketWriter, with_stack_id: bool) -> Result<()> {
        let data = match self {
            ItemStack::Empty => {
                w.write_var_int(0);
                return Ok(());
            }
            ItemStack::Item(data) => data,
        };
        if data.id == 0 {
            return Err(ProtocolError::Malformed(
                "item id 0 is reserved for the empty stack".into(),
            ));
        }
        w.write_var_int(data.id);
        w.write_u16le(data.count);
        w.write_unsigned_var_int(data.aux_value);
        if with_stack_id && w.protocol_id() >= protocol::PROTOCOL_1_16_100 {
            w.write_generic_type_network_id(data.stack_id);
        }
        write_user_data(w, data.user_data.as_ref())
    }
}

fn read_user_data(r: &mut PacketReader<'_>) -> Result<Option<ItemUserData>> {
    let len = r.read_unsigned_var_int()? as usize;
    if len == 0 {
        return Ok(None);
    }
    let block = r.read_bytes(len)?;
    let mut sub = ByteReader::new(block);
    let root = TreeRoot::read(&mut sub)?;
    let extension = block[sub.position()..].to_vec();
    Ok(Some(ItemUserData {
        nbt: CacheableNbt::new(root),
        extension,
    }))
}

fn write_user_data(w: &mut PacketWriter, user_data: Option<&ItemUserData>) -> Result<()> {
    match user_data {
        None => {
            w.write_unsigned_var_int(0);
            Ok(())
        }
        Some(data) => {
            let encoded = data.nbt.encoded()?;
            w.write_unsigned_var_int((encoded.len() + data.extension.len()) as u32);
            w.write_bytes(encoded);
            w.write_bytes(&data.extension);
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeIngredient {
    Empty,
    Item { id: i32, meta: i32, count: i32 },
}

impl RecipeIngredient {
    pub fn read(r: &mut PacketReader<'_>) -> Result<Self> {
        let id = r.read_var_int()?;
        if id == 0 {
            return Ok(RecipeIngredient::Empty);
        }
        Ok(RecipeIngredient::Item {
            id,
            meta: r.read_var_int()?,
            count: r.read_var_int()?,
        })
    }

    pub fn write(&self, w: &mut PacketWriter) {
        match self {
            RecipeIngredient::Empty => w.write_var_int(0),
            RecipeIngredient::Item { id, meta, count } => {
                w.write_var_int(*id);
                w.write_var_int(*meta);
                w.write_var_int(*count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nbt::NbtTag;

    fn sample_nbt() -> CacheableNbt {
        CacheableNbt::new(TreeRoot::new(NbtTag::Compound(vec![(
            "display".into(),
            NbtTag::String("Excalibur".into()),
        )])))
    }

    fn roundtrip(stack: &ItemStack, protocol_id: u32) -> ItemStack {
        let mut w = PacketWriter::new(protocol_id);
        stack.write(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = PacketReader::new(&bytes, protocol_id);
        let out = ItemStack::read(&mut r).unwrap();
        assert_eq!(r.remaining(), 0);
        out
    }

    #[test]
    fn test_empty_stack_is_single_byte() {
        let mut w = PacketWriter::new(protocol::CURRENT);
        ItemStack::Empty.write(&mut w).unwrap();
        assert_eq!(w.as_slice(), &[0x00]);
        assert_eq!(roundtrip(&ItemStack::Empty, protocol::CURRENT), ItemStack::Empty);
    }

    #[test]
    fn test_item_roundtrip_current() {
        let stack = ItemStack::Item(ItemStackData {
            id: 5,
            count: 64,
            aux_value: 3,
            stack_id: 77,
            user_data: Some(ItemUserData::new(sample_nbt())),
        });
        assert_eq!(roundtrip(&stack, protocol::CURRENT), stack);
    }

    #[test]
    fn test_stack_id_absent_below_threshold() {
        let stack = ItemStack::Item(ItemStackData {
            id: 5,
            count: 1,
            aux_value: 0,
            stack_id: 77,
            user_data: None,
        });
        let mut w = PacketWriter::new(protocol::PROTOCOL_1_13_0);
        stack.write(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = PacketReader::new(&bytes, protocol::PROTOCOL_1_13_0);
        // Decoding at the old revision fills the documented default.
        match ItemStack::read(&mut r).unwrap() {
            ItemStack::Item(data) => assert_eq!(data.stack_id, 0),
            ItemStack::Empty => panic!("expected an item"),
        }
    }

    #[test]
    fn test_user_data_extension_preserved() {
        let mut user_data = ItemUserData::new(sample_nbt());
        user_data.extension = vec![0xde, 0xad, 0xbe, 0xef];
        let stack = ItemStack::Item(ItemStackData {
            id: 9,
            count: 2,
            aux_value: 0,
            stack_id: 1,
            user_data: Some(user_data),
        });
        let decoded = roundtrip(&stack, protocol::CURRENT);
        match decoded {
            ItemStack::Item(data) => {
                let user_data = data.user_data.expect("user data");
                assert_eq!(user_data.extension, vec![0xde, 0xad, 0xbe, 0xef]);
            }
            ItemStack::Empty => panic!("expected an item"),
        }
    }

    #[test]
    fn test_item_id_zero_not_encodable() {
        let stack = ItemStack::Item(ItemStackData {
            id: 0,
            count: 1,
            aux_value: 0,
            stack_id: 0,
            user_data: None,
        });
        let mut w = PacketWriter::new(protocol::CURRENT);
        assert!(stack.write(&mut w).is_err());
    }

    #[test]
    fn test_ingredient_roundtrip() {
        for ingredient in [
            RecipeIngredient::Empty,
            RecipeIngredient::Item {
                id: 280,
                meta: -1,
                count: 2,
            },
        ] {
            let mut w = PacketWriter::new(protocol::CURRENT);
            ingredient.write(&mut w);
            let bytes = w.into_bytes();
            let mut r = PacketReader::new(&bytes, protocol::CURRENT);
            assert_eq!(RecipeIngredient::read(&mut r).unwrap(), ingredient);
        }
    }
}
