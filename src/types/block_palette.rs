// Block palette codec.
//
// The palette went through three wire shapes. Below 1.13.0 it is a flat list
// of (name, metadata, id) triples. From 1.13.0 the entries moved into a
// single NBT list root of compounds, each holding a "block" compound with the
// name. From 1.16.100 the list root was dropped again in favour of
// (name, state document) pairs read directly from the stream. Exactly one
// shape is valid per revision, and encode mirrors the same bands so a palette
// round-trips at every supported protocol id.

use crate::error::{ProtocolError, Result};
use crate::nbt::{CacheableNbt, NbtTag, TreeRoot};
use crate::protocol;
use crate::serializer::{PacketReader, PacketWriter};

#[derive(Debug, Clone, PartialEq)]
pub struct BlockPaletteEntry {
    pub name: String,
    pub states: CacheableNbt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyBlockPaletteEntry {
    pub name: String,
    pub id: u16,
    pub metadata: u16,
}

/// Decodes whichever palette shape the reader's protocol id selects. The
/// other list comes back empty.
pub fn read_palette(
    r: &mut PacketReader<'_>,
) -> Result<(Vec<BlockPaletteEntry>, Vec<LegacyBlockPaletteEntry>)> {
    let mut modern = Vec::new();
    let mut legacy = Vec::new();

    if r.protocol_id() >= protocol::PROTOCOL_1_13_0 {
        if r.protocol_id() >= protocol::PROTOCOL_1_16_100 {
            for _ in 0..r.read_unsigned_var_int()? {
                let name = r.read_string()?;
                let states = r.read_nbt_compound_root()?;
                modern.push(BlockPaletteEntry {
                    name,
                    states: CacheableNbt::new(states),
                });
            }
        } else {
            let root = r.read_nbt_root()?;
            let entries = match root.tag {
                NbtTag::List(entries) => entries,
                other => {
                    return Err(ProtocolError::UnexpectedNbtTag {
                        tag: other.tag_id(),
                        context: "block palette list root",
                    })
                }
            };
            for state in entries {
                if !matches!(state, NbtTag::Compound(_)) {
                    return Err(ProtocolError::UnexpectedNbtTag {
                        tag: state.tag_id(),
                        context: "block palette entry",
                    });
                }
                let name = state
                    .get("block")
                    .and_then(|block| block.get("name"))
                    .and_then(NbtTag::as_str)
                    .ok_or_else(|| {
                        ProtocolError::Malformed(
                            "palette entry is missing the block name compound".into(),
                        )
                    })?
                    .to_string();
                modern.push(BlockPaletteEntry {
                    name,
                    states: CacheableNbt::new(TreeRoot::new(state)),
                });
            }
        }
    } else {
        for _ in 0..r.read_unsigned_var_int()? {
            let name = r.read_string()?;
            let metadata = r.read_u16le()?;
            let id = r.read_u16le()?;
            legacy.push(LegacyBlockPaletteEntry { name, id, metadata });
        }
    }

    Ok((modern, legacy))
}

pub fn write_palette(
    w: &mut PacketWriter,
    modern: &[BlockPaletteEntry],
    legacy: &[LegacyBlockPaletteEntry],
) -> Result<()> {
    if w.protocol_id() >= protocol::PROTOCOL_1_16_100 {
        w.write_unsigned_var_int(modern.len() as u32);
        for entry in modern {
            w.write_string(&entry.name);
            w.write_cacheable_nbt(&entry.states)?;
        }
    } else if w.protocol_id() >= protocol::PROTOCOL_1_13_0 {
        let states = modern
            .iter()
            .map(|entry| entry.states.root().tag.clone())
            .collect();
        w.write_nbt_root(&TreeRoot::new(NbtTag::List(states)))?;
    } else {
        w.write_unsigned_var_int(legacy.len() as u32);
        for entry in legacy {
            w.write_string(&entry.name);
            w.write_u16le(entry.metadata);
            w.write_u16le(entry.id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn middle_band_entry(name: &str) -> BlockPaletteEntry {
        let state = NbtTag::Compound(vec![
            (
                "block".into(),
                NbtTag::Compound(vec![("name".into(), NbtTag::String(name.into()))]),
            ),
            ("version".into(), NbtTag::Int(17_879_555)),
        ]);
        BlockPaletteEntry {
            name: name.into(),
            states: CacheableNbt::new(TreeRoot::new(state)),
        }
    }

    fn flat_entry(name: &str) -> BlockPaletteEntry {
        let state = NbtTag::Compound(vec![(
            "states".into(),
            NbtTag::Compound(vec![("lit".into(), NbtTag::Byte(1))]),
        )]);
        BlockPaletteEntry {
            name: name.into(),
            states: CacheableNbt::new(TreeRoot::new(state)),
        }
    }

    fn encode(
        protocol_id: u32,
        modern: &[BlockPaletteEntry],
        legacy: &[LegacyBlockPaletteEntry],
    ) -> Vec<u8> {
        let mut w = PacketWriter::new(protocol_id);
        write_palette(&mut w, modern, legacy).unwrap();
        w.into_bytes().to_vec()
    }

    #[test]
    fn test_legacy_band_roundtrip() {
        let legacy = vec![
            LegacyBlockPaletteEntry {
                name: "minecraft:stone".into(),
                id: 1,
                metadata: 0,
            },
            LegacyBlockPaletteEntry {
                name: "minecraft:dirt".into(),
                id: 3,
                metadata: 2,
            },
        ];
        let bytes = encode(protocol::PROTOCOL_1_12_0, &[], &legacy);
        let mut r = PacketReader::new(&bytes, protocol::PROTOCOL_1_12_0);
        let (modern, decoded) = read_palette(&mut r).unwrap();
        assert!(modern.is_empty());
        assert_eq!(decoded, legacy);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_middle_band_roundtrip() {
        let entries = vec![middle_band_entry("minecraft:stone"), middle_band_entry("minecraft:dirt")];
        let bytes = encode(protocol::PROTOCOL_1_13_0, &entries, &[]);
        let mut r = PacketReader::new(&bytes, protocol::PROTOCOL_1_13_0);
        let (decoded, legacy) = read_palette(&mut r).unwrap();
        assert!(legacy.is_empty());
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].name, "minecraft:stone");
        assert_eq!(decoded[1].name, "minecraft:dirt");
        // The state document itself survives intact.
        assert_eq!(decoded[0].states, entries[0].states);
    }

    #[test]
    fn test_flattened_band_roundtrip() {
        let entries = vec![flat_entry("minecraft:furnace")];
        let bytes = encode(protocol::PROTOCOL_1_16_100, &entries, &[]);
        let mut r = PacketReader::new(&bytes, protocol::PROTOCOL_1_16_100);
        let (decoded, legacy) = read_palette(&mut r).unwrap();
        assert!(legacy.is_empty());
        assert_eq!(decoded, entries);
    }

    #[test]
    fn test_wrong_band_fails() {
        // A flattened-format buffer is not a valid NBT list root, so reading
        // it at a middle-band revision must fail.
        let entries = vec![flat_entry("minecraft:furnace")];
        let bytes = encode(protocol::PROTOCOL_1_16_100, &entries, &[]);
        let mut r = PacketReader::new(&bytes, protocol::PROTOCOL_1_13_0);
        assert!(read_palette(&mut r).is_err());
    }

    #[test]
    fn test_middle_band_requires_block_name() {
        let anonymous = BlockPaletteEntry {
            name: "x".into(),
            states: CacheableNbt::new(TreeRoot::new(NbtTag::Compound(vec![]))),
        };
        let bytes = encode(protocol::PROTOCOL_1_13_0, &[anonymous], &[]);
        let mut r = PacketReader::new(&bytes, protocol::PROTOCOL_1_13_0);
        assert!(read_palette(&mut r).is_err());
    }
}
