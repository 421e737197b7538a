// Start-game packet: the world join handshake. This is the most
// version-sensitive packet in the protocol; nearly every revision moved or
// added a field, so the decode/encode walk below is a catalogue of the
// threshold table.

use uuid::Uuid;

use crate::error::Result;
use crate::nbt::{CacheableNbt, NbtTag, TreeRoot};
use crate::packet::{Packet, PacketBound, PacketHandler};
use crate::protocol;
use crate::serializer::{PacketReader, PacketWriter, Vector3};
use crate::types::block_palette::{self, BlockPaletteEntry, LegacyBlockPaletteEntry};
use crate::types::level_settings::{LevelSettings, PlayerMovementSettings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTypeEntry {
    pub string_id: String,
    pub numeric_id: i16,
    /// Not on the wire below 1.16.100; decodes to false there.
    pub component_based: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StartGamePacket {
    pub actor_unique_id: i64,
    pub actor_runtime_id: u64,
    pub player_gamemode: i32,
    pub player_position: Vector3,
    pub pitch: f32,
    pub yaw: f32,
    /// Same content as the actor property sync; only on the wire from
    /// 1.19.0, an empty compound below.
    pub player_actor_properties: CacheableNbt,
    pub level_settings: LevelSettings,
    pub level_id: String,
    pub world_name: String,
    pub premium_world_template_id: String,
    pub is_trial: bool,
    pub player_movement_settings: PlayerMovementSettings,
    /// Only meaningful when `is_trial` is set.
    pub current_tick: u64,
    pub enchantment_seed: i32,
    pub multiplayer_correlation_id: String,
    pub enable_new_inventory_system: bool,
    pub server_software_version: String,
    pub world_template_id: Uuid,
    pub enable_client_side_chunk_generation: bool,
    pub block_palette: Vec<BlockPaletteEntry>,
    pub legacy_block_palette: Vec<LegacyBlockPaletteEntry>,
    /// Hash of the full palette, cross-checked by the client against the
    /// base game version. Fill with 0 to have the client skip verification.
    pub block_palette_checksum: u64,
    pub item_table: Vec<ItemTypeEntry>,
}

impl StartGamePacket {
    fn empty_properties() -> CacheableNbt {
        CacheableNbt::new(TreeRoot::new(NbtTag::Compound(Vec::new())))
    }
}

impl Packet for StartGamePacket {
    const NETWORK_ID: u32 = 0x0b;
    const BOUND: PacketBound = PacketBound::Client;

    fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let actor_unique_id = r.read_actor_unique_id()?;
        let actor_runtime_id = r.read_actor_runtime_id()?;
        let player_gamemode = r.read_var_int()?;

        let player_position = r.read_vector3()?;

        let pitch = r.read_f32le()?;
        let yaw = r.read_f32le()?;

        let level_settings = LevelSettings::read(r)?;

        let level_id = r.read_string()?;
        let world_name = r.read_string()?;
        let premium_world_template_id = r.read_string()?;
        let is_trial = r.read_bool()?;
        let player_movement_settings = if r.protocol_id() >= protocol::PROTOCOL_1_13_0 {
            PlayerMovementSettings::read(r)?
        } else {
            PlayerMovementSettings::default()
        };
        let current_tick = r.read_u64le()?;

        let enchantment_seed = r.read_var_int()?;

        let (block_palette, legacy_block_palette) = block_palette::read_palette(r)?;

        let mut item_table = Vec::new();
        for _ in 0..r.read_unsigned_var_int()? {
            let string_id = r.read_string()?;
            let numeric_id = r.read_i16le()?;
            let component_based = if r.protocol_id() >= protocol::PROTOCOL_1_16_100 {
                r.read_bool()?
            } else {
                false
            };
            item_table.push(ItemTypeEntry {
                string_id,
                numeric_id,
                component_based,
            });
        }

        let multiplayer_correlation_id = r.read_string()?;
        let enable_new_inventory_system = if r.protocol_id() >= protocol::PROTOCOL_1_16_0 {
            r.read_bool()?
        } else {
            false
        };
        let server_software_version = if r.protocol_id() >= protocol::PROTOCOL_1_17_0 {
            r.read_string()?
        } else {
            String::new()
        };
        let mut player_actor_properties = Self::empty_properties();
        let mut block_palette_checksum = 0;
        let mut world_template_id = Uuid::nil();
        if r.protocol_id() >= protocol::PROTOCOL_1_19_0 {
            player_actor_properties = CacheableNbt::new(r.read_nbt_compound_root()?);
            block_palette_checksum = r.read_u64le()?;
            world_template_id = r.read_uuid()?;
        } else if r.protocol_id() >= protocol::PROTOCOL_1_18_0 {
            block_palette_checksum = r.read_u64le()?;
        }
        let enable_client_side_chunk_generation = if r.protocol_id() >= protocol::PROTOCOL_1_19_20
        {
            r.read_bool()?
        } else {
            false
        };

        Ok(Self {
            actor_unique_id,
            actor_runtime_id,
            player_gamemode,
            player_position,
            pitch,
            yaw,
            player_actor_properties,
            level_settings,
            level_id,
            world_name,
            premium_world_template_id,
            is_trial,
            player_movement_settings,
            current_tick,
            enchantment_seed,
            multiplayer_correlation_id,
            enable_new_inventory_system,
            server_software_version,
            world_template_id,
            enable_client_side_chunk_generation,
            block_palette,
            legacy_block_palette,
            block_palette_checksum,
            item_table,
        })
    }

    fn encode(&self, w: &mut PacketWriter) -> Result<()> {
        w.write_actor_unique_id(self.actor_unique_id);
        w.write_actor_runtime_id(self.actor_runtime_id);
        w.write_var_int(self.player_gamemode);

        w.write_vector3(self.player_position);

        w.write_f32le(self.pitch);
        w.write_f32le(self.yaw);

        self.level_settings.write(w);

        w.write_string(&self.level_id);
        w.write_string(&self.world_name);
        w.write_string(&self.premium_world_template_id);
        w.write_bool(self.is_trial);
        if w.protocol_id() >= protocol::PROTOCOL_1_13_0 {
            self.player_movement_settings.write(w);
        }
        w.write_u64le(self.current_tick);

        w.write_var_int(self.enchantment_seed);

        block_palette::write_palette(w, &self.block_palette, &self.legacy_block_palette)?;

        w.write_unsigned_var_int(self.item_table.len() as u32);
        for entry in &self.item_table {
            w.write_string(&entry.string_id);
            w.write_i16le(entry.numeric_id);
            if w.protocol_id() >= protocol::PROTOCOL_1_16_100 {
                w.write_bool(entry.component_based);
            }
        }

        w.write_string(&self.multiplayer_correlation_id);
        if w.protocol_id() >= protocol::PROTOCOL_1_16_0 {
            w.write_bool(self.enable_new_inventory_system);
        }
        if w.protocol_id() >= protocol::PROTOCOL_1_17_0 {
            w.write_string(&self.server_software_version);
        }
        if w.protocol_id() >= protocol::PROTOCOL_1_19_0 {
            w.write_cacheable_nbt(&self.player_actor_properties)?;
            w.write_u64le(self.block_palette_checksum);
            w.write_uuid(self.world_template_id);
        } else if w.protocol_id() >= protocol::PROTOCOL_1_18_0 {
            w.write_u64le(self.block_palette_checksum);
        }
        if w.protocol_id() >= protocol::PROTOCOL_1_19_20 {
            w.write_bool(self.enable_client_side_chunk_generation);
        }
        Ok(())
    }

    fn dispatch(&self, handler: &mut dyn PacketHandler) -> bool {
        handler.handle_start_game(self)
    }
}
