// Level settings composites carried by the start-game packet.
//
// The vanilla settings blob has grown to hundreds of game-domain fields; this
// keeps the representative core the codec needs to exercise the wire types
// around it.

use crate::error::Result;
use crate::protocol;
use crate::serializer::{BlockPosition, PacketReader, PacketWriter};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelSettings {
    pub seed: i64,
    pub world_gamemode: i32,
    pub difficulty: i32,
    pub spawn_position: BlockPosition,
    pub has_achievements_disabled: bool,
    pub time: i32,
    pub rain_level: f32,
    pub lightning_level: f32,
    pub commands_enabled: bool,
}

impl LevelSettings {
    pub fn read(r: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            seed: r.read_i64le()?,
            world_gamemode: r.read_var_int()?,
            difficulty: r.read_var_int()?,
            spawn_position: r.read_block_position()?,
            has_achievements_disabled: r.read_bool()?,
            time: r.read_var_int()?,
            rain_level: r.read_f32le()?,
            lightning_level: r.read_f32le()?,
            commands_enabled: r.read_bool()?,
        })
    }

    pub fn write(&self, w: &mut PacketWriter) {
        w.write_i64le(self.seed);
        w.write_var_int(self.world_gamemode);
        w.write_var_int(self.difficulty);
        w.write_block_position(self.spawn_position);
        w.write_bool(self.has_achievements_disabled);
        w.write_var_int(self.time);
        w.write_f32le(self.rain_level);
        w.write_f32le(self.lightning_level);
        w.write_bool(self.commands_enabled);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlayerMovementSettings {
    pub movement_type: i32,
    /// Not on the wire below 1.16.210; decodes to 0 there.
    pub rewind_history_size: i32,
    pub server_authoritative_block_breaking: bool,
}

impl PlayerMovementSettings {
    pub fn read(r: &mut PacketReader<'_>) -> Result<Self> {
        let movement_type = r.read_var_int()?;
        let (rewind_history_size, server_authoritative_block_breaking) =
            if r.protocol_id() >= protocol::PROTOCOL_1_16_210 {
                (r.read_var_int()?, r.read_bool()?)
            } else {
                (0, false)
            };
        Ok(Self {
            movement_type,
            rewind_history_size,
            server_authoritative_block_breaking,
        })
    }

    pub fn write(&self, w: &mut PacketWriter) {
        w.write_var_int(self.movement_type);
        if w.protocol_id() >= protocol::PROTOCOL_1_16_210 {
            w.write_var_int(self.rewind_history_size);
            w.write_bool(self.server_authoritative_block_breaking);
        }
    }
}
