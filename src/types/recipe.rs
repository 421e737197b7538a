// Recipe variants.
//
// The type discriminator is not self-describing: the enclosing crafting-data
// list reads it and hands it to `Recipe::read`. The variant set is closed;
// an id outside it is a fatal decode error. The recipe network id only
// exists on the wire from 1.16.0 and defaults to 0 below, so the in-memory
// value always carries it.

use uuid::Uuid;

use crate::error::{ProtocolError, Result};
use crate::protocol;
use crate::serializer::{PacketReader, PacketWriter};
use crate::types::item_stack::{ItemStack, RecipeIngredient};

pub const RECIPE_TYPE_SHAPELESS: i32 = 0;
pub const RECIPE_TYPE_SHAPED: i32 = 1;
pub const RECIPE_TYPE_FURNACE: i32 = 2;
pub const RECIPE_TYPE_FURNACE_DATA: i32 = 3;
pub const RECIPE_TYPE_MULTI: i32 = 4;

#[derive(Debug, Clone, PartialEq)]
pub enum Recipe {
    Shapeless(ShapelessRecipe),
    Shaped(ShapedRecipe),
    Furnace(FurnaceRecipe),
    Multi(MultiRecipe),
}

impl Recipe {
    pub fn type_id(&self) -> i32 {
        match self {
            Recipe::Shapeless(_) => RECIPE_TYPE_SHAPELESS,
            Recipe::Shaped(_) => RECIPE_TYPE_SHAPED,
            Recipe::Furnace(recipe) => {
                if recipe.input_meta.is_some() {
                    RECIPE_TYPE_FURNACE_DATA
                } else {
                    RECIPE_TYPE_FURNACE
                }
            }
            Recipe::Multi(_) => RECIPE_TYPE_MULTI,
        }
    }

    /// `type_id` comes from the enclosing list entry, already consumed by
    /// the caller.
    pub fn read(type_id: i32, r: &mut PacketReader<'_>) -> Result<Self> {
        match type_id {
            RECIPE_TYPE_SHAPELESS => Ok(Recipe::Shapeless(ShapelessRecipe::read(r)?)),
            RECIPE_TYPE_SHAPED => Ok(Recipe::Shaped(ShapedRecipe::read(r)?)),
            RECIPE_TYPE_FURNACE | RECIPE_TYPE_FURNACE_DATA => {
                Ok(Recipe::Furnace(FurnaceRecipe::read(type_id, r)?))
            }
            RECIPE_TYPE_MULTI => Ok(Recipe::Multi(MultiRecipe::read(r)?)),
            other => Err(ProtocolError::BadDiscriminator {
                what: "recipe type",
                value: other as i64,
            }),
        }
    }

    /// Writes the payload only; the caller writes the type id ahead of it.
    pub fn write(&self, w: &mut PacketWriter) -> Result<()> {
        match self {
            Recipe::Shapeless(recipe) => recipe.write(w),
            Recipe::Shaped(recipe) => recipe.write(w),
            Recipe::Furnace(recipe) => recipe.write(w),
            Recipe::Multi(recipe) => {
                recipe.write(w);
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapelessRecipe {
    pub recipe_id: String,
    pub inputs: Vec<RecipeIngredient>,
    pub outputs: Vec<ItemStack>,
    pub uuid: Uuid,
    pub block_name: String,
    pub priority: i32,
    pub net_id: i32,
}

impl ShapelessRecipe {
    pub fn read(r: &mut PacketReader<'_>) -> Result<Self> {
        let recipe_id = r.read_string()?;
        let mut inputs = Vec::new();
        for _ in 0..r.read_unsigned_var_int()? {
            inputs.push(r.read_recipe_ingredient()?);
        }
        let mut outputs = Vec::new();
        for _ in 0..r.read_unsigned_var_int()? {
            outputs.push(r.read_item_stack_without_stack_id()?);
        }
        let uuid = r.read_uuid()?;
        let block_name = r.read_string()?;
        let priority = r.read_var_int()?;
        let net_id = if r.protocol_id() >= protocol::PROTOCOL_1_16_0 {
            r.read_generic_type_network_id()?
        } else {
            0
        };
        Ok(Self {
            recipe_id,
            inputs,
            outputs,
            uuid,
            block_name,
            priority,
            net_id,
        })
    }

    pub fn write(&self, w: &mut PacketWriter) -> Result<()> {
        w.write_string(&self.recipe_id);
        w.write_unsigned_var_int(self.inputs.len() as u32);
        for input in &self.inputs {
            w.write_recipe_ingredient(input);
        }
        w.write_unsigned_var_int(self.outputs.len() as u32);
        for output in &self.outputs {
            w.write_item_stack_without_stack_id(output)?;
        }
        w.write_uuid(self.uuid);
        w.write_string(&self.block_name);
        w.write_var_int(self.priority);
        if w.protocol_id() >= protocol::PROTOCOL_1_16_0 {
            w.write_generic_type_network_id(self.net_id);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapedRecipe {
    pub recipe_id: String,
    pub width: i32,
    pub height: i32,
    /// Row-major, exactly `width * height` entries.
    pub inputs: Vec<RecipeIngredient>,
    pub outputs: Vec<ItemStack>,
    pub uuid: Uuid,
    pub block_name: String,
    pub priority: i32,
    pub net_id: i32,
}

impl ShapedRecipe {
    pub fn read(r: &mut PacketReader<'_>) -> Result<Self> {
        let recipe_id = r.read_string()?;
        let width = r.read_var_int()?;
        let height = r.read_var_int()?;
        if width < 0 || height < 0 {
            return Err(ProtocolError::NegativeLength {
                len: (width as i64).min(height as i64),
                context: "shaped recipe grid",
            });
        }
        let mut inputs = Vec::new();
        for _ in 0..(width as i64) * (height as i64) {
            inputs.push(r.read_recipe_ingredient()?);
        }
        let mut outputs = Vec::new();
        for _ in 0..r.read_unsigned_var_int()? {
            outputs.push(r.read_item_stack_without_stack_id()?);
        }
        let uuid = r.read_uuid()?;
        let block_name = r.read_string()?;
        let priority = r.read_var_int()?;
        let net_id = if r.protocol_id() >= protocol::PROTOCOL_1_16_0 {
            r.read_generic_type_network_id()?
        } else {
            0
        };
        Ok(Self {
            recipe_id,
            width,
            height,
            inputs,
            outputs,
            uuid,
            block_name,
            priority,
            net_id,
        })
    }

    pub fn write(&self, w: &mut PacketWriter) -> Result<()> {
        if self.inputs.len() as i64 != (self.width as i64) * (self.height as i64) {
            return Err(ProtocolError::Malformed(format!(
                "shaped recipe grid holds {} ingredients for a {}x{} shape",
                self.inputs.len(),
                self.width,
                self.height
            )));
        }
        w.write_string(&self.recipe_id);
        w.write_var_int(self.width);
        w.write_var_int(self.height);
        for input in &self.inputs {
            w.write_recipe_ingredient(input);
        }
        w.write_unsigned_var_int(self.outputs.len() as u32);
        for output in &self.outputs {
            w.write_item_stack_without_stack_id(output)?;
        }
        w.write_uuid(self.uuid);
        w.write_string(&self.block_name);
        w.write_var_int(self.priority);
        if w.protocol_id() >= protocol::PROTOCOL_1_16_0 {
            w.write_generic_type_network_id(self.net_id);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FurnaceRecipe {
    pub input_id: i32,
    /// `Some` only for the with-metadata variant; selects the type id.
    pub input_meta: Option<i32>,
    pub output: ItemStack,
    pub block_name: String,
}

impl FurnaceRecipe {
    pub fn read(type_id: i32, r: &mut PacketReader<'_>) -> Result<Self> {
        let input_id = r.read_var_int()?;
        let input_meta = if type_id == RECIPE_TYPE_FURNACE_DATA {
            Some(r.read_var_int()?)
        } else {
            None
        };
        Ok(Self {
            input_id,
            input_meta,
            output: r.read_item_stack_without_stack_id()?,
            block_name: r.read_string()?,
        })
    }

    pub fn write(&self, w: &mut PacketWriter) -> Result<()> {
        w.write_var_int(self.input_id);
        if let Some(meta) = self.input_meta {
            w.write_var_int(meta);
        }
        w.write_item_stack_without_stack_id(&self.output)?;
        w.write_string(&self.block_name);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiRecipe {
    pub uuid: Uuid,
    pub net_id: i32,
}

impl MultiRecipe {
    pub fn read(r: &mut PacketReader<'_>) -> Result<Self> {
        let uuid = r.read_uuid()?;
        let net_id = if r.protocol_id() >= protocol::PROTOCOL_1_16_0 {
            r.read_generic_type_network_id()?
        } else {
            0
        };
        Ok(Self { uuid, net_id })
    }

    pub fn write(&self, w: &mut PacketWriter) {
        w.write_uuid(self.uuid);
        if w.protocol_id() >= protocol::PROTOCOL_1_16_0 {
            w.write_generic_type_network_id(self.net_id);
        }
    }
}
