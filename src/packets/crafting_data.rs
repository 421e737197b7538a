// Crafting data: the recipe book. Each entry leads with a recipe type id
// that selects the payload shape; the potion and material-reducer tables
// that trail it in vanilla are game catalogue and stay out of the codec.

use crate::error::Result;
use crate::packet::{Packet, PacketBound, PacketHandler};
use crate::serializer::{PacketReader, PacketWriter};
use crate::types::recipe::Recipe;

#[derive(Debug, Clone, PartialEq)]
pub struct CraftingDataPacket {
    pub recipes: Vec<Recipe>,
    pub clean_recipes: bool,
}

impl Packet for CraftingDataPacket {
    const NETWORK_ID: u32 = 0x34;
    const BOUND: PacketBound = PacketBound::Client;

    fn decode(r: &mut PacketReader<'_>) -> Result<Self> {
        let mut recipes = Vec::new();
        for _ in 0..r.read_unsigned_var_int()? {
            let type_id = r.read_var_int()?;
            recipes.push(Recipe::read(type_id, r)?);
        }
        let clean_recipes = r.read_bool()?;
        Ok(Self {
            recipes,
            clean_recipes,
        })
    }

    fn encode(&self, w: &mut PacketWriter) -> Result<()> {
        w.write_unsigned_var_int(self.recipes.len() as u32);
        for recipe in &self.recipes {
            w.write_var_int(recipe.type_id());
            recipe.write(w)?;
        }
        w.write_bool(self.clean_recipes);
        Ok(())
    }

    fn dispatch(&self, handler: &mut dyn PacketHandler) -> bool {
        handler.handle_crafting_data(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol;
    use crate::types::item_stack::{ItemStack, ItemStackData, RecipeIngredient};
    use crate::types::recipe::{FurnaceRecipe, MultiRecipe, ShapelessRecipe};
    use uuid::Uuid;

    fn sample_packet() -> CraftingDataPacket {
        CraftingDataPacket {
            recipes: vec![
                Recipe::Shapeless(ShapelessRecipe {
                    recipe_id: "minecraft:torch".into(),
                    inputs: vec![
                        RecipeIngredient::Item {
                            id: 263,
                            meta: 0,
                            count: 1,
                        },
                        RecipeIngredient::Item {
                            id: 280,
                            meta: 0,
                            count: 1,
                        },
                    ],
                    outputs: vec![ItemStack::Item(ItemStackData {
                        id: 50,
                        count: 4,
                        aux_value: 0,
                        stack_id: 0,
                        user_data: None,
                    })],
                    uuid: Uuid::from_u128(1),
                    block_name: "crafting_table".into(),
                    priority: 0,
                    net_id: 1,
                }),
                Recipe::Furnace(FurnaceRecipe {
                    input_id: 15,
                    input_meta: None,
                    output: ItemStack::Item(ItemStackData {
                        id: 265,
                        count: 1,
                        aux_value: 0,
                        stack_id: 0,
                        user_data: None,
                    }),
                    block_name: "furnace".into(),
                }),
                Recipe::Multi(MultiRecipe {
                    uuid: Uuid::from_u128(2),
                    net_id: 3,
                }),
            ],
            clean_recipes: true,
        }
    }

    #[test]
    fn test_roundtrip_mixed_recipe_kinds() {
        let packet = sample_packet();
        let mut w = PacketWriter::new(protocol::CURRENT);
        packet.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = PacketReader::new(&bytes, protocol::CURRENT);
        let decoded = CraftingDataPacket::decode(&mut r).unwrap();
        assert_eq!(r.remaining(), 0);
        assert_eq!(decoded, packet);
    }

    #[test]
    fn test_unknown_recipe_type_fails() {
        let mut w = PacketWriter::new(protocol::CURRENT);
        w.write_unsigned_var_int(1);
        w.write_var_int(250); // not a recipe type
        let bytes = w.into_bytes();
        let mut r = PacketReader::new(&bytes, protocol::CURRENT);
        assert!(CraftingDataPacket::decode(&mut r).is_err());
    }
}
