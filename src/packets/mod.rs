// Representative packet set. The full catalogue runs to hundreds of types
// that all follow this pattern; these four cover every codec feature.

mod crafting_data;
mod item_stack_response;
mod set_actor_data;
mod start_game;

pub use crafting_data::CraftingDataPacket;
pub use item_stack_response::ItemStackResponsePacket;
pub use set_actor_data::SetActorDataPacket;
pub use start_game::{ItemTypeEntry, StartGamePacket};
