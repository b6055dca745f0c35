//! Tag and group names used by gameplay rules.

use kestrel_ecs::{Entity, Registry};

pub const TAG_PLAYER: &str = "player";

pub const GROUP_ENEMIES: &str = "enemies";
pub const GROUP_OBSTACLES: &str = "obstacles";
pub const GROUP_PROJECTILES: &str = "projectiles";

/// Returns `true` if `entity` is in `group`.
///
/// A group no entity has joined yet simply has no members here.
#[must_use]
pub fn in_group(registry: &Registry, entity: Entity, group: &str) -> bool {
    matches!(registry.entity_belongs_to_group(entity, group), Ok(true))
}

/// Returns `true` if `entity` is the player.
#[must_use]
pub fn is_player(registry: &Registry, entity: Entity) -> bool {
    registry.entity_has_tag(entity, TAG_PLAYER)
}
