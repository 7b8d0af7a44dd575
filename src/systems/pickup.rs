//! Heart collection and portal detection.
//!
//! Hearts are consumed when the player's center comes within most of a tile
//! of the heart's center; consumed tile coordinates go into the collected
//! set, which is what makes each heart a single award. The portal check
//! scans the 3x3 tiles around the player's center.

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

use crate::components::mapposition::MapPosition;
use crate::components::player::{PLAYER_H, PLAYER_W, Player};
use crate::events::level::PortalReachedEvent;
use crate::events::pickup::HeartCollectedEvent;
use crate::resources::level::{ActiveLevel, CollectedHearts, TILE_SIZE, Tile};

/// Pickup radius as a fraction of tile size.
const HEART_RADIUS: f32 = 0.9;

pub fn heart_collection(
    mut commands: Commands,
    level: Option<Res<ActiveLevel>>,
    mut collected: ResMut<CollectedHearts>,
    mut query: Query<(&MapPosition, &mut Player)>,
) {
    let Some(level) = level else { return };
    let Some((pos, mut player)) = query.iter_mut().next() else {
        return;
    };
    let center = Player::center(pos.pos);

    let col_min = (pos.pos.x / TILE_SIZE).floor() as i32 - 1;
    let col_max = ((pos.pos.x + PLAYER_W) / TILE_SIZE).floor() as i32 + 1;
    let row_min = (pos.pos.y / TILE_SIZE).floor() as i32 - 1;
    let row_max = ((pos.pos.y + PLAYER_H) / TILE_SIZE).floor() as i32 + 1;

    for row in row_min..=row_max {
        for col in col_min..=col_max {
            if level.tilemap.tile_at(col, row) != Tile::Heart || collected.contains(col, row) {
                continue;
            }

            let heart = Vector2 {
                x: col as f32 * TILE_SIZE + TILE_SIZE / 2.0,
                y: row as f32 * TILE_SIZE + TILE_SIZE / 2.0,
            };
            let dx = center.x - heart.x;
            let dy = center.y - heart.y;
            if (dx * dx + dy * dy).sqrt() < TILE_SIZE * HEART_RADIUS {
                collected.collect(col, row);
                player.hearts_collected += 1;
                commands.trigger(HeartCollectedEvent { pos: heart });
            }
        }
    }
}

pub fn portal_check(
    mut commands: Commands,
    level: Option<Res<ActiveLevel>>,
    query: Query<&MapPosition, With<Player>>,
) {
    let Some(level) = level else { return };
    let Some(pos) = query.iter().next() else { return };

    let center = Player::center(pos.pos);
    let col = (center.x / TILE_SIZE).floor() as i32;
    let row = (center.y / TILE_SIZE).floor() as i32;

    for dr in -1..=1 {
        for dc in -1..=1 {
            if level.tilemap.tile_at(col + dc, row + dr) == Tile::Portal {
                commands.trigger(PortalReachedEvent { pos: pos.pos });
                return;
            }
        }
    }
}
