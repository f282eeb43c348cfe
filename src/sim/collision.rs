//! Collision detection and response for the player AABB
//!
//! Resolution picks the side with the smallest penetration and pushes the
//! player out along it. Blocks are resolved one after another in collection
//! order, so at tight junctions a later block can undo part of an earlier
//! push within the same tick.

use super::aabb::Rect;
use super::state::GameState;

/// Overlap depth along each side of a block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// Player's right edge past the block's left edge
    pub left: f32,
    /// Block's right edge past the player's left edge
    pub right: f32,
    /// Player's bottom past the block's top
    pub top: f32,
    /// Block's bottom past the player's top
    pub bottom: f32,
}

impl Penetration {
    pub fn between(player: &Rect, block: &Rect) -> Self {
        Self {
            left: player.right() - block.left(),
            right: block.right() - player.left(),
            top: player.bottom() - block.top(),
            bottom: block.bottom() - player.top(),
        }
    }

    pub fn min(&self) -> f32 {
        self.left.min(self.right).min(self.top).min(self.bottom)
    }
}

/// Resolve player overlap against the floor and every active block
pub fn resolve_collisions(state: &mut GameState) {
    // Airborne until something below proves otherwise
    state.player.is_jumping = true;

    resolve_floor(state);

    let player = &mut state.player;
    for block in state.blocks.iter().filter(|b| b.is_active()) {
        let block = block.rect;
        let player_rect = player.rect();
        if !player_rect.overlaps(&block) {
            continue;
        }

        let pen = Penetration::between(&player_rect, &block);
        let min = pen.min();

        // Check order matters on exact ties: top, bottom, left, right
        if min == pen.top && player.vel.y > 0.0 {
            player.pos.y = block.top() - player.size.y;
            player.vel.y = 0.0;
            player.is_jumping = false;
        } else if min == pen.bottom && player.vel.y < 0.0 {
            player.pos.y = block.bottom();
            player.vel.y = 0.0;
        } else if min == pen.left {
            player.pos.x = block.left() - player.size.x;
        } else if min == pen.right {
            player.pos.x = block.right();
        }
    }
}

fn resolve_floor(state: &mut GameState) {
    let floor_y = state.floor_y();
    let player = &mut state.player;
    if player.pos.y > floor_y {
        player.pos.y = floor_y;
        player.vel.y = 0.0;
        player.is_jumping = false;
    }
}
