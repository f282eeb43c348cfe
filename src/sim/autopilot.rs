//! Idle/demo mode: the game plays itself
//!
//! Produces the same intents a player would, so everything it does goes
//! through the normal tick path.

use super::combat::attack_box;
use super::state::{AttackDirection, Block, GameState};
use super::tick::TickInput;

/// Horizontal distance under which the autopilot stops walking
const ARRIVE_EPSILON: f32 = 4.0;

/// Pick intents for the next tick
pub fn steer(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    let player = &state.player;

    // Swing at anything already in reach
    if !player.is_attacking {
        let range = state.tuning.attack_range;
        let in_reach = [
            AttackDirection::Right,
            AttackDirection::Left,
            AttackDirection::Down,
            AttackDirection::Up,
        ]
        .into_iter()
        .find(|&dir| {
            let hitbox = attack_box(player, dir, range);
            state.active_blocks().any(|b| hitbox.overlaps(&b.rect))
        });

        if let Some(dir) = in_reach {
            match dir {
                AttackDirection::Right => input.right = true,
                AttackDirection::Left => input.left = true,
                AttackDirection::Up => input.aim_up = true,
                AttackDirection::Down => input.aim_down = true,
            }
            input.attack = true;
            return input;
        }
    }

    let Some(target) = nearest_block(state) else {
        return input;
    };

    let player_center = player.rect().center();
    let target_center = target.rect.center();
    let dx = target_center.x - player_center.x;

    if dx > ARRIVE_EPSILON {
        input.right = true;
    } else if dx < -ARRIVE_EPSILON {
        input.left = true;
    }

    // Target sits above us: hop and aim up
    if target.rect.bottom() <= player.pos.y && dx.abs() < player.size.x * 2.0 {
        input.jump = !player.is_jumping;
        input.aim_up = true;
    }

    input
}

/// Closest surviving block by center distance, first in order on ties
fn nearest_block(state: &GameState) -> Option<&Block> {
    let from = state.player.rect().center();
    state.active_blocks().min_by(|a, b| {
        let da = a.rect.center().distance_squared(from);
        let db = b.rect.center().distance_squared(from);
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    })
}
