//! Machete attacks
//!
//! An attack is a single sweep: every active block touched by the hitbox is
//! destroyed at once.

use super::aabb::Rect;
use super::state::{AttackDirection, GameEvent, GamePhase, GameState, Player};

/// Hitbox for an attack in `direction` from the player's current pose
pub fn attack_box(player: &Player, direction: AttackDirection, range: f32) -> Rect {
    let (x, y) = (player.pos.x, player.pos.y);
    let (w, h) = (player.size.x, player.size.y);
    match direction {
        AttackDirection::Up => Rect::new(x, y - range, w, range),
        AttackDirection::Down => Rect::new(x, y + h, w, range),
        AttackDirection::Right => Rect::new(x + w, y, range, h),
        AttackDirection::Left => Rect::new(x - range, y, range, h),
    }
}

/// Hitbox for a direction given by name; unknown names swing at nothing
pub fn attack_box_named(player: &Player, direction: &str, range: f32) -> Rect {
    match AttackDirection::from_str(direction) {
        Some(dir) => attack_box(player, dir, range),
        None => {
            log::warn!("Unknown attack direction {:?}, ignoring swing", direction);
            Rect::ZERO
        }
    }
}

/// Destroy every active block overlapping `hitbox`.
///
/// Returns how many blocks this sweep destroyed. Completes the level when the
/// sweep removes the last surviving block.
pub fn sweep_attack(state: &mut GameState, hitbox: Rect) -> u32 {
    if hitbox.is_empty() || state.phase != GamePhase::Running {
        return 0;
    }

    let surviving_before = state.remaining_blocks();

    let mut destroyed = 0;
    for block in state.blocks.iter_mut().filter(|b| b.is_active()) {
        if hitbox.overlaps(&block.rect) && block.destroy() {
            destroyed += 1;
        }
    }

    if destroyed == 0 {
        return 0;
    }

    state.destroyed_blocks += destroyed;
    log::debug!(
        "Destroyed {} block(s): {}/{}",
        destroyed,
        state.destroyed_blocks,
        state.total_blocks
    );
    state.push_event(GameEvent::BlocksDestroyed {
        count: destroyed,
        destroyed: state.destroyed_blocks,
        total: state.total_blocks,
    });

    if surviving_before > 0 && state.destroyed_blocks >= state.total_blocks {
        state.phase = GamePhase::Complete;
        log::info!("Level complete in {:.1}s", state.elapsed);
        state.push_event(GameEvent::LevelComplete {
            elapsed: state.elapsed,
        });
    }

    destroyed
}

/// Swing in the player's current attack direction
pub fn attack(state: &mut GameState) -> u32 {
    let hitbox = attack_box(
        &state.player,
        state.player.attack_direction,
        state.tuning.attack_range,
    );
    sweep_attack(state, hitbox)
}
