//! Per-frame simulation tick
//!
//! Order inside a tick: attack countdown, intents and kinematics (an attack
//! trigger sweeps immediately), collision resolution, then the level timer.
//! Movement is integrated per tick without `dt` scaling; `dt` only feeds the
//! wall-clock timers.

use super::collision::resolve_collisions;
use super::combat;
use super::state::{AttackDirection, GameEvent, GamePhase, GameState, Player, Tuning};

/// Input intents for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Aim the next attack upward (no movement)
    pub aim_up: bool,
    /// Aim the next attack downward (no movement)
    pub aim_down: bool,
    pub jump: bool,
    pub attack: bool,
    /// Aim along the facing direction unless another aim is held
    pub aim_facing: bool,
}

impl TickInput {
    /// Vertical aim if any, up before down
    fn vertical_aim(&self) -> Option<AttackDirection> {
        if self.aim_up {
            Some(AttackDirection::Up)
        } else if self.aim_down {
            Some(AttackDirection::Down)
        } else {
            None
        }
    }
}

/// Advance the level by one tick. `dt` is the host frame spacing in seconds.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // A completed level is frozen
    if state.phase == GamePhase::Complete {
        return;
    }

    state.time_ticks += 1;

    update_attack_timer(&mut state.player, dt * 1000.0);
    update_player(state, input);
    resolve_collisions(state);

    if state.phase == GamePhase::Running {
        state.elapsed += dt;
    }
}

/// Count the attack window down and end it exactly once
fn update_attack_timer(player: &mut Player, elapsed_ms: f32) {
    if !player.is_attacking {
        return;
    }
    player.attack_timer_ms -= elapsed_ms;
    if player.attack_timer_ms <= 0.0 {
        player.cancel_attack();
    }
}

fn update_player(state: &mut GameState, input: &TickInput) {
    let tuning = state.tuning;

    apply_intents(&mut state.player, input, &tuning);

    if input.jump && !state.player.is_jumping {
        state.player.vel.y = tuning.jump_force;
        state.player.is_jumping = true;
        state.push_event(GameEvent::Jumped);
    }

    if input.attack && !state.player.is_attacking {
        state.player.is_attacking = true;
        state.player.attack_timer_ms = tuning.attack_duration_ms;
        state.push_event(GameEvent::AttackStarted {
            direction: state.player.attack_direction,
        });
        combat::attack(state);
    }

    integrate(&mut state.player, &tuning, state.world.x);
}

/// Horizontal velocity, facing and attack aim from this tick's intents
pub fn apply_intents(player: &mut Player, input: &TickInput, tuning: &Tuning) {
    if input.left {
        player.vel.x = -tuning.move_speed;
        player.facing_right = false;
        player.attack_direction = input.vertical_aim().unwrap_or(AttackDirection::Left);
    } else if input.right {
        player.vel.x = tuning.move_speed;
        player.facing_right = true;
        player.attack_direction = input.vertical_aim().unwrap_or(AttackDirection::Right);
    } else {
        player.vel.x = 0.0;
        if let Some(dir) = input.vertical_aim() {
            player.attack_direction = dir;
        } else if input.aim_facing {
            player.attack_direction = AttackDirection::facing(player.facing_right);
        }
    }
}

/// Gravity, Euler step and horizontal world clamp
pub fn integrate(player: &mut Player, tuning: &Tuning, world_width: f32) {
    player.vel.y += tuning.gravity;
    player.pos += player.vel;

    if player.pos.x < 0.0 {
        player.pos.x = 0.0;
    }
    if player.pos.x + player.size.x > world_width {
        player.pos.x = world_width - player.size.x;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::aabb::Rect;
    use crate::sim::state::Block;
    use glam::Vec2;
    use proptest::prelude::*;

    fn empty_state() -> GameState {
        GameState::with_blocks(Vec::new())
    }

    fn grounded_state() -> GameState {
        let mut state = empty_state();
        state.player.pos.y = state.floor_y();
        tick(&mut state, &TickInput::default(), NOMINAL_DT);
        assert!(!state.player.is_jumping);
        state
    }

    #[test]
    fn test_gravity_from_spawn() {
        let mut state = empty_state();
        tick(&mut state, &TickInput::default(), NOMINAL_DT);
        assert_eq!(state.player.vel.y, GRAVITY);
        assert_eq!(state.player.pos, Vec2::new(SPAWN_X, GRAVITY));
        assert!(state.player.is_jumping);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_velocity_snaps() {
        let mut state = empty_state();
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &right, NOMINAL_DT);
        assert_eq!(state.player.vel.x, MOVE_SPEED);
        assert_eq!(state.player.pos.x, SPAWN_X + MOVE_SPEED);

        tick(&mut state, &TickInput::default(), NOMINAL_DT);
        assert_eq!(state.player.vel.x, 0.0);
        assert_eq!(state.player.pos.x, SPAWN_X + MOVE_SPEED);
    }

    #[test]
    fn test_left_wins_over_right() {
        let mut state = empty_state();
        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        tick(&mut state, &both, NOMINAL_DT);
        assert_eq!(state.player.vel.x, -MOVE_SPEED);
        assert!(!state.player.facing_right);
        assert_eq!(state.player.attack_direction, AttackDirection::Left);
    }

    #[test]
    fn test_attack_direction_priority() {
        let tuning = Tuning::default();
        let mut player = Player::default();

        // Horizontal + vertical: vertical wins, facing still follows movement
        let input = TickInput {
            left: true,
            aim_down: true,
            ..Default::default()
        };
        apply_intents(&mut player, &input, &tuning);
        assert_eq!(player.attack_direction, AttackDirection::Down);
        assert!(!player.facing_right);

        let input = TickInput {
            right: true,
            aim_up: true,
            aim_down: true,
            ..Default::default()
        };
        apply_intents(&mut player, &input, &tuning);
        assert_eq!(player.attack_direction, AttackDirection::Up);
        assert!(player.facing_right);

        // Standalone vertical aim leaves facing alone
        let input = TickInput {
            aim_down: true,
            ..Default::default()
        };
        apply_intents(&mut player, &input, &tuning);
        assert_eq!(player.attack_direction, AttackDirection::Down);
        assert!(player.facing_right);
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_attack_direction_is_sticky() {
        let tuning = Tuning::default();
        let mut player = Player::default();
        let input = TickInput {
            aim_up: true,
            ..Default::default()
        };
        apply_intents(&mut player, &input, &tuning);
        apply_intents(&mut player, &TickInput::default(), &tuning);
        let jump_only = TickInput {
            jump: true,
            attack: true,
            ..Default::default()
        };
        apply_intents(&mut player, &jump_only, &tuning);
        assert_eq!(player.attack_direction, AttackDirection::Up);
    }

    #[test]
    fn test_aim_facing() {
        let tuning = Tuning::default();
        let mut player = Player::default();
        player.facing_right = false;
        player.attack_direction = AttackDirection::Up;
        let input = TickInput {
            aim_facing: true,
            ..Default::default()
        };
        apply_intents(&mut player, &input, &tuning);
        assert_eq!(player.attack_direction, AttackDirection::Left);

        // Explicit vertical aim beats facing
        let input = TickInput {
            aim_facing: true,
            aim_down: true,
            ..Default::default()
        };
        apply_intents(&mut player, &input, &tuning);
        assert_eq!(player.attack_direction, AttackDirection::Down);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let mut state = grounded_state();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, NOMINAL_DT);
        assert_eq!(state.player.vel.y, JUMP_FORCE + GRAVITY);
        assert!(state.player.is_jumping);
        assert_eq!(state.drain_events(), vec![GameEvent::Jumped]);

        // Holding jump in the air does nothing
        let vel_before = state.player.vel.y;
        tick(&mut state, &jump, NOMINAL_DT);
        assert_eq!(state.player.vel.y, vel_before + GRAVITY);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_jump_rearms_after_landing() {
        let mut state = grounded_state();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        let mut jumps = 0;
        for _ in 0..200 {
            tick(&mut state, &jump, NOMINAL_DT);
            jumps += state
                .drain_events()
                .iter()
                .filter(|e| **e == GameEvent::Jumped)
                .count();
        }
        // A full jump arc is 64 ticks at these constants
        assert!(jumps >= 3, "jumped {} times", jumps);
    }

    #[test]
    fn test_attack_fires_once_per_window() {
        let mut state = GameState::with_blocks(vec![
            Block::new(Rect::new(500.0, 0.0, 20.0, 20.0)),
        ]);
        let attack = TickInput {
            attack: true,
            ..Default::default()
        };

        tick(&mut state, &attack, NOMINAL_DT);
        assert!(state.player.is_attacking);
        let started = |events: &[GameEvent]| {
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::AttackStarted { .. }))
                .count()
        };
        assert_eq!(started(&state.drain_events()), 1);

        // 256ms at 60Hz: the window spans 15 more ticks
        for _ in 0..15 {
            tick(&mut state, &attack, NOMINAL_DT);
            assert!(state.player.is_attacking);
            assert_eq!(started(&state.drain_events()), 0);
        }

        // Window ends at the start of the next tick, held attack retriggers
        tick(&mut state, &attack, NOMINAL_DT);
        assert!(state.player.is_attacking);
        assert_eq!(started(&state.drain_events()), 1);
    }

    #[test]
    fn test_attack_window_follows_wall_clock() {
        let mut state = empty_state();
        let attack = TickInput {
            attack: true,
            ..Default::default()
        };
        let dt = 1.0 / 30.0;
        tick(&mut state, &attack, dt);
        for _ in 0..7 {
            tick(&mut state, &TickInput::default(), dt);
            assert!(state.player.is_attacking);
        }
        tick(&mut state, &TickInput::default(), dt);
        assert!(!state.player.is_attacking);
        assert_eq!(state.player.attack_timer_ms, 0.0);
    }

    #[test]
    fn test_attack_destroys_before_moving() {
        // Block right next to the spawn point; the swing happens from the
        // pre-integration position
        let mut state = GameState::with_blocks(vec![
            Block::new(Rect::new(85.0, 10.0, 20.0, 20.0)),
            Block::new(Rect::new(900.0, 500.0, 20.0, 20.0)),
        ]);
        let attack = TickInput {
            attack: true,
            ..Default::default()
        };
        tick(&mut state, &attack, NOMINAL_DT);
        assert!(state.blocks[0].destroyed);
        assert_eq!(state.destroyed_blocks, 1);
    }

    #[test]
    fn test_complete_level_freezes() {
        let mut state = GameState::with_blocks(vec![Block::new(Rect::new(85.0, 10.0, 20.0, 20.0))]);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), NOMINAL_DT);
        }
        let attack = TickInput {
            attack: true,
            ..Default::default()
        };
        tick(&mut state, &attack, NOMINAL_DT);
        assert_eq!(state.phase, GamePhase::Complete);

        let elapsed = state.elapsed;
        let pos = state.player.pos;
        let ticks = state.time_ticks;
        for _ in 0..5 {
            tick(&mut state, &TickInput::default(), NOMINAL_DT);
        }
        assert_eq!(state.elapsed, elapsed);
        assert_eq!(state.player.pos, pos);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_elapsed_accumulates() {
        let mut state = empty_state();
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), NOMINAL_DT);
        }
        assert!((state.elapsed - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_clamp_at_world_edges() {
        let mut state = empty_state();
        state.player.pos.x = 3.0;
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut state, &left, NOMINAL_DT);
        assert_eq!(state.player.pos.x, 0.0);

        state.player.pos.x = WORLD_WIDTH - PLAYER_WIDTH - 2.0;
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &right, NOMINAL_DT);
        assert_eq!(state.player.pos.x, WORLD_WIDTH - PLAYER_WIDTH);
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(left, right, aim_up, aim_down, jump, attack)| TickInput {
                left,
                right,
                aim_up,
                aim_down,
                jump,
                attack,
                aim_facing: false,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_player_stays_inside_world(
            start_x in -200.0f32..1400.0,
            inputs in prop::collection::vec(arb_input(), 1..120),
        ) {
            let mut state = empty_state();
            state.player.pos.x = start_x;
            for input in &inputs {
                tick(&mut state, input, NOMINAL_DT);
                let x = state.player.pos.x;
                prop_assert!(x >= 0.0);
                prop_assert!(x <= state.world.x - state.player.size.x);
                prop_assert!(state.player.pos.y <= state.floor_y());
            }
        }
    }
}
