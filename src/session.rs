//! Level/session state machine
//!
//! ```text
//! Loading --load ok--> Running --last block--> Complete
//!    ^                   |  ^                     |
//!    |                   |  +------ reset --------+
//!    +---- load ---------+
//! ```
//!
//! The session owns the pristine [`Level`] so a reset can rebuild the blocks,
//! and the best-time record that outlives every level.

use crate::level::{Level, LevelError, LevelSource};
use crate::persistence::{BestTimeStore, load_or_default};
use crate::platform::{Frame, Hud, InputSource, RenderSink};
use crate::records::BestTime;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, tick};

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No playable geometry yet, or a load is in progress
    Loading,
    Running,
    /// Level finished; ticks do nothing until reset or a new load
    Complete,
}

/// What a session tick produced
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Gameplay event from the simulation
    Game(GameEvent),
    /// The level was completed
    LevelComplete { elapsed: f32, new_best: bool },
}

pub struct Session {
    settings: Settings,
    phase: SessionPhase,
    level: Option<Level>,
    game: Option<GameState>,
    best: BestTime,
    store: Box<dyn BestTimeStore>,
}

impl Session {
    pub fn new(settings: Settings, store: Box<dyn BestTimeStore>) -> Self {
        let best = load_or_default(&*store);
        Self {
            settings,
            phase: SessionPhase::Loading,
            level: None,
            game: None,
            best,
            store,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn best(&self) -> BestTime {
        self.best
    }

    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    pub fn level_name(&self) -> Option<&str> {
        self.level.as_ref().map(|l| l.name.as_str())
    }

    /// Geometry is installed, so start/reset can do something
    pub fn can_start(&self) -> bool {
        self.level.is_some()
    }

    /// Load a new level and start it.
    ///
    /// The current level stops ticking while loading. If the load fails the
    /// previous level (if any) is left exactly as it was.
    pub fn load(&mut self, source: &dyn LevelSource) -> Result<(), LevelError> {
        let previous = self.phase;
        self.phase = SessionPhase::Loading;
        log::info!("Loading level {}", source.name());

        match Level::load(source, self.settings.world()) {
            Ok(level) => {
                self.level = Some(level);
                self.start();
                Ok(())
            }
            Err(e) => {
                log::error!("Error loading level {}: {}", source.name(), e);
                if self.game.is_some() {
                    self.phase = previous;
                }
                Err(e)
            }
        }
    }

    /// Begin the installed level from scratch: fresh blocks, spawn, timer 0
    pub fn start(&mut self) -> bool {
        let Some(level) = &self.level else {
            log::warn!("No level loaded yet, cannot start");
            return false;
        };

        self.game = Some(GameState::new(
            self.settings.world(),
            self.settings.spawn(),
            self.settings.player_size(),
            self.settings.tuning,
            level.blocks.clone(),
        ));
        self.phase = SessionPhase::Running;
        log::info!("Started {} ({} blocks)", level.name, level.block_count());
        true
    }

    /// Drop progress and any in-flight attack, rebuild the level, run again
    pub fn reset(&mut self) -> bool {
        if let Some(game) = &mut self.game {
            game.player.cancel_attack();
        }
        log::debug!("Resetting level");
        self.start()
    }

    /// Advance one host frame
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> Vec<SessionEvent> {
        if self.phase != SessionPhase::Running {
            return Vec::new();
        }
        let Some(game) = &mut self.game else {
            return Vec::new();
        };

        tick(game, input, dt);

        let mut events = Vec::new();
        for event in game.drain_events() {
            match event {
                GameEvent::LevelComplete { elapsed } => {
                    let new_best = self.complete(elapsed);
                    events.push(SessionEvent::LevelComplete { elapsed, new_best });
                }
                other => events.push(SessionEvent::Game(other)),
            }
        }
        events
    }

    /// Freeze the session and update the record. Returns true on a new best.
    fn complete(&mut self, elapsed: f32) -> bool {
        self.phase = SessionPhase::Complete;

        if !self.best.submit(elapsed) {
            return false;
        }

        log::info!("New best time: {:.1}s", elapsed);
        if let Err(e) = self.store.save(&self.best) {
            log::warn!("Failed to save best time: {}", e);
        }
        true
    }

    /// Snapshot for drawing
    pub fn frame(&self) -> Option<Frame<'_>> {
        let game = self.game.as_ref()?;
        Some(Frame {
            player: &game.player,
            blocks: &game.blocks,
            hud: Hud::new(
                self.level_name().unwrap_or_default(),
                game.destroyed_blocks,
                game.total_blocks,
                game.elapsed,
                self.best,
            ),
        })
    }

    /// One host frame: poll input, tick, draw, signal completion
    pub fn run_frame(
        &mut self,
        input: &mut dyn InputSource,
        sink: &mut dyn RenderSink,
        dt: f32,
    ) -> Vec<SessionEvent> {
        let intents = match &self.game {
            Some(game) if self.phase == SessionPhase::Running => input.poll(game),
            _ => TickInput::default(),
        };

        let events = self.tick(&intents, dt);

        if let Some(frame) = self.frame() {
            sink.present(&frame);
        }
        for event in &events {
            if let SessionEvent::LevelComplete { elapsed, new_best } = *event {
                sink.level_complete(elapsed, new_best);
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::NOMINAL_DT;
    use crate::level::{JsonLevelFile, SourceRect, StaticLevel};
    use crate::persistence::{MemoryStore, StoreError};
    use crate::platform::Autopilot;
    use crate::sim::{GamePhase, Rect};
    use glam::Vec2;

    /// Canvas equal to the source space so rects map 1:1
    fn identity_settings() -> Settings {
        Settings {
            world_width: 1000.0,
            world_height: 600.0,
            ..Settings::default()
        }
    }

    /// One block right of the spawn point, plus a far corner block that
    /// pins the extent to the canvas
    fn one_hit_level() -> StaticLevel {
        StaticLevel::new(
            "one-hit",
            vec![
                SourceRect::new(85.0, 10.0, 20.0, 20.0),
                SourceRect::new(980.0, 580.0, 20.0, 20.0),
            ],
        )
    }

    fn session_with_best(best: Option<f32>) -> Session {
        let store = match best {
            Some(secs) => MemoryStore::with_best(BestTime::from_seconds(secs)),
            None => MemoryStore::new(),
        };
        Session::new(identity_settings(), Box::new(store))
    }

    fn attack() -> TickInput {
        TickInput {
            attack: true,
            ..Default::default()
        }
    }

    /// Destroy both blocks of `one_hit_level` with `elapsed` on the clock
    fn finish_one_hit(session: &mut Session, elapsed: f32) -> Vec<SessionEvent> {
        // Let the clock run, then teleport next to each block and swing
        session.tick(&TickInput::default(), elapsed);
        let game = session.game.as_mut().unwrap();
        game.player.pos = Vec2::new(50.0, 0.0);
        session.tick(&attack(), 0.0);

        let game = session.game.as_mut().unwrap();
        game.player.cancel_attack();
        game.player.pos = Vec2::new(940.0, 560.0);
        game.player.vel = Vec2::ZERO;
        session.tick(&attack(), 0.0)
    }

    #[test]
    fn test_starts_in_loading() {
        let mut session = session_with_best(None);
        assert_eq!(session.phase(), SessionPhase::Loading);
        assert!(!session.can_start());
        assert!(!session.start());
        assert!(session.tick(&attack(), NOMINAL_DT).is_empty());
        assert!(session.frame().is_none());
    }

    #[test]
    fn test_load_starts_running() {
        let mut session = session_with_best(None);
        session.load(&one_hit_level()).unwrap();
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.level_name(), Some("one-hit"));

        let game = session.game().unwrap();
        assert_eq!(game.total_blocks, 2);
        assert_eq!(game.destroyed_blocks, 0);
        assert_eq!(game.player.pos, Vec2::new(50.0, 0.0));
        assert_eq!(game.elapsed, 0.0);
        assert_eq!(game.blocks[0].rect, Rect::new(85.0, 10.0, 20.0, 20.0));
    }

    #[test]
    fn test_completion_records_best() {
        let mut session = session_with_best(Some(15.0));
        session.load(&one_hit_level()).unwrap();

        let events = finish_one_hit(&mut session, 12.3);
        assert_eq!(session.phase(), SessionPhase::Complete);
        assert!(events.contains(&SessionEvent::LevelComplete {
            elapsed: 12.3,
            new_best: true
        }));
        assert_eq!(session.best().value(), 12.3);

        // Slower run leaves the record alone
        assert!(session.reset());
        let events = finish_one_hit(&mut session, 20.0);
        assert!(events.contains(&SessionEvent::LevelComplete {
            elapsed: 20.0,
            new_best: false
        }));
        assert_eq!(session.best().value(), 12.3);
    }

    #[test]
    fn test_complete_freezes_ticks() {
        let mut session = session_with_best(None);
        session.load(&one_hit_level()).unwrap();
        finish_one_hit(&mut session, 1.0);
        assert_eq!(session.phase(), SessionPhase::Complete);

        let ticks = session.game().unwrap().time_ticks;
        assert!(session.tick(&TickInput::default(), NOMINAL_DT).is_empty());
        assert_eq!(session.game().unwrap().time_ticks, ticks);
        assert_eq!(session.game().unwrap().phase, GamePhase::Complete);
    }

    #[test]
    fn test_reset_mid_attack() {
        let mut session = session_with_best(None);
        session.load(&one_hit_level()).unwrap();
        session.tick(&attack(), NOMINAL_DT);
        assert!(session.game().unwrap().player.is_attacking);
        assert_eq!(session.game().unwrap().destroyed_blocks, 1);

        assert!(session.reset());
        let game = session.game().unwrap();
        assert!(!game.player.is_attacking);
        assert_eq!(game.player.attack_timer_ms, 0.0);
        assert_eq!(game.destroyed_blocks, 0);
        assert!(game.blocks.iter().all(|b| !b.destroyed));
        assert_eq!(game.player.pos, Vec2::new(50.0, 0.0));
        assert_eq!(session.phase(), SessionPhase::Running);

        // Nothing stale fires later
        for _ in 0..30 {
            session.tick(&TickInput::default(), NOMINAL_DT);
        }
        assert!(!session.game().unwrap().player.is_attacking);
    }

    #[test]
    fn test_failed_load_keeps_previous_level() {
        let mut session = session_with_best(None);
        session.load(&one_hit_level()).unwrap();
        session.tick(&attack(), NOMINAL_DT);

        let missing = JsonLevelFile::new("/definitely/not/here/level.json");
        assert!(session.load(&missing).is_err());
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.level_name(), Some("one-hit"));
        assert_eq!(session.game().unwrap().destroyed_blocks, 1);
    }

    #[test]
    fn test_failed_first_load_stays_loading() {
        let mut session = session_with_best(None);
        let missing = JsonLevelFile::new("/definitely/not/here/level.json");
        assert!(session.load(&missing).is_err());
        assert_eq!(session.phase(), SessionPhase::Loading);
        assert!(!session.can_start());
    }

    #[test]
    fn test_new_load_replaces_level() {
        let mut session = session_with_best(None);
        session.load(&one_hit_level()).unwrap();
        session.tick(&attack(), NOMINAL_DT);

        let other = StaticLevel::new("other", vec![SourceRect::new(0.0, 0.0, 500.0, 300.0)]);
        session.load(&other).unwrap();
        let game = session.game().unwrap();
        assert_eq!(session.level_name(), Some("other"));
        assert_eq!(game.total_blocks, 1);
        assert_eq!(game.destroyed_blocks, 0);
    }

    #[test]
    fn test_empty_level_never_completes() {
        let mut session = session_with_best(None);
        session.load(&StaticLevel::new("empty", Vec::new())).unwrap();
        for _ in 0..40 {
            session.tick(&attack(), NOMINAL_DT);
        }
        assert_eq!(session.phase(), SessionPhase::Running);
        assert!(!session.best().is_set());
    }

    #[test]
    fn test_frame_hud() {
        let mut session = session_with_best(Some(9.0));
        session.load(&one_hit_level()).unwrap();
        session.tick(&attack(), NOMINAL_DT);
        let frame = session.frame().unwrap();
        assert_eq!(frame.hud.block_counter(), "Blocks destroyed: 1/2");
        assert_eq!(frame.hud.level_label(), "Level: one-hit");
        assert_eq!(frame.hud.best_label().as_deref(), Some("Best: 9.0s"));
        assert_eq!(frame.active_blocks().count(), 1);
    }

    struct FailingStore;

    impl BestTimeStore for FailingStore {
        fn load(&self) -> Result<BestTime, StoreError> {
            Err(StoreError::Corrupt(serde_json::from_str::<BestTime>("!").unwrap_err()))
        }

        fn save(&mut self, _best: &BestTime) -> Result<(), StoreError> {
            Err(StoreError::Io {
                path: "best.json".into(),
                source: std::io::Error::other("disk full"),
            })
        }
    }

    #[test]
    fn test_store_failures_do_not_interrupt_play() {
        let mut session = Session::new(identity_settings(), Box::new(FailingStore));
        assert!(!session.best().is_set());
        session.load(&one_hit_level()).unwrap();
        let events = finish_one_hit(&mut session, 5.0);
        assert!(events.contains(&SessionEvent::LevelComplete {
            elapsed: 5.0,
            new_best: true
        }));
        assert_eq!(session.best().value(), 5.0);
    }

    #[derive(Default)]
    struct RecordingSink {
        presented: u32,
        completions: Vec<(f32, bool)>,
    }

    impl RenderSink for RecordingSink {
        fn present(&mut self, _frame: &Frame<'_>) {
            self.presented += 1;
        }

        fn level_complete(&mut self, elapsed: f32, new_best: bool) {
            self.completions.push((elapsed, new_best));
        }
    }

    #[test]
    fn test_run_frame_autoplays_to_completion() {
        let mut session = Session::new(Settings::default(), Box::new(MemoryStore::new()));
        let level = StaticLevel::new(
            "floor",
            vec![
                SourceRect::new(300.0, 560.0, 40.0, 40.0),
                SourceRect::new(1170.0, 570.0, 30.0, 30.0),
            ],
        );
        session.load(&level).unwrap();

        let mut pilot = Autopilot;
        let mut sink = RecordingSink::default();
        for _ in 0..3000 {
            session.run_frame(&mut pilot, &mut sink, NOMINAL_DT);
            if session.phase() == SessionPhase::Complete {
                break;
            }
        }
        assert_eq!(session.phase(), SessionPhase::Complete);
        assert_eq!(sink.completions.len(), 1);
        assert!(sink.completions[0].1);
        assert!(sink.presented > 0);
    }
}
