//! Fixed-budget run loop
//!
//! Drives the deterministic simulation one frame at a time against the wall
//! clock. A frame that finishes early sleeps out the rest of its budget; a
//! frame that overruns is neither skipped nor caught up.

use std::ops::ControlFlow;
use std::time::Instant;

use crate::error::GeometryError;
use crate::platform::{ActionState, AssetCatalog, FrameSink, InputSource};
use crate::settings::Settings;
use crate::sim::{BehaviorKind, FormationCoordinator, FormationKind, SimEvent, World, tick};

/// Simulation plus wave progression
pub struct Engine {
    world: World,
    wave: Option<FormationCoordinator>,
    assets: Box<dyn AssetCatalog>,
    /// Ignore the supplied input and let the demo AI fly the ship
    autopilot: bool,
}

impl Engine {
    /// Spawn the player and the first wave
    pub fn new(settings: Settings, assets: Box<dyn AssetCatalog>) -> Result<Self, GeometryError> {
        let mut world = World::new(settings);
        world.spawn_player(assets.as_ref())?;
        let mut engine = Self {
            world,
            wave: None,
            assets,
            autopilot: false,
        };
        engine.start_wave(0)?;
        Ok(engine)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn wave(&self) -> Option<&FormationCoordinator> {
        self.wave.as_ref()
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
        log::info!("Autopilot: {enabled}");
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    /// The player ship is gone or out of lives
    pub fn is_over(&self) -> bool {
        self.world
            .player()
            .and_then(|id| self.world.get(id))
            .is_none_or(|player| player.behavior.is_destroyed())
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.world.drain_events()
    }

    fn start_wave(&mut self, index: u32) -> Result<(), GeometryError> {
        let cycle = &self.world.settings.wave_cycle;
        let kind = match cycle.len() {
            0 => FormationKind::Standard,
            n => cycle[index as usize % n],
        };
        let wave = FormationCoordinator::spawn(&mut self.world, index, kind, self.assets.as_ref())?;
        self.wave = Some(wave);
        Ok(())
    }

    /// Advance one frame
    pub fn step(&mut self, input: &dyn InputSource) -> Result<(), GeometryError> {
        if let Some(wave) = self.wave.as_mut() {
            wave.update(&mut self.world);
        }

        let dt = self.world.settings.sim_dt;
        if self.autopilot {
            let demo = autopilot_input(&self.world);
            tick(&mut self.world, &demo, dt);
        } else {
            tick(&mut self.world, input, dt);
        }

        let cleared = self
            .wave
            .as_ref()
            .filter(|wave| wave.is_cleared(&self.world))
            .map(FormationCoordinator::index);
        if let Some(index) = cleared
            && !self.is_over()
        {
            log::info!("Wave {} cleared at frame {}", index + 1, self.world.frame());
            self.world.events.push(SimEvent::WaveCleared { index });
            self.start_wave(index + 1)?;
        }
        Ok(())
    }

    /// Run until the sink stops the loop, the game is over, or `max_frames`
    /// frames have been presented. Returns the number of frames run.
    pub fn run(
        &mut self,
        input: &dyn InputSource,
        sink: &mut dyn FrameSink,
        max_frames: Option<u64>,
    ) -> Result<u64, GeometryError> {
        let budget = self.world.settings.frame_budget();
        let mut frames = 0;

        while max_frames.is_none_or(|max| frames < max) {
            let started = Instant::now();
            self.step(input)?;
            frames += 1;

            for event in self.world.drain_events() {
                log::debug!("Frame {}: {event:?}", self.world.frame());
            }
            let snapshot = self.world.snapshot();
            if sink.present(self.world.frame(), &snapshot).is_break() {
                break;
            }
            if self.is_over() {
                log::info!("Game over after {frames} frames");
                break;
            }

            if let Some(rest) = budget.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            } else {
                log::trace!("Frame {} overran its budget", self.world.frame());
            }
        }
        Ok(frames)
    }
}

/// Demo AI: dodge the nearest incoming shot, otherwise line up under the
/// lowest enemy and fire
pub fn autopilot_input(world: &World) -> ActionState {
    let mut input = ActionState::default();
    let Some(player) = world.player().and_then(|id| world.get(id)) else {
        return input;
    };
    let ship = player.body.position();

    let threat = world
        .entities()
        .filter(|e| e.name != player.name && e.behavior.is_collidable())
        .filter(|e| matches!(e.behavior.kind(), BehaviorKind::Basic))
        .map(|e| e.body.position())
        .filter(|p| p.y > ship.y && p.y - ship.y < 15.0 && (p.x - ship.x).abs() < 3.0)
        .min_by(|a, b| a.y.total_cmp(&b.y));
    if let Some(shot) = threat {
        input.evasive = true;
        if shot.x >= ship.x {
            input.left = true;
        } else {
            input.right = true;
        }
        return input;
    }

    let target = world
        .entities()
        .filter(|e| e.behavior.is_collidable() && e.behavior.as_enemy().is_some())
        .map(|e| e.body.position())
        .min_by(|a, b| a.y.total_cmp(&b.y));
    if let Some(enemy) = target {
        // wobble so the ship doesn't park under one column
        let t = world.frame() as f32 * 0.01;
        let aim = enemy.x + t.sin() * 0.8 + (t * 0.7).sin() * 0.4;
        let dx = aim - ship.x;
        if dx > 0.5 {
            input.right = true;
        } else if dx < -0.5 {
            input.left = true;
        }
        input.attack = (enemy.x - ship.x).abs() < 1.5;
    }
    input
}

/// Sink that presents nothing and never stops the loop
pub fn discard_frames(_frame: u64, _snapshot: &[crate::platform::RenderItem]) -> ControlFlow<()> {
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::platform::{RenderItem, StaticAssets};
    use crate::sim::{Behavior, EnemyBehavior, EntitySpec, ShapeSpec};

    fn settings() -> Settings {
        Settings {
            frame_budget_ms: 0.0,
            ..Settings::default()
        }
    }

    fn engine() -> Engine {
        Engine::new(settings(), Box::new(StaticAssets::default())).unwrap()
    }

    #[test]
    fn test_new_spawns_player_and_first_wave() {
        let mut engine = engine();
        let wave = engine.wave().unwrap();
        assert_eq!(wave.index(), 0);
        assert_eq!(wave.kind(), FormationKind::Standard);
        assert_eq!(engine.world().len(), 1 + wave.member_ids().count());
        assert!(!engine.is_over());
        let events = engine.drain_events();
        assert!(matches!(
            events.as_slice(),
            [SimEvent::WaveStarted { index: 0, kind: FormationKind::Standard }]
        ));
    }

    #[test]
    fn test_run_stops_when_sink_breaks() {
        let mut engine = engine();
        let mut seen = Vec::new();
        let mut sink = |frame: u64, snapshot: &[RenderItem]| {
            seen.push((frame, snapshot.len()));
            if frame >= 5 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
        };
        let frames = engine.run(&ActionState::default(), &mut sink, None).unwrap();
        assert_eq!(frames, 5);
        assert_eq!(seen.iter().map(|(f, _)| *f).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert!(seen.iter().all(|(_, n)| *n >= 1), "the player is always rendered");
    }

    #[test]
    fn test_run_honours_frame_limit() {
        let mut engine = engine();
        let mut sink = discard_frames;
        assert_eq!(engine.run(&ActionState::default(), &mut sink, Some(30)).unwrap(), 30);
        assert_eq!(engine.world().frame(), 30);
    }

    #[test]
    fn test_run_sleeps_out_the_budget() {
        let mut engine = Engine::new(
            Settings {
                frame_budget_ms: 5.0,
                ..Settings::default()
            },
            Box::new(StaticAssets::default()),
        )
        .unwrap();
        let started = Instant::now();
        let mut sink = discard_frames;
        engine.run(&ActionState::default(), &mut sink, Some(4)).unwrap();
        assert!(started.elapsed().as_millis() >= 20);
    }

    #[test]
    fn test_cleared_wave_starts_the_next_kind() {
        let mut engine = engine();
        let members: Vec<_> = engine.wave().unwrap().member_ids().collect();
        for id in members {
            engine.world_mut().destroy(id);
        }
        engine.drain_events();

        engine.step(&ActionState::default()).unwrap();
        let wave = engine.wave().unwrap();
        assert_eq!(wave.index(), 1);
        assert_eq!(wave.kind(), FormationKind::ZigzagSweep);
        let events = engine.drain_events();
        assert!(events.contains(&SimEvent::WaveCleared { index: 0 }));
        assert!(events.contains(&SimEvent::WaveStarted {
            index: 1,
            kind: FormationKind::ZigzagSweep
        }));
    }

    #[test]
    fn test_game_over_without_player() {
        let mut engine = engine();
        let player = engine.world().player().unwrap();
        engine.world_mut().destroy(player);
        assert!(engine.is_over());
        let mut sink = discard_frames;
        assert_eq!(engine.run(&ActionState::default(), &mut sink, Some(100)).unwrap(), 1);
    }

    #[test]
    fn test_autopilot_lines_up_and_fires() {
        let mut world = World::new(Settings::default());
        let assets = StaticAssets::default();
        world.spawn_player(&assets).unwrap();
        let enemy = EntitySpec::new("enemy", Vec2::new(45.0, 60.0), 270.0, ShapeSpec::Circle { radius: 1.0 })
            .build(Behavior::enemy(EnemyBehavior::new(Default::default(), None)), &assets)
            .unwrap();
        world.add(enemy);

        let input = autopilot_input(&world);
        assert!(input.right && !input.left);
        assert!(!input.attack);

        let enemy = EntitySpec::new("enemy", Vec2::new(30.0, 50.0), 270.0, ShapeSpec::Circle { radius: 1.0 })
            .build(Behavior::enemy(EnemyBehavior::new(Default::default(), None)), &assets)
            .unwrap();
        world.add(enemy);
        let input = autopilot_input(&world);
        assert!(input.attack);
    }

    #[test]
    fn test_autopilot_dodges_incoming_shots() {
        let mut world = World::new(Settings::default());
        let assets = StaticAssets::default();
        world.spawn_player(&assets).unwrap();
        let shot = EntitySpec::new("enemy", Vec2::new(31.0, 12.0), 270.0, ShapeSpec::Circle { radius: 0.3 })
            .build(Behavior::basic(), &assets)
            .unwrap();
        world.add(shot);

        let input = autopilot_input(&world);
        assert!(input.evasive && input.left && !input.right);
    }

    #[test]
    fn test_autopilot_engine_is_deterministic() {
        let run = || {
            let mut engine = engine();
            engine.set_autopilot(true);
            let mut sink = discard_frames;
            engine.run(&ActionState::default(), &mut sink, Some(600)).unwrap();
            engine
                .world()
                .snapshot()
                .into_iter()
                .map(|item| (item.id, item.position))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
