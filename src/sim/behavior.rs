//! Entity behaviors
//!
//! A behavior decides what its entity does each frame: it steers the body,
//! applies the body's per-frame scalars (rotate, scale, move) and keeps the
//! collider in sync, optionally attacks, and reacts to collisions.
//!
//! Three specializations share one state machine:
//! - `Basic`: projectiles and scenery, retired as soon as they are disabled
//! - `Enemy`: movement/attack slots, explodes on disable, re-arms on a timer
//! - `Player`: input driven, loses lives on hits, protected from being
//!   disabled by others

use std::collections::BTreeMap;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::attack::{AttackStrategy, Attacker, ProjectileTemplate, Target};
use super::entity::{Body, Entity, EntityId};
use super::movement::MovementStrategy;
use super::state::SimEvent;
use super::timers::{DelayedAction, Timers};
use crate::consts::{ARENA_WIDTH, EVASIVE_BOOST, PLAYER_FIRE_COOLDOWN_FRAMES, PLAYER_SPEED};
use crate::error::AttackError;
use crate::platform::{Action, FrameSequence, InputSource, SoundHandle};
use crate::settings::Settings;

/// Externally visible behavior state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorState {
    Disabled,
    Enabled,
    /// Enemy with an armed attack
    Attacking,
    /// Player shrugging off hits
    Invincible,
    Destroyed,
}

/// World services a behavior may use during one frame
pub struct BehaviorContext<'a> {
    /// Simulation time (seconds)
    pub now: f32,
    pub input: &'a dyn InputSource,
    /// Positions of collidable entities at the start of the frame
    pub positions: &'a BTreeMap<EntityId, Vec2>,
    pub timers: &'a mut Timers,
    pub rng: &'a mut Pcg32,
    pub events: &'a mut Vec<SimEvent>,
    pub settings: &'a Settings,
}

impl BehaviorContext<'_> {
    pub fn position_of(&self, id: EntityId) -> Option<Vec2> {
        self.positions.get(&id).copied()
    }
}

/// One entity overlapping the entity being notified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub id: EntityId,
    /// The protected actor is never disabled by others
    pub protected: bool,
}

#[derive(Debug, Clone)]
pub struct EnemyBehavior {
    movement: Option<MovementStrategy>,
    attack: Option<AttackStrategy>,
    armed: bool,
    explosion: FrameSequence,
    explosion_sound: Option<SoundHandle>,
}

impl EnemyBehavior {
    pub fn new(explosion: FrameSequence, explosion_sound: Option<SoundHandle>) -> Self {
        Self {
            movement: None,
            attack: None,
            armed: false,
            explosion,
            explosion_sound,
        }
    }

    pub fn with_movement(mut self, movement: MovementStrategy) -> Self {
        self.movement = Some(movement);
        self
    }

    pub fn with_attack(mut self, attack: AttackStrategy) -> Self {
        self.attack = Some(attack);
        self
    }

    pub fn movement(&self) -> Option<&MovementStrategy> {
        self.movement.as_ref()
    }

    pub fn movement_mut(&mut self) -> Option<&mut MovementStrategy> {
        self.movement.as_mut()
    }

    /// Replace the movement slot, returning the previous strategy
    pub fn set_movement(&mut self, movement: Option<MovementStrategy>) -> Option<MovementStrategy> {
        std::mem::replace(&mut self.movement, movement)
    }

    pub fn attack_strategy(&self) -> Option<&AttackStrategy> {
        self.attack.as_ref()
    }

    pub fn set_attack(&mut self, attack: Option<AttackStrategy>) -> Option<AttackStrategy> {
        std::mem::replace(&mut self.attack, attack)
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn is_moving(&self) -> bool {
        self.movement.as_ref().is_some_and(MovementStrategy::is_active)
    }

    fn steer(&mut self, body: &mut Body) {
        if self.attack.as_ref().is_some_and(AttackStrategy::controls_motion) {
            return;
        }
        if let Some(movement) = self.movement.as_mut().filter(|m| m.is_active()) {
            movement.advance(body);
        }
    }

    fn attack(
        &mut self,
        owner: EntityId,
        observed: Option<EntityId>,
        body: &mut Body,
        ctx: &mut BehaviorContext<'_>,
    ) -> Result<Option<Entity>, AttackError> {
        if !self.armed {
            return Ok(None);
        }
        let moving = self.is_moving();
        let Some(strategy) = self.attack.as_mut() else {
            return Ok(None);
        };
        // entries and patrols fly without shooting
        if moving && !strategy.controls_motion() {
            return Ok(None);
        }
        let Some(target) = observed.and_then(|id| {
            ctx.position_of(id).map(|position| Target { id, position })
        }) else {
            return Ok(None);
        };

        let spawned = strategy.execute(Some(Attacker { id: owner, body }), Some(target), ctx.now)?;
        if spawned.is_some() {
            self.armed = false;
            let delay = rearm_delay(ctx.rng, ctx.settings);
            ctx.timers.after(ctx.now, delay, DelayedAction::RearmAttack(owner));
        }
        Ok(spawned)
    }
}

/// Random re-arm delay drawn from the configured window
pub(crate) fn rearm_delay(rng: &mut Pcg32, settings: &Settings) -> f32 {
    let lo = settings.rearm_min_secs.min(settings.rearm_max_secs);
    let hi = settings.rearm_min_secs.max(settings.rearm_max_secs);
    rng.random_range(lo..=hi)
}

#[derive(Debug, Clone)]
pub struct PlayerBehavior {
    lives: i32,
    invincible: bool,
    /// Frames until the next shot is allowed
    cooldown: u32,
    projectile: ProjectileTemplate,
}

impl PlayerBehavior {
    pub fn new(lives: i32, projectile: ProjectileTemplate) -> Self {
        Self {
            lives,
            invincible: false,
            cooldown: 0,
            projectile,
        }
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible
    }

    pub fn end_invincibility(&mut self) {
        self.invincible = false;
    }

    fn steer(&mut self, body: &mut Body, input: &dyn InputSource) {
        let mut dx = 0.0;
        if input.is_action_active(Action::Left) {
            dx -= PLAYER_SPEED;
        }
        if input.is_action_active(Action::Right) {
            dx += PLAYER_SPEED;
        }
        if input.is_action_active(Action::Evasive) {
            dx *= EVASIVE_BOOST;
        }
        let x = body.position().x;
        body.velocity = Vec2::new((x + dx).clamp(0.0, ARENA_WIDTH) - x, 0.0);
        self.cooldown = self.cooldown.saturating_sub(1);
    }

    fn fire(&mut self, body: &Body, ctx: &BehaviorContext<'_>) -> Option<Entity> {
        if self.cooldown > 0 || !ctx.input.is_action_active(Action::Attack) {
            return None;
        }
        self.cooldown = PLAYER_FIRE_COOLDOWN_FRAMES;
        let origin = &body.transform;
        Some(self.projectile.fire(origin, origin.angle(), ctx.now))
    }

    /// Register one hit; returns true when the last life is gone
    fn take_hit(&mut self, owner: EntityId, ctx: &mut BehaviorContext<'_>) -> bool {
        if self.invincible || self.lives <= 0 {
            return false;
        }
        self.lives -= 1;
        log::info!("Player hit, {} lives left", self.lives);
        ctx.events.push(SimEvent::PlayerHit {
            entity: owner,
            lives: self.lives,
        });
        if self.lives <= 0 {
            return true;
        }
        self.invincible = true;
        ctx.timers.after(
            ctx.now,
            ctx.settings.invincibility_secs,
            DelayedAction::EndInvincibility(owner),
        );
        false
    }
}

#[derive(Debug, Clone)]
pub enum BehaviorKind {
    Basic,
    Enemy(EnemyBehavior),
    Player(PlayerBehavior),
}

#[derive(Debug, Clone)]
pub struct Behavior {
    owner: EntityId,
    enabled: bool,
    destroyed: bool,
    /// Entity this behavior aims at
    observed: Option<EntityId>,
    kind: BehaviorKind,
}

impl Behavior {
    fn with_kind(kind: BehaviorKind) -> Self {
        Self {
            owner: EntityId::NULL,
            enabled: true,
            destroyed: false,
            observed: None,
            kind,
        }
    }

    pub fn basic() -> Self {
        Self::with_kind(BehaviorKind::Basic)
    }

    pub fn enemy(enemy: EnemyBehavior) -> Self {
        Self::with_kind(BehaviorKind::Enemy(enemy))
    }

    pub fn player(player: PlayerBehavior) -> Self {
        Self::with_kind(BehaviorKind::Player(player))
    }

    /// Start disabled; `enable` brings the entity into play later
    pub fn dormant(mut self) -> Self {
        self.enabled = false;
        self
    }

    #[inline]
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: EntityId) {
        self.owner = owner;
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Takes part in the collision pass
    pub fn is_collidable(&self) -> bool {
        self.enabled && !self.destroyed
    }

    pub fn is_protected(&self) -> bool {
        matches!(self.kind, BehaviorKind::Player(_))
    }

    /// Whether a disabled entity can be dropped at the end of the frame
    pub fn is_spent(&self) -> bool {
        matches!(self.kind, BehaviorKind::Basic) && !self.enabled
    }

    pub fn enable(&mut self) {
        if !self.destroyed {
            self.enabled = true;
        }
    }

    pub fn observe(&mut self, target: Option<EntityId>) {
        self.observed = target;
    }

    pub fn observed(&self) -> Option<EntityId> {
        self.observed
    }

    pub fn kind(&self) -> &BehaviorKind {
        &self.kind
    }

    pub fn as_enemy(&self) -> Option<&EnemyBehavior> {
        match &self.kind {
            BehaviorKind::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    pub fn as_enemy_mut(&mut self) -> Option<&mut EnemyBehavior> {
        match &mut self.kind {
            BehaviorKind::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    pub fn as_player(&self) -> Option<&PlayerBehavior> {
        match &self.kind {
            BehaviorKind::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut PlayerBehavior> {
        match &mut self.kind {
            BehaviorKind::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn state(&self) -> BehaviorState {
        if self.destroyed {
            return BehaviorState::Destroyed;
        }
        if !self.enabled {
            return BehaviorState::Disabled;
        }
        match &self.kind {
            BehaviorKind::Player(player) if player.invincible => BehaviorState::Invincible,
            BehaviorKind::Enemy(enemy) if enemy.armed && enemy.attack.is_some() => {
                BehaviorState::Attacking
            }
            _ => BehaviorState::Enabled,
        }
    }

    /// Steer, then rotate, scale and move the body and resync its collider
    pub fn update(&mut self, body: &mut Body, ctx: &mut BehaviorContext<'_>) {
        if !self.is_collidable() {
            return;
        }
        match &mut self.kind {
            BehaviorKind::Basic => {}
            BehaviorKind::Enemy(enemy) => enemy.steer(body),
            BehaviorKind::Player(player) => player.steer(body, ctx.input),
        }
        apply_motion(body);
    }

    /// Try to attack; a spawned projectile is returned for the caller to add
    pub fn attack(
        &mut self,
        body: &mut Body,
        ctx: &mut BehaviorContext<'_>,
    ) -> Result<Option<Entity>, AttackError> {
        if !self.is_collidable() {
            return Ok(None);
        }
        match &mut self.kind {
            BehaviorKind::Basic => Ok(None),
            BehaviorKind::Enemy(enemy) => enemy.attack(self.owner, self.observed, body, ctx),
            BehaviorKind::Player(player) => Ok(player.fire(body, ctx)),
        }
    }

    /// React to this frame's overlaps.
    ///
    /// Returns the entities this one disables. Everything but the player
    /// takes itself out along with every unprotected entity it hit; the
    /// player only loses a life.
    pub fn on_collision(
        &mut self,
        body: &mut Body,
        hits: &[Hit],
        ctx: &mut BehaviorContext<'_>,
    ) -> Vec<EntityId> {
        if hits.is_empty() || !self.is_collidable() {
            return Vec::new();
        }
        if let BehaviorKind::Player(player) = &mut self.kind {
            if player.take_hit(self.owner, ctx) {
                self.destroyed = true;
                self.enabled = false;
                body.halt();
                log::info!("Player destroyed");
                ctx.events.push(SimEvent::PlayerDestroyed { entity: self.owner });
            }
            return Vec::new();
        }

        self.disable(body, ctx);
        hits.iter().filter(|hit| !hit.protected).map(|hit| hit.id).collect()
    }

    /// Take the entity out of play. Enemies keep rendering their explosion
    /// until the scheduled removal fires.
    pub fn disable(&mut self, body: &mut Body, ctx: &mut BehaviorContext<'_>) {
        if !self.is_collidable() {
            return;
        }
        body.halt();
        match &mut self.kind {
            BehaviorKind::Basic | BehaviorKind::Player(_) => self.enabled = false,
            BehaviorKind::Enemy(enemy) => {
                self.destroyed = true;
                enemy.armed = false;
                if let Some(movement) = enemy.movement.as_mut() {
                    movement.activate(false);
                }
                body.play(enemy.explosion.clone(), ctx.now);
                ctx.events.push(SimEvent::Explosion {
                    entity: self.owner,
                    position: body.position(),
                    sound: enemy.explosion_sound,
                });
                ctx.timers.after(
                    ctx.now,
                    ctx.settings.explosion_secs,
                    DelayedAction::Remove(self.owner),
                );
            }
        }
    }

    /// Final retirement once an explosion has played out
    pub fn retire(&mut self) {
        self.enabled = false;
        self.destroyed = true;
    }
}

/// Rotate, scale, move and re-layer from the body's scalars
fn apply_motion(body: &mut Body) {
    if body.rotation_speed != 0.0 {
        body.transform.rotate(body.rotation_speed);
    }
    if body.scale_delta != 0.0 {
        body.transform.scale_by(body.scale_delta);
    }
    body.transform.move_by(body.velocity);
    if body.layer_delta != 0 {
        body.transform.shift_layer(body.layer_delta);
    }
    body.collider.sync_all(&body.transform);
}

#[cfg(test)]
pub(crate) mod test_support {
    use rand::SeedableRng;

    use super::*;
    use crate::platform::ActionState;

    /// Owns everything a `BehaviorContext` borrows
    pub struct Harness {
        pub timers: Timers,
        pub rng: Pcg32,
        pub events: Vec<SimEvent>,
        pub settings: Settings,
        pub positions: BTreeMap<EntityId, Vec2>,
        pub input: ActionState,
        pub now: f32,
    }

    impl Harness {
        pub fn new() -> Self {
            Self {
                timers: Timers::new(),
                rng: Pcg32::seed_from_u64(7),
                events: Vec::new(),
                settings: Settings::default(),
                positions: BTreeMap::new(),
                input: ActionState::default(),
                now: 0.0,
            }
        }

        pub fn ctx(&mut self) -> BehaviorContext<'_> {
            BehaviorContext {
                now: self.now,
                input: &self.input,
                positions: &self.positions,
                timers: &mut self.timers,
                rng: &mut self.rng,
                events: &mut self.events,
                settings: &self.settings,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::Harness;
    use super::*;
    use crate::consts::{FACING_DOWN, FACING_UP};
    use crate::platform::{ActionState, FrameHandle};
    use crate::shortest_rotation;
    use crate::sim::movement::test_support::body_at;
    use crate::sim::movement::{Side, SideEntry, Zigzag};

    fn id(index: u32) -> EntityId {
        EntityId::new(index, 0)
    }

    fn enemy(owner: EntityId) -> Behavior {
        let explosion = FrameSequence::new(vec![FrameHandle(99)], 0.1, false);
        let mut behavior = Behavior::enemy(EnemyBehavior::new(explosion, Some(SoundHandle(5))));
        behavior.set_owner(owner);
        behavior
    }

    fn player(owner: EntityId) -> Behavior {
        let projectile = ProjectileTemplate::new("player", 0.9, FrameSequence::default()).unwrap();
        let mut behavior = Behavior::player(PlayerBehavior::new(3, projectile));
        behavior.set_owner(owner);
        behavior
    }

    #[test]
    fn test_basic_update_rotates_scales_moves_and_syncs() {
        let mut harness = Harness::new();
        let mut body = body_at(Vec2::new(1.0, 1.0), 0.0);
        body.velocity = Vec2::new(0.5, -0.25);
        body.rotation_speed = 10.0;
        body.scale_delta = 0.5;
        let mut behavior = Behavior::basic();
        behavior.update(&mut body, &mut harness.ctx());

        assert_eq!(body.position(), Vec2::new(1.5, 0.75));
        assert_eq!(body.transform.angle(), 10.0);
        assert_eq!(body.transform.scale(), 1.5);
        let center = body.collider.shape().centroid();
        assert!((center - Vec2::new(1.5, 0.75)).length() < 1e-5);
    }

    #[test]
    fn test_basic_collision_disables_unprotected_hits_and_itself() {
        let mut harness = Harness::new();
        let mut body = body_at(Vec2::ZERO, 0.0);
        let mut behavior = Behavior::basic();
        let hits = [
            Hit { id: id(1), protected: false },
            Hit { id: id(2), protected: true },
        ];
        let disabled = behavior.on_collision(&mut body, &hits, &mut harness.ctx());
        assert_eq!(disabled, vec![id(1)]);
        assert!(!behavior.is_enabled());
        assert!(behavior.is_spent());
        assert_eq!(behavior.state(), BehaviorState::Disabled);
    }

    #[test]
    fn test_enemy_disable_explodes_once() {
        let mut harness = Harness::new();
        let mut body = body_at(Vec2::new(10.0, 40.0), FACING_DOWN);
        body.velocity = Vec2::new(1.0, 0.0);
        let mut behavior = enemy(id(3));

        behavior.disable(&mut body, &mut harness.ctx());
        behavior.disable(&mut body, &mut harness.ctx());

        assert_eq!(behavior.state(), BehaviorState::Destroyed);
        assert!(behavior.is_enabled(), "explosion stays visible");
        assert!(!behavior.is_collidable());
        assert!(!behavior.is_spent());
        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(body.current_frame(0.0), Some(FrameHandle(99)));
        assert_eq!(harness.events.len(), 1);
        assert!(matches!(
            harness.events[0],
            SimEvent::Explosion { sound: Some(SoundHandle(5)), .. }
        ));
        assert_eq!(harness.timers.take_due(1.0), vec![DelayedAction::Remove(id(3))]);

        behavior.retire();
        assert!(!behavior.is_enabled());
    }

    #[test]
    fn test_enemy_attack_cycle() {
        let mut harness = Harness::new();
        let me = id(0);
        let target = id(1);
        harness.positions.insert(target, Vec2::new(30.0, 5.0));
        let mut body = body_at(Vec2::new(30.0, 60.0), FACING_DOWN);
        let straight = ProjectileTemplate::new("enemy", 0.9, FrameSequence::default()).unwrap();
        let mut behavior = enemy(me);
        if let Some(e) = behavior.as_enemy_mut() {
            e.set_attack(Some(AttackStrategy::Straight(straight)));
        }
        behavior.observe(Some(target));

        // not armed yet
        assert!(behavior.attack(&mut body, &mut harness.ctx()).unwrap().is_none());

        behavior.as_enemy_mut().unwrap().arm();
        assert_eq!(behavior.state(), BehaviorState::Attacking);
        let shot = behavior.attack(&mut body, &mut harness.ctx()).unwrap();
        assert!(shot.is_some());
        assert!(!behavior.as_enemy().unwrap().is_armed());
        assert!(behavior.attack(&mut body, &mut harness.ctx()).unwrap().is_none());

        let rearm_at = harness.timers.next_due().unwrap();
        assert!((1.5..=7.0).contains(&rearm_at));
        assert_eq!(harness.timers.take_due(7.0), vec![DelayedAction::RearmAttack(me)]);
    }

    #[test]
    fn test_enemy_holds_fire_while_moving() {
        let mut harness = Harness::new();
        let target = id(1);
        harness.positions.insert(target, Vec2::new(30.0, 5.0));
        let mut body = body_at(Vec2::new(30.0, 60.0), FACING_DOWN);
        let straight = ProjectileTemplate::new("enemy", 0.9, FrameSequence::default()).unwrap();
        let mut behavior = Behavior::enemy(
            EnemyBehavior::new(FrameSequence::default(), None)
                .with_movement(MovementStrategy::Zigzag(Zigzag::new()).activated())
                .with_attack(AttackStrategy::Straight(straight)),
        );
        behavior.set_owner(id(0));
        behavior.observe(Some(target));
        behavior.as_enemy_mut().unwrap().arm();

        assert!(behavior.attack(&mut body, &mut harness.ctx()).unwrap().is_none());
        behavior.update(&mut body, &mut harness.ctx());
        assert_eq!(body.position(), Vec2::new(30.5, 60.0));
    }

    #[test]
    fn test_enemy_without_target_does_not_attack() {
        let mut harness = Harness::new();
        let mut body = body_at(Vec2::new(30.0, 60.0), FACING_DOWN);
        let straight = ProjectileTemplate::new("enemy", 0.9, FrameSequence::default()).unwrap();
        let mut behavior = Behavior::enemy(
            EnemyBehavior::new(FrameSequence::default(), None)
                .with_movement(MovementStrategy::SideEntry(crate::sim::movement::SideEntry::new(
                    Side::Left,
                    Vec2::ZERO,
                )))
                .with_attack(AttackStrategy::Straight(straight)),
        );
        behavior.as_enemy_mut().unwrap().arm();
        behavior.observe(Some(id(42)));
        assert!(behavior.attack(&mut body, &mut harness.ctx()).unwrap().is_none());
    }

    #[test]
    fn test_player_loses_lives_with_invincibility() {
        let mut harness = Harness::new();
        let me = id(0);
        let mut body = body_at(Vec2::new(30.0, 5.0), FACING_UP);
        let mut behavior = player(me);
        let hits = [Hit { id: id(9), protected: false }];

        assert!(behavior.on_collision(&mut body, &hits, &mut harness.ctx()).is_empty());
        assert_eq!(behavior.as_player().unwrap().lives(), 2);
        assert_eq!(behavior.state(), BehaviorState::Invincible);

        // shrugged off
        behavior.on_collision(&mut body, &hits, &mut harness.ctx());
        assert_eq!(behavior.as_player().unwrap().lives(), 2);

        for expected in [1, 0] {
            behavior.as_player_mut().unwrap().end_invincibility();
            behavior.on_collision(&mut body, &hits, &mut harness.ctx());
            assert_eq!(behavior.as_player().unwrap().lives(), expected);
        }
        assert_eq!(behavior.state(), BehaviorState::Destroyed);
        assert!(!behavior.is_enabled());
        behavior.enable();
        assert!(!behavior.is_enabled(), "destroyed players stay disabled");
        assert!(matches!(harness.events.last(), Some(SimEvent::PlayerDestroyed { .. })));
        assert_eq!(harness.timers.len(), 2);
    }

    #[test]
    fn test_enemy_holds_formation_facing_after_entry() {
        let mut harness = Harness::new();
        let target = Vec2::new(21.0, 62.0);
        let mut body = body_at(Vec2::new(65.0, 20.0), FACING_UP);
        let mut behavior = enemy(id(0));
        behavior.as_enemy_mut().unwrap().set_movement(Some(
            MovementStrategy::SideEntry(SideEntry::new(Side::Right, target)).activated(),
        ));

        let mut frames = 0;
        while behavior.as_enemy().unwrap().is_moving() && frames < 1_000 {
            behavior.update(&mut body, &mut harness.ctx());
            frames += 1;
        }
        assert!(frames < 1_000, "entry never finished");

        for _ in 0..600 {
            behavior.update(&mut body, &mut harness.ctx());
        }
        assert_eq!(body.rotation_speed, 0.0);
        assert!(shortest_rotation(body.transform.angle(), FACING_DOWN).abs() <= 1e-2);
        assert!((body.position() - target).length() < 1e-2);
        let center = body.collider.shape().centroid();
        assert!((center - target).length() < 1e-2);
    }

    #[test]
    fn test_player_moves_from_input_and_stays_in_arena() {
        let mut harness = Harness::new();
        let mut body = body_at(Vec2::new(30.0, 5.0), FACING_UP);
        let mut behavior = player(id(0));

        harness.input = ActionState::default().with(Action::Left);
        behavior.update(&mut body, &mut harness.ctx());
        assert!((body.position().x - (30.0 - PLAYER_SPEED)).abs() < 1e-5);

        harness.input = ActionState::default().with(Action::Right).with(Action::Evasive);
        behavior.update(&mut body, &mut harness.ctx());
        let expected = 30.0 - PLAYER_SPEED + PLAYER_SPEED * EVASIVE_BOOST;
        assert!((body.position().x - expected).abs() < 1e-4);
        assert_eq!(body.position().y, 5.0);

        body.transform.move_to(Vec2::new(ARENA_WIDTH - 0.1, 5.0));
        for _ in 0..5 {
            behavior.update(&mut body, &mut harness.ctx());
        }
        assert_eq!(body.position().x, ARENA_WIDTH);
    }

    #[test]
    fn test_player_fire_cooldown() {
        let mut harness = Harness::new();
        let mut body = body_at(Vec2::new(30.0, 5.0), FACING_UP);
        let mut behavior = player(id(0));
        harness.input = ActionState::default().with(Action::Attack);

        let shot = behavior.attack(&mut body, &mut harness.ctx()).unwrap().unwrap();
        assert_eq!(shot.name, "player");
        assert!(shot.body.velocity.y > 0.0);
        assert!(behavior.attack(&mut body, &mut harness.ctx()).unwrap().is_none());

        for _ in 0..PLAYER_FIRE_COOLDOWN_FRAMES {
            behavior.update(&mut body, &mut harness.ctx());
        }
        assert!(behavior.attack(&mut body, &mut harness.ctx()).unwrap().is_some());
    }

    #[test]
    fn test_dormant_behaviors_skip_updates() {
        let mut harness = Harness::new();
        let mut body = body_at(Vec2::ZERO, 0.0);
        body.velocity = Vec2::ONE;
        let mut behavior = Behavior::basic().dormant();
        behavior.update(&mut body, &mut harness.ctx());
        assert_eq!(body.position(), Vec2::ZERO);
        behavior.enable();
        behavior.update(&mut body, &mut harness.ctx());
        assert_eq!(body.position(), Vec2::ONE);
    }
}
