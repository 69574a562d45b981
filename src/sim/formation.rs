//! Group formation coordinator
//!
//! A wave is laid out on a grid from a static priority matrix. Enemies
//! enter in groups of `group_size`, lowest priority first, one group every
//! `group_interval_secs` and one member every `entry_sub_delay_secs` within
//! a group. Once everyone has arrived, a secondary pattern picked at random
//! sends some of them off on patrols, sweeps or kamikaze runs.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::attack::{AttackStrategy, Kamikaze, ProjectileTemplate};
use super::behavior::{Behavior, EnemyBehavior, rearm_delay};
use super::entity::{EntityId, EntitySpec, ShapeSpec};
use super::movement::{
    ArcEntry, CircularPatrol, MovementStrategy, Side, SideEntry, TopDownSweep, Zigzag,
};
use super::state::{SimEvent, World};
use super::timers::DelayedAction;
use crate::consts::{ARENA_WIDTH, FACING_UP};
use crate::error::GeometryError;
use crate::platform::AssetCatalog;

pub const GRID_ROWS: usize = 5;
pub const GRID_COLS: usize = 8;

type Pattern = [[u8; GRID_COLS]; GRID_ROWS];

/// Entry priority per slot; 0 leaves the slot empty
const PRIORITY_PATTERN: Pattern = [
    [0, 0, 1, 1, 1, 1, 0, 0],
    [0, 2, 2, 3, 3, 2, 2, 0],
    [4, 4, 5, 5, 5, 5, 4, 4],
    [6, 6, 7, 7, 7, 7, 6, 6],
    [0, 8, 8, 8, 8, 8, 8, 0],
];

const PATROL: u8 = 1;
const SWEEP: u8 = 2;
const KAMIKAZE: u8 = 3;

/// Sortie per slot once the formation is complete
const SECONDARY_PATTERNS: [Pattern; 3] = [
    [
        [0, 0, 3, 0, 0, 3, 0, 0],
        [0, 1, 0, 0, 0, 0, 1, 0],
        [0, 0, 0, 2, 2, 0, 0, 0],
        [0, 0, 0, 0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0, 0, 0, 0],
    ],
    [
        [0, 0, 0, 0, 0, 0, 0, 0],
        [0, 0, 1, 0, 0, 1, 0, 0],
        [2, 0, 0, 0, 0, 0, 0, 2],
        [0, 0, 0, 3, 3, 0, 0, 0],
        [0, 0, 0, 0, 0, 0, 0, 0],
    ],
    [
        [0, 0, 0, 3, 0, 0, 0, 0],
        [0, 0, 0, 0, 0, 0, 0, 0],
        [0, 1, 0, 0, 0, 0, 1, 0],
        [0, 0, 0, 0, 0, 0, 0, 0],
        [0, 2, 0, 2, 2, 0, 2, 0],
    ],
];

/// Top-left slot position and slot spacing
const GRID_ORIGIN: Vec2 = Vec2::new(9.0, 72.0);
const GRID_SPACING: Vec2 = Vec2::new(6.0, 5.0);

const ARC_STARTS: [Vec2; 2] = [Vec2::new(5.0, -5.0), Vec2::new(55.0, -5.0)];
const SIDE_STARTS: [Vec2; 2] = [Vec2::new(-5.0, 20.0), Vec2::new(65.0, 20.0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormationKind {
    Standard,
    /// Sweeps the whole formation sideways for a while after arrival
    ZigzagSweep,
}

/// One occupied grid cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSlot {
    pub row: usize,
    pub col: usize,
    pub priority: u8,
    pub position: Vec2,
}

/// Formation layout, slots sorted by priority then row then column
#[derive(Debug, Clone, PartialEq)]
pub struct FormationGrid {
    slots: Vec<GridSlot>,
}

impl FormationGrid {
    pub fn from_pattern(pattern: &Pattern, origin: Vec2, spacing: Vec2) -> Self {
        let mut slots: Vec<GridSlot> = pattern
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| {
                cells.iter().enumerate().filter(|(_, p)| **p > 0).map(move |(col, p)| GridSlot {
                    row,
                    col,
                    priority: *p,
                    position: origin + Vec2::new(col as f32 * spacing.x, -(row as f32) * spacing.y),
                })
            })
            .collect();
        slots.sort_by_key(|s| (s.priority, s.row, s.col));
        Self { slots }
    }

    pub fn standard() -> Self {
        Self::from_pattern(&PRIORITY_PATTERN, GRID_ORIGIN, GRID_SPACING)
    }

    pub fn slots(&self) -> &[GridSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn position(&self, row: usize, col: usize) -> Option<Vec2> {
        self.slots
            .iter()
            .find(|s| s.row == row && s.col == col)
            .map(|s| s.position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Member {
    id: EntityId,
    slot: GridSlot,
    entry_at: f32,
    entered: bool,
}

/// Drives one wave from entry to the secondary sorties
#[derive(Debug, Clone)]
pub struct FormationCoordinator {
    index: u32,
    kind: FormationKind,
    grid: FormationGrid,
    members: Vec<Member>,
    projectile: ProjectileTemplate,
    arrived_at: Option<f32>,
    /// Zigzag override expiry
    override_until: Option<f32>,
    secondary_assigned: bool,
}

impl FormationCoordinator {
    /// Spawn every member of a wave, dormant until its entry time
    pub fn spawn(
        world: &mut World,
        index: u32,
        kind: FormationKind,
        assets: &dyn AssetCatalog,
    ) -> Result<Self, GeometryError> {
        let grid = FormationGrid::standard();
        let settings = world.settings.clone();
        let projectile = ProjectileTemplate::new(
            "enemy",
            settings.projectile_speed,
            assets.frames("enemy_shot").unwrap_or_default(),
        )?;
        let explosion = assets.frames("enemy_explosion").unwrap_or_default();
        let sound = assets.sound("explosion");
        let player = world.player();
        let start = world.time();
        let group_size = settings.group_size.max(1);

        let mut members = Vec::with_capacity(grid.len());
        for (i, slot) in grid.slots().iter().enumerate() {
            let group = i / group_size;
            let rank = i % group_size;
            let side = if (group / 2) % 2 == 0 { Side::Left } else { Side::Right };
            let side_index = usize::from(side == Side::Right);
            let (origin, movement) = if group % 2 == 0 {
                (
                    ARC_STARTS[side_index],
                    MovementStrategy::ArcEntry(ArcEntry::new(side, slot.position)),
                )
            } else {
                (
                    SIDE_STARTS[side_index],
                    MovementStrategy::SideEntry(SideEntry::new(side, slot.position)),
                )
            };

            let mut behavior = Behavior::enemy(
                EnemyBehavior::new(explosion.clone(), sound)
                    .with_movement(movement)
                    .with_attack(AttackStrategy::Straight(projectile.clone())),
            )
            .dormant();
            behavior.observe(player);

            let spec = EntitySpec::new(
                "enemy",
                origin,
                FACING_UP,
                ShapeSpec::Triangle {
                    length: 2.5,
                    width: 2.5,
                },
            )
            .with_frames(format!("enemy_row{}", slot.row));
            let id = world.add(spec.build(behavior, assets)?);
            members.push(Member {
                id,
                slot: *slot,
                entry_at: start
                    + group as f32 * settings.group_interval_secs
                    + rank as f32 * settings.entry_sub_delay_secs,
                entered: false,
            });
        }

        log::info!("Wave {} ({:?}): {} enemies", index + 1, kind, members.len());
        world.events.push(SimEvent::WaveStarted { index, kind });
        Ok(Self {
            index,
            kind,
            grid,
            members,
            projectile,
            arrived_at: None,
            override_until: None,
            secondary_assigned: false,
        })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn kind(&self) -> FormationKind {
        self.kind
    }

    pub fn grid(&self) -> &FormationGrid {
        &self.grid
    }

    pub fn member_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.members.iter().map(|m| m.id)
    }

    pub fn has_arrived(&self) -> bool {
        self.arrived_at.is_some()
    }

    pub fn secondary_assigned(&self) -> bool {
        self.secondary_assigned
    }

    /// Every member has been destroyed or has left the arena
    pub fn is_cleared(&self, world: &World) -> bool {
        self.members.iter().all(|m| !world.contains(m.id))
    }

    /// Release due entries and run the post-arrival steps
    pub fn update(&mut self, world: &mut World) {
        let now = world.time();
        self.release_entries(world, now);

        if self.arrived_at.is_none() && self.everyone_settled(world) {
            self.arrived_at = Some(now);
            log::info!("Wave {} formation complete", self.index + 1);
            match self.kind {
                FormationKind::Standard => self.assign_secondary(world),
                FormationKind::ZigzagSweep => self.override_with_zigzag(world, now),
            }
        }

        if self.override_until.is_some_and(|until| now >= until) {
            self.assign_secondary(world);
        }
    }

    fn release_entries(&mut self, world: &mut World, now: f32) {
        for member in self.members.iter_mut().filter(|m| !m.entered && m.entry_at <= now) {
            member.entered = true;
            let delay = rearm_delay(&mut world.rng, &world.settings);
            let Some(entity) = world.get_mut(member.id) else {
                continue;
            };
            entity.behavior.enable();
            if let Some(movement) = entity.behavior.as_enemy_mut().and_then(|e| e.movement_mut()) {
                movement.activate(true);
            }
            world.timers.after(now, delay, DelayedAction::RearmAttack(member.id));
        }
    }

    fn everyone_settled(&self, world: &World) -> bool {
        self.members.iter().all(|m| {
            m.entered
                && world
                    .get(m.id)
                    .and_then(|e| e.behavior.as_enemy())
                    .is_none_or(|enemy| !enemy.is_moving())
        })
    }

    fn override_with_zigzag(&mut self, world: &mut World, now: f32) {
        let secs = world.settings.zigzag_override_secs;
        for member in &self.members {
            let Some(enemy) = world.get_mut(member.id).and_then(|e| e.behavior.as_enemy_mut()) else {
                continue;
            };
            let prior = enemy.set_movement(Some(MovementStrategy::Zigzag(Zigzag::new()).activated()));
            world.timers.after(
                now,
                secs,
                DelayedAction::RestoreMovement {
                    entity: member.id,
                    strategy: prior,
                },
            );
        }
        self.override_until = Some(now + secs);
    }

    /// One-shot: send the members on the chosen pattern off on sorties
    fn assign_secondary(&mut self, world: &mut World) {
        if self.secondary_assigned {
            return;
        }
        self.secondary_assigned = true;
        self.override_until = None;

        let choice = world.rng.random_range(0..SECONDARY_PATTERNS.len());
        let pattern = &SECONDARY_PATTERNS[choice];
        let mut assigned = 0;
        for member in &self.members {
            let sortie = pattern[member.slot.row][member.slot.col];
            if sortie == 0 {
                continue;
            }
            let Some(entity) = world.get_mut(member.id) else {
                continue;
            };
            if !entity.behavior.is_collidable() {
                continue;
            }
            // zigzag leaves the body slightly off its slot; sorties restart from here
            entity.body.halt();
            let Some(enemy) = entity.behavior.as_enemy_mut() else {
                continue;
            };
            let side = if member.slot.position.x < ARENA_WIDTH / 2.0 {
                Side::Left
            } else {
                Side::Right
            };
            let (movement, attack) = match sortie {
                PATROL => (
                    Some(MovementStrategy::CircularPatrol(CircularPatrol::new(side)).activated()),
                    AttackStrategy::Homing(self.projectile.clone()),
                ),
                SWEEP => (
                    Some(
                        MovementStrategy::TopDownSweep(TopDownSweep::new(Some(member.slot.position)))
                            .activated(),
                    ),
                    AttackStrategy::Straight(self.projectile.clone()),
                ),
                KAMIKAZE => (None, AttackStrategy::Kamikaze(Kamikaze::new())),
                _ => continue,
            };
            enemy.set_movement(movement);
            enemy.set_attack(Some(attack));
            assigned += 1;
        }
        log::info!(
            "Wave {} secondary pattern {}: {} sorties",
            self.index + 1,
            choice,
            assigned
        );
    }
}
