//! World state
//!
//! Owns every entity, grouped by integer layer. Layer buckets are kept in a
//! `BTreeMap` so iteration is always in ascending layer order and, within a
//! layer, in insertion order. Empty buckets are pruned as soon as their
//! last member leaves.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::attack::ProjectileTemplate;
use super::behavior::{Behavior, BehaviorContext, PlayerBehavior};
use super::entity::{Entity, EntityId, EntitySpec, ShapeSpec};
use super::formation::FormationKind;
use super::timers::Timers;
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, FACING_UP};
use crate::error::GeometryError;
use crate::geom::Bounds;
use crate::platform::{AssetCatalog, InputSource, RenderItem, SoundHandle};
use crate::settings::Settings;

/// Notable things that happened during a tick, for audio/UI collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Explosion {
        entity: EntityId,
        position: Vec2,
        sound: Option<SoundHandle>,
    },
    PlayerHit {
        entity: EntityId,
        lives: i32,
    },
    PlayerDestroyed {
        entity: EntityId,
    },
    WaveStarted {
        index: u32,
        kind: FormationKind,
    },
    WaveCleared {
        index: u32,
    },
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

/// Playfield rectangle, origin at the bottom-left
pub fn arena_bounds() -> Bounds {
    Bounds {
        min: Vec2::ZERO,
        max: Vec2::new(ARENA_WIDTH, ARENA_HEIGHT),
    }
}

/// Complete simulation state
#[derive(Debug)]
pub struct World {
    slots: Vec<Slot>,
    free: Vec<u32>,
    layers: BTreeMap<i32, Vec<EntityId>>,
    /// Pending delayed actions
    pub timers: Timers,
    /// Seeded RNG; every random choice in the simulation draws from it
    pub rng: Pcg32,
    /// Events raised since the last drain
    pub events: Vec<SimEvent>,
    pub settings: Settings,
    /// Simulation time (seconds)
    time: f32,
    /// Completed ticks
    frame: u64,
    player: Option<EntityId>,
}

impl World {
    pub fn new(settings: Settings) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            layers: BTreeMap::new(),
            timers: Timers::new(),
            rng: Pcg32::seed_from_u64(settings.seed),
            events: Vec::new(),
            settings,
            time: 0.0,
            frame: 0,
            player: None,
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub(crate) fn advance_clock(&mut self, dt: f32) {
        self.time += dt;
        self.frame += 1;
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    /// Register an entity, returning its handle
    pub fn add(&mut self, mut entity: Entity) -> EntityId {
        let id = match self.free.pop() {
            Some(index) => EntityId::new(index, self.slots[index as usize].generation),
            None => {
                self.slots.push(Slot::default());
                EntityId::new((self.slots.len() - 1) as u32, 0)
            }
        };
        entity.id = id;
        entity.behavior.set_owner(id);
        self.layers.entry(entity.layer()).or_default().push(id);
        log::debug!("Added {} as {:?} on layer {}", entity.name, id, entity.layer());
        self.slots[id.index() as usize].entity = Some(entity);
        id
    }

    /// Remove an entity. Stale handles are ignored.
    pub fn destroy(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self.live_slot_mut(id)?;
        let entity = slot.entity.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        self.unlink(id, entity.layer());
        if self.player == Some(id) {
            self.player = None;
        }
        log::debug!("Destroyed {} ({:?})", entity.name, id);
        Some(entity)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.entity.as_ref())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.live_slot_mut(id).and_then(|slot| slot.entity.as_mut())
    }

    fn live_slot_mut(&mut self, id: EntityId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.layers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Members of one layer, in insertion order
    pub fn layer(&self, layer: i32) -> &[EntityId] {
        self.layers.get(&layer).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-empty layers in ascending order
    pub fn layers(&self) -> impl Iterator<Item = (i32, &[EntityId])> {
        self.layers.iter().map(|(layer, ids)| (*layer, ids.as_slice()))
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Every live handle, layer by layer
    pub fn ids(&self) -> Vec<EntityId> {
        self.layers.values().flatten().copied().collect()
    }

    /// Positions of entities taking part in collisions
    pub fn positions(&self) -> BTreeMap<EntityId, Vec2> {
        self.entities()
            .filter(|e| e.behavior.is_collidable())
            .map(|e| (e.id, e.body.position()))
            .collect()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.layers.values().flatten().filter_map(|id| self.get(*id))
    }

    /// Point-in-time copy of every enabled entity for a renderer
    pub fn snapshot(&self) -> Vec<RenderItem> {
        self.entities()
            .filter(|e| e.is_enabled())
            .map(|e| RenderItem {
                id: e.id,
                name: e.name.clone(),
                position: e.body.position(),
                angle: e.body.transform.angle(),
                scale: e.body.transform.scale(),
                layer: e.layer(),
                shape: e.body.collider.shape().clone(),
                frame: e.body.current_frame(self.time),
            })
            .collect()
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Add the protected player ship at the bottom centre of the arena
    pub fn spawn_player(&mut self, assets: &dyn AssetCatalog) -> Result<EntityId, GeometryError> {
        let projectile = ProjectileTemplate::new(
            "player",
            self.settings.projectile_speed,
            assets.frames("player_shot").unwrap_or_default(),
        )?;
        let behavior = Behavior::player(PlayerBehavior::new(self.settings.player_lives, projectile));
        let spec = EntitySpec::new(
            "player",
            Vec2::new(ARENA_WIDTH / 2.0, 5.0),
            FACING_UP,
            ShapeSpec::Triangle {
                length: 3.0,
                width: 2.5,
            },
        )
        .with_frames("player_idle");
        let id = self.add(spec.build(behavior, assets)?);
        self.player = Some(id);
        log::info!("Player spawned with {} lives", self.settings.player_lives);
        Ok(id)
    }

    /// Take an entity out of its slot for exclusive mutation
    pub(crate) fn take(&mut self, id: EntityId) -> Option<Entity> {
        self.live_slot_mut(id)?.entity.take()
    }

    /// Return an entity taken with `take`, moving it between layer buckets
    /// if its layer changed meanwhile
    pub(crate) fn restore(&mut self, entity: Entity, previous_layer: i32) {
        let id = entity.id;
        let layer = entity.layer();
        let Some(slot) = self.live_slot_mut(id) else {
            log::warn!("Dropping {} returned with a stale handle", entity.name);
            return;
        };
        slot.entity = Some(entity);
        if layer != previous_layer {
            self.unlink(id, previous_layer);
            self.layers.entry(layer).or_default().push(id);
        }
    }

    fn unlink(&mut self, id: EntityId, layer: i32) {
        if let Some(members) = self.layers.get_mut(&layer) {
            members.retain(|member| *member != id);
            if members.is_empty() {
                self.layers.remove(&layer);
            }
        }
    }

    /// Behavior context over this world's services
    pub(crate) fn context<'a>(
        &'a mut self,
        input: &'a dyn InputSource,
        positions: &'a BTreeMap<EntityId, Vec2>,
    ) -> BehaviorContext<'a> {
        BehaviorContext {
            now: self.time,
            input,
            positions,
            timers: &mut self.timers,
            rng: &mut self.rng,
            events: &mut self.events,
            settings: &self.settings,
        }
    }
}
