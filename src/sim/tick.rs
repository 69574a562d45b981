//! Fixed timestep simulation tick
//!
//! One tick runs strictly in this order:
//! 1. delayed actions that have come due
//! 2. update pass: every enabled entity updates and may attack
//! 3. entities that wandered far outside the arena are retired
//! 4. collision pass against the positions the update pass produced
//! 5. spent entities are destroyed and the clock advances

use std::collections::BTreeMap;

use super::behavior::Hit;
use super::entity::{Entity, EntityId};
use super::state::{World, arena_bounds};
use super::timers::DelayedAction;
use crate::consts::ARENA_CULL_MARGIN;
use crate::platform::InputSource;

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &dyn InputSource, dt: f32) {
    for action in world.timers.take_due(world.time()) {
        apply_delayed(world, action);
    }

    update_pass(world, input);
    cull_outside_arena(world);
    collision_pass(world, input);

    let spent: Vec<EntityId> = world
        .entities()
        .filter(|e| e.behavior.is_spent())
        .map(|e| e.id)
        .collect();
    for id in spent {
        world.destroy(id);
    }

    world.advance_clock(dt);
}

/// Apply one delayed action if its guard still holds
fn apply_delayed(world: &mut World, action: DelayedAction) {
    let id = action.entity();
    let Some(entity) = world.get_mut(id) else {
        log::debug!("Dropping {action:?}: entity is gone");
        return;
    };

    match action {
        DelayedAction::Remove(_) => {
            if entity.behavior.is_destroyed() {
                entity.behavior.retire();
                world.destroy(id);
            }
        }
        DelayedAction::RearmAttack(_) => {
            if entity.behavior.is_collidable()
                && let Some(enemy) = entity.behavior.as_enemy_mut()
            {
                enemy.arm();
            }
        }
        DelayedAction::EndInvincibility(_) => {
            if let Some(player) = entity.behavior.as_player_mut() {
                player.end_invincibility();
            }
        }
        DelayedAction::RestoreMovement { strategy, .. } => {
            let collidable = entity.behavior.is_collidable();
            let Some(enemy) = entity.behavior.as_enemy_mut() else {
                return;
            };
            // a later assignment replaced the override
            if !collidable || !enemy.movement().is_some_and(|m| m.is_zigzag()) {
                log::debug!("Dropping movement restore for {id:?}");
                return;
            }
            enemy.set_movement(strategy);
            entity.body.halt();
        }
    }
}

fn update_pass(world: &mut World, input: &dyn InputSource) {
    let positions = world.positions();
    let mut spawned: Vec<Entity> = Vec::new();

    for id in world.ids() {
        let Some(mut entity) = world.take(id) else {
            continue;
        };
        let layer = entity.layer();
        if entity.is_enabled() {
            let mut ctx = world.context(input, &positions);
            entity.behavior.update(&mut entity.body, &mut ctx);
            match entity.behavior.attack(&mut entity.body, &mut ctx) {
                Ok(Some(projectile)) => spawned.push(projectile),
                Ok(None) => {}
                Err(err) => log::warn!("{} ({id:?}) attack failed: {err}", entity.name),
            }
        }
        world.restore(entity, layer);
    }

    for projectile in spawned {
        world.add(projectile);
    }
}

fn cull_outside_arena(world: &mut World) {
    let bounds = arena_bounds().expanded(ARENA_CULL_MARGIN);
    let outside: Vec<EntityId> = world
        .entities()
        .filter(|e| e.behavior.is_collidable() && !e.behavior.is_protected())
        .filter(|e| !bounds.contains(e.body.position()))
        .map(|e| e.id)
        .collect();
    for id in outside {
        if let Some(entity) = world.destroy(id) {
            log::debug!("{} ({id:?}) left the arena", entity.name);
        }
    }
}

/// Every collidable entity's overlaps, intra-layer only, skipping pairs
/// that share a name
fn find_hits(world: &World) -> BTreeMap<EntityId, Vec<Hit>> {
    let mut hits: BTreeMap<EntityId, Vec<Hit>> = BTreeMap::new();
    for (_, members) in world.layers() {
        let live: Vec<&Entity> = members
            .iter()
            .filter_map(|id| world.get(*id))
            .filter(|e| e.behavior.is_collidable())
            .collect();
        for (i, a) in live.iter().enumerate() {
            for b in &live[i + 1..] {
                if a.name == b.name || !a.body.collider.intersects(&b.body.collider) {
                    continue;
                }
                hits.entry(a.id).or_default().push(Hit {
                    id: b.id,
                    protected: b.behavior.is_protected(),
                });
                hits.entry(b.id).or_default().push(Hit {
                    id: a.id,
                    protected: a.behavior.is_protected(),
                });
            }
        }
    }
    hits
}

fn collision_pass(world: &mut World, input: &dyn InputSource) {
    let hits = find_hits(world);
    if hits.is_empty() {
        return;
    }
    let positions = world.positions();

    for (id, entity_hits) in hits {
        let Some(mut entity) = world.take(id) else {
            continue;
        };
        let layer = entity.layer();
        let disabled = {
            let mut ctx = world.context(input, &positions);
            entity.behavior.on_collision(&mut entity.body, &entity_hits, &mut ctx)
        };
        world.restore(entity, layer);

        for other in disabled {
            let Some(mut target) = world.take(other) else {
                continue;
            };
            let layer = target.layer();
            {
                let mut ctx = world.context(input, &positions);
                target.behavior.disable(&mut target.body, &mut ctx);
            }
            world.restore(target, layer);
        }
    }
}
