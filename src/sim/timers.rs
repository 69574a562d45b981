//! Delayed actions
//!
//! Fire-and-forget effects scheduled against simulation time ("re-arm the
//! attack in 3s", "remove the wreck after the explosion"). The frame loop
//! drains due actions at the start of each tick. Actions cannot be
//! cancelled, so each one re-checks its guard when it fires.

use super::entity::EntityId;
use super::movement::MovementStrategy;

#[derive(Debug, Clone, PartialEq)]
pub enum DelayedAction {
    /// Retire an exploding entity
    Remove(EntityId),
    /// Allow an enemy to attack again
    RearmAttack(EntityId),
    /// Drop the player's post-hit invincibility
    EndInvincibility(EntityId),
    /// Swap a temporary zigzag override back for the prior movement
    RestoreMovement {
        entity: EntityId,
        strategy: Option<MovementStrategy>,
    },
}

impl DelayedAction {
    pub fn entity(&self) -> EntityId {
        match self {
            DelayedAction::Remove(id)
            | DelayedAction::RearmAttack(id)
            | DelayedAction::EndInvincibility(id) => *id,
            DelayedAction::RestoreMovement { entity, .. } => *entity,
        }
    }
}

#[derive(Debug, Clone)]
struct Scheduled {
    due: f32,
    seq: u64,
    action: DelayedAction,
}

/// Pending delayed actions ordered by due time, then scheduling order
#[derive(Debug, Clone, Default)]
pub struct Timers {
    pending: Vec<Scheduled>,
    next_seq: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire `delay` seconds after `now`
    pub fn after(&mut self, now: f32, delay: f32, action: DelayedAction) {
        self.schedule(now + delay.max(0.0), action);
    }

    pub fn schedule(&mut self, due: f32, action: DelayedAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled { due, seq, action });
    }

    /// Remove and return every action due at or before `now`
    pub fn take_due(&mut self, now: f32) -> Vec<DelayedAction> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due <= now);
        self.pending = pending;
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|s| s.action).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest pending due time
    pub fn next_due(&self) -> Option<f32> {
        self.pending.iter().map(|s| s.due).min_by(f32::total_cmp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_actions_fire_in_order() {
        let a = EntityId::new(0, 0);
        let b = EntityId::new(1, 0);
        let mut timers = Timers::new();
        timers.after(0.0, 2.0, DelayedAction::Remove(a));
        timers.after(0.0, 1.0, DelayedAction::RearmAttack(b));
        timers.after(0.0, 1.0, DelayedAction::EndInvincibility(a));
        assert_eq!(timers.next_due(), Some(1.0));

        assert!(timers.take_due(0.5).is_empty());
        let due = timers.take_due(1.0);
        assert_eq!(
            due,
            vec![DelayedAction::RearmAttack(b), DelayedAction::EndInvincibility(a)]
        );
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.take_due(10.0), vec![DelayedAction::Remove(a)]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_negative_delay_fires_immediately() {
        let mut timers = Timers::new();
        timers.after(3.0, -1.0, DelayedAction::Remove(EntityId::NULL));
        assert_eq!(timers.take_due(3.0).len(), 1);
    }
}
