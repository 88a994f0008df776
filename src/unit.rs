//! Simulated units with health, direct-line movement and lifecycle events.
//!
//! A [`Unit`] owns all of its state. Game code shares it through a
//! [`UnitHandle`]; the registry keeps only weak references for lookup and
//! dispatch, so dropping the last handle destroys the unit regardless of
//! whether it is dead.
//!
//! Every operation that can fail reports it by returning `false` and logging a
//! diagnostic. Nothing here panics.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec3;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::UnitConfig;
use crate::events::{EventBus, UnitEvent};
use crate::vector_math::{direction_to, distance};

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity token assigned to every unit at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    fn next() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Unit archetype used by type queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Worker,
    Warrior,
    Raider,
}

/// Read-only view of a unit handed to [`UnitHooks`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitSnapshot {
    pub id: EntityId,
    pub kind: UnitKind,
    pub position: Vec3,
    pub health: f32,
    pub max_health: f32,
}

/// Per-variant behaviour run at the edges of a unit's lifecycle.
///
/// Both hooks default to doing nothing.
#[cfg_attr(test, mockall::automock)]
pub trait UnitHooks {
    /// Called once from [`Unit::spawn`], after the spawned event.
    fn on_spawn(&mut self, _unit: &UnitSnapshot) {}

    /// Called once per live-to-dead transition, after the died event.
    fn on_death(&mut self, _unit: &UnitSnapshot) {}
}

struct NoHooks;

impl UnitHooks for NoHooks {}

/// Outcome of advancing a unit by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovementStatus {
    /// Dead, or no movement target set.
    Idle,
    Moving,
    /// The unit reached this target during the tick and stopped.
    Arrived(Vec3),
}

/// Shared ownership handle to a unit.
pub type UnitHandle = Rc<RefCell<Unit>>;

pub struct Unit {
    id: EntityId,
    kind: UnitKind,
    max_health: f32,
    health: f32,
    move_speed: f32,
    default_move_speed: f32,
    stopping_distance: f32,
    position: Vec3,
    facing: Vec3,
    // `Some` exactly while the unit is moving.
    move_target: Option<Vec3>,
    hooks: Box<dyn UnitHooks>,
    events: EventBus<UnitEvent>,
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("health", &self.health)
            .field("max_health", &self.max_health)
            .field("move_speed", &self.move_speed)
            .field("position", &self.position)
            .field("move_target", &self.move_target)
            .finish_non_exhaustive()
    }
}

impl Unit {
    /// Create a unit at full health moving at its default speed.
    pub fn new(kind: UnitKind, position: Vec3, config: &UnitConfig) -> Self {
        let max_health = config.max_health.max(0.0);
        let speed = config.move_speed.max(0.0);
        let unit = Self {
            id: EntityId::next(),
            kind,
            max_health,
            health: max_health,
            move_speed: speed,
            default_move_speed: speed,
            stopping_distance: config.stopping_distance.max(0.0),
            position,
            facing: Vec3::Z,
            move_target: None,
            hooks: Box::new(NoHooks),
            events: EventBus::default(),
        };
        debug!(
            "{:?} {} initialised with {} health, {} speed",
            unit.kind, unit.id, unit.max_health, unit.move_speed
        );
        unit
    }

    /// Replace the default no-op lifecycle hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: impl UnitHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    /// Announce the unit and wrap it in a shareable handle.
    pub fn spawn(mut self) -> UnitHandle {
        self.events.emit(UnitEvent::Spawned { unit: self.id });
        let snapshot = self.snapshot();
        self.hooks.on_spawn(&snapshot);
        debug!("{:?} {} spawned at {}", self.kind, self.id, self.position);
        Rc::new(RefCell::new(self))
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    /// Current health as a fraction of maximum, or `0.0` when the maximum is zero.
    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    pub fn default_move_speed(&self) -> f32 {
        self.default_move_speed
    }

    pub fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit vector the unit last moved along.
    pub fn facing(&self) -> Vec3 {
        self.facing
    }

    pub fn move_target(&self) -> Option<Vec3> {
        self.move_target
    }

    pub fn is_moving(&self) -> bool {
        self.move_target.is_some()
    }

    pub fn distance_to(&self, point: Vec3) -> f32 {
        distance(self.position, point)
    }

    pub fn distance_to_unit(&self, other: &Unit) -> f32 {
        distance(self.position, other.position)
    }

    pub fn snapshot(&self) -> UnitSnapshot {
        UnitSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            health: self.health,
            max_health: self.max_health,
        }
    }

    pub fn events(&self) -> &EventBus<UnitEvent> {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus<UnitEvent> {
        &mut self.events
    }

    /// Start moving towards `target`, replacing any current target.
    ///
    /// Returns `false` without changing state when the unit is dead.
    #[must_use]
    pub fn move_to(&mut self, target: Vec3) -> bool {
        if !self.is_alive() {
            warn!("{:?} {} is dead and cannot move", self.kind, self.id);
            return false;
        }
        self.move_target = Some(target);
        debug!("{:?} {} moving to {target}", self.kind, self.id);
        self.events.emit(UnitEvent::MovementStarted {
            unit: self.id,
            target,
        });
        true
    }

    pub fn stop_movement(&mut self) {
        if self.move_target.take().is_some() {
            debug!("{:?} {} stopped moving", self.kind, self.id);
        }
    }

    /// Advance movement by `elapsed` seconds along a straight line.
    pub fn tick(&mut self, elapsed: f32) -> MovementStatus {
        let Some(target) = self.move_target else {
            return MovementStatus::Idle;
        };
        if !self.is_alive() {
            return MovementStatus::Idle;
        }

        if self.distance_to(target) <= self.stopping_distance {
            self.move_target = None;
            debug!("{:?} {} reached target at {target}", self.kind, self.id);
            self.events.emit(UnitEvent::MovementCompleted {
                unit: self.id,
                target,
            });
            return MovementStatus::Arrived(target);
        }

        let direction = direction_to(self.position, target);
        self.position += direction * self.move_speed * elapsed;
        // A zero direction has no defined orientation; keep the old facing.
        if direction != Vec3::ZERO {
            self.facing = direction;
        }
        MovementStatus::Moving
    }

    /// Overwrite the current speed, clamped to be non-negative.
    pub fn update_speed(&mut self, new_speed: f32) {
        let old = self.move_speed;
        self.move_speed = new_speed.max(0.0);
        debug!(
            "{:?} {} speed changed from {old} to {}",
            self.kind, self.id, self.move_speed
        );
    }

    pub fn reset_speed(&mut self) {
        let old = self.move_speed;
        self.move_speed = self.default_move_speed;
        debug!(
            "{:?} {} speed reset from {old} to {}",
            self.kind, self.id, self.move_speed
        );
    }

    /// Apply damage, returning `true` only if this call killed the unit.
    ///
    /// Negative amounts count as zero damage.
    #[must_use]
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            warn!("{:?} {} is already dead; damage ignored", self.kind, self.id);
            return false;
        }
        let old = self.health;
        self.health = (self.health - amount.max(0.0)).clamp(0.0, self.max_health);
        debug!(
            "{:?} {} took {amount} damage. Health: {old} -> {}",
            self.kind, self.id, self.health
        );
        self.emit_health_changed();

        if self.health <= 0.0 {
            self.die();
            return true;
        }
        false
    }

    pub fn heal(&mut self, amount: f32) {
        if !self.is_alive() {
            warn!("{:?} {} is dead and cannot be healed", self.kind, self.id);
            return;
        }
        let old = self.health;
        self.health = (self.health + amount.max(0.0)).clamp(0.0, self.max_health);
        debug!(
            "{:?} {} healed {amount}. Health: {old} -> {}",
            self.kind, self.id, self.health
        );
        self.emit_health_changed();
    }

    /// Set health directly, clamped to `[0, max_health]`.
    ///
    /// This is the only way back from the dead state. Health changed is always
    /// emitted, even when the value does not move.
    pub fn set_health(&mut self, value: f32) {
        if value.is_nan() {
            warn!("{:?} {} ignored NaN health", self.kind, self.id);
            return;
        }
        let old = self.health;
        self.health = value.clamp(0.0, self.max_health);
        debug!(
            "{:?} {} health set from {old} to {}",
            self.kind, self.id, self.health
        );
        self.emit_health_changed();

        if self.health <= 0.0 && old > 0.0 {
            self.die();
        }
    }

    fn emit_health_changed(&mut self) {
        self.events.emit(UnitEvent::HealthChanged {
            unit: self.id,
            health: self.health,
        });
    }

    fn die(&mut self) {
        info!("{:?} {} has died", self.kind, self.id);
        self.stop_movement();
        self.events.emit(UnitEvent::Died { unit: self.id });
        let snapshot = self.snapshot();
        self.hooks.on_death(&snapshot);
    }
}
