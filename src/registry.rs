//! Registry of live units with command dispatch and spatial queries.
//!
//! The registry never owns a unit. It stores weak references in registration
//! order plus an index by [`EntityId`]; both always hold the same members.
//! Entries whose unit has been dropped by its owner are skipped by every
//! query and removed by [`UnitRegistry::prune_dropped`].
//!
//! Units must not be borrowed by the caller while a registry method that
//! touches them is running.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec3;
use hashbrown::HashMap;
use log::{debug, error, info, warn};
use ordered_float::OrderedFloat;
use thiserror::Error;

use crate::config::RegistryConfig;
use crate::events::{EventBus, RegistryEvent};
use crate::unit::{EntityId, MovementStatus, Unit, UnitHandle, UnitKind};

type UnitRef = Weak<RefCell<Unit>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
enum RegistryError {
    #[error("unit {0} is already registered")]
    AlreadyRegistered(EntityId),
    #[error("unit {0} is not registered")]
    NotRegistered(EntityId),
}

#[derive(Debug)]
struct Entry {
    id: EntityId,
    unit: UnitRef,
}

#[derive(Debug)]
pub struct UnitRegistry {
    config: RegistryConfig,
    units: Vec<Entry>,
    by_id: HashMap<EntityId, UnitRef>,
    events: EventBus<RegistryEvent>,
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl UnitRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        if config.use_pathfinding {
            warn!("pathfinding is not available; units will use direct movement");
        } else {
            debug!("pathfinding disabled in settings");
        }
        info!("unit registry initialised");
        Self {
            config,
            units: Vec::new(),
            by_id: HashMap::new(),
            events: EventBus::default(),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Always `false`: movement is direct-line only.
    pub fn is_pathfinding_available(&self) -> bool {
        false
    }

    pub fn events(&self) -> &EventBus<RegistryEvent> {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus<RegistryEvent> {
        &mut self.events
    }

    /// Number of registered entries, including any not yet pruned.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Start tracking `unit`. Fails if a unit with the same identity is
    /// already registered.
    #[must_use]
    pub fn register(&mut self, unit: &UnitHandle) -> bool {
        let id = unit.borrow().id();
        if self.by_id.contains_key(&id) {
            warn!("{}", RegistryError::AlreadyRegistered(id));
            return false;
        }
        let weak = Rc::downgrade(unit);
        self.by_id.insert(id, weak.clone());
        self.units.push(Entry { id, unit: weak });
        debug!("registered unit {id} (total: {})", self.units.len());
        self.events.emit(RegistryEvent::Registered { unit: id });
        true
    }

    #[must_use]
    pub fn unregister(&mut self, unit: &UnitHandle) -> bool {
        let id = unit.borrow().id();
        self.unregister_id(id)
    }

    /// Stop tracking the unit with identity `id`, even if it has been dropped.
    #[must_use]
    pub fn unregister_id(&mut self, id: EntityId) -> bool {
        if self.by_id.remove(&id).is_none() {
            warn!("{}", RegistryError::NotRegistered(id));
            return false;
        }
        self.units.retain(|entry| entry.id != id);
        debug!("unregistered unit {id} (total: {})", self.units.len());
        self.events.emit(RegistryEvent::Unregistered { unit: id });
        true
    }

    /// Order a registered unit to move to `target`.
    ///
    /// The registry-level movement started event is emitted before the unit
    /// is asked to move. If the unit refuses, a movement failed event follows
    /// and the unit's `false` is returned.
    #[must_use]
    pub fn dispatch_move(&mut self, unit: &UnitHandle, target: Vec3) -> bool {
        let id = unit.borrow().id();
        if !self.by_id.contains_key(&id) {
            error!("cannot move {}", RegistryError::NotRegistered(id));
            return false;
        }
        debug!("moving unit {id} to {target}");
        self.events
            .emit(RegistryEvent::MovementStarted { unit: id, target });

        let started = unit.borrow_mut().move_to(target);
        if started {
            debug!("unit {id} movement initiated");
        } else {
            warn!("unit {id} failed to start movement");
            self.events
                .emit(RegistryEvent::MovementFailed { unit: id, target });
        }
        started
    }

    /// Detached copy of the live units in registration order.
    pub fn get_all(&self) -> Vec<UnitHandle> {
        self.units
            .iter()
            .filter_map(|entry| entry.unit.upgrade())
            .collect()
    }

    pub fn get_by_id(&self, id: EntityId) -> Option<UnitHandle> {
        self.by_id.get(&id).and_then(Weak::upgrade)
    }

    /// Live units matching `predicate`, in registration order.
    pub fn get_of_type<P>(&self, predicate: P) -> Vec<UnitHandle>
    where
        P: Fn(&Unit) -> bool,
    {
        self.get_all()
            .into_iter()
            .filter(|unit| predicate(&unit.borrow()))
            .collect()
    }

    pub fn get_of_kind(&self, kind: UnitKind) -> Vec<UnitHandle> {
        self.get_of_type(|unit| unit.kind() == kind)
    }

    pub fn is_registered(&self, unit: &UnitHandle) -> bool {
        self.contains_id(unit.borrow().id())
    }

    pub fn contains_id(&self, id: EntityId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Closest live unit to `position`, optionally within `max_distance`.
    ///
    /// Linear scan; ties go to the earliest registered unit.
    pub fn get_nearest(&self, position: Vec3, max_distance: Option<f32>) -> Option<UnitHandle> {
        self.get_all()
            .into_iter()
            .map(|unit| {
                let distance = unit.borrow().distance_to(position);
                (unit, distance)
            })
            .filter(|(_, distance)| max_distance.map_or(true, |max| *distance <= max))
            .min_by_key(|(_, distance)| OrderedFloat(*distance))
            .map(|(unit, _)| unit)
    }

    /// Scale every registered unit's current speed by `multiplier`.
    pub fn update_all_speeds(&self, multiplier: f32) {
        for unit in self.get_all() {
            let mut unit = unit.borrow_mut();
            let speed = unit.move_speed() * multiplier;
            unit.update_speed(speed);
        }
        debug!("updated all unit speeds by multiplier {multiplier}");
    }

    pub fn reset_all_speeds(&self) {
        for unit in self.get_all() {
            unit.borrow_mut().reset_speed();
        }
        debug!("reset all unit speeds to default values");
    }

    /// Advance every registered unit and relay arrivals as registry events.
    pub fn tick_all(&mut self, elapsed: f32) {
        for unit in self.get_all() {
            let (id, status) = {
                let mut unit = unit.borrow_mut();
                (unit.id(), unit.tick(elapsed))
            };
            if let MovementStatus::Arrived(target) = status {
                self.events
                    .emit(RegistryEvent::MovementCompleted { unit: id, target });
            }
        }
    }

    /// Drop entries whose unit no longer exists, returning how many were removed.
    pub fn prune_dropped(&mut self) -> usize {
        let before = self.units.len();
        self.units.retain(|entry| entry.unit.strong_count() > 0);
        self.by_id.retain(|_, unit| unit.strong_count() > 0);
        let pruned = before - self.units.len();
        if pruned > 0 {
            debug!("pruned {pruned} dropped units");
        }
        pruned
    }

    /// Forget every unit, e.g. on scene teardown.
    pub fn clear_all(&mut self) {
        let count = self.units.len();
        self.units.clear();
        self.by_id.clear();
        info!("cleared {count} registered units");
    }
}
