//! Notification surface of the simulation core.
//!
//! Each stateful component owns an [`EventBus`] for its own payload type.
//! Emitting an event first calls every subscribed observer in subscription
//! order and then appends the event to a pending inbox that polling consumers
//! drain once per frame. Emission order within a component is preserved in
//! both paths.

use std::fmt;

use glam::Vec3;
use serde::Serialize;

use crate::ledger::ResourceKind;
use crate::monitor::RaidReason;
use crate::unit::EntityId;

/// Lifecycle and movement notifications raised by a single unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UnitEvent {
    Spawned { unit: EntityId },
    Died { unit: EntityId },
    HealthChanged { unit: EntityId, health: f32 },
    MovementStarted { unit: EntityId, target: Vec3 },
    MovementCompleted { unit: EntityId, target: Vec3 },
}

/// Notifications raised by the unit registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RegistryEvent {
    Registered { unit: EntityId },
    Unregistered { unit: EntityId },
    MovementStarted { unit: EntityId, target: Vec3 },
    MovementCompleted { unit: EntityId, target: Vec3 },
    MovementFailed { unit: EntityId, target: Vec3 },
}

/// Notifications raised by the resource ledger.
///
/// A successful add or remove always emits `Changed` before the more specific
/// `Added` or `Removed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    Changed {
        kind: ResourceKind,
        total: i64,
    },
    Added {
        kind: ResourceKind,
        amount: i64,
        total: i64,
    },
    Removed {
        kind: ResourceKind,
        amount: i64,
        total: i64,
    },
}

/// Notifications raised by the threshold monitor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MonitorEvent {
    RaidTriggered {
        reason: RaidReason,
        /// Measured value that crossed the threshold.
        value: i64,
        threshold: i64,
        at: f64,
    },
    Spawned {
        count: u32,
        at: f64,
    },
}

/// Any event produced by the core, tagged with the component that raised it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum SimEvent {
    Unit(UnitEvent),
    Registry(RegistryEvent),
    Ledger(LedgerEvent),
    Monitor(MonitorEvent),
}

impl From<UnitEvent> for SimEvent {
    fn from(event: UnitEvent) -> Self {
        Self::Unit(event)
    }
}

impl From<RegistryEvent> for SimEvent {
    fn from(event: RegistryEvent) -> Self {
        Self::Registry(event)
    }
}

impl From<LedgerEvent> for SimEvent {
    fn from(event: LedgerEvent) -> Self {
        Self::Ledger(event)
    }
}

impl From<MonitorEvent> for SimEvent {
    fn from(event: MonitorEvent) -> Self {
        Self::Monitor(event)
    }
}

type Observer<E> = Box<dyn FnMut(&E)>;

/// Observer list plus a drainable inbox of pending events.
///
/// Observers run synchronously inside the emitting call. They must not call
/// back into the component that owns the bus.
///
/// The inbox keeps every event until [`EventBus::drain`] is called.
/// [`crate::simulation::Simulation`] drains its components once per frame;
/// a component used on its own must either be drained by its owner or have
/// queueing switched off with [`EventBus::set_queueing`], in which case only
/// observers see its events.
pub struct EventBus<E> {
    observers: Vec<Observer<E>>,
    pending: Vec<E>,
    queueing: bool,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            observers: Vec::new(),
            pending: Vec::new(),
            queueing: true,
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .field("pending", &self.pending)
            .field("queueing", &self.queueing)
            .finish()
    }
}

impl<E> EventBus<E> {
    /// Register an observer called for every subsequent event.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&E) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn emit(&mut self, event: E) {
        for observer in &mut self.observers {
            observer(&event);
        }
        if self.queueing {
            self.pending.push(event);
        }
    }

    /// Turn the pending inbox on or off. Switching it off discards anything
    /// still pending.
    pub fn set_queueing(&mut self, enabled: bool) {
        self.queueing = enabled;
        if !enabled {
            self.pending.clear();
        }
    }

    pub fn is_queueing(&self) -> bool {
        self.queueing
    }

    /// Events emitted since the last drain, oldest first.
    pub fn pending(&self) -> &[E] {
        &self.pending
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, E> {
        self.pending.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}
