//! Headless composition root for the simulation core.
//!
//! [`Simulation`] constructs one registry, ledger and monitor from a
//! [`SimConfig`] and hands them out by reference, replacing process-wide
//! singletons with explicit ownership. It also owns the scene's units: the
//! registry only observes them, so despawning a unit here destroys it.

use glam::Vec3;
use log::{debug, info, warn};
use serde::Serialize;

use crate::config::{SimConfig, UnitConfig};
use crate::events::SimEvent;
use crate::ledger::ResourceLedger;
use crate::monitor::{MonitorSources, ThresholdMonitor, TickReport};
use crate::registry::UnitRegistry;
use crate::unit::{EntityId, Unit, UnitHandle, UnitHooks, UnitKind};

/// Overall flow state; only a running simulation advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameState {
    Paused,
    Running,
    GameOver,
}

#[derive(Debug)]
pub struct Simulation {
    state: GameState,
    clock: f64,
    tick_count: u64,
    unit_config: UnitConfig,
    scene: Vec<UnitHandle>,
    // Pending events of units that left the scene before the next drain.
    departed: Vec<SimEvent>,
    registry: UnitRegistry,
    ledger: ResourceLedger,
    monitor: ThresholdMonitor,
}

impl Simulation {
    /// Build every component from `config` and activate the monitor.
    pub fn new(config: &SimConfig) -> Self {
        info!("initialising core systems");
        let ledger = ResourceLedger::new(&config.ledger);
        let registry = UnitRegistry::new(config.registry);
        let mut monitor = ThresholdMonitor::new(config.monitor.clone());
        monitor.initialize();
        info!("all core systems initialised");
        Self {
            state: GameState::Running,
            clock: 0.0,
            tick_count: 0,
            unit_config: config.unit,
            scene: Vec::new(),
            departed: Vec::new(),
            registry,
            ledger,
            monitor,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Seconds of simulated time advanced so far.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn registry(&self) -> &UnitRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut UnitRegistry {
        &mut self.registry
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut ResourceLedger {
        &mut self.ledger
    }

    pub fn monitor(&self) -> &ThresholdMonitor {
        &self.monitor
    }

    pub fn monitor_mut(&mut self) -> &mut ThresholdMonitor {
        &mut self.monitor
    }

    /// Returns `true` if the state actually changed.
    pub fn change_state(&mut self, state: GameState) -> bool {
        if self.state == state {
            return false;
        }
        info!("game state changed from {:?} to {state:?}", self.state);
        if state == GameState::GameOver {
            warn!("game over: simulation halted");
        }
        self.state = state;
        true
    }

    /// Create a unit with the configured stats, add it to the scene and register it.
    pub fn spawn_unit(&mut self, kind: UnitKind, position: Vec3) -> UnitHandle {
        self.spawn_with(Unit::new(kind, position, &self.unit_config))
    }

    pub fn spawn_unit_with_hooks(
        &mut self,
        kind: UnitKind,
        position: Vec3,
        hooks: impl UnitHooks + 'static,
    ) -> UnitHandle {
        self.spawn_with(Unit::new(kind, position, &self.unit_config).with_hooks(hooks))
    }

    fn spawn_with(&mut self, unit: Unit) -> UnitHandle {
        let handle = unit.spawn();
        if !self.registry.register(&handle) {
            warn!("spawned unit {} could not be registered", handle.borrow().id());
        }
        self.scene.push(handle.clone());
        handle
    }

    /// Remove a unit from the scene and the registry.
    ///
    /// Events the unit raised but nobody drained yet, such as its death, are
    /// still returned by the next [`Self::drain_events`]. The unit is destroyed
    /// once the caller drops any handles it still holds.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let mut removed = false;
        let departed = &mut self.departed;
        self.scene.retain(|unit| {
            let mut unit = unit.borrow_mut();
            if unit.id() != id {
                return true;
            }
            departed.extend(unit.events_mut().drain().map(SimEvent::from));
            removed = true;
            false
        });
        let unregistered = self.registry.unregister_id(id);
        if removed {
            debug!("unit {id} destroyed");
        }
        removed || unregistered
    }

    /// Advance the simulation by `elapsed` seconds.
    ///
    /// Units move first, then the monitor samples the resulting state.
    /// Nothing happens unless the game is running.
    pub fn step(&mut self, elapsed: f32) -> TickReport {
        if self.state != GameState::Running {
            return TickReport::default();
        }
        self.clock += f64::from(elapsed);
        self.tick_count += 1;

        self.registry.prune_dropped();
        self.registry.tick_all(elapsed);

        let sources = MonitorSources::new(Some(&self.ledger), Some(&self.registry));
        self.monitor.tick(self.clock, &sources)
    }

    /// Collect pending events from every component.
    ///
    /// Unit events come first: those of despawned units in removal order, then
    /// the scene's in scene order. Registry, ledger and monitor events follow.
    /// Order within each component is preserved.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        let mut events: Vec<SimEvent> = std::mem::take(&mut self.departed);
        for unit in &self.scene {
            events.extend(unit.borrow_mut().events_mut().drain().map(SimEvent::from));
        }
        events.extend(self.registry.events_mut().drain().map(SimEvent::from));
        events.extend(self.ledger.events_mut().drain().map(SimEvent::from));
        events.extend(self.monitor.events_mut().drain().map(SimEvent::from));
        events
    }

    /// Reset ledger and monitor and forget every unit, as on a level restart.
    ///
    /// Pending unit events are kept for the next [`Self::drain_events`].
    pub fn reset(&mut self) {
        self.registry.clear_all();
        for unit in self.scene.drain(..) {
            let mut unit = unit.borrow_mut();
            self.departed
                .extend(unit.events_mut().drain().map(SimEvent::from));
        }
        self.ledger.reset_to_defaults();
        self.monitor.reset_to_defaults();
        self.clock = 0.0;
        self.tick_count = 0;
        self.state = GameState::Running;
        info!("simulation reset");
    }
}
