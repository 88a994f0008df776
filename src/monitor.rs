//! Time-gated raid and spawn triggers.
//!
//! The monitor polls its collaborators instead of reacting to their events:
//! every call to [`ThresholdMonitor::tick`] checks two independent timers and
//! samples the ledger and registry only when the raid timer has elapsed.
//! Collaborators are passed in per tick; a missing one reads as zero.

use std::fmt;

use log::{debug, info, warn};
use serde::Serialize;

use crate::config::MonitorConfig;
use crate::events::{EventBus, MonitorEvent};
use crate::ledger::{ResourceKind, ResourceLedger};
use crate::registry::UnitRegistry;

/// Anything that can report aggregate resource holdings.
#[cfg_attr(test, mockall::automock)]
pub trait ResourceSource {
    fn total_of(&self, kinds: &[ResourceKind]) -> i64;
}

/// Anything that can report the current population.
#[cfg_attr(test, mockall::automock)]
pub trait PopulationSource {
    fn population(&self) -> usize;
}

impl ResourceSource for ResourceLedger {
    fn total_of(&self, kinds: &[ResourceKind]) -> i64 {
        ResourceLedger::total_of(self, kinds)
    }
}

impl PopulationSource for UnitRegistry {
    fn population(&self) -> usize {
        self.len()
    }
}

/// Collaborators sampled during one tick.
#[derive(Clone, Copy, Default)]
pub struct MonitorSources<'a> {
    pub resources: Option<&'a dyn ResourceSource>,
    pub population: Option<&'a dyn PopulationSource>,
}

impl<'a> MonitorSources<'a> {
    pub fn new(
        resources: Option<&'a dyn ResourceSource>,
        population: Option<&'a dyn PopulationSource>,
    ) -> Self {
        Self {
            resources,
            population,
        }
    }

    /// No collaborators wired: every metric reads as zero.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Why a raid was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RaidReason {
    ResourceHoarding,
    PopulationGrowth,
}

impl fmt::Display for RaidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RaidReason::ResourceHoarding => "Resource Hoarding",
            RaidReason::PopulationGrowth => "Population Growth",
        })
    }
}

/// What happened during one [`ThresholdMonitor::tick`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Thresholds were sampled this tick.
    pub evaluated: bool,
    pub raids: Vec<RaidReason>,
    pub spawned: bool,
}

#[derive(Debug)]
pub struct ThresholdMonitor {
    config: MonitorConfig,
    active: bool,
    last_raid_check: Option<f64>,
    last_spawn: Option<f64>,
    enemy_count: u32,
    events: EventBus<MonitorEvent>,
}

impl ThresholdMonitor {
    /// Create an inactive monitor; call [`Self::initialize`] to start it.
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            active: false,
            last_raid_check: None,
            last_spawn: None,
            enemy_count: 0,
            events: EventBus::default(),
        }
    }

    /// Activate the monitor. Calling it again has no effect.
    pub fn initialize(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        self.enemy_count = 0;
        info!(
            "threshold monitor active: raid when population > {} or resources > {}",
            self.config.population_threshold, self.config.resource_threshold
        );
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn enemy_count(&self) -> u32 {
        self.enemy_count
    }

    pub fn population_threshold(&self) -> usize {
        self.config.population_threshold
    }

    pub fn resource_threshold(&self) -> i64 {
        self.config.resource_threshold
    }

    pub fn is_spawning_enabled(&self) -> bool {
        self.config.spawning_enabled
    }

    pub fn events(&self) -> &EventBus<MonitorEvent> {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus<MonitorEvent> {
        &mut self.events
    }

    pub fn set_spawning(&mut self, enabled: bool) {
        self.config.spawning_enabled = enabled;
        info!(
            "enemy spawning {}",
            if enabled { "enabled" } else { "disabled" }
        );
    }

    /// Replace both raid thresholds; each is raised to at least 1.
    pub fn set_thresholds(&mut self, population: usize, resources: i64) {
        self.config.population_threshold = population.max(1);
        self.config.resource_threshold = resources.max(1);
        info!(
            "raid thresholds updated: population > {}, resources > {}",
            self.config.population_threshold, self.config.resource_threshold
        );
    }

    /// Clear counters and timers. Thresholds and activation are kept.
    pub fn reset_to_defaults(&mut self) {
        self.enemy_count = 0;
        self.last_raid_check = None;
        self.last_spawn = None;
        info!("threshold monitor reset");
    }

    /// Run both timers against the clock value `now`, in seconds.
    ///
    /// Does nothing while inactive. The first tick after activation or reset
    /// evaluates thresholds immediately; later ones wait a full interval. The
    /// spawn timer starts counting at that first tick, so the first enemy
    /// arrives one full spawn interval later.
    pub fn tick(&mut self, now: f64, sources: &MonitorSources<'_>) -> TickReport {
        let mut report = TickReport::default();
        if !self.active {
            return report;
        }
        if Self::due(self.last_raid_check, now, self.config.raid_check_interval) {
            self.last_raid_check = Some(now);
            report.evaluated = true;
            report.raids = self.check_raid_triggers(now, sources);
        }
        let spawn_due = match self.last_spawn {
            Some(last) => now - last >= self.config.spawn_interval,
            None => {
                self.last_spawn = Some(now);
                false
            }
        };
        if self.config.spawning_enabled && spawn_due {
            self.last_spawn = Some(now);
            self.enemy_count += 1;
            debug!("enemy spawned (total: {})", self.enemy_count);
            self.events.emit(MonitorEvent::Spawned {
                count: self.enemy_count,
                at: now,
            });
            report.spawned = true;
        }
        report
    }

    fn due(last: Option<f64>, now: f64, interval: f64) -> bool {
        last.map_or(true, |last| now - last >= interval)
    }

    fn check_raid_triggers(&mut self, now: f64, sources: &MonitorSources<'_>) -> Vec<RaidReason> {
        let mut raids = Vec::new();

        let total = sources
            .resources
            .map_or(0, |source| source.total_of(&self.config.counted_resources));
        if total > self.config.resource_threshold {
            let threshold = self.config.resource_threshold;
            info!("resource threshold exceeded: {total} > {threshold}");
            self.trigger_raid(RaidReason::ResourceHoarding, total, threshold, now);
            raids.push(RaidReason::ResourceHoarding);
        }

        let population = sources
            .population
            .map_or(0, |source| source.population());
        if population > self.config.population_threshold {
            let threshold = self.config.population_threshold;
            info!("population threshold exceeded: {population} > {threshold}");
            self.trigger_raid(
                RaidReason::PopulationGrowth,
                i64::try_from(population).unwrap_or(i64::MAX),
                i64::try_from(threshold).unwrap_or(i64::MAX),
                now,
            );
            raids.push(RaidReason::PopulationGrowth);
        }
        raids
    }

    fn trigger_raid(&mut self, reason: RaidReason, value: i64, threshold: i64, now: f64) {
        warn!("RAID TRIGGERED: {reason}");
        self.events.emit(MonitorEvent::RaidTriggered {
            reason,
            value,
            threshold,
            at: now,
        });
    }
}
