//! Resource ledger with all-or-nothing multi-resource transactions.
//!
//! The ledger holds one non-negative amount per [`ResourceKind`], each capped
//! at a shared maximum. Amounts change only through the ledger's own methods,
//! which is what keeps [`ResourceLedger::try_consume`] atomic without locking:
//! nothing can run between its check phase and its commit phase.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::LedgerConfig;
use crate::events::{EventBus, LedgerEvent};

/// Resource categories tracked by the ledger.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ResourceKind {
    Wood,
    Stone,
    Food,
    Magic,
}

const KIND_COUNT: usize = 4;

impl ResourceKind {
    pub const ALL: [ResourceKind; KIND_COUNT] = [
        ResourceKind::Wood,
        ResourceKind::Stone,
        ResourceKind::Food,
        ResourceKind::Magic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Wood => "Wood",
            ResourceKind::Stone => "Stone",
            ResourceKind::Food => "Food",
            ResourceKind::Magic => "Magic",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raised when a string names no [`ResourceKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown resource kind `{0}`")]
pub struct UnknownResource(pub String);

impl FromStr for ResourceKind {
    type Err = UnknownResource;

    /// Parses a resource name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownResource(s.to_owned()))
    }
}

/// Amounts to consume in one transaction, keyed by kind.
pub type ResourceCosts = BTreeMap<ResourceKind, i64>;

/// Copy of every kind's amount at one point in time.
pub type ResourceSnapshot = BTreeMap<ResourceKind, i64>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
enum LedgerError {
    #[error("attempted to {op} non-positive amount ({amount}) of {kind}")]
    NonPositive {
        op: &'static str,
        kind: ResourceKind,
        amount: i64,
    },
    #[error("insufficient {kind} to remove {requested} (available: {available})")]
    Insufficient {
        kind: ResourceKind,
        requested: i64,
        available: i64,
    },
    #[error("attempted to consume resources with an empty cost set")]
    EmptyCosts,
}

/// One amount per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Amounts {
    wood: i64,
    stone: i64,
    food: i64,
    magic: i64,
}

impl Amounts {
    fn from_fn(mut amount_of: impl FnMut(ResourceKind) -> i64) -> Self {
        Self {
            wood: amount_of(ResourceKind::Wood),
            stone: amount_of(ResourceKind::Stone),
            food: amount_of(ResourceKind::Food),
            magic: amount_of(ResourceKind::Magic),
        }
    }

    fn get(&self, kind: ResourceKind) -> i64 {
        match kind {
            ResourceKind::Wood => self.wood,
            ResourceKind::Stone => self.stone,
            ResourceKind::Food => self.food,
            ResourceKind::Magic => self.magic,
        }
    }

    fn slot_mut(&mut self, kind: ResourceKind) -> &mut i64 {
        match kind {
            ResourceKind::Wood => &mut self.wood,
            ResourceKind::Stone => &mut self.stone,
            ResourceKind::Food => &mut self.food,
            ResourceKind::Magic => &mut self.magic,
        }
    }
}

#[derive(Debug)]
pub struct ResourceLedger {
    amounts: Amounts,
    initial: Amounts,
    max_amount: i64,
    events: EventBus<LedgerEvent>,
}

impl ResourceLedger {
    /// Create a ledger holding the configured starting amounts.
    ///
    /// Starting amounts outside `[0, max_amount]` are clamped.
    pub fn new(config: &LedgerConfig) -> Self {
        let max_amount = config.max_amount.max(0);
        let initial = Amounts::from_fn(|kind| config.initial(kind).clamp(0, max_amount));
        info!(
            "resource ledger initialised: Wood {}, Stone {}, Food {}, Magic {} (cap {max_amount})",
            initial.wood, initial.stone, initial.food, initial.magic
        );
        Self {
            amounts: initial,
            initial,
            max_amount,
            events: EventBus::default(),
        }
    }

    pub fn max_amount(&self) -> i64 {
        self.max_amount
    }

    /// Starting amount for `kind`, restored by [`Self::reset_to_defaults`].
    pub fn initial(&self, kind: ResourceKind) -> i64 {
        self.initial.get(kind)
    }

    pub fn events(&self) -> &EventBus<LedgerEvent> {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus<LedgerEvent> {
        &mut self.events
    }

    /// Add `amount` of `kind`, capped at the maximum.
    ///
    /// The added event reports the amount actually stored, which is less than
    /// `amount` when the cap was hit.
    #[must_use]
    pub fn add(&mut self, kind: ResourceKind, amount: i64) -> bool {
        if let Err(err) = Self::check_positive("add", kind, amount) {
            warn!("{err}");
            return false;
        }
        let slot = self.amounts.slot_mut(kind);
        let old = *slot;
        let new = old.saturating_add(amount).min(self.max_amount);
        let actual_added = new - old;
        *slot = new;
        debug!("added {actual_added} {kind} (total: {new})");

        self.events.emit(LedgerEvent::Changed { kind, total: new });
        self.events.emit(LedgerEvent::Added {
            kind,
            amount: actual_added,
            total: new,
        });
        true
    }

    /// Remove exactly `amount` of `kind`, or nothing if there is not enough.
    #[must_use]
    pub fn remove(&mut self, kind: ResourceKind, amount: i64) -> bool {
        match self.checked_remove(kind, amount) {
            Ok(()) => true,
            Err(err) => {
                warn!("{err}");
                false
            }
        }
    }

    fn checked_remove(&mut self, kind: ResourceKind, amount: i64) -> Result<(), LedgerError> {
        Self::check_positive("remove", kind, amount)?;
        let slot = self.amounts.slot_mut(kind);
        let available = *slot;
        if available < amount {
            return Err(LedgerError::Insufficient {
                kind,
                requested: amount,
                available,
            });
        }
        let new = available - amount;
        *slot = new;
        debug!("removed {amount} {kind} (total: {new})");

        self.events.emit(LedgerEvent::Changed { kind, total: new });
        self.events.emit(LedgerEvent::Removed {
            kind,
            amount,
            total: new,
        });
        Ok(())
    }

    fn check_positive(
        op: &'static str,
        kind: ResourceKind,
        amount: i64,
    ) -> Result<(), LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::NonPositive { op, kind, amount });
        }
        Ok(())
    }

    pub fn get(&self, kind: ResourceKind) -> i64 {
        self.amounts.get(kind)
    }

    pub fn has(&self, kind: ResourceKind, amount: i64) -> bool {
        self.get(kind) >= amount
    }

    pub fn wood(&self) -> i64 {
        self.get(ResourceKind::Wood)
    }

    pub fn stone(&self) -> i64 {
        self.get(ResourceKind::Stone)
    }

    pub fn food(&self) -> i64 {
        self.get(ResourceKind::Food)
    }

    pub fn magic(&self) -> i64 {
        self.get(ResourceKind::Magic)
    }

    /// Sum of the amounts held for `kinds`, saturating at `i64::MAX`.
    pub fn total_of(&self, kinds: &[ResourceKind]) -> i64 {
        kinds
            .iter()
            .fold(0_i64, |total, kind| total.saturating_add(self.get(*kind)))
    }

    /// Consume every entry of `costs`, or none of them.
    ///
    /// All entries are validated before anything is removed; if any entry is
    /// non-positive or unaffordable the ledger is left untouched.
    ///
    /// # Examples
    /// ```
    /// use warrens::config::LedgerConfig;
    /// use warrens::ledger::{ResourceCosts, ResourceKind, ResourceLedger};
    ///
    /// let mut ledger = ResourceLedger::new(&LedgerConfig::default());
    /// let costs = ResourceCosts::from([(ResourceKind::Wood, 50), (ResourceKind::Stone, 1000)]);
    /// assert!(!ledger.try_consume(&costs));
    /// assert_eq!(ledger.wood(), 100);
    /// ```
    #[must_use]
    pub fn try_consume(&mut self, costs: &ResourceCosts) -> bool {
        if let Err(err) = self.check_costs(costs) {
            warn!("{err}");
            return false;
        }
        for (&kind, &amount) in costs {
            if let Err(err) = self.checked_remove(kind, amount) {
                // Unreachable while this ledger is the only writer.
                warn!("{err}");
                return false;
            }
        }
        debug!("consumed {} resource kinds", costs.len());
        true
    }

    fn check_costs(&self, costs: &ResourceCosts) -> Result<(), LedgerError> {
        if costs.is_empty() {
            return Err(LedgerError::EmptyCosts);
        }
        for (&kind, &amount) in costs {
            Self::check_positive("consume", kind, amount)?;
            if !self.has(kind, amount) {
                return Err(LedgerError::Insufficient {
                    kind,
                    requested: amount,
                    available: self.get(kind),
                });
            }
        }
        Ok(())
    }

    /// Overwrite the amount of `kind`, clamped to `[0, max_amount]`.
    ///
    /// Always emits a changed event, even when the stored value is unchanged.
    pub fn set(&mut self, kind: ResourceKind, amount: i64) {
        let clamped = amount.clamp(0, self.max_amount);
        let old = std::mem::replace(self.amounts.slot_mut(kind), clamped);
        debug!("set {kind} from {old} to {clamped}");
        self.events.emit(LedgerEvent::Changed {
            kind,
            total: clamped,
        });
    }

    pub fn get_all(&self) -> ResourceSnapshot {
        ResourceKind::ALL
            .into_iter()
            .map(|kind| (kind, self.get(kind)))
            .collect()
    }

    /// Restore every kind to its starting amount, emitting one changed event per kind.
    pub fn reset_to_defaults(&mut self) {
        self.amounts = self.initial;
        info!("resources reset to default values");
        for kind in ResourceKind::ALL {
            self.events.emit(LedgerEvent::Changed {
                kind,
                total: self.get(kind),
            });
        }
    }
}
