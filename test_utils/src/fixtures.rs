//! Convenience constructors for units and ledgers used in tests.

use glam::Vec3;
use warrens::{LedgerConfig, ResourceLedger, Unit, UnitConfig, UnitHandle, UnitKind};

/// Create an unspawned unit with default stats at `position`.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use test_utils::unit_at;
/// use warrens::UnitKind;
/// let unit = unit_at(UnitKind::Worker, Vec3::X);
/// assert_eq!(unit.position(), Vec3::X);
/// ```
pub fn unit_at(kind: UnitKind, position: Vec3) -> Unit {
    Unit::new(kind, position, &UnitConfig::default())
}

/// Spawn a unit with default stats and discard its spawned event.
pub fn spawn_at(kind: UnitKind, position: Vec3) -> UnitHandle {
    let handle = unit_at(kind, position).spawn();
    handle.borrow_mut().events_mut().drain().for_each(drop);
    handle
}

pub fn default_ledger() -> ResourceLedger {
    ResourceLedger::new(&LedgerConfig::default())
}

/// Ledger starting with the given amounts and the default cap.
///
/// # Examples
/// ```
/// use test_utils::ledger_with;
/// let ledger = ledger_with(1, 2, 3, 4);
/// assert_eq!(ledger.magic(), 4);
/// ```
pub fn ledger_with(wood: i64, stone: i64, food: i64, magic: i64) -> ResourceLedger {
    ResourceLedger::new(&LedgerConfig {
        wood,
        stone,
        food,
        magic,
        ..LedgerConfig::default()
    })
}
