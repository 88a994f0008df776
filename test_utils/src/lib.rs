//! Utility helpers for tests.
//!
//! Fixtures build units and ledgers with known stats; [`RecordingObserver`]
//! captures events from any [`warrens::EventBus`].
pub mod fixtures;
pub mod recording;

pub use fixtures::{default_ledger, ledger_with, spawn_at, unit_at};
pub use recording::RecordingObserver;

/// Assert that two event lists match, printing both on failure.
///
/// # Panics
/// Panics with both sequences if they differ.
pub fn assert_events_eq<E>(actual: &[E], expected: &[E])
where
    E: PartialEq + std::fmt::Debug,
{
    assert!(
        actual == expected,
        "event mismatch\n  actual:   {actual:?}\n  expected: {expected:?}"
    );
}
