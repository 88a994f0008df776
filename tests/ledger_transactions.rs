//! Transaction and notification behaviour of the resource ledger.
use rstest::rstest;
use test_utils::{assert_events_eq, default_ledger, ledger_with, RecordingObserver};
use warrens::{LedgerEvent, ResourceCosts, ResourceKind};

#[rstest]
fn partially_insufficient_costs_leave_ledger_untouched() {
    let mut ledger = ledger_with(100, 50, 0, 0);
    let recorder = RecordingObserver::attach(ledger.events_mut());
    let costs = ResourceCosts::from([(ResourceKind::Wood, 50), (ResourceKind::Stone, 1000)]);

    assert!(!ledger.try_consume(&costs));
    assert_eq!(ledger.wood(), 100);
    assert_eq!(ledger.stone(), 50);
    assert!(recorder.is_empty());
}

#[rstest]
fn affordable_costs_are_consumed_together() {
    let mut ledger = ledger_with(100, 50, 0, 0);
    let costs = ResourceCosts::from([(ResourceKind::Wood, 50), (ResourceKind::Stone, 20)]);

    assert!(ledger.try_consume(&costs));
    assert_eq!(ledger.wood(), 50);
    assert_eq!(ledger.stone(), 30);
}

#[rstest]
#[case(ResourceCosts::new())]
#[case(ResourceCosts::from([(ResourceKind::Wood, 10), (ResourceKind::Food, 0)]))]
#[case(ResourceCosts::from([(ResourceKind::Magic, -5)]))]
fn malformed_costs_are_rejected(#[case] costs: ResourceCosts) {
    let mut ledger = default_ledger();
    let before = ledger.get_all();
    assert!(!ledger.try_consume(&costs));
    assert_eq!(ledger.get_all(), before);
}

#[rstest]
#[case(1)]
#[case(9_000)]
#[case(i64::MAX)]
fn add_never_exceeds_cap(#[case] amount: i64) {
    let mut ledger = default_ledger();
    let old = ledger.wood();
    assert!(ledger.add(ResourceKind::Wood, amount));
    let new = ledger.wood();
    assert!(new <= ledger.max_amount());

    let added: Vec<_> = ledger
        .events_mut()
        .drain()
        .filter_map(|event| match event {
            LedgerEvent::Added { amount, total, .. } => Some((amount, total)),
            _ => None,
        })
        .collect();
    assert_eq!(added, vec![(new - old, new)]);
}

#[rstest]
fn changed_precedes_added_and_removed() {
    let mut ledger = default_ledger();
    let recorder = RecordingObserver::attach(ledger.events_mut());
    assert!(ledger.add(ResourceKind::Food, 5));
    assert!(ledger.remove(ResourceKind::Food, 105));

    assert_events_eq(
        &recorder.events(),
        &[
            LedgerEvent::Changed {
                kind: ResourceKind::Food,
                total: 205,
            },
            LedgerEvent::Added {
                kind: ResourceKind::Food,
                amount: 5,
                total: 205,
            },
            LedgerEvent::Changed {
                kind: ResourceKind::Food,
                total: 100,
            },
            LedgerEvent::Removed {
                kind: ResourceKind::Food,
                amount: 105,
                total: 100,
            },
        ],
    );
}

#[rstest]
fn remove_is_all_or_nothing() {
    let mut ledger = default_ledger();
    assert!(!ledger.remove(ResourceKind::Magic, 26));
    assert_eq!(ledger.magic(), 25);
    assert!(ledger.remove(ResourceKind::Magic, 25));
    assert_eq!(ledger.magic(), 0);
    assert!(!ledger.has(ResourceKind::Magic, 1));
}

#[rstest]
fn set_always_notifies_and_clamps() {
    let mut ledger = default_ledger();
    let recorder = RecordingObserver::attach(ledger.events_mut());
    ledger.set(ResourceKind::Stone, 50);
    ledger.set(ResourceKind::Stone, -10);
    ledger.set(ResourceKind::Stone, 1_000_000);
    assert_eq!(recorder.len(), 3);
    assert_eq!(ledger.stone(), ledger.max_amount());
}

#[rstest]
fn reset_restores_starting_amounts_with_one_event_per_kind() {
    let mut ledger = default_ledger();
    assert!(ledger.remove(ResourceKind::Wood, 100));
    ledger.set(ResourceKind::Magic, 7);
    let recorder = RecordingObserver::attach(ledger.events_mut());

    ledger.reset_to_defaults();
    assert_eq!(recorder.len(), ResourceKind::ALL.len());
    for kind in ResourceKind::ALL {
        assert_eq!(ledger.get(kind), ledger.initial(kind));
    }
}

#[rstest]
#[case("wood", ResourceKind::Wood)]
#[case(" Stone ", ResourceKind::Stone)]
#[case("MAGIC", ResourceKind::Magic)]
fn resource_names_parse(#[case] name: &str, #[case] expected: ResourceKind) {
    assert_eq!(name.parse::<ResourceKind>(), Ok(expected));
}

#[rstest]
fn unknown_resource_name_is_an_error() {
    let err = "gold".parse::<ResourceKind>().expect_err("gold is not a resource");
    assert_eq!(err.0, "gold");
}
