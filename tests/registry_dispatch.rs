//! Registration, dispatch and spatial queries on the unit registry.
use std::rc::Rc;

use approx::assert_relative_eq;
use glam::Vec3;
use rstest::{fixture, rstest};
use test_utils::{spawn_at, RecordingObserver};
use warrens::{RegistryConfig, RegistryEvent, UnitHandle, UnitKind, UnitRegistry};

#[fixture]
fn registry() -> UnitRegistry {
    UnitRegistry::new(RegistryConfig::default())
}

fn register_all(registry: &mut UnitRegistry, units: &[UnitHandle]) {
    for unit in units {
        assert!(registry.register(unit));
    }
}

#[rstest]
fn second_registration_fails_without_duplicating(mut registry: UnitRegistry) {
    let unit = spawn_at(UnitKind::Worker, Vec3::ZERO);
    assert!(registry.register(&unit));
    assert!(!registry.register(&unit));
    let all = registry.get_all();
    assert_eq!(all.len(), 1);
    assert!(Rc::ptr_eq(&all[0], &unit));
}

#[rstest]
fn nearest_of_five_two_eight_is_two(mut registry: UnitRegistry) {
    assert!(registry.get_nearest(Vec3::ZERO, None).is_none());
    let units: Vec<_> = [5.0, 2.0, 8.0]
        .into_iter()
        .map(|d| spawn_at(UnitKind::Warrior, Vec3::new(0.0, 0.0, d)))
        .collect();
    register_all(&mut registry, &units);

    let nearest = registry.get_nearest(Vec3::ZERO, None).expect("three units");
    assert!(Rc::ptr_eq(&nearest, &units[1]));
    let bounded = registry.get_nearest(Vec3::ZERO, Some(6.0)).expect("within 6");
    assert!(Rc::ptr_eq(&bounded, &units[1]));
}

#[rstest]
fn nearest_ignores_units_beyond_max_distance(mut registry: UnitRegistry) {
    let far = spawn_at(UnitKind::Raider, Vec3::new(50.0, 0.0, 0.0));
    register_all(&mut registry, &[far.clone()]);
    assert!(registry.get_nearest(Vec3::ZERO, None).is_some());
    assert!(registry.get_nearest(Vec3::ZERO, Some(10.0)).is_none());
}

#[rstest]
fn dispatch_then_tick_reports_completion(mut registry: UnitRegistry) {
    let unit = spawn_at(UnitKind::Worker, Vec3::ZERO);
    register_all(&mut registry, &[unit.clone()]);
    let recorder = RecordingObserver::attach(registry.events_mut());
    let target = Vec3::new(1.0, 0.0, 0.0);

    assert!(registry.dispatch_move(&unit, target));
    for _ in 0..10 {
        registry.tick_all(0.1);
    }
    let id = unit.borrow().id();
    assert_eq!(
        recorder.events(),
        vec![
            RegistryEvent::MovementStarted { unit: id, target },
            RegistryEvent::MovementCompleted { unit: id, target },
        ]
    );
}

#[rstest]
fn dispatch_to_unknown_unit_leaves_it_idle(mut registry: UnitRegistry) {
    let stranger = spawn_at(UnitKind::Raider, Vec3::ZERO);
    assert!(!registry.dispatch_move(&stranger, Vec3::X));
    assert!(!stranger.borrow().is_moving());
}

#[rstest]
fn lookups_by_identity(mut registry: UnitRegistry) {
    let unit = spawn_at(UnitKind::Worker, Vec3::ZERO);
    let id = unit.borrow().id();
    register_all(&mut registry, &[unit.clone()]);

    let found = registry.get_by_id(id).expect("registered");
    assert!(Rc::ptr_eq(&found, &unit));
    assert!(registry.unregister_id(id));
    assert!(registry.get_by_id(id).is_none());
    assert!(!registry.unregister(&unit));
}

#[rstest]
fn speed_multiplier_compounds_on_current_speed(mut registry: UnitRegistry) {
    let units = [
        spawn_at(UnitKind::Worker, Vec3::ZERO),
        spawn_at(UnitKind::Warrior, Vec3::ZERO),
    ];
    register_all(&mut registry, &units);
    registry.update_all_speeds(2.0);
    registry.update_all_speeds(0.5);
    registry.update_all_speeds(3.0);
    for unit in &units {
        assert_relative_eq!(unit.borrow().move_speed(), 15.0);
    }
    registry.reset_all_speeds();
    for unit in &units {
        assert_relative_eq!(unit.borrow().move_speed(), 5.0);
    }
}

#[rstest]
fn type_query_filters_by_capability(mut registry: UnitRegistry) {
    let units = [
        spawn_at(UnitKind::Worker, Vec3::ZERO),
        spawn_at(UnitKind::Warrior, Vec3::ZERO),
        spawn_at(UnitKind::Worker, Vec3::ZERO),
    ];
    register_all(&mut registry, &units);
    assert!(!units[1].borrow_mut().take_damage(10.0));

    let wounded = registry.get_of_type(|unit| unit.health() < unit.max_health());
    assert_eq!(wounded.len(), 1);
    assert!(Rc::ptr_eq(&wounded[0], &units[1]));
    assert_eq!(registry.get_of_kind(UnitKind::Worker).len(), 2);
}
