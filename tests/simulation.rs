//! End-to-end behaviour of the composed simulation.
use glam::Vec3;
use rstest::{fixture, rstest};
use warrens::{
    GameState, LedgerEvent, MonitorEvent, RegistryEvent, SimConfig, SimEvent, Simulation,
    UnitEvent, UnitKind,
};

#[fixture]
fn sim() -> Simulation {
    let config = SimConfig::from_toml_str(
        r#"
        [monitor]
        spawning_enabled = false
        population_threshold = 2
        "#,
    )
    .expect("valid config");
    Simulation::new(&config)
}

#[rstest]
fn events_are_gathered_in_component_order(mut sim: Simulation) {
    let unit = sim.spawn_unit(UnitKind::Worker, Vec3::ZERO);
    let id = unit.borrow().id();
    assert!(sim.ledger_mut().add(warrens::ResourceKind::Wood, 1));

    let events = sim.drain_events();
    assert!(matches!(events[0], SimEvent::Unit(UnitEvent::Spawned { unit }) if unit == id));
    assert!(matches!(events[1], SimEvent::Registry(RegistryEvent::Registered { unit }) if unit == id));
    assert!(matches!(events[2], SimEvent::Ledger(LedgerEvent::Changed { .. })));
    assert!(matches!(events[3], SimEvent::Ledger(LedgerEvent::Added { .. })));
    assert!(sim.drain_events().is_empty());
}

#[rstest]
fn overpopulation_raids_every_interval(mut sim: Simulation) {
    for i in 0..3 {
        sim.spawn_unit(UnitKind::Worker, Vec3::new(i as f32, 0.0, 0.0));
    }
    sim.drain_events();

    let mut raid_times = Vec::new();
    for _ in 0..60 {
        let _ = sim.step(0.25);
        for event in sim.drain_events() {
            if let SimEvent::Monitor(MonitorEvent::RaidTriggered { at, .. }) = event {
                raid_times.push(at);
            }
        }
    }
    assert_eq!(raid_times, vec![0.25, 5.25, 10.25]);
}

#[rstest]
fn dropped_units_stop_counting(mut sim: Simulation) {
    let ids: Vec<_> = (0..3)
        .map(|_| sim.spawn_unit(UnitKind::Raider, Vec3::ZERO).borrow().id())
        .collect();
    assert_eq!(sim.registry().len(), 3);
    assert!(sim.despawn(ids[0]));
    let report = sim.step(0.1);
    assert!(report.evaluated);
    assert!(report.raids.is_empty());
}

#[rstest]
fn game_over_freezes_the_world(mut sim: Simulation) {
    let unit = sim.spawn_unit(UnitKind::Warrior, Vec3::ZERO);
    assert!(sim.registry_mut().dispatch_move(&unit, Vec3::X * 10.0));
    let _ = sim.step(0.5);
    let position = unit.borrow().position();

    assert!(sim.change_state(GameState::GameOver));
    let _ = sim.step(0.5);
    assert_eq!(unit.borrow().position(), position);
    assert_eq!(sim.state(), GameState::GameOver);
}

#[rstest]
fn events_serialise_as_tagged_json(mut sim: Simulation) {
    sim.spawn_unit(UnitKind::Worker, Vec3::ZERO);
    let lines: Vec<String> = sim
        .drain_events()
        .iter()
        .map(|event| serde_json::to_string(event).expect("serialise"))
        .collect();
    assert!(lines[0].contains(r#""source":"unit""#));
    assert!(lines[0].contains(r#""event":"spawned""#));
    assert!(lines[1].contains(r#""event":"registered""#));
}

#[rstest]
fn saturated_ledger_still_triggers_raid() {
    let config = SimConfig::from_toml_str(
        r#"
        [ledger]
        max_amount = 9223372036854775807
        wood = 9223372036854775807
        stone = 9223372036854775807

        [monitor]
        spawning_enabled = false
        "#,
    )
    .expect("valid config");
    let mut sim = Simulation::new(&config);
    let report = sim.step(0.1);
    assert_eq!(report.raids, vec![warrens::RaidReason::ResourceHoarding]);
    let value = sim.drain_events().into_iter().find_map(|event| match event {
        SimEvent::Monitor(MonitorEvent::RaidTriggered { value, .. }) => Some(value),
        _ => None,
    });
    assert_eq!(value, Some(i64::MAX));
}

#[rstest]
fn death_survives_despawn(mut sim: Simulation) {
    let unit = sim.spawn_unit(UnitKind::Raider, Vec3::ZERO);
    let id = unit.borrow().id();
    sim.drain_events();

    assert!(unit.borrow_mut().take_damage(1000.0));
    assert!(sim.despawn(id));
    let deaths = sim
        .drain_events()
        .into_iter()
        .filter(|event| matches!(event, SimEvent::Unit(UnitEvent::Died { unit }) if *unit == id))
        .count();
    assert_eq!(deaths, 1);
}
