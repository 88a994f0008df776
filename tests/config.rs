//! Loading configuration from TOML.
use rstest::rstest;
use warrens::{ConfigError, ResourceKind, SimConfig};

#[rstest]
fn partial_documents_keep_other_defaults() {
    let config = SimConfig::from_toml_str(
        r#"
        [unit]
        move_speed = 7.5

        [monitor]
        counted_resources = ["Wood", "Magic"]
        "#,
    )
    .expect("valid config");
    assert_eq!(config.unit.move_speed, 7.5);
    assert_eq!(config.unit.max_health, 100.0);
    assert_eq!(
        config.monitor.counted_resources,
        vec![ResourceKind::Wood, ResourceKind::Magic]
    );
    assert_eq!(config.ledger.max_amount, 9999);
}

#[rstest]
#[case("[ledger]\nwood = 20000\n", "ledger")]
#[case("[ledger]\nmax_amount = 0\n", "ledger.max_amount")]
#[case("[unit]\nmax_health = 0.0\n", "unit.max_health")]
#[case("[monitor]\nraid_check_interval = 0.0\n", "monitor.raid_check_interval")]
fn invalid_values_are_rejected(#[case] text: &str, #[case] expected_field: &str) {
    match SimConfig::from_toml_str(text) {
        Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected_field),
        other => panic!("expected invalid `{expected_field}`, got {other:?}"),
    }
}

#[rstest]
fn malformed_toml_is_a_parse_error() {
    assert!(matches!(
        SimConfig::from_toml_str("[ledger\nwood = "),
        Err(ConfigError::Parse(_))
    ));
}

#[rstest]
fn missing_file_is_an_io_error() {
    let err = SimConfig::load("/nonexistent/warrens.toml").expect_err("file is missing");
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("warrens.toml"));
}
