use caseload_config::{ConfigManager, RunConfig};
use rust_decimal_macros::dec;
use tempfile::tempdir;

#[test]
fn default_config_has_sane_policy_values() {
    let cfg = RunConfig::default();

    assert_eq!(cfg.baseline_hours_per_month, dec!(160));
    assert_eq!(cfg.max_failure_rate, 1.0);
    assert!(!cfg.currency.is_empty());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let mut cfg = RunConfig::default();
    cfg.baseline_hours_per_month = dec!(140);
    cfg.utilization_goal_hours = Some(dec!(75.8));
    cfg.compensation_by_month.insert("2023-06".into(), dec!(4250));

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded.baseline_hours_per_month, dec!(140));
    assert_eq!(loaded.utilization_goal_hours, Some(dec!(75.8)));
    assert_eq!(loaded.compensation_by_month.get("2023-06"), Some(&dec!(4250)));
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("nope.json"));
    let loaded = manager.load().expect("defaults");
    assert_eq!(loaded.baseline_hours_per_month, dec!(160));
}
