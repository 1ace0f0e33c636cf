//! Integration tests for configuration loading

use basis_bot::config::{Config, ExecutionMode, PositionMode};
use rust_decimal_macros::dec;

#[test]
fn test_example_config_is_valid() {
    let config: Config = toml::from_str(include_str!("../config.toml.example")).unwrap();

    assert_eq!(config.trading.base_asset, "BTC");
    assert_eq!(config.trading.quote_asset, "USDT");
    assert_eq!(config.trading.quantity, dec!(0.001));
    assert_eq!(config.trading.basis_threshold, dec!(25.0));
    assert_eq!(config.trading.poll_interval_secs, 30);
    assert_eq!(config.trading.position_mode, PositionMode::Oneway);
    assert_eq!(config.execution.mode, ExecutionMode::Paper);
    assert_eq!(config.exchange.request_timeout_secs, 5);
}

#[test]
fn test_config_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
            [trading]
            base_asset = "ETH"
            quote_asset = "USDT"
            quantity = 0.01
            basis_threshold = 3.0
        "#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.trading.base_asset, "ETH");
    assert_eq!(config.trading.spot_symbol(), "ETHUSDT");
}

#[test]
fn test_config_load_rejects_invalid_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[trading]\nbase_asset = ").unwrap();

    assert!(Config::load(&path).is_err());
}

#[test]
fn test_config_load_rejects_missing_required_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[trading]\nbase_asset = \"BTC\"\n").unwrap();

    assert!(Config::load(&path).is_err());
}
