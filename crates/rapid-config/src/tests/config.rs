use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, eq, err, ok};
use serial_test::serial;

// =========================================================================
// Happy Path Tests
// =========================================================================

#[test]
#[serial]
fn given_no_config_file_when_load_then_ok_with_defaults() {
    // Given
    let (_temp, _guard) = setup_config_dir();

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
    let config = result.unwrap();
    assert_that!(config.server.port, eq(8000));
    assert_that!(config.logging.dir.as_str(), eq("logs"));
    assert_that!(config.logging.max_backups, eq(7));
    assert_that!(config.rate_limit.burst, eq(300));
}

#[test]
#[serial]
fn given_no_config_file_when_load_and_validate_then_ok() {
    // Given
    let (_temp, _guard) = setup_config_dir();

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
#[serial]
fn given_valid_toml_file_when_load_then_uses_toml_values() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        r#"
            [server]
            port = 9000

            [logging]
            level = "debug"
            dir = "var/log"
            max_size_mb = 64
            compress = false

            [rate_limit]
            per_second = 10
            burst = 20
        "#,
    )
    .unwrap();

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
    let config = result.unwrap();
    assert_that!(config.server.port, eq(9000));
    assert_that!(*config.logging.level, eq(log::LevelFilter::Debug));
    assert_that!(config.logging.dir.as_str(), eq("var/log"));
    assert_that!(config.logging.max_size_mb, eq(64));
    assert_that!(config.logging.compress, eq(false));
    assert_that!(config.rate_limit.per_second, eq(10));
    assert_that!(config.rate_limit.burst, eq(20));
}

#[test]
#[serial]
fn given_env_var_and_toml_when_load_then_env_var_overrides_toml() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        r#"
            [server]
            port = 9000
        "#,
    )
    .unwrap();
    let _port = EnvGuard::set("RAPID_SERVER_PORT", "9100");
    let _dir = EnvGuard::set("RAPID_LOG_DIR", "env-logs");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.server.port, eq(9100));
    assert_that!(config.logging.dir.as_str(), eq("env-logs"));
}

// =========================================================================
// Error Path Tests
// =========================================================================

#[test]
#[serial]
fn given_malformed_toml_when_load_then_toml_error() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(temp.path().join("config.toml"), "[server\nport = oops").unwrap();

    // When
    let result = Config::load();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_log_dir_with_parent_traversal_when_validate_then_err() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let mut config = Config::load().unwrap();
    config.logging.dir = String::from("../outside");

    // When
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_config_when_bind_addr_then_host_and_port_joined() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let mut config = Config::load().unwrap();
    config.server.host = String::from("127.0.0.1");
    config.server.port = 8080;

    // When / Then
    assert_that!(config.bind_addr().as_str(), eq("127.0.0.1:8080"));
}
