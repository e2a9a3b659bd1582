//! Configuration loading from the real process environment
//!
//! These tests mutate environment variables, so they run serially.

#![cfg(feature = "ssr")]

#[macro_use]
mod common;

use assert_matches::assert_matches;
use serial_test::serial;
use std::io::Write;

use poetree::backend::server::{create_app, ConfigError, ServerConfig, StoreLocation};

const VARS: [&str; 7] = [
    "POETREE_CONFIG",
    "PORT",
    "BIND_ADDRESS",
    "DATABASE_URL",
    "STATIC_DIR",
    "MAX_TREE_DEPTH",
    "RUST_LOG",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_from_env_reads_config_file_then_env() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = 8080\nmax_tree_depth = 64\nlog_filter = \"debug\"").unwrap();

    std::env::set_var("POETREE_CONFIG", file.path());
    std::env::set_var("MAX_TREE_DEPTH", "128");

    let config = assert_ok!(ServerConfig::from_env());
    assert_eq!(config.port, 8080);
    assert_eq!(config.max_tree_depth, 128);
    assert_eq!(config.log_filter, "debug");
    assert_eq!(config.store_location().unwrap(), StoreLocation::Memory);

    clear_env();
}

#[test]
#[serial]
fn test_missing_config_file_is_an_error() {
    clear_env();
    std::env::set_var("POETREE_CONFIG", "/definitely/not/here.toml");
    assert!(ServerConfig::from_env().is_err());
    clear_env();
}

#[test]
#[serial]
fn test_bad_config_file_names_the_file() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = \"not a number\"").unwrap();
    std::env::set_var("POETREE_CONFIG", file.path());

    let err = ServerConfig::from_env().unwrap_err();
    assert_matches!(err, ConfigError::File { ref path, .. } if path.as_path() == file.path());
    assert_contains!(err.to_string(), &file.path().display().to_string());

    clear_env();
}

#[tokio::test]
#[serial]
async fn test_app_over_sqlite_file() {
    clear_env();
    let dir = tempfile::TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("nested").join("app.db").display());
    std::env::set_var("DATABASE_URL", &url);

    let config = assert_ok!(ServerConfig::from_env());
    assert_eq!(config.store_location().unwrap(), StoreLocation::Sqlite(url));
    let _app = assert_ok!(create_app(config).await);
    assert!(dir.path().join("nested").join("app.db").exists());

    clear_env();
}
