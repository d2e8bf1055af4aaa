//! Server configuration tests.

use capstan_server::{Privilege, ServerConfig};

#[test]
fn parse_minimal_config() {
    let toml = r#"
[rpc]
host = "0.0.0.0"
port = 7979
"#;
    let config = ServerConfig::from_toml(toml).unwrap();
    assert!(config.rpc.enabled);
    assert_eq!(config.bind_address(), "0.0.0.0:7979");
    assert_eq!(config.console.prompt.as_str(), "cap> ");
    assert!(config.accounts.is_empty());
}

#[test]
fn parse_full_config() {
    let toml = r#"
[rpc]
enabled = false
host = "10.0.0.1"
port = 9000

[console]
prompt = "world> "

[[accounts]]
identity = "admin"
secret = "sesame"
privilege = "admin"

[[accounts]]
identity = "helper"
secret = "hunter2"
privilege = "moderator"
"#;
    let config = ServerConfig::from_toml(toml).unwrap();
    assert!(!config.rpc.enabled);
    assert_eq!(config.bind_address(), "10.0.0.1:9000");
    assert_eq!(config.console.prompt.as_str(), "world> ");
    assert_eq!(config.accounts.len(), 2);
    assert_eq!(config.accounts[0].identity.as_str(), "admin");
    assert_eq!(config.accounts[0].privilege, Privilege::Admin);
    assert_eq!(config.accounts[1].privilege, Privilege::Moderator);
}

#[test]
fn defaults_when_empty() {
    let config = ServerConfig::from_toml("").unwrap();
    assert!(config.rpc.enabled);
    assert_eq!(config.bind_address(), "127.0.0.1:7878");
}

#[test]
fn account_privilege_defaults_to_user() {
    let toml = r#"
[[accounts]]
identity = "nobody"
secret = "pw"
"#;
    let config = ServerConfig::from_toml(toml).unwrap();
    assert_eq!(config.accounts[0].privilege, Privilege::User);
}

#[test]
fn secrets_expand_from_environment() {
    unsafe { std::env::set_var("CAPSTAN_TEST_SECRET", "from-env") };
    let toml = r#"
[[accounts]]
identity = "admin"
secret = "${CAPSTAN_TEST_SECRET}"
privilege = "admin"
"#;
    let config = ServerConfig::from_toml(toml).unwrap();
    assert_eq!(config.accounts[0].secret, "from-env");
}

#[test]
fn unknown_environment_variable_expands_empty() {
    let toml = r#"
[[accounts]]
identity = "admin"
secret = "${CAPSTAN_TEST_DOES_NOT_EXIST}"
"#;
    let config = ServerConfig::from_toml(toml).unwrap();
    assert_eq!(config.accounts[0].secret, "");
}

#[test]
fn load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capstand.toml");
    std::fs::write(&path, "[rpc]\nport = 4242\n").unwrap();

    let config = ServerConfig::load(&path).unwrap();
    assert_eq!(config.rpc.port, 4242);
}
