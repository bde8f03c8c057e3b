//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary with config and credentials isolated from the host
fn voice_transfer_bin(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("voice-transfer").expect("binary should build");
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path())
        .env_remove("VOICE_TRANSFER_BASE_URL")
        .env_remove("VOICE_TRANSFER_USERNAME")
        .env_remove("VOICE_TRANSFER_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_output() {
    let home = TempDir::new().unwrap();
    voice_transfer_bin(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("accounts"))
        .stdout(predicate::str::contains("transfer"))
        .stdout(predicate::str::contains("register-voice"))
        .stdout(predicate::str::contains("--base-url"));
}

#[test]
fn version_output() {
    let home = TempDir::new().unwrap();
    voice_transfer_bin(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("voice-transfer"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn transfer_help_lists_options() {
    let home = TempDir::new().unwrap();
    voice_transfer_bin(&home)
        .args(["transfer", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--audio"))
        .stdout(predicate::str::contains("--from"))
        .stdout(predicate::str::contains("--memo"))
        .stdout(predicate::str::contains("--yes"));
}

#[test]
fn parse_prints_draft() {
    let home = TempDir::new().unwrap();
    voice_transfer_bin(&home)
        .args(["parse", "김철수에게 5만원 보내줘"])
        .assert()
        .success()
        .stdout(predicate::str::contains("recipient: 김철수"))
        .stdout(predicate::str::contains("50,000원"));
}

#[test]
fn parse_amount_first_phrase() {
    let home = TempDir::new().unwrap();
    voice_transfer_bin(&home)
        .args(["parse", "10만원을 홍길동에게 보내줘"])
        .assert()
        .success()
        .stdout(predicate::str::contains("recipient: 홍길동"))
        .stdout(predicate::str::contains("100,000원"));
}

#[test]
fn parse_rejects_unrelated_text() {
    let home = TempDir::new().unwrap();
    voice_transfer_bin(&home)
        .args(["parse", "오늘 날씨 어때"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("recipient"));
}

#[test]
fn missing_subcommand_is_usage_error() {
    let home = TempDir::new().unwrap();
    voice_transfer_bin(&home).assert().code(2);
}

#[test]
fn config_path_command() {
    let home = TempDir::new().unwrap();
    voice_transfer_bin(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("voice-transfer"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_set_then_get() {
    let home = TempDir::new().unwrap();
    voice_transfer_bin(&home)
        .args(["config", "set", "base_url", "https://bank.example.com/api"])
        .assert()
        .success();

    voice_transfer_bin(&home)
        .args(["config", "get", "base_url"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://bank.example.com/api"));
}

#[test]
fn config_password_is_masked() {
    let home = TempDir::new().unwrap();
    voice_transfer_bin(&home)
        .args(["config", "set", "password", "topsecret"])
        .assert()
        .success();

    voice_transfer_bin(&home)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("to*******"))
        .stdout(predicate::str::contains("topsecret").not());
}

#[test]
fn config_init_twice_fails() {
    let home = TempDir::new().unwrap();
    voice_transfer_bin(&home).args(["config", "init"]).assert().success();
    voice_transfer_bin(&home)
        .args(["config", "init"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn password_is_never_read_from_piped_stdin() {
    let home = TempDir::new().unwrap();
    voice_transfer_bin(&home)
        .env("VOICE_TRANSFER_USERNAME", "kim")
        .args(["accounts", "--base-url", "http://127.0.0.1:9"])
        .write_stdin("secret\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read password"))
        .stderr(predicate::str::contains("Login request failed").not())
        .stderr(predicate::str::contains("secret").not())
        .stdout(predicate::str::contains("secret").not());
}
