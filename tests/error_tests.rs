//! Error scenario integration tests

use std::process::Command;

use tempfile::TempDir;

fn voice_transfer_bin(config_home: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_voice-transfer"));
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path())
        .env_remove("VOICE_TRANSFER_BASE_URL")
        .env_remove("VOICE_TRANSFER_USERNAME")
        .env_remove("VOICE_TRANSFER_PASSWORD");
    cmd
}

#[test]
fn missing_username_error() {
    let home = TempDir::new().unwrap();
    let output = voice_transfer_bin(&home)
        .args(["accounts", "--base-url", "http://127.0.0.1:9"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("username"),
        "Expected error about missing username, got: {}",
        stderr
    );
}

#[test]
fn unsupported_audio_extension() {
    let home = TempDir::new().unwrap();
    let output = voice_transfer_bin(&home)
        .args(["transfer", "엄마에게 1만원", "--audio", "memo.txt", "--yes"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported audio file"));
}

#[test]
fn missing_audio_file() {
    let home = TempDir::new().unwrap();
    let output = voice_transfer_bin(&home)
        .args(["register-voice", "--audio", "/nonexistent/voice.m4a"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read"));
}

#[test]
fn unreachable_server_is_reported() {
    let home = TempDir::new().unwrap();
    let output = voice_transfer_bin(&home)
        .env("VOICE_TRANSFER_USERNAME", "kim")
        .env("VOICE_TRANSFER_PASSWORD", "pw")
        .args(["accounts", "--base-url", "http://127.0.0.1:9"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Login request failed"));
}

#[test]
fn config_get_unknown_key() {
    let home = TempDir::new().unwrap();
    let output = voice_transfer_bin(&home)
        .args(["config", "get", "unknown_key"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown key"));
}

#[test]
fn config_set_invalid_timeout() {
    let home = TempDir::new().unwrap();
    let output = voice_transfer_bin(&home)
        .args(["config", "set", "timeout_secs", "0"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("timeout_secs"));
}

#[test]
fn config_set_invalid_base_url() {
    let home = TempDir::new().unwrap();
    let output = voice_transfer_bin(&home)
        .args(["config", "set", "base_url", "ftp://bank"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("http://"));
}

#[test]
fn malformed_config_file_is_reported() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("voice-transfer");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "timeout_secs = [").unwrap();

    let output = voice_transfer_bin(&home)
        .args(["parse", "김철수에게 5만원"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Ignoring config file"),
        "Expected a warning about the config file, got: {}",
        stderr
    );
    assert!(stderr.contains("config.toml"));
}
