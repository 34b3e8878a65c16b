use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("opnsense-dns").unwrap();
    cmd.env_clear()
        .env("OPNSENSE_DNS_CONFIG", config_dir.path().join("config.toml"))
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn test_negotiate_json() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["negotiate", "-o", "json", "--domain-filter", "Example.com."])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""include": ["#).and(predicate::str::contains("\"example.com\"")));
}

#[test]
fn test_negotiate_rejects_invalid_regex() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["negotiate", "--regex-domain-filter", "("])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid domain filter regex"));
}

#[test]
fn test_adjust_from_stdin() {
    let dir = TempDir::new().unwrap();
    let output = cmd(&dir)
        .args(["adjust", "-", "-o", "json"])
        .write_stdin(r#"[{"dnsName": "app.example.com", "recordType": "A", "targets": ["10.0.0.1", "10.0.0.2"]}]"#)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let adjusted: Vec<serde_json::Value> = serde_json::from_slice(&output).unwrap();
    assert_eq!(adjusted.len(), 2);
    assert_ne!(adjusted[0]["setIdentifier"], adjusted[1]["setIdentifier"]);
}

#[test]
fn test_adjust_rejects_wildcards() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg("adjust")
        .write_stdin(r#"[{"dnsName": "*.example.com", "recordType": "A", "targets": ["10.0.0.1"]}]"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("wildcard"));
}

#[test]
fn test_records_requires_connection_settings() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg("records")
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPNSENSE_URL"));
}

#[test]
fn test_config_roundtrip() {
    let dir = TempDir::new().unwrap();

    cmd(&dir).args(["config", "set", "url", "https://fw.example.com"]).assert().success();
    cmd(&dir).args(["config", "set", "api_key", "abcdefghijklmnop"]).assert().success();
    cmd(&dir).args(["config", "set", "colour", "blue"]).assert().failure();

    cmd(&dir)
        .args(["config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("https://fw.example.com")
                .and(predicate::str::contains("abcd...mnop"))
                .and(predicate::str::contains("abcdefghijklmnop").not()),
        );

    cmd(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_logs_go_to_stderr() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .env("RUST_LOG", "debug")
        .args(["negotiate", "-o", "json", "--domain-filter", "example.com", "--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Resolved settings"))
        .stdout(predicate::str::contains("Resolved settings").not());
}
