use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;
use quote_wizard::config::{Config, ConfigManager};

#[test]
fn save_then_load_round_trips_and_leaves_no_temp_file() {
    let home = TempDir::new().unwrap();
    let manager = ConfigManager::with_base_dir(home.path().to_path_buf()).unwrap();
    let config = Config {
        form_id: Some("xgvyjlzg".into()),
        request_timeout_secs: 5,
        ..Config::default()
    };

    manager.save(&config).unwrap();

    home.child("config.json").assert(predicate::path::exists());
    home.child("config.json.tmp").assert(predicate::path::missing());
    home.child("config.json")
        .assert(predicate::str::contains("\"form_id\": \"xgvyjlzg\""));
    assert_eq!(manager.load().unwrap(), config);
}

#[test]
fn partial_files_fill_in_defaults() {
    let home = TempDir::new().unwrap();
    home.child("config.json")
        .write_str(r#"{ "form_id": "abc123" }"#)
        .unwrap();
    let manager = ConfigManager::with_base_dir(home.path().to_path_buf()).unwrap();

    let config = manager.load().unwrap();

    assert_eq!(config.form_id.as_deref(), Some("abc123"));
    assert_eq!(config.endpoint_base, "https://formspree.io/f");
    assert_eq!(config.request_timeout_secs, 10);
    assert_eq!(config.site_name, "Proknacks");
    assert!(config.submission_config().is_configured());
}

#[test]
fn blank_form_id_counts_as_unconfigured() {
    let home = TempDir::new().unwrap();
    home.child("config.json")
        .write_str(r#"{ "form_id": "   " }"#)
        .unwrap();
    let manager = ConfigManager::with_base_dir(home.path().to_path_buf()).unwrap();

    let config = manager.load().unwrap();

    assert!(!config.submission_config().is_configured());
}

#[test]
fn malformed_files_are_reported() {
    let home = TempDir::new().unwrap();
    home.child("config.json").write_str("{ not json").unwrap();
    let manager = ConfigManager::with_base_dir(home.path().to_path_buf()).unwrap();

    let err = manager.load().unwrap_err();

    assert!(err.to_string().starts_with("Serialization error"));
}

#[test]
fn missing_base_directory_is_created_on_save() {
    let home = TempDir::new().unwrap();
    let nested = home.child("nested/quote_wizard");

    let manager = ConfigManager::with_base_dir(nested.path().to_path_buf()).unwrap();
    nested.assert(predicate::path::missing());
    assert_eq!(manager.path(), nested.child("config.json").path());

    manager.save(&Config::default()).unwrap();

    nested.assert(predicate::path::is_dir());
    nested.child("config.json").assert(predicate::path::exists());
}

#[test]
fn blank_env_form_id_keeps_the_file_value() {
    let home = TempDir::new().unwrap();
    home.child("config.json")
        .write_str(r#"{ "form_id": "from-file" }"#)
        .unwrap();

    assert_cmd::Command::cargo_bin("quote_wizard_cli")
        .unwrap()
        .env("QUOTE_WIZARD_CLI_SCRIPT", "1")
        .env("QUOTE_WIZARD_HOME", home.path())
        .env("QUOTE_WIZARD_DRY_RUN", "1")
        .env("QUOTE_WIZARD_FORM_ID", "")
        .write_stdin("exit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No form identifier configured").not());
}

#[test]
fn cli_reads_form_id_from_the_config_file() {
    let home = TempDir::new().unwrap();
    home.child("config.json")
        .write_str(r#"{ "form_id": "from-file" }"#)
        .unwrap();
    let answer = quote_wizard::antispam::AntiSpamGuard::with_seed(1)
        .challenge()
        .answer();
    let script = format!(
        "set firstName Ana\nset lastName Silva\nset email ana@example.com\n\
         set phone 5551234\nset address \"1 Oak Ave\"\nset serviceType woodwork\n\
         set projectDescription \"Build a bookshelf for the den.\"\nconsent yes\n\
         answer {answer}\nsubmit\nexit\n"
    );

    assert_cmd::Command::cargo_bin("quote_wizard_cli")
        .unwrap()
        .env("QUOTE_WIZARD_CLI_SCRIPT", "1")
        .env("QUOTE_WIZARD_HOME", home.path())
        .env("QUOTE_WIZARD_DRY_RUN", "1")
        .env("QUOTE_WIZARD_CHALLENGE_SEED", "1")
        .env_remove("QUOTE_WIZARD_FORM_ID")
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Dry run: would submit to form `from-file`",
        ))
        .stdout(predicate::str::contains("your woodwork request"));
}
