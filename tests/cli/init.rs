use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::{CliTest, run};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["managedLocales"], serde_json::json!(["en"]));
    assert_eq!(parsed["database"], "./var/translations.sqlite");
    assert_eq!(parsed["appRoot"], "./app");
    assert_eq!(parsed["commitPolicy"], "entry");
    assert!(parsed["bundles"].is_array());

    assert!(
        content.contains("  "),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .transyncrc.json

    ----- stderr -----
    ");

    let content = test.read_file(".transyncrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".transyncrc.json", "{}")?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    Error: .transyncrc.json already exists
    ");
    assert_eq!(test.read_file(".transyncrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_created_config_is_used() -> Result<()> {
    let test = CliTest::new()?;
    let mut cmd = test.command();
    cmd.arg("init");
    run(cmd)?;

    test.write_file(
        "app/Resources/translations/messages.en.yml",
        "greeting: Hello\n",
    )?;
    let _guard = test.snapshot_settings().bind_to_scope();

    assert_cmd_snapshot!(test.import_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    *** Importing application translation files ***
    Importing "./app/Resources/translations/messages.en.yml" ... 1 translation

    ✓ Imported 1 translation from 1 file into ./var/translations.sqlite
      - 1 new translation unit

    ----- stderr -----
    "#);

    Ok(())
}
