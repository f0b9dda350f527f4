use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::{CliTest, run};

fn imported_project() -> Result<CliTest> {
    let test = CliTest::with_file(".transyncrc.json", r#"{ "managedLocales": ["en", "fr"] }"#)?;
    test.write_file(
        "app/Resources/translations/messages.en.yml",
        "greeting: Hello\nfarewell: Goodbye\n",
    )?;
    test.write_file(
        "app/Resources/translations/messages.fr.yml",
        "greeting: Bonjour\n",
    )?;
    test.write_file(
        "app/Resources/translations/validators.fr.yml",
        "not_blank: Cette valeur ne doit pas être vide.\n",
    )?;
    run(test.import_command())?;
    Ok(test)
}

#[test]
fn test_status_table() -> Result<()> {
    let test = imported_project()?;
    let _guard = test.snapshot_settings().bind_to_scope();

    assert_cmd_snapshot!(test.status_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Database: ./var/translations.sqlite
    Last update: [TIMESTAMP]

    Domain      Units  en  fr
    messages        2   2   1
    validators      1   0   1

    3 translation units in 2 domains

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_status_domain_filter() -> Result<()> {
    let test = imported_project()?;
    let _guard = test.snapshot_settings().bind_to_scope();

    assert_cmd_snapshot!(test.status_command().args(["--domain", "validators"]), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Database: ./var/translations.sqlite
    Last update: [TIMESTAMP]

    Domain      Units  en  fr
    validators      1   0   1

    1 translation unit in 1 domain

    ----- stderr -----
    ");

    assert_cmd_snapshot!(test.status_command().args(["--domain", "emails"]), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    Database: ./var/translations.sqlite
    Last update: [TIMESTAMP]

    No translation units found for domain "emails"

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_status_without_database() -> Result<()> {
    let test = CliTest::new()?;
    let _guard = test.snapshot_settings().bind_to_scope();

    assert_cmd_snapshot!(test.status_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✘ Translation tables do not exist in ./var/translations.sqlite
    Run transync import to create them.

    ----- stderr -----
    ");
    // Reading the status never creates the database
    assert!(!test.root().join("var/translations.sqlite").exists());

    Ok(())
}

#[test]
fn test_status_empty_database_file() -> Result<()> {
    let test = CliTest::with_file("var/translations.sqlite", "")?;
    let _guard = test.snapshot_settings().bind_to_scope();

    assert_cmd_snapshot!(test.status_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✘ Translation tables do not exist in ./var/translations.sqlite
    Run transync import to create them.

    ----- stderr -----
    ");

    Ok(())
}
