use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::{CliTest, run};

const LOCALES_EN_FR: &str = r#"{ "managedLocales": ["en", "fr"] }"#;

const ADMIN_XLIFF: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
  <file source-language="en" datatype="plaintext" original="file.ext">
    <body>
      <trans-unit id="1" resname="admin.title">
        <source>admin.title</source>
        <target>Administration</target>
      </trans-unit>
      <trans-unit id="2" resname="admin.logout">
        <source>admin.logout</source>
        <target>Log out</target>
      </trans-unit>
    </body>
  </file>
</xliff>
"#;

#[test]
fn test_import_single_file() -> Result<()> {
    let test = CliTest::with_file(".transyncrc.json", LOCALES_EN_FR)?;
    test.write_file(
        "app/Resources/translations/messages.fr.yml",
        "greeting: Bonjour\n",
    )?;
    let _guard = test.snapshot_settings().bind_to_scope();

    assert_cmd_snapshot!(test.import_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    *** Importing application translation files ***
    Importing "./app/Resources/translations/messages.fr.yml" ... 1 translation

    ✓ Imported 1 translation from 1 file into ./var/translations.sqlite
      - 1 new translation unit

    ----- stderr -----
    "#);
    assert!(test.root().join("var/translations.sqlite").exists());

    Ok(())
}

#[test]
fn test_second_locale_joins_unit() -> Result<()> {
    let test = CliTest::with_file(".transyncrc.json", LOCALES_EN_FR)?;
    test.write_file(
        "app/Resources/translations/messages.fr.yml",
        "greeting: Bonjour\n",
    )?;
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
    Importing "./app/Resources/translations/messages.fr.yml" ... 1 translation

    ✓ Imported 2 translations from 2 files into ./var/translations.sqlite
      - 1 new translation unit

    ----- stderr -----
    "#);

    assert_cmd_snapshot!(test.status_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Database: ./var/translations.sqlite
    Last update: [TIMESTAMP]

    Domain    Units  en  fr
    messages      1   1   1

    1 translation unit in 1 domain

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_reimport_is_idempotent() -> Result<()> {
    let test = CliTest::with_file(".transyncrc.json", LOCALES_EN_FR)?;
    test.write_file(
        "app/Resources/translations/messages.fr.yml",
        "greeting: Bonjour\nfarewell: Au revoir\n",
    )?;

    run(test.import_command())?;
    let (_, first_status, _) = run(test.status_command())?;

    let _guard = test.snapshot_settings().bind_to_scope();
    assert_cmd_snapshot!(test.import_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    *** Importing application translation files ***
    Importing "./app/Resources/translations/messages.fr.yml" ... 2 translations

    ✓ Imported 2 translations from 1 file into ./var/translations.sqlite

    ----- stderr -----
    "#);

    // Identical content leaves the last update untouched
    let (_, second_status, _) = run(test.status_command())?;
    assert_eq!(first_status, second_status);

    Ok(())
}

#[test]
fn test_unmanaged_locales_are_ignored() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "app/Resources/translations/messages.en.yml",
        "greeting: Hello\n",
    )?;
    test.write_file(
        "app/Resources/translations/messages.de.yml",
        "greeting: Hallo\n",
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

#[test]
fn test_locale_override() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "app/Resources/translations/messages.en.yml",
        "greeting: Hello\n",
    )?;
    test.write_file(
        "app/Resources/translations/messages.de.yml",
        "greeting: Hallo\n",
    )?;
    let _guard = test.snapshot_settings().bind_to_scope();

    assert_cmd_snapshot!(test.import_command().args(["--locale", "de"]), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    *** Importing application translation files ***
    Importing "./app/Resources/translations/messages.de.yml" ... 1 translation

    ✓ Imported 1 translation from 1 file into ./var/translations.sqlite
      - 1 new translation unit

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_no_translations_directory() -> Result<()> {
    let test = CliTest::new()?;
    let _guard = test.snapshot_settings().bind_to_scope();

    assert_cmd_snapshot!(test.import_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    *** Importing application translation files ***
    No file to import for managed locales.

    ✓ No translation files found - nothing imported

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_translations_directory_without_managed_files() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "app/Resources/translations/messages.de.yml",
        "greeting: Hallo\n",
    )?;
    let _guard = test.snapshot_settings().bind_to_scope();

    // The directory exists, so there is no "No file to import" notice
    assert_cmd_snapshot!(test.import_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    *** Importing application translation files ***

    ✓ No translation files found - nothing imported

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_bundles_are_imported_after_app() -> Result<()> {
    let test = CliTest::with_file(
        ".transyncrc.json",
        r#"{
            "managedLocales": ["en"],
            "bundles": [
                { "name": "AdminBundle", "path": "./src/AdminBundle" },
                { "name": "BlogBundle", "path": "./src/BlogBundle" }
            ]
        }"#,
    )?;
    test.write_file(
        "app/Resources/translations/messages.en.yml",
        "greeting: Hello\n",
    )?;
    test.write_file(
        "src/AdminBundle/Resources/translations/admin.en.xliff",
        ADMIN_XLIFF,
    )?;
    let _guard = test.snapshot_settings().bind_to_scope();

    assert_cmd_snapshot!(test.import_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    *** Importing application translation files ***
    Importing "./app/Resources/translations/messages.en.yml" ... 1 translation
    *** Importing bundles translation files ***
    # AdminBundle :
    Importing "./src/AdminBundle/Resources/translations/admin.en.xliff" ... 2 translations
    # BlogBundle :
    No file to import for managed locales.

    ✓ Imported 3 translations from 2 files into ./var/translations.sqlite
      - 3 new translation units

    ----- stderr -----
    "#);

    assert_cmd_snapshot!(test.status_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Database: ./var/translations.sqlite
    Last update: [TIMESTAMP]

    Domain    Units  en
    admin         2   2
    messages      1   1

    3 translation units in 2 domains

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_all_formats() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "app/Resources/translations/messages.en.yml",
        "form:\n  submit: Send\n",
    )?;
    test.write_file(
        "app/Resources/translations/validators.en.php",
        "<?php\nreturn array(\n    'not_blank' => 'This value should not be blank.',\n);\n",
    )?;
    test.write_file(
        "app/Resources/translations/emails.en.json",
        r#"{ "welcome": { "subject": "Welcome" } }"#,
    )?;
    test.write_file("app/Resources/translations/admin.en.xlf", ADMIN_XLIFF)?;
    let _guard = test.snapshot_settings().bind_to_scope();

    assert_cmd_snapshot!(test.import_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    *** Importing application translation files ***
    Importing "./app/Resources/translations/admin.en.xlf" ... 2 translations
    Importing "./app/Resources/translations/emails.en.json" ... 1 translation
    Importing "./app/Resources/translations/messages.en.yml" ... 1 translation
    Importing "./app/Resources/translations/validators.en.php" ... 1 translation

    ✓ Imported 5 translations from 4 files into ./var/translations.sqlite
      - 5 new translation units

    ----- stderr -----
    "#);

    assert_cmd_snapshot!(test.status_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Database: ./var/translations.sqlite
    Last update: [TIMESTAMP]

    Domain      Units  en
    admin           2   2
    emails          1   1
    messages        1   1
    validators      1   1

    5 translation units in 4 domains

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_unsupported_extension_is_skipped() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "app/Resources/translations/messages.en.po",
        "msgid \"greeting\"\nmsgstr \"Hello\"\n",
    )?;
    let _guard = test.snapshot_settings().bind_to_scope();

    assert_cmd_snapshot!(test.import_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    *** Importing application translation files ***
    Importing "./app/Resources/translations/messages.en.po" ... skipped (no loader for extension "po")

    ✓ Imported 0 translations from 0 files into ./var/translations.sqlite

    ----- stderr -----
    warning: 1 file skipped: no loader for the extension
    "#);

    Ok(())
}

#[test]
fn test_parse_failure_does_not_abort_run() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("app/Resources/translations/broken.en.json", "{ oops")?;
    test.write_file(
        "app/Resources/translations/messages.en.yml",
        "greeting: Hello\n",
    )?;
    let mut settings = test.snapshot_settings();
    settings.add_filter(r"failed: .*", "failed: [LOAD ERROR]");
    let _guard = settings.bind_to_scope();

    assert_cmd_snapshot!(test.import_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    *** Importing application translation files ***
    Importing "./app/Resources/translations/broken.en.json" ... failed: [LOAD ERROR]
    Importing "./app/Resources/translations/messages.en.yml" ... 1 translation

    ✓ Imported 1 translation from 1 file into ./var/translations.sqlite
      - 1 new translation unit

    ----- stderr -----
    warning: 1 file could not be loaded (use -v for details)
    "#);

    Ok(())
}

#[test]
fn test_database_override() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "app/Resources/translations/messages.en.yml",
        "greeting: Hello\n",
    )?;
    let _guard = test.snapshot_settings().bind_to_scope();

    assert_cmd_snapshot!(
        test.import_command()
            .args(["--database", "data/custom.sqlite", "--commit", "file"]),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    *** Importing application translation files ***
    Importing "./app/Resources/translations/messages.en.yml" ... 1 translation

    ✓ Imported 1 translation from 1 file into data/custom.sqlite
      - 1 new translation unit

    ----- stderr -----
    "#
    );
    assert!(test.root().join("data/custom.sqlite").exists());
    assert!(!test.root().join("var/translations.sqlite").exists());

    Ok(())
}

#[test]
fn test_cache_clear() -> Result<()> {
    let test = CliTest::with_file(".transyncrc.json", LOCALES_EN_FR)?;
    test.write_file("var/cache/translations/catalogue.en.php", "<?php")?;
    test.write_file("var/cache/translations/catalogue.fr.php.meta", "")?;
    test.write_file("var/cache/translations/catalogue.de.php", "<?php")?;
    let _guard = test.snapshot_settings().bind_to_scope();

    assert_cmd_snapshot!(test.import_command().arg("--cache-clear"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    *** Importing application translation files ***
    No file to import for managed locales.
    Removing translations cache files ...
    Removed 2 cache files

    ✓ No translation files found - nothing imported

    ----- stderr -----
    ");
    assert!(!test.root().join("var/cache/translations/catalogue.en.php").exists());
    assert!(!test.root().join("var/cache/translations/catalogue.fr.php.meta").exists());
    assert!(test.root().join("var/cache/translations/catalogue.de.php").exists());

    Ok(())
}

#[test]
fn test_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::with_file(".transyncrc.json", r#"{ "ignores": ["[invalid"] }"#)?;
    let mut settings = test.snapshot_settings();
    settings.add_filter(r"Pattern syntax error.*", "[PATTERN ERROR]");
    let _guard = settings.bind_to_scope();

    assert_cmd_snapshot!(test.import_command(), @r#"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    Error: Invalid glob pattern in 'ignores': "[invalid": [PATTERN ERROR]
    "#);

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("--help"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Import translation files (xliff, yml, php, json) from an application and its bundles into a database

    Usage: transync [COMMAND]

    Commands:
      import  Import translation files (xliff, yml, php, json) into the database
      status  Show translation units and translations stored in the database
      init    Initialize a new .transyncrc.json configuration file
      help    Print this message or the help of the given subcommand(s)

    Options:
      -h, --help     Print help
      -V, --version  Print version

    ----- stderr -----
    ");

    Ok(())
}
