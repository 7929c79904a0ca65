use std::fs;
use std::path::Path;

use assert_cmd::Command;
use bookstore::backup::BackupManager;
use bookstore::config::{paths::BookstorePaths, settings::BackupRetention};
use predicates::prelude::*;
use tempfile::TempDir;

fn bookstore(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bookstore").unwrap();
    cmd.env("BOOKSTORE_CLI_DATA_DIR", data_dir)
        .env_remove("RUST_LOG");
    cmd
}

fn snapshot_count(data_dir: &Path) -> usize {
    fs::read_dir(data_dir.join("backups"))
        .map(|entries| entries.count())
        .unwrap_or(0)
}

fn oldest_snapshot(data_dir: &Path) -> String {
    let paths = BookstorePaths::with_base_dir(data_dir.to_path_buf());
    BackupManager::new(&paths, BackupRetention::default())
        .list_backups()
        .unwrap()
        .pop()
        .unwrap()
        .filename
}

#[test]
fn test_add_and_list() {
    let temp = TempDir::new().unwrap();

    bookstore(temp.path())
        .args(["add", "Dune", "Frank Herbert", "--year", "1965", "--price", "39.90"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added book #1: Dune"));

    bookstore(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Frank Herbert"))
        .stdout(predicate::str::contains("39.90"))
        .stdout(predicate::str::contains("1 book(s)"));

    assert!(temp.path().join("data").join("livraria.db").exists());
    assert_eq!(snapshot_count(temp.path()), 1);
}

#[test]
fn test_update_price_and_remove() {
    let temp = TempDir::new().unwrap();

    bookstore(temp.path())
        .args(["add", "Dune", "Frank Herbert"])
        .assert()
        .success();
    bookstore(temp.path())
        .args(["add", "Dune Messiah", "Frank Herbert"])
        .assert()
        .success();

    bookstore(temp.path())
        .args(["update-price", "Dune", "25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated the price of 2 book(s)."));

    bookstore(temp.path())
        .args(["update-price", "Neuromancer", "25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No books with 'Neuromancer'"));

    bookstore(temp.path())
        .args(["remove", "Messiah"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 book(s)."));

    bookstore(temp.path())
        .args(["search", "Herbert"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dune"))
        .stdout(predicate::str::contains("Messiah").not());
}

#[test]
fn test_export_then_import() {
    let temp = TempDir::new().unwrap();
    let csv_path = temp.path().join("books.csv");

    bookstore(temp.path())
        .args(["add", "Dune", "Frank Herbert", "-y", "1965", "-p", "39.9"])
        .assert()
        .success();

    bookstore(temp.path())
        .args(["export", "--output"])
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 book(s)"));

    let contents = fs::read_to_string(&csv_path).unwrap();
    assert!(contents.starts_with("id,titulo,autor,ano_publicacao,preco"));

    bookstore(temp.path())
        .arg("import")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 book(s)"));

    bookstore(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 book(s)"));
}

#[test]
fn test_import_missing_file_fails() {
    let temp = TempDir::new().unwrap();

    bookstore(temp.path())
        .args(["import", "does-not-exist.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open"));

    assert_eq!(snapshot_count(temp.path()), 0);
}

#[test]
fn test_retention_keeps_five_snapshots() {
    let temp = TempDir::new().unwrap();

    for i in 0..7 {
        bookstore(temp.path())
            .args(["add", &format!("Book {}", i), "Author"])
            .assert()
            .success();
    }

    assert_eq!(snapshot_count(temp.path()), 5);

    bookstore(temp.path())
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("backup_livraria_"))
        .stdout(predicate::str::contains("Total: 5 backup(s)"));
}

#[test]
fn test_menu_runs_on_stdin() {
    let temp = TempDir::new().unwrap();

    bookstore(temp.path())
        .write_stdin("1\nDune\nFrank Herbert\n1965\n39,90\n5\nHerbert\n7\nmissing.csv\n9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("=== BOOKSTORE ==="))
        .stdout(predicate::str::contains("Added book #1."))
        .stdout(predicate::str::contains("Frank Herbert"))
        .stdout(predicate::str::contains("Error:"));
}

#[test]
fn test_config_shows_paths() {
    let temp = TempDir::new().unwrap();

    bookstore(temp.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("livraria.db"))
        .stdout(predicate::str::contains("Max backups:     5"));
}

#[test]
fn test_audit_records_changes() {
    let temp = TempDir::new().unwrap();

    bookstore(temp.path())
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("The audit log is empty."));

    bookstore(temp.path())
        .args(["add", "Dune", "Frank Herbert"])
        .assert()
        .success();

    bookstore(temp.path())
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE"));
}

#[test]
fn test_restore_latest_requires_force() {
    let temp = TempDir::new().unwrap();

    bookstore(temp.path()).args(["add", "Dune", "Frank Herbert"]).assert().success();
    bookstore(temp.path()).args(["add", "Emma", "Jane Austen"]).assert().success();

    bookstore(temp.path())
        .args(["backup", "restore", "latest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));

    bookstore(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 book(s)"));
}

#[test]
fn test_restore_latest_with_force() {
    let temp = TempDir::new().unwrap();

    bookstore(temp.path()).args(["add", "Dune", "Frank Herbert"]).assert().success();
    bookstore(temp.path()).args(["add", "Emma", "Jane Austen"]).assert().success();

    // The latest snapshot was taken just before Emma was added
    bookstore(temp.path())
        .args(["backup", "restore", "latest", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pre-restore backup saved"))
        .stdout(predicate::str::contains("Restore complete!"));

    bookstore(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dune"))
        .stdout(predicate::str::contains("Emma").not());

    bookstore(temp.path())
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("RESTORE"));

    assert_eq!(snapshot_count(temp.path()), 3);
}

#[test]
fn test_restore_oldest_snapshot_at_cap() {
    let temp = TempDir::new().unwrap();

    for i in 0..5 {
        bookstore(temp.path())
            .args(["add", &format!("Book {}", i), "Author"])
            .assert()
            .success();
    }
    assert_eq!(snapshot_count(temp.path()), 5);
    let oldest = oldest_snapshot(temp.path());

    bookstore(temp.path())
        .args(["backup", "restore", &oldest, "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restore complete!"));

    bookstore(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No books found."));

    assert!(temp.path().join("backups").join(&oldest).exists());
    assert_eq!(snapshot_count(temp.path()), 5);
}
