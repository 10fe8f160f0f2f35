use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn monarch(home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("monarch"));
    cmd.env("HOME", home.path())
        .env_remove("MONARCH_TOKEN")
        .env_remove("MONARCH_TOKEN_FILE")
        .env_remove("MONARCH_PROVIDER")
        .env_remove("MONARCH_LOCAL_DB")
        .env_remove("MONARCH_FIXTURES_DIR");
    cmd
}

fn seed_db(home: &TempDir) -> std::path::PathBuf {
    let store = json!({
        "accounts": [
            {
                "id": "acct1",
                "displayName": "Joint Checking",
                "type": { "name": "depository", "display": "Checking" },
                "currentBalance": 1000.0,
                "institution": { "id": null, "name": "Fairview Bank" },
                "isAsset": true,
                "includeInNetWorth": true,
                "isManual": false,
                "mask": "1234",
            },
        ],
        "categories": [
            { "id": "cat1", "name": "Groceries", "order": 1 },
            { "id": "cat2", "name": "Restaurants & Bars", "order": 2 },
        ],
        "transactions": [
            {
                "id": "100000000000000001",
                "amount": -52.10,
                "date": "2025-01-15",
                "needsReview": true,
                "plaidName": "CORNER MARKET POS",
                "notes": null,
                "account": { "id": "acct1", "displayName": "Joint Checking" },
                "merchant": { "id": "m1", "name": "Corner Market" },
                "category": { "id": "cat1", "name": "Groceries" },
                "tags": [],
            },
            {
                "id": "100000000000000002",
                "amount": -18.75,
                "date": "2025-02-01",
                "needsReview": true,
                "plaidName": "NOODLE HOUSE",
                "notes": null,
                "account": { "id": "acct1", "displayName": "Joint Checking" },
                "merchant": { "id": "m2", "name": "Noodle House" },
                "category": { "id": "cat2", "name": "Restaurants & Bars" },
                "tags": [],
            },
        ],
    });
    let path = home.path().join("store.json");
    std::fs::write(&path, serde_json::to_string_pretty(&store).unwrap()).unwrap();
    path
}

#[test]
fn version_works() {
    let home = tempfile::tempdir().unwrap();
    monarch(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("monarch-money-cli"));
}

#[test]
fn auth_status_json_is_an_object() {
    let home = tempfile::tempdir().unwrap();
    monarch(&home)
        .args(["--output", "json", "auth", "status"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"))
        .stdout(predicate::str::contains("\"token_configured\": false"))
        .stdout(predicate::str::contains("\"token_valid\": \"unknown\""));
}

#[test]
fn local_provider_requires_a_db_path() {
    let home = tempfile::tempdir().unwrap();
    monarch(&home)
        .args(["--provider", "local", "accounts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--local-db"));
}

#[test]
fn accounts_list_from_local_store() {
    let home = tempfile::tempdir().unwrap();
    let db = seed_db(&home);
    monarch(&home)
        .args(["--provider", "local", "--local-db"])
        .arg(&db)
        .args(["--output", "json", "accounts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Joint Checking"))
        .stdout(predicate::str::contains("Fairview Bank"));
}

#[test]
fn transactions_list_filters_by_category_pattern() {
    let home = tempfile::tempdir().unwrap();
    let db = seed_db(&home);
    monarch(&home)
        .args(["--provider", "local", "--local-db"])
        .arg(&db)
        .args([
            "--output",
            "json",
            "transactions",
            "list",
            "--category",
            "restaurants*",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Noodle House"))
        .stdout(predicate::str::contains("Corner Market").not());
}

#[test]
fn transactions_list_csv_has_headers() {
    let home = tempfile::tempdir().unwrap();
    let db = seed_db(&home);
    monarch(&home)
        .args(["--provider", "local", "--local-db"])
        .arg(&db)
        .args(["--output", "csv", "transactions", "list"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "id,date,merchant,amount,category,account,notes",
        ));
}

#[test]
fn transactions_update_writes_through_with_yes() {
    let home = tempfile::tempdir().unwrap();
    let db = seed_db(&home);
    monarch(&home)
        .args(["--provider", "local", "--local-db"])
        .arg(&db)
        .args([
            "--yes",
            "--output",
            "json",
            "transactions",
            "update",
            "100000000000000001",
            "--notes",
            "stocked up",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("stocked up"));

    let saved = std::fs::read_to_string(&db).unwrap();
    assert!(saved.contains("stocked up"));
}

#[test]
fn transactions_update_refuses_without_yes_when_not_a_tty() {
    let home = tempfile::tempdir().unwrap();
    let db = seed_db(&home);
    monarch(&home)
        .args(["--provider", "local", "--local-db"])
        .arg(&db)
        .args([
            "transactions",
            "update",
            "100000000000000001",
            "--notes",
            "nope",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    let saved = std::fs::read_to_string(&db).unwrap();
    assert!(!saved.contains("nope"));
}

#[test]
fn unknown_category_name_reports_not_found() {
    let home = tempfile::tempdir().unwrap();
    let db = seed_db(&home);
    monarch(&home)
        .args(["--provider", "local", "--local-db"])
        .arg(&db)
        .args([
            "--yes",
            "transactions",
            "update",
            "100000000000000001",
            "--category",
            "Utilities",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Category not found: Utilities"));
}

#[test]
fn transactions_create_resolves_names_and_prints_result() {
    let home = tempfile::tempdir().unwrap();
    let db = seed_db(&home);
    monarch(&home)
        .args(["--provider", "local", "--local-db"])
        .arg(&db)
        .args([
            "--yes",
            "--output",
            "json",
            "transactions",
            "create",
            "--date",
            "2025-04-01",
            "--account",
            "joint",
            "--amount",
            "-42.50",
            "--merchant",
            "Hardware Depot",
            "--category",
            "groceries",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hardware Depot"))
        .stdout(predicate::str::contains("-42.5"));
}

#[test]
fn net_worth_reports_totals_from_local_store() {
    let home = tempfile::tempdir().unwrap();
    let db = seed_db(&home);
    monarch(&home)
        .args(["--provider", "local", "--local-db"])
        .arg(&db)
        .args(["--output", "json", "net-worth"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"net_worth\": 1000.0"));
}
