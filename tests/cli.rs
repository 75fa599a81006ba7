use std::path::Path;

use assert_cmd::Command;
use chrono::Datelike;
use predicates::prelude::*;
use rusqlite::Connection;

fn write_book(path: &Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE accounts (
            guid TEXT PRIMARY KEY, name TEXT NOT NULL, account_type TEXT NOT NULL,
            code TEXT, description TEXT, hidden INTEGER, placeholder INTEGER, parent_guid TEXT
        );
        INSERT INTO accounts VALUES ('root', 'Root Account', 'ROOT', '', '', 0, 0, NULL);
        INSERT INTO accounts VALUES ('exp', 'Expenses', 'EXPENSE', '5000', '', 0, 1, 'root');
        INSERT INTO accounts VALUES ('util', 'Utilities', 'EXPENSE', '5100', '', 0, 0, 'exp');
        INSERT INTO accounts VALUES ('inc', 'Income', 'INCOME', '4000', '', 0, 1, 'root');
        INSERT INTO accounts VALUES ('sal', 'Salary', 'INCOME', '4100', '', 0, 0, 'inc');",
    )
    .unwrap();
}

fn setup(dir: &Path) {
    std::fs::create_dir_all(dir.join("etc")).unwrap();
    std::fs::write(
        dir.join("etc/account-config.json"),
        r#"{
    "checking-personal": {
        "full-account-name": "Assets:Checking Accounts:checking-personal",
        "account-type": "Bank",
        "colspec": {"date": 0, "name": 1, "amount": 2}
    }
}"#,
    )
    .unwrap();
    std::fs::write(
        dir.join("etc/category-payee-lookup.json"),
        r#"{
    "Income:Salary": [{"payee": "PPD ID: \\d+", "type": "regex"}],
    "Expenses:Utilities": [{"payee": "web id", "type": "literal"}]
}"#,
    )
    .unwrap();
    std::fs::write(
        dir.join("stmt.csv"),
        "Date,Description,Amount\n\
         10/13/2023,EDI PYMNTS PPD ID: 3464716239,1234.56\n\
         10/11/2023,PCS SVC 1749426 WEB ID: 0000450304,-123.45\n",
    )
    .unwrap();
    write_book(&dir.join("accounting-books.db.gnucash"));
}

#[test]
fn test_all_payees_matched_writes_qif() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());

    Command::cargo_bin("qifcat")
        .unwrap()
        .current_dir(dir.path())
        .args(["stmt.csv", "-a", "checking-personal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 matched"));

    let out_dir = dir
        .path()
        .join(chrono::Local::now().year().to_string())
        .join("checking-personal");
    let qif = std::fs::read_to_string(
        out_dir.join("2023-10-11--2023-10-13-checking-personal.qif"),
    )
    .unwrap();
    assert_eq!(
        qif,
        "!Account
NAssets:Checking Accounts:checking-personal
TBank
^
!Type:Bank
C
D10/11/2023
NN/A
PPCS SVC 1749426 WEB ID: 0000450304
T-123.45
LExpenses:Utilities
^
C
D10/13/2023
NN/A
PEDI PYMNTS PPD ID: 3464716239
T1234.56
LIncome:Salary
^
"
    );
    assert!(out_dir
        .join("2023-10-11--2023-10-13-checking-personal.csv")
        .exists());
}

#[test]
fn test_unknown_account_fails() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());

    Command::cargo_bin("qifcat")
        .unwrap()
        .current_dir(dir.path())
        .args(["stmt.csv", "-a", "savings"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Unknown account: savings"));
}

#[test]
fn test_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());

    Command::cargo_bin("qifcat")
        .unwrap()
        .current_dir(dir.path())
        .args(["missing.csv", "-a", "checking-personal"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: IO error"));
}

#[test]
fn test_missing_book_still_backs_up_csv() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());

    Command::cargo_bin("qifcat")
        .unwrap()
        .current_dir(dir.path())
        .args(["stmt.csv", "-a", "savings", "-d", "missing.gnucash"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Unknown account: savings"));

    Command::cargo_bin("qifcat")
        .unwrap()
        .current_dir(dir.path())
        .args(["stmt.csv", "-a", "checking-personal", "-d", "missing.gnucash"])
        .assert()
        .failure();
    assert!(dir
        .path()
        .join(chrono::Local::now().year().to_string())
        .join("checking-personal")
        .join("2023-10-11--2023-10-13-checking-personal.csv")
        .exists());
}
