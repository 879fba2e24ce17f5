//! End-to-end tests for the textsql binary

mod helpers;

use assert_cmd::Command;
use predicates::prelude::*;

use helpers::{
    args, create_custom_file, create_temp_dir, prepare_people_file, run_test_case,
    TextSqlTestCase,
};

#[test]
fn test_count_from_stdin() -> Result<(), Box<dyn std::error::Error>> {
    run_test_case(TextSqlTestCase {
        args: args(&["--header", "--sql", "select count(*) as n from tbl"]),
        stdin: Some("name,age\nAlice,30\nBob,31\n".to_string()),
        exact_stdout: Some("2\n".to_string()),
        ..Default::default()
    })
}

#[test]
fn test_select_rows_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = create_temp_dir()?;
    let file = prepare_people_file(temp_dir.path())?;

    run_test_case(TextSqlTestCase {
        args: args(&[
            "--header",
            "--source",
            file.to_str().unwrap(),
            "--sql",
            "select name, age from tbl where age > '26' order by id",
        ]),
        exact_stdout: Some("Alice, 30\nCharlie, 35\n".to_string()),
        ..Default::default()
    })
}

#[test]
fn test_multiple_statements_and_custom_table() -> Result<(), Box<dyn std::error::Error>> {
    run_test_case(TextSqlTestCase {
        args: args(&[
            "--table-name",
            "people",
            "--sql",
            "select c1 from people where c0 = '1'; ; select count(*) from people",
        ]),
        stdin: Some("1,Alice\n2,Bob\n".to_string()),
        exact_stdout: Some("Alice\n2\n".to_string()),
        ..Default::default()
    })
}

#[test]
fn test_hex_tab_delimiter() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = create_temp_dir()?;
    let file = create_custom_file(
        temp_dir.path(),
        "employees.tsv",
        "id\tname\tdept\n1\tAlice\tEngineering\n2\tBob\tSales\n",
    )?;

    for dlm in ["tab", "0x09"] {
        run_test_case(TextSqlTestCase {
            args: args(&[
                "--header",
                "--dlm",
                dlm,
                "--source",
                file.to_str().unwrap(),
                "--sql",
                "select dept from tbl where name = 'Bob'",
            ]),
            exact_stdout: Some("Sales\n".to_string()),
            ..Default::default()
        })?;
    }
    Ok(())
}

#[test]
fn test_sanitized_header_names() -> Result<(), Box<dyn std::error::Error>> {
    run_test_case(TextSqlTestCase {
        args: args(&["--header", "--sql", "select first_name, e_mail from tbl"]),
        stdin: Some("first name,e-mail\nAda,ada@example.com\n".to_string()),
        exact_stdout: Some("Ada, ada@example.com\n".to_string()),
        ..Default::default()
    })
}

#[test]
fn test_summary_goes_to_stderr() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("textsql")?;
    cmd.env_remove("RUST_LOG")
        .args(["--header", "--showvar"])
        .write_stdin("v\na\nbb\nbb\nccc\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "Field\tMin.Length\tMax.Length\tDistinct\tMin.Value\tMax.Value",
        ))
        .stderr(predicate::str::contains("v\t1\t3\t3\ta\tccc"));
    Ok(())
}

#[test]
fn test_invalid_sql_fails() -> Result<(), Box<dyn std::error::Error>> {
    run_test_case(TextSqlTestCase {
        args: args(&["--sql", "select 1; INVALID SQL; select 2"]),
        stdin: Some("a\n".to_string()),
        exact_stdout: Some("1\n".to_string()),
        expected_stderr: args(&["Failed to execute SQL"]),
        should_succeed: false,
        ..Default::default()
    })
}

#[test]
fn test_empty_input_fails() -> Result<(), Box<dyn std::error::Error>> {
    run_test_case(TextSqlTestCase {
        args: args(&["--sql", "select 1"]),
        stdin: Some(String::new()),
        expected_stderr: args(&["Input contains no records"]),
        should_succeed: false,
        ..Default::default()
    })
}

#[test]
fn test_duplicate_key_policies() -> Result<(), Box<dyn std::error::Error>> {
    let input = "id,v\n1,first\n2,other\n1,second\n";

    run_test_case(TextSqlTestCase {
        args: args(&[
            "--header",
            "--pk",
            "id",
            "--dup",
            "ignore",
            "--sql",
            "select v from tbl order by id",
        ]),
        stdin: Some(input.to_string()),
        exact_stdout: Some("first\nother\n".to_string()),
        ..Default::default()
    })?;

    run_test_case(TextSqlTestCase {
        args: args(&[
            "--header",
            "--pk",
            "id",
            "--dup",
            "REPLACE",
            "--sql",
            "select v from tbl order by id",
        ]),
        stdin: Some(input.to_string()),
        exact_stdout: Some("second\nother\n".to_string()),
        ..Default::default()
    })?;

    run_test_case(TextSqlTestCase {
        args: args(&["--header", "--pk", "id", "--sql", "select v from tbl"]),
        stdin: Some(input.to_string()),
        exact_stdout: Some(String::new()),
        expected_stderr: args(&["Duplicate key in record 3"]),
        should_succeed: false,
        ..Default::default()
    })
}

#[test]
fn test_bad_rows_only_reported_when_verbose() -> Result<(), Box<dyn std::error::Error>> {
    let input = "a,b\n1,2\n3\n4,5\n";

    let mut cmd = Command::cargo_bin("textsql")?;
    cmd.env_remove("RUST_LOG")
        .args(["--header", "--sql", "select count(*) from tbl"])
        .write_stdin(input);
    cmd.assert()
        .success()
        .stdout("2\n")
        .stderr(predicate::str::is_empty());

    let mut cmd = Command::cargo_bin("textsql")?;
    cmd.env_remove("RUST_LOG")
        .args(["--header", "-v", "--sql", "select count(*) from tbl"])
        .write_stdin(input);
    cmd.assert()
        .success()
        .stdout("2\n")
        .stderr(predicate::str::contains("Bad row 2"))
        .stderr(predicate::str::contains("rows: 0 + 3 ==> 2"));
    Ok(())
}

#[test]
fn test_progress_dots_only_when_verbose() -> Result<(), Box<dyn std::error::Error>> {
    let mut input = String::from("n\n");
    for i in 0..20_000 {
        input.push_str(&format!("{i}\n"));
    }

    let mut cmd = Command::cargo_bin("textsql")?;
    cmd.env_remove("RUST_LOG")
        .args(["--header", "-v", "--sql", "select count(*) from tbl"])
        .write_stdin(input.clone());
    cmd.assert()
        .success()
        .stdout("20000\n")
        .stderr(predicate::str::contains("\n..\n"));

    let mut cmd = Command::cargo_bin("textsql")?;
    cmd.env_remove("RUST_LOG")
        .args(["--header", "--sql", "select count(*) from tbl"])
        .write_stdin(input);
    cmd.assert()
        .success()
        .stdout("20000\n")
        .stderr(predicate::str::contains(".").not());
    Ok(())
}

#[test]
fn test_non_utf8_input_passes_through() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("textsql")?;
    cmd.env_remove("RUST_LOG")
        .args(["--header", "--sql", "select name from tbl order by rowid"])
        .write_stdin(b"name\ncaf\xe9\nplain\n".to_vec());
    cmd.assert()
        .success()
        .stdout(b"caf\xe9\nplain\n".to_vec())
        .stderr(predicate::str::is_empty());
    Ok(())
}

#[test]
fn test_saved_store_accumulates_imports() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = create_temp_dir()?;
    let db = temp_dir.path().join("saved.db");
    let db = db.to_str().unwrap();

    run_test_case(TextSqlTestCase {
        args: args(&["--header", "--save-to", db]),
        stdin: Some("a,b\n1,2\n".to_string()),
        ..Default::default()
    })?;

    // A different header does not change the existing schema
    run_test_case(TextSqlTestCase {
        args: args(&[
            "--header",
            "--save-to",
            db,
            "--sql",
            "select a || ':' || b from tbl order by a",
        ]),
        stdin: Some("x,y\n3,4\n".to_string()),
        exact_stdout: Some("1:2\n3:4\n".to_string()),
        ..Default::default()
    })?;

    assert!(temp_dir.path().join("saved.db").exists());
    Ok(())
}

#[test]
fn test_console_rejects_stdin() -> Result<(), Box<dyn std::error::Error>> {
    run_test_case(TextSqlTestCase {
        args: args(&["--console"]),
        stdin: Some("a\n".to_string()),
        expected_stderr: args(&["Can not open console with pipe input"]),
        should_succeed: false,
        ..Default::default()
    })
}
