use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use tempfile::TempDir;

fn write_file(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write test file");
}

#[test]
fn nests_flat_keys() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("flat.json");
    write_file(
        &input,
        r#"{"profile[0].name":"A","profile[0].email":"a@x.com","title":"Team"}"#,
    );

    cargo_bin_cmd!("formtree")
        .arg(&input)
        .assert()
        .success()
        .stdout(
            "{\n  \"title\": \"Team\",\n  \"profile\": [\n    {\n      \"name\": \"A\",\n      \"email\": \"a@x.com\"\n    }\n  ]\n}",
        );
}

#[test]
fn compact_output_with_zero_indent() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("flat.json");
    write_file(&input, r#"{"tags[0]":"a","tags[1]":"","tags[2]":"b"}"#);

    cargo_bin_cmd!("formtree")
        .arg(&input)
        .args(["--indent", "0"])
        .assert()
        .success()
        .stdout(r#"{"tags":["a","b"]}"#);
}

#[test]
fn extracts_single_path() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("flat.json");
    write_file(&input, r#"{"user.name":"Ada","user.email":"ada@x.com"}"#);

    cargo_bin_cmd!("formtree")
        .arg(&input)
        .args(["--get", "user.name"])
        .assert()
        .success()
        .stdout("\"Ada\"");
}

#[test]
fn invalid_get_path_fails() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("flat.json");
    write_file(&input, r#"{"user.name":"Ada"}"#);

    cargo_bin_cmd!("formtree")
        .arg(&input)
        .args(["--get", "user..name"])
        .assert()
        .failure()
        .stderr(contains("invalid path"));
}

#[test]
fn writes_output_file() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("flat.json");
    let output = dir.path().join("nested.json");
    write_file(&input, r#"{"a.b":"c"}"#);

    cargo_bin_cmd!("formtree")
        .arg(&input)
        .args(["--output", output.to_str().expect("utf8 path")])
        .assert()
        .success();

    let written = fs::read_to_string(&output).expect("read output");
    assert_eq!(written, "{\n  \"a\": {\n    \"b\": \"c\"\n  }\n}");
}

#[test]
fn rejects_non_object_input() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("flat.json");
    write_file(&input, r#"[1, 2, 3]"#);

    cargo_bin_cmd!("formtree")
        .arg(&input)
        .assert()
        .failure()
        .stderr(contains("flat JSON object"));
}
