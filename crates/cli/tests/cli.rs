use assert_cmd::Command;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("bookshelf-cli").unwrap();
    cmd.env_remove("BOOKSHELF_API_URL").env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let output = cli().arg("--help").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    for subcommand in ["migrate", "openapi", "books", "notes"] {
        assert!(stdout.contains(subcommand), "help is missing {subcommand}");
    }
}

#[test]
fn openapi_prints_merged_document() {
    let output = cli().arg("openapi").output().unwrap();
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["openapi"], "3.1.0");
    assert!(doc["paths"]["/api/books"]["post"].is_object());
    assert!(doc["paths"]["/api/books/{id}/notes"]["get"].is_object());
    assert!(doc["components"]["schemas"]["Book"].is_object());
}

#[test]
fn add_without_title_is_a_usage_error() {
    cli()
        .args(["books", "add", "--author", "Herbert"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn unreachable_api_fails_with_message() {
    let output = cli()
        .args(["books", "list", "--base-url", "http://127.0.0.1:9/api"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("request failed"), "stderr was: {stderr}");
}

#[test]
fn debug_log_names_the_command_on_stderr() {
    let output = cli()
        .env("RUST_LOG", "debug")
        .args([
            "books",
            "list",
            "--status",
            "finished",
            "--base-url",
            "http://127.0.0.1:9/api",
        ])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("calling books API"), "stderr was: {stderr}");
    assert!(stderr.contains("Finished"), "stderr was: {stderr}");
}
