//! Integration test suite for `jsontok` CLI
use assert_cmd::Command;

/// Helper function to run the `jt` binary with the given arguments and return
/// a [`assert_cmd::assert::Assert`].
fn run_main(args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("jt").expect("Failed to find main binary");
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd.args(args);
    cmd.assert()
}

/// Runs `jt` expecting success and returns its STDOUT.
fn stdout_of(args: &[&str]) -> String {
    let output = run_main(args).success().code(0).get_output().stdout.clone();
    String::from_utf8(output).expect("Invalid UTF-8 output")
}

/// Runs `jt` expecting exit code 1 and returns its STDERR.
fn stderr_of(args: &[&str]) -> String {
    let output = run_main(args).failure().code(1).get_output().stderr.clone();
    String::from_utf8(output).expect("Invalid UTF-8 output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn count_tokens() {
        let output = stdout_of(&["--count", "tests/data/simple.json"]);
        assert_eq!(output.trim(), "Tokens: 12");
    }

    #[test]
    fn listing_shows_each_token() {
        let output = stdout_of(&["tests/data/simple.json"]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 12);
        assert!(lines[0].contains("string"), "{output}");
        assert!(lines[0].ends_with("\"name\""), "{output}");
        assert!(lines[3].ends_with("32"), "{output}");
        assert!(lines[7].contains("array"), "{output}");
        assert!(lines[11].ends_with("null"), "{output}");
    }

    #[test]
    fn json_output_spans_match_file() {
        let output = stdout_of(&["--json", "--compact", "tests/data/simple.json"]);
        let tokens: Value =
            serde_json::from_str(output.trim()).expect("Failed to parse output JSON");
        let tokens = tokens.as_array().expect("expected a JSON array");
        assert_eq!(tokens.len(), 12);

        let source = std::fs::read("tests/data/simple.json").unwrap();
        let text = |token: &Value| {
            let start = usize::try_from(token["start"].as_u64().unwrap()).unwrap();
            let length = usize::try_from(token["length"].as_u64().unwrap()).unwrap();
            String::from_utf8(source[start..start + length].to_vec()).unwrap()
        };

        assert_eq!(tokens[0]["kind"], "string");
        assert_eq!(text(&tokens[0]), "name");
        assert_eq!(tokens[5]["kind"], "literal");
        assert_eq!(text(&tokens[5]), "true");
        assert_eq!(tokens[9]["kind"], "object");
        assert!(text(&tokens[9]).contains("\"city\": \"Zürich\""));
    }

    #[test]
    fn path_to_scalar_prints_value() {
        let output = stdout_of(&["-p", "address.city", "tests/data/simple.json"]);
        assert_eq!(output.trim(), "\"Zürich\"");

        let output = stdout_of(&["--path", "phones.1", "tests/data/simple.json"]);
        assert_eq!(output.trim(), "\"+44 2345678\"");

        let output = stdout_of(&["-p", "age", "tests/data/simple.json"]);
        assert_eq!(output.trim(), "32");
    }

    #[test]
    fn path_to_container_lists_children() {
        let output =
            stdout_of(&["-p", "address", "--count", "tests/data/simple.json"]);
        assert_eq!(output.trim(), "Tokens: 6");

        let output = stdout_of(&["-p", "address.geo", "tests/data/simple.json"]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("47.3769"));
        assert!(lines[1].ends_with("8.5417"));
    }

    #[test]
    fn path_to_scalar_with_count_or_json() {
        let output = stdout_of(&["-p", "address.city", "--count", "tests/data/simple.json"]);
        assert_eq!(output.trim(), "Tokens: 0");

        let output = stdout_of(&["-p", "address.city", "--json", "tests/data/simple.json"]);
        assert_eq!(output.trim(), "[]");

        let output = stdout_of(&["-p", "pets", "--json", "--compact", "tests/data/simple.json"]);
        assert_eq!(output.trim(), "[]");
    }

    #[test]
    fn path_through_deep_nesting() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("deep.json");
        let levels = 100_000;
        std::fs::write(&file, format!("{}{}", "[".repeat(levels), "]".repeat(levels)))
            .unwrap();
        let file = file.to_str().unwrap();

        let output = stdout_of(&["--count", file]);
        assert_eq!(output.trim(), "Tokens: 1");
        let output = stdout_of(&["-p", "0", "--count", file]);
        assert_eq!(output.trim(), "Tokens: 1");
        let output = stdout_of(&["-p", "0.0.0", "--json", "--compact", file]);
        assert_eq!(output.trim(), r#"[{"kind":"array","start":2,"length":199990}]"#);
    }

    #[test]
    fn top_level_array() {
        let output = stdout_of(&["--count", "tests/data/array.json"]);
        assert_eq!(output.trim(), "Tokens: 4");

        let output = stdout_of(&["-p", "0.tags", "--count", "tests/data/array.json"]);
        assert_eq!(output.trim(), "Tokens: 1");

        let output = stdout_of(&["-p", "2", "tests/data/array.json"]);
        assert_eq!(output.trim(), "\"€uro\"");
    }

    #[test]
    fn reads_stdin() {
        let mut cmd = Command::cargo_bin("jt").expect("Failed to find main binary");
        let assert = cmd
            .env("NO_COLOR", "1")
            .arg("--count")
            .write_stdin("[1, \"two\", [3]]")
            .assert()
            .success();
        let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
        assert_eq!(output.trim(), "Tokens: 3");
    }

    #[test]
    fn empty_object() {
        let mut cmd = Command::cargo_bin("jt").expect("Failed to find main binary");
        let assert = cmd.arg("--count").write_stdin("{}").assert().success();
        let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
        assert_eq!(output.trim(), "Tokens: 0");
    }

    #[test]
    fn malformed_input() {
        let stderr = stderr_of(&["tests/data/broken.json"]);
        assert!(stderr.contains("Failed to parse JSON"), "{stderr}");
        assert!(stderr.contains("Unexpected end of input"), "{stderr}");
    }

    #[test]
    fn missing_path() {
        let stderr = stderr_of(&["-p", "does.not.exist", "tests/data/simple.json"]);
        assert!(stderr.contains("not found"), "{stderr}");
    }

    #[test]
    fn nonexistent_file() {
        let assert = run_main(&["tests/data/nope.json"]);
        assert.failure().code(1);
    }

    #[test]
    fn compact_requires_json() {
        run_main(&["--compact", "tests/data/simple.json"])
            .failure()
            .code(2);
    }

    #[test]
    fn generate_man_pages() {
        let dir = tempfile::tempdir().unwrap();
        let dir_arg = dir.path().to_str().unwrap();
        let output = stdout_of(&["generate", "man", "-o", dir_arg]);
        assert_eq!(output.lines().count(), 4, "{output}");
        for page in ["jt.1", "jt-generate.1", "jt-generate-shell.1", "jt-generate-man.1"]
        {
            assert!(dir.path().join(page).is_file(), "missing {page}");
        }
    }

    #[test]
    fn generate_shell_completions() {
        let output = stdout_of(&["generate", "shell", "bash"]);
        assert!(output.contains("jt"));
    }
}
