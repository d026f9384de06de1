use super::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::TempDir;
use tsafe_common::Span;
use tsafe_solver::TypeNameMatcher;

const SCENARIOS: &str = r#"{
    "file": "scenarios.ts",
    "types": {
        "StrOrNum": { "union": ["string", "number"] },
        "Greeting": { "object": [{ "name": "hello", "type": "string" }] },
        "LooseGreeting": { "object": [{ "name": "hello", "type": "any" }] }
    },
    "sites": [
        {
            "kind": "typeAssertion",
            "span": { "start": 0, "end": 11 },
            "expression": { "span": { "start": 0, "end": 1 }, "type": "StrOrNum", "text": "a" },
            "annotation": { "span": { "start": 5, "end": 11 }, "type": "string" }
        },
        {
            "kind": "typeAssertion",
            "span": { "start": 20, "end": 31 },
            "expression": { "span": { "start": 20, "end": 21 }, "type": "any", "text": "b" },
            "annotation": { "span": { "start": 25, "end": 31 }, "type": "string" }
        },
        {
            "kind": "typeAssertion",
            "span": { "start": 40, "end": 53 },
            "expression": { "span": { "start": 40, "end": 41 }, "type": "never", "text": "c" },
            "annotation": { "span": { "start": 45, "end": 53 }, "type": "Function" }
        },
        {
            "kind": "templateLiteral",
            "span": { "start": 60, "end": 68 },
            "expressions": [{ "span": { "start": 63, "end": 66 }, "type": "Greeting", "text": "obj" }]
        },
        {
            "kind": "typeAssertion",
            "span": { "start": 80, "end": 96 },
            "expression": { "span": { "start": 80, "end": 81 }, "type": "Greeting", "text": "d" },
            "annotation": { "span": { "start": 85, "end": 96 }, "type": "LooseGreeting" }
        },
        {
            "kind": "typeAssertion",
            "span": { "start": 100, "end": 113 },
            "expression": { "span": { "start": 100, "end": 101 }, "type": { "array": "StrOrNum" }, "text": "e" },
            "annotation": { "span": { "start": 105, "end": 113 }, "type": { "array": "string" } }
        }
    ]
}"#;

const ANY_AS_STRING: &str = r#"{
    "file": "input.ts",
    "source": "const x = v as string;\n",
    "sites": [{
        "kind": "typeAssertion",
        "span": { "start": 10, "end": 21 },
        "expression": { "span": { "start": 10, "end": 11 }, "type": "any", "text": "v" },
        "annotation": { "span": { "start": 15, "end": 21 }, "type": "string" }
    }]
}"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}

fn check_args(request: PathBuf, config: Option<PathBuf>) -> CheckArgs {
    CheckArgs {
        request,
        config,
        format: OutputFormat::Text,
    }
}

fn run_command(command: Command) -> (Result<u8>, String) {
    let args = CliArgs {
        no_color: true,
        command,
    };
    let mut out = Vec::new();
    let status = run(&args, false, &mut out);
    (status, String::from_utf8(out).expect("utf-8 output"))
}

#[test]
fn reference_scenarios() {
    let dir = TempDir::new().expect("temp dir");
    let request = write(&dir, "request.json", SCENARIOS);
    let result = check(&check_args(request, None)).expect("check runs");
    assert_eq!(result.file, "scenarios.ts");

    let ids: Vec<&str> = result.diagnostics.iter().map(|d| d.message_id).collect();
    assert_eq!(
        ids,
        vec![
            "unsafeTypeAssertion",
            "unsafeOfAnyTypeAssertion",
            "unsafeFunctionTypeAssertion",
            "baseToString",
            "unsafeToAnyTypeAssertion",
            "unsafeTypeAssertion",
        ]
    );
    let d = &result.diagnostics;
    assert_eq!(d[0].data("type"), Some("string | number"));
    assert_eq!(d[3].data("certainty"), Some("will"));
    assert_eq!(d[3].data("name"), Some("obj"));
    assert_eq!(d[4].span, Span::new(80, 96));
    assert!(d[4].suggestions.is_empty());
    assert_eq!(d[5].data("type"), Some("(string | number)[]"));
}

#[test]
fn text_output_and_exit_status() {
    let dir = TempDir::new().expect("temp dir");
    let request = write(&dir, "request.json", ANY_AS_STRING);
    let (status, output) = run_command(Command::Check(check_args(request, None)));
    assert_eq!(status.expect("runs"), EXIT_DIAGNOSTICS);
    let expected = format!(
        "input.ts:1:11 - error no-unsafe-type-assertion: Unsafe cast from 'any' detected: consider using type guards or a safer cast.\n    1   const x = v as string;\n       {}{}\n\nFound 1 error.\n",
        " ".repeat(10),
        "~".repeat(11)
    );
    assert_eq!(output, expected);
}

#[test]
fn json_output() {
    let dir = TempDir::new().expect("temp dir");
    let request = write(&dir, "request.json", ANY_AS_STRING);
    let (status, output) = run_command(Command::Check(CheckArgs {
        request,
        config: None,
        format: OutputFormat::Json,
    }));
    assert_eq!(status.expect("runs"), EXIT_DIAGNOSTICS);
    let value: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");
    assert_eq!(value["file"], "input.ts");
    assert_eq!(value["diagnostics"][0]["messageId"], "unsafeOfAnyTypeAssertion");
    assert_eq!(value["diagnostics"][0]["category"], "error");
}

#[test]
fn config_can_turn_rules_off() {
    let dir = TempDir::new().expect("temp dir");
    let request = write(&dir, "request.json", ANY_AS_STRING);
    let config = write(
        &dir,
        "tsafe.json",
        r#"{ "rules": { "no-unsafe-type-assertion": "off" } }"#,
    );
    let (status, output) = run_command(Command::Check(check_args(request, Some(config))));
    assert_eq!(status.expect("runs"), EXIT_SUCCESS);
    assert_eq!(output, "");
}

#[test]
fn warnings_still_fail_the_run() {
    let dir = TempDir::new().expect("temp dir");
    let request = write(&dir, "request.json", ANY_AS_STRING);
    let config = write(
        &dir,
        "tsafe.json",
        r#"{ "rules": { "no-unsafe-type-assertion": "warn" } }"#,
    );
    let (status, output) = run_command(Command::Check(check_args(request, Some(config))));
    assert_eq!(status.expect("runs"), EXIT_DIAGNOSTICS);
    assert!(output.contains(" - warning no-unsafe-type-assertion: "));
    assert!(output.ends_with("Found 1 warning.\n"));
}

#[test]
fn source_is_read_next_to_the_request() {
    let dir = TempDir::new().expect("temp dir");
    write(&dir, "input.ts", "const x = v as string;\n");
    let request = write(
        &dir,
        "request.json",
        &ANY_AS_STRING.replace(r#""source": "const x = v as string;\n","#, ""),
    );
    let result = check(&check_args(request, None)).expect("check runs");
    assert_eq!(result.source.as_deref(), Some("const x = v as string;\n"));
}

#[test]
fn unreadable_inputs_are_errors() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("missing.json");
    let err = check(&check_args(missing, None)).expect_err("missing request");
    assert!(format!("{err:#}").contains("failed to read"));

    let request = write(&dir, "request.json", ANY_AS_STRING);
    let config = write(&dir, "tsafe.json", r#"{ "rules": { "no-such-rule": "off" } }"#);
    let err = check(&check_args(request, Some(config))).expect_err("bad config");
    assert!(format!("{err:#}").contains("invalid options in"));

    let broken = write(
        &dir,
        "broken.json",
        &ANY_AS_STRING.replace(r#""type": "any""#, r#""type": "anything""#),
    );
    let err = check(&check_args(broken, None)).expect_err("unknown type");
    let message = format!("{err:#}");
    assert!(message.contains("failed to resolve"), "{message}");
    assert!(message.contains("unknown type `anything`"), "{message}");
}

#[test]
fn rules_listing() {
    let (status, output) = run_command(Command::Rules);
    assert_eq!(status.expect("runs"), EXIT_SUCCESS);
    let names: Vec<&str> = output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .collect();
    assert_eq!(
        names,
        vec![
            "no-unsafe-type-assertion",
            "no-unsafe-return",
            "no-unsafe-spread",
            "no-base-to-string",
        ]
    );
    assert!(output.lines().all(|line| line.contains(" error ")));
}

#[test]
fn default_options_without_a_path() {
    let options = load_options(None).expect("defaults");
    assert!(options.ignored_type_names.matches("RegExp"));
}
