use std::io::Write;
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;
use tfgraph::{Cli, run_main};

fn tfgraph(args: &[&str], stdin: impl AsRef<[u8]>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tfgraph"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn tfgraph");
    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(stdin.as_ref())
        .expect("write stdin");
    child.wait_with_output().expect("wait for tfgraph")
}

#[test]
fn filters_stdin_to_stdout() {
    let input = "module.vpc -> module.alb_security_group depends_on\n";
    let output = tfgraph(&[], input);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout, tfgraph_dot::simplify(input));
    assert!(output.stderr.is_empty());
}

#[test]
fn invalid_utf8_on_stdin_still_renders_edges() {
    let output = tfgraph(&[], b"module.vpc -> module.alb_security_group \xff label\n");
    assert!(output.status.success());
    assert!(output.stderr.is_empty());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(r#"    "VPC" -> "ALB Security Group""#));
}

#[test]
fn empty_stdin_still_succeeds() {
    let output = tfgraph(&[], "");
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), tfgraph_dot::simplify(""));
}

#[test]
fn file_input_and_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("graph.dot");
    let out = dir.path().join("simple.dot");
    std::fs::write(&input, "aws_route53 -> module.alb\n").unwrap();

    let output = tfgraph(
        &["-i", input.to_str().unwrap(), "-o", out.to_str().unwrap()],
        "",
    );
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains(r#"    "Route53" -> "ALB""#));
}

#[test]
fn missing_input_reports_error_but_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.dot");
    let output = tfgraph(&["--input", missing.to_str().unwrap()], "");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with("Error: FileNotFound"), "stderr: {stderr}");
}

#[test]
fn print_registry_round_trips() {
    let output = tfgraph(&["--print-registry"], "");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    let parsed = tfgraph_core::Registry::from_toml_str(&text).unwrap();
    assert_eq!(&parsed, tfgraph_core::Registry::builtin());
}

#[test]
fn custom_registry_via_library() {
    let dir = tempfile::tempdir().unwrap();
    let registry = dir.path().join("registry.toml");
    let input = dir.path().join("graph.dot");
    std::fs::write(
        &registry,
        r#"
[[entity]]
id = "module.app"
label = "App"

[[entity]]
id = "module.db"
label = "Database"
"#,
    )
    .unwrap();
    std::fs::write(&input, "\"module.app.x\" -> \"module.db.y\"\n").unwrap();

    let opts = Cli::new().with_registry(&registry).with_input(&input);
    let document = run_main(&opts).unwrap();
    assert!(document.contains(r#"    "Variables" -> "App""#));
    assert!(document.contains(r#"    "App" -> "Database""#));
    assert!(document.contains(r#"    "Database" -> "App""#));
    assert!(!document.contains(r#""VPC""#));
}

#[test]
fn invalid_registry_is_an_error_from_run_main() {
    let dir = tempfile::tempdir().unwrap();
    let registry = dir.path().join("registry.toml");
    std::fs::write(&registry, "entity = 3\n").unwrap();

    let opts = Cli::new().with_registry(&registry).with_print_registry(true);
    let err = run_main(&opts).unwrap_err();
    assert_eq!(err.kind(), tfgraph_core::ErrorKind::DeserializationFailed);
}
