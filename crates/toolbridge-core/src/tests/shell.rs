//! End-to-end runs through the real POSIX shell.

use std::ffi::OsString;

use lsp_types::{HoverContents, Position, Range};
use rstest::{fixture, rstest};
use toolbridge_config::{ConfigTable, EnvOverride, ToolConfig};

use super::{GO_URI, StaticStore};
use crate::dispatcher::Dispatcher;
use crate::errors::{DispatchError, RunError};
use crate::runner::{CommandRunner, Invocation, ProcessEnvironment, ShellRunner};

#[fixture]
fn runner() -> ShellRunner {
    let path = std::env::var_os("PATH").unwrap_or_else(|| OsString::from("/usr/bin:/bin"));
    ShellRunner::new(ProcessEnvironment::from_pairs([(OsString::from("PATH"), path)]))
}

fn run(runner: &ShellRunner, invocation: &Invocation) -> String {
    let output = runner.run(invocation).expect("command should succeed");
    String::from_utf8(output).expect("output should be UTF-8")
}

#[rstest]
fn pipes_stdin_to_the_tool(runner: ShellRunner) {
    let invocation = Invocation::new("tr a-z A-Z").with_stdin("a\nbb\n");

    assert_eq!(run(&runner, &invocation), "A\nBB\n");
}

#[rstest]
fn captures_stdout_and_stderr_in_order(runner: ShellRunner) {
    let invocation = Invocation::new("echo out; echo err 1>&2; echo again");

    assert_eq!(run(&runner, &invocation), "out\nerr\nagain\n");
}

#[rstest]
fn surfaces_exit_status_and_output(runner: ShellRunner) {
    let error = runner
        .run(&Invocation::new("echo oops 1>&2; exit 3"))
        .expect_err("non-zero exit is an error");

    match error {
        RunError::NonZeroExit { status, output, .. } => {
            assert_eq!(status, Some(3));
            assert_eq!(output, "oops\n");
        }
        other => panic!("expected non-zero exit, got {other:?}"),
    }
}

#[rstest]
fn applies_overrides_over_the_base_environment() {
    let path = std::env::var_os("PATH").unwrap_or_else(|| OsString::from("/usr/bin:/bin"));
    let runner = ShellRunner::new(ProcessEnvironment::from_pairs([
        (OsString::from("PATH"), path),
        (OsString::from("TB_VALUE"), OsString::from("base")),
        (OsString::from("TB_KEPT"), OsString::from("kept")),
    ]));
    let invocation = Invocation::new("printf '%s %s' \"$TB_VALUE\" \"$TB_KEPT\"").with_env(&[
        EnvOverride::new("TB_VALUE", "first"),
        EnvOverride::new("TB_VALUE", "last"),
    ]);

    assert_eq!(run(&runner, &invocation), "last kept");
}

#[rstest]
fn tool_that_ignores_large_input_still_succeeds(runner: ShellRunner) {
    let input = vec![b'x'; 4 * 1024 * 1024];
    let invocation = Invocation::new("echo done").with_stdin(input);

    assert_eq!(run(&runner, &invocation), "done\n");
}

#[rstest]
fn large_input_round_trips_without_deadlock(runner: ShellRunner) {
    let input = "line\n".repeat(200_000);
    let invocation = Invocation::new("cat").with_stdin(input.clone());

    assert_eq!(run(&runner, &invocation), input);
}

#[rstest]
fn formats_document_with_real_tool(runner: ShellRunner) {
    let table = ConfigTable::new().with_language(
        "go",
        vec![
            ToolConfig::default().with_format_command("false"),
            ToolConfig::default().with_format_command("tr a-z A-Z # ${INPUT}"),
        ],
    );
    let store = StaticStore::default().with(GO_URI, "a\nbb\n", "go");
    let dispatcher = Dispatcher::new(table, store, runner);

    let edits = dispatcher.format(GO_URI).expect("second formatter succeeds");

    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].new_text, "A\nBB\n");
    assert_eq!(
        edits[0].range,
        Range::new(Position::new(0, 0), Position::new(2, 0))
    );
}

#[rstest]
fn strips_carriage_returns_from_formatter_output(runner: ShellRunner) {
    let table = ConfigTable::new().with_language(
        "go",
        vec![ToolConfig::default().with_format_command("printf 'A\\r\\nB\\r\\n' # ${INPUT}")],
    );
    let store = StaticStore::default().with(GO_URI, "a\nb\n", "go");
    let dispatcher = Dispatcher::new(table, store, runner);

    let edits = dispatcher.format(GO_URI).expect("formatter succeeds");

    assert_eq!(edits[0].new_text, "A\nB\n");
}

#[rstest]
fn hovers_with_real_tool(runner: ShellRunner) {
    let table = ConfigTable::new().with_language(
        "go",
        vec![
            ToolConfig::default()
                .with_hover_command("cat")
                .with_hover_stdin(true),
        ],
    );
    let store = StaticStore::default().with(GO_URI, "foo.bar", "go");
    let dispatcher = Dispatcher::new(table, store, runner);

    let hover = dispatcher
        .hover(GO_URI, Position::new(0, 1))
        .expect("hover succeeds")
        .expect("hover has content");

    match hover.contents {
        HoverContents::Markup(content) => assert_eq!(content.value, "foo"),
        other => panic!("expected markup, got {other:?}"),
    }
    assert_eq!(
        hover.range,
        Some(Range::new(Position::new(0, 0), Position::new(0, 3)))
    );
}

#[rstest]
fn hover_does_not_try_second_real_tool(runner: ShellRunner) {
    let table = ConfigTable::new().with_language(
        "go",
        vec![
            ToolConfig::default().with_hover_command("false"),
            ToolConfig::default().with_hover_command("echo"),
        ],
    );
    let store = StaticStore::default().with(GO_URI, "foo.bar", "go");
    let dispatcher = Dispatcher::new(table, store, runner);

    let error = dispatcher
        .hover(GO_URI, Position::new(0, 1))
        .expect_err("first hover tool fails");

    assert!(matches!(error, DispatchError::HoverFailed { .. }));
}
