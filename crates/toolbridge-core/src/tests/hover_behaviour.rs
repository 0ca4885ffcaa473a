//! Hover: position validation, word extraction, and the no-fallthrough rule.

use lsp_types::{Hover, HoverContents, MarkupKind, Position, Range};
use rstest::{fixture, rstest};
use toolbridge_config::{ConfigTable, HoverKind, ToolConfig};

use super::{GO_URI, MockRunner, StaticStore, exit_failure};
use crate::dispatcher::Dispatcher;
use crate::errors::{DispatchError, RunError};

#[fixture]
fn store() -> StaticStore {
    StaticStore::default().with(GO_URI, "package main\nfoo.bar\n", "go")
}

fn hover_tools(tools: Vec<ToolConfig>) -> ConfigTable {
    ConfigTable::new().with_language("go", tools)
}

fn markup(hover: &Hover) -> (MarkupKind, &str) {
    match &hover.contents {
        HoverContents::Markup(content) => (content.kind.clone(), content.value.as_str()),
        other => panic!("expected markup contents, got {other:?}"),
    }
}

#[rstest]
fn echoes_word_through_stdin_with_word_range(store: StaticStore) {
    let mut runner = MockRunner::new();
    runner
        .expect_run()
        .withf(|invocation| {
            invocation.command_line() == "cat" && invocation.stdin() == Some(b"foo".as_slice())
        })
        .times(1)
        .returning(|invocation| Ok(invocation.stdin().unwrap_or_default().to_vec()));
    let table = hover_tools(vec![
        ToolConfig::default()
            .with_hover_command("cat")
            .with_hover_stdin(true),
    ]);
    let dispatcher = Dispatcher::new(table, store, runner);

    let hover = dispatcher
        .hover(GO_URI, Position::new(1, 1))
        .expect("hover should succeed")
        .expect("hover should produce content");

    assert_eq!(markup(&hover), (MarkupKind::PlainText, "foo"));
    assert_eq!(
        hover.range,
        Some(Range::new(Position::new(1, 0), Position::new(1, 3)))
    );
}

#[rstest]
fn substitutes_word_and_trims_markdown_output(store: StaticStore) {
    let mut runner = MockRunner::new();
    runner
        .expect_run()
        .withf(|invocation| invocation.command_line() == "godoc bar" && invocation.stdin().is_none())
        .times(1)
        .returning(|_| Ok(b"\n  **bar** docs \n\n".to_vec()));
    let table = hover_tools(vec![
        ToolConfig::default()
            .with_hover_command("godoc ${INPUT}")
            .with_hover_kind(HoverKind::Markdown),
    ]);
    let dispatcher = Dispatcher::new(table, store, runner);

    let hover = dispatcher
        .hover(GO_URI, Position::new(1, 6))
        .expect("hover should succeed")
        .expect("hover should produce content");

    assert_eq!(markup(&hover), (MarkupKind::Markdown, "**bar** docs"));
    assert_eq!(
        hover.range,
        Some(Range::new(Position::new(1, 4), Position::new(1, 7)))
    );
}

#[rstest]
fn first_failing_tool_aborts_without_fallthrough(store: StaticStore) {
    let mut runner = MockRunner::new();
    runner
        .expect_run()
        .withf(|invocation| invocation.command_line() == "first foo")
        .times(1)
        .returning(|invocation| Err(exit_failure(invocation.command_line())));
    let table = hover_tools(vec![
        ToolConfig::default().with_hover_command("first"),
        ToolConfig::default().with_hover_command("second"),
    ]);
    let dispatcher = Dispatcher::new(table, store, runner);

    let error = dispatcher
        .hover(GO_URI, Position::new(1, 0))
        .expect_err("hover must not fall through");

    assert!(matches!(
        error,
        DispatchError::HoverFailed {
            source: RunError::NonZeroExit { .. },
            ..
        }
    ));
    assert!(!error.is_validation());
}

#[rstest]
fn skips_candidates_without_a_hover_command(store: StaticStore) {
    let mut runner = MockRunner::new();
    runner
        .expect_run()
        .withf(|invocation| invocation.command_line() == "dict package")
        .times(1)
        .returning(|_| Ok(b"a bundle".to_vec()));
    let table = hover_tools(vec![
        ToolConfig::default().with_format_command("gofmt"),
        ToolConfig::default().with_hover_command("dict"),
    ]);
    let dispatcher = Dispatcher::new(table, store, runner);

    let hover = dispatcher
        .hover(GO_URI, Position::new(0, 2))
        .expect("hover should succeed");

    assert!(hover.is_some());
}

#[rstest]
#[case::not_configured(ConfigTable::new())]
#[case::unsupported(hover_tools(vec![ToolConfig::default().with_format_command("gofmt")]))]
fn missing_hover_tool_yields_no_result(store: StaticStore, #[case] table: ConfigTable) {
    let dispatcher = Dispatcher::new(table, store, MockRunner::new());

    let hover = dispatcher
        .hover(GO_URI, Position::new(0, 0))
        .expect("absence is not an error");

    assert!(hover.is_none());
}

#[rstest]
#[case::line_past_end(Position::new(3, 0))]
#[case::character_past_end(Position::new(1, 8))]
#[case::huge_line(Position::new(u32::MAX, 0))]
fn out_of_bounds_position_is_rejected(store: StaticStore, #[case] position: Position) {
    let table = hover_tools(vec![ToolConfig::default().with_hover_command("dict")]);
    let dispatcher = Dispatcher::new(table, store, MockRunner::new());

    let error = dispatcher
        .hover(GO_URI, position)
        .expect_err("position is outside the document");

    assert!(matches!(error, DispatchError::InvalidPosition { .. }));
    assert!(error.is_validation());
}

#[rstest]
fn cursor_at_line_end_and_trailing_empty_line_are_valid(store: StaticStore) {
    let mut runner = MockRunner::new();
    runner
        .expect_run()
        .times(2)
        .returning(|_| Ok(b"x".to_vec()));
    let table = hover_tools(vec![ToolConfig::default().with_hover_command("dict")]);
    let dispatcher = Dispatcher::new(table, store, runner);

    let at_end = dispatcher
        .hover(GO_URI, Position::new(1, 7))
        .expect("line end is a valid cursor");
    let empty_line = dispatcher
        .hover(GO_URI, Position::new(2, 0))
        .expect("trailing empty line is addressable");

    assert_eq!(
        at_end.and_then(|hover| hover.range),
        Some(Range::new(Position::new(1, 4), Position::new(1, 7)))
    );
    assert_eq!(
        empty_line.and_then(|hover| hover.range),
        Some(Range::new(Position::new(2, 0), Position::new(2, 0)))
    );
}

#[rstest]
fn unknown_document_is_rejected() {
    let table = hover_tools(vec![ToolConfig::default().with_hover_command("dict")]);
    let dispatcher = Dispatcher::new(table, StaticStore::default(), MockRunner::new());

    let error = dispatcher
        .hover(GO_URI, Position::new(0, 0))
        .expect_err("document is not open");

    assert!(matches!(error, DispatchError::DocumentNotFound { .. }));
}

#[rstest]
fn astral_characters_join_the_adjacent_word() {
    let mut runner = MockRunner::new();
    runner
        .expect_run()
        .withf(|invocation| invocation.command_line() == "dict foo😀")
        .times(1)
        .returning(|_| Ok(b"entry".to_vec()));
    let table = hover_tools(vec![ToolConfig::default().with_hover_command("dict")]);
    let store = StaticStore::default().with(GO_URI, "foo😀 x", "go");
    let dispatcher = Dispatcher::new(table, store, runner);

    let hover = dispatcher
        .hover(GO_URI, Position::new(0, 0))
        .expect("hover should succeed");

    assert_eq!(
        hover.and_then(|found| found.range),
        Some(Range::new(Position::new(0, 0), Position::new(0, 5)))
    );
}
