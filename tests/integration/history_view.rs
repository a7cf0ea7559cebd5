//! Rendering the interactive view into a test buffer

use super::common::fixtures::SQUARE;
use super::common::terminal::{buffer_contains, create_test_terminal_sized, line_containing};
use retrace::ui::{components::Theme, Action, Program};
use retrace::{App, Controller, RewriteEngine, RowOrder, TieBreak};

fn app(order: RowOrder) -> App<RewriteEngine> {
    let controller =
        Controller::new(RewriteEngine::new()).with_history(order, TieBreak::default());
    let mut app = App::new(controller, Program::from_source(SQUARE), Theme::default());
    app.start();
    app.process_pending();
    app
}

fn step(app: &mut App<RewriteEngine>, action: Action) {
    app.handle_action(action);
    app.process_pending();
}

#[test]
fn initial_view_shows_program_and_choice() {
    let app = app(RowOrder::NewestFirst);
    let mut terminal = create_test_terminal_sized(80, 20);
    terminal.draw(|f| app.draw(f)).unwrap();
    let buffer = terminal.backend().buffer();

    assert!(buffer_contains(buffer, "History (1)"));
    assert!(buffer_contains(buffer, "(2 + 3) * (2 + 3)"));
    assert!(buffer_contains(buffer, "initial state"));
    assert!(buffer_contains(buffer, "Choices: Lazy"));
    assert!(buffer_contains(buffer, "1 2 + 3 ⇒ 5"));
    assert!(buffer_contains(buffer, "Enter rewind"));
}

#[test]
fn newest_row_is_on_top_and_selected() {
    let mut app = app(RowOrder::NewestFirst);
    step(&mut app, Action::ApplyChoice(0));
    step(&mut app, Action::ApplyChoice(0));

    let mut terminal = create_test_terminal_sized(80, 20);
    terminal.draw(|f| app.draw(f)).unwrap();
    let buffer = terminal.backend().buffer();

    let newest = line_containing(buffer, "#2").unwrap();
    let oldest = line_containing(buffer, "#0").unwrap();
    assert!(newest < oldest);
    assert!(buffer_contains(buffer, ">  #2"));
    assert!(buffer_contains(buffer, "Step #2"));
    assert!(buffer_contains(buffer, "(5) ⇒ 5"));
}

#[test]
fn normal_form_is_reported() {
    let mut app = app(RowOrder::OldestFirst);
    for _ in 0..3 {
        step(&mut app, Action::ApplyChoice(0));
    }
    assert!(app.controller().is_terminal());

    let mut terminal = create_test_terminal_sized(80, 20);
    terminal.draw(|f| app.draw(f)).unwrap();
    let buffer = terminal.backend().buffer();
    assert!(buffer_contains(buffer, "normal form"));
    assert!(buffer_contains(buffer, "3 steps"));
}

#[test]
fn selecting_an_older_row_and_rewinding() {
    let mut app = app(RowOrder::OldestFirst);
    step(&mut app, Action::ApplyChoice(0));
    step(&mut app, Action::ApplyChoice(0));
    assert_eq!(app.selected(), 2);

    step(&mut app, Action::SelectPrev);
    step(&mut app, Action::RewindToSelected);
    assert_eq!(app.rows().len(), 2);
    assert_eq!(app.controller().choices()[0].from_text, "(5)");
}

#[test]
fn error_shows_in_status_line() {
    let mut app = app(RowOrder::NewestFirst);
    app.handle_action(Action::ApplyChoice(4));

    let mut terminal = create_test_terminal_sized(100, 20);
    terminal.draw(|f| app.draw(f)).unwrap();
    assert!(buffer_contains(terminal.backend().buffer(), "out of range"));
}
