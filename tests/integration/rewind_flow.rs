//! Stepping, rewinding and replaying programs through the rewrite engine

use super::common::fixtures::{BROKEN, SQUARE, TWO_REDEXES};
use retrace::{
    ChoiceMode, Controller, ControllerError, DiffMode, Fragment, RewriteEngine, RowOrder,
    TieBreak,
};

fn controller(mode: ChoiceMode) -> Controller<RewriteEngine> {
    Controller::new(RewriteEngine::new())
        .with_mode(mode)
        .with_history(RowOrder::OldestFirst, TieBreak::default())
}

fn renderings(controller: &Controller<RewriteEngine>) -> Vec<String> {
    controller
        .trace()
        .snapshots()
        .iter()
        .map(|s| s.rendering.clone())
        .collect()
}

fn reduce_fully(controller: &mut Controller<RewriteEngine>) {
    while !controller.is_terminal() {
        controller.apply(0).expect("apply failed");
    }
}

#[test]
fn square_reduces_to_normal_form() {
    let mut controller = controller(ChoiceMode::Single);
    controller.run(SQUARE).unwrap();
    reduce_fully(&mut controller);

    assert_eq!(
        renderings(&controller),
        vec!["(2 + 3) * (2 + 3)", "(5) * (5)", "5 * 5", "25"]
    );
    assert_eq!(controller.trace().rows().len(), 3);
    assert!(controller.choices().is_empty());
}

#[test]
fn every_row_reconstructs_both_renderings() {
    let mut controller = controller(ChoiceMode::Single);
    controller.run(SQUARE).unwrap();
    reduce_fully(&mut controller);

    let snapshots = renderings(&controller);
    let rows = controller.rows();
    assert_eq!(rows.len(), snapshots.len());
    for row in &rows {
        assert_eq!(row.new_text(), snapshots[row.index]);
        if row.index > 0 {
            assert_eq!(row.mode, Some(DiffMode::Anchored));
            assert_eq!(row.old_text(), snapshots[row.index - 1]);
        }
    }
}

#[test]
fn contracted_duplicates_are_all_highlighted() {
    let mut controller = controller(ChoiceMode::Single);
    controller.run(SQUARE).unwrap();
    controller.apply(0).unwrap();

    let rows = controller.rows();
    assert_eq!(
        rows[1].fragments,
        vec![
            Fragment::similar("("),
            Fragment::changed("2 + 3", "5"),
            Fragment::similar(") * ("),
            Fragment::changed("2 + 3", "5"),
            Fragment::similar(")"),
        ]
    );
    assert_eq!(rows[1].details(), vec![("2 + 3", "5")]);
}

#[test]
fn rewind_to_start_and_replay() {
    let mut controller = controller(ChoiceMode::Single);
    controller.run(SQUARE).unwrap();
    reduce_fully(&mut controller);
    let full = renderings(&controller);

    controller.rewind(1).unwrap();
    assert_eq!(renderings(&controller), vec![full[0].clone()]);
    assert_eq!(controller.choices()[0].from_text, "2 + 3");

    reduce_fully(&mut controller);
    assert_eq!(renderings(&controller), full);
}

#[test]
fn rewind_to_middle_keeps_prefix() {
    let mut controller = controller(ChoiceMode::Single);
    controller.run(SQUARE).unwrap();
    reduce_fully(&mut controller);

    controller.rewind(2).unwrap();
    assert_eq!(renderings(&controller), vec!["(2 + 3) * (2 + 3)", "(5) * (5)"]);
    assert_eq!(controller.choices()[0].from_text, "(5)");

    // Rewinding to the current state is allowed and changes nothing.
    controller.rewind(2).unwrap();
    assert_eq!(controller.trace().len(), 2);
}

#[test]
fn rewind_past_the_end_is_out_of_range() {
    let mut controller = controller(ChoiceMode::Single);
    controller.run(SQUARE).unwrap();
    controller.apply(0).unwrap();

    assert_eq!(
        controller.rewind(3).unwrap_err(),
        ControllerError::OutOfRange { requested: 3, len: 2 }
    );
    assert_eq!(controller.trace().len(), 2);
}

#[test]
fn free_choice_takes_a_different_branch() {
    let mut controller = controller(ChoiceMode::All);
    controller.run(TWO_REDEXES).unwrap();

    let labels: Vec<_> = controller
        .choices()
        .iter()
        .map(|c| c.label.clone().unwrap_or_default())
        .collect();
    assert_eq!(labels, vec!["rule 1", "rule 2"]);

    controller.apply(1).unwrap();
    assert_eq!(renderings(&controller)[1], "(1 + 1) + (4)");

    // Go back and take the other branch instead.
    controller.rewind(1).unwrap();
    controller.apply(0).unwrap();
    assert_eq!(renderings(&controller)[1], "(2) + (2 + 2)");
}

#[test]
fn distant_snapshots_compare_by_tokens() {
    let mut controller = controller(ChoiceMode::Single);
    controller.run(SQUARE).unwrap();
    reduce_fully(&mut controller);

    let row = controller.compare(0, 3).unwrap();
    assert_eq!(row.mode, Some(DiffMode::Token));
    assert_eq!(row.new_text(), "25");
    assert_eq!(row.old_text(), "(2 + 3) * (2 + 3)");
}

#[test]
fn parse_error_names_the_line_and_clears_the_trace() {
    let mut controller = controller(ChoiceMode::Single);
    controller.run(SQUARE).unwrap();
    controller.apply(0).unwrap();

    let err = controller.run(BROKEN).unwrap_err();
    assert!(matches!(err, ControllerError::Parse(_)));
    assert!(err.to_string().starts_with("line 2:"));
    assert!(controller.trace().is_empty());
    assert!(controller.choices().is_empty());

    controller.run(SQUARE).unwrap();
    assert_eq!(controller.trace().len(), 1);
}
