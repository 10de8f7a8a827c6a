//! Normalization and ordering tests

use crate::common::{ROOT, context, record, sample_records};
use triage_engine::{Tree, normalize, project_leaf};
use triage_types::RawDiagnostic;

#[test]
fn groups_follow_display_path_order() {
    let outcome = normalize(&sample_records(), &context());
    let tree = Tree::build(outcome.into_parts().0);

    let paths: Vec<&str> = tree.groups().iter().map(|g| g.display_path()).collect();
    assert_eq!(paths, ["src/app.rs", "src/view.rs"]);
}

#[test]
fn leaves_follow_line_then_column_order() {
    let outcome = normalize(&sample_records(), &context());
    let tree = Tree::build(outcome.into_parts().0);

    let app_positions: Vec<(u32, u32)> = tree.groups()[0]
        .children()
        .iter()
        .map(|leaf| (leaf.node_key().line(), leaf.node_key().col()))
        .collect();
    assert_eq!(app_positions, [(3, 1), (3, 9)]);

    let view_positions: Vec<(u32, u32)> = tree.groups()[1]
        .children()
        .iter()
        .map(|leaf| (leaf.node_key().line(), leaf.node_key().col()))
        .collect();
    assert_eq!(view_positions, [(12, 4), (40, 2)]);
}

#[test]
fn feed_order_never_leaks_into_the_tree() {
    let forward = normalize(&sample_records(), &context());
    let mut reversed_input = sample_records();
    reversed_input.reverse();
    let reversed = normalize(&reversed_input, &context());

    let a = Tree::build(forward.into_parts().0);
    let b = Tree::build(reversed.into_parts().0);

    let order = |tree: &Tree| -> Vec<String> {
        tree.groups()
            .iter()
            .flat_map(|group| {
                group
                    .children()
                    .iter()
                    .map(|leaf| leaf.diagnostic().message().to_string())
            })
            .collect()
    };
    assert_eq!(order(&a), order(&b));
}

#[test]
fn path_spellings_collapse_into_one_group() {
    let records = vec![
        RawDiagnostic::new(format!("{ROOT}/./src/a.rs"), 0, 0, 1, "first", "test-lint"),
        RawDiagnostic::new(format!("{ROOT}/src/a.rs"), 1, 0, 2, "second", "test-lint"),
        RawDiagnostic::new(format!("{ROOT}/src/b/../a.rs"), 2, 0, 3, "third", "test-lint"),
    ];
    let outcome = normalize(&records, &context());
    let tree = Tree::build(outcome.into_parts().0);

    assert_eq!(tree.groups().len(), 1);
    assert_eq!(tree.groups()[0].display_path(), "src/a.rs");
    assert_eq!(tree.groups()[0].children().len(), 3);
}

#[test]
fn out_of_range_severity_is_rejected_not_fatal() {
    let records = vec![
        record("src/a.rs", 0, 0, 1, "kept"),
        record("src/a.rs", 1, 0, 9, "dropped"),
        record("src/a.rs", 2, 0, 4, "also kept"),
    ];
    let outcome = normalize(&records, &context());

    assert_eq!(outcome.rejected().len(), 1);
    let (normalized, _) = outcome.into_parts();
    let messages: Vec<&str> = normalized.iter().map(|n| n.message()).collect();
    assert_eq!(messages, ["kept", "also kept"]);
}

#[test]
fn leaf_presentation_keeps_zero_based_positions() {
    let outcome = normalize(&[record("src/a.rs", 12, 4, 2, "shadowed")], &context());
    let tree = Tree::build(outcome.into_parts().0);

    let line = project_leaf(&tree.groups()[0].children()[0]);
    assert_eq!(line.text(), "W: shadowed [12, 4]");
}

#[test]
fn jump_targets_are_one_based() {
    let outcome = normalize(&[record("src/a.rs", 3, 1, 1, "boom")], &context());
    let (normalized, _) = outcome.into_parts();
    assert_eq!(normalized[0].jump_target(), "src/a.rs:4:2");
}
