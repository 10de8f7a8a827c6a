//! Expansion reconciliation across rebuilds

use crate::common::{context, open_session, record, sample_records};
use triage_engine::{Tree, normalize};

fn build(records: &[triage_types::RawDiagnostic]) -> Tree {
    let outcome = normalize(records, &context());
    Tree::build(outcome.into_parts().0)
}

#[test]
fn expansion_follows_identity_not_position() {
    let (feed, mut session) = open_session(sample_records());

    // Expand src/view.rs, the second group row.
    session.select_next();
    assert!(session.toggle_selected());
    assert!(session.tree().groups()[1].is_expanded());

    // A new file sorts ahead of everything, shifting positions by one.
    let mut records = sample_records();
    records.push(record("src/aaa.rs", 0, 0, 1, "new first group"));
    feed.set_records(records);
    assert!(session.poll_changes(8));

    assert_eq!(session.tree().groups()[0].display_path(), "src/aaa.rs");
    assert!(!session.tree().groups()[0].is_expanded());
    assert!(!session.tree().groups()[1].is_expanded());
    assert!(session.tree().groups()[2].is_expanded(), "src/view.rs stays open");
}

#[test]
fn vanished_groups_drop_out_of_the_snapshot_silently() {
    let (feed, mut session) = open_session(sample_records());

    // Expand the first group.
    session.toggle_selected();
    assert!(session.tree().groups()[0].is_expanded());

    // src/app.rs disappears entirely.
    feed.set_records(vec![record("src/view.rs", 12, 4, 1, "unused variable `frame`")]);
    assert!(session.poll_changes(8));

    assert_eq!(session.tree().groups().len(), 1);
    assert_eq!(session.tree().groups()[0].display_path(), "src/view.rs");

    // And coming back later, it starts collapsed again.
    feed.set_records(sample_records());
    assert!(session.poll_changes(8));
    let paths: Vec<&str> = session
        .tree()
        .groups()
        .iter()
        .map(|g| g.display_path())
        .collect();
    assert_eq!(paths, ["src/app.rs", "src/view.rs"]);
    assert!(!session.tree().groups()[0].is_expanded());
}

#[test]
fn position_collision_keeps_the_last_record() {
    let records = vec![
        record("src/a.rs", 7, 0, 2, "older finding"),
        record("src/a.rs", 7, 0, 1, "newer finding"),
    ];
    let tree = build(&records);

    assert_eq!(tree.groups()[0].children().len(), 1);
    let leaf = &tree.groups()[0].children()[0];
    assert_eq!(leaf.diagnostic().message(), "newer finding");
    assert_eq!(tree.error_count(), 1);
    assert_eq!(tree.warning_count(), 0);
}

#[test]
fn a_fresh_session_starts_fully_collapsed() {
    let (_feed, mut session) = open_session(sample_records());
    session.toggle_selected();
    assert!(session.tree().groups()[0].is_expanded());
    session.close();

    let (_feed2, reopened) = open_session(sample_records());
    assert!(reopened.tree().groups().iter().all(|g| !g.is_expanded()));
}
