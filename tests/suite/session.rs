//! Panel session lifecycle tests

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use triage_engine::{App, AppConfig, FeedStatus, TriageConfig};
use triage_feed::MemoryFeed;
use triage_tui::apply_key;

use crate::common::{ROOT, open_session, record, sample_records};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn sample_app() -> (Arc<MemoryFeed>, App) {
    let feed = Arc::new(MemoryFeed::with_records(sample_records()));
    let config = TriageConfig {
        app: Some(AppConfig {
            root: Some(ROOT.to_string()),
            ..AppConfig::default()
        }),
        ..TriageConfig::default()
    };
    let app = App::new(feed.clone(), Some(&config));
    (feed, app)
}

#[test]
fn close_is_terminal_and_idempotent() {
    let (feed, mut session) = open_session(sample_records());
    assert!(session.is_open());

    session.close();
    session.close();
    assert!(!session.is_open());
    assert!(session.tree().is_empty());

    // Feed churn after close changes nothing.
    feed.set_records(vec![record("src/new.rs", 0, 0, 1, "late arrival")]);
    assert!(!session.poll_changes(8));
    session.refresh();
    assert!(session.tree().is_empty());
}

#[test]
fn refresh_failure_keeps_last_good_tree() {
    let (feed, mut session) = open_session(sample_records());
    assert_eq!(session.tree().groups().len(), 2);

    feed.fail_with("linter crashed");
    assert!(session.poll_changes(8));

    match session.feed_status() {
        FeedStatus::Failed(reason) => assert!(reason.contains("linter crashed")),
        FeedStatus::Ok => panic!("expected failed feed status"),
    }
    assert_eq!(session.tree().groups().len(), 2, "stale tree survives");

    feed.set_records(sample_records());
    assert!(session.poll_changes(8));
    assert_eq!(*session.feed_status(), FeedStatus::Ok);
}

#[test]
fn notice_bursts_coalesce_into_one_rebuild() {
    let (feed, mut session) = open_session(Vec::new());
    assert!(session.tree().is_empty());

    for n in 0..5 {
        feed.set_records(vec![record("src/a.rs", n, 0, 1, &format!("pass {n}"))]);
    }
    assert!(session.poll_changes(32));

    let leaf = &session.tree().groups()[0].children()[0];
    assert_eq!(leaf.diagnostic().message(), "pass 4");

    // Every queued notice was folded into that one rebuild.
    assert!(!session.poll_changes(32));
}

#[test]
fn keyboard_walkthrough_expands_and_jumps() {
    let (_feed, mut app) = sample_app();

    // Down to src/view.rs, open it, down onto its first leaf, activate.
    apply_key(&mut app, key(KeyCode::Char('j')));
    apply_key(&mut app, key(KeyCode::Enter));
    assert!(app.session().tree().groups()[1].is_expanded());

    apply_key(&mut app, key(KeyCode::Char('j')));
    apply_key(&mut app, key(KeyCode::Enter));
    assert_eq!(app.status_message(), Some("jump to src/view.rs:13:5"));
}

#[test]
fn navigation_acknowledges_the_status_line() {
    let (_feed, mut app) = sample_app();
    apply_key(&mut app, key(KeyCode::Char('r')));
    assert_eq!(app.status_message(), Some("rescanning"));

    apply_key(&mut app, key(KeyCode::Char('j')));
    assert_eq!(app.status_message(), None);
}

#[test]
fn selection_clamps_when_the_tree_shrinks() {
    let (feed, mut app) = sample_app();

    apply_key(&mut app, key(KeyCode::Enter));
    apply_key(&mut app, key(KeyCode::Char('G')));
    assert_eq!(app.session().selected(), 3);

    feed.set_records(vec![record("src/a.rs", 0, 0, 1, "only one left")]);
    app.poll_feed();

    assert_eq!(app.session().visible_rows().len(), 1);
    assert_eq!(app.session().selected(), 0);
}
