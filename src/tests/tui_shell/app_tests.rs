use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::*;
use crate::model::GalleryConfig;

fn record(raw: &str, title: &str, tags: &[&str]) -> PackageRecord {
    PackageRecord {
        raw_name: raw.to_string(),
        title: title.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        preview_ref: None,
        readme_ref: None,
        config_ref: None,
        created_at: None,
        updated_at: None,
        fetch_error: None,
    }
}

fn snapshot(generation: u64, records: Vec<PackageRecord>) -> Snapshot {
    Snapshot {
        generation,
        records: Arc::from(records),
        failed_folders: 0,
    }
}

fn app() -> App {
    App::new(TuiRunOptions {
        config: GalleryConfig::default(),
        download_dir: std::env::temp_dir(),
        runtime: tokio::runtime::Handle::current(),
    })
    .expect("app")
}

fn seeded() -> App {
    let mut app = app();
    app.apply_snapshot(snapshot(
        1,
        vec![
            record("[UI] Widget A", "Widget A", &["UI"]),
            record("Widget B", "Widget B", &[]),
            record("[Data][UI] Chart", "Chart", &["Data", "UI"]),
        ],
    ));
    app
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_str(app: &mut App, s: &str) {
    for c in s.chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
}

fn visible_titles(app: &App) -> Vec<String> {
    app.visible_records().map(|r| r.title.clone()).collect()
}

#[tokio::test]
async fn snapshot_populates_list_and_tag_counts() {
    let app = seeded();
    assert_eq!(visible_titles(&app), vec!["Widget A", "Widget B", "Chart"]);
    assert_eq!(
        app.all_tags,
        vec![("Data".to_string(), 1), ("UI".to_string(), 2)]
    );
}

#[tokio::test]
async fn typing_in_search_filters_case_insensitively() {
    let mut app = seeded();
    type_str(&mut app, "WIDGET");
    assert_eq!(visible_titles(&app), vec!["Widget A", "Widget B"]);

    app.handle_key(key(KeyCode::Esc));
    assert!(app.search.buf.is_empty());
    assert_eq!(app.visible.len(), 3);
    assert!(!app.quit);
}

#[tokio::test]
async fn search_matches_tags_too() {
    let mut app = seeded();
    type_str(&mut app, "data");
    assert_eq!(visible_titles(&app), vec!["Chart"]);
}

#[tokio::test]
async fn tag_toggles_and_policy_switch() {
    let mut app = seeded();
    app.focus = Focus::Tags;

    // Cursor starts on "Data".
    app.handle_key(key(KeyCode::Char(' ')));
    assert_eq!(visible_titles(&app), vec!["Chart"]);

    app.handle_key(key(KeyCode::Down));
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(visible_titles(&app), vec!["Widget A", "Chart"]);

    app.handle_key(key(KeyCode::Char('a')));
    assert_eq!(app.query.policy, TagPolicy::All);
    assert_eq!(visible_titles(&app), vec!["Chart"]);

    app.handle_key(key(KeyCode::Char('c')));
    assert!(app.query.tags.is_empty());
    assert_eq!(app.visible.len(), 3);
}

#[tokio::test]
async fn selection_is_clamped_and_kept_across_snapshots() {
    let mut app = seeded();
    app.focus = Focus::Packages;
    for _ in 0..10 {
        app.handle_key(key(KeyCode::Char('j')));
    }
    assert_eq!(app.selected, 2);
    app.handle_key(key(KeyCode::Char('k')));
    assert_eq!(
        app.selected_record().map(|r| r.title.as_str()),
        Some("Widget B")
    );

    app.apply_snapshot(snapshot(
        2,
        vec![
            record("Widget B", "Widget B", &[]),
            record("New", "New", &[]),
        ],
    ));
    assert_eq!(
        app.selected_record().map(|r| r.title.as_str()),
        Some("Widget B")
    );

    app.apply_snapshot(snapshot(3, Vec::new()));
    assert!(app.selected_record().is_none());
    assert_eq!(app.selected, 0);
}

#[tokio::test]
async fn focus_cycles_with_tab() {
    let mut app = seeded();
    assert_eq!(app.focus, Focus::Search);
    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.focus, Focus::Packages);
    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.focus, Focus::Tags);
    app.handle_key(key(KeyCode::BackTab));
    assert_eq!(app.focus, Focus::Packages);
}

#[tokio::test]
async fn open_doc_without_readme_sets_error_status() {
    let mut app = seeded();
    app.focus = Focus::Packages;
    app.handle_key(key(KeyCode::Enter));
    assert!(app.modal.is_none());
    assert!(app.status.as_ref().is_some_and(|s| s.error));
}

#[tokio::test]
async fn doc_result_for_another_package_is_ignored() {
    let mut app = seeded();
    app.modal = Some(DocModal {
        raw_name: "Widget B".to_string(),
        title: "Widget B".to_string(),
        state: DocState::Loading,
        scroll: 0,
    });

    app.apply_event(AppEvent::Doc {
        raw_name: "[UI] Widget A".to_string(),
        result: Ok("# A".to_string()),
    });
    assert!(matches!(
        app.modal.as_ref().map(|m| &m.state),
        Some(DocState::Loading)
    ));

    app.apply_event(AppEvent::Doc {
        raw_name: "Widget B".to_string(),
        result: Err("not found".to_string()),
    });
    assert!(matches!(
        app.modal.as_ref().map(|m| &m.state),
        Some(DocState::Failed(_))
    ));

    app.handle_key(key(KeyCode::Esc));
    assert!(app.modal.is_none());
    assert!(!app.quit);
}

#[tokio::test]
async fn esc_quits_once_nothing_is_left_to_clear() {
    let mut app = seeded();
    app.query.toggle_tag("UI");
    app.recompute();

    app.handle_key(key(KeyCode::Esc));
    assert!(app.query.tags.is_empty());
    assert!(!app.quit);

    app.handle_key(key(KeyCode::Esc));
    assert!(app.quit);
}

#[tokio::test]
async fn ctrl_c_quits_from_any_focus() {
    let mut app = seeded();
    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.quit);
}
