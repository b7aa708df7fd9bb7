//! Input handling — maps key events and ticks to state mutations.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use metatable::config::Action;
use metatable::ui::metadata_table::max_offset;
use tracing::debug;

use super::state::{ActiveView, AppState};

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Table => handle_table_key(state, key),
        // Any key dismisses the help popup.
        ActiveView::Help => state.active_view = ActiveView::Table,
    }
}

fn handle_table_key(state: &mut AppState, key: KeyEvent) {
    let Some(action) = state.config.match_key(key) else {
        return;
    };
    debug!(?action, "key action");
    // A status message lasts until the next action.
    state.status_message = None;
    state.status_is_error = false;

    let max = max_offset(state.total_lines(), state.viewport_height);
    let page = state.viewport_height.saturating_sub(1).max(1);

    match action {
        Action::ScrollUp => state.table_state.scroll_up(1),
        Action::ScrollDown => state.table_state.scroll_down(1, max),
        Action::PageUp => state.table_state.scroll_up(page),
        Action::PageDown => state.table_state.scroll_down(page, max),
        Action::Top => state.table_state.offset = 0,
        Action::Bottom => state.table_state.offset = max,
        Action::ToggleDense => {
            let dense = !state.dense;
            state.set_dense(dense);
            state.set_status(if dense { "dense" } else { "spaced" }, false);
        }
        Action::Reload => state.reload(),
        Action::Help => state.active_view = ActiveView::Help,
        Action::Quit => state.should_quit = true,
    }
}

/// Periodic housekeeping between input events.
pub fn handle_tick(state: &mut AppState) {
    state.poll_source_change();
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use metatable::config::AppConfig;
    use metatable::core::format::FormattingOptions;
    use metatable::core::value::{Mapping, Metadata};

    use super::*;

    fn metadata(rows: usize) -> Metadata {
        (0..rows).map(|i| (format!("key{i}"), i as i64)).collect()
    }

    fn state_with(rows: usize, height: usize) -> AppState {
        let mut state = AppState::new(
            PathBuf::from("-"),
            metadata(rows),
            FormattingOptions::default(),
            true,
            AppConfig::default(),
        );
        state.viewport_height = height;
        state
    }

    fn press(state: &mut AppState, code: KeyCode) {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn scrolling_is_bounded_by_content() {
        let mut state = state_with(10, 4);
        press(&mut state, KeyCode::Char('j'));
        assert_eq!(state.table_state.offset, 1);
        press(&mut state, KeyCode::End);
        assert_eq!(state.table_state.offset, 6);
        press(&mut state, KeyCode::Down);
        assert_eq!(state.table_state.offset, 6);
        press(&mut state, KeyCode::PageUp);
        assert_eq!(state.table_state.offset, 3);
        press(&mut state, KeyCode::Char('g'));
        assert_eq!(state.table_state.offset, 0);
        press(&mut state, KeyCode::Up);
        assert_eq!(state.table_state.offset, 0);
    }

    #[test]
    fn toggle_dense_rebuilds_the_table() {
        let mut state = state_with(3, 20);
        assert!(state.table.dense);
        assert_eq!(state.total_lines(), 3);
        press(&mut state, KeyCode::Char('d'));
        assert!(!state.table.dense);
        assert_eq!(state.total_lines(), 5);
    }

    #[test]
    fn help_popup_opens_and_any_key_closes_it() {
        let mut state = state_with(1, 5);
        press(&mut state, KeyCode::Char('?'));
        assert_eq!(state.active_view, ActiveView::Help);
        press(&mut state, KeyCode::Char('q'));
        assert_eq!(state.active_view, ActiveView::Table);
        assert!(!state.should_quit);
    }

    #[test]
    fn quit_keys() {
        let mut state = state_with(1, 5);
        press(&mut state, KeyCode::Char('q'));
        assert!(state.should_quit);

        let mut state = state_with(1, 5);
        state.active_view = ActiveView::Help;
        handle_key(
            &mut state,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(state.should_quit);
    }

    #[test]
    fn stdin_source_is_not_reloaded() {
        let mut state = state_with(2, 5);
        let before = state.table.clone();
        press(&mut state, KeyCode::Char('r'));
        assert_eq!(state.table, before);
        assert!(state.status_is_error);
    }

    #[test]
    fn reload_failure_keeps_the_previous_table() {
        let mut state = AppState::new(
            PathBuf::from("/nonexistent/metatable-test.json"),
            Mapping::new().with("name", "svc-a"),
            FormattingOptions::default(),
            false,
            AppConfig::default(),
        );
        let before = state.table.clone();
        press(&mut state, KeyCode::Char('r'));
        assert_eq!(state.table, before);
        assert!(state.status_is_error);
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.contains("metatable-test.json")));
    }

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("metatable-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn touch_later(path: &PathBuf) {
        let later = std::time::SystemTime::now() + std::time::Duration::from_secs(60);
        std::fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(later)
            .unwrap();
    }

    #[test]
    fn watched_file_changes_are_picked_up_on_tick() {
        let path = scratch_file("watch-ok.json", r#"{"name": "svc-a"}"#);
        let mut state = AppState::new(
            path.clone(),
            Mapping::new().with("name", "svc-a"),
            FormattingOptions::default(),
            true,
            AppConfig::default(),
        );
        state.watch = true;

        handle_tick(&mut state);
        assert!(state.status_message.is_none());

        std::fs::write(&path, r#"{"name": "svc-b", "replicas": 3}"#).unwrap();
        touch_later(&path);
        handle_tick(&mut state);

        assert!(!state.status_is_error);
        assert_eq!(state.table.rows.len(), 2);
        assert_eq!(state.table.rows[1].title, "Replicas");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn broken_watched_file_reports_once_and_keeps_the_table() {
        let path = scratch_file("watch-broken.json", r#"{"name": "svc-a"}"#);
        let mut state = AppState::new(
            path.clone(),
            Mapping::new().with("name", "svc-a"),
            FormattingOptions::default(),
            true,
            AppConfig::default(),
        );
        state.watch = true;
        let before = state.table.clone();

        std::fs::write(&path, "{ not json").unwrap();
        touch_later(&path);
        handle_tick(&mut state);
        assert_eq!(state.table, before);
        assert!(state.status_is_error);

        // Same mtime: the broken file is not parsed again.
        state.status_message = None;
        handle_tick(&mut state);
        assert!(state.status_message.is_none());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn tick_without_watch_is_a_no_op() {
        let mut state = state_with(2, 5);
        handle_tick(&mut state);
        assert!(state.status_message.is_none());
    }
}
