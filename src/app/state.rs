//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::path::PathBuf;
use std::time::SystemTime;

use metatable::config::AppConfig;
use metatable::core::format::{render, FormattingOptions, Table};
use metatable::core::source;
use metatable::core::value::Metadata;
use metatable::ui::metadata_table::{MetadataTableState, MetadataTableWidget};
use tracing::{debug, info, warn};

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Table,
    Help,
}

/// Top-level application state.
pub struct AppState {
    /// Where the metadata came from (`-` for stdin).
    pub source: PathBuf,
    pub metadata: Metadata,
    pub options: FormattingOptions,
    pub dense: bool,
    /// Formatted output of `metadata`; rebuilt in full whenever any input
    /// changes.
    pub table: Table,
    /// Widget-level state (scroll).
    pub table_state: MetadataTableState,
    /// Height of the table viewport at the last draw, for paging.
    pub viewport_height: usize,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional message shown in the bottom bar.
    pub status_message: Option<String>,
    /// `true` when `status_message` reports a failure.
    pub status_is_error: bool,
    pub active_view: ActiveView,
    pub config: AppConfig,
    /// Reload automatically when the source file changes.
    pub watch: bool,
    /// Source modification time at the last successful load.
    pub last_modified: Option<SystemTime>,
}

impl AppState {
    pub fn new(
        source: PathBuf,
        metadata: Metadata,
        options: FormattingOptions,
        dense: bool,
        config: AppConfig,
    ) -> Self {
        let table = render(&metadata, dense, &options);
        let last_modified = modified_time(&source);
        Self {
            source,
            metadata,
            options,
            dense,
            table,
            table_state: MetadataTableState::default(),
            viewport_height: 0,
            should_quit: false,
            status_message: None,
            status_is_error: false,
            active_view: ActiveView::default(),
            config,
            watch: false,
            last_modified,
        }
    }

    /// Re-run the formatter over the current metadata.
    pub fn rebuild(&mut self) {
        self.table = render(&self.metadata, self.dense, &self.options);
        let total = self.total_lines();
        self.table_state.clamp_scroll(total, self.viewport_height);
    }

    /// Number of laid-out table lines.
    pub fn total_lines(&self) -> usize {
        MetadataTableWidget::new(&self.table).build_lines().len()
    }

    pub fn set_dense(&mut self, dense: bool) {
        self.dense = dense;
        self.rebuild();
    }

    /// Load the source again and replace the table.  On failure the
    /// previous table stays and the error goes to the status bar.
    pub fn reload(&mut self) {
        if source::is_stdin(&self.source) {
            self.set_status("stdin cannot be reloaded", true);
            return;
        }
        match source::load_path(&self.source) {
            Ok(metadata) => {
                info!(path = %self.source.display(), rows = metadata.len(), "reloaded metadata");
                self.metadata = metadata;
                self.last_modified = modified_time(&self.source);
                self.rebuild();
                self.set_status(format!("reloaded {}", self.source.display()), false);
            }
            Err(e) => {
                warn!(path = %self.source.display(), error = %e, "reload failed");
                self.set_status(e.to_string(), true);
            }
        }
    }

    /// When watching, reload if the file's modification time moved.
    /// Returns `true` if a reload was attempted.
    pub fn poll_source_change(&mut self) -> bool {
        if !self.watch || source::is_stdin(&self.source) {
            return false;
        }
        let current = modified_time(&self.source);
        if current.is_none() || current == self.last_modified {
            return false;
        }
        debug!(path = %self.source.display(), "source changed on disk");
        // Record the new time even on failure so a broken file is not
        // re-parsed every tick.
        self.last_modified = current;
        self.reload();
        true
    }

    pub fn set_status(&mut self, message: impl Into<String>, is_error: bool) {
        self.status_message = Some(message.into());
        self.status_is_error = is_error;
    }
}

fn modified_time(path: &std::path::Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
