//! Terminal viewer for structured metadata documents.
//!
//! Run with a `.json`, `.toml` or `.yaml` file (or `-` for JSON on stdin) to
//! browse it as a two-column table.  `--print` writes the table as plain text
//! instead of opening the interactive view.

mod app;

use std::io::{self, stderr, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use tracing::{debug, info};

use metatable::config::{AppConfig, TitleStyle};
use metatable::core::{format, source};
use metatable::ui::{
    layout::AppLayout, metadata_table::MetadataTableWidget, metadata_table::render_to_string,
    popup::HelpPopup, theme::Theme,
};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{ActiveView, AppState},
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Structured metadata viewer")]
struct Cli {
    /// Metadata document (`.json`, `.toml`, `.yaml`/`.yml`, or `-` for JSON on stdin).
    path: Option<PathBuf>,

    /// Compact rows (no spacer line between rows).
    #[arg(long)]
    dense: bool,

    /// How keys are turned into titles.
    #[arg(long, value_enum)]
    title_format: Option<TitleStyle>,

    /// Print the table as plain text and exit.
    #[arg(long)]
    print: bool,

    /// Line width used by `--print`.
    #[arg(long, default_value_t = 100)]
    width: u16,

    /// Reload automatically when the file changes.
    #[arg(long)]
    watch: bool,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only emits when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if cli.dense {
        config.dense = true;
    }
    if let Some(style) = cli.title_format {
        config.title_style = style;
    }

    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let path = cli
        .path
        .clone()
        .context("no metadata file given (pass a path, or `-` for stdin)")?;
    let metadata = source::load_path(&path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    info!(path = %path.display(), rows = metadata.len(), "loaded metadata");

    let options = config.title_style.options();

    // ── plain-text mode ───────────────────────────────────────
    if cli.print || !io::stdout().is_terminal() {
        let table = format::render(&metadata, config.dense, &options);
        print!("{}", render_to_string(&table, cli.width));
        return Ok(());
    }

    let dense = config.dense;
    let tick = Duration::from_millis(config.tick_ms);
    let mut state = AppState::new(path, metadata, options, dense, config);
    state.watch = cli.watch;

    run_tui(&mut state, tick).await
}

async fn run_tui(state: &mut AppState, tick: Duration) -> Result<()> {
    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    execute!(stderr(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let mut events = spawn_event_reader(tick);
    let result = event_loop(&mut terminal, state, &mut events).await;

    // ── teardown (also on error) ──────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut AppState,
    events: &mut tokio::sync::mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            let layout = AppLayout::from_area(frame.area());

            let table_block = Block::default()
                .title(format!(" {} ", state.source.display()))
                .title_style(Theme::title_style())
                .borders(Borders::ALL)
                .border_style(Theme::border_style());
            state.viewport_height = table_block.inner(layout.table_area).height as usize;

            let widget = MetadataTableWidget::new(&state.table).block(table_block);
            frame.render_stateful_widget(widget, layout.table_area, &mut state.table_state);

            let hint = state.config.status_bar_hint();
            let (status_text, status_style) = match &state.status_message {
                Some(msg) if state.status_is_error => (msg.as_str(), Theme::error_style()),
                Some(msg) => (msg.as_str(), Theme::status_bar_style()),
                None => (hint.as_str(), Theme::status_bar_style()),
            };
            frame.render_widget(Paragraph::new(status_text).style(status_style), layout.status_area);

            if state.active_view == ActiveView::Help {
                frame.render_widget(HelpPopup { config: &state.config }, frame.area());
            }
        })?;

        match events.recv().await {
            Some(AppEvent::Key(k)) => handler::handle_key(state, k),
            Some(AppEvent::Resize(w, h)) => debug!(w, h, "terminal resized"),
            Some(AppEvent::Tick) => handler::handle_tick(state),
            None => break,
        }

        if state.should_quit {
            break;
        }
    }
    Ok(())
}
