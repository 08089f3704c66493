mod app;
mod tui;
mod ui;

use std::io::{self, stdout};
use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, style::Style, widgets::Widget};
use tortree_core::{
    BuildJob, BuildMessage, FilesSession, FilesTree, NodeId, format_ids, format_size,
    load_state, load_torrent, save_state, size::percentage, state_path_for,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use app::{Action, AppMode, AppState, RequestLog};
use tui::{AppEvent, EventHandler, handle_key};
use ui::{AppLayout, FileListView, Footer, Header, HelpView, ProgressView, Theme};

/// TORTREE - Interactive torrent file picker
#[derive(Parser, Debug)]
#[command(name = "tortree")]
#[command(about = "Browse the files of a torrent and choose what to download")]
#[command(version)]
struct Args {
    /// Path to a .torrent file
    torrent: PathBuf,

    /// Neither load nor save the per-torrent state
    #[arg(long)]
    no_state: bool,

    /// Print the files tree and exit
    #[arg(long)]
    dump: bool,
}

const LOG_ENV: &str = "TORTREE_LOG";

/// Log to a file in the cache directory; the terminal belongs to the UI
fn init_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let Some(log_dir) = log_dir else {
        return Ok(None);
    };
    std::fs::create_dir_all(log_dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(7)
        .filename_prefix("tortree")
        .filename_suffix("log")
        .build(log_dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()?;

    Ok(Some(guard))
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let cache_dir = dirs::cache_dir().map(|d| d.join("tortree"));
    let _log_guard = init_logging(cache_dir.as_ref().map(|d| d.join("logs")).as_deref())?;
    tracing::info!(torrent = %args.torrent.display(), "starting tortree");

    let metadata = match load_torrent(&args.torrent) {
        Ok(metadata) => metadata,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if args.dump {
        let built = BuildJob::new(0, metadata.records, Default::default()).run()?;
        dump_tree(&built.tree);
        return Ok(());
    }

    let state_path = match (&cache_dir, args.no_state) {
        (Some(dir), false) => Some(state_path_for(&args.torrent, &dir.join("state"))),
        _ => None,
    };

    let mut session = FilesSession::new(RequestLog::default());
    session.load();
    let job = session.files_updated(metadata.records);
    let mut state = AppState::new(metadata.name, session);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run app
    let result = run_app(&mut terminal, &mut state, job, state_path.as_deref());

    // Restore terminal
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;

    result?;
    print_summary(&state);
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    job: Option<BuildJob>,
    state_path: Option<&Path>,
) -> Result<()> {
    let theme = Theme::default();
    let event_handler = EventHandler::new(50); // 50ms tick rate

    let mut build = job.map(|job| {
        let cancel = job.cancellation();
        let (rx, handle) = job.spawn();
        (rx, handle, cancel)
    });
    if build.is_none() {
        // Empty torrent: the session published an empty tree right away
        tree_ready(state, state_path);
    }

    loop {
        // Check for build progress/completion
        if let Some((rx, _, _)) = &build {
            let mut finished = false;
            while let Ok(msg) = rx.try_recv() {
                match msg {
                    BuildMessage::Progress(progress) => state.update_progress(progress),
                    BuildMessage::Completed(built) => {
                        if state.session.finish_build(built) {
                            tree_ready(state, state_path);
                        }
                        finished = true;
                    }
                    BuildMessage::Cancelled => {
                        finished = true;
                        state.quit();
                    }
                }
            }
            if finished && let Some((_, handle, _)) = build.take() {
                let _ = handle.join();
            }
        }

        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();
            let layout = AppLayout::new(area);

            // Background
            frame
                .buffer_mut()
                .set_style(area, Style::default().bg(theme.bg));

            // Update visible height for scrolling
            state.visible_height = layout.list.height as usize;

            Header::new(state, &theme).render(layout.header, frame.buffer_mut());
            render_wanted_bar(state, &theme, layout.wanted_bar, frame.buffer_mut());

            match state.mode {
                AppMode::Building => {
                    ProgressView::new(
                        &state.progress,
                        &state.torrent_name,
                        state.spinner_frame,
                        &theme,
                    )
                    .render(layout.list, frame.buffer_mut());
                }
                AppMode::Browsing | AppMode::Help => {
                    let entries = state.entries();
                    FileListView::new(
                        state.session.tree(),
                        &entries,
                        state.selected_index,
                        state.scroll_offset,
                        &state.selected_nodes,
                        &theme,
                    )
                    .render(layout.list, frame.buffer_mut());

                    if state.mode == AppMode::Help {
                        HelpView::new(&theme).render(area, frame.buffer_mut());
                    }
                }
            }

            Footer::new(state.mode, &theme)
                .with_selection(state.selection_count())
                .with_status(state.status_message.as_deref())
                .render(layout.footer, frame.buffer_mut());
        })?;

        // Handle events
        match event_handler.next()? {
            AppEvent::Key(key) => {
                let action = handle_key(key, state.mode);
                handle_action(state, action);
            }
            AppEvent::Resize(_, _) => {
                // Terminal will redraw on next loop
            }
            AppEvent::Tick => {
                state.tick_spinner();
            }
        }

        if state.should_quit {
            if let Some((_, _, cancel)) = &build {
                cancel.cancel();
            }
            break;
        }
    }

    if state.mode != AppMode::Building
        && let Some(path) = state_path
    {
        let saved = state.session.capture_state(&state.torrent_name);
        if let Err(e) = save_state(path, &saved) {
            tracing::warn!(path = %path.display(), error = %e, "failed to save state");
        }
    }

    Ok(())
}

/// Apply saved choices to a freshly built tree and start browsing
fn tree_ready(state: &mut AppState, state_path: Option<&Path>) {
    state.tree_ready();

    let Some(path) = state_path else { return };
    if !path.exists() {
        return;
    }
    match load_state(path) {
        Ok(saved) => {
            if state.session.restore_state(&state.torrent_name, &saved) {
                state.set_status("Restored previous choices".to_string());
            }
        }
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "ignoring saved state"),
    }
}

fn handle_action(state: &mut AppState, action: Action) {
    match action {
        Action::MoveUp => state.move_up(),
        Action::MoveDown => state.move_down(),
        Action::PageUp => state.page_up(),
        Action::PageDown => state.page_down(),
        Action::GoToFirst => state.go_to_first(),
        Action::GoToLast => state.go_to_last(),
        Action::Enter => state.enter_selected(),
        Action::GoUp => state.go_up(),
        Action::ToggleSelect => state.toggle_select(),
        Action::SelectAll => state.select_all(),
        Action::ClearSelection => state.clear_selection(),
        Action::SetWanted => state.set_wanted(true),
        Action::SetUnwanted => state.set_wanted(false),
        Action::SetPriority(priority) => state.set_priority(priority),
        Action::ShowHelp => state.show_help(),
        Action::HideHelp => state.hide_help(),
        Action::Quit => state.quit(),
        Action::Tick => {}
    }
}

fn render_wanted_bar(
    state: &AppState,
    theme: &Theme,
    area: ratatui::layout::Rect,
    buf: &mut ratatui::buffer::Buffer,
) {
    if area.width < 40 || state.mode == AppMode::Building {
        return;
    }

    let total_size = state.session.tree().total_size();
    let wanted_size = state.wanted_size();
    let bar_width = area.width.saturating_sub(30) as usize;

    let bar = ui::bar_chart::progress_bar(percentage(wanted_size, total_size) / 100.0, bar_width);
    buf.set_string(area.x + 1, area.y, &bar, Style::default().fg(theme.green));

    let label = format!(
        "{} of {} wanted",
        format_size(wanted_size),
        format_size(total_size)
    );
    let label_x = (area.x + area.width).saturating_sub(label.chars().count() as u16 + 1);
    buf.set_string(label_x, area.y, &label, Style::default().fg(theme.fg_dim));
}

fn print_summary(state: &AppState) {
    if state.mode == AppMode::Building {
        return;
    }
    let (unwanted, high, low) = state.summary();
    println!("unwanted: {}", format_ids(&unwanted));
    println!("high: {}", format_ids(&high));
    println!("low: {}", format_ids(&low));
}

fn dump_tree(tree: &FilesTree) {
    fn dump_node(tree: &FilesTree, id: NodeId) {
        let Some(node) = tree.get(id) else { return };
        if id != NodeId::ROOT {
            let summary = tree.rollup(id);
            println!(
                "{:indent$}{}{} ({})",
                "",
                node.name,
                if node.is_directory() { "/" } else { "" },
                format_size(summary.size),
                indent = (node.depth as usize - 1) * 2
            );
        }
        for &child in node.children() {
            dump_node(tree, child);
        }
    }

    dump_node(tree, NodeId::ROOT);
    println!("{} files, {}", tree.file_count(), format_size(tree.total_size()));
}
