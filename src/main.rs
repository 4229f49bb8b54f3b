use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tokio::sync::mpsc;

use slogscope_logs::export::{export_collapsed, export_file_name, export_records};
use slogscope_logs::{
    ArcLogRecord, DEFAULT_CAPACITY, GroupDirectory, GroupRegistry, LogConsole, LogSource,
    parse_group_arg,
};
use slogscope_tui::app::ViewRow;
use slogscope_tui::{
    Action, AppState, ConsoleScreen, Event, EventHandler, Focus, GroupPicker, HelpOverlay,
    KeyBindings, KeyContext, Overlay, Preferences, Tui, editor,
};
use slogscope_types::{CollapsedEntry, LogEvent};

/// Slogscope - A terminal console that groups, collapses and filters log events
#[derive(Parser, Debug)]
#[command(name = "slogscope")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log file to read (reads standard input when omitted)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Keep reading the input file as lines are appended
    #[arg(short, long)]
    follow: bool,

    /// Maximum number of records kept in the flat history
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    /// Group directory file
    #[arg(long, default_value = ".slogscope/groups.toml")]
    groups: PathBuf,

    /// Preferences file
    #[arg(long, default_value = ".slogscope/prefs.toml")]
    prefs: PathBuf,

    /// Register a group up front, as NAME or NAME=#RRGGBB[AA] (repeatable)
    #[arg(short, long = "group", value_name = "GROUP")]
    group_args: Vec<String>,

    /// Write diagnostics to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Diagnostics go to a file when given; stderr is hidden behind the TUI
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());
    match &args.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    let result = run_app(args).await;

    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

/// Internal actions for async operations
enum InternalAction {
    ReopenSource,
}

fn load_console(args: &Args) -> Result<LogConsole> {
    let mut directory = GroupDirectory::load_or_default(&args.groups)
        .with_context(|| format!("Failed to load groups from {}", args.groups.display()))?;

    for arg in &args.group_args {
        let entry =
            parse_group_arg(arg).with_context(|| format!("Invalid group argument '{}'", arg))?;
        if !directory.add(&entry.name, entry.color) {
            directory.set_color(&entry.name, entry.color)?;
        }
    }

    Ok(LogConsole::with_directory(args.capacity, directory))
}

async fn open_source(
    source: &mut LogSource,
    input: Option<&Path>,
    log_tx: &mpsc::UnboundedSender<LogEvent>,
    follow: bool,
) -> Result<()> {
    match input {
        Some(path) => source
            .start_file(path, log_tx.clone(), follow)
            .await
            .with_context(|| format!("Failed to open {}", path.display())),
        None => {
            source.start_stdin(log_tx.clone());
            Ok(())
        }
    }
}

/// Restart a file source on a fresh channel
///
/// Events the old reader already queued are dropped with the old receiver.
async fn reopen_source(
    source: &mut LogSource,
    path: &Path,
    follow: bool,
    log_tx: &mut mpsc::UnboundedSender<LogEvent>,
    log_rx: &mut mpsc::UnboundedReceiver<LogEvent>,
    state: &mut AppState,
) -> Result<()> {
    source.stop();
    let (tx, rx) = mpsc::unbounded_channel();
    *log_tx = tx;
    *log_rx = rx;

    if state.prefs.clear_on_start {
        state.clear();
    }
    open_source(source, Some(path), log_tx, follow).await
}

async fn run_app(args: Args) -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (internal_tx, mut internal_rx) = mpsc::unbounded_channel::<InternalAction>();
    let (mut log_tx, mut log_rx) = mpsc::unbounded_channel::<LogEvent>();

    let console = load_console(&args)?;
    let prefs = Preferences::load_or_default(&args.prefs);
    let label = match &args.input {
        Some(path) => path.display().to_string(),
        None => "stdin".to_string(),
    };
    let mut state = AppState::new(console, prefs, label);

    // Start reading before the terminal switches screens so open errors print plainly
    let mut source = LogSource::new();
    open_source(&mut source, args.input.as_deref(), &log_tx, args.follow).await?;
    state.source_running = true;

    let mut tui = Tui::new()?;
    let mut events = EventHandler::new(Duration::from_millis(100));
    let keybindings = KeyBindings::new();

    render(&mut tui, &mut state)?;

    loop {
        tokio::select! {
            // Handle terminal events
            Some(event) = events.next() => {
                match event {
                    Event::Key(key) => {
                        let action = if state.ui_state.search_active {
                            keybindings.get_search_input_action(&key)
                        } else {
                            let context = match (state.ui_state.overlay, state.ui_state.focus) {
                                (Overlay::GroupPicker, _) => KeyContext::GroupPicker,
                                (Overlay::Help, _) => KeyContext::Global,
                                (Overlay::None, Focus::Detail) => KeyContext::Detail,
                                (Overlay::None, Focus::List) => KeyContext::Console,
                            };
                            keybindings.get_action(context, &key)
                        };
                        if let Some(action) = action {
                            let _ = action_tx.send(action);
                        }
                    }
                    Event::Tick => {
                        state.source_running = source.is_running();
                    }
                    Event::Resize(_, _) => {
                        let _ = action_tx.send(Action::Render);
                    }
                    Event::Error(e) => {
                        state.show_error(e);
                    }
                }
            }

            // Handle incoming log events
            Some(event) = log_rx.recv() => {
                state.console.ingest_event(&event);
                // Drain whatever else is queued so bursts cost one render
                while let Ok(event) = log_rx.try_recv() {
                    state.console.ingest_event(&event);
                }
            }

            // Handle user actions
            Some(action) = action_rx.recv() => {
                handle_action(&mut state, &internal_tx, action);
            }

            // Handle internal async actions
            Some(internal) = internal_rx.recv() => {
                match internal {
                    InternalAction::ReopenSource => match args.input.as_deref() {
                        Some(path) => {
                            let reopened = reopen_source(
                                &mut source,
                                path,
                                args.follow,
                                &mut log_tx,
                                &mut log_rx,
                                &mut state,
                            )
                            .await;
                            match reopened {
                                Ok(()) => {
                                    state.source_running = true;
                                    state.show_message(format!("Reopened {}", path.display()));
                                }
                                Err(e) => {
                                    state.source_running = false;
                                    state.show_error(format!("{:#}", e));
                                }
                            }
                        }
                        None => state.show_error("Standard input cannot be reopened"),
                    },
                }
            }
        }

        if state.should_quit {
            break;
        }

        render(&mut tui, &mut state)?;
    }

    // Cleanup
    state.sync_prefs();
    if let Err(e) = state.prefs.save(&args.prefs) {
        tracing::warn!(error = %e, path = %args.prefs.display(), "failed to save preferences");
    }
    if let Err(e) = state.console.save_groups(&args.groups) {
        tracing::warn!(error = %e, path = %args.groups.display(), "failed to save groups");
    }
    source.stop();
    events.shutdown();
    tui.restore()?;

    Ok(())
}

fn handle_action(
    state: &mut AppState,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
    action: Action,
) {
    match action {
        Action::Quit => {
            state.should_quit = true;
        }
        Action::ToggleHelp => state.toggle_help(),
        Action::Dismiss => state.dismiss(),

        // List navigation
        Action::SelectUp(n) => state.select_up(n),
        Action::SelectDown(n) => state.select_down(n),
        Action::PageUp => state.page_up(),
        Action::PageDown => state.page_down(),
        Action::SelectFirst => state.select_first(),
        Action::SelectLast => state.select_last(),
        Action::ToggleAutoScroll => state.toggle_auto_scroll(),

        // View settings
        Action::ToggleSeverity(severity) => state.toggle_severity(severity),
        Action::ToggleCollapse => state.toggle_collapse(),

        // Detail pane
        Action::ToggleDetailFocus => state.toggle_detail_focus(),
        Action::FrameUp => state.frame_up(),
        Action::FrameDown => state.frame_down(),
        Action::OpenFrame => match state.selected_frame() {
            Some(frame) => match editor::open_frame(&state.prefs.editor, &frame) {
                Ok(()) => state.show_message(format!("Opened {}:{}", frame.path, frame.line)),
                Err(e) => state.show_error(e.to_string()),
            },
            None => state.show_message("No source location on this line"),
        },
        Action::GrowDetail => state.grow_detail(),
        Action::ShrinkDetail => state.shrink_detail(),

        // Search
        Action::OpenSearch => state.start_search(),
        Action::CloseSearch => state.cancel_search(),
        Action::ApplySearch => state.apply_search(),
        Action::SearchInput(c) => state.search_input_char(c),
        Action::SearchBackspace => state.search_input_backspace(),
        Action::SearchClear => state.search_input_clear(),
        Action::ClearSearch => state.clear_search(),

        // Group picker
        Action::ToggleGroupPicker => state.toggle_group_picker(),
        Action::PickerUp => state.picker_up(),
        Action::PickerDown => state.picker_down(),
        Action::PickerToggle => state.picker_toggle(),
        Action::PickerSelectAll => state.picker_select_all(),
        Action::PickerCycleColor => state.picker_cycle_color(),
        Action::PickerRemove => state.picker_remove(),

        // Console
        Action::ClearConsole => {
            state.clear();
            state.show_message("Console cleared");
        }
        Action::ExportView => export_view(state),
        Action::ReopenSource => {
            let _ = internal_tx.send(InternalAction::ReopenSource);
        }

        Action::ShowMessage(msg) => state.show_message(msg),
        Action::ShowError(msg) => state.show_error(msg),
        Action::Tick | Action::Render => {}
    }
}

/// Write the rows currently on screen to a timestamped file
fn export_view(state: &mut AppState) {
    state.refresh_view();
    let path = export_file_name(Local::now());

    let result = if state.ui_state.collapse {
        let entries: Vec<CollapsedEntry> = state
            .rows()
            .iter()
            .filter_map(|row| match row {
                ViewRow::Bucket(entry) => Some(entry.clone()),
                ViewRow::Record(_) => None,
            })
            .collect();
        export_collapsed(&path, &entries)
    } else {
        let records: Vec<ArcLogRecord> = state
            .rows()
            .iter()
            .filter_map(|row| match row {
                ViewRow::Record(record) => Some(record.clone()),
                ViewRow::Bucket(_) => None,
            })
            .collect();
        export_records(&path, &records)
    };

    match result {
        Ok(count) => state.show_message(format!("Saved {} entries to {}", count, path.display())),
        Err(e) => state.show_error(format!("Export failed: {}", e)),
    }
}

fn render(tui: &mut Tui, state: &mut AppState) -> Result<()> {
    state.refresh_view();

    tui.terminal().draw(|frame| {
        ConsoleScreen::render(frame, state);

        match state.ui_state.overlay {
            Overlay::Help => HelpOverlay::render(frame),
            Overlay::GroupPicker => GroupPicker::render(frame, state),
            Overlay::None => {}
        }
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_reopen_discards_events_from_previous_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.log");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "one").unwrap();
        writeln!(file, "two").unwrap();
        drop(file);

        let (mut log_tx, mut log_rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(LogConsole::new(10), Preferences::default(), "game.log");
        let mut source = LogSource::new();
        open_source(&mut source, Some(&path), &log_tx, false).await.unwrap();

        // Only "one" reaches the console; "two" is still queued
        let first = log_rx.recv().await.unwrap();
        state.console.ingest_event(&first);
        tokio::time::sleep(Duration::from_millis(50)).await;

        reopen_source(&mut source, &path, false, &mut log_tx, &mut log_rx, &mut state)
            .await
            .unwrap();
        assert!(state.console.is_empty());

        for _ in 0..2 {
            let event = tokio::time::timeout(Duration::from_secs(2), log_rx.recv())
                .await
                .unwrap()
                .unwrap();
            state.console.ingest_event(&event);
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(log_rx.try_recv().is_err());

        let texts: Vec<_> = state
            .console
            .flat_view(&Default::default())
            .iter()
            .map(|r| r.raw_text.clone())
            .collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn test_group_args_register_and_recolor() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args::parse_from([
            "slogscope",
            "--groups",
            dir.path().join("groups.toml").to_str().unwrap(),
            "-g",
            "Net=#FF0000",
            "-g",
            "net=#00FF00",
        ]);

        let console = load_console(&args).unwrap();
        let net = console
            .groups()
            .into_iter()
            .find(|g| g.name == "Net")
            .unwrap();
        assert_eq!(net.color.to_hex(), "00FF00FF");
    }
}
