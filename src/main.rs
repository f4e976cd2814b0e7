mod app;
mod config;
mod encoder;
mod error;
mod queue;
mod ui;
mod utils;

use anyhow::Result;
use app::{App, ConfirmAction, ExplorerTarget, Screen};
use clap::Parser;
use config::AppConfig;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Batch HEVC to MP4 converter
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Video files to queue at startup
    inputs: Vec<PathBuf>,

    /// Output directory for converted files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Quality (CRF, 0-51, lower = higher quality)
    #[arg(short, long)]
    crf: Option<u8>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = utils::init_logging();

    let config = AppConfig::load();
    config.validate()?;

    let mut app = App::new(config);

    if let Some(crf) = args.crf {
        if crf > 51 {
            anyhow::bail!("CRF must be between 0 and 51");
        }
        app.crf = crf;
    }

    let (videos, skipped): (Vec<PathBuf>, Vec<PathBuf>) = args
        .inputs
        .into_iter()
        .partition(|p| queue::is_video_file(p));
    for path in &skipped {
        warn!("Skipping non-video argument: {}", path.display());
    }
    app.add_files(videos);

    // Explicit flag wins over the default derived from the first input
    if let Some(dir) = args.output_dir {
        app.output_dir = Some(dir);
    }

    if !utils::encoder_available(&app.config.ffmpeg_path) {
        warn!("Encoder `{}` not found", app.config.ffmpeg_path);
        app.set_message(&format!(
            "Encoder `{}` not found (is FFmpeg installed?)",
            app.config.ffmpeg_path
        ));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        // Apply any pending worker events
        app.process_worker_messages();

        // Draw UI
        terminal.draw(|f| {
            match app.current_screen.clone() {
                Screen::Home => ui::render_home(f, app),
                Screen::FileExplorer { .. } => ui::render_explorer(f, app),
            }
            // Render confirmation dialog as overlay
            if app.confirm_dialog.is_some() {
                ui::render_confirm_dialog(f, app);
            }
        })?;

        // Handle input with timeout so worker events keep flowing
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key.code);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyCode) {
    // Handle confirmation dialog
    if app.confirm_dialog.is_some() {
        handle_confirm_dialog_key(app, key);
        return;
    }

    match &app.current_screen {
        Screen::Home => handle_home_key(app, key),
        Screen::FileExplorer { target } => {
            let target = *target;
            handle_explorer_key(app, target, key);
        }
    }
}

fn handle_confirm_dialog_key(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(action) = app.confirm_dialog.take() {
                execute_confirm_action(app, action);
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.confirm_dialog = None;
        }
        KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
            app.confirm_selection = !app.confirm_selection;
        }
        KeyCode::Enter => {
            if app.confirm_selection {
                // Yes
                if let Some(action) = app.confirm_dialog.take() {
                    execute_confirm_action(app, action);
                }
            } else {
                // No
                app.confirm_dialog = None;
            }
        }
        _ => {}
    }
}

fn execute_confirm_action(app: &mut App, action: ConfirmAction) {
    match action {
        ConfirmAction::ExitApp => {
            app.should_quit = true;
        }
    }
}

fn handle_home_key(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => {
            if app.converting_active {
                app.set_message("Conversion in progress, please wait...");
            } else {
                app.confirm_dialog = Some(ConfirmAction::ExitApp);
                app.confirm_selection = false; // Default to "No"
            }
        }
        KeyCode::Up | KeyCode::Char('k') => app.job_cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => app.job_cursor_down(),
        KeyCode::Char(' ') => app.toggle_job_mark(),
        KeyCode::Char('a') => {
            if app.converting_active {
                app.set_message("Cannot edit the queue while converting");
            } else {
                app.navigate_to_explorer(ExplorerTarget::AddFiles);
            }
        }
        KeyCode::Char('o') => {
            if app.converting_active {
                app.set_message("Cannot change the output directory while converting");
            } else {
                app.navigate_to_explorer(ExplorerTarget::OutputDir);
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => app.remove_marked(),
        KeyCode::Char('c') => app.clear_jobs(),
        KeyCode::Left | KeyCode::Char('h') => app.adjust_crf(-1),
        KeyCode::Right | KeyCode::Char('l') => app.adjust_crf(1),
        KeyCode::Enter | KeyCode::Char('s') => app.start_conversion(),
        _ => {}
    }
}

fn handle_explorer_key(app: &mut App, target: ExplorerTarget, key: KeyCode) {
    // Clear any message when user takes action
    app.clear_message();

    match key {
        KeyCode::Esc => app.navigate_to_home(),
        KeyCode::Up | KeyCode::Char('k') => app.explorer_move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.explorer_move_down(),
        KeyCode::Enter => match target {
            ExplorerTarget::AddFiles => app.select_explorer_entry(),
            ExplorerTarget::OutputDir => app.enter_directory(),
        },
        KeyCode::Char(' ') => match target {
            ExplorerTarget::AddFiles => app.toggle_file_mark(),
            ExplorerTarget::OutputDir => app.select_output_entry(),
        },
        KeyCode::Char('a') => {
            if target == ExplorerTarget::AddFiles {
                app.confirm_add_marked();
            }
        }
        _ => {}
    }
}
