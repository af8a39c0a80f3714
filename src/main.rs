//! placeguide: browse, edit and listen to generated place guides in the terminal.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use edtui::EditorEventHandler;
use placeguide::app_state::{AppState, PendingAction, SearchFocus, View};
use placeguide::client::HttpGuideService;
use placeguide::clipboard::SystemClipboard;
use placeguide::config::Config;
use placeguide::narration::{CommandSpeech, Narrator};
use placeguide::{ui, GuideSession, Result};
use ratatui::crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// How long to wait for a key before polling narration again.
const TICK: Duration = Duration::from_millis(200);

#[derive(Parser)]
#[command(name = "placeguide")]
#[command(about = "Terminal viewer and editor for paginated place guides", long_about = None)]
struct Args {
    /// Place whose guide to open directly
    #[arg(value_name = "PLACE")]
    place: Option<String>,

    /// Search for famous places near a location on startup
    #[arg(long, value_name = "LOCATION")]
    search: Option<String>,

    /// Base URL of the guide service
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Maximum sections per page
    #[arg(long, value_name = "N")]
    max_sections: Option<usize>,

    /// Maximum characters per page
    #[arg(long, value_name = "N")]
    max_chars: Option<usize>,

    /// Directory receiving exported guides
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Fetch the guide for PLACE, export it and exit without starting the UI
    #[arg(long, requires = "place")]
    export: bool,
}

fn init_logging(log_file: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (mut cfg, config_error) = match Config::load() {
        Ok(cfg) => (cfg, None),
        Err(e) => {
            eprintln!("{e}");
            (Config::default(), Some(e))
        }
    };

    // Override config with command line args
    if let Some(url) = args.api_url {
        cfg.api_base_url = url;
    }
    if let Some(n) = args.max_sections {
        cfg.max_sections_per_page = n;
    }
    if let Some(n) = args.max_chars {
        cfg.max_chars_per_page = n;
    }
    let export_dir = args
        .export_dir
        .unwrap_or_else(|| PathBuf::from(&cfg.export_dir));

    init_logging(&cfg.log_file)?;
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "Using default configuration");
    }
    tracing::info!(api_base_url = %cfg.api_base_url, "Starting placeguide");

    let service = HttpGuideService::new(&cfg.api_base_url, cfg.request_timeout())?;
    let mut session = GuideSession::new(cfg.page_limits());

    if args.export {
        let Some(place) = args.place else {
            return Ok(());
        };
        if let Err(e) = session.load(&service, &place) {
            eprintln!("{}", e.user_message());
            return Err(e);
        }
        let path = session.export_to(&export_dir)?;
        println!("{}", path.display());
        return Ok(());
    }

    let narrator = Narrator::new(Box::new(CommandSpeech::new(
        cfg.speech_command.clone(),
        cfg.speech_args.clone(),
    )));
    let mut app = AppState::new(
        session,
        Box::new(service),
        narrator,
        Box::new(SystemClipboard::default()),
        export_dir,
    );

    if let Some(location) = args.search {
        app.search_input = location;
        if args.place.is_none() {
            app.submit_search();
        }
    }
    if let Some(place) = args.place {
        app.queue(PendingAction::OpenPlace(place));
    }

    run_tui(app)
}

fn run_tui(mut app: AppState) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut editor_handler = EditorEventHandler::default();

    let result = run_app(&mut terminal, &mut app, &mut editor_handler);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Terminal UI failed");
        eprintln!("Error: {e}");
    }
    Ok(result?)
}

fn open_command_line(app: &mut AppState) {
    app.current_view = View::Command;
    app.command_buffer.clear();
    app.message = None;
}

#[allow(clippy::too_many_lines)]
fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    editor_handler: &mut EditorEventHandler,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // The loading message is on screen; run the blocking call before reading keys.
        if app.pending.is_some() {
            app.run_pending();
            continue;
        }

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                match app.current_view {
                    View::Search => match (app.search_focus, key.code) {
                        (_, KeyCode::Esc) => return Ok(()),
                        (_, KeyCode::Tab) => {
                            app.search_focus = match app.search_focus {
                                SearchFocus::Input => SearchFocus::Results,
                                SearchFocus::Results => SearchFocus::Input,
                            };
                        }
                        (SearchFocus::Input, KeyCode::Char(c)) => {
                            app.search_input.push(c);
                            app.message = None;
                        }
                        (SearchFocus::Input, KeyCode::Backspace) => {
                            app.search_input.pop();
                        }
                        (SearchFocus::Input, KeyCode::Enter) => app.submit_search(),
                        (SearchFocus::Input, KeyCode::Down) if !app.places.is_empty() => {
                            app.search_focus = SearchFocus::Results;
                        }
                        (SearchFocus::Results, KeyCode::Char('q')) => return Ok(()),
                        (SearchFocus::Results, KeyCode::Char('/' | 'i')) => {
                            app.search_focus = SearchFocus::Input;
                        }
                        (SearchFocus::Results, KeyCode::Up | KeyCode::Char('k')) => {
                            app.select_prev_place();
                        }
                        (SearchFocus::Results, KeyCode::Down | KeyCode::Char('j')) => {
                            app.select_next_place();
                        }
                        (SearchFocus::Results, KeyCode::Enter) => app.open_selected_place(),
                        _ => {}
                    },
                    View::Guide => match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => app.close_guide(),
                        KeyCode::Left | KeyCode::Char('h') => app.prev_page(),
                        KeyCode::Right | KeyCode::Char('l') => app.next_page(),
                        KeyCode::Up | KeyCode::Char('k') => app.select_prev_section(),
                        KeyCode::Down | KeyCode::Char('j') => app.select_next_section(),
                        KeyCode::Enter | KeyCode::Char('e') => app.enter_detail_view(),
                        KeyCode::Char('t') => app.start_title_edit(),
                        KeyCode::Char('r') => app.start_regenerate(),
                        KeyCode::Char('d') => app.start_delete(),
                        KeyCode::Char('c') => app.copy_selected(),
                        KeyCode::Char('n') => app.toggle_narration(),
                        KeyCode::Char(':') => open_command_line(app),
                        _ => {}
                    },
                    View::Detail => {
                        let normal_mode = app
                            .editor_state
                            .as_ref()
                            .is_some_and(|state| state.mode == edtui::EditorMode::Normal);
                        match key.code {
                            KeyCode::Char(':') if normal_mode => open_command_line(app),
                            KeyCode::Esc if normal_mode => app.exit_detail_view(true),
                            _ => {
                                if let Some(ref mut editor_state) = app.editor_state {
                                    editor_handler.on_key_event(key, editor_state);
                                }
                            }
                        }
                    }
                    View::Prompt => match key.code {
                        KeyCode::Char(c) => {
                            if let Some(ref mut prompt) = app.prompt {
                                prompt.input.push(c);
                            }
                        }
                        KeyCode::Backspace => {
                            if let Some(ref mut prompt) = app.prompt {
                                prompt.input.pop();
                            }
                        }
                        KeyCode::Enter => app.submit_prompt(),
                        KeyCode::Esc => app.cancel_prompt(),
                        _ => {}
                    },
                    View::Command => match key.code {
                        KeyCode::Char(c) => {
                            app.command_buffer.push(c);
                        }
                        KeyCode::Backspace => {
                            app.command_buffer.pop();
                        }
                        KeyCode::Enter => {
                            let cmd = std::mem::take(&mut app.command_buffer);
                            if app.run_command(&cmd) {
                                return Ok(());
                            }
                        }
                        KeyCode::Esc => {
                            app.current_view = if app.editor_state.is_some() {
                                View::Detail
                            } else {
                                View::Guide
                            };
                            app.command_buffer.clear();
                        }
                        _ => {}
                    },
                }
            }
        }

        app.tick();
    }
}
