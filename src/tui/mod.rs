pub mod action;
pub mod state;
pub mod view;

use crate::client::TimetableClient;
use crate::config::Config;
use crate::logging;
use crate::tui::action::{Action, AppEvent};
use crate::tui::state::AppState;
use crate::tui::view::draw;
use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{env, io, time::Duration};
use tokio::sync::mpsc;

/// Loads the timetable once, then again on every `Reload`.
async fn loader(config: Config, mut action_rx: mpsc::Receiver<Action>, event_tx: mpsc::Sender<AppEvent>) {
    let client = match TimetableClient::from_config(&config) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Error loading timetable data: {}", e);
            let _ = event_tx.send(AppEvent::LoadFailed(e.to_string())).await;
            return;
        }
    };

    loop {
        let event = match client.fetch().await {
            Ok(timetable) => {
                log::info!("Timetable loaded");
                AppEvent::TimetableLoaded(timetable)
            }
            Err(e) => {
                log::error!("Error loading timetable data: {}", e);
                AppEvent::LoadFailed(e.to_string())
            }
        };
        if event_tx.send(event).await.is_err() {
            return;
        }

        match action_rx.recv().await {
            Some(Action::Reload) => continue,
            Some(Action::Quit) | None => return,
        }
    }
}

pub async fn run() -> Result<()> {
    logging::install_panic_hook();
    logging::init();

    // --- CONFIGURATION LOGIC ---
    // Config file first, a positional argument overrides the source
    let mut config = Config::load()?;
    if let Some(source) = env::args().nth(1) {
        config.source = source;
    }
    log::info!("Starting with source {}", config.source);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app_state = AppState::new(Local::now().date_naive());
    let (action_tx, action_rx) = mpsc::channel(10);
    let (event_tx, mut event_rx) = mpsc::channel(10);

    tokio::spawn(loader(config, action_rx, event_tx));

    let result = event_loop(&mut terminal, &mut app_state, &action_tx, &mut event_rx).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app_state: &mut AppState,
    action_tx: &mpsc::Sender<Action>,
    event_rx: &mut mpsc::Receiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, app_state))?;

        if let Ok(event) = event_rx.try_recv() {
            match event {
                AppEvent::TimetableLoaded(timetable) => app_state.apply_timetable(timetable),
                AppEvent::LoadFailed(msg) => app_state.load_failed(&msg),
            }
        }

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        match event::read()? {
            Event::Mouse(mouse_event) => match mouse_event.kind {
                MouseEventKind::ScrollDown => app_state.next(),
                MouseEventKind::ScrollUp => app_state.previous(),
                _ => {}
            },
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    let _ = action_tx.send(Action::Quit).await;
                    return Ok(());
                }
                KeyCode::Char('r') => {
                    if !app_state.loading {
                        app_state.begin_reload();
                        if action_tx.send(Action::Reload).await.is_err() {
                            app_state.load_failed("loader is not running");
                        }
                    }
                }
                KeyCode::Tab => app_state.toggle_focus(),
                KeyCode::BackTab => app_state.toggle_focus_back(),
                KeyCode::Down | KeyCode::Char('j') => app_state.next(),
                KeyCode::Up | KeyCode::Char('k') => app_state.previous(),
                KeyCode::PageDown => app_state.jump_forward(10),
                KeyCode::PageUp => app_state.jump_backward(10),
                KeyCode::Enter | KeyCode::Char(' ') => app_state.confirm(),
                _ => {}
            },
            _ => {}
        }
    }
}
