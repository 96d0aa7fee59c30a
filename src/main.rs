//! Terminal Aqua Match runner (default binary).
//!
//! Crossterm for input and a framebuffer-based renderer. The loop renders,
//! waits for input until the next one-second tick, then ticks the session.
//! All rules live in the session; this file only translates keys.

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use aqua_match::config::RunConfig;
use aqua_match::core::{EngineError, SimpleRng};
use aqua_match::engine::{GameSession, PlayerStore, SessionSnapshot};
use aqua_match::input::{handle_key_event, should_quit, Cursor, UiCommand};
use aqua_match::profile::ProfileStore;
use aqua_match::term::{FrameBuffer, GameView, HudState, TerminalRenderer, Viewport};
use aqua_match::types::{GamePhase, PowerUpKind, SessionEvent, TICK_SECS};

type Session = GameSession<ProfileStore, SimpleRng>;

fn main() -> Result<()> {
    let config = RunConfig::from_env();
    init_logging(&config)?;

    let store = ProfileStore::load(&config.save_path, config.starter_powerups)?;
    let mut session = GameSession::new(config.session_config(), store, SimpleRng::new(config.seed))?;
    session.init_level(config.level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        seed = config.seed,
        level = session.level(),
        "aqua-match starting"
    );

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut session);

    // Always try to restore terminal state.
    let _ = term.exit();
    let saved = session.store().save();
    result.and(saved)
}

/// The terminal owns stdout, so logs go to a file or nowhere.
fn init_logging(config: &RunConfig) -> Result<()> {
    let Some(path) = &config.log_path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .compact()
        .init();
    Ok(())
}

fn run(term: &mut TerminalRenderer, session: &mut Session) -> Result<()> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = SessionSnapshot::default();
    let mut cursor = Cursor::new(session.config().width, session.config().height);
    let mut message: Option<String> = None;

    let tick_duration = Duration::from_secs(TICK_SECS as u64);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        session.snapshot_into(&mut snap);
        let hud = hud_state(session, cursor, message.clone());
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snap, &hud, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(command) = handle_key_event(key) {
                        message = apply_command(session, &mut cursor, command);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            session.tick(TICK_SECS);
        }

        for event in session.take_events() {
            if let Some(note) = on_event(session, event) {
                message = Some(note);
            }
        }
    }
}

fn hud_state(session: &Session, cursor: Cursor, message: Option<String>) -> HudState {
    let store = session.store();
    HudState {
        cursor: Some(cursor.position()),
        inventory: PowerUpKind::ALL
            .iter()
            .map(|&kind| (kind, store.powerup_count(kind)))
            .collect(),
        coins: store.profile().coins,
        message,
    }
}

/// Run one command; returns a line for the status area, if any.
fn apply_command(session: &mut Session, cursor: &mut Cursor, command: UiCommand) -> Option<String> {
    let (row, col) = cursor.position();
    let under_cursor = session.grid().block_at(row, col).map(|b| b.id);

    match command {
        UiCommand::MoveCursor(dir) => {
            cursor.step(dir);
            None
        }
        UiCommand::Tap => match under_cursor {
            Some(id) => note(session.handle_tap(id)),
            None if session.phase() == GamePhase::Playing => Some("empty cell".to_string()),
            None => None,
        },
        UiCommand::PowerUp(kind) => match under_cursor {
            Some(id) => note(session.use_power_up(kind, id)),
            None => Some(format!("aim the {} at a block", kind.label())),
        },
        UiCommand::Flush => note(session.strong_flush()),
        UiCommand::TogglePause => match session.phase() {
            GamePhase::Paused => note(session.resume()),
            _ => note(session.pause()),
        },
        UiCommand::Revive => note(session.revive()),
        UiCommand::EndAttempt => note(session.end_attempt()),
        UiCommand::NextLevel => note(session.next_level()),
        UiCommand::Restart => note(session.restart()),
    }
}

fn note<T>(result: Result<T, EngineError>) -> Option<String> {
    result.err().map(|e| e.to_string())
}

fn on_event(session: &Session, event: SessionEvent) -> Option<String> {
    info!(?event, "session event");
    match event {
        SessionEvent::LevelComplete { coins, .. } => {
            save_profile(session);
            Some(format!("level clear, +{coins} coins"))
        }
        SessionEvent::PostLevel { .. } => None,
        SessionEvent::GameOver { reason, .. } => Some(format!("game over: {}", reason.as_str())),
        SessionEvent::ReviveAvailable { remaining } => Some(format!("{remaining} revive(s) left")),
        SessionEvent::GameEnded { score, .. } => {
            save_profile(session);
            Some(format!("final score {score}"))
        }
    }
}

fn save_profile(session: &Session) {
    if let Err(e) = session.store().save() {
        warn!(error = %e, "profile save failed");
    }
}
