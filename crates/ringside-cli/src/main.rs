//! `ringside` — terminal status monitor for the booking-call agent.
//!
//! # Usage
//!
//! ```
//! ringside --url http://localhost:5233
//! ringside --config ~/.config/ringside/config.toml
//! ```
//!
//! Press `b` to submit the configured booking request and start monitoring;
//! the agent panel then polls the server's status endpoint until you stop
//! monitoring (`m`) or quit (`q`).

mod app;
mod client;
mod ui;

use std::{
  io,
  time::{Duration, Instant},
};

use anyhow::{Context, Result};
use app::{App, PHASE_INTERVAL, POLL_INTERVAL};
use clap::Parser;
use client::{ApiClient, ApiConfig, BookingRequest};
use crossterm::{
  event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "ringside", about = "Terminal status monitor for the booking-call agent")]
struct Args {
  /// Path to a TOML config file (url, booking defaults).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the ringside server (default: http://localhost:5233).
  #[arg(long, env = "RINGSIDE_URL")]
  url: Option<String>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:     String,
  #[serde(default)]
  booking: BookingSection,
}

#[derive(Deserialize, Default)]
struct BookingSection {
  #[serde(default)]
  city:       String,
  #[serde(default)]
  start_date: String,
  #[serde(default)]
  end_date:   String,
  #[serde(default)]
  style:      String,
  #[serde(default)]
  notes:      String,
}

impl From<BookingSection> for BookingRequest {
  fn from(section: BookingSection) -> Self {
    BookingRequest {
      city:       section.city,
      start_date: section.start_date,
      end_date:   section.end_date,
      style:      section.style,
      notes:      section.notes,
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  // Logging is off unless RUST_LOG is set; the terminal belongs to the UI.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::OFF.into())
        .from_env_lossy(),
    )
    .with_writer(io::stderr)
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:5233".to_string()),
  };

  let client = ApiClient::new(api_config)?;
  let mut app = App::new(client, BookingRequest::from(file_cfg.booking));

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

/// Drives drawing, key handling, and the two monitoring timers.
///
/// The fetch of a poll tick runs to completion inside the loop, so ticks
/// never overlap and a result in transit when monitoring stops is applied
/// before the timer goes quiet.
async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  let mut last_poll = Instant::now();
  let mut last_phase = Instant::now();

  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event {
      if !handle_key(app, key, &mut last_poll, &mut last_phase).await {
        break;
      }
    }

    if app.is_polling() {
      if last_poll.elapsed() >= POLL_INTERVAL {
        app.poll_tick().await;
        last_poll = Instant::now();
      }
      if app.showing_phases() && last_phase.elapsed() >= PHASE_INTERVAL {
        app.advance_phase();
        last_phase = Instant::now();
      }
    }
  }

  Ok(())
}

/// Process a key event. Returns `true` to continue, `false` to quit.
async fn handle_key(
  app: &mut App,
  key: KeyEvent,
  last_poll: &mut Instant,
  last_phase: &mut Instant,
) -> bool {
  // Global: Ctrl-C quits from anywhere.
  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
    return false;
  }

  match key.code {
    KeyCode::Char('q') => return false,

    // Submit the booking and start monitoring, with one immediate query.
    KeyCode::Char('b') => {
      app.submit_booking().await;
      app.poll_tick().await;
      *last_poll = Instant::now();
      *last_phase = Instant::now();
    }

    // Toggle monitoring without re-submitting.
    KeyCode::Char('m') => {
      if app.is_polling() {
        app.stop_monitoring();
      } else {
        app.start_monitoring();
        app.poll_tick().await;
        *last_poll = Instant::now();
        *last_phase = Instant::now();
      }
    }

    _ => {}
  }

  true
}
