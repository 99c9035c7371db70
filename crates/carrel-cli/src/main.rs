//! `carrel` — terminal admin console for a carrel study space.
//!
//! # Usage
//!
//! ```
//! carrel --url http://localhost:8000 --token <admin token>
//! carrel --config ~/.config/carrel/config.toml
//! ```

mod app;
mod ui;

use std::{io, time::Duration};

use anyhow::{Context, Result};
use app::App;
use carrel_client::{
  AdminSession, ApiClient, ApiConfig,
  events::spawn_alert_feed,
  poll::{PollOptions, PollOutcome, spawn_dashboard_poller},
};
use carrel_core::alerts::DrowsinessAlert;
use chrono::Utc;
use clap::Parser;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "carrel", about = "Terminal admin console for the carrel backend")]
struct Args {
  /// Path to a TOML config file (url, token, interval_secs).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the carrel backend (default: http://localhost:8000).
  #[arg(long, env = "CARREL_URL")]
  url: Option<String>,

  /// Admin bearer token. Without one, requests go out unauthenticated.
  #[arg(long, env = "CARREL_TOKEN")]
  token: Option<String>,

  /// Dashboard poll interval in seconds (default: 5).
  #[arg(long, env = "CARREL_INTERVAL")]
  interval: Option<u64>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:           String,
  #[serde(default)]
  token:         String,
  #[serde(default)]
  interval_secs: Option<u64>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  // The terminal owns stdout, so logs go to stderr and only when asked for.
  if std::env::var_os("RUST_LOG").is_some() {
    tracing_subscriber::fmt()
      .with_env_filter(EnvFilter::from_default_env())
      .with_writer(io::stderr)
      .init();
  }

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
  let base_url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| "http://localhost:8000".to_string());
  let token = args
    .token
    .or_else(|| (!file_cfg.token.is_empty()).then(|| file_cfg.token.clone()));
  let interval = args.interval.or(file_cfg.interval_secs).unwrap_or(5).max(1);

  let session = match token {
    Some(t) => AdminSession::with_token(t),
    None => AdminSession::anonymous(),
  };
  let client = ApiClient::new(ApiConfig { base_url }, session)?;

  // One token stops the poller and the alert feed together on the way out.
  let shutdown = CancellationToken::new();
  let poll_rx = spawn_dashboard_poller(
    client.clone(),
    PollOptions {
      interval: Duration::from_secs(interval),
      budget:   Duration::from_secs(interval),
    },
    shutdown.clone(),
  );
  let alert_rx = spawn_alert_feed(client.clone(), shutdown.clone());

  let mut app = App::new(client);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result =
    run_event_loop(&mut terminal, &mut app, poll_rx, alert_rx).await;

  shutdown.cancel();

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
  mut poll_rx: mpsc::Receiver<PollOutcome>,
  mut alert_rx: mpsc::Receiver<DrowsinessAlert>,
) -> Result<()> {
  loop {
    // Apply whatever the background tasks produced since the last frame.
    while let Ok(outcome) = poll_rx.try_recv() {
      app.apply_poll(outcome);
    }
    while let Ok(alert) = alert_rx.try_recv() {
      app.apply_alert(alert, Utc::now());
    }
    app.tick(Utc::now());

    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(evt) = maybe_event {
      match evt {
        Event::Key(key) => {
          let cont = app.handle_key(key).await?;
          if !cont {
            break;
          }
        }
        Event::Resize(_, _) => {
          // Terminal will redraw on next iteration.
        }
        _ => {}
      }
    }
  }

  Ok(())
}
