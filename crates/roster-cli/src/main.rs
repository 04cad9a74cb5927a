//! `roster` — terminal browser for a remote user directory.
//!
//! # Usage
//!
//! ```
//! roster
//! roster --view table --sort asc
//! roster --plain --search ervin
//! roster --config ~/.config/roster/config.toml --log-file roster.log
//! ```

mod app;
mod plain;
mod settings;
mod ui;

use std::{
  fs::File,
  io,
  path::{Path, PathBuf},
  sync::Mutex,
};

use anyhow::{Context, Result};
use app::{App, KeyResult};
use clap::{Parser, ValueEnum};
use crossterm::{
  event::{DisableFocusChange, EnableFocusChange, Event, EventStream, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use roster_core::query::{QueryState, SortOrder, ViewMode};
use roster_fetch::{
  connectivity::{ConnectivityProbe, watch_reconnects},
  users::{UsersResource, users_cache, users_resource},
};
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ViewArg {
  Cards,
  Table,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortArg {
  Asc,
  Desc,
}

#[derive(Parser, Debug)]
#[command(name = "roster", about = "Browse a remote user directory in the terminal")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", env = "ROSTER_CONFIG")]
  config: Option<PathBuf>,

  /// Collection endpoint returning a JSON array of users.
  #[arg(long)]
  url: Option<String>,

  /// Seconds during which repeated requests share one fetch.
  #[arg(long, value_name = "SECS")]
  dedup_secs: Option<u64>,

  /// Initial layout.
  #[arg(long, value_enum)]
  view: Option<ViewArg>,

  /// Initial search text (name or email).
  #[arg(short, long, default_value = "")]
  search: String,

  /// Initial company filter (exact name).
  #[arg(long)]
  company: Option<String>,

  /// Initial sort direction by name.
  #[arg(long, value_enum)]
  sort: Option<SortArg>,

  /// Print the filtered list to stdout instead of starting the TUI.
  #[arg(long)]
  plain: bool,

  /// Write logs to this file (TUI mode logs nowhere otherwise).
  #[arg(long, value_name = "FILE", env = "ROSTER_LOG_FILE")]
  log_file: Option<PathBuf>,
}

impl Args {
  /// Flags override file and environment settings.
  fn apply(&self, mut settings: Settings) -> Settings {
    if let Some(url) = &self.url {
      settings.url = url.clone();
    }
    if let Some(secs) = self.dedup_secs {
      settings.dedup_interval_secs = secs;
    }
    if let Some(view) = self.view {
      settings.view = match view {
        ViewArg::Cards => ViewMode::Cards,
        ViewArg::Table => ViewMode::Table,
      };
    }
    settings
  }

  fn initial_query(&self, view: ViewMode) -> QueryState {
    let sort = match self.sort {
      None => SortOrder::Unset,
      Some(SortArg::Asc) => SortOrder::Ascending,
      Some(SortArg::Desc) => SortOrder::Descending,
    };
    QueryState::default()
      .with_search(self.search.clone())
      .with_company(self.company.clone())
      .with_sort(sort)
      .with_view(view)
  }
}

// ─── Logging ──────────────────────────────────────────────────────────────────

fn init_tracing(log_file: Option<&Path>, plain: bool) -> Result<()> {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();

  if let Some(path) = log_file {
    let file = File::create(path)
      .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_ansi(false)
      .with_writer(Mutex::new(file))
      .init();
  } else if plain {
    tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(io::stderr)
      .init();
  }
  Ok(())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
  let args = Args::parse();
  init_tracing(args.log_file.as_deref(), args.plain)?;

  let settings = args.apply(Settings::load(args.config.as_deref())?);
  let query = args.initial_query(settings.view);
  tracing::debug!(?settings, "resolved settings");

  let cache = users_cache(settings.cache_config()).context("building HTTP client")?;

  if args.plain {
    return plain::run(&cache, &settings.url, &query).await;
  }

  if settings.revalidate_on_reconnect {
    let probe = ConnectivityProbe::for_endpoint(&settings.url, settings.probe_interval())
      .context("configuring connectivity probe")?;
    let _reconnects = watch_reconnects(cache.clone(), probe.spawn());
  }

  let resource = users_resource(&cache, settings.url.clone());
  let mut app = App::new(query);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen, EnableFocusChange)
    .context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app, resource).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), DisableFocusChange, LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

/// Redraw, then wait for whichever comes first: a new resource snapshot or a
/// terminal event. Fetches run on their own tasks, so input stays live while
/// a request is outstanding.
async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
  mut resource: UsersResource,
) -> Result<()> {
  let mut events = EventStream::new();
  app.sync(resource.snapshot());

  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    tokio::select! {
      () = resource.changed() => app.sync(resource.snapshot()),
      maybe_event = events.next() => match maybe_event {
        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
          match app.handle_key(key) {
            KeyResult::Quit => break,
            KeyResult::Revalidate => resource.mutate(),
            KeyResult::None => {}
          }
        }
        Some(Ok(Event::FocusGained)) => {
          resource.cache().on_focus();
        }
        // Resize and the rest only need the redraw at the top of the loop.
        Some(Ok(_)) => {}
        Some(Err(e)) => return Err(e).context("reading terminal event"),
        None => break,
      },
    }
  }

  Ok(())
}
