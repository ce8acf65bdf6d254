//! The long-running plugin loop.
//!
//! One task owns everything: it gates on calendar access, fetches events on
//! a configurable interval, re-renders the countdown every second, and
//! reacts to SIGUSR1 (refresh now) and SIGTERM/SIGINT (shutdown). Menu rows
//! never touch this loop directly; they signal it through the PID file.

use std::io::Write as _;
use std::time::Duration;

use chrono::{Local, Utc};
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use cal_reminders_core::select_upcoming;
use cal_reminders_eventkit::{normalize_events, CalendarSource, FetchWindow};

use crate::actions;
use crate::config::Config;
use crate::error::MenubarResult;
use crate::output::Renderer;
use crate::pidfile::{self, PidFile};
use crate::view::AppState;

/// How long the startup permission gate waits for the user's answer.
pub(crate) const ACCESS_TIMEOUT: Duration = Duration::from_secs(30);

/// Events carried per selection: one on display, two "Next up:" rows.
const SELECTION_COUNT: usize = 3;

/// Cadence of countdown re-renders.
const DISPLAY_TICK: Duration = Duration::from_secs(1);

/// The menu-bar application.
pub struct App {
    source: Box<dyn CalendarSource>,
    config: Config,
    renderer: Renderer,
    state: AppState,
}

impl App {
    /// Creates the app around a calendar source.
    pub fn new(source: Box<dyn CalendarSource>, config: Config, renderer: Renderer) -> Self {
        Self {
            source,
            config,
            renderer,
            state: AppState::new(),
        }
    }

    /// Runs the streamable plugin loop until shutdown.
    ///
    /// # Errors
    ///
    /// Returns a `Pidfile` error when another instance is already running.
    pub async fn run(mut self) -> MenubarResult<()> {
        let _pidfile = PidFile::create(pidfile::default_pid_path())?;
        let mut signals = install_signals();

        self.emit();

        if !self.gate_access().await {
            // Persistent degraded state: render it once and wait out the
            // process lifetime so the menu keeps showing the hint.
            self.state.deny_access();
            self.emit();
            let _ = signals.shutdown.wait_for(|quit| *quit).await;
            info!("shutting down");
            return Ok(());
        }

        self.refresh().await;
        self.emit();

        let mut display = interval(DISPLAY_TICK);
        display.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // interval() fires immediately; start one period out instead so the
        // initial fetch above is not repeated at once.
        let period = Duration::from_secs(self.config.refresh_interval_seconds.max(1));
        let mut refetch = interval_at(Instant::now() + period, period);
        refetch.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = display.tick() => {
                    if self.state.next_event_started(Utc::now()) {
                        debug!("displayed event started, reselecting");
                        self.refresh().await;
                    }
                    self.emit();
                }
                _ = refetch.tick() => {
                    self.refresh().await;
                    self.emit();
                }
                // The refresh channel closes with the listener on shutdown;
                // the watch arm below exits the loop then.
                Some(()) = signals.refresh.recv() => {
                    info!("refresh requested");
                    self.refresh().await;
                    self.emit();
                }
                _ = signals.shutdown.wait_for(|quit| *quit) => {
                    info!("shutting down");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Prints a single menu snapshot and exits.
    pub async fn run_once(mut self) -> MenubarResult<()> {
        if self.gate_access().await {
            self.refresh().await;
        } else {
            self.state.deny_access();
        }

        print!(
            "{}",
            self.renderer.render(self.state.view(), Utc::now(), &Local)
        );
        Ok(())
    }

    /// Resolves the startup permission gate. A denial, a timed-out prompt
    /// (a `Timeout`-coded error from the source), or a failed probe all
    /// land in the degraded state rather than aborting.
    async fn gate_access(&self) -> bool {
        info!(source = self.source.name(), "requesting calendar access");

        match self.source.request_access(ACCESS_TIMEOUT).await {
            Ok(state) if state.is_granted() => true,
            Ok(_) => {
                warn!("calendar access unavailable");
                false
            }
            Err(err) => {
                warn!(error = %err, "calendar access probe failed");
                false
            }
        }
    }

    /// Fetches, normalizes, and reselects. Fetch errors keep the previous
    /// selection on display.
    async fn refresh(&mut self) {
        let now = Utc::now();
        let mut window = FetchWindow::new(now, self.config.lookahead_hours);
        if let Some(calendars) = &self.config.enabled_calendars {
            window = window.with_calendars(calendars.iter().cloned());
        }

        match self.source.fetch_events(window).await {
            Ok(raw) => {
                let events = normalize_events(&raw);
                let selected = select_upcoming(&events, now, SELECTION_COUNT);
                debug!(
                    fetched = events.len(),
                    selected = selected.len(),
                    "selection refreshed"
                );
                self.state.apply_selection(selected, self.login_item());
            }
            Err(err) => {
                warn!(error = %err, "event fetch failed, keeping previous selection");
            }
        }
    }

    /// Queries the login-item registration for the toggle row. Failures
    /// (no System Events, not macOS) just leave the box unchecked.
    fn login_item(&self) -> bool {
        actions::is_login_item().unwrap_or_else(|err| {
            debug!(error = %err, "login item query failed");
            false
        })
    }

    /// Writes the current view to stdout as one stream block.
    fn emit(&self) {
        let block = self
            .renderer
            .stream_block(self.state.view(), Utc::now(), &Local);
        print!("{}", block);
        let _ = std::io::stdout().flush();
    }
}

/// Receiver halves of the signal channels.
struct Signals {
    shutdown: watch::Receiver<bool>,
    refresh: mpsc::Receiver<()>,
}

/// Spawns the signal listener and returns the channels it feeds.
#[cfg(unix)]
fn install_signals() -> Signals {
    use tokio::signal::unix::{signal, SignalKind};

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (refresh_tx, refresh_rx) = mpsc::channel(1);

    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to install SIGINT handler");
        let mut sigusr1 =
            signal(SignalKind::user_defined1()).expect("Failed to install SIGUSR1 handler");

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("received SIGTERM, initiating shutdown");
                    let _ = shutdown_tx.send(true);
                    break;
                }
                _ = sigint.recv() => {
                    info!("received SIGINT, initiating shutdown");
                    let _ = shutdown_tx.send(true);
                    break;
                }
                _ = sigusr1.recv() => {
                    debug!("received SIGUSR1");
                    // try_send coalesces bursts into one pending refresh.
                    let _ = refresh_tx.try_send(());
                }
            }
        }

        debug!("signal listener stopped");
    });

    Signals {
        shutdown: shutdown_rx,
        refresh: refresh_rx,
    }
}

/// Non-Unix fallback: Ctrl+C only.
#[cfg(not(unix))]
fn install_signals() -> Signals {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (refresh_tx, refresh_rx) = mpsc::channel(1);

    tokio::spawn(async move {
        // Keep the refresh channel open for the process lifetime.
        let _refresh_tx = refresh_tx;
        if let Ok(()) = tokio::signal::ctrl_c().await {
            info!("received Ctrl+C, initiating shutdown");
            let _ = shutdown_tx.send(true);
        }
    });

    Signals {
        shutdown: shutdown_rx,
        refresh: refresh_rx,
    }
}
