//! Session loop: sample, render, drain input, sleep.
//!
//! The App owns the [`Monitor`], the terminal, and the event reader. Each
//! iteration takes a fresh [`Snapshot`], clamps the selection to the new
//! row count, draws one frame, then applies every key event queued since
//! the previous iteration. A quit key ends the session on the spot; any
//! events queued behind it are dropped.

use color_eyre::eyre::Result;
use tracing::{debug, info};

use netwatch_core::{Monitor, Snapshot};

use crate::action::Action;
use crate::dashboard;
use crate::event::{Event, EventReader};
use crate::tui::Tui;

/// Lifecycle of a dashboard session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Terminated,
}

/// View state the renderer reads. Only the session loop mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardState {
    /// Index of the highlighted row, always `< count` when `count > 0`.
    pub selected_row: usize,
    /// Last reported (cols, rows). Informational: the renderer lays out
    /// against the frame area ratatui hands it, which tracks resizes itself.
    pub terminal_size: (u16, u16),
}

impl DashboardState {
    pub fn select_next(&mut self, count: usize) {
        self.selected_row = (self.selected_row + 1).min(count.saturating_sub(1));
    }

    pub fn select_prev(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    /// Pull the selection back inside `0..count` after the row count changed.
    pub fn clamp(&mut self, count: usize) {
        self.selected_row = self.selected_row.min(count.saturating_sub(1));
    }
}

/// Session state machine, independent of the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub state: SessionState,
    pub dashboard: DashboardState,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            state: SessionState::Running,
            dashboard: DashboardState::default(),
        }
    }
}

impl Session {
    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// Apply one action given the current row count.
    pub fn apply(&mut self, action: Action, count: usize) {
        match action {
            Action::Quit => self.state = SessionState::Terminated,
            Action::SelectNext => self.dashboard.select_next(count),
            Action::SelectPrev => self.dashboard.select_prev(),
            Action::Resize(w, h) => self.dashboard.terminal_size = (w, h),
        }
    }

    /// Apply queued events in order, stopping at the first quit.
    pub fn handle_events<I>(&mut self, events: I, count: usize)
    where
        I: IntoIterator<Item = Event>,
    {
        for event in events {
            let action = match event {
                Event::Key(key) => Action::from_key(key),
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
            };
            let Some(action) = action else {
                continue;
            };

            debug!(?action, "applying action");
            self.apply(action, count);
            if !self.is_running() {
                break;
            }
        }
    }
}

/// Top-level application.
pub struct App {
    monitor: Monitor,
    session: Session,
}

impl App {
    pub fn new(monitor: Monitor) -> Self {
        Self {
            monitor,
            session: Session::default(),
        }
    }

    /// Run the session loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::enter()?;
        self.session.dashboard.terminal_size = tui.size()?;

        let mut events = EventReader::new();
        let refresh = self.monitor.config().refresh_interval;

        info!(
            interface = %self.monitor.config().interface,
            refresh_ms = refresh.as_millis(),
            "dashboard session started"
        );

        while self.session.is_running() {
            let snapshot: Snapshot = self.monitor.snapshot().await;
            let count = snapshot.connection_count();
            self.session.dashboard.clamp(count);

            let state = self.session.dashboard;
            tui.draw(|frame| dashboard::render(frame, &state, &snapshot))?;

            let size_before = self.session.dashboard.terminal_size;
            self.session
                .handle_events(std::iter::from_fn(|| events.try_next()), count);
            if self.session.dashboard.terminal_size != size_before {
                let (cols, rows) = self.session.dashboard.terminal_size;
                debug!(cols, rows, "terminal resized");
            }

            if self.session.is_running() {
                tokio::time::sleep(refresh).await;
            }
        }

        events.stop();
        tui.exit();

        let failures = self.monitor.lookup_failures();
        info!(
            geolocation_failures = failures.geolocation,
            public_address_failures = failures.public_address,
            "dashboard session ended"
        );
        Ok(())
    }
}
