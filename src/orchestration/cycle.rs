use crate::datasource::DataSource;
use crate::domain::{Address, PositionSnapshot};
use crate::engine::{
    detect_new_fills, detect_position_changes, MonitorEvent, PositionEvent, SeenFillIds,
};
use crate::format::EventFormatter;
use crate::notify::Notifier;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Baseline carried from one cycle to the next. Lives only in memory.
#[derive(Debug, Clone)]
pub struct MonitorState {
    pub previous_snapshot: PositionSnapshot,
    pub seen_fills: SeenFillIds,
    pub is_first_cycle: bool,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::with_seen_fills(SeenFillIds::new())
    }

    pub fn with_seen_fills(seen_fills: SeenFillIds) -> Self {
        Self {
            previous_snapshot: PositionSnapshot::new(),
            seen_fills,
            is_first_cycle: true,
        }
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorPhase {
    /// No cycle has completed yet.
    Initializing,
    SteadyState,
    Stopped,
    Failed,
}

/// What one cycle did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub positions_fetched: bool,
    pub fills_fetched: bool,
    pub position_events: usize,
    pub trade_events: usize,
    pub dispatched: usize,
    pub dispatch_failures: usize,
    pub announced_start: bool,
}

/// One poll: fetch, detect, notify, then advance the baseline.
#[derive(Debug)]
pub struct MonitorCycle {
    address: Address,
    datasource: Arc<dyn DataSource>,
    notifier: Arc<dyn Notifier>,
    formatter: EventFormatter,
    state: MonitorState,
    phase: MonitorPhase,
}

impl MonitorCycle {
    pub fn new(
        address: Address,
        datasource: Arc<dyn DataSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let formatter = EventFormatter::new(address.clone(), notifier.markup());
        Self {
            address,
            datasource,
            notifier,
            formatter,
            state: MonitorState::new(),
            phase: MonitorPhase::Initializing,
        }
    }

    pub fn with_state(mut self, state: MonitorState) -> Self {
        self.phase = if state.is_first_cycle {
            MonitorPhase::Initializing
        } else {
            MonitorPhase::SteadyState
        };
        self.state = state;
        self
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn phase(&self) -> MonitorPhase {
        self.phase
    }

    pub fn formatter(&self) -> &EventFormatter {
        &self.formatter
    }

    pub(crate) fn set_phase(&mut self, phase: MonitorPhase) {
        self.phase = phase;
    }

    /// Run a single monitoring check.
    ///
    /// Each channel (positions, fills) whose fetch fails is skipped and keeps
    /// its previous baseline. Dispatch failures never abort the batch.
    pub async fn run_once(&mut self) -> CycleReport {
        info!("Running monitoring check");

        let first = self.state.is_first_cycle;
        let user = self.address.as_str();
        let mut report = CycleReport::default();
        let mut events: Vec<MonitorEvent> = Vec::new();

        let current_snapshot = match self.datasource.fetch_positions(user).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(error = %e, "Failed to fetch positions, skipping position check");
                None
            }
        };

        let current_fills = match self.datasource.fetch_fills(user).await {
            Ok(fills) => Some(fills),
            Err(e) => {
                warn!(error = %e, "Failed to fetch fills, skipping trade check");
                None
            }
        };

        if let Some(current) = &current_snapshot {
            report.positions_fetched = true;
            if first {
                info!(positions = current.len(), "Initial state recorded");
            }
            let changes =
                detect_position_changes(&self.state.previous_snapshot, current, first);
            for change in &changes {
                log_position_event(change);
            }
            report.position_events = changes.len();
            events.extend(changes.into_iter().map(MonitorEvent::from));
        }

        if let Some(fills) = &current_fills {
            report.fills_fetched = true;
            let fresh = detect_new_fills(&mut self.state.seen_fills, fills, first);
            if first {
                info!(fills = self.state.seen_fills.len(), "Initial fills recorded");
            }
            for fill in &fresh {
                info!(
                    tid = fill.trade_id().unwrap_or_default(),
                    coin = %fill.coin,
                    side = ?fill.side,
                    "New fill detected"
                );
            }
            report.trade_events = fresh.len();
            events.extend(fresh.into_iter().map(MonitorEvent::from));
        }

        for event in &events {
            let text = self.formatter.format(event, Utc::now());
            match self.notifier.send(&text).await {
                Ok(()) => report.dispatched += 1,
                Err(e) => {
                    error!(error = %e, "Failed to send notification");
                    report.dispatch_failures += 1;
                }
            }
        }

        if let Some(current) = current_snapshot {
            self.state.previous_snapshot = current;
        }

        if first {
            self.state.is_first_cycle = false;
            self.phase = MonitorPhase::SteadyState;
            report.announced_start = self.announce(&self.formatter.started()).await;
        }

        report
    }

    /// Best-effort send of a lifecycle message. Returns whether it was delivered.
    pub async fn announce(&self, text: &str) -> bool {
        match self.notifier.send(text).await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Failed to send announcement");
                false
            }
        }
    }
}

fn log_position_event(event: &PositionEvent) {
    match event {
        PositionEvent::Opened { position } => {
            info!(coin = %position.coin, size = %position.szi, "New position opened");
        }
        PositionEvent::Modified {
            position,
            previous_size,
        } => {
            info!(
                coin = %position.coin,
                old = %previous_size,
                new = %position.szi,
                "Position modified"
            );
        }
        PositionEvent::Closed { previous } => {
            info!(coin = %previous.coin, size = %previous.szi, "Position closed");
        }
    }
}
