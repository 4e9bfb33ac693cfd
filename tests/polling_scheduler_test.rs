use async_trait::async_trait;
use hypewatch::orchestration::{MonitorCycle, MonitorPhase, PollingScheduler};
use hypewatch::{
    Address, Coin, DataSource, DataSourceError, Decimal, Fill, MockDataSource, MonitorError,
    Position, PositionSnapshot, RecordingNotifier,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

const ADDR: &str = "0x0000000000000000000000000000000000000abc";

fn snap(entries: &[(&str, &str)]) -> PositionSnapshot {
    entries
        .iter()
        .map(|(coin, size)| {
            Position::new(Coin::new(*coin), Decimal::from_str_canonical(size).unwrap())
        })
        .collect()
}

/// Panics on the n-th position fetch.
#[derive(Debug)]
struct PanickingDataSource {
    calls: AtomicUsize,
    panic_on: usize,
}

#[async_trait]
impl DataSource for PanickingDataSource {
    async fn fetch_positions(&self, _user: &str) -> Result<PositionSnapshot, DataSourceError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n == self.panic_on {
            panic!("clearinghouse state inconsistent");
        }
        Ok(PositionSnapshot::new())
    }

    async fn fetch_fills(&self, _user: &str) -> Result<Vec<Fill>, DataSourceError> {
        Ok(Vec::new())
    }
}

/// Fires a shutdown trigger from inside the first position fetch.
#[derive(Debug)]
struct TriggeringDataSource {
    calls: AtomicUsize,
    trigger: Mutex<Option<oneshot::Sender<()>>>,
}

#[async_trait]
impl DataSource for TriggeringDataSource {
    async fn fetch_positions(&self, _user: &str) -> Result<PositionSnapshot, DataSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(tx) = self.trigger.lock().unwrap().take() {
            let _ = tx.send(());
        }
        Ok(snap(&[("BTC", "1")]))
    }

    async fn fetch_fills(&self, _user: &str) -> Result<Vec<Fill>, DataSourceError> {
        Ok(Vec::new())
    }
}

#[tokio::test(start_paused = true)]
async fn test_runs_cycles_until_shutdown() {
    let mock = MockDataSource::new()
        .with_positions(snap(&[("BTC", "1")]))
        .with_positions(snap(&[("BTC", "1"), ("ETH", "2")]))
        .with_positions(snap(&[("ETH", "2")]));
    let sink = Arc::new(RecordingNotifier::new());
    let mut cycle = MonitorCycle::new(Address::new(ADDR.to_string()), Arc::new(mock), sink.clone());

    // Cycles start at t=0, 100 and 200; shutdown lands during the third pause.
    let shutdown = tokio::time::sleep(Duration::from_secs(250));
    let result = PollingScheduler::new(Duration::from_secs(100))
        .run(&mut cycle, shutdown)
        .await;

    assert!(result.is_ok());
    assert_eq!(cycle.phase(), MonitorPhase::Stopped);

    let messages = sink.messages();
    assert_eq!(messages.len(), 4);
    assert!(messages[0].starts_with("✅ Monitoring Started"));
    assert!(messages[1].starts_with("🔔 Position OPENED"));
    assert!(messages[1].contains("Asset: ETH\n"));
    assert!(messages[2].starts_with("🔵 Position CLOSED"));
    assert!(messages[2].contains("Asset: BTC\n"));
    assert_eq!(messages[3], "⚠️ Monitoring Stopped");
}

#[tokio::test(start_paused = true)]
async fn test_pending_shutdown_is_seen_after_current_cycle() {
    let sink = Arc::new(RecordingNotifier::new());
    let mut cycle = MonitorCycle::new(
        Address::new(ADDR.to_string()),
        Arc::new(MockDataSource::new()),
        sink.clone(),
    );

    let result = PollingScheduler::new(Duration::from_secs(300))
        .run(&mut cycle, std::future::ready(()))
        .await;

    assert!(result.is_ok());
    let messages = sink.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].starts_with("✅ Monitoring Started"));
    assert_eq!(messages[1], "⚠️ Monitoring Stopped");
}

#[tokio::test(start_paused = true)]
async fn test_failed_stop_announcement_still_stops() {
    let sink = Arc::new(RecordingNotifier::new().failing());
    let mut cycle = MonitorCycle::new(
        Address::new(ADDR.to_string()),
        Arc::new(MockDataSource::new()),
        sink.clone(),
    );

    let result = PollingScheduler::new(Duration::from_secs(60))
        .run(&mut cycle, tokio::time::sleep(Duration::from_secs(90)))
        .await;

    assert!(result.is_ok());
    assert_eq!(cycle.phase(), MonitorPhase::Stopped);
    assert!(sink.messages().is_empty());
    // Start announcement plus stop announcement.
    assert_eq!(sink.attempts(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_panicking_cycle_announces_failure_and_propagates() {
    let datasource = Arc::new(PanickingDataSource {
        calls: AtomicUsize::new(0),
        panic_on: 2,
    });
    let sink = Arc::new(RecordingNotifier::new());
    let mut cycle = MonitorCycle::new(Address::new(ADDR.to_string()), datasource, sink.clone());

    let result = PollingScheduler::new(Duration::from_secs(10))
        .run(&mut cycle, std::future::pending::<()>())
        .await;

    match result {
        Err(MonitorError::CycleFailed(msg)) => {
            assert_eq!(msg, "clearinghouse state inconsistent")
        }
        other => panic!("expected CycleFailed, got {:?}", other),
    }
    assert_eq!(cycle.phase(), MonitorPhase::Failed);

    let messages = sink.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].starts_with("✅ Monitoring Started"));
    assert_eq!(
        messages[1],
        "❌ Monitor Error\n\nclearinghouse state inconsistent"
    );
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_during_first_cycle_lets_it_finish() {
    let (tx, rx) = oneshot::channel();
    let datasource = Arc::new(TriggeringDataSource {
        calls: AtomicUsize::new(0),
        trigger: Mutex::new(Some(tx)),
    });
    let sink = Arc::new(RecordingNotifier::new());
    let mut cycle = MonitorCycle::new(
        Address::new(ADDR.to_string()),
        datasource.clone(),
        sink.clone(),
    );

    let shutdown = async {
        let _ = rx.await;
    };
    let result = PollingScheduler::new(Duration::from_secs(300))
        .run(&mut cycle, shutdown)
        .await;

    assert!(result.is_ok());
    assert_eq!(datasource.calls.load(Ordering::SeqCst), 1);
    assert_eq!(cycle.phase(), MonitorPhase::Stopped);
    assert_eq!(cycle.state().previous_snapshot.len(), 1);

    let messages = sink.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].starts_with("✅ Monitoring Started"));
    assert_eq!(messages[1], "⚠️ Monitoring Stopped");
}
