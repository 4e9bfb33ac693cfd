pub mod cycle;
pub mod scheduler;
pub mod shutdown;

pub use cycle::{CycleReport, MonitorCycle, MonitorPhase, MonitorState};
pub use scheduler::PollingScheduler;
pub use shutdown::ShutdownSignal;
