// ABOUTME: Clock synchronization module
// ABOUTME: Local clock sources, the offset-owning clock service and the server time synchronizer

mod clock;
mod probe;
mod service;
mod synchronizer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use probe::{ProbeError, ProbeSample, ProbeSource, ProbeTarget, TimeProbe};
pub use service::{ClockService, SyncStatus};
pub use synchronizer::TimeSynchronizer;
