// Thruway Toll Ledger - Core Library
// Exposes all modules for use in the simulator binary and tests

pub mod error;
pub mod money;
pub mod schedule;   // Fare Schedule - exit table + per-exit rate
pub mod trip;       // Trip Record - one entry, at most one exit
pub mod ledger;     // Trip Ledger - scan merging state machine
pub mod report;     // Report Builder - incomplete trips + billing
pub mod scans;      // Scan Input - whitespace token pairs
pub mod simulator;  // Simulation - one batch, one ledger

// Re-export commonly used types
pub use error::{ErrorKind, ExitPoint, TollError, TollResult};
pub use money::Money;
pub use schedule::{Exit, FareSchedule, ScheduleConfig, DEFAULT_RATE_CENTS};
pub use trip::{TripId, TripRecord};
pub use ledger::{ScanOutcome, TripLedger};
pub use report::{
    BilledTrip, BillingReport, EntryGroup, IncompleteTripReport, ReportBundle, TagBill,
};
pub use scans::{parse_scans, read_scans, ScanEvent};
pub use simulator::Simulation;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
