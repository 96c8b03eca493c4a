// 🚗 Trip Record - one vehicle, one entry, at most one exit
//
// A record is created by an entry scan and closed (once) by the next scan
// of the same tag. Once closed it is billable.

use crate::error::{ExitPoint, TollError, TollResult};
use crate::money::Money;
use crate::schedule::FareSchedule;
use std::fmt;

// ============================================================================
// TRIP ID
// ============================================================================

/// Handle of a trip inside the ledger's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TripId(pub(crate) usize);

impl TripId {
    pub fn index(&self) -> usize {
        self.0
    }
}

// ============================================================================
// TRIP RECORD
// ============================================================================

#[derive(Debug, Clone)]
pub struct TripRecord {
    tag: String,

    /// Exit where the vehicle got on
    entry: String,

    /// Exit where the vehicle got off (None while on the road)
    exit: Option<String>,

    /// Scan sequence number that opened this trip
    entry_scan: u64,

    /// Scan sequence number that closed this trip
    exit_scan: Option<u64>,
}

impl TripRecord {
    /// Open a trip at `entry`
    pub fn open(
        tag: &str,
        entry: &str,
        entry_scan: u64,
        schedule: &FareSchedule,
    ) -> TollResult<Self> {
        if !schedule.is_valid(entry) {
            return Err(TollError::invalid_exit(ExitPoint::Entry, entry));
        }

        Ok(TripRecord {
            tag: tag.to_string(),
            entry: entry.to_string(),
            exit: None,
            entry_scan,
            exit_scan: None,
        })
    }

    /// Check that `exit` may close this trip, without touching it
    pub fn check_exit(&self, exit: &str, schedule: &FareSchedule) -> TollResult<()> {
        if !schedule.is_valid(exit) {
            return Err(TollError::invalid_exit(ExitPoint::Exit, exit));
        }
        if self.entry == exit {
            return Err(TollError::SameEntryAndExit {
                tag: Some(self.tag.clone()),
                exit: exit.to_string(),
            });
        }
        Ok(())
    }

    /// Close the trip at `exit`
    pub fn close(&mut self, exit: &str, exit_scan: u64, schedule: &FareSchedule) -> TollResult<()> {
        self.check_exit(exit, schedule)?;
        self.exit = Some(exit.to_string());
        self.exit_scan = Some(exit_scan);
        Ok(())
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn exit(&self) -> Option<&str> {
        self.exit.as_deref()
    }

    pub fn entry_scan(&self) -> u64 {
        self.entry_scan
    }

    pub fn exit_scan(&self) -> Option<u64> {
        self.exit_scan
    }

    pub fn is_open(&self) -> bool {
        self.exit.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.exit.is_some()
    }

    /// Toll owed for this trip; only defined once the trip is closed
    pub fn fare(&self, schedule: &FareSchedule) -> TollResult<Money> {
        match &self.exit {
            Some(exit) => schedule.fare(&self.entry, exit),
            None => Err(TollError::IncompleteRecord {
                tag: self.tag.clone(),
            }),
        }
    }
}

/// Same tag and entry; exits are compared only when both trips have one
impl PartialEq for TripRecord {
    fn eq(&self, other: &Self) -> bool {
        if self.tag != other.tag || self.entry != other.entry {
            return false;
        }
        match (&self.exit, &other.exit) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}

impl fmt::Display for TripRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Vehicle ID: {}, Entry={}, Exit={}",
            self.tag,
            self.entry,
            self.exit.as_deref().unwrap_or("UNKNOWN")
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
