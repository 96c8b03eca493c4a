// 📒 Trip Ledger - scan merging state machine
//
// Per tag:
//
//   NO_TRIP --scan--> OPEN --scan (other exit)--> CLOSED --scan--> OPEN ...
//
// Trips live in an append-only arena. `open` maps each tag to the handle of
// its latest trip, open or closed. The arena doubles as the trip history:
// every trip appears exactly once, in the order it was started, and closing
// a trip updates it in place.

use crate::error::TollResult;
use crate::schedule::FareSchedule;
use crate::trip::{TripId, TripRecord};
use log::info;
use std::collections::HashMap;

/// What a scan did to the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Scan opened a new trip
    Entered(TripId),
    /// Scan closed the tag's open trip
    Exited(TripId),
}

impl ScanOutcome {
    pub fn trip_id(&self) -> TripId {
        match self {
            ScanOutcome::Entered(id) | ScanOutcome::Exited(id) => *id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TripLedger {
    schedule: FareSchedule,

    /// Every trip ever started (append-only)
    trips: Vec<TripRecord>,

    /// tag → latest trip for that tag
    open: HashMap<String, TripId>,

    /// Accepted scans so far; also the sequence number of the next scan
    scans: u64,
}

impl TripLedger {
    pub fn new(schedule: FareSchedule) -> Self {
        TripLedger {
            schedule,
            trips: Vec::new(),
            open: HashMap::new(),
            scans: 0,
        }
    }

    pub fn schedule(&self) -> &FareSchedule {
        &self.schedule
    }

    /// Apply one scan event
    ///
    /// The scan either closes the tag's open trip or starts a new one.
    /// Validation happens before any mutation, so a rejected scan leaves
    /// the ledger exactly as it was.
    pub fn record_scan(&mut self, tag: &str, exit: &str) -> TollResult<ScanOutcome> {
        let seq = self.scans;

        let current = self
            .open
            .get(tag)
            .copied()
            .filter(|id| self.trips[id.index()].is_open());

        let outcome = match current {
            Some(id) => {
                let trip = &mut self.trips[id.index()];
                trip.close(exit, seq, &self.schedule)?;
                info!("Exiting: {}", trip);
                ScanOutcome::Exited(id)
            }
            None => {
                let trip = TripRecord::open(tag, exit, seq, &self.schedule)?;
                info!("Entering: {}", trip);

                let id = TripId(self.trips.len());
                self.trips.push(trip);
                self.open.insert(tag.to_string(), id);
                ScanOutcome::Entered(id)
            }
        };

        self.scans += 1;
        Ok(outcome)
    }

    /// Vehicles still on the road (unordered)
    pub fn open_trips(&self) -> Vec<&TripRecord> {
        self.open
            .values()
            .map(|id| &self.trips[id.index()])
            .filter(|trip| trip.is_open())
            .collect()
    }

    /// Finished trips, in the order they were started
    pub fn completed_trips(&self) -> Vec<&TripRecord> {
        self.trips.iter().filter(|trip| trip.is_complete()).collect()
    }

    pub fn trip(&self, id: TripId) -> Option<&TripRecord> {
        self.trips.get(id.index())
    }

    /// The tag's trip if it is currently on the road
    pub fn open_trip(&self, tag: &str) -> Option<&TripRecord> {
        self.open
            .get(tag)
            .map(|id| &self.trips[id.index()])
            .filter(|trip| trip.is_open())
    }

    /// All trips of one vehicle, oldest first
    pub fn trips_for<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TripRecord> + 'a {
        self.trips.iter().filter(move |trip| trip.tag() == tag)
    }

    /// Number of trips ever started
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn scan_count(&self) -> u64 {
        self.scans
    }
}

// ============================================================================
// TESTS
// ============================================================================
