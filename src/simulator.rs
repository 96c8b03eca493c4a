// 🚦 Simulation - one batch replayed through one ledger
//
// A run owns its schedule and ledger; nothing is shared between runs.

use crate::error::TollResult;
use crate::ledger::{ScanOutcome, TripLedger};
use crate::report::{BillingReport, IncompleteTripReport, ReportBundle};
use crate::scans::ScanEvent;
use crate::schedule::FareSchedule;
use log::debug;

#[derive(Debug, Clone)]
pub struct Simulation {
    ledger: TripLedger,
}

impl Simulation {
    pub fn new(schedule: FareSchedule) -> Self {
        Simulation {
            ledger: TripLedger::new(schedule),
        }
    }

    pub fn record(&mut self, tag: &str, exit: &str) -> TollResult<ScanOutcome> {
        self.ledger.record_scan(tag, exit)
    }

    /// Apply scans in order, stopping at the first rejected one
    ///
    /// Returns the number of scans applied.
    pub fn replay<I>(&mut self, events: I) -> TollResult<usize>
    where
        I: IntoIterator<Item = ScanEvent>,
    {
        let mut applied = 0;
        for event in events {
            self.ledger.record_scan(&event.tag, &event.exit)?;
            applied += 1;
        }

        debug!("Replayed {} scans, {} trips", applied, self.ledger.len());
        Ok(applied)
    }

    pub fn ledger(&self) -> &TripLedger {
        &self.ledger
    }

    pub fn incomplete_report(&self) -> TollResult<IncompleteTripReport> {
        IncompleteTripReport::build(&self.ledger)
    }

    pub fn billing_report(&self) -> TollResult<BillingReport> {
        BillingReport::build(&self.ledger)
    }

    /// Both reports in print order
    pub fn render_text(&self) -> TollResult<String> {
        let incomplete = self.incomplete_report()?;
        let billing = self.billing_report()?;
        Ok(format!("{}{}", incomplete, billing))
    }

    pub fn bundle(&self) -> TollResult<ReportBundle> {
        Ok(ReportBundle::new(self.incomplete_report()?, self.billing_report()?))
    }
}
