// 🧾 Report Builder - incomplete trips and billing
//
// Both reports are built from a ledger snapshot into plain values, then
// rendered. The text layout is fixed; whitespace is significant.

use crate::error::{TollError, TollResult};
use crate::ledger::TripLedger;
use crate::money::Money;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;

// ============================================================================
// INCOMPLETE TRIPS
// ============================================================================

/// Vehicles that entered at one exit and have not left yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryGroup {
    pub exit: String,
    pub interchange: String,
    /// Ascending
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncompleteTripReport {
    /// Tags ordered by entry exit, then tag
    pub vehicles: Vec<String>,

    /// One group per entry exit, ascending
    pub groups: Vec<EntryGroup>,
}

impl IncompleteTripReport {
    pub fn build(ledger: &TripLedger) -> TollResult<Self> {
        let schedule = ledger.schedule();

        let mut trips = ledger.open_trips();
        trips.sort_by(|a, b| a.entry().cmp(b.entry()).then_with(|| a.tag().cmp(b.tag())));

        let mut groups: Vec<EntryGroup> = Vec::new();
        for trip in &trips {
            match groups.last_mut() {
                Some(group) if group.exit == trip.entry() => {
                    group.tags.push(trip.tag().to_string());
                }
                _ => groups.push(EntryGroup {
                    exit: trip.entry().to_string(),
                    interchange: schedule.interchange_name(trip.entry())?.to_string(),
                    tags: vec![trip.tag().to_string()],
                }),
            }
        }

        let vehicles = trips.iter().map(|trip| trip.tag().to_string()).collect();

        debug!("Incomplete trip report: {} vehicles in {} groups", trips.len(), groups.len());
        Ok(IncompleteTripReport { vehicles, groups })
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }
}

impl fmt::Display for IncompleteTripReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "INCOMPLETE TRIPS:")?;
        writeln!(f, "================")?;
        writeln!(f, "{} vehicles are still on the road:", self.vehicle_count())?;

        if self.vehicles.is_empty() {
            return writeln!(f);
        }

        for tag in &self.vehicles {
            writeln!(f, "\t{}", tag)?;
        }

        for (i, group) in self.groups.iter().enumerate() {
            // Only the first header is set off from the tag list
            if i == 0 {
                writeln!(f)?;
            }
            writeln!(f, "Exit {}-\"{}\":", group.exit, group.interchange)?;
            for tag in &group.tags {
                writeln!(f, "\t{}", tag)?;
            }
        }

        Ok(())
    }
}

// ============================================================================
// BILLING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BilledTrip {
    pub entry: String,
    pub entry_interchange: String,
    pub exit: String,
    pub exit_interchange: String,
    pub toll: Money,
}

/// All completed trips of one vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagBill {
    pub tag: String,
    /// Ordered by entry exit
    pub trips: Vec<BilledTrip>,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingReport {
    /// One bill per tag, ascending
    pub bills: Vec<TagBill>,
    pub total: Money,
}

/// Flat CSV row for the billing export
#[derive(Debug, Serialize)]
struct BillingRow<'a> {
    tag: &'a str,
    entry: &'a str,
    exit: &'a str,
    toll: String,
}

impl BillingReport {
    pub fn build(ledger: &TripLedger) -> TollResult<Self> {
        let schedule = ledger.schedule();

        // Stable sort: repeated (tag, entry) pairs keep history order
        let mut trips = ledger.completed_trips();
        trips.sort_by(|a, b| a.tag().cmp(b.tag()).then_with(|| a.entry().cmp(b.entry())));

        let mut bills: Vec<TagBill> = Vec::new();
        let mut total = Money::ZERO;

        for trip in trips {
            let toll = trip.fare(schedule)?;
            // fare() succeeded, so the trip has an exit
            let exit = trip.exit().unwrap_or_default();

            let line = BilledTrip {
                entry: trip.entry().to_string(),
                entry_interchange: schedule.interchange_name(trip.entry())?.to_string(),
                exit: exit.to_string(),
                exit_interchange: schedule.interchange_name(exit)?.to_string(),
                toll,
            };

            match bills.last_mut() {
                Some(bill) if bill.tag == trip.tag() => {
                    bill.total = add_due(bill.total, toll, trip.tag())?;
                    bill.trips.push(line);
                }
                _ => bills.push(TagBill {
                    tag: trip.tag().to_string(),
                    trips: vec![line],
                    total: toll,
                }),
            }
            total = add_due(total, toll, "all vehicles")?;
        }

        debug!("Billing report: {} vehicles, {} due", bills.len(), total);
        Ok(BillingReport { bills, total })
    }

    pub fn bill_for(&self, tag: &str) -> Option<&TagBill> {
        self.bills.iter().find(|bill| bill.tag == tag)
    }

    /// One row per billed trip: tag, entry, exit, toll
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        for bill in &self.bills {
            for trip in &bill.trips {
                wtr.serialize(BillingRow {
                    tag: &bill.tag,
                    entry: &trip.entry,
                    exit: &trip.exit,
                    toll: trip.toll.to_string(),
                })
                .context("Failed to write billing row")?;
            }
        }

        wtr.flush().context("Failed to flush billing CSV")?;
        Ok(())
    }
}

fn add_due(total: Money, toll: Money, whom: &str) -> TollResult<Money> {
    total.checked_add(toll).ok_or_else(|| TollError::AmountOverflow {
        what: format!("total due for {}", whom),
    })
}

impl fmt::Display for BillingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "BILLING INFORMATION:")?;
        writeln!(f, "===================")?;

        for bill in &self.bills {
            writeln!(f, "Tag: {}", bill.tag)?;
            for trip in &bill.trips {
                writeln!(
                    f,
                    "\tFrom {}-\"{}\" to {}-\"{}\", Toll: {}",
                    trip.entry, trip.entry_interchange, trip.exit, trip.exit_interchange, trip.toll
                )?;
            }
            writeln!(f, "\tTotal due: {}", bill.total)?;
            writeln!(f)?;
        }

        // No trailing newline
        write!(f, "Total Due: {}", self.total)
    }
}

// ============================================================================
// JSON BUNDLE
// ============================================================================

/// Both reports together, for machine consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportBundle {
    pub generated_at: DateTime<Utc>,
    pub incomplete_trips: IncompleteTripReport,
    pub billing: BillingReport,
}

impl ReportBundle {
    pub fn new(incomplete_trips: IncompleteTripReport, billing: BillingReport) -> Self {
        ReportBundle {
            generated_at: Utc::now(),
            incomplete_trips,
            billing,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize reports")
    }
}

// ============================================================================
// TESTS
// ============================================================================
