// 🛣️ Fare Schedule - exit table and per-segment tolls
//
// The highway is an ordered list of exits. A trip is charged a flat rate
// for every exit it passes, not counting the exit where it got on:
//
//   fare(entry, exit) = rate × |position(exit) - position(entry)|

use crate::error::{ExitPoint, TollError, TollResult};
use crate::money::Money;
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Default charge per exit traversed ($1.25)
pub const DEFAULT_RATE_CENTS: u64 = 125;

/// New York Thruway mainline, south to west, in highway order
const THRUWAY_EXITS: &[(&str, &str)] = &[
    ("1", "Hall Place"),
    ("2", "Yonkers Avenue"),
    ("3", "Mile Square Road"),
    ("4", "Cross County Parkway"),
    ("5", "Central Park Avenue"),
    ("6", "Tuckahoe Road"),
    ("7", "Ardsley"),
    ("7A", "Saw Mill River Parkway"),
    ("8", "White Plains - Rye"),
    ("9", "Tarrytown"),
    ("10", "Nyack - South Nyack"),
    ("11", "Nyack"),
    ("12", "West Nyack"),
    ("13", "Palisades Interstate Parkway"),
    ("14", "Spring Valley - Nanuet"),
    ("14A", "Garden State Parkway"),
    ("14B", "Airmont - Suffern"),
    ("15", "Suffern - Mahwah"),
    ("15A", "Sloatsburg"),
    ("16", "Harriman"),
    ("17", "Newburgh"),
    ("18", "New Paltz"),
    ("19", "Kingston"),
    ("20", "Saugerties"),
    ("21", "Catskill"),
    ("21B", "Coxsackie"),
    ("22", "Selkirk"),
    ("23", "Albany (Downtown)"),
    ("24", "Albany"),
    ("25", "Schenectady I-890"),
    ("25A", "Schenectady I-88"),
    ("26", "Schenectady - Scotia"),
    ("27", "Amsterdam"),
    ("28", "Fultonville - Fonda"),
    ("29", "Canajoharie"),
    ("29A", "Little Falls - Dolgeville"),
    ("30", "Herkimer - Mohawk"),
    ("31", "Utica"),
    ("32", "Westmoreland - Rome"),
    ("33", "Verona"),
    ("34", "Canastota"),
    ("34A", "Syracuse I-481"),
    ("35", "Syracuse - East Syracuse"),
    ("36", "Syracuse I-81"),
    ("37", "Electronics Parkway"),
    ("38", "Liverpool"),
    ("39", "Syracuse I-690"),
    ("40", "Weedsport - Auburn"),
    ("41", "Waterloo - Clyde"),
    ("42", "Geneva - Lyons"),
    ("43", "Manchester - Palmyra"),
    ("44", "Canandaigua - Victor"),
    ("45", "Victor - Rochester I-490"),
    ("46", "Rochester I-390"),
    ("47", "LeRoy - Rochester I-490"),
    ("48", "Batavia"),
    ("48A", "Pembroke - Medina"),
    ("49", "Depew - Lockport"),
    ("50", "Buffalo I-290"),
];

// ============================================================================
// EXIT
// ============================================================================

/// A highway interchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exit {
    /// Short code printed on the sign ("7A")
    pub id: String,

    /// Interchange name
    pub name: String,
}

impl Exit {
    pub fn new(id: &str, name: &str) -> Self {
        Exit {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

// ============================================================================
// SCHEDULE CONFIG (JSON file layout)
// ============================================================================

/// On-disk layout of a fare schedule
///
/// ```json
/// { "rate_cents": 125, "exits": [{ "id": "1", "name": "Hall Place" }] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_rate_cents")]
    pub rate_cents: u64,

    /// Exits in highway order
    pub exits: Vec<Exit>,
}

fn default_rate_cents() -> u64 {
    DEFAULT_RATE_CENTS
}

// ============================================================================
// FARE SCHEDULE
// ============================================================================

#[derive(Debug, Clone)]
pub struct FareSchedule {
    exits: Vec<Exit>,
    positions: HashMap<String, usize>,
    rate: Money,
}

impl FareSchedule {
    /// Built-in Thruway table at the default rate
    pub fn thruway() -> Self {
        let exits = THRUWAY_EXITS
            .iter()
            .map(|(id, name)| Exit::new(id, name))
            .collect::<Vec<_>>();

        let positions = exits
            .iter()
            .enumerate()
            .map(|(i, exit)| (exit.id.clone(), i))
            .collect();

        FareSchedule {
            exits,
            positions,
            rate: Money::from_cents(DEFAULT_RATE_CENTS),
        }
    }

    /// Build a schedule from an ordered exit list
    ///
    /// Rejects an empty list, blank ids, duplicate ids, a zero rate and a
    /// rate whose longest trip would not fit in a u64 of cents.
    pub fn from_exits(exits: Vec<Exit>, rate: Money) -> TollResult<Self> {
        if exits.is_empty() {
            return Err(TollError::InvalidSchedule {
                reason: "no exits defined".to_string(),
            });
        }
        if rate.is_zero() {
            return Err(TollError::InvalidSchedule {
                reason: "rate per exit must be positive".to_string(),
            });
        }
        let longest = (exits.len() - 1) as u64;
        if rate.checked_mul(longest).is_none() {
            return Err(TollError::InvalidSchedule {
                reason: format!("rate of {} cents overflows over {} exits", rate.cents(), longest),
            });
        }

        let mut positions = HashMap::with_capacity(exits.len());
        for (i, exit) in exits.iter().enumerate() {
            if exit.id.trim().is_empty() || exit.id.chars().any(char::is_whitespace) {
                return Err(TollError::InvalidSchedule {
                    reason: format!("exit #{} has an unusable id {:?}", i + 1, exit.id),
                });
            }
            if positions.insert(exit.id.clone(), i).is_some() {
                return Err(TollError::InvalidSchedule {
                    reason: format!("duplicate exit id {}", exit.id),
                });
            }
        }

        Ok(FareSchedule {
            exits,
            positions,
            rate,
        })
    }

    pub fn from_config(config: ScheduleConfig) -> TollResult<Self> {
        Self::from_exits(config.exits, Money::from_cents(config.rate_cents))
    }

    /// Load a schedule from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read schedule file: {:?}", path.as_ref()))?;

        let config: ScheduleConfig =
            serde_json::from_str(&content).context("Failed to parse schedule JSON")?;

        let schedule = Self::from_config(config)?;
        debug!(
            "Loaded fare schedule from {:?}: {} exits at {} per exit",
            path.as_ref(),
            schedule.exits.len(),
            schedule.rate
        );

        Ok(schedule)
    }

    pub fn is_valid(&self, exit_id: &str) -> bool {
        self.positions.contains_key(exit_id)
    }

    /// Index of an exit along the highway
    pub fn position(&self, exit_id: &str) -> Option<usize> {
        self.positions.get(exit_id).copied()
    }

    pub fn interchange_name(&self, exit_id: &str) -> TollResult<&str> {
        self.position(exit_id)
            .map(|i| self.exits[i].name.as_str())
            .ok_or_else(|| TollError::invalid_exit(ExitPoint::Lookup, exit_id))
    }

    /// Toll for a trip from `entry_id` to `exit_id`
    pub fn fare(&self, entry_id: &str, exit_id: &str) -> TollResult<Money> {
        let from = self
            .position(entry_id)
            .ok_or_else(|| TollError::invalid_exit(ExitPoint::Entry, entry_id))?;
        let to = self
            .position(exit_id)
            .ok_or_else(|| TollError::invalid_exit(ExitPoint::Exit, exit_id))?;

        if from == to {
            return Err(TollError::SameEntryAndExit {
                tag: None,
                exit: exit_id.to_string(),
            });
        }

        // Bounded by the check in from_exits
        self.rate
            .checked_mul(from.abs_diff(to) as u64)
            .ok_or_else(|| TollError::AmountOverflow {
                what: format!("fare from {} to {}", entry_id, exit_id),
            })
    }

    pub fn rate(&self) -> Money {
        self.rate
    }

    pub fn exits(&self) -> &[Exit] {
        &self.exits
    }

    pub fn to_config(&self) -> ScheduleConfig {
        ScheduleConfig {
            rate_cents: self.rate.cents(),
            exits: self.exits.clone(),
        }
    }
}

impl Default for FareSchedule {
    fn default() -> Self {
        Self::thruway()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;

    fn small_schedule() -> FareSchedule {
        FareSchedule::from_exits(
            vec![
                Exit::new("A", "Alpha"),
                Exit::new("B", "Bravo"),
                Exit::new("C", "Charlie"),
                Exit::new("D", "Delta"),
            ],
            Money::from_cents(100),
        )
        .unwrap()
    }

    #[test]
    fn test_thruway_table_is_consistent() {
        let schedule = FareSchedule::thruway();

        assert_eq!(schedule.exits().len(), THRUWAY_EXITS.len());
        assert!(schedule.is_valid("1"));
        assert!(schedule.is_valid("7A"));
        assert!(schedule.is_valid("50"));
        assert!(!schedule.is_valid("51"));
        assert!(!schedule.is_valid(""));
        assert_eq!(schedule.rate(), Money::from_cents(DEFAULT_RATE_CENTS));

        // Built-in table must pass the same checks as a loaded one
        assert!(FareSchedule::from_config(schedule.to_config()).is_ok());
    }

    #[test]
    fn test_interchange_name() {
        let schedule = FareSchedule::thruway();

        assert_eq!(schedule.interchange_name("3").unwrap(), "Mile Square Road");
        assert_eq!(schedule.interchange_name("16").unwrap(), "Harriman");

        let err = schedule.interchange_name("99").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidExit);
    }

    #[test]
    fn test_fare_counts_exits_passed() {
        let schedule = FareSchedule::thruway();

        // 6, 7, 7A, 8
        assert_eq!(schedule.fare("5", "8").unwrap(), Money::from_cents(500));
        // 9, 10, 11, 12
        assert_eq!(schedule.fare("8", "12").unwrap(), Money::from_cents(500));
        // Direction does not matter
        assert_eq!(schedule.fare("12", "8").unwrap(), Money::from_cents(500));
        assert_eq!(schedule.fare("1", "2").unwrap(), Money::from_cents(125));
    }

    #[test]
    fn test_fare_strictly_increases_with_distance() {
        let schedule = small_schedule();

        let b = schedule.fare("A", "B").unwrap();
        let c = schedule.fare("A", "C").unwrap();
        let d = schedule.fare("A", "D").unwrap();

        assert!(b < c);
        assert!(c < d);
        assert_eq!(d, Money::from_cents(300));
    }

    #[test]
    fn test_fare_rejects_same_exit() {
        let schedule = small_schedule();

        let err = schedule.fare("B", "B").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRecord);
    }

    #[test]
    fn test_fare_rejects_unknown_exits() {
        let schedule = small_schedule();

        assert_eq!(
            schedule.fare("Z", "B").unwrap_err(),
            TollError::invalid_exit(ExitPoint::Entry, "Z")
        );
        assert_eq!(
            schedule.fare("A", "Z").unwrap_err(),
            TollError::invalid_exit(ExitPoint::Exit, "Z")
        );
    }

    #[test]
    fn test_from_exits_rejects_bad_tables() {
        let empty = FareSchedule::from_exits(Vec::new(), Money::from_cents(125));
        assert!(empty.is_err());

        let duplicate = FareSchedule::from_exits(
            vec![Exit::new("1", "One"), Exit::new("1", "Again")],
            Money::from_cents(125),
        );
        assert!(matches!(duplicate, Err(TollError::InvalidSchedule { .. })));

        let blank = FareSchedule::from_exits(vec![Exit::new(" ", "Blank")], Money::from_cents(125));
        assert!(blank.is_err());
    }

    #[test]
    fn test_from_exits_rejects_zero_rate() {
        let result = FareSchedule::from_config(ScheduleConfig {
            rate_cents: 0,
            exits: vec![Exit::new("1", "One"), Exit::new("2", "Two"), Exit::new("3", "Three")],
        });

        assert!(matches!(result, Err(TollError::InvalidSchedule { .. })));
    }

    #[test]
    fn test_from_exits_rejects_overflowing_rate() {
        let exits = vec![Exit::new("1", "One"), Exit::new("2", "Two"), Exit::new("3", "Three")];

        // 1 -> 3 would be two exits at more than half of u64::MAX
        let result = FareSchedule::from_config(ScheduleConfig {
            rate_cents: u64::MAX / 2 + 1,
            exits: exits.clone(),
        });
        assert!(matches!(result, Err(TollError::InvalidSchedule { .. })));

        // Largest rate whose longest trip still fits
        let schedule = FareSchedule::from_config(ScheduleConfig {
            rate_cents: u64::MAX / 2,
            exits,
        })
        .unwrap();
        assert_eq!(schedule.fare("1", "3").unwrap().cents(), u64::MAX - 1);
    }

    #[test]
    fn test_from_file_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "exits": [{{ "id": "1" "#).unwrap();

        let err = FareSchedule::from_file(file.path()).unwrap_err();

        assert!(err.to_string().contains("Failed to parse schedule JSON"));
    }

    #[test]
    fn test_from_file_rejects_zero_rate() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "rate_cents": 0, "exits": [{{ "id": "1", "name": "North" }}, {{ "id": "2", "name": "South" }}] }}"#
        )
        .unwrap();

        let err = FareSchedule::from_file(file.path()).unwrap_err();

        assert!(err.to_string().contains("rate per exit must be positive"));
    }

    #[test]
    fn test_from_file_defaults_rate() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "exits": [{{ "id": "1", "name": "North" }}, {{ "id": "2", "name": "South" }}] }}"#
        )
        .unwrap();

        let schedule = FareSchedule::from_file(file.path()).unwrap();

        assert_eq!(schedule.exits().len(), 2);
        assert_eq!(schedule.fare("1", "2").unwrap(), Money::from_cents(DEFAULT_RATE_CENTS));
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = FareSchedule::from_file(dir.path().join("nope.json"));

        assert!(result.is_err());
    }
}
