// 🚨 Toll Errors - structured failures for the ledger core
//
// Every failure the core can produce is a value of TollError. The binary
// decides what to do with it (today: print and exit 1).

use std::fmt;
use thiserror::Error;

// ============================================================================
// EXIT POINT
// ============================================================================

/// Which role an exit id played when it failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitPoint {
    /// Exit where the vehicle got on the highway
    Entry,
    /// Exit where the vehicle left the highway
    Exit,
    /// Plain lookup (interchange name, fare table)
    Lookup,
}

impl fmt::Display for ExitPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitPoint::Entry => write!(f, "entry point"),
            ExitPoint::Exit => write!(f, "exit point"),
            ExitPoint::Lookup => write!(f, "exit"),
        }
    }
}

// ============================================================================
// ERROR KINDS
// ============================================================================

/// Coarse classification of a TollError
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Exit id not recognized by the fare schedule
    InvalidExit,
    /// Trip record cannot be closed or billed
    InvalidRecord,
    /// Scan input or schedule configuration is malformed
    Input,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TollError {
    #[error("Invalid {point}: {exit}")]
    InvalidExit { point: ExitPoint, exit: String },

    #[error("Enter and exit booths can't be the same! ({})", same_exit_detail(.tag, .exit))]
    SameEntryAndExit { tag: Option<String>, exit: String },

    #[error("Incomplete toll record for tag {tag}")]
    IncompleteRecord { tag: String },

    #[error("Truncated input: tag {tag} has no exit")]
    TruncatedInput { tag: String },

    #[error("Invalid fare schedule: {reason}")]
    InvalidSchedule { reason: String },

    #[error("Amount overflow: {what}")]
    AmountOverflow { what: String },
}

fn same_exit_detail(tag: &Option<String>, exit: &str) -> String {
    match tag {
        Some(tag) => format!("tag {}, exit {}", tag, exit),
        None => format!("exit {}", exit),
    }
}

impl TollError {
    pub fn invalid_exit(point: ExitPoint, exit: &str) -> Self {
        TollError::InvalidExit {
            point,
            exit: exit.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TollError::InvalidExit { .. } => ErrorKind::InvalidExit,
            TollError::SameEntryAndExit { .. } | TollError::IncompleteRecord { .. } => {
                ErrorKind::InvalidRecord
            }
            TollError::TruncatedInput { .. }
            | TollError::InvalidSchedule { .. }
            | TollError::AmountOverflow { .. } => ErrorKind::Input,
        }
    }
}

pub type TollResult<T> = Result<T, TollError>;
