// agricredit/core/primitives/src/lib.rs

//! Shared record types for the AgriCredit ledger.
//!
//! Every other crate in the workspace speaks in these types: account, listing
//! and trade records, the platform wallet, the typed error taxonomy and the
//! clock abstraction used for activity and decay timestamps.

pub mod error;
pub mod time;
pub mod types;

pub use error::{DomainConflict, LedgerError, LedgerResult, NotFoundError, ValidationError};
pub use time::{Clock, ManualClock, SystemClock};
pub use types::*;
