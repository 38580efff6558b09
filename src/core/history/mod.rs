pub mod ledger;

pub use ledger::{HistoryLedger, HISTORY_FILE};
