//! ffimport-loader: turns a parsed statement into Firefly III transactions and
//! submits them in batches.

pub mod batch;
pub mod config;
pub mod firefly;
pub mod loader;
pub mod transaction;

pub use batch::{BatchOutcome, LoadSummary};
pub use config::{AppSection, Config, ConfigError, FireflySection};
pub use firefly::{BatchSubmissionError, FireflyClient, LedgerApi};
pub use loader::{Prepared, StatementLoader, prepare};
pub use transaction::{LedgerTransaction, TransactionGroupRequest};
